//! Edit distance calculation for "Did you mean..." suggestions

/// Calculate Levenshtein distance between two strings
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
	let a_chars: Vec<char> = a.chars().collect();
	let b_chars: Vec<char> = b.chars().collect();

	if a_chars.is_empty() {
		return b_chars.len();
	}
	if b_chars.is_empty() {
		return a_chars.len();
	}

	let mut prev_row: Vec<usize> = (0..=b_chars.len()).collect();
	let mut curr_row: Vec<usize> = vec![0; b_chars.len() + 1];

	for (i, a_ch) in a_chars.iter().enumerate() {
		curr_row[0] = i + 1;

		for (j, b_ch) in b_chars.iter().enumerate() {
			let cost = usize::from(a_ch != b_ch);
			curr_row[j + 1] = (prev_row[j + 1] + 1) // deletion
				.min(curr_row[j] + 1) // insertion
				.min(prev_row[j] + cost); // substitution
		}

		std::mem::swap(&mut prev_row, &mut curr_row);
	}

	prev_row[b_chars.len()]
}

/// Find the closest candidate, case-insensitively.
/// Ties keep the earliest candidate.
pub fn find_closest<'a>(
	typo: &str,
	candidates: impl IntoIterator<Item = &'a str>,
) -> Option<(&'a str, usize)> {
	let typo_lower = typo.to_lowercase();

	candidates
		.into_iter()
		.map(|candidate| {
			let distance = levenshtein_distance(&typo_lower, &candidate.to_lowercase());
			(candidate, distance)
		})
		.fold(None, |best, (candidate, distance)| match best {
			Some((_, best_distance)) if best_distance <= distance => best,
			_ => Some((candidate, distance)),
		})
}

/// A candidate close enough to be worth offering: within a third of its
/// length (at least one edit), and not the typo itself.
pub fn suggest<'a>(typo: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
	let (candidate, distance) = find_closest(typo, candidates)?;
	let threshold = (candidate.chars().count() / 3).max(1);

	(distance > 0 && distance <= threshold).then_some(candidate)
}
