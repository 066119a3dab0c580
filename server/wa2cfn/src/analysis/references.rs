//! Entity references recorded during analysis, keyed by source location

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use tower_lsp::lsp_types::{Position, Range};

use crate::spec::resolver::EntityScope;

/// What a referencing scalar may point at
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceTarget {
	/// A logical name declared in one of the scope's sections
	Entity(EntityScope),
	/// A first-level key of the named mapping
	MappingKey { mapping: String },
	/// A second-level key under one first-level key of the named mapping
	MappingSecondKey {
		mapping: String,
		top_level_key: String,
	},
}

/// A name used at `location`, with the sections it may be declared in.
///
/// `excluded` names are dropped from navigation/completion candidates for
/// this use only; they never make the reference invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityReference {
	pub location: Range,
	pub name: String,
	pub target: ReferenceTarget,
	pub excluded: BTreeSet<String>,
}

impl EntityReference {
	pub fn entity(location: Range, name: impl Into<String>, scope: EntityScope) -> Self {
		EntityReference {
			location,
			name: name.into(),
			target: ReferenceTarget::Entity(scope),
			excluded: BTreeSet::new(),
		}
	}

	pub fn mapping_key(location: Range, name: impl Into<String>, mapping: impl Into<String>) -> Self {
		EntityReference {
			location,
			name: name.into(),
			target: ReferenceTarget::MappingKey {
				mapping: mapping.into(),
			},
			excluded: BTreeSet::new(),
		}
	}

	pub fn mapping_second_key(
		location: Range,
		name: impl Into<String>,
		mapping: impl Into<String>,
		top_level_key: impl Into<String>,
	) -> Self {
		EntityReference {
			location,
			name: name.into(),
			target: ReferenceTarget::MappingSecondKey {
				mapping: mapping.into(),
				top_level_key: top_level_key.into(),
			},
			excluded: BTreeSet::new(),
		}
	}

	pub fn excluding<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.excluded.extend(names.into_iter().map(Into::into));
		self
	}

	/// The entity scope, for references to logical names
	pub fn scope(&self) -> Option<EntityScope> {
		match &self.target {
			ReferenceTarget::Entity(scope) => Some(*scope),
			ReferenceTarget::MappingKey { .. } | ReferenceTarget::MappingSecondKey { .. } => None,
		}
	}

	pub fn is_candidate(&self, name: &str) -> bool {
		!self.excluded.contains(name)
	}
}

impl Ord for EntityReference {
	fn cmp(&self, other: &Self) -> Ordering {
		SpanKey::from(self.location)
			.cmp(&SpanKey::from(other.location))
			.then_with(|| self.name.cmp(&other.name))
			.then_with(|| self.target.cmp(&other.target))
			.then_with(|| self.excluded.cmp(&other.excluded))
	}
}

impl PartialOrd for EntityReference {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

/// `Range` in document order; lsp_types ranges are not `Ord`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct SpanKey {
	start: (u32, u32),
	end: (u32, u32),
}

impl SpanKey {
	fn contains(&self, position: Position) -> bool {
		let at = (position.line, position.character);
		self.start <= at && at <= self.end
	}
}

impl From<Range> for SpanKey {
	fn from(range: Range) -> Self {
		SpanKey {
			start: (range.start.line, range.start.character),
			end: (range.end.line, range.end.character),
		}
	}
}

impl From<SpanKey> for Range {
	fn from(key: SpanKey) -> Self {
		Range {
			start: Position {
				line: key.start.0,
				character: key.start.1,
			},
			end: Position {
				line: key.end.0,
				character: key.end.1,
			},
		}
	}
}

/// Location → references made there
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceMap {
	by_location: BTreeMap<SpanKey, BTreeSet<EntityReference>>,
}

impl ReferenceMap {
	/// Record a reference; returns false if it was already present
	pub fn insert(&mut self, reference: EntityReference) -> bool {
		self.by_location
			.entry(SpanKey::from(reference.location))
			.or_default()
			.insert(reference)
	}

	pub fn get(&self, location: &Range) -> Option<&BTreeSet<EntityReference>> {
		self.by_location.get(&SpanKey::from(*location))
	}

	/// Locations in document order, with the references made at each
	pub fn iter(&self) -> impl Iterator<Item = (Range, &BTreeSet<EntityReference>)> {
		self.by_location
			.iter()
			.map(|(key, references)| (Range::from(*key), references))
	}

	/// Every reference, ordered by location
	pub fn references(&self) -> impl Iterator<Item = &EntityReference> {
		self.by_location.values().flatten()
	}

	/// References whose location contains `position`
	pub fn at(&self, position: Position) -> impl Iterator<Item = &EntityReference> {
		self.by_location
			.iter()
			.filter(move |(key, _)| key.contains(position))
			.flat_map(|(_, references)| references)
	}

	/// Number of distinct references
	pub fn len(&self) -> usize {
		self.by_location.values().map(BTreeSet::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.by_location.is_empty()
	}
}
