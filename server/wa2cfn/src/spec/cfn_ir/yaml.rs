use saphyr::{LoadableYamlNode, MarkedYaml, Scalar, ScanError, YamlData};
use tower_lsp::lsp_types::{Position, Range};

use crate::spec::cfn_ir::parser::{self, CfnParser, DetectedIntrinsic, LoadError, ObjectEntry};
use crate::spec::cfn_ir::types::{CfnTemplate, ScalarKind};
use crate::spec::intrinsics::{self, FunctionForm};

impl CfnTemplate {
	/// Parse a CloudFormation template from YAML text
	pub fn from_yaml(text: &str) -> Result<Self, LoadError> {
		let docs = MarkedYaml::load_from_str(text).map_err(yaml_error)?;

		let Some(root) = docs.first() else {
			return Ok(CfnTemplate {
				range: Range::default(),
				sections: Vec::new(),
			});
		};

		// Use the unified parser
		let parser = YamlCfnParser::new(text);
		parser::parse_template(&parser, root)
	}
}

/// Convert a saphyr scan error into a load error at the scanner's position
fn yaml_error(err: ScanError) -> LoadError {
	let marker = err.marker();
	let line = marker.line().saturating_sub(1) as u32;
	let col = marker.col() as u32;

	LoadError::Yaml {
		message: err.to_string(),
		range: Range {
			start: Position {
				line,
				character: col,
			},
			end: Position {
				line,
				character: col + 1,
			},
		},
	}
}

/// Strip tags that are not intrinsic functions; the value loads as if untagged
fn peel<'n, 'a>(node: &'n MarkedYaml<'a>) -> &'n MarkedYaml<'a> {
	match &node.data {
		YamlData::Tagged(tag, inner) if intrinsics::get_intrinsic_by_tag(&tag.suffix).is_none() => {
			peel(inner)
		}
		_ => node,
	}
}

/// YAML parser implementation
pub struct YamlCfnParser<'a> {
	#[allow(dead_code)] // for lifetime
	text: &'a str,
}

impl<'a> YamlCfnParser<'a> {
	pub fn new(text: &'a str) -> Self {
		Self { text }
	}
}

impl<'a> CfnParser for YamlCfnParser<'a> {
	type Node = MarkedYaml<'a>;

	fn node_as_scalar(&self, node: &Self::Node) -> Option<(String, ScalarKind)> {
		match &peel(node).data {
			YamlData::Value(Scalar::String(s)) => Some((s.to_string(), ScalarKind::String)),
			YamlData::Value(Scalar::Integer(i)) => Some((i.to_string(), ScalarKind::Number)),
			YamlData::Value(Scalar::FloatingPoint(f)) => {
				Some((f.into_inner().to_string(), ScalarKind::Number))
			}
			YamlData::Value(Scalar::Boolean(b)) => Some((b.to_string(), ScalarKind::Bool)),
			YamlData::Value(Scalar::Null) => Some((String::new(), ScalarKind::Null)),
			_ => None,
		}
	}

	fn array_items(&self, node: &Self::Node) -> Option<Vec<Self::Node>> {
		match &peel(node).data {
			YamlData::Sequence(seq) => Some(seq.to_vec()),
			_ => None,
		}
	}

	fn object_entries_with_ranges(
		&self,
		node: &Self::Node,
	) -> Option<Vec<ObjectEntry<Self::Node>>> {
		match &peel(node).data {
			YamlData::Mapping(map) => {
				let entries = map
					.iter()
					.map(|(k, v)| {
						// Numeric and boolean keys are still usable names
						let key = self
							.node_as_scalar(k)
							.filter(|(_, kind)| *kind != ScalarKind::Null)
							.map(|(text, _)| text);
						let key_range = self.node_range(k); // Get the KEY range
						(key, v.clone(), key_range)
					})
					.collect();
				Some(entries)
			}
			_ => None,
		}
	}

	fn node_range(&self, node: &Self::Node) -> Range {
		let start_marker = node.span.start;
		let end_marker = node.span.end;

		Range {
			start: Position {
				line: start_marker.line().saturating_sub(1) as u32,
				character: start_marker.col() as u32,
			},
			end: Position {
				line: end_marker.line().saturating_sub(1) as u32,
				character: end_marker.col() as u32,
			},
		}
	}

	fn detect_intrinsic(&self, node: &Self::Node) -> Option<DetectedIntrinsic<Self::Node>> {
		// Check for YAML tags like !Ref, !GetAtt, !FindInMap
		if let YamlData::Tagged(tag, inner) = &node.data
			&& let Some(function) = intrinsics::get_intrinsic_by_tag(&tag.suffix)
		{
			// Only a tag on a plain scalar is short form; `!GetAtt [A, B]` is long
			let form = match &peel(inner).data {
				YamlData::Sequence(_) | YamlData::Mapping(_) => FunctionForm::Long,
				_ => FunctionForm::Short,
			};
			// saphyr leaves the tagged value's span empty; the tag's span covers it
			let mut inner = (**inner).clone();
			if inner.span.start.index() == inner.span.end.index() {
				inner.span = node.span;
			}

			return Some(DetectedIntrinsic {
				function,
				form,
				name_range: self.node_range(node),
				inner,
			});
		}

		// Check for long-form like "Ref: MyBucket"
		parser::detect_long_form(self, peel(node))
	}
}
