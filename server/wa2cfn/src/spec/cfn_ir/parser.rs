use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range};
use url::Url;

use crate::spec::intrinsics::{self, FunctionForm, IntrinsicFunction};

use super::types::{
	CfnArray, CfnEntry, CfnFunction, CfnObject, CfnProperty, CfnResource, CfnScalar, CfnSection,
	CfnTemplate, CfnValue, EntrySection, ResourceAttribute, ScalarKind, SectionKind,
};

/// Entry in an object with optional key string, value node, and key range.
/// The key is None when it is not a scalar.
pub type ObjectEntry<N> = (Option<String>, N, Range);

/// An intrinsic function spotted by a format-specific parser
pub struct DetectedIntrinsic<N> {
	pub function: IntrinsicFunction,
	pub form: FunctionForm,
	pub name_range: Range,
	/// The tagged value or the single mapping value
	pub inner: N,
}

/// Template text that could not be turned into a node tree
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
	#[error("YAML parse error: {message}")]
	Yaml { message: String, range: Range },

	#[error("JSON parse error: {message}")]
	Json { message: String, range: Range },

	#[error("Template is empty")]
	Empty,

	#[error("Template root must be an object/mapping")]
	InvalidRoot { range: Range },
}

impl LoadError {
	pub fn range(&self) -> Range {
		match self {
			LoadError::Yaml { range, .. }
			| LoadError::Json { range, .. }
			| LoadError::InvalidRoot { range } => *range,
			LoadError::Empty => Range {
				start: Position {
					line: 0,
					character: 0,
				},
				end: Position {
					line: 0,
					character: 1,
				},
			},
		}
	}

	pub fn code(&self) -> &'static str {
		match self {
			LoadError::Yaml { .. } => "WA2_YAML_PARSE",
			LoadError::Json { .. } => "WA2_JSON_PARSE",
			LoadError::Empty => "WA2_CFN_EMPTY",
			LoadError::InvalidRoot { .. } => "WA2_CFN_INVALID_ROOT",
		}
	}

	/// Convert into an LSP diagnostic for the document at `uri`
	pub fn to_diagnostic(&self, uri: &Url) -> Diagnostic {
		Diagnostic {
			range: self.range(),
			severity: Some(DiagnosticSeverity::ERROR),
			code: Some(NumberOrString::String(self.code().into())),
			source: Some("wa2-cfn".into()),
			message: format!("{self} in {uri}"),
			..Default::default()
		}
	}
}

/// High-level operations needed to parse CloudFormation templates
/// Each format (JSON/YAML) implements this trait for their node type
pub trait CfnParser {
	/// The underlying node type (must be cloneable)
	type Node: Clone;

	/// Scalar text and kind; null is a scalar of kind `Null`
	fn node_as_scalar(&self, node: &Self::Node) -> Option<(String, ScalarKind)>;

	/// Elements of a sequence/array node (returns owned copies)
	fn array_items(&self, node: &Self::Node) -> Option<Vec<Self::Node>>;

	/// Get all entries from an object with both key and value ranges
	/// Returns (key_string, value_node, key_range)
	fn object_entries_with_ranges(&self, node: &Self::Node)
	-> Option<Vec<ObjectEntry<Self::Node>>>;

	/// Get the LSP range for this node
	fn node_range(&self, node: &Self::Node) -> Range;

	/// Check if this node represents a known intrinsic function
	fn detect_intrinsic(&self, node: &Self::Node) -> Option<DetectedIntrinsic<Self::Node>>;
}

/// Long-form detection shared by both formats: a single-key mapping whose
/// key is `Ref`, `Condition` or a known `Fn::*` name
pub fn detect_long_form<P: CfnParser>(
	parser: &P,
	node: &P::Node,
) -> Option<DetectedIntrinsic<P::Node>> {
	let entries = parser.object_entries_with_ranges(node)?;
	let [(Some(key), inner, key_range)] = entries.as_slice() else {
		return None;
	};

	let function = intrinsics::get_intrinsic_by_json_key(key)?;

	// `Condition: Name` is only a function when it names a condition
	if function == IntrinsicFunction::Condition
		&& parser
			.node_as_scalar(inner)
			.is_none_or(|(_, kind)| kind == ScalarKind::Null)
	{
		return None;
	}

	Some(DetectedIntrinsic {
		function,
		form: FunctionForm::Long,
		name_range: *key_range,
		inner: inner.clone(),
	})
}

/// Parse a CloudFormation template from a root node using a generic parser
/// This works for both JSON and YAML
pub fn parse_template<P: CfnParser>(parser: &P, root: &P::Node) -> Result<CfnTemplate, LoadError> {
	let range = parser.node_range(root);
	let entries = parser
		.object_entries_with_ranges(root)
		.ok_or(LoadError::InvalidRoot { range })?;

	let mut sections = Vec::with_capacity(entries.len());
	for (key, node, key_range) in entries {
		let Some(key) = key else {
			continue;
		};
		let key = CfnScalar::string(key, key_range);

		let section = match SectionKind::from_key(&key.text) {
			Some(SectionKind::Parameters) => {
				CfnSection::Parameters(parse_entry_section(parser, key, &node))
			}
			Some(SectionKind::Mappings) => {
				CfnSection::Mappings(parse_entry_section(parser, key, &node))
			}
			Some(SectionKind::Conditions) => {
				CfnSection::Conditions(parse_entry_section(parser, key, &node))
			}
			Some(SectionKind::Outputs) => {
				CfnSection::Outputs(parse_entry_section(parser, key, &node))
			}
			Some(SectionKind::Resources) => {
				CfnSection::Resources(parse_resources(parser, key, &node))
			}
			Some(SectionKind::Metadata) => CfnSection::Metadata(CfnProperty {
				key,
				value: parse_value(parser, &node),
			}),
			None => CfnSection::Other(CfnProperty {
				key,
				value: parse_value(parser, &node),
			}),
		};
		sections.push(section);
	}

	Ok(CfnTemplate { range, sections })
}

/// Range running from the start of `from` to the end of `to`
fn span(from: Range, to: Range) -> Range {
	Range {
		start: from.start,
		end: to.end,
	}
}

fn parse_entry_section<P: CfnParser>(
	parser: &P,
	key: CfnScalar,
	node: &P::Node,
) -> EntrySection<CfnEntry> {
	let range = span(key.range, parser.node_range(node));

	// A section that isn't a mapping is treated as declaring nothing
	let entries = parser
		.object_entries_with_ranges(node)
		.unwrap_or_default()
		.into_iter()
		.map(|(name, value_node, key_range)| CfnEntry {
			name: name.map(|name| CfnScalar::string(name, key_range)),
			range: span(key_range, parser.node_range(&value_node)),
			value: parse_value(parser, &value_node),
		})
		.collect();

	EntrySection {
		key,
		range,
		entries,
	}
}

fn parse_resources<P: CfnParser>(
	parser: &P,
	key: CfnScalar,
	node: &P::Node,
) -> EntrySection<CfnResource> {
	let range = span(key.range, parser.node_range(node));

	let entries = parser
		.object_entries_with_ranges(node)
		.unwrap_or_default()
		.into_iter()
		.map(|(logical_id, resource_node, key_range)| {
			parse_resource(parser, logical_id, &resource_node, key_range)
		})
		.collect();

	EntrySection {
		key,
		range,
		entries,
	}
}

fn parse_resource<P: CfnParser>(
	parser: &P,
	logical_id: Option<String>,
	node: &P::Node,
	logical_id_range: Range,
) -> CfnResource {
	// A non-mapping body has no attributes, so it surfaces as a missing Type
	let attributes = parser
		.object_entries_with_ranges(node)
		.unwrap_or_default()
		.into_iter()
		.filter_map(|(key, value_node, key_range)| {
			Some(ResourceAttribute::classify(CfnProperty {
				key: CfnScalar::string(key?, key_range),
				value: parse_value(parser, &value_node),
			}))
		})
		.collect();

	CfnResource {
		name: logical_id.map(|id| CfnScalar::string(id, logical_id_range)),
		range: span(logical_id_range, parser.node_range(node)),
		attributes,
	}
}

/// Convert any value node, recognising intrinsic functions at every depth
pub fn parse_value<P: CfnParser>(parser: &P, node: &P::Node) -> CfnValue {
	let range = parser.node_range(node);

	// Intrinsics BEFORE arrays/objects: long form is itself a mapping
	if let Some(detected) = parser.detect_intrinsic(node) {
		let args = match parser.array_items(&detected.inner) {
			Some(items) => items.iter().map(|item| parse_value(parser, item)).collect(),
			None => vec![parse_value(parser, &detected.inner)],
		};

		return CfnValue::Function(CfnFunction {
			function: detected.function,
			form: detected.form,
			name_range: detected.name_range,
			args,
			range,
		});
	}

	if let Some((text, kind)) = parser.node_as_scalar(node) {
		return CfnValue::Scalar(CfnScalar { text, kind, range });
	}

	if let Some(items) = parser.array_items(node) {
		return CfnValue::Array(CfnArray {
			items: items.iter().map(|item| parse_value(parser, item)).collect(),
			range,
		});
	}

	if let Some(entries) = parser.object_entries_with_ranges(node) {
		let properties = entries
			.into_iter()
			.filter_map(|(key, value_node, key_range)| {
				Some(CfnProperty {
					key: CfnScalar::string(key?, key_range),
					value: parse_value(parser, &value_node),
				})
			})
			.collect();
		return CfnValue::Object(CfnObject { properties, range });
	}

	// Fallback to null
	CfnValue::Scalar(CfnScalar::null(range))
}
