use jsonc_parser::ParseOptions;
use jsonc_parser::ast::Value;
use jsonc_parser::common::Ranged;
use jsonc_parser::errors::ParseError;
use tower_lsp::lsp_types::{Position, Range};

use crate::spec::cfn_ir::parser::{self, CfnParser, DetectedIntrinsic, LoadError, ObjectEntry};
use crate::spec::cfn_ir::types::{CfnTemplate, ScalarKind};

impl CfnTemplate {
	/// Parse a CloudFormation template from JSON text
	pub fn from_json(text: &str) -> Result<Self, LoadError> {
		let parse_options = ParseOptions {
			allow_comments: true,
			allow_trailing_commas: true,
			allow_loose_object_property_names: false,
			allow_hexadecimal_numbers: false,
			allow_single_quoted_strings: false,
			allow_unary_plus_numbers: false,
		};

		let parser = JsonCfnParser::new(text);

		let parse_result = jsonc_parser::parse_to_ast(text, &Default::default(), &parse_options)
			.map_err(|err| parser.json_error(err))?;

		let root = parse_result.value.ok_or(LoadError::Empty)?;

		// Use the unified parser
		parser::parse_template(&parser, &root)
	}
}

/// JSON parser implementation
pub struct JsonCfnParser<'a> {
	text: &'a str,
	/// Byte offset of every line start
	line_starts: Vec<usize>,
}

impl<'a> JsonCfnParser<'a> {
	pub fn new(text: &'a str) -> Self {
		let line_starts = std::iter::once(0)
			.chain(text.match_indices('\n').map(|(idx, _)| idx + 1))
			.collect();
		Self { text, line_starts }
	}

	/// Convert byte offset to line/column position
	fn byte_offset_to_position(&self, offset: usize) -> Position {
		let line = self
			.line_starts
			.partition_point(|&start| start <= offset)
			.saturating_sub(1);
		let line_start = self.line_starts.get(line).copied().unwrap_or_default();
		let character = self
			.text
			.get(line_start..offset)
			.map_or(0, |prefix| prefix.chars().count());

		Position {
			line: line as u32,
			character: character as u32,
		}
	}

	/// Helper to convert anything with a range to an LSP Range
	fn ranged_to_range<T: Ranged>(&self, item: &T) -> Range {
		let json_range = item.range();
		Range {
			start: self.byte_offset_to_position(json_range.start),
			end: self.byte_offset_to_position(json_range.end),
		}
	}

	fn json_error(&self, err: ParseError) -> LoadError {
		let json_range = err.range();
		LoadError::Json {
			message: err.to_string(),
			range: Range {
				start: self.byte_offset_to_position(json_range.start),
				end: self.byte_offset_to_position(json_range.end),
			},
		}
	}
}

impl<'a> CfnParser for JsonCfnParser<'a> {
	type Node = Value<'a>;

	fn node_as_scalar(&self, node: &Self::Node) -> Option<(String, ScalarKind)> {
		match node {
			Value::StringLit(s) => Some((s.value.to_string(), ScalarKind::String)),
			Value::NumberLit(n) => Some((n.value.to_string(), ScalarKind::Number)),
			Value::BooleanLit(b) => Some((b.value.to_string(), ScalarKind::Bool)),
			Value::NullKeyword(_) => Some((String::new(), ScalarKind::Null)),
			_ => None,
		}
	}

	fn array_items(&self, node: &Self::Node) -> Option<Vec<Self::Node>> {
		node.as_array().map(|arr| arr.elements.clone())
	}

	fn object_entries_with_ranges(
		&self,
		node: &Self::Node,
	) -> Option<Vec<ObjectEntry<Self::Node>>> {
		node.as_object().map(|obj| {
			obj.properties
				.iter()
				.map(|prop| {
					// JSON keys are always strings
					let key = Some(prop.name.as_str().to_string());
					let key_range = self.ranged_to_range(&prop.name);
					(key, prop.value.clone(), key_range)
				})
				.collect()
		})
	}

	fn node_range(&self, node: &Self::Node) -> Range {
		self.ranged_to_range(node)
	}

	fn detect_intrinsic(&self, node: &Self::Node) -> Option<DetectedIntrinsic<Self::Node>> {
		// JSON only has long-form like {"Ref": "MyBucket"}
		parser::detect_long_form(self, node)
	}
}
