//! Diagnostic message ids and their English text

use std::fmt;

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Range};

use crate::spec::cfn_ir::types::SectionKind;
use crate::spec::intrinsics::IntrinsicFunction;

pub const SOURCE: &str = "wa2-cfn";

/// Every diagnostic the analyzer can emit, with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message<'a> {
	ResourcesSectionMissing,
	EmptySection(SectionKind),
	SectionLimitExceeded {
		section: SectionKind,
		limit: usize,
	},
	ResourceTypeMissing,
	ResourceTypeValueRequired,
	UnknownResourceType(&'a str),
	UnknownProperty {
		resource_type: &'a str,
		property: &'a str,
	},
	MissingRequiredProperties(Vec<&'a str>),
	RefArguments,
	ConditionArguments,
	Base64Arguments,
	FindInMapArguments,
	GetAttShortForm,
	GetAttArguments,
	UnknownAttribute {
		resource_type: &'a str,
		attribute: &'a str,
	},
	GetAZsArguments,
	ImportValueArguments,
	JoinArguments,
	SelectArguments,
	SelectIndex,
	SubArguments,
	/// And / Or
	TooFewConditions(IntrinsicFunction),
	EqualsArguments,
	IfConditionName,
	IfArguments,
	NotArguments,
	ExpectedString,
}

impl Message<'_> {
	/// Stable id, independent of the message text
	pub fn code(&self) -> &'static str {
		match self {
			Message::ResourcesSectionMissing => "WA2_CFN_RESOURCES_MISSING",
			Message::EmptySection(_) => "WA2_CFN_SECTION_EMPTY",
			Message::SectionLimitExceeded { .. } => "WA2_CFN_SECTION_LIMIT",
			Message::ResourceTypeMissing => "WA2_CFN_RESOURCE_TYPE_MISSING",
			Message::ResourceTypeValueRequired => "WA2_CFN_RESOURCE_TYPE_EMPTY",
			Message::UnknownResourceType(_) => "WA2_CFN_UNKNOWN_RESOURCE_TYPE",
			Message::UnknownProperty { .. } => "WA2_CFN_UNKNOWN_PROPERTY",
			Message::MissingRequiredProperties(_) => "WA2_CFN_REQUIRED_PROPERTY_MISSING",
			Message::RefArguments => "WA2_CFN_MALFORMED_REF",
			Message::ConditionArguments => "WA2_CFN_MALFORMED_CONDITION",
			Message::Base64Arguments => "WA2_CFN_MALFORMED_BASE64",
			Message::FindInMapArguments => "WA2_CFN_MALFORMED_FINDINMAP",
			Message::GetAttShortForm | Message::GetAttArguments => "WA2_CFN_MALFORMED_GETATT",
			Message::UnknownAttribute { .. } => "WA2_CFN_UNKNOWN_ATTRIBUTE",
			Message::GetAZsArguments => "WA2_CFN_MALFORMED_GETAZS",
			Message::ImportValueArguments => "WA2_CFN_MALFORMED_IMPORTVALUE",
			Message::JoinArguments => "WA2_CFN_MALFORMED_JOIN",
			Message::SelectArguments => "WA2_CFN_MALFORMED_SELECT",
			Message::SelectIndex => "WA2_CFN_SELECT_INDEX",
			Message::SubArguments => "WA2_CFN_MALFORMED_SUB",
			Message::TooFewConditions(IntrinsicFunction::Or) => "WA2_CFN_MALFORMED_OR",
			Message::TooFewConditions(_) => "WA2_CFN_MALFORMED_AND",
			Message::EqualsArguments => "WA2_CFN_MALFORMED_EQUALS",
			Message::IfConditionName | Message::IfArguments => "WA2_CFN_MALFORMED_IF",
			Message::NotArguments => "WA2_CFN_MALFORMED_NOT",
			Message::ExpectedString => "WA2_CFN_EXPECTED_STRING",
		}
	}

	pub fn severity(&self) -> DiagnosticSeverity {
		match self {
			Message::UnknownProperty { .. } => DiagnosticSeverity::WARNING,
			_ => DiagnosticSeverity::ERROR,
		}
	}
}

/// Singular and plural noun for what a section declares
fn section_entries(section: SectionKind) -> (&'static str, &'static str) {
	match section {
		SectionKind::Parameters => ("parameter", "parameters"),
		SectionKind::Mappings => ("mapping", "mappings"),
		SectionKind::Conditions => ("condition", "conditions"),
		SectionKind::Resources => ("resource", "resources"),
		SectionKind::Outputs => ("stack output", "stack outputs"),
		SectionKind::Metadata => ("metadata entry", "metadata entries"),
	}
}

impl fmt::Display for Message<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Message::ResourcesSectionMissing => f.write_str("Resources section is missing."),
			Message::EmptySection(section) => write!(
				f,
				"{} section must declare at least one {}",
				section.key(),
				section_entries(*section).0
			),
			Message::SectionLimitExceeded { section, limit } => write!(
				f,
				"{} section cannot declare more than {limit} {}",
				section.key(),
				section_entries(*section).1
			),
			Message::ResourceTypeMissing => f.write_str("Resource must declare a Type"),
			Message::ResourceTypeValueRequired => f.write_str("Type value is required"),
			Message::UnknownResourceType(type_name) => {
				write!(f, "Unknown resource type: {type_name}")
			}
			Message::UnknownProperty {
				resource_type,
				property,
			} => write!(f, "Unknown property for resource type {resource_type}: {property}"),
			Message::MissingRequiredProperties(names) => {
				write!(f, "Missing required properties: {}", names.join(", "))
			}
			Message::RefArguments => f.write_str("Reference expects one string argument"),
			Message::ConditionArguments => {
				f.write_str("Condition reference expects one string argument")
			}
			Message::Base64Arguments => f.write_str("Base64 reference expects 1 argument"),
			Message::FindInMapArguments => f.write_str("FindInMap requires 3 arguments"),
			Message::GetAttShortForm => f.write_str(
				"GetAttr in short form requires argument in the format logicalNameOfResource.attributeName",
			),
			Message::GetAttArguments => f.write_str(
				"GetAtt requires two string arguments in full form or one string argument in short form",
			),
			Message::UnknownAttribute {
				resource_type,
				attribute,
			} => write!(f, "Unknown attribute in resource type {resource_type}: {attribute}"),
			Message::GetAZsArguments => f.write_str("GetAZs expects one argument"),
			Message::ImportValueArguments => f.write_str("ImportValue expects one argument"),
			Message::JoinArguments => {
				f.write_str("Join expects a string argument and an array argument")
			}
			Message::SelectArguments => {
				f.write_str("Select expects an index argument and an array argument")
			}
			Message::SelectIndex => f.write_str("Select index should be a valid non-negative number"),
			Message::SubArguments => {
				f.write_str("Sub expects one argument plus an optional value map")
			}
			Message::TooFewConditions(function) => {
				write!(f, "{} expects at least 2 arguments", function.name())
			}
			Message::EqualsArguments => f.write_str("Equals expects exactly 2 arguments"),
			Message::IfConditionName => f.write_str("If's first argument should be a condition name"),
			Message::IfArguments => f.write_str("If expects exactly 3 arguments"),
			Message::NotArguments => f.write_str("Not expects exactly 1 argument"),
			Message::ExpectedString => f.write_str("Expected a string."),
		}
	}
}

/// Build a diagnostic for `message` at `range`
pub fn diagnostic(range: Range, message: &Message<'_>) -> Diagnostic {
	Diagnostic {
		range,
		severity: Some(message.severity()),
		code: Some(NumberOrString::String(message.code().into())),
		source: Some(SOURCE.into()),
		message: message.to_string(),
		..Default::default()
	}
}

/// Build a diagnostic carrying a "did you mean" payload in `data`
pub fn diagnostic_with_suggestion(
	range: Range,
	message: &Message<'_>,
	suggestion: Option<&str>,
) -> Diagnostic {
	let mut diag = diagnostic(range, message);

	// Store suggestion in data field as JSON
	if let Some(suggestion) = suggestion {
		diag.data = Some(serde_json::json!({ "suggestion": suggestion }));
	}

	diag
}
