use tower_lsp::lsp_types::Range;

use crate::spec::intrinsics::{FunctionForm, IntrinsicFunction};

/// Resource type reserved for nested stacks; its `Outputs.*` attributes are open-ended.
pub const NESTED_STACK_TYPE: &str = "AWS::CloudFormation::Stack";

/// Generic custom resource type; `Custom::*` types are custom as well.
pub const CUSTOM_RESOURCE_TYPE: &str = "AWS::CloudFormation::CustomResource";

/// Whether a resource type name is exempt from catalog shape checks
pub fn is_custom_type(type_name: &str) -> bool {
	type_name == CUSTOM_RESOURCE_TYPE || type_name.starts_with("Custom::")
}

/// Any node that may carry a logical name.
///
/// Diagnostics about the node anchor to the name when there is one,
/// and to the node itself otherwise.
pub trait NamedNode {
	fn name(&self) -> Option<&CfnScalar>;

	fn range(&self) -> Range;

	fn anchor(&self) -> Range {
		self.name().map(|name| name.range).unwrap_or_else(|| self.range())
	}
}

/// CloudFormation template intermediate representation
#[derive(Debug, Clone, PartialEq)]
pub struct CfnTemplate {
	pub range: Range,
	/// Top-level sections in document order
	pub sections: Vec<CfnSection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
	Parameters,
	Mappings,
	Conditions,
	Resources,
	Outputs,
	Metadata,
}

impl SectionKind {
	pub fn from_key(key: &str) -> Option<Self> {
		match key {
			"Parameters" => Some(SectionKind::Parameters),
			"Mappings" => Some(SectionKind::Mappings),
			"Conditions" => Some(SectionKind::Conditions),
			"Resources" => Some(SectionKind::Resources),
			"Outputs" => Some(SectionKind::Outputs),
			"Metadata" => Some(SectionKind::Metadata),
			_ => None,
		}
	}

	pub const fn key(self) -> &'static str {
		match self {
			SectionKind::Parameters => "Parameters",
			SectionKind::Mappings => "Mappings",
			SectionKind::Conditions => "Conditions",
			SectionKind::Resources => "Resources",
			SectionKind::Outputs => "Outputs",
			SectionKind::Metadata => "Metadata",
		}
	}
}

/// A top-level section of a template
#[derive(Debug, Clone, PartialEq)]
pub enum CfnSection {
	Parameters(EntrySection<CfnEntry>),
	Mappings(EntrySection<CfnEntry>),
	Conditions(EntrySection<CfnEntry>),
	Resources(EntrySection<CfnResource>),
	Outputs(EntrySection<CfnEntry>),
	Metadata(CfnProperty),
	/// AWSTemplateFormatVersion, Description, Transform and anything unrecognised
	Other(CfnProperty),
}

impl CfnSection {
	pub fn kind(&self) -> Option<SectionKind> {
		match self {
			CfnSection::Parameters(_) => Some(SectionKind::Parameters),
			CfnSection::Mappings(_) => Some(SectionKind::Mappings),
			CfnSection::Conditions(_) => Some(SectionKind::Conditions),
			CfnSection::Resources(_) => Some(SectionKind::Resources),
			CfnSection::Outputs(_) => Some(SectionKind::Outputs),
			CfnSection::Metadata(_) => Some(SectionKind::Metadata),
			CfnSection::Other(_) => None,
		}
	}

	/// Named entries of a Parameters, Mappings, Conditions or Outputs section
	pub fn entries(&self) -> &[CfnEntry] {
		match self {
			CfnSection::Parameters(section)
			| CfnSection::Mappings(section)
			| CfnSection::Conditions(section)
			| CfnSection::Outputs(section) => &section.entries,
			CfnSection::Resources(_) | CfnSection::Metadata(_) | CfnSection::Other(_) => &[],
		}
	}
}

/// A section made of named entries (`Parameters`, `Resources`, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySection<T> {
	/// The section key, e.g. `Outputs`
	pub key: CfnScalar,
	/// Key plus body
	pub range: Range,
	pub entries: Vec<T>,
}

/// A named parameter, mapping, condition or output declaration
#[derive(Debug, Clone, PartialEq)]
pub struct CfnEntry {
	/// None when the key is not a scalar
	pub name: Option<CfnScalar>,
	pub range: Range,
	pub value: CfnValue,
}

/// A resource declaration
#[derive(Debug, Clone, PartialEq)]
pub struct CfnResource {
	pub name: Option<CfnScalar>,
	pub range: Range,
	/// Resource-level keys in document order
	pub attributes: Vec<ResourceAttribute>,
}

/// A key directly under a resource's logical name
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceAttribute {
	Type(CfnProperty),
	Properties(CfnProperty),
	DependsOn(CfnProperty),
	Condition(CfnProperty),
	/// Metadata, DeletionPolicy, UpdatePolicy, ...
	Other(CfnProperty),
}

impl ResourceAttribute {
	pub fn classify(property: CfnProperty) -> Self {
		match property.key.text.as_str() {
			"Type" => ResourceAttribute::Type(property),
			"Properties" => ResourceAttribute::Properties(property),
			"DependsOn" => ResourceAttribute::DependsOn(property),
			"Condition" => ResourceAttribute::Condition(property),
			_ => ResourceAttribute::Other(property),
		}
	}

	pub fn property(&self) -> &CfnProperty {
		match self {
			ResourceAttribute::Type(p)
			| ResourceAttribute::Properties(p)
			| ResourceAttribute::DependsOn(p)
			| ResourceAttribute::Condition(p)
			| ResourceAttribute::Other(p) => p,
		}
	}
}

impl CfnResource {
	pub fn resource_type(&self) -> Option<&CfnProperty> {
		self.attributes.iter().find_map(|a| match a {
			ResourceAttribute::Type(p) => Some(p),
			_ => None,
		})
	}

	/// The declared type name, if it is a non-empty string
	pub fn type_name(&self) -> Option<&str> {
		self.resource_type()
			.and_then(|p| p.value.as_str())
			.filter(|name| !name.is_empty())
	}

	pub fn properties(&self) -> Option<&CfnProperty> {
		self.attributes.iter().find_map(|a| match a {
			ResourceAttribute::Properties(p) => Some(p),
			_ => None,
		})
	}

	pub fn depends_on(&self) -> Option<&CfnProperty> {
		self.attributes.iter().find_map(|a| match a {
			ResourceAttribute::DependsOn(p) => Some(p),
			_ => None,
		})
	}

	pub fn condition(&self) -> Option<&CfnProperty> {
		self.attributes.iter().find_map(|a| match a {
			ResourceAttribute::Condition(p) => Some(p),
			_ => None,
		})
	}
}

/// A key/value pair inside an object
#[derive(Debug, Clone, PartialEq)]
pub struct CfnProperty {
	pub key: CfnScalar,
	pub value: CfnValue,
}

impl CfnProperty {
	pub fn range(&self) -> Range {
		Range {
			start: self.key.range.start,
			end: self.value.range().end,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
	String,
	Number,
	Bool,
	Null,
}

/// A scalar with its source text
#[derive(Debug, Clone, PartialEq)]
pub struct CfnScalar {
	pub text: String,
	pub kind: ScalarKind,
	pub range: Range,
}

impl CfnScalar {
	pub fn string(text: impl Into<String>, range: Range) -> Self {
		CfnScalar {
			text: text.into(),
			kind: ScalarKind::String,
			range,
		}
	}

	pub fn null(range: Range) -> Self {
		CfnScalar {
			text: String::new(),
			kind: ScalarKind::Null,
			range,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct CfnArray {
	pub items: Vec<CfnValue>,
	pub range: Range,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CfnObject {
	/// Entries in document order
	pub properties: Vec<CfnProperty>,
	pub range: Range,
}

impl CfnObject {
	pub fn get(&self, key: &str) -> Option<&CfnProperty> {
		self.properties.iter().find(|p| p.key.text == key)
	}
}

/// An intrinsic function call with its arguments normalised into a list
#[derive(Debug, Clone, PartialEq)]
pub struct CfnFunction {
	pub function: IntrinsicFunction,
	pub form: FunctionForm,
	/// The `Fn::*` key or the YAML tag
	pub name_range: Range,
	pub args: Vec<CfnValue>,
	pub range: Range,
}

/// A value in a CloudFormation template with position tracking
#[derive(Debug, Clone, PartialEq)]
pub enum CfnValue {
	Scalar(CfnScalar),
	Array(CfnArray),
	Object(CfnObject),
	Function(CfnFunction),
}

impl CfnValue {
	/// Get the position range of this value
	pub fn range(&self) -> Range {
		match self {
			CfnValue::Scalar(s) => s.range,
			CfnValue::Array(a) => a.range,
			CfnValue::Object(o) => o.range,
			CfnValue::Function(f) => f.range,
		}
	}

	/// A non-null scalar, the only kind that can carry a name
	pub fn as_scalar(&self) -> Option<&CfnScalar> {
		match self {
			CfnValue::Scalar(s) if s.kind != ScalarKind::Null => Some(s),
			_ => None,
		}
	}

	/// Try to get this value as a string
	pub fn as_str(&self) -> Option<&str> {
		match self {
			CfnValue::Scalar(s) if s.kind == ScalarKind::String => Some(s.text.as_str()),
			_ => None,
		}
	}

	/// Try to get this value as an object/mapping
	pub fn as_object(&self) -> Option<&CfnObject> {
		match self {
			CfnValue::Object(o) => Some(o),
			_ => None,
		}
	}

	/// Try to get this value as an array
	pub fn as_array(&self) -> Option<&CfnArray> {
		match self {
			CfnValue::Array(a) => Some(a),
			_ => None,
		}
	}

	pub fn as_function(&self) -> Option<&CfnFunction> {
		match self {
			CfnValue::Function(f) => Some(f),
			_ => None,
		}
	}
}

impl CfnTemplate {
	/// All sections of one kind; a repeated key yields more than one
	pub fn sections_of(&self, kind: SectionKind) -> impl Iterator<Item = &CfnSection> {
		self.sections
			.iter()
			.filter(move |section| section.kind() == Some(kind))
	}

	pub fn has_section(&self, kind: SectionKind) -> bool {
		self.sections_of(kind).next().is_some()
	}

	pub fn resources(&self) -> impl Iterator<Item = &CfnResource> {
		self.sections.iter().flat_map(|section| match section {
			CfnSection::Resources(s) => s.entries.as_slice(),
			_ => &[],
		})
	}

	/// Entries of a Parameters, Mappings, Conditions or Outputs section
	pub fn entries(&self, kind: SectionKind) -> impl Iterator<Item = &CfnEntry> {
		self.sections_of(kind).flat_map(|section| section.entries())
	}
}

impl NamedNode for CfnEntry {
	fn name(&self) -> Option<&CfnScalar> {
		self.name.as_ref()
	}

	fn range(&self) -> Range {
		self.range
	}
}

impl NamedNode for CfnResource {
	fn name(&self) -> Option<&CfnScalar> {
		self.name.as_ref()
	}

	fn range(&self) -> Range {
		self.range
	}
}

impl<T> NamedNode for EntrySection<T> {
	fn name(&self) -> Option<&CfnScalar> {
		Some(&self.key)
	}

	fn range(&self) -> Range {
		self.range
	}
}

impl NamedNode for CfnProperty {
	fn name(&self) -> Option<&CfnScalar> {
		Some(&self.key)
	}

	fn range(&self) -> Range {
		CfnProperty::range(self)
	}
}
