//! Depth-first, pre-order traversal over the template node tree.
//!
//! A [`Visitor`] gets one call per node and decides for itself whether to
//! descend, usually through [`walk_children`]. Returning without calling it
//! prunes the subtree.

use tower_lsp::lsp_types::Range;

use crate::spec::cfn_ir::types::{
	CfnArray, CfnEntry, CfnFunction, CfnObject, CfnProperty, CfnResource, CfnScalar, CfnSection,
	CfnTemplate, CfnValue, EntrySection, ResourceAttribute,
};

/// A borrowed view of one node, tagged by kind
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
	Template(&'a CfnTemplate),
	Parameters(&'a EntrySection<CfnEntry>),
	Mappings(&'a EntrySection<CfnEntry>),
	Conditions(&'a EntrySection<CfnEntry>),
	Resources(&'a EntrySection<CfnResource>),
	Outputs(&'a EntrySection<CfnEntry>),
	Metadata(&'a CfnProperty),
	OtherSection(&'a CfnProperty),
	/// A parameter, mapping, condition or output declaration
	Entry(&'a CfnEntry),
	Resource(&'a CfnResource),
	ResourceType(&'a CfnProperty),
	Properties(&'a CfnProperty),
	DependsOn(&'a CfnProperty),
	ResourceCondition(&'a CfnProperty),
	/// Any other resource-level key (Metadata, DeletionPolicy, ...)
	ResourceAttribute(&'a CfnProperty),
	Function(&'a CfnFunction),
	Scalar(&'a CfnScalar),
	Array(&'a CfnArray),
	Object(&'a CfnObject),
}

impl<'a> From<&'a CfnValue> for Node<'a> {
	fn from(value: &'a CfnValue) -> Self {
		match value {
			CfnValue::Scalar(s) => Node::Scalar(s),
			CfnValue::Array(a) => Node::Array(a),
			CfnValue::Object(o) => Node::Object(o),
			CfnValue::Function(f) => Node::Function(f),
		}
	}
}

impl<'a> From<&'a CfnSection> for Node<'a> {
	fn from(section: &'a CfnSection) -> Self {
		match section {
			CfnSection::Parameters(s) => Node::Parameters(s),
			CfnSection::Mappings(s) => Node::Mappings(s),
			CfnSection::Conditions(s) => Node::Conditions(s),
			CfnSection::Resources(s) => Node::Resources(s),
			CfnSection::Outputs(s) => Node::Outputs(s),
			CfnSection::Metadata(p) => Node::Metadata(p),
			CfnSection::Other(p) => Node::OtherSection(p),
		}
	}
}

impl<'a> From<&'a ResourceAttribute> for Node<'a> {
	fn from(attribute: &'a ResourceAttribute) -> Self {
		match attribute {
			ResourceAttribute::Type(p) => Node::ResourceType(p),
			ResourceAttribute::Properties(p) => Node::Properties(p),
			ResourceAttribute::DependsOn(p) => Node::DependsOn(p),
			ResourceAttribute::Condition(p) => Node::ResourceCondition(p),
			ResourceAttribute::Other(p) => Node::ResourceAttribute(p),
		}
	}
}

impl<'a> Node<'a> {
	pub fn range(&self) -> Range {
		match self {
			Node::Template(t) => t.range,
			Node::Parameters(s) | Node::Mappings(s) | Node::Conditions(s) | Node::Outputs(s) => {
				s.range
			}
			Node::Resources(s) => s.range,
			Node::Metadata(p)
			| Node::OtherSection(p)
			| Node::ResourceType(p)
			| Node::Properties(p)
			| Node::DependsOn(p)
			| Node::ResourceCondition(p)
			| Node::ResourceAttribute(p) => p.range(),
			Node::Entry(e) => e.range,
			Node::Resource(r) => r.range,
			Node::Function(f) => f.range,
			Node::Scalar(s) => s.range,
			Node::Array(a) => a.range,
			Node::Object(o) => o.range,
		}
	}

	/// Direct children in document order. Object keys are not children.
	pub fn children(&self) -> Vec<Node<'a>> {
		match *self {
			Node::Template(t) => t.sections.iter().map(Node::from).collect(),
			Node::Parameters(s) | Node::Mappings(s) | Node::Conditions(s) | Node::Outputs(s) => {
				s.entries.iter().map(Node::Entry).collect()
			}
			Node::Resources(s) => s.entries.iter().map(Node::Resource).collect(),
			Node::Resource(r) => r.attributes.iter().map(Node::from).collect(),
			Node::Metadata(p)
			| Node::OtherSection(p)
			| Node::ResourceType(p)
			| Node::Properties(p)
			| Node::DependsOn(p)
			| Node::ResourceCondition(p)
			| Node::ResourceAttribute(p) => vec![Node::from(&p.value)],
			Node::Entry(e) => vec![Node::from(&e.value)],
			Node::Function(f) => f.args.iter().map(Node::from).collect(),
			Node::Scalar(_) => Vec::new(),
			Node::Array(a) => a.items.iter().map(Node::from).collect(),
			Node::Object(o) => o.properties.iter().map(|p| Node::from(&p.value)).collect(),
		}
	}
}

/// One hook for every node kind; dispatch happens by matching on [`Node`]
pub trait Visitor<'a> {
	/// Per-subtree state handed down by value
	type Context: Copy;

	fn visit(&mut self, node: Node<'a>, context: Self::Context);
}

/// Visit every child of `node` with the same context
pub fn walk_children<'a, V>(visitor: &mut V, node: Node<'a>, context: V::Context)
where
	V: Visitor<'a> + ?Sized,
{
	for child in node.children() {
		visitor.visit(child, context);
	}
}
