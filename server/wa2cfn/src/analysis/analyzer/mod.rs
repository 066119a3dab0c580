//! The validating traversal: one pass over the tree that accumulates
//! diagnostics and entity references.

mod functions;

use tower_lsp::lsp_types::{Diagnostic, Range};
use tracing::trace;

use crate::analysis::AnalysisResult;
use crate::analysis::messages::{self, Message};
use crate::analysis::references::{EntityReference, ReferenceMap};
use crate::analysis::walk::{Node, Visitor, walk_children};
use crate::spec::cfn_ir::types::{
	CfnEntry, CfnProperty, CfnResource, CfnScalar, CfnTemplate, CfnValue, EntrySection,
	NamedNode, SectionKind, is_custom_type,
};
use crate::spec::code_utils::names;
use crate::spec::resolver::EntityScope;
use crate::spec::spec_store::{ResourceTypeDescriptor, SpecStore};

/// Metadata key holding the console's parameter grouping hints
const INTERFACE_METADATA_KEY: &str = "AWS::CloudFormation::Interface";

/// Property keys that only carry commentary
fn is_comment_marker(key: &str) -> bool {
	key == "Comment" || key.starts_with("//")
}

/// The resource whose subtree is being walked, if any
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceScope<'a> {
	pub resource: Option<&'a CfnResource>,
}

impl<'a> ResourceScope<'a> {
	pub fn name(&self) -> Option<&'a str> {
		self.resource
			.and_then(|resource| resource.name.as_ref())
			.map(|name| name.text.as_str())
	}
}

pub struct Analyzer<'a> {
	spec: &'a SpecStore,
	template: &'a CfnTemplate,
	diagnostics: Vec<Diagnostic>,
	references: ReferenceMap,
}

impl<'a> Analyzer<'a> {
	pub fn new(spec: &'a SpecStore, template: &'a CfnTemplate) -> Self {
		Self {
			spec,
			template,
			diagnostics: Vec::new(),
			references: ReferenceMap::default(),
		}
	}

	/// Walk the whole template once
	pub fn run(mut self) -> AnalysisResult {
		let template = self.template;
		self.visit(Node::Template(template), ResourceScope::default());

		AnalysisResult {
			diagnostics: self.diagnostics,
			references: self.references,
		}
	}

	fn report(&mut self, range: Range, message: &Message<'_>) {
		self.diagnostics.push(messages::diagnostic(range, message));
	}

	fn report_with_suggestion(&mut self, range: Range, message: &Message<'_>, suggestion: Option<&str>) {
		self.diagnostics
			.push(messages::diagnostic_with_suggestion(range, message, suggestion));
	}

	fn reference(&mut self, reference: EntityReference) {
		trace!(name = %reference.name, target = ?reference.target, "reference");
		self.references.insert(reference);
	}

	/// Non-empty, and within `limit` (a zero limit forbids the section)
	fn check_section_size(&mut self, section: &EntrySection<CfnEntry>, kind: SectionKind, limit: usize) {
		let count = section.entries.len();

		if count == 0 {
			self.report(section.anchor(), &Message::EmptySection(kind));
		}

		if count > limit || limit == 0 {
			self.report(
				section.anchor(),
				&Message::SectionLimitExceeded {
					section: kind,
					limit,
				},
			);
		}
	}

	fn visit_resource(&mut self, resource: &'a CfnResource) {
		if resource.resource_type().is_none() {
			self.report(resource.anchor(), &Message::ResourceTypeMissing);
			return;
		}

		let spec = self.spec;
		if let Some(type_name) = resource.type_name()
			&& let Some(descriptor) = spec.find_resource_type(type_name)
		{
			self.check_properties(resource, type_name, descriptor);
		}

		walk_children(
			self,
			Node::Resource(resource),
			ResourceScope {
				resource: Some(resource),
			},
		);
	}

	fn check_properties(
		&mut self,
		resource: &'a CfnResource,
		type_name: &'a str,
		descriptor: &'a ResourceTypeDescriptor,
	) {
		let block = resource.properties();

		let (declared, anchor) = match block.map(|p| (p, &p.value)) {
			Some((property, CfnValue::Object(object))) => (Some(object), property.key.range),
			// Computed (e.g. Fn::If); nothing to compare against
			Some((_, CfnValue::Function(_))) => return,
			_ => (None, resource.anchor()),
		};

		if let Some(object) = declared
			&& !is_custom_type(type_name)
		{
			for property in &object.properties {
				let key = property.key.text.as_str();
				if is_comment_marker(key) || descriptor.find_property(key).is_some() {
					continue;
				}

				let suggestion = names::suggest(key, descriptor.property_names());
				self.report_with_suggestion(
					property.key.range,
					&Message::UnknownProperty {
						resource_type: type_name,
						property: key,
					},
					suggestion,
				);
			}
		}

		let missing: Vec<&str> = descriptor
			.required_properties()
			.filter(|name| declared.is_none_or(|object| object.get(name).is_none()))
			.collect();

		if !missing.is_empty() {
			self.report(anchor, &Message::MissingRequiredProperties(missing));
		}
	}

	/// `Type` must be a non-empty string naming a catalog or custom type
	fn check_resource_type(&mut self, property: &'a CfnProperty) {
		let Some(type_name) = property.value.as_str().filter(|name| !name.is_empty()) else {
			self.report(property.key.range, &Message::ResourceTypeValueRequired);
			return;
		};

		let spec = self.spec;
		if is_custom_type(type_name) || spec.find_resource_type(type_name).is_some() {
			return;
		}

		let suggestion = names::suggest(type_name, spec.resource_type_names());
		self.report_with_suggestion(
			property.value.range(),
			&Message::UnknownResourceType(type_name),
			suggestion,
		);
	}

	/// Each dependency names a resource other than its owner and its siblings
	fn record_dependencies(&mut self, property: &'a CfnProperty, scope: ResourceScope<'a>) {
		let dependencies: Vec<&CfnScalar> = match &property.value {
			CfnValue::Array(array) => array.items.iter().filter_map(CfnValue::as_scalar).collect(),
			value => value.as_scalar().into_iter().collect(),
		};

		for (index, dependency) in dependencies.iter().enumerate() {
			let siblings = dependencies
				.iter()
				.enumerate()
				.filter(|(other, _)| *other != index)
				.map(|(_, sibling)| sibling.text.as_str());

			let reference =
				EntityReference::entity(dependency.range, &dependency.text, EntityScope::RESOURCES)
					.excluding(scope.name())
					.excluding(siblings);
			self.reference(reference);
		}
	}

	fn record_condition(&mut self, property: &'a CfnProperty) {
		if let Some(condition) = property.value.as_scalar() {
			self.reference(EntityReference::entity(
				condition.range,
				&condition.text,
				EntityScope::CONDITIONS,
			));
		}
	}

	/// Parameter names used by `AWS::CloudFormation::Interface` grouping hints
	fn check_interface_metadata(&mut self, metadata: &'a CfnProperty) {
		let Some(interface) = metadata
			.value
			.as_object()
			.and_then(|object| object.get(INTERFACE_METADATA_KEY))
			.and_then(|property| property.value.as_object())
		else {
			return;
		};

		if let Some(groups) = interface
			.get("ParameterGroups")
			.and_then(|property| property.value.as_array())
		{
			for group in &groups.items {
				let Some(parameters) = group
					.as_object()
					.and_then(|object| object.get("Parameters"))
					.and_then(|property| property.value.as_array())
				else {
					continue;
				};

				for parameter in &parameters.items {
					match parameter.as_scalar() {
						Some(name) => self.record_parameter(name),
						None => self.report(parameter.range(), &Message::ExpectedString),
					}
				}
			}
		}

		if let Some(labels) = interface
			.get("ParameterLabels")
			.and_then(|property| property.value.as_object())
		{
			for label in &labels.properties {
				self.record_parameter(&label.key);
			}
		}
	}

	fn record_parameter(&mut self, name: &CfnScalar) {
		if self.spec.is_pseudo_parameter(&name.text) {
			return;
		}
		self.reference(EntityReference::entity(
			name.range,
			&name.text,
			EntityScope::PARAMETERS,
		));
	}
}

impl<'a> Visitor<'a> for Analyzer<'a> {
	type Context = ResourceScope<'a>;

	fn visit(&mut self, node: Node<'a>, scope: ResourceScope<'a>) {
		match node {
			Node::Template(template) => {
				if !template.has_section(SectionKind::Resources) {
					self.report(template.range, &Message::ResourcesSectionMissing);
				}
			}
			Node::Resources(section) => {
				if section.entries.is_empty() {
					self.report(section.anchor(), &Message::EmptySection(SectionKind::Resources));
					return;
				}
			}
			Node::Parameters(section) => {
				let limit = self.spec.limits.max_parameters;
				self.check_section_size(section, SectionKind::Parameters, limit);
			}
			Node::Mappings(section) => {
				let limit = self.spec.limits.max_mappings;
				self.check_section_size(section, SectionKind::Mappings, limit);
			}
			Node::Outputs(section) => {
				let limit = self.spec.limits.max_outputs;
				self.check_section_size(section, SectionKind::Outputs, limit);
			}
			Node::Metadata(metadata) => self.check_interface_metadata(metadata),
			Node::Resource(resource) => {
				// Descends with itself as the scope, or not at all
				self.visit_resource(resource);
				return;
			}
			Node::ResourceType(property) => {
				self.check_resource_type(property);
				return;
			}
			Node::DependsOn(property) => self.record_dependencies(property, scope),
			Node::ResourceCondition(property) => self.record_condition(property),
			Node::Function(function) => self.check_function(function),
			Node::Conditions(_)
			| Node::OtherSection(_)
			| Node::Entry(_)
			| Node::Properties(_)
			| Node::ResourceAttribute(_)
			| Node::Scalar(_)
			| Node::Array(_)
			| Node::Object(_) => {}
		}

		walk_children(self, node, scope);
	}
}
