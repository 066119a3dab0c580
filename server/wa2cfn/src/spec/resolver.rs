//! Name resolution over a template's declared entities

use crate::spec::cfn_ir::types::{CfnEntry, CfnResource, CfnScalar, CfnTemplate, SectionKind};

/// A section that declares named entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntitySection {
	Parameters,
	Resources,
	Conditions,
	Mappings,
}

impl EntitySection {
	pub const fn section_kind(self) -> SectionKind {
		match self {
			EntitySection::Parameters => SectionKind::Parameters,
			EntitySection::Resources => SectionKind::Resources,
			EntitySection::Conditions => SectionKind::Conditions,
			EntitySection::Mappings => SectionKind::Mappings,
		}
	}
}

/// The sections a name may legally be declared in, searched in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityScope(&'static [EntitySection]);

impl EntityScope {
	/// Targets of `Ref`
	pub const PARAMETERS_AND_RESOURCES: EntityScope =
		EntityScope(&[EntitySection::Parameters, EntitySection::Resources]);
	pub const RESOURCES: EntityScope = EntityScope(&[EntitySection::Resources]);
	pub const CONDITIONS: EntityScope = EntityScope(&[EntitySection::Conditions]);
	pub const MAPPINGS: EntityScope = EntityScope(&[EntitySection::Mappings]);
	pub const PARAMETERS: EntityScope = EntityScope(&[EntitySection::Parameters]);

	pub const fn sections(self) -> &'static [EntitySection] {
		self.0
	}

	pub fn contains(self, section: EntitySection) -> bool {
		self.0.contains(&section)
	}
}

/// The node that declares a resolved name
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Declaration<'a> {
	Parameter(&'a CfnEntry),
	Resource(&'a CfnResource),
	Condition(&'a CfnEntry),
	Mapping(&'a CfnEntry),
}

impl<'a> Declaration<'a> {
	pub fn section(&self) -> EntitySection {
		match self {
			Declaration::Parameter(_) => EntitySection::Parameters,
			Declaration::Resource(_) => EntitySection::Resources,
			Declaration::Condition(_) => EntitySection::Conditions,
			Declaration::Mapping(_) => EntitySection::Mappings,
		}
	}

	pub fn name(&self) -> Option<&'a CfnScalar> {
		match self {
			Declaration::Parameter(entry)
			| Declaration::Condition(entry)
			| Declaration::Mapping(entry) => entry.name.as_ref(),
			Declaration::Resource(resource) => resource.name.as_ref(),
		}
	}
}

/// Resolve `name` within `scope`: the first exact, case-sensitive match
/// across the scope's sections in order.
pub fn resolve<'a>(template: &'a CfnTemplate, scope: EntityScope, name: &str) -> Option<Declaration<'a>> {
	scope
		.sections()
		.iter()
		.find_map(|section| resolve_in(template, *section, name))
}

fn resolve_in<'a>(
	template: &'a CfnTemplate,
	section: EntitySection,
	name: &str,
) -> Option<Declaration<'a>> {
	match section {
		EntitySection::Resources => resolve_resource(template, name).map(Declaration::Resource),
		EntitySection::Parameters => {
			find_entry(template, section.section_kind(), name).map(Declaration::Parameter)
		}
		EntitySection::Conditions => {
			find_entry(template, section.section_kind(), name).map(Declaration::Condition)
		}
		EntitySection::Mappings => resolve_mapping(template, name).map(Declaration::Mapping),
	}
}

fn has_name(name: Option<&CfnScalar>, wanted: &str) -> bool {
	name.is_some_and(|scalar| scalar.text == wanted)
}

fn find_entry<'a>(template: &'a CfnTemplate, kind: SectionKind, name: &str) -> Option<&'a CfnEntry> {
	template
		.entries(kind)
		.find(|entry| has_name(entry.name.as_ref(), name))
}

pub fn resolve_resource<'a>(template: &'a CfnTemplate, name: &str) -> Option<&'a CfnResource> {
	template
		.resources()
		.find(|resource| has_name(resource.name.as_ref(), name))
}

pub fn resolve_mapping<'a>(template: &'a CfnTemplate, name: &str) -> Option<&'a CfnEntry> {
	find_entry(template, SectionKind::Mappings, name)
}
