// server/wa2cfn/src/spec/spec_store.rs

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use serde::Deserialize;
use serde::de::IgnoredAny;
use thiserror::Error;

/// Section size limit used when the catalog doesn't say otherwise
pub const DEFAULT_SECTION_LIMIT: usize = 200;

/// Names usable with `Ref` without being declared
pub const DEFAULT_PSEUDO_PARAMETERS: [&str; 8] = [
	"AWS::AccountId",
	"AWS::NotificationARNs",
	"AWS::NoValue",
	"AWS::Partition",
	"AWS::Region",
	"AWS::StackId",
	"AWS::StackName",
	"AWS::URLSuffix",
];

/// Public, read-only store for the parsed CloudFormation
/// Resource Specification, plus the template limits and
/// pseudo-parameters the analyzer checks against.
#[derive(Debug)]
pub struct SpecStore {
	pub resource_types: BTreeMap<ResourceTypeId, ResourceTypeDescriptor>,
	pub limits: TemplateLimits,
	pub pseudo_parameters: BTreeSet<String>,
}

/// Maximum number of entries per template section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateLimits {
	pub max_parameters: usize,
	pub max_mappings: usize,
	pub max_outputs: usize,
}

impl Default for TemplateLimits {
	fn default() -> Self {
		TemplateLimits {
			max_parameters: DEFAULT_SECTION_LIMIT,
			max_mappings: DEFAULT_SECTION_LIMIT,
			max_outputs: DEFAULT_SECTION_LIMIT,
		}
	}
}

impl Default for SpecStore {
	/// A catalog that knows no resource types
	fn default() -> Self {
		SpecStore {
			resource_types: BTreeMap::new(),
			limits: TemplateLimits::default(),
			pseudo_parameters: default_pseudo_parameters(),
		}
	}
}

fn default_pseudo_parameters() -> BTreeSet<String> {
	DEFAULT_PSEUDO_PARAMETERS
		.iter()
		.map(|name| name.to_string())
		.collect()
}

impl SpecStore {
	/// Build a SpecStore from the raw JSON bytes of a
	/// CloudFormation Resource Specification.
	pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, SpecStoreError> {
		let raw: RawSpec = serde_json::from_slice(bytes)?;

		let mut resource_types = BTreeMap::new();
		for (name, raw_rt) in raw.resource_types.unwrap_or_default() {
			let type_id = ResourceTypeId(name);

			// Properties
			let properties = raw_rt
				.properties
				.unwrap_or_default()
				.into_iter()
				.map(|(prop_name, raw_prop)| {
					let shape = PropertyShape {
						name: PropertyName(prop_name.clone()),
						required: raw_prop.required.unwrap_or(false),
					};
					(PropertyName(prop_name), shape)
				})
				.collect();

			// Attributes
			let attributes = raw_rt
				.attributes
				.unwrap_or_default()
				.into_iter()
				.map(|(attr_name, _)| {
					let shape = AttributeShape {
						name: AttributeName(attr_name.clone()),
					};
					(AttributeName(attr_name), shape)
				})
				.collect();

			let descriptor = ResourceTypeDescriptor {
				type_id,
				properties,
				attributes,
			};

			resource_types.insert(descriptor.type_id.clone(), descriptor);
		}

		let raw_limits = raw.limits.unwrap_or_default();
		let limits = TemplateLimits {
			max_parameters: raw_limits.max_parameters.unwrap_or(DEFAULT_SECTION_LIMIT),
			max_mappings: raw_limits.max_mappings.unwrap_or(DEFAULT_SECTION_LIMIT),
			max_outputs: raw_limits.max_outputs.unwrap_or(DEFAULT_SECTION_LIMIT),
		};

		let pseudo_parameters = match raw.pseudo_parameters {
			Some(names) => names.into_iter().collect(),
			None => default_pseudo_parameters(),
		};

		Ok(SpecStore {
			resource_types,
			limits,
			pseudo_parameters,
		})
	}

	/// Read and parse a catalog file
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SpecStoreError> {
		let bytes = std::fs::read(path)?;
		Self::from_json_bytes(&bytes)
	}

	pub fn find_resource_type(&self, type_name: &str) -> Option<&ResourceTypeDescriptor> {
		self.resource_types.get(type_name)
	}

	pub fn is_pseudo_parameter(&self, name: &str) -> bool {
		self.pseudo_parameters.contains(name)
	}

	pub fn resource_type_names(&self) -> impl Iterator<Item = &str> {
		self.resource_types.keys().map(|id| id.0.as_str())
	}
}

/// Errors that can occur while building a SpecStore.
#[derive(Debug, Error)]
pub enum SpecStoreError {
	#[error("failed to parse CloudFormation spec JSON: {0}")]
	Json(#[from] serde_json::Error),

	#[error("failed to read CloudFormation spec: {0}")]
	Io(#[from] std::io::Error),
}

/// Strongly-typed IDs / names
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceTypeId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyName(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeName(pub String);

impl Borrow<str> for ResourceTypeId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl Borrow<str> for PropertyName {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl Borrow<str> for AttributeName {
	fn borrow(&self) -> &str {
		&self.0
	}
}

/// Descriptor for a top-level CloudFormation Resource Type
/// (e.g. AWS::S3::Bucket).
#[derive(Debug)]
pub struct ResourceTypeDescriptor {
	pub type_id: ResourceTypeId,
	pub properties: BTreeMap<PropertyName, PropertyShape>,
	pub attributes: BTreeMap<AttributeName, AttributeShape>,
}

impl ResourceTypeDescriptor {
	/// Names of required properties, in lexicographic order
	pub fn required_properties(&self) -> impl Iterator<Item = &str> {
		self.properties
			.values()
			.filter(|shape| shape.required)
			.map(|shape| shape.name.0.as_str())
	}

	pub fn find_property(&self, name: &str) -> Option<&PropertyShape> {
		self.properties.get(name)
	}

	pub fn find_attribute(&self, name: &str) -> Option<&AttributeShape> {
		self.attributes.get(name)
	}

	pub fn property_names(&self) -> impl Iterator<Item = &str> {
		self.properties.keys().map(|name| name.0.as_str())
	}

	pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
		self.attributes.keys().map(|name| name.0.as_str())
	}
}

/// Shape of a single property.
#[derive(Debug, Clone)]
pub struct PropertyShape {
	pub name: PropertyName,
	pub required: bool,
}

/// Shape of a single attribute on a resource.
#[derive(Debug, Clone)]
pub struct AttributeShape {
	pub name: AttributeName,
}

//
// Raw serde layer matching the AWS CloudFormation spec JSON
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawSpec {
	resource_types: Option<HashMap<String, RawResourceType>>,
	limits: Option<RawLimits>,
	pseudo_parameters: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawLimits {
	max_parameters: Option<usize>,
	max_mappings: Option<usize>,
	max_outputs: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawResourceType {
	properties: Option<HashMap<String, RawProperty>>,
	// Only attribute names are used
	attributes: Option<HashMap<String, IgnoredAny>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawProperty {
	required: Option<bool>,
}
