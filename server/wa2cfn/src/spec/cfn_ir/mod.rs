pub mod json;
pub mod parser;
pub mod types;
pub mod yaml;


use url::Url;

use parser::LoadError;
use types::CfnTemplate;

impl CfnTemplate {
	/// Load a template, choosing the format from the document's extension.
	/// `*.json` is JSON, everything else (`*.yaml`, `*.yml`, untitled) is YAML.
	pub fn from_document(text: &str, uri: &Url) -> Result<Self, LoadError> {
		if uri.path().ends_with(".json") {
			Self::from_json(text)
		} else {
			Self::from_yaml(text)
		}
	}
}
