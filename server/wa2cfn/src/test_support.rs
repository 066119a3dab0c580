//! Shared helpers for unit tests

use std::sync::{Arc, OnceLock};

use tower_lsp::lsp_types::Url;

use crate::analysis::{self, AnalysisResult};
use crate::spec::cfn_ir::types::CfnTemplate;
use crate::spec::spec_store::SpecStore;

static SAMPLE_SPEC: OnceLock<Arc<SpecStore>> = OnceLock::new();

/// Small offline catalog shared by every test. Cached after first call.
/// Panics if the fixture can't be parsed.
pub fn sample_spec() -> Arc<SpecStore> {
	SAMPLE_SPEC
		.get_or_init(|| {
			let bytes = include_bytes!("../tests/fixtures/catalog.json");
			Arc::new(SpecStore::from_json_bytes(bytes).expect("fixture catalog"))
		})
		.clone()
}

pub fn uri(path: &str) -> Url {
	Url::parse(path).expect("valid test uri")
}

pub fn analyze_yaml(text: &str) -> AnalysisResult {
	let template = CfnTemplate::from_yaml(text).expect("template loads");
	analysis::analyze(&template, &sample_spec())
}

pub fn analyze_json(text: &str) -> AnalysisResult {
	let template = CfnTemplate::from_json(text).expect("template loads");
	analysis::analyze(&template, &sample_spec())
}

/// Diagnostic messages in emission order
pub fn messages(result: &AnalysisResult) -> Vec<&str> {
	result
		.diagnostics
		.iter()
		.map(|diag| diag.message.as_str())
		.collect()
}
