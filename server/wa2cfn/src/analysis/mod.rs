//! Semantic analysis of a loaded template

pub mod analyzer;
pub mod messages;
pub mod references;
pub mod walk;

#[cfg(test)]
mod tests;

use tower_lsp::lsp_types::Diagnostic;
use tracing::debug;

use crate::spec::cfn_ir::types::CfnTemplate;
use crate::spec::spec_store::SpecStore;

use analyzer::Analyzer;
use references::ReferenceMap;

/// Everything one pass over a template produces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisResult {
	/// In traversal (document) order
	pub diagnostics: Vec<Diagnostic>,
	pub references: ReferenceMap,
}

/// Validate `template` against the catalog and collect its entity references.
///
/// Pure: the same template and catalog always give an equal result.
pub fn analyze(template: &CfnTemplate, spec: &SpecStore) -> AnalysisResult {
	debug!(sections = template.sections.len(), "analyzing template");

	let result = Analyzer::new(spec, template).run();

	debug!(
		diagnostics = result.diagnostics.len(),
		references = result.references.len(),
		"analysis complete"
	);
	result
}
