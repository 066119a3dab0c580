use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tower_lsp::lsp_types::Url;
use tracing::debug;

use crate::analysis::{self, AnalysisResult};
use crate::spec::cfn_ir::types::CfnTemplate;
use crate::spec::spec_store::SpecStore;

/// per-document state held by the core engine
struct DocumentState {
	/// revision stamp supplied by the host (LSP document version)
	version: i32,
	result: Arc<AnalysisResult>,
}

/// core engine: memoizes one analysis per document revision.
/// kept synchronous and independent of any transport so hosts and
/// tests can drive it directly; safe to share across threads
pub struct CoreEngine {
	docs: Mutex<HashMap<Url, DocumentState>>,
	spec: Arc<SpecStore>,
}

impl CoreEngine {
	pub fn new(spec: Arc<SpecStore>) -> Self {
		Self {
			docs: Mutex::new(HashMap::new()),
			spec,
		}
	}

	/// Swap in a newer catalog. Every cached result was computed against
	/// the old one, so the cache is dropped.
	pub fn set_spec_store(&mut self, spec: Arc<SpecStore>) {
		self.spec = spec;
		self.docs
			.get_mut()
			.unwrap_or_else(PoisonError::into_inner)
			.clear();
	}

	/// Analyse an already-loaded template at `version`.
	///
	/// Returns the cached result when this document was already analyzed at
	/// the same version.
	pub fn analyse(&self, uri: &Url, version: i32, template: &CfnTemplate) -> Arc<AnalysisResult> {
		if let Some(result) = self.lookup(uri, version) {
			return result;
		}

		// computed without holding the lock; racing callers at the same
		// version produce equal results
		let result = analysis::analyze(template, &self.spec);
		self.store(uri, version, result)
	}

	/// Load and analyse document text. A document that can't be loaded
	/// yields its load error as the only diagnostic.
	pub fn analyse_document(&self, uri: &Url, version: i32, text: &str) -> Arc<AnalysisResult> {
		if let Some(result) = self.lookup(uri, version) {
			return result;
		}

		let result = match CfnTemplate::from_document(text, uri) {
			Ok(template) => analysis::analyze(&template, &self.spec),
			Err(err) => {
				debug!(%uri, error = %err, "template failed to load");
				AnalysisResult {
					diagnostics: vec![err.to_diagnostic(uri)],
					..Default::default()
				}
			}
		};
		self.store(uri, version, result)
	}

	/// event: document closed; its cached result is dropped
	pub fn on_close(&self, uri: &Url) {
		if self.lock().remove(uri).is_some() {
			debug!(%uri, "dropped cached analysis");
		}
	}

	/// revision stamp of the cached result, if any
	pub fn cached_version(&self, uri: &Url) -> Option<i32> {
		self.lock().get(uri).map(|state| state.version)
	}

	fn lock(&self) -> MutexGuard<'_, HashMap<Url, DocumentState>> {
		// the map is never left half-updated, so a poisoned lock is still usable
		self.docs.lock().unwrap_or_else(PoisonError::into_inner)
	}

	fn lookup(&self, uri: &Url, version: i32) -> Option<Arc<AnalysisResult>> {
		let docs = self.lock();
		let state = docs.get(uri).filter(|state| state.version == version);

		match state {
			Some(state) => {
				debug!(%uri, version, "analysis cache hit");
				Some(Arc::clone(&state.result))
			}
			None => {
				debug!(%uri, version, "analysis cache miss");
				None
			}
		}
	}

	/// Store a fresh result unless something at least as new is cached.
	/// An equal version already stored wins, so every caller sees one object.
	fn store(&self, uri: &Url, version: i32, result: AnalysisResult) -> Arc<AnalysisResult> {
		let mut docs = self.lock();

		match docs.get(uri) {
			Some(state) if state.version == version => Arc::clone(&state.result),
			Some(state) if state.version > version => {
				debug!(%uri, version, cached = state.version, "stale analysis not cached");
				Arc::new(result)
			}
			_ => {
				let result = Arc::new(result);
				debug!(%uri, version, diagnostics = result.diagnostics.len(), "analysis cached");
				docs.insert(
					uri.clone(),
					DocumentState {
						version,
						result: Arc::clone(&result),
					},
				);
				result
			}
		}
	}
}
