//! Semantic validation for CloudFormation templates.
//!
//! A loaded [`CfnTemplate`](spec::cfn_ir::types::CfnTemplate) is walked once
//! against a [`SpecStore`](spec::spec_store::SpecStore) catalog, producing
//! diagnostics plus a map from source locations to the entity names used
//! there. [`CoreEngine`] memoizes that result per document revision.

pub mod analysis;
pub mod core_engine;
pub mod spec;

#[cfg(test)]
mod test_support;

pub use analysis::{AnalysisResult, analyze};
pub use core_engine::CoreEngine;
