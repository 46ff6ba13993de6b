//! The filter evaluator seam.
//!
//! Glob matching is owned by an evaluator behind this trait: the backend's
//! `preview-filter` endpoint in normal operation, or the in-process glob
//! matcher when running offline. Callers on the context and preview paths go
//! through [`evaluate_or_empty`], which degrades every failure to an empty
//! verdict map ("nothing included").

use log::warn;
use thiserror::Error;

use crate::types::VerdictMap;

#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("evaluator unreachable: {0}")]
    Transport(String),

    #[error("evaluator returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("evaluator response could not be decoded: {0}")]
    Decode(String),
}

/// Produces a verdict for each path given include and exclude globs.
pub trait FilterEvaluator: Send + Sync {
    fn evaluate(&self, paths: &[String], include: &[String], exclude: &[String]) -> Result<VerdictMap, EvaluatorError>;
}

/// Evaluate, logging and swallowing any error. No retry.
pub fn evaluate_or_empty(
    evaluator: &dyn FilterEvaluator,
    paths: &[String],
    include: &[String],
    exclude: &[String],
) -> VerdictMap {
    match evaluator.evaluate(paths, include, exclude) {
        Ok(verdicts) => verdicts,
        Err(e) => {
            warn!("filter evaluation failed for {} paths, treating all as excluded: {}", paths.len(), e);
            VerdictMap::new()
        }
    }
}
