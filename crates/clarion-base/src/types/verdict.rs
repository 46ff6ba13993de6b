use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-path outcome of evaluating a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Included,
    Excluded,
}

/// Transient `path -> verdict` result of one evaluator call. Never persisted.
pub type VerdictMap = HashMap<String, Verdict>;
