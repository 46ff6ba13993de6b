pub mod agent;
pub mod filters;
pub mod tree;
pub mod verdict;

pub use agent::{AgentPersona, LlmConfig};
pub use filters::{CodebaseFilters, GlobPatterns};
pub use tree::{ContextSet, FileTreeNode, NodeKind, flatten_file_paths};
pub use verdict::{Verdict, VerdictMap};

use serde::{Deserialize, Deserializer};

/// Deserialize `null` as the type's default.
/// The backend encodes empty Go slices and maps as `null`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
