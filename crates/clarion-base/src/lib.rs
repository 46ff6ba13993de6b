pub mod cache;
pub mod config;
pub mod evaluator;
pub mod types;

pub use evaluator::{EvaluatorError, FilterEvaluator, evaluate_or_empty};
pub use types::{
    AgentPersona, CodebaseFilters, ContextSet, FileTreeNode, GlobPatterns, LlmConfig, NodeKind, Verdict, VerdictMap,
    flatten_file_paths,
};
