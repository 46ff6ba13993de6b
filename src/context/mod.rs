//! Context set resolution, filter preview and their recompute plumbing.

pub mod debounce;
pub mod generation;
pub mod preview;
pub mod recompute;
pub mod resolver;

pub use debounce::Debouncer;
pub use generation::Generations;
pub use preview::{PreviewNode, PreviewStatus, PreviewTree, build_preview, preview_for, prune};
pub use recompute::{RecomputeRequest, RecomputeUpdate, process_recompute_request};
pub use resolver::{has_filters, resolve_context_set, resolve_filtered};
