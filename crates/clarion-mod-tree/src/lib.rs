//! Project file tree: loading, manual context selection and tree layout.

mod loader;
pub mod render;
mod selection;
pub mod types;

pub use loader::{TreeError, build_file_tree, load_project_paths, load_project_tree};
pub use render::{TreeItem, TreeRow, display_order, render_ascii, visible_rows};
pub use selection::{SelectionStatus, retain_existing, selection_status, toggle_selection};
pub use types::TreeViewState;
