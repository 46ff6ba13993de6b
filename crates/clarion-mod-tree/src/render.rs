//! Folders-first ordering and `├──`/`└──` layout shared by every tree view.

use std::cmp::Ordering;

use clarion_base::FileTreeNode;

/// Anything shaped like a file tree node.
pub trait TreeItem: Sized {
    fn name(&self) -> &str;
    fn path(&self) -> &str;
    fn is_folder(&self) -> bool;
    fn children(&self) -> &[Self];
}

impl TreeItem for FileTreeNode {
    fn name(&self) -> &str {
        &self.name
    }
    fn path(&self) -> &str {
        &self.path
    }
    fn is_folder(&self) -> bool {
        FileTreeNode::is_folder(self)
    }
    fn children(&self) -> &[Self] {
        &self.children
    }
}

/// Dictionary-style name order: case-folded first, then lowercase before
/// uppercase so names differing only in case still sort deterministically.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| b.cmp(a))
}

/// Folders before files, then by name.
pub fn display_order<T: TreeItem>(nodes: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = nodes.iter().collect();
    sorted.sort_by(|a, b| b.is_folder().cmp(&a.is_folder()).then_with(|| compare_names(a.name(), b.name())));
    sorted
}

/// One visible line of a tree view.
pub struct TreeRow<'a, T> {
    pub node: &'a T,
    pub depth: usize,
    /// `│   ` / `    ` columns inherited from ancestors
    pub prefix: String,
    pub connector: &'static str,
    pub is_open: bool,
}

/// Flatten the visible part of a forest. Children of a folder are listed
/// only when `is_open(folder_path)` holds.
pub fn visible_rows<'a, T: TreeItem>(nodes: &'a [T], is_open: &dyn Fn(&str) -> bool) -> Vec<TreeRow<'a, T>> {
    let mut rows = Vec::new();
    push_rows(nodes, "", 0, is_open, &mut rows);
    rows
}

fn push_rows<'a, T: TreeItem>(
    nodes: &'a [T],
    prefix: &str,
    depth: usize,
    is_open: &dyn Fn(&str) -> bool,
    rows: &mut Vec<TreeRow<'a, T>>,
) {
    let ordered = display_order(nodes);
    let total = ordered.len();
    for (i, node) in ordered.into_iter().enumerate() {
        let is_last = i == total - 1;
        let connector = if is_last { "└── " } else { "├── " };
        let child_prefix = if is_last { "    " } else { "│   " };
        let open = node.is_folder() && is_open(node.path());

        rows.push(TreeRow { node, depth, prefix: prefix.to_string(), connector, is_open: open });
        if open {
            push_rows(node.children(), &format!("{}{}", prefix, child_prefix), depth + 1, is_open, rows);
        }
    }
}

/// Fully expanded plain-text rendering, one node per line.
pub fn render_ascii<T: TreeItem>(nodes: &[T], label: impl Fn(&T) -> String) -> String {
    let mut output = String::new();
    for row in visible_rows(nodes, &|_| true) {
        output.push_str(&format!("{}{}{}\n", row.prefix, row.connector, label(row.node)));
    }
    output
}
