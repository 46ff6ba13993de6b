use std::collections::HashSet;

use clarion_base::{ContextSet, FileTreeNode, flatten_file_paths};

/// Checkbox state of a tree node against a context set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStatus {
    Checked,
    Unchecked,
    Indeterminate,
}

impl SelectionStatus {
    pub fn marker(self) -> &'static str {
        match self {
            SelectionStatus::Checked => "[x]",
            SelectionStatus::Unchecked => "[ ]",
            SelectionStatus::Indeterminate => "[-]",
        }
    }
}

pub fn selection_status(node: &FileTreeNode, selected: &ContextSet) -> SelectionStatus {
    let files = node.file_paths();
    let hits = files.iter().filter(|p| selected.contains(*p)).count();
    if hits == 0 {
        SelectionStatus::Unchecked
    } else if hits == files.len() {
        SelectionStatus::Checked
    } else {
        SelectionStatus::Indeterminate
    }
}

/// All selected under `node`: deselect them all. Otherwise select them all.
/// Returns whether the set changed.
pub fn toggle_selection(node: &FileTreeNode, selected: &mut ContextSet) -> bool {
    let files = node.file_paths();
    if files.is_empty() {
        return false;
    }
    if files.iter().all(|p| selected.contains(p)) {
        for path in &files {
            selected.remove(path);
        }
    } else {
        selected.extend(files);
    }
    true
}

/// Drop selected paths that are no longer files of `tree`. Returns how many went.
pub fn retain_existing(selected: &mut ContextSet, tree: &[FileTreeNode]) -> usize {
    let existing: HashSet<String> = flatten_file_paths(tree).into_iter().collect();
    let before = selected.len();
    selected.retain(|p| existing.contains(p));
    before - selected.len()
}
