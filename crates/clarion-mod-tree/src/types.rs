use std::collections::BTreeSet;

/// Expansion and cursor state of an interactive tree view
#[derive(Debug, Default, Clone)]
pub struct TreeViewState {
    pub open_folders: BTreeSet<String>,
    pub cursor: usize,
}

impl TreeViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, path: &str) -> bool {
        self.open_folders.contains(path)
    }

    /// Open or close `path`. Closing also closes every folder below it.
    /// Returns true when the folder ends up open.
    pub fn toggle_folder(&mut self, path: &str) -> bool {
        if self.open_folders.remove(path) {
            let prefix = format!("{}/", path);
            self.open_folders.retain(|p| !p.starts_with(&prefix));
            false
        } else {
            self.open_folders.insert(path.to_string());
            true
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self, row_count: usize) {
        if self.cursor + 1 < row_count {
            self.cursor += 1;
        }
    }

    /// Keep the cursor on a row after the tree shrinks
    pub fn clamp(&mut self, row_count: usize) {
        self.cursor = self.cursor.min(row_count.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closing_a_folder_closes_descendants_only() {
        let mut state = TreeViewState::new();
        for p in ["src", "src/ui", "src/ui/widgets", "srcgen"] {
            state.toggle_folder(p);
        }
        assert!(!state.toggle_folder("src"));
        assert_eq!(state.open_folders.iter().collect::<Vec<_>>(), vec!["srcgen"]);
    }

    #[test]
    fn cursor_stays_in_range() {
        let mut state = TreeViewState::new();
        state.move_up();
        assert_eq!(state.cursor, 0);
        state.move_down(2);
        state.move_down(2);
        assert_eq!(state.cursor, 1);
        state.clamp(0);
        assert_eq!(state.cursor, 0);
    }
}
