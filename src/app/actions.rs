use std::sync::Arc;
use std::time::Instant;

use log::{info, warn};

use clarion_base::config::presets;
use clarion_mod_tree::visible_rows;

use crate::app::input::GlobInput;
use crate::app::{App, Focus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Redraw,
    FocusNext,
    CursorUp,
    CursorDown,
    /// Space on a tree row: add or remove its files from the manual context
    ToggleContext,
    RemoveFromContext,
    ToggleFolder,
    NextAgent,
    /// Merge the exclude preset at this index into the draft
    ApplyPreset(usize),
    EditGlobs,
    SaveAgent,
    Reload,
    InputChar(char),
    InputPaste(String),
    InputBackspace,
    InputSwitchField,
}

impl App {
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::None => return,
            Action::Redraw => {}
            Action::FocusNext => {
                self.focus = match self.focus {
                    Focus::Tree => Focus::Preview,
                    Focus::Preview => Focus::Editor,
                    Focus::Editor => Focus::Tree,
                };
            }
            Action::CursorUp => match self.focus {
                Focus::Tree => self.tree_view.move_up(),
                Focus::Preview => self.preview_scroll = self.preview_scroll.saturating_sub(1),
                Focus::Editor => {}
            },
            Action::CursorDown => match self.focus {
                Focus::Tree => {
                    let rows = self.tree_row_count();
                    self.tree_view.move_down(rows);
                }
                Focus::Preview => self.preview_scroll += 1,
                Focus::Editor => {}
            },
            Action::ToggleContext => self.toggle_context_at_cursor(),
            Action::RemoveFromContext => self.remove_context_at_cursor(),
            Action::ToggleFolder => {
                if let Some(path) = self.folder_at_cursor() {
                    self.tree_view.toggle_folder(&path);
                }
            }
            Action::NextAgent => {
                self.workspace.next_agent();
                self.input = GlobInput::from_patterns(&self.workspace.editor.draft);
                self.preview_scroll = 0;
                self.dispatch_context_refresh();
                if let Some(agent) = self.workspace.active_agent() {
                    self.status = Some(format!("Agent: {}", agent.name));
                }
            }
            Action::ApplyPreset(index) => self.apply_preset(index),
            Action::EditGlobs => self.focus = Focus::Editor,
            Action::SaveAgent => self.save_active_agent(),
            Action::Reload => {
                self.request_tree_reload();
                self.request_agents_reload();
                self.status = Some("Reloading".to_string());
            }
            Action::InputChar(c) => {
                self.input.push(c);
                self.sync_editor();
            }
            Action::InputPaste(text) => {
                self.input.push_str(&text);
                self.sync_editor();
            }
            Action::InputBackspace => {
                self.input.backspace();
                self.sync_editor();
            }
            Action::InputSwitchField => self.input.switch_field(),
        }
        self.dirty = true;
    }

    fn sync_editor(&mut self) {
        self.workspace.editor.edit(self.input.to_patterns(), Instant::now());
    }

    pub(crate) fn tree_row_count(&self) -> usize {
        visible_rows(&self.workspace.tree, &|p| self.tree_view.is_open(p)).len()
    }

    fn folder_at_cursor(&self) -> Option<String> {
        let rows = visible_rows(&self.workspace.tree, &|p| self.tree_view.is_open(p));
        rows.get(self.tree_view.cursor).filter(|r| r.node.is_folder()).map(|r| r.node.path.clone())
    }

    fn toggle_context_at_cursor(&mut self) {
        if self.focus != Focus::Tree {
            return;
        }
        if self.workspace.has_filters() {
            self.status = Some("Context is set by the agent's filters".to_string());
            return;
        }
        let tree = Arc::clone(&self.workspace.tree);
        let node = {
            let rows = visible_rows(&tree, &|p| self.tree_view.is_open(p));
            rows.get(self.tree_view.cursor).map(|r| r.node.clone())
        };
        if let Some(node) = node
            && self.workspace.toggle_manual(&node)
        {
            self.dispatch_context_refresh();
        }
    }

    fn remove_context_at_cursor(&mut self) {
        if self.focus != Focus::Tree {
            return;
        }
        let path = {
            let rows = visible_rows(&self.workspace.tree, &|p| self.tree_view.is_open(p));
            rows.get(self.tree_view.cursor).filter(|r| !r.node.is_folder()).map(|r| r.node.path.clone())
        };
        if let Some(path) = path
            && self.workspace.remove_manual(&path)
        {
            self.dispatch_context_refresh();
        }
    }

    fn apply_preset(&mut self, index: usize) {
        let Some(preset) = presets::all().get(index) else {
            return;
        };
        let added = self.input.merge_exclude(&preset.globs);
        if added > 0 {
            self.sync_editor();
        }
        self.status = Some(format!("{} preset: {} excludes added", preset.name, added));
    }

    /// Store the edited globs on the active agent, persist it and recompute context.
    fn save_active_agent(&mut self) {
        let Some(agent) = self.workspace.commit_draft() else {
            self.status = Some("No active agent".to_string());
            return;
        };
        match self.services.agents.save(&agent) {
            Ok(()) => {
                info!("saved filters for agent '{}'", agent.id);
                self.status = Some(format!("Saved {}", agent.name));
            }
            Err(e) => {
                warn!("saving agent '{}' failed: {}", agent.id, e);
                self.status = Some(format!("Save failed: {}", e));
            }
        }
        self.dispatch_context_refresh();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::app::testing;
    use crate::context::RecomputeRequest;

    fn paths(app: &App) -> Vec<&str> {
        app.workspace.context_set.iter().map(String::as_str).collect()
    }

    #[test]
    fn space_under_filtering_agent_only_reports() {
        let mut app = testing::app();
        app.workspace.select_agent(1);
        app.handle_action(Action::ToggleContext);
        assert_eq!(app.status.as_deref(), Some("Context is set by the agent's filters"));
        assert!(app.workspace.manual_selection.is_empty());
    }

    #[test]
    fn space_on_folder_selects_its_files() {
        let mut app = testing::app();
        app.handle_action(Action::ToggleContext);
        assert_eq!(paths(&app), vec!["src/a.rs", "src/b.md"]);
        app.handle_action(Action::ToggleContext);
        assert!(app.workspace.context_set.is_empty());
    }

    #[test]
    fn remove_acts_only_with_tree_focus() {
        let mut app = testing::app();
        app.handle_action(Action::ToggleContext);
        app.handle_action(Action::ToggleFolder);
        app.handle_action(Action::CursorDown);
        assert_eq!(app.tree_view.cursor, 1);

        app.focus = Focus::Preview;
        app.handle_action(Action::RemoveFromContext);
        assert_eq!(paths(&app), vec!["src/a.rs", "src/b.md"]);

        app.focus = Focus::Tree;
        app.handle_action(Action::RemoveFromContext);
        assert_eq!(paths(&app), vec!["src/b.md"]);
    }

    #[test]
    fn save_stores_draft_and_refreshes_context() {
        let mut app = testing::app();
        app.handle_action(Action::EditGlobs);
        app.handle_action(Action::InputSwitchField);
        for c in "**/*.md".chars() {
            app.handle_action(Action::InputChar(c));
        }
        app.handle_action(Action::SaveAgent);

        let agent = app.workspace.active_agent().unwrap();
        assert_eq!(agent.codebase_filters.exclude_globs, vec!["**/*.md"]);
        assert_eq!(app.status.as_deref(), Some("Saved plain"));
        assert!(app.workspace.context_loading);

        let update = app.wait_for_update(Duration::from_secs(5)).expect("context result");
        assert!(app.workspace.apply_update(update));
        assert_eq!(paths(&app), vec!["src/a.rs"]);
    }

    #[test]
    fn preset_merges_into_draft_and_drives_preview() {
        let mut app = testing::app();
        app.handle_action(Action::ApplyPreset(2));
        assert_eq!(app.input.exclude, "vendor/**, bin/**");
        assert_eq!(app.workspace.editor.draft.exclude, vec!["vendor/**", "bin/**"]);
        assert_eq!(app.status.as_deref(), Some("Go preset: 2 excludes added"));

        let Some(RecomputeRequest::Preview { patterns, .. }) = app.workspace.poll_preview(Instant::now()) else {
            panic!("expected a preview request");
        };
        assert_eq!(patterns.exclude, vec!["vendor/**", "bin/**"]);

        app.handle_action(Action::ApplyPreset(2));
        assert_eq!(app.status.as_deref(), Some("Go preset: 0 excludes added"));
        app.handle_action(Action::ApplyPreset(8));
        assert_eq!(app.workspace.editor.draft.exclude, vec!["vendor/**", "bin/**"]);
    }
}
