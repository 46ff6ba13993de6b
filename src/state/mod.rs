//! Application context: everything the UI and handlers read and mutate.
//!
//! One `Workspace` is built in `main`, owned by the `App` and passed by
//! reference; there is no global store.

mod editor;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use log::{debug, info};

use clarion_base::cache::tree_fingerprint;
use clarion_base::{AgentPersona, ContextSet, FileTreeNode, GlobPatterns};
use clarion_mod_tree::{retain_existing, toggle_selection};

use crate::context::{Generations, RecomputeRequest, RecomputeUpdate};

pub use editor::PreviewEditor;

pub struct Workspace {
    pub root: PathBuf,
    pub tree: Arc<Vec<FileTreeNode>>,
    pub fingerprint: String,
    pub agents: Vec<AgentPersona>,
    pub active_agent: Option<usize>,
    pub manual_selection: ContextSet,
    /// Authoritative context: manual selection, or the active agent's filter result
    pub context_set: ContextSet,
    pub context_loading: bool,
    context_generations: Generations,
    pub editor: PreviewEditor,
    pub last_refresh: Option<DateTime<Local>>,
}

impl Workspace {
    pub fn new(root: PathBuf, agents: Vec<AgentPersona>, default_agent_id: &str, debounce: Duration) -> Self {
        let active_agent = agents.iter().position(|a| a.id == default_agent_id).or(if agents.is_empty() { None } else { Some(0) });
        let mut ws = Self {
            root,
            tree: Arc::new(Vec::new()),
            fingerprint: tree_fingerprint(&[]),
            agents,
            active_agent,
            manual_selection: ContextSet::new(),
            context_set: ContextSet::new(),
            context_loading: false,
            context_generations: Generations::new(),
            editor: PreviewEditor::new(debounce),
            last_refresh: None,
        };
        ws.editor.reset(ws.saved_patterns());
        ws
    }

    pub fn active_agent(&self) -> Option<&AgentPersona> {
        self.active_agent.and_then(|i| self.agents.get(i))
    }

    pub fn has_filters(&self) -> bool {
        crate::context::has_filters(self.active_agent())
    }

    /// Patterns stored on the active agent
    pub fn saved_patterns(&self) -> GlobPatterns {
        self.active_agent().map(|a| a.codebase_filters.patterns()).unwrap_or_default()
    }

    /// Replace the tree wholesale. Returns false when the file set is unchanged.
    pub fn set_file_tree(&mut self, nodes: Vec<FileTreeNode>) -> bool {
        let fingerprint = tree_fingerprint(&nodes);
        if fingerprint == self.fingerprint && !self.tree.is_empty() {
            debug!("tree reload produced the same file set");
            return false;
        }
        self.fingerprint = fingerprint;
        let dropped = retain_existing(&mut self.manual_selection, &nodes);
        if dropped > 0 {
            debug!("dropped {} deleted files from the manual selection", dropped);
        }
        self.tree = Arc::new(nodes);
        self.editor.invalidate();
        true
    }

    pub fn select_agent(&mut self, index: usize) {
        if index >= self.agents.len() {
            return;
        }
        self.active_agent = Some(index);
        self.editor.reset(self.saved_patterns());
    }

    /// Cycle to the next agent, wrapping around.
    pub fn next_agent(&mut self) {
        if self.agents.is_empty() {
            return;
        }
        let next = self.active_agent.map_or(0, |i| (i + 1) % self.agents.len());
        self.select_agent(next);
    }

    /// Replace the persona list (after a reload), keeping the active agent by id.
    /// The editor keeps its draft unless the active agent's saved globs changed.
    pub fn set_agents(&mut self, agents: Vec<AgentPersona>) {
        let active_id = self.active_agent().map(|a| a.id.clone());
        let saved = self.saved_patterns();
        self.agents = agents;
        self.active_agent = active_id
            .and_then(|id| self.agents.iter().position(|a| a.id == id))
            .or(if self.agents.is_empty() { None } else { Some(0) });
        info!("{} agents loaded", self.agents.len());
        if self.saved_patterns() != saved {
            self.editor.reset(self.saved_patterns());
        }
    }

    /// Store the editor's draft on the active agent. Returns the updated agent.
    pub fn commit_draft(&mut self) -> Option<AgentPersona> {
        let draft = self.editor.draft.clone();
        let agent = self.agents.get_mut(self.active_agent?)?;
        agent.codebase_filters.set_patterns(&draft);
        Some(agent.clone())
    }

    /// Toggle manual context for `node`. Ignored while filters are authoritative.
    pub fn toggle_manual(&mut self, node: &FileTreeNode) -> bool {
        if self.has_filters() {
            return false;
        }
        toggle_selection(node, &mut self.manual_selection)
    }

    pub fn remove_manual(&mut self, path: &str) -> bool {
        !self.has_filters() && self.manual_selection.remove(path)
    }

    /// Recompute the authoritative set. Without filters this happens in place;
    /// with filters a background request is returned. Either way every
    /// earlier in-flight result is superseded.
    pub fn refresh_context(&mut self) -> Option<RecomputeRequest> {
        let generation = self.context_generations.advance();
        if !self.has_filters() {
            self.context_set = self.manual_selection.clone();
            self.context_loading = false;
            self.last_refresh = Some(Local::now());
            return None;
        }
        self.context_loading = true;
        Some(RecomputeRequest::Context { generation, patterns: self.saved_patterns(), tree: Arc::clone(&self.tree) })
    }

    /// Preview request due now, if any.
    pub fn poll_preview(&mut self, now: std::time::Instant) -> Option<RecomputeRequest> {
        let (generation, patterns) = self.editor.poll(now)?;
        Some(RecomputeRequest::Preview { generation, patterns, tree: Arc::clone(&self.tree) })
    }

    /// Apply a background result. Returns true when the state changed.
    /// Tree updates are not handled here; see `set_file_tree`.
    pub fn apply_update(&mut self, update: RecomputeUpdate) -> bool {
        match update {
            RecomputeUpdate::Context { generation, set } => {
                if !self.context_generations.is_current(generation) {
                    debug!("dropping superseded context result {}", generation);
                    return false;
                }
                self.context_set = set;
                self.context_loading = false;
                self.last_refresh = Some(Local::now());
                true
            }
            RecomputeUpdate::Preview { generation, patterns, preview } => self.editor.apply(generation, patterns, preview),
            RecomputeUpdate::Tree { .. } | RecomputeUpdate::Agents(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::context::{PreviewTree, resolve_filtered};
    use clarion_mod_glob::LocalGlobEvaluator;

    fn agent(id: &str, exclude: &[&str]) -> AgentPersona {
        let mut a: AgentPersona = serde_json::from_value(serde_json::json!({ "id": id, "name": id })).unwrap();
        a.codebase_filters.exclude_globs = exclude.iter().map(|s| s.to_string()).collect();
        a
    }

    fn tree() -> Vec<FileTreeNode> {
        vec![FileTreeNode::folder("src", vec![FileTreeNode::file("src/a.rs"), FileTreeNode::file("src/b.md")])]
    }

    fn workspace() -> Workspace {
        let agents = vec![agent("plain", &[]), agent("no-md", &["**/*.md"])];
        let mut ws = Workspace::new(PathBuf::from("/p"), agents, "plain", Duration::ZERO);
        ws.set_file_tree(tree());
        ws
    }

    /// Run a context request synchronously the way the background thread would.
    fn run(request: RecomputeRequest) -> RecomputeUpdate {
        match request {
            RecomputeRequest::Context { generation, patterns, tree } => {
                RecomputeUpdate::Context { generation, set: resolve_filtered(&patterns, &tree, &LocalGlobEvaluator) }
            }
            _ => panic!("expected a context request"),
        }
    }

    #[test]
    fn manual_mode_applies_in_place() {
        let mut ws = workspace();
        assert!(ws.toggle_manual(&tree()[0]));
        assert!(ws.refresh_context().is_none());
        assert_eq!(ws.context_set.len(), 2);
        assert!(ws.remove_manual("src/b.md"));
        ws.refresh_context();
        assert_eq!(ws.context_set.iter().collect::<Vec<_>>(), vec!["src/a.rs"]);
    }

    #[test]
    fn filters_make_selection_read_only_and_drive_context() {
        let mut ws = workspace();
        ws.select_agent(1);
        assert!(ws.has_filters());
        assert!(!ws.toggle_manual(&tree()[0]));
        let update = run(ws.refresh_context().unwrap());
        assert!(ws.context_loading);
        assert!(ws.apply_update(update));
        assert_eq!(ws.context_set.iter().collect::<Vec<_>>(), vec!["src/a.rs"]);
        assert!(!ws.context_loading);
    }

    #[test]
    fn late_filtered_result_cannot_overwrite_newer_manual_context() {
        let mut ws = workspace();
        ws.select_agent(1);
        let stale = run(ws.refresh_context().unwrap());
        ws.select_agent(0);
        assert!(ws.refresh_context().is_none());
        assert!(!ws.apply_update(stale));
        assert!(ws.context_set.is_empty());
    }

    #[test]
    fn new_tree_prunes_manual_selection() {
        let mut ws = workspace();
        ws.toggle_manual(&tree()[0]);
        assert!(ws.set_file_tree(vec![FileTreeNode::folder("src", vec![FileTreeNode::file("src/a.rs")])]));
        ws.refresh_context();
        assert_eq!(ws.context_set.iter().collect::<Vec<_>>(), vec!["src/a.rs"]);
    }

    #[test]
    fn unchanged_tree_is_not_replaced() {
        let mut ws = workspace();
        assert!(!ws.set_file_tree(tree()));
        assert!(ws.set_file_tree(vec![FileTreeNode::file("x.rs")]));
    }

    #[test]
    fn agent_switch_resets_editor_and_commit_stores_draft() {
        let mut ws = workspace();
        ws.next_agent();
        assert_eq!(ws.active_agent().unwrap().id, "no-md");
        assert_eq!(ws.editor.draft.exclude, vec!["**/*.md"]);

        let now = Instant::now();
        ws.editor.edit(GlobPatterns::new(vec!["src/**".into()], vec![]), now);
        let saved = ws.commit_draft().unwrap();
        assert_eq!(saved.codebase_filters.include_globs, vec!["src/**"]);
        assert!(saved.codebase_filters.exclude_globs.is_empty());
        ws.next_agent();
        assert_eq!(ws.active_agent().unwrap().id, "plain");
    }

    #[test]
    fn preview_requests_follow_editor() {
        let mut ws = workspace();
        let now = Instant::now();
        let Some(RecomputeRequest::Preview { generation, patterns, .. }) = ws.poll_preview(now) else {
            panic!("expected an initial preview request");
        };
        assert!(ws.apply_update(RecomputeUpdate::Preview { generation, patterns, preview: PreviewTree::default() }));
        assert!(ws.poll_preview(now).is_none());
        assert!(!ws.editor.is_stale());
    }

    #[test]
    fn set_agents_keeps_active_by_id() {
        let mut ws = workspace();
        ws.select_agent(1);
        ws.set_agents(vec![agent("other", &[]), agent("no-md", &["*.md"])]);
        assert_eq!(ws.active_agent, Some(1));
        assert_eq!(ws.editor.draft.exclude, vec!["*.md"]);
    }
}
