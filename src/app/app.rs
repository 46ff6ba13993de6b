use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use crossterm::event;
use log::{debug, info, warn};
use ratatui::prelude::*;

use clarion_base::config::constants::TREE_RELOAD_DEBOUNCE_MS;
use clarion_mod_tree::TreeViewState;

use crate::app::events::handle_event;
use crate::app::input::GlobInput;
use crate::context::{Debouncer, RecomputeRequest, RecomputeUpdate, process_recompute_request};
use crate::infra::constants::{EVENT_POLL_MS, IDLE_POLL_MS, RENDER_THROTTLE_MS};
use crate::infra::watcher::{ProjectWatcher, WatchEvent};
use crate::services::Services;
use crate::state::Workspace;
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tree,
    Preview,
    Editor,
}

pub struct App {
    pub workspace: Workspace,
    pub(crate) services: Services,
    pub tree_view: TreeViewState,
    pub preview_scroll: usize,
    pub focus: Focus,
    pub input: GlobInput,
    /// One-line message shown in the status bar
    pub status: Option<String>,
    pub tree_loading: bool,
    watcher: Option<ProjectWatcher>,
    tree_reload: Debouncer<()>,
    tx: Sender<RecomputeUpdate>,
    rx: Receiver<RecomputeUpdate>,
    pub(crate) dirty: bool,
    last_render: Instant,
}

impl App {
    pub fn new(workspace: Workspace, services: Services) -> Self {
        let (tx, rx) = mpsc::channel();
        let input = GlobInput::from_patterns(&workspace.editor.draft);
        Self {
            workspace,
            services,
            tree_view: TreeViewState::new(),
            preview_scroll: 0,
            focus: Focus::Tree,
            input,
            status: None,
            tree_loading: false,
            watcher: None,
            tree_reload: Debouncer::new(Duration::from_millis(TREE_RELOAD_DEBOUNCE_MS)),
            tx,
            rx,
            dirty: true,
            last_render: Instant::now(),
        }
    }

    fn dispatch(&self, request: RecomputeRequest) {
        process_recompute_request(request, self.services.clone(), self.tx.clone());
    }

    pub(crate) fn dispatch_context_refresh(&mut self) {
        if let Some(request) = self.workspace.refresh_context() {
            self.dispatch(request);
        }
    }

    pub(crate) fn request_agents_reload(&self) {
        self.dispatch(RecomputeRequest::LoadAgents);
    }

    pub(crate) fn request_tree_reload(&mut self) {
        if self.tree_loading {
            return;
        }
        self.tree_loading = true;
        self.dispatch(RecomputeRequest::LoadTree { root: self.workspace.root.clone() });
    }

    fn start_watcher(&mut self) {
        match ProjectWatcher::new(&self.workspace.root) {
            Ok(watcher) => self.watcher = Some(watcher),
            Err(e) => warn!("not watching {}: {}", self.workspace.root.display(), e),
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
        self.start_watcher();
        self.request_tree_reload();
        self.dispatch_context_refresh();

        loop {
            // === INPUT FIRST ===
            if event::poll(Duration::ZERO)? {
                let evt = event::read()?;
                let Some(action) = handle_event(&evt, self) else {
                    info!("quit");
                    break;
                };
                self.handle_action(action);
                if self.dirty {
                    self.draw(terminal)?;
                }
            }

            // === BACKGROUND ===
            self.process_updates();
            self.process_watcher_events();
            self.process_preview();

            if self.dirty && self.last_render.elapsed() >= Duration::from_millis(RENDER_THROTTLE_MS) {
                self.draw(terminal)?;
            }

            let busy = self.dirty || self.tree_loading || self.workspace.context_loading || self.workspace.editor.is_stale();
            let poll_ms = if busy { EVENT_POLL_MS } else { IDLE_POLL_MS };
            let _ = event::poll(Duration::from_millis(poll_ms))?;
        }
        Ok(())
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
        terminal.draw(|frame| ui::render(frame, self))?;
        self.dirty = false;
        self.last_render = Instant::now();
        Ok(())
    }

    fn process_updates(&mut self) {
        while let Ok(update) = self.rx.try_recv() {
            match update {
                RecomputeUpdate::Tree { root, result } => {
                    self.tree_loading = false;
                    match result {
                        Ok(nodes) => {
                            debug!("tree loaded for {}", root.display());
                            if self.workspace.set_file_tree(nodes) {
                                let rows = self.tree_row_count();
                                self.tree_view.clamp(rows);
                                self.dispatch_context_refresh();
                            }
                        }
                        // Keep showing the previous tree
                        Err(e) => {
                            warn!("tree load failed: {}", e);
                            self.status = Some(format!("Tree load failed: {}", e));
                        }
                    }
                    self.dirty = true;
                }
                RecomputeUpdate::Agents(agents) => {
                    let draft = self.workspace.editor.draft.clone();
                    self.workspace.set_agents(agents);
                    if self.workspace.editor.draft != draft {
                        self.input = GlobInput::from_patterns(&self.workspace.editor.draft);
                    }
                    self.dispatch_context_refresh();
                    self.dirty = true;
                }
                other => {
                    if self.workspace.apply_update(other) {
                        self.dirty = true;
                    }
                }
            }
        }
    }

    /// Coalesce watcher bursts into one reload after a quiet period.
    fn process_watcher_events(&mut self) {
        let now = Instant::now();
        if let Some(watcher) = &self.watcher {
            for WatchEvent::TreeChanged(path) in watcher.poll_events() {
                debug!("tree change: {}", path.display());
                self.tree_reload.push((), now);
            }
        }
        if self.tree_reload.poll(now).is_some() {
            if self.tree_loading {
                // Retry once the running load reports back
                self.tree_reload.push((), now);
            } else {
                self.request_tree_reload();
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn wait_for_update(&self, timeout: Duration) -> Option<RecomputeUpdate> {
        self.rx.recv_timeout(timeout).ok()
    }

    fn process_preview(&mut self) {
        if self.workspace.tree.is_empty() && self.tree_loading {
            return;
        }
        if let Some(request) = self.workspace.poll_preview(Instant::now()) {
            self.dispatch(request);
            self.dirty = true;
        }
    }
}
