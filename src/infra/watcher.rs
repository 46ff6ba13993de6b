//! Project watcher: reports file creations, removals and renames under the root.

use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

use log::warn;
use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use clarion_base::config::constants::DEFAULT_IGNORE_DIRS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A path was added, removed or renamed; the tree shape may have changed
    TreeChanged(PathBuf),
}

pub struct ProjectWatcher {
    _watcher: RecommendedWatcher,
    event_rx: Receiver<WatchEvent>,
}

impl ProjectWatcher {
    pub fn new(root: &Path) -> notify::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let base = root.to_path_buf();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) if changes_tree(&event) => {
                    for path in event.paths {
                        let relative = path.strip_prefix(&base).unwrap_or(&path);
                        if !is_ignored_path(relative) {
                            let _ = tx.send(WatchEvent::TreeChanged(path.clone()));
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => warn!("watch error: {}", e),
            },
            Config::default(),
        )?;
        watcher.watch(root, RecursiveMode::Recursive)?;

        Ok(Self { _watcher: watcher, event_rx: rx })
    }

    /// Drain pending events (non-blocking)
    pub fn poll_events(&self) -> Vec<WatchEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Content edits do not change the tree; creations, removals and renames do.
pub fn changes_tree(event: &Event) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(_)))
}

/// Any component of the root-relative `path` is an ignore dir.
pub fn is_ignored_path(path: &Path) -> bool {
    path.components().any(|c| match c {
        Component::Normal(name) => name.to_str().is_some_and(|n| DEFAULT_IGNORE_DIRS.contains(&n)),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, RemoveKind, RenameMode};

    #[test]
    fn only_structural_events_count() {
        assert!(changes_tree(&Event::new(EventKind::Create(CreateKind::File))));
        assert!(changes_tree(&Event::new(EventKind::Remove(RemoveKind::Folder))));
        assert!(changes_tree(&Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))));
        assert!(!changes_tree(&Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))));
    }

    #[test]
    fn ignore_dirs_match_any_component() {
        assert!(is_ignored_path(Path::new("node_modules/react/index.js")));
        assert!(is_ignored_path(Path::new("web/.git/HEAD")));
        assert!(!is_ignored_path(Path::new("src/build_info.rs")));
        assert!(!is_ignored_path(Path::new("src/main.rs")));
    }
}
