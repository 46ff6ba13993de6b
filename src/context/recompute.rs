//! Background recomputation. Each job runs on its own thread and reports back
//! through a channel, tagged with the generation it was dispatched under.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use log::debug;

use clarion_base::{AgentPersona, ContextSet, FileTreeNode, GlobPatterns};

use super::preview::{PreviewTree, preview_for};
use super::resolver::resolve_filtered;
use crate::services::Services;

pub enum RecomputeRequest {
    /// Filtered context set for the active agent's saved patterns
    Context { generation: u64, patterns: GlobPatterns, tree: Arc<Vec<FileTreeNode>> },
    /// Preview for the patterns in the editor
    Preview { generation: u64, patterns: GlobPatterns, tree: Arc<Vec<FileTreeNode>> },
    /// Rebuild the project tree
    LoadTree { root: PathBuf },
    /// Fetch the persona list again
    LoadAgents,
}

pub enum RecomputeUpdate {
    Context { generation: u64, set: ContextSet },
    Preview { generation: u64, patterns: GlobPatterns, preview: PreviewTree },
    Tree { root: PathBuf, result: Result<Vec<FileTreeNode>, String> },
    Agents(Vec<AgentPersona>),
}

pub fn process_recompute_request(request: RecomputeRequest, services: Services, tx: Sender<RecomputeUpdate>) {
    thread::spawn(move || {
        let update = match request {
            RecomputeRequest::Context { generation, patterns, tree } => {
                let set = resolve_filtered(&patterns, &tree, services.evaluator.as_ref());
                debug!("context generation {}: {} files", generation, set.len());
                RecomputeUpdate::Context { generation, set }
            }
            RecomputeRequest::Preview { generation, patterns, tree } => {
                let preview = preview_for(&tree, &patterns, services.evaluator.as_ref());
                debug!("preview generation {}: {} included", generation, preview.included_count);
                RecomputeUpdate::Preview { generation, patterns, preview }
            }
            RecomputeRequest::LoadTree { root } => {
                let result = services.tree_source.load(&root).map_err(|e| e.to_string());
                RecomputeUpdate::Tree { root, result }
            }
            RecomputeRequest::LoadAgents => RecomputeUpdate::Agents(services.agents.list()),
        };
        // Receiver gone means the app is shutting down
        let _ = tx.send(update);
    });
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn preview_job_reports_its_generation() {
        let (tx, rx) = mpsc::channel();
        let tree = Arc::new(vec![FileTreeNode::folder("src", vec![FileTreeNode::file("src/a.rs")])]);
        let patterns = GlobPatterns::new(vec!["src/**".into()], vec![]);
        process_recompute_request(
            RecomputeRequest::Preview { generation: 7, patterns: patterns.clone(), tree },
            Services::local(),
            tx,
        );
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            RecomputeUpdate::Preview { generation, patterns: p, preview } => {
                assert_eq!(generation, 7);
                assert_eq!(p, patterns);
                assert_eq!(preview.included_count, 1);
            }
            _ => panic!("expected a preview update"),
        }
    }

    #[test]
    fn tree_job_reports_load_errors_as_text() {
        let (tx, rx) = mpsc::channel();
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("gone");
        process_recompute_request(RecomputeRequest::LoadTree { root: root.clone() }, Services::local(), tx);
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            RecomputeUpdate::Tree { root: r, result } => {
                assert_eq!(r, root);
                assert!(result.unwrap_err().contains("not a directory"));
            }
            _ => panic!("expected a tree update"),
        }
    }
}
