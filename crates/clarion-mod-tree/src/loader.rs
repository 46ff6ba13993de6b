use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use log::{debug, warn};
use thiserror::Error;

use clarion_base::FileTreeNode;
use clarion_base::config::constants::DEFAULT_IGNORE_DIRS;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn is_ignored_dir(name: &OsStr) -> bool {
    name.to_str().is_some_and(|n| DEFAULT_IGNORE_DIRS.contains(&n))
}

/// Relative `/`-separated paths of every file under `root`, sorted by file
/// name within each directory. Ignore dirs are skipped at any depth; hidden
/// files and `.gitignore` rules are not applied.
pub fn load_project_paths(root: &Path) -> Result<Vec<String>, TreeError> {
    if !root.is_dir() {
        return Err(TreeError::NotADirectory(root.to_path_buf()));
    }
    fs::read_dir(root).map_err(|source| TreeError::Unreadable { path: root.to_path_buf(), source })?;

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .filter_entry(|entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !(entry.depth() > 0 && is_dir && is_ignored_dir(entry.file_name()))
        })
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut paths = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else { continue };
        let parts: Vec<_> = relative.components().map(|c| c.as_os_str().to_string_lossy()).collect();
        paths.push(parts.join("/"));
    }

    debug!("walked {}: {} files", root.display(), paths.len());
    Ok(paths)
}

/// Build the hierarchy for a flat path list. Every proper prefix of a path
/// becomes a folder whose id and path are that prefix; first-seen order is
/// kept at every level.
pub fn build_file_tree(paths: &[String]) -> Vec<FileTreeNode> {
    let mut roots = Vec::new();
    for path in paths {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if !segments.is_empty() {
            insert(&mut roots, &segments, 0);
        }
    }
    roots
}

fn insert(nodes: &mut Vec<FileTreeNode>, segments: &[&str], depth: usize) {
    let prefix = segments[..=depth].join("/");

    if depth + 1 == segments.len() {
        if !nodes.iter().any(|n| n.path == prefix) {
            nodes.push(FileTreeNode::file(&prefix));
        }
        return;
    }

    let idx = match nodes.iter().position(|n| n.is_folder() && n.path == prefix) {
        Some(i) => i,
        None => {
            nodes.push(FileTreeNode::folder(&prefix, vec![]));
            nodes.len() - 1
        }
    };
    insert(&mut nodes[idx].children, segments, depth + 1);
}

/// Walk `root` and build its tree in one step.
pub fn load_project_tree(root: &Path) -> Result<Vec<FileTreeNode>, TreeError> {
    Ok(build_file_tree(&load_project_paths(root)?))
}
