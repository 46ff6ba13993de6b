use sha2::{Digest, Sha256};

use crate::types::FileTreeNode;

/// Hash content for change detection (SHA-256)
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:064x}", hasher.finalize())
}

/// Fingerprint of a tree's shape: every file and folder path, in order.
/// A change notification that leaves the fingerprint alone can skip
/// recomputation.
pub fn tree_fingerprint(nodes: &[FileTreeNode]) -> String {
    let mut listing = String::new();
    push_listing(nodes, &mut listing);
    hash_content(&listing)
}

fn push_listing(nodes: &[FileTreeNode], out: &mut String) {
    for node in nodes {
        out.push_str(&node.path);
        if node.is_folder() {
            out.push('/');
        }
        out.push('\n');
        push_listing(&node.children, out);
    }
}
