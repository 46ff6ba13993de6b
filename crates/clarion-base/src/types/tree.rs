use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Set of relative file paths sent as codebase context with an agent run.
pub type ContextSet = BTreeSet<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

/// A node of the project file tree, in the backend's JSON shape.
///
/// Trees are never edited in place: a refresh builds a new `Vec<FileTreeNode>`
/// and replaces the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTreeNode {
    pub id: String,
    pub name: String,
    /// Relative, `/`-separated, unique within the tree
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "super::null_as_default")]
    pub children: Vec<FileTreeNode>,
}

impl FileTreeNode {
    pub fn file(path: &str) -> Self {
        Self { id: path.to_string(), name: leaf_name(path), path: path.to_string(), kind: NodeKind::File, children: vec![] }
    }

    pub fn folder(path: &str, children: Vec<FileTreeNode>) -> Self {
        Self { id: path.to_string(), name: leaf_name(path), path: path.to_string(), kind: NodeKind::Folder, children }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Every file path at or below this node (the node itself when it is a file).
    pub fn file_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_file_paths(std::slice::from_ref(self), &mut out);
        out
    }
}

/// Flatten a forest into the list of its file paths, depth-first in tree order.
pub fn flatten_file_paths(nodes: &[FileTreeNode]) -> Vec<String> {
    let mut out = Vec::new();
    collect_file_paths(nodes, &mut out);
    out
}

fn collect_file_paths(nodes: &[FileTreeNode], out: &mut Vec<String>) {
    for node in nodes {
        match node.kind {
            NodeKind::File => out.push(node.path.clone()),
            NodeKind::Folder => collect_file_paths(&node.children, out),
        }
    }
}

fn leaf_name(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<FileTreeNode> {
        vec![
            FileTreeNode::folder(
                "src",
                vec![FileTreeNode::file("src/a.ts"), FileTreeNode::folder("src/lib", vec![FileTreeNode::file("src/lib/b.ts")])],
            ),
            FileTreeNode::folder("empty", vec![]),
            FileTreeNode::file("README.md"),
        ]
    }

    #[test]
    fn flatten_keeps_tree_order_and_skips_folders() {
        assert_eq!(flatten_file_paths(&sample()), vec!["src/a.ts", "src/lib/b.ts", "README.md"]);
    }

    #[test]
    fn file_paths_of_a_file_is_itself() {
        let node = FileTreeNode::file("docs/readme.md");
        assert_eq!(node.name, "readme.md");
        assert_eq!(node.file_paths(), vec!["docs/readme.md"]);
    }

    #[test]
    fn decodes_backend_json_with_null_children() {
        let json = r#"[{"id":"src","name":"src","path":"src","type":"folder","children":[
            {"id":"src/main.go","name":"main.go","path":"src/main.go","type":"file"}]},
            {"id":"empty","name":"empty","path":"empty","type":"folder","children":null}]"#;
        let nodes: Vec<FileTreeNode> = serde_json::from_str(json).unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].is_folder());
        assert_eq!(nodes[0].children[0].kind, NodeKind::File);
        assert!(nodes[1].children.is_empty());
    }

    #[test]
    fn file_nodes_serialize_without_children() {
        let json = serde_json::to_value(FileTreeNode::file("a.rs")).unwrap();
        assert_eq!(json["type"], "file");
        assert!(json.get("children").is_none());
    }
}
