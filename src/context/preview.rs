//! Pruned copy of the file tree showing what a candidate filter keeps.

use serde::Serialize;

use clarion_base::{
    FileTreeNode, FilterEvaluator, GlobPatterns, NodeKind, Verdict, VerdictMap, evaluate_or_empty, flatten_file_paths,
};
use clarion_mod_tree::TreeItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewStatus {
    Included,
    Excluded,
    Folder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewNode {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub status: PreviewStatus,
    pub has_included_children: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PreviewNode>,
}

impl PreviewNode {
    /// Included itself, or a folder with an included file somewhere below.
    pub fn contributes(&self) -> bool {
        self.status == PreviewStatus::Included || self.has_included_children
    }
}

impl TreeItem for PreviewNode {
    fn name(&self) -> &str {
        &self.name
    }
    fn path(&self) -> &str {
        &self.path
    }
    fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }
    fn children(&self) -> &[Self] {
        &self.children
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewTree {
    pub nodes: Vec<PreviewNode>,
    pub included_count: usize,
}

/// Files are always kept. A folder is kept only when something below it is
/// included; its kept children are the pruned children.
pub fn prune(node: &FileTreeNode, verdicts: &VerdictMap) -> Option<PreviewNode> {
    match node.kind {
        NodeKind::File => {
            let status = match verdicts.get(&node.path) {
                Some(Verdict::Included) => PreviewStatus::Included,
                _ => PreviewStatus::Excluded,
            };
            Some(PreviewNode {
                id: node.id.clone(),
                name: node.name.clone(),
                path: node.path.clone(),
                kind: NodeKind::File,
                status,
                has_included_children: false,
                children: vec![],
            })
        }
        NodeKind::Folder => {
            let children: Vec<PreviewNode> = node.children.iter().filter_map(|c| prune(c, verdicts)).collect();
            if !children.iter().any(PreviewNode::contributes) {
                return None;
            }
            Some(PreviewNode {
                id: node.id.clone(),
                name: node.name.clone(),
                path: node.path.clone(),
                kind: NodeKind::Folder,
                status: PreviewStatus::Folder,
                has_included_children: true,
                children,
            })
        }
    }
}

fn count_included(nodes: &[PreviewNode]) -> usize {
    nodes
        .iter()
        .map(|n| match n.kind {
            NodeKind::File => usize::from(n.status == PreviewStatus::Included),
            NodeKind::Folder => count_included(&n.children),
        })
        .sum()
}

pub fn build_preview(tree: &[FileTreeNode], verdicts: &VerdictMap) -> PreviewTree {
    let nodes: Vec<PreviewNode> = tree.iter().filter_map(|n| prune(n, verdicts)).collect();
    let included_count = count_included(&nodes);
    PreviewTree { nodes, included_count }
}

/// Evaluate `patterns` against every file of `tree` and build the preview.
pub fn preview_for(tree: &[FileTreeNode], patterns: &GlobPatterns, evaluator: &dyn FilterEvaluator) -> PreviewTree {
    let paths = flatten_file_paths(tree);
    if paths.is_empty() {
        return PreviewTree::default();
    }
    let verdicts = evaluate_or_empty(evaluator, &paths, &patterns.include, &patterns.exclude);
    build_preview(tree, &verdicts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clarion_base::EvaluatorError;
    use clarion_mod_glob::LocalGlobEvaluator;
    use clarion_mod_tree::{build_file_tree, render_ascii};

    fn tree() -> Vec<FileTreeNode> {
        let paths: Vec<String> =
            ["src/a.ts", "src/b.md", "src/deep/c.md", "docs/readme.md", "empty/.keep", "top.ts"].iter().map(|s| s.to_string()).collect();
        build_file_tree(&paths)
    }

    fn patterns(include: &[&str], exclude: &[&str]) -> GlobPatterns {
        GlobPatterns::new(include.iter().map(|s| s.to_string()).collect(), exclude.iter().map(|s| s.to_string()).collect())
    }

    fn assert_no_dead_folders(nodes: &[PreviewNode]) {
        for node in nodes {
            if node.kind == NodeKind::Folder {
                assert!(node.has_included_children, "{} kept without included files", node.path);
                assert_eq!(node.status, PreviewStatus::Folder);
                assert_no_dead_folders(&node.children);
            }
        }
    }

    #[test]
    fn include_src_keeps_src_and_drops_docs() {
        let preview = preview_for(&tree(), &patterns(&["src/**"], &[]), &LocalGlobEvaluator);
        let top: Vec<&str> = preview.nodes.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(top, vec!["src", "top.ts"]);
        let src = &preview.nodes[0];
        assert_eq!(src.children.len(), 3);
        assert!(src.children.iter().filter(|c| c.kind == NodeKind::File).all(|c| c.status == PreviewStatus::Included));
        assert_eq!(preview.included_count, 3);
        assert_no_dead_folders(&preview.nodes);
    }

    #[test]
    fn excluded_files_stay_visible_next_to_included_ones() {
        let preview = preview_for(&tree(), &patterns(&[], &["**/*.md"]), &LocalGlobEvaluator);
        let src = preview.nodes.iter().find(|n| n.path == "src").unwrap();
        let b = src.children.iter().find(|c| c.path == "src/b.md").unwrap();
        assert_eq!(b.status, PreviewStatus::Excluded);
        assert!(src.children.iter().all(|c| c.path != "src/deep"));
        assert!(preview.nodes.iter().all(|n| n.path != "docs"));
        assert_eq!(preview.included_count, 3);
        assert_no_dead_folders(&preview.nodes);
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let t = tree();
        let verdicts = LocalGlobEvaluator.evaluate(&flatten_file_paths(&t), &[], &["docs/**".to_string()]).unwrap();
        assert_eq!(build_preview(&t, &verdicts), build_preview(&t, &verdicts));
    }

    #[test]
    fn empty_verdicts_keep_only_root_files() {
        let preview = build_preview(&tree(), &VerdictMap::new());
        let top: Vec<&str> = preview.nodes.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(top, vec!["top.ts"]);
        assert_eq!(preview.nodes[0].status, PreviewStatus::Excluded);
        assert_eq!(preview.included_count, 0);
    }

    #[test]
    fn failing_evaluator_previews_nothing_included() {
        struct Down;
        impl FilterEvaluator for Down {
            fn evaluate(&self, _: &[String], _: &[String], _: &[String]) -> Result<VerdictMap, EvaluatorError> {
                Err(EvaluatorError::Status { status: 502, body: String::new() })
            }
        }
        let preview = preview_for(&tree(), &patterns(&["src/**"], &[]), &Down);
        assert_eq!(preview.included_count, 0);
        assert_no_dead_folders(&preview.nodes);
    }

    #[test]
    fn renders_folders_first() {
        let preview = preview_for(&tree(), &patterns(&["**/*.ts"], &[]), &LocalGlobEvaluator);
        let text = render_ascii(&preview.nodes, |n| n.name.clone());
        assert_eq!(text, "├── src\n│   ├── a.ts\n│   └── b.md\n└── top.ts\n");
    }

    #[test]
    fn serializes_camel_case() {
        let preview = preview_for(&tree(), &patterns(&["top.ts"], &[]), &LocalGlobEvaluator);
        let json = serde_json::to_value(&preview.nodes[0]).unwrap();
        assert_eq!(json["status"], "included");
        assert_eq!(json["hasIncludedChildren"], false);
        assert_eq!(json["type"], "file");
    }
}
