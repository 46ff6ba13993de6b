use clarion_base::{
    AgentPersona, ContextSet, FileTreeNode, FilterEvaluator, GlobPatterns, Verdict, evaluate_or_empty,
    flatten_file_paths,
};

/// Whether the agent's filter result, not the manual selection, is authoritative.
pub fn has_filters(agent: Option<&AgentPersona>) -> bool {
    agent.is_some_and(AgentPersona::has_filters)
}

/// The set of files sent as codebase context.
///
/// Without filters this is the manual selection verbatim. With filters it is
/// every file of `tree` the evaluator marks included.
pub fn resolve_context_set(
    agent: Option<&AgentPersona>,
    tree: &[FileTreeNode],
    manual: &ContextSet,
    evaluator: &dyn FilterEvaluator,
) -> ContextSet {
    match agent.filter(|a| a.has_filters()) {
        Some(agent) => resolve_filtered(&agent.codebase_filters.patterns(), tree, evaluator),
        None => manual.clone(),
    }
}

/// Files of `tree` included by `patterns`. An empty tree skips the evaluator.
pub fn resolve_filtered(patterns: &GlobPatterns, tree: &[FileTreeNode], evaluator: &dyn FilterEvaluator) -> ContextSet {
    let paths = flatten_file_paths(tree);
    if paths.is_empty() {
        return ContextSet::new();
    }
    let verdicts = evaluate_or_empty(evaluator, &paths, &patterns.include, &patterns.exclude);
    paths.into_iter().filter(|p| verdicts.get(p) == Some(&Verdict::Included)).collect()
}
