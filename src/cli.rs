//! Command line parsing and the one-shot (non-TUI) commands.

use std::path::{Path, PathBuf};

use log::warn;

use clarion_base::config::{library, presets};
use clarion_base::{AgentPersona, ContextSet, GlobPatterns};
use clarion_mod_tree::{render_ascii, retain_existing};

use crate::context::{PreviewNode, PreviewStatus, preview_for, resolve_context_set};
use crate::services::{AgentSource, Services};

pub const USAGE: &str = "\
Usage:
  clarion [--local] [ROOT]
  clarion [--local] preview ROOT [--include GLOB]... [--exclude GLOB]... [--preset NAME]... [--json]
  clarion [--local] context ROOT [--agent ID] [--select PATH]...
  clarion [--local] agents [--delete ID]

  --local   evaluate globs, walk the tree and read agents in-process
  --preset  merge an exclude preset (Node.js, Python, Go)";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Tui { root: PathBuf },
    Preview { root: PathBuf, patterns: GlobPatterns, json: bool },
    Context { root: PathBuf, agent: Option<String>, select: Vec<String> },
    Agents { delete: Option<String> },
    Help,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Cli {
    pub command: Command,
    pub local: bool,
}

/// Parse arguments (without the program name).
pub fn parse_args(args: &[String]) -> Result<Cli, String> {
    let mut local = false;
    let mut rest: Vec<&str> = Vec::new();
    for arg in args {
        match arg.as_str() {
            "--local" => local = true,
            "-h" | "--help" => return Ok(Cli { command: Command::Help, local }),
            other => rest.push(other),
        }
    }

    let command = match rest.first().copied() {
        Some("preview") => parse_preview(&rest[1..])?,
        Some("context") => parse_context(&rest[1..])?,
        Some("agents") => parse_agents(&rest[1..])?,
        Some(flag) if flag.starts_with('-') => return Err(format!("Unknown argument: {}", flag)),
        Some(root) if rest.len() == 1 => Command::Tui { root: PathBuf::from(root) },
        Some(_) => return Err(format!("Unexpected argument: {}", rest[1])),
        None => Command::Tui { root: PathBuf::from(".") },
    };
    Ok(Cli { command, local })
}

/// Value following a flag.
fn flag_value<'a>(args: &[&'a str], i: usize) -> Result<&'a str, String> {
    args.get(i + 1).copied().ok_or_else(|| format!("{} needs a value", args[i]))
}

fn parse_preview(args: &[&str]) -> Result<Command, String> {
    let mut root = None;
    let mut patterns = GlobPatterns::default();
    let mut json = false;
    let mut preset_names = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "--include" => {
                patterns.include.push(flag_value(args, i)?.to_string());
                i += 2;
            }
            "--preset" => {
                preset_names.push(flag_value(args, i)?);
                i += 2;
            }
            "--exclude" => {
                patterns.exclude.push(flag_value(args, i)?.to_string());
                i += 2;
            }
            "--json" => {
                json = true;
                i += 1;
            }
            other if other.starts_with('-') => return Err(format!("Unknown argument: {}", other)),
            other if root.is_none() => {
                root = Some(PathBuf::from(other));
                i += 1;
            }
            other => return Err(format!("Unexpected argument: {}", other)),
        }
    }
    let root = root.ok_or("preview needs a ROOT")?;
    // Presets go after the explicit excludes
    for name in preset_names {
        let preset = presets::find(name).ok_or_else(|| format!("Unknown preset: {}", name))?;
        patterns.merge_exclude(&preset.globs);
    }
    Ok(Command::Preview { root, patterns, json })
}

fn parse_context(args: &[&str]) -> Result<Command, String> {
    let mut root = None;
    let mut agent = None;
    let mut select = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "--agent" => {
                agent = Some(flag_value(args, i)?.to_string());
                i += 2;
            }
            "--select" => {
                select.push(flag_value(args, i)?.to_string());
                i += 2;
            }
            other if other.starts_with('-') => return Err(format!("Unknown argument: {}", other)),
            other if root.is_none() => {
                root = Some(PathBuf::from(other));
                i += 1;
            }
            other => return Err(format!("Unexpected argument: {}", other)),
        }
    }
    let root = root.ok_or("context needs a ROOT")?;
    Ok(Command::Context { root, agent, select })
}

fn parse_agents(args: &[&str]) -> Result<Command, String> {
    match args {
        [] => Ok(Command::Agents { delete: None }),
        ["--delete", id] => Ok(Command::Agents { delete: Some(id.to_string()) }),
        ["--delete"] => Err("--delete needs a value".to_string()),
        [other, ..] => Err(format!("Unknown argument: {}", other)),
    }
}

// ============================================================================
// One-shot commands
// ============================================================================

fn absolute(root: &Path) -> PathBuf {
    root.canonicalize().unwrap_or_else(|_| root.to_path_buf())
}

fn preview_label(node: &PreviewNode) -> String {
    match node.status {
        PreviewStatus::Folder => format!("{}/", node.name),
        PreviewStatus::Included => format!("{}  +", node.name),
        PreviewStatus::Excluded => format!("{}  -", node.name),
    }
}

pub fn run_preview(services: &Services, root: &Path, patterns: &GlobPatterns, json: bool) -> Result<String, String> {
    let root = absolute(root);
    let tree = services.tree_source.load(&root).map_err(|e| e.to_string())?;
    let preview = preview_for(&tree, patterns, services.evaluator.as_ref());

    if json {
        return serde_json::to_string_pretty(&preview).map_err(|e| e.to_string());
    }
    let mut out = render_ascii(&preview.nodes, preview_label);
    out.push_str(&format!("{} files included\n", preview.included_count));
    Ok(out)
}

fn find_agent<'a>(agents: &'a [AgentPersona], id: Option<&str>) -> Result<Option<&'a AgentPersona>, String> {
    match id {
        Some(id) => agents.iter().find(|a| a.id == id).map(Some).ok_or_else(|| format!("No agent with id '{}'", id)),
        None => Ok(agents
            .iter()
            .find(|a| a.id == library::default_agent_id())
            .or_else(|| agents.first())),
    }
}

pub fn run_context(services: &Services, root: &Path, agent: Option<&str>, select: &[String]) -> Result<String, String> {
    let root = absolute(root);
    let tree = services.tree_source.load(&root).map_err(|e| e.to_string())?;
    let agents = services.agents.list();
    let agent = find_agent(&agents, agent)?;
    let mut manual: ContextSet = select.iter().cloned().collect();
    if retain_existing(&mut manual, &tree) > 0 {
        warn!("ignoring selected paths that are not files of {}", root.display());
    }

    let set = resolve_context_set(agent, &tree, &manual, services.evaluator.as_ref());
    let mut out = String::new();
    for path in &set {
        out.push_str(path);
        out.push('\n');
    }
    Ok(out)
}

pub fn run_agents(services: &Services, delete: Option<&str>) -> Result<String, String> {
    if let Some(id) = delete {
        services.agents.delete(id).map_err(|e| e.to_string())?;
        if matches!(services.agents, AgentSource::Seed) {
            return Ok(format!("Deleted agent {} (seed library, not persisted)\n", id));
        }
        return Ok(format!("Deleted agent {}\n", id));
    }
    let mut out = String::new();
    for agent in services.agents.list() {
        let f = &agent.codebase_filters;
        out.push_str(&format!("{}\t{}", agent.id, agent.name));
        if f.has_filters() {
            out.push_str(&format!("\tinclude=[{}] exclude=[{}]", f.include_globs.join(", "), f.exclude_globs.join(", ")));
        }
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_args_runs_tui_on_cwd() {
        let cli = parse_args(&[]).unwrap();
        assert_eq!(cli.command, Command::Tui { root: PathBuf::from(".") });
        assert!(!cli.local);
    }

    #[test]
    fn preview_collects_repeated_globs() {
        let cli = parse_args(&args(&["--local", "preview", "/p", "--include", "src/**", "--exclude", "*.md", "--include", "x"]))
            .unwrap();
        assert!(cli.local);
        let Command::Preview { root, patterns, json } = cli.command else { panic!("expected preview") };
        assert_eq!(root, PathBuf::from("/p"));
        assert_eq!(patterns.include, vec!["src/**", "x"]);
        assert_eq!(patterns.exclude, vec!["*.md"]);
        assert!(!json);
    }

    #[test]
    fn preview_presets_merge_after_explicit_excludes() {
        let cli = parse_args(&args(&["preview", "/p", "--preset", "go", "--exclude", "bin/**", "--preset", "Go"])).unwrap();
        let Command::Preview { patterns, .. } = cli.command else { panic!("expected preview") };
        assert_eq!(patterns.exclude, vec!["bin/**", "vendor/**"]);
        assert!(parse_args(&args(&["preview", "/p", "--preset", "cobol"])).is_err());
    }

    #[test]
    fn parse_errors() {
        assert!(parse_args(&args(&["preview"])).is_err());
        assert!(parse_args(&args(&["preview", "/p", "--include"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_args(&args(&["a", "b"])).is_err());
        assert_eq!(parse_args(&args(&["agents", "--delete", "x"])).unwrap().command, Command::Agents {
            delete: Some("x".into())
        });
    }

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for rel in ["src/a.ts", "src/b.md", "docs/readme.md"] {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "x").unwrap();
        }
        dir
    }

    #[test]
    fn preview_command_prints_pruned_tree() {
        let dir = project();
        let patterns = GlobPatterns::new(vec!["src/**".into()], vec![]);
        let out = run_preview(&Services::local(), dir.path(), &patterns, false).unwrap();
        assert_eq!(out, "└── src/\n    ├── a.ts  +\n    └── b.md  +\n2 files included\n");
    }

    #[test]
    fn context_command_uses_manual_selection_for_unfiltered_default_agent() {
        let dir = project();
        let out = run_context(&Services::local(), dir.path(), None, &args(&["docs/readme.md"])).unwrap();
        assert_eq!(out, "docs/readme.md\n");
        let out = run_context(&Services::local(), dir.path(), None, &args(&["docs/readme.md", "missing.md"])).unwrap();
        assert_eq!(out, "docs/readme.md\n");
    }

    #[test]
    fn seed_agent_delete_reports_unknown_ids() {
        let err = run_agents(&Services::local(), Some("nobody")).unwrap_err();
        assert!(err.contains("nobody"));
        let out = run_agents(&Services::local(), Some("default")).unwrap();
        assert_eq!(out, "Deleted agent default (seed library, not persisted)\n");
    }

    #[test]
    fn context_command_applies_agent_filters() {
        let dir = project();
        let out = run_context(&Services::local(), dir.path(), Some("docs-writer"), &[]).unwrap();
        assert_eq!(out, "docs/readme.md\nsrc/b.md\n");
        assert!(run_context(&Services::local(), dir.path(), Some("nobody"), &[]).is_err());
    }
}
