//! In-process filter evaluator.
//!
//! Mirrors the backend's verdict rules so the app can run without a backend:
//! exclude wins, an empty include list includes everything else, otherwise a
//! path must match at least one include glob.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use log::debug;

use clarion_base::{EvaluatorError, FilterEvaluator, Verdict, VerdictMap};

/// Compile patterns into one set. `*` stops at `/`, `**` crosses it.
/// Patterns that fail to parse are dropped and never match.
pub fn compile_patterns(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            continue;
        }
        match GlobBuilder::new(pattern).literal_separator(true).build() {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => debug!("skipping invalid glob '{}': {}", pattern, e),
        }
    }
    builder.build().unwrap_or_else(|e| {
        debug!("glob set failed to build: {}", e);
        GlobSet::empty()
    })
}

/// `\` to `/` and no leading `./`, the form globs are written against.
pub fn normalize_path(path: &str) -> String {
    let slashed = path.replace('\\', "/");
    slashed.trim_start_matches("./").to_string()
}

/// Verdict for every path, keyed by the path exactly as given.
pub fn file_statuses(paths: &[String], include: &[String], exclude: &[String]) -> VerdictMap {
    let include_set = compile_patterns(include);
    let exclude_set = compile_patterns(exclude);
    let include_all = include.is_empty();

    paths
        .iter()
        .map(|path| {
            let candidate = normalize_path(path);
            let verdict = if exclude_set.is_match(&candidate) {
                Verdict::Excluded
            } else if include_all || include_set.is_match(&candidate) {
                Verdict::Included
            } else {
                Verdict::Excluded
            };
            (path.clone(), verdict)
        })
        .collect()
}

/// [`FilterEvaluator`] backed by [`file_statuses`]. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalGlobEvaluator;

impl FilterEvaluator for LocalGlobEvaluator {
    fn evaluate(&self, paths: &[String], include: &[String], exclude: &[String]) -> Result<VerdictMap, EvaluatorError> {
        Ok(file_statuses(paths, include, exclude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn verdict(map: &VerdictMap, path: &str) -> Verdict {
        map[path]
    }

    #[test]
    fn include_src_recursive() {
        let paths = strings(&["src/a.ts", "src/b.md", "docs/readme.md"]);
        let map = file_statuses(&paths, &strings(&["src/**"]), &[]);
        assert_eq!(verdict(&map, "src/a.ts"), Verdict::Included);
        assert_eq!(verdict(&map, "src/b.md"), Verdict::Included);
        assert_eq!(verdict(&map, "docs/readme.md"), Verdict::Excluded);
    }

    #[test]
    fn empty_include_means_everything_not_excluded() {
        let paths = strings(&["src/a.ts", "src/b.md", "README.md", "docs/deep/x.md"]);
        let map = file_statuses(&paths, &[], &strings(&["**/*.md"]));
        assert_eq!(verdict(&map, "src/a.ts"), Verdict::Included);
        assert_eq!(verdict(&map, "src/b.md"), Verdict::Excluded);
        assert_eq!(verdict(&map, "README.md"), Verdict::Excluded);
        assert_eq!(verdict(&map, "docs/deep/x.md"), Verdict::Excluded);
    }

    #[test]
    fn exclude_wins_over_include() {
        let paths = strings(&["src/gen/a.rs", "src/main.rs"]);
        let map = file_statuses(&paths, &strings(&["src/**"]), &strings(&["src/gen/**"]));
        assert_eq!(verdict(&map, "src/gen/a.rs"), Verdict::Excluded);
        assert_eq!(verdict(&map, "src/main.rs"), Verdict::Included);
    }

    #[test]
    fn single_star_does_not_cross_separator() {
        let paths = strings(&["src/main.rs", "src/bin/tool.rs"]);
        let map = file_statuses(&paths, &strings(&["src/*.rs"]), &[]);
        assert_eq!(verdict(&map, "src/main.rs"), Verdict::Included);
        assert_eq!(verdict(&map, "src/bin/tool.rs"), Verdict::Excluded);
    }

    #[test]
    fn question_mark_class_and_alternation() {
        let paths = strings(&["a1.txt", "ab.txt", "b.txt", "c.txt", "x.toml", "x.yaml", "x.json"]);
        let map = file_statuses(&paths, &strings(&["a?.txt", "[bc].txt", "x.{toml,yaml}"]), &[]);
        assert_eq!(verdict(&map, "a1.txt"), Verdict::Included);
        assert_eq!(verdict(&map, "ab.txt"), Verdict::Included);
        assert_eq!(verdict(&map, "b.txt"), Verdict::Included);
        assert_eq!(verdict(&map, "c.txt"), Verdict::Included);
        assert_eq!(verdict(&map, "x.toml"), Verdict::Included);
        assert_eq!(verdict(&map, "x.yaml"), Verdict::Included);
        assert_eq!(verdict(&map, "x.json"), Verdict::Excluded);
    }

    #[test]
    fn invalid_pattern_never_matches() {
        let paths = strings(&["src/a.rs"]);
        let map = file_statuses(&paths, &strings(&["src/[", "src/*.rs"]), &strings(&["{unclosed"]));
        assert_eq!(verdict(&map, "src/a.rs"), Verdict::Included);

        let only_bad = file_statuses(&paths, &strings(&["src/["]), &[]);
        assert_eq!(verdict(&only_bad, "src/a.rs"), Verdict::Excluded);
    }

    #[test]
    fn backslash_paths_are_matched_with_slashes() {
        let paths = strings(&["src\\lib\\mod.rs"]);
        let map = file_statuses(&paths, &strings(&["src/**/*.rs"]), &[]);
        assert_eq!(verdict(&map, "src\\lib\\mod.rs"), Verdict::Included);
    }

    #[test]
    fn every_path_gets_a_verdict() {
        let paths = strings(&["a", "b/c", "d/e/f"]);
        let map = LocalGlobEvaluator.evaluate(&paths, &strings(&["zzz"]), &[]).unwrap();
        assert_eq!(map.len(), 3);
        assert!(map.values().all(|v| *v == Verdict::Excluded));
    }
}
