use serde::{Deserialize, Serialize};

/// Codebase filter configuration persisted with an agent persona.
///
/// Exclude globs win over include globs. An empty include list means
/// "everything that is not excluded". `content_regex_include` and
/// `max_total_files` are stored and round-tripped only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodebaseFilters {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub include_globs: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub exclude_globs: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub content_regex_include: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub max_total_files: u32,
}

impl CodebaseFilters {
    /// Whether the filter result, rather than the manual selection, is authoritative.
    pub fn has_filters(&self) -> bool {
        !self.include_globs.is_empty() || !self.exclude_globs.is_empty()
    }

    pub fn patterns(&self) -> GlobPatterns {
        GlobPatterns { include: self.include_globs.clone(), exclude: self.exclude_globs.clone() }
    }

    pub fn set_patterns(&mut self, patterns: &GlobPatterns) {
        self.include_globs = patterns.include.clone();
        self.exclude_globs = patterns.exclude.clone();
    }
}

/// The include/exclude pair sent to a filter evaluator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GlobPatterns {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl GlobPatterns {
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self { include, exclude }
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Append `globs` to the exclude list, skipping ones already present.
    /// Returns how many were added.
    pub fn merge_exclude(&mut self, globs: &[String]) -> usize {
        let before = self.exclude.len();
        for glob in globs {
            if !self.exclude.contains(glob) {
                self.exclude.push(glob.clone());
            }
        }
        self.exclude.len() - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_filters_when_either_list_is_set() {
        let mut f = CodebaseFilters::default();
        assert!(!f.has_filters());
        f.exclude_globs.push("**/*.md".into());
        assert!(f.has_filters());
        f.exclude_globs.clear();
        f.include_globs.push("src/**".into());
        assert!(f.has_filters());
    }

    #[test]
    fn dead_fields_round_trip_untouched() {
        let json = r#"{"include_globs":null,"exclude_globs":["node_modules/**"],
            "content_regex_include":"TODO","max_total_files":40}"#;
        let f: CodebaseFilters = serde_json::from_str(json).unwrap();
        assert!(f.include_globs.is_empty());
        assert_eq!(f.content_regex_include, "TODO");
        assert_eq!(f.max_total_files, 40);

        let back = serde_json::to_value(&f).unwrap();
        assert_eq!(back["content_regex_include"], "TODO");
        assert_eq!(back["max_total_files"], 40);
    }

    #[test]
    fn merge_exclude_keeps_order_and_skips_duplicates() {
        let mut p = GlobPatterns::new(vec!["src/**".into()], vec!["dist/**".into(), "*.md".into()]);
        let preset: Vec<String> = ["node_modules/**", "dist/**", "build/**", "node_modules/**"].map(String::from).to_vec();
        assert_eq!(p.merge_exclude(&preset), 2);
        assert_eq!(p.exclude, vec!["dist/**", "*.md", "node_modules/**", "build/**"]);
        assert_eq!(p.include, vec!["src/**"]);
        assert_eq!(p.merge_exclude(&preset), 0);
    }

    #[test]
    fn missing_fields_default() {
        let f: CodebaseFilters = serde_json::from_str("{}").unwrap();
        assert_eq!(f, CodebaseFilters::default());
    }
}
