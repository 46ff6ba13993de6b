use clarion_base::GlobPatterns;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobField {
    Include,
    Exclude,
}

/// Text of the glob editor: one comma-separated line per list.
#[derive(Debug, Clone)]
pub struct GlobInput {
    pub include: String,
    pub exclude: String,
    pub field: GlobField,
}

/// Split on commas outside `{...}` alternations.
fn split_globs(line: &str) -> Vec<String> {
    let mut globs = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in line.chars() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                globs.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    globs.push(current);
    globs.into_iter().map(|g| g.trim().to_string()).filter(|g| !g.is_empty()).collect()
}

impl GlobInput {
    pub fn from_patterns(patterns: &GlobPatterns) -> Self {
        Self { include: patterns.include.join(", "), exclude: patterns.exclude.join(", "), field: GlobField::Include }
    }

    pub fn to_patterns(&self) -> GlobPatterns {
        GlobPatterns::new(split_globs(&self.include), split_globs(&self.exclude))
    }

    fn active_mut(&mut self) -> &mut String {
        match self.field {
            GlobField::Include => &mut self.include,
            GlobField::Exclude => &mut self.exclude,
        }
    }

    pub fn push(&mut self, c: char) {
        self.active_mut().push(c);
    }

    pub fn push_str(&mut self, text: &str) {
        self.active_mut().push_str(text);
    }

    pub fn backspace(&mut self) {
        self.active_mut().pop();
    }

    /// Merge `globs` into the exclude line. Returns how many were new.
    pub fn merge_exclude(&mut self, globs: &[String]) -> usize {
        let mut exclude = GlobPatterns::new(Vec::new(), split_globs(&self.exclude));
        let added = exclude.merge_exclude(globs);
        if added > 0 {
            self.exclude = exclude.exclude.join(", ");
        }
        added
    }

    pub fn switch_field(&mut self) {
        self.field = match self.field {
            GlobField::Include => GlobField::Exclude,
            GlobField::Exclude => GlobField::Include,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_lists_trim_and_skip_blanks() {
        let mut input = GlobInput::from_patterns(&GlobPatterns::default());
        for c in "src/**, ,*.rs ,".chars() {
            input.push(c);
        }
        input.switch_field();
        input.push_str("target/**x");
        input.backspace();
        let p = input.to_patterns();
        assert_eq!(p.include, vec!["src/**", "*.rs"]);
        assert_eq!(p.exclude, vec!["target/**"]);
    }

    #[test]
    fn merge_exclude_rewrites_only_the_exclude_line() {
        let mut input = GlobInput::from_patterns(&GlobPatterns::new(vec!["src/**".into()], vec!["bin/**".into()]));
        let added = input.merge_exclude(&["vendor/**".to_string(), "bin/**".to_string()]);
        assert_eq!(added, 1);
        assert_eq!(input.exclude, "bin/**, vendor/**");
        assert_eq!(input.include, "src/**");
        assert_eq!(input.merge_exclude(&["vendor/**".to_string()]), 0);
    }

    #[test]
    fn round_trips_patterns() {
        let p = GlobPatterns::new(vec!["a/**".into(), "{b,c}.md".into()], vec![]);
        let input = GlobInput::from_patterns(&p);
        assert_eq!(input.include, "a/**, {b,c}.md");
        assert_eq!(input.to_patterns(), p);
    }
}
