use std::time::{Duration, Instant};

use clarion_base::GlobPatterns;

use crate::context::{Debouncer, Generations, PreviewTree};

/// Glob editing and the preview it drives.
///
/// `draft` follows every keystroke, `debounced` is what the debouncer last
/// released and `applied` is what the shown preview was computed from.
#[derive(Debug)]
pub struct PreviewEditor {
    pub draft: GlobPatterns,
    debounced: GlobPatterns,
    applied: Option<GlobPatterns>,
    debouncer: Debouncer<GlobPatterns>,
    generations: Generations,
    needs_request: bool,
    in_flight: bool,
    pub preview: PreviewTree,
}

impl PreviewEditor {
    pub fn new(delay: Duration) -> Self {
        Self {
            draft: GlobPatterns::default(),
            debounced: GlobPatterns::default(),
            applied: None,
            debouncer: Debouncer::new(delay),
            generations: Generations::new(),
            needs_request: true,
            in_flight: false,
            preview: PreviewTree::default(),
        }
    }

    /// Start over from `patterns` (agent switch). Recomputes without waiting.
    pub fn reset(&mut self, patterns: GlobPatterns) {
        self.debouncer.cancel();
        self.draft = patterns.clone();
        self.debounced = patterns;
        self.applied = None;
        self.needs_request = true;
    }

    /// Record a keystroke's result; the preview follows after the quiet period.
    pub fn edit(&mut self, patterns: GlobPatterns, now: Instant) {
        self.draft = patterns.clone();
        self.debouncer.push(patterns, now);
    }

    /// Recompute for the current patterns on the next poll (tree changed).
    pub fn invalidate(&mut self) {
        self.needs_request = true;
    }

    /// Generation and patterns of a preview that should be computed now.
    pub fn poll(&mut self, now: Instant) -> Option<(u64, GlobPatterns)> {
        if let Some(patterns) = self.debouncer.poll(now)
            && patterns != self.debounced
        {
            self.debounced = patterns;
            self.needs_request = true;
        }
        if !self.needs_request {
            return None;
        }
        self.needs_request = false;
        self.in_flight = true;
        Some((self.generations.advance(), self.debounced.clone()))
    }

    /// Install a finished preview. Superseded generations are dropped.
    pub fn apply(&mut self, generation: u64, patterns: GlobPatterns, preview: PreviewTree) -> bool {
        if !self.generations.is_current(generation) {
            return false;
        }
        self.applied = Some(patterns);
        self.preview = preview;
        self.in_flight = false;
        true
    }

    /// The shown preview does not match what is typed.
    pub fn is_stale(&self) -> bool {
        self.draft != self.debounced
            || self.debouncer.is_pending()
            || self.in_flight
            || self.applied.as_ref() != Some(&self.debounced)
    }

    /// Draft differs from `saved` (the active agent's stored patterns).
    pub fn is_modified(&self, saved: &GlobPatterns) -> bool {
        &self.draft != saved
    }
}
