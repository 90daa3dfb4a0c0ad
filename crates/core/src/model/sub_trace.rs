use std::borrow::Cow;
use std::sync::Arc;

use regex::Regex;

use super::Trace;
use crate::progress::Progress;

/// A view over a parent trace holding an ordered list of parent indices.
///
/// Event storage stays with the parent. Indices are kept ascending, which
/// preserves the non-decreasing timestamp order of the parent. A `SubTrace`
/// describes one particular parent index: after a reload the parent is
/// replaced and every derived view must be rebuilt from the new one.
pub struct SubTrace {
    parent: Arc<dyn Trace>,
    parent_indices: Vec<usize>,
}

impl SubTrace {
    pub fn new(parent: Arc<dyn Trace>) -> Self {
        Self {
            parent,
            parent_indices: Vec::new(),
        }
    }

    /// Append a parent index. Indices must be pushed in ascending order.
    pub fn add_event(&mut self, parent_idx: usize) {
        debug_assert!(
            self.parent_indices.last().is_none_or(|&last| last <= parent_idx),
            "sub-trace indices must be ascending"
        );
        self.parent_indices.push(parent_idx);
    }

    pub fn clear(&mut self) {
        self.parent_indices.clear();
    }

    pub fn parent(&self) -> &Arc<dyn Trace> {
        &self.parent
    }

    /// Index in the parent trace of local event `idx`.
    pub fn parent_index(&self, idx: usize) -> Option<usize> {
        self.parent_indices.get(idx).copied()
    }
}

impl Trace for SubTrace {
    fn num_events(&self) -> usize {
        self.parent_indices.len()
    }

    fn event_time(&self, idx: usize) -> f64 {
        self.parent_index(idx)
            .map_or(0.0, |p| self.parent.event_time(p))
    }

    fn event_text(&self, idx: usize, full: bool) -> Option<Cow<'_, str>> {
        self.parent.event_text(self.parent_index(idx)?, full)
    }
}

/// A [`SubTrace`] populated by one matching pass over its parent, either a
/// regex filter or the lane grouping done at load time.
pub struct FilteredTrace {
    base: SubTrace,
    pattern: Option<String>,
}

impl FilteredTrace {
    pub fn new(parent: Arc<dyn Trace>) -> Self {
        Self {
            base: SubTrace::new(parent),
            pattern: None,
        }
    }

    /// Build a filtered view of every parent event whose detail text matches
    /// `pattern`.
    pub fn with_regex(
        parent: Arc<dyn Trace>,
        pattern: &str,
        progress: Option<&mut dyn Progress>,
    ) -> Self {
        let mut trace = Self::new(parent);
        trace.process_regex(pattern, progress);
        trace
    }

    /// Replace the contents with every parent event whose detail text (the
    /// line without its timestamp) matches `pattern`. A pattern that does not
    /// compile matches nothing.
    pub fn process_regex(&mut self, pattern: &str, mut progress: Option<&mut dyn Progress>) {
        self.base.clear();
        self.pattern = Some(pattern.to_string());

        let regex = match Regex::new(pattern) {
            Ok(regex) => regex,
            Err(e) => {
                log::warn!("invalid filter pattern {pattern:?}: {e}");
                return;
            }
        };

        let parent = Arc::clone(&self.base.parent);
        let count = parent.num_events();
        if let Some(p) = progress.as_deref_mut() {
            p.reset();
            p.set_range(0, count as u64);
        }
        for idx in 0..count {
            let text = parent.event_text(idx, false);
            if regex.is_match(text.as_deref().unwrap_or("")) {
                self.base.add_event(idx);
            }
            if let Some(p) = progress.as_deref_mut() {
                p.set_value(idx as u64);
            }
        }
        log::debug!(
            "filter {pattern:?} matched {} of {count} events",
            self.base.num_events()
        );
    }

    pub fn add_event(&mut self, parent_idx: usize) {
        self.base.add_event(parent_idx);
    }

    /// The pattern of the last filter pass, if any.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn parent_index(&self, idx: usize) -> Option<usize> {
        self.base.parent_index(idx)
    }
}

impl Trace for FilteredTrace {
    fn num_events(&self) -> usize {
        self.base.num_events()
    }

    fn event_time(&self, idx: usize) -> f64 {
        self.base.event_time(idx)
    }

    fn event_text(&self, idx: usize, full: bool) -> Option<Cow<'_, str>> {
        self.base.event_text(idx, full)
    }
}
