//! Include/exclude scope filtering.

use std::collections::HashSet;

/// Decides which elements, and which content, take part in the output.
///
/// Entering an include-listed element opens the extraction window, which
/// stays open until the outermost open include-listed element closes. Both
/// lists are depth counted, so nested occurrences of the same name, or of
/// two listed names, only change the window at the matching depth.
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    include: HashSet<String>,
    exclude: HashSet<String>,
    include_depth: usize,
    activated: bool,
    exclude_depth: usize,
}

impl ScopeFilter {
    #[must_use]
    pub fn new(include: HashSet<String>, exclude: HashSet<String>) -> Self {
        Self {
            include,
            exclude,
            include_depth: 0,
            activated: false,
            exclude_depth: 0,
        }
    }

    /// Whether content at the current position is processed.
    pub fn in_scope(&self) -> bool {
        (self.include.is_empty() || self.include_depth > 0) && self.exclude_depth == 0
    }

    /// Record an element enter; returns whether it is processed.
    pub fn enter(&mut self, name: &str) -> bool {
        if self.include.contains(name) {
            self.include_depth += 1;
            self.activated = true;
        }
        if self.exclude.contains(name) {
            self.exclude_depth += 1;
        }
        self.in_scope()
    }

    /// Record an element exit; returns whether it is processed.
    ///
    /// Every exit, processed or not, must be followed by a call to
    /// [`ScopeFilter::after_exit`] once the exit has been handled.
    pub fn exit(&mut self, name: &str) -> bool {
        if self.exclude_depth > 0 && self.exclude.contains(name) {
            self.exclude_depth -= 1;
            return false;
        }
        self.in_scope()
    }

    /// Leave an include-listed element.
    ///
    /// Returns whether this closed the extraction window.
    pub fn after_exit(&mut self, name: &str) -> bool {
        if self.include_depth == 0 || !self.include.contains(name) {
            return false;
        }
        self.include_depth -= 1;
        self.include_depth == 0
    }

    /// Whether any include-listed element has been entered.
    pub fn was_activated(&self) -> bool {
        self.activated
    }

    pub fn include_depth(&self) -> usize {
        self.include_depth
    }

    pub fn exclude_depth(&self) -> usize {
        self.exclude_depth
    }
}
