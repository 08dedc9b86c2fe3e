//! Stack of currently open elements.

use crate::error::{Result, VrtError};
use crate::types::{Attributes, ElementFrame};

/// Ground truth for nesting: every in-scope structural element that is open.
#[derive(Debug, Clone, Default)]
pub struct HierarchyTracker {
    stack: Vec<ElementFrame>,
}

impl HierarchyTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, name: &str, attributes: Attributes) {
        self.stack.push(ElementFrame::new(name, attributes));
    }

    /// Pop the innermost frame, which must be named `name`.
    ///
    /// # Errors
    /// Returns `StructuralIntegrity` on a name mismatch or an empty stack.
    pub fn exit(&mut self, name: &str) -> Result<ElementFrame> {
        match self.stack.pop() {
            Some(frame) if frame.name == name => Ok(frame),
            Some(frame) => Err(VrtError::mismatch(frame.name, name)),
            None => Err(VrtError::mismatch("(nothing open)", name)),
        }
    }

    pub fn frames(&self) -> &[ElementFrame] {
        &self.stack
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
