//! Pending open tags whose fate is not decided yet.
//!
//! A structural open is buffered until the next event shows whether the
//! element has content. Depending on that event, the tags are emitted as open
//! tags, the last one is emitted self-closed, or the last one is discarded.

use std::fmt;

use crate::error::{Result, VrtError};
use crate::xml::{close_tag, open_tag, self_closed_tag};

/// An open tag that has not been committed to output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTag {
    pub name: String,
    pub rendered_attributes: String,
    /// True for the element actually being opened; false for a reopened
    /// ancestor standing in for an element that was already in output.
    pub is_original: bool,
}

impl PendingTag {
    pub fn new(name: impl Into<String>, rendered_attributes: String, is_original: bool) -> Self {
        Self {
            name: name.into(),
            rendered_attributes,
            is_original,
        }
    }
}

/// A rendered piece of structural markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    Open(String),
    SelfClosed(String),
    Close(String),
}

impl Markup {
    /// Closing tag for `name`.
    pub fn close(name: &str) -> Self {
        Markup::Close(close_tag(name))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Markup::Open(s) | Markup::SelfClosed(s) | Markup::Close(s) => s,
        }
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered buffer of pending open tags.
#[derive(Debug, Clone, Default)]
pub struct LazyTagBuffer {
    pending: Vec<PendingTag>,
}

impl LazyTagBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, tag: PendingTag) {
        self.pending.push(tag);
    }

    pub fn last(&self) -> Option<&PendingTag> {
        self.pending.last()
    }

    /// Drop the last pending tag without emitting it.
    pub fn pop_last(&mut self) -> Option<PendingTag> {
        self.pending.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Render and clear every pending tag.
    ///
    /// With `closing` set, the last tag is rendered self-closed; it must carry
    /// that name.
    ///
    /// # Errors
    /// Returns `StructuralIntegrity` if `closing` does not match the last
    /// pending tag.
    pub fn flush(&mut self, closing: Option<&str>) -> Result<Vec<Markup>> {
        if let Some(closing) = closing {
            match self.pending.last() {
                Some(last) if last.name == closing => {}
                Some(last) => return Err(VrtError::mismatch(&last.name, closing)),
                None => return Err(VrtError::mismatch("(nothing pending)", closing)),
            }
        }

        let count = self.pending.len();
        let markup = self
            .pending
            .drain(..)
            .enumerate()
            .map(|(index, tag)| {
                if closing.is_some() && index + 1 == count {
                    Markup::SelfClosed(self_closed_tag(&tag.name, &tag.rendered_attributes))
                } else {
                    Markup::Open(open_tag(&tag.name, &tag.rendered_attributes))
                }
            })
            .collect();
        Ok(markup)
    }
}
