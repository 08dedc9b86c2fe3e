//! Event-driven conversion into vertical format.
//!
//! Each event first passes the scope filter, then updates the hierarchy and
//! the flattened view, resolves pending tags, and finally produces token or
//! free-text output.

use std::io::Write;

use tracing::{debug, trace, warn};

use super::buffer::{LazyTagBuffer, Markup, PendingTag};
use super::flatten::{flatten, position_of, FlatFrame};
use super::hierarchy::HierarchyTracker;
use super::scope::ScopeFilter;
use super::text::{is_whitespace, normalize_free_text};
use super::token::TokenAssembler;
use crate::config::ConvertOptions;
use crate::error::{Result, VrtError};
use crate::types::{Attributes, ConversionSummary};
use crate::xml::{Event, EventHandler};

/// Why positions of the flat view are being closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClosePhase {
    /// A repeated element is being opened; closed levels reopen immediately.
    Merge,
    /// An element is being closed.
    Exit,
}

/// Streaming converter from element events to vertical-format lines.
pub struct Converter<'a, W: Write> {
    options: &'a ConvertOptions,
    writer: W,
    scope: ScopeFilter,
    hierarchy: HierarchyTracker,
    buffer: LazyTagBuffer,
    tokens: TokenAssembler,
    /// Hierarchy depth at which the live token started.
    token_depth: Option<usize>,
    summary: ConversionSummary,
}

impl<'a, W: Write> Converter<'a, W> {
    /// Create a converter writing to `writer`.
    pub fn new(options: &'a ConvertOptions, writer: W) -> Self {
        Self {
            options,
            writer,
            scope: ScopeFilter::new(
                options.include_elements.clone(),
                options.exclude_elements.clone(),
            ),
            hierarchy: HierarchyTracker::new(),
            buffer: LazyTagBuffer::new(),
            tokens: TokenAssembler::new(),
            token_depth: None,
            summary: ConversionSummary::default(),
        }
    }

    /// Counters collected so far.
    pub fn summary(&self) -> ConversionSummary {
        self.summary
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Handle an element enter.
    pub fn enter(&mut self, name: &str, attributes: Attributes) -> Result<()> {
        if !self.scope.enter(name) {
            return Ok(());
        }

        if name == self.options.token_element {
            self.flush_pending(None)?;
            self.tokens.start(name, attributes)?;
            self.token_depth = Some(self.hierarchy.depth());
            return Ok(());
        }

        self.open_structure(name, attributes)
    }

    /// Handle an element exit.
    pub fn exit(&mut self, name: &str) -> Result<()> {
        if self.scope.exit(name) {
            if name == self.options.token_element && self.tokens.is_live() {
                self.close_token()?;
            } else {
                self.close_structure(name)?;
            }
        }

        // Include-listed elements may also close unprocessed, inside an excluded region.
        if self.scope.after_exit(name) {
            self.tokens.break_glue();
        }
        Ok(())
    }

    /// Handle character content.
    pub fn text(&mut self, text: &str) -> Result<()> {
        if !self.scope.in_scope() {
            return Ok(());
        }

        if self.tokens.is_live() {
            self.flush_pending(None)?;
            self.tokens.push_text(text);
            return Ok(());
        }

        if is_whitespace(text) {
            if self.options.tracks_glue() {
                self.tokens.push_whitespace(text);
            }
            return Ok(());
        }

        // Text between tokens separates them even when it is not written.
        self.tokens.break_glue();
        if self.options.discard_freetext {
            return Ok(());
        }

        self.flush_pending(None)?;
        self.write_line(&normalize_free_text(text))?;
        self.summary.free_text_lines += 1;
        Ok(())
    }

    /// Finish the traversal and flush the writer.
    ///
    /// # Errors
    /// Returns `Unbalanced` if elements, pending tags, or a token are still
    /// open, and `Io` if flushing fails.
    pub fn finish(&mut self) -> Result<ConversionSummary> {
        if self.tokens.is_live() {
            return Err(VrtError::Unbalanced(format!(
                "token element <{}> still open",
                self.options.token_element
            )));
        }
        if !self.hierarchy.is_empty() {
            return Err(VrtError::Unbalanced(format!(
                "{} element(s) still open",
                self.hierarchy.depth()
            )));
        }
        if !self.buffer.is_empty() {
            return Err(VrtError::Unbalanced(format!(
                "{} tag(s) still pending",
                self.buffer.len()
            )));
        }
        if self.tokens.has_pending_whitespace() {
            trace!("discarding whitespace after the last token");
            self.tokens.reset_whitespace();
        }
        if !self.options.include_elements.is_empty() && !self.scope.was_activated() {
            warn!("None of the include elements occurred in the document");
        }

        self.writer.flush()?;
        debug!(summary = %self.summary, "Conversion finished");
        Ok(self.summary)
    }

    fn open_structure(&mut self, name: &str, attributes: Attributes) -> Result<()> {
        let before = self.flat_view();
        let merge_at = if self.merges() {
            position_of(&before, name)
        } else {
            None
        };

        self.hierarchy.enter(name, attributes);

        let start = match merge_at {
            Some(index) => {
                self.close_through(&before, index, ClosePhase::Merge)?;
                self.summary.merged_elements += 1;
                index
            }
            None => before.len(),
        };

        let after = self.flat_view();
        if merge_at.is_some() {
            debug!(
                element = name,
                level = after[start].nested_level,
                "Merged nested element"
            );
        }
        self.reopen_from(&after, start, Some(start));
        Ok(())
    }

    fn close_structure(&mut self, name: &str) -> Result<()> {
        let before = self.flat_view();
        self.hierarchy.exit(name)?;

        let target = if self.merges() {
            position_of(&before, name)
        } else {
            before.len().checked_sub(1)
        }
        .unwrap_or(before.len());

        self.close_through(&before, target, ClosePhase::Exit)?;

        let after = self.flat_view();
        self.reopen_from(&after, target, None);
        Ok(())
    }

    /// Whether repeated elements are merged at the current position.
    ///
    /// Markup inside a token keeps its own nesting, so it never merges with
    /// elements opened before the token started.
    fn merges(&self) -> bool {
        self.options.flattening.enabled && self.token_depth.is_none()
    }

    /// The flat view of the open elements.
    ///
    /// Elements opened inside the live token follow the flattened prefix one
    /// position each.
    fn flat_view(&self) -> Vec<FlatFrame> {
        let frames = self.hierarchy.frames();
        let split = self.token_depth.unwrap_or(frames.len()).min(frames.len());
        let mut flat = flatten(&frames[..split], &self.options.flattening);
        flat.extend(frames[split..].iter().map(FlatFrame::from));
        flat
    }

    /// Close flat positions from the deepest back up to `target`.
    fn close_through(&mut self, flat: &[FlatFrame], target: usize, phase: ClosePhase) -> Result<()> {
        for frame in flat.iter().skip(target).rev() {
            let pending = self
                .buffer
                .last()
                .filter(|tag| tag.name == frame.name)
                .map(|tag| tag.is_original);

            match pending {
                Some(is_original) if phase == ClosePhase::Merge || !is_original => {
                    self.buffer.pop_last();
                }
                Some(_) if self.options.is_discardable(&frame.name) => {
                    self.buffer.pop_last();
                    self.summary.suppressed_elements += 1;
                    debug!(element = %frame.name, "Suppressed empty element");
                }
                Some(_) => self.flush_pending(Some(frame.name.as_str()))?,
                None if self.buffer.is_empty() => self.emit(Markup::close(&frame.name))?,
                None => self.flush_pending(Some(frame.name.as_str()))?,
            }
        }
        Ok(())
    }

    /// Queue open tags for flat positions from `index` to the end.
    fn reopen_from(&mut self, flat: &[FlatFrame], index: usize, original: Option<usize>) {
        let level_attribute = &self.options.flattening.level_attribute;
        for (position, frame) in flat.iter().enumerate().skip(index) {
            self.buffer.append(PendingTag::new(
                frame.name.clone(),
                frame.render_attributes(level_attribute),
                original == Some(position),
            ));
        }
    }

    fn close_token(&mut self) -> Result<()> {
        self.flush_pending(None)?;
        self.token_depth = None;
        if let Some(output) = self.tokens.finish(self.options) {
            if let Some(glue) = output.glue {
                self.write_line(&glue)?;
                self.summary.glue_marks += 1;
            }
            self.write_line(&output.line)?;
            self.summary.tokens += 1;
        }
        Ok(())
    }

    fn flush_pending(&mut self, closing: Option<&str>) -> Result<()> {
        if self.buffer.is_empty() && closing.is_none() {
            return Ok(());
        }
        for markup in self.buffer.flush(closing)? {
            self.emit(markup)?;
        }
        Ok(())
    }

    /// Route structural markup to the output, or into the live token.
    fn emit(&mut self, markup: Markup) -> Result<()> {
        if self.tokens.is_live() {
            if self.options.keep_token_tags {
                self.tokens.push_text(markup.as_str());
            }
            return Ok(());
        }

        match markup {
            Markup::Open(_) => self.summary.open_tags += 1,
            Markup::SelfClosed(_) => self.summary.self_closed_tags += 1,
            Markup::Close(_) => self.summary.close_tags += 1,
        }
        self.write_line(markup.as_str())
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}")?;
        Ok(())
    }
}

impl<W: Write> EventHandler for Converter<'_, W> {
    fn handle(&mut self, event: Event<'_>) -> Result<()> {
        trace!(?event, "event");
        match event {
            Event::Enter { name, attributes } => self.enter(name, attributes),
            Event::Exit { name } => self.exit(name),
            Event::Text(text) => self.text(text),
        }
    }
}
