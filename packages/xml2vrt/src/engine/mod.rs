//! Flattening and lazy tag-emission engine.
//!
//! The engine consumes element events and writes vertical-format lines. It is
//! split into small state holders that the [`Converter`] coordinates:
//! scope filtering, the open-element stack, the flattened view of that stack,
//! the buffer of undecided open tags, and token assembly.

mod buffer;
mod converter;
mod flatten;
mod hierarchy;
mod scope;
mod text;
mod token;

pub use buffer::{LazyTagBuffer, Markup, PendingTag};
pub use converter::Converter;
pub use flatten::{flatten, merge_attributes, position_of, FlatFrame};
pub use hierarchy::HierarchyTracker;
pub use scope::ScopeFilter;
pub use text::{is_whitespace, normalize_free_text};
pub use token::{clean_field, render_token_line, Token, TokenAssembler, TokenOutput, WORD_ATTRIBUTE};
