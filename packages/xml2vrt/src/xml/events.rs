//! Enter/exit/text events and the walker over a parsed document.

use roxmltree::{Document, Node};

use super::utils::{get_attributes, get_tag_name};
use crate::error::Result;
use crate::types::Attributes;

/// One event of the nested element stream, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<'a> {
    /// An element was opened.
    Enter { name: &'a str, attributes: Attributes },
    /// An element was closed.
    Exit { name: &'a str },
    /// Character content.
    Text(&'a str),
}

/// Consumer of an event stream.
///
/// Each event is processed to completion before the next one is delivered.
pub trait EventHandler {
    /// Process one event.
    fn handle(&mut self, event: Event<'_>) -> Result<()>;
}

/// Walk a parsed document and push its events into `handler`.
///
/// Comments and processing instructions produce no events. The first error
/// returned by the handler aborts the walk.
pub fn walk_document(doc: &Document<'_>, handler: &mut impl EventHandler) -> Result<()> {
    walk_element(doc.root_element(), handler)
}

fn walk_element(node: Node<'_, '_>, handler: &mut impl EventHandler) -> Result<()> {
    handler.handle(Event::Enter {
        name: get_tag_name(node),
        attributes: get_attributes(node),
    })?;

    for child in node.children() {
        if child.is_element() {
            walk_element(child, handler)?;
        } else if let Some(text) = child.text().filter(|_| child.is_text()) {
            handler.handle(Event::Text(text))?;
        }
    }

    handler.handle(Event::Exit {
        name: get_tag_name(node),
    })
}
