//! XML front end: the streaming reader, roxmltree helpers and the event
//! stream fed to the engine.

mod events;
mod reader;
mod utils;

pub use events::{walk_document, Event, EventHandler};
pub use reader::read_events;
pub use utils::{
    close_tag, escape_attribute, get_attributes, get_tag_name, open_tag, render_attributes,
    self_closed_tag,
};
