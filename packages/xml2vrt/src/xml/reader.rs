//! Streaming event source over a `quick_xml::Reader`.

use std::borrow::Cow;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;

use super::events::{Event, EventHandler};
use crate::error::Result;
use crate::types::Attributes;

/// Read XML from `input` and push its events into `handler` as they are parsed.
///
/// Only the current event is held in memory. Element and attribute names are
/// reduced to their local part and namespace declarations are dropped. Text
/// and attribute values arrive unescaped. Comments, processing instructions
/// and the DOCTYPE produce no events.
pub fn read_events<R: BufRead>(input: R, handler: &mut impl EventHandler) -> Result<()> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            XmlEvent::Start(ref e) => {
                let name = local_name(e);
                handler.handle(Event::Enter {
                    name: &name,
                    attributes: read_attributes(e)?,
                })?;
            }
            XmlEvent::Empty(ref e) => {
                let name = local_name(e);
                handler.handle(Event::Enter {
                    name: &name,
                    attributes: read_attributes(e)?,
                })?;
                handler.handle(Event::Exit { name: &name })?;
            }
            XmlEvent::End(ref e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                handler.handle(Event::Exit { name: &name })?;
            }
            XmlEvent::Text(ref e) => {
                let text = e.unescape()?;
                handler.handle(Event::Text(&text))?;
            }
            XmlEvent::CData(e) => {
                let raw: &[u8] = &e;
                handler.handle(Event::Text(&String::from_utf8_lossy(raw)))?;
            }
            XmlEvent::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}

fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

fn read_attributes(start: &BytesStart<'_>) -> Result<Attributes> {
    let mut attributes = Attributes::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = attr.key.local_name();
        let value: Cow<'_, str> = attr.unescape_value()?;
        attributes.set(String::from_utf8_lossy(key.as_ref()), value);
    }
    Ok(attributes)
}
