//! XML utility functions for reading roxmltree nodes and rendering tags.

use std::borrow::Cow;

use roxmltree::Node;

use crate::types::Attributes;

/// Get the tag name without namespace prefix.
///
/// # Arguments
/// * `node` - XML node
///
/// # Returns
/// Tag name without namespace (e.g., "s" not "{ns}s")
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use xml2vrt::xml::get_tag_name;
///
/// let xml = r#"<text><s>dogs</s></text>"#;
/// let doc = Document::parse(xml).unwrap();
/// let s = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(s), "s");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Collect the attributes of an element in document order.
///
/// Attribute names are local names; namespace prefixes are dropped the same
/// way as for element names.
pub fn get_attributes(node: Node<'_, '_>) -> Attributes {
    node.attributes()
        .map(|attr| (attr.name(), attr.value()))
        .collect()
}

/// Escape an attribute value for output inside double quotes.
///
/// # Examples
/// ```
/// use xml2vrt::xml::escape_attribute;
///
/// assert_eq!(escape_attribute("plain"), "plain");
/// assert_eq!(escape_attribute(r#"a<b & "c""#), "a&lt;b &amp; &quot;c&quot;");
/// ```
pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(value)
}

/// Render attribute pairs as ` name="value"` segments.
///
/// The result is empty for no attributes and otherwise starts with a space,
/// so it can be placed directly after the element name.
pub fn render_attributes<'a>(attributes: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut rendered = String::new();
    for (name, value) in attributes {
        rendered.push(' ');
        rendered.push_str(name);
        rendered.push_str("=\"");
        rendered.push_str(&escape_attribute(value));
        rendered.push('"');
    }
    rendered
}

/// Render an open tag, `<name attrs>`.
pub fn open_tag(name: &str, rendered_attributes: &str) -> String {
    format!("<{name}{rendered_attributes}>")
}

/// Render a self-closed tag, `<name attrs/>`.
pub fn self_closed_tag(name: &str, rendered_attributes: &str) -> String {
    format!("<{name}{rendered_attributes}/>")
}

/// Render a close tag, `</name>`.
pub fn close_tag(name: &str) -> String {
    format!("</{name}>")
}
