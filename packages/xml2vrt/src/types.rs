//! Core data types shared by the front end and the engine.

use std::fmt;

/// Insertion-ordered attribute map.
///
/// Elements carry a handful of attributes, so a vector of pairs keeps lookup
/// cheap while preserving document order for output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    /// Create an empty attribute map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of an attribute.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, keeping its position if it already exists.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Mutable access to an existing attribute value.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut String> {
        self.entries
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Check whether an attribute is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (key, value) in iter {
            attributes.set(key, value);
        }
        attributes
    }
}

/// One open element in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementFrame {
    pub name: String,
    pub attributes: Attributes,
}

impl ElementFrame {
    pub fn new(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }
}

/// Counters collected during one conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Token lines written.
    pub tokens: usize,
    /// Structural open tags written.
    pub open_tags: usize,
    /// Structural self-closed tags written.
    pub self_closed_tags: usize,
    /// Structural close tags written.
    pub close_tags: usize,
    /// Free-text lines written.
    pub free_text_lines: usize,
    /// Glue markers written.
    pub glue_marks: usize,
    /// Empty elements dropped from the output.
    pub suppressed_elements: usize,
    /// Nested occurrences folded into a shallower element of the same name.
    pub merged_elements: usize,
}

impl ConversionSummary {
    /// Total number of output lines.
    #[must_use]
    pub fn lines(&self) -> usize {
        self.tokens
            + self.open_tags
            + self.self_closed_tags
            + self.close_tags
            + self.free_text_lines
            + self.glue_marks
    }
}

impl std::ops::AddAssign for ConversionSummary {
    fn add_assign(&mut self, other: Self) {
        self.tokens += other.tokens;
        self.open_tags += other.open_tags;
        self.self_closed_tags += other.self_closed_tags;
        self.close_tags += other.close_tags;
        self.free_text_lines += other.free_text_lines;
        self.glue_marks += other.glue_marks;
        self.suppressed_elements += other.suppressed_elements;
        self.merged_elements += other.merged_elements;
    }
}

impl fmt::Display for ConversionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tokens, {} structures, {} free-text lines, {} glue marks, {} suppressed",
            self.tokens,
            self.open_tags + self.self_closed_tags,
            self.free_text_lines,
            self.glue_marks,
            self.suppressed_elements
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_keep_insertion_order() {
        let mut attributes = Attributes::new();
        attributes.set("b", "2");
        attributes.set("a", "1");
        attributes.set("b", "3");

        let pairs: Vec<_> = attributes.iter().collect();
        assert_eq!(pairs, vec![("b", "3"), ("a", "1")]);
        assert_eq!(attributes.len(), 2);
    }

    #[test]
    fn test_attributes_get_mut() {
        let mut attributes: Attributes = [("word", "dog")].into_iter().collect();
        if let Some(word) = attributes.get_mut("word") {
            word.push('s');
        }
        assert_eq!(attributes.get("word"), Some("dogs"));
        assert!(attributes.get_mut("missing").is_none());
    }

    #[test]
    fn test_summary_add_assign() {
        let mut total = ConversionSummary {
            tokens: 2,
            open_tags: 1,
            ..Default::default()
        };
        total += ConversionSummary {
            tokens: 3,
            glue_marks: 1,
            ..Default::default()
        };
        assert_eq!(total.tokens, 5);
        assert_eq!(total.glue_marks, 1);
        assert_eq!(total.lines(), 7);
    }
}
