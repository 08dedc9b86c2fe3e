//! Error types for the converter.
//!
//! A single `VrtError` covers library consumers. Structural errors signal a
//! desynchronization between the event stream and the engine state and abort
//! the traversal; there is no recovery from them.

use thiserror::Error;

/// Main error type for the xml2vrt library.
#[derive(Debug, Error)]
pub enum VrtError {
    /// A closing event did not match the innermost open element.
    #[error("Structural integrity violated: expected </{expected}>, found </{found}>")]
    StructuralIntegrity { expected: String, found: String },

    /// The traversal ended while elements were still open or pending.
    #[error("Unbalanced input: {0}")]
    Unbalanced(String),

    /// A token element was opened inside another token element.
    #[error("Token element <{0}> opened inside another token")]
    NestedToken(String),

    /// XML parsing failed while building a document tree.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// XML parsing failed while streaming.
    #[error("XML parsing failed: {0}")]
    XmlRead(#[from] quick_xml::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be read.
    #[error("Invalid configuration file: {0}")]
    Config(#[from] serde_yaml_ng::Error),

    /// A command-line option could not be interpreted.
    #[error("Invalid option '{value}': {reason}")]
    InvalidOption { value: String, reason: String },
}

impl VrtError {
    /// Shorthand for a mismatch between an expected and an actual element name.
    pub fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::StructuralIntegrity {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Result type alias for converter operations.
pub type Result<T> = std::result::Result<T, VrtError>;
