//! xml2vrt - Convert token-annotated XML into vertical format.
//!
//! Vertical format (VRT) is the line-oriented input of corpus indexers: one
//! token per line with tab-separated annotation columns, and structural
//! elements as standalone open and close tags.
//!
//! # Example
//!
//! ```
//! use xml2vrt::{convert_str, ConvertOptions};
//!
//! let xml = r#"<doc><s><w lemma="dog">dogs</w><w lemma="run">run</w></s></doc>"#;
//! let options = ConvertOptions::default().with_attributes(["lemma"]);
//!
//! let mut out = Vec::new();
//! convert_str(xml, &options, &mut out).unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "<doc>\n<s>\ndogs\tdog\n<g/>\nrun\trun\n</s>\n</doc>\n"
//! );
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants, conversion options and their YAML form
//! - [`types`]: Attribute maps, element frames and the conversion summary
//! - [`error`]: Error types and Result alias
//! - [`xml`]: Streaming reader, roxmltree helpers and the element event stream
//! - [`engine`]: Scope filtering, flattening, lazy tag emission and tokens
//! - [`convert`]: Reader, string and file conversion entry points
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod types;
pub mod xml;

// Re-export main functions
pub use convert::{convert_document, convert_file, convert_reader, convert_str};

// Re-export commonly used items
pub use config::{ConvertOptions, FlatteningOptions, PolicyKey};
pub use engine::Converter;
pub use error::{Result, VrtError};
pub use types::{Attributes, ConversionSummary};
