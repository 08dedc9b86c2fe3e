//! Conversion entry points that tie the front end and the engine together.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use roxmltree::Document;
use tracing::debug;

use crate::config::{ConvertOptions, OUTPUT_EXTENSION};
use crate::engine::Converter;
use crate::error::Result;
use crate::types::ConversionSummary;
use crate::xml::{read_events, walk_document};

/// Convert XML read from `input` while it streams, writing vertical-format
/// lines to `writer`.
///
/// The document is never held in memory as a whole. Output written before a
/// parse or structural error is left in `writer`.
pub fn convert_reader<R: BufRead, W: Write>(
    input: R,
    options: &ConvertOptions,
    writer: W,
) -> Result<ConversionSummary> {
    let mut converter = Converter::new(options, writer);
    read_events(input, &mut converter)?;
    converter.finish()
}

/// Convert an already parsed document, writing vertical-format lines to `writer`.
pub fn convert_document<W: Write>(
    doc: &Document<'_>,
    options: &ConvertOptions,
    writer: W,
) -> Result<ConversionSummary> {
    let mut converter = Converter::new(options, writer);
    walk_document(doc, &mut converter)?;
    converter.finish()
}

/// Convert an XML string.
///
/// # Examples
/// ```
/// use xml2vrt::{convert_str, ConvertOptions};
///
/// let options = ConvertOptions::default().with_attributes(["lemma"]);
/// let mut out = Vec::new();
/// convert_str(r#"<s><w lemma="be">is</w></s>"#, &options, &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "<s>\nis\tbe\n</s>\n");
/// ```
pub fn convert_str<W: Write>(
    xml: &str,
    options: &ConvertOptions,
    writer: W,
) -> Result<ConversionSummary> {
    convert_reader(xml.as_bytes(), options, writer)
}

/// Convert one file.
///
/// Output goes to `output` when given, to stdout otherwise.
pub fn convert_file(
    input: &Path,
    output: Option<&Path>,
    options: &ConvertOptions,
) -> Result<ConversionSummary> {
    let reader = BufReader::new(File::open(input)?);
    debug!(input = %input.display(), "Converting");

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let file = File::create(path)?;
            convert_reader(reader, options, BufWriter::new(file))
        }
        None => {
            let stdout = io::stdout();
            convert_reader(reader, options, BufWriter::new(stdout.lock()))
        }
    }
}

/// Output path for `input` inside `dir`: `dir/<stem>.vrt`.
pub fn output_path_for(input: &Path, dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    dir.join(format!("{}.{OUTPUT_EXTENSION}", stem.to_string_lossy()))
}
