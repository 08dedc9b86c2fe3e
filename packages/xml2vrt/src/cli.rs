//! Command-line interface for the converter.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{load_options, parse_policy_key, parse_separator_spec, ConvertOptions};
use crate::convert::{convert_file, output_path_for};
use crate::error::{Result, VrtError};
use crate::types::ConversionSummary;

/// xml2vrt - Convert token-annotated XML into vertical format.
#[derive(Parser)]
#[command(name = "xml2vrt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log conversion details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert XML files into vertical format.
    Convert(ConvertArgs),
}

/// Arguments of the convert command.
#[derive(Args, Debug, Default)]
pub struct ConvertArgs {
    /// Input XML files
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file, or directory when converting several inputs (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// YAML file with conversion options; flags given here take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Token attributes written as columns after the word (e.g. pos,lemma)
    #[arg(short, long, value_delimiter = ',')]
    pub attributes: Vec<String>,

    /// Element marking tokens (default: w)
    #[arg(long)]
    pub token_element: Option<String>,

    /// Glue element written between tokens without whitespace (default: g)
    #[arg(long, conflicts_with = "no_glue")]
    pub glue: Option<String>,

    /// Do not write glue elements
    #[arg(long)]
    pub no_glue: bool,

    /// Keep markup found inside tokens as part of the word
    #[arg(long)]
    pub keep_token_tags: bool,

    /// Keep empty elements as self-closed tags
    #[arg(long)]
    pub keep_empty: bool,

    /// Only suppress these empty elements
    #[arg(long, value_delimiter = ',')]
    pub discard_empty: Vec<String>,

    /// Drop text found outside tokens
    #[arg(long)]
    pub discard_freetext: bool,

    /// Start extracting at these elements
    #[arg(long, value_delimiter = ',')]
    pub include: Vec<String>,

    /// Skip these elements and their content
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Keep repeated nested elements as separate levels
    #[arg(long)]
    pub no_flattening: bool,

    /// Overwrite instead of concatenating when merging (element or element@attribute)
    #[arg(long, value_name = "KEY")]
    pub flat_override: Vec<String>,

    /// Concatenation separator for merged values (element[@attribute]=SEP)
    #[arg(long, value_name = "SPEC")]
    pub flat_separator: Vec<String>,

    /// Attribute carrying the nested-occurrence counter (default: flat_level)
    #[arg(long)]
    pub flat_level_attribute: Option<String>,
}

impl ConvertArgs {
    /// Resolve the effective options: config file first, then flags.
    pub fn to_options(&self) -> Result<ConvertOptions> {
        let mut options = match &self.config {
            Some(path) => load_options(path)?,
            None => ConvertOptions::default(),
        };

        if !self.attributes.is_empty() {
            options.attributes = self.attributes.clone();
        }
        if let Some(name) = &self.token_element {
            options.token_element = name.clone();
        }
        if let Some(glue) = &self.glue {
            options.glue = Some(glue.clone());
        }
        if self.no_glue {
            options.glue = None;
        }
        options.keep_token_tags |= self.keep_token_tags;
        options.keep_empty |= self.keep_empty;
        options.discard_freetext |= self.discard_freetext;
        options.discard_empty.extend(self.discard_empty.iter().cloned());
        options.include_elements.extend(self.include.iter().cloned());
        options.exclude_elements.extend(self.exclude.iter().cloned());

        if self.no_flattening {
            options.flattening.enabled = false;
        }
        if let Some(name) = &self.flat_level_attribute {
            options.flattening.level_attribute = name.clone();
        }
        for key in &self.flat_override {
            options.flattening.set_override(parse_policy_key(key)?);
        }
        for spec in &self.flat_separator {
            let (key, separator) = parse_separator_spec(spec)?;
            options.flattening.set_separator(key, separator);
        }

        Ok(options)
    }
}

/// Run the CLI.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert(args) => convert_command(&args),
    }
}

/// Where each input's output goes; `None` means stdout.
fn plan_outputs(inputs: &[PathBuf], output: Option<&Path>) -> Result<Vec<Option<PathBuf>>> {
    let Some(output) = output else {
        return Ok(vec![None; inputs.len()]);
    };

    if inputs.len() == 1 && !output.is_dir() {
        return Ok(vec![Some(output.to_path_buf())]);
    }

    if output.exists() && !output.is_dir() {
        return Err(VrtError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Output path is not a directory: {}", output.display()),
        )));
    }
    fs::create_dir_all(output)?;

    Ok(inputs
        .iter()
        .map(|input| Some(output_path_for(input, output)))
        .collect())
}

/// Execute the convert command.
fn convert_command(args: &ConvertArgs) -> Result<()> {
    let options = args.to_options()?;

    // Check inputs before writing anything
    for input in &args.inputs {
        if !input.is_file() {
            return Err(VrtError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Input file does not exist: {}", input.display()),
            )));
        }
    }

    let outputs = plan_outputs(&args.inputs, args.output.as_deref())?;
    let to_files = args.output.is_some();

    let pb = if to_files && args.inputs.len() > 1 {
        let pb = ProgressBar::new(args.inputs.len() as u64);
        #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40.green/white} {pos}/{len} {msg}")
                .expect("valid template"),
        );
        Some(pb)
    } else {
        None
    };

    let mut total = ConversionSummary::default();
    for (input, output) in args.inputs.iter().zip(&outputs) {
        if let Some(pb) = &pb {
            pb.set_message(input.display().to_string());
        }

        let summary = match convert_file(input, output.as_deref(), &options) {
            Ok(summary) => summary,
            Err(e) => {
                if let Some(pb) = &pb {
                    pb.finish_and_clear();
                }
                return Err(e);
            }
        };
        total += summary;

        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if to_files {
        print_summary(&total, args.inputs.len());
    }

    Ok(())
}

/// Print a styled summary to stderr.
fn print_summary(summary: &ConversionSummary, files: usize) {
    eprintln!(
        "{} {} file(s)",
        style("Converted").green().bold(),
        style(files).cyan()
    );
    eprintln!("  Tokens: {}", summary.tokens);
    eprintln!(
        "  Structures: {} open, {} self-closed, {} close",
        summary.open_tags, summary.self_closed_tags, summary.close_tags
    );
    eprintln!("  Free-text lines: {}", summary.free_text_lines);
    eprintln!("  Glue marks: {}", summary.glue_marks);
    if summary.merged_elements > 0 {
        eprintln!("  Merged elements: {}", summary.merged_elements);
    }
    if summary.suppressed_elements > 0 {
        eprintln!(
            "  Suppressed empty elements: {}",
            style(summary.suppressed_elements).yellow()
        );
    }
}
