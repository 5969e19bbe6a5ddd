//! CLI command definitions and argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use covenant_core::{AnalysisDepth, ExtractionDepth, ParseStrategy};

/// Covenant - parse contract documents and extract structured records.
#[derive(Debug, Parser)]
#[command(name = "covenant")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (.toml, .json or .yaml)
    #[arg(short, long, global = true, env = "COVENANT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the document store
    #[arg(long, global = true, env = "COVENANT_DOCUMENT_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Tenant whose documents are visible
    #[arg(long, global = true, env = "COVENANT_TENANT", default_value = "default")]
    pub tenant: String,

    /// Print single-line JSON
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse one stored document
    Parse(ParseArgs),

    /// Parse several stored documents
    Batch(BatchArgs),

    /// Show the beginning of a document
    Preview(PreviewArgs),

    /// Extract a structured contract record
    Extract(ExtractArgs),

    /// Assess the risks of an extracted record
    Risk(RiskArgs),

    /// List supported formats and strategies
    Formats,
}

/// Parsing options shared by `parse` and `batch`.
#[derive(Debug, Clone, Args)]
pub struct ParseOptions {
    /// Parsing strategy (auto, fast, accurate, comprehensive)
    #[arg(short, long, default_value = "auto")]
    pub strategy: ParseStrategy,

    /// Also report table rows
    #[arg(long)]
    pub tables: bool,

    /// Also report images
    #[arg(long)]
    pub images: bool,
}

/// Arguments for the parse command.
#[derive(Debug, Parser)]
pub struct ParseArgs {
    /// Document id
    pub document_id: String,

    #[command(flatten)]
    pub options: ParseOptions,

    /// Print only the extracted text
    #[arg(long)]
    pub text_only: bool,
}

/// Arguments for the batch command.
#[derive(Debug, Parser)]
pub struct BatchArgs {
    /// Document ids
    #[arg(required = true)]
    pub document_ids: Vec<String>,

    #[command(flatten)]
    pub options: ParseOptions,
}

/// Arguments for the preview command.
#[derive(Debug, Parser)]
pub struct PreviewArgs {
    /// Document id
    pub document_id: String,

    /// Maximum characters to show
    #[arg(short, long)]
    pub length: Option<usize>,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Document id to parse and extract from
    #[arg(conflicts_with = "text_file", required_unless_present = "text_file")]
    pub document_id: Option<String>,

    /// Extract from a plain text file instead of a stored document
    #[arg(long)]
    pub text_file: Option<PathBuf>,

    /// Extraction depth (basic, detailed)
    #[arg(short, long, default_value = "basic")]
    pub depth: ExtractionDepth,

    /// Run risk assessment on the record as well
    #[arg(long)]
    pub assess: bool,
}

/// Arguments for the risk command.
#[derive(Debug, Parser)]
pub struct RiskArgs {
    /// JSON file holding a record produced by `extract`
    pub record: PathBuf,

    /// Analysis depth (basic, comprehensive)
    #[arg(short, long, default_value = "basic")]
    pub depth: AnalysisDepth,
}
