//! Document parsing types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Provenance tag for a path that produced nothing.
pub const PARSER_FAILED: &str = "failed";

/// Broad family of a supported file, used to pick a format parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FileKind {
    Pdf,
    WordProcessor,
    Spreadsheet,
    PlainText,
    Html,
}

impl FileKind {
    /// Map a lowercase extension (with leading dot) to its file family.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            ".pdf" => Some(Self::Pdf),
            ".docx" | ".doc" => Some(Self::WordProcessor),
            ".xlsx" | ".xls" => Some(Self::Spreadsheet),
            ".txt" => Some(Self::PlainText),
            ".html" | ".htm" => Some(Self::Html),
            _ => None,
        }
    }

    /// Name shown in the formats catalogue.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF document",
            Self::WordProcessor => "Word document",
            Self::Spreadsheet => "Excel spreadsheet",
            Self::PlainText => "Text file",
            Self::Html => "HTML file",
        }
    }
}

/// Lowercased extension of a file name including the dot, or an empty string.
pub fn extension_of(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Requested parsing mode.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ParseStrategy {
    /// Classify PDFs and pick a path from the result.
    #[default]
    Auto,
    /// Lightweight text layer only.
    Fast,
    /// OCR only.
    Accurate,
    /// OCR plus table and image placeholders.
    Comprehensive,
}

impl ParseStrategy {
    /// All strategies in catalogue order.
    pub const ALL: [ParseStrategy; 4] = [
        ParseStrategy::Auto,
        ParseStrategy::Fast,
        ParseStrategy::Accurate,
        ParseStrategy::Comprehensive,
    ];

    /// Detected-type label reported for forced modes.
    pub fn forced_label(&self) -> Option<&'static str> {
        match self {
            Self::Auto => None,
            Self::Fast => Some("fast_mode"),
            Self::Accurate => Some("accurate_mode"),
            Self::Comprehensive => Some("comprehensive_mode"),
        }
    }

    /// Human-readable description for the formats catalogue.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Auto => "Detect the PDF type and choose a parser automatically",
            Self::Fast => "Text layer only; quickest, suited to digital documents",
            Self::Accurate => "OCR every page; suited to scanned documents",
            Self::Comprehensive => "OCR plus table and image extraction",
        }
    }
}

/// Optional sub-extractions requested alongside the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParseFlags {
    #[serde(default)]
    pub extract_tables: bool,
    #[serde(default)]
    pub extract_images: bool,
}

impl ParseFlags {
    /// Flags with table extraction enabled.
    pub fn with_tables(mut self) -> Self {
        self.extract_tables = true;
        self
    }

    /// Flags with image extraction enabled.
    pub fn with_images(mut self) -> Self {
        self.extract_images = true;
        self
    }
}

/// A request to parse one stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseRequest {
    pub document_id: String,
    #[serde(default)]
    pub strategy: ParseStrategy,
    #[serde(flatten)]
    pub flags: ParseFlags,
}

impl ParseRequest {
    /// Create a request with the default strategy and no sub-extractions.
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            strategy: ParseStrategy::default(),
            flags: ParseFlags::default(),
        }
    }

    /// Set the strategy.
    pub fn with_strategy(mut self, strategy: ParseStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the flags.
    pub fn with_flags(mut self, flags: ParseFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Extractability class of a PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DocumentClass {
    TextBased,
    Mixed,
    ImageBased,
}

/// Result of running the strategy engine on one document.
///
/// Built once by the engine; the builder methods consume `self`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub content: String,
    pub parser_used: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_type: Option<String>,
    #[serde(default)]
    pub tables: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl ParseOutcome {
    /// Create an outcome with content and provenance.
    pub fn new(content: impl Into<String>, parser_used: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            parser_used: parser_used.into(),
            detected_type: None,
            tables: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Empty outcome tagged as failed.
    pub fn failed() -> Self {
        Self::new(String::new(), PARSER_FAILED)
    }

    /// Set the detected type label.
    pub fn with_detected_type(mut self, detected: impl Into<String>) -> Self {
        self.detected_type = Some(detected.into());
        self
    }

    /// Replace the provenance tag.
    pub fn with_parser(mut self, parser_used: impl Into<String>) -> Self {
        self.parser_used = parser_used.into();
        self
    }

    /// Set the table rows.
    pub fn with_tables(mut self, tables: Vec<String>) -> Self {
        self.tables = tables;
        self
    }

    /// Set the image descriptions.
    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    /// Whether every parser on the chosen path failed.
    pub fn is_failed(&self) -> bool {
        self.parser_used == PARSER_FAILED
    }

    /// Character count of the trimmed content.
    pub fn trimmed_len(&self) -> usize {
        self.content.trim().chars().count()
    }
}

/// Statistics recorded for a parsed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseMetadata {
    /// Wall-clock parse time in seconds, rounded to two decimals.
    pub parse_time_secs: f64,
    pub content_length: usize,
    pub word_count: usize,
    pub strategy_used: ParseStrategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_type: Option<String>,
}

/// A stored document after parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub document_id: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub parser_used: String,
    pub content: String,
    pub metadata: ParseMetadata,
    pub tables: Vec<String>,
    pub images: Vec<String>,
}

/// One failed entry of a batch parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub document_id: String,
    pub error: String,
}

/// Result of a batch parse, partitioned into successes and failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub succeeded: Vec<ParsedDocument>,
    pub failed: Vec<BatchFailure>,
}

impl BatchOutcome {
    /// Total number of documents processed.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Leading excerpt of a document parsed with the fast strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPreview {
    pub document_id: String,
    pub file_name: String,
    pub file_type: String,
    pub preview_content: String,
    pub total_length: usize,
    pub is_truncated: bool,
    pub parser_used: String,
}

/// One supported extension in the formats catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatEntry {
    pub extension: String,
    pub description: String,
}

/// One strategy in the formats catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyEntry {
    pub strategy: ParseStrategy,
    pub description: String,
}

/// Everything the parsing surface supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedFormats {
    pub formats: Vec<FormatEntry>,
    pub strategies: Vec<StrategyEntry>,
    pub features: Vec<String>,
}
