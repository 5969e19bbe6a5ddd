//! Registry of format parsers available to the engine.

use std::collections::HashMap;
use std::sync::Arc;

use crate::traits::DocumentParser;
use crate::types::FileKind;

/// Role a parser plays in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserSlot {
    /// Text-layer PDF extraction, cheap and used for classification.
    PdfText,
    /// Page image recognition for scanned PDFs.
    PdfOcr,
    WordProcessor,
    Spreadsheet,
    PlainText,
    Html,
}

impl ParserSlot {
    /// Provenance tag written to outcomes produced by this slot.
    pub fn provenance(&self) -> &'static str {
        match self {
            Self::PdfText => "PlainParser",
            Self::PdfOcr => "OCR_Parser",
            Self::WordProcessor => "DocxParser",
            Self::Spreadsheet => "ExcelParser",
            Self::PlainText => "TxtParser",
            Self::Html => "HtmlParser",
        }
    }

    /// Slot that handles a non-PDF file kind.
    pub fn for_kind(kind: FileKind) -> Option<Self> {
        match kind {
            FileKind::Pdf => None,
            FileKind::WordProcessor => Some(Self::WordProcessor),
            FileKind::Spreadsheet => Some(Self::Spreadsheet),
            FileKind::PlainText => Some(Self::PlainText),
            FileKind::Html => Some(Self::Html),
        }
    }
}

/// Parsers keyed by slot. A missing slot makes that path fail, it never panics.
#[derive(Clone, Default)]
pub struct ParserSet {
    parsers: HashMap<ParserSlot, Arc<dyn DocumentParser>>,
}

impl ParserSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parser for a slot, replacing any previous one.
    pub fn with(mut self, slot: ParserSlot, parser: Arc<dyn DocumentParser>) -> Self {
        self.parsers.insert(slot, parser);
        self
    }

    /// Register a parser in place.
    pub fn insert(&mut self, slot: ParserSlot, parser: Arc<dyn DocumentParser>) {
        self.parsers.insert(slot, parser);
    }

    /// Parser for a slot, if registered.
    pub fn get(&self, slot: ParserSlot) -> Option<Arc<dyn DocumentParser>> {
        self.parsers.get(&slot).cloned()
    }

    /// Whether a slot has a parser.
    pub fn has(&self, slot: ParserSlot) -> bool {
        self.parsers.contains_key(&slot)
    }
}

impl std::fmt::Debug for ParserSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut slots: Vec<_> = self
            .parsers
            .iter()
            .map(|(slot, p)| format!("{:?}={}", slot, p.name()))
            .collect();
        slots.sort();
        f.debug_struct("ParserSet").field("parsers", &slots).finish()
    }
}
