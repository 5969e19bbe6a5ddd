//! Strategy selection and fallback between format parsers.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::classifier::DocumentTypeClassifier;
use super::registry::{ParserSet, ParserSlot};
use super::run_isolated;
use crate::config::ParsingConfig;
use crate::error::{CovenantError, CovenantResult};
use crate::traits::ParsedSections;
use crate::types::{DocumentClass, FileKind, ParseFlags, ParseOutcome, ParseStrategy};

/// Provenance when OCR beat the lightweight parser on a mixed PDF.
pub const OCR_FALLBACK: &str = "OCR_Parser_Fallback";
/// Provenance when the lightweight parser's result was kept on a mixed PDF.
pub const PLAIN_PRIMARY: &str = "PlainParser_Primary";

/// Picks and runs parsers for a document, maximising text yield.
///
/// [`parse`](Self::parse) never returns an error. Every failure along the
/// chosen path degrades to an empty outcome tagged `failed`.
#[derive(Debug, Clone)]
pub struct ParsingStrategyEngine {
    parsers: ParserSet,
    classifier: DocumentTypeClassifier,
    fallback_min_chars: usize,
}

impl ParsingStrategyEngine {
    /// Create an engine over a parser set.
    pub fn new(parsers: ParserSet, config: &ParsingConfig) -> Self {
        Self {
            classifier: DocumentTypeClassifier::new(config.classifier.clone(), parsers.clone()),
            parsers,
            fallback_min_chars: config.fallback_min_chars,
        }
    }

    /// The classifier used by the auto strategy.
    pub fn classifier(&self) -> &DocumentTypeClassifier {
        &self.classifier
    }

    /// Parse a document of a known kind.
    pub async fn parse(
        &self,
        strategy: ParseStrategy,
        content: &[u8],
        kind: FileKind,
        flags: ParseFlags,
    ) -> ParseOutcome {
        let content: Arc<[u8]> = Arc::from(content);
        let outcome = match kind {
            FileKind::Pdf => self.parse_pdf(strategy, content, flags).await,
            FileKind::WordProcessor => self.parse_word(content, flags).await,
            FileKind::Spreadsheet => self.parse_spreadsheet(content, flags).await,
            FileKind::PlainText => self.parse_segments(ParserSlot::PlainText, content).await,
            FileKind::Html => self.parse_segments(ParserSlot::Html, content).await,
        };

        info!(
            kind = %kind,
            strategy = %strategy,
            parser = %outcome.parser_used,
            chars = outcome.content.len(),
            "Parsed document"
        );
        outcome
    }

    async fn parse_pdf(
        &self,
        strategy: ParseStrategy,
        content: Arc<[u8]>,
        flags: ParseFlags,
    ) -> ParseOutcome {
        match strategy {
            ParseStrategy::Fast => self.lightweight(content, "fast_mode").await,
            ParseStrategy::Accurate => self.ocr(content, "accurate_mode").await,
            ParseStrategy::Comprehensive => {
                let mut outcome = self.ocr(content.clone(), "comprehensive_mode").await;
                if flags.extract_tables {
                    outcome = outcome.with_tables(pdf_tables(&content));
                }
                if flags.extract_images {
                    outcome = outcome.with_images(pdf_images(&content));
                }
                outcome
            }
            ParseStrategy::Auto => self.parse_pdf_auto(content).await,
        }
    }

    async fn parse_pdf_auto(&self, content: Arc<[u8]>) -> ParseOutcome {
        let classification = self.classifier.classify_with_sample(content.clone()).await;
        let detected = classification.class.to_string();
        debug!(class = %detected, "Auto strategy selected path");

        match classification.class {
            DocumentClass::TextBased => match classification.sample {
                Some(text) => ParseOutcome::new(text, ParserSlot::PdfText.provenance())
                    .with_detected_type(detected),
                None => self.lightweight(content, &detected).await,
            },
            DocumentClass::ImageBased => self.ocr(content, &detected).await,
            DocumentClass::Mixed => {
                let plain = match classification.sample {
                    Some(text) => ParseOutcome::new(text, ParserSlot::PdfText.provenance())
                        .with_detected_type(detected.as_str()),
                    None => self.lightweight(content.clone(), &detected).await,
                };
                self.fallback_chain(content, plain, &detected).await
            }
        }
    }

    /// Keep the lightweight result unless it is thin and OCR yields strictly more.
    async fn fallback_chain(
        &self,
        content: Arc<[u8]>,
        plain: ParseOutcome,
        detected: &str,
    ) -> ParseOutcome {
        let plain_len = plain.trimmed_len();
        if plain_len < self.fallback_min_chars {
            let ocr = self.ocr(content, detected).await;
            let ocr_len = ocr.trimmed_len();
            debug!(plain_len, ocr_len, "Mixed PDF fallback comparison");
            if ocr_len > plain_len {
                return ocr.with_parser(OCR_FALLBACK);
            }
        }

        if plain.is_failed() {
            return plain;
        }
        plain.with_parser(PLAIN_PRIMARY)
    }

    async fn lightweight(&self, content: Arc<[u8]>, detected: &str) -> ParseOutcome {
        self.run_text(ParserSlot::PdfText, content)
            .await
            .map(|text| {
                ParseOutcome::new(text, ParserSlot::PdfText.provenance()).with_detected_type(detected)
            })
            .unwrap_or_else(|_| ParseOutcome::failed())
    }

    async fn ocr(&self, content: Arc<[u8]>, detected: &str) -> ParseOutcome {
        self.run_text(ParserSlot::PdfOcr, content)
            .await
            .map(|text| {
                ParseOutcome::new(text, ParserSlot::PdfOcr.provenance()).with_detected_type(detected)
            })
            .unwrap_or_else(|_| ParseOutcome::failed())
    }

    async fn parse_segments(&self, slot: ParserSlot, content: Arc<[u8]>) -> ParseOutcome {
        self.run_text(slot, content)
            .await
            .map(|text| ParseOutcome::new(text, slot.provenance()))
            .unwrap_or_else(|_| ParseOutcome::failed())
    }

    /// Paragraphs first, then table rows when tables are requested.
    async fn parse_word(&self, content: Arc<[u8]>, flags: ParseFlags) -> ParseOutcome {
        let slot = ParserSlot::WordProcessor;
        let sections = match self.run(slot, content).await {
            Ok(sections) => sections,
            Err(_) => return ParseOutcome::failed(),
        };

        let mut parts: Vec<String> = sections
            .segments
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .collect();

        if flags.extract_tables {
            parts.extend(sections.tables.iter().cloned());
            ParseOutcome::new(parts.join("\n"), slot.provenance()).with_tables(sections.tables)
        } else {
            ParseOutcome::new(parts.join("\n"), slot.provenance())
        }
    }

    /// Every sheet row goes into the content; rows double as tables when requested.
    async fn parse_spreadsheet(&self, content: Arc<[u8]>, flags: ParseFlags) -> ParseOutcome {
        let slot = ParserSlot::Spreadsheet;
        let sections = match self.run(slot, content).await {
            Ok(sections) => sections,
            Err(_) => return ParseOutcome::failed(),
        };

        let text = sections.segments.join("\n");
        if flags.extract_tables {
            let rows = if sections.tables.is_empty() {
                sections.segments
            } else {
                sections.tables
            };
            ParseOutcome::new(text, slot.provenance()).with_tables(rows)
        } else {
            ParseOutcome::new(text, slot.provenance())
        }
    }

    async fn run_text(&self, slot: ParserSlot, content: Arc<[u8]>) -> CovenantResult<String> {
        self.run(slot, content).await.map(|s| s.joined_text())
    }

    async fn run(&self, slot: ParserSlot, content: Arc<[u8]>) -> CovenantResult<ParsedSections> {
        let parser = self.parsers.get(slot).ok_or_else(|| {
            CovenantError::parse_failure(format!("no parser registered for {:?}", slot))
        })?;

        run_isolated(parser, content).await.map_err(|e| {
            warn!(parser = slot.provenance(), "Parser failed: {}", e);
            e
        })
    }
}

// TODO: table detection on PDF pages; always empty for now.
fn pdf_tables(_content: &[u8]) -> Vec<String> {
    Vec::new()
}

// TODO: embedded image descriptions for PDFs; always empty for now.
fn pdf_images(_content: &[u8]) -> Vec<String> {
    Vec::new()
}
