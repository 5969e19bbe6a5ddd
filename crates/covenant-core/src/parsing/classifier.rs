//! PDF extractability classification.

use std::sync::Arc;
use tracing::{debug, warn};

use super::registry::{ParserSet, ParserSlot};
use super::run_isolated;
use crate::config::ClassifierThresholds;
use crate::error::CovenantError;
use crate::types::DocumentClass;

/// Text sampled by the classifier, reusable by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub class: DocumentClass,
    /// Joined lightweight text, absent when the sample extraction failed.
    pub sample: Option<String>,
}

/// Decides whether a PDF carries a usable text layer.
#[derive(Debug, Clone)]
pub struct DocumentTypeClassifier {
    thresholds: ClassifierThresholds,
    parsers: ParserSet,
}

impl DocumentTypeClassifier {
    /// Create a classifier that samples with the set's `PdfText` parser.
    pub fn new(thresholds: ClassifierThresholds, parsers: ParserSet) -> Self {
        Self {
            thresholds,
            parsers,
        }
    }

    /// Classify already-extracted text.
    pub fn classify_text(&self, text: &str) -> DocumentClass {
        let length = text.trim().chars().count();
        let words = text.split_whitespace().count();
        let t = &self.thresholds;

        if length >= t.text_min_chars && words >= t.text_min_words {
            DocumentClass::TextBased
        } else if length >= t.mixed_min_chars && words >= t.mixed_min_words {
            DocumentClass::Mixed
        } else {
            DocumentClass::ImageBased
        }
    }

    /// Classify a PDF by sampling its text layer.
    pub async fn classify(&self, content: &[u8]) -> DocumentClass {
        self.classify_with_sample(Arc::from(content)).await.class
    }

    /// Classify and keep the sampled text.
    ///
    /// A failed sample extraction yields `Mixed` so the engine still tries
    /// both parsers.
    pub async fn classify_with_sample(&self, content: Arc<[u8]>) -> Classification {
        let sampled = match self.parsers.get(ParserSlot::PdfText) {
            Some(parser) => run_isolated(parser, content).await,
            None => Err(CovenantError::parse_failure("no lightweight PDF parser registered")),
        };

        match sampled {
            Ok(sections) => {
                let text = sections.joined_text();
                let class = self.classify_text(&text);
                debug!(
                    chars = text.trim().chars().count(),
                    words = text.split_whitespace().count(),
                    class = %class,
                    "Classified PDF"
                );
                Classification {
                    class,
                    sample: Some(text),
                }
            }
            Err(e) => {
                warn!("PDF type detection failed: {}, defaulting to mixed", e);
                Classification {
                    class: DocumentClass::Mixed,
                    sample: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CovenantResult;
    use crate::traits::{DocumentParser, ParsedSections};
    use async_trait::async_trait;

    struct FixedParser(String);

    #[async_trait]
    impl DocumentParser for FixedParser {
        async fn parse(&self, _content: &[u8]) -> CovenantResult<ParsedSections> {
            Ok(ParsedSections::from_segments(vec![self.0.clone()]))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct BrokenParser;

    #[async_trait]
    impl DocumentParser for BrokenParser {
        async fn parse(&self, _content: &[u8]) -> CovenantResult<ParsedSections> {
            Err(CovenantError::parse_failure("corrupt xref table"))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    fn classifier() -> DocumentTypeClassifier {
        DocumentTypeClassifier::new(ClassifierThresholds::default(), ParserSet::new())
    }

    /// `words` words of `word_len` characters separated by single spaces.
    fn text(words: usize, word_len: usize) -> String {
        vec!["x".repeat(word_len); words].join(" ")
    }

    #[test]
    fn test_text_based_at_thresholds() {
        // 50 words of 9 chars + 49 spaces = 499 chars, one short
        assert_eq!(classifier().classify_text(&text(50, 9)), DocumentClass::Mixed);
        // 50 words of 10 chars + 49 spaces = 549 chars
        assert_eq!(classifier().classify_text(&text(50, 10)), DocumentClass::TextBased);
    }

    #[test]
    fn test_long_text_with_few_words_is_mixed() {
        assert_eq!(classifier().classify_text(&text(49, 20)), DocumentClass::Mixed);
    }

    #[test]
    fn test_mixed_thresholds() {
        // 10 words of 9 chars + 9 spaces = 99 chars
        assert_eq!(classifier().classify_text(&text(10, 9)), DocumentClass::ImageBased);
        assert_eq!(classifier().classify_text(&text(10, 10)), DocumentClass::Mixed);
        assert_eq!(classifier().classify_text(&text(9, 20)), DocumentClass::ImageBased);
    }

    #[test]
    fn test_surrounding_whitespace_not_counted() {
        let padded = format!("{}{}{}", " ".repeat(400), text(10, 5), "\n".repeat(100));
        assert_eq!(classifier().classify_text(&padded), DocumentClass::ImageBased);
    }

    #[test]
    fn test_empty_is_image_based() {
        assert_eq!(classifier().classify_text(""), DocumentClass::ImageBased);
    }

    #[tokio::test]
    async fn test_classify_samples_parser() {
        let parsers = ParserSet::new().with(ParserSlot::PdfText, Arc::new(FixedParser(text(60, 10))));
        let classifier = DocumentTypeClassifier::new(ClassifierThresholds::default(), parsers);
        let result = classifier.classify_with_sample(Arc::from(&b"%PDF"[..])).await;
        assert_eq!(result.class, DocumentClass::TextBased);
        assert!(result.sample.is_some());
    }

    #[tokio::test]
    async fn test_failure_defaults_to_mixed() {
        let parsers = ParserSet::new().with(ParserSlot::PdfText, Arc::new(BrokenParser));
        let classifier = DocumentTypeClassifier::new(ClassifierThresholds::default(), parsers);
        assert_eq!(classifier.classify(b"%PDF").await, DocumentClass::Mixed);
    }

    #[tokio::test]
    async fn test_missing_parser_defaults_to_mixed() {
        assert_eq!(classifier().classify(b"%PDF").await, DocumentClass::Mixed);
    }
}
