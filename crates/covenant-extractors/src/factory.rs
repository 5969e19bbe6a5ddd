//! Factory for building the parser set used by the parsing engine.

use std::sync::Arc;

use covenant_core::{ParserSet, ParserSlot};

use crate::text::TextParser;

#[cfg(feature = "docx")]
use crate::docx::DocxParser;
#[cfg(feature = "html")]
use crate::html::HtmlParser;
#[cfg(feature = "ocr")]
use crate::ocr::OcrPdfParser;
#[cfg(feature = "pdf")]
use crate::pdf::PdfTextParser;
#[cfg(feature = "spreadsheet")]
use crate::spreadsheet::SpreadsheetParser;

/// Factory for creating parsers.
///
/// Slots whose feature is disabled stay empty, so the engine reports those
/// documents as failed parses instead of panicking.
pub struct ParserFactory;

impl ParserFactory {
    /// Every parser compiled into this build.
    pub fn default_set() -> ParserSet {
        Self::with_ocr_languages(None)
    }

    /// Every parser compiled into this build, with custom OCR languages.
    pub fn with_ocr_languages(languages: Option<&str>) -> ParserSet {
        let mut set = ParserSet::new().with(ParserSlot::PlainText, Arc::new(TextParser::new()));

        #[cfg(feature = "pdf")]
        set.insert(ParserSlot::PdfText, Arc::new(PdfTextParser::new()));

        #[cfg(feature = "ocr")]
        {
            let mut ocr = OcrPdfParser::new();
            if let Some(languages) = languages {
                ocr = ocr.with_languages(languages);
            }
            set.insert(ParserSlot::PdfOcr, Arc::new(ocr));
        }
        #[cfg(not(feature = "ocr"))]
        let _ = languages;

        #[cfg(feature = "docx")]
        set.insert(ParserSlot::WordProcessor, Arc::new(DocxParser::new()));

        #[cfg(feature = "spreadsheet")]
        set.insert(ParserSlot::Spreadsheet, Arc::new(SpreadsheetParser::new()));

        #[cfg(feature = "html")]
        set.insert(ParserSlot::Html, Arc::new(HtmlParser::new()));

        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use covenant_core::DocumentParser;

    #[test]
    fn test_default_set_slots() {
        let set = ParserFactory::default_set();

        assert!(set.get(ParserSlot::PlainText).is_some());
        #[cfg(feature = "pdf")]
        assert_eq!(set.get(ParserSlot::PdfText).unwrap().name(), "pdf-extract");
        #[cfg(feature = "docx")]
        assert!(set.get(ParserSlot::WordProcessor).is_some());
        #[cfg(not(feature = "ocr"))]
        assert!(set.get(ParserSlot::PdfOcr).is_none());
    }
}
