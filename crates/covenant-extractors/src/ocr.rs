//! OCR for scanned PDFs.
//!
//! Page images are pulled out of the PDF with lopdf, decoded with the image
//! crate and recognised with Tesseract (which must be installed). Only
//! images stored in a self-describing encoding (JPEG, PNG and friends) can
//! be decoded; raw pixel streams are skipped.

use async_trait::async_trait;
use rusty_tesseract::{Args, Image};
use tracing::{debug, warn};

use covenant_core::{CovenantResult, DocumentParser, ParsedSections};

use crate::error::ExtractError;

/// Tesseract languages used when none are configured.
pub const DEFAULT_LANGUAGES: &str = "chi_sim+eng";

/// Scanned-PDF parser. One segment per page.
#[derive(Debug, Clone)]
pub struct OcrPdfParser {
    languages: String,
    dpi: Option<i32>,
}

impl Default for OcrPdfParser {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrPdfParser {
    /// Create a new OCR parser with the default languages.
    pub fn new() -> Self {
        Self {
            languages: DEFAULT_LANGUAGES.to_string(),
            dpi: Some(300),
        }
    }

    /// Set the Tesseract language list, e.g. `eng` or `chi_sim+eng`.
    pub fn with_languages(mut self, languages: impl Into<String>) -> Self {
        self.languages = languages.into();
        self
    }

    /// Set the resolution hint passed to Tesseract.
    pub fn with_dpi(mut self, dpi: i32) -> Self {
        self.dpi = Some(dpi);
        self
    }

    fn args(&self) -> Args {
        Args {
            lang: self.languages.clone(),
            dpi: self.dpi,
            ..Default::default()
        }
    }

    /// Extract and recognise page images synchronously (called within spawn_blocking).
    fn extract_sync(content: Vec<u8>, args: Args) -> Result<Vec<String>, ExtractError> {
        let document = lopdf::Document::load_mem(&content)
            .map_err(|e| ExtractError::Pdf(format!("Failed to load PDF: {}", e)))?;

        let mut pages = Vec::new();
        for (number, page_id) in document.get_pages() {
            let images = match document.get_page_images(page_id) {
                Ok(images) => images,
                Err(e) => {
                    warn!(page = number, error = %e, "Could not list page images");
                    pages.push(String::new());
                    continue;
                }
            };

            let mut page_text = Vec::new();
            for pdf_image in images {
                if let Some(text) = Self::recognise(pdf_image.content, &args) {
                    page_text.push(text.trim().to_string());
                }
            }
            pages.push(page_text.join("\n"));
        }

        Ok(pages)
    }

    /// Run Tesseract on one encoded image. Undecodable images yield `None`.
    fn recognise(encoded: &[u8], args: &Args) -> Option<String> {
        let img = image::load_from_memory(encoded).ok()?;

        // Convert to grayscale format Tesseract expects
        let gray = image::DynamicImage::ImageLuma8(img.to_luma8());
        let tesseract_image = Image::from_dynamic_image(&gray).ok()?;

        match rusty_tesseract::image_to_string(&tesseract_image, args) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(error = %e, "Tesseract failed on page image");
                None
            }
        }
    }
}

#[async_trait]
impl DocumentParser for OcrPdfParser {
    async fn parse(&self, content: &[u8]) -> CovenantResult<ParsedSections> {
        let content = content.to_vec();
        let args = self.args();

        let pages = tokio::task::spawn_blocking(move || Self::extract_sync(content, args))
            .await
            .map_err(ExtractError::from)??;

        if pages.iter().all(|p| p.trim().is_empty()) {
            return Err(ExtractError::Ocr("No text recognised on any page".to_string()).into());
        }

        debug!(pages = pages.len(), languages = %self.languages, "OCR finished");
        Ok(ParsedSections::from_segments(pages))
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}
