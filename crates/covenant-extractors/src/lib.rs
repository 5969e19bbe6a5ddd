//! covenant-extractors - Format parsers for covenant.
//!
//! Every parser implements [`covenant_core::DocumentParser`], turning file
//! bytes into ordered text segments. [`ParserFactory`] assembles them into
//! the [`covenant_core::ParserSet`] the parsing engine consumes.
//!
//! # Features
//!
//! - `pdf` (default) - PDF text layer via pdf-extract
//! - `docx` (default) - DOCX text and tables via docx-rs
//! - `spreadsheet` (default) - xlsx/xls/ods via calamine
//! - `html` (default) - HTML text via scraper
//! - `ocr` - scanned PDF recognition via lopdf and Tesseract (requires tesseract installed)
//! - `full` - All parsers
//!
//! # Example
//!
//! ```ignore
//! use covenant_extractors::ParserFactory;
//!
//! let parsers = ParserFactory::default_set();
//! let service = DocumentService::new(config, store, parsers, llm);
//! ```

mod error;
mod factory;
mod text;

#[cfg(feature = "pdf")]
mod pdf;

#[cfg(feature = "docx")]
mod docx;

#[cfg(feature = "spreadsheet")]
mod spreadsheet;

#[cfg(feature = "html")]
mod html;

#[cfg(feature = "ocr")]
pub mod ocr;

#[cfg(test)]
mod test_support;

pub use error::{ExtractError, ExtractResult};
pub use factory::ParserFactory;
pub use text::TextParser;

#[cfg(feature = "pdf")]
pub use pdf::PdfTextParser;

#[cfg(feature = "docx")]
pub use docx::DocxParser;

#[cfg(feature = "spreadsheet")]
pub use spreadsheet::SpreadsheetParser;

#[cfg(feature = "html")]
pub use html::HtmlParser;

#[cfg(feature = "ocr")]
pub use ocr::OcrPdfParser;
