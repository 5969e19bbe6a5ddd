//! Adaptive document parsing.
//!
//! The [`ParsingStrategyEngine`] turns raw bytes into text by choosing among
//! the format parsers registered in a [`ParserSet`]. For PDFs the
//! [`DocumentTypeClassifier`] decides between the cheap text-layer parser and
//! OCR, with a fallback chain for documents that sit in between.

mod classifier;
mod engine;
mod registry;

pub use classifier::{Classification, DocumentTypeClassifier};
pub use engine::{ParsingStrategyEngine, OCR_FALLBACK, PLAIN_PRIMARY};
pub use registry::{ParserSet, ParserSlot};

use std::sync::Arc;

use crate::error::CovenantResult;
use crate::traits::{DocumentParser, ParsedSections};

/// Run a parser on its own task so a panic surfaces as a `TaskJoin` error.
pub(crate) async fn run_isolated(
    parser: Arc<dyn DocumentParser>,
    content: Arc<[u8]>,
) -> CovenantResult<ParsedSections> {
    let handle = tokio::spawn(async move { parser.parse(&content).await });
    Ok(handle.await??)
}
