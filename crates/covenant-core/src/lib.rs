//! covenant-core - Core library for covenant.
//!
//! This crate provides the types, traits, parsing engine, schema-driven
//! extraction and risk assessment for contract documents. Model providers
//! live in covenant-llm and format parsers in covenant-extractors.
//!
//! # Example
//!
//! ```ignore
//! use covenant_core::{CovenantConfig, DocumentService, FsDocumentStore, ParseFlags, ParseStrategy};
//!
//! let config = Arc::new(CovenantConfig::from_env()?);
//! let store = Arc::new(FsDocumentStore::new("./documents", "tenant-a"));
//! let service = DocumentService::new(config, store, parsers, llm);
//!
//! // Parse a stored document
//! let parsed = service.parse_document("lease.pdf", ParseStrategy::Auto, ParseFlags::default()).await?;
//!
//! // Extract a record and assess it
//! let record = service.extract_structured_record(&parsed.content, ExtractionDepth::Basic).await?;
//! let assessment = service.assess_risks(&record, AnalysisDepth::Basic).await;
//! ```

pub mod config;
pub mod error;
pub mod extraction;
pub mod parsing;
pub mod risk;
pub mod service;
pub mod store;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{CovenantConfig, GenerationSettings, LlmProvider, LlmProviderConfig, ParsingConfig};
pub use error::{CovenantError, CovenantResult, ErrorCode};
pub use extraction::{ComponentKind, ExtractionOrchestrator, SchemaComponentExtractor};
pub use parsing::{DocumentTypeClassifier, ParserSet, ParserSlot, ParsingStrategyEngine};
pub use risk::RiskAssessmentEngine;
pub use service::DocumentService;
pub use store::{FsDocumentStore, InMemoryDocumentStore};
pub use traits::{
    DocumentParser, DocumentRef, DocumentStore, GenerationOptions, Llm, LlmConfig, LlmResponse,
    ParsedSections,
};
pub use types::{
    AnalysisDepth, BasicInfo, BatchOutcome, ContractRecord, DocumentClass, ExtractionDepth,
    FileKind, Message, MessageRole, ParseFlags, ParseOutcome, ParseRequest, ParseStrategy,
    ParsedDocument, Party, RiskAssessment, RiskItem, RiskLevel, Subject, Term, Terms,
};
