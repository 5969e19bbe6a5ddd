//! Schema-driven extraction of contract records.
//!
//! Extraction runs one model call per [`ComponentKind`], in pipeline order.
//! Each call's output is recovered, normalized and validated independently,
//! so a bad answer for one component only empties that component.

mod extractor;
mod normalize;
mod orchestrator;
pub mod prompts;
mod recovery;
mod schema;

pub use extractor::{ComponentValue, SchemaComponentExtractor};
pub use normalize::{normalize, normalize_basic_info, normalize_list, normalize_terms};
pub use orchestrator::{
    resolve_stage, ExtractionOrchestrator, ExtractionState, StageOutcome, StagePolicy,
};
pub use recovery::{excerpt, recover_json};
pub use schema::{strip_fields, Cardinality, ComponentKind, INFRASTRUCTURE_FIELDS};
