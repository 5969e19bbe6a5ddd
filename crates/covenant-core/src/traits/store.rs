//! Document storage trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CovenantResult;

/// Metadata of a stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: String,
    /// Original file name, including its extension.
    pub name: String,
    pub size: u64,
    /// Store-specific address of the bytes.
    pub location: String,
}

/// Resolves document ids and serves their bytes.
///
/// Implementations enforce their own access rules and report
/// [`CovenantError::NotFound`](crate::CovenantError::NotFound) or
/// [`CovenantError::AccessDenied`](crate::CovenantError::AccessDenied).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Look up a document's metadata.
    async fn locate(&self, document_id: &str) -> CovenantResult<DocumentRef>;

    /// Read a document's bytes.
    async fn fetch(&self, document: &DocumentRef) -> CovenantResult<Vec<u8>>;
}
