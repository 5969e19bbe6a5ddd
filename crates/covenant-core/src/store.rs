//! Document store implementations.
//!
//! Both stores scope reads to one tenant: documents owned by another
//! tenant are reported as [`CovenantError::AccessDenied`].

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{CovenantError, CovenantResult};
use crate::traits::{DocumentRef, DocumentStore};

struct StoredDocument {
    tenant: String,
    name: String,
    bytes: Vec<u8>,
}

/// In-memory document store.
pub struct InMemoryDocumentStore {
    tenant: String,
    documents: RwLock<HashMap<String, StoredDocument>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store reading as `tenant`.
    pub fn new(tenant: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Add a document owned by the reading tenant.
    pub async fn insert(&self, id: impl Into<String>, name: impl Into<String>, bytes: Vec<u8>) {
        let tenant = self.tenant.clone();
        self.insert_for(tenant, id, name, bytes).await;
    }

    /// Add a document owned by any tenant.
    pub async fn insert_for(
        &self,
        tenant: impl Into<String>,
        id: impl Into<String>,
        name: impl Into<String>,
        bytes: Vec<u8>,
    ) {
        let mut documents = self.documents.write().await;
        documents.insert(
            id.into(),
            StoredDocument {
                tenant: tenant.into(),
                name: name.into(),
                bytes,
            },
        );
    }

    /// Number of stored documents across all tenants.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn locate(&self, document_id: &str) -> CovenantResult<DocumentRef> {
        let documents = self.documents.read().await;
        let doc = documents
            .get(document_id)
            .ok_or_else(|| CovenantError::not_found(document_id))?;
        if doc.tenant != self.tenant {
            warn!(document_id, tenant = %self.tenant, "Document belongs to another tenant");
            return Err(CovenantError::access_denied(document_id));
        }
        Ok(DocumentRef {
            id: document_id.to_string(),
            name: doc.name.clone(),
            size: doc.bytes.len() as u64,
            location: document_id.to_string(),
        })
    }

    async fn fetch(&self, document: &DocumentRef) -> CovenantResult<Vec<u8>> {
        let documents = self.documents.read().await;
        documents
            .get(&document.location)
            .map(|doc| doc.bytes.clone())
            .ok_or_else(|| CovenantError::not_found(&document.id))
    }
}

/// Directory-backed document store.
///
/// Layout is `<root>/<tenant>/<document id>`, where the id is a relative
/// path and the file name is its last component.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
    tenant: String,
}

impl FsDocumentStore {
    /// Create a store over `root` reading as `tenant`.
    pub fn new(root: impl Into<PathBuf>, tenant: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            tenant: tenant.into(),
        }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reject ids that would escape a tenant directory.
    fn relative(document_id: &str) -> CovenantResult<PathBuf> {
        let path = PathBuf::from(document_id);
        let normal = !document_id.is_empty()
            && path.components().all(|c| matches!(c, Component::Normal(_)));
        if normal {
            Ok(path)
        } else {
            Err(CovenantError::validation_with_suggestion(
                format!("Invalid document id '{}'", document_id),
                "Use a path relative to the tenant directory",
            ))
        }
    }

    /// Whether another tenant directory holds the id.
    async fn owned_elsewhere(&self, relative: &Path) -> CovenantResult<bool> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_name().to_string_lossy() == self.tenant {
                continue;
            }
            if tokio::fs::metadata(entry.path().join(relative))
                .await
                .map(|m| m.is_file())
                .unwrap_or(false)
            {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn locate(&self, document_id: &str) -> CovenantResult<DocumentRef> {
        let relative = Self::relative(document_id)?;
        let path = self.root.join(&self.tenant).join(&relative);

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {
                let name = relative
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| document_id.to_string());
                debug!(document_id, path = %path.display(), "Located document");
                Ok(DocumentRef {
                    id: document_id.to_string(),
                    name,
                    size: meta.len(),
                    location: path.to_string_lossy().into_owned(),
                })
            }
            Ok(_) => Err(CovenantError::not_found(document_id)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if self.owned_elsewhere(&relative).await? {
                    warn!(document_id, tenant = %self.tenant, "Document belongs to another tenant");
                    Err(CovenantError::access_denied(document_id))
                } else {
                    Err(CovenantError::not_found(document_id))
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn fetch(&self, document: &DocumentRef) -> CovenantResult<Vec<u8>> {
        tokio::fs::read(&document.location).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CovenantError::not_found(&document.id)
            } else {
                e.into()
            }
        })
    }
}
