//! Factory for creating a DocumentService from configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use covenant_core::error::{CovenantError, CovenantResult};
use covenant_core::{
    CovenantConfig, DocumentService, FsDocumentStore, GenerationOptions, Llm, LlmResponse, Message,
};
use covenant_extractors::ParserFactory;
use covenant_llm::LlmFactory;

/// Load configuration from an explicit file, the default user file, or the environment.
pub fn load_config(path: Option<&Path>) -> CovenantResult<CovenantConfig> {
    if let Some(path) = path {
        info!(path = %path.display(), "Loading configuration file");
        return CovenantConfig::from_file(path);
    }

    match CovenantConfig::default_path().filter(|p| p.exists()) {
        Some(path) => {
            info!(path = %path.display(), "Loading default configuration file");
            CovenantConfig::from_file(path)
        }
        None => CovenantConfig::from_env(),
    }
}

/// Create the service.
///
/// When `require_llm` is false a provider that cannot be built (usually a
/// missing API key) is replaced by one that fails every call, so parsing
/// commands work without model credentials.
pub fn create_service(
    config: CovenantConfig,
    root: impl Into<PathBuf>,
    tenant: impl Into<String>,
    require_llm: bool,
) -> CovenantResult<DocumentService> {
    let llm = match LlmFactory::create(&config.llm) {
        Ok(llm) => llm,
        Err(e) if !require_llm => {
            warn!(error = %e, "LLM provider unavailable, model commands will fail");
            Arc::new(UnavailableLlm {
                reason: e.to_string(),
            })
        }
        Err(e) => return Err(e),
    };

    let store = Arc::new(FsDocumentStore::new(root, tenant));
    let parsers = ParserFactory::default_set();

    Ok(DocumentService::new(Arc::new(config), store, parsers, llm))
}

struct UnavailableLlm {
    reason: String,
}

#[async_trait]
impl Llm for UnavailableLlm {
    async fn generate(
        &self,
        _messages: &[Message],
        _options: Option<GenerationOptions>,
    ) -> CovenantResult<LlmResponse> {
        Err(CovenantError::Configuration(self.reason.clone()))
    }

    fn model_name(&self) -> &str {
        "unavailable"
    }
}
