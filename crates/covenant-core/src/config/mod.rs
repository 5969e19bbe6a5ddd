//! Configuration system for covenant.
//!
//! A [`CovenantConfig`] is built once (from defaults, a file or the
//! environment) and then shared read-only, usually behind an `Arc`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CovenantError, CovenantResult};
use crate::traits::{GenerationOptions, LlmConfig};
use crate::types::{FileKind, ParseStrategy};

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAI,
    Anthropic,
    Ollama,
}

impl std::str::FromStr for LlmProvider {
    type Err = CovenantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            other => Err(CovenantError::UnsupportedProvider {
                provider: other.to_string(),
            }),
        }
    }
}

/// Provider configuration with type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmProviderConfig {
    /// Provider type.
    pub provider: LlmProvider,
    /// Provider-specific configuration.
    #[serde(flatten)]
    pub config: LlmConfig,
}

impl Default for LlmProviderConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAI,
            config: LlmConfig {
                model: "gpt-4o-mini".to_string(),
                ..Default::default()
            },
        }
    }
}

/// Length and word-count floors used to classify PDFs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    pub text_min_chars: usize,
    pub text_min_words: usize,
    pub mixed_min_chars: usize,
    pub mixed_min_words: usize,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            text_min_chars: 500,
            text_min_words: 50,
            mixed_min_chars: 100,
            mixed_min_words: 10,
        }
    }
}

/// Parsing engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    pub classifier: ClassifierThresholds,
    /// Below this trimmed length the lightweight result of a mixed PDF is
    /// challenged by OCR.
    pub fallback_min_chars: usize,
    /// Accepted file extensions, lowercase with leading dot.
    pub supported_formats: Vec<String>,
    /// Strategies callers may request.
    pub strategies: Vec<ParseStrategy>,
    pub max_batch_size: usize,
    pub preview_length: usize,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierThresholds::default(),
            fallback_min_chars: 200,
            supported_formats: [".pdf", ".docx", ".doc", ".xlsx", ".xls", ".txt", ".html", ".htm"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            strategies: ParseStrategy::ALL.to_vec(),
            max_batch_size: 50,
            preview_length: 1000,
        }
    }
}

impl ParsingConfig {
    /// Whether the extension is accepted.
    pub fn supports_extension(&self, extension: &str) -> bool {
        self.supported_formats.iter().any(|f| f == extension)
    }
}

/// Settings for one kind of model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Response language code, e.g. `zh-CN` or `en`.
    pub language: String,
    /// Characters of an unparseable response kept in logs.
    pub log_excerpt_chars: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: 4096,
            language: "zh-CN".to_string(),
            log_excerpt_chars: 200,
        }
    }
}

impl GenerationSettings {
    /// Generation options for a model call.
    pub fn options(&self) -> GenerationOptions {
        GenerationOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
            ..Default::default()
        }
    }
}

/// Main covenant configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CovenantConfig {
    /// Parsing engine configuration.
    pub parsing: ParsingConfig,
    /// Component extraction model settings.
    pub extraction: GenerationSettings,
    /// Risk analysis model settings.
    pub risk: GenerationSettings,
    /// LLM configuration.
    pub llm: LlmProviderConfig,
}

impl CovenantConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> CovenantResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| CovenantError::Configuration(e.to_string()))?
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| CovenantError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| CovenantError::Configuration(e.to_string()))?,
            _ => {
                return Err(CovenantError::Configuration(
                    "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> CovenantResult<Self> {
        let mut config = Self::default();

        // LLM configuration
        if let Ok(provider) = std::env::var("COVENANT_LLM_PROVIDER") {
            config.llm.provider = provider.parse()?;
        }
        if let Ok(model) = std::env::var("COVENANT_LLM_MODEL") {
            config.llm.config.model = model;
        }
        if let Ok(base_url) = std::env::var("COVENANT_LLM_BASE_URL") {
            config.llm.config.base_url = Some(base_url);
        }
        let key_var = match config.llm.provider {
            LlmProvider::OpenAI => Some("OPENAI_API_KEY"),
            LlmProvider::Anthropic => Some("ANTHROPIC_API_KEY"),
            LlmProvider::Ollama => None,
        };
        if let Some(api_key) = key_var.and_then(|v| std::env::var(v).ok()) {
            config.llm.config.api_key = Some(api_key);
        }

        // Response language applies to both kinds of model call
        if let Ok(language) = std::env::var("COVENANT_LANGUAGE") {
            config.extraction.language = language.clone();
            config.risk.language = language;
        }

        if let Ok(size) = std::env::var("COVENANT_MAX_BATCH_SIZE") {
            config.parsing.max_batch_size = size.parse().map_err(|_| {
                CovenantError::Configuration(format!("Invalid COVENANT_MAX_BATCH_SIZE: {}", size))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Default location of the user config file.
    pub fn default_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|d| d.join("covenant").join("config.toml"))
    }

    /// Reject internally inconsistent settings.
    pub fn validate(&self) -> CovenantResult<()> {
        let c = &self.parsing.classifier;
        if c.mixed_min_chars > c.text_min_chars || c.mixed_min_words > c.text_min_words {
            return Err(CovenantError::Configuration(
                "Classifier mixed thresholds must not exceed text thresholds".to_string(),
            ));
        }
        if self.parsing.max_batch_size == 0 {
            return Err(CovenantError::Configuration(
                "max_batch_size must be at least 1".to_string(),
            ));
        }
        if let Some(unknown) = self
            .parsing
            .supported_formats
            .iter()
            .find(|f| FileKind::from_extension(f).is_none())
        {
            return Err(CovenantError::Configuration(format!(
                "No parser exists for format '{}'",
                unknown
            )));
        }
        if self.parsing.strategies.is_empty() {
            return Err(CovenantError::Configuration(
                "At least one parse strategy must be enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> CovenantConfigBuilder {
        CovenantConfigBuilder::default()
    }
}

/// Builder for CovenantConfig.
#[derive(Default)]
pub struct CovenantConfigBuilder {
    config: CovenantConfig,
}

impl CovenantConfigBuilder {
    /// Set LLM configuration.
    pub fn llm(mut self, config: LlmProviderConfig) -> Self {
        self.config.llm = config;
        self
    }

    /// Set parsing configuration.
    pub fn parsing(mut self, config: ParsingConfig) -> Self {
        self.config.parsing = config;
        self
    }

    /// Set the response language for extraction and risk analysis.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        self.config.extraction.language = language.clone();
        self.config.risk.language = language;
        self
    }

    /// Set the maximum batch size.
    pub fn max_batch_size(mut self, size: usize) -> Self {
        self.config.parsing.max_batch_size = size;
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> CovenantResult<CovenantConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
