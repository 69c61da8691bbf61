//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::procurement::{FALLBACK_DEPARTMENT, FALLBACK_REQUESTOR};

/// Main configuration for the procure pipeline.
///
/// Read once at startup and shared read-only by every extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcureConfig {
    /// Language model configuration.
    pub llm: LlmConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Language model service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier sent with every request.
    pub model: String,

    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Upper bound on a single completion call, in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.0,
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    /// Completion timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Pages read from the front of the document.
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self { max_pages: 3 }
    }
}

/// Extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Document text is cut to this many characters before prompting.
    pub max_input_chars: usize,

    /// Requestor when the document names none.
    pub fallback_requestor: String,

    /// Department when the document names none.
    pub fallback_department: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_input_chars: 12_000,
            fallback_requestor: FALLBACK_REQUESTOR.to_string(),
            fallback_department: FALLBACK_DEPARTMENT.to_string(),
        }
    }
}

impl ProcureConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
