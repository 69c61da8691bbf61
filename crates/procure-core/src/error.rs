//! Error types for the procure-core library.

use std::time::Duration;

use thiserror::Error;

/// Main error type for the procure library.
#[derive(Error, Debug)]
pub enum ProcureError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Candidate record did not match the schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Language model call failed.
    #[error("model error: {0}")]
    Llm(#[from] LlmError),

    /// Request store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from a page.
    #[error("failed to extract text from page {page}: {reason}")]
    TextExtraction { page: u32, reason: String },

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// A candidate record failed schema validation.
///
/// Carries the offending field path (`order_lines[2].unit_price`), the
/// expected type and a short description of what was found instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation failed at {path}: expected {expected}, found {actual}")]
pub struct ValidationError {
    pub path: String,
    pub expected: String,
    pub actual: String,
}

impl ValidationError {
    pub fn new(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Errors from the text-completion service.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Missing API key or invalid settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// Connection failed or the transport gave up.
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response or an empty completion.
    #[error("API error: {0}")]
    Api(String),

    /// Response body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// No completion arrived within the configured bound.
    #[error("no completion within {0:?}")]
    Timeout(Duration),
}

/// Errors from a request store.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// No request with this id.
    #[error("request {0} not found")]
    NotFound(u64),

    /// A required field was blank on submission.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Backend failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type for the procure library.
pub type Result<T> = std::result::Result<T, ProcureError>;
