//! Procurement field extraction from document text.

mod orchestrator;
pub mod prompt;
pub mod repair;
pub mod rules;
pub mod schema;

pub use orchestrator::ExtractionOrchestrator;
pub use prompt::PromptContract;

use serde::{Deserialize, Serialize};

use crate::models::procurement::Record;

/// Which recovery stage produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStage {
    /// Model output passed strict validation.
    Validated,
    /// Model output was an object but needed key repair; types unchecked.
    Repaired,
    /// Nothing usable came back; the fixed minimal record.
    Defaulted,
}

impl ExtractionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStage::Validated => "validated",
            ExtractionStage::Repaired => "repaired",
            ExtractionStage::Defaulted => "defaulted",
        }
    }
}

impl std::fmt::Display for ExtractionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// The record handed to the caller.
    pub record: Record,
    /// Stage that produced it.
    pub stage: ExtractionStage,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}
