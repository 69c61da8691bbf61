//! Core library for procurement request intake.
//!
//! This crate provides:
//! - PDF text extraction (first pages only)
//! - Vendor-offer field extraction through a language model, with staged
//!   recovery (validate, repair, default)
//! - Procurement record models and the commodity-group vocabulary
//! - Request storage with a status audit trail

pub mod error;
pub mod extraction;
pub mod intake;
pub mod llm;
pub mod models;
pub mod pdf;
pub mod store;

pub use error::{ProcureError, Result};
pub use extraction::{Extraction, ExtractionOrchestrator, ExtractionStage};
pub use intake::{Intake, Prefill, confirm, form_defaults, validate_form};
pub use llm::{CompletionModel, CompletionRequest, OpenAiModel};
pub use models::config::ProcureConfig;
pub use models::procurement::{OrderLine, ProcurementData, Record};
pub use models::request::{ProcurementRequest, RequestStatus, StatusChange};
pub use pdf::{DocumentTextExtractor, PdfProcessor};
pub use store::{MemoryStore, RequestStore};
