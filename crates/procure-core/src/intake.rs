//! Upload pre-fill and confirmation of procurement requests.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Result, ValidationError};
use crate::extraction::{ExtractionOrchestrator, ExtractionStage, schema};
use crate::models::config::{ExtractionConfig, ProcureConfig};
use crate::models::procurement::{ProcurementData, Record};
use crate::models::request::ProcurementRequest;
use crate::pdf::DocumentTextExtractor;
use crate::store::RequestStore;

/// Empty form shown before an offer is uploaded.
pub fn form_defaults(config: &ExtractionConfig) -> Record {
    let mut defaults = Record::new();
    defaults.insert("requestor_name".into(), Value::from(config.fallback_requestor.as_str()));
    defaults.insert("title".into(), Value::from(""));
    defaults.insert("vendor_name".into(), Value::from(""));
    defaults.insert("vat_id".into(), Value::from(""));
    defaults.insert("total_cost".into(), Value::from(0.0));
    defaults.insert("department".into(), Value::from(config.fallback_department.as_str()));
    defaults.insert("order_lines".into(), Value::Array(Vec::new()));
    defaults.insert("commodity_group".into(), Value::from(""));
    defaults
}

/// Pre-filled form data for one upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Prefill {
    /// Form defaults with the extracted record merged over them.
    pub record: Record,
    /// Stage that produced the extracted record; `None` when the document
    /// had no text and the model was never asked.
    pub stage: Option<ExtractionStage>,
    /// Document text the extraction ran on.
    pub text: String,
}

/// Document-to-form pipeline.
pub struct Intake {
    text_extractor: DocumentTextExtractor,
    orchestrator: Arc<ExtractionOrchestrator>,
}

impl Intake {
    pub fn new(orchestrator: Arc<ExtractionOrchestrator>, config: &ProcureConfig) -> Self {
        Self {
            text_extractor: DocumentTextExtractor::new(config.pdf.max_pages),
            orchestrator,
        }
    }

    /// Extract the document text only.
    pub fn document_text(&self, bytes: &[u8]) -> String {
        self.text_extractor.extract(bytes)
    }

    /// Run the upload flow: bytes to text, text to record, record over `defaults`.
    ///
    /// A document without text returns `defaults` unchanged.
    pub async fn prefill(&self, bytes: &[u8], defaults: &Record) -> Prefill {
        let text = self.document_text(bytes);
        if text.is_empty() {
            info!("No text in document, keeping form defaults");
            return Prefill {
                record: defaults.clone(),
                stage: None,
                text,
            };
        }

        let extraction = self.orchestrator.extract(&text).await;
        info!(
            stage = %extraction.stage,
            time_ms = extraction.processing_time_ms,
            "Extraction finished"
        );

        let mut record = defaults.clone();
        record.extend(extraction.record);

        Prefill {
            record,
            stage: Some(extraction.stage),
            text,
        }
    }
}

/// Validate a reviewed form record.
///
/// An empty `commodity_group` means none was chosen.
pub fn validate_form(form: &Record) -> std::result::Result<ProcurementData, ValidationError> {
    let mut form = form.clone();
    if matches!(form.get("commodity_group"), Some(Value::String(s)) if s.is_empty()) {
        form.remove("commodity_group");
    }
    schema::validate(&Value::Object(form))
}

/// Validate a reviewed form record and persist it as a new request.
pub fn confirm<S: RequestStore + ?Sized>(store: &mut S, form: &Record) -> Result<ProcurementRequest> {
    let data = validate_form(form)?;
    debug!(lines = data.order_lines.len(), "Form validated");
    for issue in data.consistency_issues() {
        debug!(issue = %issue, "Consistency warning");
    }

    Ok(store.create(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProcureError, StoreError};
    use crate::llm::{self, CompletionModel, CompletionRequest};
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use crate::pdf::fixtures::pdf_with_pages;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedModel {
        response: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionModel for FixedModel {
        async fn complete(&self, _request: &CompletionRequest) -> llm::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.to_string())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    fn intake(response: &'static str) -> (Intake, Arc<FixedModel>) {
        let config = ProcureConfig::default();
        let model = Arc::new(FixedModel {
            response,
            calls: AtomicUsize::new(0),
        });
        let orchestrator = Arc::new(ExtractionOrchestrator::new(model.clone(), &config));
        (Intake::new(orchestrator, &config), model)
    }

    fn form() -> Record {
        let mut form = form_defaults(&ExtractionConfig::default());
        form.insert("title".into(), json!("Adobe licenses"));
        form.insert("vendor_name".into(), json!("Global Tech Solutions"));
        form.insert("vat_id".into(), json!("DE987654321"));
        form.insert("total_cost".into(), json!("1500"));
        form.insert("extracted_description_text".into(), json!("10 licenses"));
        form
    }

    #[test]
    fn test_form_defaults() {
        let defaults = form_defaults(&ExtractionConfig::default());
        assert_eq!(
            Value::Object(defaults),
            json!({
                "requestor_name": "Vladimir Keil",
                "title": "",
                "vendor_name": "",
                "vat_id": "",
                "total_cost": 0.0,
                "department": "Operations",
                "order_lines": [],
                "commodity_group": ""
            })
        );
    }

    #[tokio::test]
    async fn test_unreadable_document_keeps_defaults() {
        let (intake, model) = intake("{}");
        let defaults = form_defaults(&ExtractionConfig::default());

        let prefill = intake.prefill(b"not a pdf", &defaults).await;
        assert_eq!(prefill.record, defaults);
        assert_eq!(prefill.stage, None);
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_prefill_merges_over_defaults() {
        let (intake, model) = intake(r#"{"title": "Chairs", "items": [{"item": "Chair", "price": 10, "quantity": 2, "unit": "pcs", "total": 20}]}"#);
        let defaults = form_defaults(&ExtractionConfig::default());

        let prefill = intake.prefill(&pdf_with_pages(&["Offer: 2 chairs"]), &defaults).await;
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        assert_eq!(prefill.stage, Some(ExtractionStage::Repaired));
        assert!(prefill.text.contains("Offer: 2 chairs"));

        assert_eq!(prefill.record["title"], json!("Chairs"));
        assert_eq!(prefill.record["order_lines"][0]["description"], json!("Chair"));
        // Keys the model did not return keep their defaults.
        assert_eq!(prefill.record["requestor_name"], json!("Vladimir Keil"));
        assert_eq!(prefill.record["commodity_group"], json!(""));
    }

    #[test]
    fn test_confirm_persists_open_request() {
        let mut store = MemoryStore::new();
        let request = confirm(&mut store, &form()).unwrap();

        assert_eq!(request.request_id, 1);
        assert_eq!(request.data.total_cost, 1500.0);
        assert_eq!(request.data.commodity_group, None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_confirm_rejects_invalid_form() {
        let mut store = MemoryStore::new();

        let mut bad_group = form();
        bad_group.insert("commodity_group".into(), json!("Gadgets"));
        assert!(matches!(
            confirm(&mut store, &bad_group),
            Err(ProcureError::Validation(_))
        ));

        let mut blank_title = form();
        blank_title.insert("title".into(), json!(""));
        assert!(matches!(
            confirm(&mut store, &blank_title),
            Err(ProcureError::Store(StoreError::MissingField("title")))
        ));
        assert!(store.is_empty());
    }
}
