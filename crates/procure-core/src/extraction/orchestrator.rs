//! Model call and staged recovery: validate, then repair, then default.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::prompt::PromptContract;
use super::rules::strip_code_fences;
use super::{Extraction, ExtractionStage, repair, schema};
use crate::error::LlmError;
use crate::llm::{CompletionModel, CompletionRequest};
use crate::models::config::ProcureConfig;
use crate::models::procurement::{ProcurementData, Record};

/// Turns document text into a procurement record. Never fails outwardly.
///
/// Holds only read-only state, so one instance can be shared behind an
/// `Arc` by concurrent uploads.
pub struct ExtractionOrchestrator {
    model: Arc<dyn CompletionModel>,
    prompt: PromptContract,
    temperature: f32,
    timeout: Duration,
    fallback_requestor: String,
    fallback_department: String,
}

/// Recovery state machine.
enum Stage {
    Validating(String),
    Repairing(String),
    Defaulting,
    Done(Record, ExtractionStage),
}

impl ExtractionOrchestrator {
    pub fn new(model: Arc<dyn CompletionModel>, config: &ProcureConfig) -> Self {
        Self {
            model,
            prompt: PromptContract::new(&config.extraction),
            temperature: config.llm.temperature,
            timeout: config.llm.timeout(),
            fallback_requestor: config.extraction.fallback_requestor.clone(),
            fallback_department: config.extraction.fallback_department.clone(),
        }
    }

    /// Set the bound on a single model call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Extract a record, reporting which stage produced it.
    pub async fn extract(&self, text: &str) -> Extraction {
        let start = Instant::now();

        let mut stage = if text.trim().is_empty() {
            debug!("No document text, skipping model call");
            Stage::Defaulting
        } else {
            info!(
                model = self.model.model_name(),
                chars = text.chars().count(),
                "Requesting extraction"
            );
            match self.call_model(text).await {
                Ok(response) => Stage::Validating(strip_code_fences(&response).to_string()),
                Err(e) => {
                    warn!(error = %e, "Model call failed");
                    Stage::Defaulting
                }
            }
        };

        loop {
            stage = match stage {
                Stage::Validating(payload) => self.validating(payload),
                Stage::Repairing(payload) => self.repairing(&payload),
                Stage::Defaulting => self.defaulting(),
                Stage::Done(record, stage) => {
                    return Extraction {
                        record,
                        stage,
                        processing_time_ms: start.elapsed().as_millis() as u64,
                    };
                }
            };
        }
    }

    /// Extract a record.
    pub async fn extract_from_text(&self, text: &str) -> Record {
        self.extract(text).await.record
    }

    async fn call_model(&self, text: &str) -> Result<String, LlmError> {
        let request = CompletionRequest::new(self.prompt.system(), self.prompt.user_message(text))
            .with_temperature(self.temperature);

        match tokio::time::timeout(self.timeout, self.model.complete(&request)).await {
            Ok(result) => {
                let response = result?;
                debug!(len = response.len(), "Received completion");
                Ok(response)
            }
            Err(_) => Err(LlmError::Timeout(self.timeout)),
        }
    }

    fn validating(&self, payload: String) -> Stage {
        let validated = schema::parse(&payload).and_then(|candidate| {
            schema::validate_with_defaults(
                &candidate,
                &self.fallback_requestor,
                &self.fallback_department,
            )
        });
        match validated {
            Ok(data) => {
                debug!("Validation succeeded");
                Stage::Done(data.to_record(), ExtractionStage::Validated)
            }
            Err(e) => {
                warn!(error = %e, "Validation failed, attempting repair");
                Stage::Repairing(payload)
            }
        }
    }

    fn repairing(&self, payload: &str) -> Stage {
        match repair::repair(payload) {
            Ok(record) => {
                debug!(keys = record.len(), "Repaired model output");
                Stage::Done(record, ExtractionStage::Repaired)
            }
            Err(e) => {
                warn!(error = %e, "Repair failed, using default record");
                Stage::Defaulting
            }
        }
    }

    fn defaulting(&self) -> Stage {
        let data =
            ProcurementData::extraction_error(&self.fallback_requestor, &self.fallback_department);
        Stage::Done(data.to_record(), ExtractionStage::Defaulted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted model double.
    struct ScriptedModel {
        response: std::result::Result<String, String>,
        delay: Option<Duration>,
        calls: AtomicUsize,
        last_request: Mutex<Option<CompletionRequest>>,
    }

    impl ScriptedModel {
        fn replying(response: &str) -> Self {
            Self {
                response: Ok(response.to_string()),
                delay: None,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                response: Err(reason.to_string()),
                ..Self::replying("")
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionModel for ScriptedModel {
        async fn complete(&self, request: &CompletionRequest) -> llm::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.response.clone().map_err(LlmError::Network)
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn orchestrator(model: Arc<ScriptedModel>) -> ExtractionOrchestrator {
        ExtractionOrchestrator::new(model, &ProcureConfig::default())
    }

    fn extraction_error_record() -> Value {
        json!({
            "requestor_name": "Vladimir Keil",
            "title": "Extraction Error",
            "vendor_name": "Unknown",
            "vat_id": "N/A",
            "total_cost": 0.0,
            "department": "Operations",
            "extracted_description_text": "",
            "order_lines": []
        })
    }

    const VALID: &str = r#"{
        "requestor_name": "Jane Roe",
        "title": "Monitors",
        "vendor_name": "Screens GmbH",
        "vat_id": "DE123456789",
        "total_cost": "1.759,01",
        "department": "IT",
        "extracted_description_text": "3x 27 inch monitor",
        "commodity_group": "Hardware",
        "order_lines": [
            {"description": "27 inch monitor", "unit_price": 586.34, "amount": 3, "unit": "pcs", "total_price": 1759.01}
        ]
    }"#;

    #[tokio::test]
    async fn test_valid_response() {
        let model = Arc::new(ScriptedModel::replying(VALID));
        let extraction = orchestrator(model.clone()).extract("Offer text").await;

        assert_eq!(extraction.stage, ExtractionStage::Validated);
        assert_eq!(extraction.record["total_cost"], json!(1759.01));
        assert_eq!(extraction.record["order_lines"][0]["amount"], json!(3.0));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_fenced_response_matches_unwrapped() {
        let plain = orchestrator(Arc::new(ScriptedModel::replying(VALID)))
            .extract("Offer text")
            .await;
        let fenced = orchestrator(Arc::new(ScriptedModel::replying(&format!(
            "```json\n{}\n```",
            VALID
        ))))
        .extract("Offer text")
        .await;

        assert_eq!(fenced.stage, ExtractionStage::Validated);
        assert_eq!(fenced.record, plain.record);
    }

    #[tokio::test]
    async fn test_repair_path() {
        let response = r#"{"title": "Chairs", "items": [{"item": "Chair", "price": "120", "quantity": 4, "unit": "pcs", "total": 480}]}"#;
        let extraction = orchestrator(Arc::new(ScriptedModel::replying(response)))
            .extract("Offer text")
            .await;

        assert_eq!(extraction.stage, ExtractionStage::Repaired);
        assert_eq!(
            Value::Object(extraction.record),
            json!({
                "title": "Chairs",
                "order_lines": [
                    {"description": "Chair", "unit_price": "120", "amount": 4, "unit": "pcs", "total_price": 480}
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_total_failure_yields_default() {
        let extraction = orchestrator(Arc::new(ScriptedModel::replying("I cannot help with that.")))
            .extract("Offer text")
            .await;

        assert_eq!(extraction.stage, ExtractionStage::Defaulted);
        assert_eq!(Value::Object(extraction.record), extraction_error_record());
    }

    #[tokio::test]
    async fn test_transport_failure_yields_default() {
        let record = orchestrator(Arc::new(ScriptedModel::failing("connection refused")))
            .extract_from_text("Offer text")
            .await;
        assert_eq!(Value::Object(record), extraction_error_record());
    }

    #[tokio::test]
    async fn test_timeout_yields_default() {
        let model =
            Arc::new(ScriptedModel::replying(VALID).with_delay(Duration::from_millis(500)));
        let extraction = orchestrator(model.clone())
            .with_timeout(Duration::from_millis(20))
            .extract("Offer text")
            .await;

        assert_eq!(extraction.stage, ExtractionStage::Defaulted);
        assert_eq!(Value::Object(extraction.record), extraction_error_record());
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_timeout_reports_configured_bound() {
        let model =
            Arc::new(ScriptedModel::replying(VALID).with_delay(Duration::from_millis(500)));
        let err = orchestrator(model)
            .with_timeout(Duration::from_millis(20))
            .call_model("Offer text")
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Timeout(bound) if bound == Duration::from_millis(20)));
        assert_eq!(err.to_string(), "no completion within 20ms");
    }

    #[tokio::test]
    async fn test_empty_text_never_calls_model() {
        let model = Arc::new(ScriptedModel::replying(VALID));
        let extraction = orchestrator(model.clone()).extract("   \n ").await;

        assert_eq!(extraction.stage, ExtractionStage::Defaulted);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_request_contract() {
        let model = Arc::new(ScriptedModel::replying(VALID));
        let text = "ä".repeat(15_000);
        orchestrator(model.clone()).extract(&text).await;

        let request = model.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.temperature, 0.0);
        assert!(request.system.contains("Return ONLY the raw JSON object."));
        let body = request.user.strip_prefix("Document Text:\n").unwrap();
        assert_eq!(body.chars().count(), 12_000);
    }

    #[tokio::test]
    async fn test_configured_fallbacks_in_default() {
        let mut config = ProcureConfig::default();
        config.extraction.fallback_requestor = "Erika Mustermann".to_string();
        config.extraction.fallback_department = "Finance".to_string();

        let record =
            ExtractionOrchestrator::new(Arc::new(ScriptedModel::replying("[]")), &config)
                .extract_from_text("Offer text")
                .await;

        assert_eq!(record["requestor_name"], json!("Erika Mustermann"));
        assert_eq!(record["department"], json!("Finance"));
        assert_eq!(record["title"], json!("Extraction Error"));
    }
}
