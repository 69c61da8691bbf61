//! Procurement record models shared by extraction, intake and storage.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Requestor used when the offer does not name one.
pub const FALLBACK_REQUESTOR: &str = "Vladimir Keil";

/// Department used when the offer does not name one.
pub const FALLBACK_DEPARTMENT: &str = "Operations";

/// Title written into the record when every extraction stage failed.
pub const EXTRACTION_ERROR_TITLE: &str = "Extraction Error";

/// Untyped, JSON-shaped procurement record as handed to callers.
///
/// Validated records, repaired records and the fallback default all share
/// this shape; only validated ones are guaranteed to be well-typed.
pub type Record = Map<String, Value>;

/// A single line item of a vendor offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Product or service description.
    pub description: String,

    /// Price per unit.
    pub unit_price: f64,

    /// Quantity ordered (may be fractional, e.g. hours).
    pub amount: f64,

    /// Unit of measure (e.g. "pcs", "Stk", "licenses").
    pub unit: String,

    /// Line total as stated on the offer.
    pub total_price: f64,
}

impl OrderLine {
    /// Line total recomputed from unit price and amount.
    pub fn computed_total(&self) -> f64 {
        self.unit_price * self.amount
    }

    fn to_value(&self) -> Value {
        let mut line = Map::new();
        line.insert("description".into(), Value::from(self.description.as_str()));
        line.insert("unit_price".into(), Value::from(self.unit_price));
        line.insert("amount".into(), Value::from(self.amount));
        line.insert("unit".into(), Value::from(self.unit.as_str()));
        line.insert("total_price".into(), Value::from(self.total_price));
        Value::Object(line)
    }
}

/// Complete structured data for one procurement request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcurementData {
    /// Person requesting the purchase.
    #[serde(default = "default_requestor")]
    pub requestor_name: String,

    /// Short summary of the purchase.
    pub title: String,

    /// Supplier name.
    pub vendor_name: String,

    /// Vendor VAT identifier ("Unknown" when the offer has none).
    pub vat_id: String,

    /// Net or gross total cost of the offer.
    pub total_cost: f64,

    /// Requesting department.
    #[serde(default = "default_department")]
    pub department: String,

    /// Free-text summary of what is being bought.
    pub extracted_description_text: String,

    /// Spend classification from the commodity vocabulary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commodity_group: Option<String>,

    /// Line items in document order.
    pub order_lines: Vec<OrderLine>,
}

fn default_requestor() -> String {
    FALLBACK_REQUESTOR.to_string()
}

fn default_department() -> String {
    FALLBACK_DEPARTMENT.to_string()
}

impl ProcurementData {
    /// The fixed minimal record returned when nothing could be recovered.
    pub fn extraction_error(requestor: &str, department: &str) -> Self {
        Self {
            requestor_name: requestor.to_string(),
            title: EXTRACTION_ERROR_TITLE.to_string(),
            vendor_name: "Unknown".to_string(),
            vat_id: "N/A".to_string(),
            total_cost: 0.0,
            department: department.to_string(),
            extracted_description_text: String::new(),
            commodity_group: None,
            order_lines: Vec::new(),
        }
    }

    /// Convert into the untyped record shape.
    pub fn to_record(&self) -> Record {
        let mut record = Map::new();
        record.insert("requestor_name".into(), Value::from(self.requestor_name.as_str()));
        record.insert("title".into(), Value::from(self.title.as_str()));
        record.insert("vendor_name".into(), Value::from(self.vendor_name.as_str()));
        record.insert("vat_id".into(), Value::from(self.vat_id.as_str()));
        record.insert("total_cost".into(), Value::from(self.total_cost));
        record.insert("department".into(), Value::from(self.department.as_str()));
        record.insert(
            "extracted_description_text".into(),
            Value::from(self.extracted_description_text.as_str()),
        );
        if let Some(group) = &self.commodity_group {
            record.insert("commodity_group".into(), Value::from(group.as_str()));
        }
        record.insert(
            "order_lines".into(),
            Value::Array(self.order_lines.iter().map(OrderLine::to_value).collect()),
        );
        record
    }

    /// Check arithmetic consistency of the offer and return any issues found.
    ///
    /// Totals are expected to agree but never enforced; these are advisory.
    pub fn consistency_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for (i, line) in self.order_lines.iter().enumerate() {
            let computed = line.computed_total();
            if (computed - line.total_price).abs() > 0.01 {
                issues.push(format!(
                    "Order line {} total ({:.2}) differs from unit price x amount ({:.2})",
                    i + 1,
                    line.total_price,
                    computed
                ));
            }
        }

        if !self.order_lines.is_empty() {
            let lines_total: f64 = self.order_lines.iter().map(|l| l.total_price).sum();
            if (lines_total - self.total_cost).abs() > 0.01 {
                issues.push(format!(
                    "Order line total ({:.2}) differs from total cost ({:.2})",
                    lines_total, self.total_cost
                ));
            }
        }

        issues
    }
}
