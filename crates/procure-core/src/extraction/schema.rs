//! Strict validation of candidate records against the procurement schema.
//!
//! Validation walks the untyped JSON so that failures can name the exact
//! field path, the expected type and what was found instead.

use serde_json::{Map, Value};

use super::rules::parse_price;
use crate::error::ValidationError;
use crate::models::commodity::is_commodity_group;
use crate::models::procurement::{
    FALLBACK_DEPARTMENT, FALLBACK_REQUESTOR, OrderLine, ProcurementData,
};

type Result<T> = std::result::Result<T, ValidationError>;

/// Parse `text` as JSON and validate it.
pub fn validate_str(text: &str) -> Result<ProcurementData> {
    validate(&parse(text)?)
}

pub(crate) fn parse(text: &str) -> Result<Value> {
    serde_json::from_str(text)
        .map_err(|e| ValidationError::new("$", "JSON object", format!("invalid JSON ({})", e)))
}

/// Validate an untyped candidate and coerce it into [`ProcurementData`].
///
/// Numeric fields accept JSON numbers or numeric strings. Unknown keys are
/// ignored. Any missing or ill-typed field, including inside a single order
/// line, fails the whole record.
pub fn validate(candidate: &Value) -> Result<ProcurementData> {
    validate_with_defaults(candidate, FALLBACK_REQUESTOR, FALLBACK_DEPARTMENT)
}

/// [`validate`] with caller-chosen values for an absent requestor or department.
pub fn validate_with_defaults(
    candidate: &Value,
    requestor: &str,
    department: &str,
) -> Result<ProcurementData> {
    let obj = as_object(candidate, "$")?;

    Ok(ProcurementData {
        requestor_name: string_or(obj, "", "requestor_name", requestor)?,
        title: required_string(obj, "", "title")?,
        vendor_name: required_string(obj, "", "vendor_name")?,
        vat_id: required_string(obj, "", "vat_id")?,
        total_cost: required_number(obj, "", "total_cost")?,
        department: string_or(obj, "", "department", department)?,
        extracted_description_text: required_string(obj, "", "extracted_description_text")?,
        commodity_group: commodity_group(obj)?,
        order_lines: order_lines(obj)?,
    })
}

fn order_lines(obj: &Map<String, Value>) -> Result<Vec<OrderLine>> {
    let lines = match obj.get("order_lines") {
        Some(Value::Array(lines)) => lines,
        Some(other) => return Err(ValidationError::new("order_lines", "array", describe(other))),
        None => return Err(ValidationError::new("order_lines", "array", "missing")),
    };

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| order_line(line, &format!("order_lines[{}]", i)))
        .collect()
}

fn order_line(value: &Value, path: &str) -> Result<OrderLine> {
    let obj = as_object(value, path)?;

    let description = required_string(obj, path, "description")?;
    if description.trim().is_empty() {
        return Err(ValidationError::new(
            field_path(path, "description"),
            "non-empty string",
            "empty string",
        ));
    }

    Ok(OrderLine {
        description,
        unit_price: required_number(obj, path, "unit_price")?,
        amount: required_number(obj, path, "amount")?,
        unit: required_string(obj, path, "unit")?,
        total_price: required_number(obj, path, "total_price")?,
    })
}

fn commodity_group(obj: &Map<String, Value>) -> Result<Option<String>> {
    match obj.get("commodity_group") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(label)) if is_commodity_group(label) => Ok(Some(label.clone())),
        Some(other) => Err(ValidationError::new(
            "commodity_group",
            "one of the 50 commodity groups",
            describe(other),
        )),
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| ValidationError::new(path, "object", describe(value)))
}

fn required_string(obj: &Map<String, Value>, prefix: &str, key: &str) -> Result<String> {
    match obj.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ValidationError::new(field_path(prefix, key), "string", describe(other))),
        None => Err(ValidationError::new(field_path(prefix, key), "string", "missing")),
    }
}

fn string_or(obj: &Map<String, Value>, prefix: &str, key: &str, default: &str) -> Result<String> {
    if obj.contains_key(key) {
        required_string(obj, prefix, key)
    } else {
        Ok(default.to_string())
    }
}

fn required_number(obj: &Map<String, Value>, prefix: &str, key: &str) -> Result<f64> {
    let path = field_path(prefix, key);
    match obj.get(key) {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| ValidationError::new(path, "number", n.to_string())),
        Some(Value::String(s)) => {
            parse_price(s).ok_or_else(|| ValidationError::new(path, "number", describe_str(s)))
        }
        Some(other) => Err(ValidationError::new(path, "number", describe(other))),
        None => Err(ValidationError::new(path, "number", "missing")),
    }
}

fn field_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn describe_str(s: &str) -> String {
    let short: String = s.chars().take(40).collect();
    format!("string {:?}", short)
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => describe_str(s),
        Value::Array(a) => format!("array of {}", a.len()),
        Value::Object(_) => "object".to_string(),
    }
}
