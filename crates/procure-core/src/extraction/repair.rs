//! Best-effort repair of model output that failed strict validation.
//!
//! Works on loose JSON only: known key-name mistakes are renamed, nothing
//! is type-checked.

use serde_json::{Map, Value};

use super::schema;
use crate::error::ValidationError;
use crate::models::procurement::Record;

/// Top-level key renames (wrong name, correct name).
const RECORD_RENAMES: &[(&str, &str)] = &[("items", "order_lines")];

/// Per-order-line key renames (wrong name, correct name).
const LINE_RENAMES: &[(&str, &str)] = &[
    ("item", "description"),
    ("price", "unit_price"),
    ("quantity", "amount"),
    ("total", "total_price"),
];

/// Parse `text` as loose JSON and fix common key-name mistakes.
///
/// Fails only when the text is not a JSON object at all.
pub fn repair(text: &str) -> Result<Record, ValidationError> {
    match schema::parse(text)? {
        Value::Object(obj) => Ok(repair_record(obj)),
        other => Err(ValidationError::new(
            "$",
            "JSON object",
            match other {
                Value::Array(_) => "array",
                Value::String(_) => "string",
                Value::Number(_) => "number",
                Value::Bool(_) => "boolean",
                _ => "null",
            },
        )),
    }
}

/// Apply the rename heuristics to an already parsed record.
pub fn repair_record(obj: Map<String, Value>) -> Record {
    let mut record = rename_keys(obj, RECORD_RENAMES);

    if let Some(Value::Array(lines)) = record.get_mut("order_lines") {
        for line in lines.iter_mut() {
            if let Value::Object(obj) = line {
                *obj = rename_keys(std::mem::take(obj), LINE_RENAMES);
            }
        }
    }

    record
}

/// Rename keys, never overwriting a key that is already correctly named.
fn rename_keys(mut obj: Map<String, Value>, renames: &[(&str, &str)]) -> Map<String, Value> {
    for (from, to) in renames {
        if obj.contains_key(*to) {
            continue;
        }
        if let Some(value) = obj.remove(*from) {
            obj.insert((*to).to_string(), value);
        }
    }
    obj
}
