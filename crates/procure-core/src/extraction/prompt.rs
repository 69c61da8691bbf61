//! The output contract given to the language model.

use crate::models::commodity;
use crate::models::config::ExtractionConfig;

/// System instruction and user-message framing, built once per process.
#[derive(Debug, Clone)]
pub struct PromptContract {
    system: String,
    max_input_chars: usize,
}

impl PromptContract {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            system: system_prompt(&config.fallback_requestor, &config.fallback_department),
            max_input_chars: config.max_input_chars,
        }
    }

    /// The system instruction.
    pub fn system(&self) -> &str {
        &self.system
    }

    /// User message carrying the (truncated) document text.
    pub fn user_message(&self, document_text: &str) -> String {
        format!(
            "Document Text:\n{}",
            truncate_chars(document_text, self.max_input_chars)
        )
    }
}

impl Default for PromptContract {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

/// Cut `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn system_prompt(requestor: &str, department: &str) -> String {
    format!(
        "You are a professional procurement data extractor. \
         Your goal is to parse vendor offers into a specific JSON format.\n\n\
         STRICT RULES:\n\
         1. Extract ONLY these fields: requestor_name, title, vendor_name, vat_id, total_cost, \
         department, extracted_description_text, order_lines, commodity_group.\n\
         2. 'commodity_group' MUST be exactly one from this list: {groups}.\n\
         3. 'order_lines' must use EXACT keys: description, unit_price, amount, unit, total_price.\n\
         4. Remove currency symbols (€, $) from numbers.\n\
         5. Defaults: requestor_name='{requestor}', department='{department}'.\n\n\
         --- EXAMPLE ---\n\
         Input: 'Apple Store Offer for 5 MacBooks for the IT Dept, Total 5000.'\n\
         Output: {{\n  \
         \"requestor_name\": \"{requestor}\", \"title\": \"New Laptops\", \"vendor_name\": \"Apple Store\", \
         \"vat_id\": \"Unknown\", \"total_cost\": 5000.0, \"department\": \"IT Dept\", \"commodity_group\": \"Hardware\", \
         \"extracted_description_text\": \"5x MacBook Laptops\", \
         \"order_lines\": [{{\"description\": \"MacBook\", \"unit_price\": 1000.0, \"amount\": 5, \"unit\": \"pcs\", \"total_price\": 5000.0}}]\n\
         }}\n\
         --- END EXAMPLE ---\n\n\
         Return ONLY the raw JSON object.",
        groups = commodity::prompt_list(),
        requestor = requestor,
        department = department,
    )
}
