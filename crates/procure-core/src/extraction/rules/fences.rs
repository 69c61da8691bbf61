//! Markdown code-fence removal for model responses.

use super::patterns::{CODE_FENCE, OPEN_FENCE};

/// Return the payload of the first fenced block, or the trimmed input when
/// there is no fence. A leading `json` language label is dropped.
pub fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    if !trimmed.contains("```") {
        return trimmed;
    }

    let payload = CODE_FENCE
        .captures(trimmed)
        .or_else(|| OPEN_FENCE.captures(trimmed))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed);

    payload.trim()
}
