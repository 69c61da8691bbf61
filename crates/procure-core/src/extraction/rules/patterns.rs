//! Common regex patterns for cleaning model responses.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // A fenced block: ```json ... ``` or ``` ... ```
    pub static ref CODE_FENCE: Regex = Regex::new(
        r"(?s)```[ \t]*(?i:json)?[ \t]*\r?\n?(.*?)```"
    ).unwrap();

    // An opening fence whose closing fence never arrived
    pub static ref OPEN_FENCE: Regex = Regex::new(
        r"(?s)```[ \t]*(?i:json)?[ \t]*\r?\n?(.*)"
    ).unwrap();
}
