//! Deterministic cleanup rules applied around the model call.

pub mod fences;
pub mod patterns;
pub mod price;

pub use fences::strip_code_fences;
pub use price::{normalize_price, parse_price};
