//! Text extraction from uploaded offer PDFs.

mod extractor;
#[cfg(test)]
pub(crate) mod fixtures;

pub use extractor::{DocumentTextExtractor, PdfExtractor, PdfPage};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Page-level access to a loaded PDF.
pub trait PdfProcessor {
    /// Parse the document, decrypting it when the user password is empty.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Pages in the loaded document, 0 before loading.
    fn page_count(&self) -> u32;

    /// Text of one page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;
}
