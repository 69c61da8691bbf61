//! PDF text extraction using lopdf.

use lopdf::Document;
use tracing::{debug, trace, warn};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF loader giving typed errors for every failure.
pub struct PdfExtractor {
    document: Option<Document>,
}

/// Text from a single PDF page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Extracted text from this page.
    pub text: String,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self { document: None }
    }

    /// Extract text from the first `max_pages` pages.
    ///
    /// A page whose content cannot be decoded yields empty text rather
    /// than failing the whole document.
    pub fn extract_pages(&self, max_pages: usize) -> Result<Vec<PdfPage>> {
        let doc = self
            .document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))?;

        let pages: Vec<u32> = doc.get_pages().keys().copied().take(max_pages).collect();
        if pages.is_empty() {
            return Err(PdfError::NoPages);
        }

        let mut extracted = Vec::with_capacity(pages.len());
        for number in pages {
            let text = match self.extract_page_text(number) {
                Ok(text) => text,
                Err(e) => {
                    debug!("Skipping page {}: {}", number, e);
                    String::new()
                }
            };
            trace!("Page {} yielded {} chars", number, text.len());
            extracted.push(PdfPage { number, text });
        }

        Ok(extracted)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self
            .document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))?;

        doc.extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction {
                page,
                reason: e.to_string(),
            })
    }
}

/// Converts an uploaded document into a bounded plain-text excerpt.
///
/// Offer summaries live near the front of a document, so only the first
/// few pages are read. Never fails: unreadable input yields empty text.
#[derive(Debug, Clone, Copy)]
pub struct DocumentTextExtractor {
    max_pages: usize,
}

impl DocumentTextExtractor {
    pub fn new(max_pages: usize) -> Self {
        Self { max_pages }
    }

    /// Extract text from the leading pages, newline-joined and trimmed.
    pub fn extract(&self, data: &[u8]) -> String {
        let mut extractor = PdfExtractor::new();
        let pages = match extractor
            .load(data)
            .and_then(|()| extractor.extract_pages(self.max_pages))
        {
            Ok(pages) => pages,
            Err(e) => {
                warn!("PDF parsing error: {}", e);
                return String::new();
            }
        };

        let mut text = String::new();
        for page in pages.iter().filter(|p| !p.text.trim().is_empty()) {
            text.push_str(page.text.trim_end());
            text.push('\n');
        }

        let text = text.trim().to_string();
        debug!(
            "Extracted {} chars from {} of {} pages",
            text.len(),
            pages.len(),
            extractor.page_count()
        );
        text
    }
}

impl Default for DocumentTextExtractor {
    fn default() -> Self {
        Self::new(3)
    }
}
