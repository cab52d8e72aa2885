//! PDF text extraction with a page ceiling
//!
//! Pages are decoded one at a time with lopdf and appended to a single text
//! buffer. Only the first `max_pages` pages are read. When lopdf yields no text
//! at all for a document within the ceiling, pdf-extract is tried on the whole
//! document, since it copes better with CID fonts and ToUnicode maps.
//!
//! # Example
//! ```no_run
//! use shared_pdf::{PdfTextExtractor, PdfTextError};
//!
//! fn read_exam(path: &std::path::Path) -> Result<(), PdfTextError> {
//!     let extracted = PdfTextExtractor::default().extract_file(path)?;
//!     println!("{} of {} pages", extracted.pages_read, extracted.page_count);
//!     Ok(())
//! }
//! ```

use std::fs;
use std::path::Path;

use lopdf::Document;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::PdfTextError;

/// Page ceiling applied when none is configured
pub const DEFAULT_MAX_PAGES: u32 = 60;

/// Text pulled out of one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedText {
    /// Concatenated page text, pages separated by a newline
    pub text: String,
    /// Total number of pages in the document
    pub page_count: u32,
    /// Pages visited before the ceiling was reached
    pub pages_read: u32,
    /// True when the ceiling cut the document short
    pub truncated: bool,
}

/// Reads PDF (or pre-extracted `.txt`) documents into text
#[derive(Debug, Clone, Copy)]
pub struct PdfTextExtractor {
    max_pages: u32,
}

impl PdfTextExtractor {
    pub fn new(max_pages: u32) -> Self {
        Self {
            max_pages: max_pages.max(1),
        }
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Reads a document from disk.
    ///
    /// Files with a `.txt` extension are taken as already extracted text and
    /// returned as a single page.
    pub fn extract_file(&self, path: &Path) -> Result<ExtractedText, PdfTextError> {
        let is_text = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt"));

        if is_text {
            let text = fs::read_to_string(path)?;
            return Ok(ExtractedText {
                text,
                page_count: 1,
                pages_read: 1,
                truncated: false,
            });
        }

        let bytes = fs::read(path)?;
        self.extract_bytes(&bytes)
    }

    /// Extracts text from PDF bytes, page by page, up to the ceiling
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<ExtractedText, PdfTextError> {
        let doc = Document::load_mem(bytes).map_err(classify_load_error)?;

        if doc.is_encrypted() {
            return Err(PdfTextError::PasswordProtected);
        }

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        let page_count = page_numbers.len() as u32;
        let truncated = page_count > self.max_pages;

        let mut text = String::new();
        let mut pages_read = 0;

        for page_number in page_numbers.into_iter().take(self.max_pages as usize) {
            pages_read += 1;
            match doc.extract_text(&[page_number]) {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    text.push('\n');
                }
                Err(e) => warn!("Skipping page {}: {}", page_number, e),
            }
        }

        if text.trim().is_empty() && !truncated && page_count > 0 {
            debug!("lopdf produced no text, falling back to pdf-extract");
            text = fallback_extract(bytes);
        }

        Ok(ExtractedText {
            text,
            page_count,
            pages_read,
            truncated,
        })
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAGES)
    }
}

fn classify_load_error(err: lopdf::Error) -> PdfTextError {
    let message = err.to_string();
    let lower = message.to_lowercase();

    if lower.contains("encrypt") || lower.contains("password") {
        PdfTextError::PasswordProtected
    } else {
        PdfTextError::InvalidPdf(message)
    }
}

/// Whole-document extraction; failures (including panics inside
/// pdf-extract on unusual font tables) become empty text
fn fallback_extract(bytes: &[u8]) -> String {
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("pdf-extract fallback failed: {}", e);
            String::new()
        }
        Err(_) => {
            warn!("pdf-extract fallback panicked");
            String::new()
        }
    }
}
