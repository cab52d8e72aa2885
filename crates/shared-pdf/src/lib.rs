//! Shared PDF handling utilities
//!
//! Reads exam and answer-key documents into plain text, one page at a time,
//! stopping at a page ceiling so large books never sit fully in memory.

pub mod error;
pub mod extract;

pub use error::PdfTextError;
pub use extract::{ExtractedText, PdfTextExtractor, DEFAULT_MAX_PAGES};
