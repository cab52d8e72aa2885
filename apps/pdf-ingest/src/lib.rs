//! PDF ingestion pipeline
//!
//! Walks a directory of exam papers, extracts questions with a bounded page
//! budget per file and writes them to the question store in small batches.
//! A second pass fills in competency and difficulty for stored questions.

pub mod categorize;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod walker;

pub use categorize::{categorize_all, CategorizeReport};
pub use config::IngestConfig;
pub use error::IngestError;
pub use extract::{extract_document, extract_single, DocumentOutcome};
pub use walker::{discover_documents, ExamDocument, IngestReport, Walker};
