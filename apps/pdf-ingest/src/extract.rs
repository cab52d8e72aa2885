//! Per-document extraction: PDF text, optional answer key, questions

use std::path::Path;

use exam_extractor::ExamExtractor;
use shared_pdf::{PdfTextError, PdfTextExtractor};
use shared_types::{ExtractionResult, Question};
use tracing::{debug, warn};

use crate::error::IngestError;
use crate::walker::ExamDocument;

/// Result of extracting one exam document
#[derive(Debug)]
pub enum DocumentOutcome {
    /// Text was read; `questions` may be empty
    Extracted {
        questions: Vec<Question>,
        truncated: bool,
    },
    /// The file exists but is not a usable PDF; counts as zero questions
    Malformed(PdfTextError),
    /// The file could not be read at all
    Failed(IngestError),
}

/// Reads an exam (and its answer key, if paired) and extracts its questions.
///
/// The document text is dropped before returning so only the questions stay
/// alive while they wait to be inserted.
pub fn extract_document(
    pdf: &PdfTextExtractor,
    extractor: &ExamExtractor,
    document: &ExamDocument,
) -> DocumentOutcome {
    let exam = match pdf.extract_file(&document.path) {
        Ok(exam) => exam,
        Err(e) if e.is_malformed() => return DocumentOutcome::Malformed(e),
        Err(PdfTextError::Io(source)) => {
            return DocumentOutcome::Failed(IngestError::Io {
                path: document.path.clone(),
                source,
            })
        }
        Err(e) => return DocumentOutcome::Failed(e.into()),
    };

    if exam.truncated {
        debug!(
            "{}: read {} of {} pages",
            document.path.display(),
            exam.pages_read,
            exam.page_count
        );
    }

    let answer_key = document
        .answer_key
        .as_deref()
        .and_then(|path| match pdf.extract_file(path) {
            Ok(key) => Some(key.text),
            Err(e) => {
                warn!("Ignoring answer key {}: {}", path.display(), e);
                None
            }
        });

    let result = extractor.extract(&exam.text, answer_key.as_deref());

    DocumentOutcome::Extracted {
        questions: result.questions,
        truncated: exam.truncated,
    }
}

/// One-shot extraction used by the `extract` subcommand
pub fn extract_single(
    path: &Path,
    answer_key: Option<&Path>,
    max_pages: u32,
) -> Result<ExtractionResult, IngestError> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound(path.to_path_buf()));
    }
    if let Some(key) = answer_key {
        if !key.is_file() {
            return Err(IngestError::FileNotFound(key.to_path_buf()));
        }
    }

    let pdf = PdfTextExtractor::new(max_pages);
    let exam = pdf.extract_file(path)?;
    let key = answer_key.map(|p| pdf.extract_file(p)).transpose()?;

    Ok(ExamExtractor::new().extract(&exam.text, key.as_ref().map(|k| k.text.as_str())))
}
