//! Directory walker
//!
//! Files are processed `file_batch_size` at a time. Each batch is extracted
//! concurrently on the blocking pool, then its questions are inserted in
//! chunks of `insert_batch_size`. A fixed delay separates consecutive file
//! batches and consecutive insert chunks. Every failure is logged and counted;
//! nothing aborts the run once the directory has been listed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use exam_extractor::ExamExtractor;
use futures::future::join_all;
use questoes_db::{NewQuestion, QuestionStore};
use serde::Serialize;
use shared_pdf::PdfTextExtractor;
use shared_types::Question;
use tracing::{debug, error, info, warn};

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::extract::{extract_document, DocumentOutcome};

const ANSWER_KEY_SUFFIXES: [&str; 3] = ["_gabarito", "-gabarito", " gabarito"];
const SUPPORTED_EXTENSIONS: [&str; 2] = ["pdf", "txt"];

/// An exam file and the answer key paired with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamDocument {
    pub path: PathBuf,
    pub answer_key: Option<PathBuf>,
}

impl ExamDocument {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Counters for one ingest run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub files_seen: usize,
    pub files_processed: usize,
    pub files_failed: usize,
    pub questions_extracted: usize,
    pub questions_inserted: usize,
    pub insert_failures: usize,
}

/// Stem of an answer-key file with its suffix removed, if it is one
fn answer_key_base(stem: &str) -> Option<&str> {
    ANSWER_KEY_SUFFIXES.iter().find_map(|suffix| {
        let split = stem.len().checked_sub(suffix.len())?;
        let tail = stem.get(split..)?;
        if split > 0 && tail.eq_ignore_ascii_case(suffix) {
            stem.get(..split)
        } else {
            None
        }
    })
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)))
}

/// Lists exam files in `dir` (non-recursive), sorted by file name, pairing each
/// with its `*_gabarito` file when one exists
pub fn discover_documents(dir: &Path) -> Result<Vec<ExamDocument>, IngestError> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound(dir.to_path_buf()));
    }

    let entries = fs::read_dir(dir).map_err(|source| IngestError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_supported(path))
        .collect();
    paths.sort();

    let mut documents: Vec<ExamDocument> = Vec::new();
    let mut by_stem: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    let mut keys: Vec<(String, PathBuf)> = Vec::new();

    for path in paths {
        let stem = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_string(),
            None => {
                warn!("Skipping file with unreadable name: {}", path.display());
                continue;
            }
        };

        match answer_key_base(&stem) {
            Some(base) => keys.push((base.to_lowercase(), path)),
            None => {
                by_stem
                    .entry(stem.to_lowercase())
                    .or_default()
                    .push(documents.len());
                documents.push(ExamDocument {
                    path,
                    answer_key: None,
                });
            }
        }
    }

    // Exams sharing a stem (`prova.pdf`, `prova.txt`) all get the same key
    for (base, key_path) in keys {
        let Some(indices) = by_stem.get(&base) else {
            warn!("Answer key without exam, skipping: {}", key_path.display());
            continue;
        };
        for &index in indices {
            let exam = &mut documents[index];
            match &exam.answer_key {
                None => exam.answer_key = Some(key_path.clone()),
                Some(existing) => warn!(
                    "{} already paired with {}; ignoring {}",
                    exam.path.display(),
                    existing.display(),
                    key_path.display()
                ),
            }
        }
    }

    Ok(documents)
}

/// Batch walker over a directory of exams
pub struct Walker {
    config: IngestConfig,
    pdf: PdfTextExtractor,
    extractor: ExamExtractor,
    store: Arc<dyn QuestionStore>,
}

impl Walker {
    pub fn new(config: IngestConfig, store: Arc<dyn QuestionStore>) -> Self {
        let config = config.normalized();
        Self {
            pdf: PdfTextExtractor::new(config.max_pages),
            extractor: ExamExtractor::new(),
            config,
            store,
        }
    }

    /// Discovers and ingests every exam in the configured directory
    pub async fn run(&self) -> Result<IngestReport, IngestError> {
        let documents = discover_documents(&self.config.pdf_dir)?;
        info!(
            "Found {} exam file(s) in {}",
            documents.len(),
            self.config.pdf_dir.display()
        );
        Ok(self.ingest(documents).await)
    }

    /// Ingests the given documents batch by batch
    pub async fn ingest(&self, documents: Vec<ExamDocument>) -> IngestReport {
        let mut report = IngestReport {
            files_seen: documents.len(),
            ..Default::default()
        };

        let batch_count = documents.len().div_ceil(self.config.file_batch_size);
        for (index, batch) in documents.chunks(self.config.file_batch_size).enumerate() {
            if index > 0 {
                tokio::time::sleep(self.config.batch_delay).await;
            }
            info!("Processing file batch {}/{}", index + 1, batch_count);

            let tasks = batch.iter().cloned().map(|document| {
                let pdf = self.pdf;
                let extractor = self.extractor;
                tokio::task::spawn_blocking(move || {
                    let outcome = extract_document(&pdf, &extractor, &document);
                    (document, outcome)
                })
            });

            for joined in join_all(tasks).await {
                let (document, outcome) = match joined {
                    Ok(result) => result,
                    Err(e) => {
                        error!("Extraction task panicked: {}", e);
                        report.files_failed += 1;
                        continue;
                    }
                };
                self.record(document, outcome, &mut report).await;
            }
        }

        info!(
            "Ingest finished: {} processed, {} failed, {} of {} questions inserted",
            report.files_processed,
            report.files_failed,
            report.questions_inserted,
            report.questions_extracted
        );
        report
    }

    async fn record(
        &self,
        document: ExamDocument,
        outcome: DocumentOutcome,
        report: &mut IngestReport,
    ) {
        let name = document.file_name();
        match outcome {
            DocumentOutcome::Extracted {
                questions,
                truncated,
            } => {
                info!(
                    "{}: {} question(s){}",
                    name,
                    questions.len(),
                    if truncated { " (page limit reached)" } else { "" }
                );
                report.files_processed += 1;
                report.questions_extracted += questions.len();
                self.insert_questions(questions, &name, report).await;
            }
            DocumentOutcome::Malformed(e) => {
                warn!("{}: unreadable PDF, no questions extracted: {}", name, e);
                report.files_processed += 1;
            }
            DocumentOutcome::Failed(e) => {
                error!("{}: {}", name, e);
                report.files_failed += 1;
            }
        }
    }

    async fn insert_questions(
        &self,
        questions: Vec<Question>,
        source: &str,
        report: &mut IngestReport,
    ) {
        let mut questions = questions.into_iter().peekable();
        let mut first_chunk = true;

        while questions.peek().is_some() {
            if !first_chunk {
                tokio::time::sleep(self.config.batch_delay).await;
            }
            first_chunk = false;

            let chunk: Vec<Question> = questions
                .by_ref()
                .take(self.config.insert_batch_size)
                .collect();

            let inserts = chunk.into_iter().map(|question| {
                let number = question.number;
                let store = Arc::clone(&self.store);
                let new = NewQuestion::new(question, Some(source.to_string()));
                async move { (number, store.insert_question(new).await) }
            });

            for (number, result) in join_all(inserts).await {
                match result {
                    Ok(id) => {
                        debug!("{}: question {} stored as {}", source, number, id);
                        report.questions_inserted += 1;
                    }
                    Err(e) => {
                        warn!("{}: failed to insert question {}: {}", source, number, e);
                        report.insert_failures += 1;
                    }
                }
            }
        }
    }
}
