//! Walker configuration

use std::path::PathBuf;
use std::time::Duration;

pub use shared_pdf::DEFAULT_MAX_PAGES;

/// Files extracted concurrently per batch
pub const DEFAULT_FILE_BATCH_SIZE: usize = 3;
/// Questions inserted per store batch
pub const DEFAULT_INSERT_BATCH_SIZE: usize = 50;
/// Pause between file batches and between insert batches
pub const DEFAULT_BATCH_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    pub pdf_dir: PathBuf,
    pub max_pages: u32,
    pub file_batch_size: usize,
    pub insert_batch_size: usize,
    pub batch_delay: Duration,
}

impl IngestConfig {
    pub fn new(pdf_dir: impl Into<PathBuf>) -> Self {
        Self {
            pdf_dir: pdf_dir.into(),
            max_pages: DEFAULT_MAX_PAGES,
            file_batch_size: DEFAULT_FILE_BATCH_SIZE,
            insert_batch_size: DEFAULT_INSERT_BATCH_SIZE,
            batch_delay: Duration::from_millis(DEFAULT_BATCH_DELAY_MS),
        }
    }

    /// Zero sizes would stall the walker; clamp them to one
    pub fn normalized(mut self) -> Self {
        self.max_pages = self.max_pages.max(1);
        self.file_batch_size = self.file_batch_size.max(1);
        self.insert_batch_size = self.insert_batch_size.max(1);
        self
    }
}
