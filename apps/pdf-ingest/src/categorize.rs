//! Categorization pass over stored questions

use std::time::Duration;

use exam_extractor::categorize;
use questoes_db::{QuestionStore, StoreError};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorizeReport {
    pub scanned: usize,
    pub updated: usize,
    pub failed: usize,
}

/// Walks every uncategorized question with keyset pagination and writes its
/// subject, competency and difficulty.
///
/// Per-question failures, including rows that cannot be decoded, are logged
/// and skipped. A failure to fetch a page ends the pass with an error.
pub async fn categorize_all(
    store: &dyn QuestionStore,
    page_size: usize,
    delay: Duration,
) -> Result<CategorizeReport, StoreError> {
    let page_size = page_size.max(1);
    let mut report = CategorizeReport::default();
    let mut after = None;

    loop {
        let page = store.list_uncategorized(after, page_size as i64).await?;
        if page.is_empty() {
            break;
        }
        after = page.last_id;
        let full_page = page.row_count == page_size;

        for (id, reason) in &page.corrupt {
            warn!("Skipping unreadable question {}: {}", id, reason);
            report.scanned += 1;
            report.failed += 1;
        }

        for stored in page.questions {
            report.scanned += 1;
            let categorization = categorize(&stored.question);
            debug!(
                "Question {}: {} / {:?} / {}",
                stored.id, categorization.subject, categorization.competency, categorization.difficulty
            );

            match store.update_categorization(stored.id, &categorization).await {
                Ok(true) => report.updated += 1,
                Ok(false) => {
                    warn!("Question {} disappeared before update", stored.id);
                    report.failed += 1;
                }
                Err(e) => {
                    warn!("Failed to categorize question {}: {}", stored.id, e);
                    report.failed += 1;
                }
            }
        }

        info!("Categorized {} question(s) so far", report.updated);
        if !full_page {
            break;
        }
        tokio::time::sleep(delay).await;
    }

    Ok(report)
}
