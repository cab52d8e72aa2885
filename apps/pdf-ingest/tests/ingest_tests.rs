//! End-to-end walker tests over temporary exam directories

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pdf_ingest::{ExamDocument, IngestConfig, IngestReport, Walker};
use pretty_assertions::assert_eq;
use questoes_db::{
    MemoryStore, NewQuestion, QuestionFilter, QuestionStore, StoreError, StoredQuestion,
    UncategorizedPage,
};
use shared_types::{Categorization, OptionLetter, Subject};
use uuid::Uuid;

fn exam_text(year: i32, count: u32) -> String {
    let mut text = format!("EXAME NACIONAL DO ENSINO MÉDIO - ENEM {}\n", year);
    for number in 1..=count {
        text.push_str(&format!(
            "QUESTÃO {}\nEnunciado da questão {}.\nA) um B) dois C) três D) quatro E) cinco\n",
            number, number
        ));
    }
    text
}

fn fast_config(dir: &std::path::Path) -> IngestConfig {
    IngestConfig {
        file_batch_size: 2,
        insert_batch_size: 3,
        batch_delay: Duration::ZERO,
        ..IngestConfig::new(dir)
    }
}

#[tokio::test]
async fn test_walker_ingests_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("enem_2021.txt"), exam_text(2021, 4)).unwrap();
    fs::write(dir.path().join("enem_2021_gabarito.txt"), "1 - A 2 - B 3 - C 4 - D").unwrap();
    fs::write(dir.path().join("enem_2022.txt"), exam_text(2022, 2)).unwrap();
    fs::write(dir.path().join("quebrado.pdf"), b"not really a pdf").unwrap();
    fs::write(dir.path().join("vazio.txt"), "sem questões aqui").unwrap();

    let store = Arc::new(MemoryStore::new());
    let report = Walker::new(fast_config(dir.path()), store.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(
        report,
        IngestReport {
            files_seen: 4,
            files_processed: 4,
            files_failed: 0,
            questions_extracted: 6,
            questions_inserted: 6,
            insert_failures: 0,
        }
    );
    assert_eq!(store.question_count().await, 6);

    let answered = store
        .list_questions(&QuestionFilter {
            year: Some(2021),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(answered.len(), 4);
    assert_eq!(answered[0].question.correct_answer, Some(OptionLetter::A));
    assert_eq!(answered[3].question.correct_answer, Some(OptionLetter::D));
    assert!(answered
        .iter()
        .all(|q| q.question.subject == Subject::Languages));
    assert!(answered
        .iter()
        .all(|q| q.source.as_deref() == Some("enem_2021.txt")));
}

#[tokio::test]
async fn test_missing_file_counts_as_failed_and_run_continues() {
    let dir = tempfile::tempdir().unwrap();
    let present = dir.path().join("prova.txt");
    fs::write(&present, exam_text(2020, 1)).unwrap();

    let documents = vec![
        ExamDocument {
            path: dir.path().join("sumiu.pdf"),
            answer_key: None,
        },
        ExamDocument {
            path: present,
            answer_key: None,
        },
    ];

    let store = Arc::new(MemoryStore::new());
    let report = Walker::new(fast_config(dir.path()), store.clone())
        .ingest(documents)
        .await;

    assert_eq!(report.files_seen, 2);
    assert_eq!(report.files_failed, 1);
    assert_eq!(report.files_processed, 1);
    assert_eq!(report.questions_inserted, 1);
}

#[tokio::test]
async fn test_missing_directory_is_an_error() {
    let store = Arc::new(MemoryStore::new());
    let result = Walker::new(IngestConfig::new("/nonexistent/provas"), store)
        .run()
        .await;
    assert!(result.is_err());
}

/// Rejects every other insert
struct FlakyStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

#[async_trait]
impl QuestionStore for FlakyStore {
    async fn insert_question(&self, question: NewQuestion) -> Result<Uuid, StoreError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) % 2 == 1 {
            return Err(StoreError::InvalidInput("connection reset".to_string()));
        }
        self.inner.insert_question(question).await
    }

    async fn list_questions(
        &self,
        filter: &QuestionFilter,
    ) -> Result<Vec<StoredQuestion>, StoreError> {
        self.inner.list_questions(filter).await
    }

    async fn get_question(&self, id: Uuid) -> Result<Option<StoredQuestion>, StoreError> {
        self.inner.get_question(id).await
    }

    async fn get_questions(&self, ids: &[Uuid]) -> Result<Vec<StoredQuestion>, StoreError> {
        self.inner.get_questions(ids).await
    }

    async fn list_uncategorized(
        &self,
        after: Option<Uuid>,
        limit: i64,
    ) -> Result<UncategorizedPage, StoreError> {
        self.inner.list_uncategorized(after, limit).await
    }

    async fn update_categorization(
        &self,
        id: Uuid,
        categorization: &Categorization,
    ) -> Result<bool, StoreError> {
        self.inner.update_categorization(id, categorization).await
    }
}

#[tokio::test]
async fn test_insert_failures_do_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("prova.txt"), exam_text(2019, 5)).unwrap();

    let store = Arc::new(FlakyStore {
        inner: MemoryStore::new(),
        calls: AtomicUsize::new(0),
    });
    let report = Walker::new(fast_config(dir.path()), store.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(report.questions_extracted, 5);
    assert_eq!(report.questions_inserted + report.insert_failures, 5);
    assert_eq!(report.insert_failures, 2);
    assert_eq!(store.inner.question_count().await, 3);
}
