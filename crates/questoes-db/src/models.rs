//! Data models for the question store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{Difficulty, Question, Subject};
use uuid::Uuid;

/// Default page size for question listings
pub const DEFAULT_LIST_LIMIT: i64 = 50;
/// Largest page a single listing may return
pub const MAX_LIST_LIMIT: i64 = 200;

/// Question to be inserted, with the document it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: Question,
    pub source: Option<String>,
}

impl NewQuestion {
    pub fn new(question: Question, source: Option<String>) -> Self {
        Self { question, source }
    }
}

/// Question row as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredQuestion {
    pub id: Uuid,
    #[serde(flatten)]
    pub question: Question,
    #[serde(rename = "competencia")]
    pub competency: Option<String>,
    #[serde(rename = "dificuldade")]
    pub difficulty: Option<Difficulty>,
    #[serde(rename = "fonte")]
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StoredQuestion {
    /// Whether the categorization pass has already visited this row
    pub fn is_categorized(&self) -> bool {
        self.difficulty.is_some()
    }
}

/// Listing filter; `None` fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    pub subject: Option<Subject>,
    pub year: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl QuestionFilter {
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT)
    }

    pub fn effective_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn matches(&self, question: &Question) -> bool {
        self.subject.map_or(true, |s| s == question.subject)
            && self.year.map_or(true, |y| y == question.year)
    }
}

/// One keyset page of the categorization scan.
///
/// Rows that fail to decode are reported by id instead of failing the page, and
/// `last_id` covers them too so the scan can move past them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UncategorizedPage {
    pub questions: Vec<StoredQuestion>,
    pub corrupt: Vec<(Uuid, String)>,
    pub last_id: Option<Uuid>,
    pub row_count: usize,
}

impl UncategorizedPage {
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

/// Practice exam assembled from stored questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Simulado {
    pub id: Uuid,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "questao_ids")]
    pub question_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Request to create a simulado
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewSimulado {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "questao_ids")]
    pub question_ids: Vec<Uuid>,
}
