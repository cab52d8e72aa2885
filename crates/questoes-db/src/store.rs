//! Storage traits shared by the PostgreSQL and in-memory backends

use async_trait::async_trait;
use shared_types::Categorization;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    NewQuestion, NewSimulado, QuestionFilter, Simulado, StoredQuestion, UncategorizedPage,
};

#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Inserts one question under a fresh v4 id
    async fn insert_question(&self, question: NewQuestion) -> Result<Uuid, StoreError>;

    /// Lists questions ordered by year (newest first), then number, then id
    async fn list_questions(&self, filter: &QuestionFilter)
        -> Result<Vec<StoredQuestion>, StoreError>;

    async fn get_question(&self, id: Uuid) -> Result<Option<StoredQuestion>, StoreError>;

    /// Fetches the given ids, preserving the order of `ids`; unknown ids are skipped
    async fn get_questions(&self, ids: &[Uuid]) -> Result<Vec<StoredQuestion>, StoreError>;

    /// Keyset page of rows the categorization pass has not visited, ordered by id
    async fn list_uncategorized(
        &self,
        after: Option<Uuid>,
        limit: i64,
    ) -> Result<UncategorizedPage, StoreError>;

    /// Writes subject, competency and difficulty. Returns false for an unknown id
    async fn update_categorization(
        &self,
        id: Uuid,
        categorization: &Categorization,
    ) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait SimuladoStore: Send + Sync {
    /// Creates a simulado; every referenced question must exist
    async fn create_simulado(&self, simulado: NewSimulado) -> Result<Simulado, StoreError>;

    /// All simulados, newest first
    async fn list_simulados(&self) -> Result<Vec<Simulado>, StoreError>;

    async fn get_simulado(&self, id: Uuid) -> Result<Option<Simulado>, StoreError>;

    /// Returns false when nothing was deleted
    async fn delete_simulado(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Both stores behind one object
pub trait Store: QuestionStore + SimuladoStore {}

impl<T: QuestionStore + SimuladoStore> Store for T {}

/// Shared validation for simulado creation
pub(crate) fn validate_new_simulado(simulado: &NewSimulado) -> Result<(), StoreError> {
    if simulado.title.trim().is_empty() {
        return Err(StoreError::InvalidInput("titulo must not be empty".to_string()));
    }
    if simulado.question_ids.is_empty() {
        return Err(StoreError::InvalidInput(
            "questao_ids must not be empty".to_string(),
        ));
    }
    Ok(())
}
