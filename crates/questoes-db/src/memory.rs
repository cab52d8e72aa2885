//! In-process store used by tests and dry runs

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use shared_types::Categorization;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    NewQuestion, NewSimulado, QuestionFilter, Simulado, StoredQuestion, UncategorizedPage,
};
use crate::store::{validate_new_simulado, QuestionStore, SimuladoStore};

#[derive(Default)]
struct Tables {
    questions: BTreeMap<Uuid, StoredQuestion>,
    simulados: BTreeMap<Uuid, Simulado>,
}

/// Mirrors the ordering and filtering rules of [`crate::PgStore`]
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn question_count(&self) -> usize {
        self.tables.read().await.questions.len()
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    async fn insert_question(&self, new: NewQuestion) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let stored = StoredQuestion {
            id,
            question: new.question,
            competency: None,
            difficulty: None,
            source: new.source,
            created_at: Utc::now(),
        };
        self.tables.write().await.questions.insert(id, stored);
        Ok(id)
    }

    async fn list_questions(
        &self,
        filter: &QuestionFilter,
    ) -> Result<Vec<StoredQuestion>, StoreError> {
        let tables = self.tables.read().await;
        let mut matching: Vec<&StoredQuestion> = tables
            .questions
            .values()
            .filter(|q| filter.matches(&q.question))
            .collect();

        matching.sort_by(|a, b| {
            b.question
                .year
                .cmp(&a.question.year)
                .then(a.question.number.cmp(&b.question.number))
                .then(a.id.cmp(&b.id))
        });

        Ok(matching
            .into_iter()
            .skip(filter.effective_offset() as usize)
            .take(filter.effective_limit() as usize)
            .cloned()
            .collect())
    }

    async fn get_question(&self, id: Uuid) -> Result<Option<StoredQuestion>, StoreError> {
        Ok(self.tables.read().await.questions.get(&id).cloned())
    }

    async fn get_questions(&self, ids: &[Uuid]) -> Result<Vec<StoredQuestion>, StoreError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.questions.get(id).cloned())
            .collect())
    }

    async fn list_uncategorized(
        &self,
        after: Option<Uuid>,
        limit: i64,
    ) -> Result<UncategorizedPage, StoreError> {
        let tables = self.tables.read().await;
        let questions: Vec<StoredQuestion> = tables
            .questions
            .values()
            .filter(|q| after.map_or(true, |after| q.id > after))
            .filter(|q| !q.is_categorized())
            .take(limit.max(1) as usize)
            .cloned()
            .collect();

        Ok(UncategorizedPage {
            row_count: questions.len(),
            last_id: questions.last().map(|q| q.id),
            corrupt: Vec::new(),
            questions,
        })
    }

    async fn update_categorization(
        &self,
        id: Uuid,
        categorization: &Categorization,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.questions.get_mut(&id) {
            Some(stored) => {
                stored.question.subject = categorization.subject;
                stored.competency = categorization.competency.clone();
                stored.difficulty = Some(categorization.difficulty);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl SimuladoStore for MemoryStore {
    async fn create_simulado(&self, new: NewSimulado) -> Result<Simulado, StoreError> {
        validate_new_simulado(&new)?;

        let mut tables = self.tables.write().await;
        let missing: Vec<Uuid> = new
            .question_ids
            .iter()
            .filter(|id| !tables.questions.contains_key(*id))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(StoreError::UnknownQuestions(missing));
        }

        let simulado = Simulado {
            id: Uuid::new_v4(),
            title: new.title.trim().to_string(),
            description: new.description,
            question_ids: new.question_ids,
            created_at: Utc::now(),
        };
        tables.simulados.insert(simulado.id, simulado.clone());
        Ok(simulado)
    }

    async fn list_simulados(&self) -> Result<Vec<Simulado>, StoreError> {
        let tables = self.tables.read().await;
        let mut simulados: Vec<Simulado> = tables.simulados.values().cloned().collect();
        simulados.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(simulados)
    }

    async fn get_simulado(&self, id: Uuid) -> Result<Option<Simulado>, StoreError> {
        Ok(self.tables.read().await.simulados.get(&id).cloned())
    }

    async fn delete_simulado(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.simulados.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::{Difficulty, Question, Subject};

    fn new_question(number: u32, subject: Subject, year: i32) -> NewQuestion {
        NewQuestion::new(
            Question {
                number,
                statement: format!("Questão {}", number),
                alternatives: Default::default(),
                subject,
                year,
                correct_answer: None,
            },
            Some("prova.pdf".to_string()),
        )
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryStore::new();
        let id = store
            .insert_question(new_question(1, Subject::Mathematics, 2022))
            .await
            .unwrap();

        let stored = store.get_question(id).await.unwrap().unwrap();
        assert_eq!(stored.question.number, 1);
        assert_eq!(stored.source.as_deref(), Some("prova.pdf"));
        assert!(!stored.is_categorized());
        assert!(store.get_question(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_orders_newest_year_then_number() {
        let store = MemoryStore::new();
        for (number, year) in [(3, 2020), (2, 2022), (1, 2022)] {
            store
                .insert_question(new_question(number, Subject::Mathematics, year))
                .await
                .unwrap();
        }

        let listed = store.list_questions(&QuestionFilter::default()).await.unwrap();
        let keys: Vec<(i32, u32)> = listed
            .iter()
            .map(|q| (q.question.year, q.question.number))
            .collect();
        assert_eq!(keys, vec![(2022, 1), (2022, 2), (2020, 3)]);

        let page = store
            .list_questions(&QuestionFilter {
                limit: Some(1),
                offset: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].question.number, 2);
    }

    #[tokio::test]
    async fn test_uncategorized_keyset_pagination() {
        let store = MemoryStore::new();
        for number in 1..=5 {
            store
                .insert_question(new_question(number, Subject::Unclassified, 2022))
                .await
                .unwrap();
        }

        let mut seen = Vec::new();
        let mut after = None;
        loop {
            let page = store.list_uncategorized(after, 2).await.unwrap();
            if page.is_empty() {
                break;
            }
            after = page.last_id;
            seen.extend(page.questions.into_iter().map(|q| q.id));
        }
        assert_eq!(seen.len(), 5);

        let categorization = Categorization {
            subject: Subject::Mathematics,
            competency: None,
            difficulty: Difficulty::Easy,
        };
        assert!(store.update_categorization(seen[0], &categorization).await.unwrap());
        assert!(!store
            .update_categorization(Uuid::new_v4(), &categorization)
            .await
            .unwrap());

        let remaining = store.list_uncategorized(None, 10).await.unwrap();
        assert_eq!(remaining.row_count, 4);
        assert!(remaining.corrupt.is_empty());
    }

    #[tokio::test]
    async fn test_get_questions_repeats_duplicate_ids() {
        let store = MemoryStore::new();
        let first = store
            .insert_question(new_question(1, Subject::Languages, 2021))
            .await
            .unwrap();
        let second = store
            .insert_question(new_question(2, Subject::Languages, 2021))
            .await
            .unwrap();

        let fetched = store
            .get_questions(&[second, first, Uuid::new_v4(), second])
            .await
            .unwrap();
        let numbers: Vec<u32> = fetched.iter().map(|q| q.question.number).collect();
        assert_eq!(numbers, vec![2, 1, 2]);
    }

    #[tokio::test]
    async fn test_simulado_requires_known_questions() {
        let store = MemoryStore::new();
        let id = store
            .insert_question(new_question(1, Subject::Languages, 2021))
            .await
            .unwrap();
        let unknown = Uuid::new_v4();

        let err = store
            .create_simulado(NewSimulado {
                title: "Simulado 1".to_string(),
                description: None,
                question_ids: vec![id, unknown],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownQuestions(ref ids) if ids == &vec![unknown]));

        let simulado = store
            .create_simulado(NewSimulado {
                title: "  Simulado 1 ".to_string(),
                description: Some("Revisão".to_string()),
                question_ids: vec![id],
            })
            .await
            .unwrap();
        assert_eq!(simulado.title, "Simulado 1");
        assert_eq!(store.list_simulados().await.unwrap().len(), 1);

        assert!(store.delete_simulado(simulado.id).await.unwrap());
        assert!(!store.delete_simulado(simulado.id).await.unwrap());
        assert!(store.get_simulado(simulado.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_simulado_rejects_blank_title_and_empty_list() {
        let store = MemoryStore::new();
        let blank = store
            .create_simulado(NewSimulado {
                title: "   ".to_string(),
                description: None,
                question_ids: vec![Uuid::new_v4()],
            })
            .await;
        assert!(matches!(blank, Err(StoreError::InvalidInput(_))));

        let empty = store
            .create_simulado(NewSimulado {
                title: "Simulado".to_string(),
                description: None,
                question_ids: vec![],
            })
            .await;
        assert!(matches!(empty, Err(StoreError::InvalidInput(_))));
    }
}
