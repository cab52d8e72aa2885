//! PostgreSQL backend

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_types::{Alternatives, Categorization, Difficulty, OptionLetter, Question, Subject};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    NewQuestion, NewSimulado, QuestionFilter, Simulado, StoredQuestion, UncategorizedPage,
};
use crate::store::{validate_new_simulado, QuestionStore, SimuladoStore};

const QUESTION_COLUMNS: &str = "id, numero, enunciado, alternativas, materia, ano, \
     resposta_correta, competencia, dificuldade, fonte, created_at";

#[derive(Debug, FromRow)]
struct QuestionRow {
    id: Uuid,
    numero: i32,
    enunciado: String,
    alternativas: Json<Alternatives>,
    materia: String,
    ano: i32,
    resposta_correta: Option<String>,
    competencia: Option<String>,
    dificuldade: Option<String>,
    fonte: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<QuestionRow> for StoredQuestion {
    type Error = StoreError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |reason: String| StoreError::CorruptRow { id, reason };

        let number = u32::try_from(row.numero)
            .map_err(|_| corrupt(format!("negative numero {}", row.numero)))?;
        let subject: Subject = row.materia.parse().map_err(|e| corrupt(format!("{}", e)))?;
        let correct_answer: Option<OptionLetter> = row
            .resposta_correta
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(|e| corrupt(format!("{}", e)))?;
        let difficulty: Option<Difficulty> = row
            .dificuldade
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(|e| corrupt(format!("{}", e)))?;

        Ok(StoredQuestion {
            id,
            question: Question {
                number,
                statement: row.enunciado,
                alternatives: row.alternativas.0,
                subject,
                year: row.ano,
                correct_answer,
            },
            competency: row.competencia,
            difficulty,
            source: row.fonte,
            created_at: row.created_at,
        })
    }
}

fn into_stored(rows: Vec<QuestionRow>) -> Result<Vec<StoredQuestion>, StoreError> {
    rows.into_iter().map(StoredQuestion::try_from).collect()
}

/// Arranges fetched rows in the order of `ids`; repeated ids repeat the row
fn order_by_ids(found: Vec<StoredQuestion>, ids: &[Uuid]) -> Vec<StoredQuestion> {
    let by_id: HashMap<Uuid, StoredQuestion> = found.into_iter().map(|q| (q.id, q)).collect();
    ids.iter().filter_map(|id| by_id.get(id).cloned()).collect()
}

fn into_page(rows: Vec<QuestionRow>) -> UncategorizedPage {
    let mut page = UncategorizedPage {
        row_count: rows.len(),
        last_id: rows.last().map(|row| row.id),
        ..Default::default()
    };
    for row in rows {
        let id = row.id;
        match StoredQuestion::try_from(row) {
            Ok(stored) => page.questions.push(stored),
            Err(e) => page.corrupt.push((id, e.to_string())),
        }
    }
    page
}

#[derive(Debug, FromRow)]
struct SimuladoRow {
    id: Uuid,
    titulo: String,
    descricao: Option<String>,
    questao_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<SimuladoRow> for Simulado {
    fn from(row: SimuladoRow) -> Self {
        Simulado {
            id: row.id,
            title: row.titulo,
            description: row.descricao,
            question_ids: row.questao_ids,
            created_at: row.created_at,
        }
    }
}

/// sqlx-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects and runs migrations
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        tracing::info!("Connecting to database");

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        tracing::info!("Running database migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS questoes (
                id UUID PRIMARY KEY,
                numero INTEGER NOT NULL,
                enunciado TEXT NOT NULL,
                alternativas JSONB NOT NULL DEFAULT '{}',
                materia TEXT NOT NULL,
                ano INTEGER NOT NULL,
                resposta_correta TEXT,
                competencia TEXT,
                dificuldade TEXT,
                fonte TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_questoes_materia_ano ON questoes(materia, ano)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS simulados (
                id UUID PRIMARY KEY,
                titulo TEXT NOT NULL,
                descricao TEXT,
                questao_ids UUID[] NOT NULL DEFAULT '{}',
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Migrations complete");
        Ok(())
    }
}

#[async_trait]
impl QuestionStore for PgStore {
    async fn insert_question(&self, new: NewQuestion) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let NewQuestion { question, source } = new;

        let numero = i32::try_from(question.number)
            .map_err(|_| StoreError::InvalidInput(format!("numero {}", question.number)))?;

        sqlx::query(
            r#"
            INSERT INTO questoes
                (id, numero, enunciado, alternativas, materia, ano, resposta_correta, fonte)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(id)
        .bind(numero)
        .bind(question.statement)
        .bind(Json(question.alternatives))
        .bind(question.subject.label())
        .bind(question.year)
        .bind(question.correct_answer.map(|letter| letter.to_string()))
        .bind(source)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_questions(
        &self,
        filter: &QuestionFilter,
    ) -> Result<Vec<StoredQuestion>, StoreError> {
        let sql = format!(
            "SELECT {} FROM questoes \
             WHERE ($1::text IS NULL OR materia = $1) AND ($2::int IS NULL OR ano = $2) \
             ORDER BY ano DESC, numero, id LIMIT $3 OFFSET $4",
            QUESTION_COLUMNS
        );

        let rows: Vec<QuestionRow> = sqlx::query_as(&sql)
            .bind(filter.subject.map(|s| s.label()))
            .bind(filter.year)
            .bind(filter.effective_limit())
            .bind(filter.effective_offset())
            .fetch_all(&self.pool)
            .await?;

        into_stored(rows)
    }

    async fn get_question(&self, id: Uuid) -> Result<Option<StoredQuestion>, StoreError> {
        let sql = format!("SELECT {} FROM questoes WHERE id = $1", QUESTION_COLUMNS);

        let row: Option<QuestionRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(StoredQuestion::try_from).transpose()
    }

    async fn get_questions(&self, ids: &[Uuid]) -> Result<Vec<StoredQuestion>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT {} FROM questoes WHERE id = ANY($1)", QUESTION_COLUMNS);
        let rows: Vec<QuestionRow> = sqlx::query_as(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(order_by_ids(into_stored(rows)?, ids))
    }

    async fn list_uncategorized(
        &self,
        after: Option<Uuid>,
        limit: i64,
    ) -> Result<UncategorizedPage, StoreError> {
        let sql = format!(
            "SELECT {} FROM questoes \
             WHERE dificuldade IS NULL AND ($1::uuid IS NULL OR id > $1) \
             ORDER BY id LIMIT $2",
            QUESTION_COLUMNS
        );

        let rows: Vec<QuestionRow> = sqlx::query_as(&sql)
            .bind(after)
            .bind(limit.max(1))
            .fetch_all(&self.pool)
            .await?;

        Ok(into_page(rows))
    }

    async fn update_categorization(
        &self,
        id: Uuid,
        categorization: &Categorization,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE questoes
            SET materia = $2, competencia = $3, dificuldade = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(categorization.subject.label())
        .bind(categorization.competency.as_deref())
        .bind(categorization.difficulty.label())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SimuladoStore for PgStore {
    async fn create_simulado(&self, new: NewSimulado) -> Result<Simulado, StoreError> {
        validate_new_simulado(&new)?;

        let existing: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM questoes WHERE id = ANY($1)")
            .bind(&new.question_ids)
            .fetch_all(&self.pool)
            .await?;

        let missing: Vec<Uuid> = new
            .question_ids
            .iter()
            .filter(|id| !existing.contains(id))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(StoreError::UnknownQuestions(missing));
        }

        let row: SimuladoRow = sqlx::query_as(
            r#"
            INSERT INTO simulados (id, titulo, descricao, questao_ids)
            VALUES ($1, $2, $3, $4)
            RETURNING id, titulo, descricao, questao_ids, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.title.trim())
        .bind(new.description)
        .bind(new.question_ids)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list_simulados(&self) -> Result<Vec<Simulado>, StoreError> {
        let rows: Vec<SimuladoRow> = sqlx::query_as(
            "SELECT id, titulo, descricao, questao_ids, created_at \
             FROM simulados ORDER BY created_at DESC, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Simulado::from).collect())
    }

    async fn get_simulado(&self, id: Uuid) -> Result<Option<Simulado>, StoreError> {
        let row: Option<SimuladoRow> = sqlx::query_as(
            "SELECT id, titulo, descricao, questao_ids, created_at FROM simulados WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Simulado::from))
    }

    async fn delete_simulado(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM simulados WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
