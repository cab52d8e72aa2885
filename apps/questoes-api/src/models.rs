//! Request and response bodies for the questões API

use questoes_db::{Simulado, StoredQuestion};
use serde::{Deserialize, Serialize};
use shared_types::ExtractionResult;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Query string of `GET /api/questoes`
#[derive(Debug, Default, Deserialize)]
pub struct ListQuestionsQuery {
    pub materia: Option<String>,
    pub ano: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Body of `POST /api/questoes/extrair`
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    /// Exam text
    pub texto: String,
    /// Answer key text
    #[serde(default)]
    pub gabarito: Option<String>,
    /// Persist the extracted questions
    #[serde(default)]
    pub salvar: bool,
    /// Source label stored with each question
    #[serde(default)]
    pub fonte: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    #[serde(flatten)]
    pub result: ExtractionResult,
    /// Ids of the stored questions, in extraction order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<Uuid>,
}

/// A simulado with its questions resolved
#[derive(Debug, Serialize)]
pub struct SimuladoDetail {
    #[serde(flatten)]
    pub simulado: Simulado,
    pub questoes: Vec<StoredQuestion>,
}
