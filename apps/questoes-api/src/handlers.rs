//! HTTP handlers for the questões API

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use questoes_db::{NewQuestion, NewSimulado, QuestionFilter, Simulado, StoredQuestion};
use shared_types::Subject;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::*;
use crate::state::AppState;

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidRequest(format!("Invalid id: {}", raw)))
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "questoes-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// List questions, optionally filtered by subject and year
pub async fn list_questoes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuestionsQuery>,
) -> Result<Json<Vec<StoredQuestion>>, ApiError> {
    let subject = query
        .materia
        .as_deref()
        .map(str::parse::<Subject>)
        .transpose()
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let filter = QuestionFilter {
        subject,
        year: query.ano,
        limit: query.limit,
        offset: query.offset,
    };

    Ok(Json(state.store.list_questions(&filter).await?))
}

/// Fetch one question
pub async fn get_questao(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StoredQuestion>, ApiError> {
    let id = parse_id(&id)?;
    state
        .store
        .get_question(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Question {}", id)))
}

/// Extract questions from posted exam text, optionally storing them
pub async fn extrair(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ApiError> {
    let extractor = state.extractor;
    let ExtractRequest {
        texto,
        gabarito,
        salvar,
        fonte,
    } = req;

    let result =
        tokio::task::spawn_blocking(move || extractor.extract(&texto, gabarito.as_deref()))
            .await
            .map_err(anyhow::Error::from)?;

    let mut ids = Vec::new();
    if salvar {
        for question in &result.questions {
            let id = state
                .store
                .insert_question(NewQuestion::new(question.clone(), fonte.clone()))
                .await?;
            ids.push(id);
        }
        tracing::info!("Stored {} extracted question(s)", ids.len());
    }

    Ok(Json(ExtractResponse { result, ids }))
}

/// List simulados
pub async fn list_simulados(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Simulado>>, ApiError> {
    Ok(Json(state.store.list_simulados().await?))
}

/// Create a simulado from existing questions
pub async fn create_simulado(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewSimulado>,
) -> Result<(StatusCode, Json<Simulado>), ApiError> {
    let simulado = state.store.create_simulado(req).await?;
    tracing::info!(
        "Created simulado {} with {} question(s)",
        simulado.id,
        simulado.question_ids.len()
    );
    Ok((StatusCode::CREATED, Json(simulado)))
}

/// Fetch a simulado with its questions
pub async fn get_simulado(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SimuladoDetail>, ApiError> {
    let id = parse_id(&id)?;
    let simulado = state
        .store
        .get_simulado(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Simulado {}", id)))?;

    let questoes = state.store.get_questions(&simulado.question_ids).await?;
    Ok(Json(SimuladoDetail { simulado, questoes }))
}

/// Delete a simulado
pub async fn delete_simulado(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if state.store.delete_simulado(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Simulado {}", id)))
    }
}
