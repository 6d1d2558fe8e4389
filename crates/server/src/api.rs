// HTTP API layer.
//
// Routes:
//   GET    /documents                              — list (no block content)
//   POST   /documents                              — create
//   DELETE /documents                              — bulk delete by title set
//   GET    /documents/{title}                      — fetch one document
//   POST   /documents/{title}                      — add tab
//   PUT    /documents/{title}/{tab_index}          — append block (?name=&code=, raw text body)
//   GET    /documents/{title}/{tab_index}/{block_id} — fetch one block
//   PUT    /documents/{title}/{tab_index}/{block_id} — update block content
//
// Request/response shaping only; all policy lives in the service layer.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use quire_common::types::{Block, BlockUpdateRequest, Document, Tab};
use serde::Deserialize;

use crate::{
    error::{ApiError, ErrorCode},
    service::{DocumentService, ServiceError},
};

#[derive(Clone)]
struct ApiState {
    service: DocumentService,
}

#[derive(Deserialize)]
struct AppendBlockQuery {
    name: Option<String>,
    code: Option<bool>,
}

pub fn router(service: DocumentService) -> Router {
    let state = ApiState { service };

    Router::new()
        .route(
            "/documents",
            get(list_documents).post(create_document).delete(delete_documents),
        )
        .route("/documents/{title}", get(get_document).post(add_tab))
        .route("/documents/{title}/{tab_index}", axum::routing::put(append_block))
        .route(
            "/documents/{title}/{tab_index}/{block_id}",
            get(get_block).put(update_block),
        )
        .with_state(state)
}

// ── Handlers ───────────────────────────────────────────────────────

async fn list_documents(State(state): State<ApiState>) -> Result<Response, ApiError> {
    let documents = state.service.list_documents().await.map_err(map_service_error)?;
    Ok(Json(documents).into_response())
}

async fn get_document(
    State(state): State<ApiState>,
    Path(title): Path<String>,
) -> Result<Response, ApiError> {
    match state.service.get_document(&title).await.map_err(map_service_error)? {
        Some(document) => Ok(Json(document).into_response()),
        None => Err(ApiError::new(ErrorCode::NotFound, "document not found")),
    }
}

async fn create_document(
    State(state): State<ApiState>,
    Json(payload): Json<Document>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let created = state.service.create_document(payload).await.map_err(map_service_error)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_documents(
    State(state): State<ApiState>,
    Json(titles): Json<Vec<String>>,
) -> Result<Json<usize>, ApiError> {
    let count = state.service.delete_documents(&titles).await.map_err(map_service_error)?;
    Ok(Json(count))
}

async fn append_block(
    State(state): State<ApiState>,
    Path((title, tab_index)): Path<(String, usize)>,
    Query(query): Query<AppendBlockQuery>,
    text: String,
) -> Result<Json<Document>, ApiError> {
    let author = query.name.unwrap_or_default();
    let is_code = query.code.unwrap_or(false);

    let document = state
        .service
        .append_block(&title, tab_index, &text, &author, is_code)
        .await
        .map_err(map_service_error)?;
    Ok(Json(document))
}

async fn get_block(
    State(state): State<ApiState>,
    Path((title, tab_index, block_id)): Path<(String, usize, String)>,
) -> Result<Response, ApiError> {
    match state
        .service
        .get_block(&title, tab_index, &block_id)
        .await
        .map_err(map_service_error)?
    {
        Some(block) => Ok(Json(block).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

async fn update_block(
    State(state): State<ApiState>,
    Path((title, tab_index, block_id)): Path<(String, usize, String)>,
    Json(payload): Json<BlockUpdateRequest>,
) -> Result<Response, ApiError> {
    let updated: Option<Block> = state
        .service
        .update_block(&title, tab_index, &block_id, payload)
        .await
        .map_err(map_service_error)?;

    match updated {
        Some(block) => Ok(Json(block).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

async fn add_tab(
    State(state): State<ApiState>,
    Path(title): Path<String>,
    Json(tab): Json<Tab>,
) -> Result<Json<Tab>, ApiError> {
    let added = state.service.add_tab(&title, tab).await.map_err(|error| match error {
        // This endpoint reports a missing document as a bad request.
        ServiceError::NotFound => {
            ApiError::new(ErrorCode::ValidationFailed, "document does not exist")
        }
        other => map_service_error(other),
    })?;
    Ok(Json(added))
}

fn map_service_error(error: ServiceError) -> ApiError {
    match error {
        ServiceError::NotFound => ApiError::from_code(ErrorCode::NotFound),
        ServiceError::DuplicateTitle => ApiError::from_code(ErrorCode::TitleConflict),
        ServiceError::IndexOutOfRange(index) => {
            ApiError::from_code(ErrorCode::TabIndexOutOfRange)
                .with_details(serde_json::json!({ "tabIndex": index }))
        }
        ServiceError::RejectedUpdate(reason) => ApiError::new(ErrorCode::UpdateRejected, reason),
        ServiceError::Filter(error) => {
            tracing::warn!(error = %error, "content filter call failed");
            ApiError::from_code(ErrorCode::FilterUnavailable)
        }
        ServiceError::Store(error) => {
            tracing::error!(error = %error, "document store failure");
            ApiError::from_code(ErrorCode::InternalError)
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────
