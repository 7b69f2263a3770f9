//! Handlers for defect paperwork (work orders, permits, invoices, ...).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use pulse_core::document::{self, DocumentStatus, DocumentType, Priority};
use pulse_core::error::CoreError;
use pulse_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use pulse_core::types::{Date, DbId};
use pulse_db::models::document::{CreateDocument, Document, DocumentListParams, UpdateDocument};
use pulse_db::repositories::DocumentRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// A document as served to the dashboard, with its overdue flag resolved
/// against today's date.
#[derive(Debug, Serialize)]
pub struct DocumentView {
    #[serde(flatten)]
    pub document: Document,
    pub overdue: bool,
}

impl DocumentView {
    pub fn new(document: Document, today: Date) -> Self {
        let overdue = document.is_overdue(today);
        Self { document, overdue }
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Document",
        id,
    })
}

fn validate_enums(
    doc_type: Option<&str>,
    status: Option<&str>,
    priority: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(t) = doc_type {
        DocumentType::from_str_db(t)?;
    }
    if let Some(s) = status {
        DocumentStatus::from_str_db(s)?;
    }
    if let Some(p) = priority {
        Priority::from_str_db(p)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// GET /documents
// ---------------------------------------------------------------------------

/// List documents with optional status, priority, type and defect filters.
pub async fn list_documents(
    State(state): State<AppState>,
    Query(params): Query<DocumentListParams>,
) -> AppResult<impl IntoResponse> {
    validate_enums(
        params.doc_type.as_deref(),
        params.status.as_deref(),
        params.priority.as_deref(),
    )?;

    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let today = Utc::now().date_naive();
    let documents: Vec<DocumentView> =
        DocumentRepo::list_filtered(&state.pool, &params, limit, offset)
            .await?
            .into_iter()
            .map(|d| DocumentView::new(d, today))
            .collect();

    Ok(Json(DataResponse { data: documents }))
}

// ---------------------------------------------------------------------------
// POST /documents
// ---------------------------------------------------------------------------

pub async fn create_document(
    State(state): State<AppState>,
    Json(input): Json<CreateDocument>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    document::validate_title(&input.title)?;
    document::validate_assignee(&input.assigned_to)?;
    validate_enums(
        Some(input.doc_type.as_str()),
        input.status.as_deref(),
        input.priority.as_deref(),
    )?;

    let created = DocumentRepo::create(&state.pool, &input).await?;

    tracing::info!(
        document_id = created.id,
        doc_type = %created.doc_type,
        defect_id = ?created.defect_id,
        "Document created",
    );

    let view = DocumentView::new(created, Utc::now().date_naive());
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

// ---------------------------------------------------------------------------
// GET /documents/{id}
// ---------------------------------------------------------------------------

pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let document = DocumentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let view = DocumentView::new(document, Utc::now().date_naive());
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// PUT /documents/{id}
// ---------------------------------------------------------------------------

pub async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDocument>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(ref title) = input.title {
        document::validate_title(title)?;
    }
    if let Some(ref assignee) = input.assigned_to {
        document::validate_assignee(assignee)?;
    }
    validate_enums(
        input.doc_type.as_deref(),
        input.status.as_deref(),
        input.priority.as_deref(),
    )?;

    let updated = DocumentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(ref status) = input.status {
        tracing::info!(document_id = id, status = %status, "Document status updated");
    }

    let view = DocumentView::new(updated, Utc::now().date_naive());
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// DELETE /documents/{id}
// ---------------------------------------------------------------------------

pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !DocumentRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
