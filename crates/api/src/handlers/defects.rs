//! Handlers for defect records and their repair lifecycle.
//!
//! The list endpoint loads every defect and narrows it with
//! [`DefectFilter`], so the response can report both the total and the
//! filtered count. Status only moves through `advance` and `status`; both
//! write conditionally so a concurrent editor gets a 409 instead of a lost
//! update.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use pulse_core::defect::{self, Defect, DefectStatus, Severity};
use pulse_core::error::CoreError;
use pulse_core::filter::DefectFilter;
use pulse_core::lifecycle::{self, Transition};
use pulse_core::types::DbId;
use pulse_db::models::defect::{
    AdvanceDefect, CreateDefect, DefectListParams, DefectRow, UpdateDefect, UpdateDefectStatus,
};
use pulse_db::repositories::{DefectRepo, DocumentRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::documents::DocumentView;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for the defect list: the filtered records plus counts for
/// "showing `filtered` of `total`".
#[derive(Debug, Serialize)]
pub struct DefectListResponse {
    pub data: Vec<Defect>,
    pub total: usize,
    pub filtered: usize,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Defect",
        id,
    })
}

async fn load_defect(state: &AppState, id: DbId) -> AppResult<Defect> {
    let row = DefectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(row.into_domain()?)
}

// ---------------------------------------------------------------------------
// GET /defects
// ---------------------------------------------------------------------------

/// List defects, optionally narrowed by severity and status (`all` or
/// absent means no constraint).
pub async fn list_defects(
    State(state): State<AppState>,
    Query(params): Query<DefectListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = DefectFilter::from_query(params.severity.as_deref(), params.status.as_deref())?;

    let defects = DefectRepo::list_all(&state.pool)
        .await?
        .into_iter()
        .map(DefectRow::into_domain)
        .collect::<Result<Vec<_>, _>>()?;

    let (data, summary) = filter.apply_owned(defects);

    Ok(Json(DefectListResponse {
        data,
        total: summary.total,
        filtered: summary.filtered,
    }))
}

// ---------------------------------------------------------------------------
// POST /defects
// ---------------------------------------------------------------------------

/// Report a new defect. It always starts in the `reported` stage.
pub async fn create_defect(
    State(state): State<AppState>,
    Json(input): Json<CreateDefect>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    Severity::from_str_db(&input.severity)?;
    defect::validate_images(&input.images)?;

    let created = DefectRepo::create(&state.pool, &input).await?.into_domain()?;

    tracing::info!(
        defect_id = created.id,
        severity = %created.severity,
        "Defect reported",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /defects/{id}
// ---------------------------------------------------------------------------

pub async fn get_defect(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let defect = load_defect(&state, id).await?;
    Ok(Json(DataResponse { data: defect }))
}

// ---------------------------------------------------------------------------
// PUT /defects/{id}
// ---------------------------------------------------------------------------

/// Patch descriptive fields. Status only moves through the lifecycle
/// endpoints.
pub async fn update_defect(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDefect>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(ref severity) = input.severity {
        Severity::from_str_db(severity)?;
    }
    if let Some(ref images) = input.images {
        defect::validate_images(images)?;
    }

    let updated = DefectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?
        .into_domain()?;

    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /defects/{id}
// ---------------------------------------------------------------------------

/// Delete a defect. Linked documents stay, with their link cleared.
pub async fn delete_defect(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !DefectRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(defect_id = id, "Defect deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /defects/{id}/advance
// ---------------------------------------------------------------------------

/// Move a defect to the next stage of the repair chain.
///
/// With `?expected_status=`, the advance only happens when the stored
/// status still matches; otherwise 409. Advancing a completed defect is
/// also a 409 and leaves the record untouched.
pub async fn advance_defect(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<AdvanceDefect>,
) -> AppResult<impl IntoResponse> {
    let current = load_defect(&state, id).await?;

    if let Some(ref expected) = params.expected_status {
        let expected = DefectStatus::from_str_db(expected)?;
        if expected != current.status {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Defect {id} is '{}', not '{expected}'",
                current.status
            ))));
        }
    }

    let transition = lifecycle::advance(current.status, Utc::now(), state.repair_lead())?;
    let updated = persist_transition(&state, id, &transition).await?;

    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// PUT /defects/{id}/status
// ---------------------------------------------------------------------------

/// Set the status explicitly. Only the single next stage is accepted.
pub async fn set_defect_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDefectStatus>,
) -> AppResult<impl IntoResponse> {
    let requested = DefectStatus::from_str_db(&input.status)?;
    let current = load_defect(&state, id).await?;

    let transition =
        lifecycle::transition(current.status, requested, Utc::now(), state.repair_lead())?;
    let updated = persist_transition(&state, id, &transition).await?;

    Ok(Json(DataResponse { data: updated }))
}

/// Write a transition conditioned on the status it was computed from.
///
/// When nothing is updated the row was either deleted (404) or moved by
/// another writer (409).
async fn persist_transition(
    state: &AppState,
    id: DbId,
    transition: &Transition,
) -> AppResult<Defect> {
    match DefectRepo::transition(&state.pool, id, transition).await? {
        Some(row) => {
            tracing::info!(
                defect_id = id,
                from = %transition.from,
                to = %transition.to,
                "Defect status changed",
            );
            Ok(row.into_domain()?)
        }
        None => {
            let current = DefectRepo::find_by_id(&state.pool, id)
                .await?
                .ok_or_else(|| not_found(id))?;
            tracing::warn!(
                defect_id = id,
                expected = %transition.from,
                actual = %current.status,
                "Concurrent status change detected",
            );
            Err(AppError::Core(CoreError::Conflict(format!(
                "Defect {id} changed from '{}' to '{}' before this update was applied",
                transition.from, current.status
            ))))
        }
    }
}

// ---------------------------------------------------------------------------
// GET /defects/{id}/documents
// ---------------------------------------------------------------------------

/// Documents linked to one defect, soonest due first.
pub async fn list_defect_documents(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    DefectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let today = Utc::now().date_naive();
    let documents: Vec<DocumentView> = DocumentRepo::list_for_defect(&state.pool, id)
        .await?
        .into_iter()
        .map(|document| DocumentView::new(document, today))
        .collect();

    Ok(Json(DataResponse { data: documents }))
}
