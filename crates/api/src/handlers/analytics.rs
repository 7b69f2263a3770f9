//! Aggregate statistics for the dashboard's analytics tab.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use pulse_core::stats;
use pulse_db::models::defect::DefectRow;
use pulse_db::repositories::DefectRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /analytics/defects -- counts and percentages by severity and status.
pub async fn defect_breakdown(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let defects = DefectRepo::list_all(&state.pool)
        .await?
        .into_iter()
        .map(DefectRow::into_domain)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(DataResponse {
        data: stats::compute(&defects),
    }))
}
