use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Analytics routes, mounted at `/analytics`.
///
/// ```text
/// GET    /defects           -> defect_breakdown
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/defects", get(analytics::defect_breakdown))
}
