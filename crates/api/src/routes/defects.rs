//! Route definitions for defects.
//!
//! Mounted at `/defects` by `api_routes()`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::defects;
use crate::state::AppState;

/// Defect routes.
///
/// ```text
/// GET    /                  -> list_defects
/// POST   /                  -> create_defect
/// GET    /{id}              -> get_defect
/// PUT    /{id}              -> update_defect
/// DELETE /{id}              -> delete_defect
/// POST   /{id}/advance      -> advance_defect (?expected_status=)
/// PUT    /{id}/status       -> set_defect_status
/// GET    /{id}/documents    -> list_defect_documents
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(defects::list_defects).post(defects::create_defect),
        )
        .route(
            "/{id}",
            get(defects::get_defect)
                .put(defects::update_defect)
                .delete(defects::delete_defect),
        )
        .route("/{id}/advance", post(defects::advance_defect))
        .route("/{id}/status", put(defects::set_defect_status))
        .route("/{id}/documents", get(defects::list_defect_documents))
}
