//! Route definitions for defect documents.
//!
//! Mounted at `/documents` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// Document routes.
///
/// ```text
/// GET    /                  -> list_documents
/// POST   /                  -> create_document
/// GET    /{id}              -> get_document
/// PUT    /{id}              -> update_document
/// DELETE /{id}              -> delete_document
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(documents::list_documents).post(documents::create_document),
        )
        .route(
            "/{id}",
            get(documents::get_document)
                .put(documents::update_document)
                .delete(documents::delete_document),
        )
}
