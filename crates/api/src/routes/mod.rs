pub mod analytics;
pub mod defects;
pub mod documents;
pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /defects                         list (?severity=&status=), create
/// /defects/{id}                    get, update, delete
/// /defects/{id}/advance            move to the next stage (POST)
/// /defects/{id}/status             set the next stage explicitly (PUT)
/// /defects/{id}/documents          linked documents (GET)
///
/// /documents                       list (?status=&priority=&doc_type=&defect_id=), create
/// /documents/{id}                  get, update, delete
///
/// /users                           list, create
/// /users/{id}                      get
///
/// /analytics/defects               severity and status breakdown (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/defects", defects::router())
        .nest("/documents", documents::router())
        .nest("/users", users::router())
        .nest("/analytics", analytics::router())
}
