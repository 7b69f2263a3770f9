//! Route definitions for users. Mounted at `/users`.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// ```text
/// GET    /                  -> list_users
/// POST   /                  -> create_user
/// GET    /{id}              -> get_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/{id}", get(users::get_user))
}
