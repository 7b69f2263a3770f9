//! Handlers for staff users.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use pulse_core::error::CoreError;
use pulse_core::types::DbId;
use pulse_core::user::{self, UserRole};
use pulse_db::models::user::CreateUser;
use pulse_db::repositories::UserRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /users
// ---------------------------------------------------------------------------

pub async fn list_users(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

// ---------------------------------------------------------------------------
// GET /users/{id}
// ---------------------------------------------------------------------------

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(DataResponse { data: user }))
}

// ---------------------------------------------------------------------------
// POST /users
// ---------------------------------------------------------------------------

/// Create a user. Emails are unique regardless of case.
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    user::validate_name(&input.name)?;
    if let Some(ref role) = input.role {
        UserRole::from_str_db(role)?;
    }

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "A user with email '{}' already exists",
            input.email
        ))));
    }

    let created = UserRepo::create(&state.pool, &input).await?;

    tracing::info!(user_id = created.id, role = %created.role, "User created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}
