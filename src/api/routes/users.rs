//! User profile endpoints

use axum::extract::{Path, State};
use serde::Deserialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Envelope, Json, Query};
use crate::domain::{Month, MonthlyOverview, User};
use crate::infrastructure::services::{CreateUserRequest, UpdateUserRequest};

#[derive(Debug, Default, Deserialize)]
pub struct OverviewQuery {
    pub month: Option<String>,
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Envelope<Vec<User>>, ApiError> {
    Ok(Envelope::data(state.users.list().await?))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Envelope<User>, ApiError> {
    let user = state.users.create(request).await?;
    Ok(Envelope::data(user).with_message("User added Successfully!"))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<User>, ApiError> {
    Ok(Envelope::data(state.users.get(&id).await?))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Envelope<User>, ApiError> {
    let user = state.users.update(&id, request).await?;
    Ok(Envelope::data(user).with_message("User updated Successfully!"))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<()>, ApiError> {
    state.users.delete(&id).await?;
    Ok(Envelope::message("User deleted Successfully!"))
}

/// GET /users/{id}/overview?month=YYYY-MM
pub async fn get_overview(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<OverviewQuery>,
) -> Result<Envelope<MonthlyOverview>, ApiError> {
    let month = Month::parse_or_current(query.month.as_deref())?;
    debug!(user_id = %id, month = %month, "Building overview");

    Ok(Envelope::data(state.overview.monthly(&id, Some(month)).await?))
}
