//! Savings goal endpoints

use axum::extract::{Path, State};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Envelope, Json, Query};
use crate::domain::SavingGoal;
use crate::infrastructure::services::{
    AdjustedGoal, CreateSavingGoalRequest, UpdateSavingGoalRequest,
};

#[derive(Debug, Default, Deserialize)]
pub struct SavingGoalListQuery {
    pub user_id: Option<String>,
}

/// Signed amount to move into (positive) or out of (negative) a goal
#[derive(Debug, Deserialize)]
pub struct AdjustSavedRequest {
    pub delta: Decimal,
}

pub async fn list_saving_goals(
    State(state): State<AppState>,
    Query(query): Query<SavingGoalListQuery>,
) -> Result<Envelope<Vec<SavingGoal>>, ApiError> {
    Ok(Envelope::data(
        state.saving_goals.list(query.user_id.as_deref()).await?,
    ))
}

pub async fn create_saving_goal(
    State(state): State<AppState>,
    Json(request): Json<CreateSavingGoalRequest>,
) -> Result<Envelope<SavingGoal>, ApiError> {
    let goal = state.saving_goals.create(request).await?;
    Ok(Envelope::data(goal).with_message("Saving Goal added Successfully!"))
}

pub async fn get_saving_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<SavingGoal>, ApiError> {
    Ok(Envelope::data(state.saving_goals.get(&id).await?))
}

pub async fn update_saving_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateSavingGoalRequest>,
) -> Result<Envelope<SavingGoal>, ApiError> {
    let goal = state.saving_goals.update(&id, request).await?;
    Ok(Envelope::data(goal).with_message("Saving Goal updated Successfully!"))
}

/// POST /saving_goals/{id}/adjust
pub async fn adjust_saved_amount(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AdjustSavedRequest>,
) -> Result<Envelope<AdjustedGoal>, ApiError> {
    let adjusted = state.saving_goals.adjust_saved(&id, request.delta).await?;
    let reached = adjusted.adjustment.reached_target;
    let envelope = Envelope::data(adjusted);

    Ok(if reached {
        envelope.with_message("Saving goal reached!")
    } else {
        envelope
    })
}

pub async fn delete_saving_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<()>, ApiError> {
    state.saving_goals.delete(&id).await?;
    Ok(Envelope::message("Saving Goal deleted Successfully!"))
}
