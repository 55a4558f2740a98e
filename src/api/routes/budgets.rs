//! Budget endpoints and the monthly budget check

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Envelope, Json, Query};
use crate::domain::{Budget, BudgetAlert, BudgetAnalysis, Month, MonthlyBudgets};
use crate::infrastructure::services::{CreateBudgetRequest, UpdateBudgetRequest};

#[derive(Debug, Default, Deserialize)]
pub struct BudgetListQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BudgetAnalysisQuery {
    #[serde(default)]
    pub user_id: String,
    pub month: Option<String>,
}

/// One budget check with its alert classification
#[derive(Debug, Serialize)]
pub struct BudgetStatus {
    #[serde(flatten)]
    pub analysis: BudgetAnalysis,
    pub alert: BudgetAlert,
}

impl From<BudgetAnalysis> for BudgetStatus {
    fn from(analysis: BudgetAnalysis) -> Self {
        Self {
            alert: analysis.alert(),
            analysis,
        }
    }
}

/// GET /budgets?user_id=
pub async fn list_budgets(
    State(state): State<AppState>,
    Query(query): Query<BudgetListQuery>,
) -> Result<Envelope<Vec<Budget>>, ApiError> {
    Ok(Envelope::data(state.budgets.list(query.user_id.as_deref()).await?))
}

/// GET /budgets/by-month?user_id=
pub async fn list_budgets_by_month(
    State(state): State<AppState>,
    Query(query): Query<BudgetListQuery>,
) -> Result<Envelope<Vec<MonthlyBudgets>>, ApiError> {
    Ok(Envelope::data(
        state.budgets.list_by_month(query.user_id.as_deref()).await?,
    ))
}

/// GET /budgets/analysis?user_id=&month=
pub async fn check_budget_limits(
    State(state): State<AppState>,
    Query(query): Query<BudgetAnalysisQuery>,
) -> Result<Envelope<Vec<BudgetStatus>>, ApiError> {
    let month = Month::parse_or_current(query.month.as_deref())?;
    let analysis = state
        .budgets
        .check_budget_limits(&query.user_id, Some(month))
        .await?;

    Ok(Envelope::data(
        analysis.into_iter().map(BudgetStatus::from).collect(),
    ))
}

pub async fn create_budget(
    State(state): State<AppState>,
    Json(request): Json<CreateBudgetRequest>,
) -> Result<Envelope<Budget>, ApiError> {
    let budget = state.budgets.create(request).await?;
    Ok(Envelope::data(budget).with_message("Budget added Successfully!"))
}

pub async fn get_budget(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<Budget>, ApiError> {
    Ok(Envelope::data(state.budgets.get(&id).await?))
}

pub async fn update_budget(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateBudgetRequest>,
) -> Result<Envelope<Budget>, ApiError> {
    let budget = state.budgets.update(&id, request).await?;
    Ok(Envelope::data(budget).with_message("Budget updated Successfully!"))
}

pub async fn delete_budget(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<()>, ApiError> {
    state.budgets.delete(&id).await?;
    Ok(Envelope::message("Budget deleted Successfully!"))
}
