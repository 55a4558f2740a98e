//! Savings goal service

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    DomainError, GoalStatus, SavingGoal, SavingGoalId, SavingsAdjustment, Storage, StoreQuery,
    UserId,
};

const REQUIRED_FIELDS: &str = "User ID, Name, and Target Amount are required.";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSavingGoalRequest {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub target_amount: Option<Decimal>,
    pub saved_amount: Option<Decimal>,
    #[serde(alias = "target_date")]
    pub deadline: Option<NaiveDate>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSavingGoalRequest {
    pub name: Option<String>,
    pub target_amount: Option<Decimal>,
    pub saved_amount: Option<Decimal>,
    #[serde(alias = "target_date")]
    pub deadline: Option<NaiveDate>,
    pub status: Option<String>,
}

/// A goal after money was moved in or out, with the before/after totals
#[derive(Debug, Clone, Serialize)]
pub struct AdjustedGoal {
    pub goal: SavingGoal,
    #[serde(flatten)]
    pub adjustment: SavingsAdjustment,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug)]
pub struct SavingGoalService {
    storage: Arc<dyn Storage<SavingGoal>>,
}

impl SavingGoalService {
    pub fn new(storage: Arc<dyn Storage<SavingGoal>>) -> Self {
        Self { storage }
    }

    /// Create a goal; nothing saved, active and due in 30 days unless given
    pub async fn create(
        &self,
        request: CreateSavingGoalRequest,
    ) -> Result<SavingGoal, DomainError> {
        let (Some(user_id), Some(name), Some(target_amount)) = (
            present(&request.user_id),
            present(&request.name),
            request.target_amount,
        ) else {
            return Err(DomainError::validation(REQUIRED_FIELDS));
        };

        let mut goal = SavingGoal::new(UserId::new(user_id)?, name, target_amount)?
            .with_saved_amount(request.saved_amount.unwrap_or(Decimal::ZERO))?;

        if let Some(deadline) = request.deadline {
            goal = goal.with_deadline(deadline);
        }
        if let Some(status) = present(&request.status) {
            goal = goal.with_status(status.parse()?);
        }

        info!(id = %goal.id(), user_id = %goal.user_id(), "Creating saving goal");
        self.storage.create(goal).await
    }

    pub async fn list(&self, user_id: Option<&str>) -> Result<Vec<SavingGoal>, DomainError> {
        let query = match user_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => StoreQuery::new().eq("user_id", UserId::new(id)?),
            None => StoreQuery::new(),
        };
        self.storage.select(&query).await
    }

    pub async fn get(&self, id: &str) -> Result<SavingGoal, DomainError> {
        let goal_id = SavingGoalId::new(id)?;

        self.storage
            .get(&goal_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Saving goal '{}' not found", goal_id)))
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateSavingGoalRequest,
    ) -> Result<SavingGoal, DomainError> {
        info!(id = %id, "Updating saving goal");

        let mut goal = self.get(id).await?;

        if let Some(name) = request.name {
            goal.set_name(&name);
        }
        if let Some(target_amount) = request.target_amount {
            goal.set_target_amount(target_amount)?;
        }
        if let Some(saved_amount) = request.saved_amount {
            goal.set_saved_amount(saved_amount)?;
        }
        if let Some(deadline) = request.deadline {
            goal.set_deadline(deadline);
        }
        if let Some(status) = present(&request.status) {
            goal.set_status(status.parse::<GoalStatus>()?);
        }

        self.storage.update(goal).await
    }

    /// Move money into (positive delta) or out of a goal; the total stops at zero
    pub async fn adjust_saved(
        &self,
        id: &str,
        delta: Decimal,
    ) -> Result<AdjustedGoal, DomainError> {
        let mut goal = self.get(id).await?;
        let adjustment = goal.adjust_saved(delta)?;

        info!(
            id = %goal.id(),
            previous_total = %adjustment.previous_total,
            new_total = %adjustment.new_total,
            reached_target = adjustment.reached_target,
            "Adjusting saved amount"
        );

        let goal = self.storage.update(goal).await?;
        Ok(AdjustedGoal { goal, adjustment })
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        info!(id = %id, "Deleting saving goal");

        let goal_id = SavingGoalId::new(id)?;
        if !self.storage.delete(&goal_id).await? {
            return Err(DomainError::not_found(format!("Saving goal '{}' not found", goal_id)));
        }
        Ok(())
    }
}
