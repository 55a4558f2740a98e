//! Budget service and monthly budget-limit checks

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use super::transaction_service::month_query;
use crate::domain::{
    analyze_budgets, group_by_month, Budget, BudgetAnalysis, BudgetId, CategoryId, DomainError,
    Month, MonthlyBudgets, Storage, StoreQuery, Transaction, UserId,
};

const REQUIRED_FIELDS: &str = "User ID, Category ID, and Amount are required.";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBudgetRequest {
    pub user_id: Option<String>,
    pub category_id: Option<String>,
    pub amount: Option<Decimal>,
    /// `YYYY-MM` or `YYYY-MM-DD`; the current month when absent
    pub month: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBudgetRequest {
    pub category_id: Option<String>,
    pub amount: Option<Decimal>,
    pub month: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn user_query(user_id: Option<&str>) -> Result<StoreQuery, DomainError> {
    Ok(match user_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => StoreQuery::new().eq("user_id", UserId::new(id)?),
        None => StoreQuery::new(),
    })
}

#[derive(Debug)]
pub struct BudgetService {
    budgets: Arc<dyn Storage<Budget>>,
    transactions: Arc<dyn Storage<Transaction>>,
}

impl BudgetService {
    pub fn new(
        budgets: Arc<dyn Storage<Budget>>,
        transactions: Arc<dyn Storage<Transaction>>,
    ) -> Self {
        Self {
            budgets,
            transactions,
        }
    }

    /// Create a budget; several budgets may share a user, category and month
    pub async fn create(&self, request: CreateBudgetRequest) -> Result<Budget, DomainError> {
        let (Some(user_id), Some(category_id), Some(amount)) = (
            present(&request.user_id),
            present(&request.category_id),
            request.amount,
        ) else {
            return Err(DomainError::validation(REQUIRED_FIELDS));
        };

        let month = Month::parse_or_current(request.month.as_deref())?;
        let budget = Budget::new(
            UserId::new(user_id)?,
            CategoryId::new(category_id)?,
            amount,
            month,
        )?;

        info!(
            id = %budget.id(),
            user_id = %budget.user_id(),
            month = %month,
            "Creating budget"
        );
        self.budgets.create(budget).await
    }

    pub async fn list(&self, user_id: Option<&str>) -> Result<Vec<Budget>, DomainError> {
        self.budgets.select(&user_query(user_id)?).await
    }

    /// Budgets grouped by month, newest month first
    pub async fn list_by_month(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<MonthlyBudgets>, DomainError> {
        Ok(group_by_month(self.list(user_id).await?))
    }

    pub async fn get(&self, id: &str) -> Result<Budget, DomainError> {
        let budget_id = BudgetId::new(id)?;

        self.budgets
            .get(&budget_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Budget '{}' not found", budget_id)))
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateBudgetRequest,
    ) -> Result<Budget, DomainError> {
        info!(id = %id, "Updating budget");

        let mut budget = self.get(id).await?;

        if let Some(category_id) = present(&request.category_id) {
            budget.set_category_id(CategoryId::new(category_id)?);
        }
        if let Some(amount) = request.amount {
            budget.set_amount(amount)?;
        }
        if let Some(month) = present(&request.month) {
            budget.set_month(Month::parse(month)?);
        }

        self.budgets.update(budget).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        info!(id = %id, "Deleting budget");

        let budget_id = BudgetId::new(id)?;
        if !self.budgets.delete(&budget_id).await? {
            return Err(DomainError::not_found(format!("Budget '{}' not found", budget_id)));
        }
        Ok(())
    }

    /// Compare each of the user's budgets for `month` against that month's expenses
    ///
    /// A user without budgets gets an empty list.
    pub async fn check_budget_limits(
        &self,
        user_id: &str,
        month: Option<Month>,
    ) -> Result<Vec<BudgetAnalysis>, DomainError> {
        let user_id = UserId::new(user_id)?;
        let month = month.unwrap_or_else(Month::current);

        let budgets = self
            .budgets
            .select(&StoreQuery::new().eq("user_id", &user_id))
            .await?;

        if budgets.is_empty() {
            debug!(user_id = %user_id, "No budgets to check");
            return Ok(Vec::new());
        }

        let transactions = self.transactions.select(&month_query(&user_id, month)).await?;
        let analysis = analyze_budgets(month, &budgets, &transactions)?;

        debug!(
            user_id = %user_id,
            month = %month,
            checked = analysis.len(),
            exceeded = analysis.iter().filter(|a| a.exceeded).count(),
            "Checked budget limits"
        );
        Ok(analysis)
    }
}
