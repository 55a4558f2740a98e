use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::category::CategoryId;
use crate::domain::id::entity_id;
use crate::domain::month::Month;
use crate::domain::storage::StorageEntity;
use crate::domain::user::UserId;
use crate::domain::DomainError;

entity_id!(BudgetId, "Budget");

/// Spending ceiling for one category in one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    id: BudgetId,
    user_id: UserId,
    category_id: CategoryId,
    amount: Decimal,
    month: Month,
}

impl Budget {
    pub fn new(
        user_id: UserId,
        category_id: CategoryId,
        amount: Decimal,
        month: Month,
    ) -> Result<Self, DomainError> {
        validate_amount(amount)?;

        Ok(Self {
            id: BudgetId::generate(),
            user_id,
            category_id,
            amount,
            month,
        })
    }

    pub fn id(&self) -> &BudgetId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn category_id(&self) -> &CategoryId {
        &self.category_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn set_category_id(&mut self, category_id: CategoryId) {
        self.category_id = category_id;
    }

    pub fn set_amount(&mut self, amount: Decimal) -> Result<(), DomainError> {
        validate_amount(amount)?;
        self.amount = amount;
        Ok(())
    }

    pub fn set_month(&mut self, month: Month) {
        self.month = month;
    }
}

fn validate_amount(amount: Decimal) -> Result<(), DomainError> {
    if amount < Decimal::ZERO {
        return Err(DomainError::validation("Budget amount must not be negative."));
    }
    Ok(())
}

impl StorageEntity for Budget {
    type Key = BudgetId;
    const TABLE: &'static str = "budgets";

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

/// Budgets sharing a month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBudgets {
    pub month: String,
    pub budgets: Vec<Budget>,
}

/// Group budgets by month, newest month first, keeping store order within a month
pub fn group_by_month(budgets: Vec<Budget>) -> Vec<MonthlyBudgets> {
    let mut groups: BTreeMap<Month, Vec<Budget>> = BTreeMap::new();

    for budget in budgets {
        groups.entry(budget.month()).or_default().push(budget);
    }

    groups
        .into_iter()
        .rev()
        .map(|(month, budgets)| MonthlyBudgets {
            month: month.to_string(),
            budgets,
        })
        .collect()
}
