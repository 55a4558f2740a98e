//! Per-user monthly summary of cash flow, budgets and goals

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::budget::Budget;
use super::category::{Category, CategoryId};
use super::money;
use super::month::Month;
use super::saving_goal::{GoalStatus, SavingGoal, SavingGoalId};
use super::transaction::{Transaction, TransactionType};
use super::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    pub category_id: CategoryId,
    /// None when the category no longer exists
    pub category_name: Option<String>,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub goal_id: SavingGoalId,
    pub name: String,
    pub saved_amount: Decimal,
    pub target_amount: Decimal,
    pub progress: Decimal,
    pub status: GoalStatus,
}

impl From<&SavingGoal> for GoalProgress {
    fn from(goal: &SavingGoal) -> Self {
        Self {
            goal_id: goal.id().clone(),
            name: goal.name().to_string(),
            saved_amount: goal.saved_amount(),
            target_amount: goal.target_amount(),
            progress: goal.progress(),
            status: goal.status(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyOverview {
    pub month: String,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub budgets_set: usize,
    pub active_goals: usize,
    /// Largest spend first
    pub expenses_by_category: Vec<CategorySpend>,
    pub goals: Vec<GoalProgress>,
}

/// Build the overview for `month` from a user's records
///
/// Transactions and budgets outside the month are ignored; goals are
/// reported regardless of month.
pub fn summarize_month(
    month: Month,
    transactions: &[Transaction],
    budgets: &[Budget],
    goals: &[SavingGoal],
    categories: &[Category],
) -> Result<MonthlyOverview, DomainError> {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    let mut by_category: HashMap<&CategoryId, Decimal> = HashMap::new();

    for transaction in transactions.iter().filter(|t| month.contains(t.date())) {
        let amount = transaction.amount();

        match transaction.kind() {
            TransactionType::Income => total_income = money::add(total_income, amount)?,
            TransactionType::Expense => {
                total_expense = money::add(total_expense, amount)?;
                let category_total = by_category.entry(transaction.category_id()).or_default();
                *category_total = money::add(*category_total, amount)?;
            }
        }
    }

    let names: HashMap<&CategoryId, &str> =
        categories.iter().map(|c| (c.id(), c.name())).collect();

    let mut expenses_by_category: Vec<CategorySpend> = by_category
        .into_iter()
        .map(|(category_id, total)| CategorySpend {
            category_id: category_id.clone(),
            category_name: names.get(category_id).map(|name| name.to_string()),
            total,
        })
        .collect();

    expenses_by_category.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category_id.as_str().cmp(b.category_id.as_str()))
    });

    Ok(MonthlyOverview {
        month: month.to_string(),
        total_income,
        total_expense,
        balance: money::sub(total_income, total_expense)?,
        budgets_set: budgets.iter().filter(|b| b.month() == month).count(),
        active_goals: goals.iter().filter(|g| g.is_active()).count(),
        expenses_by_category,
        goals: goals.iter().map(GoalProgress::from).collect(),
    })
}
