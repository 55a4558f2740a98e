//! Monthly per-category budgets and spend analysis

mod analysis;
mod entity;

pub use analysis::{analyze_budgets, BudgetAlert, BudgetAnalysis};
pub use entity::{group_by_month, Budget, BudgetId, MonthlyBudgets};
