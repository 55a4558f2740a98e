//! Budget-versus-spend evaluation for a single month

use rust_decimal::Decimal;
use serde::Serialize;

use super::entity::Budget;
use crate::domain::money;
use crate::domain::category::CategoryId;
use crate::domain::month::Month;
use crate::domain::transaction::Transaction;
use crate::domain::DomainError;

const WARNING_PERCENTAGE: Decimal = Decimal::from_parts(90, 0, 0, false, 0);
const WELL_UNDER_PERCENTAGE: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Spend against one budget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetAnalysis {
    pub category_id: CategoryId,
    pub budget_amount: Decimal,
    pub spent_amount: Decimal,
    pub remaining_amount: Decimal,
    pub exceeded: bool,
    pub percentage_used: Decimal,
}

/// How a budget's consumers should flag it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetAlert {
    /// Spend is over the ceiling
    Exceeded,
    /// At least 90% used
    Warning,
    /// At most 20% used
    WellUnder,
    OnTrack,
}

impl BudgetAnalysis {
    fn compute(budget: &Budget, spent: Decimal) -> Result<Self, DomainError> {
        let budget_amount = budget.amount();
        let percentage_used = if budget_amount > Decimal::ZERO {
            money::percentage(spent, budget_amount)?
        } else {
            Decimal::ZERO
        };

        Ok(Self {
            category_id: budget.category_id().clone(),
            budget_amount,
            spent_amount: spent,
            remaining_amount: money::sub(budget_amount, spent)?,
            exceeded: spent > budget_amount,
            percentage_used,
        })
    }

    /// Exceeded wins over the percentage thresholds
    pub fn alert(&self) -> BudgetAlert {
        if self.exceeded {
            BudgetAlert::Exceeded
        } else if self.percentage_used >= WARNING_PERCENTAGE {
            BudgetAlert::Warning
        } else if self.percentage_used <= WELL_UNDER_PERCENTAGE {
            BudgetAlert::WellUnder
        } else {
            BudgetAlert::OnTrack
        }
    }
}

/// Evaluate every budget set for `month` against that month's expenses
///
/// Budgets for other months are skipped. Only expense transactions dated
/// inside the month and matching the budget's category count as spend.
/// Results follow the order of `budgets`. Fails when the amounts are too
/// large to compute with.
pub fn analyze_budgets(
    month: Month,
    budgets: &[Budget],
    transactions: &[Transaction],
) -> Result<Vec<BudgetAnalysis>, DomainError> {
    budgets
        .iter()
        .filter(|budget| budget.month() == month)
        .map(|budget| {
            let spent = money::total(
                transactions
                    .iter()
                    .filter(|t| t.kind().is_expense())
                    .filter(|t| t.category_id() == budget.category_id())
                    .filter(|t| month.contains(t.date()))
                    .map(Transaction::amount),
            )?;

            BudgetAnalysis::compute(budget, spent)
        })
        .collect()
}
