//! Monthly dashboard figures for one user

use std::sync::Arc;

use tracing::debug;

use super::transaction_service::month_query;
use crate::domain::{
    summarize_month, Budget, Category, DomainError, Month, MonthlyOverview, SavingGoal, Storage,
    StoreQuery, Transaction, UserId,
};

#[derive(Debug)]
pub struct OverviewService {
    transactions: Arc<dyn Storage<Transaction>>,
    budgets: Arc<dyn Storage<Budget>>,
    goals: Arc<dyn Storage<SavingGoal>>,
    categories: Arc<dyn Storage<Category>>,
}

impl OverviewService {
    pub fn new(
        transactions: Arc<dyn Storage<Transaction>>,
        budgets: Arc<dyn Storage<Budget>>,
        goals: Arc<dyn Storage<SavingGoal>>,
        categories: Arc<dyn Storage<Category>>,
    ) -> Self {
        Self {
            transactions,
            budgets,
            goals,
            categories,
        }
    }

    pub async fn monthly(
        &self,
        user_id: &str,
        month: Option<Month>,
    ) -> Result<MonthlyOverview, DomainError> {
        let user_id = UserId::new(user_id)?;
        let month = month.unwrap_or_else(Month::current);
        let by_user = StoreQuery::new().eq("user_id", &user_id);
        let in_month = month_query(&user_id, month);

        let (transactions, budgets, goals, categories) = futures::try_join!(
            self.transactions.select(&in_month),
            self.budgets.select(&by_user),
            self.goals.select(&by_user),
            self.categories.list(),
        )?;

        debug!(
            user_id = %user_id,
            month = %month,
            transactions = transactions.len(),
            "Building monthly overview"
        );
        summarize_month(month, &transactions, &budgets, &goals, &categories)
    }
}
