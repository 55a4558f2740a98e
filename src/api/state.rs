//! Application state for shared services

use std::sync::Arc;

use crate::domain::{Budget, Category, IdentityProvider, SavingGoal, Transaction, User};
use crate::infrastructure::services::{
    AuthService, BudgetService, CategoryService, OverviewService, SavingGoalService,
    TransactionService, UserService,
};
use crate::infrastructure::storage::StorageFactory;

/// Services shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub categories: Arc<CategoryService>,
    pub transactions: Arc<TransactionService>,
    pub budgets: Arc<BudgetService>,
    pub saving_goals: Arc<SavingGoalService>,
    pub overview: Arc<OverviewService>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Wire every service onto stores from one backend
    pub fn new(storage: &StorageFactory, identity: Arc<dyn IdentityProvider>) -> Self {
        let user_store = storage.create::<User>();
        let category_store = storage.create::<Category>();
        let transaction_store = storage.create::<Transaction>();
        let budget_store = storage.create::<Budget>();
        let goal_store = storage.create::<SavingGoal>();

        let users = Arc::new(UserService::new(user_store));

        Self {
            categories: Arc::new(CategoryService::new(category_store.clone())),
            transactions: Arc::new(TransactionService::new(transaction_store.clone())),
            budgets: Arc::new(BudgetService::new(
                budget_store.clone(),
                transaction_store.clone(),
            )),
            saving_goals: Arc::new(SavingGoalService::new(goal_store.clone())),
            overview: Arc::new(OverviewService::new(
                transaction_store,
                budget_store,
                goal_store,
                category_store,
            )),
            auth: Arc::new(AuthService::new(identity, users.clone())),
            users,
        }
    }
}
