//! Domain layer - Core business logic and entities

pub mod budget;
pub mod category;
pub mod error;
pub(crate) mod id;
pub mod identity;
pub mod money;
pub mod month;
pub mod overview;
pub mod saving_goal;
pub mod storage;
pub mod transaction;
pub mod user;

pub use budget::{
    analyze_budgets, group_by_month, Budget, BudgetAlert, BudgetAnalysis, BudgetId,
    MonthlyBudgets,
};
pub use category::{Category, CategoryId};
pub use error::DomainError;
pub use identity::{Identity, IdentityProvider, Session};
pub use month::Month;
pub use overview::{summarize_month, CategorySpend, GoalProgress, MonthlyOverview};
pub use saving_goal::{GoalStatus, SavingGoal, SavingGoalId, SavingsAdjustment};
pub use storage::{Storage, StorageEntity, StorageKey, StoreQuery};
pub use transaction::{Transaction, TransactionId, TransactionType};
pub use user::{User, UserId};
