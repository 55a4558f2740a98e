//! Entity services

mod auth_service;
mod budget_service;
mod category_service;
mod overview_service;
mod saving_goal_service;
mod transaction_service;
mod user_service;

pub use auth_service::{AuthService, AuthSession, SignInRequest, SignUpRequest};
pub use budget_service::{BudgetService, CreateBudgetRequest, UpdateBudgetRequest};
pub use category_service::{CategoryService, CreateCategoryRequest, UpdateCategoryRequest};
pub use overview_service::OverviewService;
pub use saving_goal_service::{
    AdjustedGoal, CreateSavingGoalRequest, SavingGoalService, UpdateSavingGoalRequest,
};
pub use transaction_service::{
    CreateTransactionRequest, TransactionFilter, TransactionService, UpdateTransactionRequest,
    DEFAULT_PAGE_SIZE,
};
pub use user_service::{CreateUserRequest, UpdateUserRequest, UserService};
