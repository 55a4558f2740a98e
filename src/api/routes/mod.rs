//! Resource endpoints

pub mod budgets;
pub mod categories;
pub mod saving_goals;
pub mod transactions;
pub mod users;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

pub fn create_resource_router() -> Router<AppState> {
    Router::new()
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/{id}/overview", get(users::get_overview))
        // Categories
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        // Transactions
        .route(
            "/transactions",
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get_transaction)
                .put(transactions::update_transaction)
                .delete(transactions::delete_transaction),
        )
        // Budgets
        .route(
            "/budgets",
            get(budgets::list_budgets).post(budgets::create_budget),
        )
        .route("/budgets/by-month", get(budgets::list_budgets_by_month))
        .route("/budgets/analysis", get(budgets::check_budget_limits))
        .route(
            "/budgets/{id}",
            get(budgets::get_budget)
                .put(budgets::update_budget)
                .delete(budgets::delete_budget),
        )
        // Saving goals
        .route(
            "/saving_goals",
            get(saving_goals::list_saving_goals).post(saving_goals::create_saving_goal),
        )
        .route(
            "/saving_goals/{id}",
            get(saving_goals::get_saving_goal)
                .put(saving_goals::update_saving_goal)
                .delete(saving_goals::delete_saving_goal),
        )
        .route(
            "/saving_goals/{id}/adjust",
            post(saving_goals::adjust_saved_amount),
        )
}
