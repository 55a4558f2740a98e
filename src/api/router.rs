use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::auth;
use super::health;
use super::routes;
use super::state::AppState;

async fn root() -> Json<Value> {
    Json(json!({ "message": "FinTrack API is running!" }))
}

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Sign-up and sign-in
        .nest("/auth", auth::create_auth_router())
        // Users, categories, transactions, budgets and saving goals
        .merge(routes::create_resource_router())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
