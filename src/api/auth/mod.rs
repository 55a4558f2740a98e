//! Sign-up and sign-in endpoints

use axum::{extract::State, routing::post, Router};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Envelope, Json};
use crate::domain::User;
use crate::infrastructure::services::{AuthSession, SignInRequest, SignUpRequest};

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(sign_up))
        .route("/signin", post(sign_in))
}

/// POST /auth/signup
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<Envelope<User>, ApiError> {
    let user = state.auth.sign_up(request).await?;
    Ok(Envelope::data(user).with_message("User added Successfully!"))
}

/// POST /auth/signin
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Envelope<AuthSession>, ApiError> {
    Ok(Envelope::data(state.auth.sign_in(request).await?))
}
