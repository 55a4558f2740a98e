//! Category endpoints

use axum::extract::{Path, State};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Envelope, Json};
use crate::domain::Category;
use crate::infrastructure::services::{CreateCategoryRequest, UpdateCategoryRequest};

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Envelope<Vec<Category>>, ApiError> {
    Ok(Envelope::data(state.categories.list().await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<Envelope<Category>, ApiError> {
    let category = state.categories.create(request).await?;
    Ok(Envelope::data(category).with_message("Category added Successfully!"))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<Category>, ApiError> {
    Ok(Envelope::data(state.categories.get(&id).await?))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Envelope<Category>, ApiError> {
    let category = state.categories.update(&id, request).await?;
    Ok(Envelope::data(category).with_message("Category updated Successfully!"))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<()>, ApiError> {
    state.categories.delete(&id).await?;
    Ok(Envelope::message("Category deleted Successfully!"))
}
