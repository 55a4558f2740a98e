//! Transaction endpoints

use axum::extract::{Path, State};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Envelope, Json, Query};
use crate::domain::Transaction;
use crate::infrastructure::services::{
    CreateTransactionRequest, TransactionFilter, UpdateTransactionRequest,
};

/// GET /transactions?user_id=&limit=&offset=
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(filter): Query<TransactionFilter>,
) -> Result<Envelope<Vec<Transaction>>, ApiError> {
    Ok(Envelope::data(state.transactions.list(filter).await?))
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<Envelope<Transaction>, ApiError> {
    let transaction = state.transactions.create(request).await?;
    Ok(Envelope::data(transaction).with_message("Transaction added successfully!"))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<Transaction>, ApiError> {
    Ok(Envelope::data(state.transactions.get(&id).await?))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Envelope<Transaction>, ApiError> {
    let transaction = state.transactions.update(&id, request).await?;
    Ok(Envelope::data(transaction).with_message("Transaction updated successfully!"))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<()>, ApiError> {
    state.transactions.delete(&id).await?;
    Ok(Envelope::message("Transaction deleted successfully!"))
}
