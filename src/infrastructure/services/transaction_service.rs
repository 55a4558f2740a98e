//! Transaction service

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::storage::SortDirection;
use crate::domain::{
    CategoryId, DomainError, Month, Storage, StoreQuery, Transaction, TransactionId,
    TransactionType, UserId,
};

/// Page size used when a listing does not ask for one
pub const DEFAULT_PAGE_SIZE: usize = 100;

const REQUIRED_FIELDS: &str = "User ID, Category ID, Type, and Amount are required.";

/// Request for recording a transaction
///
/// Required fields are optional here so a missing one is reported with a
/// single validation message instead of a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTransactionRequest {
    pub user_id: Option<String>,
    pub category_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub receipt_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTransactionRequest {
    pub category_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub receipt_url: Option<String>,
}

/// Listing filter, newest transactions first
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionFilter {
    pub user_id: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Month-bounded query for one user's transactions
pub(crate) fn month_query(user_id: &UserId, month: Month) -> StoreQuery {
    StoreQuery::new()
        .eq("user_id", user_id)
        .gte("date", month.first_day())
        .lt("date", month.next_month_start())
}

#[derive(Debug)]
pub struct TransactionService {
    storage: Arc<dyn Storage<Transaction>>,
}

impl TransactionService {
    pub fn new(storage: Arc<dyn Storage<Transaction>>) -> Self {
        Self { storage }
    }

    pub async fn create(
        &self,
        request: CreateTransactionRequest,
    ) -> Result<Transaction, DomainError> {
        let (Some(user_id), Some(category_id), Some(kind), Some(amount)) = (
            present(&request.user_id),
            present(&request.category_id),
            present(&request.kind),
            request.amount.filter(|a| !a.is_zero()),
        ) else {
            return Err(DomainError::validation(REQUIRED_FIELDS));
        };

        let mut transaction = Transaction::new(
            UserId::new(user_id)?,
            CategoryId::new(category_id)?,
            kind.parse::<TransactionType>()?,
            amount,
        )?
        .with_description(request.description)
        .with_receipt_url(request.receipt_url.filter(|url| !url.trim().is_empty()));

        if let Some(date) = request.date {
            transaction = transaction.with_date(date);
        }

        info!(
            id = %transaction.id(),
            user_id = %transaction.user_id(),
            kind = %transaction.kind(),
            "Recording transaction"
        );
        self.storage.create(transaction).await
    }

    pub async fn list(&self, filter: TransactionFilter) -> Result<Vec<Transaction>, DomainError> {
        let mut query = StoreQuery::new();

        if let Some(user_id) = present(&filter.user_id) {
            query = query.eq("user_id", UserId::new(user_id)?);
        }

        let query = query.order_by("date", SortDirection::Desc).range(
            filter.offset.unwrap_or(0),
            filter.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        );

        debug!(?filter, "Listing transactions");
        self.storage.select(&query).await
    }

    /// Transactions dated inside `month`, newest first
    pub async fn list_for_month(
        &self,
        user_id: &str,
        month: Month,
    ) -> Result<Vec<Transaction>, DomainError> {
        let user_id = UserId::new(user_id)?;
        let query = month_query(&user_id, month).order_by("date", SortDirection::Desc);

        self.storage.select(&query).await
    }

    pub async fn get(&self, id: &str) -> Result<Transaction, DomainError> {
        let transaction_id = TransactionId::new(id)?;

        self.storage.get(&transaction_id).await?.ok_or_else(|| {
            DomainError::not_found(format!("Transaction '{}' not found", transaction_id))
        })
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateTransactionRequest,
    ) -> Result<Transaction, DomainError> {
        info!(id = %id, "Updating transaction");

        let mut transaction = self.get(id).await?;

        if let Some(category_id) = present(&request.category_id) {
            transaction.set_category_id(CategoryId::new(category_id)?);
        }
        if let Some(kind) = present(&request.kind) {
            transaction.set_kind(kind.parse()?);
        }
        if let Some(amount) = request.amount {
            transaction.set_amount(amount)?;
        }
        if let Some(description) = request.description {
            transaction.set_description(description);
        }
        if let Some(date) = request.date {
            transaction.set_date(date);
        }
        if let Some(receipt_url) = request.receipt_url {
            transaction.set_receipt_url(receipt_url);
        }

        self.storage.update(transaction).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        info!(id = %id, "Deleting transaction");

        let transaction_id = TransactionId::new(id)?;
        if !self.storage.delete(&transaction_id).await? {
            return Err(DomainError::not_found(format!(
                "Transaction '{}' not found",
                transaction_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::mock::MockStorage;
    use crate::infrastructure::storage::InMemoryStorage;
    use rust_decimal_macros::dec;

    fn create_service() -> TransactionService {
        TransactionService::new(Arc::new(InMemoryStorage::<Transaction>::new()))
    }

    fn request(user: &str, kind: &str, amount: Decimal, date: &str) -> CreateTransactionRequest {
        CreateTransactionRequest {
            user_id: Some(user.to_string()),
            category_id: Some("c-food".to_string()),
            kind: Some(kind.to_string()),
            amount: Some(amount),
            date: Some(date.parse().unwrap()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_transaction() {
        let service = create_service();

        let transaction = service
            .create(CreateTransactionRequest {
                description: Some("Groceries".to_string()),
                ..request("u-1", "expense", dec!(42.50), "2024-03-10")
            })
            .await
            .unwrap();

        assert_eq!(transaction.kind(), TransactionType::Expense);
        assert_eq!(transaction.amount(), dec!(42.50));
        assert_eq!(transaction.description(), Some("Groceries"));
        assert_eq!(transaction.date().to_string(), "2024-03-10");
    }

    #[tokio::test]
    async fn test_missing_fields_fail_before_store() {
        let storage = Arc::new(MockStorage::<Transaction>::new());
        let service = TransactionService::new(storage.clone());

        let zero = service
            .create(request("u-1", "expense", Decimal::ZERO, "2024-03-10"))
            .await
            .unwrap_err();
        let no_type = service
            .create(CreateTransactionRequest {
                kind: None,
                ..request("u-1", "expense", dec!(10), "2024-03-10")
            })
            .await
            .unwrap_err();

        assert_eq!(zero.message(), REQUIRED_FIELDS);
        assert_eq!(no_type.message(), REQUIRED_FIELDS);
        assert_eq!(storage.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_type_and_negative_amount() {
        let service = create_service();

        let bad_type = service
            .create(request("u-1", "refund", dec!(10), "2024-03-10"))
            .await
            .unwrap_err();
        let negative = service
            .create(request("u-1", "expense", dec!(-5), "2024-03-10"))
            .await
            .unwrap_err();

        assert!(bad_type.message().contains("Invalid transaction type"));
        assert!(matches!(negative, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_paginated() {
        let service = create_service();
        for date in ["2024-03-01", "2024-03-20", "2024-03-10"] {
            service.create(request("u-1", "expense", dec!(1), date)).await.unwrap();
        }
        service.create(request("u-2", "income", dec!(9), "2024-03-15")).await.unwrap();

        let all = service
            .list(TransactionFilter {
                user_id: Some("u-1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let dates: Vec<String> = all.iter().map(|t| t.date().to_string()).collect();
        assert_eq!(dates, vec!["2024-03-20", "2024-03-10", "2024-03-01"]);

        let page = service
            .list(TransactionFilter {
                user_id: Some("u-1".to_string()),
                limit: Some(1),
                offset: Some(1),
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].date().to_string(), "2024-03-10");
    }

    #[tokio::test]
    async fn test_list_for_month_is_half_open() {
        let service = create_service();
        for date in ["2024-02-29", "2024-03-01", "2024-03-31", "2024-04-01"] {
            service.create(request("u-1", "expense", dec!(1), date)).await.unwrap();
        }

        let march = service
            .list_for_month("u-1", Month::parse("2024-03").unwrap())
            .await
            .unwrap();

        let dates: Vec<String> = march.iter().map(|t| t.date().to_string()).collect();
        assert_eq!(dates, vec!["2024-03-31", "2024-03-01"]);
    }

    #[tokio::test]
    async fn test_update_applies_only_supplied_fields() {
        let service = create_service();
        let created = service
            .create(CreateTransactionRequest {
                description: Some("Lunch".to_string()),
                ..request("u-1", "expense", dec!(12), "2024-03-10")
            })
            .await
            .unwrap();

        let updated = service
            .update(
                created.id().as_str(),
                UpdateTransactionRequest {
                    amount: Some(dec!(15)),
                    description: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.amount(), dec!(15));
        assert_eq!(updated.description(), Some(""));
        assert_eq!(updated.kind(), TransactionType::Expense);
        assert_eq!(updated.category_id().as_str(), "c-food");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let service = create_service();
        assert!(service.delete("nope").await.unwrap_err().is_not_found());
    }
}
