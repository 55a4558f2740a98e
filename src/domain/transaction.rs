//! Income and expense transactions

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::CategoryId;
use super::id::entity_id;
use super::storage::StorageEntity;
use super::user::UserId;
use super::DomainError;

entity_id!(TransactionId, "Transaction");

/// Direction of a transaction's cash flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn is_expense(&self) -> bool {
        matches!(self, Self::Expense)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(DomainError::validation(format!(
                "Invalid transaction type '{}'. Use 'income' or 'expense'.",
                other
            ))),
        }
    }
}

/// A single income or expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    user_id: UserId,
    category_id: CategoryId,
    #[serde(rename = "type")]
    kind: TransactionType,
    amount: Decimal,
    #[serde(default)]
    description: Option<String>,
    date: NaiveDate,
    #[serde(default)]
    receipt_url: Option<String>,
}

impl Transaction {
    /// Create a transaction dated today
    pub fn new(
        user_id: UserId,
        category_id: CategoryId,
        kind: TransactionType,
        amount: Decimal,
    ) -> Result<Self, DomainError> {
        validate_amount(amount)?;

        Ok(Self {
            id: TransactionId::generate(),
            user_id,
            category_id,
            kind,
            amount,
            description: None,
            date: Local::now().date_naive(),
            receipt_url: None,
        })
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_receipt_url(mut self, receipt_url: Option<String>) -> Self {
        self.receipt_url = receipt_url.filter(|url| !url.trim().is_empty());
        self
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn category_id(&self) -> &CategoryId {
        &self.category_id
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn receipt_url(&self) -> Option<&str> {
        self.receipt_url.as_deref()
    }

    pub fn set_category_id(&mut self, category_id: CategoryId) {
        self.category_id = category_id;
    }

    pub fn set_kind(&mut self, kind: TransactionType) {
        self.kind = kind;
    }

    pub fn set_amount(&mut self, amount: Decimal) -> Result<(), DomainError> {
        validate_amount(amount)?;
        self.amount = amount;
        Ok(())
    }

    /// Applied even when empty
    pub fn set_description(&mut self, description: String) {
        self.description = Some(description);
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    pub fn set_receipt_url(&mut self, receipt_url: String) {
        if !receipt_url.trim().is_empty() {
            self.receipt_url = Some(receipt_url);
        }
    }
}

fn validate_amount(amount: Decimal) -> Result<(), DomainError> {
    if amount <= Decimal::ZERO {
        return Err(DomainError::validation(
            "Transaction amount must be greater than zero.",
        ));
    }
    Ok(())
}

impl StorageEntity for Transaction {
    type Key = TransactionId;
    const TABLE: &'static str = "transactions";

    fn key(&self) -> &Self::Key {
        &self.id
    }
}
