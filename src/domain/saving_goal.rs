//! Savings goals and progress tracking

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::entity_id;
use super::money;
use super::storage::StorageEntity;
use super::user::UserId;
use super::DomainError;

entity_id!(SavingGoalId, "Saving goal");

/// Days from today used when no deadline is given
pub const DEFAULT_DEADLINE_DAYS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Paused,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
            Self::Paused => write!(f, "paused"),
        }
    }
}

impl FromStr for GoalStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "paused" => Ok(Self::Paused),
            other => Err(DomainError::validation(format!(
                "Invalid goal status '{}'. Use 'active', 'completed' or 'paused'.",
                other
            ))),
        }
    }
}

/// Result of moving money into or out of a goal
///
/// A consumer detects the one-time "target reached" moment by comparing
/// `previous_total` and `new_total` against `target_amount`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsAdjustment {
    pub previous_total: Decimal,
    pub new_total: Decimal,
    pub target_amount: Decimal,
    pub reached_target: bool,
}

/// A target amount with a deadline and a running saved total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingGoal {
    id: SavingGoalId,
    user_id: UserId,
    name: String,
    target_amount: Decimal,
    #[serde(default)]
    saved_amount: Decimal,
    #[serde(alias = "target_date")]
    deadline: NaiveDate,
    #[serde(default)]
    status: GoalStatus,
}

impl SavingGoal {
    /// Create an active goal with nothing saved, due in 30 days
    pub fn new(user_id: UserId, name: &str, target_amount: Decimal) -> Result<Self, DomainError> {
        let name = name.trim();

        if name.is_empty() {
            return Err(DomainError::validation("Goal name is required."));
        }
        validate_non_negative("Target amount", target_amount)?;

        let today = Local::now().date_naive();

        Ok(Self {
            id: SavingGoalId::generate(),
            user_id,
            name: name.to_string(),
            target_amount,
            saved_amount: Decimal::ZERO,
            deadline: today
                .checked_add_days(Days::new(DEFAULT_DEADLINE_DAYS))
                .unwrap_or(today),
            status: GoalStatus::Active,
        })
    }

    pub fn with_saved_amount(mut self, saved_amount: Decimal) -> Result<Self, DomainError> {
        self.set_saved_amount(saved_amount)?;
        Ok(self)
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_status(mut self, status: GoalStatus) -> Self {
        self.status = status;
        self
    }

    pub fn id(&self) -> &SavingGoalId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target_amount(&self) -> Decimal {
        self.target_amount
    }

    pub fn saved_amount(&self) -> Decimal {
        self.saved_amount
    }

    pub fn deadline(&self) -> NaiveDate {
        self.deadline
    }

    pub fn status(&self) -> GoalStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == GoalStatus::Active
    }

    /// Fraction saved, clamped to `[0, 1]`; zero when the target is not positive
    pub fn progress(&self) -> Decimal {
        if self.target_amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        // Only a quotient far above one can overflow
        self.saved_amount
            .checked_div(self.target_amount)
            .unwrap_or(Decimal::ONE)
            .max(Decimal::ZERO)
            .min(Decimal::ONE)
    }

    /// Add a signed delta to the saved total, never going below zero
    pub fn adjust_saved(&mut self, delta: Decimal) -> Result<SavingsAdjustment, DomainError> {
        let previous_total = self.saved_amount;
        let new_total = money::add(previous_total, delta)?.max(Decimal::ZERO);
        self.saved_amount = new_total;

        Ok(SavingsAdjustment {
            previous_total,
            new_total,
            target_amount: self.target_amount,
            reached_target: previous_total < self.target_amount
                && self.target_amount <= new_total,
        })
    }

    pub fn set_name(&mut self, name: &str) {
        let name = name.trim();

        if !name.is_empty() {
            self.name = name.to_string();
        }
    }

    pub fn set_target_amount(&mut self, target_amount: Decimal) -> Result<(), DomainError> {
        validate_non_negative("Target amount", target_amount)?;
        self.target_amount = target_amount;
        Ok(())
    }

    /// Zero is a valid saved total
    pub fn set_saved_amount(&mut self, saved_amount: Decimal) -> Result<(), DomainError> {
        validate_non_negative("Saved amount", saved_amount)?;
        self.saved_amount = saved_amount;
        Ok(())
    }

    pub fn set_deadline(&mut self, deadline: NaiveDate) {
        self.deadline = deadline;
    }

    pub fn set_status(&mut self, status: GoalStatus) {
        self.status = status;
    }
}

fn validate_non_negative(field: &str, amount: Decimal) -> Result<(), DomainError> {
    if amount < Decimal::ZERO {
        return Err(DomainError::validation(format!(
            "{} must not be negative.",
            field
        )));
    }
    Ok(())
}

impl StorageEntity for SavingGoal {
    type Key = SavingGoalId;
    const TABLE: &'static str = "savings_goals";

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn goal(target: Decimal, saved: Decimal) -> SavingGoal {
        SavingGoal::new(UserId::new("u-1").unwrap(), "Vacation", target)
            .unwrap()
            .with_saved_amount(saved)
            .unwrap()
    }

    #[test]
    fn test_new_goal_defaults() {
        let goal = SavingGoal::new(UserId::new("u-1").unwrap(), "Laptop", dec!(1500)).unwrap();
        let today = Local::now().date_naive();

        assert_eq!(goal.saved_amount(), dec!(0));
        assert_eq!(goal.status(), GoalStatus::Active);
        assert_eq!((goal.deadline() - today).num_days(), 30);
    }

    #[test]
    fn test_progress_clamps_at_one() {
        assert_eq!(goal(dec!(1000), dec!(250)).progress(), dec!(0.25));
        assert_eq!(goal(dec!(1000), dec!(1500)).progress(), dec!(1));
        assert_eq!(goal(dec!(0), dec!(50)).progress(), dec!(0));
    }

    #[test]
    fn test_adjust_clamps_total_at_zero() {
        let mut goal = goal(dec!(500), dec!(100));
        let adjustment = goal.adjust_saved(dec!(-250)).unwrap();

        assert_eq!(adjustment.previous_total, dec!(100));
        assert_eq!(adjustment.new_total, dec!(0));
        assert!(!adjustment.reached_target);
        assert_eq!(goal.saved_amount(), dec!(0));
    }

    #[test]
    fn test_adjust_detects_target_crossing_once() {
        let mut goal = goal(dec!(500), dec!(450));

        let first = goal.adjust_saved(dec!(50)).unwrap();
        assert!(first.reached_target);
        assert_eq!(first.new_total, dec!(500));

        let second = goal.adjust_saved(dec!(10)).unwrap();
        assert!(!second.reached_target);
    }

    #[test]
    fn test_adjust_overflow_leaves_goal_unchanged() {
        let mut goal = goal(dec!(500), Decimal::MAX);

        let err = goal.adjust_saved(dec!(1)).unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert_eq!(goal.saved_amount(), Decimal::MAX);
    }

    #[test]
    fn test_progress_of_tiny_target_saturates() {
        let goal = goal(dec!(0.0000000001), dec!(100000000000000000000));
        assert_eq!(goal.progress(), dec!(1));
    }

    #[test]
    fn test_deserializes_stored_target_date() {
        let json = serde_json::json!({
            "id": "g-1",
            "user_id": "u-1",
            "name": "Car",
            "target_amount": 8000,
            "saved_amount": 0,
            "target_date": "2025-01-31",
            "status": "paused"
        });

        let goal: SavingGoal = serde_json::from_value(json).unwrap();
        assert_eq!(goal.deadline(), NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        assert_eq!(goal.status(), GoalStatus::Paused);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Completed".parse::<GoalStatus>().unwrap(), GoalStatus::Completed);
        assert!("archived".parse::<GoalStatus>().is_err());
    }
}
