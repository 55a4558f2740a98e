//! Checked arithmetic on money amounts
//!
//! `Decimal` operators panic on overflow; these return a validation error instead.

use rust_decimal::Decimal;

use super::DomainError;

const OVERFLOW: &str = "Amounts are too large to calculate.";

fn overflow() -> DomainError {
    DomainError::validation(OVERFLOW)
}

pub fn add(a: Decimal, b: Decimal) -> Result<Decimal, DomainError> {
    a.checked_add(b).ok_or_else(overflow)
}

pub fn sub(a: Decimal, b: Decimal) -> Result<Decimal, DomainError> {
    a.checked_sub(b).ok_or_else(overflow)
}

/// Sum of all amounts
pub fn total<I>(amounts: I) -> Result<Decimal, DomainError>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, add)
}

/// `part` as a percentage of `whole`; `whole` must be non-zero
pub fn percentage(part: Decimal, whole: Decimal) -> Result<Decimal, DomainError> {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(overflow)
}
