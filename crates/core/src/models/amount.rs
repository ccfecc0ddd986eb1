use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::CoreError;

/// Parse free-form user input into a positive decimal amount.
///
/// Accepts plain decimal notation with surrounding whitespace ("12", " 12.50 ").
/// Anything that is not a number, zero, or negative is rejected, so a
/// malformed form value can never reach the balances.
pub fn parse_amount(input: &str) -> Result<Decimal, CoreError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidAmount("amount is empty".into()));
    }

    let amount = Decimal::from_str(trimmed)
        .map_err(|_| CoreError::InvalidAmount(format!("{trimmed:?} is not a number")))?;

    ensure_positive(amount)?;
    Ok(amount)
}

/// Reject zero and negative amounts.
pub fn ensure_positive(amount: Decimal) -> Result<(), CoreError> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::InvalidAmount(format!(
            "amount must be positive, got {amount}"
        )));
    }
    Ok(())
}

/// Sum that clamps at `Decimal::MIN` / `Decimal::MAX` instead of panicking.
///
/// Every stored amount is bounded but a total over many of them is not,
/// so read-side aggregates go through this.
pub fn saturating_sum<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}
