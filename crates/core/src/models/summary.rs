use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::transaction::Transaction;

/// Income/expense totals for a set of transactions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// Number of transactions summarised
    pub transaction_count: usize,

    pub total_income: Decimal,

    pub total_expenses: Decimal,

    /// total_income - total_expenses
    pub net: Decimal,
}

/// All transactions of one category, in their original order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: Category,

    /// Number of transactions in the group
    pub count: usize,

    /// Sum of amounts regardless of type
    pub total: Decimal,

    pub transactions: Vec<Transaction>,
}

/// One category's slice of the expense breakdown.
///
/// The core computes the numbers; rendering the chart is up to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSlice {
    pub category: Category,

    /// Expense total for the category, rounded to 2 decimal places
    pub total: Decimal,

    /// total / sum of all rounded totals, in 0..=1
    pub share: Decimal,
}

impl ExpenseSlice {
    /// Share as a percentage rounded to one decimal place (e.g. 37.5).
    pub fn percent(&self) -> Decimal {
        (self.share * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    }
}
