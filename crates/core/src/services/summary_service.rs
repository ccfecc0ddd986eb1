use chrono::Datelike;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

use crate::models::amount::saturating_sum;
use crate::models::category::{Category, CategoryFilter};
use crate::models::summary::{CategoryGroup, ExpenseSlice, PeriodSummary};
use crate::models::transaction::{Transaction, TransactionType};

/// Read-only views over a snapshot of transactions: period filters,
/// totals, category breakdowns and the expense distribution.
///
/// Nothing here touches balances or storage.
pub struct SummaryService;

impl SummaryService {
    pub fn new() -> Self {
        Self
    }

    /// Keep transactions dated in `month` (1-12) of `year` whose category
    /// passes `filter`. Dates are compared in UTC. Order is preserved.
    pub fn filter_by_period_and_category<'a>(
        &self,
        transactions: &'a [Transaction],
        month: u32,
        year: i32,
        filter: CategoryFilter,
    ) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|t| t.date.month() == month && t.date.year() == year)
            .filter(|t| filter.matches(t.category))
            .collect()
    }

    /// Sum of amounts over transactions of the given type.
    pub fn sum_by_type<'a, I>(&self, transactions: I, transaction_type: TransactionType) -> Decimal
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        saturating_sum(
            transactions
                .into_iter()
                .filter(|t| t.transaction_type == transaction_type)
                .map(|t| t.amount),
        )
    }

    /// Income, expenses and net for a set of transactions.
    /// Totals saturate at the `Decimal` bounds.
    pub fn period_summary<'a, I>(&self, transactions: I) -> PeriodSummary
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut summary = PeriodSummary::default();
        for t in transactions {
            summary.transaction_count += 1;
            match t.transaction_type {
                TransactionType::Income => {
                    summary.total_income = summary.total_income.saturating_add(t.amount)
                }
                TransactionType::Expense => {
                    summary.total_expenses = summary.total_expenses.saturating_add(t.amount)
                }
            }
        }
        summary.net = summary.total_income.saturating_sub(summary.total_expenses);
        summary
    }

    /// Partition by category, in the fixed category order.
    /// Categories with no transactions are left out.
    pub fn group_by_category<'a, I>(&self, transactions: I) -> Vec<CategoryGroup>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut buckets: HashMap<Category, Vec<Transaction>> = HashMap::new();
        for t in transactions {
            buckets.entry(t.category).or_default().push(t.clone());
        }

        Category::ALL
            .iter()
            .filter_map(|category| {
                let transactions = buckets.remove(category)?;
                Some(CategoryGroup {
                    category: *category,
                    count: transactions.len(),
                    total: saturating_sum(transactions.iter().map(|t| t.amount)),
                    transactions,
                })
            })
            .collect()
    }

    /// Expense totals per category as shares of all expenses, largest first.
    ///
    /// Each category total is rounded to 2 decimal places before the shares
    /// are computed, so shares can miss 1 by a rounding hair.
    pub fn expense_distribution<'a, I>(&self, transactions: I) -> Vec<ExpenseSlice>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut totals: HashMap<Category, Decimal> = HashMap::new();
        for t in transactions.into_iter().filter(|t| t.is_expense()) {
            let total = totals.entry(t.category).or_insert(Decimal::ZERO);
            *total = total.saturating_add(t.amount);
        }

        let mut rounded: Vec<(Category, Decimal)> = totals
            .into_iter()
            .map(|(category, total)| {
                (
                    category,
                    total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
                )
            })
            .collect();
        // largest first; ties fall back to category order for a stable result
        rounded.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let grand_total = saturating_sum(rounded.iter().map(|(_, total)| *total));

        rounded
            .into_iter()
            .map(|(category, total)| ExpenseSlice {
                category,
                total,
                share: if grand_total > Decimal::ZERO {
                    total / grand_total
                } else {
                    Decimal::ZERO
                },
            })
            .collect()
    }

    /// Years that have transactions, newest first. `selected` is appended
    /// when absent so the current selection is always offered.
    pub fn available_years(&self, transactions: &[Transaction], selected: i32) -> Vec<i32> {
        let mut years: Vec<i32> = transactions.iter().map(|t| t.date.year()).collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        if !years.contains(&selected) {
            years.push(selected);
        }
        years
    }

    /// Case-insensitive match against description and category name.
    pub fn search<'a>(&self, transactions: &'a [Transaction], query: &str) -> Vec<&'a Transaction> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return transactions.iter().collect();
        }
        transactions
            .iter()
            .filter(|t| {
                t.category.name().to_lowercase().contains(&needle)
                    || t.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

impl Default for SummaryService {
    fn default() -> Self {
        Self::new()
    }
}
