use rust_decimal::Decimal;

use expense_tracker_core::models::amount::saturating_sum;
use expense_tracker_core::models::category::CategoryFilter;
use expense_tracker_core::models::ledger::LedgerState;
use expense_tracker_core::models::summary::{CategoryGroup, ExpenseSlice, PeriodSummary};
use expense_tracker_core::models::transaction::Transaction;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

fn signed(t: &Transaction) -> String {
    let sign = if t.is_income() { '+' } else { '-' };
    format!("{sign}{}", money(t.amount))
}

pub fn added(t: &Transaction) {
    println!(
        "Added {} {} {} (id {})",
        t.transaction_type,
        money(t.amount),
        t.category,
        t.id
    );
}

pub fn deleted(t: &Transaction) {
    println!(
        "Deleted {} {} {} (id {})",
        t.transaction_type,
        money(t.amount),
        t.category,
        t.id
    );
}

pub fn balance(state: &LedgerState) {
    println!("Cash:  {}", money(state.current_cash));
    println!("Bank:  {}", money(state.bank_balance));
    println!("Total: {}", money(state.total_funds()));
}

pub fn heading(month: u32, year: i32, filter: CategoryFilter) {
    let name = MONTHS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?");
    println!("{name} {year} ({filter})");
}

pub fn transaction_rows(transactions: &[&Transaction]) {
    if transactions.is_empty() {
        println!("No transactions found");
        return;
    }
    for t in transactions {
        println!(
            "{}  {:>12}  {:<15} {}  [{}]",
            t.date.format("%Y-%m-%d"),
            signed(t),
            t.category.name(),
            t.description.as_deref().unwrap_or(""),
            t.id
        );
    }
}

pub fn totals(summary: &PeriodSummary) {
    println!("Income:   {}", money(summary.total_income));
    println!("Expenses: {}", money(summary.total_expenses));
}

pub fn category_groups(groups: &[CategoryGroup]) {
    if groups.is_empty() {
        println!("No categories found");
        return;
    }
    for group in groups {
        println!(
            "{:<15} {:>3} transaction(s)  {}",
            group.category.name(),
            group.count,
            money(group.total)
        );
        for t in &group.transactions {
            println!(
                "    {}  {:>12}  {}",
                t.date.format("%b %d"),
                signed(t),
                t.description.as_deref().unwrap_or("")
            );
        }
    }
}

pub fn distribution(slices: &[ExpenseSlice]) {
    if slices.is_empty() {
        println!("No expenses to display");
        return;
    }
    println!(
        "Total: {}",
        money(saturating_sum(slices.iter().map(|s| s.total)))
    );
    for slice in slices {
        println!(
            "{:<15} {:>12}  ({:.1}%)",
            slice.category.name(),
            money(slice.total),
            slice.percent()
        );
    }
}
