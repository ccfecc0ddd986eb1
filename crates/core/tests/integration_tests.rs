use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;

use expense_tracker_core::errors::CoreError;
use expense_tracker_core::models::category::{Category, CategoryFilter};
use expense_tracker_core::models::ledger::{LedgerState, TransferDirection};
use expense_tracker_core::models::transaction::TransactionId;
use expense_tracker_core::models::transaction::TransactionType::{Expense, Income};
use expense_tracker_core::storage::encryption::KdfParams;
use expense_tracker_core::storage::file_store::FileStore;
use expense_tracker_core::storage::kv::{KeyValueStore, MemoryStore};
use expense_tracker_core::storage::manager::{
    KeyValueLedgerStore, LedgerStore, BANK_BALANCE_KEY, CURRENT_CASH_KEY, TRANSACTIONS_KEY,
};
use expense_tracker_core::ExpenseTracker;

// ═══════════════════════════════════════════════════════════════════
// Test stores
// ═══════════════════════════════════════════════════════════════════

/// Accepts a fixed number of saves, then fails every one after that.
#[derive(Default)]
struct FailingStore {
    saves_left: usize,
    saved: Option<LedgerState>,
}

impl FailingStore {
    fn allowing(saves: usize) -> Self {
        Self {
            saves_left: saves,
            saved: None,
        }
    }
}

impl LedgerStore for FailingStore {
    fn load(&self) -> Result<LedgerState, CoreError> {
        Ok(self.saved.clone().unwrap_or_default())
    }

    fn save(&mut self, state: &LedgerState) -> Result<(), CoreError> {
        if self.saves_left == 0 {
            return Err(CoreError::FileIO("disk full".into()));
        }
        self.saves_left -= 1;
        self.saved = Some(state.clone());
        Ok(())
    }
}

fn in_memory() -> ExpenseTracker<KeyValueLedgerStore<MemoryStore>> {
    ExpenseTracker::initialize(KeyValueLedgerStore::in_memory()).unwrap()
}

fn stored(tracker: &ExpenseTracker<KeyValueLedgerStore<MemoryStore>>, key: &str) -> Option<String> {
    tracker.store().inner().get(key).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Tracker lifecycle
// ═══════════════════════════════════════════════════════════════════

#[test]
fn fresh_tracker_is_empty() {
    let tracker = in_memory();
    assert_eq!(tracker.transaction_count(), 0);
    assert_eq!(tracker.current_cash(), Decimal::ZERO);
    assert_eq!(tracker.bank_balance(), Decimal::ZERO);
}

#[test]
fn every_mutation_is_persisted() {
    let mut tracker = in_memory();

    tracker
        .add_transaction(Income, dec!(1000), Category::Salary, None)
        .unwrap();
    assert_eq!(stored(&tracker, CURRENT_CASH_KEY).as_deref(), Some("1000"));
    assert_eq!(stored(&tracker, BANK_BALANCE_KEY).as_deref(), Some("0"));

    tracker
        .add_transaction(Expense, dec!(200), Category::Food, Some("groceries".into()))
        .unwrap();
    assert_eq!(stored(&tracker, CURRENT_CASH_KEY).as_deref(), Some("800"));

    tracker
        .transfer_funds(dec!(500), TransferDirection::ToBank)
        .unwrap();
    assert_eq!(stored(&tracker, CURRENT_CASH_KEY).as_deref(), Some("300"));
    assert_eq!(stored(&tracker, BANK_BALANCE_KEY).as_deref(), Some("500"));

    let reloaded = tracker.store().load().unwrap();
    assert_eq!(&reloaded, tracker.state());
}

#[test]
fn full_scenario() {
    let mut tracker = in_memory();

    let salary = tracker
        .add_transaction(Income, dec!(1000), Category::Salary, None)
        .unwrap();
    let food = tracker
        .add_transaction(Expense, dec!(200), Category::Food, None)
        .unwrap();
    tracker
        .transfer_funds(dec!(500), TransferDirection::ToBank)
        .unwrap();

    let removed = tracker.delete_transaction(&food.id).unwrap().unwrap();
    assert_eq!(removed.id, food.id);

    assert_eq!(tracker.current_cash(), dec!(500));
    assert_eq!(tracker.bank_balance(), dec!(500));
    assert_eq!(tracker.transaction_count(), 1);
    assert_eq!(tracker.transactions()[0].id, salary.id);
    assert!(tracker.get_transaction(&food.id).is_none());
}

#[test]
fn add_assigns_id_and_date() {
    let mut tracker = in_memory();
    let before = Utc::now();
    let a = tracker
        .add_transaction(Expense, dec!(1), Category::Other, Some("  ".into()))
        .unwrap();
    let b = tracker
        .add_transaction(Expense, dec!(1), Category::Other, None)
        .unwrap();

    assert_ne!(a.id, b.id);
    assert!(a.date >= before);
    assert_eq!(a.description, None);
    assert_eq!(tracker.get_transaction(&a.id), Some(&a));
}

// ═══════════════════════════════════════════════════════════════════
// Rejections leave everything untouched
// ═══════════════════════════════════════════════════════════════════

#[test]
fn rejected_add_saves_nothing() {
    let mut tracker = in_memory();
    let err = tracker
        .add_transaction(Income, Decimal::ZERO, Category::Salary, None)
        .unwrap_err();
    assert!(err.is_rejection());
    assert_eq!(tracker.transaction_count(), 0);
    assert!(tracker.store().inner().is_empty());
}

#[test]
fn rejected_transfer_saves_nothing() {
    let mut tracker = in_memory();
    let err = tracker
        .transfer_funds(dec!(10), TransferDirection::ToBank)
        .unwrap_err();
    assert!(matches!(err, CoreError::InsufficientCash { .. }));
    assert!(tracker.store().inner().is_empty());
}

#[test]
fn deleting_unknown_id_saves_nothing() {
    let mut tracker = in_memory();
    assert!(tracker.delete_transaction(&TransactionId::generate()).unwrap().is_none());
    assert!(tracker.store().inner().is_empty());
}

#[test]
fn failed_save_rolls_back() {
    let mut tracker = ExpenseTracker::initialize(FailingStore::allowing(1)).unwrap();
    tracker
        .add_transaction(Income, dec!(100), Category::Freelance, None)
        .unwrap();
    let before = tracker.state().clone();

    let err = tracker
        .add_transaction(Expense, dec!(30), Category::Food, None)
        .unwrap_err();
    assert!(matches!(err, CoreError::FileIO(_)));
    assert!(!err.is_rejection());
    assert_eq!(tracker.state(), &before);

    assert!(tracker
        .transfer_funds(dec!(50), TransferDirection::ToBank)
        .is_err());
    assert_eq!(tracker.state(), &before);

    let id = before.transactions[0].id.clone();
    assert!(tracker.delete_transaction(&id).is_err());
    assert_eq!(tracker.state(), &before);
}

// ═══════════════════════════════════════════════════════════════════
// Loading existing data
// ═══════════════════════════════════════════════════════════════════

#[test]
fn initializes_from_existing_entries() {
    let transactions = r#"[
        {"id":"2f1e7e52-5a0b-4c5e-8d43-7f7a1a0c9b10","type":"income","amount":"1000",
         "category":"Salary","date":"2025-01-31T09:00:00Z"}
    ]"#;
    let store = MemoryStore::with_entries([
        (TRANSACTIONS_KEY, transactions),
        (CURRENT_CASH_KEY, "400"),
        (BANK_BALANCE_KEY, "600"),
    ]);
    let tracker = ExpenseTracker::initialize(KeyValueLedgerStore::new(store)).unwrap();
    assert_eq!(tracker.transaction_count(), 1);
    assert_eq!(tracker.current_cash(), dec!(400));
    assert_eq!(tracker.bank_balance(), dec!(600));
    assert_eq!(tracker.state().total_funds(), dec!(1000));
}

#[test]
fn timestamp_ids_load_and_delete() {
    let transactions = r#"[{"id":"1717171717171","type":"expense","amount":12.5,"category":"Food","description":"","date":"2024-06-01T10:00:00.000Z"}]"#;
    let store = MemoryStore::with_entries([
        (TRANSACTIONS_KEY, transactions),
        (CURRENT_CASH_KEY, "-12.5"),
    ]);
    let mut tracker = ExpenseTracker::initialize(KeyValueLedgerStore::new(store)).unwrap();
    assert_eq!(tracker.transaction_count(), 1);

    let id = TransactionId::from("1717171717171");
    let t = tracker.get_transaction(&id).unwrap();
    assert_eq!(t.amount, dec!(12.5));
    assert_eq!(t.description, None);

    let removed = tracker.delete_transaction(&id).unwrap().unwrap();
    assert_eq!(removed.id, id);
    assert_eq!(tracker.current_cash(), Decimal::ZERO);
    assert_eq!(stored(&tracker, TRANSACTIONS_KEY).as_deref(), Some("[]"));
}

#[test]
fn malformed_balance_fails_initialization() {
    let store = MemoryStore::with_entries([(BANK_BALANCE_KEY, "abc")]);
    match ExpenseTracker::initialize(KeyValueLedgerStore::new(store)).unwrap_err() {
        CoreError::Deserialization(msg) => assert!(msg.contains("bankBalance")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn blank_balance_starts_at_zero() {
    let store = MemoryStore::with_entries([(CURRENT_CASH_KEY, "")]);
    let tracker = ExpenseTracker::initialize(KeyValueLedgerStore::new(store)).unwrap();
    assert_eq!(tracker.current_cash(), Decimal::ZERO);
}

// ═══════════════════════════════════════════════════════════════════
// File-backed persistence across restarts
// ═══════════════════════════════════════════════════════════════════

#[test]
fn plain_file_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.json");

    let expected = {
        let mut tracker =
            ExpenseTracker::initialize(KeyValueLedgerStore::new(FileStore::open(&path).unwrap()))
                .unwrap();
        tracker
            .add_transaction(Income, dec!(250.75), Category::Freelance, Some("logo".into()))
            .unwrap();
        tracker
            .transfer_funds(dec!(100), TransferDirection::ToBank)
            .unwrap();
        tracker.state().clone()
    };

    let tracker =
        ExpenseTracker::initialize(KeyValueLedgerStore::new(FileStore::open(&path).unwrap()))
            .unwrap();
    assert_eq!(tracker.state(), &expected);
    assert_eq!(tracker.current_cash(), dec!(150.75));
}

#[test]
fn sealed_file_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.extk");
    let open = |password: &str| {
        FileStore::open_sealed(&path, password, KdfParams::fast()).map(KeyValueLedgerStore::new)
    };

    {
        let mut tracker = ExpenseTracker::initialize(open("s3cret").unwrap()).unwrap();
        tracker
            .add_transaction(Expense, dec!(42), Category::Healthcare, Some("pharmacy".into()))
            .unwrap();
    }

    let raw = std::fs::read(&path).unwrap();
    assert!(!String::from_utf8_lossy(&raw).contains("pharmacy"));

    let tracker = ExpenseTracker::initialize(open("s3cret").unwrap()).unwrap();
    assert_eq!(tracker.current_cash(), dec!(-42));
    assert_eq!(
        tracker.transactions()[0].description.as_deref(),
        Some("pharmacy")
    );

    assert!(matches!(open("wrong"), Err(CoreError::Decryption)));
}

// ═══════════════════════════════════════════════════════════════════
// Views through the tracker
// ═══════════════════════════════════════════════════════════════════

#[test]
fn views_cover_the_current_month() {
    let mut tracker = in_memory();
    tracker
        .add_transaction(Income, dec!(1000), Category::Salary, None)
        .unwrap();
    tracker
        .add_transaction(Expense, dec!(50), Category::Food, Some("lunch".into()))
        .unwrap();
    tracker
        .add_transaction(Expense, dec!(30), Category::Food, None)
        .unwrap();
    tracker
        .add_transaction(Expense, dec!(20), Category::Transportation, None)
        .unwrap();

    let today = Utc::now();
    let (month, year) = (today.month(), today.year());

    assert_eq!(tracker.filtered(month, year, CategoryFilter::All).len(), 4);
    assert_eq!(
        tracker
            .filtered(month, year, CategoryFilter::Only(Category::Food))
            .len(),
        2
    );

    let summary = tracker.period_summary(month, year, CategoryFilter::All);
    assert_eq!(summary.total_income, dec!(1000));
    assert_eq!(summary.total_expenses, dec!(100));
    assert_eq!(summary.net, dec!(900));

    let groups = tracker.category_breakdown(month, year, CategoryFilter::All);
    let cats: Vec<Category> = groups.iter().map(|g| g.category).collect();
    assert_eq!(
        cats,
        vec![Category::Food, Category::Transportation, Category::Salary]
    );
    assert_eq!(groups[0].total, dec!(80));

    let slices = tracker.expense_distribution(month, year, CategoryFilter::All);
    assert_eq!(slices.len(), 2);
    assert_eq!(slices[0].category, Category::Food);
    assert_eq!(slices[0].percent(), dec!(80));

    assert_eq!(tracker.available_years(year), vec![year]);
    assert_eq!(tracker.search_transactions("LUNCH").len(), 1);
}

#[test]
fn other_months_are_empty() {
    let mut tracker = in_memory();
    tracker
        .add_transaction(Expense, dec!(5), Category::Food, None)
        .unwrap();
    let today = Utc::now();
    let other_month = if today.month() == 1 { 2 } else { 1 };

    assert!(tracker
        .filtered(other_month, today.year(), CategoryFilter::All)
        .is_empty());
    assert!(tracker
        .expense_distribution(other_month, today.year(), CategoryFilter::All)
        .is_empty());
    assert!(tracker
        .filtered(today.month(), today.year() - 1, CategoryFilter::All)
        .is_empty());
}

#[test]
fn views_clamp_instead_of_overflowing() {
    // one fits in a `Decimal`, two don't
    let huge = Decimal::from_i128_with_scale(70_000_000_000_000_000_000_000_000_000, 0);
    let mut tracker = in_memory();
    tracker
        .add_transaction(Income, huge, Category::Salary, None)
        .unwrap();
    tracker
        .transfer_funds(huge, TransferDirection::ToBank)
        .unwrap();
    tracker
        .add_transaction(Income, huge, Category::Salary, None)
        .unwrap();
    tracker
        .add_transaction(Expense, huge, Category::Food, None)
        .unwrap();
    tracker
        .add_transaction(Expense, huge, Category::Food, None)
        .unwrap();

    let today = Utc::now();
    let (month, year) = (today.month(), today.year());

    let summary = tracker.period_summary(month, year, CategoryFilter::All);
    assert_eq!(summary.total_income, Decimal::MAX);
    assert_eq!(summary.total_expenses, Decimal::MAX);
    assert_eq!(summary.net, Decimal::ZERO);

    let slices = tracker.expense_distribution(month, year, CategoryFilter::All);
    assert_eq!(slices.len(), 1);
    assert_eq!(slices[0].total, Decimal::MAX);
    assert_eq!(slices[0].percent(), dec!(100));
}
