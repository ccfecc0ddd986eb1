pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use rust_decimal::Decimal;
use tracing::{error, info, warn};

use errors::CoreError;
use models::{
    category::{Category, CategoryFilter},
    ledger::{LedgerState, TransferDirection},
    summary::{CategoryGroup, ExpenseSlice, PeriodSummary},
    transaction::{Transaction, TransactionId, TransactionType},
};
use services::{ledger_service::LedgerService, summary_service::SummaryService};
use storage::manager::LedgerStore;

/// Main entry point for the Expense Tracker core library.
///
/// Owns the ledger (transactions plus cash and bank balances) and the store
/// it is persisted to. Every mutation is validated, applied, and saved
/// before it returns; callers only ever see read-only snapshots.
#[must_use]
pub struct ExpenseTracker<S: LedgerStore> {
    ledger: LedgerState,
    store: S,
    ledger_service: LedgerService,
    summary_service: SummaryService,
}

impl<S: LedgerStore> std::fmt::Debug for ExpenseTracker<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpenseTracker")
            .field("transactions", &self.ledger.transactions.len())
            .field("current_cash", &self.ledger.current_cash)
            .field("bank_balance", &self.ledger.bank_balance)
            .finish()
    }
}

impl<S: LedgerStore> ExpenseTracker<S> {
    /// Load the ledger from `store`. Missing entries start empty / at zero.
    pub fn initialize(store: S) -> Result<Self, CoreError> {
        let ledger = store.load()?;
        info!(
            transactions = ledger.transactions.len(),
            current_cash = %ledger.current_cash,
            bank_balance = %ledger.bank_balance,
            "ledger initialized"
        );
        Ok(Self {
            ledger,
            store,
            ledger_service: LedgerService::new(),
            summary_service: SummaryService::new(),
        })
    }

    /// Current snapshot of the ledger.
    #[must_use]
    pub fn state(&self) -> &LedgerState {
        &self.ledger
    }

    #[must_use]
    pub fn current_cash(&self) -> Decimal {
        self.ledger.current_cash
    }

    #[must_use]
    pub fn bank_balance(&self) -> Decimal {
        self.ledger.bank_balance
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the underlying store, dropping the in-memory ledger.
    pub fn into_store(self) -> S {
        self.store
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Record an income or expense. The id and timestamp are assigned here.
    pub fn add_transaction(
        &mut self,
        transaction_type: TransactionType,
        amount: Decimal,
        category: Category,
        description: Option<String>,
    ) -> Result<Transaction, CoreError> {
        let transaction = Transaction::new(transaction_type, amount, category, description);
        let recorded = transaction.clone();

        self.commit(|service, ledger| service.add_transaction(ledger, transaction))
            .inspect_err(|e| log_failure("add transaction", e))?;

        info!(
            id = %recorded.id,
            kind = %recorded.transaction_type,
            amount = %recorded.amount,
            category = %recorded.category,
            current_cash = %self.ledger.current_cash,
            "transaction added"
        );
        Ok(recorded)
    }

    /// Delete a transaction and reverse its effect on cash.
    ///
    /// An unknown id is ignored: nothing changes, nothing is saved, and
    /// `Ok(None)` is returned.
    pub fn delete_transaction(
        &mut self,
        id: &TransactionId,
    ) -> Result<Option<Transaction>, CoreError> {
        if self.ledger.find(id).is_none() {
            warn!(%id, "delete ignored: no such transaction");
            return Ok(None);
        }

        let removed = self
            .commit(|service, ledger| service.delete_transaction(ledger, id))
            .inspect_err(|e| log_failure("delete transaction", e))?;
        if let Some(t) = &removed {
            info!(
                %id,
                kind = %t.transaction_type,
                amount = %t.amount,
                current_cash = %self.ledger.current_cash,
                "transaction deleted"
            );
        }
        Ok(removed)
    }

    /// Move money between cash on hand and the bank.
    ///
    /// Rejected with no state change when the amount isn't positive or the
    /// source side doesn't hold enough.
    pub fn transfer_funds(
        &mut self,
        amount: Decimal,
        direction: TransferDirection,
    ) -> Result<(), CoreError> {
        self.commit(|service, ledger| service.transfer_funds(ledger, amount, direction))
            .inspect_err(|e| log_failure("transfer funds", e))?;

        info!(
            %amount,
            %direction,
            current_cash = %self.ledger.current_cash,
            bank_balance = %self.ledger.bank_balance,
            "funds transferred"
        );
        Ok(())
    }

    /// Apply a change to a copy of the ledger, persist the copy, then adopt
    /// it. On any error the live ledger is left exactly as it was.
    fn commit<T>(
        &mut self,
        apply: impl FnOnce(&LedgerService, &mut LedgerState) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut next = self.ledger.clone();
        let out = apply(&self.ledger_service, &mut next)?;
        self.store.save(&next)?;
        self.ledger = next;
        Ok(out)
    }

    // ── Lookups ─────────────────────────────────────────────────────

    #[must_use]
    pub fn get_transaction(&self, id: &TransactionId) -> Option<&Transaction> {
        self.ledger.find(id)
    }

    /// All transactions, newest insertion first.
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.ledger.transactions
    }

    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.ledger.transactions.len()
    }

    /// Case-insensitive search over descriptions and category names.
    #[must_use]
    pub fn search_transactions(&self, query: &str) -> Vec<&Transaction> {
        self.summary_service.search(&self.ledger.transactions, query)
    }

    // ── Views ───────────────────────────────────────────────────────

    /// Transactions in `month` (1-12) of `year` matching `filter`.
    #[must_use]
    pub fn filtered(&self, month: u32, year: i32, filter: CategoryFilter) -> Vec<&Transaction> {
        self.summary_service
            .filter_by_period_and_category(&self.ledger.transactions, month, year, filter)
    }

    /// Income and expense totals for the filtered period.
    #[must_use]
    pub fn period_summary(&self, month: u32, year: i32, filter: CategoryFilter) -> PeriodSummary {
        self.summary_service
            .period_summary(self.filtered(month, year, filter))
    }

    /// Per-category breakdown of the filtered period.
    #[must_use]
    pub fn category_breakdown(
        &self,
        month: u32,
        year: i32,
        filter: CategoryFilter,
    ) -> Vec<CategoryGroup> {
        self.summary_service
            .group_by_category(self.filtered(month, year, filter))
    }

    /// Expense distribution of the filtered period, largest first.
    #[must_use]
    pub fn expense_distribution(
        &self,
        month: u32,
        year: i32,
        filter: CategoryFilter,
    ) -> Vec<ExpenseSlice> {
        self.summary_service
            .expense_distribution(self.filtered(month, year, filter))
    }

    /// Years with transactions, newest first, always including `selected`.
    #[must_use]
    pub fn available_years(&self, selected: i32) -> Vec<i32> {
        self.summary_service
            .available_years(&self.ledger.transactions, selected)
    }
}

/// Rejected actions are the caller's problem (`warn`); anything else means
/// the store could not be written (`error`). The ledger is unchanged either way.
fn log_failure(action: &str, e: &CoreError) {
    if e.is_rejection() {
        warn!(action, error = %e, "rejected");
    } else {
        error!(action, error = %e, "not saved");
    }
}
