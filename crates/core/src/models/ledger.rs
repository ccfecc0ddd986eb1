use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transaction::{Transaction, TransactionId};

/// The aggregate root: everything the tracker persists.
///
/// `current_cash` and `bank_balance` are stored values maintained
/// incrementally by the ledger. They are never recomputed from
/// `transactions`, so an externally edited store can make them drift.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LedgerState {
    /// All transactions, newest insertion first
    pub transactions: Vec<Transaction>,

    /// Cash on hand
    pub current_cash: Decimal,

    /// Money saved in the bank
    pub bank_balance: Decimal,
}

impl LedgerState {
    /// Cash plus bank. Transfers never change this figure.
    ///
    /// Saturates at the `Decimal` bounds: each balance is bounded, their
    /// sum is not.
    pub fn total_funds(&self) -> Decimal {
        self.current_cash.saturating_add(self.bank_balance)
    }

    pub fn find(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| &t.id == id)
    }
}

/// Which way money moves in a cash/bank transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransferDirection {
    /// Deposit: cash on hand goes into the bank
    ToBank,
    /// Withdrawal: bank savings come back as cash
    ToCash,
}

impl std::fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferDirection::ToBank => write!(f, "to-bank"),
            TransferDirection::ToCash => write!(f, "to-cash"),
        }
    }
}
