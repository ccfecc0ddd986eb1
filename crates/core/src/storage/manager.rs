use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::ledger::LedgerState;
use crate::models::transaction::Transaction;

use super::kv::{KeyValueStore, MemoryStore};

/// Key holding the JSON array of transactions.
pub const TRANSACTIONS_KEY: &str = "transactions";
/// Key holding the bank balance as a decimal string.
pub const BANK_BALANCE_KEY: &str = "bankBalance";
/// Key holding cash on hand as a decimal string.
pub const CURRENT_CASH_KEY: &str = "currentCash";

/// Persistence port for the ledger.
///
/// The tracker loads once at startup and saves after every mutation.
pub trait LedgerStore {
    fn load(&self) -> Result<LedgerState, CoreError>;

    fn save(&mut self, state: &LedgerState) -> Result<(), CoreError>;
}

/// Stores a ledger as three independent entries of a key-value store:
///
/// | key            | value                          |
/// |----------------|--------------------------------|
/// | `transactions` | JSON array of transactions     |
/// | `bankBalance`  | decimal string                 |
/// | `currentCash`  | decimal string                 |
///
/// Missing (or blank) entries load as an empty list and zero balances.
#[derive(Debug, Clone, Default)]
pub struct KeyValueLedgerStore<S> {
    store: S,
}

impl<S: KeyValueStore> KeyValueLedgerStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self
            .store
            .get(key)?
            .filter(|value| !value.trim().is_empty()))
    }

    fn read_balance(&self, key: &str) -> Result<Decimal, CoreError> {
        match self.read(key)? {
            None => Ok(Decimal::ZERO),
            Some(raw) => parse_stored_decimal(&raw).ok_or_else(|| {
                CoreError::Deserialization(format!("{key}: {raw:?} is not a decimal number"))
            }),
        }
    }
}

impl KeyValueLedgerStore<MemoryStore> {
    /// A ledger store that lives only in memory.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl<S: KeyValueStore> LedgerStore for KeyValueLedgerStore<S> {
    fn load(&self) -> Result<LedgerState, CoreError> {
        let transactions: Vec<Transaction> = match self.read(TRANSACTIONS_KEY)? {
            None => Vec::new(),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                CoreError::Deserialization(format!("{TRANSACTIONS_KEY}: {e}"))
            })?,
        };
        let bank_balance = self.read_balance(BANK_BALANCE_KEY)?;
        let current_cash = self.read_balance(CURRENT_CASH_KEY)?;

        debug!(
            transactions = transactions.len(),
            %current_cash,
            %bank_balance,
            "ledger loaded"
        );

        Ok(LedgerState {
            transactions,
            current_cash,
            bank_balance,
        })
    }

    fn save(&mut self, state: &LedgerState) -> Result<(), CoreError> {
        let transactions = serde_json::to_string(&state.transactions).map_err(|e| {
            CoreError::Serialization(format!("Failed to encode transactions: {e}"))
        })?;

        self.store.set_many(vec![
            (TRANSACTIONS_KEY, transactions),
            (BANK_BALANCE_KEY, state.bank_balance.to_string()),
            (CURRENT_CASH_KEY, state.current_cash.to_string()),
        ])?;

        debug!(transactions = state.transactions.len(), "ledger saved");
        Ok(())
    }
}

/// Plain ("12.5") or scientific ("1e3") notation.
fn parse_stored_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}
