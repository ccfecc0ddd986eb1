use rust_decimal::Decimal;

use crate::errors::CoreError;
use crate::models::amount::ensure_positive;
use crate::models::ledger::{LedgerState, TransferDirection};
use crate::models::transaction::{Transaction, TransactionId};

/// Applies transactions and transfers to a ledger while keeping the
/// cash and bank balances consistent.
///
/// Pure business logic: no I/O, no clock. Every method either applies
/// its change completely or returns an error with the ledger untouched.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    /// Record a transaction: prepend it and move cash by its effect
    /// (income adds, expense subtracts).
    pub fn add_transaction(
        &self,
        ledger: &mut LedgerState,
        transaction: Transaction,
    ) -> Result<(), CoreError> {
        ensure_positive(transaction.amount)?;
        let cash = checked(ledger.current_cash.checked_add(transaction.cash_effect()))?;

        ledger.current_cash = cash;
        ledger.transactions.insert(0, transaction);
        Ok(())
    }

    /// Remove a transaction and reverse its effect on cash.
    ///
    /// Returns the removed transaction, or `None` when no transaction has
    /// that id (the ledger is left as it was).
    pub fn delete_transaction(
        &self,
        ledger: &mut LedgerState,
        id: &TransactionId,
    ) -> Result<Option<Transaction>, CoreError> {
        let Some(idx) = ledger.transactions.iter().position(|t| &t.id == id) else {
            return Ok(None);
        };

        let cash = checked(
            ledger
                .current_cash
                .checked_sub(ledger.transactions[idx].cash_effect()),
        )?;

        ledger.current_cash = cash;
        Ok(Some(ledger.transactions.remove(idx)))
    }

    /// Move money between cash on hand and the bank.
    ///
    /// Rules:
    /// - Amount must be positive
    /// - A deposit can't exceed cash on hand
    /// - A withdrawal can't exceed the bank balance
    pub fn transfer_funds(
        &self,
        ledger: &mut LedgerState,
        amount: Decimal,
        direction: TransferDirection,
    ) -> Result<(), CoreError> {
        self.validate_transfer(ledger, amount, direction)?;

        let (cash, bank) = match direction {
            TransferDirection::ToBank => (
                checked(ledger.current_cash.checked_sub(amount))?,
                checked(ledger.bank_balance.checked_add(amount))?,
            ),
            TransferDirection::ToCash => (
                checked(ledger.current_cash.checked_add(amount))?,
                checked(ledger.bank_balance.checked_sub(amount))?,
            ),
        };

        ledger.current_cash = cash;
        ledger.bank_balance = bank;
        Ok(())
    }

    fn validate_transfer(
        &self,
        ledger: &LedgerState,
        amount: Decimal,
        direction: TransferDirection,
    ) -> Result<(), CoreError> {
        ensure_positive(amount)?;

        match direction {
            TransferDirection::ToBank if amount > ledger.current_cash => {
                Err(CoreError::InsufficientCash {
                    requested: amount,
                    available: ledger.current_cash,
                })
            }
            TransferDirection::ToCash if amount > ledger.bank_balance => {
                Err(CoreError::InsufficientBankBalance {
                    requested: amount,
                    available: ledger.bank_balance,
                })
            }
            _ => Ok(()),
        }
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}

fn checked(value: Option<Decimal>) -> Result<Decimal, CoreError> {
    value.ok_or_else(|| CoreError::InvalidAmount("balance would overflow".into()))
}
