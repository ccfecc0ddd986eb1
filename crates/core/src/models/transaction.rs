use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::convert::Infallible;
use std::str::FromStr;
use uuid::Uuid;

use super::category::Category;
use crate::errors::CoreError;

/// Direction of a transaction's effect on cash on hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received, adds to cash
    Income,
    /// Money spent, subtracts from cash
    Expense,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(CoreError::UnknownTransactionType(s.to_string())),
        }
    }
}

/// Opaque transaction identifier.
///
/// New transactions get a UUID v4 string, but any string is accepted on
/// read so stores written with other id schemes (e.g. millisecond
/// timestamps) still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// A fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TransactionId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().to_string()))
    }
}

impl From<String> for TransactionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TransactionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A single income or expense record.
///
/// Never mutated after creation: the ledger only adds or removes whole records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier, assigned by the ledger
    pub id: TransactionId,

    /// Income or Expense
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Amount of money (stored as a decimal string)
    pub amount: Decimal,

    pub category: Category,

    /// Optional free-text note; blank notes load as `None`
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    /// Creation timestamp, assigned by the ledger
    pub date: DateTime<Utc>,
}

impl Transaction {
    /// Create a transaction stamped with a fresh id and the current time.
    pub fn new(
        transaction_type: TransactionType,
        amount: Decimal,
        category: Category,
        description: Option<String>,
    ) -> Self {
        Self::recorded_at(transaction_type, amount, category, description, Utc::now())
    }

    /// Create a transaction with a fresh id and an explicit timestamp.
    pub fn recorded_at(
        transaction_type: TransactionType,
        amount: Decimal,
        category: Category,
        description: Option<String>,
        date: DateTime<Utc>,
    ) -> Self {
        // blank notes are stored as absent
        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        Self {
            id: TransactionId::generate(),
            transaction_type,
            amount,
            category,
            description,
            date,
        }
    }

    /// Effect of this transaction on cash on hand: `+amount` for income,
    /// `-amount` for expense.
    pub fn cash_effect(&self) -> Decimal {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let note: Option<String> = Option::deserialize(deserializer)?;
    Ok(note.filter(|n| !n.trim().is_empty()))
}
