use rust_decimal::Decimal;
use thiserror::Error;

/// Unified error type for the entire expense-tracker-core library.
/// Every public fallible function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage / File ──────────────────────────────────────────────
    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Unsupported file version: {0}")]
    UnsupportedVersion(u16),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed: wrong password or corrupted file")]
    Decryption,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown category: {0:?}")]
    UnknownCategory(String),

    #[error("Unknown transaction type: {0:?} (expected income or expense)")]
    UnknownTransactionType(String),

    #[error("Cannot move {requested} to the bank: only {available} cash on hand")]
    InsufficientCash {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Cannot withdraw {requested}: bank balance is only {available}")]
    InsufficientBankBalance {
        requested: Decimal,
        available: Decimal,
    },
}

impl CoreError {
    /// True for errors caused by a rejected user action rather than by
    /// storage or configuration. The ledger is unchanged in these cases.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidAmount(_)
                | CoreError::UnknownCategory(_)
                | CoreError::UnknownTransactionType(_)
                | CoreError::InsufficientCash { .. }
                | CoreError::InsufficientBankBalance { .. }
        )
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<bincode::Error> for CoreError {
    fn from(e: bincode::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for CoreError {
    fn from(e: serde_yaml::Error) -> Self {
        CoreError::Config(e.to_string())
    }
}

impl From<aes_gcm::Error> for CoreError {
    fn from(_: aes_gcm::Error) -> Self {
        CoreError::Decryption
    }
}
