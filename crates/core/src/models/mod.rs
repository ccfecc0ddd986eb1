pub mod amount;
pub mod category;
pub mod ledger;
pub mod summary;
pub mod transaction;
