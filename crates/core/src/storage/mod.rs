pub mod encryption;
pub mod file_store;
pub mod format;
pub mod kv;
pub mod manager;
