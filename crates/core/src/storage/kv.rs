use std::collections::BTreeMap;

use crate::errors::CoreError;

/// A durable string-to-string store, the local-storage equivalent the
/// ledger persists into.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    fn set(&mut self, key: &str, value: String) -> Result<(), CoreError>;

    /// Remove a key, returning its previous value.
    fn remove(&mut self, key: &str) -> Result<Option<String>, CoreError>;

    /// Write several entries. Backends that can batch should override this.
    fn set_many(&mut self, entries: Vec<(&str, String)>) -> Result<(), CoreError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// In-memory store. Nothing survives the process; used for tests and
/// for trying the tracker out without touching disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with raw entries.
    pub fn with_entries<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), CoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.remove(key))
    }
}
