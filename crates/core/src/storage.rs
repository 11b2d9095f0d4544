//! String key-value persistence, shaped after browser profile storage.
//!
//! Backends report failures through [`StorageError`]; callers decide whether a failure
//! is fatal. The cart treats every storage failure as non-fatal.

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is disabled")]
    Disabled,
    #[error("storage quota exceeded writing `{key}`: {requested} bytes requested, limit {limit}")]
    QuotaExceeded { key: String, requested: usize, limit: usize },
    #[error("storage I/O failure on `{path}`: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("storage file `{path}` is not a valid profile: {message}")]
    Corrupt { path: PathBuf, message: String },
}

pub trait KeyValueStorage {
    /// Returns `Ok(None)` when the key has never been written.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Succeeds even if the key did not exist.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.items.insert(key.into(), value.into());
        self
    }

    pub fn items(&self) -> &BTreeMap<String, String> {
        &self.items
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Storage that refuses every operation, like a profile with storage turned off.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledStorage;

impl KeyValueStorage for DisabledStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Disabled)
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Disabled)
    }

    fn remove_item(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Disabled)
    }
}
