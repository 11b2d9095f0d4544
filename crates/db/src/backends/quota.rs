use pearlshop_core::storage::{KeyValueStorage, StorageError};

/// Caps the size of each stored entry, mirroring a browser storage quota.
#[derive(Clone, Debug)]
pub struct QuotaStorage<S> {
    inner: S,
    limit_bytes: usize,
}

impl<S> QuotaStorage<S> {
    pub fn new(inner: S, limit_bytes: usize) -> Self {
        Self { inner, limit_bytes }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: KeyValueStorage> KeyValueStorage for QuotaStorage<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let requested = key.len() + value.len();
        if requested > self.limit_bytes {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                requested,
                limit: self.limit_bytes,
            });
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.inner.remove_item(key)
    }
}
