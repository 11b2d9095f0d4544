use pearlshop_core::config::{StorageBackend, StorageConfig};
use pearlshop_core::storage::{KeyValueStorage, MemoryStorage};
use tracing::info;

use crate::backends::{FileStorage, QuotaStorage};

pub type DynStorage = Box<dyn KeyValueStorage>;

/// Opens the storage profile described by `config`.
pub fn open_storage(config: &StorageConfig) -> DynStorage {
    let storage: DynStorage = match config.backend {
        StorageBackend::Memory => Box::new(MemoryStorage::new()),
        StorageBackend::File => Box::new(FileStorage::new(&config.path)),
    };

    info!(
        event_name = "storage.profile.opened",
        backend = ?config.backend,
        path = %config.path.display(),
        quota_bytes = config.quota_bytes.unwrap_or(0),
        "storage profile opened"
    );

    match config.quota_bytes {
        Some(limit) => Box::new(QuotaStorage::new(storage, limit)),
        None => storage,
    }
}
