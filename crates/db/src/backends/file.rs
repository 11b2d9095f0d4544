//! A storage profile kept in a single JSON file.
//!
//! The file holds a JSON object of key to string value. Reads go to disk every time so
//! separate processes sharing a profile see each other's writes (last writer wins).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pearlshop_core::storage::{KeyValueStorage, StorageError};
use serde_json::{Map, Value};
use tracing::warn;

#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_profile(&self) -> Result<Option<Map<String, Value>>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Io { path: self.path.clone(), source }),
        };

        if raw.trim().is_empty() {
            return Ok(Some(Map::new()));
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(profile)) => Ok(Some(profile)),
            Ok(_) => Err(StorageError::Corrupt {
                path: self.path.clone(),
                message: "expected a JSON object at the top level".to_string(),
            }),
            Err(error) => {
                Err(StorageError::Corrupt { path: self.path.clone(), message: error.to_string() })
            }
        }
    }

    fn write_profile(&self, profile: Map<String, Value>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|source| StorageError::Io { path: parent.to_path_buf(), source })?;
        }

        let serialized = Value::Object(profile).to_string();
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, serialized)
            .map_err(|source| StorageError::Io { path: staging.clone(), source })?;
        fs::rename(&staging, &self.path)
            .map_err(|source| StorageError::Io { path: self.path.clone(), source })
    }

    /// Loads the profile for a write. A corrupt profile is replaced rather than blocking
    /// every later save.
    fn profile_for_write(&self) -> Result<Map<String, Value>, StorageError> {
        match self.read_profile() {
            Ok(profile) => Ok(profile.unwrap_or_default()),
            Err(StorageError::Corrupt { path, message }) => {
                warn!(
                    event_name = "storage.file.profile_reset",
                    path = %path.display(),
                    error = %message,
                    "storage profile is corrupt; rewriting it"
                );
                Ok(Map::new())
            }
            Err(error) => Err(error),
        }
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let Some(profile) = self.read_profile()? else {
            return Ok(None);
        };

        Ok(profile.get(key).map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut profile = self.profile_for_write()?;
        profile.insert(key.to_string(), Value::String(value.to_string()));
        self.write_profile(profile)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let mut profile = self.profile_for_write()?;
        if profile.remove(key).is_some() {
            self.write_profile(profile)?;
        }
        Ok(())
    }
}
