//! Persists the whole record list as one JSON blob under a fixed key.

use stallbook_core::{Record, codec};

use crate::error::StorageError;
use crate::traits::Storage;

/// Key the catalogue blob lives under.
pub const CATALOGUE_KEY: &str = "market_uploader_items_v1";

pub struct CatalogStore<S: Storage> {
    storage: S,
    key: String,
}

impl<S: Storage> CatalogStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, CATALOGUE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Missing or unparsable data loads as an empty list. Only failures of
    /// the backing storage itself are returned as errors.
    pub fn load(&self) -> Result<Vec<Record>, StorageError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(Vec::new());
        };
        match codec::decode_records(&raw) {
            Ok(records) => Ok(records),
            Err(error) => {
                tracing::warn!(key = %self.key, bytes = raw.len(), error = %error, "discarding corrupt catalogue blob");
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite the stored blob with the full list.
    pub fn save(&mut self, records: &[Record]) -> Result<(), StorageError> {
        let blob = serde_json::to_string(records)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage.set(&self.key, &blob)?;
        tracing::debug!(key = %self.key, records = records.len(), bytes = blob.len(), "catalogue saved");
        Ok(())
    }
}
