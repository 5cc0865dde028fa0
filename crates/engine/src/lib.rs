pub mod error;

pub use error::EngineError;

use chrono::{DateTime, Utc};
use serde_json::Value;

use stallbook_core::{
    codec::{self, ExportFormat},
    ids::RecordId,
    record::{Record, RecordInput, RecordPatch, now_millis},
    view::{self, ViewQuery},
};
use stallbook_storage::{CatalogStore, SqliteStorage, Storage};

/// An encoded catalogue ready to be written out under `filename`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub contents: String,
}

/// The canonical, newest-first list of records, kept in step with storage.
///
/// Every mutation writes the full list to storage before it is committed in
/// memory. A failed write leaves the in-memory list untouched.
pub struct Catalogue<S: Storage = SqliteStorage> {
    store: CatalogStore<S>,
    records: Vec<Record>,
}

impl<S: Storage> Catalogue<S> {
    /// Load the catalogue held by `storage` under the default key.
    pub fn open(storage: S) -> Result<Self, EngineError> {
        Self::with_store(CatalogStore::new(storage))
    }

    pub fn with_store(store: CatalogStore<S>) -> Result<Self, EngineError> {
        let records = store.load()?;
        tracing::debug!(records = records.len(), "catalogue loaded");
        Ok(Self { store, records })
    }

    pub fn store(&self) -> &CatalogStore<S> {
        &self.store
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Current records, newest first.
    pub fn list(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// Records matching `query`, in catalogue order.
    pub fn view(&self, query: &ViewQuery) -> Vec<&Record> {
        view::filter_records(&self.records, query)
    }

    pub fn distinct_tags(&self) -> Vec<String> {
        view::distinct_tags(&self.records)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Create a record from `input` and prepend it.
    pub fn add(&mut self, input: RecordInput) -> Result<Record, EngineError> {
        let record = input.into_record(self.fresh_id(), now_millis())?;

        let mut next = Vec::with_capacity(self.records.len() + 1);
        next.push(record.clone());
        next.extend(self.records.iter().cloned());
        self.commit(next)?;

        tracing::info!(id = %record.id, tags = record.tags.len(), "record added");
        Ok(record)
    }

    /// Replace every editable field of record `id`. `id` and `created_at`
    /// are kept; the image is kept unless `input` carries a new one.
    pub fn update(&mut self, id: &RecordId, input: RecordInput) -> Result<Record, EngineError> {
        let index = self
            .position(id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;

        let mut updated = self.records[index].clone();
        if let Some(image) = input.image() {
            updated.image_data = image.to_string();
        }
        input.fields().apply_to(&mut updated);

        let mut next = self.records.clone();
        next[index] = updated.clone();
        self.commit(next)?;

        tracing::info!(id = %id, "record updated");
        Ok(updated)
    }

    /// Merge `patch` onto record `id` and update it.
    pub fn edit(&mut self, id: &RecordId, patch: &RecordPatch) -> Result<Record, EngineError> {
        let current = self
            .get(id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        let input = patch.apply_to(current);
        self.update(id, input)
    }

    /// Remove record `id`. An unknown id is a no-op and nothing is written.
    pub fn remove(&mut self, id: &RecordId) -> Result<bool, EngineError> {
        let Some(index) = self.position(id) else {
            tracing::debug!(id = %id, "remove of unknown record ignored");
            return Ok(false);
        };

        let mut next = self.records.clone();
        next.remove(index);
        self.commit(next)?;

        tracing::info!(id = %id, "record removed");
        Ok(true)
    }

    /// Swap in a whole new list. Every entry must be record-shaped and ids
    /// must be unique; otherwise nothing changes.
    pub fn replace_all(&mut self, entries: Vec<Value>) -> Result<(), EngineError> {
        let records = codec::records_from_values(entries)?;
        let count = records.len();
        self.commit(records)?;

        tracing::info!(records = count, "catalogue replaced");
        Ok(())
    }

    // ========================================================================
    // Import / export
    // ========================================================================

    /// Decode `text` and replace the catalogue with it. Returns the new size.
    pub fn import_json(&mut self, text: &str) -> Result<usize, EngineError> {
        let entries = codec::decode_json(text)?;
        self.replace_all(entries)?;
        Ok(self.records.len())
    }

    pub fn export(&self, format: ExportFormat) -> Result<ExportFile, EngineError> {
        self.export_at(format, Utc::now())
    }

    pub fn export_at(&self, format: ExportFormat, now: DateTime<Utc>) -> Result<ExportFile, EngineError> {
        let contents = match format {
            ExportFormat::Json => codec::encode_json(&self.records)?,
            ExportFormat::Csv => codec::encode_csv(&self.records),
        };
        Ok(ExportFile {
            filename: codec::export_filename(format, now),
            contents,
        })
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|record| &record.id == id)
    }

    fn fresh_id(&self) -> RecordId {
        loop {
            let id = RecordId::new();
            if self.position(&id).is_none() {
                return id;
            }
        }
    }

    /// Persist `next`, then make it the live list.
    fn commit(&mut self, next: Vec<Record>) -> Result<(), EngineError> {
        self.store.save(&next)?;
        self.records = next;
        Ok(())
    }
}
