use std::path::PathBuf;

use stallbook_core::{Record, RecordInput};
use stallbook_engine::{Catalogue, EngineError};
use stallbook_storage::{CatalogStore, SqliteStorage, StorageError};
use tempfile::TempDir;

/// A catalogue backed by a SQLite file in a private temp directory.
pub struct TestCatalogue {
    pub catalogue: Catalogue<SqliteStorage>,
    path: PathBuf,
    _dir: TempDir,
}

impl TestCatalogue {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("stallbook.sqlite3");
        let catalogue = Catalogue::open(SqliteStorage::open(&path)?)?;
        Ok(Self {
            catalogue,
            path,
            _dir: dir,
        })
    }

    /// Drop the live catalogue and load it again from disk.
    pub fn reopen(&mut self) -> Result<(), EngineError> {
        self.catalogue = Catalogue::open(SqliteStorage::open(&self.path)?)?;
        Ok(())
    }

    /// What a fresh connection reads back from the database file right now.
    pub fn persisted(&self) -> Result<Vec<Record>, StorageError> {
        CatalogStore::new(SqliteStorage::open(&self.path)?).load()
    }

    pub fn add(&mut self, input: RecordInput) -> Result<Record, EngineError> {
        self.catalogue.add(input)
    }
}
