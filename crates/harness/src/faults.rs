use std::cell::Cell;
use std::rc::Rc;

use stallbook_storage::{SqliteStorage, Storage, StorageError};

/// Shared toggle that makes a [`FaultyStorage`] reject writes.
#[derive(Clone, Default)]
pub struct FaultSwitch(Rc<Cell<bool>>);

impl FaultSwitch {
    pub fn fail_writes(&self, fail: bool) {
        self.0.set(fail);
    }

    pub fn is_failing(&self) -> bool {
        self.0.get()
    }
}

/// In-memory SQLite storage whose writes can be made to fail on demand.
/// A rejected write surfaces as SQLite's read-only error.
pub struct FaultyStorage {
    inner: SqliteStorage,
    switch: FaultSwitch,
}

impl FaultyStorage {
    pub fn new() -> Result<(Self, FaultSwitch), StorageError> {
        let switch = FaultSwitch::default();
        let storage = Self {
            inner: SqliteStorage::open_in_memory()?,
            switch: switch.clone(),
        };
        Ok((storage, switch))
    }
}

impl Storage for FaultyStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.switch.is_failing() {
            return Err(StorageError::Sqlite(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_READONLY),
                Some("write rejected".into()),
            )));
        }
        self.inner.set(key, value)
    }
}
