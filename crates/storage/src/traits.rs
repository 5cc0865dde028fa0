use crate::error::StorageError;

/// A synchronous string key-value facility. Writes overwrite.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}
