use stallbook_core::CoreError;
use stallbook_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("format error: {0}")]
    Format(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<CoreError> for EngineError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::Format(msg) => Self::Format(msg),
            CoreError::Io { path, source } => Self::Io(format!("{}: {source}", path.display())),
            CoreError::Serialization(msg) => {
                Self::Storage(StorageError::Serialization(msg))
            }
        }
    }
}
