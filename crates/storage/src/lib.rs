pub mod catalog;
pub mod error;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use catalog::{CATALOGUE_KEY, CatalogStore};
pub use error::StorageError;
pub use sqlite::SqliteStorage;
pub use traits::*;
