pub mod codec;
pub mod error;
pub mod ids;
pub mod image;
pub mod record;
pub mod view;

pub use codec::ExportFormat;
pub use error::CoreError;
pub use ids::RecordId;
pub use record::{EditableFields, Record, RecordInput, RecordPatch};
pub use view::{TagFilter, ViewQuery};
