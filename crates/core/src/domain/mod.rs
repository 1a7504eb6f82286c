// Domain Layer - Pure record model, schemas and query predicates

pub mod collection;
pub mod error;
pub mod query;
pub mod record;
pub mod schema;
pub mod value;

// Re-exports
pub use collection::CollectionName;
pub use error::DomainError;
pub use query::{validate_field_name, Direction, EqualityFilter, FilterOp, OrderBy};
pub use record::{NormalizedRecord, NormalizedValue, RawDocument, RECORD_ID_FIELD};
pub use schema::{FieldKind, FieldSpec, RecordSchema};
pub use value::{DateValue, FieldValue, Timestamp, MAX_NANOS, TIMESTAMP_KEY};
