// Queuedesk Infrastructure - SQLite Adapter
// Implements: DocumentStore (read side) plus document writes for seeding/import

mod config;
mod connection;
mod document_store;
mod migration;

pub use config::StoreConfig;
pub use connection::create_pool;
pub use document_store::SqliteDocumentStore;
pub use migration::run_migrations;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
