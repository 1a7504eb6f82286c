// Port Layer - Interfaces for external dependencies

pub mod document_store;
pub mod id_provider; // For deterministic imports in tests

// Re-exports
pub use document_store::{DocumentQuery, DocumentStore};
pub use id_provider::IdProvider;

#[cfg(test)]
pub use document_store::MockDocumentStore;
