// Central Error Type for the Application

use crate::domain::CollectionName;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error conversion is handled in infra-sqlite crate
// by converting to AppError::Database(String)

/// The single failure kind of the list query engine.
///
/// Wraps whatever went wrong underneath (store connectivity, permissions,
/// a malformed query) together with the collection that was being read.
#[derive(Error, Debug)]
#[error("query against '{collection}' failed: {source}")]
pub struct QueryFailure {
    pub collection: CollectionName,
    #[source]
    pub source: AppError,
}

impl QueryFailure {
    pub fn new(collection: CollectionName, source: impl Into<AppError>) -> Self {
        Self {
            collection,
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn test_query_failure_keeps_error_kind() {
        let failure = QueryFailure::new(
            CollectionName::Staff,
            DomainError::InvalidFieldName("bad\"name".to_string()),
        );
        assert!(matches!(failure.source, AppError::Domain(_)));
        assert_eq!(failure.collection, CollectionName::Staff);

        let failure = QueryFailure::new(
            CollectionName::Logbook,
            AppError::Database("Connection pool closed".to_string()),
        );
        assert_eq!(
            failure.to_string(),
            "query against 'logbook' failed: Database error: Connection pool closed"
        );
    }
}
