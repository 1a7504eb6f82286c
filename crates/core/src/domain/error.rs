// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Invalid field name: {0:?}")]
    InvalidFieldName(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

