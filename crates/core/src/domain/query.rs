// Query Predicates - equality filters and ordering clauses

use crate::domain::error::DomainError;
use crate::domain::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Only equality is supported; no range, prefix or full-text predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOp {
    Equal,
}

/// `field == value`
#[derive(Debug, Clone, PartialEq)]
pub struct EqualityFilter {
    pub field: String,
    pub op: FilterOp,
    pub value: FieldValue,
}

impl EqualityFilter {
    pub fn new(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Equal,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Ascending => write!(f, "ASC"),
            Direction::Descending => write!(f, "DESC"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }
}

/// Field names end up inside store-side paths, so quotes and blanks are rejected
pub fn validate_field_name(field: &str) -> Result<(), DomainError> {
    if field.trim().is_empty() || field.contains('"') || field.chars().any(char::is_control) {
        return Err(DomainError::InvalidFieldName(field.to_string()));
    }
    Ok(())
}
