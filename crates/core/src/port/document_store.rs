// Document Store Port (Interface)

use crate::domain::{CollectionName, EqualityFilter, OrderBy, RawDocument};
use crate::error::Result;
use async_trait::async_trait;

/// Fully resolved read: filters in caller order, exactly one ordering clause
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentQuery {
    pub collection: CollectionName,
    pub filters: Vec<EqualityFilter>,
    pub order_by: OrderBy,
}

/// Read side of the external document store
///
/// Implementations must apply every filter as an equality constraint and
/// return documents sorted by `order_by`, breaking ties by ascending
/// document id so repeated reads of an unchanged store are identical.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Execute the query and return every matching document
    async fn run_query(&self, query: &DocumentQuery) -> Result<Vec<RawDocument>>;
}
