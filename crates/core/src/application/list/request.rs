// Query Request - immutable description of one list read

use crate::domain::{
    validate_field_name, CollectionName, DomainError, EqualityFilter, FieldValue, OrderBy,
};

/// Collection, ordered equality filters and an optional explicit ordering.
///
/// Filter order is preserved all the way to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    collection: CollectionName,
    filters: Vec<EqualityFilter>,
    order_by: Option<OrderBy>,
}

impl QueryRequest {
    pub fn new(collection: CollectionName) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            order_by: None,
        }
    }

    /// Append `field == value`
    pub fn filter(self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.with_filter(EqualityFilter::new(field, value))
    }

    pub fn with_filter(mut self, filter: EqualityFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Override the default ordering
    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn collection(&self) -> CollectionName {
        self.collection
    }

    pub fn filters(&self) -> &[EqualityFilter] {
        &self.filters
    }

    pub fn explicit_order(&self) -> Option<&OrderBy> {
        self.order_by.as_ref()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        for filter in &self.filters {
            validate_field_name(&filter.field)?;
        }
        if let Some(order_by) = &self.order_by {
            validate_field_name(&order_by.field)?;
        }
        Ok(())
    }
}
