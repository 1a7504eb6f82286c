// Filtered List Query Engine

use super::request::QueryRequest;
use crate::domain::{CollectionName, EqualityFilter, NormalizedRecord, OrderBy, RecordSchema};
use crate::error::QueryFailure;
use crate::port::{DocumentQuery, DocumentStore};
use std::sync::Arc;
use tracing::debug;

/// Default ordering when the caller gives none.
///
/// Filtered views ("today's records for office X") read chronologically
/// within the day: ascending on the secondary field. Unfiltered views are
/// an audit feed: descending on the primary date field. The choice depends
/// only on whether any filter is present.
#[derive(Debug, Clone, Copy)]
pub struct OrderingPolicy {
    schema: &'static RecordSchema,
}

impl OrderingPolicy {
    pub fn for_collection(collection: CollectionName) -> Self {
        Self {
            schema: collection.schema(),
        }
    }

    pub fn filtered(&self) -> OrderBy {
        OrderBy::ascending(self.schema.secondary_field)
    }

    pub fn unfiltered(&self) -> OrderBy {
        OrderBy::descending(self.schema.primary_date_field)
    }

    pub fn select(&self, filters: &[EqualityFilter]) -> OrderBy {
        if filters.is_empty() {
            self.unfiltered()
        } else {
            self.filtered()
        }
    }
}

/// Runs list reads against an explicitly supplied store handle.
///
/// One read per call, no writes, no caching, no retries.
#[derive(Clone)]
pub struct ListQueryEngine {
    store: Arc<dyn DocumentStore>,
}

impl ListQueryEngine {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Validate the request and pin down the ordering clause
    pub fn resolve(&self, request: &QueryRequest) -> Result<DocumentQuery, QueryFailure> {
        let collection = request.collection();
        request
            .validate()
            .map_err(|e| QueryFailure::new(collection, e))?;

        let order_by = match request.explicit_order() {
            Some(order_by) => order_by.clone(),
            None => OrderingPolicy::for_collection(collection).select(request.filters()),
        };

        Ok(DocumentQuery {
            collection,
            filters: request.filters().to_vec(),
            order_by,
        })
    }

    /// Read and normalize. Either every record comes back or the call fails.
    pub async fn list(
        &self,
        request: &QueryRequest,
    ) -> Result<Vec<NormalizedRecord>, QueryFailure> {
        let query = self.resolve(request)?;
        let collection = query.collection;

        debug!(
            collection = %collection,
            filters = query.filters.len(),
            order_field = %query.order_by.field,
            direction = %query.order_by.direction,
            "Running list query"
        );

        let documents = self
            .store
            .run_query(&query)
            .await
            .map_err(|e| QueryFailure::new(collection, e))?;

        let schema = collection.schema();
        Ok(documents.iter().map(|doc| schema.normalize(doc)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, RawDocument};
    use crate::error::AppError;
    use crate::port::MockDocumentStore;
    use serde_json::json;

    fn doc(id: &str, body: serde_json::Value) -> RawDocument {
        RawDocument::from_json(id, body).unwrap()
    }

    #[test]
    fn test_policy_modes() {
        let policy = OrderingPolicy::for_collection(CollectionName::Logbook);

        assert_eq!(policy.filtered(), OrderBy::ascending("time"));
        assert_eq!(policy.unfiltered(), OrderBy::descending("date"));
        assert_eq!(policy.select(&[]), OrderBy::descending("date"));
        assert_eq!(
            policy.select(&[EqualityFilter::new("office", "Manila")]),
            OrderBy::ascending("time")
        );
    }

    #[test]
    fn test_resolve_prefers_explicit_order() {
        let engine = ListQueryEngine::new(Arc::new(MockDocumentStore::new()));
        let request = QueryRequest::new(CollectionName::Violations)
            .filter("office", "Cebu")
            .order_by(OrderBy::descending("ticketNumber"));

        let query = engine.resolve(&request).unwrap();
        assert_eq!(query.order_by.field, "ticketNumber");
        assert_eq!(query.order_by.direction, Direction::Descending);
    }

    #[tokio::test]
    async fn test_filtered_request_sorts_ascending_by_secondary_field() {
        let mut store = MockDocumentStore::new();
        store
            .expect_run_query()
            .withf(|query| {
                query.collection == CollectionName::Logbook
                    && query.order_by == OrderBy::ascending("time")
                    && query
                        .filters
                        .iter()
                        .map(|f| f.field.as_str())
                        .eq(["office", "date"])
            })
            .times(1)
            .returning(|_| Ok(vec![]));

        let engine = ListQueryEngine::new(Arc::new(store));
        let request = QueryRequest::new(CollectionName::Logbook)
            .filter("office", "Manila")
            .filter("date", "2024-05-01");

        assert!(engine.list(&request).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unfiltered_request_sorts_descending_by_primary_date() {
        let mut store = MockDocumentStore::new();
        store
            .expect_run_query()
            .withf(|query| {
                query.filters.is_empty() && query.order_by == OrderBy::descending("createdAt")
            })
            .times(1)
            .returning(|_| Ok(vec![]));

        let engine = ListQueryEngine::new(Arc::new(store));
        engine
            .list(&QueryRequest::new(CollectionName::Staff))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_records_are_normalized_in_store_order() {
        let mut store = MockDocumentStore::new();
        store.expect_run_query().returning(|_| {
            Ok(vec![
                doc("b", json!({"time": "08:15", "office": "Manila"})),
                doc("a", json!({"time": "09:00", "evaluated": true})),
            ])
        });

        let engine = ListQueryEngine::new(Arc::new(store));
        let records = engine
            .list(&QueryRequest::new(CollectionName::Logbook).filter("office", "Manila"))
            .await
            .unwrap();

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(records[0].flag("evaluated"), Some(false));
        assert_eq!(records[1].flag("evaluated"), Some(true));
        assert_eq!(records[1].text("office"), Some(""));
    }

    #[tokio::test]
    async fn test_store_error_becomes_query_failure() {
        let mut store = MockDocumentStore::new();
        store
            .expect_run_query()
            .returning(|_| Err(AppError::Database("connection refused".to_string())));

        let engine = ListQueryEngine::new(Arc::new(store));
        let failure = engine
            .list(&QueryRequest::new(CollectionName::Logbook))
            .await
            .unwrap_err();

        assert_eq!(failure.collection, CollectionName::Logbook);
        assert!(matches!(failure.source, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_malformed_query_never_reaches_store() {
        let mut store = MockDocumentStore::new();
        store.expect_run_query().never();

        let engine = ListQueryEngine::new(Arc::new(store));
        let failure = engine
            .list(&QueryRequest::new(CollectionName::Lanes).filter("", "x"))
            .await
            .unwrap_err();

        assert!(matches!(failure.source, AppError::Domain(_)));
    }
}
