// List Service - one action per logical list

pub mod engine;
pub mod options;
pub mod request;

pub use engine::{ListQueryEngine, OrderingPolicy};
pub use options::{ListOptions, ListResponse};
pub use request::QueryRequest;

use crate::domain::CollectionName;
use crate::port::DocumentStore;
use std::sync::Arc;
use tracing::{debug, error};

/// List actions (logbook, lanes, services, staff, violations, activity, offices, users)
///
/// Failures are caught here, logged once and turned into
/// `ListResponse::Failure`; nothing propagates past this boundary.
#[derive(Clone)]
pub struct ListService {
    engine: ListQueryEngine,
}

impl ListService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            engine: ListQueryEngine::new(store),
        }
    }

    /// Run an arbitrary request (explicit ordering allowed)
    pub async fn query(&self, request: QueryRequest) -> ListResponse {
        let collection = request.collection();

        match self.engine.list(&request).await {
            Ok(entries) => {
                debug!(collection = %collection, count = entries.len(), "List loaded");
                ListResponse::Success { entries }
            }
            Err(failure) => {
                error!(collection = %collection, error = %failure, "List query failed");
                ListResponse::Failure {
                    message: collection.schema().failure_message.to_string(),
                }
            }
        }
    }

    pub async fn list(&self, collection: CollectionName, options: ListOptions) -> ListResponse {
        self.query(options.to_request(collection)).await
    }

    pub async fn list_logbook_entries(&self, options: ListOptions) -> ListResponse {
        self.list(CollectionName::Logbook, options).await
    }

    pub async fn list_lanes(&self, options: ListOptions) -> ListResponse {
        self.list(CollectionName::Lanes, options).await
    }

    pub async fn list_services(&self, options: ListOptions) -> ListResponse {
        self.list(CollectionName::Services, options).await
    }

    pub async fn list_staff(&self, options: ListOptions) -> ListResponse {
        self.list(CollectionName::Staff, options).await
    }

    pub async fn list_violations(&self, options: ListOptions) -> ListResponse {
        self.list(CollectionName::Violations, options).await
    }

    pub async fn list_activity(&self, options: ListOptions) -> ListResponse {
        self.list(CollectionName::Activity, options).await
    }

    pub async fn list_offices(&self, options: ListOptions) -> ListResponse {
        self.list(CollectionName::Offices, options).await
    }

    pub async fn list_users(&self, options: ListOptions) -> ListResponse {
        self.list(CollectionName::Users, options).await
    }
}
