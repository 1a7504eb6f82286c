// Application Layer - Use Cases

pub mod list;

// Re-exports
pub use list::{
    ListOptions, ListQueryEngine, ListResponse, ListService, OrderingPolicy, QueryRequest,
};
