//! Document import from JSON files

use anyhow::{bail, Context, Result};
use queuedesk_core::domain::CollectionName;
use queuedesk_core::port::IdProvider;
use queuedesk_infra_sqlite::SqliteDocumentStore;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::info;

/// Optional per-object key carrying the store document id
pub const DOC_ID_KEY: &str = "_docId";

/// One document ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDocument {
    pub doc_id: String,
    pub body: Value,
}

/// Accept either a JSON array of objects or a single object
pub fn parse_documents(raw: &str, id_provider: &dyn IdProvider) -> Result<Vec<PendingDocument>> {
    let value: Value = serde_json::from_str(raw).context("Invalid JSON")?;

    let objects = match value {
        Value::Array(items) => items,
        Value::Object(_) => vec![value],
        _ => bail!("Expected a JSON object or an array of objects"),
    };

    objects
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(object) => Ok(into_pending(object, id_provider)),
            _ => bail!("Item {} is not a JSON object", index),
        })
        .collect()
}

fn into_pending(mut object: Map<String, Value>, id_provider: &dyn IdProvider) -> PendingDocument {
    let doc_id = match object.remove(DOC_ID_KEY) {
        Some(Value::String(id)) if !id.is_empty() => id,
        _ => id_provider.generate_id(),
    };

    PendingDocument {
        doc_id,
        body: Value::Object(object),
    }
}

/// Read `path` and insert every document into `collection`
pub async fn import_file(
    store: &SqliteDocumentStore,
    id_provider: &dyn IdProvider,
    collection: CollectionName,
    path: &Path,
) -> Result<usize> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let documents = parse_documents(&raw, id_provider)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    for document in &documents {
        store
            .insert_json(collection, &document.doc_id, &document.body)
            .await
            .with_context(|| format!("Failed to insert document {}", document.doc_id))?;
    }

    info!(
        collection = %collection,
        count = documents.len(),
        file = %path.display(),
        "Documents imported"
    );

    Ok(documents.len())
}
