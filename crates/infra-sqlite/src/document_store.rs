// SQLite DocumentStore Implementation

use crate::connection::map_sqlx_error;
use async_trait::async_trait;
use queuedesk_core::domain::{
    CollectionName, Direction, EqualityFilter, FieldValue, RawDocument, MAX_NANOS, TIMESTAMP_KEY,
};
use queuedesk_core::error::{AppError, Result};
use queuedesk_core::port::{DocumentQuery, DocumentStore};
use serde_json::Value;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::BTreeMap;
use tracing::debug;

/// Documents are JSON objects keyed by (collection, doc_id).
///
/// Timestamps are stored as `{"__timestamp": {"seconds", "nanos"}}` and sort
/// by instant. Other values follow SQLite's JSON ordering: missing/null,
/// then numbers (timestamps included), then text.
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert one document. Fails if the id is already taken in the collection.
    pub async fn insert_document(
        &self,
        collection: CollectionName,
        doc_id: &str,
        data: &BTreeMap<String, FieldValue>,
    ) -> Result<()> {
        let body = Value::Object(
            data.iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        );
        self.insert_json(collection, doc_id, &body).await
    }

    /// Insert one document from a JSON object body
    pub async fn insert_json(
        &self,
        collection: CollectionName,
        doc_id: &str,
        body: &Value,
    ) -> Result<()> {
        if !body.is_object() {
            return Err(AppError::Validation(format!(
                "document {} in {} must be a JSON object",
                doc_id, collection
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO documents (collection, doc_id, body, created_at)
            VALUES (?, ?, ?, CAST(strftime('%s', 'now') AS INTEGER))
            "#,
        )
        .bind(collection.as_str())
        .bind(doc_id)
        .bind(body.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    /// Number of documents in a collection
    pub async fn count(&self, collection: CollectionName) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = ?")
            .bind(collection.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count)
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn run_query(&self, query: &DocumentQuery) -> Result<Vec<RawDocument>> {
        let mut builder = build_select(query);
        debug!(sql = builder.sql(), "Executing document query");

        let rows: Vec<DocumentRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(DocumentRow::into_document).collect()
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    doc_id: String,
    body: String,
}

impl DocumentRow {
    fn into_document(self) -> Result<RawDocument> {
        let body: Value = serde_json::from_str(&self.body)?;
        Ok(RawDocument::from_json(self.doc_id, body)?)
    }
}

/// `$."field"`; field names are validated upstream and cannot contain quotes
fn json_path(field: &str) -> String {
    format!("$.\"{}\"", field)
}

fn timestamp_part_path(field: &str, part: &str) -> String {
    format!("{}.{}.{}", json_path(field), TIMESTAMP_KEY, part)
}

fn build_select(query: &DocumentQuery) -> QueryBuilder<'static, Sqlite> {
    let mut builder =
        QueryBuilder::new("SELECT doc_id, body FROM documents WHERE collection = ");
    builder.push_bind(query.collection.as_str());

    for filter in &query.filters {
        builder.push(" AND ");
        push_equality(&mut builder, filter);
    }

    builder.push(" ORDER BY ");
    push_sort_key(&mut builder, &query.order_by.field);
    builder.push(match query.order_by.direction {
        Direction::Ascending => " ASC",
        Direction::Descending => " DESC",
    });
    // Deterministic tie-break regardless of direction
    builder.push(", doc_id ASC");

    builder
}

fn push_equality(builder: &mut QueryBuilder<'static, Sqlite>, filter: &EqualityFilter) {
    let path = json_path(&filter.field);

    match &filter.value {
        FieldValue::Null => {
            builder.push("json_type(body, ");
            builder.push_bind(path);
            builder.push(") = 'null'");
        }
        FieldValue::Bool(b) => {
            builder.push("json_type(body, ");
            builder.push_bind(path);
            builder.push(") = ");
            builder.push_bind(if *b { "true" } else { "false" });
        }
        FieldValue::Number(n) => {
            builder.push("json_type(body, ");
            builder.push_bind(path.clone());
            builder.push(") IN ('integer', 'real') AND json_extract(body, ");
            builder.push_bind(path);
            builder.push(") = ");
            builder.push_bind(*n);
        }
        FieldValue::String(s) => {
            builder.push("json_type(body, ");
            builder.push_bind(path.clone());
            builder.push(") = 'text' AND json_extract(body, ");
            builder.push_bind(path);
            builder.push(") = ");
            builder.push_bind(s.clone());
        }
        FieldValue::Timestamp(ts) => {
            push_timestamp_guard(builder, &filter.field);
            builder.push(" AND json_extract(body, ");
            builder.push_bind(timestamp_part_path(&filter.field, "seconds"));
            builder.push(") = ");
            builder.push_bind(ts.seconds);
            builder.push(" AND COALESCE(json_extract(body, ");
            builder.push_bind(timestamp_part_path(&filter.field, "nanos"));
            builder.push("), 0) = ");
            builder.push_bind(i64::from(ts.nanos));
        }
        FieldValue::Json(v) => {
            builder.push("json_extract(body, ");
            builder.push_bind(path);
            builder.push(") = json(");
            builder.push_bind(v.to_string());
            builder.push(")");
        }
    }
}

/// Same envelope rule as `Timestamp::from_json`: an object whose only key is
/// `__timestamp`, integer `seconds`, optional integer `nanos` in range
fn push_timestamp_guard(builder: &mut QueryBuilder<'static, Sqlite>, field: &str) {
    let nanos = timestamp_part_path(field, "nanos");

    builder.push("(json_type(body, ");
    builder.push_bind(json_path(field));
    builder.push(") = 'object' AND (SELECT COUNT(*) FROM json_each(body, ");
    builder.push_bind(json_path(field));
    builder.push(")) = 1 AND json_type(body, ");
    builder.push_bind(timestamp_part_path(field, "seconds"));
    builder.push(") = 'integer' AND (json_type(body, ");
    builder.push_bind(nanos.clone());
    builder.push(") IS NULL OR (json_type(body, ");
    builder.push_bind(nanos.clone());
    builder.push(") = 'integer' AND json_extract(body, ");
    builder.push_bind(nanos);
    builder.push(") BETWEEN 0 AND ");
    builder.push_bind(i64::from(MAX_NANOS));
    builder.push(")))");
}

/// Timestamps collapse to epoch nanoseconds, everything else sorts as extracted
fn push_sort_key(builder: &mut QueryBuilder<'static, Sqlite>, field: &str) {
    builder.push("CASE WHEN ");
    push_timestamp_guard(builder, field);
    builder.push(" THEN json_extract(body, ");
    builder.push_bind(timestamp_part_path(field, "seconds"));
    builder.push(") * 1000000000 + COALESCE(json_extract(body, ");
    builder.push_bind(timestamp_part_path(field, "nanos"));
    builder.push("), 0) ELSE json_extract(body, ");
    builder.push_bind(json_path(field));
    builder.push(") END");
}
