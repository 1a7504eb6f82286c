// Raw and Normalized Records

use crate::domain::error::DomainError;
use crate::domain::schema::{FieldKind, RecordSchema};
use crate::domain::value::{DateValue, FieldValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Explicit identifier field; wins over the store-assigned document id
pub const RECORD_ID_FIELD: &str = "id";

/// Document as read from the store: store-assigned id plus loosely-typed fields
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub id: String,
    pub data: BTreeMap<String, FieldValue>,
}

impl RawDocument {
    /// Build from a JSON object body
    pub fn from_json(id: impl Into<String>, body: Value) -> Result<Self, DomainError> {
        let id = id.into();
        match body {
            Value::Object(object) => Ok(Self {
                data: object
                    .into_iter()
                    .map(|(k, v)| (k, FieldValue::from(v)))
                    .collect(),
                id,
            }),
            other => Err(DomainError::InvalidDocument(format!(
                "document {} is not a JSON object (got {})",
                id,
                json_type_name(&other)
            ))),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.data.get(field)
    }

    /// Explicit `id` field when it is a non-empty string or a number, otherwise the store id
    pub fn record_id(&self) -> String {
        match self.get(RECORD_ID_FIELD) {
            Some(FieldValue::String(s)) if !s.is_empty() => s.clone(),
            Some(FieldValue::Number(n)) => match FieldValue::Number(*n).to_json() {
                Value::Number(num) => num.to_string(),
                _ => self.id.clone(),
            },
            _ => self.id.clone(),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A field value after normalization: always definite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NormalizedValue {
    Text(String),
    Flag(bool),
}

impl NormalizedValue {
    pub fn zero(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text | FieldKind::Date => NormalizedValue::Text(String::new()),
            FieldKind::Flag => NormalizedValue::Flag(false),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            NormalizedValue::Text(s) => Some(s),
            NormalizedValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            NormalizedValue::Flag(b) => Some(*b),
            NormalizedValue::Text(_) => None,
        }
    }
}

/// Response record: id plus every declared field of the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub id: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, NormalizedValue>,
}

impl NormalizedRecord {
    pub fn get(&self, field: &str) -> Option<&NormalizedValue> {
        self.fields.get(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(NormalizedValue::as_text)
    }

    pub fn flag(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(NormalizedValue::as_flag)
    }
}

/// Coerce one stored value into the declared kind.
///
/// Strings are kept, timestamps become their UTC calendar date, everything
/// else (including a missing field) becomes the kind's zero value. Flags
/// ignore that chain and use truthiness.
pub fn normalize_field(kind: FieldKind, value: Option<&FieldValue>) -> NormalizedValue {
    match kind {
        FieldKind::Flag => NormalizedValue::Flag(value.is_some_and(FieldValue::is_truthy)),
        FieldKind::Text | FieldKind::Date => NormalizedValue::Text(
            value
                .and_then(DateValue::from_field)
                .map(DateValue::into_calendar_string)
                .unwrap_or_default(),
        ),
    }
}

impl RecordSchema {
    /// Total: every declared field is present in the output
    pub fn normalize(&self, raw: &RawDocument) -> NormalizedRecord {
        let fields = self
            .fields
            .iter()
            .map(|spec| {
                (
                    spec.name.to_string(),
                    normalize_field(spec.kind, raw.get(spec.name)),
                )
            })
            .collect();

        NormalizedRecord {
            id: raw.record_id(),
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::Timestamp;
    use crate::domain::CollectionName;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn raw(id: &str, body: Value) -> RawDocument {
        RawDocument::from_json(id, body).unwrap()
    }

    #[test]
    fn test_missing_fields_get_zero_values() {
        let schema = CollectionName::Logbook.schema();
        let record = schema.normalize(&raw("doc-1", json!({"office": "Manila"})));

        assert_eq!(record.id, "doc-1");
        assert_eq!(record.text("office"), Some("Manila"));
        assert_eq!(record.text("department"), Some(""));
        assert_eq!(record.text("date"), Some(""));
        assert_eq!(record.flag("evaluated"), Some(false));
        for name in schema.field_names() {
            assert!(record.get(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_empty_document_is_still_normalized() {
        for collection in CollectionName::ALL {
            let schema = collection.schema();
            let record = schema.normalize(&raw("empty", json!({})));
            assert_eq!(record.fields.len(), schema.fields.len());
        }
    }

    #[test]
    fn test_timestamp_date_becomes_calendar_date() {
        let ts = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 5, 1, 16, 45, 0).unwrap());
        let record = CollectionName::Logbook
            .schema()
            .normalize(&raw("doc", json!({"date": ts.to_json(), "time": "16:45"})));

        assert_eq!(record.text("date"), Some("2024-05-01"));
        // time-of-day is never derived from the timestamp
        assert_eq!(record.text("time"), Some("16:45"));
    }

    #[test]
    fn test_non_string_values_fall_back_to_zero() {
        let record = CollectionName::Logbook.schema().normalize(&raw(
            "doc",
            json!({"office": 42, "date": true, "purpose": null, "staff": ["a"]}),
        ));

        assert_eq!(record.text("office"), Some(""));
        assert_eq!(record.text("date"), Some(""));
        assert_eq!(record.text("purpose"), Some(""));
        assert_eq!(record.text("staff"), Some(""));
    }

    #[test]
    fn test_flags_use_truthiness() {
        let schema = CollectionName::Logbook.schema();
        let cases = [
            (json!(true), true),
            (json!(false), false),
            (json!("yes"), true),
            (json!(""), false),
            (json!(1), true),
            (json!(0), false),
            (Value::Null, false),
        ];
        for (stored, expected) in cases {
            let record = schema.normalize(&raw("doc", json!({ "evaluated": stored.clone() })));
            assert_eq!(record.flag("evaluated"), Some(expected), "stored {stored}");
        }
    }

    #[test]
    fn test_explicit_id_wins() {
        let schema = CollectionName::Staff.schema();

        let record = schema.normalize(&raw("store-id", json!({"id": "staff-7"})));
        assert_eq!(record.id, "staff-7");

        let record = schema.normalize(&raw("store-id", json!({"id": 12})));
        assert_eq!(record.id, "12");

        let record = schema.normalize(&raw("store-id", json!({"id": null})));
        assert_eq!(record.id, "store-id");

        let record = schema.normalize(&raw("store-id", json!({})));
        assert_eq!(record.id, "store-id");
    }

    #[test]
    fn test_empty_explicit_id_falls_back_to_store_id() {
        let record = CollectionName::Users
            .schema()
            .normalize(&raw("store-id", json!({"id": "", "name": "Ana"})));
        assert_eq!(record.id, "store-id");
    }

    #[test]
    fn test_undeclared_fields_are_dropped() {
        let record = CollectionName::Lanes
            .schema()
            .normalize(&raw("lane", json!({"name": "Lane 1", "secret": "x"})));
        assert!(record.get("secret").is_none());
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        let record = CollectionName::Activity
            .schema()
            .normalize(&raw("a1", json!({"actor": "admin", "date": "2024-01-01"})));
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["id"], "a1");
        assert_eq!(value["actor"], "admin");
        assert_eq!(value["date"], "2024-01-01");
        assert_eq!(value["details"], "");
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        let err = RawDocument::from_json("bad", json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("array"));
    }
}
