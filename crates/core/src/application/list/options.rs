// List Options & Responses - the caller-facing shapes

use super::request::QueryRequest;
use crate::domain::{CollectionName, EqualityFilter, NormalizedRecord};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Recognized list options; each one present becomes an equality filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl ListOptions {
    pub fn office(mut self, office: impl Into<String>) -> Self {
        self.office = Some(office.into());
        self
    }

    pub fn office_id(mut self, office_id: impl Into<String>) -> Self {
        self.office_id = Some(office_id.into());
        self
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Filters in fixed key order; empty strings count as absent
    pub fn filters(&self) -> Vec<EqualityFilter> {
        [
            ("office", &self.office),
            ("officeId", &self.office_id),
            ("department", &self.department),
            ("date", &self.date),
        ]
        .into_iter()
        .filter_map(|(field, value)| match value.as_deref() {
            Some(v) if !v.is_empty() => Some(EqualityFilter::new(field, v)),
            _ => None,
        })
        .collect()
    }

    pub fn to_request(&self, collection: CollectionName) -> QueryRequest {
        self.filters()
            .into_iter()
            .fold(QueryRequest::new(collection), QueryRequest::with_filter)
    }
}

/// `{success: true, entries}` or `{success: false, message}`, nothing else
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListResponse {
    Success { entries: Vec<NormalizedRecord> },
    Failure { message: String },
}

impl ListResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, ListResponse::Success { .. })
    }

    pub fn entries(&self) -> Option<&[NormalizedRecord]> {
        match self {
            ListResponse::Success { entries } => Some(entries),
            ListResponse::Failure { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ListResponse::Failure { message } => Some(message),
            ListResponse::Success { .. } => None,
        }
    }
}

impl Serialize for ListResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ListResponse", 2)?;
        match self {
            ListResponse::Success { entries } => {
                state.serialize_field("success", &true)?;
                state.serialize_field("entries", entries)?;
            }
            ListResponse::Failure { message } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("message", message)?;
            }
        }
        state.end()
    }
}
