// Collection Names

use crate::domain::error::DomainError;
use crate::domain::schema::{self, RecordSchema};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every logical collection the list actions can read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionName {
    Logbook,
    Lanes,
    Services,
    Staff,
    Violations,
    Activity,
    Offices,
    Users,
}

impl CollectionName {
    pub const ALL: [CollectionName; 8] = [
        CollectionName::Logbook,
        CollectionName::Lanes,
        CollectionName::Services,
        CollectionName::Staff,
        CollectionName::Violations,
        CollectionName::Activity,
        CollectionName::Offices,
        CollectionName::Users,
    ];

    /// Name of the collection inside the document store
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionName::Logbook => "logbook",
            CollectionName::Lanes => "lanes",
            CollectionName::Services => "services",
            CollectionName::Staff => "staff",
            CollectionName::Violations => "violations",
            CollectionName::Activity => "activity",
            CollectionName::Offices => "offices",
            CollectionName::Users => "users",
        }
    }

    pub fn schema(&self) -> &'static RecordSchema {
        match self {
            CollectionName::Logbook => &schema::LOGBOOK,
            CollectionName::Lanes => &schema::LANES,
            CollectionName::Services => &schema::SERVICES,
            CollectionName::Staff => &schema::STAFF,
            CollectionName::Violations => &schema::VIOLATIONS,
            CollectionName::Activity => &schema::ACTIVITY,
            CollectionName::Offices => &schema::OFFICES,
            CollectionName::Users => &schema::USERS,
        }
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollectionName::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::UnknownCollection(s.to_string()))
    }
}
