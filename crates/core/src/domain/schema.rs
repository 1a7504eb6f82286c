// Record Schemas - declared fields and default ordering per collection

use serde::Serialize;

/// Semantic type a declared field is normalized into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Plain display string, `""` when absent
    Text,
    /// Boolean coerced by truthiness, `false` when absent
    Flag,
    /// Calendar date string (`yyyy-mm-dd` when stored as a timestamp)
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
        }
    }

    pub const fn flag(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Flag,
        }
    }

    pub const fn date(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Date,
        }
    }
}

/// Shape of one listable collection
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RecordSchema {
    pub fields: &'static [FieldSpec],
    /// Unfiltered lists sort descending on this field
    pub primary_date_field: &'static str,
    /// Filtered lists sort ascending on this field
    pub secondary_field: &'static str,
    /// Message returned to callers when the list cannot be loaded
    pub failure_message: &'static str,
}

impl RecordSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }
}

// Location fields shared by every office-scoped collection
const OFFICE_ID: FieldSpec = FieldSpec::text("officeId");
const OFFICE: FieldSpec = FieldSpec::text("office");
const DEPARTMENT: FieldSpec = FieldSpec::text("department");

pub(crate) static LOGBOOK: RecordSchema = RecordSchema {
    fields: &[
        OFFICE_ID,
        OFFICE,
        DEPARTMENT,
        FieldSpec::text("name"),
        FieldSpec::text("purpose"),
        FieldSpec::text("ticketNumber"),
        FieldSpec::text("staff"),
        FieldSpec::date("date"),
        FieldSpec::text("time"),
        FieldSpec::flag("evaluated"),
    ],
    primary_date_field: "date",
    secondary_field: "time",
    failure_message: "Failed to load logbook entries",
};

pub(crate) static LANES: RecordSchema = RecordSchema {
    fields: &[
        OFFICE_ID,
        OFFICE,
        DEPARTMENT,
        FieldSpec::text("name"),
        FieldSpec::text("description"),
        FieldSpec::text("status"),
        FieldSpec::flag("active"),
        FieldSpec::date("createdAt"),
    ],
    primary_date_field: "createdAt",
    secondary_field: "name",
    failure_message: "Failed to load lanes",
};

pub(crate) static SERVICES: RecordSchema = RecordSchema {
    fields: &[
        OFFICE_ID,
        OFFICE,
        DEPARTMENT,
        FieldSpec::text("name"),
        FieldSpec::text("description"),
        FieldSpec::flag("active"),
        FieldSpec::date("createdAt"),
    ],
    primary_date_field: "createdAt",
    secondary_field: "name",
    failure_message: "Failed to load services",
};

pub(crate) static STAFF: RecordSchema = RecordSchema {
    fields: &[
        OFFICE_ID,
        OFFICE,
        DEPARTMENT,
        FieldSpec::text("name"),
        FieldSpec::text("email"),
        FieldSpec::text("position"),
        FieldSpec::text("lane"),
        FieldSpec::flag("active"),
        FieldSpec::date("createdAt"),
    ],
    primary_date_field: "createdAt",
    secondary_field: "name",
    failure_message: "Failed to load staff",
};

pub(crate) static VIOLATIONS: RecordSchema = RecordSchema {
    fields: &[
        OFFICE_ID,
        OFFICE,
        DEPARTMENT,
        FieldSpec::text("ticketNumber"),
        FieldSpec::text("name"),
        FieldSpec::text("violation"),
        FieldSpec::text("remarks"),
        FieldSpec::text("status"),
        FieldSpec::date("date"),
        FieldSpec::text("time"),
        FieldSpec::flag("resolved"),
    ],
    primary_date_field: "date",
    secondary_field: "time",
    failure_message: "Failed to load violations",
};

pub(crate) static ACTIVITY: RecordSchema = RecordSchema {
    fields: &[
        OFFICE_ID,
        OFFICE,
        DEPARTMENT,
        FieldSpec::text("actor"),
        FieldSpec::text("action"),
        FieldSpec::text("details"),
        FieldSpec::date("date"),
        FieldSpec::text("time"),
    ],
    primary_date_field: "date",
    secondary_field: "time",
    failure_message: "Failed to load activity",
};

pub(crate) static OFFICES: RecordSchema = RecordSchema {
    fields: &[
        FieldSpec::text("name"),
        FieldSpec::text("code"),
        FieldSpec::text("address"),
        DEPARTMENT,
        FieldSpec::flag("active"),
        FieldSpec::flag("underMaintenance"),
        FieldSpec::date("createdAt"),
    ],
    primary_date_field: "createdAt",
    secondary_field: "name",
    failure_message: "Failed to load offices",
};

pub(crate) static USERS: RecordSchema = RecordSchema {
    fields: &[
        OFFICE_ID,
        OFFICE,
        DEPARTMENT,
        FieldSpec::text("name"),
        FieldSpec::text("email"),
        FieldSpec::text("role"),
        FieldSpec::flag("disabled"),
        FieldSpec::date("createdAt"),
        FieldSpec::date("lastLogin"),
    ],
    primary_date_field: "createdAt",
    secondary_field: "name",
    failure_message: "Failed to load users",
};
