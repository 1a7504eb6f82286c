// Loosely-typed stored values

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// JSON key marking an encoded store-native timestamp:
/// `{"__timestamp": {"seconds": 1714521600, "nanos": 0}}`
pub const TIMESTAMP_KEY: &str = "__timestamp";

pub const MAX_NANOS: u32 = 999_999_999;

/// Store-native instant (seconds since the Unix epoch plus nanoseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: u32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: u32) -> Self {
        Self {
            seconds,
            nanos: nanos.min(MAX_NANOS),
        }
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self::new(dt.timestamp(), dt.timestamp_subsec_nanos())
    }

    pub fn from_millis(millis: i64) -> Self {
        Self::new(
            millis.div_euclid(1000),
            (millis.rem_euclid(1000) * 1_000_000) as u32,
        )
    }

    /// `None` when the instant is outside chrono's representable range
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanos)
    }

    /// UTC calendar date as `yyyy-mm-dd`
    pub fn calendar_date(&self) -> Option<String> {
        self.to_utc().map(|dt| dt.format("%Y-%m-%d").to_string())
    }

    pub fn to_json(&self) -> Value {
        json!({ TIMESTAMP_KEY: { "seconds": self.seconds, "nanos": self.nanos } })
    }

    /// Decode the `{"__timestamp": {...}}` envelope. Anything else is not a timestamp.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        if object.len() != 1 {
            return None;
        }
        let inner = object.get(TIMESTAMP_KEY)?.as_object()?;
        let seconds = inner.get("seconds")?.as_i64()?;
        let nanos = match inner.get("nanos") {
            Some(n) => u32::try_from(n.as_u64()?).ok()?,
            None => 0,
        };
        if nanos > MAX_NANOS {
            return None;
        }
        Some(Self { seconds, nanos })
    }
}

/// A raw field value as the document store hands it back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Timestamp(Timestamp),
    /// Arrays and objects that are not timestamps
    Json(Value),
}

impl FieldValue {
    /// Truthiness used when coercing into a boolean field
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::String(s) => !s.is_empty(),
            FieldValue::Timestamp(_) | FieldValue::Json(_) => true,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Number(n) => number_to_json(*n),
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Timestamp(ts) => ts.to_json(),
            FieldValue::Json(v) => v.clone(),
        }
    }
}

// Integral values go back out as JSON integers so `3` does not turn into `3.0`
fn number_to_json(n: f64) -> Value {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => n.as_f64().map_or(FieldValue::Null, FieldValue::Number),
            Value::String(s) => FieldValue::String(s),
            Value::Object(_) => match Timestamp::from_json(&value) {
                Some(ts) => FieldValue::Timestamp(ts),
                None => FieldValue::Json(value),
            },
            Value::Array(_) => FieldValue::Json(value),
        }
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::String(s) => Value::String(s),
            FieldValue::Json(v) => v,
            other => other.to_json(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<Timestamp> for FieldValue {
    fn from(ts: Timestamp) -> Self {
        FieldValue::Timestamp(ts)
    }
}

/// A date-ish stored value: either already an ISO string, or a native timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateValue {
    IsoString(String),
    NativeTimestamp(Timestamp),
}

impl DateValue {
    /// `None` for every value that is neither a string nor a timestamp
    pub fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::String(s) => Some(DateValue::IsoString(s.clone())),
            FieldValue::Timestamp(ts) => Some(DateValue::NativeTimestamp(*ts)),
            _ => None,
        }
    }

    /// Strings pass through untouched; timestamps become their UTC calendar date
    pub fn into_calendar_string(self) -> String {
        match self {
            DateValue::IsoString(s) => s,
            DateValue::NativeTimestamp(ts) => ts.calendar_date().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_calendar_date_is_utc() {
        // 2024-05-01T23:30:00-05:00 is already May 2nd in UTC
        let local = chrono::FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 1, 23, 30, 0)
            .unwrap();
        let ts = Timestamp::from_datetime(local.with_timezone(&Utc));

        assert_eq!(ts.calendar_date().as_deref(), Some("2024-05-02"));
    }

    #[test]
    fn test_timestamp_from_millis_handles_pre_epoch() {
        let ts = Timestamp::from_millis(-1);
        assert_eq!(ts.seconds, -1);
        assert_eq!(ts.nanos, 999_000_000);
        assert_eq!(ts.calendar_date().as_deref(), Some("1969-12-31"));
    }

    #[test]
    fn test_timestamp_json_envelope() {
        let ts = Timestamp::new(1_714_521_600, 5);
        let encoded = ts.to_json();
        assert_eq!(Timestamp::from_json(&encoded), Some(ts));

        // Extra keys or malformed payloads are not timestamps
        assert!(Timestamp::from_json(&json!({"__timestamp": {"seconds": 1}, "x": 1})).is_none());
        assert!(Timestamp::from_json(&json!({"__timestamp": {"nanos": 1}})).is_none());
        assert!(Timestamp::from_json(&json!({"__timestamp": {"seconds": 1, "nanos": 2_000_000_000u64}})).is_none());
    }

    #[test]
    fn test_field_value_from_json() {
        assert_eq!(FieldValue::from(json!("a")), FieldValue::String("a".into()));
        assert_eq!(FieldValue::from(json!(true)), FieldValue::Bool(true));
        assert_eq!(FieldValue::from(json!(2)), FieldValue::Number(2.0));
        assert_eq!(FieldValue::from(Value::Null), FieldValue::Null);
        assert_eq!(
            FieldValue::from(json!({"__timestamp": {"seconds": 10, "nanos": 0}})),
            FieldValue::Timestamp(Timestamp::new(10, 0))
        );
        assert!(matches!(FieldValue::from(json!([1, 2])), FieldValue::Json(_)));
    }

    #[test]
    fn test_integral_numbers_stay_integers() {
        assert_eq!(FieldValue::Number(3.0).to_json(), json!(3));
        assert_eq!(FieldValue::Number(2.5).to_json(), json!(2.5));
    }

    #[test]
    fn test_truthiness() {
        assert!(!FieldValue::Null.is_truthy());
        assert!(!FieldValue::String(String::new()).is_truthy());
        assert!(FieldValue::String("no".into()).is_truthy());
        assert!(!FieldValue::Number(0.0).is_truthy());
        assert!(!FieldValue::Number(f64::NAN).is_truthy());
        assert!(FieldValue::Number(-1.0).is_truthy());
        assert!(FieldValue::Timestamp(Timestamp::new(0, 0)).is_truthy());
        assert!(FieldValue::Json(json!([])).is_truthy());
    }

    #[test]
    fn test_date_value_coercion() {
        let ts = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap());

        assert_eq!(
            DateValue::from_field(&FieldValue::Timestamp(ts)).map(DateValue::into_calendar_string),
            Some("2024-03-05".to_string())
        );
        assert_eq!(
            DateValue::from_field(&FieldValue::from("March 5")).map(DateValue::into_calendar_string),
            Some("March 5".to_string())
        );
        assert_eq!(DateValue::from_field(&FieldValue::Number(1.0)), None);
    }

    #[test]
    fn test_out_of_range_timestamp_yields_empty_date() {
        let ts = Timestamp::new(i64::MAX, 0);
        assert_eq!(DateValue::NativeTimestamp(ts).into_calendar_string(), "");
    }
}
