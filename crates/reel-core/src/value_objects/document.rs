//! Document - an untyped record as held by the store
//!
//! Field accessors coerce loosely-typed store values at the boundary so that
//! nothing downstream ever sees a non-numeric count or a negative amount.

use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::RecordId;

/// Untyped field map of a record
pub type Fields = Map<String, Value>;

/// A record snapshot: identifier plus its fields at the time it was read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: RecordId,
    #[serde(default)]
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<RecordId>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Raw field access
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Non-empty string field
    pub fn get_str(&self, field: &str) -> Option<&str> {
        match self.fields.get(field) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Non-negative whole count. Fractions are floored; negative, non-finite
    /// and non-numeric values are treated as absent.
    pub fn get_count(&self, field: &str) -> Option<u64> {
        match self.fields.get(field)? {
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    Some(v)
                } else {
                    n.as_f64().and_then(count_from_f64)
                }
            }
            Value::String(s) => s.trim().parse::<f64>().ok().and_then(count_from_f64),
            _ => None,
        }
    }

    /// Non-negative currency amount. Negative or non-numeric values are
    /// treated as absent.
    pub fn get_amount(&self, field: &str) -> Option<Decimal> {
        let amount = match self.fields.get(field)? {
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    Some(Decimal::from(v))
                } else if let Some(v) = n.as_i64() {
                    Some(Decimal::from(v))
                } else {
                    n.as_f64().and_then(Decimal::from_f64)
                }
            }
            Value::String(s) => {
                let s = s.trim();
                Decimal::from_str(s)
                    .or_else(|_| Decimal::from_scientific(s))
                    .ok()
            }
            _ => None,
        }?;

        (!amount.is_sign_negative()).then_some(amount)
    }

    /// Boolean field; accepts the strings "true"/"false"
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        match self.fields.get(field)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Timestamp field. Accepts RFC 3339 strings, epoch milliseconds, and
    /// `{ "seconds": .., "nanoseconds": .. }` objects.
    pub fn get_timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        match self.fields.get(field)? {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Value::Number(n) => n
                .as_i64()
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
            Value::Object(obj) => {
                let seconds = obj.get("seconds").and_then(Value::as_i64)?;
                let nanos = obj
                    .get("nanoseconds")
                    .and_then(Value::as_u64)
                    .unwrap_or(0);
                Utc.timestamp_opt(seconds, u32::try_from(nanos).unwrap_or(0))
                    .single()
            }
            _ => None,
        }
    }
}

fn count_from_f64(v: f64) -> Option<u64> {
    if v.is_finite() && v >= 0.0 {
        Some(v.floor() as u64)
    } else {
        None
    }
}
