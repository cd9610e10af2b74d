/// Parameter Binder
///
/// Maps caller-side values onto the engine-specific bind types used for
/// prepared-statement parameters. The dispatch is an exhaustive match over
/// the value union, so every value resolves to exactly one bind case.
use crate::core::db::driver::BindValue;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Text layout used when a timestamp is bound as a parameter.
pub const BIND_DATETIME_FORMAT: &str = "%d.%m.%Y, %H:%M:%S.000";

/// A heterogeneous caller value destined for a positional placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    /// No value. Bound as empty text, never as a native null marker.
    Null,
    /// A symbolic (enumerated) value. Bound as its human-readable name so
    /// it round-trips as text, never as an opaque ordinal.
    Symbol(String),
    DateTime(NaiveDateTime),
    Integer(i32),
    Float(f32),
    Double(f64),
    Bytes(Vec<u8>),
    Text(String),
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<f32> for SqlValue {
    fn from(value: f32) -> Self {
        SqlValue::Float(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Double(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Bytes(value)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(value: NaiveDateTime) -> Self {
        SqlValue::DateTime(value)
    }
}

/// Resolves one caller value to its bind type and bind value.
pub fn bind_value(value: &SqlValue) -> BindValue {
    match value {
        SqlValue::Null => BindValue::Text(String::new()),
        SqlValue::Symbol(name) => BindValue::Text(name.clone()),
        SqlValue::DateTime(ts) => BindValue::Text(ts.format(BIND_DATETIME_FORMAT).to_string()),
        SqlValue::Integer(v) => BindValue::Integer(*v),
        SqlValue::Float(v) => BindValue::Float(*v),
        SqlValue::Double(v) => BindValue::Double(*v),
        SqlValue::Bytes(bytes) => BindValue::Binary(bytes.clone()),
        SqlValue::Text(s) => BindValue::Text(s.clone()),
    }
}

/// Resolves an ordered row of caller values; output position i binds to
/// placeholder `@(i+1)`.
pub fn bind_values(values: &[SqlValue]) -> Vec<BindValue> {
    values.iter().map(bind_value).collect()
}
