//! Input type conversions.
//!
//! Scalars under `data` and `where` arrive as JSON and leave as database
//! values matching the field's declared type. The SQLite dialect stores
//! booleans as integers and timestamps as ISO-8601 text, so both conversions
//! happen here, before any statement is built.

use crate::{Error, Result, Value};

use lagoon_core::schema::{Field, FieldType};

use serde_json::Value as Json;

/// Convert one scalar JSON value to the database representation of `field`.
pub(crate) fn to_db_value(field: &Field, json: &Json, path: &str) -> Result<Value> {
    if json.is_null() {
        return Ok(Value::Null);
    }

    match field.ty {
        FieldType::Integer => json
            .as_i64()
            .map(Value::I64)
            .ok_or_else(|| expected(path, "an integer")),
        FieldType::Real => json
            .as_f64()
            .map(Value::F64)
            .ok_or_else(|| expected(path, "a number")),
        FieldType::Text => json
            .as_str()
            .map(Value::from)
            .ok_or_else(|| expected(path, "a string")),
        FieldType::Boolean => json
            .as_bool()
            .map(|b| Value::I64(b as i64))
            .ok_or_else(|| expected(path, "a boolean")),
        FieldType::Timestamp => {
            let text = json.as_str().ok_or_else(|| expected(path, "a timestamp string"))?;
            Ok(Value::String(normalize_timestamp(text, path)?))
        }
        FieldType::Bytes => {
            let items = json.as_array().ok_or_else(|| expected(path, "a byte array"))?;
            let mut bytes = Vec::with_capacity(items.len());
            for item in items {
                let byte = item
                    .as_u64()
                    .filter(|b| *b <= u8::MAX as u64)
                    .ok_or_else(|| expected(path, "a byte array"))?;
                bytes.push(byte as u8);
            }
            Ok(Value::Bytes(bytes))
        }
    }
}

/// Parse and re-serialize a timestamp so every stored value is canonical
/// ISO-8601. Accepts an instant (`2024-01-02T03:04:05Z`) or a civil datetime
/// without offset.
fn normalize_timestamp(text: &str, path: &str) -> Result<String> {
    if let Ok(ts) = text.parse::<jiff::Timestamp>() {
        return Ok(ts.to_string());
    }

    match text.parse::<jiff::civil::DateTime>() {
        Ok(dt) => Ok(dt.to_string()),
        Err(_) => Err(Error::invalid_argument(format!(
            "{path}: invalid timestamp `{text}`"
        ))),
    }
}

fn expected(path: &str, what: &str) -> Error {
    Error::invalid_argument(format!("{path}: expected {what}"))
}
