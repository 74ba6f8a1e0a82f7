use super::Row;
use crate::{Error, Result};

/// A dynamically typed database value.
///
/// Scalar variants mirror what the adapter can bind and decode. `Record` and
/// `List` only appear in assembled results, where include expansion attaches
/// related rows to their parents.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Raw byte string
    Bytes(Vec<u8>),

    /// 64-bit float
    F64(f64),

    /// Signed 64-bit integer
    I64(i64),

    /// Null value
    Null,

    /// A nested row attached by include expansion (arity one)
    Record(Row),

    /// A list of values of the same type (arity many)
    List(Vec<Value>),

    /// String value
    String(String),
}

impl Value {
    pub const fn null() -> Value {
        Value::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub const fn is_record(&self) -> bool {
        matches!(self, Value::Record(_))
    }

    /// True for values the adapter can bind as a statement argument.
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Value::Record(_) | Value::List(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Row> {
        match self {
            Value::Record(row) => Some(row),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn to_bool(self) -> Result<bool> {
        match self {
            Value::Bool(v) => Ok(v),
            Value::I64(v) => Ok(v != 0),
            _ => Err(Error::unsupported("cannot convert value to bool")),
        }
    }

    pub fn to_i64(self) -> Result<i64> {
        match self {
            Value::I64(v) => Ok(v),
            _ => Err(Error::unsupported("cannot convert value to i64")),
        }
    }

    pub fn to_text(self) -> Result<String> {
        match self {
            Value::String(v) => Ok(v),
            _ => Err(Error::unsupported("cannot convert value to string")),
        }
    }
}

impl Default for Value {
    fn default() -> Value {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Value {
        Value::Bool(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Value {
        Value::I64(src)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Value {
        Value::F64(src)
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Value {
        Value::String(src.to_string())
    }
}

impl From<String> for Value {
    fn from(src: String) -> Value {
        Value::String(src)
    }
}

impl From<Row> for Value {
    fn from(src: Row) -> Value {
        Value::Record(src)
    }
}

impl From<Vec<Value>> for Value {
    fn from(src: Vec<Value>) -> Value {
        Value::List(src)
    }
}
