//! Scalar values.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::LogicalType;

/// A scalar value, as carried by expression constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed 64-bit integer.
    Int64(i64),
    /// Unsigned 64-bit integer.
    UInt64(u64),
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string.
    String(Arc<str>),
    /// Raw bytes.
    Bytes(Arc<[u8]>),
}

impl Value {
    /// Returns the logical type of this value.
    #[must_use]
    pub fn logical_type(&self) -> LogicalType {
        match self {
            Self::Null => LogicalType::Null,
            Self::Bool(_) => LogicalType::Bool,
            Self::Int64(_) => LogicalType::Int64,
            Self::UInt64(_) => LogicalType::UInt64,
            Self::Float64(_) => LogicalType::Float64,
            Self::String(_) => LogicalType::String,
            Self::Bytes(_) => LogicalType::Bytes,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int64(i) => write!(f, "{i}"),
            Self::UInt64(u) => write!(f, "{u}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "'{s}'"),
            Self::Bytes(b) => write!(f, "x'{}'", hex(b)),
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int64(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Self::UInt64(u)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(Arc::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_logical_type() {
        assert_eq!(Value::from(1i64).logical_type(), LogicalType::Int64);
        assert_eq!(Value::from("a").logical_type(), LogicalType::String);
        assert_eq!(Value::Null.logical_type(), LogicalType::Null);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from("abc").to_string(), "'abc'");
        assert_eq!(Value::Bytes(Arc::from(&[0xde, 0xad][..])).to_string(), "x'dead'");
        assert_eq!(Value::Null.to_string(), "NULL");
    }
}
