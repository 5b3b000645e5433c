//! Logical column types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The logical type of a column or expression result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalType {
    /// Type of a bare NULL literal.
    Null,
    /// Boolean.
    Bool,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 64-bit integer.
    UInt64,
    /// 64-bit float.
    Float64,
    /// UTF-8 string.
    String,
    /// Raw bytes.
    Bytes,
}

impl LogicalType {
    /// Returns whether the type is numeric.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int64 | Self::UInt64 | Self::Float64)
    }

    /// Returns a short lowercase name, used in explain output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int64 => "bigint",
            Self::UInt64 => "bigint unsigned",
            Self::Float64 => "double",
            Self::String => "varchar",
            Self::Bytes => "blob",
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
