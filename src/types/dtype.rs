//! This module defines the universal, engine-agnostic dtype used at every
//! boundary of the dfbridge compatibility layer.

use crate::error::BridgeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The universal representation of a column's logical type.
///
/// Exactly one variant is active per value. Variants carry no parameters, so a
/// value doubles as its own kind marker: passing `DType::Datetime` means "the
/// Datetime kind", whatever unit an engine happens to store.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DType {
    Int64,
    Int32,
    Int16,
    Int8,
    UInt64,
    UInt32,
    UInt16,
    UInt8,
    Float64,
    Float32,
    String,
    Boolean,
    Date,
    Datetime,
    Duration,
    Categorical,
    Enum,
}

impl DType {
    /// Every dtype, in declaration order.
    pub const ALL: [DType; 17] = [
        DType::Int64,
        DType::Int32,
        DType::Int16,
        DType::Int8,
        DType::UInt64,
        DType::UInt32,
        DType::UInt16,
        DType::UInt8,
        DType::Float64,
        DType::Float32,
        DType::String,
        DType::Boolean,
        DType::Date,
        DType::Datetime,
        DType::Duration,
        DType::Categorical,
        DType::Enum,
    ];

    /// Returns the kind tag of this dtype.
    pub fn kind(&self) -> DType {
        *self
    }

    /// Returns `true` if the data type is a signed integer.
    pub fn is_signed_integer(&self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Returns `true` if the data type is an unsigned integer.
    pub fn is_unsigned_integer(&self) -> bool {
        matches!(self, Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64)
    }

    pub fn is_integer(&self) -> bool {
        self.is_signed_integer() || self.is_unsigned_integer()
    }

    /// Returns `true` if the data type is a floating-point number.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::Datetime | Self::Duration)
    }
}

/// Provides the canonical string representation for a `DType`.
impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for DType {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dtype = match s.trim().to_ascii_lowercase().as_str() {
            "int64" | "i64" => DType::Int64,
            "int32" | "i32" => DType::Int32,
            "int16" | "i16" => DType::Int16,
            "int8" | "i8" => DType::Int8,
            "uint64" | "u64" => DType::UInt64,
            "uint32" | "u32" => DType::UInt32,
            "uint16" | "u16" => DType::UInt16,
            "uint8" | "u8" => DType::UInt8,
            "float64" | "f64" => DType::Float64,
            "float32" | "f32" => DType::Float32,
            "string" | "str" | "utf8" => DType::String,
            "boolean" | "bool" => DType::Boolean,
            "date" => DType::Date,
            "datetime" => DType::Datetime,
            "duration" => DType::Duration,
            "categorical" | "cat" => DType::Categorical,
            "enum" => DType::Enum,
            _ => return Err(BridgeError::UnknownDtype(s.to_string())),
        };
        Ok(dtype)
    }
}

/// Anything that names a universal dtype: a `DType` value, or a dtype name that
/// still has to be checked.
///
/// Reverse translation accepts `impl IntoDType`, so both forms go through the
/// same kind comparison.
pub trait IntoDType {
    fn into_dtype(self) -> Result<DType, BridgeError>;
}

impl IntoDType for DType {
    fn into_dtype(self) -> Result<DType, BridgeError> {
        Ok(self)
    }
}

impl IntoDType for &DType {
    fn into_dtype(self) -> Result<DType, BridgeError> {
        Ok(*self)
    }
}

impl IntoDType for &str {
    fn into_dtype(self) -> Result<DType, BridgeError> {
        self.parse()
    }
}

impl IntoDType for String {
    fn into_dtype(self) -> Result<DType, BridgeError> {
        self.as_str().parse()
    }
}
