//! Declared value types of mapped properties.

use rkyv::{Archive, Deserialize, Serialize};
use std::fmt;

/// Scalar kinds the storage layer knows how to map.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Archive,
    Serialize,
    Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum ScalarKind {
    /// Boolean value.
    Boolean,
    /// Unsigned 8-bit integer.
    Byte,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 32-bit floating point.
    Single,
    /// 64-bit floating point.
    Double,
    /// Fixed-precision decimal.
    Decimal,
    /// Unicode string.
    String,
    /// Binary data.
    Binary,
    /// Date and time of day.
    DateTime,
    /// Calendar date.
    Date,
    /// 128-bit globally unique identifier.
    Guid,
}

impl ScalarKind {
    /// Check if this kind can back an enumeration.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ScalarKind::Byte | ScalarKind::Int16 | ScalarKind::Int32 | ScalarKind::Int64
        )
    }

    /// Check if values of this kind carry a length (strings and binary data).
    pub fn has_length(&self) -> bool {
        matches!(self, ScalarKind::String | ScalarKind::Binary)
    }

    /// Type name as seen by the mapping layer.
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarKind::Boolean => "Boolean",
            ScalarKind::Byte => "Byte",
            ScalarKind::Int16 => "Int16",
            ScalarKind::Int32 => "Int32",
            ScalarKind::Int64 => "Int64",
            ScalarKind::Single => "Single",
            ScalarKind::Double => "Double",
            ScalarKind::Decimal => "Decimal",
            ScalarKind::String => "String",
            ScalarKind::Binary => "Byte[]",
            ScalarKind::DateTime => "DateTime",
            ScalarKind::Date => "Date",
            ScalarKind::Guid => "Guid",
        }
    }
}

/// The declared type of a property.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Archive,
    Serialize,
    Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum ValueType {
    /// A scalar value.
    Scalar(ScalarKind),
    /// An enumeration stored as its underlying integer.
    Enum {
        /// Name of the enumeration type.
        name: String,
        /// Underlying integer kind.
        underlying: ScalarKind,
    },
    /// A reference to another domain object.
    ObjectId,
    /// A type the mapping layer saw but that has no built-in storage mapping.
    Other(String),
}

impl ValueType {
    /// Create a scalar value type.
    pub fn scalar(kind: ScalarKind) -> Self {
        ValueType::Scalar(kind)
    }

    /// Create an enum value type.
    pub fn enumeration(name: impl Into<String>, underlying: ScalarKind) -> Self {
        ValueType::Enum {
            name: name.into(),
            underlying,
        }
    }

    /// Create a value type with no built-in storage mapping.
    pub fn other(name: impl Into<String>) -> Self {
        ValueType::Other(name.into())
    }

    /// Check if this is an object reference.
    pub fn is_object_id(&self) -> bool {
        matches!(self, ValueType::ObjectId)
    }

    /// Get the scalar kind, if this is a plain scalar.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            ValueType::Scalar(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Scalar(kind) => f.write_str(kind.type_name()),
            ValueType::Enum { name, .. } => f.write_str(name),
            ValueType::ObjectId => f.write_str("ObjectID"),
            ValueType::Other(name) => f.write_str(name),
        }
    }
}

impl From<ScalarKind> for ValueType {
    fn from(kind: ScalarKind) -> Self {
        ValueType::Scalar(kind)
    }
}
