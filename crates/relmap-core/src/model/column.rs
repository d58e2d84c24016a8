//! Physical columns and their storage types.

use rkyv::{Archive, Deserialize, Serialize};
use std::fmt;

/// Provider-neutral database type of a column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Archive,
    Serialize,
    Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum DbType {
    /// Boolean.
    Boolean,
    /// Unsigned byte.
    Byte,
    /// 16-bit integer.
    Int16,
    /// 32-bit integer.
    Int32,
    /// 64-bit integer.
    Int64,
    /// Single-precision float.
    Single,
    /// Double-precision float.
    Double,
    /// Decimal.
    Decimal,
    /// Date and time.
    DateTime,
    /// Date.
    Date,
    /// Globally unique identifier.
    Guid,
    /// Unicode string.
    String,
    /// Non-unicode string.
    AnsiString,
    /// Binary data.
    Binary,
}

/// Conversion applied between the property value and the stored value.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Archive,
    Serialize,
    Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum ValueConversion {
    /// The value is stored as is.
    #[default]
    None,
    /// An enum value is stored as its underlying integer.
    EnumToUnderlying,
    /// An object id is stored as its GUID value.
    ObjectIdToGuid,
    /// An object id is stored in its serialized string form.
    ObjectIdToString,
    /// A class id is stored as a string.
    ClassIdToString,
}

/// Physical type descriptor of a column.
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
pub struct StorageTypeInformation {
    /// Type name in the storage dialect, e.g. `nvarchar (max)`.
    pub storage_type_name: String,
    /// Provider-neutral type.
    pub db_type: DbType,
    /// Conversion between property value and stored value.
    pub conversion: ValueConversion,
    /// Maximum width, when the type is bounded.
    pub width: Option<u32>,
}

impl StorageTypeInformation {
    /// Create a storage type without conversion or width.
    pub fn new(storage_type_name: impl Into<String>, db_type: DbType) -> Self {
        Self {
            storage_type_name: storage_type_name.into(),
            db_type,
            conversion: ValueConversion::None,
            width: None,
        }
    }

    /// Set the value conversion.
    pub fn with_conversion(mut self, conversion: ValueConversion) -> Self {
        self.conversion = conversion;
        self
    }

    /// Set the width.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }
}

impl fmt::Display for StorageTypeInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_type_name)
    }
}

/// A physical column.
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
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Storage type.
    pub storage_type: StorageTypeInformation,
    /// Whether the column accepts NULL.
    pub is_nullable: bool,
    /// Whether the column is part of the primary key.
    pub is_part_of_primary_key: bool,
}

impl ColumnDefinition {
    /// Create a column that is not part of the primary key.
    pub fn new(name: impl Into<String>, storage_type: StorageTypeInformation, is_nullable: bool) -> Self {
        Self {
            name: name.into(),
            storage_type,
            is_nullable,
            is_part_of_primary_key: false,
        }
    }

    /// Create a non-nullable primary key column.
    pub fn primary_key(name: impl Into<String>, storage_type: StorageTypeInformation) -> Self {
        Self {
            name: name.into(),
            storage_type,
            is_nullable: false,
            is_part_of_primary_key: true,
        }
    }
}

impl fmt::Display for ColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{}",
            self.name,
            self.storage_type,
            if self.is_nullable { " NULL" } else { " NOT NULL" }
        )
    }
}
