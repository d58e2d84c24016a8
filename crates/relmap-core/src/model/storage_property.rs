//! Storage properties: how one property is laid out in columns.

use super::column::ColumnDefinition;
use super::object_id::ObjectId;
use crate::error::Error;
use crate::mapping::ValueType;
use rkyv::{Archive, Deserialize, Serialize};

/// A value stored in a single column.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize, serde::Serialize, serde::Deserialize,
)]
pub struct SimpleStorageProperty {
    /// Declared type of the property value.
    pub property_type: ValueType,
    /// The column holding the value.
    pub column: ColumnDefinition,
}

/// A reference stored as a value column plus a class-id discriminator column.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize, serde::Serialize, serde::Deserialize,
)]
pub struct ObjectIdWithClassIdStorageProperty {
    /// Column holding the referenced object's id value.
    pub value: ColumnDefinition,
    /// Column holding the referenced object's class id.
    pub class_id: ColumnDefinition,
}

/// A reference to a class with exactly one possible concrete type.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize, serde::Serialize, serde::Deserialize,
)]
pub struct ObjectIdWithoutClassIdStorageProperty {
    /// Column holding the referenced object's id value.
    pub value: ColumnDefinition,
    /// The only class id a referenced object can have.
    pub class_id: String,
}

impl ObjectIdWithoutClassIdStorageProperty {
    /// Rebuild the full object id from a stored GUID value.
    pub fn object_id(&self, value: uuid::Uuid) -> ObjectId {
        ObjectId::guid(self.class_id.clone(), value)
    }
}

/// A reference across storage providers, stored as one self-describing string.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize, serde::Serialize, serde::Deserialize,
)]
pub struct SerializedObjectIdStorageProperty {
    /// Column holding the serialized object id.
    pub column: ColumnDefinition,
}

impl SerializedObjectIdStorageProperty {
    /// Encode an object id for this column.
    pub fn serialize_value(&self, object_id: &ObjectId) -> String {
        object_id.to_string()
    }

    /// Decode a stored value back into an object id.
    pub fn deserialize_value(&self, stored: &str) -> Result<ObjectId, Error> {
        stored.parse()
    }
}

/// Placeholder for a property whose type has no storage mapping.
///
/// Compilation continues; reading the columns fails with
/// [`Error::UnsupportedStorageType`].
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize, serde::Serialize, serde::Deserialize,
)]
pub struct UnsupportedStorageProperty {
    /// The rejected value type.
    pub value_type: ValueType,
    /// Diagnostic message.
    pub message: String,
}

/// The storage layout of one property.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize, serde::Serialize, serde::Deserialize,
)]
pub enum StoragePropertyDefinition {
    /// One column.
    Simple(SimpleStorageProperty),
    /// Value column plus class-id column.
    ObjectIdWithClassId(ObjectIdWithClassIdStorageProperty),
    /// Value column only; the class id is fixed.
    ObjectIdWithoutClassId(ObjectIdWithoutClassIdStorageProperty),
    /// One column with a serialized object id.
    SerializedObjectId(SerializedObjectIdStorageProperty),
    /// No columns; mapping failed for this property.
    Unsupported(UnsupportedStorageProperty),
}

impl StoragePropertyDefinition {
    /// Create a simple storage property.
    pub fn simple(property_type: ValueType, column: ColumnDefinition) -> Self {
        StoragePropertyDefinition::Simple(SimpleStorageProperty {
            property_type,
            column,
        })
    }

    /// Create an object-id storage property with a class-id column.
    pub fn object_id_with_class_id(value: ColumnDefinition, class_id: ColumnDefinition) -> Self {
        StoragePropertyDefinition::ObjectIdWithClassId(ObjectIdWithClassIdStorageProperty {
            value,
            class_id,
        })
    }

    /// Create an object-id storage property for a fixed class.
    pub fn object_id_without_class_id(value: ColumnDefinition, class_id: impl Into<String>) -> Self {
        StoragePropertyDefinition::ObjectIdWithoutClassId(ObjectIdWithoutClassIdStorageProperty {
            value,
            class_id: class_id.into(),
        })
    }

    /// Create a serialized object-id storage property.
    pub fn serialized_object_id(column: ColumnDefinition) -> Self {
        StoragePropertyDefinition::SerializedObjectId(SerializedObjectIdStorageProperty { column })
    }

    /// Create the unsupported sentinel.
    pub fn unsupported(value_type: ValueType, message: impl Into<String>) -> Self {
        StoragePropertyDefinition::Unsupported(UnsupportedStorageProperty {
            value_type,
            message: message.into(),
        })
    }

    /// All columns, in storage order.
    ///
    /// Fails for the unsupported sentinel.
    pub fn columns(&self) -> Result<Vec<&ColumnDefinition>, Error> {
        match self {
            StoragePropertyDefinition::Simple(p) => Ok(vec![&p.column]),
            StoragePropertyDefinition::ObjectIdWithClassId(p) => Ok(vec![&p.value, &p.class_id]),
            StoragePropertyDefinition::ObjectIdWithoutClassId(p) => Ok(vec![&p.value]),
            StoragePropertyDefinition::SerializedObjectId(p) => Ok(vec![&p.column]),
            StoragePropertyDefinition::Unsupported(p) => Err(p.to_error()),
        }
    }

    /// Columns that take part in equality comparisons and joins.
    ///
    /// For a reference with a class-id column only the value column counts,
    /// because object id values are unique across classes.
    pub fn columns_for_comparison(&self) -> Result<Vec<&ColumnDefinition>, Error> {
        match self {
            StoragePropertyDefinition::ObjectIdWithClassId(p) => Ok(vec![&p.value]),
            other => other.columns(),
        }
    }

    /// The value column of an identity-shaped property.
    pub fn value_column(&self) -> Option<&ColumnDefinition> {
        match self {
            StoragePropertyDefinition::ObjectIdWithClassId(p) => Some(&p.value),
            StoragePropertyDefinition::ObjectIdWithoutClassId(p) => Some(&p.value),
            _ => None,
        }
    }

    /// Check if this property stores an object id that can back a foreign key.
    pub fn is_identity_shaped(&self) -> bool {
        self.value_column().is_some()
    }

    /// Check if this is the unsupported sentinel.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, StoragePropertyDefinition::Unsupported(_))
    }

    /// Short name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            StoragePropertyDefinition::Simple(_) => "simple",
            StoragePropertyDefinition::ObjectIdWithClassId(_) => "object-id-with-class-id",
            StoragePropertyDefinition::ObjectIdWithoutClassId(_) => "object-id-without-class-id",
            StoragePropertyDefinition::SerializedObjectId(_) => "serialized-object-id",
            StoragePropertyDefinition::Unsupported(_) => "unsupported",
        }
    }
}

impl UnsupportedStorageProperty {
    fn to_error(&self) -> Error {
        Error::UnsupportedStorageType {
            value_type: self.value_type.to_string(),
            message: self.message.clone(),
        }
    }
}
