//! Property definitions within classes.

use super::class::ClassId;
use super::relation::RelationEndPoint;
use super::value_type::ValueType;
use rkyv::{Archive, Deserialize, Serialize};
use std::fmt;

/// Handle of a property definition inside a [`MappingGraph`](super::MappingGraph).
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
pub struct PropertyId(pub(crate) u32);

impl PropertyId {
    /// Position of the property in the graph arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a property takes part in persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum StorageClass {
    /// Mapped to storage.
    #[default]
    Persistent,
    /// Kept for the lifetime of a transaction only, never mapped.
    Transaction,
    /// Not persisted at all.
    None,
}

/// Identity of the reflected member behind a property definition.
///
/// Two property definitions with the same member key (an override pair, or a
/// member mixed into several classes) share one storage property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberKey {
    /// Type that declares the member.
    pub declaring_type: String,
    /// Member name.
    pub name: String,
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_type, self.name)
    }
}

/// Metadata for one member of a class.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDefinition {
    pub(crate) handle: PropertyId,
    pub(crate) class: ClassId,
    pub(crate) name: String,
    pub(crate) member: MemberKey,
    pub(crate) value_type: ValueType,
    pub(crate) is_nullable: bool,
    pub(crate) max_length: Option<u32>,
    pub(crate) storage_class: StorageClass,
    pub(crate) column_name: Option<String>,
    pub(crate) relation: Option<RelationEndPoint>,
}

impl PropertyDefinition {
    /// Arena handle of this property.
    pub fn handle(&self) -> PropertyId {
        self.handle
    }

    /// The class declaring this property.
    pub fn class(&self) -> ClassId {
        self.class
    }

    /// Property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The reflected member this property was created from.
    pub fn member(&self) -> &MemberKey {
        &self.member
    }

    /// Declared value type.
    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    /// Declared nullability.
    pub fn is_nullable(&self) -> bool {
        self.is_nullable
    }

    /// Maximum length for strings and binary data.
    pub fn max_length(&self) -> Option<u32> {
        self.max_length
    }

    /// Storage class.
    pub fn storage_class(&self) -> StorageClass {
        self.storage_class
    }

    /// Explicit column name, if one was declared.
    pub fn column_name(&self) -> Option<&str> {
        self.column_name.as_deref()
    }

    /// Relation end-point, if this is a relation property.
    pub fn relation(&self) -> Option<&RelationEndPoint> {
        self.relation.as_ref()
    }

    /// Check if this property references another class.
    pub fn is_relation(&self) -> bool {
        self.relation.is_some()
    }

    /// Check if this property is mapped to storage.
    pub fn is_persistent(&self) -> bool {
        self.storage_class == StorageClass::Persistent
    }

    /// Check if this property owns columns: persistent and not a virtual end-point.
    pub fn has_storage(&self) -> bool {
        self.is_persistent() && !self.relation.as_ref().is_some_and(|r| r.is_virtual())
    }
}
