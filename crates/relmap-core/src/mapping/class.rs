//! Class definitions: nodes of the single-inheritance tree.

use super::declaration::{IndexDeclaration, TableDeclaration};
use super::property::PropertyId;
use crate::model::EntityName;
use rkyv::{Archive, Deserialize, Serialize};
use std::fmt;

/// Handle of a class definition inside a [`MappingGraph`](super::MappingGraph).
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
pub struct ClassId(pub(crate) u32);

impl ClassId {
    /// Position of the class in the graph arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Metadata for one persistent class.
///
/// Built once by [`MappingGraph::build`](super::MappingGraph::build) and never
/// mutated afterwards. Relationships to other classes are arena handles.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDefinition {
    pub(crate) handle: ClassId,
    pub(crate) id: String,
    pub(crate) base_class: Option<ClassId>,
    pub(crate) derived_classes: Vec<ClassId>,
    pub(crate) properties: Vec<PropertyId>,
    pub(crate) storage_group: Option<String>,
    pub(crate) is_abstract: bool,
    pub(crate) table: Option<TableDeclaration>,
    pub(crate) indexes: Vec<IndexDeclaration>,
    pub(crate) synonyms: Vec<EntityName>,
}

impl ClassDefinition {
    /// Arena handle of this class.
    pub fn handle(&self) -> ClassId {
        self.handle
    }

    /// Class id (unique name within the mapping).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Direct base class, if any.
    pub fn base_class(&self) -> Option<ClassId> {
        self.base_class
    }

    /// Direct derived classes in declaration order.
    pub fn derived_classes(&self) -> &[ClassId] {
        &self.derived_classes
    }

    /// Own (not inherited) properties in declaration order.
    pub fn properties(&self) -> &[PropertyId] {
        &self.properties
    }

    /// Storage group used to look up the storage provider.
    pub fn storage_group(&self) -> Option<&str> {
        self.storage_group.as_deref()
    }

    /// Whether the class can have instances of its own.
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Table declaration, present when this class owns a physical table.
    pub fn table(&self) -> Option<&TableDeclaration> {
        self.table.as_ref()
    }

    /// Declared indexes.
    pub fn indexes(&self) -> &[IndexDeclaration] {
        &self.indexes
    }

    /// Declared synonyms for the class's entity.
    pub fn synonyms(&self) -> &[EntityName] {
        &self.synonyms
    }

    /// Check if more than one concrete class can occupy a reference to this class.
    pub fn is_part_of_inheritance_hierarchy(&self) -> bool {
        self.base_class.is_some() || !self.derived_classes.is_empty()
    }
}
