//! Entity definitions: the storage shape of one class.

use super::column::ColumnDefinition;
use super::constraint::{ForeignKeyConstraintDefinition, PrimaryKeyConstraintDefinition, TableConstraintDefinition};
use super::storage_property::{
    ObjectIdWithClassIdStorageProperty, SimpleStorageProperty, StoragePropertyDefinition,
};
use crate::error::Error;
use crate::mapping::ClassId;
use rkyv::{Archive, Deserialize, Serialize};
use std::fmt;

/// A possibly schema-qualified name of a table, view or synonym.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Archive,
    Serialize,
    Deserialize,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct EntityName {
    /// Database schema.
    #[serde(default)]
    pub schema_name: Option<String>,
    /// Object name within the schema.
    pub entity_name: String,
}

impl EntityName {
    /// Create an unqualified name.
    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            schema_name: None,
            entity_name: entity_name.into(),
        }
    }

    /// Create a schema-qualified name.
    pub fn qualified(schema_name: impl Into<String>, entity_name: impl Into<String>) -> Self {
        Self {
            schema_name: Some(schema_name.into()),
            entity_name: entity_name.into(),
        }
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema_name {
            Some(schema) => write!(f, "{}.{}", schema, self.entity_name),
            None => f.write_str(&self.entity_name),
        }
    }
}

/// An index over columns of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, serde::Serialize, serde::Deserialize)]
pub struct IndexDefinition {
    /// Index name.
    pub name: String,
    /// Indexed columns in key order.
    pub columns: Vec<ColumnDefinition>,
    /// Whether the index enforces uniqueness.
    pub is_unique: bool,
    /// Whether the index is clustered.
    pub is_clustered: bool,
}

/// Data shared by all entity shapes.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, serde::Serialize, serde::Deserialize)]
pub struct EntityCommon {
    /// The class this entity was created for.
    pub class: ClassId,
    /// Class id of that class.
    pub class_id: String,
    /// Storage provider holding the entity.
    pub storage_provider_id: String,
    /// Name of the view exposing the entity.
    pub view_name: EntityName,
    /// Identity and class-id columns.
    pub object_id_property: ObjectIdWithClassIdStorageProperty,
    /// Row-version column.
    pub timestamp_property: SimpleStorageProperty,
    /// Data properties of the whole hierarchy, base classes first.
    pub data_properties: Vec<StoragePropertyDefinition>,
    /// Indexes.
    pub indexes: Vec<IndexDefinition>,
    /// Synonyms.
    pub synonyms: Vec<EntityName>,
}

/// A class that owns a physical table.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, serde::Serialize, serde::Deserialize)]
pub struct TableDefinition {
    /// Shared entity data.
    pub common: EntityCommon,
    /// Physical table name.
    pub table_name: EntityName,
    /// Primary key followed by foreign keys.
    pub constraints: Vec<TableConstraintDefinition>,
}

/// A class stored in an ancestor's table, selected by class id.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, serde::Serialize, serde::Deserialize)]
pub struct FilterViewDefinition {
    /// Shared entity data.
    pub common: EntityCommon,
    /// The table-owning ancestor whose entity is filtered.
    pub base_entity: ClassId,
    /// Class ids selected by the filter: the class itself and all descendants.
    pub class_ids: Vec<String>,
}

/// An abstract class whose rows live in the tables of its subclasses.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, serde::Serialize, serde::Deserialize)]
pub struct UnionViewDefinition {
    /// Shared entity data.
    pub common: EntityCommon,
    /// Entities of the direct derived classes, in declaration order.
    pub union_members: Vec<ClassId>,
}

/// The storage shape of a class.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, serde::Serialize, serde::Deserialize)]
pub enum EntityDefinition {
    /// Physical table.
    Table(TableDefinition),
    /// View filtering an ancestor's table.
    FilterView(FilterViewDefinition),
    /// View uniting the entities of derived classes.
    UnionView(UnionViewDefinition),
}

impl EntityDefinition {
    /// Shared entity data.
    pub fn common(&self) -> &EntityCommon {
        match self {
            EntityDefinition::Table(t) => &t.common,
            EntityDefinition::FilterView(f) => &f.common,
            EntityDefinition::UnionView(u) => &u.common,
        }
    }

    /// The class this entity was created for.
    pub fn class(&self) -> ClassId {
        self.common().class
    }

    /// Storage provider id.
    pub fn storage_provider_id(&self) -> &str {
        &self.common().storage_provider_id
    }

    /// View name.
    pub fn view_name(&self) -> &EntityName {
        &self.common().view_name
    }

    /// Data properties, base classes first.
    pub fn data_properties(&self) -> &[StoragePropertyDefinition] {
        &self.common().data_properties
    }

    /// Indexes.
    pub fn indexes(&self) -> &[IndexDefinition] {
        &self.common().indexes
    }

    /// Synonyms.
    pub fn synonyms(&self) -> &[EntityName] {
        &self.common().synonyms
    }

    /// Physical table name, for tables.
    pub fn table_name(&self) -> Option<&EntityName> {
        match self {
            EntityDefinition::Table(t) => Some(&t.table_name),
            _ => None,
        }
    }

    /// All columns: ID, ClassID, Timestamp, then data columns in property order.
    ///
    /// Fails if any data property is the unsupported sentinel.
    pub fn columns(&self) -> Result<Vec<&ColumnDefinition>, Error> {
        let common = self.common();
        let mut columns = vec![
            &common.object_id_property.value,
            &common.object_id_property.class_id,
            &common.timestamp_property.column,
        ];
        for property in &common.data_properties {
            columns.extend(property.columns()?);
        }
        Ok(columns)
    }

    /// Column names in storage order.
    pub fn column_names(&self) -> Result<Vec<&str>, Error> {
        Ok(self.columns()?.into_iter().map(|c| c.name.as_str()).collect())
    }

    /// Primary key, for tables.
    pub fn primary_key(&self) -> Option<&PrimaryKeyConstraintDefinition> {
        match self {
            EntityDefinition::Table(t) => t.constraints.iter().find_map(|c| c.as_primary_key()),
            _ => None,
        }
    }

    /// Foreign keys, for tables.
    pub fn foreign_keys(&self) -> Vec<&ForeignKeyConstraintDefinition> {
        match self {
            EntityDefinition::Table(t) => t.constraints.iter().filter_map(|c| c.as_foreign_key()).collect(),
            _ => Vec::new(),
        }
    }

    /// Get the table definition, if this is a table.
    pub fn as_table(&self) -> Option<&TableDefinition> {
        match self {
            EntityDefinition::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Get the filter view definition, if this is a filter view.
    pub fn as_filter_view(&self) -> Option<&FilterViewDefinition> {
        match self {
            EntityDefinition::FilterView(f) => Some(f),
            _ => None,
        }
    }

    /// Get the union view definition, if this is a union view.
    pub fn as_union_view(&self) -> Option<&UnionViewDefinition> {
        match self {
            EntityDefinition::UnionView(u) => Some(u),
            _ => None,
        }
    }

    /// Short name of the entity shape.
    pub fn kind(&self) -> &'static str {
        match self {
            EntityDefinition::Table(_) => "table",
            EntityDefinition::FilterView(_) => "filter-view",
            EntityDefinition::UnionView(_) => "union-view",
        }
    }
}
