//! Table-level constraint definitions.

use super::column::ColumnDefinition;
use super::entity::EntityName;
use rkyv::{Archive, Deserialize, Serialize};

/// Primary key of a table.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, serde::Serialize, serde::Deserialize)]
pub struct PrimaryKeyConstraintDefinition {
    /// Constraint name.
    pub name: String,
    /// Whether the key is clustered.
    pub is_clustered: bool,
    /// Key columns in order.
    pub columns: Vec<ColumnDefinition>,
}

/// Foreign key from a table to another table.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, serde::Serialize, serde::Deserialize)]
pub struct ForeignKeyConstraintDefinition {
    /// Constraint name.
    pub name: String,
    /// Referenced table.
    pub referenced_table_name: EntityName,
    /// Columns in the referencing table.
    pub referencing_columns: Vec<ColumnDefinition>,
    /// Columns in the referenced table, pairwise with `referencing_columns`.
    pub referenced_columns: Vec<ColumnDefinition>,
}

/// A constraint owned by a table.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, serde::Serialize, serde::Deserialize)]
pub enum TableConstraintDefinition {
    /// Primary key.
    PrimaryKey(PrimaryKeyConstraintDefinition),
    /// Foreign key.
    ForeignKey(ForeignKeyConstraintDefinition),
}

impl PrimaryKeyConstraintDefinition {
    /// Create a primary key.
    pub fn new(name: impl Into<String>, is_clustered: bool, columns: Vec<ColumnDefinition>) -> Self {
        Self {
            name: name.into(),
            is_clustered,
            columns,
        }
    }
}

impl ForeignKeyConstraintDefinition {
    /// Create a foreign key.
    pub fn new(
        name: impl Into<String>,
        referenced_table_name: EntityName,
        referencing_columns: Vec<ColumnDefinition>,
        referenced_columns: Vec<ColumnDefinition>,
    ) -> Self {
        Self {
            name: name.into(),
            referenced_table_name,
            referencing_columns,
            referenced_columns,
        }
    }
}

impl TableConstraintDefinition {
    /// Get the constraint name.
    pub fn name(&self) -> &str {
        match self {
            TableConstraintDefinition::PrimaryKey(pk) => &pk.name,
            TableConstraintDefinition::ForeignKey(fk) => &fk.name,
        }
    }

    /// Check if this is a primary key.
    pub fn is_primary_key(&self) -> bool {
        matches!(self, TableConstraintDefinition::PrimaryKey(_))
    }

    /// Check if this is a foreign key.
    pub fn is_foreign_key(&self) -> bool {
        matches!(self, TableConstraintDefinition::ForeignKey(_))
    }

    /// Get the primary key, if this is one.
    pub fn as_primary_key(&self) -> Option<&PrimaryKeyConstraintDefinition> {
        match self {
            TableConstraintDefinition::PrimaryKey(pk) => Some(pk),
            TableConstraintDefinition::ForeignKey(_) => None,
        }
    }

    /// Get the foreign key, if this is one.
    pub fn as_foreign_key(&self) -> Option<&ForeignKeyConstraintDefinition> {
        match self {
            TableConstraintDefinition::ForeignKey(fk) => Some(fk),
            TableConstraintDefinition::PrimaryKey(_) => None,
        }
    }
}

impl From<PrimaryKeyConstraintDefinition> for TableConstraintDefinition {
    fn from(pk: PrimaryKeyConstraintDefinition) -> Self {
        TableConstraintDefinition::PrimaryKey(pk)
    }
}

impl From<ForeignKeyConstraintDefinition> for TableConstraintDefinition {
    fn from(fk: ForeignKeyConstraintDefinition) -> Self {
        TableConstraintDefinition::ForeignKey(fk)
    }
}
