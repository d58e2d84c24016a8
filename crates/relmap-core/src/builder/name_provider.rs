//! Naming conventions for tables, views, columns and constraints.

use crate::mapping::{ClassDefinition, PropertyDefinition};
use crate::model::{ColumnDefinition, EntityName};

/// Derives storage names from class and property metadata.
///
/// Names must be a pure function of the input graph so that schema
/// generation stays stable between runs.
pub trait StorageNameProvider {
    /// Name of the identity column.
    fn id_column_name(&self) -> String;

    /// Name of the class-id discriminator column of every entity.
    fn class_id_column_name(&self) -> String;

    /// Name of the row-version column.
    fn timestamp_column_name(&self) -> String;

    /// Table name of a class, None unless the class declares a table.
    fn table_name(&self, class: &ClassDefinition) -> Option<EntityName>;

    /// View name of a class.
    fn view_name(&self, class: &ClassDefinition) -> EntityName;

    /// Column name of a value property.
    fn column_name(&self, property: &PropertyDefinition) -> String;

    /// Value column name of a relation property.
    fn relation_column_name(&self, property: &PropertyDefinition) -> String;

    /// Class-id column name of a relation property.
    fn relation_class_id_column_name(&self, property: &PropertyDefinition) -> String;

    /// Primary key name of a table.
    fn primary_key_constraint_name(&self, table_name: &EntityName) -> String;

    /// Foreign key name for columns of a table.
    fn foreign_key_constraint_name(&self, table_name: &EntityName, referencing_columns: &[ColumnDefinition]) -> String;
}

/// Default naming: explicit overrides first, class and property names otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStorageNameProvider;

impl StorageNameProvider for DefaultStorageNameProvider {
    fn id_column_name(&self) -> String {
        "ID".to_string()
    }

    fn class_id_column_name(&self) -> String {
        "ClassID".to_string()
    }

    fn timestamp_column_name(&self) -> String {
        "Timestamp".to_string()
    }

    fn table_name(&self, class: &ClassDefinition) -> Option<EntityName> {
        let table = class.table()?;
        let name = table.name.clone().unwrap_or_else(|| class.id().to_string());
        Some(EntityName {
            schema_name: table.schema.clone(),
            entity_name: name,
        })
    }

    fn view_name(&self, class: &ClassDefinition) -> EntityName {
        EntityName::new(format!("{}View", class.id()))
    }

    fn column_name(&self, property: &PropertyDefinition) -> String {
        property
            .column_name()
            .map(str::to_string)
            .unwrap_or_else(|| property.name().to_string())
    }

    fn relation_column_name(&self, property: &PropertyDefinition) -> String {
        property
            .column_name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}ID", property.name()))
    }

    fn relation_class_id_column_name(&self, property: &PropertyDefinition) -> String {
        format!("{}ClassID", self.relation_column_name(property))
    }

    fn primary_key_constraint_name(&self, table_name: &EntityName) -> String {
        format!("PK_{}", table_name.entity_name)
    }

    fn foreign_key_constraint_name(&self, table_name: &EntityName, referencing_columns: &[ColumnDefinition]) -> String {
        let columns: Vec<&str> = referencing_columns.iter().map(|c| c.name.as_str()).collect();
        format!("FK_{}_{}", table_name.entity_name, columns.join("_"))
    }
}
