//! Creates the storage property of a single property definition.

use super::context::ModelBuildContext;
use crate::error::Error;
use crate::mapping::{PropertyDefinition, RelationEndPoint, ValueType};
use crate::model::{ColumnDefinition, StoragePropertyDefinition};
use tracing::{debug, warn};

/// Column name used for storage properties of literal values.
pub const VALUE_COLUMN_NAME: &str = "Value";

/// Chooses column layouts for value and relation properties.
///
/// Creation never fails. A property that cannot be mapped becomes an
/// `Unsupported` storage property, and the error only surfaces when its
/// columns are read.
pub struct DataStoragePropertyDefinitionFactory<'a> {
    ctx: &'a ModelBuildContext<'a>,
}

impl<'a> DataStoragePropertyDefinitionFactory<'a> {
    /// Create a factory over a build context.
    pub fn new(ctx: &'a ModelBuildContext<'a>) -> Self {
        Self { ctx }
    }

    /// Create the storage property of a property definition.
    pub fn create_storage_property_definition(&self, property: &PropertyDefinition) -> StoragePropertyDefinition {
        let storage_property = match property.relation() {
            Some(end_point) => self.create_relation_storage_property(property, end_point),
            None => self.create_value_storage_property(property),
        };

        if let StoragePropertyDefinition::Unsupported(unsupported) = &storage_property {
            warn!(
                class_id = %self.ctx.graph().class(property.class()).id(),
                property = %property.name(),
                message = %unsupported.message,
                "Property has no storage mapping"
            );
        } else {
            debug!(
                class_id = %self.ctx.graph().class(property.class()).id(),
                property = %property.name(),
                kind = storage_property.kind(),
                "Created storage property"
            );
        }

        storage_property
    }

    /// Create a storage property for a literal value of the given type.
    ///
    /// Object ids map to the identity columns; every other type maps to a
    /// single non-nullable `Value` column.
    pub fn create_storage_property_definition_for_value(&self, value_type: &ValueType) -> StoragePropertyDefinition {
        if value_type.is_object_id() {
            let object_id = self.ctx.infrastructure().object_id_storage_property();
            return StoragePropertyDefinition::ObjectIdWithClassId(object_id);
        }

        match self.ctx.types().storage_type(value_type, None) {
            Ok(storage_type) => StoragePropertyDefinition::simple(
                value_type.clone(),
                ColumnDefinition::new(VALUE_COLUMN_NAME, storage_type, false),
            ),
            Err(e) => unsupported_from_error(value_type, e),
        }
    }

    /// Effective nullability of a property's columns.
    ///
    /// Columns of a class stored in an ancestor's table are always nullable,
    /// since sibling classes share that table without setting them.
    pub fn is_nullable(&self, property: &PropertyDefinition) -> bool {
        property.is_nullable() || self.ctx.ancestor_table_owner(property.class()).is_some()
    }

    fn create_value_storage_property(&self, property: &PropertyDefinition) -> StoragePropertyDefinition {
        let value_type = property.value_type();
        match self.ctx.types().storage_type(value_type, property.max_length()) {
            Ok(storage_type) => StoragePropertyDefinition::simple(
                value_type.clone(),
                ColumnDefinition::new(self.ctx.names().column_name(property), storage_type, self.is_nullable(property)),
            ),
            Err(e) => unsupported_from_error(value_type, e),
        }
    }

    fn create_relation_storage_property(
        &self,
        property: &PropertyDefinition,
        end_point: &RelationEndPoint,
    ) -> StoragePropertyDefinition {
        let graph = self.ctx.graph();
        let owner = graph.class(property.class());

        if end_point.is_virtual() {
            return StoragePropertyDefinition::unsupported(
                ValueType::ObjectId,
                format!(
                    "Relation end point '{}.{}' is virtual and has no columns.",
                    owner.id(),
                    property.name()
                ),
            );
        }

        let Some(target) = graph.find_class(&end_point.target) else {
            return StoragePropertyDefinition::unsupported(
                ValueType::ObjectId,
                format!("Relation target '{}' is not part of the mapping.", end_point.target),
            );
        };

        let names = self.ctx.names();
        let types = self.ctx.types();
        let nullable = self.is_nullable(property);
        let value_column_name = names.relation_column_name(property);

        if !self.ctx.same_storage_provider(owner.handle(), target) {
            return StoragePropertyDefinition::serialized_object_id(ColumnDefinition::new(
                value_column_name,
                types.storage_type_for_serialized_object_id(),
                nullable,
            ));
        }

        let value = ColumnDefinition::new(value_column_name, types.storage_type_for_object_id(), nullable);
        let target = graph.class(target);
        if target.is_part_of_inheritance_hierarchy() {
            let class_id = ColumnDefinition::new(
                names.relation_class_id_column_name(property),
                types.storage_type_for_class_id(),
                nullable,
            );
            StoragePropertyDefinition::object_id_with_class_id(value, class_id)
        } else {
            StoragePropertyDefinition::object_id_without_class_id(value, target.id())
        }
    }
}

fn unsupported_from_error(value_type: &ValueType, error: Error) -> StoragePropertyDefinition {
    let message = match error {
        Error::UnsupportedStorageType { message, .. } => message,
        other => other.to_string(),
    };
    StoragePropertyDefinition::unsupported(value_type.clone(), message)
}
