//! Columns every entity carries regardless of its class.

use super::name_provider::StorageNameProvider;
use super::type_provider::StorageTypeInformationProvider;
use crate::mapping::{ScalarKind, ValueType};
use crate::model::{ColumnDefinition, ObjectIdWithClassIdStorageProperty, SimpleStorageProperty};

/// Supplies the identity and row-version storage properties.
///
/// The columns are computed once and handed out as clones, so every entity
/// of a model shares the same `ID`, `ClassID` and `Timestamp` definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfrastructureStoragePropertyProvider {
    object_id: ObjectIdWithClassIdStorageProperty,
    timestamp: SimpleStorageProperty,
}

impl InfrastructureStoragePropertyProvider {
    /// Build the infrastructure columns from the given providers.
    pub fn new(types: &dyn StorageTypeInformationProvider, names: &dyn StorageNameProvider) -> Self {
        let id = ColumnDefinition::primary_key(names.id_column_name(), types.storage_type_for_object_id());
        let class_id = ColumnDefinition::new(names.class_id_column_name(), types.storage_type_for_class_id(), false);
        let timestamp = ColumnDefinition::new(names.timestamp_column_name(), types.storage_type_for_timestamp(), false);

        Self {
            object_id: ObjectIdWithClassIdStorageProperty {
                value: id,
                class_id,
            },
            timestamp: SimpleStorageProperty {
                property_type: ValueType::scalar(ScalarKind::Binary),
                column: timestamp,
            },
        }
    }

    /// The identity column, part of every primary key.
    pub fn id_column(&self) -> &ColumnDefinition {
        &self.object_id.value
    }

    /// The class-id discriminator column.
    pub fn class_id_column(&self) -> &ColumnDefinition {
        &self.object_id.class_id
    }

    /// The row-version column.
    pub fn timestamp_column(&self) -> &ColumnDefinition {
        &self.timestamp.column
    }

    /// Identity storage property: `ID` plus `ClassID`.
    pub fn object_id_storage_property(&self) -> ObjectIdWithClassIdStorageProperty {
        self.object_id.clone()
    }

    /// Row-version storage property.
    pub fn timestamp_storage_property(&self) -> SimpleStorageProperty {
        self.timestamp.clone()
    }
}
