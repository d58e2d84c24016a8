//! The compiled persistence model: one entity per class, one storage property per column-bearing property.

use super::entity::{EntityDefinition, EntityName, FilterViewDefinition, UnionViewDefinition};
use super::storage_property::StoragePropertyDefinition;
use crate::error::Error;
use crate::mapping::{ClassId, PropertyId};
use rkyv::{Archive, Deserialize, Serialize};

/// Frozen output of the persistence model loader.
///
/// Indexed by the [`ClassId`]s and [`PropertyId`]s of the graph it was
/// compiled from. There is no mutation API; share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, serde::Serialize, serde::Deserialize)]
pub struct PersistenceModel {
    class_ids: Vec<String>,
    entities: Vec<Option<EntityDefinition>>,
    storage_properties: Vec<Option<StoragePropertyDefinition>>,
}

impl PersistenceModel {
    pub(crate) fn from_parts(
        class_ids: Vec<String>,
        entities: Vec<Option<EntityDefinition>>,
        storage_properties: Vec<Option<StoragePropertyDefinition>>,
    ) -> Self {
        Self {
            class_ids,
            entities,
            storage_properties,
        }
    }

    /// Entity of a class, if the class was loaded.
    pub fn entity(&self, class: ClassId) -> Option<&EntityDefinition> {
        self.entities.get(class.index()).and_then(Option::as_ref)
    }

    /// Entity of a class, looked up by class id.
    pub fn entity_by_class_id(&self, class_id: &str) -> Option<&EntityDefinition> {
        let index = self.class_ids.iter().position(|id| id == class_id)?;
        self.entities.get(index).and_then(Option::as_ref)
    }

    /// Storage property of a property, if it owns columns and was loaded.
    pub fn storage_property(&self, property: PropertyId) -> Option<&StoragePropertyDefinition> {
        self.storage_properties
            .get(property.index())
            .and_then(Option::as_ref)
    }

    /// All loaded entities in class declaration order.
    pub fn entities(&self) -> impl Iterator<Item = &EntityDefinition> {
        self.entities.iter().filter_map(Option::as_ref)
    }

    /// Number of loaded entities.
    pub fn entity_count(&self) -> usize {
        self.entities().count()
    }

    /// All physical tables in class declaration order.
    pub fn tables(&self) -> impl Iterator<Item = &EntityDefinition> {
        self.entities().filter(|e| e.as_table().is_some())
    }

    /// Names of all physical tables.
    pub fn table_names(&self) -> Vec<&EntityName> {
        self.tables().filter_map(|e| e.table_name()).collect()
    }

    /// Class id of a class handle.
    pub fn class_id(&self, class: ClassId) -> Option<&str> {
        self.class_ids.get(class.index()).map(String::as_str)
    }

    /// The table entity a filter view selects from.
    pub fn base_entity(&self, view: &FilterViewDefinition) -> Option<&EntityDefinition> {
        self.entity(view.base_entity)
    }

    /// The entities a union view unites.
    pub fn union_members(&self, view: &UnionViewDefinition) -> Vec<&EntityDefinition> {
        view.union_members
            .iter()
            .filter_map(|member| self.entity(*member))
            .collect()
    }

    /// All physical tables backing an entity: itself, its base table, or every table below a union.
    pub fn backing_tables<'a>(&'a self, entity: &'a EntityDefinition) -> Vec<&'a EntityDefinition> {
        match entity {
            EntityDefinition::Table(_) => vec![entity],
            EntityDefinition::FilterView(view) => self.base_entity(view).into_iter().collect(),
            EntityDefinition::UnionView(view) => self
                .union_members(view)
                .into_iter()
                .flat_map(|member| self.backing_tables(member))
                .collect(),
        }
    }

    /// Serialize the model to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map(|v| v.to_vec())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a model from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        rkyv::from_bytes::<Self, rkyv::rancor::Error>(bytes)
            .map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// Render the model as pretty JSON.
    pub fn to_json_string(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }
}
