//! Storage property bookkeeping and hierarchy-wide resolution.

use crate::error::Error;
use crate::mapping::{ClassId, MappingGraph, PropertyDefinition, PropertyId};
use crate::model::StoragePropertyDefinition;
use std::collections::HashSet;

/// Storage properties attached so far, indexed by [`PropertyId`].
#[derive(Debug, Clone, Default)]
pub struct StoragePropertyStore {
    properties: Vec<Option<StoragePropertyDefinition>>,
}

impl StoragePropertyStore {
    /// Create an empty store for a graph with `property_count` properties.
    pub fn new(property_count: usize) -> Self {
        Self {
            properties: vec![None; property_count],
        }
    }

    /// Attach the storage property of a property. An existing one is kept.
    pub fn attach(&mut self, property: PropertyId, storage_property: StoragePropertyDefinition) -> bool {
        let slot = &mut self.properties[property.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(storage_property);
        true
    }

    /// Check if a property already has a storage property.
    pub fn is_attached(&self, property: PropertyId) -> bool {
        self.properties
            .get(property.index())
            .is_some_and(Option::is_some)
    }

    /// Storage property of a property, failing if it was not attached yet.
    pub fn get(&self, graph: &MappingGraph, property: &PropertyDefinition) -> Result<&StoragePropertyDefinition, Error> {
        self.properties
            .get(property.handle().index())
            .and_then(Option::as_ref)
            .ok_or_else(|| Error::StoragePropertyNotResolved {
                class_id: graph.class(property.class()).id().to_string(),
                property: property.name().to_string(),
            })
    }

    /// Number of attached storage properties.
    pub fn len(&self) -> usize {
        self.properties.iter().filter(|p| p.is_some()).count()
    }

    /// Check if nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn into_inner(self) -> Vec<Option<StoragePropertyDefinition>> {
        self.properties
    }
}

/// A storage property resolved for an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStorageProperty {
    /// The property the storage property belongs to.
    pub property: PropertyId,
    /// Its storage property.
    pub storage_property: StoragePropertyDefinition,
}

/// Collects the storage properties of everything sharing an entity.
pub struct StoragePropertyDefinitionResolver<'a> {
    graph: &'a MappingGraph,
}

impl<'a> StoragePropertyDefinitionResolver<'a> {
    /// Create a resolver over a graph.
    pub fn new(graph: &'a MappingGraph) -> Self {
        Self { graph }
    }

    /// Storage properties of the class hierarchy: ancestors top-down, the
    /// class, then its descendants, each in declaration order.
    ///
    /// Properties without storage are skipped. Two properties mapped from
    /// the same member yield one storage property, the first one found.
    pub fn resolve_storage_properties(
        &self,
        class: ClassId,
        store: &StoragePropertyStore,
    ) -> Result<Vec<ResolvedStorageProperty>, Error> {
        let mut seen = HashSet::new();
        let mut resolved = Vec::new();

        for member in self.graph.hierarchy(class) {
            for property in self.graph.properties_of(member) {
                if !property.has_storage() || !seen.insert(property.member()) {
                    continue;
                }
                resolved.push(ResolvedStorageProperty {
                    property: property.handle(),
                    storage_property: store.get(self.graph, property)?.clone(),
                });
            }
        }

        Ok(resolved)
    }

    /// Storage property of one property of the hierarchy, looked up by name.
    pub fn find_storage_property(
        &self,
        class: ClassId,
        name: &str,
        store: &StoragePropertyStore,
    ) -> Result<Option<StoragePropertyDefinition>, Error> {
        for member in self.graph.hierarchy(class) {
            if let Some(property) = self.graph.find_property(member, name) {
                if property.has_storage() {
                    return store.get(self.graph, property).map(|p| Some(p.clone()));
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{
        Cardinality, ClassDeclaration, PropertyDeclaration, RelationEndPoint, ScalarKind, StorageClass, ValueType,
    };
    use crate::model::{ColumnDefinition, DbType, StorageTypeInformation};

    fn graph() -> MappingGraph {
        MappingGraph::build([
            ClassDeclaration::new("Company")
                .with_table()
                .with_property(PropertyDeclaration::new("Name", ScalarKind::String))
                .with_property(PropertyDeclaration::new("Cache", ScalarKind::Int32).with_storage_class(StorageClass::None)),
            ClassDeclaration::new("Customer")
                .with_base("Company")
                .with_property(PropertyDeclaration::new("CustomerSince", ScalarKind::DateTime))
                .with_property(PropertyDeclaration::nullable("Region", ScalarKind::String).declared_by("RegionMixin"))
                .with_property(PropertyDeclaration::relation(
                    "Orders",
                    RelationEndPoint::virtual_end_point("Company", Cardinality::Many),
                )),
            ClassDeclaration::new("Partner")
                .with_base("Company")
                .with_property(PropertyDeclaration::nullable("Region", ScalarKind::String).declared_by("RegionMixin")),
        ])
        .unwrap()
    }

    fn attach_all(graph: &MappingGraph) -> StoragePropertyStore {
        let mut store = StoragePropertyStore::new(graph.property_count());
        for property in graph.properties().filter(|p| p.has_storage()) {
            let column = ColumnDefinition::new(
                property.name(),
                StorageTypeInformation::new("nvarchar (max)", DbType::String),
                true,
            );
            store.attach(property.handle(), StoragePropertyDefinition::simple(property.value_type().clone(), column));
        }
        store
    }

    fn column_names(resolved: &[ResolvedStorageProperty]) -> Vec<String> {
        resolved
            .iter()
            .flat_map(|r| r.storage_property.columns().unwrap())
            .map(|c| c.name.clone())
            .collect()
    }

    #[test]
    fn test_resolves_whole_hierarchy_once_per_member() {
        let graph = graph();
        let store = attach_all(&graph);
        let resolver = StoragePropertyDefinitionResolver::new(&graph);

        let company = graph.find_class("Company").unwrap();
        let resolved = resolver.resolve_storage_properties(company, &store).unwrap();
        assert_eq!(column_names(&resolved), ["Name", "CustomerSince", "Region"]);

        let customer = graph.find_class("Customer").unwrap();
        let resolved = resolver.resolve_storage_properties(customer, &store).unwrap();
        assert_eq!(column_names(&resolved), ["Name", "CustomerSince", "Region"]);

        let partner = graph.find_class("Partner").unwrap();
        let resolved = resolver.resolve_storage_properties(partner, &store).unwrap();
        assert_eq!(column_names(&resolved), ["Name", "Region"]);
    }

    #[test]
    fn test_unattached_property_fails() {
        let graph = graph();
        let store = StoragePropertyStore::new(graph.property_count());
        let resolver = StoragePropertyDefinitionResolver::new(&graph);

        let result = resolver.resolve_storage_properties(graph.find_class("Company").unwrap(), &store);
        match result {
            Err(Error::StoragePropertyNotResolved { class_id, property }) => {
                assert_eq!(class_id, "Company");
                assert_eq!(property, "Name");
            }
            other => panic!("Expected StoragePropertyNotResolved, got {other:?}"),
        }
    }

    #[test]
    fn test_store_keeps_first_attachment() {
        let graph = graph();
        let mut store = StoragePropertyStore::new(graph.property_count());
        let name = graph.find_property(graph.find_class("Company").unwrap(), "Name").unwrap();

        let first = StoragePropertyDefinition::unsupported(ValueType::other("Char"), "first");
        let second = StoragePropertyDefinition::unsupported(ValueType::other("Char"), "second");
        assert!(store.attach(name.handle(), first.clone()));
        assert!(!store.attach(name.handle(), second));

        assert!(store.is_attached(name.handle()));
        assert_eq!(store.get(&graph, name).unwrap(), &first);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_find_storage_property_searches_hierarchy() {
        let graph = graph();
        let store = attach_all(&graph);
        let resolver = StoragePropertyDefinitionResolver::new(&graph);
        let customer = graph.find_class("Customer").unwrap();

        let name = resolver.find_storage_property(customer, "Name", &store).unwrap().unwrap();
        assert_eq!(name.columns().unwrap()[0].name, "Name");
        assert!(resolver.find_storage_property(customer, "Orders", &store).unwrap().is_none());
        assert!(resolver.find_storage_property(customer, "Missing", &store).unwrap().is_none());
    }
}
