//! Shared state of one compilation pass.

use super::infrastructure::InfrastructureStoragePropertyProvider;
use super::name_provider::StorageNameProvider;
use super::type_provider::StorageTypeInformationProvider;
use crate::config::StorageProviderRegistry;
use crate::error::Error;
use crate::mapping::{ClassId, MappingGraph};
use crate::model::EntityName;

/// Everything the factories consult while compiling a graph.
///
/// Storage providers are resolved for every class up front, so a
/// misconfigured storage group fails before any entity is built.
pub struct ModelBuildContext<'a> {
    graph: &'a MappingGraph,
    types: Box<dyn StorageTypeInformationProvider + 'a>,
    names: Box<dyn StorageNameProvider + 'a>,
    infrastructure: InfrastructureStoragePropertyProvider,
    storage_providers: Vec<String>,
}

impl<'a> ModelBuildContext<'a> {
    /// Create a context, resolving the storage provider of every class.
    pub fn new(
        graph: &'a MappingGraph,
        registry: &StorageProviderRegistry,
        types: Box<dyn StorageTypeInformationProvider + 'a>,
        names: Box<dyn StorageNameProvider + 'a>,
    ) -> Result<Self, Error> {
        let storage_providers = graph
            .classes()
            .map(|class| registry.resolve(class.storage_group()).map(str::to_string))
            .collect::<Result<Vec<_>, _>>()?;
        let infrastructure = InfrastructureStoragePropertyProvider::new(types.as_ref(), names.as_ref());

        Ok(Self {
            graph,
            types,
            names,
            infrastructure,
            storage_providers,
        })
    }

    /// The graph being compiled.
    pub fn graph(&self) -> &'a MappingGraph {
        self.graph
    }

    /// Storage type provider.
    pub fn types(&self) -> &dyn StorageTypeInformationProvider {
        self.types.as_ref()
    }

    /// Storage name provider.
    pub fn names(&self) -> &dyn StorageNameProvider {
        self.names.as_ref()
    }

    /// Identity and row-version columns.
    pub fn infrastructure(&self) -> &InfrastructureStoragePropertyProvider {
        &self.infrastructure
    }

    /// Storage provider id of a class.
    pub fn storage_provider_id(&self, class: ClassId) -> &str {
        &self.storage_providers[class.index()]
    }

    /// Whether two classes are stored by the same provider.
    pub fn same_storage_provider(&self, left: ClassId, right: ClassId) -> bool {
        self.storage_provider_id(left) == self.storage_provider_id(right)
    }

    /// Table name declared by the class itself.
    pub fn table_name(&self, class: ClassId) -> Option<EntityName> {
        self.names.table_name(self.graph.class(class))
    }

    /// Nearest ancestor-or-self with a table name.
    pub fn table_owner(&self, class: ClassId) -> Option<ClassId> {
        std::iter::once(class)
            .chain(self.graph.ancestors(class))
            .find(|c| self.table_name(*c).is_some())
    }

    /// Nearest strict ancestor with a table name.
    pub fn ancestor_table_owner(&self, class: ClassId) -> Option<ClassId> {
        self.graph
            .ancestors(class)
            .into_iter()
            .find(|c| self.table_name(*c).is_some())
    }

    /// Check if any strict descendant has a table name.
    pub fn has_descendant_table(&self, class: ClassId) -> bool {
        self.graph
            .descendants(class)
            .into_iter()
            .any(|c| self.table_name(c).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{DefaultStorageNameProvider, SqlStorageTypeInformationProvider};
    use crate::mapping::ClassDeclaration;

    fn graph() -> MappingGraph {
        MappingGraph::build([
            ClassDeclaration::new("DomainBase").abstract_class(),
            ClassDeclaration::new("Company").with_base("DomainBase").with_table(),
            ClassDeclaration::new("Customer").with_base("Company"),
            ClassDeclaration::new("Official").with_storage_group("Legacy").with_table(),
        ])
        .unwrap()
    }

    fn context<'a>(graph: &'a MappingGraph, registry: &StorageProviderRegistry) -> Result<ModelBuildContext<'a>, Error> {
        ModelBuildContext::new(
            graph,
            registry,
            Box::new(SqlStorageTypeInformationProvider::default()),
            Box::new(DefaultStorageNameProvider),
        )
    }

    #[test]
    fn test_table_owner_lookup() {
        let graph = graph();
        let ctx = context(&graph, &StorageProviderRegistry::default()).unwrap();
        let class = |id: &str| graph.find_class(id).unwrap();

        assert_eq!(ctx.table_owner(class("Customer")), Some(class("Company")));
        assert_eq!(ctx.table_owner(class("Company")), Some(class("Company")));
        assert_eq!(ctx.table_owner(class("DomainBase")), None);
        assert_eq!(ctx.ancestor_table_owner(class("Customer")), Some(class("Company")));
        assert_eq!(ctx.ancestor_table_owner(class("Company")), None);
        assert!(ctx.has_descendant_table(class("DomainBase")));
        assert!(!ctx.has_descendant_table(class("Company")));
    }

    #[test]
    fn test_storage_provider_resolution() {
        let graph = graph();
        let registry = StorageProviderRegistry::new("Main").with_storage_group("Legacy", "LegacyDb");
        let ctx = context(&graph, &registry).unwrap();
        let class = |id: &str| graph.find_class(id).unwrap();

        assert_eq!(ctx.storage_provider_id(class("Company")), "Main");
        assert_eq!(ctx.storage_provider_id(class("Official")), "LegacyDb");
        assert!(ctx.same_storage_provider(class("Company"), class("Customer")));
        assert!(!ctx.same_storage_provider(class("Company"), class("Official")));
    }

    #[test]
    fn test_unresolvable_storage_group_fails() {
        let graph = graph();
        let registry = StorageProviderRegistry::without_default().with_storage_group("Legacy", "LegacyDb");

        assert!(matches!(
            context(&graph, &registry),
            Err(Error::NoStorageProvider { group: None })
        ));
    }
}
