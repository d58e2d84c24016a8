//! Compiles a mapping graph into a persistence model.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};

use super::context::ModelBuildContext;
use super::entity_factory::{EntityDefinitionFactory, EntityShape};
use super::name_provider::{DefaultStorageNameProvider, StorageNameProvider};
use super::resolver::StoragePropertyStore;
use super::storage_property_factory::DataStoragePropertyDefinitionFactory;
use super::type_provider::{SqlStorageTypeInformationProvider, StorageTypeInformationProvider};
use crate::config::StorageConfiguration;
use crate::error::Error;
use crate::mapping::{ClassId, MappingDocument, MappingGraph, PropertyId};
use crate::model::{EntityDefinition, PersistenceModel, StoragePropertyDefinition};

/// Statistics of one loader run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadResult {
    /// Number of storage properties attached.
    pub storage_properties_created: usize,

    /// Number of those that are the unsupported sentinel.
    pub unsupported_properties: usize,

    /// Number of entities attached.
    pub entities_created: usize,

    /// Duration of the run.
    pub duration: Duration,
}

impl LoadResult {
    fn merge(&mut self, other: &LoadResult) {
        self.storage_properties_created += other.storage_properties_created;
        self.unsupported_properties += other.unsupported_properties;
        self.entities_created += other.entities_created;
        self.duration += other.duration;
    }
}

/// Attaches storage properties and entities to the classes of a graph.
///
/// Loading a hierarchy runs in two phases. First every property of the
/// whole inheritance tree gets its storage property; then every class of the
/// requested subtree gets its entity. Anything already attached is left
/// alone, so applying the same hierarchy twice is a no-op.
pub struct PersistenceModelLoader<'a> {
    ctx: ModelBuildContext<'a>,
    store: StoragePropertyStore,
    entities: Vec<Option<EntityDefinition>>,
    totals: LoadResult,
}

impl<'a> PersistenceModelLoader<'a> {
    /// Create a loader with the SQL type provider and default naming.
    pub fn new(graph: &'a MappingGraph, config: &StorageConfiguration) -> Result<Self, Error> {
        Self::with_providers(
            graph,
            config,
            Box::new(SqlStorageTypeInformationProvider::new(config.type_mappings.clone())),
            Box::new(DefaultStorageNameProvider),
        )
    }

    /// Create a loader with custom type and name providers.
    pub fn with_providers(
        graph: &'a MappingGraph,
        config: &StorageConfiguration,
        types: Box<dyn StorageTypeInformationProvider + 'a>,
        names: Box<dyn StorageNameProvider + 'a>,
    ) -> Result<Self, Error> {
        let ctx = ModelBuildContext::new(graph, &config.providers, types, names)?;
        Ok(Self {
            store: StoragePropertyStore::new(graph.property_count()),
            entities: vec![None; graph.class_count()],
            totals: LoadResult::default(),
            ctx,
        })
    }

    /// Attach storage properties and entities to `root` and its descendants.
    #[instrument(skip(self), fields(class_id = %self.ctx.graph().class(root).id()))]
    pub fn apply_persistence_model_to_hierarchy(&mut self, root: ClassId) -> Result<LoadResult, Error> {
        let start = Instant::now();
        let mut result = LoadResult::default();

        let graph = self.ctx.graph();
        let tree = graph.topmost_ancestor(root);
        self.attach_storage_properties(tree, &mut result);

        for class in graph.subtree(root) {
            self.ensure_entity(class, &mut result)?;
        }

        result.duration = start.elapsed();
        self.totals.merge(&result);

        info!(
            storage_properties = result.storage_properties_created,
            unsupported = result.unsupported_properties,
            entities = result.entities_created,
            duration_ms = result.duration.as_millis() as u64,
            "Applied persistence model to hierarchy"
        );

        Ok(result)
    }

    /// Apply the persistence model to every inheritance tree of the graph.
    pub fn apply_to_all(&mut self) -> Result<LoadResult, Error> {
        let roots: Vec<ClassId> = self.ctx.graph().roots().collect();
        let mut result = LoadResult::default();
        for root in roots {
            result.merge(&self.apply_persistence_model_to_hierarchy(root)?);
        }
        Ok(result)
    }

    /// Entity attached to a class so far.
    pub fn entity(&self, class: ClassId) -> Option<&EntityDefinition> {
        self.entities[class.index()].as_ref()
    }

    /// Storage property attached to a property so far.
    pub fn storage_property(&self, property: PropertyId) -> Option<&StoragePropertyDefinition> {
        let graph = self.ctx.graph();
        self.store.get(graph, graph.property(property)).ok()
    }

    /// Totals over every run of this loader.
    pub fn totals(&self) -> &LoadResult {
        &self.totals
    }

    /// Freeze everything attached so far into a persistence model.
    pub fn finish(self) -> PersistenceModel {
        let class_ids = self
            .ctx
            .graph()
            .classes()
            .map(|class| class.id().to_string())
            .collect();
        PersistenceModel::from_parts(class_ids, self.entities, self.store.into_inner())
    }

    fn attach_storage_properties(&mut self, tree: ClassId, result: &mut LoadResult) {
        let graph = self.ctx.graph();
        let factory = DataStoragePropertyDefinitionFactory::new(&self.ctx);

        for class in graph.subtree(tree) {
            for property in graph.properties_of(class) {
                if !property.has_storage() || self.store.is_attached(property.handle()) {
                    continue;
                }
                let storage_property = factory.create_storage_property_definition(property);
                if storage_property.is_unsupported() {
                    result.unsupported_properties += 1;
                }
                self.store.attach(property.handle(), storage_property);
                result.storage_properties_created += 1;
            }
        }
    }

    fn ensure_entity(&mut self, class: ClassId, result: &mut LoadResult) -> Result<(), Error> {
        if self.entities[class.index()].is_some() {
            return Ok(());
        }

        let shape = EntityDefinitionFactory::new(&self.ctx).classify(class)?;
        match &shape {
            EntityShape::Table => {}
            EntityShape::FilterView { table_owner } => self.ensure_entity(*table_owner, result)?,
            EntityShape::UnionView { members } => {
                for member in members {
                    self.ensure_entity(*member, result)?;
                }
            }
        }

        let factory = EntityDefinitionFactory::new(&self.ctx);
        let entity = match shape {
            EntityShape::Table => factory.create_table_definition(class, &self.store)?,
            EntityShape::FilterView { table_owner } => {
                factory.create_filter_view_definition(class, table_owner, &self.store)?
            }
            EntityShape::UnionView { members } => factory.create_union_view_definition(class, members, &self.store)?,
        };

        debug!(
            class_id = %self.ctx.graph().class(class).id(),
            kind = entity.kind(),
            view = %entity.view_name(),
            "Created entity"
        );

        self.entities[class.index()] = Some(entity);
        result.entities_created += 1;
        Ok(())
    }
}

/// Compile every class of a graph.
pub fn load_persistence_model(graph: &MappingGraph, config: &StorageConfiguration) -> Result<PersistenceModel, Error> {
    let mut loader = PersistenceModelLoader::new(graph, config)?;
    loader.apply_to_all()?;
    Ok(loader.finish())
}

/// A mapping graph together with its compiled persistence model.
///
/// Built once, then shared read-only between threads.
#[derive(Debug, Clone)]
pub struct MappingConfiguration {
    graph: Arc<MappingGraph>,
    model: Arc<PersistenceModel>,
}

impl MappingConfiguration {
    /// Compile a graph.
    pub fn new(graph: MappingGraph, config: &StorageConfiguration) -> Result<Self, Error> {
        let model = load_persistence_model(&graph, config)?;
        Ok(Self {
            graph: Arc::new(graph),
            model: Arc::new(model),
        })
    }

    /// Build and compile the graph of a mapping document.
    pub fn from_document(document: MappingDocument, config: &StorageConfiguration) -> Result<Self, Error> {
        Self::new(document.into_graph()?, config)
    }

    /// The mapping graph.
    pub fn graph(&self) -> &Arc<MappingGraph> {
        &self.graph
    }

    /// The compiled persistence model.
    pub fn model(&self) -> &Arc<PersistenceModel> {
        &self.model
    }

    /// Entity of a class, by class id.
    pub fn entity(&self, class_id: &str) -> Result<&EntityDefinition, Error> {
        let class = self.graph.class_by_id(class_id)?;
        self.model
            .entity(class.handle())
            .ok_or_else(|| Error::UnknownClass(class_id.to_string()))
    }

    /// Storage property of a property, by class id and property name.
    pub fn storage_property(&self, class_id: &str, property: &str) -> Result<&StoragePropertyDefinition, Error> {
        let class = self.graph.class_by_id(class_id)?;
        let definition = self
            .graph
            .find_property(class.handle(), property)
            .ok_or_else(|| Error::UnknownProperty {
                class_id: class_id.to_string(),
                property: property.to_string(),
            })?;
        self.model
            .storage_property(definition.handle())
            .ok_or_else(|| Error::StoragePropertyNotResolved {
                class_id: class_id.to_string(),
                property: property.to_string(),
            })
    }
}
