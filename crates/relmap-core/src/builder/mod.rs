//! Persistence model construction.
//!
//! The [`PersistenceModelLoader`] walks a [`MappingGraph`](crate::mapping::MappingGraph)
//! and attaches a storage property to every column-bearing property and an
//! entity definition to every class. Naming and storage types are pluggable
//! through [`StorageNameProvider`] and [`StorageTypeInformationProvider`].

mod context;
mod entity_factory;
mod foreign_key;
mod infrastructure;
mod loader;
mod name_provider;
mod resolver;
mod storage_property_factory;
mod type_provider;

pub use context::ModelBuildContext;
pub use entity_factory::{EntityDefinitionFactory, EntityShape};
pub use foreign_key::ForeignKeyConstraintDefinitionFactory;
pub use infrastructure::InfrastructureStoragePropertyProvider;
pub use loader::{load_persistence_model, LoadResult, MappingConfiguration, PersistenceModelLoader};
pub use name_provider::{DefaultStorageNameProvider, StorageNameProvider};
pub use resolver::{ResolvedStorageProperty, StoragePropertyDefinitionResolver, StoragePropertyStore};
pub use storage_property_factory::{DataStoragePropertyDefinitionFactory, VALUE_COLUMN_NAME};
pub use type_provider::{
    SqlStorageTypeInformationProvider, StorageTypeInformationProvider, CLASS_ID_WIDTH, SERIALIZED_OBJECT_ID_WIDTH,
};
