//! relmap core - compiles class mappings into a relational persistence model.
//!
//! A [`MappingGraph`] of single-inheritance classes is turned into a
//! [`PersistenceModel`]: one table, filter view or union view per class, and
//! one storage property per column-bearing property.

pub mod builder;
pub mod config;
pub mod error;
pub mod mapping;
pub mod model;

pub use builder::{
    load_persistence_model, DefaultStorageNameProvider, LoadResult, MappingConfiguration, PersistenceModelLoader,
    SqlStorageTypeInformationProvider, StorageNameProvider, StorageTypeInformationProvider,
};
pub use config::{StorageConfiguration, StorageProviderRegistry, TypeMapping, TypeMappingTable};
pub use error::Error;
pub use mapping::{
    Cardinality, ClassDeclaration, ClassDefinition, ClassId, IndexDeclaration, MappingDocument, MappingGraph,
    PropertyDeclaration, PropertyDefinition, PropertyId, RelationEndPoint, ScalarKind, StorageClass, ValueType,
};
pub use model::{
    ColumnDefinition, EntityDefinition, EntityName, ObjectId, PersistenceModel, StoragePropertyDefinition,
    StorageTypeInformation,
};
