//! Compiled relational schema description.
//!
//! Everything in this module is an immutable value object produced by the
//! [`builder`](crate::builder) pass.

mod column;
mod constraint;
mod entity;
mod object_id;
mod persistence_model;
mod storage_property;

pub use column::{ColumnDefinition, DbType, StorageTypeInformation, ValueConversion};
pub use constraint::{
    ForeignKeyConstraintDefinition, PrimaryKeyConstraintDefinition, TableConstraintDefinition,
};
pub use entity::{
    EntityCommon, EntityDefinition, EntityName, FilterViewDefinition, IndexDefinition,
    TableDefinition, UnionViewDefinition,
};
pub use object_id::{ObjectId, ObjectIdValue};
pub use persistence_model::PersistenceModel;
pub use storage_property::{
    ObjectIdWithClassIdStorageProperty, ObjectIdWithoutClassIdStorageProperty,
    SerializedObjectIdStorageProperty, SimpleStorageProperty, StoragePropertyDefinition,
    UnsupportedStorageProperty,
};
