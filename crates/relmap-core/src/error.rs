//! Core error types.

use thiserror::Error;

/// Errors raised while building a mapping graph or compiling its persistence model.
///
/// Per-property data-shape problems (an unmappable value type) are not errors at
/// compile time; they become an `Unsupported` storage property and only surface
/// as [`Error::UnsupportedStorageType`] when that property's columns are read.
#[derive(Debug, Error)]
pub enum Error {
    /// No class in the hierarchy above (or at) this class declares a table.
    #[error("class '{class_id}' has no table name defined in its hierarchy")]
    MissingTableName {
        /// The class that could not be mapped.
        class_id: String,
    },

    /// A class declares a table although an ancestor already owns one.
    #[error("class '{class_id}' declares a table, but its base class '{table_owner}' already owns table '{table_name}'")]
    NestedTable {
        /// The class declaring the second table.
        class_id: String,
        /// The ancestor owning the physical table.
        table_owner: String,
        /// Name of the ancestor's table.
        table_name: String,
    },

    /// A real relation end-point resolved to a storage property that is not identity-shaped.
    #[error("property '{property}' of class '{class_id}' cannot reference another table: its storage property is not an object id")]
    NonIdentityForeignKeyColumn {
        /// The class declaring the relation property.
        class_id: String,
        /// The relation property.
        property: String,
    },

    /// A storage property was requested before the loader attached it.
    #[error("storage property of '{class_id}.{property}' has not been resolved yet")]
    StoragePropertyNotResolved {
        /// The class declaring the property.
        class_id: String,
        /// The property whose storage property is missing.
        property: String,
    },

    /// The columns of an unsupported storage property were materialized.
    #[error("cannot map value type '{value_type}': {message}")]
    UnsupportedStorageType {
        /// Display name of the rejected value type.
        value_type: String,
        /// Diagnostic message from the storage type provider.
        message: String,
    },

    /// Two class declarations share the same class id.
    #[error("class '{0}' is declared more than once")]
    DuplicateClass(String),

    /// A class id was referenced but never declared.
    #[error("unknown class '{0}'")]
    UnknownClass(String),

    /// A class names a base class that was never declared.
    #[error("class '{class_id}' derives from unknown class '{base_class}'")]
    UnknownBaseClass {
        /// The derived class.
        class_id: String,
        /// The missing base class.
        base_class: String,
    },

    /// A relation property points at a class that was never declared.
    #[error("relation property '{class_id}.{property}' targets unknown class '{target}'")]
    UnknownRelationTarget {
        /// The class declaring the relation.
        class_id: String,
        /// The relation property.
        property: String,
        /// The missing target class.
        target: String,
    },

    /// A property name was looked up on a class that does not declare or inherit it.
    #[error("class '{class_id}' has no property '{property}'")]
    UnknownProperty {
        /// The class searched.
        class_id: String,
        /// The missing property name.
        property: String,
    },

    /// A value property was declared without a value type.
    #[error("property '{class_id}.{property}' declares no value type")]
    MissingValueType {
        /// The class declaring the property.
        class_id: String,
        /// The property without a type.
        property: String,
    },

    /// Base-class links form a cycle.
    #[error("inheritance cycle detected at class '{0}'")]
    InheritanceCycle(String),

    /// A storage group has no provider and no default provider is configured.
    #[error("no storage provider configured for storage group {group:?}")]
    NoStorageProvider {
        /// The storage group that could not be resolved (None for the default group).
        group: Option<String>,
    },

    /// An index declaration names a property the entity does not expose.
    #[error("index '{index}' on class '{class_id}' references unknown property '{property}'")]
    UnknownIndexProperty {
        /// The class declaring the index.
        class_id: String,
        /// Index name.
        index: String,
        /// The unresolved property.
        property: String,
    },

    /// A serialized object id string could not be parsed.
    #[error("invalid object id '{value}': {reason}")]
    InvalidObjectId {
        /// The rejected input.
        value: String,
        /// Why parsing failed.
        reason: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// I/O error while reading a mapping document or configuration.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
