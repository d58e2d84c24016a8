//! Input class graph.
//!
//! The mapping is a forest of single-inheritance class definitions with their
//! own properties, as produced by the reflection-based mapping loader.

mod class;
mod declaration;
mod graph;
mod property;
mod relation;
mod value_type;

pub use class::{ClassDefinition, ClassId};
pub use declaration::{
    ClassDeclaration, IndexDeclaration, MappingDocument, PropertyDeclaration, TableDeclaration,
};
pub use graph::MappingGraph;
pub use property::{MemberKey, PropertyDefinition, PropertyId, StorageClass};
pub use relation::{Cardinality, EndPointKind, RelationEndPoint};
pub use value_type::{ScalarKind, ValueType};
