//! Relation end-points attached to relation properties.

use serde::{Deserialize, Serialize};

/// Cardinality of a relation end-point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    /// The end-point holds at most one related object.
    One,
    /// The end-point holds a collection of related objects.
    Many,
}

/// Which side of a bidirectional relation an end-point is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndPointKind {
    /// The owning side; its value is stored in the owner's row.
    Real,
    /// The inverse side; it has no column of its own.
    Virtual,
}

/// A relation end-point of a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEndPoint {
    /// Class id of the related class.
    pub target: String,
    /// Real or virtual side.
    pub kind: EndPointKind,
    /// End-point cardinality.
    pub cardinality: Cardinality,
}

impl RelationEndPoint {
    /// Create the owning side of a relation. Real end-points always hold a single reference.
    pub fn real(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            kind: EndPointKind::Real,
            cardinality: Cardinality::One,
        }
    }

    /// Create the inverse side of a relation.
    pub fn virtual_end_point(target: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            target: target.into(),
            kind: EndPointKind::Virtual,
            cardinality,
        }
    }

    /// Check if this is the owning side.
    pub fn is_real(&self) -> bool {
        self.kind == EndPointKind::Real
    }

    /// Check if this is the inverse side.
    pub fn is_virtual(&self) -> bool {
        self.kind == EndPointKind::Virtual
    }
}
