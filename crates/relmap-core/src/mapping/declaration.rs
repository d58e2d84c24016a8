//! Declarative input consumed by [`MappingGraph::build`](super::MappingGraph::build).
//!
//! Declarations are what the reflection-based mapping loader hands over: one
//! [`ClassDeclaration`] per class with its own properties. They can be built in
//! code or read from a JSON [`MappingDocument`].

use super::graph::MappingGraph;
use super::property::StorageClass;
use super::relation::RelationEndPoint;
use super::value_type::ValueType;
use crate::error::Error;
use crate::model::EntityName;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Table declaration on a class that owns a physical table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableDeclaration {
    /// Explicit table name. Defaults to the class id.
    #[serde(default)]
    pub name: Option<String>,
    /// Database schema of the table.
    #[serde(default)]
    pub schema: Option<String>,
}

/// Index declared on a class, by property name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDeclaration {
    /// Index name.
    pub name: String,
    /// Indexed properties in key order.
    pub properties: Vec<String>,
    /// Whether the index enforces uniqueness.
    #[serde(default)]
    pub unique: bool,
    /// Whether the index is clustered.
    #[serde(default)]
    pub clustered: bool,
}

impl IndexDeclaration {
    /// Create a non-unique, non-clustered index.
    pub fn new(
        name: impl Into<String>,
        properties: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            properties: properties.into_iter().map(Into::into).collect(),
            unique: false,
            clustered: false,
        }
    }

    /// Mark as unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Mark as clustered.
    pub fn clustered(mut self) -> Self {
        self.clustered = true;
        self
    }
}

/// One property as declared by the mapping loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDeclaration {
    /// Property name.
    pub name: String,
    /// Type declaring the reflected member. Defaults to the owning class id.
    #[serde(default)]
    pub declaring_type: Option<String>,
    /// Declared value type. Required for value properties, ignored for relations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
    /// Declared nullability. Relations default to nullable, values to required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    /// Maximum length for strings and binary data.
    #[serde(default)]
    pub max_length: Option<u32>,
    /// Storage class.
    #[serde(default)]
    pub storage_class: StorageClass,
    /// Explicit column name.
    #[serde(default)]
    pub column_name: Option<String>,
    /// Relation end-point for relation properties.
    #[serde(default)]
    pub relation: Option<RelationEndPoint>,
}

impl PropertyDeclaration {
    /// Create a required value property.
    pub fn new(name: impl Into<String>, value_type: impl Into<ValueType>) -> Self {
        Self {
            name: name.into(),
            declaring_type: None,
            value_type: Some(value_type.into()),
            nullable: Some(false),
            max_length: None,
            storage_class: StorageClass::Persistent,
            column_name: None,
            relation: None,
        }
    }

    /// Create a nullable value property.
    pub fn nullable(name: impl Into<String>, value_type: impl Into<ValueType>) -> Self {
        Self {
            nullable: Some(true),
            ..Self::new(name, value_type)
        }
    }

    /// Create a relation property. References are nullable unless marked mandatory.
    pub fn relation(name: impl Into<String>, end_point: RelationEndPoint) -> Self {
        Self {
            name: name.into(),
            declaring_type: None,
            value_type: None,
            nullable: None,
            max_length: None,
            storage_class: StorageClass::Persistent,
            column_name: None,
            relation: Some(end_point),
        }
    }

    /// Mark the property as not nullable.
    pub fn mandatory(mut self) -> Self {
        self.nullable = Some(false);
        self
    }

    /// Effective declared nullability, falling back to the default for the property kind.
    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(self.relation.is_some())
    }

    /// Set the maximum length.
    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Set the storage class.
    pub fn with_storage_class(mut self, storage_class: StorageClass) -> Self {
        self.storage_class = storage_class;
        self
    }

    /// Set an explicit column name.
    pub fn with_column_name(mut self, column_name: impl Into<String>) -> Self {
        self.column_name = Some(column_name.into());
        self
    }

    /// Set the type declaring the reflected member.
    pub fn declared_by(mut self, declaring_type: impl Into<String>) -> Self {
        self.declaring_type = Some(declaring_type.into());
        self
    }
}

/// One class as declared by the mapping loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDeclaration {
    /// Class id.
    pub id: String,
    /// Base class id.
    #[serde(default)]
    pub base_class: Option<String>,
    /// Storage group used for provider lookup.
    #[serde(default)]
    pub storage_group: Option<String>,
    /// Whether the class is abstract.
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    /// Present when the class owns a table.
    #[serde(default)]
    pub table: Option<TableDeclaration>,
    /// Own properties in declaration order.
    #[serde(default)]
    pub properties: Vec<PropertyDeclaration>,
    /// Declared indexes.
    #[serde(default)]
    pub indexes: Vec<IndexDeclaration>,
    /// Declared synonyms.
    #[serde(default)]
    pub synonyms: Vec<EntityName>,
}

impl ClassDeclaration {
    /// Create a class declaration without a table.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            base_class: None,
            storage_group: None,
            is_abstract: false,
            table: None,
            properties: Vec::new(),
            indexes: Vec::new(),
            synonyms: Vec::new(),
        }
    }

    /// Set the base class.
    pub fn with_base(mut self, base_class: impl Into<String>) -> Self {
        self.base_class = Some(base_class.into());
        self
    }

    /// Declare that the class owns a table named after the class id.
    pub fn with_table(mut self) -> Self {
        self.table = Some(TableDeclaration::default());
        self
    }

    /// Declare that the class owns a table with an explicit name.
    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table = Some(TableDeclaration {
            name: Some(name.into()),
            schema: None,
        });
        self
    }

    /// Set the full table declaration.
    pub fn with_table_declaration(mut self, table: TableDeclaration) -> Self {
        self.table = Some(table);
        self
    }

    /// Set the storage group.
    pub fn with_storage_group(mut self, group: impl Into<String>) -> Self {
        self.storage_group = Some(group.into());
        self
    }

    /// Mark as abstract.
    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Add a property.
    pub fn with_property(mut self, property: PropertyDeclaration) -> Self {
        self.properties.push(property);
        self
    }

    /// Add multiple properties.
    pub fn with_properties(mut self, properties: impl IntoIterator<Item = PropertyDeclaration>) -> Self {
        self.properties.extend(properties);
        self
    }

    /// Add an index.
    pub fn with_index(mut self, index: IndexDeclaration) -> Self {
        self.indexes.push(index);
        self
    }

    /// Add a synonym.
    pub fn with_synonym(mut self, synonym: EntityName) -> Self {
        self.synonyms.push(synonym);
        self
    }
}

/// A complete mapping as a serializable document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MappingDocument {
    /// All class declarations. Base classes may appear after derived ones.
    pub classes: Vec<ClassDeclaration>,
}

impl MappingDocument {
    /// Parse a document from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// Read a JSON document from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Render the document as pretty JSON.
    pub fn to_json_string(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Build the class graph described by this document.
    pub fn into_graph(self) -> Result<MappingGraph, Error> {
        MappingGraph::build(self.classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{Cardinality, EndPointKind, ScalarKind};

    #[test]
    fn test_property_builders() {
        let number = PropertyDeclaration::new("OrderNo", ScalarKind::Int32);
        assert!(!number.is_nullable());
        assert_eq!(number.storage_class, StorageClass::Persistent);

        let customer = PropertyDeclaration::relation("Customer", RelationEndPoint::real("Customer"));
        assert!(customer.is_nullable());
        assert_eq!(customer.value_type, None);

        let mandatory = customer.mandatory();
        assert!(!mandatory.is_nullable());
    }

    #[test]
    fn test_document_from_json() {
        let json = r#"{
            "classes": [
                {
                    "id": "Order",
                    "table": {},
                    "properties": [
                        { "name": "OrderNo", "value_type": { "Scalar": "Int32" } },
                        {
                            "name": "Customer",
                            "nullable": true,
                            "relation": { "target": "Customer", "kind": "Real", "cardinality": "One" }
                        },
                        {
                            "name": "OrderItems",
                            "relation": { "target": "OrderItem", "kind": "Virtual", "cardinality": "Many" }
                        }
                    ]
                },
                { "id": "Customer", "table": { "name": "Customers" } },
                { "id": "OrderItem", "table": {} }
            ]
        }"#;

        let document = MappingDocument::from_json_str(json).unwrap();
        assert_eq!(document.classes.len(), 3);

        let order = &document.classes[0];
        assert!(order.table.is_some());
        assert_eq!(order.properties[0].value_type, Some(ValueType::scalar(ScalarKind::Int32)));
        assert!(order.properties[1].is_nullable());
        assert!(order.properties[2].is_nullable());
        let items = order.properties[2].relation.as_ref().unwrap();
        assert_eq!(items.kind, EndPointKind::Virtual);
        assert_eq!(items.cardinality, Cardinality::Many);

        assert_eq!(
            document.classes[1].table.as_ref().unwrap().name.as_deref(),
            Some("Customers")
        );
    }

    #[test]
    fn test_document_nullability_defaults_match_builders() {
        let json = r#"{
            "classes": [
                {
                    "id": "Order",
                    "table": {},
                    "properties": [
                        { "name": "OrderNo", "value_type": { "Scalar": "Int32" } },
                        { "name": "Customer", "relation": { "target": "Customer", "kind": "Real", "cardinality": "One" } },
                        {
                            "name": "Official",
                            "nullable": false,
                            "relation": { "target": "Customer", "kind": "Real", "cardinality": "One" }
                        }
                    ]
                },
                { "id": "Customer", "table": {} }
            ]
        }"#;

        let graph = MappingDocument::from_json_str(json).unwrap().into_graph().unwrap();
        let order = graph.find_class("Order").unwrap();

        assert!(!graph.find_property(order, "OrderNo").unwrap().is_nullable());
        let customer = graph.find_property(order, "Customer").unwrap();
        assert!(customer.is_nullable());
        assert_eq!(customer.value_type(), &ValueType::ObjectId);
        assert!(!graph.find_property(order, "Official").unwrap().is_nullable());

        let built = PropertyDeclaration::relation("Customer", RelationEndPoint::real("Customer"));
        assert_eq!(built.is_nullable(), customer.is_nullable());
    }

    #[test]
    fn test_document_value_property_without_type_fails() {
        let json = r#"{ "classes": [ { "id": "Order", "table": {}, "properties": [ { "name": "Note" } ] } ] }"#;

        let result = MappingDocument::from_json_str(json).unwrap().into_graph();
        assert!(matches!(
            result,
            Err(Error::MissingValueType { ref class_id, ref property }) if class_id == "Order" && property == "Note"
        ));
    }

    #[test]
    fn test_document_rejects_malformed_json() {
        let result = MappingDocument::from_json_str("{ \"classes\": [ { \"table\": {} } ] }");
        assert!(matches!(result, Err(Error::Deserialization(_))));
    }
}
