//! Integration tests for persistence model compilation.

use relmap_core::mapping::{Cardinality, StorageClass};
use relmap_core::model::{DbType, ObjectId, ValueConversion};
use relmap_core::{
    load_persistence_model, ClassDeclaration, EntityName, Error, IndexDeclaration, MappingConfiguration,
    MappingDocument, MappingGraph, PersistenceModel, PersistenceModelLoader, PropertyDeclaration, RelationEndPoint,
    ScalarKind, StorageConfiguration, StoragePropertyDefinition, ValueType,
};

fn order_domain() -> Vec<ClassDeclaration> {
    vec![
        ClassDeclaration::new("DomainBase")
            .abstract_class()
            .with_property(PropertyDeclaration::nullable("CreatedBy", ScalarKind::String).with_max_length(50)),
        ClassDeclaration::new("Company")
            .with_base("DomainBase")
            .with_table()
            .with_property(PropertyDeclaration::new("Name", ScalarKind::String).with_max_length(100))
            .with_property(PropertyDeclaration::relation("Ceo", RelationEndPoint::real("Ceo")))
            .with_index(IndexDeclaration::new("IX_Company_Name", ["Name"]).unique()),
        ClassDeclaration::new("Customer")
            .with_base("Company")
            .with_property(PropertyDeclaration::new("CustomerSince", ScalarKind::DateTime))
            .with_property(PropertyDeclaration::new(
                "Type",
                ValueType::enumeration("CustomerType", ScalarKind::Int32),
            ))
            .with_property(PropertyDeclaration::relation(
                "Orders",
                RelationEndPoint::virtual_end_point("Order", Cardinality::Many),
            )),
        ClassDeclaration::new("Partner")
            .with_base("Company")
            .with_property(PropertyDeclaration::nullable("ContactPerson", ScalarKind::String)),
        ClassDeclaration::new("Ceo")
            .with_table()
            .with_property(PropertyDeclaration::new("Name", ScalarKind::String).with_max_length(100)),
        ClassDeclaration::new("Order")
            .with_base("DomainBase")
            .with_table()
            .with_property(PropertyDeclaration::new("OrderNo", ScalarKind::Int32))
            .with_property(PropertyDeclaration::new("DeliveryDate", ScalarKind::DateTime))
            .with_property(PropertyDeclaration::relation("Customer", RelationEndPoint::real("Customer")).mandatory())
            .with_property(PropertyDeclaration::relation("Official", RelationEndPoint::real("Official")))
            .with_property(PropertyDeclaration::new("Cache", ScalarKind::Binary).with_storage_class(StorageClass::Transaction))
            .with_synonym(EntityName::qualified("legacy", "Orders")),
        ClassDeclaration::new("OrderItem")
            .with_table()
            .with_property(PropertyDeclaration::relation("Order", RelationEndPoint::real("Order")).mandatory())
            .with_property(PropertyDeclaration::new("Product", ScalarKind::String)),
        ClassDeclaration::new("Official")
            .with_storage_group("Legacy")
            .with_table()
            .with_property(PropertyDeclaration::new("Name", ScalarKind::String)),
        ClassDeclaration::new("FileSystemItem")
            .with_table()
            .with_property(PropertyDeclaration::relation("ParentFolder", RelationEndPoint::real("Folder"))),
        ClassDeclaration::new("Folder").with_base("FileSystemItem"),
        ClassDeclaration::new("File")
            .with_base("FileSystemItem")
            .with_property(PropertyDeclaration::new("Size", ScalarKind::Int64)),
    ]
}

fn config() -> StorageConfiguration {
    StorageConfiguration::new("Main").with_storage_group("Legacy", "LegacyDb")
}

fn compile(declarations: Vec<ClassDeclaration>) -> (MappingGraph, PersistenceModel) {
    let graph = MappingGraph::build(declarations).unwrap();
    let model = load_persistence_model(&graph, &config()).unwrap();
    (graph, model)
}

fn column_strings(model: &PersistenceModel, class_id: &str) -> Vec<String> {
    model
        .entity_by_class_id(class_id)
        .unwrap()
        .columns()
        .unwrap()
        .iter()
        .map(|c| c.to_string())
        .collect()
}

#[test]
fn test_every_class_gets_an_entity() {
    let (graph, model) = compile(order_domain());

    assert_eq!(model.entity_count(), graph.class_count());
    let kinds: Vec<(&str, &str)> = graph
        .classes()
        .map(|c| (c.id(), model.entity(c.handle()).unwrap().kind()))
        .collect();
    assert_eq!(
        kinds,
        [
            ("DomainBase", "union-view"),
            ("Company", "table"),
            ("Customer", "filter-view"),
            ("Partner", "filter-view"),
            ("Ceo", "table"),
            ("Order", "table"),
            ("OrderItem", "table"),
            ("Official", "table"),
            ("FileSystemItem", "table"),
            ("Folder", "filter-view"),
            ("File", "filter-view"),
        ]
    );
}

#[test]
fn test_company_table_layout() {
    let (_, model) = compile(order_domain());

    assert_eq!(
        column_strings(&model, "Company"),
        [
            "ID uniqueidentifier NOT NULL",
            "ClassID varchar (100) NOT NULL",
            "Timestamp rowversion NOT NULL",
            "CreatedBy nvarchar (50) NULL",
            "Name nvarchar (100) NOT NULL",
            "CeoID uniqueidentifier NULL",
            "CustomerSince datetime NULL",
            "Type int NULL",
            "ContactPerson nvarchar (max) NULL",
        ]
    );

    let company = model.entity_by_class_id("Company").unwrap();
    assert_eq!(company.primary_key().unwrap().name, "PK_Company");
    assert_eq!(company.storage_provider_id(), "Main");
    assert_eq!(company.indexes()[0].columns[0].name, "Name");
}

#[test]
fn test_columns_below_table_owner_are_nullable() {
    let (_, model) = compile(order_domain());

    // Columns declared by derived classes widen to NULL in the shared table.
    let customer_columns = column_strings(&model, "Customer");
    assert!(customer_columns.contains(&"CustomerSince datetime NULL".to_string()));
    assert!(customer_columns.contains(&"Type int NULL".to_string()));

    let file_columns = column_strings(&model, "File");
    assert!(file_columns.contains(&"Size bigint NULL".to_string()));
}

#[test]
fn test_filter_views_select_subtree() {
    let (graph, model) = compile(order_domain());

    let customer = model.entity_by_class_id("Customer").unwrap();
    let view = customer.as_filter_view().unwrap();
    assert_eq!(view.base_entity, graph.find_class("Company").unwrap());
    assert_eq!(view.class_ids, ["Customer"]);
    assert_eq!(customer.view_name(), &EntityName::new("CustomerView"));

    let backing = model.backing_tables(customer);
    assert_eq!(backing.len(), 1);
    assert_eq!(backing[0].table_name().unwrap().entity_name, "Company");
}

#[test]
fn test_union_view_over_tables_of_subclasses() {
    let (graph, model) = compile(order_domain());

    let domain_base = model.entity_by_class_id("DomainBase").unwrap();
    let union = domain_base.as_union_view().unwrap();
    assert_eq!(
        union.union_members,
        [graph.find_class("Company").unwrap(), graph.find_class("Order").unwrap()]
    );

    let tables: Vec<String> = model
        .backing_tables(domain_base)
        .iter()
        .map(|t| t.table_name().unwrap().to_string())
        .collect();
    assert_eq!(tables, ["Company", "Order"]);

    let company = model.entity_by_class_id("Company").unwrap();
    assert_eq!(model.backing_tables(company), [company]);
}

#[test]
fn test_relation_storage_shapes() {
    let configuration = MappingConfiguration::new(MappingGraph::build(order_domain()).unwrap(), &config()).unwrap();

    // Customer is part of a hierarchy, so the class id is stored alongside.
    let customer = configuration.storage_property("Order", "Customer").unwrap();
    let columns: Vec<String> = customer.columns().unwrap().iter().map(|c| c.to_string()).collect();
    assert_eq!(
        columns,
        [
            "CustomerID uniqueidentifier NOT NULL",
            "CustomerIDClassID varchar (100) NOT NULL"
        ]
    );

    // Ceo stands alone, so its class id is implied.
    match configuration.storage_property("Company", "Ceo").unwrap() {
        StoragePropertyDefinition::ObjectIdWithoutClassId(ceo) => assert_eq!(ceo.class_id, "Ceo"),
        other => panic!("Expected ObjectIdWithoutClassId, got {other:?}"),
    }

    // Official lives on another storage provider.
    match configuration.storage_property("Order", "Official").unwrap() {
        StoragePropertyDefinition::SerializedObjectId(official) => {
            assert_eq!(official.column.storage_type.conversion, ValueConversion::ObjectIdToString);
            let id = ObjectId::int32("Official", 1);
            assert_eq!(official.deserialize_value(&official.serialize_value(&id)).unwrap(), id);
        }
        other => panic!("Expected SerializedObjectId, got {other:?}"),
    }

    // Virtual end-points and transaction properties own no columns.
    assert!(configuration.storage_property("Customer", "Orders").is_err());
    assert!(configuration.storage_property("Order", "Cache").is_err());
}

#[test]
fn test_foreign_keys() {
    let (_, model) = compile(order_domain());

    let order = model.entity_by_class_id("Order").unwrap();
    let names: Vec<&str> = order.foreign_keys().iter().map(|fk| fk.name.as_str()).collect();
    assert_eq!(names, ["FK_Order_CustomerID"]);
    assert_eq!(order.foreign_keys()[0].referenced_table_name, EntityName::new("Company"));
    assert_eq!(order.synonyms(), [EntityName::qualified("legacy", "Orders")]);

    let item = model.entity_by_class_id("OrderItem").unwrap();
    assert_eq!(item.foreign_keys()[0].name, "FK_OrderItem_OrderID");

    let company = model.entity_by_class_id("Company").unwrap();
    assert_eq!(company.foreign_keys()[0].name, "FK_Company_CeoID");

    // Cross-provider references never get a foreign key.
    assert!(model
        .tables()
        .flat_map(|t| t.foreign_keys())
        .all(|fk| fk.referenced_table_name.entity_name != "Official"));
}

#[test]
fn test_self_referencing_hierarchy() {
    let (_, model) = compile(order_domain());

    let items = model.entity_by_class_id("FileSystemItem").unwrap();
    let fk = items.foreign_keys()[0];
    assert_eq!(fk.name, "FK_FileSystemItem_ParentFolderID");
    assert_eq!(fk.referenced_table_name, EntityName::new("FileSystemItem"));
    assert_eq!(fk.referenced_columns[0].name, "ID");
}

#[test]
fn test_unsupported_type_is_isolated() {
    let mut declarations = order_domain();
    declarations.push(
        ClassDeclaration::new("Exotic")
            .with_table()
            .with_property(PropertyDeclaration::new("Code", ScalarKind::Int32))
            .with_property(PropertyDeclaration::new("Initial", ValueType::other("Char"))),
    );
    let (_, model) = compile(declarations);

    // Other entities are unaffected.
    assert!(model.entity_by_class_id("Company").unwrap().columns().is_ok());

    let exotic = model.entity_by_class_id("Exotic").unwrap();
    assert_eq!(exotic.data_properties().len(), 2);
    match exotic.columns() {
        Err(Error::UnsupportedStorageType { value_type, .. }) => assert_eq!(value_type, "Char"),
        other => panic!("Expected UnsupportedStorageType, got {other:?}"),
    }
}

#[test]
fn test_configured_type_mappings() {
    let config = StorageConfiguration::from_json_str(
        r#"{
            "providers": { "default_provider": "Main", "storage_groups": { "Legacy": "LegacyDb" } },
            "type_mappings": {
                "overrides": {
                    "String": { "storage_type_name": "varchar (max)", "bounded_type_name": "varchar", "db_type": "AnsiString" }
                },
                "unsupported": ["DateTime"]
            }
        }"#,
    )
    .unwrap();
    let graph = MappingGraph::build(order_domain()).unwrap();
    let model = load_persistence_model(&graph, &config).unwrap();

    let ceo = model.entity_by_class_id("Ceo").unwrap();
    let name = ceo.columns().unwrap()[3].clone();
    assert_eq!(name.storage_type.storage_type_name, "varchar (100)");
    assert_eq!(name.storage_type.db_type, DbType::AnsiString);

    assert!(model.entity_by_class_id("Order").unwrap().columns().is_err());
}

#[test]
fn test_missing_table_name_fails() {
    let graph = MappingGraph::build([ClassDeclaration::new("Orphan")
        .with_property(PropertyDeclaration::new("Name", ScalarKind::String))])
    .unwrap();

    let result = load_persistence_model(&graph, &config());
    assert!(matches!(result, Err(Error::MissingTableName { ref class_id }) if class_id == "Orphan"));
}

#[test]
fn test_nested_table_fails() {
    let mut declarations = order_domain();
    declarations.push(ClassDeclaration::new("KeyAccount").with_base("Customer").with_table());
    let graph = MappingGraph::build(declarations).unwrap();

    let result = load_persistence_model(&graph, &config());
    assert!(matches!(
        result,
        Err(Error::NestedTable { ref class_id, ref table_owner, .. })
            if class_id == "KeyAccount" && table_owner == "Company"
    ));
}

#[test]
fn test_missing_storage_provider_fails() {
    let graph = MappingGraph::build(order_domain()).unwrap();
    let config = StorageConfiguration::default()
        .with_providers(relmap_core::StorageProviderRegistry::without_default());

    assert!(matches!(
        PersistenceModelLoader::new(&graph, &config),
        Err(Error::NoStorageProvider { .. })
    ));
}

#[test]
fn test_config_with_only_storage_groups_keeps_default_provider() {
    let config =
        StorageConfiguration::from_json_str(r#"{ "providers": { "storage_groups": { "Legacy": "LegacyDb" } } }"#)
            .unwrap();
    let graph = MappingGraph::build(order_domain()).unwrap();
    let model = load_persistence_model(&graph, &config).unwrap();

    assert_eq!(model.entity_by_class_id("Order").unwrap().storage_provider_id(), "Default");
    assert_eq!(model.entity_by_class_id("Official").unwrap().storage_provider_id(), "LegacyDb");
}

#[test]
fn test_compilation_is_deterministic() {
    let (_, first) = compile(order_domain());
    let (_, second) = compile(order_domain());

    assert_eq!(first, second);
    assert_eq!(first.to_json_string().unwrap(), second.to_json_string().unwrap());
}

#[test]
fn test_model_bytes_round_trip() {
    let (_, model) = compile(order_domain());

    let bytes = model.to_bytes().unwrap();
    let restored = PersistenceModel::from_bytes(&bytes).unwrap();
    assert_eq!(restored, model);
}

#[test]
fn test_mapping_document_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mapping.json");
    let document = MappingDocument {
        classes: order_domain(),
    };
    std::fs::write(&path, document.to_json_string().unwrap()).unwrap();

    let loaded = MappingDocument::from_path(&path).unwrap();
    let configuration = MappingConfiguration::from_document(loaded, &config()).unwrap();

    assert_eq!(configuration.model().entity_count(), 11);
    assert_eq!(
        configuration.entity("Order").unwrap().table_name(),
        Some(&EntityName::new("Order"))
    );
}
