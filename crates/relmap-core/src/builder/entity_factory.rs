//! Entity definitions: tables, filter views and union views.

use super::context::ModelBuildContext;
use super::foreign_key::ForeignKeyConstraintDefinitionFactory;
use super::resolver::{StoragePropertyDefinitionResolver, StoragePropertyStore};
use crate::error::Error;
use crate::mapping::ClassId;
use crate::model::{
    EntityCommon, EntityDefinition, FilterViewDefinition, IndexDefinition, PrimaryKeyConstraintDefinition,
    TableConstraintDefinition, TableDefinition, UnionViewDefinition,
};
use std::collections::HashSet;

/// The entity shape a class maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityShape {
    /// The class declares its own table.
    Table,
    /// The class is stored in the table of an ancestor.
    FilterView {
        /// The nearest ancestor declaring a table.
        table_owner: ClassId,
    },
    /// The class has no table above it but its subclasses do.
    UnionView {
        /// Direct derived classes, in declaration order.
        members: Vec<ClassId>,
    },
}

/// Builds the entity definition of a class.
///
/// Entity creation expects the storage properties of the whole hierarchy to
/// be attached to the store already.
pub struct EntityDefinitionFactory<'a> {
    ctx: &'a ModelBuildContext<'a>,
    resolver: StoragePropertyDefinitionResolver<'a>,
    foreign_keys: ForeignKeyConstraintDefinitionFactory<'a>,
}

impl<'a> EntityDefinitionFactory<'a> {
    /// Create a factory over a build context.
    pub fn new(ctx: &'a ModelBuildContext<'a>) -> Self {
        Self {
            ctx,
            resolver: StoragePropertyDefinitionResolver::new(ctx.graph()),
            foreign_keys: ForeignKeyConstraintDefinitionFactory::new(ctx),
        }
    }

    /// Decide which entity shape a class maps to.
    pub fn classify(&self, class: ClassId) -> Result<EntityShape, Error> {
        let graph = self.ctx.graph();
        let definition = graph.class(class);
        let ancestor_owner = self.ctx.ancestor_table_owner(class);

        if self.ctx.table_name(class).is_some() {
            return match ancestor_owner {
                Some(owner) => Err(Error::NestedTable {
                    class_id: definition.id().to_string(),
                    table_owner: graph.class(owner).id().to_string(),
                    table_name: self
                        .ctx
                        .table_name(owner)
                        .map(|name| name.to_string())
                        .unwrap_or_default(),
                }),
                None => Ok(EntityShape::Table),
            };
        }

        if let Some(table_owner) = ancestor_owner {
            return Ok(EntityShape::FilterView { table_owner });
        }

        if self.ctx.has_descendant_table(class) {
            return Ok(EntityShape::UnionView {
                members: definition.derived_classes().to_vec(),
            });
        }

        Err(Error::MissingTableName {
            class_id: definition.id().to_string(),
        })
    }

    /// Create a table for a class.
    ///
    /// The table is named after the nearest ancestor-or-self declaring a
    /// table. Its constraints are a clustered primary key over the identity
    /// column followed by the foreign keys of every class in the hierarchy.
    pub fn create_table_definition(&self, class: ClassId, store: &StoragePropertyStore) -> Result<EntityDefinition, Error> {
        let table_name = self
            .ctx
            .table_owner(class)
            .and_then(|owner| self.ctx.table_name(owner))
            .ok_or_else(|| Error::MissingTableName {
                class_id: self.ctx.graph().class(class).id().to_string(),
            })?;

        let common = self.create_common(class, store)?;

        let primary_key = PrimaryKeyConstraintDefinition::new(
            self.ctx.names().primary_key_constraint_name(&table_name),
            true,
            vec![self.ctx.infrastructure().id_column().clone()],
        );
        let mut constraints = vec![TableConstraintDefinition::from(primary_key)];

        let mut seen = HashSet::new();
        for member in self.ctx.graph().hierarchy(class) {
            for fk in self.foreign_keys.create_foreign_key_constraints(member, &table_name, store)? {
                if seen.insert(fk.name.clone()) {
                    constraints.push(fk.into());
                }
            }
        }

        Ok(EntityDefinition::Table(TableDefinition {
            common,
            table_name,
            constraints,
        }))
    }

    /// Create a view selecting the rows of `class` and its descendants from
    /// the entity of `base_entity`.
    pub fn create_filter_view_definition(
        &self,
        class: ClassId,
        base_entity: ClassId,
        store: &StoragePropertyStore,
    ) -> Result<EntityDefinition, Error> {
        let graph = self.ctx.graph();
        let class_ids = graph
            .subtree(class)
            .into_iter()
            .map(|c| graph.class(c).id().to_string())
            .collect();

        Ok(EntityDefinition::FilterView(FilterViewDefinition {
            common: self.create_common(class, store)?,
            base_entity,
            class_ids,
        }))
    }

    /// Create a view uniting the entities of `union_members`.
    pub fn create_union_view_definition(
        &self,
        class: ClassId,
        union_members: Vec<ClassId>,
        store: &StoragePropertyStore,
    ) -> Result<EntityDefinition, Error> {
        Ok(EntityDefinition::UnionView(UnionViewDefinition {
            common: self.create_common(class, store)?,
            union_members,
        }))
    }

    fn create_common(&self, class: ClassId, store: &StoragePropertyStore) -> Result<EntityCommon, Error> {
        let definition = self.ctx.graph().class(class);
        let data_properties = self
            .resolver
            .resolve_storage_properties(class, store)?
            .into_iter()
            .map(|resolved| resolved.storage_property)
            .collect();

        Ok(EntityCommon {
            class,
            class_id: definition.id().to_string(),
            storage_provider_id: self.ctx.storage_provider_id(class).to_string(),
            view_name: self.ctx.names().view_name(definition),
            object_id_property: self.ctx.infrastructure().object_id_storage_property(),
            timestamp_property: self.ctx.infrastructure().timestamp_storage_property(),
            data_properties,
            indexes: self.create_indexes(class, store)?,
            synonyms: definition.synonyms().to_vec(),
        })
    }

    fn create_indexes(&self, class: ClassId, store: &StoragePropertyStore) -> Result<Vec<IndexDefinition>, Error> {
        let definition = self.ctx.graph().class(class);
        let mut indexes = Vec::with_capacity(definition.indexes().len());

        for declaration in definition.indexes() {
            let mut columns = Vec::new();
            for property in &declaration.properties {
                let storage_property = self
                    .resolver
                    .find_storage_property(class, property, store)?
                    .ok_or_else(|| Error::UnknownIndexProperty {
                        class_id: definition.id().to_string(),
                        index: declaration.name.clone(),
                        property: property.clone(),
                    })?;
                columns.extend(storage_property.columns()?.into_iter().cloned());
            }

            indexes.push(IndexDefinition {
                name: declaration.name.clone(),
                columns,
                is_unique: declaration.unique,
                is_clustered: declaration.clustered,
            });
        }

        Ok(indexes)
    }
}
