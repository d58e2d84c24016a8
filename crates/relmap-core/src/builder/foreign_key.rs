//! Foreign key constraints for relation properties.

use super::context::ModelBuildContext;
use super::resolver::StoragePropertyStore;
use crate::error::Error;
use crate::mapping::ClassId;
use crate::model::{EntityName, ForeignKeyConstraintDefinition};
use std::slice;

/// Creates the foreign keys a class contributes to a table.
pub struct ForeignKeyConstraintDefinitionFactory<'a> {
    ctx: &'a ModelBuildContext<'a>,
}

impl<'a> ForeignKeyConstraintDefinitionFactory<'a> {
    /// Create a factory over a build context.
    pub fn new(ctx: &'a ModelBuildContext<'a>) -> Self {
        Self { ctx }
    }

    /// Foreign keys for the real relation properties declared by `class`.
    ///
    /// A relation gets a foreign key only when its target lives on the same
    /// storage provider and is stored in a table. The storage property of such
    /// a relation must be identity shaped; anything else is an error.
    pub fn create_foreign_key_constraints(
        &self,
        class: ClassId,
        referencing_table: &EntityName,
        store: &StoragePropertyStore,
    ) -> Result<Vec<ForeignKeyConstraintDefinition>, Error> {
        let graph = self.ctx.graph();
        let names = self.ctx.names();
        let mut foreign_keys = Vec::new();

        for property in graph.properties_of(class) {
            let Some(end_point) = property.relation() else {
                continue;
            };
            if !end_point.is_real() || !property.is_persistent() {
                continue;
            }
            let target = graph
                .find_class(&end_point.target)
                .ok_or_else(|| Error::UnknownClass(end_point.target.clone()))?;
            if !self.ctx.same_storage_provider(class, target) {
                continue;
            }
            let Some(referenced_table) = self
                .ctx
                .table_owner(target)
                .and_then(|owner| self.ctx.table_name(owner))
            else {
                continue;
            };

            let storage_property = store.get(graph, property)?;
            let value_column = storage_property
                .value_column()
                .ok_or_else(|| Error::NonIdentityForeignKeyColumn {
                    class_id: graph.class(class).id().to_string(),
                    property: property.name().to_string(),
                })?
                .clone();
            let referenced_column = self.ctx.infrastructure().id_column().clone();

            let name = names.foreign_key_constraint_name(referencing_table, slice::from_ref(&value_column));
            foreign_keys.push(ForeignKeyConstraintDefinition::new(
                name,
                referenced_table,
                vec![value_column],
                vec![referenced_column],
            ));
        }

        Ok(foreign_keys)
    }
}
