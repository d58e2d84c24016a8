//! The class/property arena and hierarchy traversal.

use super::class::{ClassDefinition, ClassId};
use super::declaration::ClassDeclaration;
use super::property::{MemberKey, PropertyDefinition, PropertyId};
use super::value_type::ValueType;
use crate::error::Error;
use std::collections::HashMap;

/// An immutable forest of class definitions and their properties.
///
/// Classes and properties live in flat arenas addressed by [`ClassId`] and
/// [`PropertyId`]. Derived-class lists preserve declaration order, which fixes
/// the column order of every compiled entity.
#[derive(Debug, Clone, Default)]
pub struct MappingGraph {
    classes: Vec<ClassDefinition>,
    properties: Vec<PropertyDefinition>,
    by_id: HashMap<String, ClassId>,
}

impl MappingGraph {
    /// Build and validate a graph from class declarations.
    ///
    /// Fails on duplicate class ids, unknown base classes, unknown relation
    /// targets and inheritance cycles.
    pub fn build(declarations: impl IntoIterator<Item = ClassDeclaration>) -> Result<Self, Error> {
        let declarations: Vec<ClassDeclaration> = declarations.into_iter().collect();

        let mut by_id = HashMap::with_capacity(declarations.len());
        for (index, declaration) in declarations.iter().enumerate() {
            let handle = ClassId(index as u32);
            if by_id.insert(declaration.id.clone(), handle).is_some() {
                return Err(Error::DuplicateClass(declaration.id.clone()));
            }
        }

        let mut classes = Vec::with_capacity(declarations.len());
        let mut properties = Vec::new();

        for (index, declaration) in declarations.into_iter().enumerate() {
            let handle = ClassId(index as u32);

            let base_class = match &declaration.base_class {
                Some(base) => Some(*by_id.get(base).ok_or_else(|| Error::UnknownBaseClass {
                    class_id: declaration.id.clone(),
                    base_class: base.clone(),
                })?),
                None => None,
            };

            let mut own_properties = Vec::with_capacity(declaration.properties.len());
            for property in declaration.properties {
                if let Some(end_point) = &property.relation {
                    if !by_id.contains_key(&end_point.target) {
                        return Err(Error::UnknownRelationTarget {
                            class_id: declaration.id.clone(),
                            property: property.name.clone(),
                            target: end_point.target.clone(),
                        });
                    }
                }

                let property_handle = PropertyId(properties.len() as u32);
                let is_nullable = property.is_nullable();
                let value_type = match (&property.relation, property.value_type) {
                    (Some(_), _) => ValueType::ObjectId,
                    (None, Some(value_type)) => value_type,
                    (None, None) => {
                        return Err(Error::MissingValueType {
                            class_id: declaration.id.clone(),
                            property: property.name.clone(),
                        })
                    }
                };
                let member = MemberKey {
                    declaring_type: property
                        .declaring_type
                        .unwrap_or_else(|| declaration.id.clone()),
                    name: property.name.clone(),
                };

                properties.push(PropertyDefinition {
                    handle: property_handle,
                    class: handle,
                    name: property.name,
                    member,
                    value_type,
                    is_nullable,
                    max_length: property.max_length,
                    storage_class: property.storage_class,
                    column_name: property.column_name,
                    relation: property.relation,
                });
                own_properties.push(property_handle);
            }

            classes.push(ClassDefinition {
                handle,
                id: declaration.id,
                base_class,
                derived_classes: Vec::new(),
                properties: own_properties,
                storage_group: declaration.storage_group,
                is_abstract: declaration.is_abstract,
                table: declaration.table,
                indexes: declaration.indexes,
                synonyms: declaration.synonyms,
            });
        }

        for index in 0..classes.len() {
            if let Some(base) = classes[index].base_class {
                classes[base.index()].derived_classes.push(ClassId(index as u32));
            }
        }

        let graph = Self {
            classes,
            properties,
            by_id,
        };
        graph.check_acyclic()?;
        Ok(graph)
    }

    fn check_acyclic(&self) -> Result<(), Error> {
        let limit = self.classes.len();
        for class in &self.classes {
            let mut current = class.base_class;
            let mut steps = 0;
            while let Some(base) = current {
                steps += 1;
                if steps > limit || base == class.handle {
                    return Err(Error::InheritanceCycle(class.id.clone()));
                }
                current = self.class(base).base_class;
            }
        }
        Ok(())
    }

    /// Number of classes in the graph.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Number of properties in the graph.
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Get a class by handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not belong to this graph.
    pub fn class(&self, handle: ClassId) -> &ClassDefinition {
        &self.classes[handle.index()]
    }

    /// Get a property by handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not belong to this graph.
    pub fn property(&self, handle: PropertyId) -> &PropertyDefinition {
        &self.properties[handle.index()]
    }

    /// Look up a class handle by class id.
    pub fn find_class(&self, id: &str) -> Option<ClassId> {
        self.by_id.get(id).copied()
    }

    /// Look up a class by class id, failing if it is unknown.
    pub fn class_by_id(&self, id: &str) -> Result<&ClassDefinition, Error> {
        self.find_class(id)
            .map(|handle| self.class(handle))
            .ok_or_else(|| Error::UnknownClass(id.to_string()))
    }

    /// Look up a property of a class (own properties only) by name.
    pub fn find_property(&self, class: ClassId, name: &str) -> Option<&PropertyDefinition> {
        self.class(class)
            .properties
            .iter()
            .map(|p| self.property(*p))
            .find(|p| p.name == name)
    }

    /// All classes in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDefinition> {
        self.classes.iter()
    }

    /// All properties in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.properties.iter()
    }

    /// Own properties of a class.
    pub fn properties_of(&self, class: ClassId) -> impl Iterator<Item = &PropertyDefinition> {
        self.class(class).properties.iter().map(|p| self.property(*p))
    }

    /// Classes without a base class, in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.classes
            .iter()
            .filter(|c| c.base_class.is_none())
            .map(|c| c.handle)
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(&self, class: ClassId) -> Vec<ClassId> {
        let mut ancestors = Vec::new();
        let mut current = self.class(class).base_class;
        while let Some(base) = current {
            ancestors.push(base);
            current = self.class(base).base_class;
        }
        ancestors
    }

    /// The root of the tree containing this class (the class itself if it is a root).
    pub fn topmost_ancestor(&self, class: ClassId) -> ClassId {
        self.ancestors(class).last().copied().unwrap_or(class)
    }

    /// Strict descendants in pre-order, following declaration order.
    pub fn descendants(&self, class: ClassId) -> Vec<ClassId> {
        let mut descendants = Vec::new();
        self.collect_descendants(class, &mut descendants);
        descendants
    }

    fn collect_descendants(&self, class: ClassId, out: &mut Vec<ClassId>) {
        for derived in &self.class(class).derived_classes {
            out.push(*derived);
            self.collect_descendants(*derived, out);
        }
    }

    /// The class followed by all its descendants.
    pub fn subtree(&self, class: ClassId) -> Vec<ClassId> {
        let mut subtree = vec![class];
        self.collect_descendants(class, &mut subtree);
        subtree
    }

    /// Ancestors from the topmost down, then the class, then its descendants.
    ///
    /// This is the set of classes whose properties share one entity.
    pub fn hierarchy(&self, class: ClassId) -> Vec<ClassId> {
        let mut hierarchy = self.ancestors(class);
        hierarchy.reverse();
        hierarchy.extend(self.subtree(class));
        hierarchy
    }
}
