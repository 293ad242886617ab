//! Validated schema types.

use std::collections::BTreeMap;
use std::sync::Arc;

use trellis_foundation::ScalarType;

use crate::desc::SchemaDoc;
use crate::error::SchemaError;

/// A validated schema: entity types sorted by name, each with its fields
/// sorted by name and indexed for lookup.
///
/// A `Schema` can only be obtained by validating a [`SchemaDoc`], so code
/// holding one may rely on every reference field having a reciprocal
/// partner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    entities: Vec<EntityDef>,
    index: BTreeMap<Arc<str>, usize>,
}

impl Schema {
    pub(crate) fn from_parts(entities: Vec<EntityDef>) -> Self {
        let index = entities
            .iter()
            .enumerate()
            .map(|(i, e)| (Arc::clone(&e.name), i))
            .collect();
        Self { entities, index }
    }

    /// Parses and validates a schema from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, SchemaError> {
        SchemaDoc::from_toml_str(text)?.validate()
    }

    /// Looks up an entity type by name.
    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&EntityDef> {
        self.index.get(name).map(|&i| &self.entities[i])
    }

    /// Entity types in name order.
    pub fn entities(&self) -> impl Iterator<Item = &EntityDef> {
        self.entities.iter()
    }

    /// Number of entity types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True if the schema declares no entity types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// One validated entity type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityDef {
    pub(crate) name: Arc<str>,
    pub(crate) fields: Vec<FieldDef>,
    pub(crate) index: BTreeMap<Arc<str>, usize>,
}

impl EntityDef {
    pub(crate) fn from_parts(name: Arc<str>, fields: Vec<FieldDef>) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (Arc::clone(&f.name), i))
            .collect();
        Self {
            name,
            fields,
            index,
        }
    }

    /// The entity type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shared name allocation.
    #[must_use]
    pub fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// The position of a field in the sorted field list.
    ///
    /// Entity slots are stored positionally in this order.
    #[must_use]
    pub fn field_position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Fields in name order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }
}

/// One validated field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub(crate) name: Arc<str>,
    pub(crate) kind: FieldKind,
}

impl FieldDef {
    /// The field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shared name allocation.
    #[must_use]
    pub fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// What the field holds.
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }
}

/// What a field holds: a scalar, one reference, or an ordered reference
/// list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Typed scalar value.
    Scalar(ScalarType),
    /// Singular reference.
    Ref(RelationDef),
    /// Ordered, duplicate-free reference list.
    Refs(RelationDef),
}

impl FieldKind {
    /// Short label used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Ref(_) => "Ref",
            Self::Refs(_) => "Refs",
        }
    }

    /// The relation, if this is a reference field.
    #[must_use]
    pub const fn relation(&self) -> Option<&RelationDef> {
        match self {
            Self::Scalar(_) => None,
            Self::Ref(rel) | Self::Refs(rel) => Some(rel),
        }
    }
}

/// Target half of a reference field: the entity type it points at and the
/// paired field on that type that points back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationDef {
    /// Target entity type.
    pub target: Arc<str>,
    /// Field on the target holding the other half of the edge.
    pub back_field: Arc<str>,
}
