//! Entities and their field slots.

use std::sync::Arc;

use trellis_foundation::{EntityKey, Value};
use trellis_schema::{EntityDef, FieldKind};

/// One entity: its key and one storage slot per schema field.
///
/// Slots are positional, aligned with the entity type's sorted field list;
/// [`EntityDef::field_position`] maps a field name to its slot. Entities
/// are only mutated through [`Layout`](crate::Layout) operations, which
/// keep the paired slots of a relationship in step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    pub(crate) key: EntityKey,
    pub(crate) slots: Vec<Slot>,
}

impl Entity {
    pub(crate) fn new(key: EntityKey, def: &EntityDef) -> Self {
        let slots = def
            .fields()
            .iter()
            .map(|field| match field.kind() {
                FieldKind::Scalar(_) => Slot::Scalar(None),
                FieldKind::Ref(_) => Slot::Ref(None),
                FieldKind::Refs(_) => Slot::Refs(Vec::new()),
            })
            .collect();
        Self { key, slots }
    }

    /// The entity's key.
    #[must_use]
    pub fn key(&self) -> &EntityKey {
        &self.key
    }

    /// The entity type name.
    #[must_use]
    pub fn ty(&self) -> &str {
        self.key.ty()
    }

    /// The entity identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.key.id()
    }

    /// The slot at a field position.
    #[must_use]
    pub fn slot(&self, position: usize) -> Option<&Slot> {
        self.slots.get(position)
    }

    /// All slots, in field position order.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }
}

/// Storage for one field of one entity.
///
/// A fresh entity has every scalar and `Ref` slot unset and every `Refs`
/// slot empty; unset is distinguishable from every real value. Reference
/// slots store target identifiers only, the target type being fixed by
/// the schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Scalar value, `None` until assigned.
    Scalar(Option<Value>),
    /// Singular reference, `None` until linked.
    Ref(Option<Arc<str>>),
    /// Ordered reference list, kept duplicate-free.
    Refs(Vec<Arc<str>>),
}

impl Slot {
    /// The scalar value, if this is an assigned scalar slot.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(Some(value)) => Some(value),
            _ => None,
        }
    }

    /// The target identifier, if this is a linked `Ref` slot.
    #[must_use]
    pub fn as_ref_id(&self) -> Option<&str> {
        match self {
            Self::Ref(Some(id)) => Some(id),
            _ => None,
        }
    }

    /// The target identifiers, if this is a `Refs` slot.
    #[must_use]
    pub fn as_ref_ids(&self) -> Option<&[Arc<str>]> {
        match self {
            Self::Refs(ids) => Some(ids),
            _ => None,
        }
    }

    /// True if the slot holds no value, link, or list entries.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        match self {
            Self::Scalar(v) => v.is_none(),
            Self::Ref(id) => id.is_none(),
            Self::Refs(ids) => ids.is_empty(),
        }
    }
}
