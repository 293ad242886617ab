//! The layout: root container owning every entity table.

use std::collections::BTreeMap;
use std::sync::Arc;

use trellis_foundation::{EntityKey, Error, Result, ScalarType, Value};
use trellis_schema::{EntityDef, FieldDef, FieldKind, Schema};

use crate::entity::{Entity, Slot};

/// Root container for an entity graph: one identifier-keyed table per
/// schema entity type.
///
/// The layout owns every entity. Callers hold [`EntityKey`] handles and
/// short-lived `&Entity` borrows; all mutation goes through the layout so
/// the two halves of every relationship stay in step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub(crate) schema: Arc<Schema>,
    pub(crate) tables: BTreeMap<Arc<str>, BTreeMap<Arc<str>, Entity>>,
}

impl Layout {
    /// Creates an empty layout with one table per schema entity type.
    #[must_use]
    pub fn new(schema: Arc<Schema>) -> Self {
        let tables = schema
            .entities()
            .map(|def| (Arc::clone(def.name_arc()), BTreeMap::new()))
            .collect();
        Self { schema, tables }
    }

    /// The schema this layout was built against.
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Creates a fresh entity with all fields unset.
    ///
    /// The identifier must be unused within the type's table; the same
    /// identifier under a different type is fine.
    pub fn create(&mut self, ty: &str, id: &str) -> Result<EntityKey> {
        let schema = Arc::clone(&self.schema);
        let def = schema
            .entity(ty)
            .ok_or_else(|| Error::unknown_entity_type(ty))?;
        let key = EntityKey::new(Arc::clone(def.name_arc()), id);

        let table = self.tables.entry(Arc::clone(def.name_arc())).or_default();
        if table.contains_key(id) {
            return Err(Error::duplicate_id(key));
        }
        table.insert(Arc::clone(key.id_arc()), Entity::new(key.clone(), def));
        Ok(key)
    }

    /// Assigns a scalar field, checked against the field's declared type.
    ///
    /// Scalars may be reassigned freely; only references are write-once.
    /// Integer values widen into float fields.
    pub fn set(&mut self, key: &EntityKey, field: &str, value: impl Into<Value>) -> Result<()> {
        let schema = Arc::clone(&self.schema);
        let (position, field_def) = field_of(&schema, key.ty(), field)?;
        let FieldKind::Scalar(expected) = field_def.kind() else {
            return Err(Error::wrong_field_kind(
                key.ty(),
                field,
                "scalar",
                field_def.kind().kind_name(),
            ));
        };

        let value = value.into();
        if !expected.accepts(value.scalar_type()) {
            return Err(Error::type_mismatch(
                key.ty(),
                field,
                *expected,
                value.scalar_type().to_string(),
            ));
        }
        let value = if *expected == ScalarType::Float {
            value.widened()
        } else {
            value
        };

        let entity = self.entity_mut(key)?;
        entity.slots[position] = Slot::Scalar(Some(value));
        Ok(())
    }

    /// Reads a scalar field; `None` until assigned.
    pub fn get(&self, key: &EntityKey, field: &str) -> Result<Option<&Value>> {
        let (position, field_def) = field_of(&self.schema, key.ty(), field)?;
        if !matches!(field_def.kind(), FieldKind::Scalar(_)) {
            return Err(Error::wrong_field_kind(
                key.ty(),
                field,
                "scalar",
                field_def.kind().kind_name(),
            ));
        }
        let entity = self.entity(key)?;
        match &entity.slots[position] {
            Slot::Scalar(value) => Ok(value.as_ref()),
            _ => Err(slot_out_of_sync(key, field)),
        }
    }

    /// Resolves a `Ref` field to its target entity; `None` until linked.
    pub fn target(&self, key: &EntityKey, field: &str) -> Result<Option<&Entity>> {
        let (position, field_def) = field_of(&self.schema, key.ty(), field)?;
        let FieldKind::Ref(rel) = field_def.kind() else {
            return Err(Error::wrong_field_kind(
                key.ty(),
                field,
                "Ref",
                field_def.kind().kind_name(),
            ));
        };
        let entity = self.entity(key)?;
        match &entity.slots[position] {
            Slot::Ref(None) => Ok(None),
            Slot::Ref(Some(id)) => match self.lookup(&rel.target, id) {
                Some(target) => Ok(Some(target)),
                None => Err(Error::dangling_reference(
                    key.clone(),
                    field,
                    EntityKey::new(Arc::clone(&rel.target), Arc::clone(id)),
                )),
            },
            _ => Err(slot_out_of_sync(key, field)),
        }
    }

    /// Resolves a `Refs` field to its target entities, in stored order.
    pub fn targets(&self, key: &EntityKey, field: &str) -> Result<Vec<&Entity>> {
        let (position, field_def) = field_of(&self.schema, key.ty(), field)?;
        let FieldKind::Refs(rel) = field_def.kind() else {
            return Err(Error::wrong_field_kind(
                key.ty(),
                field,
                "Refs",
                field_def.kind().kind_name(),
            ));
        };
        let entity = self.entity(key)?;
        let Slot::Refs(ids) = &entity.slots[position] else {
            return Err(slot_out_of_sync(key, field));
        };
        ids.iter()
            .map(|id| {
                self.lookup(&rel.target, id).ok_or_else(|| {
                    Error::dangling_reference(
                        key.clone(),
                        field,
                        EntityKey::new(Arc::clone(&rel.target), Arc::clone(id)),
                    )
                })
            })
            .collect()
    }

    /// Looks up an entity by type and identifier.
    #[must_use]
    pub fn lookup(&self, ty: &str, id: &str) -> Option<&Entity> {
        self.tables.get(ty)?.get(id)
    }

    /// Resolves a key to its entity.
    pub fn entity(&self, key: &EntityKey) -> Result<&Entity> {
        if !self.tables.contains_key(key.ty()) {
            return Err(Error::unknown_entity_type(key.ty()));
        }
        self.lookup(key.ty(), key.id())
            .ok_or_else(|| Error::entity_not_found(key.clone()))
    }

    pub(crate) fn entity_mut(&mut self, key: &EntityKey) -> Result<&mut Entity> {
        self.tables
            .get_mut(key.ty())
            .ok_or_else(|| Error::unknown_entity_type(key.ty()))?
            .get_mut(key.id())
            .ok_or_else(|| Error::entity_not_found(key.clone()))
    }

    /// Iterates a type's table in identifier order.
    pub fn table(&self, ty: &str) -> Result<impl Iterator<Item = &Entity>> {
        let table = self
            .tables
            .get(ty)
            .ok_or_else(|| Error::unknown_entity_type(ty))?;
        Ok(table.values())
    }

    /// Entity type names in sorted order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(AsRef::as_ref)
    }

    /// Every entity, ordered by type then identifier.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.tables.values().flat_map(BTreeMap::values)
    }

    /// Number of entities in one type's table.
    pub fn count(&self, ty: &str) -> Result<usize> {
        Ok(self
            .tables
            .get(ty)
            .ok_or_else(|| Error::unknown_entity_type(ty))?
            .len())
    }

    /// Total number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.values().map(BTreeMap::len).sum()
    }

    /// True if no entities have been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolves a field name to its slot position and definition.
pub(crate) fn field_of<'a>(
    schema: &'a Schema,
    ty: &str,
    field: &str,
) -> Result<(usize, &'a FieldDef)> {
    let def = schema
        .entity(ty)
        .ok_or_else(|| Error::unknown_entity_type(ty))?;
    let position = def
        .field_position(field)
        .ok_or_else(|| Error::unknown_field(ty, field))?;
    Ok((position, &def.fields()[position]))
}

/// Resolves an entity type's definition.
pub(crate) fn def_of<'a>(schema: &'a Schema, ty: &str) -> Result<&'a EntityDef> {
    schema
        .entity(ty)
        .ok_or_else(|| Error::unknown_entity_type(ty))
}

pub(crate) fn slot_out_of_sync(key: &EntityKey, field: &str) -> Error {
    Error::internal(format!("slot kind out of sync for {key}.{field}"))
}
