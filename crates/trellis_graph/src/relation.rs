//! Relationship maintenance: linking, restoring, and verifying edges.
//!
//! Every reference field has a schema-declared partner on its target type.
//! [`Layout::set_ref`] and [`Layout::add_ref`] write both halves of an
//! edge in one call, validating both halves first so a failed call leaves
//! the graph untouched. The `restore_*` operations write one half only;
//! they exist for deserialization, which replays each side's stored order
//! and then checks the whole graph with [`Layout::verify`].

use std::sync::Arc;

use trellis_foundation::{EntityKey, Error, Result};
use trellis_schema::{FieldDef, FieldKind, RelationDef};

use crate::entity::{Entity, Slot};
use crate::layout::{Layout, def_of, field_of, slot_out_of_sync};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Set,
    Add,
}

impl Layout {
    /// Links a `Ref` field to a target entity.
    ///
    /// Write-once: fails with `ReferenceAlreadySet` if the slot is
    /// occupied, even by the same target. The paired slot on the target
    /// updates in the same call; if that slot is a `Ref` and occupied,
    /// the call fails naming the back side and writes nothing.
    pub fn set_ref(&mut self, key: &EntityKey, field: &str, target: &EntityKey) -> Result<()> {
        self.link(key, field, target, Mode::Set)
    }

    /// Appends a target to a `Refs` field, preserving insertion order.
    ///
    /// Fails with `DuplicateReference` if either the forward list or the
    /// paired list already records the edge; a paired `Ref` slot is
    /// write-once as in [`Layout::set_ref`]. A failed call writes
    /// nothing.
    pub fn add_ref(&mut self, key: &EntityKey, field: &str, target: &EntityKey) -> Result<()> {
        self.link(key, field, target, Mode::Add)
    }

    fn link(&mut self, key: &EntityKey, field: &str, target: &EntityKey, mode: Mode) -> Result<()> {
        let schema = Arc::clone(&self.schema);
        let (forward_pos, forward_def) = field_of(&schema, key.ty(), field)?;

        let rel = match (mode, forward_def.kind()) {
            (Mode::Set, FieldKind::Ref(rel)) | (Mode::Add, FieldKind::Refs(rel)) => rel,
            (Mode::Set, other) => {
                return Err(Error::wrong_field_kind(
                    key.ty(),
                    field,
                    "Ref",
                    other.kind_name(),
                ));
            }
            (Mode::Add, other) => {
                return Err(Error::wrong_field_kind(
                    key.ty(),
                    field,
                    "Refs",
                    other.kind_name(),
                ));
            }
        };
        if target.ty() != &*rel.target {
            return Err(Error::wrong_target_type(
                key.clone(),
                field,
                rel.target.to_string(),
                target.ty(),
            ));
        }
        let back_def = def_of(&schema, &rel.target)?;
        let back_pos = back_def
            .field_position(&rel.back_field)
            .ok_or_else(|| missing_back_field(rel))?;

        // A self-paired field linking an entity to itself uses one slot
        // for both halves of the edge; it is checked and written once.
        let same_slot = key == target && field == &*rel.back_field;

        // Phase 1: validate both halves. Nothing is written on failure.
        let source = self.entity(key)?;
        let target_entity = self.entity(target)?;

        match &source.slots[forward_pos] {
            Slot::Ref(Some(existing)) => {
                return Err(Error::reference_already_set(
                    key.clone(),
                    field,
                    &**existing,
                ));
            }
            Slot::Refs(ids) if contains(ids, target.id()) => {
                return Err(Error::duplicate_reference(key.clone(), field, target.id()));
            }
            Slot::Ref(None) | Slot::Refs(_) => {}
            Slot::Scalar(_) => return Err(slot_out_of_sync(key, field)),
        }

        if !same_slot {
            match &target_entity.slots[back_pos] {
                Slot::Ref(Some(existing)) => {
                    return Err(Error::reference_already_set(
                        target.clone(),
                        &*rel.back_field,
                        &**existing,
                    ));
                }
                Slot::Refs(ids) if contains(ids, key.id()) => {
                    return Err(Error::duplicate_reference(
                        target.clone(),
                        &*rel.back_field,
                        key.id(),
                    ));
                }
                Slot::Ref(None) | Slot::Refs(_) => {}
                Slot::Scalar(_) => return Err(slot_out_of_sync(target, &rel.back_field)),
            }
        }

        // Phase 2: commit both halves.
        let target_id = Arc::clone(target.id_arc());
        let source_id = Arc::clone(key.id_arc());
        write_slot(self.entity_mut(key)?, forward_pos, target_id)
            .map_err(|_| slot_out_of_sync(key, field))?;
        if !same_slot {
            write_slot(self.entity_mut(target)?, back_pos, source_id)
                .map_err(|_| slot_out_of_sync(target, &rel.back_field))?;
        }
        Ok(())
    }

    /// Writes one half of a `Ref` edge without touching the paired slot.
    ///
    /// The target entity must already exist. Intended for
    /// deserialization; follow with [`Layout::verify`].
    pub fn restore_ref(&mut self, key: &EntityKey, field: &str, target_id: &str) -> Result<()> {
        let schema = Arc::clone(&self.schema);
        let (position, field_def) = field_of(&schema, key.ty(), field)?;
        let FieldKind::Ref(rel) = field_def.kind() else {
            return Err(Error::wrong_field_kind(
                key.ty(),
                field,
                "Ref",
                field_def.kind().kind_name(),
            ));
        };
        if self.lookup(&rel.target, target_id).is_none() {
            return Err(Error::dangling_reference(
                key.clone(),
                field,
                EntityKey::new(Arc::clone(&rel.target), target_id),
            ));
        }
        let entity = self.entity_mut(key)?;
        match &mut entity.slots[position] {
            Slot::Ref(slot @ None) => {
                *slot = Some(target_id.into());
                Ok(())
            }
            Slot::Ref(Some(existing)) => {
                let existing = existing.to_string();
                Err(Error::reference_already_set(key.clone(), field, existing))
            }
            _ => Err(slot_out_of_sync(key, field)),
        }
    }

    /// Writes one half of each `Refs` edge without touching paired slots,
    /// keeping the given order.
    ///
    /// Duplicate identifiers in the list and identifiers with no existing
    /// entity are rejected before anything is written. Intended for
    /// deserialization; follow with [`Layout::verify`].
    pub fn restore_refs(
        &mut self,
        key: &EntityKey,
        field: &str,
        target_ids: &[String],
    ) -> Result<()> {
        let schema = Arc::clone(&self.schema);
        let (position, field_def) = field_of(&schema, key.ty(), field)?;
        let FieldKind::Refs(rel) = field_def.kind() else {
            return Err(Error::wrong_field_kind(
                key.ty(),
                field,
                "Refs",
                field_def.kind().kind_name(),
            ));
        };

        let mut ids: Vec<Arc<str>> = Vec::with_capacity(target_ids.len());
        for id in target_ids {
            if contains(&ids, id) {
                return Err(Error::duplicate_reference(key.clone(), field, id.as_str()));
            }
            if self.lookup(&rel.target, id).is_none() {
                return Err(Error::dangling_reference(
                    key.clone(),
                    field,
                    EntityKey::new(Arc::clone(&rel.target), id.as_str()),
                ));
            }
            ids.push(id.as_str().into());
        }

        let entity = self.entity_mut(key)?;
        match &mut entity.slots[position] {
            Slot::Refs(list) if list.is_empty() => {
                *list = ids;
                Ok(())
            }
            Slot::Refs(list) => {
                let existing = list[0].to_string();
                Err(Error::reference_already_set(key.clone(), field, existing))
            }
            _ => Err(slot_out_of_sync(key, field)),
        }
    }

    /// Checks every reference edge in the graph: stored identifiers must
    /// resolve, and the paired slot on each target must hold the
    /// reciprocal half.
    ///
    /// Graphs mutated only through [`Layout::set_ref`] and
    /// [`Layout::add_ref`] always pass; this exists for graphs rebuilt
    /// through the `restore_*` operations.
    pub fn verify(&self) -> Result<()> {
        for (ty, table) in &self.tables {
            let def = def_of(&self.schema, ty)?;
            for entity in table.values() {
                for (field_def, slot) in def.fields().iter().zip(&entity.slots) {
                    let Some(rel) = field_def.kind().relation() else {
                        continue;
                    };
                    match slot {
                        Slot::Scalar(_) => {
                            return Err(slot_out_of_sync(entity.key(), field_def.name()));
                        }
                        Slot::Ref(None) => {}
                        Slot::Ref(Some(id)) => self.verify_edge(entity, field_def, rel, id)?,
                        Slot::Refs(ids) => {
                            for id in ids {
                                self.verify_edge(entity, field_def, rel, id)?;
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn verify_edge(
        &self,
        source: &Entity,
        field_def: &FieldDef,
        rel: &RelationDef,
        target_id: &Arc<str>,
    ) -> Result<()> {
        let Some(target) = self.lookup(&rel.target, target_id) else {
            return Err(Error::dangling_reference(
                source.key().clone(),
                field_def.name(),
                EntityKey::new(Arc::clone(&rel.target), Arc::clone(target_id)),
            ));
        };
        let back_def = def_of(&self.schema, &rel.target)?;
        let back_pos = back_def
            .field_position(&rel.back_field)
            .ok_or_else(|| missing_back_field(rel))?;

        let points_back = match &target.slots[back_pos] {
            Slot::Ref(Some(id)) => &**id == source.id(),
            Slot::Refs(ids) => contains(ids, source.id()),
            Slot::Ref(None) | Slot::Scalar(_) => false,
        };
        if points_back {
            Ok(())
        } else {
            Err(Error::inconsistent_reference(
                source.key().clone(),
                field_def.name(),
                target.key().clone(),
                &*rel.back_field,
            ))
        }
    }
}

fn contains(ids: &[Arc<str>], id: &str) -> bool {
    ids.iter().any(|candidate| &**candidate == id)
}

fn write_slot(entity: &mut Entity, position: usize, id: Arc<str>) -> Result<()> {
    match &mut entity.slots[position] {
        Slot::Ref(slot) => {
            *slot = Some(id);
            Ok(())
        }
        Slot::Refs(ids) => {
            ids.push(id);
            Ok(())
        }
        Slot::Scalar(_) => Err(Error::internal("scalar slot in reference write".to_string())),
    }
}

fn missing_back_field(rel: &RelationDef) -> Error {
    Error::internal(format!(
        "back field {}.{} missing from validated schema",
        rel.target, rel.back_field
    ))
}
