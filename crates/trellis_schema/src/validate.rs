//! Schema document validation.
//!
//! Validation makes two passes over the raw document: one for names and
//! per-field shape, one for cross-entity reference checks. Nothing stops
//! at the first problem; the full violation list comes back in one
//! [`SchemaError`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use trellis_foundation::ident;

use crate::desc::{EntityDesc, FieldType, SchemaDoc};
use crate::error::SchemaError;
use crate::schema::{EntityDef, FieldDef, FieldKind, RelationDef, Schema};

pub(crate) fn validate(doc: SchemaDoc) -> Result<Schema, SchemaError> {
    let mut violations = Vec::new();

    check_names(&doc, &mut violations);
    check_references(&doc, &mut violations);

    if violations.is_empty() {
        Ok(build(doc))
    } else {
        Err(SchemaError::new(violations))
    }
}

/// Pass 1: identifier well-formedness, duplicates, and per-field shape.
fn check_names(doc: &SchemaDoc, violations: &mut Vec<String>) {
    let mut seen_types = BTreeSet::new();
    for entity in &doc.entities {
        if !ident::is_valid_name(&entity.name) {
            violations.push(format!(
                "entity type '{}' is not a valid identifier",
                entity.name
            ));
        }
        if !seen_types.insert(entity.name.as_str()) {
            violations.push(format!("duplicate entity type '{}'", entity.name));
        }

        let mut seen_fields = BTreeSet::new();
        for (fname, desc) in &entity.fields {
            if !ident::is_valid_name(fname) {
                violations.push(format!(
                    "{}.{fname}: field name is not a valid identifier",
                    entity.name
                ));
            }
            if fname == "id" {
                violations.push(format!("{}.id: field name 'id' is reserved", entity.name));
            }
            if !seen_fields.insert(fname.as_str()) {
                violations.push(format!("{}.{fname}: duplicate field", entity.name));
            }

            if desc.ty.is_reference() {
                if desc.refentity.is_none() || desc.reffield.is_none() {
                    violations.push(format!(
                        "{}.{fname}: {} field requires refentity and reffield",
                        entity.name, desc.ty
                    ));
                }
            } else if desc.refentity.is_some() || desc.reffield.is_some() {
                violations.push(format!(
                    "{}.{fname}: scalar field must not declare refentity or reffield",
                    entity.name
                ));
            }
        }
    }
}

/// Pass 2: every reference names a declared target, and the pairing is
/// reciprocal (the target field points back at the source field).
fn check_references(doc: &SchemaDoc, violations: &mut Vec<String>) {
    let by_name: BTreeMap<&str, &EntityDesc> = doc
        .entities
        .iter()
        .map(|e| (e.name.as_str(), e))
        .collect();

    for entity in &doc.entities {
        for (fname, desc) in &entity.fields {
            if !desc.ty.is_reference() {
                continue;
            }
            // Shape problems were already reported in pass 1.
            let (Some(refentity), Some(reffield)) = (&desc.refentity, &desc.reffield) else {
                continue;
            };

            let Some(target) = by_name.get(refentity.as_str()) else {
                violations.push(format!(
                    "{}.{fname}: refentity '{refentity}' is not a declared entity type",
                    entity.name
                ));
                continue;
            };
            let Some((_, back)) = target.fields.iter().find(|(n, _)| n == reffield) else {
                violations.push(format!(
                    "{}.{fname}: reffield '{reffield}' is not a field of '{refentity}'",
                    entity.name
                ));
                continue;
            };
            if !back.ty.is_reference() {
                violations.push(format!(
                    "{}.{fname}: reffield '{refentity}.{reffield}' is not a reference field",
                    entity.name
                ));
                continue;
            }
            let points_back = back.refentity.as_deref() == Some(entity.name.as_str())
                && back.reffield.as_deref() == Some(fname.as_str());
            if !points_back {
                violations.push(format!(
                    "{}.{fname}: paired field '{refentity}.{reffield}' points at '{}.{}', not back",
                    entity.name,
                    back.refentity.as_deref().unwrap_or("?"),
                    back.reffield.as_deref().unwrap_or("?"),
                ));
            }
        }
    }
}

/// Builds the sorted, indexed schema from a document that passed both
/// check passes.
fn build(doc: SchemaDoc) -> Schema {
    let mut entities: Vec<EntityDef> = doc
        .entities
        .into_iter()
        .map(|entity| {
            let name: Arc<str> = entity.name.into();
            let mut raw = entity.fields;
            raw.sort_by(|a, b| a.0.cmp(&b.0));
            let fields = raw
                .into_iter()
                .map(|(fname, desc)| {
                    let kind = if let Some(scalar) = desc.ty.as_scalar() {
                        FieldKind::Scalar(scalar)
                    } else {
                        // Post-validation these are always present.
                        let rel = RelationDef {
                            target: desc.refentity.unwrap_or_default().into(),
                            back_field: desc.reffield.unwrap_or_default().into(),
                        };
                        if desc.ty == FieldType::Ref {
                            FieldKind::Ref(rel)
                        } else {
                            FieldKind::Refs(rel)
                        }
                    };
                    FieldDef {
                        name: fname.into(),
                        kind,
                    }
                })
                .collect();
            EntityDef::from_parts(name, fields)
        })
        .collect();
    entities.sort_by(|a, b| a.name.cmp(&b.name));
    Schema::from_parts(entities)
}
