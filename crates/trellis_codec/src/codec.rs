//! Conversion between a live [`Layout`] and its [`FlatDocument`] form.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use trellis_foundation::{EntityKey, Error, Result, ScalarType, Value};
use trellis_graph::{Layout, Slot};
use trellis_schema::{FieldKind, Schema};

use crate::flat::FlatDocument;

/// Flattens a layout into a document.
///
/// Every entity appears as a `[Type.id]` table, including entities with
/// nothing set. Both halves of each reference edge are recorded: a
/// `Ref` slot as its target identifier, a `Refs` slot as its identifier
/// list in stored order. Unset scalars, unset `Ref` slots, and empty
/// `Refs` lists are omitted.
#[must_use]
pub fn flatten(layout: &Layout) -> FlatDocument {
    let schema = Arc::clone(layout.schema());
    let mut doc = FlatDocument::new();
    for def in schema.entities() {
        let Ok(table) = layout.table(def.name()) else {
            continue;
        };
        for entity in table {
            let entry = doc.entry(def.name(), entity.id());
            for (field_def, slot) in def.fields().iter().zip(entity.slots()) {
                let value = match slot {
                    Slot::Scalar(None) | Slot::Ref(None) => continue,
                    Slot::Refs(ids) if ids.is_empty() => continue,
                    Slot::Scalar(Some(value)) => scalar_to_toml(value),
                    Slot::Ref(Some(id)) => toml::Value::String(id.to_string()),
                    Slot::Refs(ids) => toml::Value::Array(
                        ids.iter()
                            .map(|id| toml::Value::String(id.to_string()))
                            .collect(),
                    ),
                };
                entry.insert(field_def.name().to_string(), value);
            }
        }
    }
    doc
}

/// Rebuilds a layout from a document.
///
/// Runs in three passes. The first creates every entity and sets its
/// scalars, rejecting types and fields the schema does not declare and
/// values that do not fit. The second restores each half of every
/// reference edge exactly as stored, so per-entity list order survives;
/// identifiers that resolve to no entity fail here. The third checks
/// the whole graph, so a document carrying only one half of an edge is
/// rejected rather than silently repaired.
pub fn unflatten(schema: Arc<Schema>, doc: &FlatDocument) -> Result<Layout> {
    let mut layout = Layout::new(Arc::clone(&schema));

    for (ty, entities) in doc.iter() {
        let def = schema
            .entity(ty)
            .ok_or_else(|| Error::unknown_entity_type(ty))?;
        for (id, fields) in entities {
            let key = layout.create(ty, id)?;
            for (field, value) in fields {
                let field_def = def
                    .field(field)
                    .ok_or_else(|| Error::unknown_field(ty, field.as_str()))?;
                if let FieldKind::Scalar(expected) = field_def.kind() {
                    let value = scalar_from_toml(ty, field, *expected, value)?;
                    layout.set(&key, field, value)?;
                }
            }
        }
    }

    for (ty, entities) in doc.iter() {
        let def = schema
            .entity(ty)
            .ok_or_else(|| Error::unknown_entity_type(ty))?;
        for (id, fields) in entities {
            let key = EntityKey::new(ty, id.as_str());
            for (field, value) in fields {
                let field_def = def
                    .field(field)
                    .ok_or_else(|| Error::unknown_field(ty, field.as_str()))?;
                match field_def.kind() {
                    FieldKind::Scalar(_) => {}
                    FieldKind::Ref(_) => {
                        let target = value
                            .as_str()
                            .ok_or_else(|| bad_ref_value(ty, id, field, value))?;
                        layout.restore_ref(&key, field, target)?;
                    }
                    FieldKind::Refs(_) => {
                        let targets = ref_list(ty, id, field, value)?;
                        layout.restore_refs(&key, field, &targets)?;
                    }
                }
            }
        }
    }

    layout.verify()?;
    Ok(layout)
}

/// Renders the layout and writes it to `path`.
pub fn save_to_file(layout: &Layout, path: impl AsRef<Path>) -> Result<()> {
    let text = flatten(layout).to_toml_string()?;
    fs::write(path, text).map_err(|err| Error::io(err.to_string()))
}

/// Reads a document from `path` and rebuilds the layout against
/// `schema`.
pub fn load_from_file(schema: Arc<Schema>, path: impl AsRef<Path>) -> Result<Layout> {
    let text = fs::read_to_string(path).map_err(|err| Error::io(err.to_string()))?;
    let doc = FlatDocument::from_toml_str(&text)?;
    unflatten(schema, &doc)
}

fn scalar_to_toml(value: &Value) -> toml::Value {
    match value {
        Value::Bool(flag) => toml::Value::Boolean(*flag),
        Value::Int(number) => toml::Value::Integer(*number),
        Value::Float(number) => toml::Value::Float(*number),
        Value::String(text) => toml::Value::String(text.to_string()),
    }
}

fn scalar_from_toml(
    ty: &str,
    field: &str,
    expected: ScalarType,
    value: &toml::Value,
) -> Result<Value> {
    match value {
        toml::Value::Boolean(flag) => Ok(Value::Bool(*flag)),
        toml::Value::Integer(number) => Ok(Value::Int(*number)),
        toml::Value::Float(number) => Ok(Value::Float(*number)),
        toml::Value::String(text) => Ok(Value::from(text.as_str())),
        other => Err(Error::type_mismatch(ty, field, expected, other.type_str())),
    }
}

fn bad_ref_value(ty: &str, id: &str, field: &str, value: &toml::Value) -> Error {
    Error::serialization(format!(
        "{ty}.{id}: field '{field}' must be a reference identifier string, got {}",
        value.type_str()
    ))
}

fn ref_list(ty: &str, id: &str, field: &str, value: &toml::Value) -> Result<Vec<String>> {
    let items = value.as_array().ok_or_else(|| {
        Error::serialization(format!(
            "{ty}.{id}: field '{field}' must be an array of reference identifiers, got {}",
            value.type_str()
        ))
    })?;
    items
        .iter()
        .map(|item| {
            item.as_str().map(String::from).ok_or_else(|| {
                Error::serialization(format!(
                    "{ty}.{id}: field '{field}' holds a non-string element, got {}",
                    item.type_str()
                ))
            })
        })
        .collect()
}
