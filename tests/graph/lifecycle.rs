//! Integration tests for entity lifecycle
//!
//! Tests creation, scalar assignment, readers, and iteration order.

use std::sync::Arc;

use trellis_foundation::{EntityKey, ErrorKind, ScalarType, Value};
use trellis_graph::Layout;
use trellis_schema::{EntityDesc, Schema, SchemaDoc};

fn fleet_schema() -> Arc<Schema> {
    Arc::new(
        SchemaDoc::new()
            .with_entity(
                EntityDesc::new("Site")
                    .with_scalar("name", ScalarType::String)
                    .with_refs("hosts", "Host", "site"),
            )
            .with_entity(
                EntityDesc::new("Host")
                    .with_scalar("cores", ScalarType::Int)
                    .with_scalar("load", ScalarType::Float)
                    .with_ref("site", "Site", "hosts"),
            )
            .validate()
            .unwrap(),
    )
}

// =============================================================================
// Creation
// =============================================================================

#[test]
fn create_returns_a_usable_key() {
    let mut layout = Layout::new(fleet_schema());
    let key = layout.create("Host", "web").unwrap();

    assert_eq!(key, EntityKey::new("Host", "web"));
    assert!(layout.lookup("Host", "web").is_some());
    assert_eq!(layout.len(), 1);
}

#[test]
fn identifiers_are_unique_per_type() {
    let mut layout = Layout::new(fleet_schema());
    layout.create("Host", "web").unwrap();

    let err = layout.create("Host", "web").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateId(_)));
    assert_eq!(layout.len(), 1);

    // The same identifier under another type is a different entity.
    layout.create("Site", "web").unwrap();
    assert_eq!(layout.len(), 2);
}

#[test]
fn unknown_types_cannot_be_created() {
    let mut layout = Layout::new(fleet_schema());
    let err = layout.create("Ghost", "g1").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownEntityType(_)));
    assert!(layout.is_empty());
}

// =============================================================================
// Scalars
// =============================================================================

#[test]
fn scalars_start_unset_and_may_be_reassigned() {
    let mut layout = Layout::new(fleet_schema());
    let key = layout.create("Host", "web").unwrap();

    assert_eq!(layout.get(&key, "cores").unwrap(), None);

    layout.set(&key, "cores", 8).unwrap();
    assert_eq!(layout.get(&key, "cores").unwrap(), Some(&Value::Int(8)));

    layout.set(&key, "cores", 16).unwrap();
    assert_eq!(layout.get(&key, "cores").unwrap(), Some(&Value::Int(16)));
}

#[test]
fn scalar_types_are_enforced() {
    let mut layout = Layout::new(fleet_schema());
    let key = layout.create("Host", "web").unwrap();

    let err = layout.set(&key, "cores", "eight").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
    assert_eq!(layout.get(&key, "cores").unwrap(), None);
}

#[test]
fn integers_widen_into_float_fields() {
    let mut layout = Layout::new(fleet_schema());
    let key = layout.create("Host", "web").unwrap();

    layout.set(&key, "load", 2).unwrap();
    assert_eq!(layout.get(&key, "load").unwrap(), Some(&Value::Float(2.0)));
}

#[test]
fn field_and_kind_misuse_is_reported() {
    let mut layout = Layout::new(fleet_schema());
    let key = layout.create("Host", "web").unwrap();

    let err = layout.set(&key, "rack", 1).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownField { .. }));

    let err = layout.set(&key, "site", "fra").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::WrongFieldKind { .. }));

    let err = layout.get(&key, "site").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::WrongFieldKind { .. }));
}

#[test]
fn operations_on_missing_entities_fail() {
    let mut layout = Layout::new(fleet_schema());
    let ghost = EntityKey::new("Host", "ghost");

    let err = layout.set(&ghost, "cores", 1).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::EntityNotFound(_)));
    let err = layout.entity(&ghost).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::EntityNotFound(_)));
}

// =============================================================================
// Iteration
// =============================================================================

#[test]
fn tables_iterate_in_identifier_order() {
    let mut layout = Layout::new(fleet_schema());
    for id in ["zeta", "alpha", "mid"] {
        layout.create("Host", id).unwrap();
    }

    let ids: Vec<_> = layout.table("Host").unwrap().map(|e| e.id()).collect();
    assert_eq!(ids, ["alpha", "mid", "zeta"]);
}

#[test]
fn entities_iterate_type_then_identifier() {
    let mut layout = Layout::new(fleet_schema());
    layout.create("Site", "b").unwrap();
    layout.create("Host", "z").unwrap();
    layout.create("Site", "a").unwrap();

    let keys: Vec<_> = layout.entities().map(|e| e.key().to_string()).collect();
    assert_eq!(keys, ["Host:z", "Site:a", "Site:b"]);
}

#[test]
fn counts_track_each_table() {
    let mut layout = Layout::new(fleet_schema());
    layout.create("Host", "a").unwrap();
    layout.create("Host", "b").unwrap();
    layout.create("Site", "s").unwrap();

    assert_eq!(layout.count("Host").unwrap(), 2);
    assert_eq!(layout.count("Site").unwrap(), 1);
    assert_eq!(layout.len(), 3);
    assert!(layout.count("Ghost").is_err());
}

#[test]
fn types_lists_the_schema_tables() {
    let layout = Layout::new(fleet_schema());
    let types: Vec<_> = layout.types().collect();
    assert_eq!(types, ["Host", "Site"]);
}
