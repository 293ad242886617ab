//! Round-trip tests between layouts and flat documents.

use std::sync::Arc;

use tempfile::TempDir;
use trellis_codec::{flatten, load_from_file, save_to_file, unflatten};
use trellis_foundation::{EntityKey, ScalarType, Value};
use trellis_graph::Layout;
use trellis_schema::{EntityDesc, Schema, SchemaDoc};

fn inventory_schema() -> Arc<Schema> {
    Arc::new(
        SchemaDoc::new()
            .with_entity(
                EntityDesc::new("Site")
                    .with_scalar("region", ScalarType::String)
                    .with_scalar("active", ScalarType::Bool)
                    .with_refs("hosts", "Host", "site"),
            )
            .with_entity(
                EntityDesc::new("Host")
                    .with_scalar("cores", ScalarType::Int)
                    .with_scalar("load", ScalarType::Float)
                    .with_ref("site", "Site", "hosts")
                    .with_refs("services", "Service", "host"),
            )
            .with_entity(
                EntityDesc::new("Service")
                    .with_scalar("port", ScalarType::Int)
                    .with_ref("host", "Host", "services"),
            )
            .validate()
            .unwrap(),
    )
}

fn inventory() -> Layout {
    let mut layout = Layout::new(inventory_schema());
    let fra = layout.create("Site", "fra").unwrap();
    let ams = layout.create("Site", "ams").unwrap();
    let web = layout.create("Host", "web").unwrap();
    let db = layout.create("Host", "db").unwrap();
    let nginx = layout.create("Service", "nginx").unwrap();
    let postgres = layout.create("Service", "postgres").unwrap();

    layout.set(&fra, "region", "eu-central").unwrap();
    layout.set(&fra, "active", true).unwrap();
    layout.set(&ams, "region", "eu-west").unwrap();
    layout.set(&web, "cores", 8_i64).unwrap();
    layout.set(&web, "load", 0.25).unwrap();
    layout.set(&db, "cores", 16_i64).unwrap();
    layout.set(&nginx, "port", 443_i64).unwrap();
    layout.set(&postgres, "port", 5432_i64).unwrap();

    layout.set_ref(&web, "site", &fra).unwrap();
    layout.set_ref(&db, "site", &fra).unwrap();
    layout.add_ref(&web, "services", &nginx).unwrap();
    layout.add_ref(&web, "services", &postgres).unwrap();
    layout
}

// =============================================================================
// Round Trips
// =============================================================================

#[test]
fn a_full_inventory_survives_the_round_trip() {
    let layout = inventory();
    let doc = flatten(&layout);
    let rebuilt = unflatten(inventory_schema(), &doc).unwrap();

    assert_eq!(flatten(&rebuilt), doc);
    assert!(rebuilt.verify().is_ok());

    let web = EntityKey::new("Host", "web");
    assert_eq!(
        rebuilt.get(&web, "cores").unwrap(),
        Some(&Value::Int(8))
    );
    assert_eq!(
        rebuilt.target(&web, "site").unwrap().unwrap().id(),
        "fra"
    );
    let services: Vec<_> = rebuilt
        .targets(&web, "services")
        .unwrap()
        .iter()
        .map(|e| e.id().to_string())
        .collect();
    assert_eq!(services, ["nginx", "postgres"]);
}

#[test]
fn rendering_does_not_depend_on_construction_order() {
    // Same graph, links and scalars applied in a different order.
    let mut other = Layout::new(inventory_schema());
    let postgres = other.create("Service", "postgres").unwrap();
    let nginx = other.create("Service", "nginx").unwrap();
    let db = other.create("Host", "db").unwrap();
    let web = other.create("Host", "web").unwrap();
    let ams = other.create("Site", "ams").unwrap();
    let fra = other.create("Site", "fra").unwrap();

    other.set(&postgres, "port", 5432_i64).unwrap();
    other.set(&nginx, "port", 443_i64).unwrap();
    other.set(&db, "cores", 16_i64).unwrap();
    other.set(&web, "load", 0.25).unwrap();
    other.set(&web, "cores", 8_i64).unwrap();
    other.set(&ams, "region", "eu-west").unwrap();
    other.set(&fra, "active", true).unwrap();
    other.set(&fra, "region", "eu-central").unwrap();

    other.set_ref(&db, "site", &fra).unwrap();
    other.add_ref(&web, "services", &nginx).unwrap();
    other.add_ref(&web, "services", &postgres).unwrap();
    other.set_ref(&web, "site", &fra).unwrap();

    let reference = flatten(&inventory());
    let reordered = flatten(&other);
    assert_eq!(
        reference.to_toml_string().unwrap(),
        reordered.to_toml_string().unwrap()
    );
    assert_eq!(reference.digest().unwrap(), reordered.digest().unwrap());
}

#[test]
fn reference_lists_keep_insertion_order_through_the_codec() {
    let mut layout = Layout::new(inventory_schema());
    let fra = layout.create("Site", "fra").unwrap();
    for id in ["zulu", "alpha", "mike"] {
        let host = layout.create("Host", id).unwrap();
        layout.add_ref(&fra, "hosts", &host).unwrap();
    }

    let rebuilt = unflatten(inventory_schema(), &flatten(&layout)).unwrap();
    let hosts: Vec<_> = rebuilt
        .targets(&fra, "hosts")
        .unwrap()
        .iter()
        .map(|e| e.id().to_string())
        .collect();
    assert_eq!(hosts, ["zulu", "alpha", "mike"]);
}

#[test]
fn digests_separate_distinct_inventories() {
    let layout = inventory();
    let baseline = flatten(&layout).digest().unwrap();

    let mut changed = inventory();
    let db = EntityKey::new("Host", "db");
    changed.set(&db, "cores", 32_i64).unwrap();
    assert_ne!(flatten(&changed).digest().unwrap(), baseline);

    // Re-flattening the untouched layout reproduces the digest.
    assert_eq!(flatten(&layout).digest().unwrap(), baseline);
}

// =============================================================================
// Files
// =============================================================================

#[test]
fn layouts_persist_through_the_filesystem() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inventory.toml");

    let layout = inventory();
    save_to_file(&layout, &path).unwrap();
    let rebuilt = load_from_file(inventory_schema(), &path).unwrap();

    assert_eq!(flatten(&rebuilt), flatten(&layout));
}

#[test]
fn saved_files_are_byte_identical_across_runs() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.toml");
    let second = dir.path().join("second.toml");

    save_to_file(&inventory(), &first).unwrap();
    save_to_file(&inventory(), &second).unwrap();

    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );
}
