//! Integration tests for paired references
//!
//! Tests bidirectional linking, write-once semantics, atomic failure,
//! and the restore/verify path across a fuller topology.

use std::sync::Arc;

use trellis_foundation::{EntityKey, ErrorKind, ScalarType};
use trellis_graph::{Entity, Layout};
use trellis_schema::{EntityDesc, Schema, SchemaDoc};

/// Org owns sites, sites hold hosts, hosts run services, and links pair
/// two ports one-to-one.
fn topology_schema() -> Arc<Schema> {
    Arc::new(
        SchemaDoc::new()
            .with_entity(
                EntityDesc::new("Org")
                    .with_scalar("name", ScalarType::String)
                    .with_refs("sites", "Site", "org"),
            )
            .with_entity(
                EntityDesc::new("Site")
                    .with_ref("org", "Org", "sites")
                    .with_refs("hosts", "Host", "site"),
            )
            .with_entity(
                EntityDesc::new("Host")
                    .with_ref("site", "Site", "hosts")
                    .with_refs("services", "Service", "host"),
            )
            .with_entity(EntityDesc::new("Service").with_ref("host", "Host", "services"))
            .with_entity(EntityDesc::new("Port").with_ref("peer", "Port", "peer"))
            .validate()
            .unwrap(),
    )
}

fn ids(entities: &[&Entity]) -> Vec<String> {
    entities.iter().map(|e| e.id().to_string()).collect()
}

// =============================================================================
// Bidirectional Linking
// =============================================================================

#[test]
fn links_propagate_across_three_levels() {
    let mut layout = Layout::new(topology_schema());
    let org = layout.create("Org", "acme").unwrap();
    let site = layout.create("Site", "fra").unwrap();
    let host = layout.create("Host", "web").unwrap();
    let svc = layout.create("Service", "nginx").unwrap();

    layout.add_ref(&org, "sites", &site).unwrap();
    layout.set_ref(&host, "site", &site).unwrap();
    layout.add_ref(&host, "services", &svc).unwrap();

    // Walk down.
    assert_eq!(ids(&layout.targets(&org, "sites").unwrap()), ["fra"]);
    assert_eq!(ids(&layout.targets(&site, "hosts").unwrap()), ["web"]);
    assert_eq!(ids(&layout.targets(&host, "services").unwrap()), ["nginx"]);

    // Walk up.
    assert_eq!(layout.target(&svc, "host").unwrap().unwrap().id(), "web");
    assert_eq!(layout.target(&host, "site").unwrap().unwrap().id(), "fra");
    assert_eq!(layout.target(&site, "org").unwrap().unwrap().id(), "acme");

    assert!(layout.verify().is_ok());
}

#[test]
fn either_side_may_initiate_the_link() {
    let mut layout = Layout::new(topology_schema());
    let site = layout.create("Site", "fra").unwrap();
    let a = layout.create("Host", "a").unwrap();
    let b = layout.create("Host", "b").unwrap();

    // One link from the plural side, one from the singular side.
    layout.add_ref(&site, "hosts", &a).unwrap();
    layout.set_ref(&b, "site", &site).unwrap();

    assert_eq!(ids(&layout.targets(&site, "hosts").unwrap()), ["a", "b"]);
    assert_eq!(layout.target(&a, "site").unwrap().unwrap().id(), "fra");
    assert_eq!(layout.target(&b, "site").unwrap().unwrap().id(), "fra");
}

#[test]
fn singular_pairs_are_exclusive() {
    let mut layout = Layout::new(topology_schema());
    let p1 = layout.create("Port", "p1").unwrap();
    let p2 = layout.create("Port", "p2").unwrap();
    let p3 = layout.create("Port", "p3").unwrap();

    layout.set_ref(&p1, "peer", &p2).unwrap();
    assert_eq!(layout.target(&p2, "peer").unwrap().unwrap().id(), "p1");

    // Both halves of the pair are now occupied.
    let err = layout.set_ref(&p3, "peer", &p2).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ReferenceAlreadySet { .. }));
    let err = layout.set_ref(&p1, "peer", &p3).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ReferenceAlreadySet { .. }));

    assert!(layout.target(&p3, "peer").unwrap().is_none());
}

#[test]
fn a_port_may_loop_back_to_itself() {
    let mut layout = Layout::new(topology_schema());
    let p1 = layout.create("Port", "p1").unwrap();

    layout.set_ref(&p1, "peer", &p1).unwrap();
    assert_eq!(layout.target(&p1, "peer").unwrap().unwrap().id(), "p1");
    assert!(layout.verify().is_ok());
}

// =============================================================================
// Failure Atomicity
// =============================================================================

#[test]
fn failed_links_change_neither_side() {
    let mut layout = Layout::new(topology_schema());
    let s1 = layout.create("Site", "s1").unwrap();
    let s2 = layout.create("Site", "s2").unwrap();
    let host = layout.create("Host", "web").unwrap();

    layout.add_ref(&s1, "hosts", &host).unwrap();

    // The host already answers to s1, so s2's claim fails and s2's
    // list stays empty.
    let err = layout.add_ref(&s2, "hosts", &host).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ReferenceAlreadySet { .. }));
    assert!(layout.targets(&s2, "hosts").unwrap().is_empty());
    assert_eq!(layout.target(&host, "site").unwrap().unwrap().id(), "s1");
    assert!(layout.verify().is_ok());
}

#[test]
fn duplicate_links_are_rejected_without_side_effects() {
    let mut layout = Layout::new(topology_schema());
    let org = layout.create("Org", "acme").unwrap();
    let site = layout.create("Site", "fra").unwrap();

    layout.add_ref(&org, "sites", &site).unwrap();
    let err = layout.add_ref(&org, "sites", &site).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateReference { .. }));

    assert_eq!(layout.targets(&org, "sites").unwrap().len(), 1);
    assert!(layout.verify().is_ok());
}

#[test]
fn cross_type_targets_are_rejected() {
    let mut layout = Layout::new(topology_schema());
    let org = layout.create("Org", "acme").unwrap();
    let host = layout.create("Host", "web").unwrap();

    let err = layout.add_ref(&org, "sites", &host).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::WrongTargetType { .. }));
    assert!(layout.targets(&org, "sites").unwrap().is_empty());
}

// =============================================================================
// Restore and Verify
// =============================================================================

#[test]
fn restored_halves_reassemble_the_graph() {
    let mut layout = Layout::new(topology_schema());
    let site = layout.create("Site", "fra").unwrap();
    let a = layout.create("Host", "a").unwrap();
    let b = layout.create("Host", "b").unwrap();

    layout
        .restore_refs(&site, "hosts", &["b".to_string(), "a".to_string()])
        .unwrap();
    layout.restore_ref(&a, "site", "fra").unwrap();
    layout.restore_ref(&b, "site", "fra").unwrap();

    assert!(layout.verify().is_ok());
    // The stored order survives exactly as written.
    assert_eq!(ids(&layout.targets(&site, "hosts").unwrap()), ["b", "a"]);
}

#[test]
fn verify_names_the_missing_half() {
    let mut layout = Layout::new(topology_schema());
    let site = layout.create("Site", "fra").unwrap();
    layout.create("Host", "a").unwrap();

    layout
        .restore_refs(&site, "hosts", &["a".to_string()])
        .unwrap();

    let err = layout.verify().unwrap_err();
    match err.kind {
        ErrorKind::InconsistentReference {
            key,
            field,
            target,
            back_field,
        } => {
            assert_eq!(key, EntityKey::new("Site", "fra"));
            assert_eq!(field, "hosts");
            assert_eq!(target, EntityKey::new("Host", "a"));
            assert_eq!(back_field, "site");
        }
        other => panic!("unexpected error kind: {other:?}"),
    }
}

#[test]
fn restore_rejects_unknown_targets_up_front() {
    let mut layout = Layout::new(topology_schema());
    let site = layout.create("Site", "fra").unwrap();

    let err = layout
        .restore_refs(&site, "hosts", &["ghost".to_string()])
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DanglingReference { .. }));
    assert!(layout.targets(&site, "hosts").unwrap().is_empty());
}
