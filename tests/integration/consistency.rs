//! Property tests for cross-layer consistency.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use proptest::prelude::*;
use trellis_codec::{flatten, unflatten};
use trellis_foundation::ScalarType;
use trellis_graph::Layout;
use trellis_query::{Selection, find, select};
use trellis_schema::{EntityDesc, Schema, SchemaDoc};

fn assignment_schema() -> Arc<Schema> {
    Arc::new(
        SchemaDoc::new()
            .with_entity(
                EntityDesc::new("Site")
                    .with_scalar("tier", ScalarType::Int)
                    .with_refs("hosts", "Host", "site"),
            )
            .with_entity(
                EntityDesc::new("Host")
                    .with_scalar("cores", ScalarType::Int)
                    .with_scalar("name", ScalarType::String)
                    .with_ref("site", "Site", "hosts"),
            )
            .validate()
            .unwrap(),
    )
}

/// Builds a layout assigning each host to a site picked by `seed`.
fn build(sites: &BTreeSet<String>, hosts: &BTreeMap<String, i64>, seed: usize) -> Layout {
    let mut layout = Layout::new(assignment_schema());
    let site_keys: Vec<_> = sites
        .iter()
        .map(|id| layout.create("Site", id).unwrap())
        .collect();
    for (tier, key) in site_keys.iter().enumerate() {
        layout.set(key, "tier", tier as i64).unwrap();
    }
    for (index, (id, cores)) in hosts.iter().enumerate() {
        let host = layout.create("Host", id).unwrap();
        layout.set(&host, "cores", *cores).unwrap();
        layout.set(&host, "name", id.as_str()).unwrap();
        let site = &site_keys[(index + seed) % site_keys.len()];
        layout.set_ref(&host, "site", site).unwrap();
    }
    layout
}

proptest! {
    #[test]
    fn round_trips_preserve_bytes_and_structure(
        sites in proptest::collection::btree_set("[a-z]{1,8}", 1..4),
        hosts in proptest::collection::btree_map("[a-z]{1,8}", any::<i64>(), 1..8),
        seed in 0usize..16,
    ) {
        let layout = build(&sites, &hosts, seed);
        let doc = flatten(&layout);
        let text = doc.to_toml_string().unwrap();

        let rebuilt = unflatten(assignment_schema(), &doc).unwrap();
        prop_assert!(rebuilt.verify().is_ok());
        prop_assert_eq!(rebuilt.count("Host").unwrap(), hosts.len());
        prop_assert_eq!(rebuilt.count("Site").unwrap(), sites.len());

        let again = flatten(&rebuilt);
        prop_assert_eq!(again.to_toml_string().unwrap(), text);
        prop_assert_eq!(again.digest().unwrap(), doc.digest().unwrap());
    }

    #[test]
    fn every_entity_stays_reachable_by_query(
        sites in proptest::collection::btree_set("[a-z]{1,8}", 1..4),
        hosts in proptest::collection::btree_map("[a-z]{1,8}", any::<i64>(), 1..8),
        seed in 0usize..16,
    ) {
        let layout = build(&sites, &hosts, seed);
        let rebuilt = unflatten(assignment_schema(), &flatten(&layout)).unwrap();

        for id in hosts.keys() {
            let selection = select(&rebuilt, &format!("Host.{id}"))?;
            prop_assert!(matches!(selection, Selection::Entity(e) if e.id() == *id));

            // Names are unique, so an exact anchored pattern hits once.
            let hits = find(&rebuilt, "Host", "name", &format!("{id}$"))?;
            prop_assert_eq!(hits.len(), 1);
            prop_assert_eq!(hits[0].id(), id.as_str());
        }
        for id in &sites {
            let selection = select(&rebuilt, &format!("Site.{id}"))?;
            prop_assert!(matches!(selection, Selection::Entity(e) if e.id() == *id));
        }
    }
}
