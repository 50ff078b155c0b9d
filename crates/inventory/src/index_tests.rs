// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Index construction and completion tests.

use super::*;
use crate::test_support::{datacenter, fixture_backend, group, host, StaticBackend};

fn fixture() -> Inventory<StaticBackend> {
    Inventory::create(fixture_backend()).unwrap()
}

#[test]
fn links_groups_to_work_group_and_parent() {
    let inv = fixture();

    let wg = inv.work_group_by_id("wg1").unwrap();
    assert_eq!(wg.groups.len(), 4);

    let g2 = inv.group_by_id("g2").unwrap();
    assert_eq!(g2.parent_id, "g1");
    assert!(inv.group_by_id("g1").unwrap().children.contains(&"g2".to_string()));
    assert!(inv.group_by_id("g1").unwrap().children.contains(&"g3".to_string()));
}

#[test]
fn group_tags_include_transitive_parents() {
    let inv = fixture();
    let g2 = inv.group_by_id("g2").unwrap();
    assert_eq!(g2.all_tags, vec!["tag1", "tag2", "tag3", "tag4"]);
}

#[test]
fn host_tags_include_own_and_group_chain() {
    let inv = fixture();
    let h1 = inv.host_by_id("h1").unwrap();
    assert_eq!(h1.all_tags, vec!["tag1", "tag2", "tag3", "tag4", "tag5"]);
}

#[test]
fn host_lookup_by_fqdn() {
    let inv = fixture();
    assert_eq!(inv.host_by_fqdn("host2.example.com").unwrap().id, "h2");
    assert!(inv.host_by_fqdn("nope.example.com").is_none());
}

#[test]
fn datacenter_root_follows_parent_chain() {
    let inv = fixture();
    assert_eq!(inv.datacenter_by_id("dc2").unwrap().root_id.as_deref(), Some("dc1"));
    assert_eq!(inv.datacenter_by_id("dc1").unwrap().root_id, None);
}

#[test]
fn global_tags_are_sorted_union() {
    let inv = fixture();
    assert_eq!(inv.tags(), &["special", "tag1", "tag2", "tag3", "tag4", "tag5"]);
}

#[test]
fn dangling_references_are_dropped() {
    let backend = StaticBackend {
        hosts: vec![host("h1", "a.ex", &[], "missing-group", "missing-dc")],
        groups: vec![group("g1", "grp", "missing-parent", &[], "missing-wg")],
        datacenters: vec![datacenter("dc1", "dc", "missing-parent")],
        ..Default::default()
    };
    let inv = Inventory::create(backend).unwrap();

    assert_eq!(inv.host_by_id("h1").unwrap().group_id, "");
    assert_eq!(inv.host_by_id("h1").unwrap().datacenter_id, "");
    assert_eq!(inv.group_by_id("g1").unwrap().parent_id, "");
    assert_eq!(inv.datacenter_by_id("dc1").unwrap().parent_id, "");
    // Broken references never abort resolution.
    assert_eq!(inv.host_list("%grp").unwrap(), Vec::<String>::new());
    assert_eq!(inv.host_list("a.ex").unwrap(), vec!["a.ex"]);
}

#[test]
fn parent_cycle_is_broken_at_load() {
    let backend = StaticBackend {
        groups: vec![
            group("g1", "one", "g2", &["t1"], ""),
            group("g2", "two", "g1", &["t2"], ""),
        ],
        ..Default::default()
    };
    let inv = Inventory::create(backend).unwrap();

    // One of the two links is dropped; tag walks terminate.
    let g1 = inv.group_by_id("g1").unwrap();
    let g2 = inv.group_by_id("g2").unwrap();
    assert!(g1.parent_id.is_empty() || g2.parent_id.is_empty());
    assert!(g1.all_tags.contains(&"t1".to_string()));
}

#[test]
fn reload_rebuilds_the_index() {
    let mut inv = fixture();
    assert_eq!(inv.host_list("%group4").unwrap().len(), 2);
    inv.reload().unwrap();
    assert_eq!(inv.host_list("%group4").unwrap().len(), 2);
}

#[test]
fn failed_load_surfaces_backend_error() {
    let backend = StaticBackend { fail_next: true, ..Default::default() };
    let err = Inventory::create(backend).unwrap_err();
    assert_eq!(err.to_string(), "backend unavailable");
}

#[test]
fn duplicate_names_resolve_last_write_wins() {
    let backend = StaticBackend {
        groups: vec![group("g1", "dup", "", &[], ""), group("g2", "dup", "", &[], "")],
        ..Default::default()
    };
    let inv = Inventory::create(backend).unwrap();
    assert_eq!(inv.group_by_name("dup").unwrap().id, "g2");
}

#[test]
fn completion_returns_sorted_postfixes() {
    let inv = fixture();

    assert_eq!(inv.complete_tag("tag"), vec!["1", "2", "3", "4", "5"]);
    assert_eq!(inv.complete_tag("spec"), vec!["ial"]);
    assert_eq!(
        inv.complete_host("host"),
        vec!["1.example.com", "2.example.com", "3.example.com", "4.example.com"]
    );
    assert_eq!(inv.complete_group("group"), vec!["1", "2", "3", "4"]);
    assert_eq!(inv.complete_work_group("work"), vec!["group"]);
    assert_eq!(inv.complete_datacenter("datacenter1"), vec!["", ".1"]);
}

#[test]
fn completion_with_empty_prefix_lists_everything() {
    let inv = fixture();
    assert_eq!(inv.complete_group("").len(), 4);
    assert_eq!(inv.complete_tag("").len(), 6);
}

#[test]
fn completion_with_unknown_prefix_is_empty() {
    let inv = fixture();
    assert!(inv.complete_host("zzz").is_empty());
}
