// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inventory entities: hosts, groups, work-groups, datacenters.
//!
//! Entities are immutable after the index [`apply`](crate::index) pass.
//! Relations are stored as ID lists and resolved through the index maps,
//! never as owning references. Fields marked `serde(skip)` are derived
//! during indexing and are not part of the backend payload.

use serde::{Deserialize, Serialize};

/// A single machine, identified by FQDN in host lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Host {
    pub id: String,
    pub fqdn: String,
    pub aliases: Vec<String>,
    pub tags: Vec<String>,
    pub group_id: String,
    pub datacenter_id: String,
    pub description: String,

    /// Own tags plus transitive parent-group tags, sorted and deduplicated.
    #[serde(skip)]
    pub all_tags: Vec<String>,
}

/// A group of hosts. Groups form a forest via `parent_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub parent_id: String,
    pub tags: Vec<String>,
    pub work_group_id: String,
    pub description: String,

    /// Own tags plus transitive parent tags, sorted and deduplicated.
    #[serde(skip)]
    pub all_tags: Vec<String>,
    /// IDs of direct child groups.
    #[serde(skip)]
    pub children: Vec<String>,
    /// IDs of hosts directly in this group.
    #[serde(skip)]
    pub hosts: Vec<String>,
}

/// Top-level ownership partition over groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkGroup {
    pub id: String,
    pub name: String,
    pub description: String,

    /// IDs of member groups.
    #[serde(skip)]
    pub groups: Vec<String>,
}

/// A datacenter, optionally nested under a parent datacenter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Datacenter {
    pub id: String,
    pub name: String,
    pub parent_id: String,
    pub description: String,

    /// ID of the topmost ancestor, when this datacenter has a parent.
    #[serde(skip)]
    pub root_id: Option<String>,
}
