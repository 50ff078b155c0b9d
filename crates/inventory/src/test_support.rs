// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test fixtures: a static backend and the standard fixture inventory.

use crate::backend::{Backend, BackendError};
use crate::entity::{Datacenter, Group, Host, WorkGroup};

/// Backend serving fixed slices, reloads counted.
#[derive(Debug, Clone, Default)]
pub struct StaticBackend {
    pub hosts: Vec<Host>,
    pub groups: Vec<Group>,
    pub work_groups: Vec<WorkGroup>,
    pub datacenters: Vec<Datacenter>,
    pub loads: usize,
    pub fail_next: bool,
}

impl Backend for StaticBackend {
    fn load(&mut self) -> Result<(), BackendError> {
        if self.fail_next {
            self.fail_next = false;
            return Err(BackendError::new("backend unavailable"));
        }
        self.loads += 1;
        Ok(())
    }

    fn reload(&mut self) -> Result<(), BackendError> {
        self.load()
    }

    fn hosts(&self) -> Vec<Host> {
        self.hosts.clone()
    }

    fn groups(&self) -> Vec<Group> {
        self.groups.clone()
    }

    fn work_groups(&self) -> Vec<WorkGroup> {
        self.work_groups.clone()
    }

    fn datacenters(&self) -> Vec<Datacenter> {
        self.datacenters.clone()
    }
}

pub fn host(id: &str, fqdn: &str, tags: &[&str], group_id: &str, dc_id: &str) -> Host {
    Host {
        id: id.to_string(),
        fqdn: fqdn.to_string(),
        aliases: Vec::new(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        group_id: group_id.to_string(),
        datacenter_id: dc_id.to_string(),
        ..Default::default()
    }
}

pub fn group(id: &str, name: &str, parent_id: &str, tags: &[&str], wg_id: &str) -> Group {
    Group {
        id: id.to_string(),
        name: name.to_string(),
        parent_id: parent_id.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        work_group_id: wg_id.to_string(),
        ..Default::default()
    }
}

pub fn work_group(id: &str, name: &str) -> WorkGroup {
    WorkGroup { id: id.to_string(), name: name.to_string(), ..Default::default() }
}

pub fn datacenter(id: &str, name: &str, parent_id: &str) -> Datacenter {
    Datacenter {
        id: id.to_string(),
        name: name.to_string(),
        parent_id: parent_id.to_string(),
        ..Default::default()
    }
}

/// The standard fixture: work-group `wg1` owning `group1` (tag1, tag2)
/// with children `group2` (tag3, tag4) and `group3` (special), plus
/// `group4`; four hosts spread over `group2`..`group4` in `datacenter1.1`.
pub fn fixture_backend() -> StaticBackend {
    StaticBackend {
        work_groups: vec![work_group("wg1", "workgroup")],
        groups: vec![
            group("g1", "group1", "", &["tag1", "tag2"], "wg1"),
            group("g2", "group2", "g1", &["tag3", "tag4"], "wg1"),
            group("g3", "group3", "g1", &["special"], "wg1"),
            group("g4", "group4", "", &[], "wg1"),
        ],
        datacenters: vec![
            datacenter("dc1", "datacenter1", ""),
            datacenter("dc2", "datacenter1.1", "dc1"),
        ],
        hosts: vec![
            host("h1", "host1.example.com", &["tag5"], "g2", "dc2"),
            host("h2", "host2.example.com", &[], "g3", "dc2"),
            host("h3", "host3.example.com", &[], "g4", "dc2"),
            host("h4", "host4.example.com", &[], "g4", "dc2"),
        ],
        ..Default::default()
    }
}
