// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory inventory index.
//!
//! Built by a single [`apply`](Inventory::apply) pass after the backend
//! returns its raw slices; read-only afterwards until the next load.
//! Dangling foreign keys are dropped silently — the resolver never fails
//! on broken references.

use crate::backend::{Backend, BackendError};
use crate::entity::{Datacenter, Group, Host, WorkGroup};
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug)]
pub struct Inventory<B: Backend> {
    backend: B,

    pub(crate) hosts: HashMap<String, Host>,
    pub(crate) host_fqdn: HashMap<String, String>,
    pub(crate) groups: HashMap<String, Group>,
    pub(crate) group_name: HashMap<String, String>,
    pub(crate) work_groups: HashMap<String, WorkGroup>,
    pub(crate) work_group_name: HashMap<String, String>,
    pub(crate) datacenters: HashMap<String, Datacenter>,
    pub(crate) datacenter_name: HashMap<String, String>,

    tags: Vec<String>,
    pub(crate) natural_sort: bool,
}

impl<B: Backend> Inventory<B> {
    /// Create an inventory and load it from the backend.
    pub fn create(backend: B) -> Result<Self, BackendError> {
        let mut inventory = Self {
            backend,
            hosts: HashMap::new(),
            host_fqdn: HashMap::new(),
            groups: HashMap::new(),
            group_name: HashMap::new(),
            work_groups: HashMap::new(),
            work_group_name: HashMap::new(),
            datacenters: HashMap::new(),
            datacenter_name: HashMap::new(),
            tags: Vec::new(),
            natural_sort: true,
        };
        inventory.load()?;
        Ok(inventory)
    }

    /// Load raw data from the backend and rebuild the index.
    pub fn load(&mut self) -> Result<(), BackendError> {
        self.backend.load()?;
        self.copy_backend_data();
        Ok(())
    }

    /// Reload the backend and rebuild the index.
    pub fn reload(&mut self) -> Result<(), BackendError> {
        self.backend.reload()?;
        self.copy_backend_data();
        Ok(())
    }

    /// Use natural instead of lexicographic ordering within one
    /// expression token.
    pub fn set_natural_sort(&mut self, value: bool) {
        self.natural_sort = value;
    }

    // -----------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------

    pub fn host_by_id(&self, id: &str) -> Option<&Host> {
        self.hosts.get(id)
    }

    pub fn host_by_fqdn(&self, fqdn: &str) -> Option<&Host> {
        self.host_fqdn.get(fqdn).and_then(|id| self.hosts.get(id))
    }

    pub fn group_by_id(&self, id: &str) -> Option<&Group> {
        self.groups.get(id)
    }

    pub fn group_by_name(&self, name: &str) -> Option<&Group> {
        self.group_name.get(name).and_then(|id| self.groups.get(id))
    }

    pub fn work_group_by_id(&self, id: &str) -> Option<&WorkGroup> {
        self.work_groups.get(id)
    }

    pub fn work_group_by_name(&self, name: &str) -> Option<&WorkGroup> {
        self.work_group_name.get(name).and_then(|id| self.work_groups.get(id))
    }

    pub fn datacenter_by_id(&self, id: &str) -> Option<&Datacenter> {
        self.datacenters.get(id)
    }

    pub fn datacenter_by_name(&self, name: &str) -> Option<&Datacenter> {
        self.datacenter_name.get(name).and_then(|id| self.datacenters.get(id))
    }

    /// All known tags, sorted.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    // -----------------------------------------------------------------
    // Completion
    // -----------------------------------------------------------------

    pub fn complete_tag(&self, prefix: &str) -> Vec<String> {
        complete(self.tags.iter(), prefix)
    }

    pub fn complete_host(&self, prefix: &str) -> Vec<String> {
        complete(self.host_fqdn.keys(), prefix)
    }

    pub fn complete_group(&self, prefix: &str) -> Vec<String> {
        complete(self.group_name.keys(), prefix)
    }

    pub fn complete_work_group(&self, prefix: &str) -> Vec<String> {
        complete(self.work_group_name.keys(), prefix)
    }

    pub fn complete_datacenter(&self, prefix: &str) -> Vec<String> {
        complete(self.datacenter_name.keys(), prefix)
    }

    // -----------------------------------------------------------------
    // Traversal used by the resolver
    // -----------------------------------------------------------------

    /// IDs of a group's transitive children, the group itself excluded.
    pub(crate) fn group_all_children(&self, id: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![id.to_string()];
        seen.insert(id.to_string());
        while let Some(current) = stack.pop() {
            if let Some(group) = self.groups.get(&current) {
                for child in &group.children {
                    if seen.insert(child.clone()) {
                        out.push(child.clone());
                        stack.push(child.clone());
                    }
                }
            }
        }
        out
    }

    /// Hosts of a group and all its transitive children.
    pub(crate) fn group_all_hosts(&self, id: &str) -> Vec<&Host> {
        let mut group_ids = self.group_all_children(id);
        group_ids.push(id.to_string());
        let mut hosts = Vec::new();
        for gid in &group_ids {
            if let Some(group) = self.groups.get(gid) {
                for hid in &group.hosts {
                    if let Some(host) = self.hosts.get(hid) {
                        hosts.push(host);
                    }
                }
            }
        }
        hosts
    }

    // -----------------------------------------------------------------
    // Index construction
    // -----------------------------------------------------------------

    fn copy_backend_data(&mut self) {
        self.hosts.clear();
        self.host_fqdn.clear();
        self.groups.clear();
        self.group_name.clear();
        self.work_groups.clear();
        self.work_group_name.clear();
        self.datacenters.clear();
        self.datacenter_name.clear();
        self.tags.clear();

        // Name maps are last-write-wins on duplicates.
        for host in self.backend.hosts() {
            self.host_fqdn.insert(host.fqdn.clone(), host.id.clone());
            self.hosts.insert(host.id.clone(), host);
        }
        for group in self.backend.groups() {
            self.group_name.insert(group.name.clone(), group.id.clone());
            self.groups.insert(group.id.clone(), group);
        }
        for wg in self.backend.work_groups() {
            self.work_group_name.insert(wg.name.clone(), wg.id.clone());
            self.work_groups.insert(wg.id.clone(), wg);
        }
        for dc in self.backend.datacenters() {
            self.datacenter_name.insert(dc.name.clone(), dc.id.clone());
            self.datacenters.insert(dc.id.clone(), dc);
        }

        self.apply();
    }

    /// Link relations and compute derived fields from the raw slices.
    fn apply(&mut self) {
        self.link_datacenters();
        self.link_groups();
        self.compute_group_tags();
        self.link_hosts();
        self.compute_host_tags();
        self.collect_tags();
    }

    fn link_datacenters(&mut self) {
        // Drop dangling parents first so root walks only follow real links.
        let ids: Vec<String> = self.datacenters.keys().cloned().collect();
        for id in &ids {
            let parent_id = self.datacenters[id].parent_id.clone();
            if !parent_id.is_empty() && !self.datacenters.contains_key(&parent_id) {
                if let Some(dc) = self.datacenters.get_mut(id) {
                    dc.parent_id.clear();
                }
            }
        }

        for id in &ids {
            let mut current = self.datacenters[id].parent_id.clone();
            if current.is_empty() {
                continue;
            }
            let mut seen = HashSet::new();
            seen.insert(id.clone());
            let mut root = current.clone();
            while let Some(dc) = self.datacenters.get(&current) {
                if !seen.insert(current.clone()) {
                    break;
                }
                root = current.clone();
                current = dc.parent_id.clone();
                if current.is_empty() {
                    break;
                }
            }
            if let Some(dc) = self.datacenters.get_mut(id) {
                dc.root_id = Some(root);
            }
        }
    }

    fn link_groups(&mut self) {
        let mut ids: Vec<String> = self.groups.keys().cloned().collect();
        ids.sort();

        // Unlink dangling parents and parents that would close a cycle.
        for id in &ids {
            let parent_id = self.groups[id].parent_id.clone();
            if parent_id.is_empty() {
                continue;
            }
            if !self.groups.contains_key(&parent_id) || self.closes_cycle(id, &parent_id) {
                if let Some(group) = self.groups.get_mut(id) {
                    tracing::warn!(group = %id, parent = %parent_id, "dropping group parent link");
                    group.parent_id.clear();
                }
            }
        }

        for id in &ids {
            let group = &self.groups[id];
            let parent_id = group.parent_id.clone();
            let wg_id = group.work_group_id.clone();

            if !parent_id.is_empty() {
                if let Some(parent) = self.groups.get_mut(&parent_id) {
                    parent.children.push(id.clone());
                }
            }
            if !wg_id.is_empty() {
                if let Some(wg) = self.work_groups.get_mut(&wg_id) {
                    wg.groups.push(id.clone());
                }
            }
        }
    }

    /// True when walking up from `parent_id` reaches `id`.
    fn closes_cycle(&self, id: &str, parent_id: &str) -> bool {
        let mut seen = HashSet::new();
        let mut current = parent_id.to_string();
        while !current.is_empty() {
            if current == id {
                return true;
            }
            if !seen.insert(current.clone()) {
                return false;
            }
            match self.groups.get(&current) {
                Some(group) => current = group.parent_id.clone(),
                None => break,
            }
        }
        false
    }

    fn compute_group_tags(&mut self) {
        let ids: Vec<String> = self.groups.keys().cloned().collect();
        for id in &ids {
            let mut tags = BTreeSet::new();
            let mut current = Some(id.clone());
            while let Some(gid) = current {
                match self.groups.get(&gid) {
                    Some(group) => {
                        tags.extend(group.tags.iter().cloned());
                        let parent = group.parent_id.clone();
                        current = (!parent.is_empty()).then_some(parent);
                    }
                    None => break,
                }
            }
            if let Some(group) = self.groups.get_mut(id) {
                group.all_tags = tags.into_iter().collect();
            }
        }
    }

    fn link_hosts(&mut self) {
        let ids: Vec<String> = self.hosts.keys().cloned().collect();
        for id in &ids {
            let host = &self.hosts[id];
            let group_id = host.group_id.clone();
            let dc_id = host.datacenter_id.clone();

            if !group_id.is_empty() {
                match self.groups.get_mut(&group_id) {
                    Some(group) => group.hosts.push(id.clone()),
                    None => {
                        if let Some(host) = self.hosts.get_mut(id) {
                            host.group_id.clear();
                        }
                    }
                }
            }
            if !dc_id.is_empty() && !self.datacenters.contains_key(&dc_id) {
                if let Some(host) = self.hosts.get_mut(id) {
                    host.datacenter_id.clear();
                }
            }
        }

        // Host ordering inside a group follows sorted host IDs.
        for group in self.groups.values_mut() {
            group.hosts.sort();
        }
    }

    fn compute_host_tags(&mut self) {
        let ids: Vec<String> = self.hosts.keys().cloned().collect();
        for id in &ids {
            let host = &self.hosts[id];
            let mut tags: BTreeSet<String> = host.tags.iter().cloned().collect();
            if !host.group_id.is_empty() {
                if let Some(group) = self.groups.get(&host.group_id) {
                    tags.extend(group.all_tags.iter().cloned());
                }
            }
            if let Some(host) = self.hosts.get_mut(id) {
                host.all_tags = tags.into_iter().collect();
            }
        }
    }

    fn collect_tags(&mut self) {
        let mut tags = BTreeSet::new();
        for group in self.groups.values() {
            tags.extend(group.tags.iter().cloned());
        }
        for host in self.hosts.values() {
            tags.extend(host.tags.iter().cloned());
        }
        self.tags = tags.into_iter().collect();
    }
}

/// Sorted postfixes of names starting with a prefix.
fn complete<'a, I>(names: I, prefix: &str) -> Vec<String>
where
    I: Iterator<Item = &'a String>,
{
    let mut out: Vec<String> = names
        .filter_map(|name| name.strip_prefix(prefix))
        .map(str::to_string)
        .collect();
    out.sort();
    out
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod tests;
