// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expression resolution: tokens against the index, producing the final
//! ordered host list.

use crate::backend::Backend;
use crate::brace;
use crate::entity::Host;
use crate::index::Inventory;
use crate::error::ParseError;
use crate::parser::parse_expression;
use crate::token::{Token, TokenKind};
use xc_core::natural_sort;

impl<B: Backend> Inventory<B> {
    /// Resolve an expression to a list of host FQDNs.
    ///
    /// Per-token candidates are sorted (naturally when enabled), then
    /// merged in token order: an include appends hosts not present yet,
    /// an exclude removes hosts accumulated from the tokens to its left.
    /// A later include can re-add a previously excluded host.
    pub fn host_list(&self, expr: &str) -> Result<Vec<String>, ParseError> {
        let tokens = parse_expression(expr)?;

        let mut result: Vec<String> = Vec::new();
        for token in &tokens {
            let mut candidates = self.token_hosts(token);
            if self.natural_sort {
                natural_sort(&mut candidates);
            } else {
                candidates.sort();
            }

            for host in candidates {
                if token.exclude {
                    result.retain(|h| h != &host);
                } else if !result.contains(&host) {
                    result.push(host);
                }
            }
        }
        Ok(result)
    }

    /// Hosts selected by one token, unordered and pre-exclusion.
    fn token_hosts(&self, token: &Token) -> Vec<String> {
        match token.kind {
            TokenKind::HostRegexp => self.regexp_hosts(token),
            TokenKind::Host => self.literal_hosts(token),
            TokenKind::Group => self.group_hosts(token),
            TokenKind::WorkGroup => self.work_group_hosts(token),
        }
    }

    fn regexp_hosts(&self, token: &Token) -> Vec<String> {
        let Some(pattern) = token.regexp_filter.as_ref() else {
            return Vec::new();
        };
        self.host_fqdn.keys().filter(|fqdn| pattern.is_match(fqdn)).cloned().collect()
    }

    fn literal_hosts(&self, token: &Token) -> Vec<String> {
        let expanded = brace::expand_pattern(&token.value)
            .unwrap_or_else(|_| vec![token.value.clone()]);

        let mut out = Vec::new();
        for name in expanded {
            // Tag filters only constrain hosts the inventory knows about;
            // unknown hosts stay addressable by literal name.
            if !token.tags_filter.is_empty() {
                if let Some(host) = self.host_by_fqdn(&name) {
                    if !has_tags(host, &token.tags_filter) {
                        continue;
                    }
                }
            }
            if let Some(pattern) = token.regexp_filter.as_ref() {
                if !pattern.is_match(&name) {
                    continue;
                }
            }
            out.push(name);
        }
        out
    }

    fn group_hosts(&self, token: &Token) -> Vec<String> {
        let Some(group) = self.group_by_name(&token.value) else {
            return Vec::new();
        };
        self.filter_hosts(self.group_all_hosts(&group.id), token)
    }

    fn work_group_hosts(&self, token: &Token) -> Vec<String> {
        let work_groups: Vec<_> = if token.value.is_empty() {
            self.work_groups.values().collect()
        } else {
            self.work_group_by_name(&token.value).into_iter().collect()
        };

        let mut hosts = Vec::new();
        for wg in work_groups {
            for gid in &wg.groups {
                if let Some(group) = self.group_by_id(gid) {
                    for hid in &group.hosts {
                        if let Some(host) = self.host_by_id(hid) {
                            hosts.push(host);
                        }
                    }
                }
            }
        }
        self.filter_hosts(hosts, token)
    }

    /// Apply the datacenter, tags and regexp filters of a token.
    fn filter_hosts(&self, hosts: Vec<&Host>, token: &Token) -> Vec<String> {
        let mut out = Vec::new();
        for host in hosts {
            if !token.datacenter_filter.is_empty() {
                let name = self
                    .datacenter_by_id(&host.datacenter_id)
                    .map(|dc| dc.name.as_str());
                if name != Some(token.datacenter_filter.as_str()) {
                    continue;
                }
            }
            if !has_tags(host, &token.tags_filter) {
                continue;
            }
            if let Some(pattern) = token.regexp_filter.as_ref() {
                if !pattern.is_match(&host.fqdn) {
                    continue;
                }
            }
            out.push(host.fqdn.clone());
        }
        out
    }
}

fn has_tags(host: &Host, tags: &[String]) -> bool {
    tags.iter().all(|tag| host.all_tags.contains(tag))
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
