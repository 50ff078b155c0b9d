// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tokens produced by the expression parser.

use regex::Regex;

/// What a token selects before filters apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenKind {
    /// A host literal, possibly carrying a brace pattern.
    #[default]
    Host,
    /// A group selected by name (`%name`).
    Group,
    /// A work-group selected by name (`*name`, empty selects all).
    WorkGroup,
    /// Hosts whose FQDN matches a regexp (`/re/` or `~re`).
    HostRegexp,
}

/// One parsed expression token with its attached filters.
#[derive(Debug, Clone, Default)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub datacenter_filter: String,
    pub tags_filter: Vec<String>,
    pub regexp_filter: Option<Regex>,
    pub exclude: bool,
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.value == other.value
            && self.datacenter_filter == other.datacenter_filter
            && self.tags_filter == other.tags_filter
            && self.exclude == other.exclude
            && self.regexp_filter.as_ref().map(Regex::as_str)
                == other.regexp_filter.as_ref().map(Regex::as_str)
    }
}

impl Token {
    /// True when the token carries no filters.
    pub fn is_bare(&self) -> bool {
        self.datacenter_filter.is_empty()
            && self.tags_filter.is_empty()
            && self.regexp_filter.is_none()
    }
}
