// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend contract consumed by the inventory index.
//!
//! Concrete backends (HTTP inventories, on-disk files) live outside this
//! workspace; they only need to hand over the four raw entity slices.

use crate::entity::{Datacenter, Group, Host, WorkGroup};
use thiserror::Error;

/// Error reported by a backend load or reload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct BackendError(pub String);

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Source of raw inventory data.
///
/// `load` is called once at startup, `reload` on operator request; after
/// either succeeds the index re-reads all four slices.
pub trait Backend {
    fn load(&mut self) -> Result<(), BackendError>;
    fn reload(&mut self) -> Result<(), BackendError>;

    fn hosts(&self) -> Vec<Host>;
    fn groups(&self) -> Vec<Group>;
    fn work_groups(&self) -> Vec<WorkGroup>;
    fn datacenters(&self) -> Vec<Datacenter>;
}
