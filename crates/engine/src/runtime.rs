// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared runtime handle: configuration, password source, output log.
//!
//! One `Arc<Runtime>` is threaded through dispatchers and workers instead
//! of process-wide globals. Configuration is single-writer between runs;
//! workers take a snapshot per task.

use crate::output_log::OutputLog;
use parking_lot::{Mutex, RwLock};
use std::path::Path;
use std::sync::Arc;
use xc_core::ExecConfig;

/// Per-host password source, e.g. a password-manager plugin.
pub trait PasswordProvider: Send + Sync {
    /// True when the provider is initialized and usable.
    fn ready(&self) -> bool;
    /// Password for a host. Empty string when unknown.
    fn get_pass(&self, hostname: &str) -> String;
}

pub struct Runtime {
    config: RwLock<ExecConfig>,
    password_provider: RwLock<Option<Arc<dyn PasswordProvider>>>,
    output_log: Mutex<Option<OutputLog>>,
}

impl Runtime {
    pub fn new(config: ExecConfig) -> Arc<Self> {
        Arc::new(Self {
            config: RwLock::new(config),
            password_provider: RwLock::new(None),
            output_log: Mutex::new(None),
        })
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> ExecConfig {
        self.config.read().clone()
    }

    /// Mutate the configuration between runs.
    pub fn update_config(&self, f: impl FnOnce(&mut ExecConfig)) {
        f(&mut self.config.write());
    }

    pub fn set_password_provider(&self, provider: Arc<dyn PasswordProvider>) {
        *self.password_provider.write() = Some(provider);
    }

    pub fn clear_password_provider(&self) {
        *self.password_provider.write() = None;
    }

    /// Raise password for a host: the password manager when enabled and
    /// ready, the configured password otherwise.
    pub fn password_for(&self, hostname: &str) -> String {
        let config = self.config.read();
        if config.use_password_manager {
            if let Some(provider) = self.password_provider.read().as_ref() {
                if provider.ready() {
                    return provider.get_pass(hostname);
                }
            }
        }
        config.password.clone()
    }

    /// Start mirroring host output to an append-only log file.
    pub fn set_output_log(&self, path: &Path) -> std::io::Result<()> {
        *self.output_log.lock() = Some(OutputLog::open(path)?);
        Ok(())
    }

    pub fn clear_output_log(&self) {
        *self.output_log.lock() = None;
    }

    /// Append a timestamped message to the output log, if enabled.
    pub fn log_output(&self, message: &str) {
        if let Some(log) = self.output_log.lock().as_mut() {
            log.write(message);
        }
    }

    /// Append host output to the output log, if enabled.
    pub fn log_host_output(&self, hostname: &str, data: &[u8]) {
        if let Some(log) = self.output_log.lock().as_mut() {
            log.write_host(hostname, data);
        }
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
