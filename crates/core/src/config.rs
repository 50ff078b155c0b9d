// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution tunables shared by the engine and its callers.
//!
//! The outer configuration layer (ini files, CLI flags) is out of scope
//! here; it fills an [`ExecConfig`] and hands it to the engine. Between
//! runs the dispatcher thread is the only writer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Privilege-raise mode selecting the remote interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaiseType {
    #[default]
    None,
    Su,
    Sudo,
}

impl fmt::Display for RaiseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaiseType::None => write!(f, "none"),
            RaiseType::Su => write!(f, "su"),
            RaiseType::Sudo => write!(f, "sudo"),
        }
    }
}

/// File transfer flavor for the copy phase of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyType {
    #[default]
    Scp,
    Tar,
}

/// Execution mode of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecMode {
    Serial,
    #[default]
    Parallel,
    Collapse,
}

impl fmt::Display for ExecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecMode::Serial => write!(f, "serial"),
            ExecMode::Parallel => write!(f, "parallel"),
            ExecMode::Collapse => write!(f, "collapse"),
        }
    }
}

/// Error for unknown execution mode names.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown mode '{0}', expected serial, parallel or collapse")]
pub struct ModeParseError(pub String);

impl FromStr for ExecMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "serial" => Ok(ExecMode::Serial),
            "parallel" => Ok(ExecMode::Parallel),
            "collapse" => Ok(ExecMode::Collapse),
            other => Err(ModeParseError(other.to_string())),
        }
    }
}

/// Tunables read by the execution engine.
///
/// Single-writer between runs: dispatchers and workers only read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    /// Remote login user.
    pub user: String,
    /// Privilege-raise mode.
    pub raise: RaiseType,
    /// Raise password used when no password manager is active.
    pub password: String,
    /// Consult the password manager for per-host passwords.
    pub use_password_manager: bool,

    /// Worker pool size.
    pub pool_size: usize,
    /// SSH binary invoked for exec and tar-pipe phases.
    pub ssh_command: String,
    /// SCP binary invoked for the scp copy phase.
    pub scp_command: String,
    /// ConnectTimeout value merged into the SSH option set.
    pub ssh_connect_timeout: u32,
    /// Extra SSH `-o` options overriding the defaults.
    pub ssh_options: BTreeMap<String, String>,

    /// Interpreter argv (whitespace separated) for no raise.
    pub interpreter: String,
    /// Interpreter argv for sudo raise.
    pub sudo_interpreter: String,
    /// Interpreter argv for su raise.
    pub su_interpreter: String,

    /// Transfer flavor used by distribute.
    pub copy_type: CopyType,
    /// Remote directory receiving generated scripts.
    pub remote_tmpdir: String,
    /// Environment entries exported at the top of generated scripts.
    pub remote_environment: BTreeMap<String, String>,

    /// Inter-host delay in serial mode, seconds.
    pub delay: u64,
    /// Show the progress counter in collapse/distribute modes.
    pub progress_bar: bool,
    /// Prefix live output lines with `host: `.
    pub prepend_hostnames: bool,
    /// Emit raw stream debug messages.
    pub debug: bool,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            user: std::env::var("USER").unwrap_or_default(),
            raise: RaiseType::None,
            password: String::new(),
            use_password_manager: false,
            pool_size: 50,
            ssh_command: "ssh".to_string(),
            scp_command: "scp".to_string(),
            ssh_connect_timeout: 1,
            ssh_options: BTreeMap::new(),
            interpreter: "/bin/bash".to_string(),
            sudo_interpreter: "sudo /bin/bash".to_string(),
            su_interpreter: "su -".to_string(),
            copy_type: CopyType::Tar,
            remote_tmpdir: "/tmp".to_string(),
            remote_environment: BTreeMap::new(),
            delay: 0,
            progress_bar: true,
            prepend_hostnames: true,
            debug: false,
        }
    }
}

impl ExecConfig {
    /// Interpreter argv for the current raise mode, split on whitespace.
    pub fn interpreter_argv(&self) -> Vec<String> {
        let raw = match self.raise {
            RaiseType::Sudo => &self.sudo_interpreter,
            RaiseType::Su => &self.su_interpreter,
            RaiseType::None => &self.interpreter,
        };
        raw.split_whitespace().map(str::to_string).collect()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
