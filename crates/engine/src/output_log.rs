// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optional append-only log of everything a run printed.
//!
//! Written from the dispatcher thread only. Each entry is prefixed with
//! the local timestamp; host output additionally carries `host: `.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

pub struct OutputLog {
    file: File,
}

impl OutputLog {
    /// Open (or create) the log file for appending.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }

    /// Append one message, prefixed `[YYYY-MM-DD HH:MM:SS] `.
    pub fn write(&mut self, message: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        if let Err(error) = write!(self.file, "[{stamp}] {message}") {
            tracing::warn!(%error, "output log write failed");
        }
    }

    /// Append one host output line: `[stamp] host: <data>`.
    pub fn write_host(&mut self, hostname: &str, data: &[u8]) {
        self.write(&format!("{}: {}", hostname, String::from_utf8_lossy(data)));
    }
}

#[cfg(test)]
#[path = "output_log_tests.rs"]
mod tests;
