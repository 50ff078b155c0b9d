// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test plumbing: stub remote binaries and runtimes around them.
//!
//! The builders point `ssh_command`/`scp_command` at small bash scripts,
//! so worker and dispatcher tests exercise the real PTY path without a
//! network.

use crate::runtime::Runtime;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use xc_core::ExecConfig;

/// A directory of stub executables, removed on drop.
pub(crate) struct StubBin {
    dir: TempDir,
}

impl StubBin {
    pub(crate) fn new() -> Self {
        Self { dir: tempfile::tempdir().expect("tempdir") }
    }

    /// Write an executable bash script and return its path.
    pub(crate) fn script(&self, name: &str, body: &str) -> String {
        let path = self.dir.path().join(name);
        std::fs::write(&path, format!("#!/bin/bash\n{body}\n")).expect("write stub");
        let mut permissions = std::fs::metadata(&path).expect("stat stub").permissions();
        permissions.set_mode(0o755);
        std::fs::set_permissions(&path, permissions).expect("chmod stub");
        path.to_string_lossy().into_owned()
    }

    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Runtime whose ssh binary is a stub script.
pub(crate) fn stub_runtime(bin: &StubBin, ssh_body: &str) -> Arc<Runtime> {
    let config = ExecConfig {
        user: "tester".to_string(),
        ssh_command: bin.script("ssh-stub", ssh_body),
        scp_command: bin.script("scp-stub", "exit 0"),
        ..Default::default()
    };
    Runtime::new(config)
}
