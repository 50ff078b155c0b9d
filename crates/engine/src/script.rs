// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generated remote scripts for the parallel/collapse/serial modes.
//!
//! The command is wrapped into a self-deleting bash script that is copied
//! to every host and executed there. The local temp file disappears when
//! the [`Script`] is dropped.

use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::NamedTempFile;
use xc_core::ExecConfig;

pub struct Script {
    file: NamedTempFile,
    remote_prefix: String,
}

/// Write the command into a local temp script and derive the remote name
/// prefix under the configured remote tmpdir.
pub fn create_script(config: &ExecConfig, cmd: &str) -> std::io::Result<Script> {
    let mut file = tempfile::Builder::new().prefix("xc.").tempfile()?;

    write!(file, "#!/bin/bash\n\n")?;
    for (name, value) in &config.remote_environment {
        writeln!(file, "{name}={value}")?;
    }
    writeln!(file)?;
    // The script removes itself shortly after it starts.
    writeln!(file, "nohup bash -c \"sleep 1; rm -f $0\" >/dev/null 2>&1 </dev/null &")?;
    writeln!(file, "{cmd}")?;
    file.flush()?;

    let mut permissions = file.as_file().metadata()?.permissions();
    permissions.set_mode(0o755);
    file.as_file().set_permissions(permissions)?;

    let basename = file
        .path()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let remote_prefix = Path::new(&config.remote_tmpdir)
        .join(basename)
        .to_string_lossy()
        .into_owned();

    Ok(Script { file, remote_prefix })
}

impl Script {
    /// Path of the local temp file.
    pub fn local_path(&self) -> &Path {
        self.file.path()
    }

    /// Remote filename for one host.
    ///
    /// The hostname is appended so aliased FQDNs resolving to one server
    /// do not race on the same file name.
    pub fn remote_path(&self, host: &str) -> String {
        format!("{}.{}.sh", self.remote_prefix, host)
    }
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
