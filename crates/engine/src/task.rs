// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task and message types flowing between dispatchers and workers.

use xc_core::CopyType;

/// Engine status codes surfaced in per-host result maps.
///
/// Regular remote exit codes occupy 0..=255; these sit far above.
pub const ERR_MACOS_EXIT: i32 = 32500;
/// Task cancelled by the operator.
pub const ERR_FORCE_STOP: i32 = 32501;
/// Copy phase failed; exec was skipped.
pub const ERR_COPY_FAILED: i32 = 32502;
/// PTY or pipe setup failed.
pub const ERR_TERMINAL_ERROR: i32 = 32503;
/// sudo/su rejected the password.
pub const ERR_AUTHENTICATION: i32 = 32504;
/// fork/exec of the child failed.
pub const ERR_COMMAND_START_FAILED: i32 = 32505;

/// A unit of work for one host: an optional copy phase followed by an
/// optional exec phase. Either may be empty.
#[derive(Debug, Clone, Default)]
pub struct Task {
    pub hostname: String,
    pub local_filename: String,
    pub remote_filename: String,
    pub recursive_copy: bool,
    pub cmd: String,
    pub copy: CopyType,
}

impl Task {
    /// True when there is a file to transfer.
    pub fn has_copy(&self) -> bool {
        !self.local_filename.is_empty() && !self.remote_filename.is_empty()
    }

    /// True when there is a command to run.
    pub fn has_exec(&self) -> bool {
        !self.cmd.is_empty()
    }
}

/// Payload of a worker message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    /// Filtered remote output.
    Data(Vec<u8>),
    /// Raw stream bytes, emitted before filtering.
    Debug(Vec<u8>),
    /// Copy phase finished with a status code.
    CopyFinished(i32),
    /// Exec phase finished with a status code.
    ExecFinished(i32),
}

/// One worker message, consumed by exactly one dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub hostname: String,
    pub body: MessageBody,
}

impl Message {
    pub fn data(hostname: &str, bytes: &[u8]) -> Self {
        Self { hostname: hostname.to_string(), body: MessageBody::Data(bytes.to_vec()) }
    }

    pub fn debug(hostname: &str, bytes: &[u8]) -> Self {
        Self { hostname: hostname.to_string(), body: MessageBody::Debug(bytes.to_vec()) }
    }

    pub fn copy_finished(hostname: &str, status: i32) -> Self {
        Self { hostname: hostname.to_string(), body: MessageBody::CopyFinished(status) }
    }

    pub fn exec_finished(hostname: &str, status: i32) -> Self {
        Self { hostname: hostname.to_string(), body: MessageBody::ExecFinished(status) }
    }
}
