// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote output recognizers: password prompts, echoes, noise.
//!
//! Workers and the serial dispatcher feed PTY output through an
//! [`OutputFilter`] chunk by chunk. The filter is pure state over bytes;
//! acting on the returned [`ChunkAction`] (writing the password, killing
//! the child) is the caller's job.

use regex::bytes::Regex;
use std::sync::LazyLock;

/// Password prompts are only looked for in the first reads of a stream.
pub const PASSWORD_PROMPT_WINDOW: u32 = 5;

/// Canned line emitted when the remote side rejects the password.
pub const AUTH_FAILURE_LINE: &[u8] = b"sudo: Authentication failure\n";

static PASSWORD_PROMPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[Pp]assword").expect("constant regex pattern is valid"));
static WRONG_PASSWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[Ss]orry.+try.+again\.?").expect("constant regex pattern is valid")
});
static PURE_ECHO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\r\n]+$").expect("constant regex pattern is valid"));
static CONNECTION_CLOSED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([Ss]hared\s+)?[Cc]onnection\s+to\s+.+\s+closed\.?")
        .expect("constant regex pattern is valid")
});
static LOST_CONNECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[Ll]ost\sconnection").expect("constant regex pattern is valid"));

/// What to do with one chunk of remote output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkAction {
    /// Pass the chunk through as host data.
    Emit,
    /// Suppress the chunk.
    Drop,
    /// A password prompt: write the password, suppress the chunk.
    SendPassword,
    /// The password was rejected: stop this host.
    AuthFailed,
}

/// SSH client noise that never reaches the operator.
pub fn is_noise(chunk: &[u8]) -> bool {
    CONNECTION_CLOSED.is_match(chunk) || LOST_CONNECTION.is_match(chunk)
}

/// Split a buffer after every newline, dropping empty pieces.
pub fn split_after_newlines(buf: &[u8]) -> Vec<&[u8]> {
    let mut chunks = Vec::new();
    let mut start = 0;
    for (i, &b) in buf.iter().enumerate() {
        if b == b'\n' {
            chunks.push(&buf[start..=i]);
            start = i + 1;
        }
    }
    if start < buf.len() {
        chunks.push(&buf[start..]);
    }
    chunks
}

/// Per-stream interception state.
///
/// Each PTY read is treated as a unit; a prompt split across reads is not
/// re-assembled.
#[derive(Debug)]
pub struct OutputFilter {
    intercept_password: bool,
    password_sent: bool,
    skip_echo: bool,
    reads: u32,
}

impl OutputFilter {
    /// `intercept_password` is true when the raise mode expects a prompt.
    pub fn new(intercept_password: bool) -> Self {
        Self { intercept_password, password_sent: false, skip_echo: false, reads: 0 }
    }

    /// Record the start of one PTY read.
    pub fn begin_read(&mut self) {
        self.reads = self.reads.saturating_add(1);
    }

    /// True while password prompts are still looked for.
    fn in_prompt_window(&self) -> bool {
        self.reads <= PASSWORD_PROMPT_WINDOW
    }

    /// Classify one chunk and update the interception state.
    pub fn chunk_action(&mut self, chunk: &[u8]) -> ChunkAction {
        if self.intercept_password
            && !self.password_sent
            && self.in_prompt_window()
            && PASSWORD_PROMPT.is_match(chunk)
        {
            self.password_sent = true;
            self.skip_echo = true;
            return ChunkAction::SendPassword;
        }

        if self.skip_echo && PURE_ECHO.is_match(chunk) {
            self.skip_echo = false;
            return ChunkAction::Drop;
        }

        if self.password_sent && WRONG_PASSWORD.is_match(chunk) {
            return ChunkAction::AuthFailed;
        }

        if chunk.is_empty() || is_noise(chunk) {
            return ChunkAction::Drop;
        }

        ChunkAction::Emit
    }
}

#[cfg(test)]
#[path = "intercept_tests.rs"]
mod tests;
