// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! xc-engine: PTY-backed SSH execution engine.
//!
//! A [`Pool`] of workers drives SSH child processes on pseudo-terminals,
//! multiplexing their output into one typed [`Message`] stream. The
//! dispatchers in [`dispatch`] impose the serial / parallel / collapse /
//! distribute policies on top and fold the stream into an [`ExecResult`].

pub mod dispatch;
pub mod executor;
pub mod intercept;
pub mod output_log;
pub mod pool;
pub mod pty;
pub mod result;
pub mod runtime;
pub mod script;
pub mod ssh;
pub mod task;
pub mod term;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_util;

pub use executor::Executor;
pub use pool::Pool;
pub use result::ExecResult;
pub use runtime::{PasswordProvider, Runtime};
pub use pool::ForceStopped;
pub use task::{
    Message, MessageBody, Task, ERR_AUTHENTICATION, ERR_COMMAND_START_FAILED, ERR_COPY_FAILED,
    ERR_FORCE_STOP, ERR_MACOS_EXIT, ERR_TERMINAL_ERROR,
};
