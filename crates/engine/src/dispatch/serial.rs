// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Serial mode: one host at a time, fully interactive.
//!
//! The operator's terminal is put into raw mode and proxied to the remote
//! PTY: keystrokes flow in, remote output flows out through the same
//! password/noise interception the pool workers use. SIGINT during the
//! inter-host delay terminates the whole run; during a session the ^C
//! byte travels to the remote side like any other key.

use super::{interrupt_signal, sigint_recv};
use crate::intercept::{ChunkAction, OutputFilter};
use crate::pty::{
    query_winsize, write_fd_all, PtySession, ReadOutcome, BUFFER_SIZE, POLL_DEADLINE,
};
use crate::result::ExecResult;
use crate::runtime::Runtime;
use crate::script::{create_script, Script};
use crate::ssh::{scp_cmd, ssh_cmd};
use crate::task::{ERR_AUTHENTICATION, ERR_COPY_FAILED, ERR_TERMINAL_ERROR};
use crate::term;
use nix::sys::termios::{cfmakeraw, tcgetattr, tcsetattr, SetArg, Termios};
use std::os::fd::{AsFd, AsRawFd, OwnedFd};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::unix::AsyncFd;
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinHandle;
use xc_core::RaiseType;

pub(crate) async fn run(runtime: &Arc<Runtime>, hosts: &[String], cmd: &str) -> ExecResult {
    let mut result = ExecResult::default();
    let config = runtime.config();

    let script: Option<Script> = if cmd.is_empty() {
        None
    } else {
        match create_script(&config, cmd) {
            Ok(script) => Some(script),
            Err(error) => {
                term::errorf(&format!("Error creating tempfile: {error}\n"));
                return result;
            }
        }
    };

    let mut sigint = interrupt_signal();

    for (i, host) in hosts.iter().enumerate() {
        let banner =
            format!("{} {} {}", term::hr(7), host, term::hr(36 - host.len() as isize));
        println!("{}", term::blue(&banner));

        let mut remote_cmd = String::new();
        if let Some(script) = &script {
            let local = script.local_path().to_string_lossy();
            let remote = script.remote_path(host);
            if let Err(error) = copy_script(&config, host, &local, &remote).await {
                term::errorf(&format!("Error copying tempfile: {error}\n"));
                result.record(host, ERR_COPY_FAILED);
                continue;
            }
            remote_cmd = remote;
        }

        let code = run_at_host(runtime, host, &remote_cmd).await;
        result.record(host, code);

        // No delay after the last host.
        if config.delay > 0 && i != hosts.len() - 1 {
            tokio::select! {
                _ = sigint_recv(&mut sigint) => {
                    tracing::debug!("delay interrupted by ^C");
                    break;
                }
                _ = tokio::time::sleep(Duration::from_secs(config.delay)) => {}
            }
        }
    }

    result
}

/// Blocking scp of the generated script, output discarded.
async fn copy_script(
    config: &xc_core::ExecConfig,
    host: &str,
    local: &str,
    remote: &str,
) -> std::io::Result<()> {
    let spec = scp_cmd(config, host, local, remote, false);
    let status = tokio::process::Command::new(&spec.program)
        .args(&spec.args)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await?;
    if !status.success() {
        return Err(std::io::Error::other(format!("scp exited with {status}")));
    }
    Ok(())
}

/// Attach the operator's terminal to one host's SSH session.
async fn run_at_host(runtime: &Arc<Runtime>, host: &str, remote_cmd: &str) -> i32 {
    let config = runtime.config();
    let spec = ssh_cmd(&config, host, remote_cmd);

    let winsize = query_winsize(libc::STDIN_FILENO);
    let mut session = match PtySession::spawn(&spec, winsize) {
        Ok(session) => session,
        Err(error) => {
            term::errorf(&format!("Error creating PTY: {error}\n"));
            return error.status_code();
        }
    };

    let raw = match RawStdinGuard::new() {
        Ok(guard) => guard,
        Err(error) => {
            term::errorf(&format!("Error setting stdin to raw mode: {error}\n"));
            session.kill_group();
            session.wait_code().await;
            return ERR_TERMINAL_ERROR;
        }
    };

    let (winch_flag, winch_task) = watch_window_change();
    let pump = match session.writer_fd() {
        Ok(writer) => Some(spawn_stdin_pump(writer)),
        Err(_) => None,
    };

    let password = runtime.password_for(host);
    let mut filter = OutputFilter::new(config.raise != RaiseType::None);
    let mut buf = [0u8; BUFFER_SIZE];
    let mut auth_failed = false;

    loop {
        if winch_flag.swap(false, Ordering::SeqCst) {
            session.inherit_winsize(libc::STDIN_FILENO);
        }

        let n = match session.read_timeout(&mut buf, POLL_DEADLINE).await {
            ReadOutcome::Timeout => continue,
            ReadOutcome::Eof => break,
            ReadOutcome::Data(n) => n,
        };

        // Serial mode filters whole reads; line splitting would garble
        // interactive applications.
        filter.begin_read();
        match filter.chunk_action(&buf[..n]) {
            ChunkAction::Emit => {
                // stdout shares the raw non-blocking terminal with stdin,
                // hence the bounded retry inside.
                let _ = write_fd_all(libc::STDOUT_FILENO, &buf[..n]);
            }
            ChunkAction::Drop => {}
            ChunkAction::SendPassword => {
                if let Err(error) = session.write_all(format!("{password}\n").as_bytes()) {
                    tracing::debug!(%error, "error sending password");
                }
            }
            ChunkAction::AuthFailed => {
                auth_failed = true;
                break;
            }
        }
    }

    if let Some(pump) = pump {
        pump.abort();
    }
    if let Some(task) = winch_task {
        task.abort();
    }
    drop(raw);

    if auth_failed {
        session.kill_group();
        session.wait_code().await;
        term::errorf(&format!("Wrong {} password\n", config.raise));
        return ERR_AUTHENTICATION;
    }

    session.wait_code().await
}

/// RAII guard putting stdin into raw non-blocking mode, restored on drop.
struct RawStdinGuard {
    original: Termios,
    flags: libc::c_int,
}

impl RawStdinGuard {
    fn new() -> std::io::Result<Self> {
        let stdin = std::io::stdin();
        let original = tcgetattr(&stdin).map_err(std::io::Error::from)?;
        let mut raw = original.clone();
        cfmakeraw(&mut raw);
        tcsetattr(&stdin, SetArg::TCSANOW, &raw).map_err(std::io::Error::from)?;

        let flags = unsafe { libc::fcntl(libc::STDIN_FILENO, libc::F_GETFL) };
        if flags < 0 {
            return Err(std::io::Error::last_os_error());
        }
        if unsafe { libc::fcntl(libc::STDIN_FILENO, libc::F_SETFL, flags | libc::O_NONBLOCK) } < 0
        {
            return Err(std::io::Error::last_os_error());
        }
        Ok(Self { original, flags })
    }
}

impl Drop for RawStdinGuard {
    fn drop(&mut self) {
        let stdin = std::io::stdin();
        let _ = tcsetattr(&stdin, SetArg::TCSANOW, &self.original);
        unsafe {
            libc::fcntl(libc::STDIN_FILENO, libc::F_SETFL, self.flags);
        }
    }
}

/// Flag raised whenever the operator's terminal is resized.
fn watch_window_change() -> (Arc<AtomicBool>, Option<JoinHandle<()>>) {
    let flag = Arc::new(AtomicBool::new(false));
    let task = match signal(SignalKind::window_change()) {
        Ok(mut sig) => {
            let flag = flag.clone();
            Some(tokio::spawn(async move {
                while sig.recv().await.is_some() {
                    flag.store(true, Ordering::SeqCst);
                }
            }))
        }
        Err(_) => None,
    };
    (flag, task)
}

/// Pump the operator's keystrokes into the child's PTY.
fn spawn_stdin_pump(writer: OwnedFd) -> JoinHandle<()> {
    tokio::spawn(async move {
        let Ok(dup) = std::io::stdin().as_fd().try_clone_to_owned() else {
            return;
        };
        let Ok(stdin) = AsyncFd::new(dup) else {
            return;
        };
        let mut buf = [0u8; BUFFER_SIZE];
        loop {
            let Ok(mut guard) = stdin.readable().await else {
                return;
            };
            match guard.try_io(|inner| crate::pty::raw_read(inner.get_ref().as_raw_fd(), &mut buf))
            {
                Ok(Ok(0)) => return,
                Ok(Ok(n)) => {
                    let _ = write_fd_all(writer.as_raw_fd(), &buf[..n]);
                }
                Ok(Err(_)) => return,
                Err(_would_block) => continue,
            }
        }
    })
}
