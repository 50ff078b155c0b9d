// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PTY-backed child processes.
//!
//! Every remote phase runs under a pseudo-terminal so `ssh -tt` can
//! deliver interactive password prompts. The master side is owned here:
//! a non-blocking reader registered with the tokio reactor plus a
//! duplicated writer for password injection and stdin forwarding.

use crate::ssh::CommandSpec;
use crate::task::{ERR_COMMAND_START_FAILED, ERR_MACOS_EXIT, ERR_TERMINAL_ERROR};
use nix::pty::{openpty, Winsize};
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use std::io;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};
use std::time::Duration;
use thiserror::Error;
use tokio::io::unix::AsyncFd;
use tokio::process::{Child, Command};

/// Deadline for one PTY read; the stop channel is polled in between.
pub const POLL_DEADLINE: Duration = Duration::from_millis(50);
/// PTY read buffer size.
pub const BUFFER_SIZE: usize = 4096;
/// Bounded retries for EAGAIN on writes to a shared terminal.
pub const WRITE_RETRY: u32 = 25;

/// Locale handed to every child so remote prompts stay recognizable.
const CHILD_ENVIRONMENT: &[(&str, &str)] =
    &[("LC_ALL", "en_US.UTF-8"), ("LANG", "en_US.UTF-8")];

nix::ioctl_read_bad!(tiocgwinsz, libc::TIOCGWINSZ, Winsize);
nix::ioctl_write_ptr_bad!(tiocswinsz, libc::TIOCSWINSZ, Winsize);

/// PTY or process setup failure.
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("terminal setup failed: {0}")]
    Terminal(#[source] io::Error),
    #[error("failed to start command: {0}")]
    Start(#[source] io::Error),
}

impl SpawnError {
    /// Status code reported for the host.
    pub fn status_code(&self) -> i32 {
        match self {
            SpawnError::Terminal(_) => ERR_TERMINAL_ERROR,
            SpawnError::Start(_) => ERR_COMMAND_START_FAILED,
        }
    }
}

/// Outcome of one deadline-bounded PTY read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// `n` bytes were read.
    Data(usize),
    /// The deadline elapsed without data.
    Timeout,
    /// The stream is finished (child closed its side).
    Eof,
}

/// A child process with its controlling PTY master.
pub struct PtySession {
    master: AsyncFd<OwnedFd>,
    writer: OwnedFd,
    child: Child,
}

impl PtySession {
    /// Allocate a PTY and spawn the command on its slave side.
    ///
    /// The child starts its own session with the slave as controlling
    /// terminal, so a force-stop can kill the whole remote pipeline via
    /// its process group.
    pub fn spawn(spec: &CommandSpec, winsize: Option<Winsize>) -> Result<Self, SpawnError> {
        let pty = openpty(winsize.as_ref(), None)
            .map_err(|e| SpawnError::Terminal(io::Error::from(e)))?;

        set_nonblocking(pty.master.as_raw_fd()).map_err(SpawnError::Terminal)?;
        let writer = pty.master.try_clone().map_err(SpawnError::Terminal)?;

        let slave_out = pty.slave.try_clone().map_err(SpawnError::Terminal)?;
        let slave_err = pty.slave.try_clone().map_err(SpawnError::Terminal)?;

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(pty.slave)
            .stdout(slave_out)
            .stderr(slave_err)
            .kill_on_drop(true);
        for (key, value) in CHILD_ENVIRONMENT {
            cmd.env(key, value);
        }
        unsafe {
            cmd.pre_exec(|| {
                if libc::setsid() < 0 {
                    return Err(io::Error::last_os_error());
                }
                // stdin is the PTY slave at this point.
                if libc::ioctl(0, libc::TIOCSCTTY as _, 0) < 0 {
                    return Err(io::Error::last_os_error());
                }
                Ok(())
            });
        }

        let child = cmd.spawn().map_err(SpawnError::Start)?;
        let master = AsyncFd::new(pty.master).map_err(SpawnError::Terminal)?;

        Ok(Self { master, writer, child })
    }

    /// Read with a deadline so callers can poll their stop channel.
    pub async fn read_timeout(&mut self, buf: &mut [u8], deadline: Duration) -> ReadOutcome {
        match tokio::time::timeout(deadline, self.read_once(buf)).await {
            Ok(outcome) => outcome,
            Err(_) => ReadOutcome::Timeout,
        }
    }

    async fn read_once(&mut self, buf: &mut [u8]) -> ReadOutcome {
        loop {
            let mut guard = match self.master.readable_mut().await {
                Ok(guard) => guard,
                Err(_) => return ReadOutcome::Eof,
            };
            match guard.try_io(|inner| raw_read(inner.get_ref().as_raw_fd(), buf)) {
                Ok(Ok(0)) => return ReadOutcome::Eof,
                Ok(Ok(n)) => return ReadOutcome::Data(n),
                // A PTY master reads EIO once the slave side is gone.
                Ok(Err(_)) => return ReadOutcome::Eof,
                Err(_would_block) => continue,
            }
        }
    }

    /// Write to the child's terminal, retrying a bounded number of EAGAINs.
    pub fn write_all(&self, data: &[u8]) -> io::Result<()> {
        write_fd_all(self.writer.as_raw_fd(), data)
    }

    /// A duplicated writer handle onto the child's terminal.
    pub fn writer_fd(&self) -> io::Result<OwnedFd> {
        self.writer.try_clone()
    }

    /// Kill the child's process group.
    pub fn kill_group(&mut self) {
        if let Some(pid) = self.child.id() {
            let _ = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL);
        }
        let _ = self.child.start_kill();
    }

    /// Reap the child and map its exit status to an engine code.
    pub async fn wait_code(&mut self) -> i32 {
        match self.child.wait().await {
            // Signal death carries no exit code.
            Ok(status) => status.code().unwrap_or(ERR_MACOS_EXIT),
            Err(_) => ERR_MACOS_EXIT,
        }
    }

    /// Copy the window size of `fd` (the operator's terminal) onto the PTY.
    pub fn inherit_winsize(&self, fd: RawFd) {
        if let Some(size) = query_winsize(fd) {
            let _ = unsafe { tiocswinsz(self.master.get_ref().as_raw_fd(), &size) };
        }
    }
}

/// Current window size of a terminal fd, if it is one.
pub fn query_winsize(fd: RawFd) -> Option<Winsize> {
    let mut size = Winsize { ws_row: 0, ws_col: 0, ws_xpixel: 0, ws_ypixel: 0 };
    match unsafe { tiocgwinsz(fd, &mut size) } {
        Ok(_) => Some(size),
        Err(_) => None,
    }
}

/// Write all bytes to a raw fd with bounded EAGAIN retries.
pub(crate) fn write_fd_all(fd: RawFd, data: &[u8]) -> io::Result<()> {
    let mut written = 0;
    let mut retries = 0;
    while written < data.len() {
        let rest = &data[written..];
        let res = unsafe { libc::write(fd, rest.as_ptr().cast(), rest.len()) };
        if res < 0 {
            let error = io::Error::last_os_error();
            if error.kind() == io::ErrorKind::WouldBlock && retries < WRITE_RETRY {
                retries += 1;
                std::thread::sleep(Duration::from_millis(1));
                continue;
            }
            if error.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(error);
        }
        written += res as usize;
    }
    Ok(())
}

pub(crate) fn raw_read(fd: RawFd, buf: &mut [u8]) -> io::Result<usize> {
    let res = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
    if res < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(res as usize)
}

fn set_nonblocking(fd: RawFd) -> io::Result<()> {
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    if unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
