// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution modes: how the message stream becomes operator output.

pub(crate) mod collapse;
pub(crate) mod distribute;
pub(crate) mod parallel;
pub(crate) mod serial;

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;

use crate::pool::Pool;
use crate::runtime::Runtime;
use crate::script::Script;
use crate::task::{Message, Task};
use crate::term;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use xc_core::{CopyType, ExecConfig};

/// Discard messages left over from a previously interrupted run.
pub(crate) fn drain_stale(data: &mut mpsc::Receiver<Message>) {
    while data.try_recv().is_ok() {}
}

/// SIGINT stream for the duration of a run; None when registration fails.
pub(crate) fn interrupt_signal() -> Option<Signal> {
    signal(SignalKind::interrupt()).ok()
}

/// Await a SIGINT, pending forever when no stream is available.
pub(crate) async fn sigint_recv(sig: &mut Option<Signal>) {
    match sig {
        Some(sig) => {
            sig.recv().await;
        }
        None => std::future::pending().await,
    }
}

/// Background task feeding the pool, with a count of tasks actually
/// enqueued so an abort can settle the dispatcher's accounting.
pub(crate) struct EnqueueHandle {
    join: JoinHandle<()>,
    enqueued: Arc<AtomicUsize>,
}

impl EnqueueHandle {
    pub(crate) fn abort(&self) {
        self.join.abort();
    }

    pub(crate) fn enqueued(&self) -> usize {
        self.enqueued.load(Ordering::SeqCst)
    }
}

/// Enqueue from a separate task: with more hosts than queue capacity the
/// send blocks until workers free up space.
pub(crate) fn enqueue_tasks(pool: &Pool, tasks: Vec<Task>) -> EnqueueHandle {
    let sender = pool.task_sender();
    let enqueued = Arc::new(AtomicUsize::new(0));
    let counter = enqueued.clone();
    let join = tokio::spawn(async move {
        for task in tasks {
            if sender.send(task).await.is_err() {
                break;
            }
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });
    EnqueueHandle { join, enqueued }
}

/// One copy+exec task per host for a generated script.
pub(crate) fn script_tasks(script: &Script, hosts: &[String]) -> Vec<Task> {
    let local = script.local_path().to_string_lossy().into_owned();
    hosts
        .iter()
        .map(|host| {
            let remote = script.remote_path(host);
            Task {
                hostname: host.clone(),
                local_filename: local.clone(),
                remote_filename: remote.clone(),
                recursive_copy: false,
                cmd: remote,
                copy: CopyType::Scp,
            }
        })
        .collect()
}

/// Print one live output line, newline-terminated and optionally host
/// prefixed, mirroring it to the output log.
pub(crate) fn print_host_data(
    runtime: &Runtime,
    config: &ExecConfig,
    hostname: &str,
    data: &[u8],
) {
    let mut line = data.to_vec();
    if !line.ends_with(b"\n") {
        line.push(b'\n');
    }
    let mut stdout = std::io::stdout();
    if config.prepend_hostnames {
        let _ = write!(stdout, "{}: ", term::blue(hostname));
    }
    let _ = stdout.write_all(&line);
    let _ = stdout.flush();
    runtime.log_host_output(hostname, &line);
}

/// Log a raw stream message when debug mode is on.
pub(crate) fn debug_stream(config: &ExecConfig, hostname: &str, data: &[u8]) {
    if config.debug {
        tracing::debug!(host = hostname, data = %String::from_utf8_lossy(data), "stream");
    }
}
