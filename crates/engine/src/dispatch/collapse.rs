// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collapse mode: buffer per-host output, group hosts by identical output.

use super::{
    debug_stream, drain_stale, enqueue_tasks, interrupt_signal, script_tasks, sigint_recv,
};
use crate::pool::Pool;
use crate::result::ExecResult;
use crate::runtime::Runtime;
use crate::script::create_script;
use crate::task::{Message, MessageBody};
use crate::term::{self, Progress};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

pub(crate) async fn run(
    runtime: &Arc<Runtime>,
    pool: &Pool,
    data: &mut mpsc::Receiver<Message>,
    hosts: &[String],
    cmd: &str,
) -> ExecResult {
    let mut result = ExecResult::default();
    if hosts.is_empty() {
        return result;
    }

    let config = runtime.config();
    let script = match create_script(&config, cmd) {
        Ok(script) => script,
        Err(error) => {
            term::errorf(&format!("Error creating temporary file: {error}\n"));
            return result;
        }
    };

    drain_stale(data);
    let enqueue = enqueue_tasks(pool, script_tasks(&script, hosts));

    let mut sigint = interrupt_signal();
    let mut running = hosts.len();
    let mut copied = 0usize;
    let mut interrupted = false;
    let mut buffered: HashMap<String, String> = HashMap::new();
    let mut progress = Progress::start(running, config.progress_bar);

    while running > 0 {
        tokio::select! {
            maybe = data.recv() => {
                let Some(message) = maybe else { break };
                match message.body {
                    MessageBody::Data(bytes) => {
                        buffered
                            .entry(message.hostname.clone())
                            .or_default()
                            .push_str(&String::from_utf8_lossy(&bytes));
                        let mut line = bytes;
                        if !line.ends_with(b"\n") {
                            line.push(b'\n');
                        }
                        runtime.log_host_output(&message.hostname, &line);
                    }
                    MessageBody::Debug(bytes) => {
                        debug_stream(&config, &message.hostname, &bytes);
                    }
                    MessageBody::CopyFinished(status) => {
                        if status == 0 {
                            copied += 1;
                        }
                    }
                    MessageBody::ExecFinished(status) => {
                        progress.increment();
                        result.record(&message.hostname, status);
                        running -= 1;
                    }
                }
            }
            _ = sigint_recv(&mut sigint) => {
                println!();
                enqueue.abort();
                let stopped = pool.force_stop_all_tasks().await;
                if !interrupted {
                    interrupted = true;
                    result.force_stopped = stopped.stopped_workers;
                    let never_enqueued = hosts.len().saturating_sub(enqueue.enqueued());
                    running = running.saturating_sub(stopped.drained_tasks + never_enqueued);
                }
            }
        }
    }

    progress.finish();

    // Group hosts by identical accumulated output, in host-list order.
    for host in hosts {
        if let Some(output) = buffered.remove(host) {
            result.outputs.entry(output).or_default().push(host.clone());
        }
    }

    tracing::debug!(
        copied,
        groups = result.outputs.len(),
        processed = result.processed(),
        "collapse run finished"
    );
    result
}
