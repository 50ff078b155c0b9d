// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Distribute mode: copy-only fan-out, no exec phase.

use super::{
    debug_stream, drain_stale, enqueue_tasks, interrupt_signal, print_host_data, sigint_recv,
};
use crate::pool::Pool;
use crate::result::ExecResult;
use crate::runtime::Runtime;
use crate::task::{Message, MessageBody, Task};
use crate::term::Progress;
use std::sync::Arc;
use tokio::sync::mpsc;

pub(crate) async fn run(
    runtime: &Arc<Runtime>,
    pool: &Pool,
    data: &mut mpsc::Receiver<Message>,
    hosts: &[String],
    local_filename: &str,
    remote_filename: &str,
    recursive: bool,
) -> ExecResult {
    let mut result = ExecResult::default();
    if hosts.is_empty() {
        return result;
    }

    let config = runtime.config();
    let tasks: Vec<Task> = hosts
        .iter()
        .map(|host| Task {
            hostname: host.clone(),
            local_filename: local_filename.to_string(),
            remote_filename: remote_filename.to_string(),
            recursive_copy: recursive,
            cmd: String::new(),
            copy: config.copy_type,
        })
        .collect();

    drain_stale(data);
    let enqueue = enqueue_tasks(pool, tasks);

    let mut sigint = interrupt_signal();
    let mut running = hosts.len();
    let mut interrupted = false;
    let mut progress = Progress::start(running, config.progress_bar);

    while running > 0 {
        tokio::select! {
            maybe = data.recv() => {
                let Some(message) = maybe else { break };
                match message.body {
                    MessageBody::Data(bytes) => {
                        print_host_data(runtime, &config, &message.hostname, &bytes);
                    }
                    MessageBody::Debug(bytes) => {
                        debug_stream(&config, &message.hostname, &bytes);
                    }
                    MessageBody::CopyFinished(status) => {
                        progress.increment();
                        result.record(&message.hostname, status);
                        running -= 1;
                    }
                    MessageBody::ExecFinished(_) => {}
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
    result
}
