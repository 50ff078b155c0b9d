// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parallel mode: fan out the script, stream interleaved output live.

use super::{
    debug_stream, drain_stale, enqueue_tasks, interrupt_signal, print_host_data, script_tasks,
    sigint_recv,
};
use crate::pool::Pool;
use crate::result::ExecResult;
use crate::runtime::Runtime;
use crate::script::create_script;
use crate::task::{Message, MessageBody};
use crate::term;
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
                        if status == 0 {
                            copied += 1;
                        }
                    }
                    MessageBody::ExecFinished(status) => {
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
                    // Tasks that never ran produce no ExecFinished.
                    let never_enqueued = hosts.len().saturating_sub(enqueue.enqueued());
                    running = running.saturating_sub(stopped.drained_tasks + never_enqueued);
                }
            }
        }
    }

    tracing::debug!(copied, processed = result.processed(), "parallel run finished");
    result
}
