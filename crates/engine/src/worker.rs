// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker: one task at a time, copy phase then exec phase.
//!
//! Workers share a task queue and report everything they see on the
//! message channel. A task's copy failure suppresses its exec phase; a
//! force-stop kills the child's process group between reads.

use crate::intercept::{split_after_newlines, ChunkAction, OutputFilter, AUTH_FAILURE_LINE};
use crate::pty::{PtySession, ReadOutcome, BUFFER_SIZE, POLL_DEADLINE};
use crate::runtime::Runtime;
use crate::ssh::{scp_cmd, ssh_cmd, tar_cmd};
use crate::task::{Message, MessageBody, Task, ERR_COPY_FAILED, ERR_FORCE_STOP};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use xc_core::{CopyType, ExecConfig, RaiseType};

pub(crate) struct Worker {
    pub(crate) id: usize,
    runtime: Arc<Runtime>,
    data_tx: mpsc::Sender<Message>,
    stop_rx: mpsc::Receiver<()>,
    busy: Arc<AtomicBool>,
}

impl Worker {
    pub(crate) fn new(
        id: usize,
        runtime: Arc<Runtime>,
        data_tx: mpsc::Sender<Message>,
        stop_rx: mpsc::Receiver<()>,
        busy: Arc<AtomicBool>,
    ) -> Self {
        Self { id, runtime, data_tx, stop_rx, busy }
    }

    /// Main loop: poll the shared queue until it closes or the pool shuts
    /// down.
    ///
    /// The queue lock is only held for a non-blocking `try_recv` so a
    /// force-stop can drain pending tasks at any moment.
    pub(crate) async fn run(
        mut self,
        queue: Arc<Mutex<mpsc::Receiver<Task>>>,
        shutdown: Arc<AtomicBool>,
    ) {
        tracing::debug!(worker = self.id, "worker started");
        loop {
            let polled = { queue.lock().await.try_recv() };
            let task = match polled {
                Ok(task) => task,
                Err(mpsc::error::TryRecvError::Empty) => {
                    if shutdown.load(Ordering::SeqCst) {
                        break;
                    }
                    tokio::time::sleep(POLL_DEADLINE).await;
                    continue;
                }
                Err(mpsc::error::TryRecvError::Disconnected) => break,
            };

            self.busy.store(true, Ordering::SeqCst);
            // A stop signal aimed at a previous task must not cancel this one.
            while self.stop_rx.try_recv().is_ok() {}
            self.process(&task).await;
            self.busy.store(false, Ordering::SeqCst);
        }
        tracing::debug!(worker = self.id, "task queue closed, worker exiting");
    }

    async fn process(&mut self, task: &Task) {
        tracing::debug!(worker = self.id, host = %task.hostname, "picked up task");

        if task.has_copy() {
            let status = self.copy_phase(task).await;
            tracing::debug!(worker = self.id, host = %task.hostname, status, "copy finished");
            self.send(Message::copy_finished(&task.hostname, status)).await;
            if status != 0 {
                // Without the payload in place the exec phase cannot run.
                if task.has_exec() {
                    self.send(Message::exec_finished(&task.hostname, ERR_COPY_FAILED)).await;
                }
                return;
            }
        }

        if task.has_exec() {
            let status = self.exec_phase(task).await;
            tracing::debug!(worker = self.id, host = %task.hostname, status, "exec finished");
            self.send(Message::exec_finished(&task.hostname, status)).await;
        }
    }

    /// Transfer the task's file via scp or a tar pipe.
    async fn copy_phase(&mut self, task: &Task) -> i32 {
        let config = self.runtime.config();
        let (spec, relay_as_data) = match task.copy {
            CopyType::Scp => (
                scp_cmd(
                    &config,
                    &task.hostname,
                    &task.local_filename,
                    &task.remote_filename,
                    task.recursive_copy,
                ),
                false,
            ),
            CopyType::Tar => (
                tar_cmd(&config, &task.hostname, &task.local_filename, &task.remote_filename),
                true,
            ),
        };

        let mut session = match PtySession::spawn(&spec, None) {
            Ok(session) => session,
            Err(error) => {
                tracing::debug!(worker = self.id, host = %task.hostname, %error, "copy spawn failed");
                return error.status_code();
            }
        };

        let mut buf = [0u8; BUFFER_SIZE];
        loop {
            if self.force_stopped() {
                return self.force_stop(&mut session, task).await;
            }
            match session.read_timeout(&mut buf, POLL_DEADLINE).await {
                ReadOutcome::Timeout => continue,
                ReadOutcome::Eof => break,
                ReadOutcome::Data(n) => {
                    let body = if relay_as_data {
                        MessageBody::Data(buf[..n].to_vec())
                    } else {
                        MessageBody::Debug(buf[..n].to_vec())
                    };
                    self.send(Message { hostname: task.hostname.clone(), body }).await;
                }
            }
        }

        session.wait_code().await
    }

    /// Run the task's command over `ssh -tt`, intercepting password
    /// prompts on the way.
    async fn exec_phase(&mut self, task: &Task) -> i32 {
        let config = self.runtime.config();
        let spec = ssh_cmd(&config, &task.hostname, &task.cmd);

        let mut session = match PtySession::spawn(&spec, None) {
            Ok(session) => session,
            Err(error) => {
                tracing::debug!(worker = self.id, host = %task.hostname, %error, "exec spawn failed");
                return error.status_code();
            }
        };

        let password = self.password_for(&config, &task.hostname);
        let mut filter = OutputFilter::new(config.raise != RaiseType::None);

        let mut buf = [0u8; BUFFER_SIZE];
        loop {
            if self.force_stopped() {
                return self.force_stop(&mut session, task).await;
            }
            let n = match session.read_timeout(&mut buf, POLL_DEADLINE).await {
                ReadOutcome::Timeout => continue,
                ReadOutcome::Eof => break,
                ReadOutcome::Data(n) => n,
            };

            self.send(Message::debug(&task.hostname, &buf[..n])).await;
            filter.begin_read();

            for chunk in split_after_newlines(&buf[..n]) {
                match filter.chunk_action(chunk) {
                    ChunkAction::Emit => {
                        self.send(Message::data(&task.hostname, chunk)).await;
                    }
                    ChunkAction::Drop => {}
                    ChunkAction::SendPassword => {
                        tracing::debug!(worker = self.id, host = %task.hostname, "sending password");
                        if let Err(error) = session.write_all(format!("{password}\n").as_bytes()) {
                            tracing::debug!(worker = self.id, %error, "error sending password");
                        }
                    }
                    ChunkAction::AuthFailed => {
                        self.send(Message::data(&task.hostname, AUTH_FAILURE_LINE)).await;
                        session.kill_group();
                        session.wait_code().await;
                        return crate::task::ERR_AUTHENTICATION;
                    }
                }
            }
        }

        session.wait_code().await
    }

    fn password_for(&self, config: &ExecConfig, hostname: &str) -> String {
        if config.raise == RaiseType::None {
            return String::new();
        }
        self.runtime.password_for(hostname)
    }

    fn force_stopped(&mut self) -> bool {
        self.stop_rx.try_recv().is_ok()
    }

    async fn force_stop(&mut self, session: &mut PtySession, task: &Task) -> i32 {
        tracing::debug!(worker = self.id, host = %task.hostname, "task force stopped");
        session.kill_group();
        session.wait_code().await;
        ERR_FORCE_STOP
    }

    async fn send(&self, message: Message) {
        // A dispatcher that went away just discards the stream.
        let _ = self.data_tx.send(message).await;
    }
}
