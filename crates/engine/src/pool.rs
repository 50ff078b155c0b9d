// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded worker pool over one task queue and one message channel.

use crate::runtime::Runtime;
use crate::task::{Message, Task};
use crate::worker::Worker;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Capacity of the task queue and the message channel. Enqueueing more
/// tasks than this blocks the producer, which is why dispatchers enqueue
/// from a separate task.
pub const DATA_QUEUE_SIZE: usize = 1024;

struct WorkerHandle {
    stop_tx: mpsc::Sender<()>,
    busy: Arc<AtomicBool>,
    join: JoinHandle<()>,
}

/// Result of a force-stop sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForceStopped {
    /// Workers that were busy and received a stop signal.
    pub stopped_workers: usize,
    /// Queued tasks removed before any worker claimed them.
    pub drained_tasks: usize,
}

pub struct Pool {
    task_tx: mpsc::Sender<Task>,
    queue: Arc<Mutex<mpsc::Receiver<Task>>>,
    shutdown: Arc<AtomicBool>,
    workers: Vec<WorkerHandle>,
}

impl Pool {
    /// Create a pool of `size` workers. Returns the pool and the message
    /// channel receiver the dispatcher demultiplexes.
    pub fn new(runtime: Arc<Runtime>, size: usize) -> (Self, mpsc::Receiver<Message>) {
        let (task_tx, task_rx) = mpsc::channel(DATA_QUEUE_SIZE);
        let (data_tx, data_rx) = mpsc::channel(DATA_QUEUE_SIZE);
        let queue = Arc::new(Mutex::new(task_rx));
        let shutdown = Arc::new(AtomicBool::new(false));

        let size = size.max(1);
        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            let (stop_tx, stop_rx) = mpsc::channel(1);
            let busy = Arc::new(AtomicBool::new(false));
            let worker =
                Worker::new(id + 1, runtime.clone(), data_tx.clone(), stop_rx, busy.clone());
            let join = tokio::spawn(worker.run(queue.clone(), shutdown.clone()));
            workers.push(WorkerHandle { stop_tx, busy, join });
        }
        tracing::debug!(size, queue = DATA_QUEUE_SIZE, "execution pool created");

        (Self { task_tx, queue, shutdown, workers }, data_rx)
    }

    /// Sender half of the task queue, for enqueue tasks.
    pub fn task_sender(&self) -> mpsc::Sender<Task> {
        self.task_tx.clone()
    }

    /// Enqueue one task. Returns false when the pool is closed.
    pub async fn add_task(&self, task: Task) -> bool {
        self.task_tx.send(task).await.is_ok()
    }

    /// Drain all tasks nobody claimed yet, then signal every busy worker.
    pub async fn force_stop_all_tasks(&self) -> ForceStopped {
        tracing::debug!("force stopping all tasks");
        let mut result = ForceStopped::default();

        {
            let mut queue = self.queue.lock().await;
            while queue.try_recv().is_ok() {
                result.drained_tasks += 1;
            }
        }
        tracing::debug!(drained = result.drained_tasks, "removed queued tasks");

        for worker in &self.workers {
            if worker.busy.load(Ordering::SeqCst) {
                let _ = worker.stop_tx.try_send(());
                result.stopped_workers += 1;
            }
        }
        result
    }

    /// Number of workers.
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Force-stop everything and wait for the workers to exit.
    pub async fn close(self) {
        tracing::debug!("closing execution pool");
        self.force_stop_all_tasks().await;
        self.shutdown.store(true, Ordering::SeqCst);
        let Self { task_tx, queue: _, shutdown: _, workers } = self;
        drop(task_tx);
        for worker in workers {
            let _ = worker.join.await;
        }
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
