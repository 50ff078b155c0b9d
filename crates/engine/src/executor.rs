// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executor: one pool, one message stream, the four run modes.
//!
//! Callers resolve a host list first (via `xc-inventory`), then hand it
//! here. Live output is printed by the dispatchers; summary and collapse
//! group rendering stay with the caller ([`ExecResult::print_summary`],
//! [`ExecResult::print_output_map`]).

use crate::dispatch;
use crate::pool::Pool;
use crate::result::ExecResult;
use crate::runtime::Runtime;
use crate::task::Message;
use std::sync::Arc;
use tokio::sync::mpsc;
use xc_core::ExecMode;

pub struct Executor {
    runtime: Arc<Runtime>,
    pool: Pool,
    data: mpsc::Receiver<Message>,
}

impl Executor {
    /// Create an executor with a pool sized from the configuration.
    pub fn new(runtime: Arc<Runtime>) -> Self {
        let size = runtime.config().pool_size;
        let (pool, data) = Pool::new(runtime.clone(), size);
        Self { runtime, pool, data }
    }

    pub fn runtime(&self) -> Arc<Runtime> {
        self.runtime.clone()
    }

    /// Run a command on the hosts in the given mode.
    pub async fn run(&mut self, mode: ExecMode, hosts: &[String], cmd: &str) -> ExecResult {
        match mode {
            ExecMode::Serial => dispatch::serial::run(&self.runtime, hosts, cmd).await,
            ExecMode::Parallel => {
                dispatch::parallel::run(&self.runtime, &self.pool, &mut self.data, hosts, cmd)
                    .await
            }
            ExecMode::Collapse => {
                dispatch::collapse::run(&self.runtime, &self.pool, &mut self.data, hosts, cmd)
                    .await
            }
        }
    }

    /// Copy a local file or directory to the hosts.
    pub async fn distribute(
        &mut self,
        hosts: &[String],
        local_filename: &str,
        remote_filename: &str,
        recursive: bool,
    ) -> ExecResult {
        dispatch::distribute::run(
            &self.runtime,
            &self.pool,
            &mut self.data,
            hosts,
            local_filename,
            remote_filename,
            recursive,
        )
        .await
    }

    /// Replace the pool with a differently sized one.
    ///
    /// Pending tasks of the old pool are discarded.
    pub async fn set_pool_size(&mut self, size: usize) {
        self.runtime.update_config(|config| config.pool_size = size);
        let (pool, data) = Pool::new(self.runtime.clone(), size);
        let old_pool = std::mem::replace(&mut self.pool, pool);
        self.data = data;
        old_pool.close().await;
    }

    pub fn pool_size(&self) -> usize {
        self.pool.size()
    }

    /// Force-stop everything and shut the pool down.
    pub async fn close(self) {
        self.pool.close().await;
    }
}
