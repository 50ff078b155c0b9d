// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatcher tests driving the executor end to end over stub binaries.

use crate::executor::Executor;
use crate::test_util::{stub_runtime, StubBin};
use crate::Runtime;
use xc_core::{CopyType, ExecMode};

fn hostnames(hosts: &[&str]) -> Vec<String> {
    hosts.iter().map(|h| h.to_string()).collect()
}

fn quiet(runtime: &std::sync::Arc<Runtime>) {
    runtime.update_config(|config| {
        config.prepend_hostnames = false;
        config.progress_bar = false;
    });
}

#[tokio::test]
async fn parallel_runs_every_host() {
    let bin = StubBin::new();
    let runtime = stub_runtime(&bin, "echo hello");
    quiet(&runtime);
    let mut executor = Executor::new(runtime);

    let hosts = hostnames(&["h1", "h2", "h3"]);
    let result = executor.run(ExecMode::Parallel, &hosts, "uptime").await;

    assert_eq!(result.processed(), 3);
    let mut success = result.success_hosts.clone();
    success.sort();
    assert_eq!(success, hosts);
    assert!(result.error_hosts.is_empty());
    assert_eq!(result.codes["h2"], 0);

    executor.close().await;
}

#[tokio::test]
async fn parallel_separates_failing_hosts() {
    let bin = StubBin::new();
    // Exit code depends on the target host buried in the argv.
    let body = r#"case "$*" in
  *bad1*) exit 5 ;;
  *) echo fine; exit 0 ;;
esac"#;
    let runtime = stub_runtime(&bin, body);
    quiet(&runtime);
    let mut executor = Executor::new(runtime);

    let hosts = hostnames(&["good1", "bad1"]);
    let result = executor.run(ExecMode::Parallel, &hosts, "uptime").await;

    assert_eq!(result.success_hosts, vec!["good1"]);
    assert_eq!(result.error_hosts, vec!["bad1"]);
    assert_eq!(result.codes["bad1"], 5);

    executor.close().await;
}

#[tokio::test]
async fn parallel_with_empty_hostlist_is_a_noop() {
    let bin = StubBin::new();
    let runtime = stub_runtime(&bin, "echo hello");
    quiet(&runtime);
    let mut executor = Executor::new(runtime);

    let result = executor.run(ExecMode::Parallel, &[], "uptime").await;
    assert_eq!(result.processed(), 0);

    executor.close().await;
}

#[tokio::test]
async fn collapse_groups_hosts_by_identical_output() {
    let bin = StubBin::new();
    let body = r#"case "$*" in
  *odd*) echo variant-a ;;
  *) echo variant-b ;;
esac"#;
    let runtime = stub_runtime(&bin, body);
    quiet(&runtime);
    let mut executor = Executor::new(runtime);

    let hosts = hostnames(&["odd1", "odd2", "even1"]);
    let result = executor.run(ExecMode::Collapse, &hosts, "uptime").await;

    assert_eq!(result.processed(), 3);
    assert_eq!(result.outputs.len(), 2);

    let group_a = result
        .outputs
        .iter()
        .find(|(output, _)| output.contains("variant-a"))
        .map(|(_, hosts)| hosts.clone())
        .expect("variant-a group");
    assert_eq!(group_a, vec!["odd1", "odd2"]);

    executor.close().await;
}

#[tokio::test]
async fn distribute_records_per_host_copy_status() {
    let bin = StubBin::new();
    let runtime = stub_runtime(&bin, "echo unused");
    quiet(&runtime);
    runtime.update_config(|config| config.copy_type = CopyType::Scp);
    let mut executor = Executor::new(runtime);

    let local = bin.path().join("artifact");
    std::fs::write(&local, b"payload").unwrap();

    let hosts = hostnames(&["h1", "h2"]);
    let result = executor
        .distribute(&hosts, &local.to_string_lossy(), "/tmp/artifact", false)
        .await;

    assert_eq!(result.processed(), 2);
    assert!(result.error_hosts.is_empty());

    executor.close().await;
}

#[tokio::test]
async fn distribute_reports_failed_copies() {
    let bin = StubBin::new();
    // Tar copy: the ssh leg of the pipe fails.
    let runtime = stub_runtime(&bin, "cat >/dev/null; exit 2");
    quiet(&runtime);
    runtime.update_config(|config| config.copy_type = CopyType::Tar);
    let mut executor = Executor::new(runtime);

    let local = bin.path().join("artifact");
    std::fs::write(&local, b"payload").unwrap();

    let hosts = hostnames(&["h1"]);
    let result = executor
        .distribute(&hosts, &local.to_string_lossy(), "/tmp/artifact", false)
        .await;

    assert_eq!(result.error_hosts, vec!["h1"]);
    assert_ne!(result.codes["h1"], 0);

    executor.close().await;
}

#[tokio::test]
async fn resolved_host_list_runs_in_parallel() {
    // Full data flow: expression → inventory → dispatcher → pool.
    let inventory =
        xc_inventory::Inventory::create(xc_inventory::test_support::fixture_backend()).unwrap();
    let hosts = inventory.host_list("*workgroup,-%group3").unwrap();
    assert_eq!(hosts.len(), 3);

    let bin = StubBin::new();
    let runtime = stub_runtime(&bin, "echo resolved");
    quiet(&runtime);
    let mut executor = Executor::new(runtime);

    let result = executor.run(ExecMode::Parallel, &hosts, "uptime").await;
    assert_eq!(result.processed(), 3);
    assert!(result.error_hosts.is_empty());

    executor.close().await;
}

#[tokio::test]
async fn pool_resize_replaces_the_pool() {
    let bin = StubBin::new();
    let runtime = stub_runtime(&bin, "echo hello");
    quiet(&runtime);
    let mut executor = Executor::new(runtime.clone());
    assert_eq!(executor.pool_size(), runtime.config().pool_size);

    executor.set_pool_size(3).await;
    assert_eq!(executor.pool_size(), 3);
    assert_eq!(runtime.config().pool_size, 3);

    // The new pool still executes.
    let hosts = hostnames(&["h1"]);
    let result = executor.run(ExecMode::Parallel, &hosts, "uptime").await;
    assert_eq!(result.success_hosts, vec!["h1"]);

    executor.close().await;
}
