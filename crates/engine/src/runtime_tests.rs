// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime handle tests.

use super::*;
use xc_core::RaiseType;

struct FixedProvider {
    ready: bool,
}

impl PasswordProvider for FixedProvider {
    fn ready(&self) -> bool {
        self.ready
    }

    fn get_pass(&self, hostname: &str) -> String {
        format!("pw-for-{hostname}")
    }
}

fn runtime_with(raise: RaiseType, use_manager: bool) -> Arc<Runtime> {
    let config = ExecConfig {
        raise,
        password: "configured".to_string(),
        use_password_manager: use_manager,
        ..Default::default()
    };
    Runtime::new(config)
}

#[test]
fn password_defaults_to_configured_value() {
    let runtime = runtime_with(RaiseType::Sudo, false);
    assert_eq!(runtime.password_for("web1.ex"), "configured");
}

#[test]
fn password_manager_wins_when_enabled_and_ready() {
    let runtime = runtime_with(RaiseType::Sudo, true);
    runtime.set_password_provider(Arc::new(FixedProvider { ready: true }));
    assert_eq!(runtime.password_for("web1.ex"), "pw-for-web1.ex");
}

#[test]
fn unready_password_manager_falls_back() {
    let runtime = runtime_with(RaiseType::Sudo, true);
    runtime.set_password_provider(Arc::new(FixedProvider { ready: false }));
    assert_eq!(runtime.password_for("web1.ex"), "configured");
}

#[test]
fn disabled_password_manager_is_ignored() {
    let runtime = runtime_with(RaiseType::Sudo, false);
    runtime.set_password_provider(Arc::new(FixedProvider { ready: true }));
    assert_eq!(runtime.password_for("web1.ex"), "configured");
}

#[test]
fn cleared_provider_falls_back() {
    let runtime = runtime_with(RaiseType::Sudo, true);
    runtime.set_password_provider(Arc::new(FixedProvider { ready: true }));
    runtime.clear_password_provider();
    assert_eq!(runtime.password_for("web1.ex"), "configured");
}

#[test]
fn config_updates_are_visible_to_snapshots() {
    let runtime = runtime_with(RaiseType::None, false);
    runtime.update_config(|config| {
        config.user = "deploy".to_string();
        config.pool_size = 7;
    });
    let config = runtime.config();
    assert_eq!(config.user, "deploy");
    assert_eq!(config.pool_size, 7);
}

#[test]
fn output_log_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.log");

    let runtime = runtime_with(RaiseType::None, false);
    // Logging without a log configured is a no-op.
    runtime.log_output("dropped\n");

    runtime.set_output_log(&path).unwrap();
    runtime.log_host_output("web1.ex", b"payload\n");
    runtime.clear_output_log();
    runtime.log_output("dropped too\n");

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("web1.ex: payload"), "got: {content}");
    assert!(!content.contains("dropped"));
}
