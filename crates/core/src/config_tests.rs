// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for execution tunables.

use super::*;

#[test]
fn mode_round_trip() {
    for mode in [ExecMode::Serial, ExecMode::Parallel, ExecMode::Collapse] {
        assert_eq!(mode.to_string().parse::<ExecMode>().unwrap(), mode);
    }
}

#[test]
fn mode_rejects_unknown() {
    let err = "sideways".parse::<ExecMode>().unwrap_err();
    assert_eq!(err, ModeParseError("sideways".to_string()));
}

#[test]
fn interpreter_argv_follows_raise() {
    let mut cfg = ExecConfig::default();
    assert_eq!(cfg.interpreter_argv(), vec!["/bin/bash"]);

    cfg.raise = RaiseType::Sudo;
    assert_eq!(cfg.interpreter_argv(), vec!["sudo", "/bin/bash"]);

    cfg.raise = RaiseType::Su;
    assert_eq!(cfg.interpreter_argv(), vec!["su", "-"]);
}

#[test]
fn interpreter_argv_collapses_whitespace() {
    let cfg = ExecConfig { interpreter: "  sudo   -E  bash ".to_string(), ..Default::default() };
    assert_eq!(cfg.interpreter_argv(), vec!["sudo", "-E", "bash"]);
}

#[test]
fn defaults_match_documented_values() {
    let cfg = ExecConfig::default();
    assert_eq!(cfg.pool_size, 50);
    assert_eq!(cfg.ssh_connect_timeout, 1);
    assert_eq!(cfg.remote_tmpdir, "/tmp");
    assert_eq!(cfg.copy_type, CopyType::Tar);
    assert_eq!(cfg.raise, RaiseType::None);
    assert!(cfg.progress_bar);
    assert!(cfg.prepend_hostnames);
    assert!(!cfg.debug);
}

#[test]
fn config_deserializes_with_partial_fields() {
    let cfg: ExecConfig = serde_json::from_str(r#"{"user": "deploy", "raise": "sudo"}"#).unwrap();
    assert_eq!(cfg.user, "deploy");
    assert_eq!(cfg.raise, RaiseType::Sudo);
    assert_eq!(cfg.pool_size, 50);
}
