// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command builder tests: exact argv shapes.

use super::*;
use xc_core::RaiseType;

fn config() -> ExecConfig {
    ExecConfig { user: "deploy".to_string(), ..Default::default() }
}

fn opt_pairs(args: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "-o" {
            if let Some(value) = iter.next() {
                out.push(value.clone());
            }
        }
    }
    out
}

#[test]
fn ssh_cmd_shape() {
    let spec = ssh_cmd(&config(), "web1.ex", "/tmp/xc.123.web1.ex.sh");

    assert_eq!(spec.program, "ssh");
    assert_eq!(&spec.args[..3], &["-tt", "-l", "deploy"]);

    let host_pos = spec.args.iter().position(|a| a == "web1.ex").unwrap();
    assert_eq!(
        &spec.args[host_pos..],
        &["web1.ex", "/bin/bash", "-c", "/tmp/xc.123.web1.ex.sh"]
    );
}

#[test]
fn ssh_cmd_merges_default_options() {
    let spec = ssh_cmd(&config(), "web1.ex", "true");
    let opts = opt_pairs(&spec.args);
    assert_eq!(
        opts,
        vec![
            "ConnectTimeout=1",
            "PasswordAuthentication=no",
            "PubkeyAuthentication=yes",
            "ServerAliveCountMax=12",
            "ServerAliveInterval=5",
            "StrictHostKeyChecking=no",
            "TCPKeepAlive=yes",
        ]
    );
}

#[test]
fn ssh_cmd_honors_option_overrides() {
    let mut cfg = config();
    cfg.ssh_connect_timeout = 7;
    cfg.ssh_options.insert("StrictHostKeyChecking".to_string(), "yes".to_string());
    cfg.ssh_options.insert("ProxyJump".to_string(), "bastion".to_string());

    let opts = opt_pairs(&ssh_cmd(&cfg, "h", "x").args);
    assert!(opts.contains(&"ConnectTimeout=7".to_string()));
    assert!(opts.contains(&"StrictHostKeyChecking=yes".to_string()));
    assert!(opts.contains(&"ProxyJump=bastion".to_string()));
}

#[test]
fn ssh_cmd_without_command_skips_dash_c() {
    let spec = ssh_cmd(&config(), "web1.ex", "");
    assert!(!spec.args.contains(&"-c".to_string()));
    assert_eq!(spec.args.last().unwrap(), "/bin/bash");
}

#[test]
fn ssh_cmd_interpreter_follows_raise() {
    let mut cfg = config();
    cfg.raise = RaiseType::Sudo;
    let spec = ssh_cmd(&cfg, "web1.ex", "id");
    let host_pos = spec.args.iter().position(|a| a == "web1.ex").unwrap();
    assert_eq!(&spec.args[host_pos..], &["web1.ex", "sudo", "/bin/bash", "-c", "id"]);

    cfg.raise = RaiseType::Su;
    let spec = ssh_cmd(&cfg, "web1.ex", "id");
    let host_pos = spec.args.iter().position(|a| a == "web1.ex").unwrap();
    assert_eq!(&spec.args[host_pos..], &["web1.ex", "su", "-", "-c", "id"]);
}

#[test]
fn scp_cmd_shape() {
    let spec = scp_cmd(&config(), "web1.ex", "/tmp/local.sh", "/tmp/remote.sh", false);
    assert_eq!(spec.program, "scp");
    assert_ne!(spec.args[0], "-r");
    assert_eq!(
        &spec.args[spec.args.len() - 2..],
        &["/tmp/local.sh", "deploy@web1.ex:/tmp/remote.sh"]
    );
}

#[test]
fn scp_cmd_recursive_flag_first() {
    let spec = scp_cmd(&config(), "web1.ex", "/data", "/data", true);
    assert_eq!(spec.args[0], "-r");
}

#[test]
fn tar_cmd_runs_under_bash() {
    let spec = tar_cmd(&config(), "web1.ex", "/data/dir", "/backup");
    assert_eq!(spec.program, "bash");
    assert_eq!(spec.args[0], "-c");
    let pipeline = &spec.args[1];
    assert!(pipeline.starts_with("tar c /data/dir | ssh -l deploy "));
    assert!(pipeline.ends_with("web1.ex tar x -C /backup"));
}

#[test]
fn tar_cmd_defaults_remote_to_dot() {
    let spec = tar_cmd(&config(), "web1.ex", "/data", "");
    assert!(spec.args[1].ends_with("tar x -C ."));

    let spec = tar_cmd(&config(), "web1.ex", "/data", "/data");
    assert!(spec.args[1].ends_with("tar x -C ."));
}

#[test]
fn builders_use_configured_binaries() {
    let mut cfg = config();
    cfg.ssh_command = "/opt/ssh".to_string();
    cfg.scp_command = "/opt/scp".to_string();

    assert_eq!(ssh_cmd(&cfg, "h", "x").program, "/opt/ssh");
    assert_eq!(scp_cmd(&cfg, "h", "a", "b", false).program, "/opt/scp");
    assert!(tar_cmd(&cfg, "h", "a", "b").args[1].contains("/opt/ssh -l"));
}
