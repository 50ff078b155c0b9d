// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure child-process descriptors for the exec, scp and tar-pipe phases.

use std::collections::BTreeMap;
use xc_core::ExecConfig;

/// Program plus argv, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

/// SSH options merged from the defaults and the configured overrides,
/// sorted so argv construction is deterministic.
fn ssh_options(config: &ExecConfig) -> BTreeMap<String, String> {
    let mut options = BTreeMap::from([
        ("PasswordAuthentication".to_string(), "no".to_string()),
        ("PubkeyAuthentication".to_string(), "yes".to_string()),
        ("StrictHostKeyChecking".to_string(), "no".to_string()),
        ("TCPKeepAlive".to_string(), "yes".to_string()),
        ("ServerAliveCountMax".to_string(), "12".to_string()),
        ("ServerAliveInterval".to_string(), "5".to_string()),
        ("ConnectTimeout".to_string(), config.ssh_connect_timeout.to_string()),
    ]);
    for (key, value) in &config.ssh_options {
        options.insert(key.clone(), value.clone());
    }
    options
}

/// `-o Key=value` pairs for argv embedding.
fn ssh_opt_args(config: &ExecConfig) -> Vec<String> {
    let mut args = Vec::new();
    for (key, value) in ssh_options(config) {
        args.push("-o".to_string());
        args.push(format!("{key}={value}"));
    }
    args
}

/// `ssh -tt -l <user> <opts> <host> <interpreter> [-c <argv>]`.
///
/// `-tt` forces a remote TTY so privilege-raise prompts reach the PTY.
pub fn ssh_cmd(config: &ExecConfig, host: &str, argv: &str) -> CommandSpec {
    let mut args = vec!["-tt".to_string(), "-l".to_string(), config.user.clone()];
    args.extend(ssh_opt_args(config));
    args.push(host.to_string());
    args.extend(config.interpreter_argv());
    if !argv.is_empty() {
        args.push("-c".to_string());
        args.push(argv.to_string());
    }
    CommandSpec { program: config.ssh_command.clone(), args }
}

/// `scp [-r] <opts> <local> <user>@<host>:<remote>`.
pub fn scp_cmd(
    config: &ExecConfig,
    host: &str,
    local: &str,
    remote: &str,
    recursive: bool,
) -> CommandSpec {
    let mut args = Vec::new();
    if recursive {
        args.push("-r".to_string());
    }
    args.extend(ssh_opt_args(config));
    args.push(local.to_string());
    args.push(format!("{}@{}:{}", config.user, host, remote));
    CommandSpec { program: config.scp_command.clone(), args }
}

/// `bash -c "tar c <local> | ssh -l <user> <opts> <host> tar x -C <remote>"`.
///
/// An empty remote, or a remote equal to the local path, unpacks into `.`.
pub fn tar_cmd(config: &ExecConfig, host: &str, local: &str, remote: &str) -> CommandSpec {
    let remote = if remote.is_empty() || remote == local { "." } else { remote };
    let options = ssh_opt_args(config).join(" ");
    let ssh = format!("{} -l {} {} {}", config.ssh_command, config.user, options, host);
    let pipeline = format!("tar c {local} | {ssh} tar x -C {remote}");
    CommandSpec { program: "bash".to_string(), args: vec!["-c".to_string(), pipeline] }
}

#[cfg(test)]
#[path = "ssh_tests.rs"]
mod tests;
