// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generated script content tests.

use super::*;

#[test]
fn script_preamble_is_exact() {
    let mut config = ExecConfig::default();
    config.remote_environment.insert("APP_ENV".to_string(), "prod".to_string());
    config.remote_environment.insert("REGION".to_string(), "eu".to_string());

    let script = create_script(&config, "uptime").unwrap();
    let content = std::fs::read_to_string(script.local_path()).unwrap();

    assert_eq!(
        content,
        "#!/bin/bash\n\
         \n\
         APP_ENV=prod\n\
         REGION=eu\n\
         \n\
         nohup bash -c \"sleep 1; rm -f $0\" >/dev/null 2>&1 </dev/null &\n\
         uptime\n"
    );
}

#[test]
fn script_without_env_keeps_blank_line() {
    let script = create_script(&ExecConfig::default(), "id").unwrap();
    let content = std::fs::read_to_string(script.local_path()).unwrap();
    assert_eq!(
        content,
        "#!/bin/bash\n\n\nnohup bash -c \"sleep 1; rm -f $0\" >/dev/null 2>&1 </dev/null &\nid\n"
    );
}

#[test]
fn script_is_executable() {
    let script = create_script(&ExecConfig::default(), "id").unwrap();
    let mode = std::fs::metadata(script.local_path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[test]
fn local_name_carries_xc_prefix() {
    let script = create_script(&ExecConfig::default(), "id").unwrap();
    let name = script.local_path().file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("xc."), "unexpected name: {name}");
}

#[test]
fn remote_path_is_per_host_unique() {
    let config = ExecConfig { remote_tmpdir: "/var/tmp".to_string(), ..Default::default() };
    let script = create_script(&config, "id").unwrap();
    let name = script.local_path().file_name().unwrap().to_string_lossy().into_owned();

    let remote = script.remote_path("web1.ex");
    assert_eq!(remote, format!("/var/tmp/{name}.web1.ex.sh"));
    assert_ne!(remote, script.remote_path("web2.ex"));
}

#[test]
fn temp_file_is_removed_on_drop() {
    let script = create_script(&ExecConfig::default(), "id").unwrap();
    let path = script.local_path().to_path_buf();
    assert!(path.exists());
    drop(script);
    assert!(!path.exists());
}
