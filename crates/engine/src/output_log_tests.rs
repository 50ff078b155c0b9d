// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output log format tests.

use super::*;
use regex::Regex;

#[test]
fn entries_carry_timestamp_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("xc.log");

    let mut log = OutputLog::open(&path).unwrap();
    log.write("plain message\n");
    log.write_host("web1.ex", b"hello\n");
    drop(log);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);

    let stamp = Regex::new(r"^\[\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\] ").unwrap();
    assert!(stamp.is_match(lines[0]), "missing stamp: {}", lines[0]);
    assert!(lines[0].ends_with("plain message"));
    assert!(lines[1].ends_with("web1.ex: hello"));
}

#[test]
fn open_appends_to_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("xc.log");

    OutputLog::open(&path).unwrap().write("first\n");
    OutputLog::open(&path).unwrap().write("second\n");

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 2);
}
