// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Token shape tests: atoms, filters, brace patterns, regexps.

use crate::parser::parse_expression;
use crate::token::{Token, TokenKind};
use regex::Regex;

fn tok(kind: TokenKind, value: &str) -> Token {
    Token { kind, value: value.to_string(), ..Default::default() }
}

fn host(value: &str) -> Token {
    tok(TokenKind::Host, value)
}

fn group(value: &str) -> Token {
    tok(TokenKind::Group, value)
}

fn work_group(value: &str) -> Token {
    tok(TokenKind::WorkGroup, value)
}

fn host_re(pattern: &str) -> Token {
    Token {
        kind: TokenKind::HostRegexp,
        regexp_filter: Some(Regex::new(pattern).unwrap()),
        ..Default::default()
    }
}

fn with_tags(mut token: Token, tags: &[&str]) -> Token {
    token.tags_filter = tags.iter().map(|t| t.to_string()).collect();
    token
}

fn with_dc(mut token: Token, dc: &str) -> Token {
    token.datacenter_filter = dc.to_string();
    token
}

fn with_re(mut token: Token, pattern: &str) -> Token {
    token.regexp_filter = Some(Regex::new(pattern).unwrap());
    token
}

fn excluded(mut token: Token) -> Token {
    token.exclude = true;
    token
}

parse_tests! {
    empty_expression: "" => [],
    single_host: "host1.example.com" => [host("host1.example.com")],
    two_hosts: "a.ex,b.ex" => [host("a.ex"), host("b.ex")],
    trailing_comma: "a.ex," => [host("a.ex")],
    excluded_host: "-a.ex" => [excluded(host("a.ex"))],
    bare_exclude_is_empty: "-" => [],
    single_group: "%backend" => [group("backend")],
    excluded_group: "-%backend" => [excluded(group("backend"))],
    all_work_groups: "*" => [work_group("")],
    named_work_group: "*platform" => [work_group("platform")],
    group_and_host: "%db,standalone.ex" => [group("db"), host("standalone.ex")],
}

parse_tests! {
    group_with_datacenter: "%db@dc1" => [with_dc(group("db"), "dc1")],
    group_with_tag: "%db#prod" => [with_tags(group("db"), &["prod"])],
    group_with_tags: "%db#prod#ssd" => [with_tags(group("db"), &["prod", "ssd"])],
    group_with_regexp: "%db/^master/" => [with_re(group("db"), "^master")],
    group_dc_then_tag: "%db@dc1#prod" => [with_tags(with_dc(group("db"), "dc1"), &["prod"])],
    group_tag_then_dc: "%db#prod@dc1" => [with_dc(with_tags(group("db"), &["prod"]), "dc1")],
    group_tag_then_regexp: "%db#prod/01$/" => [with_re(with_tags(group("db"), &["prod"]), "01$")],
    work_group_with_filters: "*platform@dc2#prod" => [
        with_tags(with_dc(work_group("platform"), "dc2"), &["prod"]),
    ],
    bare_tag_selects_all_work_groups: "#prod" => [with_tags(work_group(""), &["prod"])],
    host_with_tag: "web1.ex#prod" => [with_tags(host("web1.ex"), &["prod"])],
    host_with_regexp: "web{1,2}.ex/1/" => [with_re(host("web{1,2}.ex"), "1")],
    excluded_tagged_group: "-%db#prod" => [excluded(with_tags(group("db"), &["prod"]))],
}

parse_tests! {
    brace_pattern_single_token: "host{01,02,03}.ex" => [host("host{01,02,03}.ex")],
    brace_pattern_range: "web{01..30}" => [host("web{01..30}")],
    brace_then_other_token: "h{1,2},other" => [host("h{1,2}"), host("other")],
    trailing_open_brace_is_literal: "h{" => [host("h{")],
    closed_brace_at_end: "h{1,2}" => [host("h{1,2}")],
}

parse_tests! {
    host_regexp: "/^host[13]\\./" => [host_re("^host[13]\\.")],
    host_regexp_tilde: "~^web\\d+" => [host_re("^web\\d+")],
    host_regexp_then_host: "/^db/,web1.ex" => [host_re("^db"), host("web1.ex")],
    regexp_escaped_slash: "/a\\/b/" => [host_re("a/b")],
    excluded_regexp: "-/^db/" => [excluded(host_re("^db"))],
    tilde_regexp_then_host: "~^db,web1.ex" => [host_re("^db"), host("web1.ex")],
}

#[test]
fn tilde_value_keeps_its_source_text() {
    let tokens = parse_expression("~^web\\d+").unwrap();
    assert_eq!(tokens[0].value, "^web\\d+");
    assert_eq!(tokens[0].kind, TokenKind::HostRegexp);
}

#[test]
fn mixed_expression_keeps_token_order() {
    let tokens = parse_expression("%db@dc1,-web{1,2}.ex,*#prod,/^cache/").unwrap();
    assert_eq!(
        tokens,
        vec![
            with_dc(group("db"), "dc1"),
            excluded(host("web{1,2}.ex")),
            with_tags(work_group(""), &["prod"]),
            host_re("^cache"),
        ]
    );
}

#[test]
fn double_exclude_still_excludes() {
    let tokens = parse_expression("--a.ex").unwrap();
    assert_eq!(tokens, vec![excluded(host("a.ex"))]);
}
