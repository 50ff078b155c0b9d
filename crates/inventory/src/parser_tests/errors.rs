// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parse error tests: every failure names its position.

use crate::error::ParseError;
use crate::parser::parse_expression;

parse_error_tests! {
    at_cannot_start_token: "@dc1" => ParseError::UnexpectedChar { ch: '@', pos: 0 },
    bang_cannot_start_token: "a.ex,!b" => ParseError::UnexpectedChar { ch: '!', pos: 5 },
    double_comma: "a,,b" => ParseError::UnexpectedChar { ch: ',', pos: 2 },
    leading_comma: ",a" => ParseError::UnexpectedChar { ch: ',', pos: 0 },

    empty_group_name: "%," => ParseError::EmptyGroupName { pos: 1 },
    empty_group_mid_expression: "a.ex,%,b" => ParseError::EmptyGroupName { pos: 6 },

    empty_tag_trailing_comma: "#," => ParseError::EmptyTag { pos: 1 },
    empty_tag_double_hash: "%g##prod" => ParseError::EmptyTag { pos: 3 },
    empty_tag_before_comma: "%g#,x" => ParseError::EmptyTag { pos: 3 },

    lone_percent: "%" => ParseError::UnexpectedEnd,
    lone_hash: "#" => ParseError::UnexpectedEnd,
    lone_tilde: "~" => ParseError::UnexpectedEnd,
    lone_slash: "/" => ParseError::UnexpectedEnd,
    unterminated_regexp: "/^web" => ParseError::UnexpectedEnd,
    unterminated_brace: "h{1,2" => ParseError::UnexpectedEnd,
    dangling_datacenter: "%g@" => ParseError::UnexpectedEnd,
    dangling_tag_state: "%g#" => ParseError::UnexpectedEnd,

    nested_brace: "h{a,{b}}" => ParseError::NestedPattern { pos: 4 },

    bad_regexp: "/[/" => ParseError::Regex { pos: 2, .. },
    bad_tilde_regexp: "~(" => ParseError::Regex { .. },
}

#[test]
fn errors_render_their_position() {
    let err = parse_expression("a.ex,!b").unwrap_err();
    assert_eq!(err.to_string(), "invalid symbol '!', expected -, *, % or a hostname at position 5");

    let err = parse_expression("%g#,x").unwrap_err();
    assert_eq!(err.to_string(), "empty tag at position 3");
}
