// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Brace expansion tests.

use super::*;

macro_rules! expand_tests {
    ($($name:ident: $input:expr => [$($host:expr),* $(,)?]),* $(,)?) => {
        $(
            #[test]
            fn $name() {
                let hosts = expand_pattern($input).expect($input);
                let expected: Vec<String> = vec![$($host.to_string()),*];
                assert_eq!(hosts, expected, "pattern: {:?}", $input);
            }
        )*
    };
}

macro_rules! expand_error_tests {
    ($($name:ident: $input:expr => $error:pat),* $(,)?) => {
        $(
            #[test]
            fn $name() {
                let result = expand_pattern($input);
                assert!(
                    matches!(result, Err($error)),
                    "pattern {:?}: expected {}, got {:?}",
                    $input, stringify!($error), result
                );
            }
        )*
    };
}

expand_tests! {
    no_braces: "host1.example.com" => ["host1.example.com"],
    simple_alternation: "host{01,02,03}.ex" => ["host01.ex", "host02.ex", "host03.ex"],
    alternation_at_end: "web{a,b}" => ["weba", "webb"],
    alternation_at_start: "{db,web}1" => ["db1", "web1"],
    empty_alternative: "host{,-dev}.ex" => ["host.ex", "host-dev.ex"],
    numeric_range: "n{1..3}" => ["n1", "n2", "n3"],
    padded_range: "web{01..03}.dc" => ["web01.dc", "web02.dc", "web03.dc"],
    padded_range_wide: "w{08..11}" => ["w08", "w09", "w10", "w11"],
    unpadded_range_keeps_width: "w{8..11}" => ["w8", "w9", "w10", "w11"],
    range_and_alternative: "h{1..2,x}" => ["h1", "h2", "hx"],
    two_groups_multiply: "r{1,2}c{a,b}" => ["r1ca", "r1cb", "r2ca", "r2cb"],
    single_value_range: "h{5..5}" => ["h5"],
}

expand_error_tests! {
    unterminated: "host{01,02" => BraceError::Unbalanced(_),
    stray_close: "host}01" => BraceError::Unbalanced(_),
    nested: "h{a,{b,c}}" => BraceError::Nested,
    empty_group: "h{}" => BraceError::EmptyGroup(_),
    single_element: "h{abc}" => BraceError::SingleElement(_),
    descending_range: "h{9..3}" => BraceError::InvalidRange(_),
}

#[test]
fn dotted_non_range_is_a_plain_alternative() {
    // "a..b" with non-digits is not a range; it stays literal.
    let hosts = expand_pattern("h{a..b,c}").unwrap();
    assert_eq!(hosts, vec!["ha..b", "hc"]);
}

#[test]
fn expansion_is_purely_textual() {
    // No dedup: repeated alternatives repeat in the output.
    let hosts = expand_pattern("h{1,1}").unwrap();
    assert_eq!(hosts, vec!["h1", "h1"]);
}
