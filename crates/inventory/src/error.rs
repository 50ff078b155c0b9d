// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors for the host-set expression language.

use thiserror::Error;

/// Errors produced while parsing a host-set expression.
///
/// Every variant names the offending character position.
#[derive(Debug, Error, Clone)]
pub enum ParseError {
    /// A character that cannot start a token.
    #[error("invalid symbol '{ch}', expected -, *, % or a hostname at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    /// `%` with no group name before the token ended.
    #[error("empty group name at position {pos}")]
    EmptyGroupName { pos: usize },

    /// `#` with no tag before the next separator.
    #[error("empty tag at position {pos}")]
    EmptyTag { pos: usize },

    /// The regexp between slashes failed to compile.
    #[error("error compiling regexp at position {pos}: {source}")]
    Regex {
        pos: usize,
        #[source]
        source: regex::Error,
    },

    /// `{` opened inside an already open brace pattern.
    #[error("nested patterns are not allowed at position {pos}")]
    NestedPattern { pos: usize },

    /// The expression ended inside an open filter or pattern state.
    #[error("unexpected end of expression")]
    UnexpectedEnd,
}
