// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Combinatorial brace-pattern expansion for host literals.
//!
//! Supports comma alternations (`host{a,b}`) and inclusive numeric ranges
//! (`host{01..30}`, zero-padding preserved). Multiple groups multiply
//! left-to-right. The resolver falls back to the literal on any error, so
//! malformed patterns never abort a run.

use thiserror::Error;

/// Errors for malformed brace patterns.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BraceError {
    #[error("unbalanced braces in pattern '{0}'")]
    Unbalanced(String),
    #[error("nested brace patterns are not allowed")]
    Nested,
    #[error("empty group in pattern '{0}'")]
    EmptyGroup(String),
    #[error("group without alternatives in pattern '{0}'")]
    SingleElement(String),
    #[error("invalid range '{0}'")]
    InvalidRange(String),
}

enum Segment {
    Literal(String),
    Alternatives(Vec<String>),
}

/// Expand a brace pattern into the full host list.
///
/// A pattern without braces expands to itself.
pub fn expand_pattern(pattern: &str) -> Result<Vec<String>, BraceError> {
    let segments = split_segments(pattern)?;

    let mut results = vec![String::new()];
    for segment in segments {
        match segment {
            Segment::Literal(text) => {
                for r in &mut results {
                    r.push_str(&text);
                }
            }
            Segment::Alternatives(alts) => {
                let mut next = Vec::with_capacity(results.len() * alts.len());
                for r in &results {
                    for alt in &alts {
                        let mut combined = r.clone();
                        combined.push_str(alt);
                        next.push(combined);
                    }
                }
                results = next;
            }
        }
    }
    Ok(results)
}

fn split_segments(pattern: &str) -> Result<Vec<Segment>, BraceError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut group: Option<String> = None;

    for ch in pattern.chars() {
        match ch {
            '{' => {
                if group.is_some() {
                    return Err(BraceError::Nested);
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                group = Some(String::new());
            }
            '}' => {
                let Some(body) = group.take() else {
                    return Err(BraceError::Unbalanced(pattern.to_string()));
                };
                segments.push(Segment::Alternatives(expand_group(pattern, &body)?));
            }
            _ => match group.as_mut() {
                Some(body) => body.push(ch),
                None => literal.push(ch),
            },
        }
    }

    if group.is_some() {
        return Err(BraceError::Unbalanced(pattern.to_string()));
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn expand_group(pattern: &str, body: &str) -> Result<Vec<String>, BraceError> {
    if body.is_empty() {
        return Err(BraceError::EmptyGroup(pattern.to_string()));
    }

    let alternatives: Vec<&str> = body.split(',').collect();
    if alternatives.len() == 1 && !is_range(alternatives[0]) {
        // "{abc}" is not a pattern; the caller keeps the literal.
        return Err(BraceError::SingleElement(pattern.to_string()));
    }

    let mut expanded = Vec::new();
    for alt in alternatives {
        if is_range(alt) {
            expand_range(alt, &mut expanded)?;
        } else {
            expanded.push(alt.to_string());
        }
    }
    Ok(expanded)
}

fn is_range(alt: &str) -> bool {
    alt.split_once("..")
        .is_some_and(|(a, b)| {
            !a.is_empty()
                && !b.is_empty()
                && a.bytes().all(|c| c.is_ascii_digit())
                && b.bytes().all(|c| c.is_ascii_digit())
        })
}

fn expand_range(alt: &str, out: &mut Vec<String>) -> Result<(), BraceError> {
    let Some((start_str, end_str)) = alt.split_once("..") else {
        return Err(BraceError::InvalidRange(alt.to_string()));
    };
    let (start, end): (u64, u64) = match (start_str.parse(), end_str.parse()) {
        (Ok(s), Ok(e)) => (s, e),
        _ => return Err(BraceError::InvalidRange(alt.to_string())),
    };
    if start > end {
        return Err(BraceError::InvalidRange(alt.to_string()));
    }

    let pad = if has_leading_zero(start_str) || has_leading_zero(end_str) {
        start_str.len().max(end_str.len())
    } else {
        0
    };

    for n in start..=end {
        out.push(format!("{n:0pad$}"));
    }
    Ok(())
}

fn has_leading_zero(s: &str) -> bool {
    s.len() > 1 && s.starts_with('0')
}

#[cfg(test)]
#[path = "brace_tests.rs"]
mod tests;
