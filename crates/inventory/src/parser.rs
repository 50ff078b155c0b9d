// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-pass state machine over host-set expressions.
//!
//! Grammar (informal):
//!
//! ```text
//! expr    := term ("," term)*
//! term    := ["-"] atom (("@" dcname) | ("#" tag ("#" tag)*) | ("/" regex "/"))*
//! atom    := hostpat | "%" groupname | "*" [wgname] | "#" tag | ("/"|"~") regex
//! hostpat := ident with optional {a,b,c}-style brace patterns
//! ```
//!
//! Commas and end of input terminate tokens except inside a brace pattern
//! or a regexp. A `/regex/` filter always terminates its token; the comma
//! that may follow the closing slash is consumed by the regexp state.

use crate::error::ParseError;
use crate::token::{Token, TokenKind};
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Wait,
    ReadHost,
    ReadGroup,
    ReadWorkGroup,
    ReadDatacenter,
    ReadTag,
    ReadBracePattern,
    ReadRegexp,
}

/// Characters allowed to start and continue a host literal.
fn is_host_symbol(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '{' | '}')
}

struct Parser {
    chars: Vec<char>,
    state: State,
    current: Token,
    tag: String,
    re: String,
    tokens: Vec<Token>,
}

/// Parse an expression into its ordered token list.
pub fn parse_expression(expr: &str) -> Result<Vec<Token>, ParseError> {
    Parser::new(expr).parse()
}

impl Parser {
    fn new(expr: &str) -> Self {
        Self {
            chars: expr.chars().collect(),
            state: State::Wait,
            current: Token::default(),
            tag: String::new(),
            re: String::new(),
            tokens: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<Vec<Token>, ParseError> {
        let len = self.chars.len();
        let mut i = 0;
        while i < len {
            let sym = self.chars[i];
            let last = i == len - 1;
            match self.state {
                State::Wait => self.on_wait(sym, i)?,
                State::ReadHost => self.on_host(sym, last, i)?,
                State::ReadGroup => self.on_group(sym, last, i)?,
                State::ReadWorkGroup => self.on_work_group(sym, last, i)?,
                State::ReadDatacenter => self.on_datacenter(sym, last, i)?,
                State::ReadTag => self.on_tag(sym, last, i)?,
                State::ReadBracePattern => self.on_brace(sym, i)?,
                State::ReadRegexp => {
                    if let Some(skip) = self.on_regexp(sym, last, i)? {
                        i += skip;
                    }
                }
            }
            i += 1;
        }

        // A work-group token may be empty ("*" selects every work-group);
        // anything else pending needs a value. The pre-finish state decides
        // whether the expression ended inside an open filter.
        let end_state = self.state;
        if !self.current.value.is_empty() || end_state == State::ReadWorkGroup {
            self.finish_token(len)?;
        } else if end_state != State::Wait {
            return Err(ParseError::UnexpectedEnd);
        }

        match end_state {
            State::ReadDatacenter
            | State::ReadTag
            | State::ReadBracePattern
            | State::ReadRegexp => Err(ParseError::UnexpectedEnd),
            _ => Ok(self.tokens),
        }
    }

    /// Push the current token, compiling a `~`-style regexp from its value
    /// when no slash-delimited filter was attached.
    fn finish_token(&mut self, pos: usize) -> Result<(), ParseError> {
        if self.current.kind == TokenKind::HostRegexp && self.current.regexp_filter.is_none() {
            let compiled = Regex::new(&self.current.value)
                .map_err(|source| ParseError::Regex { pos, source })?;
            self.current.regexp_filter = Some(compiled);
        }
        self.tokens.push(std::mem::take(&mut self.current));
        self.state = State::Wait;
        Ok(())
    }

    fn on_wait(&mut self, sym: char, pos: usize) -> Result<(), ParseError> {
        match sym {
            '-' => self.current.exclude = true,
            '*' => {
                self.current.kind = TokenKind::WorkGroup;
                self.state = State::ReadWorkGroup;
            }
            '%' => {
                self.current.kind = TokenKind::Group;
                self.state = State::ReadGroup;
            }
            '#' => {
                // A bare tag selects over every work-group.
                self.current.kind = TokenKind::WorkGroup;
                self.tag.clear();
                self.state = State::ReadTag;
            }
            '/' => {
                self.current.kind = TokenKind::HostRegexp;
                self.re.clear();
                self.state = State::ReadRegexp;
            }
            '~' => {
                self.current.kind = TokenKind::HostRegexp;
                self.state = State::ReadHost;
            }
            ch if is_host_symbol(ch) => {
                self.current.kind = TokenKind::Host;
                self.current.value.push(ch);
                self.state = State::ReadHost;
            }
            ch => return Err(ParseError::UnexpectedChar { ch, pos }),
        }
        Ok(())
    }

    fn on_host(&mut self, sym: char, last: bool, pos: usize) -> Result<(), ParseError> {
        match sym {
            '/' => {
                self.re.clear();
                self.state = State::ReadRegexp;
                return Ok(());
            }
            '@' => {
                self.state = State::ReadDatacenter;
                return Ok(());
            }
            '#' => {
                self.tag.clear();
                self.state = State::ReadTag;
                return Ok(());
            }
            '{' => {
                // Not terminal: fall through so a trailing '{' still lands
                // in the value before the token is finished.
                self.state = State::ReadBracePattern;
            }
            _ => {}
        }
        if sym == ',' || last {
            if last && sym != ',' {
                self.current.value.push(sym);
            }
            return self.finish_token(pos);
        }
        self.current.value.push(sym);
        Ok(())
    }

    fn on_group(&mut self, sym: char, last: bool, pos: usize) -> Result<(), ParseError> {
        match sym {
            '@' => self.state = State::ReadDatacenter,
            '#' => {
                self.tag.clear();
                self.state = State::ReadTag;
            }
            '/' => {
                self.re.clear();
                self.state = State::ReadRegexp;
            }
            _ if sym == ',' || last => {
                if last && sym != ',' {
                    self.current.value.push(sym);
                }
                if self.current.value.is_empty() {
                    return Err(ParseError::EmptyGroupName { pos });
                }
                return self.finish_token(pos);
            }
            _ => self.current.value.push(sym),
        }
        Ok(())
    }

    fn on_work_group(&mut self, sym: char, last: bool, pos: usize) -> Result<(), ParseError> {
        match sym {
            '@' => self.state = State::ReadDatacenter,
            '#' => {
                self.tag.clear();
                self.state = State::ReadTag;
            }
            '/' => {
                self.re.clear();
                self.state = State::ReadRegexp;
            }
            _ if sym == ',' || last => {
                if last && sym != ',' {
                    self.current.value.push(sym);
                }
                return self.finish_token(pos);
            }
            _ => self.current.value.push(sym),
        }
        Ok(())
    }

    fn on_datacenter(&mut self, sym: char, last: bool, pos: usize) -> Result<(), ParseError> {
        match sym {
            '#' => {
                self.tag.clear();
                self.state = State::ReadTag;
            }
            '/' => {
                self.re.clear();
                self.state = State::ReadRegexp;
            }
            _ if sym == ',' || last => {
                if last && sym != ',' {
                    self.current.datacenter_filter.push(sym);
                }
                return self.finish_token(pos);
            }
            _ => self.current.datacenter_filter.push(sym),
        }
        Ok(())
    }

    fn on_tag(&mut self, sym: char, last: bool, pos: usize) -> Result<(), ParseError> {
        if sym == ',' || last {
            if last && sym != ',' {
                self.tag.push(sym);
            }
            if self.tag.is_empty() {
                return Err(ParseError::EmptyTag { pos });
            }
            let tag = std::mem::take(&mut self.tag);
            self.current.tags_filter.push(tag);
            return self.finish_token(pos);
        }
        match sym {
            '#' => {
                if self.tag.is_empty() {
                    return Err(ParseError::EmptyTag { pos });
                }
                let tag = std::mem::take(&mut self.tag);
                self.current.tags_filter.push(tag);
            }
            '@' => {
                if self.tag.is_empty() {
                    return Err(ParseError::EmptyTag { pos });
                }
                let tag = std::mem::take(&mut self.tag);
                self.current.tags_filter.push(tag);
                self.state = State::ReadDatacenter;
            }
            '/' => {
                if self.tag.is_empty() {
                    return Err(ParseError::EmptyTag { pos });
                }
                let tag = std::mem::take(&mut self.tag);
                self.current.tags_filter.push(tag);
                self.re.clear();
                self.state = State::ReadRegexp;
            }
            _ => self.tag.push(sym),
        }
        Ok(())
    }

    fn on_brace(&mut self, sym: char, pos: usize) -> Result<(), ParseError> {
        match sym {
            '{' => return Err(ParseError::NestedPattern { pos }),
            '}' => self.state = State::ReadHost,
            _ => {}
        }
        self.current.value.push(sym);
        Ok(())
    }

    /// Returns the extra characters to skip (escape and trailing comma
    /// consumption happen here).
    fn on_regexp(&mut self, sym: char, last: bool, pos: usize) -> Result<Option<usize>, ParseError> {
        if sym == '\\' && !last && self.chars[pos + 1] == '/' {
            self.re.push('/');
            return Ok(Some(1));
        }

        if sym == '/' {
            let compiled = Regex::new(&self.re)
                .map_err(|source| ParseError::Regex { pos, source })?;
            self.current.regexp_filter = Some(compiled);
            self.finish_token(pos)?;
            // The regexp stops with "/EOL" or "/,"; Wait does not expect a
            // comma, so consume it here.
            if !last && self.chars[pos + 1] == ',' {
                return Ok(Some(1));
            }
            return Ok(None);
        }

        self.re.push(sym);
        Ok(None)
    }
}

#[cfg(test)]
#[path = "parser_tests/mod.rs"]
mod tests;
