// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal sink: ANSI colors, rules, width, progress counter.

use crate::pty::query_winsize;
use std::io::IsTerminal;
use std::io::Write;
use std::os::fd::AsRawFd;

/// ANSI foreground color codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red = 91,
    Green = 92,
    Yellow = 93,
    Blue = 94,
    Cyan = 96,
}

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR=1` disables → `COLOR=1` forces → TTY check.
pub fn should_colorize() -> bool {
    if std::env::var("NO_COLOR").is_ok_and(|v| v == "1") {
        return false;
    }
    if std::env::var("COLOR").is_ok_and(|v| v == "1") {
        return true;
    }
    std::io::stdout().is_terminal()
}

/// Wrap a message in escape sequences for a color, unconditionally.
pub fn colored(message: &str, color: Color, bold: bool) -> String {
    let bold = if bold { ";1" } else { "" };
    format!("\x1b[{}{}m{}\x1b[0m", color as u8, bold, message)
}

fn paint(message: &str, color: Color) -> String {
    if should_colorize() {
        colored(message, color, false)
    } else {
        message.to_string()
    }
}

pub fn blue(message: &str) -> String {
    paint(message, Color::Blue)
}

pub fn red(message: &str) -> String {
    paint(message, Color::Red)
}

pub fn green(message: &str) -> String {
    paint(message, Color::Green)
}

pub fn yellow(message: &str) -> String {
    paint(message, Color::Yellow)
}

pub fn cyan(message: &str) -> String {
    paint(message, Color::Cyan)
}

/// A horizontal rule of `n` dashes; empty for non-positive lengths.
pub fn hr(n: isize) -> String {
    if n <= 0 {
        return String::new();
    }
    "-".repeat(n as usize)
}

/// Print a red error message.
pub fn errorf(message: &str) {
    print!("{}", red(message));
    let _ = std::io::stdout().flush();
}

/// Print a green success message.
pub fn successf(message: &str) {
    print!("{}", green(message));
    let _ = std::io::stdout().flush();
}

/// Print a yellow warning message.
pub fn warnf(message: &str) {
    print!("{}", yellow(message));
    let _ = std::io::stdout().flush();
}

/// Width of the operator's terminal, 80 when stdout is not one.
pub fn terminal_width() -> usize {
    match query_winsize(std::io::stdout().as_raw_fd()) {
        Some(size) if size.ws_col > 0 => size.ws_col as usize,
        _ => 80,
    }
}

/// Minimal in-place `[done/total]` counter.
pub struct Progress {
    done: usize,
    total: usize,
    enabled: bool,
}

impl Progress {
    pub fn start(total: usize, enabled: bool) -> Self {
        let progress = Self { done: 0, total, enabled };
        progress.draw();
        progress
    }

    pub fn increment(&mut self) {
        self.done += 1;
        self.draw();
    }

    fn draw(&self) {
        if self.enabled {
            print!("\r[{}/{}]", self.done, self.total);
            let _ = std::io::stdout().flush();
        }
    }

    pub fn finish(self) {
        if self.enabled {
            println!();
        }
    }
}

#[cfg(test)]
#[path = "term_tests.rs"]
mod tests;
