// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run results and their terminal rendering.

use crate::term;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;

/// Outcome of one dispatch run.
#[derive(Debug, Default)]
pub struct ExecResult {
    /// Final status code per host.
    pub codes: HashMap<String, i32>,
    /// Collapse mode: identical output to the hosts that produced it.
    pub outputs: BTreeMap<String, Vec<String>>,
    pub success_hosts: Vec<String>,
    pub error_hosts: Vec<String>,
    /// Workers force-stopped by the operator during this run.
    pub force_stopped: usize,
}

impl ExecResult {
    /// Record one host's final status.
    pub fn record(&mut self, hostname: &str, code: i32) {
        self.codes.insert(hostname.to_string(), code);
        if code == 0 {
            self.success_hosts.push(hostname.to_string());
        } else {
            self.error_hosts.push(hostname.to_string());
        }
    }

    /// Hosts that reported any outcome.
    pub fn processed(&self) -> usize {
        self.success_hosts.len() + self.error_hosts.len()
    }

    /// Render the green summary bar.
    pub fn render_summary(&self, out: &mut impl Write) -> std::io::Result<()> {
        let msg = format!(
            " Hosts processed: {}, success: {}, error: {}    ",
            self.processed(),
            self.success_hosts.len(),
            self.error_hosts.len()
        );
        let rule = term::hr(msg.len() as isize);
        writeln!(out, "{}", term::green(&rule))?;
        writeln!(out, "{}", term::green(&msg))?;
        writeln!(out, "{}", term::green(&rule))?;
        Ok(())
    }

    pub fn print_summary(&self) {
        let _ = self.render_summary(&mut std::io::stdout());
    }

    /// Render the collapse groups: one blue header per distinct output.
    pub fn render_output_map(&self, out: &mut impl Write) -> std::io::Result<()> {
        for (output, hosts) in &self.outputs {
            let msg = format!(" {} host(s): {}   ", hosts.len(), hosts.join(","));
            let width = (msg.len() + 2).min(term::terminal_width());
            let rule = term::hr(width as isize);
            writeln!(out, "{}", term::blue(&rule))?;
            writeln!(out, "{}", term::blue(&msg))?;
            writeln!(out, "{}", term::blue(&rule))?;
            writeln!(out, "{output}")?;
        }
        Ok(())
    }

    pub fn print_output_map(&self) {
        let _ = self.render_output_map(&mut std::io::stdout());
    }
}

/// Render a resolved host list the way the `hostlist` command shows it.
pub fn render_host_list(
    expr: &str,
    hosts: &[String],
    out: &mut impl Write,
) -> std::io::Result<()> {
    let max_len = hosts.iter().map(String::len).max().unwrap_or(0);
    let title = format!(" Hostlist {expr}    ");
    let width = title.len().max(max_len + 2);
    let rule = term::hr(width as isize);

    writeln!(out, "{}", term::green(&rule))?;
    writeln!(out, "{}", term::green(&title))?;
    writeln!(out, "{}", term::green(&rule))?;
    for host in hosts {
        writeln!(out, "{host}")?;
    }
    writeln!(out, "{}", term::green(&format!("Total: {} hosts", hosts.len())))?;
    Ok(())
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
