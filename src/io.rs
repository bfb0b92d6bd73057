//! Input and output for the CLI frontend.
//!
//! Reads a JSON document from a file or stdin and writes rendered output to
//! stdout.

use std::fmt::Write as _;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::{DiagramError, Result};
use crate::network::{CmosNetwork, TransistorCount};
use crate::normalize::SynthesisSteps;

/// Read the whole input document.
///
/// `None` or `-` reads stdin.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => {
            std::fs::read_to_string(p).map_err(|e| DiagramError::FileReadError {
                path: p.display().to_string(),
                source: e,
            })
        }
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| DiagramError::FileReadError {
                    path: "<stdin>".to_string(),
                    source: e,
                })?;
            Ok(buffer)
        }
    }
}

/// Write rendered output to stdout, followed by a newline.
pub fn write_output(text: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(text.as_bytes())
        .and_then(|_| handle.write_all(b"\n"))
        .and_then(|_| handle.flush())
        .map_err(|e| DiagramError::OutputError {
            message: e.to_string(),
        })
}

/// Plain-text report of a CMOS network: pipeline steps, networks and counts.
pub fn summary(
    network: &CmosNetwork,
    count: &TransistorCount,
    steps: Option<&SynthesisSteps>,
) -> String {
    let mut out = String::new();
    if let Some(steps) = steps {
        for (label, expr) in steps.expressions() {
            let _ = writeln!(out, "{label:<21}{expr}");
        }
        out.push('\n');
    }
    let _ = writeln!(out, "{:<12}{}", "PUN", network.pun);
    let _ = writeln!(out, "{:<12}{}", "PDN", network.pdn);
    out.push('\n');
    let _ = writeln!(out, "{:<12}{}", "PUN", count.pun_transistors);
    let _ = writeln!(out, "{:<12}{}", "PDN", count.pdn_transistors);
    let _ = writeln!(out, "{:<12}{}", "Inverters", count.inverter_transistors);
    let _ = write!(out, "{:<12}{}", "Total", count.total_transistors);
    if !count.inverted_inputs.is_empty() {
        let _ = write!(out, "\nInverted inputs: {}", count.inverted_inputs.join(", "));
    }
    out
}
