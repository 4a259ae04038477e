//! Output sinks for a finished run.

use std::io::{self, Write};

use serde::Serialize;

use crate::model::{AssetStatus, FailureReason, ResultSequence, RunSummary};

/// Write one line per ordinal: the address, or a `#` sentinel for anything
/// that did not resolve.
pub fn write_lines<W: Write>(sequence: &ResultSequence, mut out: W) -> io::Result<()> {
    for asset in sequence.iter() {
        writeln!(out, "{}", asset.line())?;
    }
    out.flush()
}

#[derive(Serialize)]
struct ReportEntry<'a> {
    ordinal: usize,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a FailureReason>,
}

#[derive(Serialize)]
struct Report<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    board: Option<&'a str>,
    start: usize,
    stop: usize,
    summary: RunSummary,
    unresolved: Vec<usize>,
    entries: Vec<ReportEntry<'a>>,
}

/// Write a JSON status report so failed ordinals can be re-run by range.
pub fn write_report<W: Write>(
    sequence: &ResultSequence,
    board: Option<&str>,
    out: W,
) -> serde_json::Result<()> {
    let entries = sequence
        .iter()
        .map(|asset| ReportEntry {
            ordinal: asset.ordinal(),
            status: asset.status().label(),
            address: asset.address(),
            reason: match asset.status() {
                AssetStatus::Failed(reason) => Some(reason),
                _ => None,
            },
        })
        .collect();

    let report = Report {
        board,
        start: sequence.start(),
        stop: sequence.stop(),
        summary: sequence.summary(),
        unresolved: sequence.unresolved_ordinals(),
        entries,
    };
    serde_json::to_writer_pretty(out, &report)
}
