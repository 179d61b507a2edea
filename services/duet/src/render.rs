//! Transcript Rendering
//!
//! Turns a finished session into text for the terminal or JSON for other tools.

use crate::runner::SessionReport;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Write;

/// Which side of each utterance to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RevealMode {
    Original,
    Translated,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    role1: &'a str,
    role2: &'a str,
    rounds: &'a [duet_core::TranscriptEntry],
    summary: Option<&'a str>,
}

fn push_line(out: &mut String, role: &str, utterance: &str, translation: &str, reveal: RevealMode) {
    // Writing to a String cannot fail.
    let _ = match reveal {
        RevealMode::Original => writeln!(out, "{role}: {utterance}"),
        RevealMode::Translated => writeln!(out, "{role}: {translation}"),
        RevealMode::Both => writeln!(out, "{role}: {utterance}\n    {translation}"),
    };
}

pub fn render_text(report: &SessionReport, reveal: RevealMode) -> String {
    let mut out = String::new();
    for (i, entry) in report.transcript.entries().iter().enumerate() {
        let _ = writeln!(out, "--- Round {} ---", i + 1);
        push_line(
            &mut out,
            &report.role1,
            &entry.role1_utterance,
            &entry.role1_translation,
            reveal,
        );
        push_line(
            &mut out,
            &report.role2,
            &entry.role2_utterance,
            &entry.role2_translation,
            reveal,
        );
    }
    if let Some(summary) = &report.summary {
        let _ = writeln!(out, "\n=== Learning points ===\n{summary}");
    }
    out
}

pub fn render_json(report: &SessionReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        role1: &report.role1,
        role2: &report.role2,
        rounds: report.transcript.entries(),
        summary: report.summary.as_deref(),
    })
}

pub fn render(
    report: &SessionReport,
    reveal: RevealMode,
    format: OutputFormat,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report, reveal)),
        OutputFormat::Json => render_json(report),
    }
}
