//! Shared output formatting for lint results.

use anyhow::Result;
use flint_core::{Diagnostic, LintReport, Severity, SkippedCheck, SkippedFile, Totals};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// Only diagnostics passing `threshold` are shown; totals always count
/// everything that was recorded.
pub fn print(report: &LintReport, format: OutputFormat, threshold: Severity, verbose: bool) -> Result<()> {
    let rendered = match format {
        OutputFormat::Text => render_text(report, threshold, verbose),
        OutputFormat::Json => render_json(report, threshold)?,
        OutputFormat::Compact => render_compact(report, threshold),
    };
    print!("{rendered}");
    Ok(())
}

fn render_text(report: &LintReport, threshold: Severity, verbose: bool) -> String {
    let mut out = String::new();

    for file in &report.files {
        for diagnostic in file.visible(threshold) {
            let _ = writeln!(out, "{}", diagnostic.format(&file.path, verbose));
        }
        if verbose {
            for skipped in &file.skipped_checks {
                let _ = writeln!(
                    out,
                    "[Skipped] {}: {} did not finish: {}",
                    file.path.display(),
                    skipped.rule,
                    skipped.reason
                );
            }
        }
    }

    let totals = report.totals();
    let _ = writeln!(out, "Lint Summary: {} files", report.files_checked());
    if !report.files_skipped.is_empty() {
        let _ = writeln!(out, "Skipped: {} files", report.files_skipped.len());
    }
    let _ = writeln!(
        out,
        "Errors: {} Warnings: {} Advice: {}",
        totals.errors, totals.warnings, totals.advice
    );
    out
}

fn render_compact(report: &LintReport, threshold: Severity) -> String {
    let mut out = String::new();
    for file in &report.files {
        for diagnostic in file.visible(threshold) {
            let _ = writeln!(
                out,
                "{}:{}: {} [{}] {}",
                file.path.display(),
                diagnostic.line,
                diagnostic.severity,
                diagnostic.code,
                diagnostic.title,
            );
        }
    }
    out
}

#[derive(Serialize)]
struct JsonFile<'a> {
    path: &'a Path,
    diagnostics: Vec<&'a Diagnostic>,
    #[serde(skip_serializing_if = "<[SkippedCheck]>::is_empty")]
    skipped_checks: &'a [SkippedCheck],
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files: Vec<JsonFile<'a>>,
    totals: Totals,
    #[serde(skip_serializing_if = "<[SkippedFile]>::is_empty")]
    files_skipped: &'a [SkippedFile],
}

fn render_json(report: &LintReport, threshold: Severity) -> Result<String> {
    let view = JsonReport {
        files: report
            .files
            .iter()
            .map(|file| JsonFile {
                path: &file.path,
                diagnostics: file.visible(threshold),
                skipped_checks: &file.skipped_checks,
            })
            .collect(),
        totals: report.totals(),
        files_skipped: &report.files_skipped,
    };
    let mut json = serde_json::to_string_pretty(&view)?;
    json.push('\n');
    Ok(json)
}
