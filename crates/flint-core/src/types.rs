//! Diagnostics and the per-file and run-level sinks that collect them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Severity of a diagnostic.
///
/// Ordered from strongest to weakest: `Error < Warning < Advice`. A
/// threshold of `Warning` admits errors and warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Must be fixed.
    Error,
    /// Should be addressed.
    Warning,
    /// Stylistic suggestion.
    Advice,
}

impl Severity {
    /// Returns true if a diagnostic of this severity passes `threshold`.
    #[must_use]
    pub fn passes(self, threshold: Self) -> bool {
        self <= threshold
    }

    /// Bracketed, padded label used by the text renderer.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Error => "[Error  ]",
            Self::Warning => "[Warning]",
            Self::Advice => "[Advice ]",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Advice => write!(f, "advice"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" | "errors" => Ok(Self::Error),
            "warning" | "warnings" => Ok(Self::Warning),
            "advice" => Ok(Self::Advice),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

/// A finding reported by a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule code (e.g., "FL009").
    pub code: String,
    /// Rule name (e.g., "catch-by-reference").
    pub rule: String,
    /// Severity of this finding.
    pub severity: Severity,
    /// Line number (1-indexed).
    pub line: usize,
    /// One-line summary.
    pub title: String,
    /// Longer explanation, shown in verbose output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        line: usize,
        title: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            line,
            title: title.into(),
            detail: None,
        }
    }

    /// Attaches a longer explanation.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Replaces the severity, used for per-rule overrides.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Formats the diagnostic the way the text renderer prints it.
    #[must_use]
    pub fn format(&self, path: &Path, verbose: bool) -> String {
        let mut output = format!(
            "{} {}:{}: {}",
            self.severity.tag(),
            path.display(),
            self.line,
            self.title
        );
        if verbose {
            if let Some(detail) = &self.detail {
                for line in detail.lines() {
                    output.push_str("\n    ");
                    output.push_str(line);
                }
            }
        }
        output
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} [{}] {}", self.line, self.severity, self.code, self.title)
    }
}

/// Counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Number of errors.
    pub errors: usize,
    /// Number of warnings.
    pub warnings: usize,
    /// Number of advice notes.
    pub advice: usize,
}

impl Totals {
    fn count(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Advice => self.advice += 1,
        }
    }
}

/// A check that could not finish on a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedCheck {
    /// Rule name.
    pub rule: String,
    /// Why the check stopped.
    pub reason: String,
}

/// Append-only diagnostics for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    /// Path as displayed in output.
    pub path: PathBuf,
    /// Diagnostics in the order they were added.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of errors.
    pub errors: usize,
    /// Number of warnings.
    pub warnings: usize,
    /// Number of advice notes.
    pub advice: usize,
    /// Checks that gave up on this file.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_checks: Vec<SkippedCheck>,
}

impl FileReport {
    /// Creates an empty report for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            diagnostics: Vec::new(),
            errors: 0,
            warnings: 0,
            advice: 0,
            skipped_checks: Vec::new(),
        }
    }

    /// Appends a diagnostic and bumps the count for its severity.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Advice => self.advice += 1,
        }
        self.diagnostics.push(diagnostic);
    }

    /// Records a check that stopped early.
    pub fn skip_check(&mut self, rule: impl Into<String>, reason: impl Into<String>) {
        self.skipped_checks.push(SkippedCheck {
            rule: rule.into(),
            reason: reason.into(),
        });
    }

    /// Counts for this file.
    #[must_use]
    pub fn totals(&self) -> Totals {
        Totals {
            errors: self.errors,
            warnings: self.warnings,
            advice: self.advice,
        }
    }

    /// Diagnostics that pass `threshold`, in line order.
    #[must_use]
    pub fn visible(&self, threshold: Severity) -> Vec<&Diagnostic> {
        let mut shown: Vec<_> = self
            .diagnostics
            .iter()
            .filter(|d| d.severity.passes(threshold))
            .collect();
        shown.sort_by_key(|d| d.line);
        shown
    }
}

/// A file that could not be analyzed at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    /// Path of the file.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: String,
}

/// Run-level sink aggregating every file report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintReport {
    /// Per-file reports in discovery order.
    pub files: Vec<FileReport>,
    /// Counts over every recorded diagnostic.
    totals: Totals,
    /// Files that failed to read or lex.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files_skipped: Vec<SkippedFile>,
}

impl LintReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file's diagnostics as a new file report.
    pub fn add_file(&mut self, path: impl Into<PathBuf>, diagnostics: Vec<Diagnostic>) {
        let mut report = FileReport::new(path);
        for diagnostic in diagnostics {
            report.add(diagnostic);
        }
        self.push(report);
    }

    /// Adds an already-built file report.
    pub fn push(&mut self, report: FileReport) {
        for diagnostic in &report.diagnostics {
            self.totals.count(diagnostic.severity);
        }
        self.files.push(report);
    }

    /// Records a file that could not be analyzed.
    pub fn skip_file(&mut self, path: impl Into<PathBuf>, reason: impl Into<String>) {
        self.files_skipped.push(SkippedFile {
            path: path.into(),
            reason: reason.into(),
        });
    }

    /// Counts across all files.
    #[must_use]
    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// Returns true if any error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.totals.errors > 0
    }

    /// Number of files analyzed.
    #[must_use]
    pub fn files_checked(&self) -> usize {
        self.files.len()
    }
}
