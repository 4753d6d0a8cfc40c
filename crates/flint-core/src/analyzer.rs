//! File discovery and per-file orchestration.

use crate::category::FileCategory;
use crate::config::Config;
use crate::context::FileContext;
use crate::ignored::strip_ignored_regions;
use crate::lexer::{lex, LexError};
use crate::rule::{should_run, Rule, RuleBox};
use crate::types::{FileReport, LintReport};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Marker file that excludes a directory from linting.
pub const NOLINT_MARKER: &str = ".nolint";

/// Errors that stop an analysis run.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error resolving the working directory.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A path given to the analyzer does not exist.
    #[error("No such file or directory: {}", .0.display())]
    MissingPath(PathBuf),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// A file that failed to lex, kept with its text for rich rendering.
#[derive(Debug)]
pub struct LexFailure {
    /// The lexer error.
    pub error: LexError,
    /// Text the lexer saw.
    pub source: String,
}

impl LexFailure {
    /// Converts into a miette report that shows the offending snippet.
    #[must_use]
    pub fn into_report(self) -> miette::Report {
        let name = self.error.file.display().to_string();
        miette::Report::new(self.error).with_source_code(miette::NamedSource::new(name, self.source))
    }
}

/// Outcome of an analysis run.
#[derive(Debug, Default)]
pub struct Analysis {
    /// Diagnostics and counts.
    pub report: LintReport,
    /// Files skipped because they failed to lex.
    pub lex_failures: Vec<LexFailure>,
}

enum FileOutcome {
    Checked(FileReport),
    Unreadable { path: PathBuf, reason: String },
    Unlexable(LexFailure),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    paths: Vec<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory that reported paths are made relative to.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a file or directory to analyze.
    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Adds several files or directories to analyze.
    #[must_use]
    pub fn paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if an exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        let root = self.root.unwrap_or_else(|| PathBuf::from("."));

        let mut patterns = self.exclude_patterns;
        patterns.extend(config.analyzer.exclude.iter().cloned());
        let excludes = patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let paths = if self.paths.is_empty() {
            vec![root.clone()]
        } else {
            self.paths
        };

        Ok(Analyzer {
            root,
            paths,
            rules: self.rules,
            excludes,
            config,
        })
    }
}

/// Lints a set of files and directories with a set of rules.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    paths: Vec<PathBuf>,
    rules: Vec<RuleBox>,
    excludes: Vec<glob::Pattern>,
    config: Config,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Discovers, lexes and checks every file.
    ///
    /// Files are processed in parallel; the report lists them in discovery
    /// order. Unreadable or unlexable files are recorded as skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the requested paths does not exist.
    pub fn analyze(&self) -> Result<Analysis, AnalyzerError> {
        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let outcomes: Vec<FileOutcome> = files.par_iter().map(|path| self.analyze_path(path)).collect();

        let mut analysis = Analysis::default();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Checked(report) => analysis.report.push(report),
                FileOutcome::Unreadable { path, reason } => {
                    warn!("Skipping {}: {}", path.display(), reason);
                    analysis.report.skip_file(path, reason);
                }
                FileOutcome::Unlexable(failure) => {
                    warn!("Skipping {}", failure.error);
                    analysis
                        .report
                        .skip_file(failure.error.file.clone(), failure.error.kind.to_string());
                    analysis.lex_failures.push(failure);
                }
            }
        }

        let totals = analysis.report.totals();
        info!(
            "Analysis complete: {} errors, {} warnings, {} advice in {} files",
            totals.errors,
            totals.warnings,
            totals.advice,
            analysis.report.files_checked()
        );
        Ok(analysis)
    }

    fn analyze_path(&self, path: &Path) -> FileOutcome {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                return FileOutcome::Unreadable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            }
        };
        // Invalid bytes become U+FFFD; newlines are untouched.
        let source = String::from_utf8_lossy(&bytes);

        match self.analyze_source(path, &source) {
            Ok(report) => FileOutcome::Checked(report),
            Err(error) => FileOutcome::Unlexable(LexFailure {
                error,
                source: strip_ignored_regions(&source).text,
            }),
        }
    }

    /// Checks one file's text with every applicable rule.
    ///
    /// # Errors
    ///
    /// Returns the [`LexError`] if the text cannot be lexed; no diagnostics
    /// are produced for the file in that case.
    pub fn analyze_source(&self, path: &Path, source: &str) -> Result<FileReport, LexError> {
        debug!("Analyzing: {}", path.display());

        let stripped = strip_ignored_regions(source);
        if let Some(line) = stripped.unmatched_pause_line {
            warn!(
                "{}:{}: no matching \"// %flint: resume\" for \"// %flint: pause\"",
                path.display(),
                line
            );
        }

        let tokens = lex(&stripped.text, path)?;
        let ctx = FileContext::new(path, &self.root, self.config.c_mode);
        let mut report = FileReport::new(ctx.relative_path.clone());

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }
            if !should_run(rule.as_ref(), &ctx, self.config.min_severity) {
                continue;
            }

            match rule.check(&ctx, &tokens) {
                Ok(diagnostics) => {
                    let severity = self.config.rule_severity(rule.name());
                    for diagnostic in diagnostics {
                        report.add(match severity {
                            Some(severity) => diagnostic.with_severity(severity),
                            None => diagnostic,
                        });
                    }
                }
                Err(e) => {
                    warn!("{}: {} skipped: {}", path.display(), rule.name(), e);
                    report.skip_check(rule.name(), e.to_string());
                }
            }
        }

        Ok(report)
    }

    /// Lists the files that [`analyze`](Self::analyze) would check.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the requested paths does not exist.
    pub fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut files = Vec::new();

        for path in &self.paths {
            if path.is_file() {
                if self.is_candidate(path) {
                    files.push(path.clone());
                }
                continue;
            }
            if !path.is_dir() {
                return Err(AnalyzerError::MissingPath(path.clone()));
            }
            if path.join(NOLINT_MARKER).exists() {
                debug!("Skipping {} ({})", path.display(), NOLINT_MARKER);
                continue;
            }

            let respect = self.config.analyzer.respect_gitignore;
            let walker = ignore::WalkBuilder::new(path)
                .max_depth(if self.config.analyzer.recursive { None } else { Some(1) })
                .git_ignore(respect)
                .git_global(respect)
                .git_exclude(respect)
                .ignore(respect)
                .require_git(false)
                .hidden(false)
                .parents(false)
                .filter_entry(|e| {
                    !(e.file_type().is_some_and(|ft| ft.is_dir()) && e.path().join(NOLINT_MARKER).exists())
                })
                .sort_by_file_path(Path::cmp)
                .build();

            files.extend(
                walker
                    .filter_map(Result::ok)
                    .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
                    .map(ignore::DirEntry::into_path)
                    .filter(|p| self.is_candidate(p)),
            );
        }

        Ok(files)
    }

    fn is_candidate(&self, path: &Path) -> bool {
        if !FileCategory::of(path).is_known() {
            return false;
        }
        if self.should_exclude(path) {
            debug!("Excluding: {}", path.display());
            return false;
        }
        true
    }

    /// Checks if a path matches an exclude pattern.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.excludes
            .iter()
            .any(|pattern| pattern.matches_path(path) || pattern.matches_path(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::CheckError;
    use crate::token::{TokenKind, TokenStream};
    use crate::types::{Diagnostic, Severity};
    use std::fs;
    use tempfile::TempDir;

    /// Flags every `NULL` as advice.
    struct NullAdvice;

    impl Rule for NullAdvice {
        fn name(&self) -> &'static str {
            "null-advice"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn default_severity(&self) -> Severity {
            Severity::Advice
        }
        fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
            Ok(tokens
                .iter()
                .filter(|t| t.is_ident("NULL"))
                .map(|t| Diagnostic::new(self.code(), self.name(), Severity::Advice, t.line, "NULL"))
                .collect())
        }
    }

    /// Fails on any `catch` not followed by `(`.
    struct StrictCatch;

    impl Rule for StrictCatch {
        fn name(&self) -> &'static str {
            "strict-catch"
        }
        fn code(&self) -> &'static str {
            "TEST002"
        }
        fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
            for (i, t) in tokens.iter().enumerate() {
                if t.is(TokenKind::Catch) && tokens.kind(i + 1) != TokenKind::LParen {
                    return Err(CheckError::InvalidSource {
                        line: t.line,
                        message: "expected '(' after catch".into(),
                    });
                }
            }
            Ok(Vec::new())
        }
    }

    fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.cpp", "int* p = NULL;\n");
        write(dir.path(), "b.h", "#pragma once\n");
        write(dir.path(), "notes.txt", "NULL\n");
        write(dir.path(), "sub/c.cpp", "void f() { g(NULL); }\n");
        write(dir.path(), "skipped/.nolint", "");
        write(dir.path(), "skipped/d.cpp", "NULL\n");
        write(dir.path(), "third-party/e.cpp", "NULL\n");
        dir
    }

    fn analyzer(dir: &TempDir, config: Config) -> Analyzer {
        Analyzer::builder()
            .root(dir.path())
            .path(dir.path())
            .rule(NullAdvice)
            .rule(StrictCatch)
            .config(config)
            .build()
            .unwrap()
    }

    fn names(files: &[PathBuf], dir: &TempDir) -> Vec<String> {
        files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect()
    }

    #[test]
    fn test_discovery_non_recursive() {
        let dir = fixture();
        let files = analyzer(&dir, Config::default()).discover_files().unwrap();
        assert_eq!(names(&files, &dir), vec!["a.cpp", "b.h"]);
    }

    #[test]
    fn test_discovery_recursive_prunes_nolint_and_excludes() {
        let dir = fixture();
        let mut config = Config::default();
        config.analyzer.recursive = true;
        config.analyzer.exclude = vec!["third-party/**".to_string()];
        let files = analyzer(&dir, config).discover_files().unwrap();
        assert_eq!(names(&files, &dir), vec!["a.cpp", "b.h", "sub/c.cpp"]);
    }

    #[test]
    fn test_missing_path() {
        let result = Analyzer::builder()
            .path("/definitely/not/here")
            .build()
            .unwrap()
            .discover_files();
        assert!(matches!(result, Err(AnalyzerError::MissingPath(_))));
    }

    #[test]
    fn test_invalid_glob() {
        let result = Analyzer::builder().exclude("[").build();
        assert!(matches!(result, Err(AnalyzerError::Glob(_))));
    }

    #[test]
    fn test_analyze_counts_and_order() {
        let dir = fixture();
        let mut config = Config::default();
        config.analyzer.recursive = true;
        let analysis = analyzer(&dir, config).analyze().unwrap();
        let report = analysis.report;
        let paths: Vec<_> = report.files.iter().map(|f| f.path.display().to_string()).collect();
        assert_eq!(paths, vec!["a.cpp", "b.h", "sub/c.cpp", "third-party/e.cpp"]);
        assert_eq!(report.totals().advice, 3);
        assert!(!report.has_errors());
    }

    #[test]
    fn test_level_gating_skips_weaker_rules() {
        let dir = fixture();
        let config = Config {
            min_severity: Severity::Warning,
            ..Config::default()
        };
        let analysis = analyzer(&dir, config).analyze().unwrap();
        assert_eq!(analysis.report.totals().advice, 0);
    }

    #[test]
    fn test_severity_override_and_disable() {
        let dir = fixture();
        let config = Config::parse("[rules.null-advice]\nseverity = \"error\"\n").unwrap();
        let analysis = analyzer(&dir, config).analyze().unwrap();
        assert_eq!(analysis.report.totals().errors, 1);

        let config = Config::parse("[rules.null-advice]\nenabled = false\n").unwrap();
        let analysis = analyzer(&dir, config).analyze().unwrap();
        assert_eq!(analysis.report.totals().advice, 0);
    }

    #[test]
    fn test_lex_failure_skips_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "bad.cpp", "const char* s = \"open;\n");
        write(dir.path(), "good.cpp", "int* p = NULL;\n");
        let analysis = analyzer(&dir, Config::default()).analyze().unwrap();
        assert_eq!(analysis.report.files.len(), 1);
        assert_eq!(analysis.report.files_skipped.len(), 1);
        assert_eq!(analysis.lex_failures.len(), 1);
        assert_eq!(analysis.lex_failures[0].error.line, 1);
    }

    #[test]
    fn test_non_utf8_comment_is_still_checked() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("latin1.cpp"), b"// caf\xE9\nint* p = NULL;\n").unwrap();
        let analysis = analyzer(&dir, Config::default()).analyze().unwrap();
        assert!(analysis.report.files_skipped.is_empty());
        assert_eq!(analysis.report.files_checked(), 1);
        assert_eq!(analysis.report.files[0].diagnostics[0].line, 2);
        assert_eq!(analysis.report.totals().advice, 1);
    }

    #[test]
    fn test_check_error_is_recorded_not_fatal() {
        let dir = TempDir::new().unwrap();
        let analyzer = analyzer(&dir, Config::default());
        let report = analyzer
            .analyze_source(Path::new("x.cpp"), "try {} catch {}\nint* p = NULL;\n")
            .unwrap();
        assert_eq!(report.skipped_checks.len(), 1);
        assert_eq!(report.skipped_checks[0].rule, "strict-catch");
        assert_eq!(report.advice, 1);
    }

    #[test]
    fn test_ignored_regions_are_not_linted() {
        let dir = TempDir::new().unwrap();
        let analyzer = analyzer(&dir, Config::default());
        let source = "// %flint: pause\nint* p = NULL;\n// %flint: resume\nint* q = NULL;\n";
        let report = analyzer.analyze_source(Path::new("x.cpp"), source).unwrap();
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].line, 4);
    }
}
