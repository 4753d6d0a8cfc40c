//! Check command implementation.

use anyhow::{Context, Result};
use flint_core::{Analysis, Analyzer, Config, Severity};
use flint_rules::{all_rules, find_rules};
use std::path::{Path, PathBuf};

use crate::config_resolver::{self, ConfigSource};
use crate::OutputFormat;

/// Arguments of `flint check`.
pub struct CheckArgs {
    /// Files or directories to analyze.
    pub paths: Vec<PathBuf>,
    /// `--recursive` was given.
    pub recursive: bool,
    /// `--c-mode` was given.
    pub c_mode: bool,
    /// `--level`, overriding the configured threshold.
    pub level: Option<Severity>,
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes.
    pub rules: Option<String>,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
    /// `--config`.
    pub config: Option<PathBuf>,
    /// `--verbose`.
    pub verbose: bool,
}

/// Runs the check command.
pub fn run(args: &CheckArgs) -> Result<()> {
    let project_dir = project_dir(&args.paths);
    let source = config_resolver::resolve(&project_dir, args.config.as_deref());
    let config = apply_flags(load_config(&source)?, args);
    let threshold = config.min_severity;

    let rules = match &args.rules {
        Some(filter) => {
            let names: Vec<&str> = filter.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
            find_rules(&config, &names)?
        }
        None => all_rules(&config),
    };

    let mut builder = Analyzer::builder()
        .paths(args.paths.iter().cloned())
        .rules(rules)
        .config(config);

    // Add exclude patterns
    for pattern in &args.exclude {
        builder = builder.exclude(pattern.as_str());
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", args.paths, analyzer.rule_count());

    let Analysis { report, lex_failures } = analyzer.analyze().context("Analysis failed")?;

    for failure in lex_failures {
        eprintln!("{:?}", failure.into_report());
    }

    super::output::print(&report, args.format, threshold, args.verbose)?;

    // Exit with error code if there are errors
    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Directory searched for a project config: the first path, or its parent
/// when it names a file.
fn project_dir(paths: &[PathBuf]) -> PathBuf {
    match paths.first() {
        Some(path) if path.is_file() => path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        Some(path) => path.clone(),
        None => PathBuf::from("."),
    }
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    match source {
        ConfigSource::Default => Ok(Config::default()),
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
        }
    }
}

/// Command-line flags win over the file.
fn apply_flags(mut config: Config, args: &CheckArgs) -> Config {
    if args.recursive {
        config.analyzer.recursive = true;
    }
    if args.c_mode {
        config.c_mode = true;
    }
    if let Some(level) = args.level {
        config.min_severity = level;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CheckArgs {
        CheckArgs {
            paths: vec![PathBuf::from(".")],
            recursive: false,
            c_mode: false,
            level: None,
            format: OutputFormat::Text,
            rules: None,
            exclude: Vec::new(),
            config: None,
            verbose: false,
        }
    }

    #[test]
    fn flags_override_config() {
        let config = Config::parse("min_severity = \"advice\"\n[analyzer]\nrecursive = false\n").unwrap();
        let mut args = args();
        args.recursive = true;
        args.c_mode = true;
        args.level = Some(Severity::Error);

        let config = apply_flags(config, &args);
        assert!(config.analyzer.recursive);
        assert!(config.c_mode);
        assert_eq!(config.min_severity, Severity::Error);
    }

    #[test]
    fn absent_flags_keep_config() {
        let config = Config::parse("c_mode = true\nmin_severity = \"warning\"\n").unwrap();
        let config = apply_flags(config, &args());
        assert!(config.c_mode);
        assert_eq!(config.min_severity, Severity::Warning);
    }

    #[test]
    fn project_dir_of_file_is_its_parent() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("a.cpp");
        std::fs::write(&file, "").unwrap();
        assert_eq!(project_dir(&[file]), tmp.path());
        assert_eq!(project_dir(&[tmp.path().to_path_buf()]), tmp.path());
        assert_eq!(project_dir(&[]), PathBuf::from("."));
    }

    #[test]
    fn load_config_reports_bad_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("flint.toml");
        std::fs::write(&path, "min_severity = 3").unwrap();
        let err = load_config(&ConfigSource::Project(path)).unwrap_err();
        assert!(err.to_string().starts_with("Failed to load config"));
    }
}
