//! # flint-core
//!
//! Core framework for linting C and C++ sources from a token stream.
//!
//! This crate provides:
//!
//! - [`lex`] turning source text into a [`TokenStream`]
//! - [`navigator`] primitives for balanced skips and call argument parsing
//! - [`scope`] tracking of class and namespace nesting
//! - the [`Rule`] trait every check implements
//! - [`Analyzer`] for file discovery and per-file orchestration
//! - [`LintReport`], the run-level diagnostic sink
//!
//! ## Example
//!
//! ```ignore
//! use flint_core::{Analyzer, Config};
//!
//! let analysis = Analyzer::builder()
//!     .path("./src")
//!     .rules(flint_rules::all_rules(&Config::default()))
//!     .build()?
//!     .analyze()?;
//!
//! println!("{} errors", analysis.report.totals().errors);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod category;
mod config;
mod context;
mod ignored;
mod lexer;
mod rule;
mod token;
mod types;

/// Cursor-based token stream primitives.
pub mod navigator;
/// Class and namespace scope tracking.
pub mod scope;

pub use analyzer::{Analysis, Analyzer, AnalyzerBuilder, AnalyzerError, LexFailure, NOLINT_MARKER};
pub use category::{file_name_base, FileCategory};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use ignored::{strip_ignored_regions, Stripped};
pub use lexer::{lex, LexError, LexErrorKind};
pub use navigator::{ArgumentSpan, Cursor, NavError};
pub use rule::{should_run, CheckError, Rule, RuleBox};
pub use token::{Token, TokenKind, TokenStream};
pub use types::{Diagnostic, FileReport, LintReport, Severity, SkippedCheck, SkippedFile, Totals};
