//! Rule to catch unnamed lock guards.
//!
//! # Rationale
//!
//! `std::lock_guard<std::mutex>(m);` constructs a temporary that unlocks at
//! the end of the statement, so the code it was meant to protect runs
//! unlocked.
//!
//! # Detected Patterns
//!
//! - `lock_guard<...>(m)`
//! - `unique_lock<...>(m)`

use flint_core::navigator::{at_sequence, skip_template_spec};
use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for mutex-holder-has-name.
pub const CODE: &str = "FL013";

/// Rule name for mutex-holder-has-name.
pub const NAME: &str = "mutex-holder-has-name";

const MUTEX_HOLDERS: &[&str] = &["lock_guard", "unique_lock"];

/// Requires lock guard objects to be named variables.
#[derive(Debug, Clone, Default)]
pub struct MutexHolderHasName;

impl MutexHolderHasName {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for MutexHolderHasName {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids unnamed lock_guard/unique_lock temporaries"
    }

    fn cpp_only(&self) -> bool {
        true
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let mut diagnostics = Vec::new();

        for pos in 0..tokens.len() {
            if !at_sequence(tokens, pos, &[TokenKind::Identifier, TokenKind::Less])
                || !MUTEX_HOLDERS.iter().any(|h| *h == tokens.get(pos).lexeme)
            {
                continue;
            }
            let close = skip_template_spec(tokens, pos + 1);
            if at_sequence(tokens, close, &[TokenKind::Greater, TokenKind::LParen]) {
                diagnostics.push(Diagnostic::new(
                    CODE,
                    NAME,
                    Severity::Error,
                    tokens.get(close).line,
                    "Mutex holder variable declared without a name, causing the lock to be released immediately.",
                ));
            }
        }

        Ok(diagnostics)
    }
}
