//! The check rule trait.

use crate::context::FileContext;
use crate::token::TokenStream;
use crate::types::{Diagnostic, Severity};

use thiserror::Error;

/// Hard failure of a single check on a single file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// A keyword with fixed grammar is not followed by what it requires.
    #[error("line {line}: {message}; please compile before linting")]
    InvalidSource {
        /// Line of the offending token.
        line: usize,
        /// What was missing.
        message: String,
    },
}

/// A per-file check over the token stream.
///
/// Checks are independent of each other, hold no state between calls, and
/// may run in any order or in parallel.
///
/// # Example
///
/// ```ignore
/// use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};
///
/// pub struct NoGoto;
///
/// impl Rule for NoGoto {
///     fn name(&self) -> &'static str { "no-goto" }
///     fn code(&self) -> &'static str { "FL900" }
///
///     fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
///         Ok(tokens
///             .iter()
///             .filter(|t| t.is(TokenKind::Goto))
///             .map(|t| Diagnostic::new(self.code(), self.name(), Severity::Error, t.line, "goto"))
///             .collect())
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "catch-by-reference").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "FL009").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Tier used to decide whether the rule runs at a given level.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether the rule is skipped in C mode and for `.c` files.
    fn cpp_only(&self) -> bool {
        false
    }

    /// Checks one file.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError`] when the source is malformed in a way the
    /// check cannot get past.
    fn check(&self, ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Returns true if `rule` should run for `ctx` at `level`.
#[must_use]
pub fn should_run(rule: &dyn Rule, ctx: &FileContext, level: Severity) -> bool {
    rule.default_severity().passes(level) && !(rule.cpp_only() && ctx.is_c_only())
}
