//! Rule to check that preprocessor conditionals balance.
//!
//! # Rationale
//!
//! An unmatched `#endif` or `#else` is a compile error in the best case and
//! a silently different build in the worst. Only the first problem is
//! reported since every later count is off by the same amount.
//!
//! # Detected Patterns
//!
//! - `#endif` with no open `#if`/`#ifdef`/`#ifndef`
//! - `#else` with no open conditional
//! - conditionals still open at end of file
//!
//! `#elif` is neutral.

use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for if-endif-balance.
pub const CODE: &str = "FL003";

/// Rule name for if-endif-balance.
pub const NAME: &str = "if-endif-balance";

/// Checks `#if`/`#endif` nesting.
#[derive(Debug, Clone, Default)]
pub struct IfEndifBalance;

impl IfEndifBalance {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for IfEndifBalance {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires balanced #if/#endif"
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let error = |line: usize, title: &str| Ok(vec![Diagnostic::new(CODE, NAME, Severity::Error, line, title)]);
        let mut open = 0usize;

        for token in tokens {
            match token.kind {
                k if k.opens_conditional() => open += 1,
                TokenKind::PoundEndif => match open.checked_sub(1) {
                    Some(remaining) => open = remaining,
                    None => return error(token.line, "Unmatched #endif."),
                },
                TokenKind::PoundElse if open == 0 => return error(token.line, "Unmatched #else."),
                _ => {}
            }
        }

        if open != 0 {
            return error(tokens.last().line, "Unmatched #if/#endif.");
        }
        Ok(Vec::new())
    }
}
