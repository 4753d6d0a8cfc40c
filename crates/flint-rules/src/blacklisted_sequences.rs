//! Rule to warn about `volatile`.
//!
//! # Rationale
//!
//! `volatile` neither makes accesses atomic nor orders them between threads,
//! yet it is regularly reached for as if it did.
//!
//! # Detected Patterns
//!
//! - `volatile int flag;`
//!
//! # Allowed Patterns
//!
//! - `asm volatile (...)`

use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for blacklisted-sequences.
pub const CODE: &str = "FL017";

/// Rule name for blacklisted-sequences.
pub const NAME: &str = "blacklisted-sequences";

const VOLATILE_DETAIL: &str = "If multiple threads are sharing data, use std::atomic or locks. \
In addition, 'volatile' may force the compiler to generate worse code than it could otherwise. \
For more about why 'volatile' doesn't do what you think it does, see \
http://www.kernel.org/doc/Documentation/volatile-considered-harmful.txt.";

/// Warns on `volatile` outside inline assembly.
#[derive(Debug, Clone, Default)]
pub struct BlacklistedSequences;

impl BlacklistedSequences {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for BlacklistedSequences {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Warns on volatile, which is not a synchronization primitive"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn cpp_only(&self) -> bool {
        true
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let diagnostics = tokens
            .iter()
            .enumerate()
            .filter(|(pos, t)| t.is(TokenKind::Volatile) && !(*pos > 0 && tokens.get(pos - 1).is(TokenKind::Asm)))
            .map(|(_, t)| {
                Diagnostic::new(CODE, NAME, Severity::Warning, t.line, "'volatile' is not thread-safe.")
                    .with_detail(VOLATILE_DETAIL)
            })
            .collect();
        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::testing::{check, titles};

    #[test]
    fn test_detects_volatile() {
        let code = "volatile int a;\nstruct S { volatile bool done_; };\n";
        let diagnostics = check(&BlacklistedSequences::new(), "a.cpp", code);
        assert_eq!(
            titles(&diagnostics),
            vec!["'volatile' is not thread-safe.", "'volatile' is not thread-safe."]
        );
        assert_eq!(diagnostics[0].line, 1);
        assert_eq!(diagnostics[1].line, 2);
        assert!(diagnostics[0].detail.as_deref().is_some_and(|d| d.contains("std::atomic")));
    }

    #[test]
    fn test_allows_asm_volatile() {
        let code = "void f() { asm volatile(\"nop\"); }";
        assert!(check(&BlacklistedSequences::new(), "a.cpp", code).is_empty());
    }
}
