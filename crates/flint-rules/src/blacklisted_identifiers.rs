//! Rule to forbid identifiers with thread-unsafe semantics.
//!
//! # Rationale
//!
//! Some C library functions keep hidden static state between calls. In a
//! multi-threaded program two callers silently corrupt each other.
//!
//! # Detected Patterns
//!
//! - `strtok(...)`, which has the reentrant replacement `strtok_r`

use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for blacklisted-identifiers.
pub const CODE: &str = "FL001";

/// Rule name for blacklisted-identifiers.
pub const NAME: &str = "blacklisted-identifiers";

/// Identifier and the message reported for it.
const BLACKLIST: &[(&str, &str)] = &[("strtok", "'strtok' is not thread safe. Consider 'strtok_r'.")];

/// Forbids thread-unsafe library identifiers.
#[derive(Debug, Clone, Default)]
pub struct BlacklistedIdentifiers;

impl BlacklistedIdentifiers {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for BlacklistedIdentifiers {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids library functions that are not thread safe"
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let diagnostics = tokens
            .iter()
            .filter(|t| t.is(TokenKind::Identifier))
            .filter_map(|t| {
                BLACKLIST
                    .iter()
                    .find(|(ident, _)| t.lexeme == *ident)
                    .map(|(_, title)| Diagnostic::new(CODE, NAME, Severity::Error, t.line, *title))
            })
            .collect();
        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::testing::check;

    #[test]
    fn test_detects_strtok() {
        let diagnostics = check(
            &BlacklistedIdentifiers::new(),
            "a.cpp",
            "void f(char* s) {\n  char* t = strtok(s, \",\");\n}\n",
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 2);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].code, CODE);
    }

    #[test]
    fn test_ignores_reentrant_variant_and_strings() {
        let diagnostics = check(
            &BlacklistedIdentifiers::new(),
            "a.c",
            "char* t = strtok_r(s, \",\", &save); const char* m = \"strtok\";",
        );
        assert!(diagnostics.is_empty());
    }
}
