//! Rule to require include guards in headers.
//!
//! # Rationale
//!
//! A header without a guard breaks as soon as it is included twice in one
//! translation unit.
//!
//! # Detected Patterns
//!
//! - a header not starting with `#pragma once` or `#ifndef X` / `#define X`
//! - `#ifndef X` followed by `#define Y`
//! - a guard whose `#endif` is not the last token of the file
//!
//! Inline headers (`-inl.h`) are included from their owner and need no
//! guard of their own.

use flint_core::navigator::at_sequence;
use flint_core::{CheckError, Diagnostic, FileCategory, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for include-guard.
pub const CODE: &str = "FL006";

/// Rule name for include-guard.
pub const NAME: &str = "include-guard";

const GUARD: &[TokenKind] = &[
    TokenKind::PoundIfndef,
    TokenKind::Identifier,
    TokenKind::PoundDefine,
    TokenKind::Identifier,
];

/// Requires headers to be wrapped in an include guard.
#[derive(Debug, Clone, Default)]
pub struct IncludeGuard;

impl IncludeGuard {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn error(line: usize, title: impl Into<String>) -> Diagnostic {
        Diagnostic::new(CODE, NAME, Severity::Error, line, title)
    }
}

impl Rule for IncludeGuard {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires an include guard or #pragma once in headers"
    }

    fn check(&self, ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        if ctx.category != FileCategory::Header {
            return Ok(Vec::new());
        }

        if tokens.get(0).is(TokenKind::PoundPragma) && tokens.get(1).is_ident("once") {
            return Ok(Vec::new());
        }

        if !at_sequence(tokens, 0, GUARD) {
            return Ok(vec![Self::error(tokens.get(0).line, "Missing include guard.")]);
        }

        let mut diagnostics = Vec::new();
        let (guard, defined) = (tokens.get(1), tokens.get(3));
        if guard.lexeme != defined.lexeme {
            diagnostics.push(Self::error(
                guard.line,
                format!(
                    "Include guard name mismatch; expected {}, saw {}",
                    guard.lexeme, defined.lexeme
                ),
            ));
        }

        let mut open = 1usize;
        let mut pos = 1;
        while !tokens.at_eof(pos) {
            let kind = tokens.kind(pos);
            if kind.opens_conditional() {
                open += 1;
            } else if kind == TokenKind::PoundEndif {
                open -= 1;
                if open == 0 {
                    break;
                }
            }
            pos += 1;
        }

        // The closing #endif must be the last token before EndOfFile.
        if open != 0 || pos + 1 != tokens.eof() {
            diagnostics.push(Self::error(
                tokens.last().line,
                "Include guard doesn't cover the entire file.",
            ));
        }

        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::testing::{check, titles};

    #[test]
    fn test_accepts_guard() {
        let code = "#ifndef FOO_H\n#define FOO_H\n#ifdef X\nint x;\n#endif\nint y;\n#endif\n";
        assert!(check(&IncludeGuard::new(), "Foo.h", code).is_empty());
    }

    #[test]
    fn test_accepts_pragma_once() {
        assert!(check(&IncludeGuard::new(), "Foo.hpp", "#pragma once\nint x;\n").is_empty());
    }

    #[test]
    fn test_missing_guard() {
        let diagnostics = check(&IncludeGuard::new(), "Foo.h", "int x;\n");
        assert_eq!(titles(&diagnostics), vec!["Missing include guard."]);
        assert_eq!(diagnostics[0].line, 1);
    }

    #[test]
    fn test_name_mismatch() {
        let code = "#ifndef FOO_H\n#define FOOH\n#endif\n";
        let diagnostics = check(&IncludeGuard::new(), "Foo.h", code);
        assert_eq!(
            titles(&diagnostics),
            vec!["Include guard name mismatch; expected FOO_H, saw FOOH"]
        );
    }

    #[test]
    fn test_code_after_endif() {
        let code = "#ifndef FOO_H\n#define FOO_H\n#endif\nint x;\n";
        let diagnostics = check(&IncludeGuard::new(), "Foo.h", code);
        assert_eq!(titles(&diagnostics), vec!["Include guard doesn't cover the entire file."]);
        assert_eq!(diagnostics[0].line, 5);
    }

    #[test]
    fn test_unclosed_guard() {
        let code = "#ifndef FOO_H\n#define FOO_H\nint x;\n";
        let diagnostics = check(&IncludeGuard::new(), "Foo.h", code);
        assert_eq!(titles(&diagnostics), vec!["Include guard doesn't cover the entire file."]);
    }

    #[test]
    fn test_sources_and_inline_headers_are_skipped() {
        assert!(check(&IncludeGuard::new(), "Foo.cpp", "int x;").is_empty());
        assert!(check(&IncludeGuard::new(), "Foo-inl.h", "int x;").is_empty());
    }
}
