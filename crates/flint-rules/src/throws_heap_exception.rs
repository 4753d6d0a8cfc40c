//! Rule to forbid throwing heap-allocated exceptions.
//!
//! # Rationale
//!
//! `throw new Foo()` throws a pointer. Handlers written as
//! `catch (const Foo&)` never see it, and whoever does catch it must
//! remember to delete it.
//!
//! # Detected Patterns
//!
//! - `throw new Foo(...)`
//! - `throw new (Foo)(...)`
//! - `throw new ns::Foo(...)`

use flint_core::navigator::{at_sequence, read_qualified_identifier};
use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for throws-heap-exception.
pub const CODE: &str = "FL010";

/// Rule name for throws-heap-exception.
pub const NAME: &str = "throws-heap-exception";

/// Forbids `throw new`.
#[derive(Debug, Clone, Default)]
pub struct ThrowsHeapException;

impl ThrowsHeapException {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ThrowsHeapException {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids throwing heap-allocated exceptions"
    }

    fn cpp_only(&self) -> bool {
        true
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let mut diagnostics = Vec::new();

        for pos in 0..tokens.len() {
            if !at_sequence(tokens, pos, &[TokenKind::Throw, TokenKind::New]) {
                continue;
            }

            let mut focal = pos + 2;
            let message = if matches!(tokens.kind(focal), TokenKind::Identifier | TokenKind::DoubleColon) {
                let (names, _) = read_qualified_identifier(tokens, focal);
                let root = if tokens.get(focal).is(TokenKind::DoubleColon) { "::" } else { "" };
                format!("Heap-allocated exception: throw new {root}{}();", names.join("::"))
            } else if at_sequence(
                tokens,
                focal,
                &[TokenKind::LParen, TokenKind::Identifier, TokenKind::RParen],
            ) {
                focal += 1;
                format!("Heap-allocated exception: throw new ({})();", tokens.get(focal).lexeme)
            } else {
                "Heap-allocated exception: throw new was used.".to_string()
            };

            diagnostics.push(Diagnostic::new(
                CODE,
                NAME,
                Severity::Error,
                tokens.get(focal).line,
                format!("{message} This is usually a mistake in c++."),
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
    fn test_detects_forms() {
        let code = "\
void f() {
  throw new Error(\"x\");
  throw new (Error)();
  throw new std::runtime_error(\"x\");
  throw new ::Error();
  throw new int(3);
}
";
        let diagnostics = check(&ThrowsHeapException::new(), "a.cpp", code);
        assert_eq!(
            titles(&diagnostics),
            vec![
                "Heap-allocated exception: throw new Error(); This is usually a mistake in c++.",
                "Heap-allocated exception: throw new (Error)(); This is usually a mistake in c++.",
                "Heap-allocated exception: throw new std::runtime_error(); This is usually a mistake in c++.",
                "Heap-allocated exception: throw new ::Error(); This is usually a mistake in c++.",
                "Heap-allocated exception: throw new was used. This is usually a mistake in c++.",
            ]
        );
        assert_eq!(diagnostics[1].line, 3);
    }

    #[test]
    fn test_allows_value_throw() {
        let code = "void f() { throw Error(); Foo* p = new Foo(); throw; }";
        assert!(check(&ThrowsHeapException::new(), "a.cpp", code).is_empty());
    }
}
