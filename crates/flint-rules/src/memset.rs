//! Rule to catch swapped `memset` arguments.
//!
//! # Rationale
//!
//! `memset(&foo, sizeof(foo), 0)` compiles and clears nothing. The value
//! and the length are easy to swap because both are integers.
//!
//! # Detected Patterns
//!
//! - `memset(p, n, 0)`
//! - `memset(p, sizeof(...), 1)`
//!
//! A `memset` nested in another call's arguments is not checked. Calls whose
//! arguments do not parse into exactly three are skipped.

use flint_core::navigator::{at_sequence, format_call, name_and_arguments, NameAndArguments};
use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};
use tracing::debug;

/// Rule code for memset.
pub const CODE: &str = "FL004";

/// Rule name for memset.
pub const NAME: &str = "memset";

/// Flags `memset` calls with the value and length swapped.
#[derive(Debug, Clone, Default)]
pub struct Memset;

impl Memset {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for Memset {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Catches memset calls with swapped value and length"
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let mut diagnostics = Vec::new();

        for pos in 0..tokens.len() {
            if !at_sequence(tokens, pos, &[TokenKind::Identifier, TokenKind::LParen])
                || !tokens.get(pos).is_ident("memset")
            {
                continue;
            }

            let NameAndArguments { name, mut args, .. } = match name_and_arguments(tokens, pos) {
                Ok(call) => call,
                Err(err) => {
                    debug!(rule = NAME, error = %err, "giving up on file");
                    break;
                }
            };
            if args.len() != 3 {
                continue;
            }

            let value = args[2];
            let swapped = value.len() == 1 && {
                let lexeme = tokens.get(value.first).lexeme;
                lexeme == "0" || (lexeme == "1" && tokens.get(args[1].first).is(TokenKind::Sizeof))
            };
            if !swapped {
                continue;
            }

            args.swap(1, 2);
            diagnostics.push(Diagnostic::new(
                CODE,
                NAME,
                Severity::Error,
                tokens.get(pos).line,
                format!("Did you mean {} ?", format_call(tokens, name, &args)),
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
    fn test_detects_zero_length() {
        let diagnostics = check(&Memset::new(), "a.c", "void f() { memset(&foo, sizeof(foo), 0); }");
        assert_eq!(titles(&diagnostics), vec!["Did you mean memset(&foo, 0, sizeof(foo)) ?"]);
    }

    #[test]
    fn test_detects_one_with_sizeof() {
        let diagnostics = check(&Memset::new(), "a.cpp", "memset(buf, sizeof buf, 1);");
        assert_eq!(titles(&diagnostics), vec!["Did you mean memset(buf, 1, sizeof buf) ?"]);
    }

    #[test]
    fn test_allows_correct_calls() {
        let code = "memset(&foo, 0, sizeof(foo));\nmemset(buf, 1, n);\nmemset(buf, c, 10);";
        assert!(check(&Memset::new(), "a.cpp", code).is_empty());
    }

    #[test]
    fn test_template_argument_counts_as_one() {
        let code = "memset(p, sizeof(Foo<A, B>), 0);";
        let diagnostics = check(&Memset::new(), "a.cpp", code);
        assert_eq!(titles(&diagnostics), vec!["Did you mean memset(p, 0, sizeof(Foo<A, B>)) ?"]);
    }

    #[test]
    fn test_comparison_in_argument_is_a_known_miss() {
        let code = "memset(&foo, a < b ? c : d, 0);\n";
        assert!(check(&Memset::new(), "a.cpp", code).is_empty());
    }
}
