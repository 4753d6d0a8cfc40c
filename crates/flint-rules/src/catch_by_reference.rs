//! Rule to require exceptions be caught by reference.
//!
//! # Rationale
//!
//! Catching by value slices derived exceptions down to the caught type and
//! copies them. Built-in types should not be thrown at all.
//!
//! # Detected Patterns
//!
//! - `catch (Exception e)` and `catch (const Exception e)`
//! - `catch (int e)` (not a user-defined type)
//!
//! # Allowed Patterns
//!
//! - `catch (Type&)`, `catch (const Type& e)`, `catch (Type const& e)`
//! - `catch (...)`

use flint_core::navigator::{join_type_name, Cursor};
use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for catch-by-reference.
pub const CODE: &str = "FL009";

/// Rule name for catch-by-reference.
pub const NAME: &str = "catch-by-reference";

/// Requires `catch` clauses to bind by reference.
#[derive(Debug, Clone, Default)]
pub struct CatchByReference;

impl CatchByReference {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Returns the position of the `)` closing the catch clause whose first
/// type token is at `pos`.
fn closing_paren(tokens: &TokenStream<'_>, pos: Cursor) -> Result<Cursor, CheckError> {
    let mut depth = 0usize;
    let mut at = pos;
    loop {
        match tokens.kind(at) {
            TokenKind::EndOfFile => {
                return Err(CheckError::InvalidSource {
                    line: tokens.get(at).line,
                    message: "unterminated catch clause".to_string(),
                })
            }
            TokenKind::RParen if depth == 0 => return Ok(at),
            TokenKind::RParen => depth -= 1,
            TokenKind::LParen => depth += 1,
            _ => {}
        }
        at += 1;
    }
}

impl Rule for CatchByReference {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires exceptions to be caught by reference"
    }

    fn cpp_only(&self) -> bool {
        true
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let mut diagnostics = Vec::new();

        for pos in 0..tokens.len() {
            if !tokens.get(pos).is(TokenKind::Catch) {
                continue;
            }

            let open = pos + 1;
            if !tokens.get(open).is(TokenKind::LParen) {
                return Err(CheckError::InvalidSource {
                    line: tokens.get(open).line,
                    message: "expected '(' after 'catch'".to_string(),
                });
            }

            let mut focal = open + 1;
            if tokens.get(focal).is(TokenKind::Ellipsis) {
                continue;
            }
            for optional in [TokenKind::Const, TokenKind::Typename, TokenKind::DoubleColon] {
                if tokens.get(focal).is(optional) {
                    focal += 1;
                }
            }

            let caught = tokens.get(focal);
            if !caught.is(TokenKind::Identifier) {
                diagnostics.push(
                    Diagnostic::new(
                        CODE,
                        NAME,
                        Severity::Warning,
                        caught.line,
                        format!("Symbol {} invalid in catch clause.", caught.lexeme),
                    )
                    .with_detail("You may only catch user-defined types."),
                );
                continue;
            }

            let close = closing_paren(tokens, focal + 1)?;
            let by_reference = tokens.get(close - 1).is(TokenKind::Ampersand)
                || (tokens.get(close - 1).is(TokenKind::Identifier)
                    && tokens.get(close - 2).is(TokenKind::Ampersand));
            if by_reference {
                continue;
            }

            let symbol = tokens.get(close - 1);
            let type_name = join_type_name((open + 1..close - 1).map(|at| tokens.get(at).lexeme));
            diagnostics.push(
                Diagnostic::new(
                    CODE,
                    NAME,
                    Severity::Error,
                    symbol.line,
                    format!("Symbol {} of type {type_name} caught by value.", symbol.lexeme),
                )
                .with_detail("Use catch by (preferably const) reference throughout."),
            );
        }

        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::testing::{check, run, titles};

    fn check_code(code: &str) -> Vec<Diagnostic> {
        check(&CatchByReference::new(), "a.cpp", code)
    }

    #[test]
    fn test_reference_forms_pass() {
        assert!(check_code("try {} catch (Exception &) {}").is_empty());
        let code = "\
try {} catch (const Exception& e) {}
try {} catch (Exception const& e) {}
try {} catch (const typename T::Error& e) {}
try {} catch (::ns::Error& e) {}
try {} catch (Ex<(1 + 1)>& e) {}
try {} catch (...) {}
";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_by_value() {
        let diagnostics = check_code("try {} catch (Exception e) {}");
        assert_eq!(titles(&diagnostics), vec!["Symbol e of type Exception caught by value."]);
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn test_by_value_qualified_type() {
        let diagnostics = check_code("try {}\ncatch (const std::runtime_error e) {}");
        assert_eq!(
            titles(&diagnostics),
            vec!["Symbol e of type const std::runtime_error caught by value."]
        );
        assert_eq!(diagnostics[0].line, 2);
    }

    #[test]
    fn test_by_value_template_type_reads_as_written() {
        let diagnostics = check_code("try {} catch (std::vector<Ex> v) {}");
        assert_eq!(titles(&diagnostics), vec!["Symbol v of type std::vector<Ex> caught by value."]);
    }

    #[test]
    fn test_builtin_type() {
        let diagnostics = check_code("try {} catch (int e) {}");
        assert_eq!(titles(&diagnostics), vec!["Symbol int invalid in catch clause."]);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn test_missing_paren_is_invalid_source() {
        let err = run(&CatchByReference::new(), "a.cpp", "try {} catch {}").unwrap_err();
        assert_eq!(
            err,
            CheckError::InvalidSource {
                line: 1,
                message: "expected '(' after 'catch'".to_string()
            }
        );
    }

    #[test]
    fn test_unterminated_clause_is_invalid_source() {
        let result = run(&CatchByReference::new(), "a.cpp", "try {} catch (Exception& e");
        assert!(matches!(result, Err(CheckError::InvalidSource { .. })));
    }

    #[test]
    fn test_idempotent() {
        let code = "try {} catch (Exception e) {} catch (Other o) {}";
        assert_eq!(check_code(code), check_code(code));
    }
}
