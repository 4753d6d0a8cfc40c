//! Rule to match `unique_ptr` array-ness with its `new` expression.
//!
//! # Rationale
//!
//! `unique_ptr<Foo> p(new Foo[8])` compiles but releases the array with
//! `delete` instead of `delete[]`. The reverse mismatch is just as wrong.
//!
//! # Detected Patterns
//!
//! - `unique_ptr<T> p(new T[n])`
//! - `std::unique_ptr<T[]> p(new T)`

use flint_core::navigator::{read_qualified_identifier, scan_template_spec, skip_template_spec};
use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for unique-ptr-usage.
pub const CODE: &str = "FL012";

/// Rule name for unique-ptr-usage.
pub const NAME: &str = "unique-ptr-usage";

/// Checks that `unique_ptr` array types match their allocation.
#[derive(Debug, Clone, Default)]
pub struct UniquePtrUsage;

impl UniquePtrUsage {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn is_unique_ptr(names: &[&str]) -> bool {
    matches!(names, ["unique_ptr"] | ["std", "unique_ptr"])
}

impl Rule for UniquePtrUsage {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires unique_ptr<T[]> exactly when the pointer owns an array"
    }

    fn cpp_only(&self) -> bool {
        true
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let mut diagnostics = Vec::new();
        let mut pos = 0;

        while !tokens.at_eof(pos) {
            let (names, next) = read_qualified_identifier(tokens, pos);
            if !is_unique_ptr(&names) {
                pos = next.max(pos + 1);
                continue;
            }
            let anchor = tokens.get(pos).line;
            pos = next;

            if !tokens.get(pos).is(TokenKind::Less) {
                continue;
            }
            let spec = scan_template_spec(tokens, pos);
            if tokens.at_eof(spec.close) {
                break;
            }

            // An optional variable name, then the constructor arguments.
            let mut at = spec.close + 1;
            if tokens.get(at).is(TokenKind::Identifier) {
                at += 1;
            }
            if !tokens.get(at).is(TokenKind::LParen) {
                continue;
            }

            let mut depth = 0usize;
            while !tokens.at_eof(at) {
                match tokens.kind(at) {
                    TokenKind::LParen => depth += 1,
                    TokenKind::RParen => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    TokenKind::New if depth == 1 => {
                        at += 1;
                        while matches!(tokens.kind(at), TokenKind::Identifier | TokenKind::DoubleColon) {
                            at += 1;
                        }
                        if tokens.get(at).is(TokenKind::Less) {
                            at = skip_template_spec(tokens, at);
                            if tokens.at_eof(at) {
                                return Ok(diagnostics);
                            }
                            at += 1;
                        } else {
                            while tokens.kind(at).is_builtin_type() {
                                at += 1;
                            }
                        }
                        while matches!(
                            tokens.kind(at),
                            TokenKind::Star | TokenKind::Const | TokenKind::Volatile
                        ) {
                            at += 1;
                        }

                        let new_has_array = tokens.get(at).is(TokenKind::LSquare);
                        if new_has_array != spec.contains_array {
                            let title = if spec.contains_array {
                                "unique_ptr<T[]> should be used with an array type"
                            } else {
                                "unique_ptr<T> should be unique_ptr<T[]> when used with an array"
                            };
                            diagnostics.push(Diagnostic::new(CODE, NAME, Severity::Error, anchor, title));
                        }
                        break;
                    }
                    _ => {}
                }
                at += 1;
            }
        }

        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::testing::{check, titles};

    fn check_code(code: &str) -> Vec<Diagnostic> {
        check(&UniquePtrUsage::new(), "a.cpp", code)
    }

    #[test]
    fn test_array_new_into_scalar_pointer() {
        let diagnostics = check_code("void f() {\n  std::unique_ptr<Foo> p(new Foo[8]);\n}");
        assert_eq!(
            titles(&diagnostics),
            vec!["unique_ptr<T> should be unique_ptr<T[]> when used with an array"]
        );
        assert_eq!(diagnostics[0].line, 2);
    }

    #[test]
    fn test_scalar_new_into_array_pointer() {
        let diagnostics = check_code("unique_ptr<int[]> p(new int(3));");
        assert_eq!(titles(&diagnostics), vec!["unique_ptr<T[]> should be used with an array type"]);
    }

    #[test]
    fn test_matching_forms() {
        let code = "\
std::unique_ptr<Foo> a(new Foo(1, 2));
std::unique_ptr<Foo[]> b(new Foo[4]);
unique_ptr<unsigned int[]> c(new unsigned int[n]);
unique_ptr<Foo> d(new ns::Foo<int>());
unique_ptr<char*[]> e(new char*[2]);
std::unique_ptr<Foo> f(make(new Foo[2]));
";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_templated_new() {
        let diagnostics = check_code("unique_ptr<Foo> q(new Bar<int>[3]);");
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_right_shift_close_hides_the_rest_of_the_file() {
        // `>>` does not close two template lists.
        let code = "unique_ptr<Vec<int>> p;\nunique_ptr<Foo> q(new Foo[3]);";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_other_smart_pointers_ignored() {
        assert!(check_code("my::unique_ptr<Foo> p(new Foo[8]);").is_empty());
    }
}
