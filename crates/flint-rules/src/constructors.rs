//! Rule for constructor conversion, copy and move hygiene.
//!
//! # Rationale
//!
//! A constructor callable with one argument doubles as an implicit
//! conversion, so `void f(Widget); f(42);` compiles when nobody meant it to.
//! Copy constructors taking a non-const reference cannot copy from
//! temporaries, and a const rvalue reference makes a move constructor that
//! cannot move.
//!
//! # Detected Patterns
//!
//! - `Widget(int size);` and `Widget(int a, int b = 0);` (conversion)
//! - `Widget(Widget& other);` (non-const copy)
//! - `Widget(const Widget&& other);` (const move)
//!
//! # Allowed Patterns
//!
//! - `explicit Widget(int size);`
//! - `/* implicit */ Widget(int size);`
//! - `Widget();`, `Widget(void);`
//! - `Widget(std::initializer_list<int> values);`

use crate::support::{scope_aborted, IMPLICIT_MARKER};
use flint_core::navigator::{at_sequence, format_call, name_and_arguments, skip_function_declaration, Cursor};
use flint_core::scope::{walk_scopes, ScopeFrame, ScopeKind, ScopeVisitor};
use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for constructors.
pub const CODE: &str = "FL008";

/// Rule name for constructors.
pub const NAME: &str = "constructors";

/// Frame flag: a constructor failed to parse, stop looking at this class.
const ABANDONED: u32 = 1;

/// Checks constructor declarations inside class and struct bodies.
#[derive(Debug, Clone, Default)]
pub struct Constructors;

impl Constructors {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for Constructors {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Flags implicit conversion constructors and mis-qualified copy/move constructors"
    }

    fn cpp_only(&self) -> bool {
        true
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let mut visitor = ConstructorVisitor::default();
        if let Err(err) = walk_scopes(tokens, &mut visitor) {
            scope_aborted(NAME, &err);
        }
        Ok(visitor.diagnostics)
    }
}

#[derive(Default)]
struct ConstructorVisitor {
    diagnostics: Vec<Diagnostic>,
}

impl ConstructorVisitor {
    fn error(&mut self, line: usize, title: String) -> &mut Diagnostic {
        self.diagnostics
            .push(Diagnostic::new(CODE, NAME, Severity::Error, line, title));
        let last = self.diagnostics.len() - 1;
        &mut self.diagnostics[last]
    }

    /// Looks at a constructor whose name is at `pos`. Returns `None` when
    /// the argument list does not parse.
    fn constructor(&mut self, tokens: &TokenStream<'_>, pos: Cursor, class: &str) -> Option<()> {
        let token = tokens.get(pos);

        if at_sequence(
            tokens,
            pos,
            &[TokenKind::Identifier, TokenKind::LParen, TokenKind::Void, TokenKind::RParen],
        ) || token.trivia.contains(IMPLICIT_MARKER)
        {
            return Some(());
        }

        let call = name_and_arguments(tokens, pos).ok()?;
        let Some(first) = call.args.first() else {
            return Some(());
        };

        let mut arg = first.first;
        let is_const = tokens.get(arg).is(TokenKind::Const);
        if is_const {
            arg += 1;
        }

        // Copy and move constructors; pointers and template arguments are
        // left alone.
        if tokens.get(arg).lexeme == class {
            let next = if arg + 1 == first.last {
                TokenKind::EndOfFile
            } else {
                tokens.kind(arg + 1)
            };
            let signature = || format_call(tokens, call.name, &call.args);
            match next {
                TokenKind::Ampersand if !is_const => {
                    self.error(
                        token.line,
                        format!("Copy constructors should take a const argument: {}", signature()),
                    );
                }
                TokenKind::LogicalAnd if is_const => {
                    self.error(
                        token.line,
                        format!("Move constructors should not take a const argument: {}", signature()),
                    );
                }
                _ => {}
            }
            if next != TokenKind::Star {
                return Some(());
            }
        }

        if at_sequence(
            tokens,
            arg,
            &[TokenKind::Identifier, TokenKind::DoubleColon, TokenKind::Identifier, TokenKind::Less],
        ) && tokens.get(arg).lexeme == "std"
            && tokens.get(arg + 2).lexeme == "initializer_list"
        {
            return Some(());
        }

        let converts = match call.args.get(1) {
            None => true,
            Some(second) => (second.first..second.last).any(|at| tokens.get(at).is(TokenKind::Assign)),
        };
        if converts {
            let signature = format_call(tokens, call.name, &call.args);
            self.error(
                token.line,
                format!(
                    "Single - argument constructor '{signature}' may inadvertently be used as a type conversion constructor."
                ),
            )
            .detail = Some(
                "Prefix the function with the 'explicit' keyword to avoid this, or add an /* implicit */ comment to suppress this warning."
                    .to_string(),
            );
        }
        Some(())
    }
}

impl ScopeVisitor for ConstructorVisitor {
    fn enter_scope(&mut self, _tokens: &TokenStream<'_>, frame: &mut ScopeFrame) {
        if !matches!(frame.kind, ScopeKind::Class | ScopeKind::Struct) || frame.name.is_none() {
            frame.flags.insert(ABANDONED);
        }
    }

    fn visit_member(&mut self, tokens: &TokenStream<'_>, pos: Cursor, frame: &mut ScopeFrame) -> Cursor {
        if frame.flags.contains(ABANDONED) {
            return pos;
        }
        let token = tokens.get(pos);

        if token.is(TokenKind::Explicit) {
            return skip_function_declaration(tokens, pos);
        }

        let is_constructor = at_sequence(tokens, pos, &[TokenKind::Identifier, TokenKind::LParen])
            && frame.name.as_deref() == Some(token.lexeme);
        if !is_constructor {
            return pos;
        }

        if self.constructor(tokens, pos, token.lexeme).is_none() {
            frame.flags.insert(ABANDONED);
            return pos;
        }
        skip_function_declaration(tokens, pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::testing::{check, titles};

    fn check_code(code: &str) -> Vec<Diagnostic> {
        check(&Constructors::new(), "widget.h", code)
    }

    #[test]
    fn test_single_argument_constructor() {
        let diagnostics = check_code("class AA { AA(int bad); };");
        assert_eq!(
            titles(&diagnostics),
            vec!["Single - argument constructor 'AA(int bad)' may inadvertently be used as a type conversion constructor."]
        );
        assert!(diagnostics[0].detail.is_some());
    }

    #[test]
    fn test_const_copy_constructor() {
        assert!(check_code("class AA { AA(const AA& ok); };").is_empty());
    }

    #[test]
    fn test_non_const_copy_constructor() {
        let diagnostics = check_code("struct AA {\n  AA(AA& other);\n};");
        assert_eq!(
            titles(&diagnostics),
            vec!["Copy constructors should take a const argument: AA(AA& other)"]
        );
        assert_eq!(diagnostics[0].line, 2);
    }

    #[test]
    fn test_move_constructors() {
        assert!(check_code("class AA { AA(AA&& other); };").is_empty());
        let diagnostics = check_code("class AA { AA(const AA&& other); };");
        assert_eq!(
            titles(&diagnostics),
            vec!["Move constructors should not take a const argument: AA(const AA&& other)"]
        );
    }

    #[test]
    fn test_pointer_to_own_type_converts() {
        let diagnostics = check_code("class AA { AA(AA* parent); };");
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_exempt_forms() {
        let code = "\
class AA {
 public:
  AA();
  AA(void);
  explicit AA(int a);
  /* implicit */ AA(double d);
  AA(std::initializer_list<int> values);
  AA(int a, int b);
  void AA2(int a);
};
";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_default_second_argument_converts() {
        let diagnostics = check_code("class AA { AA(int a, int b = 0) {} };");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].title.contains("AA(int a, int b = 0)"));
    }

    #[test]
    fn test_nested_and_unnamed_classes() {
        let code = "\
class Outer {
  class Inner { Inner(int x); };
  Outer(int y);
};
struct { int v; } anon;
";
        let diagnostics = check_code(code);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].line, 2);
        assert_eq!(diagnostics[1].line, 3);
    }

    #[test]
    fn test_member_function_bodies_are_skipped() {
        let code = "class AA { void f() { AA(1); } AA(const AA& o) : x(AA(2)) {} int x; };";
        assert!(check_code(code).is_empty());
    }
}
