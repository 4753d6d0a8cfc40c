//! Rule to flag implicit conversion operators.
//!
//! # Rationale
//!
//! A non-explicit `operator T()` lets the compiler convert silently, and
//! `operator bool()` in particular makes objects usable in arithmetic.
//!
//! # Detected Patterns
//!
//! - `operator bool() const;` (error unless deleted)
//! - `operator std::string() const;`
//!
//! # Allowed Patterns
//!
//! - `explicit operator bool() const;`
//! - `/* implicit */ operator int() const;`
//! - `operator bool() = delete;`

use crate::support::{scope_aborted, IMPLICIT_MARKER};
use flint_core::navigator::{at_sequence, join_type_name, Cursor};
use flint_core::scope::{walk_scopes, ScopeFrame, ScopeKind, ScopeVisitor};
use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for implicit-cast.
pub const CODE: &str = "FL020";

/// Rule name for implicit-cast.
pub const NAME: &str = "implicit-cast";

const BOOL_DETAIL: &str = "In C++11 use explicit conversion (explicit operator bool()), \
otherwise use something like the safe-bool idiom if the syntactic convenience is justified \
in this case, or consider defining a function (see \
http://www.artima.com/cppsource/safebool.html for more details).";

const CONVERSION_DETAIL: &str = "Prefix the function with the 'explicit' keyword to avoid this, \
or add an /* implicit */ comment to suppress this warning.";

/// Flags conversion operators that are not `explicit`.
#[derive(Debug, Clone, Default)]
pub struct ImplicitCast;

impl ImplicitCast {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ImplicitCast {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Flags non-explicit conversion operators"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn cpp_only(&self) -> bool {
        true
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let mut visitor = CastVisitor::default();
        if let Err(err) = walk_scopes(tokens, &mut visitor) {
            scope_aborted(NAME, &err);
        }
        Ok(visitor.diagnostics)
    }
}

#[derive(Default)]
struct CastVisitor {
    diagnostics: Vec<Diagnostic>,
}

impl CastVisitor {
    /// Handles `operator` at `pos`.
    fn operator(&mut self, tokens: &TokenStream<'_>, pos: Cursor) {
        let token = tokens.get(pos);

        if at_sequence(
            tokens,
            pos,
            &[TokenKind::Operator, TokenKind::Bool, TokenKind::LParen, TokenKind::RParen],
        ) {
            let deleted = at_sequence(tokens, pos + 4, &[TokenKind::Assign, TokenKind::Delete])
                || at_sequence(
                    tokens,
                    pos + 4,
                    &[TokenKind::Const, TokenKind::Assign, TokenKind::Delete],
                );
            if !deleted {
                self.diagnostics.push(
                    Diagnostic::new(CODE, NAME, Severity::Error, token.line, "operator bool() is dangerous.")
                        .with_detail(BOOL_DETAIL),
                );
            }
            return;
        }

        if token.trivia.contains(IMPLICIT_MARKER) {
            return;
        }

        let mut converts = false;
        let mut target = Vec::new();
        let mut at = pos + 1;
        while !tokens.at_eof(at) && !tokens.get(at).is(TokenKind::LParen) {
            let part = tokens.get(at);
            if part.kind.is_builtin_type() || part.is(TokenKind::Identifier) {
                converts = true;
            }
            target.push(part.lexeme);
            at += 1;
        }

        if converts {
            self.diagnostics.push(
                Diagnostic::new(
                    CODE,
                    NAME,
                    Severity::Warning,
                    token.line,
                    format!("Implicit conversion to '{}' may inadvertently be used.", join_type_name(target)),
                )
                .with_detail(CONVERSION_DETAIL),
            );
        }
    }
}

impl ScopeVisitor for CastVisitor {
    fn visit_member(&mut self, tokens: &TokenStream<'_>, pos: Cursor, frame: &mut ScopeFrame) -> Cursor {
        if !matches!(frame.kind, ScopeKind::Class | ScopeKind::Struct) {
            return pos;
        }

        if at_sequence(
            tokens,
            pos,
            &[TokenKind::Explicit, TokenKind::Constexpr, TokenKind::Operator],
        ) {
            return pos + 2;
        }
        if at_sequence(tokens, pos, &[TokenKind::Explicit, TokenKind::Operator])
            || at_sequence(tokens, pos, &[TokenKind::DoubleColon, TokenKind::Operator])
        {
            return pos + 1;
        }

        if tokens.get(pos).is(TokenKind::Operator) {
            self.operator(tokens, pos);
        }
        pos
    }
}
