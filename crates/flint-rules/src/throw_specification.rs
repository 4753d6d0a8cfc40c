//! Rule to flag dynamic exception specifications.
//!
//! # Detected Patterns
//!
//! - `void f() throw(std::bad_alloc);` at namespace scope or in a class
//!
//! # Allowed Patterns
//!
//! - `~Derived() throw();` and `const char* what() const throw();`, which
//!   classes deriving from `std::exception` may need

use crate::support::scope_aborted;
use flint_core::navigator::{at_sequence, Cursor};
use flint_core::scope::{walk_scopes, ScopeFrame, ScopeVisitor};
use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for throw-specification.
pub const CODE: &str = "FL022";

/// Rule name for throw-specification.
pub const NAME: &str = "throw-specification";

const DESTRUCTOR: &[TokenKind] = &[
    TokenKind::Tilde,
    TokenKind::Identifier,
    TokenKind::LParen,
    TokenKind::RParen,
    TokenKind::Throw,
    TokenKind::LParen,
    TokenKind::RParen,
];

const WHAT: &[TokenKind] = &[
    TokenKind::LParen,
    TokenKind::RParen,
    TokenKind::Const,
    TokenKind::Throw,
    TokenKind::LParen,
    TokenKind::RParen,
];

/// Warns on `throw(...)` specifications outside function bodies.
#[derive(Debug, Clone, Default)]
pub struct ThrowSpecification;

impl ThrowSpecification {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ThrowSpecification {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Warns on deprecated throw specifications"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn cpp_only(&self) -> bool {
        true
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let mut visitor = SpecificationVisitor::default();
        if let Err(err) = walk_scopes(tokens, &mut visitor) {
            scope_aborted(NAME, &err);
        }
        Ok(visitor.diagnostics)
    }
}

#[derive(Default)]
struct SpecificationVisitor {
    diagnostics: Vec<Diagnostic>,
}

impl SpecificationVisitor {
    fn specification(&mut self, tokens: &TokenStream<'_>, pos: Cursor) {
        if at_sequence(tokens, pos, &[TokenKind::Throw, TokenKind::LParen]) {
            self.diagnostics.push(Diagnostic::new(
                CODE,
                NAME,
                Severity::Warning,
                tokens.get(pos).line,
                "Throw specifications on functions are deprecated.",
            ));
        }
    }
}

impl ScopeVisitor for SpecificationVisitor {
    fn visit_member(&mut self, tokens: &TokenStream<'_>, pos: Cursor, _frame: &mut ScopeFrame) -> Cursor {
        if at_sequence(tokens, pos, DESTRUCTOR) {
            return pos + DESTRUCTOR.len() - 1;
        }
        if tokens.get(pos).is_ident("what") && at_sequence(tokens, pos + 1, WHAT) {
            return pos + WHAT.len();
        }
        self.specification(tokens, pos);
        pos
    }

    fn visit_namespace_level(&mut self, tokens: &TokenStream<'_>, pos: Cursor) -> Cursor {
        self.specification(tokens, pos);
        pos
    }
}
