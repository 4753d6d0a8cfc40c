//! Rule to keep `static` out of namespace scope in headers.
//!
//! # Rationale
//!
//! A namespace-scope `static` in a header gives every including
//! translation unit its own copy. That is redundant for constants and
//! wasteful for everything else.
//!
//! # Detected Patterns
//!
//! - `static int counter;` at file or namespace scope of a header
//!
//! # Allowed Patterns
//!
//! - static members and function-local statics

use crate::support::scope_aborted;
use flint_core::navigator::Cursor;
use flint_core::scope::{walk_scopes, ScopeVisitor};
use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for namespace-scoped-statics.
pub const CODE: &str = "FL026";

/// Rule name for namespace-scoped-statics.
pub const NAME: &str = "namespace-scoped-statics";

/// Warns on `static` at namespace scope in headers.
#[derive(Debug, Clone, Default)]
pub struct NamespaceScopedStatics;

impl NamespaceScopedStatics {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NamespaceScopedStatics {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids static declarations at namespace scope in headers"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn cpp_only(&self) -> bool {
        true
    }

    fn check(&self, ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        if !ctx.category.is_header() {
            return Ok(Vec::new());
        }
        let mut visitor = StaticVisitor::default();
        if let Err(err) = walk_scopes(tokens, &mut visitor) {
            scope_aborted(NAME, &err);
        }
        Ok(visitor.diagnostics)
    }
}

#[derive(Default)]
struct StaticVisitor {
    diagnostics: Vec<Diagnostic>,
}

impl ScopeVisitor for StaticVisitor {
    fn visit_namespace_level(&mut self, tokens: &TokenStream<'_>, pos: Cursor) -> Cursor {
        let token = tokens.get(pos);
        if token.is(TokenKind::Static) {
            self.diagnostics.push(Diagnostic::new(
                CODE,
                NAME,
                Severity::Warning,
                token.line,
                "Avoid using static at global or namespace scope in C++ header files.",
            ));
        }
        pos
    }
}
