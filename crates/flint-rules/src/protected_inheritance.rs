//! Rule to warn about protected inheritance.
//!
//! # Detected Patterns
//!
//! - `class A : protected B { ... };`
//! - `class A : public B, protected C { ... };`

use crate::support::scope_aborted;
use flint_core::scope::{walk_scopes, Access, ScopeFrame, ScopeVisitor};
use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenStream};

/// Rule code for protected-inheritance.
pub const CODE: &str = "FL021";

/// Rule name for protected-inheritance.
pub const NAME: &str = "protected-inheritance";

/// Warns on `protected` base specifiers.
#[derive(Debug, Clone, Default)]
pub struct ProtectedInheritance;

impl ProtectedInheritance {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ProtectedInheritance {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Warns on protected inheritance"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn cpp_only(&self) -> bool {
        true
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let mut visitor = BaseVisitor::default();
        if let Err(err) = walk_scopes(tokens, &mut visitor) {
            scope_aborted(NAME, &err);
        }
        Ok(visitor.diagnostics)
    }
}

#[derive(Default)]
struct BaseVisitor {
    diagnostics: Vec<Diagnostic>,
}

impl ScopeVisitor for BaseVisitor {
    fn enter_scope(&mut self, tokens: &TokenStream<'_>, frame: &mut ScopeFrame) {
        for base in frame.bases.iter().filter(|b| b.access == Some(Access::Protected)) {
            self.diagnostics.push(
                Diagnostic::new(
                    CODE,
                    NAME,
                    Severity::Warning,
                    tokens.get(base.pos).line,
                    "Protected inheritance is sometimes not a good idea.",
                )
                .with_detail(
                    "Read http://stackoverflow.com/questions/6484306/effective-c-discouraging-protected-inheritance for more information.",
                ),
            );
        }
    }
}
