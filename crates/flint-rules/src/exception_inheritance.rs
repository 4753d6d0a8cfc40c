//! Rule to require public inheritance from `std::exception`.
//!
//! # Rationale
//!
//! A non-public `std::exception` base is inaccessible outside the derived
//! class, so `catch (const std::exception& e)` silently stops matching.
//!
//! # Detected Patterns
//!
//! - `class E : std::exception {};` (class bases default to private)
//! - `class E : protected std::exception {};`
//! - `struct E : private exception {};`
//!
//! An unqualified `exception` is assumed to be `std::exception`.

use crate::support::scope_aborted;
use flint_core::scope::{walk_scopes, Access, BaseSpecifier, ScopeFrame, ScopeKind, ScopeVisitor};
use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenStream};

/// Rule code for exception-inheritance.
pub const CODE: &str = "FL024";

/// Rule name for exception-inheritance.
pub const NAME: &str = "exception-inheritance";

const EXCEPTION_NAMES: &[&str] = &["exception", "std::exception", "::std::exception"];

/// Warns on non-public `std::exception` bases.
#[derive(Debug, Clone, Default)]
pub struct ExceptionInheritance;

impl ExceptionInheritance {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ExceptionInheritance {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires std::exception to be inherited publicly"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn cpp_only(&self) -> bool {
        true
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let mut visitor = InheritanceVisitor::default();
        if let Err(err) = walk_scopes(tokens, &mut visitor) {
            scope_aborted(NAME, &err);
        }
        Ok(visitor.diagnostics)
    }
}

fn hides_exception(kind: ScopeKind, base: &BaseSpecifier) -> bool {
    if !EXCEPTION_NAMES.contains(&base.name.as_str()) {
        return false;
    }
    match kind {
        ScopeKind::Class => base.access != Some(Access::Public),
        ScopeKind::Struct => base.access == Some(Access::Private),
        _ => false,
    }
}

#[derive(Default)]
struct InheritanceVisitor {
    diagnostics: Vec<Diagnostic>,
}

impl ScopeVisitor for InheritanceVisitor {
    fn enter_scope(&mut self, tokens: &TokenStream<'_>, frame: &mut ScopeFrame) {
        if let Some(base) = frame.bases.iter().find(|b| hides_exception(frame.kind, b)) {
            self.diagnostics.push(
                Diagnostic::new(
                    CODE,
                    NAME,
                    Severity::Warning,
                    tokens.get(base.pos).line,
                    "std::exception should not be inherited non-publicly, as this base class will not be accessible in try..catch(const std::exception& e) outside the derived class.",
                )
                .with_detail("See C++ standard section 11.2 [class.access.base] / 4."),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::testing::check;

    fn check_code(code: &str) -> Vec<Diagnostic> {
        check(&ExceptionInheritance::new(), "a.h", code)
    }

    #[test]
    fn test_detects_hidden_exception_base() {
        let code = "\
class A : std::exception {};
class B : public Base, protected exception {};
struct C : private std::exception {};
";
        let lines: Vec<_> = check_code(code).iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
    }

    #[test]
    fn test_allows_public_exception_base() {
        let code = "\
class A : public std::exception {};
struct B : std::exception {};
struct C : protected Base, public exception {};
class D : private boost::exception {};
";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_one_warning_per_class() {
        let code = "class A : std::exception, private exception {};";
        assert_eq!(check_code(code).len(), 1);
    }
}
