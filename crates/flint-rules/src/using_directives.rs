//! Rule to keep `using namespace` out of header scope.
//!
//! # Rationale
//!
//! A `using namespace` directive at file or namespace scope of a header
//! leaks into every file that includes it.
//!
//! # Detected Patterns
//!
//! - `using namespace std;` at the top level of a header
//! - `namespace a { using namespace std; }` in a header
//!
//! # Allowed Patterns
//!
//! - directives inside function bodies, including inline functions and
//!   function templates
//! - anything in a source file

use crate::support::scope_aborted;
use flint_core::navigator::{at_sequence, Cursor};
use flint_core::scope::{walk_scopes, ScopeFrame, ScopeKind, ScopeVisitor};
use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for using-directives.
pub const CODE: &str = "FL015";

/// Rule name for using-directives.
pub const NAME: &str = "using-directives";

/// Forbids namespace-scope `using namespace` in headers.
#[derive(Debug, Clone, Default)]
pub struct UsingDirectives;

impl UsingDirectives {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for UsingDirectives {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids using-directives at file or namespace scope in headers"
    }

    fn cpp_only(&self) -> bool {
        true
    }

    fn check(&self, ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        if !ctx.category.is_header() {
            return Ok(Vec::new());
        }
        let mut visitor = DirectiveVisitor::default();
        if let Err(err) = walk_scopes(tokens, &mut visitor) {
            scope_aborted(NAME, &err);
        }
        Ok(visitor.diagnostics)
    }
}

#[derive(Default)]
struct DirectiveVisitor {
    namespaces: usize,
    diagnostics: Vec<Diagnostic>,
}

impl ScopeVisitor for DirectiveVisitor {
    fn enter_scope(&mut self, _tokens: &TokenStream<'_>, frame: &mut ScopeFrame) {
        if frame.kind == ScopeKind::Namespace {
            self.namespaces += 1;
        }
    }

    fn visit_namespace_level(&mut self, tokens: &TokenStream<'_>, pos: Cursor) -> Cursor {
        if !at_sequence(tokens, pos, &[TokenKind::Using, TokenKind::Namespace]) {
            return pos;
        }
        let title = if self.namespaces == 0 {
            "Using directive not allowed at top level."
        } else {
            "Using directive not allowed in header file, unless it is scoped to an inline function or function template."
        };
        self.diagnostics.push(Diagnostic::new(
            CODE,
            NAME,
            Severity::Error,
            tokens.get(pos + 1).line,
            title,
        ));
        pos + 1
    }

    fn exit_scope(&mut self, _tokens: &TokenStream<'_>, frame: ScopeFrame) {
        if frame.kind == ScopeKind::Namespace {
            self.namespaces -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::testing::{check, titles};

    #[test]
    fn test_top_level_and_namespace_level() {
        let code = "\
using namespace std;
namespace a {
namespace b {
using namespace boost;
}
}
";
        let diagnostics = check(&UsingDirectives::new(), "a.h", code);
        assert_eq!(
            titles(&diagnostics),
            vec![
                "Using directive not allowed at top level.",
                "Using directive not allowed in header file, unless it is scoped to an inline function or function template.",
            ]
        );
        assert_eq!(diagnostics[1].line, 4);
    }

    #[test]
    fn test_allows_function_scope() {
        let code = "\
namespace a {
inline void f() { using namespace std; }
template <class T> void g() { using namespace std; }
class C { void h() { using namespace std; } };
using std::string;
namespace fs = std::filesystem;
}
";
        assert!(check(&UsingDirectives::new(), "a.hpp", code).is_empty());
    }

    #[test]
    fn test_sources_are_skipped() {
        assert!(check(&UsingDirectives::new(), "a.cpp", "using namespace std;").is_empty());
    }
}
