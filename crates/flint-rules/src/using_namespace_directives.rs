//! Rule to catch duplicate or conflicting `using namespace` directives.
//!
//! # Rationale
//!
//! With both `std` and `boost` pulled in, names like `shared_ptr` become
//! ambiguous. A directive repeated in the same scope is dead weight.
//!
//! # Detected Patterns
//!
//! - `using namespace foo;` when `foo` is already visible
//! - two visible members of a mutually exclusive group: `std`, `std::tr1`,
//!   `boost`, and their `::`-rooted spellings

use crate::support::scope_aborted;
use flint_core::navigator::{at_sequence, Cursor};
use flint_core::scope::{walk_scopes, ScopeFrame, ScopeVisitor};
use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};
use std::collections::HashMap;

/// Rule code for using-namespace-directives.
pub const CODE: &str = "FL016";

/// Rule name for using-namespace-directives.
pub const NAME: &str = "using-namespace-directives";

/// Namespaces that must not be brought in together.
const EXCLUSIVE_GROUPS: &[&[&str]] = &[&["std", "std::tr1", "boost", "::std", "::std::tr1", "::boost"]];

/// Checks `using namespace` directives against what is already visible.
#[derive(Debug, Clone, Default)]
pub struct UsingNamespaceDirectives;

impl UsingNamespaceDirectives {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for UsingNamespaceDirectives {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids duplicate and conflicting using-namespace directives"
    }

    fn cpp_only(&self) -> bool {
        true
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let mut visitor = NamespaceVisitor::new();
        if let Err(err) = walk_scopes(tokens, &mut visitor) {
            scope_aborted(NAME, &err);
        }
        Ok(visitor.diagnostics)
    }
}

struct NamespaceVisitor {
    /// Every visible namespace and the line of its directive.
    visible: HashMap<String, usize>,
    /// Namespaces introduced in each open scope, outermost first.
    scopes: Vec<Vec<String>>,
    /// Visible members per entry of `EXCLUSIVE_GROUPS`.
    group_counts: Vec<usize>,
    diagnostics: Vec<Diagnostic>,
}

impl NamespaceVisitor {
    fn new() -> Self {
        Self {
            visible: HashMap::new(),
            scopes: vec![Vec::new()],
            group_counts: vec![0; EXCLUSIVE_GROUPS.len()],
            diagnostics: Vec::new(),
        }
    }

    fn error(&mut self, line: usize, title: String) {
        self.diagnostics
            .push(Diagnostic::new(CODE, NAME, Severity::Error, line, title));
    }

    /// Handles `using namespace` at `pos`, returning the position of its `;`.
    fn directive(&mut self, tokens: &TokenStream<'_>, pos: Cursor) -> Cursor {
        let mut end = pos + 2;
        let mut namespace = String::new();
        while !tokens.at_eof(end) && !tokens.get(end).is(TokenKind::Semicolon) {
            namespace.push_str(tokens.get(end).lexeme);
            end += 1;
        }
        let line = tokens.get(end).line;

        if let Some(&first) = self.visible.get(&namespace) {
            self.error(
                line,
                format!("Duplicate using directive for namespace \"{namespace}\" (line {first})."),
            );
            return end;
        }
        self.visible.insert(namespace.clone(), line);

        for (group, members) in EXCLUSIVE_GROUPS.iter().enumerate() {
            if !members.contains(&namespace.as_str()) {
                continue;
            }
            if self.group_counts[group] >= 1 {
                let conflict = members
                    .iter()
                    .filter(|m| **m != namespace)
                    .filter_map(|m| self.visible.get(*m).map(|&l| (l, *m)))
                    .min();
                if let Some((conflict_line, conflict)) = conflict {
                    self.error(
                        line,
                        format!(
                            "Using namespace conflict: \"{namespace}\" and \"{conflict}\" (line {conflict_line})."
                        ),
                    );
                }
            }
            self.group_counts[group] += 1;
        }

        if let Some(scope) = self.scopes.last_mut() {
            scope.push(namespace);
        }
        end
    }

    fn visit(&mut self, tokens: &TokenStream<'_>, pos: Cursor) -> Cursor {
        if at_sequence(tokens, pos, &[TokenKind::Using, TokenKind::Namespace]) {
            self.directive(tokens, pos)
        } else {
            pos
        }
    }
}

impl ScopeVisitor for NamespaceVisitor {
    fn enter_scope(&mut self, _tokens: &TokenStream<'_>, _frame: &mut ScopeFrame) {
        self.scopes.push(Vec::new());
    }

    fn visit_member(&mut self, tokens: &TokenStream<'_>, pos: Cursor, _frame: &mut ScopeFrame) -> Cursor {
        self.visit(tokens, pos)
    }

    fn visit_namespace_level(&mut self, tokens: &TokenStream<'_>, pos: Cursor) -> Cursor {
        self.visit(tokens, pos)
    }

    fn visit_block(&mut self, tokens: &TokenStream<'_>, pos: Cursor) -> Cursor {
        self.visit(tokens, pos)
    }

    fn exit_scope(&mut self, _tokens: &TokenStream<'_>, _frame: ScopeFrame) {
        for namespace in self.scopes.pop().unwrap_or_default() {
            self.visible.remove(&namespace);
            for (group, members) in EXCLUSIVE_GROUPS.iter().enumerate() {
                if members.contains(&namespace.as_str()) {
                    self.group_counts[group] -= 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::testing::{check, titles};

    fn check_code(code: &str) -> Vec<Diagnostic> {
        check(&UsingNamespaceDirectives::new(), "a.cpp", code)
    }

    #[test]
    fn test_duplicate() {
        let diagnostics = check_code("using namespace foo;\nusing namespace foo;\n");
        assert_eq!(
            titles(&diagnostics),
            vec!["Duplicate using directive for namespace \"foo\" (line 1)."]
        );
        assert_eq!(diagnostics[0].line, 2);
    }

    #[test]
    fn test_conflict() {
        let code = "using namespace std;\nvoid f() {\n  using namespace ::boost;\n}\n";
        let diagnostics = check_code(code);
        assert_eq!(
            titles(&diagnostics),
            vec!["Using namespace conflict: \"::boost\" and \"std\" (line 1)."]
        );
    }

    #[test]
    fn test_scopes_end_visibility() {
        let code = "\
void f() { using namespace std; }
void g() { using namespace boost; }
void h() { using namespace std; }
";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_nested_duplicate() {
        let code = "using namespace a::b;\nnamespace n {\nusing namespace a::b;\n}\n";
        let diagnostics = check_code(code);
        assert_eq!(
            titles(&diagnostics),
            vec!["Duplicate using directive for namespace \"a::b\" (line 1)."]
        );
    }
}
