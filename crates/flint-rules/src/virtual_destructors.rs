//! Rule to catch base classes without a virtual destructor.
//!
//! # Rationale
//!
//! Deleting a derived object through a pointer to a base with a public
//! non-virtual destructor is undefined behavior. A class that declares
//! virtual functions is almost certainly meant to be used that way.
//!
//! # Detected Patterns
//!
//! ```text
//! class Base {
//!  public:
//!   virtual void run();
//! };
//! ```
//!
//! # Allowed Patterns
//!
//! - a `virtual ~Base()` anywhere in the class
//! - a destructor declared `protected` or `private`
//! - classes that derive from something: the base may already supply the
//!   virtual destructor

use crate::support::scope_aborted;
use flint_core::navigator::{at_sequence, skip_function_declaration, Cursor};
use flint_core::scope::{walk_scopes, Access, ScopeFrame, ScopeKind, ScopeVisitor};
use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for virtual-destructors.
pub const CODE: &str = "FL023";

/// Rule name for virtual-destructors.
pub const NAME: &str = "virtual-destructors";

/// The class cannot be reported.
const IGNORE: u32 = 1;
/// A virtual member function was seen.
const HAS_VIRTUAL: u32 = 1 << 1;

/// Warns on polymorphic base classes with a public non-virtual destructor.
#[derive(Debug, Clone, Default)]
pub struct VirtualDestructors;

impl VirtualDestructors {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for VirtualDestructors {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires virtual destructors in classes with virtual functions"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn cpp_only(&self) -> bool {
        true
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let mut visitor = DestructorVisitor::default();
        if let Err(err) = walk_scopes(tokens, &mut visitor) {
            scope_aborted(NAME, &err);
        }
        Ok(visitor.diagnostics)
    }
}

#[derive(Default)]
struct DestructorVisitor {
    diagnostics: Vec<Diagnostic>,
}

impl ScopeVisitor for DestructorVisitor {
    fn enter_scope(&mut self, _tokens: &TokenStream<'_>, frame: &mut ScopeFrame) {
        let is_base = matches!(frame.kind, ScopeKind::Class | ScopeKind::Struct)
            && frame.name.is_some()
            && frame.bases.is_empty();
        if !is_base {
            frame.flags.insert(IGNORE);
        }
    }

    fn visit_member(&mut self, tokens: &TokenStream<'_>, pos: Cursor, frame: &mut ScopeFrame) -> Cursor {
        if frame.flags.contains(IGNORE) {
            return pos;
        }

        if tokens.get(pos).is(TokenKind::Virtual) {
            if tokens.get(pos + 1).is(TokenKind::Tilde) {
                frame.flags.insert(IGNORE);
            } else {
                frame.flags.insert(HAS_VIRTUAL);
            }
            return skip_function_declaration(tokens, pos);
        }

        if at_sequence(tokens, pos, &[TokenKind::Tilde, TokenKind::Identifier]) {
            if frame.access != Access::Public {
                frame.flags.insert(IGNORE);
            }
            return skip_function_declaration(tokens, pos);
        }

        pos
    }

    fn exit_scope(&mut self, tokens: &TokenStream<'_>, frame: ScopeFrame) {
        if frame.flags.contains(IGNORE) || !frame.flags.contains(HAS_VIRTUAL) {
            return;
        }
        let name = frame.name.unwrap_or_default();
        self.diagnostics.push(Diagnostic::new(
            CODE,
            NAME,
            Severity::Warning,
            tokens.get(frame.opener).line,
            format!("Base class {name} has virtual functions but a public non-virtual destructor."),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::testing::{check, titles};

    fn check_code(code: &str) -> Vec<Diagnostic> {
        check(&VirtualDestructors::new(), "a.h", code)
    }

    #[test]
    fn test_detects_missing_virtual_destructor() {
        let code = "\
namespace n {
class Base {
 public:
  virtual void run();
  ~Base();
};
}
";
        let diagnostics = check_code(code);
        assert_eq!(
            titles(&diagnostics),
            vec!["Base class Base has virtual functions but a public non-virtual destructor."]
        );
        assert_eq!(diagnostics[0].line, 2);
    }

    #[test]
    fn test_implicit_destructor_is_public() {
        let diagnostics = check_code("struct S { virtual int f() const = 0; };");
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_allows_virtual_or_hidden_destructor() {
        let code = "\
class A {
 public:
  virtual void run() { step(); }
  virtual ~A() {}
};
class B {
 public:
  virtual void run();
 protected:
  ~B();
};
class C : public A {
 public:
  void run() override;
};
class D { void plain(); };
";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_nested_classes_are_separate() {
        let code = "\
class Outer {
 public:
  virtual ~Outer();
  class Inner {
   public:
    virtual void f();
  };
};
";
        let diagnostics = check_code(code);
        assert_eq!(
            titles(&diagnostics),
            vec!["Base class Inner has virtual functions but a public non-virtual destructor."]
        );
        assert_eq!(diagnostics[0].line, 4);
    }
}
