//! Rule to prefer `make_shared` over `shared_ptr<T>(new T)`.
//!
//! # Rationale
//!
//! `make_shared` allocates the object and its control block together.
//! Constructing from `new` costs a second allocation.
//!
//! # Detected Patterns
//!
//! - `shared_ptr<Foo> p(new Foo(w));` (suggests `make_shared`)
//! - `std::shared_ptr<Foo> p(new Foo, deleter, alloc);` (suggests
//!   `allocate_shared`)

use flint_core::navigator::{call_arguments, read_qualified_identifier, skip_template_spec};
use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for smart-ptr-usage.
pub const CODE: &str = "FL025";

/// Rule name for smart-ptr-usage.
pub const NAME: &str = "smart-ptr-usage";

/// Suggests `make_shared` for `shared_ptr` variables initialized from `new`.
#[derive(Debug, Clone, Default)]
pub struct SmartPtrUsage;

impl SmartPtrUsage {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Namespace qualifier of a recognized `shared_ptr` spelling.
fn shared_ptr_namespace<'a>(names: &[&'a str]) -> Option<Option<&'a str>> {
    match names {
        ["shared_ptr"] => Some(None),
        [ns @ ("std" | "boost"), "shared_ptr"] => Some(Some(*ns)),
        _ => None,
    }
}

impl Rule for SmartPtrUsage {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Suggests make_shared over shared_ptr constructed from new"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn cpp_only(&self) -> bool {
        true
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let mut diagnostics = Vec::new();
        let mut pos = 0;

        while !tokens.at_eof(pos) {
            let (names, next) = read_qualified_identifier(tokens, pos);
            let Some(namespace) = shared_ptr_namespace(&names) else {
                pos = next.max(pos + 1);
                continue;
            };
            let anchor = tokens.get(pos).line;
            pos = next;

            if !tokens.get(pos).is(TokenKind::Less) {
                continue;
            }
            let close = skip_template_spec(tokens, pos);
            if tokens.at_eof(close) {
                break;
            }
            pos = close + 1;

            if !(tokens.get(pos).is(TokenKind::Identifier) && tokens.get(pos + 1).is(TokenKind::LParen)) {
                continue;
            }
            let Ok(call) = call_arguments(tokens, pos + 1) else {
                continue;
            };
            let from_new = call
                .args
                .first()
                .is_some_and(|arg| tokens.get(arg.first).is(TokenKind::New));
            if !from_new || !tokens.get(call.close + 1).is(TokenKind::Semicolon) {
                continue;
            }

            let replacement = if call.args.len() == 3 {
                "allocate_shared"
            } else {
                "make_shared"
            };
            let (qualified, qualified_replacement) = match namespace {
                Some(ns) => (format!("{ns}::shared_ptr"), format!("{ns}::{replacement}")),
                None => ("shared_ptr".to_string(), replacement.to_string()),
            };
            diagnostics.push(
                Diagnostic::new(
                    CODE,
                    NAME,
                    Severity::Warning,
                    anchor,
                    format!("{qualified} should be replaced by {qualified_replacement}."),
                )
                .with_detail(format!(
                    "{replacement} performs better with less allocations. Consider changing \
                     '{qualified}<Foo> p(new Foo(w));' with 'auto p = {qualified_replacement}<Foo>(w);'"
                )),
            );
            pos = call.close;
        }

        Ok(diagnostics)
    }
}
