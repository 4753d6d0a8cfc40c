//! Rule to suggest `nullptr` over `NULL`.
//!
//! # Detected Patterns
//!
//! - `char* p = NULL;`

use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenStream};

/// Rule code for upcase-null.
pub const CODE: &str = "FL027";

/// Rule name for upcase-null.
pub const NAME: &str = "upcase-null";

/// Advises replacing `NULL` with `nullptr`.
#[derive(Debug, Clone, Default)]
pub struct UpcaseNull;

impl UpcaseNull {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for UpcaseNull {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Advises nullptr instead of NULL"
    }

    fn default_severity(&self) -> Severity {
        Severity::Advice
    }

    fn cpp_only(&self) -> bool {
        true
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        Ok(tokens
            .iter()
            .filter(|t| t.is_ident("NULL"))
            .map(|t| {
                Diagnostic::new(
                    CODE,
                    NAME,
                    Severity::Advice,
                    t.line,
                    "Prefer `nullptr' to `NULL' in new C++ code.",
                )
                .with_detail(
                    "Unlike `NULL', `nullptr' can't accidentally be used in arithmetic or as an integer. \
                     See http://www.open-std.org/jtc1/sc22/wg21/docs/papers/2007/n2431.pdf for details.",
                )
            })
            .collect())
    }
}
