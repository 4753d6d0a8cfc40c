//! Rule to keep `-inl.h` headers private to their owner.
//!
//! # Rationale
//!
//! `Foo-inl.h` holds implementation details of `Foo.h`. Anything else that
//! includes it depends on internals that may move without notice.
//!
//! # Detected Patterns
//!
//! - `#include "dir/Foo-inl.h"` from any file whose base name is not `Foo`

use crate::support::{file_name, included_path};
use flint_core::navigator::at_sequence;
use flint_core::{
    file_name_base, CheckError, Diagnostic, FileCategory, FileContext, Rule, Severity, TokenKind, TokenStream,
};
use std::path::Path;

/// Rule code for inl-header-inclusions.
pub const CODE: &str = "FL007";

/// Rule name for inl-header-inclusions.
pub const NAME: &str = "inl-header-inclusions";

/// Forbids including another file's `-inl.h` header.
#[derive(Debug, Clone, Default)]
pub struct InlHeaderInclusions;

impl InlHeaderInclusions {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for InlHeaderInclusions {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Restricts -inl.h headers to their associated header"
    }

    fn check(&self, ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let base = ctx.base_name();
        let mut diagnostics = Vec::new();

        for pos in 0..tokens.len() {
            if !at_sequence(tokens, pos, &[TokenKind::PoundInclude, TokenKind::StringLiteral]) {
                continue;
            }
            let operand = tokens.get(pos + 1);
            let included = included_path(operand.lexeme);
            if FileCategory::of(Path::new(included)) != FileCategory::InlHeader {
                continue;
            }
            if file_name_base(file_name(included)) == base {
                continue;
            }
            diagnostics.push(
                Diagnostic::new(
                    CODE,
                    NAME,
                    Severity::Error,
                    operand.line,
                    format!("An -inl file ({included}) was included even though this is not its associated header."),
                )
                .with_detail(
                    "Usually files like Foo-inl.h are implementation details and should not be included outside of Foo.h.",
                ),
            );
        }

        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::testing::{check, titles};

    #[test]
    fn test_detects_foreign_inl_include() {
        let code = "#include \"Foo.h\"\n#include \"lib/Foo-inl.h\"\n";
        let diagnostics = check(&InlHeaderInclusions::new(), "src/Bar.cpp", code);
        assert_eq!(
            titles(&diagnostics),
            vec!["An -inl file (lib/Foo-inl.h) was included even though this is not its associated header."]
        );
        assert_eq!(diagnostics[0].line, 2);
    }

    #[test]
    fn test_allows_owner() {
        let code = "#include \"lib/Foo-inl.h\"\n";
        assert!(check(&InlHeaderInclusions::new(), "include/Foo.h", code).is_empty());
        assert!(check(&InlHeaderInclusions::new(), "Foo.cpp", code).is_empty());
    }

    #[test]
    fn test_ignores_plain_headers() {
        let code = "#include \"Foo.h\"\n#include <vector>\n";
        assert!(check(&InlHeaderInclusions::new(), "Bar.cpp", code).is_empty());
    }
}
