//! Rule to require a source file's own header to be included first.
//!
//! # Rationale
//!
//! Including `Foo.h` first from `Foo.cpp` proves that `Foo.h` compiles on
//! its own, catching headers that lean on whatever happened to be included
//! before them.
//!
//! # Detected Patterns
//!
//! - `#include "Foo.h"` in `Foo.cpp` after any other include
//!
//! `#include PRECOMPILED` does not count. Includes with a directory part
//! never match.

use crate::support::{has_directory, included_path};
use flint_core::{file_name_base, CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for include-associated-header.
pub const CODE: &str = "FL005";

/// Rule name for include-associated-header.
pub const NAME: &str = "include-associated-header";

/// Requires the associated header to be the first include of a source.
#[derive(Debug, Clone, Default)]
pub struct IncludeAssociatedHeader;

impl IncludeAssociatedHeader {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for IncludeAssociatedHeader {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires sources to include their own header first"
    }

    fn check(&self, ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        if !ctx.category.is_source() {
            return Ok(Vec::new());
        }

        let base = ctx.base_name();
        let mut includes_found = 0usize;

        for pos in 0..tokens.len() {
            if !tokens.get(pos).is(TokenKind::PoundInclude) {
                continue;
            }
            let operand = tokens.get(pos + 1);
            if operand.is_ident("PRECOMPILED") {
                continue;
            }
            includes_found += 1;

            if !operand.is(TokenKind::StringLiteral) {
                continue;
            }
            let included = included_path(operand.lexeme);
            if has_directory(included) || file_name_base(included) != base {
                continue;
            }
            if includes_found > 1 {
                return Ok(vec![Diagnostic::new(
                    CODE,
                    NAME,
                    Severity::Error,
                    tokens.get(pos).line,
                    "The associated header file of .cpp files should be included before any other includes.",
                )
                .with_detail("This helps catch missing header file dependencies in the .h")]);
            }
            break;
        }

        Ok(Vec::new())
    }
}
