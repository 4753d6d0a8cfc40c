//! Helpers shared by several rules.

use flint_core::scope::ScopeError;
use tracing::debug;

/// Trivia marker that suppresses the implicit-conversion diagnostics.
pub(crate) const IMPLICIT_MARKER: &str = "/* implicit */";

/// Strips the delimiters from an `#include` operand: `"a/b.h"` or `<a/b.h>`.
pub(crate) fn included_path(lexeme: &str) -> &str {
    let mut chars = lexeme.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

/// Final path component, split on either slash.
pub(crate) fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Returns true if the path has a directory part.
pub(crate) fn has_directory(path: &str) -> bool {
    path.contains(['/', '\\'])
}

/// Logs a scope walk that stopped early. Diagnostics found before the
/// failure are still reported.
pub(crate) fn scope_aborted(rule: &str, err: &ScopeError) {
    debug!(rule, error = %err, "scope walk aborted");
}

#[cfg(test)]
pub(crate) mod testing {
    use flint_core::{lex, CheckError, Diagnostic, FileContext, Rule};
    use std::path::Path;

    /// Lexes `code` as the file `path` and runs `rule` on it.
    pub(crate) fn run(rule: &dyn Rule, path: &str, code: &str) -> Result<Vec<Diagnostic>, CheckError> {
        let path = Path::new(path);
        let tokens = lex(code, path).unwrap();
        rule.check(&FileContext::standalone(path), &tokens)
    }

    /// Like [`run`], for checks that cannot fail.
    pub(crate) fn check(rule: &dyn Rule, path: &str, code: &str) -> Vec<Diagnostic> {
        run(rule, path, code).unwrap()
    }

    /// Runs `rule` in C mode.
    pub(crate) fn check_c_mode(rule: &dyn Rule, path: &str, code: &str) -> Vec<Diagnostic> {
        let file = Path::new(path);
        let tokens = lex(code, file).unwrap();
        let mut ctx = FileContext::standalone(file);
        ctx.c_mode = true;
        rule.check(&ctx, &tokens).unwrap()
    }

    /// Titles of `diagnostics`, for compact assertions.
    pub(crate) fn titles(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.title.as_str()).collect()
    }
}
