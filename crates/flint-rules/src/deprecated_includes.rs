//! Rule to flag includes of deprecated headers.
//!
//! # Detected Patterns
//!
//! - `#include "common/base/Base.h"`
//!
//! # Configuration
//!
//! - `headers`: the include paths considered deprecated, replacing the
//!   built-in list

use crate::support::included_path;
use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for deprecated-includes.
pub const CODE: &str = "FL019";

/// Rule name for deprecated-includes.
pub const NAME: &str = "deprecated-includes";

const DEFAULT_HEADERS: &[&str] = &["common/base/Base.h", "common/base/StringUtil.h"];

/// Warns on quoted includes of deprecated headers.
#[derive(Debug, Clone)]
pub struct DeprecatedIncludes {
    /// Include paths, as written between the quotes.
    pub headers: Vec<String>,
}

impl Default for DeprecatedIncludes {
    fn default() -> Self {
        Self::new()
    }
}

impl DeprecatedIncludes {
    /// Creates the rule with the built-in header list.
    #[must_use]
    pub fn new() -> Self {
        Self::with_headers(DEFAULT_HEADERS.iter().copied())
    }

    /// Creates the rule with a custom header list.
    #[must_use]
    pub fn with_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
        }
    }
}

impl Rule for DeprecatedIncludes {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Warns on includes of deprecated headers"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let mut diagnostics = Vec::new();

        for pos in 0..tokens.len() {
            let directive = tokens.get(pos);
            if !directive.is(TokenKind::PoundInclude) {
                continue;
            }
            let operand = tokens.get(pos + 1);
            if !operand.is(TokenKind::StringLiteral) {
                continue;
            }
            let included = included_path(operand.lexeme);
            if self.headers.iter().any(|h| h == included) {
                diagnostics.push(Diagnostic::new(
                    CODE,
                    NAME,
                    Severity::Warning,
                    directive.line,
                    format!("Including deprecated header '{included}'"),
                ));
            }
        }

        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::testing::{check, titles};

    #[test]
    fn test_default_headers() {
        let code = "#include <vector>\n#include \"common/base/Base.h\"\n#include <common/base/StringUtil.h>\n";
        let diagnostics = check(&DeprecatedIncludes::new(), "a.cpp", code);
        assert_eq!(
            titles(&diagnostics),
            vec!["Including deprecated header 'common/base/Base.h'"]
        );
        assert_eq!(diagnostics[0].line, 2);
    }

    #[test]
    fn test_custom_headers() {
        let rule = DeprecatedIncludes::with_headers(["old/Legacy.h"]);
        let code = "#include \"old/Legacy.h\"\n#include \"common/base/Base.h\"\n";
        let diagnostics = check(&rule, "a.h", code);
        assert_eq!(titles(&diagnostics), vec!["Including deprecated header 'old/Legacy.h'"]);
    }
}
