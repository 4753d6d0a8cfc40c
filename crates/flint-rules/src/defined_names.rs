//! Rule to keep `#define`d names out of the reserved namespace.
//!
//! # Rationale
//!
//! Names starting with an underscore and a capital letter, or containing a
//! double underscore, belong to the implementation. Redefining keywords
//! (`#define private public`) is worse.
//!
//! # Detected Patterns
//!
//! - `#define private public`
//! - `#define _Foo`, `#define __foo`
//! - `#define foo__bar` (C++ only; C is more permissive)
//!
//! # Configuration
//!
//! - `allow`: additional names that may be defined

use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for defined-names.
pub const CODE: &str = "FL018";

/// Rule name for defined-names.
pub const NAME: &str = "defined-names";

/// Reserved names that are conventionally defined by user code.
const DEFAULT_ALLOWED: &[&str] = &[
    "__STDC_LIMIT_MACROS",
    "__STDC_FORMAT_MACROS",
    "_GNU_SOURCE",
    "_XOPEN_SOURCE",
];

/// Checks the names introduced by `#define`.
#[derive(Debug, Clone)]
pub struct DefinedNames {
    /// Names exempt from the reserved-identifier checks.
    pub allowed: Vec<String>,
}

impl Default for DefinedNames {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinedNames {
    /// Creates the rule with the built-in allow-list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allowed: DEFAULT_ALLOWED.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Adds names to the allow-list.
    #[must_use]
    pub fn allow<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed.extend(names.into_iter().map(Into::into));
        self
    }

    fn is_allowed(&self, name: &str) -> bool {
        self.allowed.iter().any(|a| a == name)
    }
}

/// Why a defined name is reserved, if it is.
fn reserved_reason(name: &str, c_only: bool) -> Option<&'static str> {
    let bytes = name.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'_' && bytes[1].is_ascii_uppercase() {
        Some("A symbol may not start with an underscore followed by a capital letter.")
    } else if name.starts_with("__") {
        Some("A symbol may not begin with two adjacent underscores.")
    } else if !c_only && name.contains("__") {
        Some("A symbol may not contain two adjacent underscores.")
    } else {
        None
    }
}

impl Rule for DefinedNames {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids #define of keywords and reserved identifiers"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let mut diagnostics = Vec::new();

        for pos in 0..tokens.len() {
            if !tokens.get(pos).is(TokenKind::PoundDefine) {
                continue;
            }
            let symbol = tokens.get(pos + 1);

            if !symbol.is(TokenKind::Identifier) {
                diagnostics.push(Diagnostic::new(
                    CODE,
                    NAME,
                    Severity::Warning,
                    symbol.line,
                    format!("You're not supposed to #define {}", symbol.lexeme),
                ));
                continue;
            }

            if let Some(reason) = reserved_reason(symbol.lexeme, ctx.is_c_only()) {
                if self.is_allowed(symbol.lexeme) {
                    continue;
                }
                diagnostics.push(
                    Diagnostic::new(
                        CODE,
                        NAME,
                        Severity::Warning,
                        symbol.line,
                        format!("Symbol {} invalid.", symbol.lexeme),
                    )
                    .with_detail(reason),
                );
            }
        }

        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::testing::{check, check_c_mode, titles};

    #[test]
    fn test_defining_keyword() {
        let diagnostics = check(&DefinedNames::new(), "a.cpp", "#define private public\n");
        assert_eq!(titles(&diagnostics), vec!["You're not supposed to #define private"]);
    }

    #[test]
    fn test_reserved_names() {
        let code = "#define _Foo 1\n#define __foo 2\n#define foo__bar 3\n#define FOO_BAR 4\n#define _foo 5\n";
        let diagnostics = check(&DefinedNames::new(), "a.h", code);
        let details: Vec<_> = diagnostics.iter().filter_map(|d| d.detail.as_deref()).collect();
        assert_eq!(
            details,
            vec![
                "A symbol may not start with an underscore followed by a capital letter.",
                "A symbol may not begin with two adjacent underscores.",
                "A symbol may not contain two adjacent underscores.",
            ]
        );
        assert_eq!(diagnostics[2].title, "Symbol foo__bar invalid.");
        assert_eq!(diagnostics[2].line, 3);
    }

    #[test]
    fn test_inner_double_underscore_allowed_in_c() {
        let code = "#define foo__bar 3\n";
        assert!(check(&DefinedNames::new(), "a.c", code).is_empty());
        assert!(check_c_mode(&DefinedNames::new(), "a.h", code).is_empty());
    }

    #[test]
    fn test_allow_list() {
        let code = "#define _GNU_SOURCE\n#define __STDC_FORMAT_MACROS\n#define _MY_FEATURE\n";
        assert!(check(&DefinedNames::new().allow(["_MY_FEATURE"]), "a.cpp", code).is_empty());
        assert_eq!(check(&DefinedNames::new(), "a.cpp", code).len(), 1);
    }
}
