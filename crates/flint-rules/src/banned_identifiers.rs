//! Rule to forbid identifiers that have better alternatives.
//!
//! # Rationale
//!
//! Some library types have known bugs or performance traps. Referencing them
//! at all is an error so that replacements happen at the call site.
//!
//! # Detected Patterns
//!
//! - `boost::thread_specific_ptr`
//!
//! # Configuration
//!
//! - `identifiers`: additional identifiers to ban

use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for banned-identifiers.
pub const CODE: &str = "FL011";

/// Rule name for banned-identifiers.
pub const NAME: &str = "banned-identifiers";

const THREAD_SPECIFIC_PTR: &str = "There are known bugs and performance downsides to the use of this class. \
Use a thread-local wrapper such as folly::ThreadLocal instead.";

/// Forbids a configurable set of identifiers.
#[derive(Debug, Clone)]
pub struct BannedIdentifiers {
    /// Identifier and the reason it is banned.
    pub banned: Vec<(String, String)>,
}

impl Default for BannedIdentifiers {
    fn default() -> Self {
        Self::new()
    }
}

impl BannedIdentifiers {
    /// Creates the rule with the built-in list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banned: vec![("thread_specific_ptr".to_string(), THREAD_SPECIFIC_PTR.to_string())],
        }
    }

    /// Bans `identifier`, reporting `reason`.
    #[must_use]
    pub fn ban(mut self, identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        self.banned.push((identifier.into(), reason.into()));
        self
    }
}

impl Rule for BannedIdentifiers {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids identifiers that have better alternatives"
    }

    fn cpp_only(&self) -> bool {
        true
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let diagnostics = tokens
            .iter()
            .filter(|t| t.is(TokenKind::Identifier))
            .filter_map(|t| {
                self.banned
                    .iter()
                    .find(|(ident, _)| ident == t.lexeme)
                    .map(|(_, reason)| Diagnostic::new(CODE, NAME, Severity::Error, t.line, reason.as_str()))
            })
            .collect();
        Ok(diagnostics)
    }
}
