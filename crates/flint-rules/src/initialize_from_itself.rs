//! Rule to catch members initialized from themselves.
//!
//! # Rationale
//!
//! `Foo(int x) : x_(x_) {}` compiles but reads the uninitialized member,
//! usually a typo for `x_(x)`.
//!
//! # Detected Patterns
//!
//! - `: m_(m_)` and `, m_(m_)` in a constructor initializer list, where the
//!   name looks like a member (ends in `_` or starts with `m_`)

use flint_core::navigator::at_sequence;
use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for initialize-from-itself.
pub const CODE: &str = "FL002";

/// Rule name for initialize-from-itself.
pub const NAME: &str = "initialize-from-itself";

const FIRST_INITIALIZER: &[TokenKind] = &[
    TokenKind::Colon,
    TokenKind::Identifier,
    TokenKind::LParen,
    TokenKind::Identifier,
    TokenKind::RParen,
];

const NTH_INITIALIZER: &[TokenKind] = &[
    TokenKind::Comma,
    TokenKind::Identifier,
    TokenKind::LParen,
    TokenKind::Identifier,
    TokenKind::RParen,
];

/// Flags `member_(member_)` initializers.
#[derive(Debug, Clone, Default)]
pub struct InitializeFromItself;

impl InitializeFromItself {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn is_member_name(name: &str) -> bool {
    name.ends_with('_') || name.starts_with("m_")
}

impl Rule for InitializeFromItself {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids initializing a class member with itself"
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let mut diagnostics = Vec::new();

        for pos in 0..tokens.len() {
            if !at_sequence(tokens, pos, FIRST_INITIALIZER) && !at_sequence(tokens, pos, NTH_INITIALIZER) {
                continue;
            }
            let outer = tokens.get(pos + 1);
            let inner = tokens.get(pos + 3);
            if is_member_name(outer.lexeme) && outer.lexeme == inner.lexeme {
                diagnostics.push(Diagnostic::new(
                    CODE,
                    NAME,
                    Severity::Error,
                    outer.line,
                    format!("Initializing class member '{}' with itself.", outer.lexeme),
                ));
            }
        }

        Ok(diagnostics)
    }
}
