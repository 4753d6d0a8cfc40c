//! Rule to forbid `break`/`continue` directly inside `SYNCHRONIZED` blocks.
//!
//! # Rationale
//!
//! `SYNCHRONIZED (x) { ... }` expands to a hidden loop. A `break` or
//! `continue` inside it leaves that loop instead of the one the author had
//! in mind.
//!
//! # Detected Patterns
//!
//! - `break;` or `continue;` whose innermost enclosing statement is one of
//!   the `SYNCHRONIZED` family of macros

use flint_core::navigator::skip_parens;
use flint_core::{CheckError, Diagnostic, FileContext, Rule, Severity, TokenKind, TokenStream};

/// Rule code for break-in-synchronized.
pub const CODE: &str = "FL014";

/// Rule name for break-in-synchronized.
pub const NAME: &str = "break-in-synchronized";

const SYNCHRONIZED_MACROS: &[&str] = &[
    "SYNCHRONIZED",
    "UNSYNCHRONIZED",
    "TIMED_SYNCHRONIZED",
    "SYNCHRONIZED_CONST",
    "TIMED_SYNCHRONIZED_CONST",
];

/// Forbids loop control that escapes a `SYNCHRONIZED` pseudo-statement.
#[derive(Debug, Clone, Default)]
pub struct BreakInSynchronized;

impl BreakInSynchronized {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// An enclosing loop, switch or `SYNCHRONIZED` statement.
struct Statement {
    synchronized: bool,
    open_braces: usize,
}

impl Rule for BreakInSynchronized {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids break/continue directly inside SYNCHRONIZED blocks"
    }

    fn cpp_only(&self) -> bool {
        true
    }

    fn check(&self, _ctx: &FileContext, tokens: &TokenStream) -> Result<Vec<Diagnostic>, CheckError> {
        let mut diagnostics = Vec::new();
        let mut statements: Vec<Statement> = Vec::new();
        let mut pos = 0;

        while !tokens.at_eof(pos) {
            let token = tokens.get(pos);
            match token.kind {
                TokenKind::While | TokenKind::Switch | TokenKind::Do | TokenKind::For => {
                    statements.push(Statement {
                        synchronized: false,
                        open_braces: 0,
                    });
                    // The `;`s of a for header do not end the statement.
                    if token.is(TokenKind::For) && tokens.get(pos + 1).is(TokenKind::LParen) {
                        pos = skip_parens(tokens, pos + 1);
                    }
                }
                TokenKind::Identifier if SYNCHRONIZED_MACROS.iter().any(|m| *m == token.lexeme) => {
                    statements.push(Statement {
                        synchronized: true,
                        open_braces: 0,
                    });
                }
                TokenKind::LCurl => {
                    if let Some(top) = statements.last_mut() {
                        top.open_braces += 1;
                    }
                }
                TokenKind::RCurl => {
                    if let Some(top) = statements.last_mut() {
                        top.open_braces = top.open_braces.saturating_sub(1);
                        if top.open_braces == 0 {
                            statements.pop();
                        }
                    }
                }
                TokenKind::Semicolon => {
                    if statements.last().is_some_and(|top| top.open_braces == 0) {
                        statements.pop();
                    }
                }
                TokenKind::Break | TokenKind::Continue => {
                    if statements.last().is_some_and(|top| top.synchronized) {
                        diagnostics.push(Diagnostic::new(
                            CODE,
                            NAME,
                            Severity::Error,
                            token.line,
                            "Cannot use break/continue inside SYNCHRONIZED pseudo-statement",
                        ));
                    }
                }
                _ => {}
            }
            pos += 1;
        }

        Ok(diagnostics)
    }
}
