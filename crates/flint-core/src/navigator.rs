//! Cursor-based primitives for walking a token stream.
//!
//! Every function takes a stream plus a [`Cursor`] and returns a new cursor.
//! Running off the end is never a panic: the result is the `EndOfFile`
//! index, which callers treat as "construct not finished".
//!
//! The template heuristics are deliberately approximate. A `<` inside a call
//! argument is assumed to open a template argument list, so an argument such
//! as `a < b ? c : d` derails the scan.

use crate::token::{TokenKind, TokenStream};

use thiserror::Error;

/// Index into a [`TokenStream`].
pub type Cursor = usize;

/// Half-open token range `[first, last)` covering one argument or a call
/// name with its template arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentSpan {
    /// First token of the span.
    pub first: Cursor,
    /// One past the last token of the span.
    pub last: Cursor,
}

impl ArgumentSpan {
    /// Creates a span; `last` is clamped so that `first <= last` holds.
    #[must_use]
    pub fn new(first: Cursor, last: Cursor) -> Self {
        Self {
            first,
            last: last.max(first),
        }
    }

    /// Number of tokens covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.last - self.first
    }

    /// Returns true if the span covers no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first == self.last
    }
}

/// Result of scanning a `<...>` region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSpec {
    /// Position of the matching `>`, or `EndOfFile`.
    pub close: Cursor,
    /// A `[` appeared at the outermost angle level.
    pub contains_array: bool,
}

/// Arguments of a parenthesized call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallArguments {
    /// One span per comma-separated argument; empty for `()`.
    pub args: Vec<ArgumentSpan>,
    /// Position of the closing `)`.
    pub close: Cursor,
}

/// A call of the form `name(args)` or `name<T>(args)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameAndArguments {
    /// The name including any template argument list.
    pub name: ArgumentSpan,
    /// The call arguments.
    pub args: Vec<ArgumentSpan>,
    /// Position of the closing `)`.
    pub close: Cursor,
}

/// Failure of a navigator primitive that needs a balancing token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    /// The stream ended before the construct was closed.
    #[error("reached end of file looking for the end of the construct opened on line {line}")]
    UnexpectedEof {
        /// Line of the opening token.
        line: usize,
    },
    /// The token at the cursor is not the one the primitive starts from.
    #[error("expected {expected:?} on line {line}, found {found:?}")]
    Unexpected {
        /// Kind the primitive requires.
        expected: TokenKind,
        /// Kind actually present.
        found: TokenKind,
        /// Line of the offending token.
        line: usize,
    },
}

fn expect(stream: &TokenStream<'_>, pos: Cursor, kind: TokenKind) -> Result<(), NavError> {
    let token = stream.get(pos);
    if token.is(kind) {
        Ok(())
    } else {
        Err(NavError::Unexpected {
            expected: kind,
            found: token.kind,
            line: token.line,
        })
    }
}

/// Returns true if the tokens starting at `pos` have exactly `kinds`.
///
/// Running past the end is a mismatch, not an error.
#[must_use]
pub fn at_sequence(stream: &TokenStream<'_>, pos: Cursor, kinds: &[TokenKind]) -> bool {
    kinds.iter().enumerate().all(|(i, &kind)| {
        let at = pos + i;
        at < stream.len() && stream.kind(at) == kind
    })
}

/// Skips from an opening `open` to its nesting-matched `close`, ignoring
/// every other kind of bracket.
fn skip_balanced(stream: &TokenStream<'_>, pos: Cursor, open: TokenKind, close: TokenKind) -> Cursor {
    let mut depth = 1usize;
    let mut at = pos + 1;
    while !stream.at_eof(at) {
        let kind = stream.kind(at);
        if kind == open {
            depth += 1;
        } else if kind == close {
            depth -= 1;
            if depth == 0 {
                return at;
            }
        }
        at += 1;
    }
    stream.eof()
}

/// From a `{`, returns the position of its matching `}` or `EndOfFile`.
#[must_use]
pub fn skip_balanced_curly(stream: &TokenStream<'_>, pos: Cursor) -> Cursor {
    debug_assert!(stream.get(pos).is(TokenKind::LCurl) || stream.at_eof(pos));
    skip_balanced(stream, pos, TokenKind::LCurl, TokenKind::RCurl)
}

/// From a `(`, returns the position of its matching `)` or `EndOfFile`.
#[must_use]
pub fn skip_parens(stream: &TokenStream<'_>, pos: Cursor) -> Cursor {
    debug_assert!(stream.get(pos).is(TokenKind::LParen) || stream.at_eof(pos));
    skip_balanced(stream, pos, TokenKind::LParen, TokenKind::RParen)
}

/// Scans a template argument or parameter list starting at its `<`.
///
/// Angle brackets and `[` inside unmatched parentheses are ignored, which
/// keeps `Foo<(A > B)>` intact. `>>` is not split, so `a<b<c>>` does not
/// close.
#[must_use]
pub fn scan_template_spec(stream: &TokenStream<'_>, pos: Cursor) -> TemplateSpec {
    let mut angle_nest = 1usize;
    let mut paren_nest = 0usize;
    let mut contains_array = false;

    let mut at = pos + 1;
    while !stream.at_eof(at) {
        match stream.kind(at) {
            TokenKind::LParen => paren_nest += 1,
            TokenKind::RParen => paren_nest = paren_nest.saturating_sub(1),
            _ if paren_nest > 0 => {}
            TokenKind::LSquare => contains_array |= angle_nest == 1,
            TokenKind::Less => angle_nest += 1,
            TokenKind::Greater => {
                angle_nest -= 1;
                if angle_nest == 0 {
                    return TemplateSpec {
                        close: at,
                        contains_array,
                    };
                }
            }
            _ => {}
        }
        at += 1;
    }
    TemplateSpec {
        close: stream.eof(),
        contains_array,
    }
}

/// From a `<`, returns the position of the matching `>` or `EndOfFile`.
#[must_use]
pub fn skip_template_spec(stream: &TokenStream<'_>, pos: Cursor) -> Cursor {
    scan_template_spec(stream, pos).close
}

/// Skips a whole function prototype or definition.
///
/// Scans forward from the token after `pos` to the first `;`, unless a `{`
/// comes first, in which case the result is its matching `}`.
#[must_use]
pub fn skip_function_declaration(stream: &TokenStream<'_>, pos: Cursor) -> Cursor {
    let mut at = pos + 1;
    while !stream.at_eof(at) {
        match stream.kind(at) {
            TokenKind::Semicolon => return at,
            TokenKind::LCurl => return skip_balanced_curly(stream, at),
            _ => at += 1,
        }
    }
    stream.eof()
}

/// Splits the parenthesized region starting at `pos` into arguments.
///
/// Commas only separate arguments at paren depth one. A `<` is assumed to
/// start a template argument list and is skipped as a unit.
///
/// # Errors
///
/// Returns [`NavError::Unexpected`] if `pos` is not a `(`, and
/// [`NavError::UnexpectedEof`] if the stream ends before the matching `)`.
pub fn call_arguments(stream: &TokenStream<'_>, pos: Cursor) -> Result<CallArguments, NavError> {
    expect(stream, pos, TokenKind::LParen)?;
    let eof = NavError::UnexpectedEof {
        line: stream.get(pos).line,
    };

    let mut args = Vec::new();
    let mut arg_start = pos + 1;
    let mut depth = 1usize;
    let mut at = pos;
    loop {
        at += 1;
        if stream.at_eof(at) {
            return Err(eof);
        }
        match stream.kind(at) {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            TokenKind::Less => at = skip_template_spec(stream, at),
            TokenKind::Comma if depth == 1 => {
                args.push(ArgumentSpan::new(arg_start, at));
                arg_start = at + 1;
            }
            _ => {}
        }
    }

    if arg_start != at {
        args.push(ArgumentSpan::new(arg_start, at));
    }
    Ok(CallArguments { args, close: at })
}

/// Parses `name(args)` or `name<T...>(args)` with `pos` at the name.
///
/// # Errors
///
/// Returns [`NavError::UnexpectedEof`] if the template list or the argument
/// list never closes, and [`NavError::Unexpected`] if no `(` follows the
/// name.
pub fn name_and_arguments(stream: &TokenStream<'_>, pos: Cursor) -> Result<NameAndArguments, NavError> {
    let mut at = pos + 1;
    if stream.kind(at) == TokenKind::Less {
        at = skip_template_spec(stream, at);
        if stream.at_eof(at) {
            return Err(NavError::UnexpectedEof {
                line: stream.get(pos).line,
            });
        }
        at += 1;
    }
    let name = ArgumentSpan::new(pos, at);
    let CallArguments { args, close } = call_arguments(stream, at)?;
    Ok(NameAndArguments { name, args, close })
}

/// Greedily reads alternating identifiers and `::`, returning the names
/// and the first position after them.
#[must_use]
pub fn read_qualified_identifier<'src>(
    stream: &TokenStream<'src>,
    pos: Cursor,
) -> (Vec<&'src str>, Cursor) {
    let mut names = Vec::new();
    let mut at = pos;
    loop {
        let token = stream.get(at);
        match token.kind {
            TokenKind::Identifier => names.push(token.lexeme),
            TokenKind::DoubleColon => {}
            _ => break,
        }
        at += 1;
    }
    (names, at)
}

/// Renders a span for messages, with one space wherever the source had
/// trivia between tokens.
#[must_use]
pub fn format_span(stream: &TokenStream<'_>, span: ArgumentSpan) -> String {
    let mut out = String::new();
    for at in span.first..span.last {
        let token = stream.get(at);
        if at != span.first && !token.trivia.is_empty() {
            out.push(' ');
        }
        out.push_str(token.lexeme);
    }
    out
}

/// Joins type-name lexemes the way the type is usually written.
///
/// Tokens are separated by single spaces, except around `::` and inside
/// template brackets: `const std :: vector < int >` becomes
/// `const std::vector<int>`.
#[must_use]
pub fn join_type_name<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    let mut previous: Option<&str> = None;
    for part in parts {
        let glued = match previous {
            None => true,
            Some(prev) => matches!(prev, "::" | "<") || matches!(part, "::" | "<" | ">" | ">>" | ","),
        };
        if !glued {
            out.push(' ');
        }
        out.push_str(part);
        previous = Some(part);
    }
    out
}

/// Renders `name(arg, arg)`.
#[must_use]
pub fn format_call(stream: &TokenStream<'_>, name: ArgumentSpan, args: &[ArgumentSpan]) -> String {
    let args: Vec<String> = args.iter().map(|&arg| format_span(stream, arg)).collect();
    format!("{}({})", format_span(stream, name), args.join(", "))
}
