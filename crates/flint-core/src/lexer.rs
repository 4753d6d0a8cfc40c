//! Maximal-munch lexer for C and C++ source text.
//!
//! The lexer makes a single forward pass without backtracking. Whitespace
//! and comments never become tokens; they are attached as trivia to the
//! token that follows them, so concatenating `trivia + lexeme` over the
//! whole stream reproduces the input exactly.

use crate::token::{Token, TokenKind, TokenStream};

use miette::{Diagnostic, SourceSpan};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reason a file could not be lexed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// A `/*` comment with no closing `*/`.
    #[error("unterminated block comment")]
    UnterminatedComment,
    /// A string literal with no closing quote.
    #[error("unterminated string literal")]
    UnterminatedString,
    /// A character literal with no closing quote.
    #[error("unterminated character literal")]
    UnterminatedChar,
    /// A backslash outside a literal that does not continue the line.
    #[error("misplaced backslash")]
    MisplacedBackslash,
    /// A character that cannot start any token.
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Fatal per-file lexing failure.
#[derive(Debug, Clone, Error, Diagnostic)]
#[error("{}:{line}: {kind}", .file.display())]
#[diagnostic(code(flint::lex), help("fix the source so it compiles before linting"))]
pub struct LexError {
    /// File being lexed.
    pub file: PathBuf,
    /// Line where the offending construct starts.
    pub line: usize,
    /// What went wrong.
    pub kind: LexErrorKind,
    /// Byte span of the offending construct's first character.
    #[label("here")]
    pub span: SourceSpan,
}

/// Lexes `source` into a token stream ending with `EndOfFile`.
///
/// # Errors
///
/// Returns a [`LexError`] for unterminated comments or literals, a stray
/// backslash, or a character outside the source character set.
pub fn lex<'src>(source: &'src str, path: &Path) -> Result<TokenStream<'src>, LexError> {
    Lexer::new(source).run().map_err(|failure| LexError {
        file: path.to_path_buf(),
        line: failure.line,
        kind: failure.kind,
        span: SourceSpan::from((failure.offset, 1)),
    })
}

struct Failure {
    kind: LexErrorKind,
    line: usize,
    offset: usize,
}

struct Lexer<'src> {
    src: &'src str,
    bytes: &'src [u8],
    pos: usize,
    line: usize,
    trivia_start: usize,
    tokens: Vec<Token<'src>>,
}

impl<'src> Lexer<'src> {
    fn new(src: &'src str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            trivia_start: 0,
            tokens: Vec::with_capacity(src.len() / 4),
        }
    }

    fn run(mut self) -> Result<TokenStream<'src>, Failure> {
        while let Some(c) = self.peek(0) {
            match c {
                b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c => self.trivia(1),
                b'\\' => match self.peek(1) {
                    Some(b'\n' | b'\r') => self.trivia(1),
                    _ => return Err(self.fail(LexErrorKind::MisplacedBackslash)),
                },
                b'/' if self.peek(1) == Some(b'/') => {
                    let len = self.line_comment_len();
                    self.trivia(len);
                }
                b'/' if self.peek(1) == Some(b'*') => {
                    let len = self.block_comment_len()?;
                    self.trivia(len);
                }
                b'"' => {
                    let len = self.quoted_len(b'"', LexErrorKind::UnterminatedString)?;
                    self.emit(TokenKind::StringLiteral, len);
                }
                b'\'' => {
                    let len = self.quoted_len(b'\'', LexErrorKind::UnterminatedChar)?;
                    self.emit(TokenKind::CharLiteral, len);
                }
                b'0'..=b'9' => {
                    let len = self.number_len();
                    self.emit(TokenKind::Number, len);
                }
                b'.' if self.peek(1).is_some_and(|d| d.is_ascii_digit()) => {
                    let len = self.number_len();
                    self.emit(TokenKind::Number, len);
                }
                b'#' => {
                    let (kind, len) = self.directive();
                    self.emit(kind, len);
                }
                b'<' if self.include_path_follows() => {
                    let len = self.angle_path_len();
                    self.emit(TokenKind::StringLiteral, len);
                }
                c if c.is_ascii_alphabetic() || matches!(c, b'_' | b'$' | b'@') => {
                    let len = self.identifier_len();
                    let word = &self.src[self.pos..self.pos + len];
                    let kind = TokenKind::keyword(word).unwrap_or(TokenKind::Identifier);
                    self.emit(kind, len);
                }
                _ => match self.punctuator() {
                    Some((kind, len)) => self.emit(kind, len),
                    None => {
                        let ch = self.src[self.pos..].chars().next().unwrap_or('\0');
                        return Err(self.fail(LexErrorKind::InvalidCharacter(ch)));
                    }
                },
            }
        }

        self.tokens.push(Token {
            kind: TokenKind::EndOfFile,
            lexeme: "",
            trivia: &self.src[self.trivia_start..],
            line: self.line,
            offset: self.src.len(),
        });
        Ok(TokenStream::new(self.tokens))
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn fail(&self, kind: LexErrorKind) -> Failure {
        Failure {
            kind,
            line: self.line,
            offset: self.pos,
        }
    }

    /// Consumes `len` bytes, counting the newlines they contain.
    fn advance(&mut self, len: usize) {
        let end = (self.pos + len).min(self.bytes.len());
        self.line += self.bytes[self.pos..end]
            .iter()
            .filter(|&&b| b == b'\n')
            .count();
        self.pos = end;
    }

    fn trivia(&mut self, len: usize) {
        self.advance(len);
    }

    fn emit(&mut self, kind: TokenKind, len: usize) {
        let start = self.pos;
        self.tokens.push(Token {
            kind,
            lexeme: &self.src[start..start + len],
            trivia: &self.src[self.trivia_start..start],
            line: self.line,
            offset: start,
        });
        self.advance(len);
        self.trivia_start = self.pos;
    }

    /// `//` comment; a backslash right before the newline continues it.
    fn line_comment_len(&self) -> usize {
        let mut i = self.pos + 2;
        while let Some(&b) = self.bytes.get(i) {
            if b == b'\n' {
                let before = if i > 0 && self.bytes[i - 1] == b'\r' {
                    i - 1
                } else {
                    i
                };
                if before > 0 && self.bytes[before - 1] == b'\\' {
                    i += 1;
                    continue;
                }
                break;
            }
            i += 1;
        }
        i - self.pos
    }

    fn block_comment_len(&self) -> Result<usize, Failure> {
        self.src[self.pos + 2..]
            .find("*/")
            .map(|end| end + 4)
            .ok_or_else(|| self.fail(LexErrorKind::UnterminatedComment))
    }

    /// String or char literal including both quotes. A backslash escapes
    /// the next byte, which covers `\<newline>` continuations.
    fn quoted_len(&self, quote: u8, unterminated: LexErrorKind) -> Result<usize, Failure> {
        let mut i = self.pos + 1;
        while let Some(&b) = self.bytes.get(i) {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == quote {
                return Ok(i + 1 - self.pos);
            }
            i += 1;
        }
        Err(self.fail(unterminated))
    }

    fn number_len(&self) -> usize {
        let digits = &self.bytes[self.pos..];
        let (mut saw_dot, mut saw_exp, mut saw_x, mut saw_suffix) = (false, false, false, false);
        let mut i = 0;
        while let Some(&c) = digits.get(i) {
            let accepted = match c {
                b'.' if !saw_dot && !saw_exp && !saw_suffix => {
                    saw_dot = true;
                    true
                }
                b'0'..=b'9' => true,
                b'a'..=b'f' | b'A'..=b'F' if saw_x && !saw_exp => true,
                b'+' | b'-' => i > 0 && matches!(digits[i - 1], b'e' | b'E' | b'p' | b'P'),
                b'e' | b'E' if !saw_exp && !saw_suffix && !saw_x => {
                    saw_exp = true;
                    true
                }
                b'p' | b'P' if saw_x && !saw_exp && !saw_suffix => {
                    saw_exp = true;
                    true
                }
                b'x' | b'X' if i == 1 && digits[0] == b'0' => {
                    saw_x = true;
                    true
                }
                b'f' | b'F' | b'l' | b'L' | b'u' | b'U' => {
                    saw_suffix = true;
                    true
                }
                _ => false,
            };
            if !accepted {
                break;
            }
            i += 1;
        }
        i
    }

    fn identifier_len(&self) -> usize {
        self.bytes[self.pos..]
            .iter()
            .take_while(|&&b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'@'))
            .count()
    }

    /// Classifies `#` by the bareword that follows it.
    fn directive(&self) -> (TokenKind, usize) {
        let rest = &self.bytes[self.pos + 1..];
        let spaces = rest
            .iter()
            .take_while(|&&b| b == b' ' || b == b'\t')
            .count();
        let after = &rest[spaces..];

        if after.first() == Some(&b'#') {
            return (TokenKind::DoublePound, spaces + 2);
        }

        let word_len = after
            .iter()
            .take_while(|&&b| b.is_ascii_alphanumeric() || b == b'_')
            .count();
        let word = &after[..word_len];
        let kind = match word {
            b"include" => TokenKind::PoundInclude,
            b"define" => TokenKind::PoundDefine,
            b"if" => TokenKind::PoundIf,
            b"ifdef" => TokenKind::PoundIfdef,
            b"ifndef" => TokenKind::PoundIfndef,
            b"elif" => TokenKind::PoundElif,
            b"else" => TokenKind::PoundElse,
            b"endif" => TokenKind::PoundEndif,
            b"undef" => TokenKind::PoundUndef,
            b"pragma" => TokenKind::PoundPragma,
            b"error" | b"line" => {
                let kind = if word == b"error" {
                    TokenKind::PoundError
                } else {
                    TokenKind::PoundLine
                };
                let to_eol = rest.iter().take_while(|&&b| b != b'\n').count();
                return (kind, 1 + to_eol);
            }
            _ => return (TokenKind::Pound, 1),
        };
        (kind, 1 + spaces + word_len)
    }

    /// `<` directly after an `#include` lexeme starts a path literal.
    fn include_path_follows(&self) -> bool {
        self.trivia_start == self.pos
            && self
                .tokens
                .last()
                .is_some_and(|t| t.is(TokenKind::PoundInclude))
            && self.angle_path_len() > 0
    }

    /// Length of `<...>` on the current line, or 0 if it never closes.
    fn angle_path_len(&self) -> usize {
        self.bytes[self.pos..]
            .iter()
            .take_while(|&&b| b != b'\n')
            .position(|&b| b == b'>')
            .map_or(0, |end| end + 1)
    }

    fn punctuator(&self) -> Option<(TokenKind, usize)> {
        use TokenKind as K;

        let c = self.peek(0)?;
        let n1 = self.peek(1);
        let n2 = self.peek(2);

        let token = match (c, n1, n2) {
            (b'~', ..) => (K::Tilde, 1),
            (b'(', ..) => (K::LParen, 1),
            (b')', ..) => (K::RParen, 1),
            (b'[', ..) => (K::LSquare, 1),
            (b']', ..) => (K::RSquare, 1),
            (b'{', ..) => (K::LCurl, 1),
            (b'}', ..) => (K::RCurl, 1),
            (b';', ..) => (K::Semicolon, 1),
            (b',', ..) => (K::Comma, 1),
            (b'?', ..) => (K::Question, 1),

            (b':', Some(b':'), _) => (K::DoubleColon, 2),
            (b':', ..) => (K::Colon, 1),
            (b'%', Some(b'='), _) => (K::PercentAssign, 2),
            (b'%', ..) => (K::Percent, 1),
            (b'=', Some(b'='), _) => (K::Equal, 2),
            (b'=', ..) => (K::Assign, 1),
            (b'!', Some(b'='), _) => (K::NotEqual, 2),
            (b'!', ..) => (K::Bang, 1),
            (b'^', Some(b'='), _) => (K::CaretAssign, 2),
            (b'^', ..) => (K::Caret, 1),
            (b'*', Some(b'='), _) => (K::StarAssign, 2),
            (b'*', ..) => (K::Star, 1),

            (b'+', Some(b'+'), _) => (K::Increment, 2),
            (b'+', Some(b'='), _) => (K::PlusAssign, 2),
            (b'+', ..) => (K::Plus, 1),
            (b'&', Some(b'&'), _) => (K::LogicalAnd, 2),
            (b'&', Some(b'='), _) => (K::AmpersandAssign, 2),
            (b'&', ..) => (K::Ampersand, 1),
            (b'|', Some(b'|'), _) => (K::LogicalOr, 2),
            (b'|', Some(b'='), _) => (K::PipeAssign, 2),
            (b'|', ..) => (K::Pipe, 1),

            (b'<', Some(b'<'), Some(b'=')) => (K::LShiftAssign, 3),
            (b'<', Some(b'<'), _) => (K::LShift, 2),
            (b'<', Some(b'='), _) => (K::LessEqual, 2),
            (b'<', ..) => (K::Less, 1),
            (b'>', Some(b'>'), Some(b'=')) => (K::RShiftAssign, 3),
            (b'>', Some(b'>'), _) => (K::RShift, 2),
            (b'>', Some(b'='), _) => (K::GreaterEqual, 2),
            (b'>', ..) => (K::Greater, 1),

            (b'/', Some(b'='), _) => (K::SlashAssign, 2),
            (b'/', ..) => (K::Slash, 1),
            (b'-', Some(b'>'), Some(b'*')) => (K::ArrowStar, 3),
            (b'-', Some(b'>'), _) => (K::Arrow, 2),
            (b'-', Some(b'-'), _) => (K::Decrement, 2),
            (b'-', Some(b'='), _) => (K::MinusAssign, 2),
            (b'-', ..) => (K::Minus, 1),
            (b'.', Some(b'.'), Some(b'.')) => (K::Ellipsis, 3),
            (b'.', Some(b'*'), _) => (K::DotStar, 2),
            (b'.', ..) => (K::Dot, 1),

            _ => return None,
        };
        Some(token)
    }
}
