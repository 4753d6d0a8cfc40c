//! Token model produced by the lexer.

use serde::Serialize;

/// Classification of a lexical unit.
///
/// Keyword variants are named after the keyword, punctuators after the
/// symbol, and preprocessor directives carry a `Pound` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum TokenKind {
    // Literals and names
    Identifier,
    Number,
    CharLiteral,
    StringLiteral,

    // Keywords
    Alignas,
    Alignof,
    And,
    AndEq,
    Asm,
    Auto,
    Bitand,
    Bitor,
    Bool,
    Break,
    Case,
    Catch,
    Char,
    Char16T,
    Char32T,
    Class,
    Compl,
    Const,
    Constexpr,
    ConstCast,
    Continue,
    Decltype,
    Default,
    Delete,
    Do,
    Double,
    DynamicCast,
    Else,
    Enum,
    Explicit,
    Export,
    Extern,
    False,
    Float,
    For,
    Friend,
    Goto,
    If,
    Inline,
    Int,
    Long,
    Mutable,
    Namespace,
    New,
    Noexcept,
    Not,
    NotEq,
    Nullptr,
    Operator,
    Or,
    OrEq,
    Private,
    Protected,
    Public,
    Register,
    ReinterpretCast,
    Return,
    Short,
    Signed,
    Sizeof,
    Static,
    StaticAssert,
    StaticCast,
    Struct,
    Switch,
    Template,
    This,
    ThreadLocal,
    Throw,
    True,
    Try,
    Typedef,
    Typeid,
    Typename,
    Union,
    Unsigned,
    Using,
    Virtual,
    Void,
    Volatile,
    WcharT,
    While,
    Xor,
    XorEq,

    // Single-character punctuators
    Tilde,
    LParen,
    RParen,
    LSquare,
    RSquare,
    LCurl,
    RCurl,
    Semicolon,
    Comma,
    Question,

    // One or two characters
    Colon,
    DoubleColon,
    Percent,
    PercentAssign,
    Assign,
    Equal,
    Bang,
    NotEqual,
    Caret,
    CaretAssign,
    Star,
    StarAssign,

    // One, two, or the assigning form
    Plus,
    Increment,
    PlusAssign,
    Ampersand,
    LogicalAnd,
    AmpersandAssign,
    Pipe,
    LogicalOr,
    PipeAssign,

    // Up to three characters
    Less,
    LessEqual,
    LShift,
    LShiftAssign,
    Greater,
    GreaterEqual,
    RShift,
    RShiftAssign,

    // Irregular punctuators
    Slash,
    SlashAssign,
    Minus,
    MinusAssign,
    Decrement,
    Arrow,
    ArrowStar,
    Dot,
    Ellipsis,
    DotStar,

    // Preprocessor
    PoundInclude,
    PoundDefine,
    PoundIf,
    PoundIfdef,
    PoundIfndef,
    PoundElif,
    PoundElse,
    PoundEndif,
    PoundUndef,
    PoundPragma,
    PoundError,
    PoundLine,
    Pound,
    DoublePound,

    EndOfFile,
}

impl TokenKind {
    /// Looks up a bareword in the keyword table.
    #[must_use]
    pub fn keyword(word: &str) -> Option<Self> {
        let kind = match word {
            "alignas" => Self::Alignas,
            "alignof" => Self::Alignof,
            "and" => Self::And,
            "and_eq" => Self::AndEq,
            "asm" => Self::Asm,
            "auto" => Self::Auto,
            "bitand" => Self::Bitand,
            "bitor" => Self::Bitor,
            "bool" => Self::Bool,
            "break" => Self::Break,
            "case" => Self::Case,
            "catch" => Self::Catch,
            "char" => Self::Char,
            "char16_t" => Self::Char16T,
            "char32_t" => Self::Char32T,
            "class" => Self::Class,
            "compl" => Self::Compl,
            "const" => Self::Const,
            "constexpr" => Self::Constexpr,
            "const_cast" => Self::ConstCast,
            "continue" => Self::Continue,
            "decltype" => Self::Decltype,
            "default" => Self::Default,
            "delete" => Self::Delete,
            "do" => Self::Do,
            "double" => Self::Double,
            "dynamic_cast" => Self::DynamicCast,
            "else" => Self::Else,
            "enum" => Self::Enum,
            "explicit" => Self::Explicit,
            "export" => Self::Export,
            "extern" => Self::Extern,
            "false" => Self::False,
            "float" => Self::Float,
            "for" => Self::For,
            "friend" => Self::Friend,
            "goto" => Self::Goto,
            "if" => Self::If,
            "inline" => Self::Inline,
            "int" => Self::Int,
            "long" => Self::Long,
            "mutable" => Self::Mutable,
            "namespace" => Self::Namespace,
            "new" => Self::New,
            "noexcept" => Self::Noexcept,
            "not" => Self::Not,
            "not_eq" => Self::NotEq,
            "nullptr" => Self::Nullptr,
            "operator" => Self::Operator,
            "or" => Self::Or,
            "or_eq" => Self::OrEq,
            "private" => Self::Private,
            "protected" => Self::Protected,
            "public" => Self::Public,
            "register" => Self::Register,
            "reinterpret_cast" => Self::ReinterpretCast,
            "return" => Self::Return,
            "short" => Self::Short,
            "signed" => Self::Signed,
            "sizeof" => Self::Sizeof,
            "static" => Self::Static,
            "static_assert" => Self::StaticAssert,
            "static_cast" => Self::StaticCast,
            "struct" => Self::Struct,
            "switch" => Self::Switch,
            "template" => Self::Template,
            "this" => Self::This,
            "thread_local" => Self::ThreadLocal,
            "throw" => Self::Throw,
            "true" => Self::True,
            "try" => Self::Try,
            "typedef" => Self::Typedef,
            "typeid" => Self::Typeid,
            "typename" => Self::Typename,
            "union" => Self::Union,
            "unsigned" => Self::Unsigned,
            "using" => Self::Using,
            "virtual" => Self::Virtual,
            "void" => Self::Void,
            "volatile" => Self::Volatile,
            "wchar_t" => Self::WcharT,
            "while" => Self::While,
            "xor" => Self::Xor,
            "xor_eq" => Self::XorEq,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns true for the keywords naming a fundamental type.
    #[must_use]
    pub fn is_builtin_type(self) -> bool {
        matches!(
            self,
            Self::Double
                | Self::Float
                | Self::Int
                | Self::Short
                | Self::Unsigned
                | Self::Long
                | Self::Signed
                | Self::Void
                | Self::Bool
                | Self::WcharT
                | Self::Char
        )
    }

    /// Returns true for `class`, `struct` and `union`.
    #[must_use]
    pub fn is_class_key(self) -> bool {
        matches!(self, Self::Class | Self::Struct | Self::Union)
    }

    /// Returns true for `public`, `protected` and `private`.
    #[must_use]
    pub fn is_access_specifier(self) -> bool {
        matches!(self, Self::Public | Self::Protected | Self::Private)
    }

    /// Returns true for the directives that open a conditional block.
    #[must_use]
    pub fn opens_conditional(self) -> bool {
        matches!(self, Self::PoundIf | Self::PoundIfdef | Self::PoundIfndef)
    }
}

/// A classified lexical unit.
///
/// `lexeme` and `trivia` borrow from the source text, so a token stream
/// lives no longer than the text it was lexed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    /// Token classification.
    pub kind: TokenKind,
    /// The token's own text.
    pub lexeme: &'src str,
    /// Whitespace and comments immediately preceding the token.
    pub trivia: &'src str,
    /// Line of the first lexeme byte (1-indexed).
    pub line: usize,
    /// Byte offset of the lexeme in the source.
    pub offset: usize,
}

impl Token<'_> {
    /// Returns true if the token has the given kind.
    #[must_use]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Returns true if the token is an identifier spelled `text`.
    #[must_use]
    pub fn is_ident(&self, text: &str) -> bool {
        self.kind == TokenKind::Identifier && self.lexeme == text
    }
}

/// An immutable, indexable token sequence terminated by `EndOfFile`.
#[derive(Debug, Clone)]
pub struct TokenStream<'src> {
    tokens: Vec<Token<'src>>,
}

impl<'src> TokenStream<'src> {
    /// Wraps lexer output. The caller guarantees the final token is
    /// `EndOfFile`.
    pub(crate) fn new(tokens: Vec<Token<'src>>) -> Self {
        debug_assert!(tokens.last().is_some_and(|t| t.is(TokenKind::EndOfFile)));
        Self { tokens }
    }

    /// All tokens, including the trailing `EndOfFile`.
    #[must_use]
    pub fn tokens(&self) -> &[Token<'src>] {
        &self.tokens
    }

    /// Number of tokens, including `EndOfFile`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// A stream always holds at least the `EndOfFile` token.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Index of the `EndOfFile` token.
    #[must_use]
    pub fn eof(&self) -> usize {
        self.tokens.len() - 1
    }

    /// Returns the token at `pos`, or the `EndOfFile` token when `pos`
    /// is out of range.
    #[must_use]
    pub fn get(&self, pos: usize) -> &Token<'src> {
        &self.tokens[pos.min(self.eof())]
    }

    /// Kind of the token at `pos`; `EndOfFile` when out of range.
    #[must_use]
    pub fn kind(&self, pos: usize) -> TokenKind {
        self.get(pos).kind
    }

    /// Returns true if `pos` is at or past the `EndOfFile` token.
    #[must_use]
    pub fn at_eof(&self, pos: usize) -> bool {
        pos >= self.eof()
    }

    /// The final `EndOfFile` token.
    #[must_use]
    pub fn last(&self) -> &Token<'src> {
        self.get(self.eof())
    }

    /// Iterates over the tokens.
    pub fn iter(&self) -> std::slice::Iter<'_, Token<'src>> {
        self.tokens.iter()
    }
}

impl<'a, 'src> IntoIterator for &'a TokenStream<'src> {
    type Item = &'a Token<'src>;
    type IntoIter = std::slice::Iter<'a, Token<'src>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(TokenKind::keyword("class"), Some(TokenKind::Class));
        assert_eq!(TokenKind::keyword("xor_eq"), Some(TokenKind::XorEq));
        assert_eq!(TokenKind::keyword("nullptr"), Some(TokenKind::Nullptr));
        assert_eq!(TokenKind::keyword("final"), None);
        assert_eq!(TokenKind::keyword("Class"), None);
    }

    #[test]
    fn test_builtin_types() {
        assert!(TokenKind::WcharT.is_builtin_type());
        assert!(TokenKind::Void.is_builtin_type());
        assert!(!TokenKind::Auto.is_builtin_type());
        assert!(!TokenKind::Identifier.is_builtin_type());
    }

    #[test]
    fn test_out_of_range_reads_eof() {
        let stream = TokenStream::new(vec![Token {
            kind: TokenKind::EndOfFile,
            lexeme: "",
            trivia: "",
            line: 1,
            offset: 0,
        }]);
        assert_eq!(stream.kind(42), TokenKind::EndOfFile);
        assert!(stream.at_eof(0));
        assert_eq!(stream.eof(), 0);
    }
}
