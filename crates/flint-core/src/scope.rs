//! Class and namespace scope tracking.
//!
//! [`walk_scopes`] drives a stack of [`ScopeFrame`]s over a token stream and
//! calls back into a [`ScopeVisitor`]. The walker owns every token that opens
//! or closes a scope (`class`/`struct`/`union` heads, `namespace`, `{`, `}`)
//! and every access specifier; all other tokens are routed to a hook chosen
//! by the kind of the innermost frame.
//!
//! Frames live only for the duration of one walk.

use crate::navigator::{read_qualified_identifier, skip_parens, skip_template_spec, Cursor};
use crate::token::{TokenKind, TokenStream};

use serde::Serialize;
use thiserror::Error;

/// What opened a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    /// `class Name { ... }`
    Class,
    /// `struct Name { ... }`
    Struct,
    /// `union Name { ... }`
    Union,
    /// `namespace Name { ... }` or an unnamed namespace.
    Namespace,
    /// Any other braces: function bodies, initializers, enums, `extern "C"`.
    Anonymous,
}

impl ScopeKind {
    /// Returns true for class, struct and union scopes.
    #[must_use]
    pub fn is_class_like(self) -> bool {
        matches!(self, Self::Class | Self::Struct | Self::Union)
    }

    fn from_class_key(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Class => Some(Self::Class),
            TokenKind::Struct => Some(Self::Struct),
            TokenKind::Union => Some(Self::Union),
            _ => None,
        }
    }

    fn default_access(self) -> Access {
        match self {
            Self::Class => Access::Private,
            _ => Access::Public,
        }
    }
}

/// Member or base access level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Access {
    Public,
    Protected,
    Private,
}

impl Access {
    fn from_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Public => Some(Self::Public),
            TokenKind::Protected => Some(Self::Protected),
            TokenKind::Private => Some(Self::Private),
            _ => None,
        }
    }
}

/// Rule-specific bits attached to a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeFlags(u32);

impl ScopeFlags {
    /// Returns true if every bit of `bits` is set.
    #[must_use]
    pub fn contains(self, bits: u32) -> bool {
        self.0 & bits == bits
    }

    /// Sets `bits`.
    pub fn insert(&mut self, bits: u32) {
        self.0 |= bits;
    }

    /// Clears `bits`.
    pub fn remove(&mut self, bits: u32) {
        self.0 &= !bits;
    }
}

/// One entry of a class head's base list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseSpecifier {
    /// Explicit access, `None` when the class default applies.
    pub access: Option<Access>,
    /// `virtual` appeared in the specifier.
    pub is_virtual: bool,
    /// Qualified name without template arguments, e.g. `std::exception`.
    pub name: String,
    /// Position of the first token of the name.
    pub pos: Cursor,
}

/// State of one open scope.
#[derive(Debug, Clone)]
pub struct ScopeFrame {
    /// Declared name; `None` for unnamed class-likes and namespaces.
    pub name: Option<String>,
    /// What opened the scope.
    pub kind: ScopeKind,
    /// Current member access.
    pub access: Access,
    /// Bits owned by the visiting check.
    pub flags: ScopeFlags,
    /// Base list of a class-like head.
    pub bases: Vec<BaseSpecifier>,
    /// Position of the opening keyword, or of the `{` for anonymous scopes.
    pub opener: Cursor,
    /// Position of the `{`.
    pub body: Cursor,
}

impl ScopeFrame {
    fn new(kind: ScopeKind, name: Option<String>, opener: Cursor, body: Cursor) -> Self {
        Self {
            name,
            kind,
            access: kind.default_access(),
            flags: ScopeFlags::default(),
            bases: Vec::new(),
            opener,
            body,
        }
    }
}

/// Structural failure found while walking scopes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// A `}` with no open scope.
    #[error("unmatched '}}' on line {line}")]
    UnbalancedClose {
        /// Line of the stray brace.
        line: usize,
    },
    /// End of file with scopes still open.
    #[error("{depth} scope(s) still open at end of file, innermost opened on line {line}")]
    Unterminated {
        /// Number of open scopes.
        depth: usize,
        /// Line of the innermost opener.
        line: usize,
    },
}

/// Callbacks invoked by [`walk_scopes`].
///
/// The `visit_*` hooks receive the position of a token the walker does not
/// handle itself and return the last position they consumed; the walk
/// resumes after it. A hook must not consume a `{` or `}` without also
/// consuming its partner, or the frame stack loses balance.
pub trait ScopeVisitor {
    /// Called after a frame is pushed.
    fn enter_scope(&mut self, _stream: &TokenStream<'_>, _frame: &mut ScopeFrame) {}

    /// Token directly inside a class, struct or union.
    fn visit_member(&mut self, _stream: &TokenStream<'_>, pos: Cursor, _frame: &mut ScopeFrame) -> Cursor {
        pos
    }

    /// Token at file scope or directly inside a namespace.
    fn visit_namespace_level(&mut self, _stream: &TokenStream<'_>, pos: Cursor) -> Cursor {
        pos
    }

    /// Token inside an anonymous block such as a function body.
    fn visit_block(&mut self, _stream: &TokenStream<'_>, pos: Cursor) -> Cursor {
        pos
    }

    /// Called with the frame just popped.
    fn exit_scope(&mut self, _stream: &TokenStream<'_>, _frame: ScopeFrame) {}
}

/// Result of reading what follows a class key or `namespace`.
enum Head {
    /// A definition: push `frame`, resume after its `{`.
    Open(ScopeFrame),
    /// A declaration ending at the given `;`.
    Declaration(Cursor),
    /// Not a scope head.
    NotAHead,
}

/// Walks `stream`, maintaining the scope stack and calling `visitor`.
///
/// # Errors
///
/// Returns [`ScopeError`] when braces do not balance. Hooks have already
/// been called for everything before the failure.
pub fn walk_scopes<V: ScopeVisitor + ?Sized>(
    stream: &TokenStream<'_>,
    visitor: &mut V,
) -> Result<(), ScopeError> {
    let mut stack: Vec<ScopeFrame> = Vec::new();
    let mut pos: Cursor = 0;

    while !stream.at_eof(pos) {
        let kind = stream.kind(pos);
        let prev = if pos == 0 {
            None
        } else {
            Some(stream.kind(pos - 1))
        };

        if kind == TokenKind::Template && stream.kind(pos + 1) == TokenKind::Less {
            pos = skip_template_spec(stream, pos + 1) + 1;
            continue;
        }

        let head = match kind {
            TokenKind::Namespace if prev != Some(TokenKind::Using) => namespace_head(stream, pos),
            k if k.is_class_key() && prev != Some(TokenKind::Enum) => class_head(stream, pos),
            _ => Head::NotAHead,
        };
        match head {
            Head::Open(mut frame) => {
                pos = frame.body + 1;
                visitor.enter_scope(stream, &mut frame);
                stack.push(frame);
                continue;
            }
            Head::Declaration(end) => {
                pos = end + 1;
                continue;
            }
            Head::NotAHead => {}
        }

        match kind {
            TokenKind::LCurl => {
                let mut frame = ScopeFrame::new(ScopeKind::Anonymous, None, pos, pos);
                visitor.enter_scope(stream, &mut frame);
                stack.push(frame);
                pos += 1;
            }
            TokenKind::RCurl => {
                let frame = stack.pop().ok_or(ScopeError::UnbalancedClose {
                    line: stream.get(pos).line,
                })?;
                visitor.exit_scope(stream, frame);
                pos += 1;
            }
            k if k.is_access_specifier()
                && stream.kind(pos + 1) == TokenKind::Colon
                && stack.last().is_some_and(|f| f.kind.is_class_like()) =>
            {
                if let (Some(frame), Some(access)) = (stack.last_mut(), Access::from_kind(k)) {
                    frame.access = access;
                }
                pos += 2;
            }
            _ => {
                let last = match stack.last_mut() {
                    Some(frame) if frame.kind.is_class_like() => {
                        visitor.visit_member(stream, pos, frame)
                    }
                    Some(frame) if frame.kind == ScopeKind::Anonymous => {
                        visitor.visit_block(stream, pos)
                    }
                    _ => visitor.visit_namespace_level(stream, pos),
                };
                pos = last.max(pos) + 1;
            }
        }
    }

    match stack.last() {
        None => Ok(()),
        Some(innermost) => Err(ScopeError::Unterminated {
            depth: stack.len(),
            line: stream.get(innermost.opener).line,
        }),
    }
}

/// Reads `class|struct|union [attrs] [Name] [final] [: bases] {` at `pos`.
fn class_head(stream: &TokenStream<'_>, pos: Cursor) -> Head {
    let Some(kind) = ScopeKind::from_class_key(stream.kind(pos)) else {
        return Head::NotAHead;
    };
    let mut name = None;
    let mut at = pos + 1;

    loop {
        let token = stream.get(at);
        match token.kind {
            TokenKind::Identifier => {
                if token.lexeme != "final" {
                    name = Some(token.lexeme.to_string());
                }
                at += 1;
            }
            TokenKind::DoubleColon => at += 1,
            TokenKind::Less => {
                at = skip_template_spec(stream, at);
                if stream.at_eof(at) {
                    return Head::NotAHead;
                }
                at += 1;
            }
            TokenKind::Colon => {
                return match base_list(stream, at + 1) {
                    Some((bases, body)) => {
                        let mut frame = ScopeFrame::new(kind, name, pos, body);
                        frame.bases = bases;
                        Head::Open(frame)
                    }
                    None => Head::NotAHead,
                };
            }
            TokenKind::LCurl => return Head::Open(ScopeFrame::new(kind, name, pos, at)),
            TokenKind::Semicolon if name.is_some() => return Head::Declaration(at),
            _ => return Head::NotAHead,
        }
    }
}

/// Parses a base list up to the class body, returning the bases and the
/// position of the `{`.
fn base_list(stream: &TokenStream<'_>, start: Cursor) -> Option<(Vec<BaseSpecifier>, Cursor)> {
    let mut bases = Vec::new();
    let mut access = None;
    let mut is_virtual = false;
    let mut name: Option<(String, Cursor)> = None;
    let mut at = start;

    loop {
        let kind = stream.kind(at);
        match kind {
            TokenKind::Public | TokenKind::Protected | TokenKind::Private => {
                access = Access::from_kind(kind);
                at += 1;
            }
            TokenKind::Virtual => {
                is_virtual = true;
                at += 1;
            }
            TokenKind::Identifier | TokenKind::DoubleColon if name.is_none() => {
                let (names, next) = read_qualified_identifier(stream, at);
                name = Some((names.join("::"), at));
                at = next;
            }
            TokenKind::Less => {
                at = skip_template_spec(stream, at);
                if stream.at_eof(at) {
                    return None;
                }
                at += 1;
            }
            TokenKind::LParen => {
                at = skip_parens(stream, at);
                if stream.at_eof(at) {
                    return None;
                }
                at += 1;
            }
            TokenKind::Comma | TokenKind::LCurl => {
                if let Some((name, pos)) = name.take() {
                    bases.push(BaseSpecifier {
                        access: access.take(),
                        is_virtual,
                        name,
                        pos,
                    });
                }
                access = None;
                is_virtual = false;
                if kind == TokenKind::LCurl {
                    return Some((bases, at));
                }
                at += 1;
            }
            TokenKind::Semicolon | TokenKind::RCurl | TokenKind::EndOfFile => return None,
            _ => at += 1,
        }
    }
}

/// Reads `namespace [Name[::Name]] {` or `namespace A = B;` at `pos`.
fn namespace_head(stream: &TokenStream<'_>, pos: Cursor) -> Head {
    let (names, at) = read_qualified_identifier(stream, pos + 1);
    match stream.kind(at) {
        TokenKind::LCurl => {
            let name = (!names.is_empty()).then(|| names.join("::"));
            Head::Open(ScopeFrame::new(ScopeKind::Namespace, name, pos, at))
        }
        TokenKind::Assign => {
            let mut end = at;
            while !stream.at_eof(end) && stream.kind(end) != TokenKind::Semicolon {
                end += 1;
            }
            Head::Declaration(end)
        }
        _ => Head::NotAHead,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use std::path::Path;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl ScopeVisitor for Recorder {
        fn enter_scope(&mut self, _stream: &TokenStream<'_>, frame: &mut ScopeFrame) {
            self.events.push(format!(
                "enter {:?} {}",
                frame.kind,
                frame.name.as_deref().unwrap_or("-")
            ));
        }

        fn visit_member(&mut self, stream: &TokenStream<'_>, pos: Cursor, frame: &mut ScopeFrame) -> Cursor {
            self.events
                .push(format!("member {:?} {}", frame.access, stream.get(pos).lexeme));
            pos
        }

        fn visit_namespace_level(&mut self, stream: &TokenStream<'_>, pos: Cursor) -> Cursor {
            self.events.push(format!("ns {}", stream.get(pos).lexeme));
            pos
        }

        fn visit_block(&mut self, stream: &TokenStream<'_>, pos: Cursor) -> Cursor {
            self.events.push(format!("block {}", stream.get(pos).lexeme));
            pos
        }

        fn exit_scope(&mut self, _stream: &TokenStream<'_>, frame: ScopeFrame) {
            self.events.push(format!(
                "exit {}",
                frame.name.as_deref().unwrap_or("-")
            ));
        }
    }

    fn walk(source: &str) -> (Vec<String>, Result<(), ScopeError>) {
        let stream = lex(source, Path::new("scope.cpp")).unwrap();
        let mut recorder = Recorder::default();
        let result = walk_scopes(&stream, &mut recorder);
        (recorder.events, result)
    }

    #[test]
    fn test_class_access_tracking() {
        let (events, result) = walk("class A { int x; public: void f(); };");
        assert!(result.is_ok());
        assert_eq!(
            events,
            vec![
                "enter Class A",
                "member Private int",
                "member Private x",
                "member Private ;",
                "member Public void",
                "member Public f",
                "member Public (",
                "member Public )",
                "member Public ;",
                "exit A",
                "ns ;",
            ]
        );
    }

    #[test]
    fn test_struct_defaults_public() {
        let (events, _) = walk("struct S { int y; };");
        assert_eq!(events[1], "member Public int");
    }

    #[test]
    fn test_namespace_and_method_bodies() {
        let (events, result) = walk("namespace a::b { void f() { g(); } }");
        assert!(result.is_ok());
        assert_eq!(
            events,
            vec![
                "enter Namespace a::b",
                "ns void",
                "ns f",
                "ns (",
                "ns )",
                "enter Anonymous -",
                "block g",
                "block (",
                "block )",
                "block ;",
                "exit -",
                "exit a::b",
            ]
        );
    }

    #[test]
    fn test_template_parameters_do_not_open_scopes() {
        let (events, result) = walk("template <class T> class Box { T t; };");
        assert!(result.is_ok());
        assert_eq!(events[0], "enter Class Box");
        assert_eq!(events.iter().filter(|e| e.starts_with("enter")).count(), 1);
    }

    #[test]
    fn test_forward_declarations_and_using_namespace() {
        let (events, result) = walk("class Fwd; using namespace std; enum class E { A };");
        assert!(result.is_ok());
        assert!(!events.iter().any(|e| e.contains("Fwd")));
        assert!(events.contains(&"ns using".to_string()));
        assert!(events.contains(&"ns namespace".to_string()));
        assert!(events.contains(&"enter Anonymous -".to_string()));
        assert!(!events.iter().any(|e| e.starts_with("enter Class")));
    }

    #[test]
    fn test_elaborated_type_is_not_a_head() {
        let (events, result) = walk("void f(struct stat* s);");
        assert!(result.is_ok());
        assert!(events.contains(&"ns struct".to_string()));
    }

    #[test]
    fn test_base_list() {
        struct Bases(Vec<BaseSpecifier>, Option<String>);
        impl ScopeVisitor for Bases {
            fn enter_scope(&mut self, _stream: &TokenStream<'_>, frame: &mut ScopeFrame) {
                if frame.kind.is_class_like() {
                    self.0.extend(frame.bases.iter().cloned());
                    self.1.clone_from(&frame.name);
                }
            }
        }

        let source = "class FOLLY_EXPORT D final : public Base<int>, protected virtual ::std::exception, Mixin { };";
        let stream = lex(source, Path::new("b.cpp")).unwrap();
        let mut bases = Bases(Vec::new(), None);
        walk_scopes(&stream, &mut bases).unwrap();

        assert_eq!(bases.1.as_deref(), Some("D"));
        let summary: Vec<_> = bases
            .0
            .iter()
            .map(|b| (b.access, b.is_virtual, b.name.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Some(Access::Public), false, "Base"),
                (Some(Access::Protected), true, "std::exception"),
                (None, false, "Mixin"),
            ]
        );
    }

    #[test]
    fn test_nested_classes() {
        let (events, result) = walk("class Outer { class Inner { Inner(); }; Outer(); };");
        assert!(result.is_ok());
        assert!(events.contains(&"member Private Inner".to_string()));
        let exits: Vec<_> = events.iter().filter(|e| e.starts_with("exit")).collect();
        assert_eq!(exits, vec!["exit Inner", "exit Outer"]);
    }

    #[test]
    fn test_unbalanced_close() {
        let (_, result) = walk("int x; }\n");
        assert_eq!(result, Err(ScopeError::UnbalancedClose { line: 1 }));
    }

    #[test]
    fn test_unterminated_scope() {
        let (events, result) = walk("\nclass A {\n void f() {\n");
        assert_eq!(result, Err(ScopeError::Unterminated { depth: 2, line: 3 }));
        assert_eq!(events[0], "enter Class A");
    }

    #[test]
    fn test_namespace_alias() {
        let (events, result) = walk("namespace fs = boost::filesystem; int x;");
        assert!(result.is_ok());
        assert_eq!(events, vec!["ns int", "ns x", "ns ;"]);
    }

    #[test]
    fn test_flags() {
        let mut flags = ScopeFlags::default();
        flags.insert(0b101);
        assert!(flags.contains(0b100));
        assert!(!flags.contains(0b010));
        flags.remove(0b100);
        assert!(!flags.contains(0b100));
        assert!(flags.contains(0b001));
    }
}
