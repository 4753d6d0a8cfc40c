//! Integration test: properties every token stream must satisfy.

use flint_core::navigator::{skip_balanced_curly, skip_parens, skip_template_spec};
use flint_core::{lex, TokenKind, TokenStream};
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> (PathBuf, String) {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
    let text = std::fs::read_to_string(&path).unwrap();
    (path, text)
}

fn round_trip(stream: &TokenStream<'_>) -> String {
    stream.iter().map(|t| format!("{}{}", t.trivia, t.lexeme)).collect()
}

#[test]
fn fixture_round_trips() {
    let (path, text) = fixture("widget.h");
    let stream = lex(&text, &path).unwrap();
    assert_eq!(round_trip(&stream), text);
}

#[test]
fn fixture_lines_are_monotonic() {
    let (path, text) = fixture("widget.h");
    let stream = lex(&text, &path).unwrap();
    let lines: Vec<usize> = stream.iter().map(|t| t.line).collect();
    assert!(lines.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(stream.last().kind, TokenKind::EndOfFile);
    assert_eq!(stream.last().line, text.matches('\n').count() + 1);
}

#[test]
fn fixture_include_forms() {
    let (path, text) = fixture("widget.h");
    let stream = lex(&text, &path).unwrap();
    let after_includes: Vec<(TokenKind, &str)> = stream
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is(TokenKind::PoundInclude))
        .map(|(i, _)| {
            let next = stream.get(i + 1);
            (next.kind, next.lexeme)
        })
        .collect();
    assert_eq!(
        after_includes,
        vec![
            (TokenKind::Less, "<"),
            (TokenKind::StringLiteral, "<vector>"),
            (TokenKind::StringLiteral, "\"base/Object.h\""),
        ]
    );
}

#[test]
fn balanced_skips_land_on_matching_closers() {
    let (path, text) = fixture("widget.h");
    let stream = lex(&text, &path).unwrap();
    for (i, token) in stream.iter().enumerate() {
        let close = match token.kind {
            TokenKind::LCurl => skip_balanced_curly(&stream, i),
            TokenKind::LParen => skip_parens(&stream, i),
            _ => continue,
        };
        assert!(!stream.at_eof(close), "opener on line {} never closed", token.line);
        let expected = if token.is(TokenKind::LCurl) {
            TokenKind::RCurl
        } else {
            TokenKind::RParen
        };
        assert_eq!(stream.kind(close), expected);
    }
}

#[test]
fn template_skip_with_parenthesized_comparison() {
    let source = "template <class T, int N = (3 > 2)> struct S;";
    let stream = lex(source, Path::new("t.h")).unwrap();
    let close = skip_template_spec(&stream, 1);
    assert_eq!(stream.get(close + 1).kind, TokenKind::Struct);
}

#[test]
fn hello_world_has_eighteen_tokens() {
    let source = "#include <stdio.h>\nint main() {\n  printf(\"hi\");\n}";
    let stream = lex(source, Path::new("hello.c")).unwrap();
    assert_eq!(stream.len(), 18);
    assert_eq!(
        stream.iter().filter(|t| t.is(TokenKind::EndOfFile)).count(),
        1
    );
}
