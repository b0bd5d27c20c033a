//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Identifiers and parser function identifiers
//! - Numeric, null and text literals
//! - Operators, brackets and argument separators
//! - Assignment forms
//! - Comments, escape sequences and lexer errors

use crate::CodePosition;

use super::{
    lexer::{retokenize, tokenize},
    tokens::TokenKind,
};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).iter().map(|token| token.kind).collect()
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("$a &arr fp.add func.println $*ptr");

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "$a");
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].value, "&arr");
    assert_eq!(tokens[4].value, "fp.add");
    assert_eq!(tokens[6].value, "func.println");
    assert_eq!(tokens[8].value, "$*ptr");
    assert_eq!(tokens[9].kind, TokenKind::Eof);
}

#[test]
fn test_tokenize_parser_function_identifier() {
    let tokens = tokenize("parser.op(1)");

    assert_eq!(tokens[0].kind, TokenKind::ParserFunctionIdentifier);
    assert_eq!(tokens[0].value, "parser.op");
    assert_eq!(tokens[1].kind, TokenKind::OpeningBracket);
    assert_eq!(tokens[2].kind, TokenKind::LiteralNumber);
    assert_eq!(tokens[3].kind, TokenKind::ClosingBracket);
}

#[test]
fn test_tokenize_numbers() {
    let tokens = tokenize("42 3.14 10l 2.5f 1e3 3rd");

    assert_eq!(tokens[0].kind, TokenKind::LiteralNumber);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[2].value, "3.14");
    assert_eq!(tokens[4].value, "10l");
    assert_eq!(tokens[6].value, "2.5f");
    assert_eq!(tokens[8].value, "1e3");
    assert_eq!(tokens[10].kind, TokenKind::Other);
    assert_eq!(tokens[10].value, "3rd");
}

#[test]
fn test_tokenize_null_and_text() {
    let tokens = tokenize("null nullable \"quoted text\"");

    assert_eq!(tokens[0].kind, TokenKind::LiteralNull);
    assert_eq!(tokens[2].kind, TokenKind::Other);
    assert_eq!(tokens[2].value, "nullable");
    assert_eq!(tokens[4].kind, TokenKind::LiteralText);
    assert_eq!(tokens[4].value, "quoted text");
}

#[test]
fn test_tokenize_operators_longest_first() {
    let tokens = tokenize("1**2|||3<=>4>>>5 ~/ 6");

    assert_eq!(tokens[1].kind, TokenKind::Operator);
    assert_eq!(tokens[1].value, "**");
    assert_eq!(tokens[3].value, "|||");
    assert_eq!(tokens[5].value, "<=>");
    assert_eq!(tokens[7].value, ">>>");
    assert_eq!(tokens[10].value, "~/");
}

#[test]
fn test_tokenize_assignments() {
    let tokens = tokenize("$a = 1\n$b += 2\n$c=3\n$d ?= 1");

    assert_eq!(tokens[1].kind, TokenKind::Assignment);
    assert_eq!(tokens[1].value, " = ");
    assert_eq!(tokens[5].kind, TokenKind::Assignment);
    assert_eq!(tokens[5].value, " += ");
    assert_eq!(tokens[9].kind, TokenKind::Assignment);
    assert_eq!(tokens[9].value, "=");
    assert_eq!(tokens[13].kind, TokenKind::Assignment);
    assert_eq!(tokens[13].value, " ?= ");
}

#[test]
fn test_tokenize_equals_is_not_assignment() {
    let tokens = tokenize("$a == $b");

    assert_eq!(
        kinds("$a == $b"),
        vec![
            TokenKind::Identifier,
            TokenKind::Whitespace,
            TokenKind::Operator,
            TokenKind::Whitespace,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
    assert_eq!(tokens[2].value, "==");
}

#[test]
fn test_tokenize_argument_separator() {
    let tokens = tokenize("func.f($a , $b,$c)");

    assert_eq!(tokens[3].kind, TokenKind::ArgumentSeparator);
    assert_eq!(tokens[3].value, " , ");
    assert_eq!(tokens[5].kind, TokenKind::ArgumentSeparator);
    assert_eq!(tokens[5].value, ",");
}

#[test]
fn test_tokenize_brackets() {
    assert_eq!(
        kinds("([{}])"),
        vec![
            TokenKind::OpeningBracket,
            TokenKind::OpeningBracket,
            TokenKind::OpeningBlockBracket,
            TokenKind::ClosingBlockBracket,
            TokenKind::ClosingBracket,
            TokenKind::ClosingBracket,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_tokenize_comments() {
    let tokens = tokenize("# comment\n## doc\n$a");

    assert_eq!(tokens[0].kind, TokenKind::StartComment);
    assert_eq!(tokens[1].kind, TokenKind::Other);
    assert_eq!(tokens[1].value, " comment");
    assert_eq!(tokens[2].kind, TokenKind::EndComment);
    assert_eq!(tokens[3].kind, TokenKind::Eol);
    assert_eq!(tokens[4].kind, TokenKind::StartDocComment);
    assert_eq!(tokens[5].value, " doc");
    assert_eq!(tokens[6].kind, TokenKind::EndComment);
}

#[test]
fn test_tokenize_escape_sequences_and_continuation() {
    let tokens = tokenize("a\\nb\\\nc");

    assert_eq!(tokens[1].kind, TokenKind::EscapeSequence);
    assert_eq!(tokens[1].value, "n");
    assert_eq!(tokens[3].kind, TokenKind::LineContinuation);
    assert_eq!(tokens[4].value, "c");
}

#[test]
fn test_tokenize_multiline_text() {
    let tokens = tokenize("{{{line 1\nline 2}}}");

    assert_eq!(tokens[0].kind, TokenKind::StartMultilineText);
    assert_eq!(tokens[1].kind, TokenKind::LiteralText);
    assert_eq!(tokens[1].value, "line 1\nline 2");
    assert_eq!(tokens[2].kind, TokenKind::EndMultilineText);
    assert_eq!(tokens[3].kind, TokenKind::Eof);
}

#[test]
fn test_tokenize_lexer_errors() {
    let tokens = tokenize("\"unterminated");
    assert_eq!(tokens[0].kind, TokenKind::LexerError);

    let tokens = tokenize("{{{ never closed");
    assert_eq!(tokens[0].kind, TokenKind::LexerError);
}

#[test]
fn test_token_positions() {
    let tokens = tokenize("$a\n  $bc");

    assert_eq!(tokens[0].position, CodePosition::new(1, 1, 1, 3));
    assert_eq!(tokens[1].kind, TokenKind::Eol);
    assert_eq!(tokens[3].position, CodePosition::new(2, 2, 3, 6));
}

#[test]
fn test_retokenize_has_no_eof() {
    let tokens = retokenize("abc", CodePosition::new(4, 4, 10, 13));

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Other);
    assert_eq!(tokens[0].position, CodePosition::new(4, 4, 10, 13));
}

#[test]
fn test_tokenize_empty_source() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
}
