use std::fmt::Display;

use crate::CodePosition;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Other,

    LiteralNull,
    LiteralNumber,
    LiteralText,

    ArgumentSeparator,
    Assignment,

    OpeningBracket,
    ClosingBracket,
    OpeningBlockBracket,
    ClosingBlockBracket,

    EscapeSequence,
    ParserFunctionIdentifier,
    Identifier,
    Operator,

    Whitespace,
    LineContinuation,

    StartComment,
    StartDocComment,
    EndComment,

    StartMultilineText,
    EndMultilineText,

    LexerError,

    Eol,
    Eof,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub position: CodePosition,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    pub fn is_one_of_many(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    /// `true` for `Eol` and `Eof`.
    pub fn is_line_end(&self) -> bool {
        self.is_one_of_many(&[TokenKind::Eol, TokenKind::Eof])
    }

    pub fn is_opening_bracket(&self, bracket: &str) -> bool {
        self.kind == TokenKind::OpeningBracket && self.value == bracket
    }

    pub fn is_closing_bracket(&self, bracket: &str) -> bool {
        self.kind == TokenKind::ClosingBracket && self.value == bracket
    }

    pub fn is_operator(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Operator && self.value == symbol
    }

    pub fn is_other(&self, value: &str) -> bool {
        self.kind == TokenKind::Other && self.value == value
    }

    /// The text this token was lexed from, as far as it can be reconstructed.
    pub fn to_raw_string(&self) -> String {
        match self.kind {
            TokenKind::LiteralText => format!("\"{}\"", self.value),
            TokenKind::EscapeSequence => format!("\\{}", self.value),
            TokenKind::StartMultilineText => String::from("{{{"),
            TokenKind::EndMultilineText => String::from("}}}"),
            TokenKind::LineContinuation => String::from("\\\n"),
            TokenKind::Eof => String::new(),
            _ => self.value.clone(),
        }
    }

    pub fn debug(&self) {
        if self.is_one_of_many(&[
            TokenKind::Other,
            TokenKind::Identifier,
            TokenKind::LiteralNumber,
            TokenKind::LiteralText,
            TokenKind::Operator,
        ]) {
            println!("{} ({})", self.kind, self.value);
        } else {
            println!("{} ()", self.kind);
        }
    }
}
