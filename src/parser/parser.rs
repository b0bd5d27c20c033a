//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the block parsing loop.
//! The parser is line oriented: every statement starts on a new line and
//! is dispatched through a keyword lookup table, falling back to assignment
//! and free-form expression parsing.
//!
//! It maintains:
//! - The token stream and the current position in it
//! - The statement lookup table (keyword to handler)
//! - The pending doc comment and the extracted comments
//! - Parser flags set by `parser.<name> = value` assignments

use std::collections::HashMap;

use crate::{
    ast::{ast::Node, expressions::ParsingErrorNode},
    errors::errors::ParsingError,
    lexer::tokens::{Token, TokenKind},
    CodePosition,
};

use super::{
    lookups::{create_statement_lookups, StmtLookup},
    stmt::parse_stmt,
};

/// Handles a line starting with a registered keyword.
///
/// Returns `Ok(false)` if the line is not the statement the keyword suggests,
/// e.g. `if` used as a plain word.
pub type StmtHandler = fn(&mut Parser, &[Token], &mut Vec<Node>) -> Result<bool, ParsingErrorNode>;

/// Keywords continuing or ending a control flow statement. A line starting
/// with one of them ends the current block.
const BLOCK_CONTINUATION_KEYWORDS: [&str; 7] = [
    "con.elif",
    "con.else",
    "con.endif",
    "con.endloop",
    "con.catch",
    "con.finally",
    "con.endtry",
];

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// The list of tokens to parse
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Doc comment waiting for the next definition
    doc_comment: Option<String>,
    /// Text of all regular comments, in source order
    comments: Vec<String>,
    flags: HashMap<String, Node>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut parser = Parser {
            tokens,
            pos: 0,
            stmt_lookup: HashMap::new(),
            doc_comment: None,
            comments: vec![],
            flags: HashMap::new(),
        };
        create_statement_lookups(&mut parser);

        parser
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token()
            .is_some_and(|token| token.kind != TokenKind::Eof)
    }

    /// Position used for errors at the current token (e.g. an early end of file).
    pub fn get_position(&self) -> CodePosition {
        self.current_token()
            .or_else(|| self.tokens.last())
            .map(|token| token.position)
            .unwrap_or(CodePosition::EMPTY)
    }

    /// Registers a statement handler for lines starting with `keyword`.
    pub fn stmt(&mut self, keyword: &'static str, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(keyword, stmt_fn);
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    pub fn doc_comment(&self) -> Option<&str> {
        self.doc_comment.as_deref()
    }

    /// Removes the pending doc comment. Called by the definition it belongs to.
    pub fn take_doc_comment(&mut self) -> Option<String> {
        self.doc_comment.take()
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Value of a parser flag set with `parser.<name> = value`.
    pub fn flag(&self, name: &str) -> Option<&Node> {
        self.flags.get(name)
    }

    pub fn flags(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.flags.iter()
    }

    pub fn set_flag(&mut self, name: String, value: Node) {
        self.flags.insert(name, value);
    }

    fn extract_comment(&mut self, is_doc_comment: bool) {
        let mut text = String::new();
        while let Some(token) = self.advance() {
            match token.kind {
                TokenKind::EndComment => break,
                _ => text.push_str(&token.value),
            }
        }

        let text = text.trim().to_string();
        if is_doc_comment {
            self.doc_comment = Some(match self.doc_comment.take() {
                Some(doc_comment) => format!("{}\n{}", doc_comment, text),
                None => text,
            });
        } else {
            self.comments.push(text);
        }
    }

    /// Reads the tokens of the next line without the line end, comments and
    /// surrounding whitespace. Line continuations join the following line.
    ///
    /// Returns `None` at the end of the token stream.
    pub fn next_line(&mut self) -> Option<Vec<Token>> {
        if !self.has_tokens() {
            return None;
        }

        let mut line = vec![];
        while let Some(token) = self.current_token() {
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Eol => {
                    self.advance();
                    break;
                }
                TokenKind::LineContinuation => {
                    self.advance();
                }
                TokenKind::StartComment | TokenKind::StartDocComment => {
                    let is_doc_comment = token.kind == TokenKind::StartDocComment;
                    self.advance();
                    self.extract_comment(is_doc_comment);
                }
                _ => {
                    let token = token.clone();
                    self.advance();
                    line.push(token);
                }
            }
        }

        while line
            .first()
            .is_some_and(|token| token.kind == TokenKind::Whitespace)
        {
            line.remove(0);
        }
        while line
            .last()
            .is_some_and(|token| token.kind == TokenKind::Whitespace)
        {
            line.pop();
        }

        Some(line)
    }

    /// Parses statements into `nodes` until a line ending the current block.
    ///
    /// Returns that line (starting with `}` or a `con.` continuation keyword),
    /// or `None` if the end of the tokens was reached.
    pub fn parse_body(&mut self, nodes: &mut Vec<Node>) -> Result<Option<Vec<Token>>, ParsingErrorNode> {
        while let Some(line) = self.next_line() {
            if line.is_empty() {
                continue;
            }
            if is_block_end(&line) {
                return Ok(Some(line));
            }

            parse_stmt(self, line, nodes)?;
        }

        Ok(None)
    }

    /// Parses all remaining tokens.
    ///
    /// Syntax errors are returned as `ParsingError` nodes. An error which ends
    /// a nested construct also ends parsing, statements before it are kept.
    pub fn parse_tokens(&mut self) -> Vec<Node> {
        self.doc_comment = None;

        let mut nodes = vec![];
        loop {
            match self.parse_body(&mut nodes) {
                Ok(None) => break,
                Ok(Some(line)) => {
                    let position = line_position(&line);
                    let node = if line[0].kind == TokenKind::ClosingBlockBracket {
                        ParsingErrorNode::new(
                            ParsingError::BracketMismatch,
                            "\"}\" without an opening block",
                            position,
                        )
                    } else {
                        ParsingErrorNode::new(
                            ParsingError::InvalidConPart,
                            format!("\"{}\" outside of a control flow statement", line[0].value),
                            position,
                        )
                    };
                    nodes.push(Node::ParsingError(node));
                }
                Err(error) => {
                    nodes.push(Node::ParsingError(error));
                    break;
                }
            }
        }

        nodes
    }
}

pub fn is_block_end(line: &[Token]) -> bool {
    match line.first() {
        Some(token) if token.kind == TokenKind::ClosingBlockBracket => true,
        Some(token) if token.kind == TokenKind::Other => {
            BLOCK_CONTINUATION_KEYWORDS.contains(&token.value.as_str())
        }
        _ => false,
    }
}

/// Smallest position containing all tokens of `line`.
pub fn line_position(line: &[Token]) -> CodePosition {
    line.iter()
        .fold(CodePosition::EMPTY, |position, token| position.combine(&token.position))
}

/// Source text of `tokens` as it was written.
pub fn raw_text(tokens: &[Token]) -> String {
    tokens.iter().map(Token::to_raw_string).collect()
}

/// Parses a stream of tokens into an Abstract Syntax Tree.
///
/// This is the main entry point for parsing.
///
/// # Returns
///
/// A tuple containing:
/// - The Parser instance (with comments and parser flags collected while parsing)
/// - The top level nodes, including `ParsingError` nodes for syntax errors
pub fn parse(tokens: Vec<Token>) -> (Parser, Vec<Node>) {
    let mut parser = Parser::new(tokens);
    let nodes = parser.parse_tokens();

    (parser, nodes)
}
