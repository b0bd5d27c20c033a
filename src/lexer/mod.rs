//! Lexical analysis module for the language core.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using regex patterns
//! - Recognition of identifiers, literals, operators and assignments
//! - Token position tracking (line/column) for error reporting
//! - Comments, doc comments, escape sequences and multiline text
//! - Re-tokenizing fragments of split tokens for the parser

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
