//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. Statements are parsed line by line and
//! dispatched by their first keyword. Expressions are parsed by precedence
//! climbing in one of three modes (general text, math and condition) and
//! handle:
//!
//! - Statement parsing (assignments, definitions, control flow)
//! - Expression parsing (operators, function calls, literals, casts)
//! - Error reporting as `ParsingError` nodes inside the tree
//!
//! Syntax errors never abort parsing with a panic: the construct they break
//! is replaced (or followed) by a `ParsingError` node.

pub mod control_flow;
pub mod cursor;
pub mod definitions;
pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;

#[cfg(test)]
mod tests;
