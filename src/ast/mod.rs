/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The `Node` enum and helpers shared by all nodes
/// - expressions: Definitions for operations, calls, literals and assignments
/// - statements: Definitions for control flow statements and definitions
/// - operators: The operator table (symbols, arity, precedence, categories)
pub mod ast;
pub mod expressions;
pub mod operators;
pub mod statements;

#[cfg(test)]
mod tests;
