//! Operator engine giving meaning to every operator the parser produces.
//!
//! Operators are applied to already evaluated [`value::Value`]s. Object
//! operands may overload operators with `op:<name>` methods (and casts with
//! `to:<type>` methods); everything else falls back to the built-in
//! behaviour of the operand types. Callbacks into the interpreter (running
//! functions, creating error values) go through [`context::OperatorContext`].

pub mod arithmetic;
pub mod bitwise;
pub mod collection;
pub mod comparison;
pub mod context;
pub mod conversion;
pub mod function;
pub mod operators;
pub mod overload;
pub mod value;

#[cfg(test)]
mod tests;
