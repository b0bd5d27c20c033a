//! Tree walking evaluation of parsed programs.
//!
//! The evaluator binds variables and definitions, calls functions and
//! hands every operator to the operator engine in [`crate::operators`].

pub mod evaluator;
