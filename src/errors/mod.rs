//! Error types and error handling for the language core.
//!
//! This module defines the two closed error code sets used by the core:
//!
//! - `ParsingError` codes embedded in the AST as parsing error nodes
//! - `InterpretingError` codes carried by error values at evaluation time
//! - An `Error` structure with source position information for hosts
//! - Error names, tips and display functionality

pub mod errors;
