use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::ast::operators::{Operator, OperatorType};

use super::{control_flow::*, definitions::*, parser::Parser, stmt::*};

lazy_static! {
    static ref UNARY_OPERATOR_LOOKUP: HashMap<&'static str, Operator> =
        create_operator_lookup(|operator| operator.is_unary());
    static ref BINARY_OPERATOR_LOOKUP: HashMap<&'static str, Operator> =
        create_operator_lookup(|operator| operator.is_binary());
}

/// Operators which are parsed from their symbol token. Brackets, casts, the
/// ternary operator, commas and the `NON` wrappers are handled by the parser itself.
fn create_operator_lookup(filter: fn(&Operator) -> bool) -> HashMap<&'static str, Operator> {
    Operator::VALUES
        .iter()
        .filter(|operator| {
            !matches!(
                operator,
                Operator::Non
                    | Operator::MathNon
                    | Operator::ConditionalNon
                    | Operator::GetItem
                    | Operator::OptionalGetItem
                    | Operator::SetItem
                    | Operator::InlineIf
                    | Operator::Cast
                    | Operator::Comma
            )
        })
        .filter(|operator| filter(operator))
        .map(|operator| (operator.symbol(), *operator))
        .collect()
}

/// Returns the prefix operator for `symbol` if it is usable in `mode`.
pub fn lookup_unary_operator(symbol: &str, mode: OperatorType) -> Option<Operator> {
    UNARY_OPERATOR_LOOKUP
        .get(symbol)
        .filter(|operator| operator.operator_type().is_compatible_with(mode))
        .copied()
}

/// Returns the infix operator for `symbol` if it is usable in `mode`.
pub fn lookup_binary_operator(symbol: &str, mode: OperatorType) -> Option<Operator> {
    BINARY_OPERATOR_LOOKUP
        .get(symbol)
        .filter(|operator| operator.operator_type().is_compatible_with(mode))
        .copied()
}

/// Returns the operator of a compound assignment (` op= `) regardless of mode.
pub fn lookup_assignment_operator(symbol: &str) -> Option<Operator> {
    BINARY_OPERATOR_LOOKUP
        .get(symbol)
        .filter(|operator| {
            !matches!(
                operator.operator_type(),
                OperatorType::Condition | OperatorType::All
            )
        })
        .copied()
}

pub fn create_statement_lookups(parser: &mut Parser) {
    // Control flow
    for keyword in ["con.if", "if"] {
        parser.stmt(keyword, parse_if_statement);
    }
    for keyword in [
        "con.loop",
        "loop",
        "con.while",
        "while",
        "con.until",
        "until",
        "con.repeat",
        "repeat",
        "con.foreach",
        "foreach",
    ] {
        parser.stmt(keyword, parse_loop_statement);
    }
    for keyword in [
        "con.try",
        "try",
        "con.softtry",
        "softtry",
        "con.nontry",
        "nontry",
    ] {
        parser.stmt(keyword, parse_try_statement);
    }
    parser.stmt("con.break", parse_continue_break_statement);
    parser.stmt("con.continue", parse_continue_break_statement);

    // Definitions
    parser.stmt("function", parse_function_definition);
    parser.stmt("struct", parse_struct_definition);
    parser.stmt("class", parse_class_definition);

    parser.stmt("return", parse_return_statement);
    parser.stmt("throw", parse_throw_statement);
}

pub type StmtLookup = HashMap<&'static str, super::parser::StmtHandler>;
