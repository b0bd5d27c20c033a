use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    ast::{
        ast::Node,
        expressions::{AssignmentNode, OperationNode, ParsingErrorNode, UnprocessedVariableNameNode},
        operators::{Operator, OperatorType},
        statements::{ReturnNode, ThrowNode},
    },
    errors::errors::ParsingError,
    lexer::tokens::{Token, TokenKind},
};

use super::{
    definitions::{find_function_arrow, parse_function_value},
    expr::{parse_argument_list, parse_expression, parse_operation_expr, parse_token_sequence},
    lookups::lookup_assignment_operator,
    parser::{line_position, raw_text, Parser},
};

lazy_static! {
    static ref VARIABLE_NAME: Regex = Regex::new("^(\\$\\**|&|fp\\.|mp\\.)[a-zA-Z_]\\w*$").unwrap();
}

/// Parses one line (and the lines of any block it opens) into `nodes`.
///
/// Errors local to the line are added as `ParsingError` nodes. Errors which
/// leave a block unfinished are returned to end the enclosing construct.
pub fn parse_stmt(
    parser: &mut Parser,
    line: Vec<Token>,
    nodes: &mut Vec<Node>,
) -> Result<(), ParsingErrorNode> {
    if let Some(index) = find_assignment(&line) {
        return parse_assignment(parser, &line, index, nodes);
    }

    let handler = line
        .first()
        .filter(|token| token.kind == TokenKind::Other)
        .and_then(|token| parser.get_stmt_lookup().get(token.value.as_str()).copied());
    if let Some(handler) = handler {
        if handler(parser, &line, nodes)? {
            return Ok(());
        }
    }

    if let Some(node) = parse_token_sequence(line) {
        nodes.push(node);
    }

    Ok(())
}

/// Index of the first `Assignment` token outside of brackets.
pub fn find_assignment(line: &[Token]) -> Option<usize> {
    let mut depth = 0;
    for (i, token) in line.iter().enumerate() {
        match token.kind {
            TokenKind::OpeningBracket => depth += 1,
            TokenKind::ClosingBracket => depth -= 1,
            TokenKind::Assignment if depth == 0 => return Some(i),
            _ => {}
        }
    }

    None
}

/// Removes leading and trailing whitespace tokens.
pub fn trim_tokens(tokens: &[Token]) -> &[Token] {
    let start = tokens
        .iter()
        .position(|token| token.kind != TokenKind::Whitespace)
        .unwrap_or(tokens.len());
    let end = tokens
        .iter()
        .rposition(|token| token.kind != TokenKind::Whitespace)
        .map_or(start, |end| end + 1);

    &tokens[start..end]
}

fn invalid_assignment(message: impl Into<String>, line: &[Token]) -> Node {
    Node::ParsingError(ParsingErrorNode::new(
        ParsingError::InvalidAssignment,
        message,
        line_position(line),
    ))
}

/// Whether `node` can be assigned to by the operator assignment forms.
fn is_assignable(node: &Node) -> bool {
    match node {
        Node::UnprocessedVariableName(_) => true,
        Node::Operation(operation) => matches!(
            operation.operator,
            Operator::GetItem | Operator::MemberAccess
        ),
        _ => false,
    }
}

/// Parses the value of `lvalue = rvalue`. Function values may span several lines.
pub fn parse_rvalue(
    parser: &mut Parser,
    rvalue: &[Token],
    assignment: &Token,
) -> Result<Node, ParsingErrorNode> {
    if find_function_arrow(rvalue).is_some() {
        return parse_function_value(parser, rvalue, None).map(Node::FunctionDefinition);
    }

    Ok(parse_token_sequence(rvalue.to_vec()).unwrap_or(Node::Null {
        position: assignment.position,
    }))
}

fn parse_assignment(
    parser: &mut Parser,
    line: &[Token],
    index: usize,
    nodes: &mut Vec<Node>,
) -> Result<(), ParsingErrorNode> {
    let assignment = &line[index];
    let lvalue_tokens = trim_tokens(&line[..index]);
    let rvalue_tokens = trim_tokens(&line[index + 1..]);

    if lvalue_tokens.is_empty() {
        nodes.push(invalid_assignment("the assignment has no lvalue", line));
        return Ok(());
    }

    // `lvalue=rvalue`: the rvalue is kept as written
    if assignment.value == "=" {
        let rvalue = Node::text(
            raw_text(rvalue_tokens),
            line_position(rvalue_tokens).combine(&assignment.position),
        );
        let lvalue = match lvalue_tokens {
            [token] if VARIABLE_NAME.is_match(&token.value) => {
                Node::UnprocessedVariableName(UnprocessedVariableNameNode {
                    name: token.value.clone(),
                    position: token.position,
                })
            }
            _ => Node::text(raw_text(lvalue_tokens), line_position(lvalue_tokens)),
        };

        nodes.push(Node::Assignment(AssignmentNode::new(lvalue, rvalue)));
        return Ok(());
    }

    let symbol = assignment.value.trim();
    let symbol = &symbol[..symbol.len() - 1];

    if symbol.is_empty() {
        if let [token] = lvalue_tokens {
            if token.kind == TokenKind::ParserFunctionIdentifier {
                let value = parse_rvalue(parser, rvalue_tokens, assignment)?;
                parser.set_flag(token.value["parser.".len()..].to_string(), value);
                return Ok(());
            }
        }

        let has_identifier = lvalue_tokens
            .iter()
            .any(|token| token.kind == TokenKind::Identifier);
        let lvalue = if has_identifier {
            parse_expression(lvalue_tokens.to_vec(), OperatorType::General)
                .unwrap_or(Node::Null {
                    position: assignment.position,
                })
        } else {
            // Translation key
            Node::text(raw_text(lvalue_tokens), line_position(lvalue_tokens))
        };
        let rvalue = parse_rvalue(parser, rvalue_tokens, assignment)?;

        nodes.push(Node::Assignment(AssignmentNode::new(lvalue, rvalue)));
        return Ok(());
    }

    let lvalue = parse_expression(lvalue_tokens.to_vec(), OperatorType::General);
    let lvalue = match lvalue {
        Some(lvalue) if is_assignable(&lvalue) => lvalue,
        _ => {
            nodes.push(invalid_assignment(
                format!(
                    "\"{}\" can not be assigned with \"{}\"",
                    raw_text(lvalue_tokens),
                    assignment.value.trim()
                ),
                line,
            ));
            return Ok(());
        }
    };

    let rvalue = match symbol {
        "?" => parse_operation_expr(rvalue_tokens.to_vec(), OperatorType::Condition),
        ":" => parse_operation_expr(rvalue_tokens.to_vec(), OperatorType::Math),
        "$" => parse_operation_expr(rvalue_tokens.to_vec(), OperatorType::General),
        _ => {
            let Some(operator) = lookup_assignment_operator(symbol) else {
                nodes.push(invalid_assignment(
                    format!("unknown assignment operator \"{}\"", assignment.value.trim()),
                    line,
                ));
                return Ok(());
            };

            let mode = operator.operator_type();
            let rvalue = parse_expression(rvalue_tokens.to_vec(), mode).unwrap_or(Node::Null {
                position: assignment.position,
            });
            Node::Operation(OperationNode::binary(operator, lvalue.clone(), rvalue, mode))
        }
    };

    nodes.push(Node::Assignment(AssignmentNode::new(lvalue, rvalue)));
    Ok(())
}

/// Tokens after the keyword of a `return`/`throw` line, or `None` if the
/// keyword is only the start of a longer word.
fn keyword_arguments(line: &[Token]) -> Option<&[Token]> {
    match line.get(1) {
        None => Some(&[]),
        Some(token) if token.kind == TokenKind::Whitespace => Some(trim_tokens(&line[1..])),
        Some(_) => None,
    }
}

pub fn parse_return_statement(
    parser: &mut Parser,
    line: &[Token],
    nodes: &mut Vec<Node>,
) -> Result<bool, ParsingErrorNode> {
    let Some(arguments) = keyword_arguments(line) else {
        return Ok(false);
    };

    let value = if arguments.is_empty() {
        None
    } else {
        Some(Box::new(parse_rvalue(parser, arguments, &line[0])?))
    };

    nodes.push(Node::Return(ReturnNode {
        value,
        position: line_position(line),
    }));
    Ok(true)
}

pub fn parse_throw_statement(
    _parser: &mut Parser,
    line: &[Token],
    nodes: &mut Vec<Node>,
) -> Result<bool, ParsingErrorNode> {
    let Some(arguments) = keyword_arguments(line) else {
        return Ok(false);
    };

    let mut arguments = parse_argument_list(arguments.to_vec(), OperatorType::General)
        .into_iter()
        .filter(|node| !matches!(node, Node::ArgumentSeparator { .. }));

    let Some(error) = arguments.next() else {
        nodes.push(Node::ParsingError(ParsingErrorNode::new(
            ParsingError::ContFlowArgMissing,
            "\"throw\" requires an error",
            line_position(line),
        )));
        return Ok(true);
    };

    nodes.push(Node::Throw(ThrowNode {
        error: Box::new(error),
        message: arguments.next().map(Box::new),
        position: line_position(line),
    }));
    Ok(true)
}
