use crate::{
    ast::{
        ast::Node,
        expressions::ParsingErrorNode,
        operators::OperatorType,
        statements::{
            IfStatementNode, IfStatementPartNode, LoopStatementContinueBreakNode,
            LoopStatementNode, LoopStatementPartKind, LoopStatementPartNode, TryStatementNode,
            TryStatementPartKind, TryStatementPartNode,
        },
    },
    errors::errors::ParsingError,
    lexer::tokens::{Token, TokenKind},
    CodePosition,
};

use super::{
    expr::{parse_argument_list, parse_expression, parse_operation_expr},
    parser::{line_position, raw_text, Parser},
    stmt::trim_tokens,
};

/// The keyword and optional arguments of a control flow part, e.g. `con.elif($a)`.
#[derive(Debug, Clone)]
pub struct PartHeader {
    /// Keyword without the `con.` prefix
    pub keyword: String,
    pub arguments: Option<Vec<Token>>,
    pub position: CodePosition,
}

/// One part of a control flow statement with its body.
#[derive(Debug, Clone)]
pub struct ControlFlowPart<K> {
    pub kind: K,
    pub body: Vec<Node>,
    pub position: CodePosition,
}

/// Builds the kind of the next part from its header, knowing the parts before it.
type PartFactory<K> = fn(&PartHeader, &[ControlFlowPart<K>]) -> Result<K, ParsingErrorNode>;

/// Index of the bracket closing the one at `start`. Only brackets of the
/// same kind are counted.
pub fn find_matching_bracket(tokens: &[Token], start: usize) -> Option<usize> {
    let opening = tokens.get(start)?;
    let closing = match opening.value.as_str() {
        "(" => ")",
        "[" => "]",
        _ => return None,
    };

    let mut depth = 0;
    for (i, token) in tokens.iter().enumerate().skip(start) {
        if token.is_opening_bracket(&opening.value) {
            depth += 1;
        } else if token.is_closing_bracket(closing) {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }

    None
}

pub fn parse_part_header(tokens: &[Token]) -> Result<PartHeader, ParsingErrorNode> {
    let position = line_position(tokens);

    let keyword = match tokens.first() {
        Some(token) if token.kind == TokenKind::Other => token.value.clone(),
        _ => {
            return Err(ParsingErrorNode::new(
                ParsingError::InvalidConPart,
                format!("\"{}\" is not a control flow part", raw_text(tokens)),
                position,
            ))
        }
    };

    let rest = trim_tokens(&tokens[1..]);
    if rest.is_empty() {
        return Ok(PartHeader {
            keyword: strip_con_prefix(&keyword),
            arguments: None,
            position,
        });
    }

    if !rest[0].is_opening_bracket("(") {
        return Err(ParsingErrorNode::new(
            ParsingError::InvalidConPart,
            format!("unexpected \"{}\" after \"{}\"", raw_text(rest), keyword),
            position,
        ));
    }

    let Some(closing) = find_matching_bracket(rest, 0) else {
        return Err(ParsingErrorNode::new(
            ParsingError::BracketMismatch,
            format!("arguments of \"{}\" are not closed", keyword),
            position,
        ));
    };

    if closing + 1 < rest.len() {
        return Err(ParsingErrorNode::new(
            ParsingError::InvalidConPart,
            format!(
                "unexpected \"{}\" after \"{}\"",
                raw_text(&rest[closing + 1..]),
                keyword
            ),
            position,
        ));
    }

    Ok(PartHeader {
        keyword: strip_con_prefix(&keyword),
        arguments: Some(rest[1..closing].to_vec()),
        position,
    })
}

fn strip_con_prefix(keyword: &str) -> String {
    keyword.strip_prefix("con.").unwrap_or(keyword).to_string()
}

fn require_arguments(header: &PartHeader) -> Result<Vec<Token>, ParsingErrorNode> {
    match &header.arguments {
        Some(arguments) if !trim_tokens(arguments).is_empty() => Ok(arguments.clone()),
        _ => Err(ParsingErrorNode::new(
            ParsingError::ContFlowArgMissing,
            format!("\"{}\" requires arguments", header.keyword),
            header.position,
        )),
    }
}

fn forbid_arguments(header: &PartHeader) -> Result<(), ParsingErrorNode> {
    match header.arguments {
        Some(_) => Err(ParsingErrorNode::new(
            ParsingError::InvalidConPart,
            format!("\"{}\" does not take arguments", header.keyword),
            header.position,
        )),
        None => Ok(()),
    }
}

fn invalid_part(header: &PartHeader) -> ParsingErrorNode {
    ParsingErrorNode::new(
        ParsingError::InvalidConPart,
        format!("\"{}\" is not allowed here", header.keyword),
        header.position,
    )
}

/// Whether `line` starts a control flow statement: either the `con.` form or
/// the curly brace form (`if(...) {`) of a bare keyword.
fn is_control_flow_line(line: &[Token]) -> bool {
    if line[0].value.starts_with("con.") {
        return true;
    }

    let ends_with_block = line
        .last()
        .is_some_and(|token| token.kind == TokenKind::OpeningBlockBracket);
    let next = trim_tokens(&line[1..]).first();

    ends_with_block
        && next.is_some_and(|token| {
            token.is_opening_bracket("(") || token.kind == TokenKind::OpeningBlockBracket
        })
}

fn strip_block_opening(tokens: &[Token]) -> Option<&[Token]> {
    match tokens.last() {
        Some(token) if token.kind == TokenKind::OpeningBlockBracket => {
            Some(trim_tokens(&tokens[..tokens.len() - 1]))
        }
        _ => None,
    }
}

/// Reads all parts of a control flow statement starting at `line`.
///
/// The parts read so far are returned together with the error which ended
/// the statement early, if any.
fn parse_control_flow<K>(
    parser: &mut Parser,
    line: &[Token],
    end_keyword: &str,
    make_part: PartFactory<K>,
) -> (Vec<ControlFlowPart<K>>, Result<(), ParsingErrorNode>) {
    let mut parts: Vec<ControlFlowPart<K>> = vec![];

    let curly_header = strip_block_opening(line);
    let is_curly = curly_header.is_some();

    let mut header = match parse_part_header(curly_header.unwrap_or(line)) {
        Ok(header) => header,
        Err(error) => return (parts, Err(error)),
    };

    loop {
        let kind = match make_part(&header, &parts) {
            Ok(kind) => kind,
            Err(error) => return (parts, Err(error)),
        };

        let mut body = vec![];
        let end = parser.parse_body(&mut body);
        parts.push(ControlFlowPart {
            kind,
            body,
            position: header.position,
        });

        let missing_end = || {
            let expected = if is_curly {
                String::from("}")
            } else {
                format!("con.{}", end_keyword)
            };
            ParsingErrorNode::new(
                ParsingError::Eof,
                format!("\"{}\" is missing", expected),
                header.position,
            )
        };

        let terminator = match end {
            Ok(Some(terminator)) => terminator,
            Ok(None) => return (parts, Err(missing_end())),
            Err(error) => return (parts, Err(error)),
        };
        let is_closing_block = terminator[0].kind == TokenKind::ClosingBlockBracket;

        let next_header = if is_curly {
            if !is_closing_block {
                return (parts, Err(invalid_terminator(&terminator)));
            }

            let rest = trim_tokens(&terminator[1..]);
            if rest.is_empty() {
                return (parts, Ok(()));
            }
            match strip_block_opening(rest) {
                Some(rest) => parse_part_header(rest),
                None => return (parts, Err(invalid_terminator(&terminator))),
            }
        } else {
            if is_closing_block {
                return (parts, Err(missing_end()));
            }

            if terminator[0].value == format!("con.{}", end_keyword) {
                if terminator.len() > 1 {
                    return (parts, Err(invalid_terminator(&terminator)));
                }
                return (parts, Ok(()));
            }
            parse_part_header(&terminator)
        };

        header = match next_header {
            Ok(header) => header,
            Err(error) => return (parts, Err(error)),
        };
    }
}

fn invalid_terminator(line: &[Token]) -> ParsingErrorNode {
    ParsingErrorNode::new(
        ParsingError::InvalidConPart,
        format!("\"{}\" is not allowed here", raw_text(line)),
        line_position(line),
    )
}

fn combined_position<K>(parts: &[ControlFlowPart<K>]) -> CodePosition {
    parts
        .iter()
        .fold(CodePosition::EMPTY, |position, part| position.combine(&part.position))
}

// IF

fn make_if_part(
    header: &PartHeader,
    previous: &[ControlFlowPart<Option<Box<Node>>>],
) -> Result<Option<Box<Node>>, ParsingErrorNode> {
    let condition = |header: &PartHeader| -> Result<Option<Box<Node>>, ParsingErrorNode> {
        let arguments = require_arguments(header)?;
        Ok(Some(Box::new(parse_operation_expr(
            arguments,
            OperatorType::Condition,
        ))))
    };

    if previous.is_empty() {
        return match header.keyword.as_str() {
            "if" => condition(header),
            _ => Err(invalid_part(header)),
        };
    }

    if previous.last().is_some_and(|part| part.kind.is_none()) {
        return Err(ParsingErrorNode::new(
            ParsingError::InvalidConPart,
            format!("\"{}\" can not follow \"else\"", header.keyword),
            header.position,
        ));
    }

    match header.keyword.as_str() {
        "elif" => condition(header),
        "else" => forbid_arguments(header).map(|_| None),
        _ => Err(invalid_part(header)),
    }
}

pub fn parse_if_statement(
    parser: &mut Parser,
    line: &[Token],
    nodes: &mut Vec<Node>,
) -> Result<bool, ParsingErrorNode> {
    if !is_control_flow_line(line) {
        return Ok(false);
    }

    let (parts, result) = parse_control_flow(parser, line, "endif", make_if_part);
    if !parts.is_empty() {
        let position = combined_position(&parts);
        let parts = parts
            .into_iter()
            .map(|part| IfStatementPartNode {
                condition: part.kind,
                body: part.body,
                position: part.position,
            })
            .collect();

        nodes.push(Node::IfStatement(IfStatementNode { parts, position }));
    }

    result.map(|_| true)
}

// LOOP

fn make_loop_part(
    header: &PartHeader,
    previous: &[ControlFlowPart<LoopStatementPartKind>],
) -> Result<LoopStatementPartKind, ParsingErrorNode> {
    if !previous.is_empty() {
        let has_else = previous
            .iter()
            .any(|part| part.kind == LoopStatementPartKind::Else);

        return match header.keyword.as_str() {
            "else" if !has_else => forbid_arguments(header).map(|_| LoopStatementPartKind::Else),
            _ => Err(invalid_part(header)),
        };
    }

    match header.keyword.as_str() {
        "loop" => forbid_arguments(header).map(|_| LoopStatementPartKind::Loop),
        "while" => {
            let arguments = require_arguments(header)?;
            Ok(LoopStatementPartKind::While(Box::new(parse_operation_expr(
                arguments,
                OperatorType::Condition,
            ))))
        }
        "until" => {
            let arguments = require_arguments(header)?;
            Ok(LoopStatementPartKind::Until(Box::new(parse_operation_expr(
                arguments,
                OperatorType::Condition,
            ))))
        }
        "repeat" => {
            let arguments = require_arguments(header)?;
            Ok(LoopStatementPartKind::Repeat(parse_argument_list(
                arguments,
                OperatorType::General,
            )))
        }
        "foreach" => {
            let arguments = require_arguments(header)?;
            Ok(LoopStatementPartKind::ForEach(parse_argument_list(
                arguments,
                OperatorType::General,
            )))
        }
        _ => Err(invalid_part(header)),
    }
}

pub fn parse_loop_statement(
    parser: &mut Parser,
    line: &[Token],
    nodes: &mut Vec<Node>,
) -> Result<bool, ParsingErrorNode> {
    if !is_control_flow_line(line) {
        return Ok(false);
    }

    let (parts, result) = parse_control_flow(parser, line, "endloop", make_loop_part);
    if !parts.is_empty() {
        let position = combined_position(&parts);
        let parts = parts
            .into_iter()
            .map(|part| LoopStatementPartNode {
                kind: part.kind,
                body: part.body,
                position: part.position,
            })
            .collect();

        nodes.push(Node::LoopStatement(LoopStatementNode { parts, position }));
    }

    result.map(|_| true)
}

// TRY

fn make_try_part(
    header: &PartHeader,
    previous: &[ControlFlowPart<TryStatementPartKind>],
) -> Result<TryStatementPartKind, ParsingErrorNode> {
    if previous.is_empty() {
        return match header.keyword.as_str() {
            "try" => forbid_arguments(header).map(|_| TryStatementPartKind::Try),
            "softtry" => forbid_arguments(header).map(|_| TryStatementPartKind::SoftTry),
            "nontry" => forbid_arguments(header).map(|_| TryStatementPartKind::NonTry),
            _ => Err(invalid_part(header)),
        };
    }

    let has_else = previous
        .iter()
        .any(|part| part.kind == TryStatementPartKind::Else);
    let has_finally = previous
        .iter()
        .any(|part| part.kind == TryStatementPartKind::Finally);

    match header.keyword.as_str() {
        "catch" if !has_else && !has_finally => {
            let errors = match &header.arguments {
                Some(arguments) if !trim_tokens(arguments).is_empty() => Some(
                    parse_argument_list(arguments.clone(), OperatorType::General),
                ),
                Some(_) => {
                    return Err(ParsingErrorNode::new(
                        ParsingError::ContFlowArgMissing,
                        "\"catch\" with brackets requires at least one error",
                        header.position,
                    ))
                }
                None => None,
            };

            Ok(TryStatementPartKind::Catch(errors))
        }
        "else" if !has_else && !has_finally => {
            forbid_arguments(header).map(|_| TryStatementPartKind::Else)
        }
        "finally" if !has_finally => {
            forbid_arguments(header).map(|_| TryStatementPartKind::Finally)
        }
        _ => Err(invalid_part(header)),
    }
}

pub fn parse_try_statement(
    parser: &mut Parser,
    line: &[Token],
    nodes: &mut Vec<Node>,
) -> Result<bool, ParsingErrorNode> {
    if !is_control_flow_line(line) {
        return Ok(false);
    }

    let (parts, result) = parse_control_flow(parser, line, "endtry", make_try_part);
    if !parts.is_empty() {
        let position = combined_position(&parts);
        let parts = parts
            .into_iter()
            .map(|part| TryStatementPartNode {
                kind: part.kind,
                body: part.body,
                position: part.position,
            })
            .collect();

        nodes.push(Node::TryStatement(TryStatementNode { parts, position }));
    }

    result.map(|_| true)
}

// BREAK / CONTINUE

pub fn parse_continue_break_statement(
    _parser: &mut Parser,
    line: &[Token],
    nodes: &mut Vec<Node>,
) -> Result<bool, ParsingErrorNode> {
    let is_continue = line[0].value == "con.continue";

    match parse_part_header(line) {
        Ok(header) => {
            let levels = header
                .arguments
                .and_then(|arguments| parse_expression(arguments, OperatorType::Math))
                .map(Box::new);

            nodes.push(Node::LoopStatementContinueBreak(
                LoopStatementContinueBreakNode {
                    is_continue,
                    levels,
                    position: header.position,
                },
            ));
        }
        Err(error) => nodes.push(Node::ParsingError(error)),
    }

    Ok(true)
}
