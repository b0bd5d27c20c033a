use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    ast::{
        ast::Node,
        expressions::{
            ArrayValueNode, FunctionCallNode, FunctionCallPreviousNodeValueNode, ListNode,
            OperationNode, ParsingErrorNode, UnprocessedVariableNameNode,
        },
        operators::{Operator, OperatorType},
    },
    errors::errors::ParsingError,
    lexer::{
        lexer::retokenize,
        tokens::{Token, TokenKind},
    },
    CodePosition, MK_TOKEN,
};

use super::{
    cursor::TokenCursor,
    lookups::{lookup_binary_operator, lookup_unary_operator},
};

lazy_static! {
    static ref CALLABLE_IDENTIFIER: Regex =
        Regex::new("^(\\$\\**|fp\\.|mp\\.|func\\.|fn\\.|linker\\.|ln\\.)\\w+$").unwrap();
    static ref CAST_TYPE: Regex = Regex::new("^[A-Z_]+$").unwrap();
}

pub type ExprResult = Result<Option<Node>, ParsingErrorNode>;

/// Where an expression is parsed. Nested brackets start a fresh context.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprContext {
    /// A closing bracket ends the expression instead of being text.
    pub in_brackets: bool,
    /// `,` is the `COMMA` operator instead of text.
    pub allow_comma: bool,
    /// `:` ends the expression (middle operand of `? :`).
    pub stop_at_colon: bool,
}

impl ExprContext {
    pub fn brackets() -> Self {
        ExprContext {
            in_brackets: true,
            allow_comma: true,
            stop_at_colon: false,
        }
    }

    pub fn argument_list() -> Self {
        ExprContext {
            in_brackets: false,
            allow_comma: true,
            stop_at_colon: false,
        }
    }
}

/// Operands collected at one precedence level.
struct Operands {
    items: Vec<Node>,
    whitespace: Option<Token>,
    mode: OperatorType,
}

impl Operands {
    fn new(mode: OperatorType) -> Self {
        Operands {
            items: vec![],
            whitespace: None,
            mode,
        }
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the next token directly follows the last operand.
    fn is_adjacent(&self) -> bool {
        !self.items.is_empty() && self.whitespace.is_none()
    }

    fn push(&mut self, node: Node) {
        if let Some(whitespace) = self.whitespace.take() {
            if self.mode == OperatorType::General && !self.items.is_empty() {
                self.items
                    .push(Node::text(whitespace.value, whitespace.position));
            }
        }

        self.items.push(node);
    }

    fn push_text(&mut self, token: &Token) {
        self.push(Node::text(token.value.clone(), token.position));
    }

    /// Removes all operands as the left side of a binary operator.
    fn take_left(&mut self, position: CodePosition) -> Node {
        self.whitespace = None;
        collapse(std::mem::take(&mut self.items), position)
    }

    /// Removes the last operand for postfix operators, which bind to it alone.
    fn pop_last(&mut self, position: CodePosition) -> Node {
        self.whitespace = None;
        self.items.pop().unwrap_or(Node::Null { position })
    }

    fn last_is_callable(&self) -> bool {
        matches!(
            self.items.last(),
            Some(
                Node::UnprocessedVariableName(_)
                    | Node::FunctionCall(_)
                    | Node::FunctionCallPreviousNodeValue(_)
                    | Node::Operation(_)
            )
        )
    }

    fn into_node(self) -> Option<Node> {
        if self.items.is_empty() {
            return None;
        }

        Some(collapse(self.items, CodePosition::EMPTY))
    }
}

fn collapse(mut nodes: Vec<Node>, position: CodePosition) -> Node {
    match nodes.len() {
        0 => Node::Null { position },
        1 => nodes.remove(0),
        _ => Node::List(ListNode::new(nodes)),
    }
}

/// Whether an operator found at this level has to be left to the caller.
fn defers(min_precedence: i32, operator: Operator) -> bool {
    if operator.is_right_associative() {
        min_precedence < operator.precedence()
    } else {
        min_precedence <= operator.precedence()
    }
}

fn bracket_mismatch(token: &Token) -> ParsingErrorNode {
    ParsingErrorNode::new(
        ParsingError::BracketMismatch,
        format!("bracket \"{}\" is not matched", token.value),
        token.position,
    )
}

/// Consumes the bracket closing `opening` or fails with a bracket mismatch.
fn expect_closing_bracket(
    cursor: &mut TokenCursor,
    opening: &Token,
) -> Result<Token, ParsingErrorNode> {
    let closing = if opening.value == "(" { ")" } else { "]" };

    match cursor.current_token() {
        Some(token) if token.is_closing_bracket(closing) => {
            cursor.advance().ok_or_else(|| bracket_mismatch(opening))
        }
        _ => Err(bracket_mismatch(opening)),
    }
}

/// Parses everything up to the bracket closing `opening`.
fn parse_bracket_content(
    cursor: &mut TokenCursor,
    opening: &Token,
    mode: OperatorType,
) -> Result<(Option<Node>, Token), ParsingErrorNode> {
    let inner = parse_expr(cursor, i32::MAX, mode, ExprContext::brackets())?;
    let closing = expect_closing_bracket(cursor, opening)?;

    Ok((inner, closing))
}

fn parse_call_arguments(
    cursor: &mut TokenCursor,
    opening: &Token,
    mode: OperatorType,
) -> Result<(Vec<Node>, Token), ParsingErrorNode> {
    let (inner, closing) = parse_bracket_content(cursor, opening, mode)?;

    Ok((inner.map(flatten_comma).unwrap_or_default(), closing))
}

fn parse_index(
    cursor: &mut TokenCursor,
    opening: &Token,
    mode: OperatorType,
) -> Result<Node, ParsingErrorNode> {
    let index_mode = if mode == OperatorType::Condition {
        OperatorType::Condition
    } else {
        OperatorType::Math
    };

    let (inner, closing) = parse_bracket_content(cursor, opening, index_mode)?;
    Ok(inner.unwrap_or(Node::Null {
        position: opening.position.combine(&closing.position),
    }))
}

pub fn parse_number(token: &Token) -> Node {
    let value = token.value.as_str();
    let position = token.position;

    if let Some(digits) = value.strip_suffix(|c: char| c == 'l' || c == 'L') {
        if let Ok(value) = digits.parse::<i64>() {
            return Node::Long { value, position };
        }
    } else if let Some(digits) = value.strip_suffix(|c: char| c == 'f' || c == 'F') {
        if let Ok(value) = digits.parse::<f32>() {
            return Node::Float { value, position };
        }
    } else if !value.contains(|c: char| matches!(c, '.' | 'e' | 'E')) {
        if let Ok(value) = value.parse::<i32>() {
            return Node::Int { value, position };
        }
        if let Ok(value) = value.parse::<i64>() {
            return Node::Long { value, position };
        }
    }

    let digits = value.trim_end_matches(|c: char| matches!(c, 'l' | 'L' | 'f' | 'F'));
    match digits.parse::<f64>() {
        Ok(value) => Node::Double { value, position },
        Err(_) => Node::text(value, position),
    }
}

pub fn parse_escape_sequence(token: &Token) -> Node {
    let position = token.position;
    let value = match token.value.chars().next() {
        Some('n') => '\n',
        Some('r') => '\r',
        Some('t') => '\t',
        Some('s') => ' ',
        Some('0') => '\0',
        Some('f') => '\u{000C}',
        Some('b') => '\u{0008}',
        Some('e') | Some('!') | None => return Node::text("", position),
        Some(c) => c,
    };

    Node::Char { value, position }
}

/// Turns a left nested `COMMA` tree into an `ArgumentSeparator` delimited list.
pub fn flatten_comma(node: Node) -> Vec<Node> {
    let mut nodes = vec![];
    flatten_comma_into(node, &mut nodes);
    nodes
}

fn flatten_comma_into(node: Node, nodes: &mut Vec<Node>) {
    match node {
        Node::Operation(operation) if operation.operator == Operator::Comma => {
            let position = operation.position;
            flatten_comma_into(*operation.left, nodes);
            nodes.push(Node::ArgumentSeparator {
                original_text: String::from(","),
                position,
            });
            if let Some(right) = operation.right {
                flatten_comma_into(*right, nodes);
            }
        }
        node => nodes.push(node),
    }
}

/// Wraps nodes without a top-level operator in the `NON` operator of `mode`.
pub fn wrap_non_operator(node: Node, mode: OperatorType) -> Node {
    match node {
        Node::Operation(_) | Node::ParsingError(_) => node,
        node => Node::Operation(OperationNode::unary(mode.non_operator(), node, mode)),
    }
}

fn tokens_position(tokens: &[Token]) -> CodePosition {
    tokens
        .iter()
        .fold(CodePosition::EMPTY, |position, token| position.combine(&token.position))
}

/// Parses `tokens` as one expression in `mode`.
///
/// Returns `None` if the tokens contain nothing but whitespace. Syntax errors
/// replace the whole expression with a `ParsingError` node.
pub fn parse_expression(tokens: Vec<Token>, mode: OperatorType) -> Option<Node> {
    let mut cursor = TokenCursor::new(tokens);

    match parse_expr(&mut cursor, i32::MAX, mode, ExprContext::default()) {
        Ok(node) => node,
        Err(error) => Some(Node::ParsingError(error)),
    }
}

/// Parses `tokens` as an operation in `mode`, wrapping plain values in the mode's `NON` operator.
pub fn parse_operation_expr(tokens: Vec<Token>, mode: OperatorType) -> Node {
    let position = tokens_position(&tokens);
    let node = parse_expression(tokens, mode).unwrap_or(Node::Null { position });

    wrap_non_operator(node, mode)
}

/// Parses a comma separated argument list (`throw`, `repeat`, `foreach`, `catch`).
pub fn parse_argument_list(tokens: Vec<Token>, mode: OperatorType) -> Vec<Node> {
    let mut cursor = TokenCursor::new(tokens);

    match parse_expr(&mut cursor, i32::MAX, mode, ExprContext::argument_list()) {
        Ok(node) => node.map(flatten_comma).unwrap_or_default(),
        Err(error) => vec![Node::ParsingError(error)],
    }
}

/// Parses a free-form line or a ` = ` rvalue as a sequence of text, values,
/// variables and function calls.
///
/// Operator symbols stay text. Member access (`::`, `?::`) and `[index]`
/// are only recognized directly attached to an operand.
pub fn parse_token_sequence(tokens: Vec<Token>) -> Option<Node> {
    let mut cursor = TokenCursor::new(tokens);

    match parse_sequence(&mut cursor, false) {
        Ok(node) => node,
        Err(error) => Some(Node::ParsingError(error)),
    }
}

/// Inside call arguments (`in_arguments`) the sequence ends at an argument
/// separator or at the closing bracket of the call.
fn parse_sequence(cursor: &mut TokenCursor, in_arguments: bool) -> ExprResult {
    let mode = OperatorType::General;
    let mut operands = Operands::new(mode);
    let mut text_brackets: Vec<&'static str> = vec![];

    while let Some(token) = cursor.current_token().cloned() {
        match token.kind {
            TokenKind::Eol | TokenKind::Eof => break,
            TokenKind::Whitespace => {
                cursor.advance();
                if !operands.is_empty() {
                    operands.whitespace = Some(token);
                }
            }
            TokenKind::LineContinuation
            | TokenKind::StartMultilineText
            | TokenKind::EndMultilineText
            | TokenKind::EndComment => {
                cursor.advance();
            }
            TokenKind::StartComment | TokenKind::StartDocComment => {
                while let Some(token) = cursor.advance() {
                    if token.kind == TokenKind::EndComment {
                        break;
                    }
                }
            }
            TokenKind::LexerError => {
                return Err(ParsingErrorNode::new(
                    ParsingError::LexerError,
                    format!("unexpected \"{}\"", token.value),
                    token.position,
                ));
            }
            TokenKind::LiteralNull => {
                cursor.advance();
                operands.push(Node::Null {
                    position: token.position,
                });
            }
            TokenKind::LiteralNumber => {
                cursor.advance();
                operands.push(parse_number(&token));
            }
            TokenKind::LiteralText => {
                cursor.advance();
                operands.push(Node::text(token.value, token.position));
            }
            TokenKind::EscapeSequence => {
                cursor.advance();
                operands.push(parse_escape_sequence(&token));
            }
            TokenKind::Identifier => {
                let node = parse_sequence_identifier(cursor, &token)?;
                operands.push(node);
            }
            TokenKind::ParserFunctionIdentifier => {
                parse_parser_function(cursor, &mut operands, &token)?
            }
            TokenKind::ArgumentSeparator if in_arguments && text_brackets.is_empty() => break,
            TokenKind::OpeningBracket => {
                cursor.advance();
                if token.value == "[" && operands.is_adjacent() {
                    let index = parse_index(cursor, &token, mode)?;
                    let target = operands.pop_last(token.position);
                    operands.push(Node::Operation(OperationNode::binary(
                        Operator::GetItem,
                        target,
                        index,
                        mode,
                    )));
                } else if token.value == "(" && operands.is_adjacent() && operands.last_is_callable()
                {
                    let (arguments, closing) = parse_sequence_arguments(cursor, &token)?;
                    let previous = operands.pop_last(token.position);
                    let position = previous.position().combine(&closing.position);
                    operands.push(Node::FunctionCallPreviousNodeValue(
                        FunctionCallPreviousNodeValueNode {
                            previous: Box::new(previous),
                            arguments,
                            position,
                        },
                    ));
                } else {
                    text_brackets.push(if token.value == "(" { ")" } else { "]" });
                    operands.push_text(&token);
                }
            }
            TokenKind::ClosingBracket => {
                if text_brackets.last().copied() == Some(token.value.as_str()) {
                    text_brackets.pop();
                } else if in_arguments {
                    break;
                }
                cursor.advance();
                operands.push_text(&token);
            }
            TokenKind::Operator
                if (token.value == "::" || token.value == "?::")
                    && operands.is_adjacent()
                    && cursor
                        .nth_token(1)
                        .is_some_and(|next| next.kind == TokenKind::Identifier) =>
            {
                cursor.advance();
                let Some(name) = cursor.current_token().cloned() else {
                    break;
                };
                let member = parse_sequence_identifier(cursor, &name)?;
                let operator = if token.value == "::" {
                    Operator::MemberAccess
                } else {
                    Operator::OptionalMemberAccess
                };
                let target = operands.pop_last(token.position);
                operands.push(Node::Operation(OperationNode::binary(
                    operator, target, member, mode,
                )));
            }
            _ => {
                cursor.advance();
                operands.push_text(&token);
            }
        }
    }

    Ok(operands.into_node())
}

fn parse_sequence_identifier(
    cursor: &mut TokenCursor,
    token: &Token,
) -> Result<Node, ParsingErrorNode> {
    cursor.advance();

    let is_call = CALLABLE_IDENTIFIER.is_match(&token.value)
        && cursor
            .current_token()
            .is_some_and(|next| next.is_opening_bracket("("));
    if !is_call {
        return Ok(Node::UnprocessedVariableName(UnprocessedVariableNameNode {
            name: token.value.clone(),
            position: token.position,
        }));
    }

    let Some(opening) = cursor.advance() else {
        return Err(bracket_mismatch(token));
    };
    let (arguments, closing) = parse_sequence_arguments(cursor, &opening)?;

    Ok(Node::FunctionCall(FunctionCallNode {
        name: token.value.clone(),
        arguments,
        position: token.position.combine(&closing.position),
    }))
}

/// Arguments of a call in a token sequence, each a sequence of its own.
fn parse_sequence_arguments(
    cursor: &mut TokenCursor,
    opening: &Token,
) -> Result<(Vec<Node>, Token), ParsingErrorNode> {
    let mut arguments = vec![];

    loop {
        if let Some(argument) = parse_sequence(cursor, true)? {
            arguments.push(argument);
        }

        match cursor.current_token() {
            Some(token) if token.kind == TokenKind::ArgumentSeparator => {
                arguments.push(Node::ArgumentSeparator {
                    original_text: token.value.clone(),
                    position: token.position,
                });
                cursor.advance();
            }
            _ => break,
        }
    }

    let closing = expect_closing_bracket(cursor, opening)?;
    Ok((arguments, closing))
}

/// The precedence climbing core shared by all three modes.
///
/// Parses operands and operators until the end of the tokens, a closing
/// bracket (inside brackets), a `:` (inside a ternary middle operand) or an
/// operator which binds looser than `min_precedence`. Lower precedence values
/// bind tighter, so an operator is left to the caller once
/// `min_precedence <= precedence` (`<` for right-associative operators).
pub fn parse_expr(
    cursor: &mut TokenCursor,
    min_precedence: i32,
    mode: OperatorType,
    context: ExprContext,
) -> ExprResult {
    let mut operands = Operands::new(mode);
    let mut text_brackets: Vec<&'static str> = vec![];

    while let Some(token) = cursor.current_token().cloned() {
        match token.kind {
            TokenKind::Eol | TokenKind::Eof => break,
            TokenKind::Whitespace => {
                cursor.advance();
                if !operands.is_empty() {
                    operands.whitespace = Some(token);
                }
            }
            TokenKind::LineContinuation
            | TokenKind::StartMultilineText
            | TokenKind::EndMultilineText => {
                cursor.advance();
            }
            TokenKind::StartComment | TokenKind::StartDocComment => {
                while let Some(token) = cursor.advance() {
                    if token.kind == TokenKind::EndComment {
                        break;
                    }
                }
            }
            TokenKind::EndComment => {
                cursor.advance();
            }
            TokenKind::LexerError => {
                return Err(ParsingErrorNode::new(
                    ParsingError::LexerError,
                    format!("unexpected \"{}\"", token.value),
                    token.position,
                ));
            }
            TokenKind::LiteralNull => {
                cursor.advance();
                operands.push(Node::Null {
                    position: token.position,
                });
            }
            TokenKind::LiteralNumber => {
                cursor.advance();
                operands.push(parse_number(&token));
            }
            TokenKind::LiteralText => {
                cursor.advance();
                operands.push(Node::text(token.value, token.position));
            }
            TokenKind::EscapeSequence => {
                cursor.advance();
                operands.push(parse_escape_sequence(&token));
            }
            TokenKind::Identifier => parse_identifier(cursor, &mut operands, &token, mode)?,
            TokenKind::ParserFunctionIdentifier => {
                parse_parser_function(cursor, &mut operands, &token)?
            }
            TokenKind::OpeningBracket => {
                if token.value == "[" && operands.is_adjacent() {
                    if defers(min_precedence, Operator::GetItem) {
                        break;
                    }

                    cursor.advance();
                    let index = parse_index(cursor, &token, mode)?;
                    let target = operands.pop_last(token.position);
                    operands.push(Node::Operation(OperationNode::binary(
                        Operator::GetItem,
                        target,
                        index,
                        mode,
                    )));
                } else if token.value == "(" && operands.is_adjacent() && operands.last_is_callable()
                {
                    cursor.advance();
                    let (arguments, closing) = parse_call_arguments(cursor, &token, mode)?;
                    let previous = operands.pop_last(token.position);
                    let position = previous.position().combine(&closing.position);
                    operands.push(Node::FunctionCallPreviousNodeValue(
                        FunctionCallPreviousNodeValueNode {
                            previous: Box::new(previous),
                            arguments,
                            position,
                        },
                    ));
                } else if mode != OperatorType::General {
                    cursor.advance();
                    let (inner, closing) = parse_bracket_content(cursor, &token, mode)?;
                    let position = token.position.combine(&closing.position);

                    if token.value == "[" {
                        operands.push(Node::ArrayValue(ArrayValueNode {
                            elements: inner.map(flatten_comma).unwrap_or_default(),
                            position,
                        }));
                    } else {
                        operands.push(inner.unwrap_or(Node::Null { position }));
                    }
                } else {
                    cursor.advance();
                    text_brackets.push(if token.value == "(" { ")" } else { "]" });
                    operands.push_text(&token);
                }
            }
            TokenKind::ClosingBracket => {
                if text_brackets.last().copied() == Some(token.value.as_str()) {
                    text_brackets.pop();
                    cursor.advance();
                    operands.push_text(&token);
                } else if context.in_brackets {
                    break;
                } else if mode == OperatorType::General {
                    cursor.advance();
                    operands.push_text(&token);
                } else {
                    return Err(bracket_mismatch(&token));
                }
            }
            TokenKind::OpeningBlockBracket => {
                if mode != OperatorType::General && operands.is_empty() {
                    if let Some(cast) = parse_cast(cursor, mode, context)? {
                        operands.push(cast);
                        continue;
                    }
                }

                cursor.advance();
                operands.push_text(&token);
            }
            TokenKind::ArgumentSeparator if context.allow_comma => {
                if defers(min_precedence, Operator::Comma) {
                    break;
                }

                cursor.advance();
                let left = operands.take_left(token.position);
                let right = parse_expr(cursor, Operator::Comma.precedence(), mode, context)?
                    .unwrap_or(Node::Null {
                        position: token.position,
                    });
                operands.push(Node::Operation(OperationNode::binary(
                    Operator::Comma,
                    left,
                    right,
                    mode,
                )));
            }
            TokenKind::Operator => {
                if token.value == ":" && context.stop_at_colon {
                    break;
                }
                if token.value == "?" && !operands.is_empty() {
                    let is_optional_get_item = operands.is_adjacent()
                        && cursor
                            .nth_token(1)
                            .is_some_and(|next| next.is_opening_bracket("["));

                    let operator = if is_optional_get_item {
                        Operator::OptionalGetItem
                    } else {
                        Operator::InlineIf
                    };
                    if defers(min_precedence, operator) {
                        break;
                    }

                    if is_optional_get_item {
                        cursor.advance();
                        let Some(opening) = cursor.advance() else {
                            break;
                        };
                        let index = parse_index(cursor, &opening, mode)?;
                        let target = operands.pop_last(token.position);
                        operands.push(Node::Operation(OperationNode::binary(
                            Operator::OptionalGetItem,
                            target,
                            index,
                            mode,
                        )));
                    } else if !parse_inline_if(cursor, &mut operands, &token, mode, context)? {
                        operands.push_text(&token);
                    }
                    continue;
                }

                if operands.is_empty() {
                    if let Some(operator) = lookup_unary_operator(&token.value, mode) {
                        let state = cursor.save();
                        cursor.advance();

                        match parse_expr(cursor, operator.precedence(), mode, context)? {
                            Some(operand) => {
                                operands.push(Node::Operation(OperationNode::unary(
                                    operator, operand, mode,
                                )));
                                continue;
                            }
                            None => cursor.restore(state),
                        }
                    }
                } else if let Some(operator) = lookup_binary_operator(&token.value, mode) {
                    if defers(min_precedence, operator) {
                        break;
                    }

                    let state = cursor.save();
                    cursor.advance();

                    match parse_expr(cursor, operator.precedence(), mode, context)? {
                        Some(right) => {
                            // Member access binds to the last operand only
                            let left = if operator.precedence() == 0 {
                                operands.pop_last(token.position)
                            } else {
                                operands.take_left(token.position)
                            };

                            operands.push(Node::Operation(OperationNode::binary(
                                operator, left, right, mode,
                            )));
                            continue;
                        }
                        None => cursor.restore(state),
                    }
                }

                cursor.advance();
                operands.push_text(&token);
            }
            _ => {
                cursor.advance();
                operands.push_text(&token);
            }
        }
    }

    Ok(operands.into_node())
}

/// Parses the middle and right operand of `? :`.
///
/// Returns `false` (with the cursor past the `?`) if no matching `:` exists,
/// in which case `?` is plain text.
fn parse_inline_if(
    cursor: &mut TokenCursor,
    operands: &mut Operands,
    token: &Token,
    mode: OperatorType,
    context: ExprContext,
) -> Result<bool, ParsingErrorNode> {
    let state = cursor.save();
    cursor.advance();

    let middle_context = ExprContext {
        stop_at_colon: true,
        ..context
    };
    let middle = parse_expr(cursor, i32::MAX, mode, middle_context)?;

    if !cursor
        .current_token()
        .is_some_and(|colon| colon.is_operator(":"))
    {
        cursor.restore(state);
        cursor.advance();
        return Ok(false);
    }
    let colon = cursor.advance();

    let right = parse_expr(cursor, Operator::InlineIf.precedence(), mode, context)?;

    let left = operands.take_left(token.position);
    let middle = middle.unwrap_or(Node::Null {
        position: token.position,
    });
    let right = right.unwrap_or(Node::Null {
        position: colon.map(|colon| colon.position).unwrap_or(token.position),
    });

    operands.push(Node::Operation(OperationNode::ternary(
        Operator::InlineIf,
        left,
        middle,
        right,
        mode,
    )));
    Ok(true)
}

fn parse_identifier(
    cursor: &mut TokenCursor,
    operands: &mut Operands,
    token: &Token,
    mode: OperatorType,
) -> Result<(), ParsingErrorNode> {
    cursor.advance();

    // `$a &b` in math mode is a bitwise and, not an array variable
    if token.value.starts_with('&')
        && !operands.is_empty()
        && lookup_binary_operator("&", mode).is_some()
    {
        let position = token.position;
        let operator_position = CodePosition::new(
            position.line_from,
            position.line_from,
            position.column_from,
            position.column_from + 1,
        );
        let rest_position = CodePosition::new(
            position.line_from,
            position.line_to,
            position.column_from + 1,
            position.column_to,
        );

        let mut tokens = vec![MK_TOKEN!(
            TokenKind::Operator,
            String::from("&"),
            operator_position
        )];
        tokens.extend(retokenize(&token.value[1..], rest_position));
        cursor.inject(tokens);
        return Ok(());
    }

    let is_call = CALLABLE_IDENTIFIER.is_match(&token.value)
        && cursor
            .current_token()
            .is_some_and(|next| next.is_opening_bracket("("));

    if is_call {
        let Some(opening) = cursor.advance() else {
            return Ok(());
        };
        let (arguments, closing) = parse_call_arguments(cursor, &opening, mode)?;

        operands.push(Node::FunctionCall(FunctionCallNode {
            name: token.value.clone(),
            arguments,
            position: token.position.combine(&closing.position),
        }));
    } else {
        operands.push(Node::UnprocessedVariableName(UnprocessedVariableNameNode {
            name: token.value.clone(),
            position: token.position,
        }));
    }

    Ok(())
}

/// `parser.norm(...)`, `parser.op(...)`, `parser.math(...)` and `parser.con(...)`.
fn parse_parser_function(
    cursor: &mut TokenCursor,
    operands: &mut Operands,
    token: &Token,
) -> Result<(), ParsingErrorNode> {
    let target_mode = match token.value.as_str() {
        "parser.norm" => Some(OperatorType::General),
        "parser.op" | "parser.math" => Some(OperatorType::Math),
        "parser.con" => Some(OperatorType::Condition),
        _ => None,
    };

    cursor.advance();
    let has_arguments = cursor
        .current_token()
        .is_some_and(|next| next.is_opening_bracket("("));

    let Some(target_mode) = target_mode.filter(|_| has_arguments) else {
        operands.push_text(token);
        return Ok(());
    };

    let Some(opening) = cursor.advance() else {
        return Ok(());
    };
    let (inner, closing) = parse_bracket_content(cursor, &opening, target_mode)?;
    let position = token.position.combine(&closing.position);

    operands.push(wrap_non_operator(
        inner.unwrap_or(Node::Null { position }),
        target_mode,
    ));
    Ok(())
}

fn starts_operand(token: &Token) -> bool {
    token.is_one_of_many(&[
        TokenKind::Identifier,
        TokenKind::ParserFunctionIdentifier,
        TokenKind::LiteralNull,
        TokenKind::LiteralNumber,
        TokenKind::LiteralText,
        TokenKind::EscapeSequence,
        TokenKind::OpeningBracket,
        TokenKind::OpeningBlockBracket,
        TokenKind::Operator,
        TokenKind::Other,
    ])
}

/// Parses `{TYPE}operand`. Returns `None` (without consuming anything) if the
/// tokens do not form a cast.
fn parse_cast(
    cursor: &mut TokenCursor,
    mode: OperatorType,
    context: ExprContext,
) -> ExprResult {
    let is_cast = match (cursor.nth_token(1), cursor.nth_token(2), cursor.nth_token(3)) {
        (Some(type_token), Some(closing), Some(next)) => {
            type_token.kind == TokenKind::Other
                && CAST_TYPE.is_match(&type_token.value)
                && closing.kind == TokenKind::ClosingBlockBracket
                && starts_operand(next)
        }
        _ => false,
    };
    if !is_cast {
        return Ok(None);
    }

    let state = cursor.save();
    let opening = cursor.advance();
    let type_token = cursor.advance();
    cursor.advance();

    let (Some(opening), Some(type_token)) = (opening, type_token) else {
        cursor.restore(state);
        return Ok(None);
    };

    match parse_expr(cursor, Operator::Cast.precedence(), mode, context)? {
        Some(operand) => Ok(Some(Node::Operation(OperationNode::binary(
            Operator::Cast,
            Node::text(type_token.value, opening.position.combine(&type_token.position)),
            operand,
            mode,
        )))),
        None => {
            cursor.restore(state);
            Ok(None)
        }
    }
}
