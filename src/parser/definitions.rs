use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    ast::{
        ast::Node,
        expressions::ParsingErrorNode,
        operators::Operator,
        statements::{
            ClassConstructor, ClassDefinitionNode, ClassMember, ClassMethod,
            FunctionDefinitionNode, MethodKind, Parameter, StructDefinitionNode, StructMember,
            Visibility,
        },
    },
    errors::errors::ParsingError,
    lexer::tokens::{Token, TokenKind},
    CodePosition,
};

use super::{
    control_flow::find_matching_bracket,
    parser::{line_position, raw_text, Parser},
    stmt::{find_assignment, parse_rvalue, parse_stmt, trim_tokens},
};

lazy_static! {
    static ref PARAMETER: Regex =
        Regex::new("^((?:\\$|&|fp\\.)[a-zA-Z_]\\w*)(?:\\{([A-Z_|?]+)\\})?(\\.\\.\\.)?$").unwrap();
    static ref FUNCTION_NAME: Regex = Regex::new("^(?:fp\\.)?[a-zA-Z_]\\w*$").unwrap();
    static ref IDENTIFIER_NAME: Regex = Regex::new("^[a-zA-Z_]\\w*$").unwrap();
    static ref STRUCT_MEMBER: Regex =
        Regex::new("^(\\$[a-zA-Z_]\\w*)(?:\\{([A-Z_|?]+)\\})?$").unwrap();
    static ref CLASS_MEMBER: Regex = Regex::new(
        "^(static:)?(final:)?([-~+])(\\$[a-zA-Z_]\\w*)(?:\\{([A-Z_|?]+)\\})?$"
    )
    .unwrap();
    static ref CLASS_METHOD: Regex =
        Regex::new("^([-~+])(override:)?(fp\\.[a-zA-Z_]\\w*)$").unwrap();
    static ref CLASS_OPERATOR_METHOD: Regex = Regex::new("^([-~+])(op:[a-zA-Z][\\w-]*)$").unwrap();
    static ref CLASS_CONVERSION_METHOD: Regex = Regex::new("^([-~+])(to:[a-zA-Z]\\w*)$").unwrap();
    static ref CLASS_CONSTRUCTOR: Regex = Regex::new("^([-~+])construct$").unwrap();
    static ref OPERATOR_METHOD_NAMES: Vec<String> = Operator::VALUES
        .iter()
        .flat_map(|operator| {
            let name = operator.method_name().map(String::from);
            [name, operator.reverse_method_name()]
        })
        .flatten()
        .collect();
}

/// Names of the conversion methods a class may overload with `+to:<name>`.
pub const CONVERSION_METHOD_NAMES: [&str; 11] = [
    "to:text",
    "to:char",
    "to:int",
    "to:long",
    "to:float",
    "to:double",
    "to:byteBuffer",
    "to:array",
    "to:list",
    "to:bool",
    "to:number",
];

fn definition_error(
    error: ParsingError,
    message: impl Into<String>,
    position: CodePosition,
) -> ParsingErrorNode {
    ParsingErrorNode::new(error, message, position)
}

/// Index of the `->` of a function value `(params) -> body`.
pub fn find_function_arrow(tokens: &[Token]) -> Option<usize> {
    if !tokens.first()?.is_opening_bracket("(") {
        return None;
    }

    let closing = find_matching_bracket(tokens, 0)?;
    let arrow = tokens[closing + 1..]
        .iter()
        .position(|token| token.kind != TokenKind::Whitespace)?
        + closing
        + 1;

    tokens[arrow].is_operator("->").then_some(arrow)
}

/// Parses a comma separated parameter list (the tokens between the brackets).
pub fn parse_parameters(tokens: &[Token]) -> Result<Vec<Parameter>, ParsingErrorNode> {
    if trim_tokens(tokens).is_empty() {
        return Ok(vec![]);
    }

    tokens
        .split(|token| token.kind == TokenKind::ArgumentSeparator)
        .map(|group| {
            let group = trim_tokens(group);
            let text = raw_text(group);
            let position = line_position(group);

            let Some(captures) = PARAMETER.captures(&text) else {
                return Err(definition_error(
                    ParsingError::InvalidParameter,
                    format!("\"{}\" is not a valid parameter", text),
                    position,
                ));
            };

            Ok(Parameter {
                name: captures[1].to_string(),
                type_constraint: captures.get(2).map(|m| m.as_str().to_string()),
                var_args: captures.get(3).is_some(),
                position,
            })
        })
        .collect()
}

/// Reads the lines of a `{` block up to the lone `}` closing it.
fn parse_block_body(parser: &mut Parser, position: CodePosition) -> (Vec<Node>, Result<(), ParsingErrorNode>) {
    let mut body = vec![];
    let result = match parser.parse_body(&mut body) {
        Ok(Some(line)) if line.len() == 1 && line[0].kind == TokenKind::ClosingBlockBracket => {
            Ok(())
        }
        Ok(Some(line)) if line[0].kind == TokenKind::ClosingBlockBracket => Err(definition_error(
            ParsingError::BracketMismatch,
            format!("unexpected \"{}\" after the end of the block", raw_text(&line[1..])),
            line_position(&line),
        )),
        Ok(Some(line)) => Err(definition_error(
            ParsingError::InvalidConPart,
            format!("\"{}\" outside of a control flow statement", line[0].value),
            line_position(&line),
        )),
        Ok(None) => Err(definition_error(
            ParsingError::Eof,
            "\"}\" is missing",
            position,
        )),
        Err(error) => Err(error),
    };

    (body, result)
}

/// Parses a function from its parameter tokens and the tokens after the
/// header (`{` or a single statement).
///
/// The definition is returned even if it is incomplete, together with the
/// first error found.
fn parse_function(
    parser: &mut Parser,
    name: Option<String>,
    parameter_tokens: &[Token],
    body_tokens: &[Token],
    position: CodePosition,
) -> (FunctionDefinitionNode, Result<(), ParsingErrorNode>) {
    let doc_comment = parser.take_doc_comment();
    let parameters = parse_parameters(parameter_tokens);

    let (body, body_result) = match body_tokens {
        [token] if token.kind == TokenKind::OpeningBlockBracket => {
            parse_block_body(parser, position)
        }
        [] => (
            vec![],
            Err(definition_error(
                ParsingError::InvalidAssignment,
                "the function has no body",
                position,
            )),
        ),
        _ => {
            let mut body = vec![];
            let result = parse_stmt(parser, body_tokens.to_vec(), &mut body);
            (body, result)
        }
    };

    let (parameters, result) = match parameters {
        Ok(parameters) => (parameters, body_result),
        Err(error) => (vec![], Err(error)),
    };

    let function = FunctionDefinitionNode {
        name,
        parameters,
        body,
        doc_comment,
        position,
    };

    (function, result)
}

/// Parses a function value `(params) -> { ... }` or `(params) -> statement`.
pub fn parse_function_value(
    parser: &mut Parser,
    tokens: &[Token],
    name: Option<String>,
) -> Result<FunctionDefinitionNode, ParsingErrorNode> {
    let position = line_position(tokens);
    let Some(arrow) = find_function_arrow(tokens) else {
        return Err(definition_error(
            ParsingError::InvalidAssignment,
            format!("\"{}\" is not a function value", raw_text(tokens)),
            position,
        ));
    };

    let closing = find_matching_bracket(tokens, 0).unwrap_or(arrow);

    let (function, result) = parse_function(
        parser,
        name,
        &tokens[1..closing],
        trim_tokens(&tokens[arrow + 1..]),
        position,
    );

    result.map(|_| function)
}

/// Tokens after `keyword ` on a definition line ending with `{`, without
/// the `{`. `None` if the line is not a definition.
fn definition_header(line: &[Token]) -> Option<&[Token]> {
    if line.len() < 3 || line[1].kind != TokenKind::Whitespace {
        return None;
    }

    match line.last() {
        Some(token) if token.kind == TokenKind::OpeningBlockBracket => {
            Some(trim_tokens(&line[1..line.len() - 1]))
        }
        _ => None,
    }
}

// FUNCTION

pub fn parse_function_definition(
    parser: &mut Parser,
    line: &[Token],
    nodes: &mut Vec<Node>,
) -> Result<bool, ParsingErrorNode> {
    let Some(header) = definition_header(line) else {
        return Ok(false);
    };
    let position = line_position(line);

    let opening = header.iter().position(|token| token.is_opening_bracket("("));
    let closing = opening.and_then(|opening| find_matching_bracket(header, opening));

    let (Some(opening), Some(closing)) = (opening, closing) else {
        let (_, result) = parse_block_body(parser, position);
        nodes.push(Node::ParsingError(definition_error(
            ParsingError::BracketMismatch,
            format!("\"{}\" has no parameter list", raw_text(header)),
            position,
        )));
        return result.map(|_| true);
    };

    let name = raw_text(trim_tokens(&header[..opening]));
    let mut header_error = None;
    if !FUNCTION_NAME.is_match(&name) {
        header_error = Some(definition_error(
            ParsingError::InvalidAssignment,
            format!("\"{}\" is not a valid function name", name),
            position,
        ));
    } else if !trim_tokens(&header[closing + 1..]).is_empty() {
        header_error = Some(definition_error(
            ParsingError::InvalidAssignment,
            format!("unexpected \"{}\" before \"{{\"", raw_text(&header[closing + 1..])),
            position,
        ));
    }

    let body_tokens = &line[line.len() - 1..];
    let (function, result) = parse_function(
        parser,
        Some(name),
        &header[opening + 1..closing],
        body_tokens,
        position,
    );
    nodes.push(Node::FunctionDefinition(function));

    if let Some(error) = header_error {
        nodes.push(Node::ParsingError(error));
    }

    match result {
        Err(error) if error.error == ParsingError::InvalidParameter => {
            nodes.push(Node::ParsingError(error));
            Ok(true)
        }
        result => result.map(|_| true),
    }
}

/// Reads the member lines of a struct or class body until the lone `}`.
///
/// `handle_line` is called for every non-empty line inside the body.
fn parse_definition_body(
    parser: &mut Parser,
    position: CodePosition,
    mut handle_line: impl FnMut(&mut Parser, Vec<Token>) -> Result<(), ParsingErrorNode>,
) -> Result<(), ParsingErrorNode> {
    while let Some(line) = parser.next_line() {
        if line.is_empty() {
            continue;
        }

        if line[0].kind == TokenKind::ClosingBlockBracket {
            if line.len() == 1 {
                return Ok(());
            }

            return Err(definition_error(
                ParsingError::BracketMismatch,
                format!("unexpected \"{}\" after the end of the block", raw_text(&line[1..])),
                line_position(&line),
            ));
        }

        handle_line(parser, line)?;
    }

    Err(definition_error(
        ParsingError::Eof,
        "\"}\" is missing",
        position,
    ))
}

// STRUCT

pub fn parse_struct_definition(
    parser: &mut Parser,
    line: &[Token],
    nodes: &mut Vec<Node>,
) -> Result<bool, ParsingErrorNode> {
    let Some(header) = definition_header(line) else {
        return Ok(false);
    };
    let position = line_position(line);
    let doc_comment = parser.take_doc_comment();

    let name = raw_text(header);
    let mut errors = vec![];
    if !IDENTIFIER_NAME.is_match(&name) {
        errors.push(definition_error(
            ParsingError::InvalidAssignment,
            format!("\"{}\" is not a valid struct name", name),
            position,
        ));
    }

    let mut members: Vec<StructMember> = vec![];
    let result = parse_definition_body(parser, position, |_, line| {
        let text = raw_text(&line);
        let member_position = line_position(&line);

        let Some(captures) = STRUCT_MEMBER.captures(&text) else {
            return Err(definition_error(
                ParsingError::InvalidAssignment,
                format!("\"{}\" is not a valid struct member", text),
                member_position,
            ));
        };

        let member_name = &captures[1];
        if members.iter().any(|member| member.name == member_name) {
            return Err(definition_error(
                ParsingError::InvalidAssignment,
                format!("duplicate struct member \"{}\"", member_name),
                member_position,
            ));
        }

        members.push(StructMember {
            name: member_name.to_string(),
            type_constraint: captures.get(2).map(|m| m.as_str().to_string()),
        });
        Ok(())
    });

    nodes.push(Node::StructDefinition(StructDefinitionNode {
        name,
        members,
        doc_comment,
        position,
    }));
    nodes.extend(errors.into_iter().map(Node::ParsingError));

    result.map(|_| true)
}

// CLASS

/// Splits `Name < Parent, Other >` into the class name and its parents.
fn parse_class_header(
    header: &str,
    position: CodePosition,
) -> Result<(String, Vec<String>), ParsingErrorNode> {
    let (name, parents) = match header.split_once('<') {
        Some((name, rest)) => {
            let Some(parents) = rest.trim_end().strip_suffix('>') else {
                return Err(definition_error(
                    ParsingError::BracketMismatch,
                    format!("the parent class list of \"{}\" is not closed", name.trim()),
                    position,
                ));
            };
            if parents.contains(|c| c == '<' || c == '>') {
                return Err(definition_error(
                    ParsingError::BracketMismatch,
                    format!("invalid parent class list \"{}\"", parents),
                    position,
                ));
            }

            let parents = parents
                .split(',')
                .map(|parent| parent.trim().to_string())
                .collect::<Vec<_>>();
            (name.trim(), parents)
        }
        None if header.contains('>') => {
            return Err(definition_error(
                ParsingError::BracketMismatch,
                format!("\">\" without \"<\" in \"{}\"", header),
                position,
            ))
        }
        None => (header.trim(), vec![]),
    };

    if !IDENTIFIER_NAME.is_match(name) {
        return Err(definition_error(
            ParsingError::InvalidAssignment,
            format!("\"{}\" is not a valid class name", name),
            position,
        ));
    }
    if let Some(parent) = parents.iter().find(|parent| !IDENTIFIER_NAME.is_match(parent)) {
        return Err(definition_error(
            ParsingError::InvalidAssignment,
            format!("\"{}\" is not a valid parent class name", parent),
            position,
        ));
    }

    Ok((name.to_string(), parents))
}

fn visibility(captures: &regex::Captures, group: usize) -> Visibility {
    captures[group]
        .chars()
        .next()
        .and_then(Visibility::from_symbol)
        .unwrap_or(Visibility::Private)
}

/// Adds one line of a class body to `class`.
///
/// The first invalid line ends the class body with an error.
fn parse_class_line(
    parser: &mut Parser,
    line: &[Token],
    class: &mut ClassDefinitionNode,
) -> Result<(), ParsingErrorNode> {
    let position = line_position(line);
    let assignment = find_assignment(line);
    let lvalue = trim_tokens(&line[..assignment.unwrap_or(line.len())]);
    let rvalue = assignment.map(|index| (&line[index], trim_tokens(&line[index + 1..])));
    let text = raw_text(lvalue).trim().to_string();

    let invalid = |message: String| definition_error(ParsingError::InvalidAssignment, message, position);

    // Members
    if let Some(captures) = CLASS_MEMBER.captures(&text) {
        let name = captures[4].to_string();
        let is_static = captures.get(1).is_some();
        let is_duplicate = class
            .members
            .iter()
            .chain(class.static_members.iter())
            .any(|member| member.name == name);
        if is_duplicate {
            return Err(invalid(format!("duplicate class member \"{}\"", name)));
        }

        let value = match rvalue {
            Some((assignment, tokens)) => Some(parse_rvalue(parser, tokens, assignment)?),
            None => None,
        };
        let member = ClassMember {
            name,
            type_constraint: captures.get(5).map(|m| m.as_str().to_string()),
            visibility: visibility(&captures, 3),
            is_final: captures.get(2).is_some(),
            value,
        };

        if is_static {
            class.static_members.push(member);
        } else {
            class.members.push(member);
        }
        return Ok(());
    }

    // Methods and constructors all need a function value
    let is_method = CLASS_CONSTRUCTOR.is_match(&text)
        || CLASS_METHOD.is_match(&text)
        || CLASS_OPERATOR_METHOD.is_match(&text)
        || CLASS_CONVERSION_METHOD.is_match(&text);
    if !is_method {
        return Err(invalid(format!("\"{}\" is not a valid class member", text)));
    }

    let Some((_, tokens)) = rvalue.filter(|(_, tokens)| find_function_arrow(tokens).is_some()) else {
        return Err(invalid(format!("\"{}\" must be assigned a function value", text)));
    };

    if let Some(captures) = CLASS_CONSTRUCTOR.captures(&text) {
        let definition = parse_function_value(parser, tokens, Some(String::from("construct")))?;
        let is_duplicate = class
            .constructors
            .iter()
            .any(|constructor| constructor.definition.has_same_signature(&definition));
        if is_duplicate {
            return Err(invalid(String::from(
                "a constructor with the same parameters is already defined",
            )));
        }

        class.constructors.push(ClassConstructor {
            visibility: visibility(&captures, 1),
            definition,
        });
        return Ok(());
    }

    let (name, kind, method_visibility, is_override) =
        if let Some(captures) = CLASS_METHOD.captures(&text) {
            (
                captures[3].to_string(),
                MethodKind::Normal,
                visibility(&captures, 1),
                captures.get(2).is_some(),
            )
        } else if let Some(captures) = CLASS_OPERATOR_METHOD.captures(&text) {
            let name = captures[2].to_string();
            if !OPERATOR_METHOD_NAMES.contains(&name) {
                return Err(invalid(format!("\"{}\" is not an operator method", name)));
            }
            (name, MethodKind::Operator, visibility(&captures, 1), false)
        } else if let Some(captures) = CLASS_CONVERSION_METHOD.captures(&text) {
            let name = captures[2].to_string();
            if !CONVERSION_METHOD_NAMES.contains(&name.as_str()) {
                return Err(invalid(format!("\"{}\" is not a conversion method", name)));
            }
            (name, MethodKind::Conversion, visibility(&captures, 1), false)
        } else {
            return Err(invalid(format!("\"{}\" is not a valid class member", text)));
        };

    let definition = parse_function_value(parser, tokens, Some(name.clone()))?;

    if kind != MethodKind::Normal && method_visibility != Visibility::Public {
        return Err(invalid(format!("\"{}\" must be public", name)));
    }

    let is_duplicate = class
        .methods
        .iter()
        .filter(|method| method.name == name)
        .any(|method| method.definition.has_same_signature(&definition));
    if is_duplicate {
        return Err(invalid(format!(
            "an overload of \"{}\" with the same parameters is already defined",
            name
        )));
    }

    class.methods.push(ClassMethod {
        name,
        kind,
        visibility: method_visibility,
        is_override,
        definition,
    });
    Ok(())
}

pub fn parse_class_definition(
    parser: &mut Parser,
    line: &[Token],
    nodes: &mut Vec<Node>,
) -> Result<bool, ParsingErrorNode> {
    let Some(header) = definition_header(line) else {
        return Ok(false);
    };
    let position = line_position(line);
    let doc_comment = parser.take_doc_comment();

    let mut errors = vec![];
    let (name, parent_classes) = match parse_class_header(&raw_text(header), position) {
        Ok(header) => header,
        Err(error) => {
            errors.push(error);
            (raw_text(header), vec![])
        }
    };

    let mut class = ClassDefinitionNode {
        name,
        parent_classes,
        members: vec![],
        static_members: vec![],
        methods: vec![],
        constructors: vec![],
        doc_comment,
        position,
    };

    let result = parse_definition_body(parser, position, |parser, line| {
        parse_class_line(parser, &line, &mut class)
    });

    nodes.push(Node::ClassDefinition(class));
    nodes.extend(errors.into_iter().map(Node::ParsingError));

    result.map(|_| true)
}
