//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Operator precedence and the three expression modes
//! - Function calls, casts and brackets
//! - Assignments and parser flags
//! - Control flow statements
//! - Function, struct and class definitions

use crate::{
    ast::{
        ast::Node,
        expressions::ParsingErrorNode,
        operators::{Operator, OperatorType},
        statements::{LoopStatementPartKind, MethodKind, TryStatementPartKind},
    },
    errors::errors::ParsingError,
    lexer::{
        lexer::tokenize,
        tokens::{Token, TokenKind},
    },
    CodePosition, MK_TOKEN,
};

use super::{
    control_flow::find_matching_bracket,
    expr::{parse_escape_sequence, parse_expression, parse_number, parse_operation_expr},
    parser::parse,
};

fn parse_math(source: &str) -> Node {
    parse_operation_expr(tokenize(source), OperatorType::Math)
}

fn parse_general(source: &str) -> Node {
    parse_expression(tokenize(source), OperatorType::General).unwrap()
}

fn parse_source(source: &str) -> Vec<Node> {
    let (_, nodes) = parse(tokenize(source));
    nodes
}

fn parsing_errors(nodes: &[Node]) -> Vec<ParsingError> {
    nodes
        .iter()
        .filter_map(|node| match node {
            Node::ParsingError(error) => Some(error.error),
            _ => None,
        })
        .collect()
}

// EXPRESSIONS

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    assert_eq!(parse_math("2 + 3 * 4").to_string(), "ADD(2, MUL(3, 4))");
    assert_eq!(parse_math("2 * 3 + 4").to_string(), "ADD(MUL(2, 3), 4)");
}

#[test]
fn test_power_is_right_associative() {
    assert_eq!(parse_math("2 ** 3 ** 2").to_string(), "POW(2, POW(3, 2))");
}

#[test]
fn test_subtraction_is_left_associative() {
    assert_eq!(parse_math("5 - 2 - 1").to_string(), "SUB(SUB(5, 2), 1)");
}

#[test]
fn test_grouping_and_unary() {
    assert_eq!(parse_math("(1 + 2) * 3").to_string(), "MUL(ADD(1, 2), 3)");
    assert_eq!(parse_math("-2 + 3").to_string(), "ADD(INV(2), 3)");
}

#[test]
fn test_plain_value_is_wrapped_in_non_operator() {
    assert_eq!(parse_math("$a").to_string(), "MATH_NON($a)");
    assert_eq!(
        parse_operation_expr(tokenize("$a"), OperatorType::Condition).to_string(),
        "CONDITIONAL_NON($a)"
    );
    assert_eq!(
        parse_operation_expr(tokenize("$a == 1"), OperatorType::Condition).to_string(),
        "EQUALS($a, 1)"
    );
}

#[test]
fn test_inline_if() {
    assert_eq!(parse_math("1 ? 2 : 3").to_string(), "INLINE_IF(1, 2, 3)");
}

#[test]
fn test_question_mark_without_colon_is_text() {
    assert_eq!(
        parse_general("a ? b").to_string(),
        "LIST(\"a\", \" \", \"?\", \" \", \"b\")"
    );
}

#[test]
fn test_math_operators_are_text_in_general_mode() {
    let node = parse_general("1 + 2");

    assert!(matches!(node, Node::List(_)));
    assert!(!node.to_string().contains("ADD"));
}

#[test]
fn test_function_call() {
    assert_eq!(parse_general("fp.foo($a, 2)").to_string(), "fp.foo($a, 2)");
    assert_eq!(parse_general("func.println()").to_string(), "func.println()");
}

#[test]
fn test_plain_words_are_text() {
    assert!(matches!(parse_general("foo"), Node::Text { value, .. } if value == "foo"));
    assert!(matches!(parse_general("$foo"), Node::UnprocessedVariableName(_)));
}

#[test]
fn test_previous_node_value_call() {
    assert_eq!(
        parse_general("fp.get()(1)").to_string(),
        "CALL(fp.get())(1)"
    );
}

#[test]
fn test_unclosed_bracket_in_math_mode() {
    assert!(matches!(
        parse_math("(1 + 2"),
        Node::ParsingError(ParsingErrorNode {
            error: ParsingError::BracketMismatch,
            ..
        })
    ));
    assert!(matches!(
        parse_math("1 + 2)"),
        Node::ParsingError(ParsingErrorNode {
            error: ParsingError::BracketMismatch,
            ..
        })
    ));
}

#[test]
fn test_unbalanced_bracket_in_general_mode_is_text() {
    assert_eq!(parse_general("(a").to_string(), "LIST(\"(\", \"a\")");
    assert!(!parse_general("a)").contains_parsing_error());
}

#[test]
fn test_get_item_and_member_access() {
    assert_eq!(parse_math("$a[1 + 1]").to_string(), "GET_ITEM($a, ADD(1, 1))");
    assert_eq!(
        parse_math("$o::$x + 1").to_string(),
        "ADD(MEMBER_ACCESS($o, $x), 1)"
    );
    assert_eq!(
        parse_math("$a?[0]").to_string(),
        "OPTIONAL_GET_ITEM($a, 0)"
    );
}

#[test]
fn test_array_value() {
    assert_eq!(parse_math("[1, 2]").to_string(), "MATH_NON([1, 2])");
}

#[test]
fn test_cast() {
    assert_eq!(
        parse_math("{INT}$a + 1").to_string(),
        "ADD(CAST(\"INT\", $a), 1)"
    );
}

#[test]
fn test_ampersand_variable_after_operand_is_bitwise_and() {
    assert_eq!(parse_math("$a &b").to_string(), "BITWISE_AND($a, \"b\")");
    assert_eq!(
        parse_general("$a &b").to_string(),
        "LIST($a, \" \", &b)"
    );
}

#[test]
fn test_parser_functions_switch_mode() {
    assert_eq!(parse_general("parser.op(1 + 2)").to_string(), "ADD(1, 2)");
    assert_eq!(parse_general("parser.con($a)").to_string(), "CONDITIONAL_NON($a)");
}

#[test]
fn test_lexer_error_becomes_parsing_error() {
    assert!(matches!(
        parse_general("\"unterminated"),
        Node::ParsingError(ParsingErrorNode {
            error: ParsingError::LexerError,
            ..
        })
    ));
}

#[test]
fn test_parse_number() {
    let number = |value: &str| parse_number(&MK_TOKEN!(
        TokenKind::LiteralNumber,
        String::from(value),
        CodePosition::EMPTY
    ));

    assert!(matches!(number("42"), Node::Int { value: 42, .. }));
    assert!(matches!(number("10L"), Node::Long { value: 10, .. }));
    assert!(matches!(number("3000000000"), Node::Long { value: 3000000000, .. }));
    assert!(matches!(number("2.5f"), Node::Float { value, .. } if value == 2.5));
    assert!(matches!(number("1e3"), Node::Double { value, .. } if value == 1000.0));
}

#[test]
fn test_parse_escape_sequence() {
    let escape = |value: &str| parse_escape_sequence(&MK_TOKEN!(
        TokenKind::EscapeSequence,
        String::from(value),
        CodePosition::EMPTY
    ));

    assert!(matches!(escape("n"), Node::Char { value: '\n', .. }));
    assert!(matches!(escape("$"), Node::Char { value: '$', .. }));
    assert!(matches!(escape("!"), Node::Text { value, .. } if value.is_empty()));
}

// ASSIGNMENTS

#[test]
fn test_assignment_forms() {
    let nodes = parse_source(
        "$a = 2\n$b=some text\nmy.key = value\n$c += 2\n$d := 1 + 2\n$e ?= $b == 1",
    );
    let nodes = nodes.iter().map(Node::to_string).collect::<Vec<_>>();

    assert_eq!(
        nodes,
        vec![
            "ASSIGN($a, 2)",
            "ASSIGN($b, \"some text\")",
            "ASSIGN(\"my.key\", \"value\")",
            "ASSIGN($c, ADD($c, 2))",
            "ASSIGN($d, ADD(1, 2))",
            "ASSIGN($e, EQUALS($b, 1))",
        ]
    );
}

#[test]
fn test_operator_assignment_requires_variable() {
    let nodes = parse_source("1 += 2");

    assert_eq!(parsing_errors(&nodes), vec![ParsingError::InvalidAssignment]);
}

#[test]
fn test_parser_flag_assignment() {
    let (parser, nodes) = parse(tokenize("parser.lineNumbers = 5"));

    assert!(nodes.is_empty());
    assert!(matches!(parser.flag("lineNumbers"), Some(Node::Int { value: 5, .. })));
}

#[test]
fn test_function_value_assignment() {
    let nodes = parse_source("$f = ($x) -> return $x");

    let Node::Assignment(assignment) = &nodes[0] else {
        panic!("expected an assignment, got {}", nodes[0]);
    };
    let Node::FunctionDefinition(function) = assignment.rvalue.as_ref() else {
        panic!("expected a function value");
    };
    assert_eq!(function.parameters.len(), 1);
    assert!(matches!(function.body[0], Node::Return(_)));
}

#[test]
fn test_comments_are_collected() {
    let (parser, nodes) = parse(tokenize("# note\n$a = 1 # trailing"));

    assert_eq!(nodes.len(), 1);
    assert_eq!(parser.comments(), ["note", "trailing"]);
}

// CONTROL FLOW

#[test]
fn test_if_statement() {
    let nodes = parse_source(
        "con.if($a == 1)\n$b = 1\ncon.elif($a == 2)\n$b = 2\ncon.else\n$b = 3\ncon.endif",
    );

    assert_eq!(nodes.len(), 1);
    let Node::IfStatement(statement) = &nodes[0] else {
        panic!("expected an if statement, got {}", nodes[0]);
    };
    assert_eq!(statement.parts.len(), 3);
    assert_eq!(
        statement.parts[0].condition.as_ref().unwrap().to_string(),
        "EQUALS($a, 1)"
    );
    assert!(statement.parts[2].condition.is_none());
    assert_eq!(statement.parts[2].body[0].to_string(), "ASSIGN($b, 3)");
}

#[test]
fn test_curly_brace_if_statement() {
    let nodes = parse_source("if($a) {\n$b = 1\n} else {\n$b = 2\n}\n$c = 3");

    assert_eq!(nodes.len(), 2);
    let Node::IfStatement(statement) = &nodes[0] else {
        panic!("expected an if statement, got {}", nodes[0]);
    };
    assert_eq!(statement.parts.len(), 2);
    assert_eq!(
        statement.parts[0].condition.as_ref().unwrap().to_string(),
        "CONDITIONAL_NON($a)"
    );
}

#[test]
fn test_missing_endif_keeps_partial_statement() {
    let nodes = parse_source("con.if(1)\n$a = 1");

    assert!(matches!(nodes[0], Node::IfStatement(_)));
    assert_eq!(parsing_errors(&nodes), vec![ParsingError::Eof]);
}

#[test]
fn test_control_flow_argument_missing() {
    let nodes = parse_source("con.if()\ncon.endif");

    assert_eq!(parsing_errors(&nodes), vec![ParsingError::ContFlowArgMissing]);
}

#[test]
fn test_misplaced_control_flow_parts() {
    let nodes = parse_source("con.elif(1)\n$a = 1");
    assert_eq!(parsing_errors(&nodes), vec![ParsingError::InvalidConPart]);
    assert_eq!(nodes.len(), 2);

    let nodes = parse_source("con.if(1)\ncon.else\ncon.else\ncon.endif");
    assert_eq!(parsing_errors(&nodes), vec![ParsingError::InvalidConPart]);
}

#[test]
fn test_stray_closing_block() {
    let nodes = parse_source("}\n$a = 1");

    assert_eq!(parsing_errors(&nodes), vec![ParsingError::BracketMismatch]);
    assert_eq!(nodes[1].to_string(), "ASSIGN($a, 1)");
}

#[test]
fn test_loop_statements() {
    let nodes = parse_source(
        "con.while($i < 10)\n$i += 1\ncon.break\ncon.endloop\nrepeat($i, 3) {\ncon.continue(2)\n}",
    );

    assert_eq!(nodes.len(), 2);
    let Node::LoopStatement(while_loop) = &nodes[0] else {
        panic!("expected a loop, got {}", nodes[0]);
    };
    assert!(matches!(
        &while_loop.parts[0].kind,
        LoopStatementPartKind::While(condition) if condition.to_string() == "LESS_THAN($i, 10)"
    ));
    assert!(matches!(
        while_loop.parts[0].body[1],
        Node::LoopStatementContinueBreak(ref node) if !node.is_continue && node.levels.is_none()
    ));

    let Node::LoopStatement(repeat_loop) = &nodes[1] else {
        panic!("expected a loop, got {}", nodes[1]);
    };
    assert!(matches!(
        &repeat_loop.parts[0].kind,
        LoopStatementPartKind::Repeat(arguments) if arguments.len() == 3
    ));
    assert_eq!(repeat_loop.parts[0].body[0].to_string(), "CONTINUE(2)");
}

#[test]
fn test_try_statement() {
    let nodes = parse_source(
        "con.try\n$a = 1\ncon.catch($LANG_ERROR_DIV_BY_ZERO)\n$a = 2\ncon.finally\n$b = 1\ncon.endtry",
    );

    let Node::TryStatement(statement) = &nodes[0] else {
        panic!("expected a try statement, got {}", nodes[0]);
    };
    assert_eq!(statement.parts.len(), 3);
    assert_eq!(statement.parts[0].kind, TryStatementPartKind::Try);
    assert!(matches!(
        &statement.parts[1].kind,
        TryStatementPartKind::Catch(Some(errors)) if errors.len() == 1
    ));
    assert_eq!(statement.parts[2].kind, TryStatementPartKind::Finally);
}

#[test]
fn test_matching_bracket_ignores_other_bracket_kinds() {
    let closing_paren = |tokens: &[Token]| tokens.iter().rposition(|token| token.is_closing_bracket(")"));

    let tokens = tokenize("($a ])");
    assert_eq!(find_matching_bracket(&tokens, 0), closing_paren(&tokens));

    let tokens = tokenize("($a[(1)] [)");
    assert_eq!(find_matching_bracket(&tokens, 0), closing_paren(&tokens));

    let tokens = tokenize("[(]");
    assert_eq!(find_matching_bracket(&tokens, 0), Some(2));
    assert_eq!(find_matching_bracket(&tokens, 1), None);
}

#[test]
fn test_catch_after_finally() {
    let nodes = parse_source("con.try\ncon.finally\ncon.catch\ncon.endtry");

    assert_eq!(parsing_errors(&nodes), vec![ParsingError::InvalidConPart]);
}

#[test]
fn test_throw_and_return() {
    let nodes = parse_source("throw $LANG_ERROR_NO_NUM, message\nreturn\nthrow");

    let Node::Throw(throw) = &nodes[0] else {
        panic!("expected a throw statement, got {}", nodes[0]);
    };
    assert_eq!(throw.error.to_string(), "$LANG_ERROR_NO_NUM");
    assert_eq!(throw.message.as_ref().unwrap().to_string(), "\"message\"");
    assert_eq!(nodes[1].to_string(), "RETURN");
    assert_eq!(parsing_errors(&nodes), vec![ParsingError::ContFlowArgMissing]);
}

#[test]
fn test_keywords_as_plain_words() {
    let nodes = parse_source("if only");

    assert_eq!(nodes.len(), 1);
    assert!(!nodes[0].contains_parsing_error());
}

fn is_plain_text(node: &Node) -> bool {
    match node {
        Node::Text { .. } => true,
        Node::List(list) => list.nodes.iter().all(|node| matches!(node, Node::Text { .. })),
        _ => false,
    }
}

#[test]
fn test_free_form_line_keeps_operator_symbols_as_text() {
    for source in ["Ready? yes: no", "a ?? b", "left <=> right"] {
        let nodes = parse_source(source);

        assert_eq!(nodes.len(), 1, "{}", source);
        assert!(is_plain_text(&nodes[0]), "{} parsed as {}", source, nodes[0]);
    }
}

#[test]
fn test_plain_rvalue_keeps_operator_symbols_as_text() {
    let nodes = parse_source("$x = left <=> right\n$y $= a ?? b");

    let Node::Assignment(plain) = &nodes[0] else {
        panic!("expected an assignment, got {}", nodes[0]);
    };
    assert!(is_plain_text(&plain.rvalue), "{}", plain.rvalue);

    assert_eq!(nodes[1].to_string(), "ASSIGN($y, NULL_COALESCING(\"a\", \"b\"))");
}

#[test]
fn test_free_form_line_values_and_calls() {
    let nodes = parse_source("$p::$x\nfunc.f($a, b c) + d\n$arr[1]");

    assert_eq!(nodes[0].to_string(), "MEMBER_ACCESS($p, $x)");
    let Node::List(list) = &nodes[1] else {
        panic!("expected a list, got {}", nodes[1]);
    };
    let Node::FunctionCall(call) = &list.nodes[0] else {
        panic!("expected a call, got {}", list.nodes[0]);
    };
    assert_eq!(call.arguments.len(), 3);
    assert!(list.nodes[1..].iter().all(|node| matches!(node, Node::Text { .. })));
    assert_eq!(nodes[2].to_string(), "GET_ITEM($arr, 1)");
}

// DEFINITIONS

#[test]
fn test_function_definition() {
    let nodes = parse_source(
        "## Adds two numbers\nfunction add($a{INT}, $b...) {\nreturn parser.op($a + $b)\n}",
    );

    let Node::FunctionDefinition(function) = &nodes[0] else {
        panic!("expected a function, got {}", nodes[0]);
    };
    assert_eq!(function.name.as_deref(), Some("add"));
    assert_eq!(function.doc_comment.as_deref(), Some("Adds two numbers"));
    assert_eq!(function.parameters[0].type_constraint.as_deref(), Some("INT"));
    assert!(function.parameters[1].var_args);
    assert_eq!(function.body[0].to_string(), "RETURN(ADD($a, $b))");
}

#[test]
fn test_invalid_parameter() {
    let nodes = parse_source("function f(x) {\n}\n$a = 1");

    assert_eq!(parsing_errors(&nodes), vec![ParsingError::InvalidParameter]);
    assert_eq!(nodes.last().unwrap().to_string(), "ASSIGN($a, 1)");
}

#[test]
fn test_unclosed_function_body() {
    let nodes = parse_source("function f() {\n$a = 1");

    assert!(matches!(nodes[0], Node::FunctionDefinition(_)));
    assert_eq!(parsing_errors(&nodes), vec![ParsingError::Eof]);
}

#[test]
fn test_struct_definition() {
    let nodes = parse_source("struct Point {\n$x{INT}\n$y\n$x\n}");

    let Node::StructDefinition(definition) = &nodes[0] else {
        panic!("expected a struct, got {}", nodes[0]);
    };
    assert_eq!(definition.name, "Point");
    assert_eq!(definition.members.len(), 2);
    assert_eq!(definition.members[0].type_constraint.as_deref(), Some("INT"));
    assert_eq!(parsing_errors(&nodes), vec![ParsingError::InvalidAssignment]);
}

#[test]
fn test_class_definition() {
    let nodes = parse_source(
        "## A vector\nclass Vec < Base > {\n+$x{INT} = 0\nstatic:+$count = 0\n+fp.len = () -> return $x\n+op:add = ($other) -> return $other\n+construct = ($x) -> return\n}",
    );

    assert!(parsing_errors(&nodes).is_empty());
    let Node::ClassDefinition(class) = &nodes[0] else {
        panic!("expected a class, got {}", nodes[0]);
    };
    assert_eq!(class.name, "Vec");
    assert_eq!(class.parent_classes, vec!["Base"]);
    assert_eq!(class.doc_comment.as_deref(), Some("A vector"));
    assert_eq!(class.members.len(), 1);
    assert_eq!(class.static_members.len(), 1);
    assert_eq!(class.methods.len(), 2);
    assert_eq!(class.methods[1].kind, MethodKind::Operator);
    assert_eq!(class.constructors.len(), 1);
}

#[test]
fn test_invalid_class_members() {
    let nodes = parse_source(
        "class Bad {\n-op:add = ($o) -> return $o\n+op:unknown = ($o) -> return $o\n+$a\n+$a\nnonsense\n+fp.f = ($a) -> return\n+fp.f = ($b) -> return\n}",
    );

    assert!(matches!(nodes[0], Node::ClassDefinition(_)));
    assert_eq!(parsing_errors(&nodes), vec![ParsingError::InvalidAssignment]);
}

#[test]
fn test_first_invalid_struct_member_ends_the_body() {
    let nodes = parse_source("struct S {\n$a\nbad one\n$a\nalso bad\n}");

    let Node::StructDefinition(definition) = &nodes[0] else {
        panic!("expected a struct, got {}", nodes[0]);
    };
    assert_eq!(definition.members.len(), 1);
    assert_eq!(parsing_errors(&nodes), vec![ParsingError::InvalidAssignment]);
    assert_eq!(nodes.len(), 2);
}

#[test]
fn test_first_invalid_class_member_ends_the_body() {
    for body in [
        "bogus\n+$b = 1",
        "+$a = 1\n+$a = 2\nbogus",
        "-op:add = ($o) -> return $o\n+$a\n+$a",
    ] {
        let nodes = parse_source(&format!("class C {{\n{}\n}}", body));

        assert!(matches!(nodes[0], Node::ClassDefinition(_)), "{}", body);
        assert_eq!(
            parsing_errors(&nodes),
            vec![ParsingError::InvalidAssignment],
            "{}",
            body
        );
    }
}

#[test]
fn test_unclosed_parent_class_list() {
    let nodes = parse_source("class A < B {\n}");

    assert_eq!(parsing_errors(&nodes), vec![ParsingError::BracketMismatch]);
}

#[test]
fn test_doc_comment_is_consumed_once() {
    let nodes = parse_source("## Doc\nfunction a() {\n}\nfunction b() {\n}");

    let docs = nodes
        .iter()
        .filter_map(|node| match node {
            Node::FunctionDefinition(function) => Some(function.doc_comment.clone()),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(docs, vec![Some(String::from("Doc")), None]);
}

#[test]
fn test_operation_modes_are_recorded() {
    let Node::Operation(operation) = parse_math("1 + 2") else {
        panic!("expected an operation");
    };

    assert_eq!(operation.operator, Operator::Add);
    assert_eq!(operation.operator_type, OperatorType::Math);
}
