use crate::{errors::errors::ParsingError, CodePosition};

use super::{
    ast::{Node, NodeType},
    expressions::{ListNode, OperationNode, ParsingErrorNode},
    operators::{Arity, Operator, OperatorType},
};

fn int(value: i32) -> Node {
    Node::Int {
        value,
        position: CodePosition::new(1, 1, 1, 2),
    }
}

#[test]
fn test_operator_type_compatibility() {
    assert!(OperatorType::All.is_compatible_with(OperatorType::General));
    assert!(OperatorType::General.is_compatible_with(OperatorType::Condition));
    assert!(OperatorType::Math.is_compatible_with(OperatorType::Condition));
    assert!(!OperatorType::Math.is_compatible_with(OperatorType::General));
    assert!(!OperatorType::Condition.is_compatible_with(OperatorType::Math));
    assert!(OperatorType::Condition.is_compatible_with(OperatorType::Condition));
}

#[test]
fn test_operator_table() {
    for operator in Operator::VALUES {
        match operator.arity() {
            Arity::Unary => assert!(operator.is_unary()),
            Arity::Binary => assert!(operator.is_binary()),
            Arity::Ternary => assert!(operator.is_ternary()),
        }
    }

    assert!(Operator::Mul.precedence() < Operator::Add.precedence());
    assert!(Operator::Pow.precedence() < Operator::Inv.precedence());
    assert!(Operator::And.precedence() < Operator::Or.precedence());
    assert!(Operator::Or.precedence() < Operator::InlineIf.precedence());
    assert!(Operator::InlineIf.precedence() < Operator::Comma.precedence());

    assert!(Operator::Pow.is_right_associative());
    assert!(Operator::InlineIf.is_right_associative());
    assert!(!Operator::Sub.is_right_associative());

    assert_eq!(Operator::Concat.operator_type(), OperatorType::General);
    assert_eq!(Operator::GetItem.operator_type(), OperatorType::All);
    assert_eq!(Operator::Add.operator_type(), OperatorType::Math);
    assert_eq!(Operator::Equals.operator_type(), OperatorType::Condition);
}

#[test]
fn test_operator_method_names() {
    assert_eq!(Operator::Add.method_name(), Some("op:add"));
    assert_eq!(Operator::FloorDiv.method_name(), Some("op:floorDiv"));
    assert_eq!(Operator::OptionalGetItem.method_name(), Some("op:getItem"));
    assert_eq!(Operator::And.method_name(), None);

    assert_eq!(Operator::Sub.reverse_method_name(), Some(String::from("op:r-sub")));
    assert_eq!(Operator::Concat.reverse_method_name(), Some(String::from("op:r-concat")));
    assert_eq!(Operator::Len.reverse_method_name(), None);
    assert_eq!(Operator::Equals.reverse_method_name(), None);
}

#[test]
fn test_non_operators() {
    assert_eq!(OperatorType::General.non_operator(), Operator::Non);
    assert_eq!(OperatorType::Math.non_operator(), Operator::MathNon);
    assert_eq!(OperatorType::Condition.non_operator(), Operator::ConditionalNon);
}

#[test]
fn test_operation_display() {
    let node = Node::Operation(OperationNode::binary(
        Operator::Add,
        int(2),
        Node::Operation(OperationNode::binary(
            Operator::Mul,
            int(3),
            int(4),
            OperatorType::Math,
        )),
        OperatorType::Math,
    ));

    assert_eq!(node.to_string(), "ADD(2, MUL(3, 4))");
    assert_eq!(node.get_node_type(), NodeType::Operation);
}

#[test]
fn test_operation_position_is_combined() {
    let left = Node::Int {
        value: 1,
        position: CodePosition::new(1, 1, 1, 2),
    };
    let right = Node::Int {
        value: 2,
        position: CodePosition::new(1, 1, 5, 6),
    };

    let node = OperationNode::binary(Operator::Add, left, right, OperatorType::Math);
    assert_eq!(node.position, CodePosition::new(1, 1, 1, 6));
}

#[test]
fn test_from_nodes() {
    assert!(matches!(
        Node::from_nodes(vec![], CodePosition::EMPTY),
        Node::Null { .. }
    ));
    assert_eq!(Node::from_nodes(vec![int(1)], CodePosition::EMPTY), int(1));
    assert_eq!(
        Node::from_nodes(vec![int(1), int(2)], CodePosition::EMPTY).get_node_type(),
        NodeType::List
    );
}

#[test]
fn test_contains_parsing_error() {
    let error = Node::ParsingError(ParsingErrorNode::new(
        ParsingError::BracketMismatch,
        "",
        CodePosition::EMPTY,
    ));
    let list = Node::List(ListNode::new(vec![int(1), error]));

    assert!(list.contains_parsing_error());
    assert!(!list.is_parsing_error());
    assert!(!int(1).contains_parsing_error());
}
