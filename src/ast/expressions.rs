use crate::{
    errors::errors::{Error, ErrorImpl, ParsingError},
    CodePosition,
};

use super::{
    ast::Node,
    operators::{Operator, OperatorType},
};

/// List Node
/// Leaves accumulated without an operator between them, e.g. `Hello $name!`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListNode {
    pub nodes: Vec<Node>,
    pub position: CodePosition,
}

impl ListNode {
    pub fn new(nodes: Vec<Node>) -> Self {
        let position = nodes
            .iter()
            .fold(CodePosition::EMPTY, |position, node| position.combine(node.position()));

        ListNode { nodes, position }
    }
}

/// Operation Node
/// An operator applied to one, two or three operands.
///
/// `middle` is only set for ternary operators, `right` for binary and ternary ones.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationNode {
    pub operator: Operator,
    pub operator_type: OperatorType,
    pub left: Box<Node>,
    pub middle: Option<Box<Node>>,
    pub right: Option<Box<Node>>,
    pub position: CodePosition,
}

impl OperationNode {
    pub fn unary(operator: Operator, operand: Node, operator_type: OperatorType) -> Self {
        OperationNode {
            operator,
            operator_type,
            position: *operand.position(),
            left: Box::new(operand),
            middle: None,
            right: None,
        }
    }

    pub fn binary(operator: Operator, left: Node, right: Node, operator_type: OperatorType) -> Self {
        OperationNode {
            operator,
            operator_type,
            position: left.position().combine(right.position()),
            left: Box::new(left),
            middle: None,
            right: Some(Box::new(right)),
        }
    }

    pub fn ternary(
        operator: Operator,
        left: Node,
        middle: Node,
        right: Node,
        operator_type: OperatorType,
    ) -> Self {
        OperationNode {
            operator,
            operator_type,
            position: left
                .position()
                .combine(middle.position())
                .combine(right.position()),
            left: Box::new(left),
            middle: Some(Box::new(middle)),
            right: Some(Box::new(right)),
        }
    }

    /// Operands in source order.
    pub fn operands(&self) -> Vec<&Node> {
        let mut operands = vec![self.left.as_ref()];
        if let Some(middle) = &self.middle {
            operands.push(middle);
        }
        if let Some(right) = &self.right {
            operands.push(right);
        }

        operands
    }
}

/// Unprocessed Variable Name Node
/// A variable name the evaluator resolves at runtime (`$a`, `&list`, `fp.f`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct UnprocessedVariableNameNode {
    pub name: String,
    pub position: CodePosition,
}

/// Function Call Node
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCallNode {
    pub name: String,
    pub arguments: Vec<Node>,
    pub position: CodePosition,
}

/// Function Call Previous Node Value Node
/// Calls whatever the preceding expression evaluates to, e.g. `fp.get()(1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCallPreviousNodeValueNode {
    pub previous: Box<Node>,
    pub arguments: Vec<Node>,
    pub position: CodePosition,
}

/// Array Value Node
/// An array literal `[1, 2, 3]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValueNode {
    pub elements: Vec<Node>,
    pub position: CodePosition,
}

/// Assignment Node
///
/// Translation key assignments use a `Text` lvalue holding the key.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentNode {
    pub lvalue: Box<Node>,
    pub rvalue: Box<Node>,
    pub position: CodePosition,
}

impl AssignmentNode {
    pub fn new(lvalue: Node, rvalue: Node) -> Self {
        AssignmentNode {
            position: lvalue.position().combine(rvalue.position()),
            lvalue: Box::new(lvalue),
            rvalue: Box::new(rvalue),
        }
    }
}

/// Parsing Error Node
/// Marks the construct it replaces as incomplete.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsingErrorNode {
    pub error: ParsingError,
    pub message: String,
    pub position: CodePosition,
}

impl ParsingErrorNode {
    pub fn new(error: ParsingError, message: impl Into<String>, position: CodePosition) -> Self {
        ParsingErrorNode {
            error,
            message: message.into(),
            position,
        }
    }

    pub fn to_error(&self) -> Error {
        Error::new(
            ErrorImpl::Parsing {
                error: self.error,
                message: self.message.clone(),
            },
            self.position,
        )
    }
}
