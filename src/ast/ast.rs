use std::fmt::Display;

use crate::CodePosition;

use super::{
    expressions::{
        ArrayValueNode, AssignmentNode, FunctionCallNode, FunctionCallPreviousNodeValueNode,
        ListNode, OperationNode, ParsingErrorNode, UnprocessedVariableNameNode,
    },
    statements::{
        ClassDefinitionNode, FunctionDefinitionNode, IfStatementNode,
        LoopStatementContinueBreakNode, LoopStatementNode, ReturnNode, StructDefinitionNode,
        ThrowNode, TryStatementNode,
    },
};

/// Node Types
///
/// Identifies the variant of a node without borrowing its content.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum NodeType {
    Null,
    Text,
    Char,
    Int,
    Long,
    Float,
    Double,
    List,
    Operation,
    UnprocessedVariableName,
    FunctionCall,
    FunctionCallPreviousNodeValue,
    ArrayValue,
    Assignment,
    FunctionDefinition,
    StructDefinition,
    ClassDefinition,
    IfStatement,
    LoopStatement,
    LoopStatementContinueBreak,
    TryStatement,
    Return,
    Throw,
    ArgumentSeparator,
    ParsingError,
}

/// AST Node
///
/// The closed set of nodes the parser produces. Nodes are built bottom-up and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null { position: CodePosition },
    Text { value: String, position: CodePosition },
    Char { value: char, position: CodePosition },
    Int { value: i32, position: CodePosition },
    Long { value: i64, position: CodePosition },
    Float { value: f32, position: CodePosition },
    Double { value: f64, position: CodePosition },
    List(ListNode),
    Operation(OperationNode),
    UnprocessedVariableName(UnprocessedVariableNameNode),
    FunctionCall(FunctionCallNode),
    FunctionCallPreviousNodeValue(FunctionCallPreviousNodeValueNode),
    ArrayValue(ArrayValueNode),
    Assignment(AssignmentNode),
    FunctionDefinition(FunctionDefinitionNode),
    StructDefinition(StructDefinitionNode),
    ClassDefinition(ClassDefinitionNode),
    IfStatement(IfStatementNode),
    LoopStatement(LoopStatementNode),
    LoopStatementContinueBreak(LoopStatementContinueBreakNode),
    TryStatement(TryStatementNode),
    Return(ReturnNode),
    Throw(ThrowNode),
    ArgumentSeparator { original_text: String, position: CodePosition },
    ParsingError(ParsingErrorNode),
}

impl Node {
    pub fn text(value: impl Into<String>, position: CodePosition) -> Node {
        Node::Text {
            value: value.into(),
            position,
        }
    }

    pub fn get_node_type(&self) -> NodeType {
        match self {
            Node::Null { .. } => NodeType::Null,
            Node::Text { .. } => NodeType::Text,
            Node::Char { .. } => NodeType::Char,
            Node::Int { .. } => NodeType::Int,
            Node::Long { .. } => NodeType::Long,
            Node::Float { .. } => NodeType::Float,
            Node::Double { .. } => NodeType::Double,
            Node::List(_) => NodeType::List,
            Node::Operation(_) => NodeType::Operation,
            Node::UnprocessedVariableName(_) => NodeType::UnprocessedVariableName,
            Node::FunctionCall(_) => NodeType::FunctionCall,
            Node::FunctionCallPreviousNodeValue(_) => NodeType::FunctionCallPreviousNodeValue,
            Node::ArrayValue(_) => NodeType::ArrayValue,
            Node::Assignment(_) => NodeType::Assignment,
            Node::FunctionDefinition(_) => NodeType::FunctionDefinition,
            Node::StructDefinition(_) => NodeType::StructDefinition,
            Node::ClassDefinition(_) => NodeType::ClassDefinition,
            Node::IfStatement(_) => NodeType::IfStatement,
            Node::LoopStatement(_) => NodeType::LoopStatement,
            Node::LoopStatementContinueBreak(_) => NodeType::LoopStatementContinueBreak,
            Node::TryStatement(_) => NodeType::TryStatement,
            Node::Return(_) => NodeType::Return,
            Node::Throw(_) => NodeType::Throw,
            Node::ArgumentSeparator { .. } => NodeType::ArgumentSeparator,
            Node::ParsingError(_) => NodeType::ParsingError,
        }
    }

    pub fn position(&self) -> &CodePosition {
        match self {
            Node::Null { position }
            | Node::Text { position, .. }
            | Node::Char { position, .. }
            | Node::Int { position, .. }
            | Node::Long { position, .. }
            | Node::Float { position, .. }
            | Node::Double { position, .. }
            | Node::ArgumentSeparator { position, .. } => position,
            Node::List(node) => &node.position,
            Node::Operation(node) => &node.position,
            Node::UnprocessedVariableName(node) => &node.position,
            Node::FunctionCall(node) => &node.position,
            Node::FunctionCallPreviousNodeValue(node) => &node.position,
            Node::ArrayValue(node) => &node.position,
            Node::Assignment(node) => &node.position,
            Node::FunctionDefinition(node) => &node.position,
            Node::StructDefinition(node) => &node.position,
            Node::ClassDefinition(node) => &node.position,
            Node::IfStatement(node) => &node.position,
            Node::LoopStatement(node) => &node.position,
            Node::LoopStatementContinueBreak(node) => &node.position,
            Node::TryStatement(node) => &node.position,
            Node::Return(node) => &node.position,
            Node::Throw(node) => &node.position,
            Node::ParsingError(node) => &node.position,
        }
    }

    pub fn is_parsing_error(&self) -> bool {
        matches!(self, Node::ParsingError(_))
    }

    /// Whether this node or any node below it is a parsing error.
    pub fn contains_parsing_error(&self) -> bool {
        match self {
            Node::ParsingError(_) => true,
            Node::List(node) => node.nodes.iter().any(Node::contains_parsing_error),
            Node::Operation(node) => node.operands().iter().any(|n| n.contains_parsing_error()),
            Node::FunctionCall(node) => node.arguments.iter().any(Node::contains_parsing_error),
            Node::FunctionCallPreviousNodeValue(node) => {
                node.previous.contains_parsing_error()
                    || node.arguments.iter().any(Node::contains_parsing_error)
            }
            Node::ArrayValue(node) => node.elements.iter().any(Node::contains_parsing_error),
            Node::Assignment(node) => {
                node.lvalue.contains_parsing_error() || node.rvalue.contains_parsing_error()
            }
            Node::FunctionDefinition(node) => node.body.iter().any(Node::contains_parsing_error),
            Node::IfStatement(node) => node
                .parts
                .iter()
                .any(|part| part.body.iter().any(Node::contains_parsing_error)),
            Node::LoopStatement(node) => node
                .parts
                .iter()
                .any(|part| part.body.iter().any(Node::contains_parsing_error)),
            Node::TryStatement(node) => node
                .parts
                .iter()
                .any(|part| part.body.iter().any(Node::contains_parsing_error)),
            _ => false,
        }
    }

    /// Collapses accumulated nodes: nothing becomes `Null`, a single node stays as is.
    pub fn from_nodes(mut nodes: Vec<Node>, position: CodePosition) -> Node {
        match nodes.len() {
            0 => Node::Null { position },
            1 => nodes.remove(0),
            _ => Node::List(ListNode::new(nodes)),
        }
    }
}

fn write_arguments(f: &mut std::fmt::Formatter<'_>, arguments: &[Node]) -> std::fmt::Result {
    for argument in arguments {
        match argument {
            Node::ArgumentSeparator { .. } => write!(f, ", ")?,
            node => write!(f, "{}", node)?,
        }
    }

    Ok(())
}

fn write_body(f: &mut std::fmt::Formatter<'_>, body: &[Node]) -> std::fmt::Result {
    write!(f, "{{")?;
    for (i, node) in body.iter().enumerate() {
        if i > 0 {
            write!(f, "; ")?;
        }
        write!(f, "{}", node)?;
    }
    write!(f, "}}")
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Null { .. } => write!(f, "null"),
            Node::Text { value, .. } => write!(f, "{:?}", value),
            Node::Char { value, .. } => write!(f, "{:?}", value),
            Node::Int { value, .. } => write!(f, "{}", value),
            Node::Long { value, .. } => write!(f, "{}L", value),
            Node::Float { value, .. } => write!(f, "{:?}F", value),
            Node::Double { value, .. } => write!(f, "{:?}", value),
            Node::List(node) => {
                write!(f, "LIST(")?;
                for (i, child) in node.nodes.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
            Node::Operation(node) => {
                write!(f, "{}(", node.operator)?;
                for (i, operand) in node.operands().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", operand)?;
                }
                write!(f, ")")
            }
            Node::UnprocessedVariableName(node) => write!(f, "{}", node.name),
            Node::FunctionCall(node) => {
                write!(f, "{}(", node.name)?;
                write_arguments(f, &node.arguments)?;
                write!(f, ")")
            }
            Node::FunctionCallPreviousNodeValue(node) => {
                write!(f, "CALL({})(", node.previous)?;
                write_arguments(f, &node.arguments)?;
                write!(f, ")")
            }
            Node::ArrayValue(node) => {
                write!(f, "[")?;
                write_arguments(f, &node.elements)?;
                write!(f, "]")
            }
            Node::Assignment(node) => write!(f, "ASSIGN({}, {})", node.lvalue, node.rvalue),
            Node::FunctionDefinition(node) => {
                write!(f, "FUNCTION {}(", node.name.as_deref().unwrap_or("<anonymous>"))?;
                for (i, parameter) in node.parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", parameter)?;
                }
                write!(f, ") ")?;
                write_body(f, &node.body)
            }
            Node::StructDefinition(node) => {
                let members = node
                    .members
                    .iter()
                    .map(|member| member.name.as_str())
                    .collect::<Vec<_>>();
                write!(f, "STRUCT {} {{{}}}", node.name, members.join(", "))
            }
            Node::ClassDefinition(node) => write!(
                f,
                "CLASS {} <{}> ({} members, {} static members, {} methods, {} constructors)",
                node.name,
                node.parent_classes.join(", "),
                node.members.len(),
                node.static_members.len(),
                node.methods.len(),
                node.constructors.len()
            ),
            Node::IfStatement(node) => {
                write!(f, "IF")?;
                for part in &node.parts {
                    match &part.condition {
                        Some(condition) => write!(f, " ({}) ", condition)?,
                        None => write!(f, " ELSE ")?,
                    }
                    write_body(f, &part.body)?;
                }
                Ok(())
            }
            Node::LoopStatement(node) => {
                write!(f, "LOOP")?;
                for part in &node.parts {
                    write!(f, " {:?} ", part.kind)?;
                    write_body(f, &part.body)?;
                }
                Ok(())
            }
            Node::LoopStatementContinueBreak(node) => {
                write!(f, "{}", if node.is_continue { "CONTINUE" } else { "BREAK" })?;
                if let Some(levels) = &node.levels {
                    write!(f, "({})", levels)?;
                }
                Ok(())
            }
            Node::TryStatement(node) => {
                write!(f, "TRY")?;
                for part in &node.parts {
                    write!(f, " {:?} ", part.kind)?;
                    write_body(f, &part.body)?;
                }
                Ok(())
            }
            Node::Return(node) => match &node.value {
                Some(value) => write!(f, "RETURN({})", value),
                None => write!(f, "RETURN"),
            },
            Node::Throw(node) => match &node.message {
                Some(message) => write!(f, "THROW({}, {})", node.error, message),
                None => write!(f, "THROW({})", node.error),
            },
            Node::ArgumentSeparator { .. } => write!(f, ","),
            Node::ParsingError(node) => write!(
                f,
                "PARSING_ERROR({}: {})",
                node.error.get_error_name(),
                node.message
            ),
        }
    }
}
