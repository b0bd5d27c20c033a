use std::fmt::Display;

use crate::CodePosition;

use super::ast::Node;

// DEFINITIONS

/// A function parameter, e.g. `$x{INT|LONG}` or `&args...`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub type_constraint: Option<String>,
    pub var_args: bool,
    pub position: CodePosition,
}

impl Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(constraint) = &self.type_constraint {
            write!(f, "{{{}}}", constraint)?;
        }
        if self.var_args {
            write!(f, "...")?;
        }

        Ok(())
    }
}

/// Function Definition Node
///
/// Covers named functions (`function name(...) {`) as well as anonymous
/// function values (`(...) -> ...`).
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinitionNode {
    pub name: Option<String>,
    pub parameters: Vec<Parameter>,
    pub body: Vec<Node>,
    pub doc_comment: Option<String>,
    pub position: CodePosition,
}

impl FunctionDefinitionNode {
    /// Whether both definitions accept the same parameter list.
    pub fn has_same_signature(&self, other: &FunctionDefinitionNode) -> bool {
        self.parameters.len() == other.parameters.len()
            && self.parameters.iter().zip(other.parameters.iter()).all(|(a, b)| {
                a.type_constraint == b.type_constraint && a.var_args == b.var_args
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructMember {
    pub name: String,
    pub type_constraint: Option<String>,
}

/// Struct Definition Node
#[derive(Debug, Clone, PartialEq)]
pub struct StructDefinitionNode {
    pub name: String,
    pub members: Vec<StructMember>,
    pub doc_comment: Option<String>,
    pub position: CodePosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Private,
    Protected,
    Public,
}

impl Visibility {
    pub fn from_symbol(symbol: char) -> Option<Visibility> {
        match symbol {
            '-' => Some(Visibility::Private),
            '~' => Some(Visibility::Protected),
            '+' => Some(Visibility::Public),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Visibility::Private => '-',
            Visibility::Protected => '~',
            Visibility::Public => '+',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassMember {
    pub name: String,
    pub type_constraint: Option<String>,
    pub visibility: Visibility,
    pub is_final: bool,
    pub value: Option<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Normal,
    /// `op:<name>`
    Operator,
    /// `to:<name>`
    Conversion,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassMethod {
    pub name: String,
    pub kind: MethodKind,
    pub visibility: Visibility,
    pub is_override: bool,
    pub definition: FunctionDefinitionNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassConstructor {
    pub visibility: Visibility,
    pub definition: FunctionDefinitionNode,
}

/// Class Definition Node
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDefinitionNode {
    pub name: String,
    pub parent_classes: Vec<String>,
    pub members: Vec<ClassMember>,
    pub static_members: Vec<ClassMember>,
    pub methods: Vec<ClassMethod>,
    pub constructors: Vec<ClassConstructor>,
    pub doc_comment: Option<String>,
    pub position: CodePosition,
}

// CONTROL FLOW

/// One `if`/`elif`/`else` branch. `else` has no condition.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatementPartNode {
    pub condition: Option<Box<Node>>,
    pub body: Vec<Node>,
    pub position: CodePosition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatementNode {
    pub parts: Vec<IfStatementPartNode>,
    pub position: CodePosition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoopStatementPartKind {
    Loop,
    While(Box<Node>),
    Until(Box<Node>),
    /// `con.repeat($i, 10)`, argument list delimited by `ArgumentSeparator`s.
    Repeat(Vec<Node>),
    ForEach(Vec<Node>),
    Else,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopStatementPartNode {
    pub kind: LoopStatementPartKind,
    pub body: Vec<Node>,
    pub position: CodePosition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopStatementNode {
    pub parts: Vec<LoopStatementPartNode>,
    pub position: CodePosition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopStatementContinueBreakNode {
    pub is_continue: bool,
    pub levels: Option<Box<Node>>,
    pub position: CodePosition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TryStatementPartKind {
    Try,
    SoftTry,
    NonTry,
    /// Errors to catch; `None` catches everything.
    Catch(Option<Vec<Node>>),
    Else,
    Finally,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStatementPartNode {
    pub kind: TryStatementPartKind,
    pub body: Vec<Node>,
    pub position: CodePosition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStatementNode {
    pub parts: Vec<TryStatementPartNode>,
    pub position: CodePosition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnNode {
    pub value: Option<Box<Node>>,
    pub position: CodePosition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThrowNode {
    pub error: Box<Node>,
    pub message: Option<Box<Node>>,
    pub position: CodePosition,
}
