use std::fmt::Display;

/// The grammar an operator belongs to, or the mode an expression was parsed in.
///
/// `All` only ever describes operators: it marks operators valid in every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorType {
    All,
    General,
    Math,
    Condition,
}

impl OperatorType {
    /// Whether an operator of this category may appear in an expression parsed in `mode`.
    pub fn is_compatible_with(&self, mode: OperatorType) -> bool {
        match self {
            OperatorType::All | OperatorType::General => true,
            OperatorType::Math => matches!(mode, OperatorType::Math | OperatorType::Condition),
            OperatorType::Condition => mode == OperatorType::Condition,
        }
    }

    /// The wrapper operator used when an expression of this mode has no top-level operator.
    pub fn non_operator(&self) -> Operator {
        match self {
            OperatorType::All | OperatorType::General => Operator::Non,
            OperatorType::Math => Operator::MathNon,
            OperatorType::Condition => Operator::ConditionalNon,
        }
    }
}

impl Display for OperatorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OperatorType::All => "ALL",
            OperatorType::General => "GENERAL",
            OperatorType::Math => "MATH",
            OperatorType::Condition => "CONDITION",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Unary,
    Binary,
    Ternary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // General
    Non,
    Len,
    DeepCopy,
    Concat,
    Spaceship,
    Elvis,
    NullCoalescing,
    InlineIf,

    // All
    GetItem,
    OptionalGetItem,
    SetItem,
    MemberAccess,
    OptionalMemberAccess,
    Comma,

    // Math
    MathNon,
    Pow,
    Pos,
    Inv,
    BitwiseNot,
    Inc,
    Dec,
    Mul,
    Div,
    TruncDiv,
    FloorDiv,
    CeilDiv,
    Mod,
    Add,
    Sub,
    Lshift,
    Rshift,
    Rzshift,
    BitwiseAnd,
    BitwiseXor,
    BitwiseOr,
    Cast,

    // Condition
    ConditionalNon,
    Not,
    InstanceOf,
    Equals,
    NotEquals,
    Matches,
    NotMatches,
    StrictEquals,
    StrictNotEquals,
    LessThan,
    GreaterThan,
    LessThanOrEquals,
    GreaterThanOrEquals,
    And,
    Or,
}

impl Operator {
    pub const VALUES: [Operator; 51] = [
        Operator::Non,
        Operator::Len,
        Operator::DeepCopy,
        Operator::Concat,
        Operator::Spaceship,
        Operator::Elvis,
        Operator::NullCoalescing,
        Operator::InlineIf,
        Operator::GetItem,
        Operator::OptionalGetItem,
        Operator::SetItem,
        Operator::MemberAccess,
        Operator::OptionalMemberAccess,
        Operator::Comma,
        Operator::MathNon,
        Operator::Pow,
        Operator::Pos,
        Operator::Inv,
        Operator::BitwiseNot,
        Operator::Inc,
        Operator::Dec,
        Operator::Mul,
        Operator::Div,
        Operator::TruncDiv,
        Operator::FloorDiv,
        Operator::CeilDiv,
        Operator::Mod,
        Operator::Add,
        Operator::Sub,
        Operator::Lshift,
        Operator::Rshift,
        Operator::Rzshift,
        Operator::BitwiseAnd,
        Operator::BitwiseXor,
        Operator::BitwiseOr,
        Operator::Cast,
        Operator::ConditionalNon,
        Operator::Not,
        Operator::InstanceOf,
        Operator::Equals,
        Operator::NotEquals,
        Operator::Matches,
        Operator::NotMatches,
        Operator::StrictEquals,
        Operator::StrictNotEquals,
        Operator::LessThan,
        Operator::GreaterThan,
        Operator::LessThanOrEquals,
        Operator::GreaterThanOrEquals,
        Operator::And,
        Operator::Or,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Non | Operator::MathNon | Operator::ConditionalNon => "",
            Operator::Len => "@",
            Operator::DeepCopy => "^",
            Operator::Concat => "|||",
            Operator::Spaceship => "<=>",
            Operator::Elvis => "?:",
            Operator::NullCoalescing => "??",
            Operator::InlineIf => "?...:",
            Operator::GetItem => "[...]",
            Operator::OptionalGetItem => "?[...]",
            Operator::SetItem => "[...] = ",
            Operator::MemberAccess => "::",
            Operator::OptionalMemberAccess => "?::",
            Operator::Comma => ",",
            Operator::Pow => "**",
            Operator::Pos => "+",
            Operator::Inv => "-",
            Operator::BitwiseNot => "~",
            Operator::Inc => "+|",
            Operator::Dec => "-|",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::TruncDiv => "~/",
            Operator::FloorDiv => "//",
            Operator::CeilDiv => "^/",
            Operator::Mod => "%",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Lshift => "<<",
            Operator::Rshift => ">>",
            Operator::Rzshift => ">>>",
            Operator::BitwiseAnd => "&",
            Operator::BitwiseXor => "^",
            Operator::BitwiseOr => "|",
            Operator::Cast => "{...}",
            Operator::Not => "!",
            Operator::InstanceOf => "~~",
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
            Operator::Matches => "=~",
            Operator::NotMatches => "!=~",
            Operator::StrictEquals => "===",
            Operator::StrictNotEquals => "!==",
            Operator::LessThan => "<",
            Operator::GreaterThan => ">",
            Operator::LessThanOrEquals => "<=",
            Operator::GreaterThanOrEquals => ">=",
            Operator::And => "&&",
            Operator::Or => "||",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operator::Non => "NON",
            Operator::Len => "LEN",
            Operator::DeepCopy => "DEEP_COPY",
            Operator::Concat => "CONCAT",
            Operator::Spaceship => "SPACESHIP",
            Operator::Elvis => "ELVIS",
            Operator::NullCoalescing => "NULL_COALESCING",
            Operator::InlineIf => "INLINE_IF",
            Operator::GetItem => "GET_ITEM",
            Operator::OptionalGetItem => "OPTIONAL_GET_ITEM",
            Operator::SetItem => "SET_ITEM",
            Operator::MemberAccess => "MEMBER_ACCESS",
            Operator::OptionalMemberAccess => "OPTIONAL_MEMBER_ACCESS",
            Operator::Comma => "COMMA",
            Operator::MathNon => "MATH_NON",
            Operator::Pow => "POW",
            Operator::Pos => "POS",
            Operator::Inv => "INV",
            Operator::BitwiseNot => "BITWISE_NOT",
            Operator::Inc => "INC",
            Operator::Dec => "DEC",
            Operator::Mul => "MUL",
            Operator::Div => "DIV",
            Operator::TruncDiv => "TRUNC_DIV",
            Operator::FloorDiv => "FLOOR_DIV",
            Operator::CeilDiv => "CEIL_DIV",
            Operator::Mod => "MOD",
            Operator::Add => "ADD",
            Operator::Sub => "SUB",
            Operator::Lshift => "LSHIFT",
            Operator::Rshift => "RSHIFT",
            Operator::Rzshift => "RZSHIFT",
            Operator::BitwiseAnd => "BITWISE_AND",
            Operator::BitwiseXor => "BITWISE_XOR",
            Operator::BitwiseOr => "BITWISE_OR",
            Operator::Cast => "CAST",
            Operator::ConditionalNon => "CONDITIONAL_NON",
            Operator::Not => "NOT",
            Operator::InstanceOf => "INSTANCE_OF",
            Operator::Equals => "EQUALS",
            Operator::NotEquals => "NOT_EQUALS",
            Operator::Matches => "MATCHES",
            Operator::NotMatches => "NOT_MATCHES",
            Operator::StrictEquals => "STRICT_EQUALS",
            Operator::StrictNotEquals => "STRICT_NOT_EQUALS",
            Operator::LessThan => "LESS_THAN",
            Operator::GreaterThan => "GREATER_THAN",
            Operator::LessThanOrEquals => "LESS_THAN_OR_EQUALS",
            Operator::GreaterThanOrEquals => "GREATER_THAN_OR_EQUALS",
            Operator::And => "AND",
            Operator::Or => "OR",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Operator::Non
            | Operator::MathNon
            | Operator::ConditionalNon
            | Operator::Len
            | Operator::DeepCopy
            | Operator::Pos
            | Operator::Inv
            | Operator::BitwiseNot
            | Operator::Inc
            | Operator::Dec
            | Operator::Not => Arity::Unary,
            Operator::InlineIf | Operator::SetItem => Arity::Ternary,
            _ => Arity::Binary,
        }
    }

    pub fn is_unary(&self) -> bool {
        self.arity() == Arity::Unary
    }

    pub fn is_binary(&self) -> bool {
        self.arity() == Arity::Binary
    }

    pub fn is_ternary(&self) -> bool {
        self.arity() == Arity::Ternary
    }

    /// Lower values bind tighter.
    pub fn precedence(&self) -> i32 {
        match self {
            Operator::Non | Operator::MathNon | Operator::ConditionalNon => -1,
            Operator::GetItem
            | Operator::OptionalGetItem
            | Operator::SetItem
            | Operator::MemberAccess
            | Operator::OptionalMemberAccess => 0,
            Operator::Pow => 1,
            Operator::Pos
            | Operator::Inv
            | Operator::BitwiseNot
            | Operator::Inc
            | Operator::Dec
            | Operator::Not
            | Operator::Len
            | Operator::DeepCopy
            | Operator::Cast => 2,
            Operator::Mul
            | Operator::Div
            | Operator::TruncDiv
            | Operator::FloorDiv
            | Operator::CeilDiv
            | Operator::Mod => 3,
            Operator::Add | Operator::Sub => 4,
            Operator::Lshift | Operator::Rshift | Operator::Rzshift => 5,
            Operator::BitwiseAnd => 6,
            Operator::BitwiseXor => 7,
            Operator::BitwiseOr => 8,
            Operator::Concat | Operator::Spaceship => 9,
            Operator::LessThan
            | Operator::GreaterThan
            | Operator::LessThanOrEquals
            | Operator::GreaterThanOrEquals
            | Operator::InstanceOf
            | Operator::Matches
            | Operator::NotMatches => 10,
            Operator::Equals
            | Operator::NotEquals
            | Operator::StrictEquals
            | Operator::StrictNotEquals => 11,
            Operator::And => 12,
            Operator::Or => 13,
            Operator::Elvis | Operator::NullCoalescing | Operator::InlineIf => 14,
            Operator::Comma => 15,
        }
    }

    /// Right-associative operators bind an operator of equal precedence on their right side.
    pub fn is_right_associative(&self) -> bool {
        matches!(self, Operator::Pow | Operator::InlineIf)
    }

    pub fn operator_type(&self) -> OperatorType {
        match self {
            Operator::Non
            | Operator::Len
            | Operator::DeepCopy
            | Operator::Concat
            | Operator::Spaceship
            | Operator::Elvis
            | Operator::NullCoalescing
            | Operator::InlineIf => OperatorType::General,
            Operator::GetItem
            | Operator::OptionalGetItem
            | Operator::SetItem
            | Operator::MemberAccess
            | Operator::OptionalMemberAccess
            | Operator::Comma => OperatorType::All,
            Operator::ConditionalNon
            | Operator::Not
            | Operator::InstanceOf
            | Operator::Equals
            | Operator::NotEquals
            | Operator::Matches
            | Operator::NotMatches
            | Operator::StrictEquals
            | Operator::StrictNotEquals
            | Operator::LessThan
            | Operator::GreaterThan
            | Operator::LessThanOrEquals
            | Operator::GreaterThanOrEquals
            | Operator::And
            | Operator::Or => OperatorType::Condition,
            _ => OperatorType::Math,
        }
    }

    /// Name of the user method (`op:<name>`) overloading this operator.
    pub fn method_name(&self) -> Option<&'static str> {
        let name = match self {
            Operator::Len => "op:len",
            Operator::DeepCopy => "op:deepCopy",
            Operator::Concat => "op:concat",
            Operator::Spaceship => "op:spaceship",
            Operator::GetItem | Operator::OptionalGetItem => "op:getItem",
            Operator::SetItem => "op:setItem",
            Operator::Pow => "op:pow",
            Operator::Pos => "op:pos",
            Operator::Inv => "op:inv",
            Operator::BitwiseNot => "op:not",
            Operator::Inc => "op:inc",
            Operator::Dec => "op:dec",
            Operator::Mul => "op:mul",
            Operator::Div => "op:div",
            Operator::TruncDiv => "op:truncDiv",
            Operator::FloorDiv => "op:floorDiv",
            Operator::CeilDiv => "op:ceilDiv",
            Operator::Mod => "op:mod",
            Operator::Add => "op:add",
            Operator::Sub => "op:sub",
            Operator::Lshift => "op:lshift",
            Operator::Rshift => "op:rshift",
            Operator::Rzshift => "op:rzshift",
            Operator::BitwiseAnd => "op:and",
            Operator::BitwiseXor => "op:xor",
            Operator::BitwiseOr => "op:or",
            Operator::Equals | Operator::NotEquals => "op:isEquals",
            Operator::StrictEquals | Operator::StrictNotEquals => "op:isStrictEquals",
            Operator::LessThan => "op:isLessThan",
            Operator::GreaterThan => "op:isGreaterThan",
            _ => return None,
        };

        Some(name)
    }

    /// Name of the reverse overload (`op:r-<name>`) tried on the right operand.
    pub fn reverse_method_name(&self) -> Option<String> {
        match self {
            Operator::Concat
            | Operator::Spaceship
            | Operator::Pow
            | Operator::Mul
            | Operator::Div
            | Operator::TruncDiv
            | Operator::FloorDiv
            | Operator::CeilDiv
            | Operator::Mod
            | Operator::Add
            | Operator::Sub
            | Operator::Lshift
            | Operator::Rshift
            | Operator::Rzshift
            | Operator::BitwiseAnd
            | Operator::BitwiseXor
            | Operator::BitwiseOr => self
                .method_name()
                .map(|name| format!("op:r-{}", &name["op:".len()..])),
            _ => None,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
