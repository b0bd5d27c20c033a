use std::fmt::Display;

use thiserror::Error;

use crate::CodePosition;

/// Syntax errors embedded in the AST as `ParsingErrorNode`s.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParsingError {
    #[error("bracket is missing")]
    BracketMismatch,
    #[error("control flow statement is missing an argument")]
    ContFlowArgMissing,
    #[error("end of file was reached early")]
    Eof,
    #[error("invalid control flow statement part")]
    InvalidConPart,
    #[error("invalid assignment")]
    InvalidAssignment,
    #[error("invalid function parameter")]
    InvalidParameter,
    #[error("error during lexical parsing")]
    LexerError,
}

impl ParsingError {
    pub fn error_code(&self) -> i32 {
        match self {
            ParsingError::BracketMismatch => -1,
            ParsingError::ContFlowArgMissing => -2,
            ParsingError::Eof => -3,
            ParsingError::InvalidConPart => -4,
            ParsingError::InvalidAssignment => -5,
            ParsingError::InvalidParameter => -6,
            ParsingError::LexerError => -7,
        }
    }

    pub fn get_error_name(&self) -> &'static str {
        match self {
            ParsingError::BracketMismatch => "BRACKET_MISMATCH",
            ParsingError::ContFlowArgMissing => "CONT_FLOW_ARG_MISSING",
            ParsingError::Eof => "EOF",
            ParsingError::InvalidConPart => "INVALID_CON_PART",
            ParsingError::InvalidAssignment => "INVALID_ASSIGNMENT",
            ParsingError::InvalidParameter => "INVALID_PARAMETER",
            ParsingError::LexerError => "LEXER_ERROR",
        }
    }
}

/// Language-level runtime errors, carried by `Value::Error` and `OperationResult::Failed`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterpretingError {
    #[error("invalid AST node or AST node order")]
    InvalidAstNode,
    #[error("invalid assignment")]
    InvalidAssignment,
    #[error("invalid arguments")]
    InvalidArguments,
    #[error("function not found or not yet implemented")]
    FunctionNotFound,
    #[error("division by zero")]
    DivByZero,
    #[error("index out of bounds")]
    IndexOutOfBounds,
    #[error("incompatible data type")]
    IncompatibleDataType,
    #[error("invalid array pointer")]
    InvalidArrPtr,
    #[error("invalid function pointer")]
    InvalidFuncPtr,
    #[error("invalid argument count")]
    InvalidArgCount,
    #[error("invalid regex syntax")]
    InvalidRegexSyntax,
    #[error("number is expected")]
    NoNum,
    #[error("invalid function parameter")]
    InvalidParameter,
    #[error("stack overflow")]
    StackOverflow,
}

impl InterpretingError {
    pub fn error_code(&self) -> i32 {
        match self {
            InterpretingError::InvalidAstNode => 1,
            InterpretingError::InvalidAssignment => 2,
            InterpretingError::InvalidArguments => 3,
            InterpretingError::FunctionNotFound => 4,
            InterpretingError::DivByZero => 5,
            InterpretingError::IndexOutOfBounds => 6,
            InterpretingError::IncompatibleDataType => 7,
            InterpretingError::InvalidArrPtr => 8,
            InterpretingError::InvalidFuncPtr => 9,
            InterpretingError::InvalidArgCount => 10,
            InterpretingError::InvalidRegexSyntax => 11,
            InterpretingError::NoNum => 12,
            InterpretingError::InvalidParameter => 13,
            InterpretingError::StackOverflow => 14,
        }
    }

    pub fn get_error_name(&self) -> &'static str {
        match self {
            InterpretingError::InvalidAstNode => "INVALID_AST_NODE",
            InterpretingError::InvalidAssignment => "INVALID_ASSIGNMENT",
            InterpretingError::InvalidArguments => "INVALID_ARGUMENTS",
            InterpretingError::FunctionNotFound => "FUNCTION_NOT_FOUND",
            InterpretingError::DivByZero => "DIV_BY_ZERO",
            InterpretingError::IndexOutOfBounds => "INDEX_OUT_OF_BOUNDS",
            InterpretingError::IncompatibleDataType => "INCOMPATIBLE_DATA_TYPE",
            InterpretingError::InvalidArrPtr => "INVALID_ARR_PTR",
            InterpretingError::InvalidFuncPtr => "INVALID_FUNC_PTR",
            InterpretingError::InvalidArgCount => "INVALID_ARG_COUNT",
            InterpretingError::InvalidRegexSyntax => "INVALID_REGEX_SYNTAX",
            InterpretingError::NoNum => "NO_NUM",
            InterpretingError::InvalidParameter => "INVALID_PARAMETER",
            InterpretingError::StackOverflow => "STACK_OVERFLOW",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: CodePosition,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: CodePosition) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &CodePosition {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::Parsing { error, .. } => error.get_error_name(),
            ErrorImpl::Interpreting { error, .. } => error.get_error_name(),
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::Parsing { message, .. } if message.is_empty() => ErrorTip::None,
            ErrorImpl::Parsing { message, .. } => ErrorTip::Suggestion(message.clone()),
            ErrorImpl::Interpreting {
                error,
                message: None,
            } => ErrorTip::Suggestion(error.to_string()),
            ErrorImpl::Interpreting {
                error,
                message: Some(message),
            } => ErrorTip::Suggestion(format!("{}: {}", error, message)),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorImpl {
    #[error("parsing error {error} ({}): {message}", error.error_code())]
    Parsing { error: ParsingError, message: String },
    #[error("interpreting error {error} ({})", error.error_code())]
    Interpreting {
        error: InterpretingError,
        message: Option<String>,
    },
}
