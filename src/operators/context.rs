use std::rc::Rc;

use crate::{errors::errors::InterpretingError, CodePosition};

use super::value::{FunctionPointer, LangObject, Value};

/// Outcome of applying an operator to already evaluated operands.
#[derive(Debug, Clone)]
pub enum OperationResult {
    Applied(Value),
    /// The operator has no meaning for the operand types
    NotApplicable,
    Failed(InterpretingError, Option<String>),
}

impl OperationResult {
    pub fn failed(error: InterpretingError, message: impl Into<String>) -> Self {
        OperationResult::Failed(error, Some(message.into()))
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, OperationResult::Applied(_))
    }
}

impl From<Option<Value>> for OperationResult {
    fn from(value: Option<Value>) -> Self {
        match value {
            Some(value) => OperationResult::Applied(value),
            None => OperationResult::NotApplicable,
        }
    }
}

/// Capabilities the operator engine needs from the interpreter.
pub trait OperatorContext {
    /// Overloads of `name` declared by `object`, in declaration order.
    fn find_methods(&self, object: &LangObject, name: &str) -> Vec<Rc<FunctionPointer>> {
        object.methods(name).to_vec()
    }

    /// Runs a native or defined function. `None` if it produced no value.
    fn execute_function(
        &mut self,
        function: &FunctionPointer,
        this: Option<&Value>,
        arguments: Vec<Value>,
    ) -> Option<Value>;

    fn error(&mut self, error: InterpretingError, message: Option<String>) -> Value {
        Value::error(error, message)
    }

    fn position(&self) -> CodePosition;
}
