use std::rc::Rc;

use crate::errors::errors::InterpretingError;

use super::{
    context::OperatorContext,
    value::{FunctionKind, FunctionPointer, Value},
};

/// Calls `function`, unwrapping composed function pointers. Functions
/// without a result return `Void`.
pub fn call_function_pointer(
    context: &mut dyn OperatorContext,
    function: &Rc<FunctionPointer>,
    this: Option<&Value>,
    arguments: Vec<Value>,
) -> Value {
    match &function.kind {
        FunctionKind::Native(_) | FunctionKind::Defined(_) => context
            .execute_function(function, this, arguments)
            .unwrap_or(Value::Void),
        FunctionKind::Chain(first, second) => {
            let value = call_function_pointer(context, first, this, arguments);
            if value.is_error() {
                return value;
            }

            call_function_pointer(context, second, this, vec![value])
        }
        FunctionKind::Power(function, count) => {
            if *count == 0 {
                return match <[Value; 1]>::try_from(arguments) {
                    Ok([value]) => value,
                    Err(_) => Value::Void,
                };
            }

            let mut value = call_function_pointer(context, function, this, arguments);
            for _ in 1..*count {
                if value.is_error() {
                    break;
                }
                value = call_function_pointer(context, function, this, vec![value]);
            }

            value
        }
        FunctionKind::AutoUnpack(function) => match arguments.as_slice() {
            [Value::Array(elements) | Value::List(elements)] => {
                let elements = elements.borrow().clone();
                call_function_pointer(context, function, this, elements)
            }
            _ => context.error(
                InterpretingError::InvalidArguments,
                Some(String::from("exactly one array argument is required")),
            ),
        },
        FunctionKind::AutoPack(function) => {
            call_function_pointer(context, function, this, vec![Value::array(arguments)])
        }
    }
}

/// Picks the overload accepting `arguments` with the narrowest parameter
/// constraints. Ties go to the overload declared first.
pub fn select_overload<'a>(
    overloads: &'a [Rc<FunctionPointer>],
    arguments: &[Value],
) -> Option<&'a Rc<FunctionPointer>> {
    overloads
        .iter()
        .filter(|function| function.accepts(arguments))
        .min_by_key(|function| function.specificity())
}
