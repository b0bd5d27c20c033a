use crate::ast::operators::Operator;

use super::{
    context::OperatorContext,
    conversion::to_bool,
    function::{call_function_pointer, select_overload},
    value::Value,
};

fn call_method(
    context: &mut dyn OperatorContext,
    object: &Value,
    name: &str,
    arguments: Vec<Value>,
) -> Option<Value> {
    let instance = object.as_object_instance()?;
    let overloads = context.find_methods(instance, name);
    let function = select_overload(&overloads, &arguments)?.clone();

    Some(call_function_pointer(
        context,
        &function,
        Some(object),
        arguments,
    ))
}

/// Runs a user defined overload of `operator`, if an operand declares one.
///
/// The left operand is asked for `op:<name>` first, then the right operand
/// for `op:r-<name>`. Casts ask the value for `to:<type>`.
pub fn dispatch_overload(
    context: &mut dyn OperatorContext,
    operator: Operator,
    operands: &[Value],
) -> Option<Value> {
    if operator == Operator::Cast {
        let [Value::Type(data_type), value] = operands else {
            return None;
        };
        let name = data_type.conversion_method_name()?;
        return call_method(context, value, name, vec![]);
    }

    let (first, rest) = operands.split_first()?;

    let result = operator
        .method_name()
        .and_then(|name| call_method(context, first, name, rest.to_vec()))
        .or_else(|| match (operator.reverse_method_name(), operands) {
            (Some(name), [left, right]) => call_method(context, right, &name, vec![left.clone()]),
            _ => None,
        })?;

    match operator {
        Operator::NotEquals | Operator::StrictNotEquals if !result.is_error() => {
            Some(Value::bool(!to_bool(&result)))
        }
        _ => Some(result),
    }
}
