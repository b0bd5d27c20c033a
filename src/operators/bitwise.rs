use crate::ast::operators::Operator;

use super::{
    context::{OperationResult, OperatorContext},
    function::call_function_pointer,
    value::Value,
};

fn shift_amount(value: &Value) -> Option<u32> {
    match value {
        Value::Int(value) => Some(*value as u32),
        Value::Long(value) => Some(*value as u32),
        _ => None,
    }
}

fn shift(operator: Operator, left: &Value, right: &Value) -> OperationResult {
    let Some(amount) = shift_amount(right) else {
        return OperationResult::NotApplicable;
    };

    let value = match (operator, left) {
        (Operator::Lshift, Value::Int(value)) => Value::Int(value.wrapping_shl(amount)),
        (Operator::Lshift, Value::Long(value)) => Value::Long(value.wrapping_shl(amount)),
        (Operator::Rshift, Value::Int(value)) => Value::Int(value.wrapping_shr(amount)),
        (Operator::Rshift, Value::Long(value)) => Value::Long(value.wrapping_shr(amount)),
        (Operator::Rzshift, Value::Int(value)) => {
            Value::Int((*value as u32).wrapping_shr(amount) as i32)
        }
        (Operator::Rzshift, Value::Long(value)) => {
            Value::Long((*value as u64).wrapping_shr(amount) as i64)
        }
        _ => return OperationResult::NotApplicable,
    };

    OperationResult::Applied(value)
}

fn logical(operator: Operator, left: &Value, right: &Value) -> OperationResult {
    let (l, r, long) = match (left, right) {
        (Value::Int(l), Value::Int(r)) => (i64::from(*l), i64::from(*r), false),
        (Value::Int(l), Value::Long(r)) => (i64::from(*l), *r, true),
        (Value::Long(l), Value::Int(r)) => (*l, i64::from(*r), true),
        (Value::Long(l), Value::Long(r)) => (*l, *r, true),
        _ => return OperationResult::NotApplicable,
    };

    let value = match operator {
        Operator::BitwiseAnd => l & r,
        Operator::BitwiseXor => l ^ r,
        Operator::BitwiseOr => l | r,
        _ => return OperationResult::NotApplicable,
    };

    OperationResult::Applied(if long {
        Value::Long(value)
    } else {
        Value::Int(value as i32)
    })
}

/// `value | fp.f` and `value >> fp.f` call the function with the value.
fn pipe(context: &mut dyn OperatorContext, left: &Value, right: &Value) -> OperationResult {
    match right {
        Value::FunctionPointer(function) => OperationResult::Applied(call_function_pointer(
            context,
            function,
            None,
            vec![left.clone()],
        )),
        _ => OperationResult::NotApplicable,
    }
}

pub fn binary_bitwise(
    context: &mut dyn OperatorContext,
    operator: Operator,
    left: &Value,
    right: &Value,
) -> OperationResult {
    match operator {
        Operator::BitwiseOr | Operator::Rshift if matches!(right, Value::FunctionPointer(_)) => {
            pipe(context, left, right)
        }
        Operator::Lshift | Operator::Rshift | Operator::Rzshift => shift(operator, left, right),
        _ => logical(operator, left, right),
    }
}

pub fn bitwise_not(operand: &Value) -> OperationResult {
    match operand {
        Value::Int(value) => OperationResult::Applied(Value::Int(!value)),
        Value::Long(value) => OperationResult::Applied(Value::Long(!value)),
        _ => OperationResult::NotApplicable,
    }
}
