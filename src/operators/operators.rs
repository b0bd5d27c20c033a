use crate::{ast::operators::Operator, errors::errors::InterpretingError};

use super::{
    arithmetic::{binary_arithmetic, unary_arithmetic},
    bitwise::{binary_bitwise, bitwise_not},
    collection::{concat, deep_copy, get_item, length, member_access, set_item},
    comparison::compare,
    context::{OperationResult, OperatorContext},
    conversion::{convert, to_bool},
    overload::dispatch_overload,
    value::Value,
};

fn cast(operands: &[Value]) -> OperationResult {
    match operands {
        [Value::Type(data_type), value] => convert(value, *data_type).into(),
        _ => OperationResult::NotApplicable,
    }
}

fn unary(operator: Operator, operand: &Value) -> OperationResult {
    match operator {
        Operator::Non | Operator::MathNon => OperationResult::Applied(operand.clone()),
        Operator::ConditionalNon => OperationResult::Applied(Value::bool(to_bool(operand))),
        Operator::Not => OperationResult::Applied(Value::bool(!to_bool(operand))),
        Operator::Len => length(operand),
        Operator::DeepCopy => deep_copy(operand),
        Operator::BitwiseNot => bitwise_not(operand),
        Operator::Pos | Operator::Inv | Operator::Inc | Operator::Dec => {
            unary_arithmetic(operator, operand)
        }
        _ => OperationResult::NotApplicable,
    }
}

fn binary(
    context: &mut dyn OperatorContext,
    operator: Operator,
    left: &Value,
    right: &Value,
) -> OperationResult {
    match operator {
        Operator::Concat => concat(left, right),
        Operator::Elvis => OperationResult::Applied(if to_bool(left) {
            left.clone()
        } else {
            right.clone()
        }),
        Operator::NullCoalescing => OperationResult::Applied(if left.is_null_or_void() {
            right.clone()
        } else {
            left.clone()
        }),
        Operator::GetItem => get_item(left, right),
        Operator::OptionalGetItem if left.is_null_or_void() => OperationResult::Applied(Value::Void),
        Operator::OptionalGetItem => get_item(left, right),
        Operator::MemberAccess => member_access(left, right),
        Operator::OptionalMemberAccess if left.is_null_or_void() => {
            OperationResult::Applied(Value::Void)
        }
        Operator::OptionalMemberAccess => member_access(left, right),
        Operator::Comma => OperationResult::failed(
            InterpretingError::InvalidAstNode,
            "\",\" is only valid between arguments",
        ),
        Operator::Pow
        | Operator::Mul
        | Operator::Div
        | Operator::TruncDiv
        | Operator::FloorDiv
        | Operator::CeilDiv
        | Operator::Mod
        | Operator::Add
        | Operator::Sub => binary_arithmetic(operator, left, right),
        Operator::Lshift
        | Operator::Rshift
        | Operator::Rzshift
        | Operator::BitwiseAnd
        | Operator::BitwiseXor
        | Operator::BitwiseOr => binary_bitwise(context, operator, left, right),
        _ => compare(context, operator, left, right),
    }
}

/// Applies `operator` to evaluated operands.
///
/// User defined overloads of object operands take precedence over the
/// built-in behaviour.
pub fn apply_operator(
    context: &mut dyn OperatorContext,
    operator: Operator,
    operands: &[Value],
) -> OperationResult {
    if let Some(value) = dispatch_overload(context, operator, operands) {
        return OperationResult::Applied(value);
    }

    if operator == Operator::Cast {
        return cast(operands);
    }

    match operands {
        [operand] if operator.is_unary() => unary(operator, operand),
        [left, right] if operator.is_binary() => binary(context, operator, left, right),
        [condition, if_true, if_false] if operator == Operator::InlineIf => {
            OperationResult::Applied(if to_bool(condition) {
                if_true.clone()
            } else {
                if_false.clone()
            })
        }
        [target, index, value] if operator == Operator::SetItem => set_item(target, index, value),
        _ => OperationResult::failed(
            InterpretingError::InvalidArgCount,
            format!(
                "{} operands are not valid for operator \"{}\"",
                operands.len(),
                operator
            ),
        ),
    }
}

/// Like [`apply_operator`], but reports failures as error values through
/// the context. Casts without a conversion result in `null`.
pub fn evaluate_operator(
    context: &mut dyn OperatorContext,
    operator: Operator,
    operands: &[Value],
) -> Value {
    match apply_operator(context, operator, operands) {
        OperationResult::Applied(value) => value,
        OperationResult::NotApplicable if operator == Operator::Cast => Value::Null,
        OperationResult::NotApplicable => {
            let types = operands
                .iter()
                .map(|operand| operand.data_type().name())
                .collect::<Vec<_>>();
            let message = format!(
                "operator \"{}\" is not defined for {}",
                operator.symbol(),
                types.join(", ")
            );
            context.error(InterpretingError::InvalidArguments, Some(message))
        }
        OperationResult::Failed(error, message) => context.error(error, message),
    }
}
