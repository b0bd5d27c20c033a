use std::rc::Rc;

use crate::{ast::operators::Operator, errors::errors::InterpretingError};

use super::{
    context::OperationResult,
    value::{FunctionPointer, Value},
};

/// Both operands of a numeric operation, promoted to their common type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberPair {
    Int(i32, i32),
    Long(i64, i64),
    Float(f32, f32),
    Double(f64, f64),
}

/// Promotion table for the sixteen combinations of numeric operand types.
pub fn promote(left: &Value, right: &Value) -> Option<NumberPair> {
    let pair = match (left, right) {
        (Value::Int(l), Value::Int(r)) => NumberPair::Int(*l, *r),
        (Value::Int(l), Value::Long(r)) => NumberPair::Long(i64::from(*l), *r),
        (Value::Int(l), Value::Float(r)) => NumberPair::Float(*l as f32, *r),
        (Value::Int(l), Value::Double(r)) => NumberPair::Double(f64::from(*l), *r),

        (Value::Long(l), Value::Int(r)) => NumberPair::Long(*l, i64::from(*r)),
        (Value::Long(l), Value::Long(r)) => NumberPair::Long(*l, *r),
        (Value::Long(l), Value::Float(r)) => NumberPair::Float(*l as f32, *r),
        (Value::Long(l), Value::Double(r)) => NumberPair::Double(*l as f64, *r),

        (Value::Float(l), Value::Int(r)) => NumberPair::Float(*l, *r as f32),
        (Value::Float(l), Value::Long(r)) => NumberPair::Float(*l, *r as f32),
        (Value::Float(l), Value::Float(r)) => NumberPair::Float(*l, *r),
        (Value::Float(l), Value::Double(r)) => NumberPair::Double(f64::from(*l), *r),

        (Value::Double(l), Value::Int(r)) => NumberPair::Double(*l, f64::from(*r)),
        (Value::Double(l), Value::Long(r)) => NumberPair::Double(*l, *r as f64),
        (Value::Double(l), Value::Float(r)) => NumberPair::Double(*l, f64::from(*r)),
        (Value::Double(l), Value::Double(r)) => NumberPair::Double(*l, *r),

        _ => return None,
    };

    Some(pair)
}

fn div_by_zero() -> OperationResult {
    OperationResult::failed(InterpretingError::DivByZero, "the denominator is zero")
}

macro_rules! integral_division {
    ($l:expr, $r:expr, $variant:ident, $round:expr) => {{
        let (l, r) = ($l, $r);
        if r == 0 {
            return div_by_zero();
        }

        let quotient = l.wrapping_div(r);
        let remainder = l.wrapping_rem(r);
        OperationResult::Applied(Value::$variant($round(quotient, remainder, (l < 0) != (r < 0))))
    }};
}

fn truncate<T>(quotient: T, _remainder: T, _negative: bool) -> T {
    quotient
}

fn floor_i32(quotient: i32, remainder: i32, negative: bool) -> i32 {
    if remainder != 0 && negative {
        quotient.wrapping_sub(1)
    } else {
        quotient
    }
}

fn floor_i64(quotient: i64, remainder: i64, negative: bool) -> i64 {
    if remainder != 0 && negative {
        quotient.wrapping_sub(1)
    } else {
        quotient
    }
}

fn ceil_i32(quotient: i32, remainder: i32, negative: bool) -> i32 {
    if remainder != 0 && !negative {
        quotient.wrapping_add(1)
    } else {
        quotient
    }
}

fn ceil_i64(quotient: i64, remainder: i64, negative: bool) -> i64 {
    if remainder != 0 && !negative {
        quotient.wrapping_add(1)
    } else {
        quotient
    }
}

/// `/`: exact integral quotients stay integral, everything else is `Double`.
/// Integral division by zero yields infinity or NaN.
fn divide(pair: NumberPair) -> OperationResult {
    let value = match pair {
        NumberPair::Int(l, r) if r != 0 && l.wrapping_rem(r) == 0 => Value::Int(l.wrapping_div(r)),
        NumberPair::Int(l, r) => Value::Double(f64::from(l) / f64::from(r)),
        NumberPair::Long(l, r) if r != 0 && l.wrapping_rem(r) == 0 => {
            Value::Long(l.wrapping_div(r))
        }
        NumberPair::Long(l, r) => Value::Double(l as f64 / r as f64),
        NumberPair::Float(l, r) => Value::Float(l / r),
        NumberPair::Double(l, r) => Value::Double(l / r),
    };

    OperationResult::Applied(value)
}

fn rounded_division(operator: Operator, pair: NumberPair) -> OperationResult {
    match (operator, pair) {
        (Operator::TruncDiv, NumberPair::Int(l, r)) => integral_division!(l, r, Int, truncate),
        (Operator::TruncDiv, NumberPair::Long(l, r)) => integral_division!(l, r, Long, truncate),
        (Operator::FloorDiv, NumberPair::Int(l, r)) => integral_division!(l, r, Int, floor_i32),
        (Operator::FloorDiv, NumberPair::Long(l, r)) => integral_division!(l, r, Long, floor_i64),
        (Operator::CeilDiv, NumberPair::Int(l, r)) => integral_division!(l, r, Int, ceil_i32),
        (Operator::CeilDiv, NumberPair::Long(l, r)) => integral_division!(l, r, Long, ceil_i64),
        (_, NumberPair::Float(_, r)) if r == 0.0 => div_by_zero(),
        (_, NumberPair::Double(_, r)) if r == 0.0 => div_by_zero(),
        (operator, NumberPair::Float(l, r)) => {
            let quotient = l / r;
            OperationResult::Applied(Value::Float(match operator {
                Operator::FloorDiv => quotient.floor(),
                Operator::CeilDiv => quotient.ceil(),
                _ => quotient.trunc(),
            }))
        }
        (operator, NumberPair::Double(l, r)) => {
            let quotient = l / r;
            OperationResult::Applied(Value::Double(match operator {
                Operator::FloorDiv => quotient.floor(),
                Operator::CeilDiv => quotient.ceil(),
                _ => quotient.trunc(),
            }))
        }
        _ => OperationResult::NotApplicable,
    }
}

fn modulo(pair: NumberPair) -> OperationResult {
    let value = match pair {
        NumberPair::Int(_, 0) | NumberPair::Long(_, 0) => return div_by_zero(),
        NumberPair::Float(_, r) if r == 0.0 => return div_by_zero(),
        NumberPair::Double(_, r) if r == 0.0 => return div_by_zero(),
        NumberPair::Int(l, r) => Value::Int(l.wrapping_rem(r)),
        NumberPair::Long(l, r) => Value::Long(l.wrapping_rem(r)),
        NumberPair::Float(l, r) => Value::Float(l % r),
        NumberPair::Double(l, r) => Value::Double(l % r),
    };

    OperationResult::Applied(value)
}

/// Integral powers stay integral while the exponent is non-negative and the
/// result fits, everything else is computed in `Double`.
fn power(pair: NumberPair) -> Value {
    match pair {
        NumberPair::Int(l, r) => u32::try_from(r)
            .ok()
            .and_then(|r| l.checked_pow(r))
            .map(Value::Int)
            .unwrap_or_else(|| Value::Double(f64::from(l).powf(f64::from(r)))),
        NumberPair::Long(l, r) => u32::try_from(r)
            .ok()
            .and_then(|r| l.checked_pow(r))
            .map(Value::Long)
            .unwrap_or_else(|| Value::Double((l as f64).powf(r as f64))),
        NumberPair::Float(l, r) => Value::Float(l.powf(r)),
        NumberPair::Double(l, r) => Value::Double(l.powf(r)),
    }
}

fn function_power(function: &Rc<FunctionPointer>, count: &Value) -> OperationResult {
    let count = match count {
        Value::Int(count) => i64::from(*count),
        Value::Long(count) => *count,
        _ => return OperationResult::NotApplicable,
    };

    match u32::try_from(count) {
        Ok(count) => OperationResult::Applied(Value::FunctionPointer(Rc::new(
            FunctionPointer::power(function.clone(), count),
        ))),
        Err(_) => OperationResult::failed(
            InterpretingError::InvalidArguments,
            "the number of calls must not be negative",
        ),
    }
}

pub fn binary_arithmetic(operator: Operator, left: &Value, right: &Value) -> OperationResult {
    if let (Operator::Pow, Value::FunctionPointer(function)) = (operator, left) {
        return function_power(function, right);
    }

    let Some(pair) = promote(left, right) else {
        return OperationResult::NotApplicable;
    };

    let value = match (operator, pair) {
        (Operator::Add, NumberPair::Int(l, r)) => Value::Int(l.wrapping_add(r)),
        (Operator::Add, NumberPair::Long(l, r)) => Value::Long(l.wrapping_add(r)),
        (Operator::Add, NumberPair::Float(l, r)) => Value::Float(l + r),
        (Operator::Add, NumberPair::Double(l, r)) => Value::Double(l + r),

        (Operator::Sub, NumberPair::Int(l, r)) => Value::Int(l.wrapping_sub(r)),
        (Operator::Sub, NumberPair::Long(l, r)) => Value::Long(l.wrapping_sub(r)),
        (Operator::Sub, NumberPair::Float(l, r)) => Value::Float(l - r),
        (Operator::Sub, NumberPair::Double(l, r)) => Value::Double(l - r),

        (Operator::Mul, NumberPair::Int(l, r)) => Value::Int(l.wrapping_mul(r)),
        (Operator::Mul, NumberPair::Long(l, r)) => Value::Long(l.wrapping_mul(r)),
        (Operator::Mul, NumberPair::Float(l, r)) => Value::Float(l * r),
        (Operator::Mul, NumberPair::Double(l, r)) => Value::Double(l * r),

        (Operator::Pow, pair) => power(pair),
        (Operator::Div, pair) => return divide(pair),
        (Operator::TruncDiv | Operator::FloorDiv | Operator::CeilDiv, pair) => {
            return rounded_division(operator, pair)
        }
        (Operator::Mod, pair) => return modulo(pair),

        _ => return OperationResult::NotApplicable,
    };

    OperationResult::Applied(value)
}

fn step_char(value: char, forward: bool) -> OperationResult {
    let code = value as u32;
    let code = if forward {
        code.wrapping_add(1)
    } else {
        code.wrapping_sub(1)
    };

    match char::from_u32(code) {
        Some(value) => OperationResult::Applied(Value::Char(value)),
        None => OperationResult::failed(
            InterpretingError::InvalidArguments,
            format!("U+{:X} is not a valid character", code),
        ),
    }
}

fn reversed(elements: &[Value]) -> Vec<Value> {
    elements.iter().rev().cloned().collect()
}

pub fn unary_arithmetic(operator: Operator, operand: &Value) -> OperationResult {
    let value = match (operator, operand) {
        (Operator::Pos, Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Double(_)) => {
            operand.clone()
        }
        (Operator::Pos, Value::Char(_) | Value::Text(_)) => operand.clone(),
        (Operator::Pos, Value::ByteBuffer(bytes)) => Value::byte_buffer(bytes.borrow().clone()),
        (Operator::Pos, Value::Array(elements)) => Value::array(elements.borrow().clone()),
        (Operator::Pos, Value::List(elements)) => Value::list(elements.borrow().clone()),

        (Operator::Inv, Value::Int(value)) => Value::Int(value.wrapping_neg()),
        (Operator::Inv, Value::Long(value)) => Value::Long(value.wrapping_neg()),
        (Operator::Inv, Value::Float(value)) => Value::Float(-value),
        (Operator::Inv, Value::Double(value)) => Value::Double(-value),
        (Operator::Inv, Value::Text(value)) => Value::text(value.chars().rev().collect::<String>()),
        (Operator::Inv, Value::ByteBuffer(bytes)) => {
            Value::byte_buffer(bytes.borrow().iter().rev().copied().collect())
        }
        (Operator::Inv, Value::Array(elements)) => Value::array(reversed(&elements.borrow())),
        (Operator::Inv, Value::List(elements)) => Value::list(reversed(&elements.borrow())),

        (Operator::Inc, Value::Int(value)) => Value::Int(value.wrapping_add(1)),
        (Operator::Inc, Value::Long(value)) => Value::Long(value.wrapping_add(1)),
        (Operator::Inc, Value::Float(value)) => Value::Float(value + 1.0),
        (Operator::Inc, Value::Double(value)) => Value::Double(value + 1.0),
        (Operator::Inc, Value::Char(value)) => return step_char(*value, true),
        (Operator::Inc, Value::FunctionPointer(function)) => {
            Value::FunctionPointer(Rc::new(FunctionPointer::auto_unpack(function.clone())))
        }

        (Operator::Dec, Value::Int(value)) => Value::Int(value.wrapping_sub(1)),
        (Operator::Dec, Value::Long(value)) => Value::Long(value.wrapping_sub(1)),
        (Operator::Dec, Value::Float(value)) => Value::Float(value - 1.0),
        (Operator::Dec, Value::Double(value)) => Value::Double(value - 1.0),
        (Operator::Dec, Value::Char(value)) => return step_char(*value, false),
        (Operator::Dec, Value::FunctionPointer(function)) => {
            Value::FunctionPointer(Rc::new(FunctionPointer::auto_pack(function.clone())))
        }

        _ => return OperationResult::NotApplicable,
    };

    OperationResult::Applied(value)
}
