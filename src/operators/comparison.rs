use std::rc::Rc;

use regex::Regex;

use crate::{ast::operators::Operator, errors::errors::InterpretingError};

use super::{
    arithmetic::{promote, NumberPair},
    context::{OperationResult, OperatorContext},
    conversion::{parse_number, to_bool, to_text},
    overload::dispatch_overload,
    value::Value,
};

fn numbers_equal(pair: NumberPair) -> bool {
    match pair {
        NumberPair::Int(l, r) => l == r,
        NumberPair::Long(l, r) => l == r,
        NumberPair::Float(l, r) => l == r,
        NumberPair::Double(l, r) => l == r,
    }
}

fn numbers_less_than(pair: NumberPair) -> bool {
    match pair {
        NumberPair::Int(l, r) => l < r,
        NumberPair::Long(l, r) => l < r,
        NumberPair::Float(l, r) => l < r,
        NumberPair::Double(l, r) => l < r,
    }
}

/// Numeric view for mixed comparisons: chars by code point, text parsed.
fn numeric_operand(value: &Value) -> Option<Value> {
    match value {
        Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Double(_) => Some(value.clone()),
        Value::Char(value) => Some(Value::Int(*value as i32)),
        Value::Text(value) => parse_number(value),
        _ => None,
    }
}

fn elements_equal(left: &[Value], right: &[Value], strict: bool) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right.iter())
            .all(|(l, r)| values_equal(l, r, strict))
}

/// `==` without overloads. Strict equality additionally requires equal types.
pub fn values_equal(left: &Value, right: &Value, strict: bool) -> bool {
    if strict && left.data_type() != right.data_type() {
        return false;
    }

    match (left, right) {
        (Value::Text(l), Value::Text(r)) => l == r,
        (Value::Text(text), Value::Char(c)) | (Value::Char(c), Value::Text(text)) => {
            let mut chars = text.chars();
            chars.next() == Some(*c) && chars.next().is_none()
        }
        (Value::ByteBuffer(l), Value::ByteBuffer(r)) => *l.borrow() == *r.borrow(),
        (Value::Array(l) | Value::List(l), Value::Array(r) | Value::List(r)) => {
            Rc::ptr_eq(l, r) || elements_equal(&l.borrow(), &r.borrow(), strict)
        }
        (Value::FunctionPointer(l), Value::FunctionPointer(r)) => Rc::ptr_eq(l, r),
        (Value::Struct(l), Value::Struct(r)) => {
            Rc::ptr_eq(l, r)
                || (l.definition == r.definition
                    && match (&l.fields, &r.fields) {
                        (Some(l), Some(r)) => elements_equal(&l.borrow(), &r.borrow(), strict),
                        (None, None) => true,
                        _ => false,
                    })
        }
        (Value::Object(l), Value::Object(r)) => Rc::ptr_eq(l, r),
        (Value::Error(l), Value::Error(r)) => l.error == r.error,
        (Value::Null, Value::Null) | (Value::Void, Value::Void) => true,
        (Value::Type(l), Value::Type(r)) => l == r,
        (Value::VarPointer(l), Value::VarPointer(r)) => Rc::ptr_eq(l, r),
        _ => match (numeric_operand(left), numeric_operand(right)) {
            (Some(l), Some(r)) => promote(&l, &r).is_some_and(numbers_equal),
            _ => false,
        },
    }
}

/// `<` without overloads. Undefined comparisons are `false`.
pub fn value_less_than(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Text(l), Value::Text(r)) => l < r,
        (Value::Char(l), Value::Char(r)) => l < r,
        _ => match (numeric_operand(left), numeric_operand(right)) {
            (Some(l), Some(r)) => promote(&l, &r).is_some_and(numbers_less_than),
            _ => false,
        },
    }
}

fn overloaded_or(
    context: &mut dyn OperatorContext,
    operator: Operator,
    left: &Value,
    right: &Value,
    builtin: impl Fn(&Value, &Value) -> bool,
) -> bool {
    match dispatch_overload(context, operator, &[left.clone(), right.clone()]) {
        Some(result) => to_bool(&result),
        None => builtin(left, right),
    }
}

fn is_equal(context: &mut dyn OperatorContext, left: &Value, right: &Value) -> bool {
    overloaded_or(context, Operator::Equals, left, right, |l, r| {
        values_equal(l, r, false)
    })
}

fn is_less_than(context: &mut dyn OperatorContext, left: &Value, right: &Value) -> bool {
    overloaded_or(context, Operator::LessThan, left, right, value_less_than)
}

fn is_greater_than(context: &mut dyn OperatorContext, left: &Value, right: &Value) -> bool {
    overloaded_or(context, Operator::GreaterThan, left, right, |l, r| {
        value_less_than(r, l)
    })
}

/// `<=>`: `-1`, `0` or `1` if exactly one relation holds, `null` otherwise.
fn spaceship(context: &mut dyn OperatorContext, left: &Value, right: &Value) -> Value {
    let less = is_less_than(context, left, right);
    let equal = is_equal(context, left, right);
    let greater = is_greater_than(context, left, right);

    match (less, equal, greater) {
        (true, false, false) => Value::Int(-1),
        (false, true, false) => Value::Int(0),
        (false, false, true) => Value::Int(1),
        _ => Value::Null,
    }
}

fn instance_of(left: &Value, right: &Value) -> OperationResult {
    let result = match right {
        Value::Type(data_type) => left.data_type() == *data_type,
        Value::Struct(definition) if !definition.is_instance() => match left {
            Value::Struct(value) => {
                value.is_instance() && value.definition == definition.definition
            }
            _ => false,
        },
        Value::Object(class) if class.is_class => match left {
            Value::Object(object) => !object.is_class && object.is_instance_of(class),
            _ => false,
        },
        _ => return OperationResult::NotApplicable,
    };

    OperationResult::Applied(Value::bool(result))
}

fn regex_match(left: &Value, right: &Value) -> Result<bool, OperationResult> {
    let Value::Text(pattern) = right else {
        return Err(OperationResult::NotApplicable);
    };

    let regex = Regex::new(pattern).map_err(|error| {
        OperationResult::failed(InterpretingError::InvalidRegexSyntax, error.to_string())
    })?;

    Ok(regex.is_match(&to_text(left)))
}

/// `==`, `<`, `~~`, `=~` and the other operators of the condition grammar
/// except the short-circuiting ones.
pub fn compare(
    context: &mut dyn OperatorContext,
    operator: Operator,
    left: &Value,
    right: &Value,
) -> OperationResult {
    let result = match operator {
        Operator::Equals => is_equal(context, left, right),
        Operator::NotEquals => !is_equal(context, left, right),
        Operator::StrictEquals => values_equal(left, right, true),
        Operator::StrictNotEquals => !values_equal(left, right, true),
        Operator::LessThan => is_less_than(context, left, right),
        Operator::GreaterThan => is_greater_than(context, left, right),
        Operator::LessThanOrEquals => {
            is_less_than(context, left, right) || is_equal(context, left, right)
        }
        Operator::GreaterThanOrEquals => {
            is_greater_than(context, left, right) || is_equal(context, left, right)
        }
        Operator::Spaceship => return OperationResult::Applied(spaceship(context, left, right)),
        Operator::InstanceOf => return instance_of(left, right),
        Operator::Matches | Operator::NotMatches => match regex_match(left, right) {
            Ok(matched) => matched == (operator == Operator::Matches),
            Err(result) => return result,
        },
        Operator::And => to_bool(left) && to_bool(right),
        Operator::Or => to_bool(left) || to_bool(right),
        _ => return OperationResult::NotApplicable,
    };

    OperationResult::Applied(Value::bool(result))
}

