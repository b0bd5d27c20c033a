use std::{cell::RefCell, rc::Rc};

use crate::errors::errors::InterpretingError;

use super::{
    context::OperationResult,
    conversion::to_text,
    value::{FunctionPointer, StructValue, Value},
};

pub fn length(operand: &Value) -> OperationResult {
    let length = match operand {
        Value::Text(value) => value.chars().count(),
        Value::Char(_) => 1,
        Value::ByteBuffer(bytes) => bytes.borrow().len(),
        Value::Array(elements) | Value::List(elements) => elements.borrow().len(),
        Value::Struct(value) => value.definition.members.len(),
        _ => return OperationResult::NotApplicable,
    };

    OperationResult::Applied(Value::Int(length as i32))
}

fn deep_copy_elements(elements: &[Value]) -> Option<Vec<Value>> {
    elements.iter().map(deep_copy_value).collect()
}

/// Copies a value and everything it contains. Functions and objects can not
/// be copied.
pub fn deep_copy_value(value: &Value) -> Option<Value> {
    let copy = match value {
        Value::ByteBuffer(bytes) => Value::byte_buffer(bytes.borrow().clone()),
        Value::Array(elements) => Value::array(deep_copy_elements(&elements.borrow())?),
        Value::List(elements) => Value::list(deep_copy_elements(&elements.borrow())?),
        Value::Struct(value) => Value::Struct(Rc::new(StructValue {
            definition: value.definition.clone(),
            fields: match &value.fields {
                Some(fields) => Some(RefCell::new(deep_copy_elements(&fields.borrow())?)),
                None => None,
            },
        })),
        Value::FunctionPointer(_) | Value::Object(_) => return None,
        _ => value.clone(),
    };

    Some(copy)
}

pub fn deep_copy(operand: &Value) -> OperationResult {
    deep_copy_value(operand).into()
}

fn is_text_like(value: &Value) -> bool {
    matches!(
        value,
        Value::Text(_)
            | Value::Char(_)
            | Value::Int(_)
            | Value::Long(_)
            | Value::Float(_)
            | Value::Double(_)
    )
}

/// `|||`: text, collection and function concatenation.
pub fn concat(left: &Value, right: &Value) -> OperationResult {
    let value = match (left, right) {
        (Value::Array(l), Value::Array(r) | Value::List(r)) => {
            Value::array([l.borrow().as_slice(), r.borrow().as_slice()].concat())
        }
        (Value::List(l), Value::Array(r) | Value::List(r)) => {
            Value::list([l.borrow().as_slice(), r.borrow().as_slice()].concat())
        }
        (Value::ByteBuffer(l), Value::ByteBuffer(r)) => {
            Value::byte_buffer([l.borrow().as_slice(), r.borrow().as_slice()].concat())
        }
        (Value::FunctionPointer(first), Value::FunctionPointer(second)) => Value::FunctionPointer(
            Rc::new(FunctionPointer::chain(first.clone(), second.clone())),
        ),
        (Value::Text(text), right) if !matches!(right, Value::Object(_)) => {
            Value::text(format!("{}{}", text, to_text(right)))
        }
        (left, right) if is_text_like(left) && is_text_like(right) => {
            Value::text(format!("{}{}", to_text(left), to_text(right)))
        }
        _ => return OperationResult::NotApplicable,
    };

    OperationResult::Applied(value)
}

/// Resolves a possibly negative index against `length`.
fn resolve_index(index: &Value, length: usize) -> Result<usize, OperationResult> {
    let index = match index {
        Value::Int(index) => i64::from(*index),
        Value::Long(index) => *index,
        _ => return Err(OperationResult::NotApplicable),
    };

    let resolved = if index < 0 {
        index + length as i64
    } else {
        index
    };

    if resolved < 0 || resolved >= length as i64 {
        return Err(OperationResult::failed(
            InterpretingError::IndexOutOfBounds,
            format!("index {} is out of bounds for length {}", index, length),
        ));
    }

    Ok(resolved as usize)
}

fn unknown_member(name: &str) -> OperationResult {
    OperationResult::failed(
        InterpretingError::IncompatibleDataType,
        format!("\"{}\" is not a member", name),
    )
}

/// Reads a member of a struct instance or an object by name.
pub fn member_access(target: &Value, name: &Value) -> OperationResult {
    let Value::Text(name) = name else {
        return OperationResult::NotApplicable;
    };

    match target {
        Value::Struct(value) => {
            let (Some(fields), Some(index)) = (&value.fields, value.member_index(name)) else {
                return unknown_member(name);
            };
            OperationResult::Applied(fields.borrow()[index].clone())
        }
        Value::Object(object) => match object.member(name) {
            Some(value) => OperationResult::Applied(value),
            None => unknown_member(name),
        },
        _ => OperationResult::NotApplicable,
    }
}

pub fn get_item(target: &Value, index: &Value) -> OperationResult {
    let value = match target {
        Value::Text(text) => {
            let chars = text.chars().collect::<Vec<_>>();
            match resolve_index(index, chars.len()) {
                Ok(index) => Value::Char(chars[index]),
                Err(result) => return result,
            }
        }
        Value::Char(c) => match resolve_index(index, 1) {
            Ok(_) => Value::Char(*c),
            Err(result) => return result,
        },
        Value::ByteBuffer(bytes) => {
            let bytes = bytes.borrow();
            match resolve_index(index, bytes.len()) {
                Ok(index) => Value::Int(i32::from(bytes[index])),
                Err(result) => return result,
            }
        }
        Value::Array(elements) | Value::List(elements) => {
            let elements = elements.borrow();
            match resolve_index(index, elements.len()) {
                Ok(index) => elements[index].clone(),
                Err(result) => return result,
            }
        }
        Value::Struct(_) | Value::Object(_) => return member_access(target, index),
        _ => return OperationResult::NotApplicable,
    };

    OperationResult::Applied(value)
}

fn set_member(target: &Value, name: &str, value: &Value) -> OperationResult {
    match target {
        Value::Struct(struct_value) => {
            let (Some(fields), Some(index)) =
                (&struct_value.fields, struct_value.member_index(name))
            else {
                return unknown_member(name);
            };

            let constraint = struct_value.definition.members[index].constraint;
            if !constraint.allows(value.data_type()) {
                return OperationResult::failed(
                    InterpretingError::IncompatibleDataType,
                    format!("{} is not allowed for member \"{}\"", value.data_type(), name),
                );
            }

            fields.borrow_mut()[index] = value.clone();
        }
        Value::Object(object) => {
            let mut members = object.members.borrow_mut();
            let Some(member) = members.iter_mut().find(|member| member.name == name) else {
                return unknown_member(name);
            };

            if member.is_final || !member.constraint.allows(value.data_type()) {
                return OperationResult::failed(
                    InterpretingError::IncompatibleDataType,
                    format!("member \"{}\" can not be set to {}", name, value.data_type()),
                );
            }

            member.value = value.clone();
        }
        _ => return OperationResult::NotApplicable,
    }

    OperationResult::Applied(Value::Void)
}

pub fn set_item(target: &Value, index: &Value, value: &Value) -> OperationResult {
    match target {
        Value::ByteBuffer(bytes) => {
            let byte = match value {
                Value::Int(value) => u8::try_from(*value).ok(),
                Value::Long(value) => u8::try_from(*value).ok(),
                Value::Char(value) => u8::try_from(u32::from(*value)).ok(),
                _ => return OperationResult::NotApplicable,
            };
            let Some(byte) = byte else {
                return OperationResult::failed(
                    InterpretingError::InvalidArguments,
                    format!("{} is not a byte value", to_text(value)),
                );
            };

            let mut bytes = bytes.borrow_mut();
            match resolve_index(index, bytes.len()) {
                Ok(index) => bytes[index] = byte,
                Err(result) => return result,
            }
        }
        Value::Array(elements) | Value::List(elements) => {
            let mut elements = elements.borrow_mut();
            match resolve_index(index, elements.len()) {
                Ok(index) => elements[index] = value.clone(),
                Err(result) => return result,
            }
        }
        Value::Struct(_) | Value::Object(_) => {
            let Value::Text(name) = index else {
                return OperationResult::NotApplicable;
            };
            return set_member(target, name, value);
        }
        _ => return OperationResult::NotApplicable,
    }

    OperationResult::Applied(Value::Void)
}
