use super::value::{DataType, Value};

fn format_floating(value: f64, text: String) -> String {
    if value.is_nan() {
        String::from("NaN")
    } else if value.is_infinite() {
        String::from(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        text
    }
}

fn join_elements(elements: &[Value]) -> String {
    elements
        .iter()
        .map(to_text)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn to_text(value: &Value) -> String {
    match value {
        Value::Int(value) => value.to_string(),
        Value::Long(value) => value.to_string(),
        Value::Float(value) => format_floating(f64::from(*value), format!("{:?}", value)),
        Value::Double(value) => format_floating(*value, format!("{:?}", value)),
        Value::Char(value) => value.to_string(),
        Value::Text(value) => value.to_string(),
        Value::ByteBuffer(bytes) => {
            let bytes = bytes
                .borrow()
                .iter()
                .map(|byte| format!("0x{:02X}", byte))
                .collect::<Vec<_>>();
            format!("[{}]", bytes.join(", "))
        }
        Value::Array(elements) => format!("[{}]", join_elements(&elements.borrow())),
        Value::List(elements) => format!("<{}>", join_elements(&elements.borrow())),
        Value::FunctionPointer(function) => match &function.name {
            Some(name) => format!("<Function {}>", name),
            None => String::from("<Function>"),
        },
        Value::Struct(value) => {
            let name = value.definition.name.as_deref().unwrap_or("<anonymous>");
            match &value.fields {
                None => format!("<Struct {}>", name),
                Some(fields) => {
                    let members = value
                        .definition
                        .members
                        .iter()
                        .zip(fields.borrow().iter())
                        .map(|(member, field)| format!("{}: {}", member.name, to_text(field)))
                        .collect::<Vec<_>>();
                    format!("{{{}}}", members.join(", "))
                }
            }
        }
        Value::Object(object) if object.is_class => format!("<Class {}>", object.class_name),
        Value::Object(object) => format!("<Object of {}>", object.class_name),
        Value::Error(error) => match &error.message {
            Some(message) => format!("Error: {} ({})", error.error.get_error_name(), message),
            None => format!("Error: {}", error.error.get_error_name()),
        },
        Value::Null => String::from("null"),
        Value::Void => String::new(),
        Value::Type(data_type) => data_type.name().to_string(),
        Value::VarPointer(value) => format!("-->{}", to_text(&value.borrow())),
    }
}

/// Truthiness used by conditions and the logical operators.
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Int(value) => *value != 0,
        Value::Long(value) => *value != 0,
        Value::Float(value) => *value != 0.0,
        Value::Double(value) => *value != 0.0,
        Value::Char(value) => *value != '\0',
        Value::Text(value) => !value.is_empty(),
        Value::ByteBuffer(bytes) => !bytes.borrow().is_empty(),
        Value::Array(elements) | Value::List(elements) => !elements.borrow().is_empty(),
        Value::Error(error) => error.error.error_code() != 0,
        Value::Null | Value::Void => false,
        Value::FunctionPointer(_)
        | Value::Struct(_)
        | Value::Object(_)
        | Value::Type(_)
        | Value::VarPointer(_) => true,
    }
}

/// Parses a number literal: `Int` if it fits, then `Long`, then `Double`.
pub fn parse_number(text: &str) -> Option<Value> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(value) = text.parse::<i32>() {
        return Some(Value::Int(value));
    }
    if let Ok(value) = text.parse::<i64>() {
        return Some(Value::Long(value));
    }

    let numeric = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    if !numeric {
        return None;
    }

    text.parse::<f64>().ok().map(Value::Double)
}

/// Numeric view of a value. Collections convert to their length.
pub fn to_number(value: &Value) -> Option<Value> {
    match value {
        Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Double(_) => Some(value.clone()),
        Value::Char(value) => Some(Value::Int(*value as i32)),
        Value::Text(value) => parse_number(value),
        Value::ByteBuffer(bytes) => Some(Value::Int(bytes.borrow().len() as i32)),
        Value::Array(elements) | Value::List(elements) => {
            Some(Value::Int(elements.borrow().len() as i32))
        }
        Value::Struct(value) => Some(Value::Int(value.definition.members.len() as i32)),
        Value::Error(error) => Some(Value::Int(error.error.error_code())),
        _ => None,
    }
}

pub fn to_int(value: &Value) -> Option<i32> {
    match to_number(value)? {
        Value::Int(value) => Some(value),
        Value::Long(value) => Some(value as i32),
        Value::Float(value) => Some(value as i32),
        Value::Double(value) => Some(value as i32),
        _ => None,
    }
}

pub fn to_long(value: &Value) -> Option<i64> {
    match to_number(value)? {
        Value::Int(value) => Some(i64::from(value)),
        Value::Long(value) => Some(value),
        Value::Float(value) => Some(value as i64),
        Value::Double(value) => Some(value as i64),
        _ => None,
    }
}

pub fn to_double(value: &Value) -> Option<f64> {
    match to_number(value)? {
        Value::Int(value) => Some(f64::from(value)),
        Value::Long(value) => Some(value as f64),
        Value::Float(value) => Some(f64::from(value)),
        Value::Double(value) => Some(value),
        _ => None,
    }
}

pub fn to_char(value: &Value) -> Option<char> {
    match value {
        Value::Char(value) => Some(*value),
        Value::Text(value) => {
            let mut chars = value.chars();
            let c = chars.next()?;
            chars.next().is_none().then_some(c)
        }
        Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Double(_) => {
            char::from_u32(u32::try_from(to_long(value)?).ok()?)
        }
        _ => None,
    }
}

fn to_elements(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(elements) | Value::List(elements) => Some(elements.borrow().clone()),
        Value::ByteBuffer(bytes) => Some(
            bytes
                .borrow()
                .iter()
                .map(|byte| Value::Int(i32::from(*byte)))
                .collect(),
        ),
        Value::Struct(value) => value.fields.as_ref().map(|fields| fields.borrow().clone()),
        _ => None,
    }
}

fn to_bytes(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::ByteBuffer(bytes) => Some(bytes.borrow().clone()),
        Value::Text(text) => Some(text.as_bytes().to_vec()),
        Value::Array(elements) | Value::List(elements) => elements
            .borrow()
            .iter()
            .map(|element| to_int(element).map(|byte| byte as u8))
            .collect(),
        _ => None,
    }
}

/// Converts `value` to `data_type`. `None` if there is no conversion.
pub fn convert(value: &Value, data_type: DataType) -> Option<Value> {
    let converted = match data_type {
        DataType::Text => match value {
            Value::Object(_) => return None,
            _ => Value::text(to_text(value)),
        },
        DataType::Char => Value::Char(to_char(value)?),
        DataType::Int => Value::Int(to_int(value)?),
        DataType::Long => Value::Long(to_long(value)?),
        DataType::Float => Value::Float(to_double(value)? as f32),
        DataType::Double => Value::Double(to_double(value)?),
        DataType::ByteBuffer => Value::byte_buffer(to_bytes(value)?),
        DataType::Array => Value::array(to_elements(value)?),
        DataType::List => Value::list(to_elements(value)?),
        _ if value.data_type() == data_type => value.clone(),
        _ => return None,
    };

    Some(converted)
}
