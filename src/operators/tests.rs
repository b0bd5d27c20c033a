//! Unit tests for the operator engine.
//!
//! Covers numeric promotion and division rules, collection and text
//! operators, casts, comparisons and user defined overloads.

use std::rc::Rc;

use crate::{
    ast::{
        operators::Operator,
        statements::{FunctionDefinitionNode, Parameter},
    },
    errors::errors::InterpretingError,
    CodePosition,
};

use super::{
    context::{OperationResult, OperatorContext},
    conversion::to_text,
    operators::{apply_operator, evaluate_operator},
    value::{
        DataType, DataTypeConstraint, FunctionKind, FunctionParameter, FunctionPointer,
        LangObject, StructDefinition, StructMemberDefinition, StructValue, Value,
    },
};

/// Runs native functions only. Defined functions produce no value.
struct TestContext;

impl OperatorContext for TestContext {
    fn execute_function(
        &mut self,
        function: &FunctionPointer,
        _this: Option<&Value>,
        arguments: Vec<Value>,
    ) -> Option<Value> {
        match &function.kind {
            FunctionKind::Native(native) => {
                let native = native.clone();
                let context: &mut dyn OperatorContext = self;
                Some(native(context, arguments))
            }
            _ => None,
        }
    }

    fn position(&self) -> CodePosition {
        CodePosition::EMPTY
    }
}

fn eval(operator: Operator, operands: &[Value]) -> Value {
    evaluate_operator(&mut TestContext, operator, operands)
}

fn eval_text(operator: Operator, operands: &[Value]) -> String {
    to_text(&eval(operator, operands))
}

fn error_of(value: &Value) -> Option<InterpretingError> {
    match value {
        Value::Error(error) => Some(error.error),
        _ => None,
    }
}

fn native(
    constraints: &[Option<&str>],
    function: impl Fn(Vec<Value>) -> Value + 'static,
) -> Rc<FunctionPointer> {
    let parameters = constraints
        .iter()
        .enumerate()
        .map(|(i, constraint)| FunctionParameter {
            name: format!("$p{}", i),
            constraint: DataTypeConstraint::parse(*constraint).unwrap(),
            var_args: false,
        })
        .collect();

    Rc::new(FunctionPointer::native(
        "test",
        parameters,
        Rc::new(move |_: &mut dyn OperatorContext, arguments| function(arguments)),
    ))
}

fn var_args_native(function: impl Fn(Vec<Value>) -> Value + 'static) -> Rc<FunctionPointer> {
    let parameters = vec![FunctionParameter {
        name: String::from("&args"),
        constraint: DataTypeConstraint::ANY,
        var_args: true,
    }];

    Rc::new(FunctionPointer::native(
        "test",
        parameters,
        Rc::new(move |_: &mut dyn OperatorContext, arguments| function(arguments)),
    ))
}

fn add_one() -> Rc<FunctionPointer> {
    native(&[Some("INT")], |arguments| match arguments[0] {
        Value::Int(value) => Value::Int(value + 1),
        _ => Value::Null,
    })
}

fn times_ten() -> Rc<FunctionPointer> {
    native(&[Some("INT")], |arguments| match arguments[0] {
        Value::Int(value) => Value::Int(value * 10),
        _ => Value::Null,
    })
}

fn call(function: &Value, arguments: Vec<Value>) -> Value {
    let Value::FunctionPointer(function) = function else {
        panic!("not a function pointer: {:?}", function);
    };
    super::function::call_function_pointer(&mut TestContext, function, None, arguments)
}

fn object_with(methods: Vec<(&str, Rc<FunctionPointer>)>) -> Value {
    let mut class = LangObject::class("Test", vec![]);
    for (name, method) in methods {
        class.add_method(name, method);
    }

    Value::Object(Rc::new(LangObject::instance_of(&class)))
}

fn point_definition() -> Rc<StructDefinition> {
    Rc::new(StructDefinition {
        name: Some(String::from("Point")),
        members: vec![
            StructMemberDefinition {
                name: String::from("$x"),
                constraint: DataTypeConstraint::parse(Some("INT")).unwrap(),
            },
            StructMemberDefinition {
                name: String::from("$y"),
                constraint: DataTypeConstraint::ANY,
            },
        ],
    })
}

fn point(x: i32, y: i32) -> Value {
    Value::Struct(Rc::new(
        StructValue::instance(point_definition(), vec![Value::Int(x), Value::Int(y)]).unwrap(),
    ))
}

// DATA TYPES

#[test]
fn test_data_type_constraints() {
    let constraint = DataTypeConstraint::parse(Some("INT|LONG")).unwrap();
    assert!(constraint.allows(DataType::Int));
    assert!(constraint.allows(DataType::Long));
    assert!(!constraint.allows(DataType::Null));
    assert_eq!(constraint.width(), 2);
    assert_eq!(constraint.to_string(), "{INT|LONG}");

    let nullable = DataTypeConstraint::parse(Some("?TEXT")).unwrap();
    assert!(nullable.allows(DataType::Text));
    assert!(nullable.allows(DataType::Null));
    assert!(nullable.allows(DataType::Void));
    assert_eq!(nullable.width(), 3);

    assert_eq!(DataTypeConstraint::parse(None).unwrap(), DataTypeConstraint::ANY);
    assert_eq!(DataTypeConstraint::ANY.width(), 17);
    assert!(DataTypeConstraint::parse(Some("INT|NUMBER")).is_err());
}

#[test]
fn test_data_type_names() {
    for data_type in DataType::VALUES {
        assert_eq!(DataType::from_name(data_type.name()), Some(data_type));
    }
    assert_eq!(DataType::from_name("BYTE_BUFFER"), Some(DataType::ByteBuffer));
    assert_eq!(DataType::from_name("int"), None);
}

// ARITHMETIC

fn number(data_type: DataType, value: i32) -> Value {
    match data_type {
        DataType::Int => Value::Int(value),
        DataType::Long => Value::Long(i64::from(value)),
        DataType::Float => Value::Float(value as f32),
        _ => Value::Double(f64::from(value)),
    }
}

#[test]
fn test_numeric_promotion() {
    use DataType::{Double, Float, Int, Long};

    // left, right, sum, exact quotient, inexact quotient
    let table = [
        (Int, Int, Int, Int, Double),
        (Int, Long, Long, Long, Double),
        (Int, Float, Float, Float, Float),
        (Int, Double, Double, Double, Double),
        (Long, Int, Long, Long, Double),
        (Long, Long, Long, Long, Double),
        (Long, Float, Float, Float, Float),
        (Long, Double, Double, Double, Double),
        (Float, Int, Float, Float, Float),
        (Float, Long, Float, Float, Float),
        (Float, Float, Float, Float, Float),
        (Float, Double, Double, Double, Double),
        (Double, Int, Double, Double, Double),
        (Double, Long, Double, Double, Double),
        (Double, Float, Double, Double, Double),
        (Double, Double, Double, Double, Double),
    ];

    for (left, right, sum, exact, inexact) in table {
        let case = format!("{} and {}", left, right);

        let value = eval(Operator::Add, &[number(left, 6), number(right, 3)]);
        assert_eq!(value.data_type(), sum, "{} +", case);
        assert_eq!(to_text(&value).trim_end_matches(".0"), "9", "{} +", case);

        let value = eval(Operator::Div, &[number(left, 6), number(right, 3)]);
        assert_eq!(value.data_type(), exact, "{} / exact", case);
        assert_eq!(to_text(&value).trim_end_matches(".0"), "2", "{} / exact", case);

        let value = eval(Operator::Div, &[number(left, 7), number(right, 2)]);
        assert_eq!(value.data_type(), inexact, "{} / inexact", case);
        assert_eq!(to_text(&value), "3.5", "{} / inexact", case);
    }
}

#[test]
fn test_integer_arithmetic_wraps() {
    assert!(matches!(
        eval(Operator::Add, &[Value::Int(i32::MAX), Value::Int(1)]),
        Value::Int(i32::MIN)
    ));
    assert!(matches!(
        eval(Operator::Mul, &[Value::Long(i64::MAX), Value::Long(2)]),
        Value::Long(-2)
    ));
}

#[test]
fn test_division_is_exact_or_double() {
    assert!(matches!(eval(Operator::Div, &[Value::Int(6), Value::Int(3)]), Value::Int(2)));
    assert!(matches!(
        eval(Operator::Div, &[Value::Int(7), Value::Int(2)]),
        Value::Double(value) if value == 3.5
    ));
    assert!(matches!(eval(Operator::Div, &[Value::Long(8), Value::Int(4)]), Value::Long(2)));
}

#[test]
fn test_integer_division_by_zero_is_infinite() {
    assert!(matches!(
        eval(Operator::Div, &[Value::Int(1), Value::Int(0)]),
        Value::Double(value) if value == f64::INFINITY
    ));
    assert!(matches!(
        eval(Operator::Div, &[Value::Int(-1), Value::Int(0)]),
        Value::Double(value) if value == f64::NEG_INFINITY
    ));
    assert!(matches!(
        eval(Operator::Div, &[Value::Long(0), Value::Long(0)]),
        Value::Double(value) if value.is_nan()
    ));
    assert_eq!(eval_text(Operator::Div, &[Value::Int(1), Value::Int(0)]), "Infinity");
}

#[test]
fn test_rounded_divisions() {
    let divide = |operator, l, r| eval(operator, &[Value::Int(l), Value::Int(r)]);

    assert!(matches!(divide(Operator::FloorDiv, -7, 2), Value::Int(-4)));
    assert!(matches!(divide(Operator::CeilDiv, -7, 2), Value::Int(-3)));
    assert!(matches!(divide(Operator::TruncDiv, -7, 2), Value::Int(-3)));
    assert!(matches!(divide(Operator::CeilDiv, 7, 2), Value::Int(4)));
    assert!(matches!(divide(Operator::FloorDiv, 7, -2), Value::Int(-4)));
    assert!(matches!(divide(Operator::FloorDiv, 6, 2), Value::Int(3)));
    assert!(matches!(divide(Operator::Mod, -7, 2), Value::Int(-1)));

    assert!(matches!(
        eval(Operator::FloorDiv, &[Value::Double(-7.0), Value::Int(2)]),
        Value::Double(value) if value == -4.0
    ));
}

#[test]
fn test_rounded_division_by_zero_fails() {
    for operator in [
        Operator::TruncDiv,
        Operator::FloorDiv,
        Operator::CeilDiv,
        Operator::Mod,
    ] {
        let value = eval(operator, &[Value::Int(7), Value::Int(0)]);
        assert_eq!(error_of(&value), Some(InterpretingError::DivByZero), "{}", operator);

        let value = eval(operator, &[Value::Double(7.0), Value::Double(0.0)]);
        assert_eq!(error_of(&value), Some(InterpretingError::DivByZero), "{}", operator);
    }
}

#[test]
fn test_power() {
    assert!(matches!(eval(Operator::Pow, &[Value::Int(2), Value::Int(10)]), Value::Int(1024)));
    assert!(matches!(
        eval(Operator::Pow, &[Value::Int(2), Value::Int(31)]),
        Value::Double(value) if value == 2147483648.0
    ));
    assert!(matches!(
        eval(Operator::Pow, &[Value::Int(2), Value::Int(-1)]),
        Value::Double(value) if value == 0.5
    ));
    assert!(matches!(eval(Operator::Pow, &[Value::Long(3), Value::Long(2)]), Value::Long(9)));
}

#[test]
fn test_function_power() {
    let double = native(&[Some("INT")], |arguments| match arguments[0] {
        Value::Int(value) => Value::Int(value * 2),
        _ => Value::Null,
    });
    let function = Value::FunctionPointer(double);

    let cubed = eval(Operator::Pow, &[function.clone(), Value::Int(3)]);
    assert!(matches!(call(&cubed, vec![Value::Int(1)]), Value::Int(8)));

    let identity = eval(Operator::Pow, &[function.clone(), Value::Int(0)]);
    assert!(matches!(call(&identity, vec![Value::Int(5)]), Value::Int(5)));

    let negative = eval(Operator::Pow, &[function, Value::Int(-1)]);
    assert_eq!(error_of(&negative), Some(InterpretingError::InvalidArguments));
}

#[test]
fn test_increment_and_decrement() {
    assert!(matches!(eval(Operator::Inc, &[Value::Int(1)]), Value::Int(2)));
    assert!(matches!(eval(Operator::Dec, &[Value::Long(0)]), Value::Long(-1)));
    assert!(matches!(eval(Operator::Inc, &[Value::Char('a')]), Value::Char('b')));
    assert!(matches!(eval(Operator::Dec, &[Value::Char('b')]), Value::Char('a')));
}

#[test]
fn test_auto_unpack_and_pack() {
    let sum = var_args_native(|arguments| {
        Value::Int(
            arguments
                .iter()
                .map(|argument| match argument {
                    Value::Int(value) => *value,
                    _ => 0,
                })
                .sum(),
        )
    });
    let unpacked = eval(Operator::Inc, &[Value::FunctionPointer(sum)]);
    let array = Value::array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    assert!(matches!(call(&unpacked, vec![array]), Value::Int(6)));
    assert_eq!(
        error_of(&call(&unpacked, vec![Value::Int(1)])),
        Some(InterpretingError::InvalidArguments)
    );

    let count = native(&[Some("ARRAY")], |arguments| match &arguments[0] {
        Value::Array(elements) => Value::Int(elements.borrow().len() as i32),
        _ => Value::Null,
    });
    let packed = eval(Operator::Dec, &[Value::FunctionPointer(count)]);
    assert!(matches!(
        call(&packed, vec![Value::Int(1), Value::Int(2)]),
        Value::Int(2)
    ));
}

#[test]
fn test_unary_inversion() {
    assert!(matches!(eval(Operator::Inv, &[Value::Int(5)]), Value::Int(-5)));
    assert_eq!(eval_text(Operator::Inv, &[Value::text("abc")]), "cba");

    let array = Value::array(vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(eval_text(Operator::Inv, &[array.clone()]), "[2, 1]");
    assert_eq!(to_text(&array), "[1, 2]");

    assert!(matches!(eval(Operator::Pos, &[Value::Double(1.5)]), Value::Double(value) if value == 1.5));
}

// BITWISE

#[test]
fn test_bitwise_operators() {
    assert!(matches!(eval(Operator::BitwiseAnd, &[Value::Int(6), Value::Int(3)]), Value::Int(2)));
    assert!(matches!(eval(Operator::BitwiseOr, &[Value::Int(6), Value::Int(3)]), Value::Int(7)));
    assert!(matches!(eval(Operator::BitwiseXor, &[Value::Int(6), Value::Int(3)]), Value::Int(5)));
    assert!(matches!(eval(Operator::BitwiseOr, &[Value::Int(1), Value::Long(2)]), Value::Long(3)));
    assert!(matches!(eval(Operator::Lshift, &[Value::Int(1), Value::Int(4)]), Value::Int(16)));
    assert!(matches!(eval(Operator::Rshift, &[Value::Int(-16), Value::Int(2)]), Value::Int(-4)));
    assert!(matches!(eval(Operator::Rzshift, &[Value::Int(-1), Value::Int(28)]), Value::Int(15)));
    assert!(matches!(eval(Operator::BitwiseNot, &[Value::Int(0)]), Value::Int(-1)));
}

#[test]
fn test_pipe_into_function() {
    let function = Value::FunctionPointer(add_one());

    assert!(matches!(
        eval(Operator::BitwiseOr, &[Value::Int(5), function.clone()]),
        Value::Int(6)
    ));
    assert!(matches!(eval(Operator::Rshift, &[Value::Int(1), function]), Value::Int(2)));
}

// TEXT AND COLLECTIONS

#[test]
fn test_concat() {
    assert_eq!(eval_text(Operator::Concat, &[Value::text("a"), Value::Int(1)]), "a1");
    assert_eq!(eval_text(Operator::Concat, &[Value::Int(1), Value::Int(2)]), "12");
    assert_eq!(eval_text(Operator::Concat, &[Value::Char('x'), Value::text("y")]), "xy");

    let left = Value::array(vec![Value::Int(1)]);
    let right = Value::list(vec![Value::Int(2)]);
    let joined = eval(Operator::Concat, &[left, right]);
    assert_eq!(joined.data_type(), DataType::Array);
    assert_eq!(to_text(&joined), "[1, 2]");

    let value = eval(Operator::Concat, &[Value::array(vec![]), Value::Int(1)]);
    assert_eq!(error_of(&value), Some(InterpretingError::InvalidArguments));
}

#[test]
fn test_function_chaining() {
    let chained = eval(
        Operator::Concat,
        &[
            Value::FunctionPointer(add_one()),
            Value::FunctionPointer(times_ten()),
        ],
    );

    assert!(matches!(call(&chained, vec![Value::Int(2)]), Value::Int(30)));
}

#[test]
fn test_length_and_deep_copy() {
    assert!(matches!(eval(Operator::Len, &[Value::text("äbc")]), Value::Int(3)));
    assert!(matches!(eval(Operator::Len, &[Value::byte_buffer(vec![1, 2])]), Value::Int(2)));

    let inner = Value::array(vec![Value::Int(1)]);
    let outer = Value::array(vec![inner.clone()]);
    let copy = eval(Operator::DeepCopy, &[outer]);
    let Value::Array(inner_elements) = &inner else {
        unreachable!()
    };
    inner_elements.borrow_mut().push(Value::Int(2));
    assert_eq!(to_text(&copy), "[[1]]");

    let value = eval(Operator::DeepCopy, &[Value::FunctionPointer(add_one())]);
    assert_eq!(error_of(&value), Some(InterpretingError::InvalidArguments));
}

#[test]
fn test_get_item_with_negative_index() {
    let array = Value::array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);

    assert!(matches!(eval(Operator::GetItem, &[array.clone(), Value::Int(-1)]), Value::Int(3)));
    assert!(matches!(eval(Operator::GetItem, &[array.clone(), Value::Int(0)]), Value::Int(1)));
    assert_eq!(
        error_of(&eval(Operator::GetItem, &[array.clone(), Value::Int(3)])),
        Some(InterpretingError::IndexOutOfBounds)
    );
    assert_eq!(
        error_of(&eval(Operator::GetItem, &[array, Value::Int(-4)])),
        Some(InterpretingError::IndexOutOfBounds)
    );

    assert!(matches!(
        eval(Operator::GetItem, &[Value::text("abc"), Value::Int(1)]),
        Value::Char('b')
    ));
}

#[test]
fn test_get_item_of_char() {
    let c = Value::Char('x');

    assert!(matches!(eval(Operator::GetItem, &[c.clone(), Value::Int(0)]), Value::Char('x')));
    assert!(matches!(eval(Operator::GetItem, &[c.clone(), Value::Int(-1)]), Value::Char('x')));
    assert_eq!(
        error_of(&eval(Operator::GetItem, &[c, Value::Int(1)])),
        Some(InterpretingError::IndexOutOfBounds)
    );
}

#[test]
fn test_optional_access_of_null() {
    assert!(matches!(
        eval(Operator::OptionalGetItem, &[Value::Null, Value::Int(0)]),
        Value::Void
    ));
    assert!(matches!(
        eval(Operator::OptionalMemberAccess, &[Value::Void, Value::text("$x")]),
        Value::Void
    ));
}

#[test]
fn test_set_item() {
    let array = Value::array(vec![Value::Int(1), Value::Int(2)]);
    let result = eval(Operator::SetItem, &[array.clone(), Value::Int(-1), Value::text("b")]);
    assert!(matches!(result, Value::Void));
    assert_eq!(to_text(&array), "[1, b]");

    let bytes = Value::byte_buffer(vec![0, 0]);
    eval(Operator::SetItem, &[bytes.clone(), Value::Int(0), Value::Int(255)]);
    assert_eq!(to_text(&bytes), "[0xFF, 0x00]");

    assert_eq!(
        error_of(&eval(Operator::SetItem, &[array, Value::Int(2), Value::Int(0)])),
        Some(InterpretingError::IndexOutOfBounds)
    );
}

#[test]
fn test_set_byte_out_of_range() {
    let bytes = Value::byte_buffer(vec![7, 7]);

    for value in [Value::Int(256), Value::Int(-1), Value::Long(1 << 40), Value::Char('\u{100}')] {
        let result = eval(Operator::SetItem, &[bytes.clone(), Value::Int(0), value]);
        assert_eq!(error_of(&result), Some(InterpretingError::InvalidArguments));
    }
    assert_eq!(to_text(&bytes), "[0x07, 0x07]");

    eval(Operator::SetItem, &[bytes.clone(), Value::Int(1), Value::Char('A')]);
    assert_eq!(to_text(&bytes), "[0x07, 0x41]");
}

#[test]
fn test_struct_members() {
    let point = point(1, 2);

    assert!(matches!(
        eval(Operator::MemberAccess, &[point.clone(), Value::text("$x")]),
        Value::Int(1)
    ));
    assert_eq!(
        error_of(&eval(Operator::MemberAccess, &[point.clone(), Value::text("$z")])),
        Some(InterpretingError::IncompatibleDataType)
    );

    eval(Operator::SetItem, &[point.clone(), Value::text("$y"), Value::text("two")]);
    assert_eq!(to_text(&point), "{$x: 1, $y: two}");

    let violation = eval(Operator::SetItem, &[point, Value::text("$x"), Value::text("one")]);
    assert_eq!(error_of(&violation), Some(InterpretingError::IncompatibleDataType));
}

#[test]
fn test_struct_instance_checks_constraints() {
    let result = StructValue::instance(point_definition(), vec![Value::Null, Value::Int(1)]);
    assert!(result.is_err());

    let result = StructValue::instance(point_definition(), vec![Value::Int(1)]);
    assert!(result.is_err());
}

// CASTS

#[test]
fn test_casts() {
    let cast = |data_type, value| eval(Operator::Cast, &[Value::Type(data_type), value]);

    assert!(matches!(cast(DataType::Int, Value::text("42")), Value::Int(42)));
    assert!(matches!(cast(DataType::Int, Value::Double(3.9)), Value::Int(3)));
    assert!(matches!(cast(DataType::Long, Value::Int(7)), Value::Long(7)));
    assert!(matches!(cast(DataType::Char, Value::Int(65)), Value::Char('A')));
    assert!(matches!(cast(DataType::Double, Value::Char('a')), Value::Double(value) if value == 97.0));
    assert_eq!(to_text(&cast(DataType::Text, Value::Int(3))), "3");
    assert_eq!(to_text(&cast(DataType::Text, Value::Double(1.0))), "1.0");
    assert_eq!(to_text(&cast(DataType::ByteBuffer, Value::text("A"))), "[0x41]");

    let list = Value::list(vec![Value::Int(1)]);
    assert_eq!(cast(DataType::Array, list).data_type(), DataType::Array);
}

#[test]
fn test_cast_without_conversion_is_null() {
    let value = eval(Operator::Cast, &[Value::Type(DataType::Int), Value::text("abc")]);
    assert!(matches!(value, Value::Null));

    let value = eval(Operator::Cast, &[Value::Type(DataType::Struct), Value::Int(1)]);
    assert!(matches!(value, Value::Null));
}

// COMPARISONS AND LOGIC

#[test]
fn test_equality() {
    let is_true = |operator, l, r| matches!(eval(operator, &[l, r]), Value::Int(1));

    assert!(is_true(Operator::Equals, Value::Int(1), Value::Double(1.0)));
    assert!(is_true(Operator::Equals, Value::text("1"), Value::Int(1)));
    assert!(is_true(Operator::Equals, Value::Char('a'), Value::text("a")));
    assert!(!is_true(Operator::StrictEquals, Value::Int(1), Value::Long(1)));
    assert!(is_true(Operator::StrictEquals, Value::Int(1), Value::Int(1)));
    assert!(is_true(Operator::StrictNotEquals, Value::Int(1), Value::Long(1)));
    assert!(is_true(Operator::NotEquals, Value::Null, Value::Void));
    assert!(is_true(
        Operator::Equals,
        Value::array(vec![Value::Int(1), Value::text("a")]),
        Value::array(vec![Value::Int(1), Value::text("a")])
    ));
}

#[test]
fn test_ordering() {
    let is_true = |operator, l, r| matches!(eval(operator, &[l, r]), Value::Int(1));

    assert!(is_true(Operator::LessThan, Value::Int(1), Value::Double(1.5)));
    assert!(is_true(Operator::GreaterThan, Value::text("b"), Value::text("a")));
    assert!(is_true(Operator::LessThanOrEquals, Value::Long(2), Value::Int(2)));
    assert!(is_true(Operator::GreaterThanOrEquals, Value::Char('b'), Value::Char('a')));
    assert!(!is_true(Operator::LessThan, Value::Null, Value::Int(1)));
}

#[test]
fn test_spaceship() {
    assert!(matches!(eval(Operator::Spaceship, &[Value::Int(1), Value::Int(2)]), Value::Int(-1)));
    assert!(matches!(eval(Operator::Spaceship, &[Value::Int(2), Value::Long(2)]), Value::Int(0)));
    assert!(matches!(
        eval(Operator::Spaceship, &[Value::text("b"), Value::text("a")]),
        Value::Int(1)
    ));
    assert!(matches!(eval(Operator::Spaceship, &[Value::Null, Value::Int(1)]), Value::Null));
}

#[test]
fn test_logic() {
    assert!(matches!(eval(Operator::Not, &[Value::text("")]), Value::Int(1)));
    assert!(matches!(eval(Operator::ConditionalNon, &[Value::text("a")]), Value::Int(1)));
    assert!(matches!(eval(Operator::And, &[Value::Int(1), Value::Null]), Value::Int(0)));
    assert!(matches!(eval(Operator::Or, &[Value::Int(0), Value::Char('a')]), Value::Int(1)));
    assert!(matches!(eval(Operator::Non, &[Value::Long(4)]), Value::Long(4)));
}

#[test]
fn test_instance_of() {
    assert!(matches!(
        eval(Operator::InstanceOf, &[Value::Int(1), Value::Type(DataType::Int)]),
        Value::Int(1)
    ));
    assert!(matches!(
        eval(Operator::InstanceOf, &[Value::Int(1), Value::Type(DataType::Long)]),
        Value::Int(0)
    ));

    let definition = Value::Struct(Rc::new(StructValue::definition(point_definition())));
    assert!(matches!(
        eval(Operator::InstanceOf, &[point(1, 2), definition]),
        Value::Int(1)
    ));
}

#[test]
fn test_regex_matching() {
    assert!(matches!(
        eval(Operator::Matches, &[Value::text("abc"), Value::text("^a.c$")]),
        Value::Int(1)
    ));
    assert!(matches!(
        eval(Operator::NotMatches, &[Value::Int(12), Value::text("^\\d+$")]),
        Value::Int(0)
    ));
    assert_eq!(
        error_of(&eval(Operator::Matches, &[Value::text("abc"), Value::text("(")])),
        Some(InterpretingError::InvalidRegexSyntax)
    );
}

#[test]
fn test_conditional_value_operators() {
    assert!(matches!(eval(Operator::Elvis, &[Value::Int(0), Value::Int(2)]), Value::Int(2)));
    assert!(matches!(eval(Operator::Elvis, &[Value::Int(3), Value::Int(2)]), Value::Int(3)));
    assert!(matches!(
        eval(Operator::NullCoalescing, &[Value::Int(0), Value::Int(2)]),
        Value::Int(0)
    ));
    assert!(matches!(
        eval(Operator::NullCoalescing, &[Value::Null, Value::Int(2)]),
        Value::Int(2)
    ));
    assert!(matches!(
        eval(Operator::InlineIf, &[Value::text(""), Value::Int(1), Value::Int(2)]),
        Value::Int(2)
    ));
}

#[test]
fn test_undefined_operator_reports_operand_types() {
    let value = eval(Operator::Sub, &[Value::text("a"), Value::Int(1)]);

    let Value::Error(error) = value else {
        panic!("expected an error, got {:?}", value);
    };
    assert_eq!(error.error, InterpretingError::InvalidArguments);
    assert_eq!(
        error.message.as_deref(),
        Some("operator \"-\" is not defined for TEXT, INT")
    );
}

#[test]
fn test_apply_operator_results() {
    assert!(apply_operator(&mut TestContext, Operator::Add, &[Value::Int(1), Value::Int(2)])
        .is_applied());
    assert!(matches!(
        apply_operator(&mut TestContext, Operator::Add, &[Value::Null, Value::Int(2)]),
        OperationResult::NotApplicable
    ));
    assert!(matches!(
        apply_operator(&mut TestContext, Operator::Mod, &[Value::Int(1), Value::Int(0)]),
        OperationResult::Failed(InterpretingError::DivByZero, _)
    ));
}

// OVERLOADS

#[test]
fn test_most_specific_overload_wins() {
    let object = object_with(vec![
        ("op:add", native(&[None], |_| Value::text("any"))),
        ("op:add", native(&[Some("INT")], |_| Value::text("int"))),
        ("op:add", native(&[Some("INT|LONG")], |_| Value::text("number"))),
    ]);

    assert_eq!(eval_text(Operator::Add, &[object.clone(), Value::Int(1)]), "int");
    assert_eq!(eval_text(Operator::Add, &[object.clone(), Value::Long(1)]), "number");
    assert_eq!(eval_text(Operator::Add, &[object, Value::text("a")]), "any");
}

#[test]
fn test_overload_ties_go_to_first_declaration() {
    let object = object_with(vec![
        ("op:mul", native(&[Some("INT")], |_| Value::text("first"))),
        ("op:mul", native(&[Some("TEXT")], |_| Value::text("text"))),
        ("op:mul", native(&[Some("INT")], |_| Value::text("second"))),
    ]);

    assert_eq!(eval_text(Operator::Mul, &[object, Value::Int(2)]), "first");
}

#[test]
fn test_reverse_overload() {
    let object = object_with(vec![(
        "op:r-sub",
        native(&[Some("INT")], |arguments| match arguments[0] {
            Value::Int(value) => Value::Int(value * 100),
            _ => Value::Null,
        }),
    )]);

    assert!(matches!(eval(Operator::Sub, &[Value::Int(3), object.clone()]), Value::Int(300)));
    assert_eq!(
        error_of(&eval(Operator::Sub, &[object, Value::Int(3)])),
        Some(InterpretingError::InvalidArguments)
    );
}

#[test]
fn test_equality_overload_is_negated_for_not_equals() {
    let object = object_with(vec![("op:isEquals", native(&[None], |_| Value::Int(1)))]);

    assert!(matches!(eval(Operator::Equals, &[object.clone(), Value::Int(5)]), Value::Int(1)));
    assert!(matches!(eval(Operator::NotEquals, &[object, Value::Int(5)]), Value::Int(0)));
}

#[test]
fn test_conversion_method_overrides_cast() {
    let object = object_with(vec![("to:text", native(&[], |_| Value::text("custom")))]);

    assert_eq!(
        eval_text(Operator::Cast, &[Value::Type(DataType::Text), object.clone()]),
        "custom"
    );
    assert!(matches!(
        eval(Operator::Cast, &[Value::Type(DataType::Int), object]),
        Value::Null
    ));
}

#[test]
fn test_overload_without_result_is_void() {
    let definition = FunctionDefinitionNode {
        name: None,
        parameters: vec![Parameter {
            name: String::from("$x"),
            type_constraint: None,
            var_args: false,
            position: CodePosition::EMPTY,
        }],
        body: vec![],
        doc_comment: None,
        position: CodePosition::EMPTY,
    };
    let method = Rc::new(FunctionPointer::defined(Rc::new(definition)));
    let object = object_with(vec![("op:add", method)]);

    assert!(matches!(eval(Operator::Add, &[object, Value::Int(1)]), Value::Void));
}
