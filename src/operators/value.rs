use std::{cell::RefCell, fmt::Display, rc::Rc};

use crate::{ast::statements::FunctionDefinitionNode, errors::errors::InterpretingError};

use super::context::OperatorContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Text,
    Char,
    Int,
    Long,
    Float,
    Double,
    ByteBuffer,
    Array,
    List,
    VarPointer,
    FunctionPointer,
    Struct,
    Object,
    Error,
    Null,
    Void,
    Type,
}

impl DataType {
    pub const VALUES: [DataType; 17] = [
        DataType::Text,
        DataType::Char,
        DataType::Int,
        DataType::Long,
        DataType::Float,
        DataType::Double,
        DataType::ByteBuffer,
        DataType::Array,
        DataType::List,
        DataType::VarPointer,
        DataType::FunctionPointer,
        DataType::Struct,
        DataType::Object,
        DataType::Error,
        DataType::Null,
        DataType::Void,
        DataType::Type,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DataType::Text => "TEXT",
            DataType::Char => "CHAR",
            DataType::Int => "INT",
            DataType::Long => "LONG",
            DataType::Float => "FLOAT",
            DataType::Double => "DOUBLE",
            DataType::ByteBuffer => "BYTE_BUFFER",
            DataType::Array => "ARRAY",
            DataType::List => "LIST",
            DataType::VarPointer => "VAR_POINTER",
            DataType::FunctionPointer => "FUNCTION_POINTER",
            DataType::Struct => "STRUCT",
            DataType::Object => "OBJECT",
            DataType::Error => "ERROR",
            DataType::Null => "NULL",
            DataType::Void => "VOID",
            DataType::Type => "TYPE",
        }
    }

    pub fn from_name(name: &str) -> Option<DataType> {
        DataType::VALUES
            .iter()
            .find(|data_type| data_type.name() == name)
            .copied()
    }

    /// Name of the class method overriding a cast to this type (`to:<name>`).
    pub fn conversion_method_name(&self) -> Option<&'static str> {
        let name = match self {
            DataType::Text => "to:text",
            DataType::Char => "to:char",
            DataType::Int => "to:int",
            DataType::Long => "to:long",
            DataType::Float => "to:float",
            DataType::Double => "to:double",
            DataType::ByteBuffer => "to:byteBuffer",
            DataType::Array => "to:array",
            DataType::List => "to:list",
            _ => return None,
        };

        Some(name)
    }

    fn bit(&self) -> u32 {
        1 << (*self as u32)
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A set of allowed data types, e.g. `{INT|LONG}` or `{?TEXT}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataTypeConstraint {
    mask: u32,
}

impl DataTypeConstraint {
    pub const ANY: DataTypeConstraint = DataTypeConstraint {
        mask: (1u32 << DataType::VALUES.len()) - 1,
    };

    pub fn from_types(types: &[DataType]) -> Self {
        DataTypeConstraint {
            mask: types.iter().fold(0, |mask, data_type| mask | data_type.bit()),
        }
    }

    /// Parses the content of a constraint (without braces). A leading `?`
    /// also allows `NULL` and `VOID`. `None` or an empty constraint allows
    /// every type.
    pub fn parse(constraint: Option<&str>) -> Result<Self, String> {
        let Some(constraint) = constraint.filter(|constraint| !constraint.is_empty()) else {
            return Ok(DataTypeConstraint::ANY);
        };

        let (nullable, types) = match constraint.strip_prefix('?') {
            Some(types) => (true, types),
            None => (false, constraint),
        };

        let mut allowed = types
            .split('|')
            .map(|name| {
                DataType::from_name(name).ok_or_else(|| format!("\"{}\" is not a data type", name))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if nullable {
            allowed.extend([DataType::Null, DataType::Void]);
        }

        Ok(DataTypeConstraint::from_types(&allowed))
    }

    pub fn allows(&self, data_type: DataType) -> bool {
        self.mask & data_type.bit() != 0
    }

    /// Number of allowed types. Narrower constraints are more specific.
    pub fn width(&self) -> u32 {
        self.mask.count_ones()
    }

    pub fn types(&self) -> Vec<DataType> {
        DataType::VALUES
            .iter()
            .filter(|data_type| self.allows(**data_type))
            .copied()
            .collect()
    }
}

impl Display for DataTypeConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self
            .types()
            .iter()
            .map(DataType::name)
            .collect::<Vec<_>>();
        write!(f, "{{{}}}", names.join("|"))
    }
}

/// Native function implementations receive the evaluated arguments.
pub type NativeFunction = Rc<dyn Fn(&mut dyn OperatorContext, Vec<Value>) -> Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionParameter {
    pub name: String,
    pub constraint: DataTypeConstraint,
    pub var_args: bool,
}

pub enum FunctionKind {
    Native(NativeFunction),
    Defined(Rc<FunctionDefinitionNode>),
    /// `f ||| g`: calls `g` with the result of `f`
    Chain(Rc<FunctionPointer>, Rc<FunctionPointer>),
    /// `f ** n`: calls `f` `n` times, feeding each result into the next call
    Power(Rc<FunctionPointer>, u32),
    /// `+|f`: spreads a single array argument into the call
    AutoUnpack(Rc<FunctionPointer>),
    /// `-|f`: gathers all arguments into one array argument
    AutoPack(Rc<FunctionPointer>),
}

impl std::fmt::Debug for FunctionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FunctionKind::Native(_) => write!(f, "Native"),
            FunctionKind::Defined(definition) => write!(f, "Defined({:?})", definition.name),
            FunctionKind::Chain(first, second) => write!(f, "Chain({:?}, {:?})", first, second),
            FunctionKind::Power(function, count) => write!(f, "Power({:?}, {})", function, count),
            FunctionKind::AutoUnpack(function) => write!(f, "AutoUnpack({:?})", function),
            FunctionKind::AutoPack(function) => write!(f, "AutoPack({:?})", function),
        }
    }
}

#[derive(Debug)]
pub struct FunctionPointer {
    pub name: Option<String>,
    pub kind: FunctionKind,
    pub parameters: Vec<FunctionParameter>,
}

impl FunctionPointer {
    pub fn native(
        name: impl Into<String>,
        parameters: Vec<FunctionParameter>,
        function: NativeFunction,
    ) -> Self {
        FunctionPointer {
            name: Some(name.into()),
            kind: FunctionKind::Native(function),
            parameters,
        }
    }

    /// Invalid type constraints of a parameter allow every type.
    pub fn defined(definition: Rc<FunctionDefinitionNode>) -> Self {
        let parameters = definition
            .parameters
            .iter()
            .map(|parameter| FunctionParameter {
                name: parameter.name.clone(),
                constraint: DataTypeConstraint::parse(parameter.type_constraint.as_deref())
                    .unwrap_or(DataTypeConstraint::ANY),
                var_args: parameter.var_args,
            })
            .collect();

        FunctionPointer {
            name: definition.name.clone(),
            kind: FunctionKind::Defined(definition),
            parameters,
        }
    }

    fn wrapper(kind: FunctionKind) -> Self {
        FunctionPointer {
            name: None,
            kind,
            parameters: vec![FunctionParameter {
                name: String::from("&args"),
                constraint: DataTypeConstraint::ANY,
                var_args: true,
            }],
        }
    }

    pub fn chain(first: Rc<FunctionPointer>, second: Rc<FunctionPointer>) -> Self {
        FunctionPointer::wrapper(FunctionKind::Chain(first, second))
    }

    pub fn power(function: Rc<FunctionPointer>, count: u32) -> Self {
        FunctionPointer::wrapper(FunctionKind::Power(function, count))
    }

    pub fn auto_unpack(function: Rc<FunctionPointer>) -> Self {
        FunctionPointer::wrapper(FunctionKind::AutoUnpack(function))
    }

    pub fn auto_pack(function: Rc<FunctionPointer>) -> Self {
        FunctionPointer::wrapper(FunctionKind::AutoPack(function))
    }

    /// Whether the parameter list admits `arguments` (count and types).
    pub fn accepts(&self, arguments: &[Value]) -> bool {
        let var_args = self.parameters.last().filter(|parameter| parameter.var_args);
        let fixed = self.parameters.len() - usize::from(var_args.is_some());

        if arguments.len() < fixed || (var_args.is_none() && arguments.len() > fixed) {
            return false;
        }

        arguments.iter().enumerate().all(|(i, argument)| {
            let parameter = if i < fixed {
                &self.parameters[i]
            } else {
                &self.parameters[fixed]
            };
            parameter.constraint.allows(argument.data_type())
        })
    }

    /// Sum of the constraint widths. Lower values are more specific.
    pub fn specificity(&self) -> u32 {
        self.parameters
            .iter()
            .map(|parameter| parameter.constraint.width())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructMemberDefinition {
    pub name: String,
    pub constraint: DataTypeConstraint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDefinition {
    pub name: Option<String>,
    pub members: Vec<StructMemberDefinition>,
}

/// A struct definition, or an instance of one if `fields` is set.
#[derive(Debug)]
pub struct StructValue {
    pub definition: Rc<StructDefinition>,
    pub fields: Option<RefCell<Vec<Value>>>,
}

impl StructValue {
    pub fn definition(definition: Rc<StructDefinition>) -> Self {
        StructValue {
            definition,
            fields: None,
        }
    }

    /// Creates an instance. Fails if a value violates its member constraint.
    pub fn instance(definition: Rc<StructDefinition>, values: Vec<Value>) -> Result<Self, String> {
        if values.len() != definition.members.len() {
            return Err(format!(
                "{} values are required, got {}",
                definition.members.len(),
                values.len()
            ));
        }

        for (member, value) in definition.members.iter().zip(values.iter()) {
            if !member.constraint.allows(value.data_type()) {
                return Err(format!(
                    "{} is not allowed for member \"{}\"",
                    value.data_type(),
                    member.name
                ));
            }
        }

        Ok(StructValue {
            definition,
            fields: Some(RefCell::new(values)),
        })
    }

    pub fn is_instance(&self) -> bool {
        self.fields.is_some()
    }

    pub fn member_index(&self, name: &str) -> Option<usize> {
        self.definition
            .members
            .iter()
            .position(|member| member.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct ObjectMember {
    pub name: String,
    pub constraint: DataTypeConstraint,
    pub is_final: bool,
    pub value: Value,
}

/// A class, or an instance of one.
#[derive(Debug)]
pub struct LangObject {
    pub class_name: String,
    pub is_class: bool,
    pub parent_classes: Vec<String>,
    /// Overloads per method name, in declaration order
    methods: Vec<(String, Vec<Rc<FunctionPointer>>)>,
    pub members: RefCell<Vec<ObjectMember>>,
    /// Member defaults copied into new instances
    pub instance_members: Vec<ObjectMember>,
}

impl LangObject {
    pub fn class(class_name: impl Into<String>, parent_classes: Vec<String>) -> Self {
        LangObject {
            class_name: class_name.into(),
            is_class: true,
            parent_classes,
            methods: vec![],
            members: RefCell::new(vec![]),
            instance_members: vec![],
        }
    }

    /// Creates an instance with the methods and member defaults of `class`.
    pub fn instance_of(class: &LangObject) -> Self {
        LangObject {
            class_name: class.class_name.clone(),
            is_class: false,
            parent_classes: class.parent_classes.clone(),
            methods: class.methods.clone(),
            members: RefCell::new(class.instance_members.clone()),
            instance_members: vec![],
        }
    }

    /// Copies the methods and member defaults of a parent class.
    pub fn inherit(&mut self, parent: &LangObject) {
        for (name, overloads) in &parent.methods {
            for function in overloads {
                self.add_method(name, function.clone());
            }
        }
        self.instance_members
            .extend(parent.instance_members.iter().cloned());
    }

    pub fn add_method(&mut self, name: &str, function: Rc<FunctionPointer>) {
        match self.methods.iter_mut().find(|(method, _)| method == name) {
            Some((_, overloads)) => overloads.push(function),
            None => self.methods.push((name.to_string(), vec![function])),
        }
    }

    pub fn methods(&self, name: &str) -> &[Rc<FunctionPointer>] {
        self.methods
            .iter()
            .find(|(method, _)| method == name)
            .map(|(_, overloads)| overloads.as_slice())
            .unwrap_or(&[])
    }

    pub fn member(&self, name: &str) -> Option<Value> {
        self.members
            .borrow()
            .iter()
            .find(|member| member.name == name)
            .map(|member| member.value.clone())
    }

    pub fn is_instance_of(&self, class: &LangObject) -> bool {
        self.class_name == class.class_name || self.parent_classes.contains(&class.class_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorValue {
    pub error: InterpretingError,
    pub message: Option<String>,
}

/// Runtime value of the language.
///
/// Collections are shared and mutable: cloning a `Value` clones the handle,
/// not the elements.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    Text(Rc<str>),
    ByteBuffer(Rc<RefCell<Vec<u8>>>),
    Array(Rc<RefCell<Vec<Value>>>),
    List(Rc<RefCell<Vec<Value>>>),
    FunctionPointer(Rc<FunctionPointer>),
    Struct(Rc<StructValue>),
    Object(Rc<LangObject>),
    Error(Rc<ErrorValue>),
    Null,
    Void,
    Type(DataType),
    VarPointer(Rc<RefCell<Value>>),
}

impl Value {
    pub fn text(value: impl AsRef<str>) -> Value {
        Value::Text(Rc::from(value.as_ref()))
    }

    pub fn array(values: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(values)))
    }

    pub fn list(values: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(values)))
    }

    pub fn byte_buffer(bytes: Vec<u8>) -> Value {
        Value::ByteBuffer(Rc::new(RefCell::new(bytes)))
    }

    pub fn bool(value: bool) -> Value {
        Value::Int(i32::from(value))
    }

    pub fn error(error: InterpretingError, message: Option<String>) -> Value {
        Value::Error(Rc::new(ErrorValue { error, message }))
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Value::Int(_) => DataType::Int,
            Value::Long(_) => DataType::Long,
            Value::Float(_) => DataType::Float,
            Value::Double(_) => DataType::Double,
            Value::Char(_) => DataType::Char,
            Value::Text(_) => DataType::Text,
            Value::ByteBuffer(_) => DataType::ByteBuffer,
            Value::Array(_) => DataType::Array,
            Value::List(_) => DataType::List,
            Value::FunctionPointer(_) => DataType::FunctionPointer,
            Value::Struct(_) => DataType::Struct,
            Value::Object(_) => DataType::Object,
            Value::Error(_) => DataType::Error,
            Value::Null => DataType::Null,
            Value::Void => DataType::Void,
            Value::Type(_) => DataType::Type,
            Value::VarPointer(_) => DataType::VarPointer,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn is_null_or_void(&self) -> bool {
        matches!(self, Value::Null | Value::Void)
    }

    /// The object if this value is an instance (not a class).
    pub fn as_object_instance(&self) -> Option<&Rc<LangObject>> {
        match self {
            Value::Object(object) if !object.is_class => Some(object),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", super::conversion::to_text(self))
    }
}
