use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{
        ast::Node,
        expressions::{AssignmentNode, FunctionCallNode, OperationNode},
        operators::Operator,
        statements::{ClassDefinitionNode, ClassMember, FunctionDefinitionNode, StructDefinitionNode},
    },
    errors::errors::InterpretingError,
    operators::{
        context::OperatorContext,
        conversion::{to_bool, to_text},
        function::{call_function_pointer, select_overload},
        operators::evaluate_operator,
        value::{
            DataType, DataTypeConstraint, FunctionKind, FunctionParameter, FunctionPointer,
            LangObject, NativeFunction, ObjectMember, StructDefinition, StructMemberDefinition,
            StructValue, Value,
        },
    },
    CodePosition,
};

const MAX_CALL_DEPTH: usize = 256;

/// Variables of one scope (the global scope or a function call).
#[derive(Debug, Default)]
pub struct Environment {
    pub variable_lookup: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    pub fn declare_variable(&mut self, name: String, value: Value) {
        self.variable_lookup.insert(name, value);
    }

    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        self.variable_lookup.get(name)
    }
}

/// Tree walking evaluator for parsed nodes.
///
/// Runs expressions, assignments, definitions and function calls. Control
/// flow statements are not executed and evaluate to an error value.
pub struct Evaluator {
    pub globals: Environment,
    environments: Vec<Environment>,
    natives: HashMap<String, Rc<FunctionPointer>>,
    translations: HashMap<String, String>,
    return_value: Option<Value>,
    position: CodePosition,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new()
    }
}

/// `fn.name` is an alias of `func.name`.
fn native_name(name: &str) -> String {
    match name.strip_prefix("fn.") {
        Some(name) => format!("func.{}", name),
        None => name.to_string(),
    }
}

fn constraint_of(type_constraint: Option<&str>) -> DataTypeConstraint {
    DataTypeConstraint::parse(type_constraint).unwrap_or(DataTypeConstraint::ANY)
}

impl Evaluator {
    pub fn new() -> Self {
        let mut evaluator = Evaluator {
            globals: Environment::new(),
            environments: vec![],
            natives: HashMap::new(),
            translations: HashMap::new(),
            return_value: None,
            position: CodePosition::EMPTY,
        };

        evaluator.define_native("func.new", vec![], Rc::new(construct));
        evaluator.define_native("func.typeOf", vec![], Rc::new(type_of));

        evaluator
    }

    /// Registers a native function callable as `func.<name>` (or `fn.<name>`).
    /// Without parameters, the function accepts any arguments.
    pub fn define_native(
        &mut self,
        name: &str,
        parameters: Vec<FunctionParameter>,
        function: NativeFunction,
    ) {
        let parameters = if parameters.is_empty() {
            vec![FunctionParameter {
                name: String::from("&args"),
                constraint: DataTypeConstraint::ANY,
                var_args: true,
            }]
        } else {
            parameters
        };

        let name = native_name(name);
        self.natives.insert(
            name.clone(),
            Rc::new(FunctionPointer::native(name, parameters, function)),
        );
    }

    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        self.environments
            .last()
            .and_then(|environment| environment.get_variable(name))
            .or_else(|| self.globals.get_variable(name))
    }

    pub fn set_variable(&mut self, name: &str, value: Value) {
        self.environments
            .last_mut()
            .unwrap_or(&mut self.globals)
            .declare_variable(name.to_string(), value);
    }

    pub fn translation(&self, key: &str) -> Option<&str> {
        self.translations.get(key).map(String::as_str)
    }

    /// Evaluates `nodes` in order and returns the value of the last one, or
    /// the value of the first `return`.
    pub fn run(&mut self, nodes: &[Node]) -> Value {
        let mut last = Value::Void;
        for node in nodes {
            last = self.evaluate(node);
            if let Some(value) = self.return_value.take() {
                return value;
            }
        }

        last
    }

    pub fn evaluate(&mut self, node: &Node) -> Value {
        if !node.position().is_empty() {
            self.position = *node.position();
        }

        match node {
            Node::Null { .. } => Value::Null,
            Node::Text { value, .. } => Value::text(value),
            Node::Char { value, .. } => Value::Char(*value),
            Node::Int { value, .. } => Value::Int(*value),
            Node::Long { value, .. } => Value::Long(*value),
            Node::Float { value, .. } => Value::Float(*value),
            Node::Double { value, .. } => Value::Double(*value),
            Node::List(list) => {
                let mut text = String::new();
                for node in &list.nodes {
                    let value = self.evaluate(node);
                    if value.is_error() {
                        return value;
                    }
                    text.push_str(&to_text(&value));
                }
                Value::text(text)
            }
            Node::UnprocessedVariableName(variable) => self
                .get_variable(&variable.name)
                .cloned()
                .unwrap_or_else(|| Value::text(&variable.name)),
            Node::FunctionCall(call) => self.evaluate_function_call(call),
            Node::FunctionCallPreviousNodeValue(call) => {
                let function = self.evaluate(&call.previous);
                let arguments = match self.evaluate_arguments(&call.arguments) {
                    Ok(arguments) => arguments,
                    Err(error) => return error,
                };
                self.call_value(&function, None, arguments)
            }
            Node::ArrayValue(array) => match self.evaluate_arguments(&array.elements) {
                Ok(elements) => Value::array(elements),
                Err(error) => error,
            },
            Node::Operation(operation) => self.evaluate_operation(operation),
            Node::Assignment(assignment) => self.evaluate_assignment(assignment),
            Node::FunctionDefinition(definition) => self.define_function(definition),
            Node::StructDefinition(definition) => self.define_struct(definition),
            Node::ClassDefinition(definition) => self.define_class(definition),
            Node::Return(node) => {
                let value = match &node.value {
                    Some(value) => self.evaluate(value),
                    None => Value::Void,
                };
                self.return_value = Some(value.clone());
                value
            }
            Node::IfStatement(_)
            | Node::LoopStatement(_)
            | Node::LoopStatementContinueBreak(_)
            | Node::TryStatement(_)
            | Node::Throw(_) => self.error(
                InterpretingError::InvalidAstNode,
                Some(String::from("control flow statements can not be evaluated")),
            ),
            Node::ArgumentSeparator { .. } => self.error(
                InterpretingError::InvalidAstNode,
                Some(String::from("argument separator outside of an argument list")),
            ),
            Node::ParsingError(error) => self.error(
                InterpretingError::InvalidAstNode,
                Some(format!("{}: {}", error.error, error.message)),
            ),
        }
    }

    /// Evaluates an argument list. The first error value aborts evaluation.
    fn evaluate_arguments(&mut self, arguments: &[Node]) -> Result<Vec<Value>, Value> {
        let mut values = vec![];
        for argument in arguments {
            if matches!(argument, Node::ArgumentSeparator { .. }) {
                continue;
            }

            let value = self.evaluate(argument);
            if value.is_error() {
                return Err(value);
            }
            values.push(value);
        }

        Ok(values)
    }

    fn find_function(&self, name: &str) -> Option<Rc<FunctionPointer>> {
        match self.get_variable(name) {
            Some(Value::FunctionPointer(function)) => Some(function.clone()),
            _ => self.natives.get(&native_name(name)).cloned(),
        }
    }

    fn evaluate_function_call(&mut self, call: &FunctionCallNode) -> Value {
        let Some(function) = self.find_function(&call.name) else {
            return self.error(
                InterpretingError::FunctionNotFound,
                Some(format!("\"{}\" is not defined", call.name)),
            );
        };

        match self.evaluate_arguments(&call.arguments) {
            Ok(arguments) => call_function_pointer(self, &function, None, arguments),
            Err(error) => error,
        }
    }

    fn call_value(&mut self, function: &Value, this: Option<&Value>, arguments: Vec<Value>) -> Value {
        match function {
            Value::FunctionPointer(function) => call_function_pointer(self, function, this, arguments),
            Value::Error(_) => function.clone(),
            _ => self.error(
                InterpretingError::InvalidFuncPtr,
                Some(format!("{} can not be called", function.data_type())),
            ),
        }
    }

    /// `$object::fp.method(...)`
    fn call_method(&mut self, object: &Value, call: &FunctionCallNode) -> Value {
        let Value::Object(instance) = object else {
            return self.error(
                InterpretingError::InvalidArguments,
                Some(format!("{} has no methods", object.data_type())),
            );
        };

        let arguments = match self.evaluate_arguments(&call.arguments) {
            Ok(arguments) => arguments,
            Err(error) => return error,
        };

        let overloads = self.find_methods(instance, &call.name);
        let Some(method) = select_overload(&overloads, &arguments).cloned() else {
            return self.error(
                InterpretingError::InvalidArguments,
                Some(format!(
                    "no method \"{}\" of {} accepts the arguments",
                    call.name, instance.class_name
                )),
            );
        };

        call_function_pointer(self, &method, Some(object), arguments)
    }

    /// The member name of `target::name` is not evaluated.
    fn member_name(&mut self, node: &Node) -> Value {
        match node {
            Node::UnprocessedVariableName(variable) => Value::text(&variable.name),
            node => self.evaluate(node),
        }
    }

    fn evaluate_operation(&mut self, operation: &OperationNode) -> Value {
        match operation.operator {
            Operator::And | Operator::Or => {
                let left = self.evaluate(&operation.left);
                let short_circuit = to_bool(&left) == (operation.operator == Operator::Or);
                if short_circuit {
                    return Value::bool(operation.operator == Operator::Or);
                }
                let right = self.evaluate_operand(operation.right.as_deref());
                return Value::bool(to_bool(&right));
            }
            Operator::Elvis => {
                let left = self.evaluate(&operation.left);
                if to_bool(&left) {
                    return left;
                }
                return self.evaluate_operand(operation.right.as_deref());
            }
            Operator::NullCoalescing => {
                let left = self.evaluate(&operation.left);
                if !left.is_null_or_void() {
                    return left;
                }
                return self.evaluate_operand(operation.right.as_deref());
            }
            Operator::InlineIf => {
                let condition = self.evaluate(&operation.left);
                return if to_bool(&condition) {
                    self.evaluate_operand(operation.middle.as_deref())
                } else {
                    self.evaluate_operand(operation.right.as_deref())
                };
            }
            Operator::MemberAccess | Operator::OptionalMemberAccess => {
                if let Some(Node::FunctionCall(call)) = operation.right.as_deref() {
                    let object = self.evaluate(&operation.left);
                    if operation.operator == Operator::OptionalMemberAccess
                        && object.is_null_or_void()
                    {
                        return Value::Void;
                    }
                    return self.call_method(&object, call);
                }
            }
            _ => {}
        }

        let operands = match self.evaluate_operands(operation) {
            Ok(operands) => operands,
            Err(error) => return error,
        };

        evaluate_operator(self, operation.operator, &operands)
    }

    fn evaluate_operand(&mut self, node: Option<&Node>) -> Value {
        match node {
            Some(node) => self.evaluate(node),
            None => Value::Void,
        }
    }

    /// Error operands propagate, except into operators which inspect them.
    fn evaluate_operands(&mut self, operation: &OperationNode) -> Result<Vec<Value>, Value> {
        let propagates_errors = !matches!(
            operation.operator,
            Operator::Non
                | Operator::MathNon
                | Operator::ConditionalNon
                | Operator::Not
                | Operator::InstanceOf
                | Operator::Equals
                | Operator::NotEquals
                | Operator::StrictEquals
                | Operator::StrictNotEquals
        );

        let mut operands = vec![];
        for (i, node) in operation.operands().into_iter().enumerate() {
            let value = match (operation.operator, i) {
                (Operator::MemberAccess | Operator::OptionalMemberAccess, 1) => {
                    self.member_name(node)
                }
                (Operator::Cast, 0) => self.cast_type(node),
                _ => self.evaluate(node),
            };

            if propagates_errors && value.is_error() {
                return Err(value);
            }
            operands.push(value);
        }

        Ok(operands)
    }

    fn cast_type(&mut self, node: &Node) -> Value {
        let Node::Text { value, .. } = node else {
            return self.evaluate(node);
        };

        match DataType::from_name(value) {
            Some(data_type) => Value::Type(data_type),
            None => self.error(
                InterpretingError::InvalidArguments,
                Some(format!("\"{}\" is not a data type", value)),
            ),
        }
    }

    fn evaluate_assignment(&mut self, assignment: &AssignmentNode) -> Value {
        let value = self.evaluate(&assignment.rvalue);
        if value.is_error() {
            return value;
        }

        match assignment.lvalue.as_ref() {
            Node::UnprocessedVariableName(variable) => {
                self.set_variable(&variable.name, value.clone());
                value
            }
            Node::Text { value: key, .. } => {
                self.translations.insert(key.clone(), to_text(&value));
                value
            }
            Node::Operation(operation)
                if matches!(
                    operation.operator,
                    Operator::GetItem | Operator::MemberAccess
                ) =>
            {
                let mut operands = match self.evaluate_operands(operation) {
                    Ok(operands) => operands,
                    Err(error) => return error,
                };
                operands.push(value.clone());

                let result = evaluate_operator(self, Operator::SetItem, &operands);
                if result.is_error() {
                    return result;
                }
                value
            }
            lvalue => self.error(
                InterpretingError::InvalidAssignment,
                Some(format!("{} can not be assigned", lvalue)),
            ),
        }
    }

    /// Named functions are stored as `fp.<name>`.
    fn define_function(&mut self, definition: &FunctionDefinitionNode) -> Value {
        let function = Value::FunctionPointer(Rc::new(FunctionPointer::defined(Rc::new(
            definition.clone(),
        ))));

        if let Some(name) = &definition.name {
            let name = if name.starts_with("fp.") {
                name.clone()
            } else {
                format!("fp.{}", name)
            };
            self.set_variable(&name, function.clone());
        }

        function
    }

    fn define_struct(&mut self, definition: &StructDefinitionNode) -> Value {
        let members = definition
            .members
            .iter()
            .map(|member| StructMemberDefinition {
                name: member.name.clone(),
                constraint: constraint_of(member.type_constraint.as_deref()),
            })
            .collect();

        let value = Value::Struct(Rc::new(StructValue::definition(Rc::new(StructDefinition {
            name: Some(definition.name.clone()),
            members,
        }))));
        self.set_variable(&format!("&{}", definition.name), value.clone());

        value
    }

    fn object_member(&mut self, member: &ClassMember) -> Result<ObjectMember, Value> {
        let value = match &member.value {
            Some(node) => self.evaluate(node),
            None => Value::Null,
        };
        if value.is_error() {
            return Err(value);
        }

        Ok(ObjectMember {
            name: member.name.clone(),
            constraint: constraint_of(member.type_constraint.as_deref()),
            is_final: member.is_final,
            value,
        })
    }

    fn define_class(&mut self, definition: &ClassDefinitionNode) -> Value {
        let mut class = LangObject::class(&definition.name, definition.parent_classes.clone());

        for parent_name in &definition.parent_classes {
            let parent = match self.get_variable(&format!("&{}", parent_name)) {
                Some(Value::Object(parent)) if parent.is_class => parent.clone(),
                _ => {
                    return self.error(
                        InterpretingError::IncompatibleDataType,
                        Some(format!("\"{}\" is not a class", parent_name)),
                    )
                }
            };
            class.inherit(&parent);
        }

        for member in &definition.static_members {
            match self.object_member(member) {
                Ok(member) => class.members.get_mut().push(member),
                Err(error) => return error,
            }
        }
        for member in &definition.members {
            match self.object_member(member) {
                Ok(member) => class.instance_members.push(member),
                Err(error) => return error,
            }
        }

        for method in &definition.methods {
            let function = FunctionPointer::defined(Rc::new(method.definition.clone()));
            class.add_method(&method.name, Rc::new(function));
        }
        for constructor in &definition.constructors {
            let function = FunctionPointer::defined(Rc::new(constructor.definition.clone()));
            class.add_method("construct", Rc::new(function));
        }

        let value = Value::Object(Rc::new(class));
        self.set_variable(&format!("&{}", definition.name), value.clone());

        value
    }

    fn bind_parameters(
        &mut self,
        function: &FunctionPointer,
        arguments: Vec<Value>,
    ) -> Result<Environment, Value> {
        let mut environment = Environment::new();
        let mut arguments = arguments.into_iter();

        for parameter in &function.parameters {
            let value = if parameter.var_args {
                Value::array(arguments.by_ref().collect())
            } else {
                match arguments.next() {
                    Some(value) => value,
                    None => {
                        return Err(self.error(
                            InterpretingError::InvalidArgCount,
                            Some(format!("\"{}\" is missing", parameter.name)),
                        ))
                    }
                }
            };

            if !parameter.var_args && !parameter.constraint.allows(value.data_type()) {
                return Err(self.error(
                    InterpretingError::IncompatibleDataType,
                    Some(format!(
                        "{} is not allowed for parameter \"{}\"",
                        value.data_type(),
                        parameter.name
                    )),
                ));
            }

            environment.declare_variable(parameter.name.clone(), value);
        }

        if arguments.next().is_some() {
            return Err(self.error(
                InterpretingError::InvalidArgCount,
                Some(format!(
                    "at most {} arguments are allowed",
                    function.parameters.len()
                )),
            ));
        }

        Ok(environment)
    }

    fn call_defined(
        &mut self,
        function: &FunctionPointer,
        definition: &FunctionDefinitionNode,
        this: Option<&Value>,
        arguments: Vec<Value>,
    ) -> Option<Value> {
        if self.environments.len() >= MAX_CALL_DEPTH {
            return Some(self.error(InterpretingError::StackOverflow, None));
        }

        let mut environment = match self.bind_parameters(function, arguments) {
            Ok(environment) => environment,
            Err(error) => return Some(error),
        };
        if let Some(this) = this {
            environment.declare_variable(String::from("&this"), this.clone());
        }

        self.environments.push(environment);
        let mut result = None;
        for node in &definition.body {
            let value = self.evaluate(node);
            if let Some(value) = self.return_value.take() {
                result = Some(value);
                break;
            }
            if value.is_error() {
                result = Some(value);
                break;
            }
        }
        self.environments.pop();

        result
    }
}

impl OperatorContext for Evaluator {
    fn execute_function(
        &mut self,
        function: &FunctionPointer,
        this: Option<&Value>,
        arguments: Vec<Value>,
    ) -> Option<Value> {
        match &function.kind {
            FunctionKind::Native(_) if !function.accepts(&arguments) => Some(self.error(
                InterpretingError::InvalidArguments,
                Some(format!(
                    "\"{}\" does not accept the arguments",
                    function.name.as_deref().unwrap_or("<native>")
                )),
            )),
            FunctionKind::Native(native) => {
                let native = native.clone();
                let context: &mut dyn OperatorContext = self;
                Some(native(context, arguments))
            }
            FunctionKind::Defined(definition) => {
                let definition = definition.clone();
                self.call_defined(function, &definition, this, arguments)
            }
            _ => Some(self.error(
                InterpretingError::InvalidFuncPtr,
                Some(String::from("composed functions are called through their parts")),
            )),
        }
    }

    fn position(&self) -> CodePosition {
        self.position
    }
}

/// `func.new(&Definition, values...)` creates a struct or object instance.
fn construct(context: &mut dyn OperatorContext, arguments: Vec<Value>) -> Value {
    let mut arguments = arguments.into_iter();
    let definition = arguments.next();
    let arguments = arguments.collect::<Vec<_>>();

    match definition {
        Some(Value::Struct(definition)) if !definition.is_instance() => {
            match StructValue::instance(definition.definition.clone(), arguments) {
                Ok(instance) => Value::Struct(Rc::new(instance)),
                Err(message) => context.error(InterpretingError::IncompatibleDataType, Some(message)),
            }
        }
        Some(Value::Object(class)) if class.is_class => {
            let instance = Value::Object(Rc::new(LangObject::instance_of(&class)));
            let constructors = context.find_methods(&class, "construct");
            if constructors.is_empty() && arguments.is_empty() {
                return instance;
            }

            let Some(constructor) = select_overload(&constructors, &arguments).cloned() else {
                return context.error(
                    InterpretingError::InvalidArguments,
                    Some(format!("no constructor of {} accepts the arguments", class.class_name)),
                );
            };

            let result = call_function_pointer(context, &constructor, Some(&instance), arguments);
            if result.is_error() {
                return result;
            }
            instance
        }
        _ => context.error(
            InterpretingError::InvalidArguments,
            Some(String::from("a struct or class definition is required")),
        ),
    }
}

/// `func.typeOf(value)` returns the data type of a value.
fn type_of(context: &mut dyn OperatorContext, arguments: Vec<Value>) -> Value {
    match arguments.as_slice() {
        [value] => Value::Type(value.data_type()),
        _ => context.error(
            InterpretingError::InvalidArgCount,
            Some(String::from("exactly one argument is required")),
        ),
    }
}

