use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::class::Class;
use crate::environment::Environment;
use crate::error::{Diagnostics, RuntimeError, Unwind};
use crate::expr::*;
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::*;
use crate::token::{Token, Type};

type EvalResult = Result<Object, RuntimeError>;
type ExecResult = Result<(), Unwind>;

/// Walks the resolved AST and evaluates it directly, without compiling to
/// an intermediate bytecode form.
///
/// `locals` is the resolver's side table: for each variable/`this`/`super`
/// use site (keyed by its token), how many environment links separate it
/// from its declaring scope. A use site missing from the table is assumed
/// global.
pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<Token, usize>,
    output: Box<dyn Write>,
}

impl Interpreter {
    pub fn new(output: Box<dyn Write>) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));
        for native in NativeFunction::globals() {
            globals.borrow_mut().define(&native.name.lexeme.clone(), Object::from(native));
        }

        Interpreter { environment: Rc::clone(&globals), globals, locals: HashMap::new(), output }
    }

    pub fn resolve(&mut self, name: &Token, depth: usize) {
        self.locals.insert(name.clone(), depth);
    }

    pub fn interpret(&mut self, statements: &[Stmt], diagnostics: &mut Diagnostics) {
        for statement in statements {
            if let Err(unwind) = self.execute(statement) {
                match unwind {
                    Unwind::Error(error) => {
                        diagnostics.report_runtime(&error);
                        return;
                    }
                    Unwind::Return(_) => unreachable!("return outside of a function call"),
                }
            }
        }
    }

    fn execute(&mut self, stmt: &Stmt) -> ExecResult {
        stmt.accept(self)
    }

    /// Runs `statements` with `environment` as the active scope, restoring
    /// the caller's scope afterward regardless of how execution ends.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> ExecResult {
        let previous = std::mem::replace(&mut self.environment, environment);

        let mut result = Ok(());
        for statement in statements {
            if let Err(unwind) = self.execute(statement) {
                result = Err(unwind);
                break;
            }
        }

        self.environment = previous;
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> EvalResult {
        expr.accept(self)
    }

    fn look_up_variable(&self, name: &Token) -> EvalResult {
        match self.locals.get(name) {
            Some(&distance) => self.environment.borrow().get_at(distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn assign_variable(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        match self.locals.get(name) {
            Some(&distance) => {
                self.environment.borrow_mut().assign_at(distance, name, value);
                Ok(())
            }
            None => self.globals.borrow_mut().assign(name, value),
        }
    }

    fn as_array(&self, object: Object, token: &Token) -> Result<Rc<RefCell<Vec<Object>>>, RuntimeError> {
        match object {
            Object::Array(array) => Ok(array),
            _ => Err(RuntimeError { token: token.clone(), message: "Variable is not an array.".to_string() }),
        }
    }

    fn array_index(&self, array: &Rc<RefCell<Vec<Object>>>, index: &Object, token: &Token) -> Result<usize, RuntimeError> {
        let index = index
            .as_number()
            .ok_or_else(|| RuntimeError { token: token.clone(), message: "Array index must be a number.".to_string() })?;

        let len = array.borrow().len();
        if index < 0.0 || index.fract() != 0.0 || index as usize >= len {
            return Err(RuntimeError {
                token: token.clone(),
                message: format!("Array index {index} out of bounds for length {len}."),
            });
        }

        Ok(index as usize)
    }
}

impl ExprVisitor<EvalResult> for Interpreter {
    fn visit_literal_expr(&mut self, literal: &Literal) -> EvalResult {
        Ok(Object::from(literal.clone()))
    }

    fn visit_logical_expr(&mut self, logical: &LogicalData) -> EvalResult {
        let left = self.evaluate(&logical.left)?;

        if logical.operator.r#type == Type::Or {
            if left.is_truthy() {
                return Ok(left);
            }
        } else if !left.is_truthy() {
            return Ok(left);
        }

        self.evaluate(&logical.right)
    }

    fn visit_unary_expr(&mut self, unary: &UnaryData) -> EvalResult {
        let right = self.evaluate(&unary.expr)?;

        match unary.operator.r#type {
            Type::Bang => Ok(Object::from(!right.is_truthy())),
            Type::Minus => right
                .as_number()
                .map(|n| Object::from(-n))
                .ok_or_else(|| RuntimeError { token: unary.operator.clone(), message: "Operand must be a number.".to_string() }),
            _ => unreachable!("unary operator must be '!' or '-'"),
        }
    }

    fn visit_binary_expr(&mut self, binary: &BinaryData) -> EvalResult {
        let left = self.evaluate(&binary.left)?;
        let right = self.evaluate(&binary.right)?;
        let operator = &binary.operator;

        let numbers = |token: &Token| -> Result<(f64, f64), RuntimeError> {
            match (left.as_number(), right.as_number()) {
                (Some(l), Some(r)) => Ok((l, r)),
                _ => Err(RuntimeError { token: token.clone(), message: "Operand must be a number.".to_string() }),
            }
        };

        match operator.r#type {
            Type::Minus => numbers(operator).map(|(l, r)| Object::from(l - r)),
            Type::Slash => numbers(operator).map(|(l, r)| Object::from(l / r)),
            Type::Star => numbers(operator).map(|(l, r)| Object::from(l * r)),
            Type::Greater => numbers(operator).map(|(l, r)| Object::from(l > r)),
            Type::GreaterEqual => numbers(operator).map(|(l, r)| Object::from(l >= r)),
            Type::Less => numbers(operator).map(|(l, r)| Object::from(l < r)),
            Type::LessEqual => numbers(operator).map(|(l, r)| Object::from(l <= r)),
            Type::Plus => match (left.as_number(), right.as_number(), left.as_string(), right.as_string()) {
                (Some(l), Some(r), _, _) => Ok(Object::from(l + r)),
                (_, _, Some(l), Some(r)) => Ok(Object::from(format!("{l}{r}"))),
                _ => Err(RuntimeError {
                    token: operator.clone(),
                    message: "Operands must be two numbers or two strings.".to_string(),
                }),
            },
            Type::EqualEqual => Ok(Object::from(left == right)),
            Type::BangEqual => Ok(Object::from(left != right)),
            _ => unreachable!("unexpected binary operator"),
        }
    }

    fn visit_grouping_expr(&mut self, grouping: &GroupingData) -> EvalResult {
        self.evaluate(&grouping.expr)
    }

    fn visit_variable_expr(&mut self, variable: &VariableData) -> EvalResult {
        let value = self.look_up_variable(&variable.name)?;

        match &variable.index {
            Some(index_expr) => {
                let array = self.as_array(value, &variable.name)?;
                let index_value = self.evaluate(index_expr)?;
                let index = self.array_index(&array, &index_value, &variable.name)?;
                Ok(array.borrow()[index].clone())
            }
            None => Ok(value),
        }
    }

    fn visit_assign_expr(&mut self, assign: &AssignData) -> EvalResult {
        let value = self.evaluate(&assign.value)?;

        match &assign.index {
            Some(index_expr) => {
                let target = self.look_up_variable(&assign.name)?;
                let array = self.as_array(target, &assign.name)?;
                let index_value = self.evaluate(index_expr)?;
                let index = self.array_index(&array, &index_value, &assign.name)?;
                array.borrow_mut()[index] = value.clone();
            }
            None => self.assign_variable(&assign.name, value.clone())?,
        }

        Ok(value)
    }

    fn visit_call_expr(&mut self, call: &CallData) -> EvalResult {
        let callee = self.evaluate(&call.callee)?;

        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let arity = match &callee {
            Object::Function(function) => function.arity(),
            Object::NativeFunction(native) => native.arity(),
            Object::Class(class) => class.arity(),
            _ => {
                return Err(RuntimeError {
                    token: call.paren.clone(),
                    message: "Can only call functions and classes.".to_string(),
                })
            }
        };

        if arguments.len() != arity {
            return Err(RuntimeError {
                token: call.paren.clone(),
                message: format!("Expected {arity} arguments but got {}.", arguments.len()),
            });
        }

        match callee {
            Object::Function(function) => function.call(self, arguments),
            Object::NativeFunction(native) => native.call(self, arguments),
            Object::Class(class) => class.call(self, arguments),
            _ => unreachable!("callability already checked above"),
        }
    }

    fn visit_get_expr(&mut self, get: &GetData) -> EvalResult {
        let object = self.evaluate(&get.object)?;

        match &object {
            Object::Instance(instance) => instance.borrow().get(&get.name, &object),
            _ => Err(RuntimeError { token: get.name.clone(), message: "Only instances have properties.".to_string() }),
        }
    }

    fn visit_set_expr(&mut self, set: &SetData) -> EvalResult {
        let object = self.evaluate(&set.object)?;

        let Object::Instance(instance) = &object else {
            return Err(RuntimeError { token: set.name.clone(), message: "Only instances have fields.".to_string() });
        };

        let value = self.evaluate(&set.value)?;
        instance.borrow_mut().set(&set.name, value.clone());
        Ok(value)
    }

    fn visit_this_expr(&mut self, this: &ThisData) -> EvalResult {
        self.look_up_variable(&this.keyword)
    }

    fn visit_super_expr(&mut self, super_: &SuperData) -> EvalResult {
        let distance = *self.locals.get(&super_.keyword).expect("'super' to always resolve to a distance");
        let superclass = self.environment.borrow().get_at(distance, &super_.keyword)?;

        let Object::Class(superclass) = superclass else { unreachable!("'super' must resolve to a class") };

        // `this` always lives one scope closer than `super` in the chain
        // the resolver builds around a method body.
        let this_token = Token::from("this");
        let instance = self.environment.borrow().get_at(distance - 1, &this_token)?;

        let method = superclass.borrow().find_method(&super_.method.lexeme).ok_or_else(|| RuntimeError {
            token: super_.method.clone(),
            message: format!("Undefined property '{}'.", super_.method.lexeme),
        })?;

        Ok(Object::from(method.bind(instance)))
    }
}

impl StmtVisitor<ExecResult> for Interpreter {
    fn visit_expression_stmt(&mut self, stmt: &ExpressionData) -> ExecResult {
        self.evaluate(&stmt.expr)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, stmt: &PrintData) -> ExecResult {
        let value = self.evaluate(&stmt.expr)?;
        let _ = writeln!(self.output, "{value}");
        Ok(())
    }

    fn visit_var_stmt(&mut self, stmt: &VarData) -> ExecResult {
        let value = if let Some(length) = &stmt.length {
            let length = self.evaluate(length)?;
            let length = length
                .as_number()
                .ok_or_else(|| RuntimeError { token: stmt.name.clone(), message: "Array length must be a number.".to_string() })?;
            if length < 0.0 || length.fract() != 0.0 {
                return Err(Unwind::Error(RuntimeError {
                    token: stmt.name.clone(),
                    message: "Array length must be a non-negative integer.".to_string(),
                }));
            }
            let fill = match &stmt.initializer {
                Some(initializer) => self.evaluate(initializer)?,
                None => Object::Literal(Literal::Nil),
            };
            // A declared length of exactly 0 stores the plain value rather
            // than a zero-element array, matching the original's
            // `length == 0` special case in `visitVarStmt`.
            if length == 0.0 {
                fill
            } else {
                Object::Array(Rc::new(RefCell::new(vec![fill; length as usize])))
            }
        } else {
            match &stmt.initializer {
                Some(initializer) => self.evaluate(initializer)?,
                None => Object::Literal(Literal::Nil),
            }
        };

        self.environment.borrow_mut().define(&stmt.name.lexeme, value);
        Ok(())
    }

    fn visit_block_stmt(&mut self, stmt: &BlockData) -> ExecResult {
        let scope = Environment::new(Some(Rc::clone(&self.environment)));
        self.execute_block(&stmt.statements, Rc::new(RefCell::new(scope)))
    }

    fn visit_if_stmt(&mut self, stmt: &IfData) -> ExecResult {
        if self.evaluate(&stmt.condition)?.is_truthy() {
            self.execute(&stmt.then_branch)
        } else if let Some(else_branch) = &stmt.else_branch {
            self.execute(else_branch)
        } else {
            Ok(())
        }
    }

    fn visit_while_stmt(&mut self, stmt: &WhileData) -> ExecResult {
        while self.evaluate(&stmt.condition)?.is_truthy() {
            self.execute(&stmt.body)?;
        }
        Ok(())
    }

    fn visit_function_stmt(&mut self, stmt: &Rc<FunctionData>) -> ExecResult {
        let function = Function::new(Rc::clone(stmt), Rc::clone(&self.environment), false);
        self.environment.borrow_mut().define(&stmt.name.lexeme, Object::from(function));
        Ok(())
    }

    fn visit_return_stmt(&mut self, stmt: &ReturnData) -> ExecResult {
        let value = match &stmt.value {
            Some(expr) => self.evaluate(expr)?,
            None => Object::Literal(Literal::Nil),
        };

        Err(Unwind::Return(value))
    }

    fn visit_class_stmt(&mut self, stmt: &ClassData) -> ExecResult {
        let superclass = match &stmt.superclass {
            Some(expr) => {
                let value = self.evaluate(expr)?;
                match value {
                    Object::Class(class) => Some(class),
                    _ => {
                        let Expr::Variable(variable) = expr else { unreachable!() };
                        return Err(Unwind::Error(RuntimeError {
                            token: variable.name.clone(),
                            message: "Superclass must be a class.".to_string(),
                        }));
                    }
                }
            }
            None => None,
        };

        self.environment.borrow_mut().define(&stmt.name.lexeme, Object::Literal(Literal::Nil));

        let enclosing = superclass.as_ref().map(|superclass| {
            let scope = Environment::new(Some(Rc::clone(&self.environment)));
            let previous = std::mem::replace(&mut self.environment, Rc::new(RefCell::new(scope)));
            self.environment.borrow_mut().define("super", Object::Class(Rc::clone(superclass)));
            previous
        });

        let mut methods = HashMap::new();
        for method in &stmt.methods {
            let is_initializer = method.name.lexeme == "init";
            let function = Function::new(Rc::clone(method), Rc::clone(&self.environment), is_initializer);
            methods.insert(method.name.lexeme.clone(), function);
        }

        let class = Rc::new(RefCell::new(Class::new(stmt.name.lexeme.clone(), superclass, methods)));

        if let Some(previous) = enclosing {
            self.environment = previous;
        }

        self.environment.borrow_mut().assign(&stmt.name, Object::Class(class))?;
        Ok(())
    }
}
