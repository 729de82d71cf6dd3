use std::cell::RefCell;
use std::fmt::{Debug, Display};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::{RuntimeError, Unwind};
use crate::interpreter::Interpreter;
use crate::object::{Callable, Object};
use crate::stmt::FunctionData;
use crate::token::{Location, Token, Type};

/// A user-defined function or method, closing over the environment active
/// at its declaration site.
///
/// `is_initializer` marks a class's `init` method: returning early from one
/// still yields the instance (`this`), rather than whatever value followed
/// `return`.
#[derive(Debug, Clone)]
pub struct Function {
    pub declaration: Rc<FunctionData>,
    pub closure: Rc<RefCell<Environment>>,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(declaration: Rc<FunctionData>, closure: Rc<RefCell<Environment>>, is_initializer: bool) -> Self {
        Function { declaration, closure, is_initializer }
    }

    /// Returns a copy of this function whose closure is a fresh scope
    /// binding `this` to `instance`, parented to the function's own closure.
    /// Used when a method is looked up off an instance.
    pub fn bind(&self, instance: Object) -> Function {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));
        environment.define("this", instance);
        Function::new(Rc::clone(&self.declaration), Rc::new(RefCell::new(environment)), self.is_initializer)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.declaration, &other.declaration) && Rc::ptr_eq(&self.closure, &other.closure)
    }
}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));

        for (param, arg) in self.declaration.params.iter().zip(arguments.into_iter()) {
            environment.define(&param.lexeme, arg);
        }

        let environment = Rc::new(RefCell::new(environment));
        match interpreter.execute_block(&self.declaration.body, environment) {
            Ok(()) => {
                if self.is_initializer {
                    self.closure.borrow().get_at(0, &Token::from("this"))
                } else {
                    Ok(Object::Literal(crate::literal::Literal::Nil))
                }
            }
            Err(Unwind::Return(value)) => {
                if self.is_initializer {
                    self.closure.borrow().get_at(0, &Token::from("this"))
                } else {
                    Ok(value)
                }
            }
            Err(Unwind::Error(error)) => Err(error),
        }
    }

    fn arity(&self) -> usize {
        self.declaration.params.len()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<fn {}>", self.declaration.name.lexeme)
    }
}

/// A builtin function implemented in Rust rather than Lox, installed
/// directly into the global scope.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: Token,
    pub arity: usize,
    pub function: fn(&mut Interpreter, Vec<Object>) -> Result<Object, RuntimeError>,
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        (self.function)(interpreter, arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && std::ptr::eq(self.function as *const (), other.function as *const ())
    }
}

impl NativeFunction {
    /// Returns every native function installed into a fresh interpreter's
    /// global scope: `clock()` (seconds since the Unix epoch, as a float)
    /// and `input()` (one line read from stdin, newline stripped).
    pub fn globals() -> Vec<NativeFunction> {
        vec![
            NativeFunction {
                name: Token::new(Type::Identifier, "clock".to_owned(), None, Location::new(0, 0)),
                arity: 0,
                function: |_, _| {
                    let now = std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .expect("system clock before Unix epoch")
                        .as_secs_f64();
                    Ok(Object::from(now))
                },
            },
            NativeFunction {
                name: Token::new(Type::Identifier, "input".to_owned(), None, Location::new(0, 0)),
                arity: 0,
                function: |_, _| {
                    let mut input = String::new();
                    std::io::stdin().read_line(&mut input).map_err(|e| RuntimeError {
                        token: Token::from("input"),
                        message: format!("Failed to read input: {e}"),
                    })?;
                    if input.ends_with('\n') {
                        input.pop();
                        if input.ends_with('\r') {
                            input.pop();
                        }
                    }
                    Ok(Object::from(input))
                },
            },
        ]
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<native fn>")
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<native fn {}>", self.name.lexeme)
    }
}
