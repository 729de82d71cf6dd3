use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::Object;
use crate::token::Token;

/// A lexical scope: a map of names to values, plus a link to the enclosing
/// scope it shadows. Shared via `Rc<RefCell<_>>` so a closure can hold onto
/// the environment active at its declaration site after that scope's block
/// has otherwise finished executing.
#[derive(Debug, Clone)]
pub struct Environment {
    pub enclosing: Option<Rc<RefCell<Environment>>>,
    pub variables: HashMap<String, Object>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Self {
        Environment { enclosing, variables: HashMap::new() }
    }

    pub fn define(&mut self, name: &str, value: Object) {
        self.variables.insert(name.to_string(), value);
    }

    /// Walks `distance` enclosing links up from this environment.
    ///
    /// The resolver guarantees `distance` never exceeds the actual chain
    /// depth for a successfully resolved program, so a missing link here
    /// indicates a resolver bug rather than a user-facing error.
    fn ancestor(&self, distance: usize) -> Rc<RefCell<Environment>> {
        let mut environment = self
            .enclosing
            .clone()
            .unwrap_or_else(|| panic!("enclosing environment to exist at depth 1"));

        for i in 1..distance {
            let parent = environment
                .borrow()
                .enclosing
                .clone()
                .unwrap_or_else(|| panic!("enclosing environment to exist at depth {i}"));
            environment = parent;
        }

        environment
    }

    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if self.variables.contains_key(&name.lexeme) {
            self.variables.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    pub fn assign_at(&mut self, distance: usize, name: &Token, value: Object) {
        if distance > 0 {
            self.ancestor(distance).borrow_mut().variables.insert(name.lexeme.clone(), value);
        } else {
            self.variables.insert(name.lexeme.clone(), value);
        }
    }

    pub fn get(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(variable) = self.variables.get(&name.lexeme) {
            return Ok(variable.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    pub fn get_at(&self, distance: usize, name: &Token) -> Result<Object, RuntimeError> {
        let undefined = || RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        };

        if distance > 0 {
            self.ancestor(distance).borrow().variables.get(&name.lexeme).cloned().ok_or_else(undefined)
        } else {
            self.variables.get(&name.lexeme).cloned().ok_or_else(undefined)
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(None)
    }
}
