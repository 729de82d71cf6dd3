use std::collections::HashMap;
use std::mem;
use std::rc::Rc;

use crate::error::{Diagnostics, ResolveError};
use crate::expr::*;
use crate::interpreter::Interpreter;
use crate::stmt::*;
use crate::token::Token;

enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

enum ClassType {
    None,
    Class,
    Subclass,
}

/// Walks the AST once, before execution, resolving every variable/`this`/
/// `super` use to the number of environment links between its use site and
/// its declaring scope. The result is recorded into the interpreter's side
/// table, keyed by the token of the use site, rather than carried on the
/// AST nodes themselves.
pub struct Resolver<'a> {
    interpreter: &'a mut Interpreter,
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionType,
    current_class: ClassType,
}

impl<'a> Resolver<'a> {
    pub fn new(interpreter: &'a mut Interpreter) -> Self {
        Resolver { interpreter, scopes: vec![], current_function: FunctionType::None, current_class: ClassType::None }
    }

    fn resolve_expr(&mut self, expr: &Expr, diagnostics: &mut Diagnostics) {
        expr.accept(&mut Visit { resolver: self, diagnostics });
    }

    fn resolve_stmt(&mut self, stmt: &Stmt, diagnostics: &mut Diagnostics) {
        stmt.accept(&mut Visit { resolver: self, diagnostics });
    }

    pub fn resolve(&mut self, statements: &[Stmt], diagnostics: &mut Diagnostics) {
        for statement in statements {
            self.resolve_stmt(statement, diagnostics);
        }
    }

    fn resolve_function(&mut self, function: &Rc<FunctionData>, r#type: FunctionType, diagnostics: &mut Diagnostics) {
        let enclosing_function = mem::replace(&mut self.current_function, r#type);

        self.begin_scope();
        for param in &function.params {
            self.declare(param, diagnostics);
            self.define(param);
        }
        self.resolve(&function.body, diagnostics);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token, diagnostics: &mut Diagnostics) {
        if self.scopes.is_empty() {
            return;
        }

        let scope = self.scopes.last_mut().expect("scope stack to be non-empty");
        if scope.contains_key(&name.lexeme) {
            diagnostics.report_resolve(&ResolveError {
                token: name.clone(),
                message: format!("Already a variable with this name '{}' in this scope.", name.lexeme),
            });
        }
        scope.insert(name.lexeme.to_owned(), false);
    }

    fn define(&mut self, name: &Token) {
        if self.scopes.is_empty() {
            return;
        }

        self.scopes.last_mut().expect("scope stack to be non-empty").insert(name.lexeme.to_owned(), true);
    }

    fn resolve_local(&mut self, name: &Token) {
        for (i, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.interpreter.resolve(name, i);
                return;
            }
        }
    }
}

/// Adapter implementing the expr/stmt visitor traits, carrying the
/// diagnostics sink alongside the borrowed resolver for the duration of a
/// single `accept` call.
struct Visit<'a, 'b> {
    resolver: &'a mut Resolver<'b>,
    diagnostics: &'a mut Diagnostics,
}

impl<'a, 'b> ExprVisitor<()> for Visit<'a, 'b> {
    fn visit_variable_expr(&mut self, variable: &VariableData) {
        if let Some(scope) = self.resolver.scopes.last() {
            if let Some(false) = scope.get(&variable.name.lexeme) {
                self.diagnostics.report_resolve(&ResolveError {
                    token: variable.name.to_owned(),
                    message: "Can't read local variable in its own initializer.".to_string(),
                });
            }
        }

        self.resolver.resolve_local(&variable.name);
        if let Some(index) = &variable.index {
            self.resolver.resolve_expr(index, self.diagnostics);
        }
    }

    fn visit_assign_expr(&mut self, assign: &AssignData) {
        self.resolver.resolve_expr(&assign.value, self.diagnostics);
        if let Some(index) = &assign.index {
            self.resolver.resolve_expr(index, self.diagnostics);
        }
        self.resolver.resolve_local(&assign.name);
    }

    fn visit_literal_expr(&mut self, _literal: &crate::literal::Literal) {}

    fn visit_logical_expr(&mut self, logical: &LogicalData) {
        self.resolver.resolve_expr(&logical.left, self.diagnostics);
        self.resolver.resolve_expr(&logical.right, self.diagnostics);
    }

    fn visit_unary_expr(&mut self, unary: &UnaryData) {
        self.resolver.resolve_expr(&unary.expr, self.diagnostics);
    }

    fn visit_binary_expr(&mut self, binary: &BinaryData) {
        self.resolver.resolve_expr(&binary.left, self.diagnostics);
        self.resolver.resolve_expr(&binary.right, self.diagnostics);
    }

    fn visit_grouping_expr(&mut self, grouping: &GroupingData) {
        self.resolver.resolve_expr(&grouping.expr, self.diagnostics);
    }

    fn visit_call_expr(&mut self, call: &CallData) {
        self.resolver.resolve_expr(&call.callee, self.diagnostics);

        for argument in &call.arguments {
            self.resolver.resolve_expr(argument, self.diagnostics);
        }
    }

    fn visit_get_expr(&mut self, get: &GetData) {
        self.resolver.resolve_expr(&get.object, self.diagnostics);
    }

    fn visit_set_expr(&mut self, set: &SetData) {
        self.resolver.resolve_expr(&set.value, self.diagnostics);
        self.resolver.resolve_expr(&set.object, self.diagnostics);
    }

    fn visit_this_expr(&mut self, this: &ThisData) {
        if let ClassType::None = self.resolver.current_class {
            self.diagnostics.report_resolve(&ResolveError {
                token: this.keyword.clone(),
                message: "Can't use 'this' outside of a class.".to_string(),
            });
            return;
        }

        self.resolver.resolve_local(&this.keyword);
    }

    fn visit_super_expr(&mut self, super_: &SuperData) {
        match self.resolver.current_class {
            ClassType::Subclass => (),
            ClassType::None => self.diagnostics.report_resolve(&ResolveError {
                token: super_.keyword.clone(),
                message: "Can't use 'super' outside of a class.".to_string(),
            }),
            _ => self.diagnostics.report_resolve(&ResolveError {
                token: super_.keyword.clone(),
                message: "Can't use 'super' in a class with no superclass.".to_string(),
            }),
        }

        self.resolver.resolve_local(&super_.keyword);
    }
}

impl<'a, 'b> StmtVisitor<()> for Visit<'a, 'b> {
    fn visit_block_stmt(&mut self, block: &BlockData) {
        self.resolver.begin_scope();
        self.resolver.resolve(&block.statements, self.diagnostics);
        self.resolver.end_scope();
    }

    fn visit_var_stmt(&mut self, var: &VarData) {
        self.resolver.declare(&var.name, self.diagnostics);
        if let Some(length) = &var.length {
            self.resolver.resolve_expr(length, self.diagnostics);
        }
        if let Some(initializer) = &var.initializer {
            self.resolver.resolve_expr(initializer, self.diagnostics);
        }
        self.resolver.define(&var.name);
    }

    fn visit_function_stmt(&mut self, function: &Rc<FunctionData>) {
        self.resolver.declare(&function.name, self.diagnostics);
        self.resolver.define(&function.name);

        self.resolver.resolve_function(function, FunctionType::Function, self.diagnostics);
    }

    fn visit_expression_stmt(&mut self, stmt: &ExpressionData) {
        self.resolver.resolve_expr(&stmt.expr, self.diagnostics);
    }

    fn visit_if_stmt(&mut self, if_stmt: &IfData) {
        self.resolver.resolve_expr(&if_stmt.condition, self.diagnostics);
        self.resolver.resolve_stmt(&if_stmt.then_branch, self.diagnostics);
        if let Some(else_branch) = &if_stmt.else_branch {
            self.resolver.resolve_stmt(else_branch, self.diagnostics);
        }
    }

    fn visit_print_stmt(&mut self, print: &PrintData) {
        self.resolver.resolve_expr(&print.expr, self.diagnostics);
    }

    fn visit_return_stmt(&mut self, return_stmt: &ReturnData) {
        if let FunctionType::None = self.resolver.current_function {
            self.diagnostics.report_resolve(&ResolveError {
                token: return_stmt.keyword.clone(),
                message: "Can't return from top-level code.".to_string(),
            });
        }

        if let Some(value) = &return_stmt.value {
            if let FunctionType::Initializer = self.resolver.current_function {
                self.diagnostics.report_resolve(&ResolveError {
                    token: return_stmt.keyword.clone(),
                    message: "Can't return a value from an initializer.".to_string(),
                });
                return;
            }

            self.resolver.resolve_expr(value, self.diagnostics);
        }
    }

    fn visit_while_stmt(&mut self, while_stmt: &WhileData) {
        self.resolver.resolve_expr(&while_stmt.condition, self.diagnostics);
        self.resolver.resolve_stmt(&while_stmt.body, self.diagnostics);
    }

    fn visit_class_stmt(&mut self, class_stmt: &ClassData) {
        let enclosing_class = mem::replace(&mut self.resolver.current_class, ClassType::Class);

        self.resolver.declare(&class_stmt.name, self.diagnostics);
        self.resolver.define(&class_stmt.name);

        if let Some(superclass) = &class_stmt.superclass {
            if let Expr::Variable(variable) = superclass {
                if class_stmt.name.lexeme == variable.name.lexeme {
                    self.diagnostics.report_resolve(&ResolveError {
                        token: variable.name.clone(),
                        message: "A class can't inherit from itself.".to_string(),
                    });
                }
            }

            self.resolver.current_class = ClassType::Subclass;

            self.resolver.resolve_expr(superclass, self.diagnostics);

            self.resolver.begin_scope();
            self.resolver.scopes.last_mut().expect("scope stack to be non-empty").insert("super".to_string(), true);
        }

        self.resolver.begin_scope();
        self.resolver.scopes.last_mut().expect("scope stack to be non-empty").insert("this".to_string(), true);

        for method in &class_stmt.methods {
            let declaration =
                if method.name.lexeme == "init" { FunctionType::Initializer } else { FunctionType::Method };
            self.resolver.resolve_function(method, declaration, self.diagnostics);
        }

        self.resolver.end_scope();

        if class_stmt.superclass.is_some() {
            self.resolver.end_scope();
        }

        self.resolver.current_class = enclosing_class;
    }
}
