use std::rc::Rc;

use crate::expr::*;
use crate::literal::Literal;
use crate::stmt::*;

/// Renders an expression as a fully-parenthesized Lisp-like string, for
/// debugging the parser's output.
macro_rules! parenthesize {
    ( $self:ident, $name:expr, $( $x:expr ),+ ) => {
        {
            let mut string = String::new();
            string += "(";
            string += $name;
            $(
                string += " ";
                string += &$x.accept($self);
            )*
            string += ")";

            string
        }
    };
}

pub struct ASTPrinter;

impl ASTPrinter {
    pub fn print(&mut self, expr: &Expr) -> String {
        expr.accept(self)
    }

    pub fn print_stmt(&mut self, stmt: &Stmt) -> String {
        stmt.accept(self)
    }
}

impl ExprVisitor<String> for ASTPrinter {
    fn visit_literal_expr(&mut self, literal: &Literal) -> String {
        literal.to_string()
    }

    fn visit_logical_expr(&mut self, logical: &LogicalData) -> String {
        parenthesize!(self, &logical.operator.lexeme, &logical.left, &logical.right)
    }

    fn visit_unary_expr(&mut self, unary: &UnaryData) -> String {
        parenthesize!(self, &unary.operator.lexeme, &unary.expr)
    }

    fn visit_binary_expr(&mut self, binary: &BinaryData) -> String {
        parenthesize!(self, &binary.operator.lexeme, &binary.left, &binary.right)
    }

    fn visit_grouping_expr(&mut self, grouping: &GroupingData) -> String {
        parenthesize!(self, "group", grouping.expr)
    }

    fn visit_variable_expr(&mut self, variable: &VariableData) -> String {
        match &variable.index {
            Some(index) => format!("{}[{}]", variable.name.lexeme, index.accept(self)),
            None => variable.name.lexeme.clone(),
        }
    }

    fn visit_assign_expr(&mut self, assign: &AssignData) -> String {
        let target = match &assign.index {
            Some(index) => format!("{}[{}]", assign.name.lexeme, index.accept(self)),
            None => assign.name.lexeme.clone(),
        };
        parenthesize!(self, format!("= {target}").as_str(), assign.value)
    }

    fn visit_call_expr(&mut self, call: &CallData) -> String {
        let mut string = call.callee.accept(self);
        string += "(";
        for arg in &call.arguments {
            string += &arg.accept(self);
            string += " ";
        }
        let string = string.trim_end().to_string();
        string + ")"
    }

    fn visit_get_expr(&mut self, get: &GetData) -> String {
        parenthesize!(self, format!(". {}", get.name.lexeme).as_str(), get.object)
    }

    fn visit_set_expr(&mut self, set: &SetData) -> String {
        let label = format!("= . {}", set.name.lexeme);
        parenthesize!(self, label.as_str(), set.object, set.value)
    }

    fn visit_this_expr(&mut self, _this: &ThisData) -> String {
        "this".to_string()
    }

    fn visit_super_expr(&mut self, super_: &SuperData) -> String {
        format!("(super {})", super_.method.lexeme)
    }
}

impl StmtVisitor<String> for ASTPrinter {
    fn visit_expression_stmt(&mut self, stmt: &ExpressionData) -> String {
        parenthesize!(self, "expr", stmt.expr)
    }

    fn visit_function_stmt(&mut self, stmt: &Rc<FunctionData>) -> String {
        let mut string = String::new();
        string += "(fun ";
        string += &stmt.name.lexeme;
        string += "(";
        for param in &stmt.params {
            string += &param.lexeme;
            string += " ";
        }
        string = string.trim_end().to_string();
        string += ") { ";
        string += &stmt.body.iter().map(|s| s.accept(self)).collect::<Vec<String>>().join(" ");
        string += " })";

        string
    }

    fn visit_if_stmt(&mut self, stmt: &IfData) -> String {
        let mut string = String::new();
        string += "(if ";
        string += &stmt.condition.accept(self);
        string += " ";
        string += &stmt.then_branch.accept(self);
        if let Some(else_branch) = &stmt.else_branch {
            string += " else ";
            string += &else_branch.accept(self);
        }
        string += ")";

        string
    }

    fn visit_print_stmt(&mut self, stmt: &PrintData) -> String {
        parenthesize!(self, "print", stmt.expr)
    }

    fn visit_var_stmt(&mut self, stmt: &VarData) -> String {
        let mut string = String::new();
        string += "(var ";
        string += &stmt.name.lexeme;
        if let Some(length) = &stmt.length {
            string += "[";
            string += &length.accept(self);
            string += "]";
        }
        if let Some(initializer) = &stmt.initializer {
            string += " = ";
            string += &initializer.accept(self);
        }
        string += ")";

        string
    }

    fn visit_while_stmt(&mut self, stmt: &WhileData) -> String {
        parenthesize!(self, "while", stmt.condition, stmt.body)
    }

    fn visit_block_stmt(&mut self, stmt: &BlockData) -> String {
        let mut string = String::new();
        string += "{";
        for s in &stmt.statements {
            string += " ";
            string += &s.accept(self);
        }
        string += " }";

        string
    }

    fn visit_return_stmt(&mut self, stmt: &ReturnData) -> String {
        match &stmt.value {
            Some(value) => parenthesize!(self, "return", value),
            None => "(return)".to_string(),
        }
    }

    fn visit_class_stmt(&mut self, stmt: &ClassData) -> String {
        let mut string = String::new();
        string += "(class ";
        string += &stmt.name.lexeme;
        if let Some(superclass) = &stmt.superclass {
            string += " < ";
            string += &superclass.accept(self);
        }
        string += " ";
        string += &stmt.methods.iter().map(|m| m.name.lexeme.clone()).collect::<Vec<String>>().join(" ");
        string += ")";

        string
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::token::{Location, Token, Type};

    #[test]
    fn prints_binary_expression() {
        let expr = Expr::Binary(BinaryData {
            left: Box::new(Expr::Literal(Literal::Number(1.0))),
            operator: Token::new(Type::Plus, "+".to_string(), None, Location::new(1, 1)),
            right: Box::new(Expr::Literal(Literal::Number(2.0))),
        });

        assert_eq!(ASTPrinter.print(&expr), "(+ 1 2)");
    }

    #[test]
    fn prints_array_index() {
        let expr = Expr::Variable(VariableData {
            name: Token::from("xs"),
            index: Some(Box::new(Expr::Literal(Literal::Number(0.0)))),
        });

        assert_eq!(ASTPrinter.print(&expr), "xs[0]");
    }
}
