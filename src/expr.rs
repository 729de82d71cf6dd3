#![allow(dead_code)]

use crate::literal::Literal;
use crate::token::Token;

/// An expression node. Each variant wraps a `*Data` struct carrying its
/// fields; dispatch is done by matching the variant rather than through
/// dynamic dispatch, since the set of expression shapes is closed.
#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Literal(Literal),
    Logical(LogicalData),
    Unary(UnaryData),
    Binary(BinaryData),
    Grouping(GroupingData),
    Variable(VariableData),
    Assign(AssignData),
    Call(CallData),
    Get(GetData),
    Set(SetData),
    This(ThisData),
    Super(SuperData),
}

#[derive(Debug, PartialEq, Clone)]
pub struct LogicalData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct UnaryData {
    pub operator: Token,
    pub expr: Box<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct BinaryData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct GroupingData {
    pub expr: Box<Expr>,
}

/// A variable read. `index` is present only for `x[i]` reads of a
/// fixed-length array (the optional extension from the design notes).
#[derive(Debug, PartialEq, Clone)]
pub struct VariableData {
    pub name: Token,
    pub index: Option<Box<Expr>>,
}

/// An assignment. `index` mirrors `VariableData`'s: present only for
/// `x[i] = value`.
#[derive(Debug, PartialEq, Clone)]
pub struct AssignData {
    pub name: Token,
    pub index: Option<Box<Expr>>,
    pub value: Box<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct CallData {
    pub callee: Box<Expr>,
    pub paren: Token,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct GetData {
    pub object: Box<Expr>,
    pub name: Token,
}

#[derive(Debug, PartialEq, Clone)]
pub struct SetData {
    pub object: Box<Expr>,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ThisData {
    pub keyword: Token,
}

#[derive(Debug, PartialEq, Clone)]
pub struct SuperData {
    pub keyword: Token,
    pub method: Token,
}

impl Expr {
    /// Accepts a visitor and returns the result of the visit.
    pub fn accept<T>(&self, visitor: &mut dyn ExprVisitor<T>) -> T {
        match self {
            Expr::Literal(data) => visitor.visit_literal_expr(data),
            Expr::Logical(data) => visitor.visit_logical_expr(data),
            Expr::Unary(data) => visitor.visit_unary_expr(data),
            Expr::Binary(data) => visitor.visit_binary_expr(data),
            Expr::Grouping(data) => visitor.visit_grouping_expr(data),
            Expr::Variable(data) => visitor.visit_variable_expr(data),
            Expr::Assign(data) => visitor.visit_assign_expr(data),
            Expr::Call(data) => visitor.visit_call_expr(data),
            Expr::Get(data) => visitor.visit_get_expr(data),
            Expr::Set(data) => visitor.visit_set_expr(data),
            Expr::This(data) => visitor.visit_this_expr(data),
            Expr::Super(data) => visitor.visit_super_expr(data),
        }
    }
}

pub trait ExprVisitor<T> {
    fn visit_literal_expr(&mut self, literal: &Literal) -> T;
    fn visit_logical_expr(&mut self, logical: &LogicalData) -> T;
    fn visit_unary_expr(&mut self, unary: &UnaryData) -> T;
    fn visit_binary_expr(&mut self, binary: &BinaryData) -> T;
    fn visit_grouping_expr(&mut self, grouping: &GroupingData) -> T;
    fn visit_variable_expr(&mut self, variable: &VariableData) -> T;
    fn visit_assign_expr(&mut self, assign: &AssignData) -> T;
    fn visit_call_expr(&mut self, call: &CallData) -> T;
    fn visit_get_expr(&mut self, get: &GetData) -> T;
    fn visit_set_expr(&mut self, set: &SetData) -> T;
    fn visit_this_expr(&mut self, this: &ThisData) -> T;
    fn visit_super_expr(&mut self, super_: &SuperData) -> T;
}
