use std::rc::Rc;

use crate::error::{Diagnostics, ParseError};
use crate::expr::*;
use crate::literal::Literal;
use crate::stmt::*;
use crate::token::{Token, Type};

type ParseResult<T> = Result<T, ParseError>;

/// Returns if the next token is any of the given types.
macro_rules! matches {
    ( $self:ident, $( $type:expr ),+ ) => {
        {
            if $( $self.check($type) ) ||* {
                $self.advance();
                true
            } else {
                false
            }
        }
    }
}

/// Parses the tokens produced by the scanner into a list of statements.
///
/// - Program     -> Declaration* EOF ;
/// - Block       -> "{" Declaration* "}" ;
/// - Declaration -> ClassDecl | FunDecl | VarDecl | Statement ;
/// - ClassDecl   -> "class" IDENTIFIER ( "<" IDENTIFIER )? "{" Function* "}" ;
/// - FunDecl     -> "fun" Function ;
/// - VarDecl     -> "var" IDENTIFIER ( "[" Expression "]" )? ( "=" Expression )? ";" ;
/// - Function    -> IDENTIFIER "(" Parameters? ")" Block ;
/// - Parameters  -> IDENTIFIER ( "," IDENTIFIER )* ;
/// - Statement   -> ExprStmt | ForStmt | IfStmt | PrintStmt | ReturnStmt | WhileStmt | Block ;
/// - ExprStmt    -> Expression ";" ;
/// - ForStmt     -> "for" "(" ( Declaration | ExprStmt | ";" ) Expression? ";" Expression? ")" Statement ;
/// - IfStmt      -> "if" "(" Expression ")" Statement ( "else" Statement )? ;
/// - PrintStmt   -> "print" Expression ";" ;
/// - ReturnStmt  -> "return" Expression? ";" ;
/// - WhileStmt   -> "while" "(" Expression ")" Statement ;
/// - Expression  -> Assignment ;
/// - Assignment  -> ( Call "." )? IDENTIFIER ( "[" Expression "]" )? "=" Assignment | LogicOr ;
/// - LogicOr     -> LogicAnd ( "or" LogicAnd )* ;
/// - LogicAnd    -> Equality ( "and" Equality )* ;
/// - Equality    -> Comparison ( ( "!=" | "==" ) Comparison )* ;
/// - Comparison  -> Term ( ( ">" | ">=" | "<" | "<=" ) Term )* ;
/// - Term        -> Factor ( ( "+" | "-" ) Factor )* ;
/// - Factor      -> Unary ( ( "*" | "/" ) Unary )* ;
/// - Unary       -> ( "!" | "-" ) Unary | Call ;
/// - Arguments   -> Expression ( "," Expression )* ;
/// - Call        -> Primary ( "(" Arguments? ")" | "." IDENTIFIER )* ;
/// - Primary     -> NUMBER | STRING | "false" | "true" | "nil" | "this"
///                | "(" Expression ")" | IDENTIFIER ( "[" Expression "]" )?
///                | "super" "." IDENTIFIER ;
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, current: 0 }
    }

    /// Parses the tokens and returns the resulting program as a list of
    /// statements. Declarations that fail to parse are skipped after
    /// synchronizing, so a single bad statement doesn't stop the parser
    /// from reporting errors in the rest of the file.
    pub fn parse(&mut self, diagnostics: &mut Diagnostics) -> Vec<Stmt> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration(diagnostics) {
                statements.push(stmt);
            }
        }

        statements
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().r#type == Type::EOF
    }

    fn check(&self, r#type: Type) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().r#type == r#type
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    fn consume(&mut self, r#type: Type, message: &str) -> ParseResult<&Token> {
        if self.check(r#type) {
            return Ok(self.advance());
        }

        Err(ParseError { token: self.peek().clone(), message: message.to_string() })
    }

    fn declaration(&mut self, diagnostics: &mut Diagnostics) -> Option<Stmt> {
        let statement = if matches!(self, Type::Class) {
            self.class_declaration(diagnostics)
        } else if matches!(self, Type::Fun) {
            self.function("function", diagnostics).map(Stmt::Function)
        } else if matches!(self, Type::Var) {
            self.var_declaration(diagnostics)
        } else {
            self.statement(diagnostics)
        };

        match statement {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                diagnostics.report_parse(&error);
                self.synchronize();
                None
            }
        }
    }

    fn class_declaration(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, "Expect class name.")?.clone();

        let superclass = if matches!(self, Type::Less) {
            self.consume(Type::Identifier, "Expect superclass name.")?;
            Some(Expr::Variable(VariableData { name: self.previous().clone(), index: None }))
        } else {
            None
        };

        self.consume(Type::LeftBrace, "Expect '{' before class body.")?;

        let mut methods = vec![];
        while !self.check(Type::RightBrace) && !self.is_at_end() {
            methods.push(self.function("method", diagnostics)?);
        }

        self.consume(Type::RightBrace, "Expect '}' after class body.")?;

        Ok(Stmt::Class(ClassData { name, superclass, methods }))
    }

    /// Parses `var NAME;`, `var NAME = expr;`, or the fixed-length array
    /// forms `var NAME[len];` and `var NAME[len] = expr;` (every slot is
    /// initialized to `expr`'s value).
    fn var_declaration(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, "Expect variable name.")?.clone();

        if matches!(self, Type::LeftBracket) {
            let length = self.expression(diagnostics)?;
            self.consume(Type::RightBracket, "Expect ']' after array length.")?;

            let initializer =
                if matches!(self, Type::Equal) { Some(Box::new(self.expression(diagnostics)?)) } else { None };

            self.consume(Type::Semicolon, "Expect ';' after array declaration.")?;
            return Ok(Stmt::Var(VarData { name, length: Some(Box::new(length)), initializer }));
        }

        let initializer =
            if matches!(self, Type::Equal) { Some(Box::new(self.expression(diagnostics)?)) } else { None };

        self.consume(Type::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::Var(VarData { name, length: None, initializer }))
    }

    fn while_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression(diagnostics)?;
        self.consume(Type::RightParen, "Expect ')' after condition.")?;
        let body = self.statement(diagnostics)?;

        Ok(Stmt::While(WhileData { condition: Box::new(condition), body: Box::new(body) }))
    }

    fn expression(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        self.assignment(diagnostics)
    }

    fn statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        if matches!(self, Type::For) {
            return self.for_statement(diagnostics);
        }

        if matches!(self, Type::If) {
            return self.if_statement(diagnostics);
        }

        if matches!(self, Type::Print) {
            return self.print_statement(diagnostics);
        }

        if matches!(self, Type::Return) {
            return self.return_statement(diagnostics);
        }

        if matches!(self, Type::While) {
            return self.while_statement(diagnostics);
        }

        if matches!(self, Type::LeftBrace) {
            return Ok(Stmt::Block(BlockData { statements: self.block(diagnostics)? }));
        }

        self.expression_statement(diagnostics)
    }

    fn for_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if matches!(self, Type::Semicolon) {
            None
        } else if matches!(self, Type::Var) {
            Some(self.var_declaration(diagnostics)?)
        } else {
            Some(self.expression_statement(diagnostics)?)
        };

        let condition = if !self.check(Type::Semicolon) { Some(self.expression(diagnostics)?) } else { None };
        self.consume(Type::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if !self.check(Type::RightParen) { Some(self.expression(diagnostics)?) } else { None };
        self.consume(Type::RightParen, "Expect ')' after loop clauses.")?;

        let mut body = self.statement(diagnostics)?;

        if let Some(increment) = increment {
            body = Stmt::Block(BlockData {
                statements: vec![body, Stmt::Expression(ExpressionData { expr: increment })],
            });
        }

        body = Stmt::While(WhileData {
            condition: Box::new(condition.unwrap_or(Expr::Literal(Literal::Bool(true)))),
            body: Box::new(body),
        });

        if let Some(initializer) = initializer {
            body = Stmt::Block(BlockData { statements: vec![initializer, body] });
        }

        Ok(body)
    }

    fn if_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression(diagnostics)?;
        self.consume(Type::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement(diagnostics)?);
        let else_branch = if matches!(self, Type::Else) { Some(Box::new(self.statement(diagnostics)?)) } else { None };

        Ok(Stmt::If(IfData { condition: Box::new(condition), then_branch, else_branch }))
    }

    fn print_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        let expr = self.expression(diagnostics)?;
        self.consume(Type::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(PrintData { expr }))
    }

    fn return_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        let keyword = self.previous().to_owned();

        let value = if self.check(Type::Semicolon) { None } else { Some(Box::new(self.expression(diagnostics)?)) };

        self.consume(Type::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return(ReturnData { keyword, value }))
    }

    fn expression_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        let expr = self.expression(diagnostics)?;
        self.consume(Type::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(ExpressionData { expr }))
    }

    fn function(&mut self, kind: &str, diagnostics: &mut Diagnostics) -> ParseResult<Rc<FunctionData>> {
        let name = self.consume(Type::Identifier, &format!("Expect {kind} name."))?.to_owned();

        self.consume(Type::LeftParen, &format!("Expect '(' after {kind} name."))?;

        let mut params = vec![];

        if !self.check(Type::RightParen) {
            loop {
                if params.len() >= 255 {
                    diagnostics.report_parse(&ParseError {
                        token: self.peek().to_owned(),
                        message: "Can't have more than 255 parameters.".to_string(),
                    });
                }

                params.push(self.consume(Type::Identifier, "Expect parameter name.")?.to_owned());

                if !matches!(self, Type::Comma) {
                    break;
                }
            }
        }

        self.consume(Type::RightParen, "Expect ')' after parameters.")?;
        self.consume(Type::LeftBrace, &format!("Expect '{{' before {kind} body."))?;

        let body = self.block(diagnostics)?;

        Ok(Rc::new(FunctionData { name, params, body }))
    }

    fn block(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(Type::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration(diagnostics) {
                statements.push(stmt);
            }
        }

        self.consume(Type::RightBrace, "Expect '}' after block.")?;

        Ok(statements)
    }

    fn assignment(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let expr = self.or(diagnostics)?;

        if matches!(self, Type::Equal) {
            let equals = self.previous().to_owned();
            let value = self.assignment(diagnostics)?;

            return match expr {
                Expr::Variable(data) => Ok(Expr::Assign(AssignData {
                    name: data.name,
                    index: data.index,
                    value: Box::new(value),
                })),
                Expr::Get(data) => Ok(Expr::Set(SetData { object: data.object, name: data.name, value: Box::new(value) })),
                _ => Err(ParseError { token: equals, message: "Invalid assignment target.".to_string() }),
            };
        }

        Ok(expr)
    }

    fn or(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.and(diagnostics)?;

        while matches!(self, Type::Or) {
            let operator = self.previous().clone();
            let right = self.and(diagnostics)?;
            expr = Expr::Logical(LogicalData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn and(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.equality(diagnostics)?;

        while matches!(self, Type::And) {
            let operator = self.previous().clone();
            let right = self.equality(diagnostics)?;
            expr = Expr::Logical(LogicalData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn equality(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.comparison(diagnostics)?;

        while matches!(self, Type::BangEqual, Type::EqualEqual) {
            let operator = self.previous().clone();
            let right = self.comparison(diagnostics)?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn comparison(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.term(diagnostics)?;

        while matches!(self, Type::Greater, Type::GreaterEqual, Type::Less, Type::LessEqual) {
            let operator = self.previous().clone();
            let right = self.term(diagnostics)?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn term(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.factor(diagnostics)?;

        while matches!(self, Type::Minus, Type::Plus) {
            let operator = self.previous().clone();
            let right = self.factor(diagnostics)?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn factor(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.unary(diagnostics)?;

        while matches!(self, Type::Slash, Type::Star) {
            let operator = self.previous().clone();
            let right = self.unary(diagnostics)?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn unary(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        if matches!(self, Type::Bang, Type::Minus) {
            let operator = self.previous().clone();
            let right = self.unary(diagnostics)?;

            return Ok(Expr::Unary(UnaryData { operator, expr: Box::new(right) }));
        }

        self.call(diagnostics)
    }

    /// Parses the argument list of a call. An argument count over 255 is
    /// reported without aborting the parse: the over-limit call is still
    /// fully parsed, matching the teacher's non-aborting `finish_call`.
    fn finish_call(&mut self, callee: Expr, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut arguments = vec![];

        if !self.check(Type::RightParen) {
            loop {
                if arguments.len() >= 255 {
                    diagnostics.report_parse(&ParseError {
                        token: self.peek().to_owned(),
                        message: "Can't have more than 255 arguments.".to_string(),
                    });
                }

                arguments.push(self.expression(diagnostics)?);

                if !matches!(self, Type::Comma) {
                    break;
                }
            }
        }

        let paren = self.consume(Type::RightParen, "Expect ')' after arguments.")?.to_owned();

        Ok(Expr::Call(CallData { callee: Box::new(callee), paren, arguments }))
    }

    fn call(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        let mut expr = self.primary(diagnostics)?;

        loop {
            if matches!(self, Type::LeftParen) {
                expr = self.finish_call(expr, diagnostics)?;
            } else if matches!(self, Type::Dot) {
                let name = self.consume(Type::Identifier, "Expect property name after '.'.")?.clone();
                expr = Expr::Get(GetData { object: Box::new(expr), name });
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn primary(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Expr> {
        if matches!(self, Type::False) {
            return Ok(Expr::Literal(Literal::Bool(false)));
        }

        if matches!(self, Type::True) {
            return Ok(Expr::Literal(Literal::Bool(true)));
        }

        if matches!(self, Type::Nil) {
            return Ok(Expr::Literal(Literal::Nil));
        }

        if matches!(self, Type::Number, Type::String) {
            return Ok(Expr::Literal(
                self.previous().clone().literal.expect("number or string token to carry a literal"),
            ));
        }

        if matches!(self, Type::Super) {
            let keyword = self.previous().clone();
            self.consume(Type::Dot, "Expect '.' after 'super'.")?;
            let method = self.consume(Type::Identifier, "Expect superclass method name.")?.clone();

            return Ok(Expr::Super(SuperData { keyword, method }));
        }

        if matches!(self, Type::This) {
            return Ok(Expr::This(ThisData { keyword: self.previous().clone() }));
        }

        if matches!(self, Type::Identifier) {
            let name = self.previous().clone();

            let index = if matches!(self, Type::LeftBracket) {
                let index_expr = self.expression(diagnostics)?;
                self.consume(Type::RightBracket, "Expect ']' after array index.")?;
                Some(Box::new(index_expr))
            } else {
                None
            };

            return Ok(Expr::Variable(VariableData { name, index }));
        }

        if matches!(self, Type::LeftParen) {
            let expr = self.expression(diagnostics)?;
            self.consume(Type::RightParen, "Expect ')' after expression.")?;

            return Ok(Expr::Grouping(GroupingData { expr: Box::new(expr) }));
        }

        Err(ParseError { token: self.peek().clone(), message: "Expect expression.".to_string() })
    }

    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().r#type == Type::Semicolon {
                return;
            }

            match self.peek().r#type {
                Type::Class | Type::Fun | Type::Var | Type::For | Type::If | Type::While | Type::Print | Type::Return => return,
                _ => {
                    self.advance();
                }
            };
        }
    }
}
