use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};

use crate::error::{Diagnostics, ScanError};
use crate::literal::Literal;
use crate::token::{Location, Token, Type};

/// Converts source text into a flat list of tokens, reporting lexical
/// errors (bad characters, unterminated strings/numbers) to the shared
/// diagnostic sink as it goes rather than stopping at the first one.
pub struct Scanner<'a> {
    source: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
    column_offset: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner { source: source.chars().peekmore(), tokens: vec![], start: 0, current: 0, line: 1, column_offset: 0 }
    }

    pub fn scan_tokens(&mut self, diagnostics: &mut Diagnostics) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token(diagnostics);
        }

        self.tokens.push(Token::new(Type::EOF, String::new(), None, Location::new(self.line, 1)));

        self.tokens.clone()
    }

    fn advance(&mut self) -> char {
        match self.source.next() {
            Some(c) => {
                self.current += 1;
                c
            }
            None => panic!("tried to advance past end of file"),
        }
    }

    fn peek(&mut self) -> char {
        self.source.peek().copied().unwrap_or('\0')
    }

    fn peek_next(&mut self) -> char {
        self.source.peek_next().copied().unwrap_or('\0')
    }

    fn match_next(&mut self, expected: char) -> bool {
        self.source.peek_next() == Some(&expected)
    }

    fn column(&self) -> usize {
        self.start - self.column_offset + 1
    }

    fn add_token(&mut self, r#type: Type, lexeme: String, literal: Option<Literal>) {
        self.tokens.push(Token::new(r#type, lexeme, literal, Location::new(self.line, self.column())));
    }

    fn add_single_char_token(&mut self, r#type: Type) {
        let c = self.advance();
        self.add_token(r#type, c.to_string(), None);
    }

    fn add_double_char_token(&mut self, r#type: Type) {
        let first = self.advance();
        let second = self.advance();
        self.add_token(r#type, format!("{first}{second}"), None);
    }

    fn is_at_end(&mut self) -> bool {
        self.source.peek().is_none()
    }

    fn string(&mut self, diagnostics: &mut Diagnostics) {
        self.advance(); // opening quote
        let location = Location::new(self.line, self.column());

        let mut value = Vec::new();
        while !self.is_at_end() && self.peek() != '"' {
            let c = self.advance();
            if c == '\n' {
                self.line += 1;
                self.column_offset = self.current;
            }
            value.push(c);
        }

        if self.is_at_end() {
            diagnostics.report_scan(&ScanError { location, message: "Unterminated string.".to_string() });
            return;
        }

        self.advance(); // closing quote

        let value: String = value.into_iter().collect();
        self.add_token(Type::String, value.clone(), Some(Literal::String(value)));
    }

    /// A leading or trailing `.` is not part of a number: the fractional
    /// part is only consumed when the `.` is followed by another digit.
    /// `123.foo` therefore scans as `NUMBER(123)`, `DOT`, `IDENTIFIER(foo)`
    /// rather than a lexical error — the parser and interpreter are left to
    /// reject `123.foo` as a property access on a non-instance.
    fn number(&mut self, _diagnostics: &mut Diagnostics) {
        let mut value = Vec::new();

        while self.peek().is_ascii_digit() {
            value.push(self.advance());
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            value.push(self.advance()); // the dot

            while self.peek().is_ascii_digit() {
                value.push(self.advance());
            }
        }

        let value: String = value.into_iter().collect();
        let value_num: f64 = value.parse().expect("digit run to parse as a number");

        self.add_token(Type::Number, value, Some(Literal::Number(value_num)));
    }

    fn identifier(&mut self) {
        let mut value = Vec::new();

        while matches!(self.peek(), c if c.is_alphanumeric() || c == '_') {
            value.push(self.advance());
        }

        let value = String::from_iter(value);
        let token_type = match value.as_str() {
            "and" => Type::And,
            "class" => Type::Class,
            "else" => Type::Else,
            "false" => Type::False,
            "for" => Type::For,
            "fun" => Type::Fun,
            "if" => Type::If,
            "nil" => Type::Nil,
            "or" => Type::Or,
            "print" => Type::Print,
            "return" => Type::Return,
            "super" => Type::Super,
            "this" => Type::This,
            "true" => Type::True,
            "var" => Type::Var,
            "while" => Type::While,
            _ => Type::Identifier,
        };

        self.add_token(token_type, value, None);
    }

    fn scan_token(&mut self, diagnostics: &mut Diagnostics) {
        let c = self.peek();
        match c {
            '(' => self.add_single_char_token(Type::LeftParen),
            ')' => self.add_single_char_token(Type::RightParen),
            '{' => self.add_single_char_token(Type::LeftBrace),
            '}' => self.add_single_char_token(Type::RightBrace),
            '[' => self.add_single_char_token(Type::LeftBracket),
            ']' => self.add_single_char_token(Type::RightBracket),
            ',' => self.add_single_char_token(Type::Comma),
            '.' => self.add_single_char_token(Type::Dot),
            '-' => self.add_single_char_token(Type::Minus),
            '+' => self.add_single_char_token(Type::Plus),
            ';' => self.add_single_char_token(Type::Semicolon),
            '*' => self.add_single_char_token(Type::Star),

            '!' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::BangEqual);
                } else {
                    self.add_single_char_token(Type::Bang);
                }
            }
            '=' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::EqualEqual);
                } else {
                    self.add_single_char_token(Type::Equal);
                }
            }
            '<' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::LessEqual);
                } else {
                    self.add_single_char_token(Type::Less);
                }
            }
            '>' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::GreaterEqual);
                } else {
                    self.add_single_char_token(Type::Greater);
                }
            }
            '/' => {
                if self.match_next('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_single_char_token(Type::Slash);
                }
            }

            ' ' | '\r' | '\t' => {
                self.advance();
            }

            '\n' => {
                self.advance();
                self.line += 1;
                self.column_offset = self.current;
            }

            '"' => self.string(diagnostics),

            c if c.is_ascii_digit() => self.number(diagnostics),

            c if c.is_alphabetic() || c == '_' => self.identifier(),

            _ => {
                self.advance();
                diagnostics.report_scan(&ScanError {
                    location: Location::new(self.line, self.column()),
                    message: format!("Unexpected character '{c}'."),
                });
            }
        }
    }
}
