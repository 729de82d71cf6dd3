#![allow(clippy::needless_return)]

//! Loxwalk is a tree-walking interpreter for the Lox language, the toy
//! language from Bob Nystrom's [Crafting Interpreters](https://craftinginterpreters.com/).
//! It is dynamically typed, with lexical scoping, closures, and
//! single-inheritance classes.
//!
//! Loxwalk is a tree-walk interpreter: rather than compiling Lox source to
//! bytecode or machine code, it evaluates the abstract syntax tree (AST)
//! directly. This is simpler to build and reason about than a compiler, at
//! the cost of raw execution speed.
//!
//! ## Scanning
//! The first stage turns a string of source characters into a flat list of
//! tokens. A token is the smallest meaningful unit of the language — for
//! example, `1 + 2` becomes:
//! ```text
//! [Number(1), Plus, Number(2), EOF]
//! ```
//! The scanner is implemented in [`scanner`] as a character-at-a-time state
//! machine. It reports lexical errors (bad characters, unterminated
//! strings or numbers) to the shared [`error::Diagnostics`] sink and keeps
//! scanning afterward, so a single run can surface more than one mistake.
//!
//! ## Parsing
//! The second stage turns the token list into an AST: a tree of
//! [`Expressions`](expr::Expr) (code that produces an [`Object`](object::Object))
//! and [`Statements`](stmt::Stmt) (code that performs a side effect, like a
//! variable declaration or a print). The parser in [`parser`] is a
//! hand-written recursive-descent parser; on a syntax error it reports a
//! [`ParseError`](error::ParseError) and resynchronizes at the next
//! statement boundary rather than aborting outright.
//!
//! ## Resolving
//! The third stage is a static pass over the finished AST that computes,
//! for every variable/`this`/`super` use, how many environment links
//! separate its use site from its declaring scope. This is implemented in
//! [`resolver`] and is what lets closures and shadowed locals behave
//! correctly without a runtime scope search on every lookup. Resolver
//! errors ([`ResolveError`](error::ResolveError)) catch semantically
//! invalid but syntactically fine programs, like reading a local variable
//! in its own initializer.
//!
//! ## Interpreting
//! The final stage walks the resolved AST and evaluates it, implemented in
//! [`interpreter`]. Type errors, undefined names, bad call arity, and the
//! like surface only here, as [`RuntimeError`](error::RuntimeError)s —
//! they cannot be caught any earlier because Lox has no static type
//! system. The interpreter owns the global [`Environment`](environment::Environment)
//! and the chain of local scopes a running program pushes and pops as it
//! enters and leaves blocks, functions, and methods.

use std::process;

pub mod ast;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use error::Diagnostics;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// Exit code for a static error (scan, parse, or resolve).
pub const EX_DATAERR: i32 = 65;
/// Exit code for a runtime error.
pub const EX_SOFTWARE: i32 = 70;
/// Exit code for a misused command line.
pub const EX_USAGE: i32 = 64;

/// The top-level driver: owns the interpreter and the diagnostic sink
/// threaded through every pipeline stage, and runs source text end to end.
///
/// Kept thin by design — argument parsing and process exit codes belong to
/// the binary, not here, so this type is equally at home driving a test
/// harness that wants to inspect captured output.
pub struct Lox {
    interpreter: Interpreter,
    diagnostics: Diagnostics,
}

impl Lox {
    /// Builds a driver that writes both program output (`print` statements)
    /// and diagnostics to `output`.
    pub fn new(output: Box<dyn std::io::Write>) -> Self {
        Lox { interpreter: Interpreter::new(output), diagnostics: Diagnostics::default() }
    }

    /// Builds a driver whose program output and diagnostics go to two
    /// separate sinks, for tests that want to assert on each independently.
    pub fn with_sinks(output: Box<dyn std::io::Write>, diagnostics: Box<dyn std::io::Write>) -> Self {
        Lox { interpreter: Interpreter::new(output), diagnostics: Diagnostics::new(diagnostics) }
    }

    pub fn had_error(&self) -> bool {
        self.diagnostics.had_error()
    }

    /// True only for a scan/parse/resolve error, not a runtime one.
    pub fn had_static_error(&self) -> bool {
        self.diagnostics.had_static_error()
    }

    pub fn had_runtime_error(&self) -> bool {
        self.diagnostics.had_runtime_error()
    }

    /// Runs a whole file's worth of source, leaving the error flags set for
    /// the caller to inspect (and map to an exit code).
    pub fn run_file(&mut self, source: &str) {
        self.run(source);
    }

    /// Runs one line of REPL input. Per spec, a static error on one line
    /// must not prevent the next line from running, but a runtime error
    /// that happened earlier in the session still counts toward the final
    /// exit code.
    pub fn run_line(&mut self, source: &str) {
        self.run(source);
        self.diagnostics.reset_static_error();
    }

    fn run(&mut self, source: &str) {
        log::trace!("scanning {} bytes", source.len());
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens(&mut self.diagnostics);

        if self.diagnostics.had_error() {
            return;
        }

        log::trace!("parsing {} tokens", tokens.len());
        let mut parser = Parser::new(tokens);
        let statements = parser.parse(&mut self.diagnostics);

        if self.diagnostics.had_error() {
            return;
        }

        log::trace!("resolving {} statements", statements.len());
        let mut resolver = Resolver::new(&mut self.interpreter);
        resolver.resolve(&statements, &mut self.diagnostics);

        if self.diagnostics.had_error() {
            return;
        }

        log::trace!("interpreting");
        self.interpreter.interpret(&statements, &mut self.diagnostics);
    }
}

/// Maps the accumulated diagnostic state to the process exit code spec.md
/// assigns: 65 for a static error, 70 for a runtime error, 0 otherwise. A
/// static error takes priority, mirroring the reference's check order. The
/// two flags are checked independently, since a pure runtime error (no
/// static error at all) must still map to `EX_SOFTWARE`, not `EX_DATAERR`.
pub fn exit_code(lox: &Lox) -> i32 {
    if lox.had_static_error() {
        EX_DATAERR
    } else if lox.had_runtime_error() {
        EX_SOFTWARE
    } else {
        0
    }
}

/// Runs a file's contents and terminates the process with the matching
/// exit code. Never returns.
pub fn run_file_and_exit(source: &str) -> ! {
    let mut lox = Lox::new(Box::new(std::io::stdout()));
    lox.run_file(source);
    process::exit(exit_code(&lox));
}
