use std::io::Write;

use thiserror::Error;

use crate::object::Object;
use crate::token::{Location, Token, Type};

/// Renders the `at end` / `at '<lexeme>'` clause shared by parse and resolve
/// diagnostics.
fn where_clause(token: &Token) -> String {
    if token.r#type == Type::EOF {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

/// Scanning (lexical) error: a bad character, unterminated string, or bad number.
#[derive(Debug, Error)]
#[error("[{}] Error: {}", self.location, self.message)]
pub struct ScanError {
    pub location: Location,
    pub message: String,
}

/// Parse error: the token the parser choked on and why.
#[derive(Debug, Error)]
#[error("[{}] Error{}: {}", self.token.location, where_clause(&self.token), self.message)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

/// Resolver (static semantic) error.
#[derive(Debug, Error)]
#[error("[{}] Error{}: {}", self.token.location, where_clause(&self.token), self.message)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

/// Runtime error, carrying the token whose evaluation triggered it.
#[derive(Debug, Error)]
#[error("{}\n[line {}]", self.message, self.token.location.line)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

/// Non-error completion signal threaded through statement execution.
///
/// `return` unwinds to the enclosing function call by propagating
/// `Unwind::Return` through `execute`/`execute_block` via `?`, rather than
/// by panicking or throwing — it must stop at exactly one call frame, which
/// `Function::call` is responsible for catching.
#[derive(Debug)]
pub enum Unwind {
    Return(Object),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}

/// The shared diagnostic sink: tracks whether a static or runtime error has
/// been seen so far and writes formatted messages to an output stream.
///
/// This replaces a global mutable flag with a value explicitly passed to
/// (or shared by `Rc<RefCell<_>>` with) each pipeline stage, per the
/// single-sink design every stage in this crate is built around.
pub struct Diagnostics {
    had_error: bool,
    had_runtime_error: bool,
    sink: Box<dyn Write>,
}

impl Diagnostics {
    pub fn new(sink: Box<dyn Write>) -> Self {
        Diagnostics { had_error: false, had_runtime_error: false, sink }
    }

    pub fn had_error(&self) -> bool {
        self.had_error || self.had_runtime_error
    }

    /// True only for a scan/parse/resolve error, independent of whether a
    /// runtime error also occurred. `exit_code` needs this distinction: a
    /// pure runtime error must map to `EX_SOFTWARE`, not `EX_DATAERR`.
    pub fn had_static_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Clears both flags; used when a fresh run (a new file, a new test)
    /// should not inherit a previous one's error state.
    pub fn reset(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }

    /// Clears only the static-error flag. The REPL calls this between
    /// lines: a syntax error on one line must not block the next line from
    /// running, but a runtime error should still be visible in the exit
    /// code once the session ends.
    pub fn reset_static_error(&mut self) {
        self.had_error = false;
    }

    pub fn report_scan(&mut self, error: &ScanError) {
        let _ = writeln!(self.sink, "{error}");
        self.had_error = true;
    }

    pub fn report_parse(&mut self, error: &ParseError) {
        let _ = writeln!(self.sink, "{error}");
        self.had_error = true;
    }

    pub fn report_resolve(&mut self, error: &ResolveError) {
        let _ = writeln!(self.sink, "{error}");
        self.had_error = true;
    }

    pub fn report_runtime(&mut self, error: &RuntimeError) {
        let _ = writeln!(self.sink, "{error}");
        self.had_runtime_error = true;
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Diagnostics::new(Box::new(std::io::stderr()))
    }
}
