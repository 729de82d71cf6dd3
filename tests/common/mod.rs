use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use loxwalk::Lox;

/// An in-memory `Write` sink multiple owners can read back from, since
/// `Lox` takes ownership of the `Box<dyn Write>` it's given.
#[derive(Clone, Default)]
pub struct SharedBuffer(pub Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs a snippet of Lox source through the full pipeline and returns
/// `(program output, diagnostics, had_error, had_runtime_error)`.
pub fn run(source: &str) -> (String, String, bool, bool) {
    let stdout = SharedBuffer::default();
    let stderr = SharedBuffer::default();

    let mut lox = Lox::with_sinks(Box::new(stdout.clone()), Box::new(stderr.clone()));
    lox.run_file(source);

    let output = String::from_utf8(stdout.0.borrow().clone()).expect("program output to be valid UTF-8");
    let diagnostics = String::from_utf8(stderr.0.borrow().clone()).expect("diagnostics to be valid UTF-8");

    (output, diagnostics, lox.had_error(), lox.had_runtime_error())
}

/// Returns the 1-based `(line, column)` of the character immediately
/// following `prefix`, as the scanner would count it (lines split on `\n`,
/// columns reset at each line start). Used to compute the exact location a
/// diagnostic is expected at, from the exact source text leading up to it,
/// rather than counting characters by hand.
pub fn locate_end(prefix: &str) -> (usize, usize) {
    let line = prefix.matches('\n').count() + 1;
    let col = match prefix.rfind('\n') {
        Some(newline) => prefix.len() - newline,
        None => prefix.len() + 1,
    };
    (line, col)
}

/// Builds a `(source, expected)` pair for a parse or resolve error: `prefix`
/// is the source text up to (not including) the offending token, `suffix`
/// completes the program, and `token`/`message` describe the diagnostic the
/// parser or resolver reports at that position.
pub fn parse_err_case(prefix: &str, suffix: &str, token: &str, message: &str) -> (&'static str, &'static str) {
    let source = format!("{prefix}{suffix}");
    let (line, col) = locate_end(prefix);
    let expected = format!("[{line}:{col}] Error at '{token}': {message}");
    (Box::leak(source.into_boxed_str()), Box::leak(expected.into_boxed_str()))
}

/// Like [`parse_err_case`], for a scan (lexical) error, whose diagnostic has
/// no `at '<token>'` clause.
pub fn scan_err_case(prefix: &str, suffix: &str, message: &str) -> (&'static str, &'static str) {
    let source = format!("{prefix}{suffix}");
    let (line, col) = locate_end(prefix);
    let expected = format!("[{line}:{col}] Error: {message}");
    (Box::leak(source.into_boxed_str()), Box::leak(expected.into_boxed_str()))
}

/// Builds a `(source, expected)` pair for a runtime error, whose diagnostic
/// collapses to just the line number on the final line. `prefix` is the
/// source text up to the token whose evaluation raises the error.
pub fn runtime_err_case(source: &'static str, prefix: &str) -> (&'static str, &'static str) {
    let (line, _) = locate_end(prefix);
    let expected = format!("[line {line}]");
    (source, Box::leak(expected.into_boxed_str()))
}

/// Builds a `(source, expected)` pair for a 256-parameter function
/// declaration, one past the 255-parameter limit.
pub fn too_many_params_case() -> (&'static str, &'static str) {
    let params: Vec<String> = (0..256).map(|i| format!("a{i}")).collect();
    let prefix = format!("fun f({}", params[..255].join(", "));
    let suffix = format!(", {}) {{}}", params[255]);
    parse_err_case(&prefix, &suffix, &params[255], "Can't have more than 255 parameters.")
}

/// Builds a `(source, expected)` pair for a call with 256 arguments, one
/// past the 255-argument limit.
pub fn too_many_args_case() -> (&'static str, &'static str) {
    let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
    let prefix = format!("fun f() {{}}\nf({}", args[..255].join(", "));
    let suffix = format!(", {});", args[255]);
    parse_err_case(&prefix, &suffix, &args[255], "Can't have more than 255 arguments.")
}

/// Like [`too_many_params_case`], for a method declaration.
pub fn too_many_method_params_case() -> (&'static str, &'static str) {
    let params: Vec<String> = (0..256).map(|i| format!("a{i}")).collect();
    let prefix = format!("class Foo {{\n  bar({}", params[..255].join(", "));
    let suffix = format!(", {}) {{}}\n}}", params[255]);
    parse_err_case(&prefix, &suffix, &params[255], "Can't have more than 255 parameters.")
}

/// Like [`too_many_args_case`], for a method call.
pub fn too_many_method_args_case() -> (&'static str, &'static str) {
    let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
    let prefix = format!("class Foo {{\n  bar() {{}}\n}}\nFoo().bar({}", args[..255].join(", "));
    let suffix = format!(", {});", args[255]);
    parse_err_case(&prefix, &suffix, &args[255], "Can't have more than 255 arguments.")
}

/// Declares one test that runs an inline Lox snippet and asserts on its
/// outcome.
///
/// `is OK "a" "b"` asserts the program prints exactly those lines (in
/// order) and raises neither a static nor a runtime error.
/// `is ERR "source", "message"` asserts the program raises an error (static
/// or runtime) and that the diagnostic sink's final line matches exactly.
/// `is CASE case_expr` is the same assertion, but takes a `(source,
/// expected)` pair built by [`parse_err_case`]/[`scan_err_case`]/
/// [`runtime_err_case`] instead of two separate arguments.
#[macro_export]
macro_rules! tests {
    ($name:ident is OK $source:expr $(, $expected:expr)* $(,)?) => {
        #[test]
        fn $name() {
            let (output, diagnostics, had_error, had_runtime_error) = $crate::common::run($source);
            assert!(!had_error, "unexpected static error(s):\n{diagnostics}");
            assert!(!had_runtime_error, "unexpected runtime error:\n{diagnostics}");

            let expected: Vec<&str> = vec![$($expected),*];
            let expected = if expected.is_empty() { String::new() } else { format!("{}\n", expected.join("\n")) };
            assert_eq!(output, expected);
        }
    };

    ($name:ident is ERR $source:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let (_output, diagnostics, had_error, had_runtime_error) = $crate::common::run($source);
            assert!(had_error || had_runtime_error, "expected an error, got none");
            assert_eq!(diagnostics.lines().last().unwrap_or(""), $expected);
        }
    };

    ($name:ident is CASE $case:expr) => {
        #[test]
        fn $name() {
            let (source, expected) = $case;
            let (_output, diagnostics, had_error, had_runtime_error) = $crate::common::run(source);
            assert!(had_error || had_runtime_error, "expected an error, got none");
            assert_eq!(diagnostics.lines().last().unwrap_or(""), expected);
        }
    };
}
