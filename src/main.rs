use std::io::Write;
use std::path::PathBuf;
use std::{env, fs, process};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use loxwalk::{exit_code, Lox};

const HISTORY_FILE: &str = ".loxwalk_history";

fn history_path() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(HISTORY_FILE))
}

fn run_file(path: &str) -> ! {
    let source = fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("Could not read file '{path}': {err}");
        process::exit(74);
    });

    let mut lox = Lox::new(Box::new(std::io::stdout()));
    lox.run_file(&source);
    process::exit(exit_code(&lox));
}

fn run_prompt() -> ! {
    let mut editor = DefaultEditor::new().expect("terminal line editor to initialize");
    let history = history_path();
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    let mut lox = Lox::new(Box::new(std::io::stdout()));

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                if line.is_empty() {
                    break;
                }
                let _ = editor.add_history_entry(&line);
                lox.run_line(&line);
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error reading input: {err}");
                break;
            }
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }

    std::io::stdout().flush().ok();
    process::exit(exit_code(&lox));
}

fn main() {
    if env::var("RUST_LOG").is_ok() {
        simple_logger::init().expect("logger to initialize at most once");
    }

    let args: Vec<String> = env::args().skip(1).collect();

    match args.len() {
        0 => run_prompt(),
        1 => run_file(&args[0]),
        _ => {
            println!("Usage: loxwalk [script]");
            process::exit(64);
        }
    }
}

