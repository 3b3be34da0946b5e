use std::{cell::RefCell, io::Write, rc::Rc};

use clap::Parser;

use imperative::{interpreter::Interpreter, parser, scanner, session::Session};

const EXIT_FAILURE: i32 = 69;

#[derive(Debug, Parser)]
#[command(name = "imperative")]
struct Cli {
    /// Source file to run; starts the interactive prompt when omitted.
    script: Vec<String>,
}

fn main() {
    let args = Cli::parse();

    match args.script.as_slice() {
        [] => repl(),
        [path] => run_file(path),
        _ => {
            eprintln!("Usage: imperative [source]");
            std::process::exit(EXIT_FAILURE);
        }
    }
}

fn run_file(path: &str) {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Could not read {}: {}", path, error);
            std::process::exit(EXIT_FAILURE);
        }
    };

    let session = Session::new();
    let mut interpreter = Interpreter::new(&session, Rc::new(RefCell::new(std::io::stdout())));
    if run(&session, &mut interpreter, &source) {
        std::process::exit(EXIT_FAILURE);
    }
}

fn repl() {
    let session = Session::new();
    let mut interpreter = Interpreter::new(&session, Rc::new(RefCell::new(std::io::stdout())));

    loop {
        let mut input = String::new();

        print!(">> ");
        std::io::stdout()
            .flush()
            .expect("should be able to flush stdout");

        let read = std::io::stdin()
            .read_line(&mut input)
            .expect("should be able to read line from stdin");
        if read == 0 {
            break;
        }

        // Errors in one line do not abort the session.
        run(&session, &mut interpreter, &input);
    }
}

/// Drives one source through scan, parse and interpret, reporting every
/// diagnostic to stderr. Returns whether any error occurred.
fn run(session: &Session, interpreter: &mut Interpreter, source: &str) -> bool {
    let (tokens, scan_errors) = scanner::scan(source);
    for error in &scan_errors {
        eprintln!("{}", error);
    }

    let program = match parser::parse(session, &tokens) {
        Ok(program) => program,
        Err(errors) => {
            for error in &errors {
                eprintln!("{}", error);
            }
            return true;
        }
    };

    // Evaluation is skipped entirely when the source did not scan cleanly.
    if !scan_errors.is_empty() {
        return true;
    }

    if let Err(error) = interpreter.interpret(&program) {
        eprintln!("{}", error);
        return true;
    }

    false
}
