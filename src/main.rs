use std::process::ExitCode;
use std::{env, fs};

use mini2c::error::Diagnostics;
use mini2c::{lexer, parser};

fn main() -> ExitCode {
    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: mini2c <file.mini>");
        return ExitCode::FAILURE;
    };

    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("error: cannot read {}: {}", path, error);
            return ExitCode::FAILURE;
        }
    };

    let mut diagnostics = Diagnostics::new();

    let tokens = lexer::lex(&source, &mut diagnostics);
    if diagnostics.has_errors() {
        diagnostics.emit(&path, &source);
        return ExitCode::FAILURE;
    }

    let module = parser::parse(&tokens, &mut diagnostics);
    if diagnostics.has_errors() {
        diagnostics.emit(&path, &source);
        return ExitCode::FAILURE;
    }

    println!("{}", module.render());
    ExitCode::SUCCESS
}
