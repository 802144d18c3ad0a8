use fallible_iterator::FallibleIterator;
use std::env;
use std::fs;
use std::process::ExitCode;

use sql_script_parser::SqlScriptParser;

/// Split specified files and print all statements.
///
/// Usage: `sql_split [--dialect NAME] [--strip] FILE...`
fn main() -> ExitCode {
    env_logger::init();
    let mut parser = SqlScriptParser::default();
    let mut strip = false;
    let mut status = ExitCode::SUCCESS;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--strip" => strip = true,
            "--dialect" => {
                let name = args.next().unwrap_or_default();
                match SqlScriptParser::for_database(&name) {
                    Some(p) => parser = p,
                    None => {
                        eprintln!("Err: unknown dialect {name:?}");
                        return ExitCode::FAILURE;
                    }
                }
            }
            path => {
                println!("{path}");
                let script = match fs::read_to_string(path) {
                    Ok(script) => script,
                    Err(err) => {
                        eprintln!("Err: {err} in {path}");
                        status = ExitCode::FAILURE;
                        continue;
                    }
                };
                if let Err(err) = parser.check(&script) {
                    eprintln!("Warn: {err} in {path}");
                }
                if strip {
                    if let Some(cleaned) = parser.remove_comments(script.as_str()) {
                        println!("{cleaned}");
                    }
                    continue;
                }
                let mut statements = parser.statements(&script);
                while let Ok(Some(statement)) = statements.next() {
                    println!("{};", statement.trim());
                }
            }
        }
    }
    status
}
