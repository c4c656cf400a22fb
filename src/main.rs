//! NQL REPL: a synchronous read-eval-print loop over stdin.
//!
//! Prompt `NQL> ` reads one line, which is dispatched to the statement
//! pipeline (lex → parse → validate → execute → format). Special
//! commands (`help`, `clear`, `exit`) are intercepted before the line
//! ever reaches the lexer.

use std::io::{self, BufRead, Write};

use nql::catalog::{Catalog, EngineConfig};
use nql::error::{Error, ErrorKind};
use nql::parser::Parser;
use nql::{exec, format, ExecResult};

fn main() {
    env_logger::init();
    let mut catalog = Catalog::new(EngineConfig::default());
    run_repl(&mut catalog);
}

fn run_repl(catalog: &mut Catalog) {
    println!("NQL v{}: enter statements, `help` for commands, `exit` to quit.", env!("CARGO_PKG_VERSION"));

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("NQL> ");
        stdout.flush().unwrap();

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => break, // EOF
            Ok(_) => {
                let line = input.trim();
                if line.is_empty() {
                    continue;
                }
                match dispatch_command(line, catalog) {
                    CommandOutcome::Exit => break,
                    CommandOutcome::Handled => {}
                    CommandOutcome::NotACommand => run_statement(line, catalog),
                }
            }
            Err(e) => {
                eprintln!("Error: failed to read input: {e}");
                break;
            }
        }
    }

    std::process::exit(0);
}

enum CommandOutcome {
    Exit,
    Handled,
    NotACommand,
}

fn dispatch_command(line: &str, catalog: &Catalog) -> CommandOutcome {
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some(cmd) if cmd.eq_ignore_ascii_case("exit") || cmd.eq_ignore_ascii_case("quit") => {
            CommandOutcome::Exit
        }
        Some(cmd) if cmd.eq_ignore_ascii_case("clear") => {
            print!("\x1B[2J\x1B[1;1H");
            io::stdout().flush().unwrap();
            CommandOutcome::Handled
        }
        Some(cmd) if cmd.eq_ignore_ascii_case("help") => {
            print_help(parts.next());
            CommandOutcome::Handled
        }
        Some(cmd) if cmd.eq_ignore_ascii_case("describe") => {
            match parts.next() {
                Some(table_name) => print_describe(table_name, catalog),
                None => println!("Error: describe requires a table name"),
            }
            CommandOutcome::Handled
        }
        _ => CommandOutcome::NotACommand,
    }
}

fn print_help(topic: Option<&str>) {
    match topic {
        Some(topic) => println!(
            "No detailed help is available for '{topic}'; try `help` with no argument."
        ),
        None => {
            println!("Statements: SELECT, INSERT, UPDATE, DELETE, COUNT FROM,");
            println!("            CREATE TABLE, ALTER TABLE, DROP TABLE.");
            println!("Commands:   help [topic], describe <table>, clear, exit.");
        }
    }
}

fn print_describe(table_name: &str, catalog: &Catalog) {
    match catalog.find_table(table_name) {
        Some(table) => print!("{}", format::render_describe(table)),
        None => println!(
            "{}",
            Error::new(ErrorKind::UnknownTable(table_name.to_string()))
        ),
    }
}

fn run_statement(line: &str, catalog: &mut Catalog) {
    let stmt = match Parser::new(line).parse_statement() {
        Ok(stmt) => stmt,
        Err(err) => return print_error(line, &err),
    };

    match exec::execute(&stmt, catalog) {
        Ok(result) => print_result(result),
        Err(err) => print_error(line, &err),
    }
}

fn print_result(result: ExecResult) {
    match result {
        ExecResult::Rows { columns, rows } => print!("{}", format::render_rows(&columns, &rows)),
        ExecResult::RowsAffected(n) => println!("{n} row{} affected", if n == 1 { "" } else { "s" }),
        ExecResult::Count(n) => println!("{n}"),
        ExecResult::Done => println!("OK"),
    }
}

fn print_error(sql: &str, error: &Error) {
    println!("{error}");
    if let Some(span) = error.span() {
        if span.start <= sql.len() {
            let line_start = sql[..span.start].rfind('\n').map(|i| i + 1).unwrap_or(0);
            let line_end = sql[span.start..]
                .find('\n')
                .map(|i| span.start + i)
                .unwrap_or(sql.len());
            let line = &sql[line_start..line_end];
            let col = span.start - line_start;

            println!("  |");
            println!("  | {line}");
            println!("  | {}^", " ".repeat(col));
        }
    }
}
