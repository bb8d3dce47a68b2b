use std::io::{self, Write};

use owo_colors::OwoColorize;

use jlox_interpreter::{Env, ExecStats, Interpreter, Value};
use jlox_syntax::error::Result;
use jlox_syntax::token::TokenKind;

use crate::common::render_error;

pub fn start_repl() {
    println!("{}", "jlox REPL. Type :help for help, :quit to exit.".bold().green());

    let mut interpreter = Interpreter::new();
    let mut env = Env::new_root();

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() { "jlox> " } else { "... > " };
        print!("{}", prompt.cyan());
        let _ = io::stdout().flush();

        let mut line = String::new();
        let n = match io::stdin().read_line(&mut line) {
            Ok(n) => n,
            Err(_) => {
                println!("<input error>");
                break;
            }
        };
        if n == 0 {
            // EOF
            println!("\nGoodbye.");
            break;
        }
        let trimmed = line.trim_end();

        if buffer.is_empty() && trimmed.starts_with(':') {
            match trimmed {
                ":quit" | ":q" | ":exit" => {
                    println!("Goodbye.");
                    break;
                }
                ":help" | ":h" => print_help(),
                ":vars" => print_vars(&env),
                ":stats" => print_stats(&interpreter.stats()),
                ":reset" => {
                    interpreter.reset_stats();
                    env = Env::new_root();
                    println!("{}", "State reset.".yellow());
                }
                _ => println!("{}", "Unknown command. Type :help.".red()),
            }
            continue;
        }

        buffer.push_str(&line);
        if !is_complete(&buffer) {
            continue;
        }

        match eval_chunk(&mut interpreter, &env, &buffer) {
            Ok(Some(val)) => println!("{}", val.to_string().bright_blue()),
            Ok(None) => {}
            Err(e) => render_error(&buffer, &e),
        }
        buffer.clear();
    }
}

/// Run one complete chunk against the session's root environment.
fn eval_chunk(interpreter: &mut Interpreter, env: &Env, chunk: &str) -> Result<Option<Value>> {
    let tokens = jlox_scanner::scan_str(chunk)?;
    let program = jlox_parser::parse(&tokens)?;
    interpreter.run_with_env(&program, env)
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  {}   {}", ":help".yellow(), "Show this help");
    println!("  {}   {}", ":quit".yellow(), "Exit the REPL (also :q, :exit)");
    println!("  {}   {}", ":vars".yellow(), "List top-level variables");
    println!("  {}  {}", ":stats".yellow(), "Show execution statistics");
    println!("  {}  {}", ":reset".yellow(), "Clear variables and statistics");
    println!("Type statements to run them. Input continues while braces or parentheses are open.");
}

fn print_vars(env: &Env) {
    let vars = env.vars_snapshot();
    if vars.is_empty() {
        println!("{}", "<no vars>".dimmed());
        return;
    }
    for (k, v) in vars {
        println!("{} = {}", k.yellow(), v.to_string().bright_blue());
    }
}

fn print_stats(stats: &ExecStats) {
    let ExecStats { statements, calls, scopes } = stats;
    println!("{}: {}", "statements".yellow(), statements);
    println!("{}: {}", "calls".yellow(), calls);
    println!("{}: {}", "scopes".yellow(), scopes);
}

/// True once every `(` and `{` in `input` has been closed.
///
/// Input that fails to scan counts as complete so the error is reported
/// instead of waiting for more lines.
fn is_complete(input: &str) -> bool {
    let tokens = match jlox_scanner::scan_str(input) {
        Ok(t) => t,
        Err(_) => return true,
    };
    let mut paren = 0i32;
    let mut brace = 0i32;
    for tk in &tokens {
        match tk.kind {
            TokenKind::LeftParen => paren += 1,
            TokenKind::RightParen => paren -= 1,
            TokenKind::LeftBrace => brace += 1,
            TokenKind::RightBrace => brace -= 1,
            _ => {}
        }
    }
    paren <= 0 && brace <= 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_complete() {
        assert!(is_complete("print 1;\n"));
        assert!(!is_complete("fun f() {\n"));
        assert!(!is_complete("print (1 +\n"));
        assert!(is_complete("fun f() {\n  return 1;\n}\n"));
        assert!(is_complete("print \"open;\n"));
        assert!(is_complete("}\n"));
    }

    #[test]
    fn test_eval_chunk_keeps_state() {
        let mut interpreter = Interpreter::with_output(jlox_interpreter::Discard);
        let env = Env::new_root();
        assert_eq!(eval_chunk(&mut interpreter, &env, "var a = 2;\n").unwrap(), None);
        assert!(eval_chunk(&mut interpreter, &env, "a = nil + 1;\n").is_err());
        assert_eq!(
            eval_chunk(&mut interpreter, &env, "a * 21;\n").unwrap(),
            Some(Value::Number(42.0))
        );
    }
}
