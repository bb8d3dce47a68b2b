use owo_colors::OwoColorize;

use jlox_syntax::error::{Error, ErrorKind};

/// Print `err` to stderr with the offending line of `source` when it is known.
pub fn render_error(source: &str, err: &Error) {
    let stage = if err.kind.is_compile_time() { "Compile error" } else { "Runtime error" };
    eprintln!("{} ({}): {}", stage.red().bold(), err.kind, err.msg.red());
    if let Some(line) = err.line {
        eprintln!("  --> line {}", line);
        if let Some(src_line) = line.checked_sub(1).and_then(|i| source.lines().nth(i)) {
            let gutter = format!("{:3} | ", line);
            eprintln!("     |");
            eprintln!("{}{}", gutter.bright_black(), src_line);
            eprintln!("     |");
        }
    }
    provide_error_suggestions(err);
}

fn provide_error_suggestions(err: &Error) {
    let hint = match err.kind {
        ErrorKind::UndefinedVariable => "Help: Declare the variable with 'var' before assigning to it.",
        ErrorKind::NilOperand => "Help: A variable declared without an initializer holds nil until assigned.",
        ErrorKind::NotCallable => "Help: Only functions declared with 'fun' can be called.",
        ErrorKind::ArityMismatch => "Help: Check the parameter list of the function being called.",
        ErrorKind::InvalidReturn => "Help: 'return' is only allowed inside a function body.",
        ErrorKind::StackOverflow => "Help: Make sure every recursive function has a reachable base case.",
        ErrorKind::Syntax if err.msg.contains("semicolon") => "Help: Every statement ends with ';'.",
        ErrorKind::Token if err.msg.contains("Unterminated string") => {
            "Help: Strings must be closed with '\"' on the same line."
        }
        _ => return,
    };
    eprintln!("{}", hint.yellow());
}
