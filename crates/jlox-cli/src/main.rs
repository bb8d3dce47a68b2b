mod common;
mod logger;
mod repl;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use log::{debug, LevelFilter};
use owo_colors::OwoColorize;

use jlox_interpreter::Interpreter;
use jlox_syntax::error::Result;

use crate::common::render_error;

#[derive(Parser, Debug)]
#[command(name = "jlox", version, about = "Run a jlox script, or start a REPL when no path is given")]
struct Cli {
    /// Script to run
    path: Option<PathBuf>,

    /// Diagnostic log verbosity (stderr)
    #[arg(long = "log-level", env = "JLOX_LOG", value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn run_source(src: &str) -> Result<()> {
    let tokens = jlox_scanner::scan(src.lines())?;
    let program = jlox_parser::parse(&tokens)?;
    Interpreter::new().run(&program)
}

fn run_file(path: &Path) {
    let src = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!(
                "{}: {}",
                "error".red().bold(),
                format!("Failed to read {}: {}", path.display(), e).red()
            );
            std::process::exit(1);
        }
    };
    debug!("running {}", path.display());
    if let Err(e) = run_source(&src) {
        render_error(&src, &e);
        std::process::exit(1);
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logger::init(cli.log_level.into()) {
        eprintln!("{}: {}", "warning".yellow().bold(), e);
    }

    match cli.path {
        Some(path) => run_file(&path),
        None => repl::start_repl(),
    }
}
