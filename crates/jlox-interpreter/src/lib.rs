//! jlox interpreter: evaluates AST nodes with a simple tree-walking interpreter.
//!
//! Statements run against a chain of shared [`Env`] frames, so functions
//! capture the scope they were declared in and keep it alive after that scope
//! has finished. `print` output goes through an [`Output`] sink chosen by the
//! embedder.

pub mod value;
pub mod env;
pub mod flow;
pub mod output;
pub mod interpreter;

pub use value::{Function, Value};
pub use env::Env;
pub use output::{Capture, Discard, Output, Stdout};
pub use interpreter::{ExecStats, Interpreter, MAX_CALL_DEPTH};
