//! Control flow for the interpreter.

use crate::value::Value;

/// How a statement finished.
#[derive(Debug)]
pub(crate) enum Flow {
    /// Continue normal execution with the given value
    Normal(Value),
    /// Unwinding towards the nearest function call with the returned value
    Return(Value),
}
