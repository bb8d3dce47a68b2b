//! Error handling types shared by every jlox pipeline stage.
//!
//! Scanning, parsing, and evaluation all report failures through the same
//! [`Error`] struct. Each error records which stage of the taxonomy it belongs
//! to ([`ErrorKind`]), a human-readable message, and the source line when one
//! is known.
//!
//! # Examples
//!
//! ```rust
//! use jlox_syntax::error::{error_at, Error, ErrorKind, Result};
//!
//! fn expect_semicolon(found: &str, line: usize) -> Result<()> {
//!     if found == ";" {
//!         Ok(())
//!     } else {
//!         error_at(ErrorKind::Syntax, line, "Missing semicolon \";\" after expression")
//!     }
//! }
//!
//! let err = expect_semicolon("}", 4).unwrap_err();
//! assert_eq!(err.kind, ErrorKind::Syntax);
//! assert_eq!(err.to_string(), "Missing semicolon \";\" after expression at line 4");
//!
//! // Runtime errors raised without a line can pick one up on the way out.
//! let late = Error::new(ErrorKind::UndefinedVariable, "Undefined variable \"x\"").with_line(7);
//! assert_eq!(late.line, Some(7));
//! ```

use std::fmt;

/// The category of an [`Error`].
///
/// `Token` and `Syntax` stop a compile before anything runs; every other kind
/// is raised while evaluating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// An input fragment matches no lexeme rule.
    #[error("Token error")]
    Token,
    /// A structural grammar violation.
    #[error("Syntax error")]
    Syntax,
    /// Assignment to a name with no enclosing declaration.
    #[error("Undefined variable")]
    UndefinedVariable,
    /// Arithmetic or ordering attempted on a `nil` operand.
    #[error("Nil operand")]
    NilOperand,
    /// Calling something that is not a function.
    #[error("Not callable")]
    NotCallable,
    /// Calling a function with the wrong number of arguments.
    #[error("Arity mismatch")]
    ArityMismatch,
    /// An operator applied to operands of the wrong type.
    #[error("Type error")]
    Type,
    /// `return` evaluated outside of any function call.
    #[error("Invalid return")]
    InvalidReturn,
    /// Function calls nested deeper than the interpreter allows.
    #[error("Stack overflow")]
    StackOverflow,
}

impl ErrorKind {
    /// True for kinds raised before evaluation starts.
    pub fn is_compile_time(self) -> bool {
        matches!(self, ErrorKind::Token | ErrorKind::Syntax)
    }
}

/// An error that occurred while scanning, parsing, or evaluating jlox code.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// Which part of the taxonomy this error belongs to
    pub kind: ErrorKind,

    /// Human-readable error message
    pub msg: String,

    /// Optional line number in the source (1-based)
    pub line: Option<usize>,
}

impl Error {
    /// Creates an error without source location.
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
            line: None,
        }
    }

    /// Creates an error located at the given source line.
    pub fn at_line(kind: ErrorKind, msg: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            msg: msg.into(),
            line: Some(line),
        }
    }

    /// Fills in the source line if the error does not already carry one.
    pub fn with_line(mut self, line: usize) -> Self {
        if self.line.is_none() {
            self.line = Some(line);
        }
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(l) => write!(f, "{} at line {}", self.msg, l),
            None => write!(f, "{}", self.msg),
        }
    }
}

impl std::error::Error for Error {}

/// A specialized `Result` type for jlox operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for `Err(Error::new(kind, msg))`.
pub fn error<T>(kind: ErrorKind, msg: impl Into<String>) -> Result<T> {
    Err(Error::new(kind, msg))
}

/// Shorthand for `Err(Error::at_line(kind, msg, line))`.
pub fn error_at<T>(kind: ErrorKind, line: usize, msg: impl Into<String>) -> Result<T> {
    Err(Error::at_line(kind, msg, line))
}
