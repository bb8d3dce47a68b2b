//! Output sinks receiving the values of `print` statements.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use log::warn;

use crate::value::Value;

/// Where `print` sends its values, once per evaluated statement, in program order.
pub trait Output {
    fn emit(&mut self, value: &Value);
}

/// Writes each value on its own line to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stdout;

impl Output for Stdout {
    fn emit(&mut self, value: &Value) {
        if let Err(e) = writeln!(io::stdout().lock(), "{}", value) {
            warn!("failed to write print output: {}", e);
        }
    }
}

/// Drops everything; used when only timing matters.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl Output for Discard {
    fn emit(&mut self, _value: &Value) {}
}

/// Records emitted values in a buffer shared between clones.
///
/// Hand one clone to the interpreter and keep another to inspect what was
/// printed.
#[derive(Debug, Default, Clone)]
pub struct Capture(Rc<RefCell<Vec<Value>>>);

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    /// Emitted values rendered the way `Stdout` would print them.
    pub fn rendered(&self) -> Vec<String> {
        self.0.borrow().iter().map(|v| v.to_string()).collect()
    }
}

impl Output for Capture {
    fn emit(&mut self, value: &Value) {
        self.0.borrow_mut().push(value.clone());
    }
}
