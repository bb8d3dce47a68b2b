//! Value types for the jlox interpreter.

use std::fmt;
use std::rc::Rc;

use jlox_syntax::ast::{FunctionDecl, Literal};

use crate::env::Env;

#[derive(Debug, Clone)]
pub enum Value {
    /// `true` or `false`
    Bool(bool),
    /// A 64-bit floating point number
    Number(f64),
    /// A UTF-8 string
    Str(String),
    /// The absence of a value
    Nil,
    /// A user-defined function together with its captured scope
    Function(Rc<Function>),
}

impl Value {
    /// Only `false` and `nil` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Nil => "nil",
            Value::Function(_) => "function",
        }
    }
}

impl From<&Literal> for Value {
    fn from(lit: &Literal) -> Self {
        match lit {
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Number(n) => Value::Number(*n),
            Literal::Str(s) => Value::Str(s.clone()),
            Literal::Nil => Value::Nil,
        }
    }
}

/// Equality by kind and content; functions are equal only to themselves.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Nil => write!(f, "nil"),
            Value::Function(func) => write!(f, "<fn {}>", func.name()),
        }
    }
}

/// A function value: the declaration plus the scope active when it was declared.
pub struct Function {
    pub decl: Rc<FunctionDecl>,
    pub closure: Env,
}

impl Function {
    pub fn name(&self) -> &str {
        &self.decl.name
    }

    pub fn arity(&self) -> usize {
        self.decl.params.len()
    }
}

// The closure usually contains this very function, so never walk into it.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}/{}>", self.name(), self.arity())
    }
}
