//! Environment chain for the jlox interpreter.
//!
//! Frames are shared: a block, the blocks nested in it, and every closure
//! created inside it all hold the same frame, and assignment mutates it in
//! place.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::value::Value;
use jlox_syntax::error::{error, ErrorKind, Result};

#[derive(Default)]
struct Frame {
    /// Variables defined in this scope
    vars: HashMap<String, Value>,
    /// Enclosing scope (None for the root scope)
    parent: Option<Env>,
}

/// A handle to one scope frame. Cloning the handle shares the frame.
#[derive(Clone, Default)]
pub struct Env(Rc<RefCell<Frame>>);

impl Env {
    pub fn new_root() -> Self {
        Self::default()
    }

    /// A new empty frame whose enclosing scope is `self`.
    pub fn child(&self) -> Env {
        Env(Rc::new(RefCell::new(Frame {
            vars: HashMap::new(),
            parent: Some(self.clone()),
        })))
    }

    /// Bind `name` in this frame, shadowing any outer binding.
    pub fn declare(&self, name: impl Into<String>, val: Value) {
        self.0.borrow_mut().vars.insert(name.into(), val);
    }

    /// Overwrite the nearest existing binding of `name`.
    pub fn assign(&self, name: &str, val: Value) -> Result<()> {
        let mut frame = self.clone();
        loop {
            let parent = {
                let mut inner = frame.0.borrow_mut();
                if let Some(slot) = inner.vars.get_mut(name) {
                    *slot = val;
                    return Ok(());
                }
                inner.parent.clone()
            };
            match parent {
                Some(p) => frame = p,
                None => {
                    return error(
                        ErrorKind::UndefinedVariable,
                        format!("Undefined variable (identifier): \"{}\"", name),
                    )
                }
            }
        }
    }

    /// The nearest binding of `name`, or `Nil` if no frame has one.
    pub fn lookup(&self, name: &str) -> Value {
        let mut frame = self.clone();
        loop {
            let parent = {
                let inner = frame.0.borrow();
                if let Some(v) = inner.vars.get(name) {
                    return v.clone();
                }
                inner.parent.clone()
            };
            match parent {
                Some(p) => frame = p,
                None => return Value::Nil,
            }
        }
    }

    /// Bindings of this frame only, sorted by name.
    pub fn vars_snapshot(&self) -> Vec<(String, Value)> {
        let mut vars: Vec<_> = self
            .0
            .borrow()
            .vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        vars.sort_by(|a, b| a.0.cmp(&b.0));
        vars
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.borrow();
        let mut names: Vec<_> = inner.vars.keys().collect();
        names.sort();
        f.debug_struct("Env")
            .field("vars", &names)
            .field("has_parent", &inner.parent.is_some())
            .finish()
    }
}
