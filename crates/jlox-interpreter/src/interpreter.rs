//! Main interpreter engine.

use std::rc::Rc;

use log::{debug, trace};

use crate::env::Env;
use crate::flow::Flow;
use crate::output::{Output, Stdout};
use crate::value::{Function, Value};
use jlox_syntax::ast::*;
use jlox_syntax::error::{error, error_at, ErrorKind, Result};

/// Deepest allowed nesting of function calls.
pub const MAX_CALL_DEPTH: usize = 5_000;

/// Native stack left when a new segment is allocated.
const STACK_RED_ZONE: usize = 128 * 1024;
/// Size of each extra native stack segment.
const STACK_SEGMENT: usize = 2 * 1024 * 1024;

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ExecStats {
    /// Statements executed, including nested ones
    pub statements: usize,
    /// Function calls made
    pub calls: usize,
    /// Scope frames created for blocks and calls
    pub scopes: usize,
}

pub struct Interpreter {
    /// Receives the value of every `print`
    out: Box<dyn Output>,
    /// Counters for observability
    stats: ExecStats,
    /// Function calls currently on the stack
    depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_output(Stdout)
    }

    pub fn with_output(out: impl Output + 'static) -> Self {
        Self {
            out: Box::new(out),
            stats: ExecStats::default(),
            depth: 0,
        }
    }

    pub fn stats(&self) -> ExecStats {
        self.stats.clone()
    }

    pub fn reset_stats(&mut self) {
        self.stats = ExecStats::default();
    }

    /// Run a program against a fresh root environment.
    pub fn run(&mut self, program: &[Stmt]) -> Result<()> {
        let env = Env::new_root();
        self.run_with_env(program, &env)?;
        Ok(())
    }

    /// Run a program against `env`, which keeps every top-level declaration.
    ///
    /// Returns the value of the last statement when it is an expression
    /// statement. Effects of statements before a failing one are kept.
    pub fn run_with_env(&mut self, program: &[Stmt], env: &Env) -> Result<Option<Value>> {
        self.depth = 0;
        let mut last = None;
        for stmt in program {
            match self.execute(stmt, env)? {
                Flow::Normal(v) => last = matches!(stmt, Stmt::Expression(_)).then_some(v),
                Flow::Return(_) => {
                    return error(ErrorKind::InvalidReturn, "Cannot return from top-level code")
                }
            }
        }
        Ok(last)
    }

    fn exec_block(&mut self, body: &[Stmt], env: &Env) -> Result<Flow> {
        for s in body {
            if let Flow::Return(v) = self.execute(s, env)? {
                return Ok(Flow::Return(v));
            }
        }
        Ok(Flow::Normal(Value::Nil))
    }

    fn execute(&mut self, stmt: &Stmt, env: &Env) -> Result<Flow> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || self.exec_stmt(stmt, env))
    }

    fn exec_stmt(&mut self, stmt: &Stmt, env: &Env) -> Result<Flow> {
        self.stats.statements += 1;
        match stmt {
            Stmt::Var { name, initializer } => {
                let v = match initializer {
                    Some(e) => self.evaluate(e, env)?,
                    None => Value::Nil,
                };
                env.declare(name.clone(), v);
                Ok(Flow::Normal(Value::Nil))
            }
            Stmt::Function(decl) => {
                debug!("declaring function '{}' with {} params", decl.name, decl.params.len());
                let func = Function {
                    decl: Rc::clone(decl),
                    closure: env.clone(),
                };
                env.declare(decl.name.clone(), Value::Function(Rc::new(func)));
                Ok(Flow::Normal(Value::Nil))
            }
            Stmt::Block(body) => {
                self.stats.scopes += 1;
                trace!("entering block of {} statements", body.len());
                let scope = env.child();
                self.exec_block(body, &scope)
            }
            Stmt::If { cond, then_branch, else_branch } => {
                if self.evaluate(cond, env)?.is_truthy() {
                    self.execute(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch, env)
                } else {
                    Ok(Flow::Normal(Value::Nil))
                }
            }
            Stmt::While { cond, body } => {
                while self.evaluate(cond, env)?.is_truthy() {
                    if let Flow::Return(v) = self.execute(body, env)? {
                        return Ok(Flow::Return(v));
                    }
                }
                Ok(Flow::Normal(Value::Nil))
            }
            Stmt::Print(e) => {
                let v = self.evaluate(e, env)?;
                self.out.emit(&v);
                Ok(Flow::Normal(Value::Nil))
            }
            Stmt::Return { value, line } => {
                if self.depth == 0 {
                    return error_at(ErrorKind::InvalidReturn, *line, "Cannot return from top-level code");
                }
                let v = match value {
                    Some(e) => self.evaluate(e, env)?,
                    None => Value::Nil,
                };
                Ok(Flow::Return(v))
            }
            Stmt::Expression(e) => Ok(Flow::Normal(self.evaluate(e, env)?)),
        }
    }

    /// Evaluate one expression against `env`.
    ///
    /// Nesting depth is bounded by `MAX_CALL_DEPTH` rather than by the
    /// caller's native stack, which grows on demand.
    pub fn evaluate(&mut self, expr: &Expr, env: &Env) -> Result<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || self.eval_expr(expr, env))
    }

    fn eval_expr(&mut self, expr: &Expr, env: &Env) -> Result<Value> {
        match expr {
            Expr::Literal(lit) => Ok(Value::from(lit)),
            Expr::Identifier { name, .. } => Ok(env.lookup(name)),
            Expr::Grouping(inner) => self.evaluate(inner, env),
            Expr::Unary { op, operand, line } => {
                let v = self.evaluate(operand, env)?;
                match (op, v) {
                    (UnaryOp::Not, v) => Ok(Value::Bool(!v.is_truthy())),
                    (UnaryOp::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
                    (UnaryOp::Negate, other) => error_at(
                        ErrorKind::Type,
                        *line,
                        format!("Operand of \"-\" must be a number, got {}", other.type_name()),
                    ),
                }
            }
            Expr::Binary { op, left, right, line } => {
                let l = self.evaluate(left, env)?;
                let r = self.evaluate(right, env)?;
                Self::binary(*op, l, r).map_err(|e| e.with_line(*line))
            }
            Expr::Logical { op, left, right } => {
                let l = self.evaluate(left, env)?;
                let short_circuits = match op {
                    LogicalOp::And => !l.is_truthy(),
                    LogicalOp::Or => l.is_truthy(),
                };
                if short_circuits {
                    Ok(l)
                } else {
                    self.evaluate(right, env)
                }
            }
            Expr::Assign { name, value, line } => {
                let v = self.evaluate(value, env)?;
                env.assign(name, v).map_err(|e| e.with_line(*line))?;
                Ok(Value::Nil)
            }
            Expr::Call { callee, args, line } => {
                let func = match self.evaluate(callee, env)? {
                    Value::Function(f) => f,
                    other => {
                        return error_at(
                            ErrorKind::NotCallable,
                            *line,
                            format!("Can only call functions, got {}", other.type_name()),
                        )
                    }
                };
                let mut evaluated = Vec::with_capacity(args.len());
                for a in args {
                    evaluated.push(self.evaluate(a, env)?);
                }
                if evaluated.len() != func.arity() {
                    return error_at(
                        ErrorKind::ArityMismatch,
                        *line,
                        format!(
                            "Function '{}' expected {} args, got {}",
                            func.name(),
                            func.arity(),
                            evaluated.len()
                        ),
                    );
                }
                self.call(&func, evaluated).map_err(|e| e.with_line(*line))
            }
        }
    }

    /// Invoke `func` with already evaluated arguments of the right count.
    fn call(&mut self, func: &Function, args: Vec<Value>) -> Result<Value> {
        if self.depth >= MAX_CALL_DEPTH {
            return error(
                ErrorKind::StackOverflow,
                format!("Stack overflow: more than {} nested calls", MAX_CALL_DEPTH),
            );
        }
        trace!("calling '{}' at depth {}", func.name(), self.depth);
        self.stats.calls += 1;
        self.stats.scopes += 1;
        let frame = func.closure.child();
        for (param, arg) in func.decl.params.iter().zip(args) {
            frame.declare(param.clone(), arg);
        }
        self.depth += 1;
        let flow = self.exec_block(&func.decl.body, &frame);
        self.depth -= 1;
        match flow? {
            Flow::Normal(_) => Ok(Value::Nil),
            Flow::Return(v) => Ok(v),
        }
    }

    fn binary(op: BinaryOp, l: Value, r: Value) -> Result<Value> {
        match op {
            BinaryOp::Equal => return Ok(Value::Bool(l == r)),
            BinaryOp::NotEqual => return Ok(Value::Bool(l != r)),
            _ => {}
        }
        let sym = op.symbol();
        if l.is_nil() || r.is_nil() {
            return error(
                ErrorKind::NilOperand,
                format!("Cannot evaluate {} with a nil value: {} {} {}.", sym, l, sym, r),
            );
        }
        match (l, r) {
            (Value::Number(x), Value::Number(y)) => Ok(match op {
                BinaryOp::Add => Value::Number(x + y),
                BinaryOp::Sub => Value::Number(x - y),
                BinaryOp::Mul => Value::Number(x * y),
                BinaryOp::Div => Value::Number(x / y),
                BinaryOp::Greater => Value::Bool(x > y),
                BinaryOp::GreaterEqual => Value::Bool(x >= y),
                BinaryOp::Less => Value::Bool(x < y),
                BinaryOp::LessEqual => Value::Bool(x <= y),
                BinaryOp::Equal => Value::Bool(x == y),
                BinaryOp::NotEqual => Value::Bool(x != y),
            }),
            (Value::Str(x), Value::Str(y)) if op == BinaryOp::Add => Ok(Value::Str(x + &y)),
            (x, y) if op == BinaryOp::Add => error(
                ErrorKind::Type,
                format!(
                    "Operands of \"+\" must be two numbers or two strings, got {} and {}",
                    x.type_name(),
                    y.type_name()
                ),
            ),
            (x, y) => error(
                ErrorKind::Type,
                format!(
                    "Operands of \"{}\" must be numbers, got {} and {}",
                    sym,
                    x.type_name(),
                    y.type_name()
                ),
            ),
        }
    }
}
