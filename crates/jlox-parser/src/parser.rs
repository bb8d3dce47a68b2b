//! Recursive-descent parser producing the jlox AST.
//!
//! Every production takes the cursor position it starts at and returns the
//! node it built together with the position just past it. The parser holds no
//! mutable state, so parsing the same tokens twice always yields the same tree.

use std::rc::Rc;

use jlox_syntax::ast::*;
use jlox_syntax::error::{error_at, ErrorKind, Result};
use jlox_syntax::token::{Token, TokenKind};
use log::debug;

/// Upper bound on parameters in a declaration and arguments in a call.
pub const MAX_ARITY: usize = 255;

/// A parsed node and the cursor position just after it.
type Parsed<T> = Result<(T, usize)>;

/// Operator table entry for one binary precedence level.
type OpTable = [(TokenKind, BinaryOp)];

const EQUALITY: &OpTable = &[
    (TokenKind::EqualEqual, BinaryOp::Equal),
    (TokenKind::BangEqual, BinaryOp::NotEqual),
];
const COMPARISON: &OpTable = &[
    (TokenKind::Greater, BinaryOp::Greater),
    (TokenKind::GreaterEqual, BinaryOp::GreaterEqual),
    (TokenKind::Less, BinaryOp::Less),
    (TokenKind::LessEqual, BinaryOp::LessEqual),
];
const TERM: &OpTable = &[
    (TokenKind::Plus, BinaryOp::Add),
    (TokenKind::Minus, BinaryOp::Sub),
];
const FACTOR: &OpTable = &[
    (TokenKind::Star, BinaryOp::Mul),
    (TokenKind::Slash, BinaryOp::Div),
];

pub struct Parser<'t> {
    tokens: &'t [Token],
    /// Returned for any position past the end of `tokens`.
    eof: Token,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        let line = tokens.last().map_or(0, |t| t.line);
        Self {
            tokens,
            eof: Token::new(TokenKind::Eof, "", line),
        }
    }

    fn token(&self, at: usize) -> &Token {
        self.tokens.get(at).unwrap_or(&self.eof)
    }

    fn check(&self, at: usize, kind: TokenKind) -> bool {
        self.token(at).is(kind)
    }

    fn expect(&self, at: usize, kind: TokenKind, msg: &str) -> Result<usize> {
        if self.check(at, kind) {
            Ok(at + 1)
        } else {
            error_at(ErrorKind::Syntax, self.token(at).line, msg)
        }
    }

    fn syntax_error<T>(&self, at: usize, msg: impl Into<String>) -> Result<T> {
        error_at(ErrorKind::Syntax, self.token(at).line, msg)
    }

    /// Parse the whole token sequence into top-level statements.
    pub fn parse_program(&self) -> Result<Vec<Stmt>> {
        let mut statements = Vec::new();
        let mut at = 0;
        while !self.check(at, TokenKind::Eof) {
            let (stmt, next) = self.declaration(at)?;
            statements.push(stmt);
            at = next;
        }
        debug!("parsed {} top-level statements", statements.len());
        Ok(statements)
    }

    /// Parse a single expression that must span the whole token sequence.
    pub fn parse_expression(&self) -> Result<Expr> {
        let (expr, at) = self.expression(0)?;
        if !self.check(at, TokenKind::Eof) {
            let tok = self.token(at);
            return self.syntax_error(at, format!("Unexpected \"{}\" after expression", tok.text));
        }
        Ok(expr)
    }

    // === Declarations ===

    fn declaration(&self, at: usize) -> Parsed<Stmt> {
        match self.token(at).kind {
            TokenKind::Fun => self.fun_decl(at + 1),
            TokenKind::Var => self.var_decl(at + 1),
            _ => self.statement(at),
        }
    }

    fn fun_decl(&self, at: usize) -> Parsed<Stmt> {
        let name = self.token(at);
        if !name.is(TokenKind::Identifier) {
            return self.syntax_error(at, "Expect function name after \"fun\"");
        }
        let at = self.expect(at + 1, TokenKind::LeftParen, "Expect \"(\" after function name")?;
        let (params, at) = self.parameters(at)?;
        let at = self.expect(at, TokenKind::RightParen, "Expect \")\" after parameters")?;
        let at = self.expect(at, TokenKind::LeftBrace, "Expect \"{\" before function body")?;
        let (body, at) = self.block(at)?;
        let decl = FunctionDecl {
            name: name.text.clone(),
            params,
            body,
        };
        Ok((Stmt::Function(Rc::new(decl)), at))
    }

    fn parameters(&self, mut at: usize) -> Parsed<Vec<String>> {
        let mut params = Vec::new();
        if self.check(at, TokenKind::RightParen) {
            return Ok((params, at));
        }
        loop {
            let param = self.token(at);
            if !param.is(TokenKind::Identifier) {
                return self.syntax_error(at, "Expect parameter name");
            }
            if params.len() >= MAX_ARITY {
                return self.syntax_error(at, format!("Can't have more than {} parameters", MAX_ARITY));
            }
            params.push(param.text.clone());
            at += 1;
            if !self.check(at, TokenKind::Comma) {
                return Ok((params, at));
            }
            at += 1;
        }
    }

    fn var_decl(&self, at: usize) -> Parsed<Stmt> {
        let name = self.token(at);
        if !name.is(TokenKind::Identifier) {
            return self.syntax_error(at, "\"var\" declared without identifier token as variable name");
        }
        let (initializer, at) = if self.check(at + 1, TokenKind::Equal) {
            let (expr, at) = self.expression(at + 2)?;
            (Some(expr), at)
        } else {
            (None, at + 1)
        };
        let at = self.expect(
            at,
            TokenKind::Semicolon,
            "Missing semicolon \";\" after variable declaration",
        )?;
        let stmt = Stmt::Var {
            name: name.text.clone(),
            initializer,
        };
        Ok((stmt, at))
    }

    // === Statements ===

    fn statement(&self, at: usize) -> Parsed<Stmt> {
        match self.token(at).kind {
            TokenKind::LeftBrace => {
                let (body, at) = self.block(at + 1)?;
                Ok((Stmt::Block(body), at))
            }
            TokenKind::If => self.if_stmt(at + 1),
            TokenKind::While => self.while_stmt(at + 1),
            TokenKind::For => self.for_stmt(at + 1),
            TokenKind::Return => self.return_stmt(at),
            TokenKind::Print => self.print_stmt(at + 1),
            _ => self.expression_stmt(at),
        }
    }

    /// Declarations up to the closing brace; `at` is just past the opening one.
    fn block(&self, mut at: usize) -> Parsed<Vec<Stmt>> {
        let mut body = Vec::new();
        while !self.check(at, TokenKind::RightBrace) && !self.check(at, TokenKind::Eof) {
            let (stmt, next) = self.declaration(at)?;
            body.push(stmt);
            at = next;
        }
        let at = self.expect(at, TokenKind::RightBrace, "Expect \"}\" after block")?;
        Ok((body, at))
    }

    fn if_stmt(&self, at: usize) -> Parsed<Stmt> {
        let at = self.expect(at, TokenKind::LeftParen, "Missing \"(\" after \"if\"")?;
        let (cond, at) = self.expression(at)?;
        let at = self.expect(at, TokenKind::RightParen, "Missing \")\" after \"if\" condition")?;
        let (then_branch, at) = self.statement(at)?;
        let (else_branch, at) = if self.check(at, TokenKind::Else) {
            let (stmt, at) = self.statement(at + 1)?;
            (Some(Box::new(stmt)), at)
        } else {
            (None, at)
        };
        let stmt = Stmt::If {
            cond,
            then_branch: Box::new(then_branch),
            else_branch,
        };
        Ok((stmt, at))
    }

    fn while_stmt(&self, at: usize) -> Parsed<Stmt> {
        let at = self.expect(at, TokenKind::LeftParen, "Missing \"(\" after \"while\"")?;
        let (cond, at) = self.expression(at)?;
        let at = self.expect(at, TokenKind::RightParen, "Missing \")\" after \"while\" condition")?;
        let (body, at) = self.statement(at)?;
        Ok((Stmt::While { cond, body: Box::new(body) }, at))
    }

    /// `for (init; cond; incr) body` becomes `{ init; while (cond) { body; incr; } }`.
    fn for_stmt(&self, at: usize) -> Parsed<Stmt> {
        let at = self.expect(at, TokenKind::LeftParen, "Missing \"(\" after \"for\"")?;
        let (initializer, at) = match self.token(at).kind {
            TokenKind::Semicolon => (None, at + 1),
            TokenKind::Var => {
                let (stmt, at) = self.var_decl(at + 1)?;
                (Some(stmt), at)
            }
            _ => {
                let (stmt, at) = self.expression_stmt(at)?;
                (Some(stmt), at)
            }
        };
        let (cond, at) = if self.check(at, TokenKind::Semicolon) {
            (None, at)
        } else {
            let (expr, at) = self.expression(at)?;
            (Some(expr), at)
        };
        let at = self.expect(at, TokenKind::Semicolon, "Missing \";\" after loop condition")?;
        let (increment, at) = if self.check(at, TokenKind::RightParen) {
            (None, at)
        } else {
            let (expr, at) = self.expression(at)?;
            (Some(expr), at)
        };
        let at = self.expect(at, TokenKind::RightParen, "Missing \")\" after for clauses")?;
        let (body, at) = self.statement(at)?;

        let mut inner = vec![body];
        if let Some(increment) = increment {
            inner.push(Stmt::Expression(increment));
        }
        let looped = Stmt::While {
            cond: cond.unwrap_or(Expr::Literal(Literal::Bool(true))),
            body: Box::new(Stmt::Block(inner)),
        };
        let outer = initializer.into_iter().chain(std::iter::once(looped)).collect();
        Ok((Stmt::Block(outer), at))
    }

    fn return_stmt(&self, at: usize) -> Parsed<Stmt> {
        let line = self.token(at).line;
        let (value, at) = if self.check(at + 1, TokenKind::Semicolon) {
            (None, at + 1)
        } else {
            let (expr, at) = self.expression(at + 1)?;
            (Some(expr), at)
        };
        let at = self.expect(
            at,
            TokenKind::Semicolon,
            "Missing semicolon \";\" after return statement",
        )?;
        Ok((Stmt::Return { value, line }, at))
    }

    fn print_stmt(&self, at: usize) -> Parsed<Stmt> {
        let (expr, at) = self.expression(at)?;
        let at = self.expect(at, TokenKind::Semicolon, "Missing semicolon \";\" after value")?;
        Ok((Stmt::Print(expr), at))
    }

    fn expression_stmt(&self, at: usize) -> Parsed<Stmt> {
        let (expr, at) = self.expression(at)?;
        let at = self.expect(
            at,
            TokenKind::Semicolon,
            "Missing semicolon \";\" after expression",
        )?;
        Ok((Stmt::Expression(expr), at))
    }

    // === Expressions ===

    fn expression(&self, at: usize) -> Parsed<Expr> {
        self.assignment(at)
    }

    fn assignment(&self, at: usize) -> Parsed<Expr> {
        let target = self.token(at);
        if target.is(TokenKind::Identifier) && self.check(at + 1, TokenKind::Equal) {
            let (value, next) = self.assignment(at + 2)?;
            let expr = Expr::Assign {
                name: target.text.clone(),
                value: Box::new(value),
                line: target.line,
            };
            return Ok((expr, next));
        }
        let (expr, next) = self.logic_or(at)?;
        if self.check(next, TokenKind::Equal) {
            return self.syntax_error(next, "Invalid assignment target");
        }
        Ok((expr, next))
    }

    fn logic_or(&self, at: usize) -> Parsed<Expr> {
        self.logical_level(at, TokenKind::Or, LogicalOp::Or, Self::logic_and)
    }

    fn logic_and(&self, at: usize) -> Parsed<Expr> {
        self.logical_level(at, TokenKind::And, LogicalOp::And, Self::equality)
    }

    fn logical_level(
        &self,
        at: usize,
        kind: TokenKind,
        op: LogicalOp,
        operand: fn(&Self, usize) -> Parsed<Expr>,
    ) -> Parsed<Expr> {
        let (mut left, mut at) = operand(self, at)?;
        while self.check(at, kind) {
            let (right, next) = operand(self, at + 1)?;
            left = Expr::Logical {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
            at = next;
        }
        Ok((left, at))
    }

    fn equality(&self, at: usize) -> Parsed<Expr> {
        self.binary_level(at, EQUALITY, Self::comparison)
    }

    fn comparison(&self, at: usize) -> Parsed<Expr> {
        self.binary_level(at, COMPARISON, Self::term)
    }

    fn term(&self, at: usize) -> Parsed<Expr> {
        self.binary_level(at, TERM, Self::factor)
    }

    fn factor(&self, at: usize) -> Parsed<Expr> {
        self.binary_level(at, FACTOR, Self::unary)
    }

    /// One left-associative precedence level.
    fn binary_level(
        &self,
        at: usize,
        ops: &OpTable,
        operand: fn(&Self, usize) -> Parsed<Expr>,
    ) -> Parsed<Expr> {
        let (mut left, mut at) = operand(self, at)?;
        while let Some(op) = ops
            .iter()
            .find(|(kind, _)| self.check(at, *kind))
            .map(|(_, op)| *op)
        {
            let line = self.token(at).line;
            let (right, next) = operand(self, at + 1)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                line,
            };
            at = next;
        }
        Ok((left, at))
    }

    fn unary(&self, at: usize) -> Parsed<Expr> {
        let tok = self.token(at);
        let op = match tok.kind {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Negate,
            _ => return self.call(at),
        };
        let (operand, at) = self.unary(at + 1)?;
        let expr = Expr::Unary {
            op,
            operand: Box::new(operand),
            line: tok.line,
        };
        Ok((expr, at))
    }

    fn call(&self, at: usize) -> Parsed<Expr> {
        let (mut expr, mut at) = self.primary(at)?;
        while self.check(at, TokenKind::LeftParen) {
            let line = self.token(at).line;
            let (args, next) = self.arguments(at + 1)?;
            expr = Expr::Call {
                callee: Box::new(expr),
                args,
                line,
            };
            at = next;
        }
        Ok((expr, at))
    }

    /// Arguments up to and including the closing parenthesis.
    fn arguments(&self, mut at: usize) -> Parsed<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check(at, TokenKind::RightParen) {
            loop {
                if args.len() >= MAX_ARITY {
                    return self.syntax_error(at, format!("Can't have more than {} arguments", MAX_ARITY));
                }
                let (arg, next) = self.expression(at)?;
                args.push(arg);
                at = next;
                if !self.check(at, TokenKind::Comma) {
                    break;
                }
                at += 1;
            }
        }
        let at = self.expect(at, TokenKind::RightParen, "Expect \")\" after arguments")?;
        Ok((args, at))
    }

    fn primary(&self, at: usize) -> Parsed<Expr> {
        let tok = self.token(at);
        let expr = match tok.kind {
            TokenKind::True => Expr::Literal(Literal::Bool(true)),
            TokenKind::False => Expr::Literal(Literal::Bool(false)),
            TokenKind::Nil => Expr::Literal(Literal::Nil),
            TokenKind::Number => match tok.text.parse::<f64>() {
                Ok(n) => Expr::Literal(Literal::Number(n)),
                Err(_) => return self.syntax_error(at, format!("Invalid number \"{}\"", tok.text)),
            },
            TokenKind::String => {
                let inner = tok
                    .text
                    .strip_prefix('"')
                    .and_then(|s| s.strip_suffix('"'))
                    .unwrap_or(&tok.text);
                Expr::Literal(Literal::Str(inner.to_string()))
            }
            TokenKind::Identifier => Expr::Identifier {
                name: tok.text.clone(),
                line: tok.line,
            },
            TokenKind::LeftParen => {
                let (inner, at) = self.expression(at + 1)?;
                let at = self.expect(at, TokenKind::RightParen, "Expect \")\" after expression")?;
                return Ok((Expr::Grouping(Box::new(inner)), at));
            }
            TokenKind::Eof => return self.syntax_error(at, "Expect expression, found end of input"),
            _ => {
                return self.syntax_error(at, format!("Unrecognized primary lexeme: \"{}\"", tok.text))
            }
        };
        Ok((expr, at + 1))
    }
}

/// Parse a token sequence into top-level statements.
pub fn parse(tokens: &[Token]) -> Result<Vec<Stmt>> {
    Parser::new(tokens).parse_program()
}
