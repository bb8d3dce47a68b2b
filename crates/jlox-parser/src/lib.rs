pub mod parser;

pub use parser::{parse, Parser, MAX_ARITY};

#[cfg(test)]
mod tests {
    use super::*;
    use jlox_scanner::scan_str;
    use jlox_syntax::ast::*;
    use jlox_syntax::error::ErrorKind;

    fn parse_expr_str(input: &str) -> Expr {
        let tokens = scan_str(input).expect("Scanning should succeed");
        Parser::new(&tokens)
            .parse_expression()
            .expect("Parsing should succeed")
    }

    fn parse_program_str(input: &str) -> Vec<Stmt> {
        let tokens = scan_str(input).expect("Scanning should succeed");
        parse(&tokens).expect("Parsing should succeed")
    }

    fn parse_error(input: &str) -> jlox_syntax::Error {
        let tokens = scan_str(input).expect("Scanning should succeed");
        let err = parse(&tokens).expect_err("Parsing should fail");
        assert_eq!(err.kind, ErrorKind::Syntax);
        err
    }

    #[test]
    fn test_literal_expressions() {
        assert_eq!(parse_expr_str("42"), Expr::Literal(Literal::Number(42.0)));
        assert_eq!(parse_expr_str("10.11"), Expr::Literal(Literal::Number(10.11)));
        assert_eq!(
            parse_expr_str("\"hello\""),
            Expr::Literal(Literal::Str("hello".to_string()))
        );
        assert_eq!(parse_expr_str("true"), Expr::Literal(Literal::Bool(true)));
        assert_eq!(parse_expr_str("nil"), Expr::Literal(Literal::Nil));
        assert!(matches!(parse_expr_str("my_var"), Expr::Identifier { name, line: 1 } if name == "my_var"));
    }

    #[test]
    fn test_operator_precedence() {
        match parse_expr_str("1 + 2 * 3") {
            Expr::Binary { op: BinaryOp::Add, right, .. } => {
                assert!(matches!(*right, Expr::Binary { op: BinaryOp::Mul, .. }));
            }
            other => panic!("Expected addition at the root, got {:?}", other),
        }
        match parse_expr_str("1 < 2 == true") {
            Expr::Binary { op: BinaryOp::Equal, left, .. } => {
                assert!(matches!(*left, Expr::Binary { op: BinaryOp::Less, .. }));
            }
            other => panic!("Expected equality at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_left_associativity() {
        match parse_expr_str("10 - 4 - 3") {
            Expr::Binary { op: BinaryOp::Sub, left, right, .. } => {
                assert!(matches!(*left, Expr::Binary { op: BinaryOp::Sub, .. }));
                assert_eq!(*right, Expr::Literal(Literal::Number(3.0)));
            }
            other => panic!("Expected subtraction, got {:?}", other),
        }
    }

    #[test]
    fn test_grouping_and_unary() {
        assert!(matches!(parse_expr_str("(1 + 2)"), Expr::Grouping(_)));
        match parse_expr_str("-!x") {
            Expr::Unary { op: UnaryOp::Negate, operand, .. } => {
                assert!(matches!(*operand, Expr::Unary { op: UnaryOp::Not, .. }));
            }
            other => panic!("Expected negation, got {:?}", other),
        }
    }

    #[test]
    fn test_logical_precedence() {
        match parse_expr_str("a or b and c") {
            Expr::Logical { op: LogicalOp::Or, right, .. } => {
                assert!(matches!(*right, Expr::Logical { op: LogicalOp::And, .. }));
            }
            other => panic!("Expected or at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_is_right_associative() {
        match parse_expr_str("a = b = 1") {
            Expr::Assign { name, value, .. } => {
                assert_eq!(name, "a");
                assert!(matches!(*value, Expr::Assign { ref name, .. } if name == "b"));
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_calls_chain() {
        match parse_expr_str("make(1)(2, 3)") {
            Expr::Call { callee, args, .. } => {
                assert_eq!(args.len(), 2);
                assert!(matches!(*callee, Expr::Call { ref args, .. } if args.len() == 1));
            }
            other => panic!("Expected call, got {:?}", other),
        }
        assert!(matches!(parse_expr_str("f()"), Expr::Call { args, .. } if args.is_empty()));
    }

    #[test]
    fn test_declarations() {
        let program = parse_program_str("var a; var b = 2; fun add(x, y) { return x + y; }");
        assert_eq!(program.len(), 3);
        assert_eq!(
            program[0],
            Stmt::Var { name: "a".to_string(), initializer: None }
        );
        assert!(matches!(&program[1], Stmt::Var { initializer: Some(_), .. }));
        match &program[2] {
            Stmt::Function(decl) => {
                assert_eq!(decl.name, "add");
                assert_eq!(decl.params, vec!["x".to_string(), "y".to_string()]);
                assert!(matches!(decl.body[0], Stmt::Return { value: Some(_), line: 1 }));
            }
            other => panic!("Expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_statements() {
        let program = parse_program_str(
            "if (a) print 1; else { print 2; }\nwhile (x < 3) x = x + 1;\n{ var inner; }\nreturn;",
        );
        assert!(matches!(&program[0], Stmt::If { else_branch: Some(_), .. }));
        assert!(matches!(&program[1], Stmt::While { .. }));
        assert!(matches!(&program[2], Stmt::Block(body) if body.len() == 1));
        assert_eq!(program[3], Stmt::Return { value: None, line: 4 });
    }

    #[test]
    fn test_for_desugars_into_block_and_while() {
        let program = parse_program_str("for (var i = 0; i < 3; i = i + 1) print i;");
        let outer = match &program[0] {
            Stmt::Block(outer) => outer,
            other => panic!("Expected block, got {:?}", other),
        };
        assert_eq!(outer.len(), 2);
        assert!(matches!(&outer[0], Stmt::Var { name, .. } if name == "i"));
        match &outer[1] {
            Stmt::While { body, .. } => match body.as_ref() {
                Stmt::Block(inner) => {
                    assert!(matches!(inner[0], Stmt::Print(_)));
                    assert!(matches!(inner[1], Stmt::Expression(Expr::Assign { .. })));
                }
                other => panic!("Expected block body, got {:?}", other),
            },
            other => panic!("Expected while, got {:?}", other),
        }
    }

    #[test]
    fn test_for_with_empty_clauses() {
        let program = parse_program_str("for (;;) print 1;");
        match &program[0] {
            Stmt::Block(outer) => {
                assert_eq!(outer.len(), 1);
                assert!(matches!(
                    &outer[0],
                    Stmt::While { cond: Expr::Literal(Literal::Bool(true)), .. }
                ));
            }
            other => panic!("Expected block, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse_error("var thing = 15;\nthing = 16");
        assert_eq!(err.msg, "Missing semicolon \";\" after expression");
        assert_eq!(err.line, Some(2));
        assert_eq!(parse_error("3 + 4").msg, "Missing semicolon \";\" after expression");
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(parse_error("if true) print 1;").msg, "Missing \"(\" after \"if\"");
        assert_eq!(parse_error("while (true print 1;").msg, "Missing \")\" after \"while\" condition");
        assert_eq!(
            parse_error("var 12;").msg,
            "\"var\" declared without identifier token as variable name"
        );
        assert_eq!(parse_error("print );").msg, "Unrecognized primary lexeme: \")\"");
        assert_eq!(parse_error("{ print 1;").msg, "Expect \"}\" after block");
        assert_eq!(parse_error("fun f(a, 1) {}").msg, "Expect parameter name");
        assert_eq!(parse_error("f(1;").msg, "Expect \")\" after arguments");
        assert_eq!(parse_error("1 = 2;").msg, "Invalid assignment target");
        assert_eq!(parse_error("print").msg, "Expect expression, found end of input");
    }

    #[test]
    fn test_argument_limit() {
        let args = vec!["1"; MAX_ARITY + 1].join(", ");
        let err = parse_error(&format!("f({});", args));
        assert!(err.msg.starts_with("Can't have more than"));
    }

    #[test]
    fn test_parsing_is_repeatable() {
        let tokens = scan_str("fun fib(n) { if (n <= 1) return n; return fib(n - 2) + fib(n - 1); }")
            .unwrap();
        assert_eq!(parse(&tokens).unwrap(), parse(&tokens).unwrap());
    }

    #[test]
    fn test_tokens_without_eof() {
        assert_eq!(parse(&[]).unwrap(), Vec::new());
    }
}
