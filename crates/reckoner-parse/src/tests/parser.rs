//! Parser tests: tree shapes, precedence, associativity, errors.

use reckoner_common::{EvalError, EvalErrorKind, Value};

use crate::parser::{ASTNode, ASTNodeType, parse};

fn binary(node: &ASTNode) -> (&str, &ASTNode, &ASTNode) {
    match &node.node_type {
        ASTNodeType::BinaryOp { op, left, right } => (op.as_str(), left, right),
        other => panic!("expected binary op, got {other:?}"),
    }
}

fn literal(node: &ASTNode) -> &Value {
    match &node.node_type {
        ASTNodeType::Literal(value) => value,
        other => panic!("expected literal, got {other:?}"),
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let ast = parse("1 + 2 * 3").unwrap();
    let (op, left, right) = binary(&ast);
    assert_eq!(op, "+");
    assert_eq!(literal(left), &Value::Int(1));
    let (op, l, r) = binary(right);
    assert_eq!(op, "*");
    assert_eq!(literal(l), &Value::Int(2));
    assert_eq!(literal(r), &Value::Int(3));
}

#[test]
fn parens_override_precedence() {
    let ast = parse("(1 + 2) * 3").unwrap();
    let (op, left, right) = binary(&ast);
    assert_eq!(op, "*");
    assert_eq!(binary(left).0, "+");
    assert_eq!(literal(right), &Value::Int(3));
}

#[test]
fn subtraction_is_left_associative() {
    // 10 - 2 - 3 parses as (10 - 2) - 3.
    let ast = parse("10 - 2 - 3").unwrap();
    let (op, left, right) = binary(&ast);
    assert_eq!(op, "-");
    assert_eq!(binary(left).0, "-");
    assert_eq!(literal(right), &Value::Int(3));
}

#[test]
fn power_is_right_associative() {
    // 2 ^ 3 ^ 2 parses as 2 ^ (3 ^ 2).
    let ast = parse("2 ^ 3 ^ 2").unwrap();
    let (op, left, right) = binary(&ast);
    assert_eq!(op, "^");
    assert_eq!(literal(left), &Value::Int(2));
    assert_eq!(binary(right).0, "^");
}

#[test]
fn prefix_operators_nest() {
    let ast = parse("--1").unwrap();
    match &ast.node_type {
        ASTNodeType::UnaryOp { op, expr } => {
            assert_eq!(op, "-");
            assert!(matches!(&expr.node_type, ASTNodeType::UnaryOp { .. }));
        }
        other => panic!("expected unary op, got {other:?}"),
    }
}

#[test]
fn prefix_minus_binds_tighter_than_power() {
    // -2 ^ 2 parses as (-2) ^ 2.
    let ast = parse("-2 ^ 2").unwrap();
    let (op, left, _) = binary(&ast);
    assert_eq!(op, "^");
    assert!(matches!(&left.node_type, ASTNodeType::UnaryOp { .. }));
}

#[test]
fn comparison_and_combinators() {
    // a < b and c parses as (a < b) and c.
    let ast = parse("a < b and c").unwrap();
    let (op, left, right) = binary(&ast);
    assert_eq!(op, "and");
    assert_eq!(binary(left).0, "<");
    assert!(matches!(&right.node_type, ASTNodeType::Variable(v) if v == "c"));
}

#[test]
fn literal_forms() {
    assert_eq!(literal(&parse("2").unwrap()), &Value::Int(2));
    assert_eq!(literal(&parse("2.0").unwrap()), &Value::Float(2.0));
    assert_eq!(literal(&parse("1e3").unwrap()), &Value::Float(1000.0));
    assert_eq!(literal(&parse(".25").unwrap()), &Value::Float(0.25));
    assert_eq!(literal(&parse("true").unwrap()), &Value::Bool(true));
    assert_eq!(
        literal(&parse("\"hi\"").unwrap()),
        &Value::Text("hi".to_string())
    );
}

#[test]
fn oversized_digit_runs_become_floats() {
    let huge = "123456789012345678901234567890";
    match literal(&parse(huge).unwrap()) {
        Value::Float(f) => assert!(*f > 1e29),
        other => panic!("expected float, got {other:?}"),
    }
}

#[test]
fn variables_are_canonical() {
    let ast = parse("Alpha").unwrap();
    assert!(matches!(&ast.node_type, ASTNodeType::Variable(v) if v == "alpha"));
}

#[test]
fn function_calls() {
    let ast = parse("if(a, 1, 2)").unwrap();
    match &ast.node_type {
        ASTNodeType::Function { name, args } => {
            assert_eq!(name, "if");
            assert_eq!(args.len(), 3);
            assert!(matches!(&args[0].node_type, ASTNodeType::Variable(v) if v == "a"));
        }
        other => panic!("expected function, got {other:?}"),
    }
}

#[test]
fn function_call_without_arguments() {
    let ast = parse("now()").unwrap();
    match &ast.node_type {
        ASTNodeType::Function { name, args } => {
            assert_eq!(name, "now");
            assert!(args.is_empty());
        }
        other => panic!("expected function, got {other:?}"),
    }
}

#[test]
fn nested_function_arguments() {
    let ast = parse("max(min(a, b), c + 1)").unwrap();
    match &ast.node_type {
        ASTNodeType::Function { name, args } => {
            assert_eq!(name, "max");
            assert_eq!(args.len(), 2);
            assert!(matches!(&args[0].node_type, ASTNodeType::Function { .. }));
            assert!(matches!(&args[1].node_type, ASTNodeType::BinaryOp { .. }));
        }
        other => panic!("expected function, got {other:?}"),
    }
}

#[test]
fn empty_expression_is_an_error() {
    let err = parse("").unwrap_err();
    assert!(err.message.contains("empty"));
    assert!(err.position.is_none());
}

#[test]
fn trailing_tokens_are_an_error() {
    let err = parse("1 2").unwrap_err();
    assert!(err.message.contains("trailing"));
    assert_eq!(err.position, Some(2));
}

#[test]
fn dangling_operator_is_an_error() {
    let err = parse("1 +").unwrap_err();
    assert!(err.message.contains("unexpected end"));
    assert_eq!(err.position, Some(3));
}

#[test]
fn empty_parens_are_an_error() {
    assert!(parse("()").is_err());
}

#[test]
fn tokenizer_failures_surface_as_parser_errors() {
    let err = parse("(1").unwrap_err();
    assert!(err.message.contains("parenthesis"));

    let err = parse("1 ~ 2").unwrap_err();
    assert_eq!(err.position, Some(2));
}

#[test]
fn parser_error_converts_to_eval_error() {
    let e: EvalError = parse("1 +").unwrap_err().into();
    assert_eq!(e.kind, EvalErrorKind::Syntax);
    assert!(e.message.as_deref().unwrap_or_default().contains("byte 3"));
}

#[test]
fn dependencies_in_first_appearance_order() {
    let ast = parse("a + b * if(c, d, a)").unwrap();
    assert_eq!(ast.get_dependencies(), ["a", "b", "c", "d"]);
}

#[test]
fn dependencies_ignore_literals_and_function_names() {
    let ast = parse("sum(1, 2, x) > y").unwrap();
    assert_eq!(ast.get_dependencies(), ["x", "y"]);
}

#[test]
fn display_round_trip_is_readable() {
    let ast = parse("1 + 2 * x").unwrap();
    assert_eq!(ast.to_string(), "(1 + (2 * x))");
    let ast = parse("if(a, 1, 2)").unwrap();
    assert_eq!(ast.to_string(), "if(a, 1, 2)");
}

#[test]
fn accepts_owned_and_borrowed_sources() {
    assert!(parse("1 + 1").is_ok());
    assert!(parse(String::from("1 + 1")).is_ok());
}
