use super::common::solved;
use crate::engine::{BulkSolver, SolveOptions};
use crate::{Calculator, Value};
use reckoner_common::{EvalError, EvalErrorKind};

#[test]
fn lenient_records_undefined_for_unbound() {
    let mut calc = Calculator::new();
    let results = calc.solve([("a", "missing + 1"), ("b", "2")]).unwrap();

    assert_eq!(solved(&results, "a"), Value::Undefined);
    assert_eq!(solved(&results, "b"), Value::Int(2));
}

#[test]
fn lenient_records_undefined_for_division_by_zero() {
    let mut calc = Calculator::new();
    let results = calc.solve([("a", "1 / 0"), ("b", "2")]).unwrap();

    assert_eq!(solved(&results, "a"), Value::Undefined);
    assert_eq!(solved(&results, "b"), Value::Int(2));
}

#[test]
fn strict_aborts_and_names_the_recipient() {
    let mut calc = Calculator::new();
    let err = calc.solve_strict([("b", "2"), ("a", "1 / 0")]).unwrap_err();

    assert_eq!(err.kind, EvalErrorKind::DivideByZero);
    assert_eq!(err.recipient.as_deref(), Some("a"));
}

#[test]
fn strict_tags_unbound_failures_too() {
    let mut calc = Calculator::new();
    let err = calc.solve_strict([("out", "missing * 2")]).unwrap_err();

    assert_eq!(err.kind, EvalErrorKind::Unbound);
    assert_eq!(err.variable.as_deref(), Some("missing"));
    assert_eq!(err.recipient.as_deref(), Some("out"));
}

#[test]
fn handler_values_flow_downstream() {
    let mut calc = Calculator::new();
    let results = BulkSolver::new(&mut calc, [("a", "oops + 1"), ("b", "a * 2")])
        .solve_with(|_| Ok(Value::Int(0)))
        .unwrap();

    assert_eq!(solved(&results, "a"), Value::Int(0));
    assert_eq!(solved(&results, "b"), Value::Int(0));
}

#[test]
fn handler_sees_tagged_errors() {
    let mut calc = Calculator::new();
    let mut seen: Vec<EvalError> = Vec::new();

    let results = BulkSolver::new(&mut calc, [("bad", "1 / 0")])
        .solve_with(|e| {
            seen.push(e.clone());
            Ok(Value::Undefined)
        })
        .unwrap();

    assert_eq!(solved(&results, "bad"), Value::Undefined);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].kind, EvalErrorKind::DivideByZero);
    assert_eq!(seen[0].recipient.as_deref(), Some("bad"));
}

#[test]
fn handler_may_pick_per_kind_policies() {
    let mut calc = Calculator::new();
    let err = BulkSolver::new(&mut calc, [("a", "1 / 0"), ("b", "missing")])
        .solve_with(|e| {
            if e.kind == EvalErrorKind::DivideByZero {
                Ok(Value::Int(-1))
            } else {
                Err(e)
            }
        })
        .unwrap_err();

    assert_eq!(err.kind, EvalErrorKind::Unbound);
    assert_eq!(err.recipient.as_deref(), Some("b"));
}

#[test]
fn syntax_errors_propagate_even_lenient() {
    let mut calc = Calculator::new();
    let err = calc.solve([("a", "1 +")]).unwrap_err();

    assert_eq!(err.kind, EvalErrorKind::Syntax);
}

#[test]
fn argument_errors_bypass_the_handler() {
    let mut calc = Calculator::new();
    let err = calc.solve([("a", "1 + true")]).unwrap_err();

    assert_eq!(err.kind, EvalErrorKind::Argument);
}

#[test]
fn undefined_results_poison_arithmetic_dependents() {
    let mut calc = Calculator::new();
    // `a` resolves leniently to Undefined; `b` then has no number to
    // add, which is an argument failure, not an absorbable one.
    let err = calc.solve([("a", "1 / 0"), ("b", "a + 1")]).unwrap_err();

    assert_eq!(err.kind, EvalErrorKind::Argument);
}

#[test]
fn ignore_errors_drops_unparsable_entries() {
    let mut calc = Calculator::new();
    let results = BulkSolver::new(&mut calc, [("good", "1"), ("bad", "1 +")])
        .with_options(SolveOptions {
            ignore_errors: true,
            ..Default::default()
        })
        .solve()
        .unwrap();

    assert_eq!(solved(&results, "good"), Value::Int(1));
    assert_eq!(results["bad"], None);
}

#[test]
fn ignore_errors_absorbs_failures_before_the_boundary() {
    let mut calc = Calculator::new();
    // Even the strict boundary never sees the failure; the entry is
    // skipped instead.
    let results = BulkSolver::new(&mut calc, [("a", "missing + 1"), ("b", "2")])
        .with_options(SolveOptions {
            ignore_errors: true,
            ..Default::default()
        })
        .solve_strict()
        .unwrap();

    assert_eq!(results["a"], None);
    assert_eq!(solved(&results, "b"), Value::Int(2));
}
