use super::common::{batch, graph_of};
use crate::Calculator;
use crate::engine::{build_dependency_graph, resolve_order};
use reckoner_common::EvalErrorKind;

#[test]
fn direct_cycle_is_reported() {
    let err = resolve_order(&graph_of(&[("a", &["b"]), ("b", &["a"])])).unwrap_err();

    assert_eq!(err.kind, EvalErrorKind::Cycle);
    assert!(err.variable.is_some());
    assert!(err.to_string().contains("circular"));
}

#[test]
fn self_reference_is_a_cycle() {
    let err = resolve_order(&graph_of(&[("x", &["x"])])).unwrap_err();

    assert_eq!(err.kind, EvalErrorKind::Cycle);
    assert_eq!(err.variable.as_deref(), Some("x"));
}

#[test]
fn longer_loops_are_found() {
    let graph = graph_of(&[("a", &["b"]), ("b", &["c"]), ("c", &["d"]), ("d", &["b"])]);
    let err = resolve_order(&graph).unwrap_err();

    assert_eq!(err.kind, EvalErrorKind::Cycle);
    assert_eq!(err.variable.as_deref(), Some("b"));
}

#[test]
fn diamonds_are_not_cycles() {
    let graph = graph_of(&[("top", &["l", "r"]), ("l", &["base"]), ("r", &["base"])]);
    let order = resolve_order(&graph).unwrap();

    assert_eq!(order, vec!["base", "l", "r", "top"]);
}

#[test]
fn cycle_through_stored_formulas() {
    let mut calc = Calculator::new();
    calc.store_formula("f", "g + 1").unwrap();
    calc.store_formula("g", "f + 1").unwrap();
    let batch = batch(&[("out", "f")]);

    let graph = build_dependency_graph(&calc, &batch, false, false).unwrap();
    let err = resolve_order(&graph).unwrap_err();

    assert_eq!(err.kind, EvalErrorKind::Cycle);
}

#[test]
fn lenient_solving_still_reports_cycles() {
    let mut calc = Calculator::new();
    let err = calc.solve([("a", "b + 1"), ("b", "a + 1")]).unwrap_err();

    assert_eq!(err.kind, EvalErrorKind::Cycle);
}
