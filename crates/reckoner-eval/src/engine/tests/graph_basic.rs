use super::common::batch;
use crate::Calculator;
use crate::engine::build_dependency_graph;
use reckoner_common::EvalErrorKind;

#[test]
fn unbound_dependencies_become_leaves() {
    let calc = Calculator::new();
    let batch = batch(&[("x", "a + b")]);

    let graph = build_dependency_graph(&calc, &batch, false, false).unwrap();

    assert_eq!(graph.len(), 3);
    assert_eq!(graph["x"], vec!["a".to_string(), "b".to_string()]);
    assert!(graph["a"].is_empty());
    assert!(graph["b"].is_empty());
}

#[test]
fn value_bound_dependencies_are_satisfied() {
    let mut calc = Calculator::new();
    calc.bind("a", 1);
    let batch = batch(&[("x", "a + b")]);

    let graph = build_dependency_graph(&calc, &batch, false, false).unwrap();

    // `a` is already satisfied by the store, so only `b` remains.
    assert_eq!(graph["x"], vec!["b".to_string()]);
    assert!(!graph.contains_key("a"));
}

#[test]
fn ignore_memory_keeps_satisfied_dependencies() {
    let mut calc = Calculator::new();
    calc.bind("a", 1);
    let batch = batch(&[("x", "a + b")]);

    let graph = build_dependency_graph(&calc, &batch, true, false).unwrap();

    assert_eq!(graph["x"], vec!["a".to_string(), "b".to_string()]);
    assert!(graph["a"].is_empty());
}

#[test]
fn stored_formulas_get_their_own_slots() {
    let mut calc = Calculator::new();
    calc.store_formula("total", "a + b").unwrap();
    let batch = batch(&[("report", "total * 2")]);

    let graph = build_dependency_graph(&calc, &batch, true, false).unwrap();

    assert_eq!(graph["report"], vec!["total".to_string()]);
    assert_eq!(graph["total"], vec!["a".to_string(), "b".to_string()]);
    assert!(graph["a"].is_empty());
    assert!(graph["b"].is_empty());
}

#[test]
fn formula_chains_expand_transitively() {
    let mut calc = Calculator::new();
    calc.store_formula("f1", "f2 + 1").unwrap();
    calc.store_formula("f2", "f3 + 1").unwrap();
    let batch = batch(&[("top", "f1 * 2")]);

    let graph = build_dependency_graph(&calc, &batch, true, false).unwrap();

    assert_eq!(graph["top"], vec!["f1".to_string()]);
    assert_eq!(graph["f1"], vec!["f2".to_string()]);
    assert_eq!(graph["f2"], vec!["f3".to_string()]);
    assert!(graph["f3"].is_empty());
}

#[test]
fn formula_references_splice_without_ignore_memory() {
    let mut calc = Calculator::new();
    calc.store_formula("total", "a + b").unwrap();
    let batch = batch(&[("report", "total * 2")]);

    let graph = build_dependency_graph(&calc, &batch, false, false).unwrap();

    // The formula's own free variables stand in for the formula name.
    assert_eq!(graph["report"], vec!["a".to_string(), "b".to_string()]);
    assert!(!graph.contains_key("total"));
}

#[test]
fn batch_entries_shadow_expansion() {
    let mut calc = Calculator::new();
    calc.store_formula("total", "a + b").unwrap();
    let batch = batch(&[("report", "total * 2"), ("total", "10")]);

    let graph = build_dependency_graph(&calc, &batch, true, false).unwrap();

    // The batch redefines `total`; the stored formula's shape is not
    // consulted for it.
    assert_eq!(graph["report"], vec!["total".to_string()]);
    assert!(graph["total"].is_empty());
}

#[test]
fn broken_entries_fail_the_build() {
    let calc = Calculator::new();
    let batch = batch(&[("good", "1 + 1"), ("bad", "1 +")]);

    let err = build_dependency_graph(&calc, &batch, false, false).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::Syntax);
}

#[test]
fn ignore_errors_drops_broken_entries() {
    let calc = Calculator::new();
    let batch = batch(&[("good", "1 + 1"), ("bad", "1 +")]);

    let graph = build_dependency_graph(&calc, &batch, false, true).unwrap();

    assert_eq!(graph.len(), 1);
    assert!(graph.contains_key("good"));
    assert!(!graph.contains_key("bad"));
}
