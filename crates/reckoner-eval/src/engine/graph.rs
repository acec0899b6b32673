//! Dependency-map construction for a batch.

use std::collections::VecDeque;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use reckoner_common::EvalError;

use crate::calculator::Calculator;

/// Build the dependency map for a batch: each batch name maps to the
/// variables its expression still needs, and every stored formula
/// reachable from those dependencies gets a slot of its own so the
/// resolver schedules it ahead of its dependents.
///
/// Plain-value bindings and unbound names referenced as dependencies are
/// leaves: they occupy a slot with an empty dependency set. With
/// `ignore_errors` set, a batch entry whose dependency discovery fails is
/// dropped from the map instead of failing the whole build.
pub fn build_dependency_graph(
    calc: &Calculator,
    batch: &IndexMap<String, String>,
    ignore_memory: bool,
    ignore_errors: bool,
) -> Result<IndexMap<String, Vec<String>>, EvalError> {
    let mut map: IndexMap<String, Vec<String>> = IndexMap::with_capacity(batch.len());
    for (name, expression) in batch {
        match calc.dependencies(expression, ignore_memory) {
            Ok(deps) => {
                map.insert(name.clone(), deps);
            }
            Err(_) if ignore_errors => {}
            Err(e) => return Err(e),
        }
    }

    // Transitive formula expansion. Work-list driven with a seen set, so
    // arbitrarily deep formula chains terminate; cyclic chains produce a
    // cyclic map, which the resolver reports.
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut work: VecDeque<String> = VecDeque::new();
    for deps in map.values() {
        for dep in deps {
            if !map.contains_key(dep) && seen.insert(dep.clone()) {
                work.push_back(dep.clone());
            }
        }
    }
    while let Some(name) = work.pop_front() {
        match calc.formula(&name) {
            Some(node) => {
                let deps = node.get_dependencies();
                for dep in &deps {
                    if !map.contains_key(dep) && seen.insert(dep.clone()) {
                        work.push_back(dep.clone());
                    }
                }
                map.insert(name, deps);
            }
            None => {
                map.insert(name, Vec::new());
            }
        }
    }

    Ok(map)
}
