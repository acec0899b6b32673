//! Common test helpers
use indexmap::IndexMap;

use reckoner_common::Value;

use crate::Calculator;

/// Batch map with canonical (lowercased) keys, the shape the graph
/// builder and resolver take directly.
pub fn batch(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
    pairs
        .iter()
        .map(|(name, expression)| (name.to_lowercase(), expression.to_string()))
        .collect()
}

/// Hand-built dependency map for resolver tests.
pub fn graph_of(edges: &[(&str, &[&str])]) -> IndexMap<String, Vec<String>> {
    edges
        .iter()
        .map(|(name, deps)| {
            (
                name.to_string(),
                deps.iter().map(|d| d.to_string()).collect(),
            )
        })
        .collect()
}

/// The solved value for `name`, panicking when the slot is absent or
/// empty.
pub fn solved(results: &IndexMap<String, Option<Value>>, name: &str) -> Value {
    results
        .get(name)
        .unwrap_or_else(|| panic!("no slot for '{name}'"))
        .clone()
        .unwrap_or_else(|| panic!("no value for '{name}'"))
}
