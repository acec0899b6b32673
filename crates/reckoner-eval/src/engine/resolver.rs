//! Topological ordering of a dependency map.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use reckoner_common::{EvalError, EvalErrorKind};

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Active,
    Done,
}

/// Order a dependency map so that every dependency precedes its
/// dependents. Names referenced as dependencies but absent as keys are
/// treated as dependency-free and emitted as well.
///
/// The walk is deterministic: roots are taken in map insertion order and
/// children in recorded dependency order, so identical maps always
/// produce identical sequences. A cycle anywhere in the map fails the
/// whole resolution.
pub fn resolve_order(graph: &IndexMap<String, Vec<String>>) -> Result<Vec<String>, EvalError> {
    let mut order: Vec<String> = Vec::with_capacity(graph.len());
    let mut marks: FxHashMap<&str, Mark> = FxHashMap::default();

    for root in graph.keys() {
        if marks.contains_key(root.as_str()) {
            continue;
        }
        visit(graph, root, &mut marks, &mut order)?;
    }

    Ok(order)
}

/// Iterative post-order DFS from `root`. `Active` marks the path
/// currently on the stack; meeting an `Active` node again is a cycle.
fn visit<'g>(
    graph: &'g IndexMap<String, Vec<String>>,
    root: &'g str,
    marks: &mut FxHashMap<&'g str, Mark>,
    order: &mut Vec<String>,
) -> Result<(), EvalError> {
    // (node, index of the next child to look at)
    let mut stack: Vec<(&'g str, usize)> = vec![(root, 0)];
    marks.insert(root, Mark::Active);

    while let Some((node, child_index)) = stack.last_mut() {
        let children = graph.get(*node).map(Vec::as_slice).unwrap_or(&[]);
        match children.get(*child_index) {
            Some(child) => {
                *child_index += 1;
                match marks.get(child.as_str()) {
                    Some(Mark::Active) => {
                        return Err(EvalError::new(EvalErrorKind::Cycle)
                            .with_message(format!("circular dependency involving '{child}'"))
                            .with_variable(child.as_str()));
                    }
                    Some(Mark::Done) => {}
                    None => {
                        marks.insert(child.as_str(), Mark::Active);
                        stack.push((child.as_str(), 0));
                    }
                }
            }
            None => {
                marks.insert(*node, Mark::Done);
                order.push((*node).to_string());
                stack.pop();
            }
        }
    }

    Ok(())
}
