//! Bulk solving of interdependent named formulas.
//!
//! A batch of `(name, expression)` pairs is turned into a dependency map
//! (stored formulas referenced by the batch get slots of their own), the
//! map is topologically ordered, and every name in the order is evaluated
//! with already-computed results visible to later entries.

pub mod graph;
pub mod order_cache;
pub mod resolver;
pub mod solver;

#[cfg(test)]
mod tests;

pub use graph::build_dependency_graph;
pub use order_cache::ResolveOrderCache;
pub use resolver::resolve_order;
pub use solver::{BulkSolver, SolveOptions};

/// Caching knobs for a [`Calculator`](crate::Calculator).
#[derive(Debug, Clone)]
pub struct CalcConfig {
    /// Memoize parsed ASTs per expression text.
    pub cache_ast: bool,
    /// Memoize resolve orders per batch name set. The cache key ignores
    /// expression text, so redefining formulas under an already-seen name
    /// set can serve a stale order; clear the order cache after such
    /// redefinitions.
    pub cache_resolve_order: bool,
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self {
            cache_ast: true,
            cache_resolve_order: true,
        }
    }
}
