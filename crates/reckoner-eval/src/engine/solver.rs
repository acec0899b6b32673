//! Ordered evaluation of a batch of named expressions.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use reckoner_common::{EvalError, EvalErrorKind, Value};

use crate::calculator::Calculator;
use crate::engine::graph::build_dependency_graph;
use crate::engine::order_cache::ResolveOrderCache;
use crate::engine::resolver::resolve_order;

/// Per-batch behaviour switches and lifecycle hooks.
///
/// Every hook receives the batch expression for the visited name (`None`
/// for names that entered the resolve order as dependencies only) and
/// the canonical name itself.
#[derive(Default)]
pub struct SolveOptions {
    /// Skip a name entirely (its slot stays absent) when this returns
    /// false.
    pub evaluate_if: Option<Box<dyn Fn(Option<&str>, &str) -> bool>>,
    /// Runs just before a name's value is computed.
    pub before_evaluation: Option<Box<dyn Fn(Option<&str>, &str)>>,
    /// Replaces each computed value before it is recorded.
    pub convert_value: Option<Box<dyn Fn(Option<&str>, &str, Value) -> Value>>,
    /// Observes each value after conversion, before it is recorded.
    pub after_evaluation: Option<Box<dyn Fn(Option<&str>, &str, &Value)>>,
    /// Re-evaluate batch expressions even for names that already hold a
    /// stored value.
    pub always_evaluate: bool,
    /// Absorb any failure while computing a single name (skipping that
    /// name), and drop names whose dependency discovery fails.
    pub ignore_errors: bool,
}

impl fmt::Debug for SolveOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolveOptions")
            .field("evaluate_if", &self.evaluate_if.is_some())
            .field("before_evaluation", &self.before_evaluation.is_some())
            .field("convert_value", &self.convert_value.is_some())
            .field("after_evaluation", &self.after_evaluation.is_some())
            .field("always_evaluate", &self.always_evaluate)
            .field("ignore_errors", &self.ignore_errors)
            .finish()
    }
}

/// Solves a batch of interdependent named expressions against one
/// calculator.
///
/// Construction canonicalizes the batch keys; the terminal methods pick
/// the failure boundary. Results come back under the caller's original
/// keys, in the caller's insertion order, with `None` marking entries
/// that were skipped or dropped.
pub struct BulkSolver<'c> {
    calc: &'c mut Calculator,
    /// (original, canonical) pairs in submission order, duplicates kept.
    names: Vec<(String, String)>,
    /// Canonical name → expression text. First writer keeps the slot
    /// position, last writer keeps the expression.
    batch: IndexMap<String, String>,
    options: SolveOptions,
}

impl<'c> BulkSolver<'c> {
    pub fn new<I, K, E>(calc: &'c mut Calculator, batch: I) -> Self
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: Into<String>,
    {
        let mut names = Vec::new();
        let mut canonical: IndexMap<String, String> = IndexMap::new();
        for (key, expression) in batch {
            let original = key.into();
            let lower = original.to_lowercase();
            names.push((original, lower.clone()));
            canonical.insert(lower, expression.into());
        }
        BulkSolver {
            calc,
            names,
            batch: canonical,
            options: SolveOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Lenient boundary: entries failing with `Unbound` or
    /// `DivideByZero` record `Undefined` and the batch keeps going.
    pub fn solve(self) -> Result<IndexMap<String, Option<Value>>, EvalError> {
        self.solve_with(|_| Ok(Value::Undefined))
    }

    /// Strict boundary: the first entry failing with `Unbound` or
    /// `DivideByZero` aborts the batch; the error carries the entry name
    /// as its recipient.
    pub fn solve_strict(self) -> Result<IndexMap<String, Option<Value>>, EvalError> {
        self.solve_with(Err)
    }

    /// Run with a custom boundary. The handler sees every `Unbound` or
    /// `DivideByZero` failure, already tagged with its recipient; an
    /// `Ok` return is recorded for the entry (and visible downstream),
    /// an `Err` aborts the batch. Other failure kinds bypass the handler
    /// and abort directly.
    pub fn solve_with<F>(self, mut handler: F) -> Result<IndexMap<String, Option<Value>>, EvalError>
    where
        F: FnMut(EvalError) -> Result<Value, EvalError>,
    {
        let BulkSolver {
            calc,
            names,
            batch,
            options,
        } = self;

        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("bulk_solve", names = batch.len()).entered();

        let order = variables_in_resolve_order(calc, &batch, &options)?;

        // Expression text stands in for batch names until they resolve;
        // numeric coercion makes the placeholder transparent for formulas
        // evaluated out of their true order (stale cached orders).
        let mut overlay: FxHashMap<String, Value> = batch
            .iter()
            .map(|(name, expression)| (name.clone(), Value::Text(expression.clone())))
            .collect();
        let mut results: FxHashMap<String, Value> = FxHashMap::default();

        for name in order.iter() {
            match solve_name(calc, name, &batch, &options, &overlay) {
                Ok(Some(value)) => {
                    overlay.insert(name.clone(), value.clone());
                    results.insert(name.clone(), value);
                }
                Ok(None) => {}
                Err(e)
                    if matches!(
                        e.kind,
                        EvalErrorKind::Unbound | EvalErrorKind::DivideByZero
                    ) =>
                {
                    let value = handler(e.with_recipient(name.as_str()))?;
                    overlay.insert(name.clone(), value.clone());
                    results.insert(name.clone(), value);
                }
                Err(e) => return Err(e),
            }
        }

        let mut output: IndexMap<String, Option<Value>> = IndexMap::with_capacity(names.len());
        for (original, canonical) in names {
            let value = results.get(&canonical).cloned();
            output.insert(original, value);
        }
        Ok(output)
    }
}

/// Memoized resolve order for the batch: cache hit (when enabled) skips
/// both graph construction and resolution.
fn variables_in_resolve_order(
    calc: &Calculator,
    batch: &IndexMap<String, String>,
    options: &SolveOptions,
) -> Result<Arc<[String]>, EvalError> {
    let cache_key = ResolveOrderCache::key_for(batch.keys().map(String::as_str));

    if calc.config.cache_resolve_order {
        if let Some(order) = calc.order_cache().get(&cache_key) {
            #[cfg(feature = "tracing")]
            tracing::debug!(key = %cache_key, "resolve order cache hit");
            return Ok(order);
        }
    }

    let graph =
        build_dependency_graph(calc, batch, options.always_evaluate, options.ignore_errors)?;
    let order: Arc<[String]> = resolve_order(&graph)?.into();

    if calc.config.cache_resolve_order {
        calc.order_cache().put(cache_key, Arc::clone(&order));
    }
    Ok(order)
}

/// Produce the value for one name in the resolve order, or `None` to
/// leave its slot unwritten. `Err` escapes to the caller's boundary.
fn solve_name(
    calc: &mut Calculator,
    name: &str,
    batch: &IndexMap<String, String>,
    options: &SolveOptions,
    overlay: &FxHashMap<String, Value>,
) -> Result<Option<Value>, EvalError> {
    let stored = calc.stored_value(name).cloned();
    let batch_expr = batch.get(name).map(String::as_str);

    // A name with no store presence and no batch expression has nothing
    // to contribute; dependency-only slots pass through here.
    if stored.is_none() && batch_expr.is_none() && !calc.has_binding(name) {
        return Ok(None);
    }

    if let Some(pred) = &options.evaluate_if {
        if !pred(batch_expr, name) {
            return Ok(None);
        }
    }
    if let Some(hook) = &options.before_evaluation {
        hook(batch_expr, name);
    }

    let computed = match (stored, options.always_evaluate, batch_expr) {
        // No stored value: evaluate the batch expression. A name that is
        // only formula-bound contributes through evaluation of its
        // dependents, not through a slot of its own.
        (None, _, Some(expression)) => evaluate_entry(calc, expression, overlay),
        (None, _, None) => return Ok(None),
        // Stored value wins unless the batch asked to recompute.
        (Some(value), false, _) => Ok(value),
        (Some(_), true, Some(expression)) => evaluate_entry(calc, expression, overlay),
        (Some(value), true, None) => Ok(value),
    };

    let mut value = match computed {
        Ok(value) => value,
        Err(_) if options.ignore_errors => return Ok(None),
        Err(e) => return Err(e),
    };

    if let Some(convert) = &options.convert_value {
        value = convert(batch_expr, name, value);
    }
    if let Some(hook) = &options.after_evaluation {
        hook(batch_expr, name, &value);
    }
    Ok(Some(value))
}

fn evaluate_entry(
    calc: &mut Calculator,
    expression: &str,
    overlay: &FxHashMap<String, Value>,
) -> Result<Value, EvalError> {
    let ast = calc.ast(expression)?;
    calc.evaluate_ast_with(&ast, overlay)
}
