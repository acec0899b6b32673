//! The calculator: a variable store, an AST cache, and the evaluation
//! entry points built on them.

use std::cell::RefCell;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use reckoner_common::{EvalError, EvalErrorKind, Value};
use reckoner_parse::{ASTNode, parse};

use crate::engine::solver::BulkSolver;
use crate::engine::{CalcConfig, ResolveOrderCache};
use crate::interpreter::Interpreter;

/// What a name is bound to: a plain value, or a stored formula that is
/// re-evaluated every time the name is referenced.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Value(Value),
    Formula(Arc<ASTNode>),
}

/// An expression evaluator with a persistent, case-insensitive variable
/// store.
///
/// All keys are canonicalized to lower case on every write and lookup, so
/// `Total`, `total`, and `TOTAL` are one variable. Per-call data passed
/// to [`evaluate`](Self::evaluate) overlays the store transactionally:
/// whatever happens during evaluation, the store is restored before the
/// call returns.
#[derive(Debug)]
pub struct Calculator {
    memory: FxHashMap<String, Binding>,
    ast_cache: RefCell<FxHashMap<String, Arc<ASTNode>>>,
    pub config: CalcConfig,
    order_cache: Arc<ResolveOrderCache>,
}

impl Calculator {
    pub fn new() -> Self {
        Self::with_config(CalcConfig::default())
    }

    pub fn with_config(config: CalcConfig) -> Self {
        Calculator {
            memory: FxHashMap::default(),
            ast_cache: RefCell::new(FxHashMap::default()),
            config,
            order_cache: Arc::new(ResolveOrderCache::new()),
        }
    }

    /// Share a resolve-order cache with other calculators (or inspect it
    /// from the outside).
    pub fn with_order_cache(mut self, cache: Arc<ResolveOrderCache>) -> Self {
        self.order_cache = cache;
        self
    }

    pub fn order_cache(&self) -> &Arc<ResolveOrderCache> {
        &self.order_cache
    }

    /* ───────────────────────── Store management ───────────────────── */

    /// Bind `name` to a plain value.
    pub fn bind<S, V>(&mut self, name: S, value: V)
    where
        S: Into<String>,
        V: Into<Value>,
    {
        self.memory
            .insert(name.into().to_lowercase(), Binding::Value(value.into()));
    }

    pub fn bind_many<I, S, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<Value>,
    {
        for (name, value) in pairs {
            self.bind(name, value);
        }
    }

    /// Parse `expression` and bind `name` to the resulting formula. The
    /// formula is evaluated lazily, against whatever the store holds when
    /// the name is referenced.
    pub fn store_formula(&mut self, name: &str, expression: &str) -> Result<(), EvalError> {
        let node = self.ast(expression)?;
        self.memory.insert(name.to_lowercase(), Binding::Formula(node));
        Ok(())
    }

    /// Drop every binding. The AST cache is left alone; it is keyed by
    /// expression text, not by store contents.
    pub fn clear(&mut self) {
        self.memory.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    pub(crate) fn stored_value(&self, name: &str) -> Option<&Value> {
        match self.memory.get(name) {
            Some(Binding::Value(value)) => Some(value),
            _ => None,
        }
    }

    pub(crate) fn formula(&self, name: &str) -> Option<&Arc<ASTNode>> {
        match self.memory.get(name) {
            Some(Binding::Formula(node)) => Some(node),
            _ => None,
        }
    }

    pub(crate) fn has_binding(&self, name: &str) -> bool {
        self.memory.contains_key(name)
    }

    /* ─────────────────────────── Evaluation ───────────────────────── */

    /// Parse (or fetch from cache) the AST for `expression`.
    pub fn ast(&self, expression: &str) -> Result<Arc<ASTNode>, EvalError> {
        if !self.config.cache_ast {
            return Ok(Arc::new(parse(expression)?));
        }
        if let Some(node) = self.ast_cache.borrow().get(expression) {
            return Ok(Arc::clone(node));
        }
        let node = Arc::new(parse(expression)?);
        self.ast_cache
            .borrow_mut()
            .insert(expression.to_string(), Arc::clone(&node));
        Ok(node)
    }

    /// Evaluate `expression` with `data` overlaid on the store for the
    /// duration of the call. The overlay is transactional: the store is
    /// identical before and after, success or failure.
    pub fn evaluate(&mut self, expression: &str, data: &[(&str, Value)]) -> Result<Value, EvalError> {
        let ast = self.ast(expression)?;
        let snapshot = self.memory.clone();
        for (name, value) in data {
            self.memory
                .insert(name.to_lowercase(), Binding::Value(value.clone()));
        }
        let result = Interpreter::new(&self.memory).evaluate(&ast);
        self.memory = snapshot;
        result
    }

    /// Like [`evaluate`](Self::evaluate), but `Unbound` and `Argument`
    /// failures come back as `Ok(None)` instead of an error. Structural
    /// failures (`Syntax`, `DivideByZero`, `Cycle`) still propagate.
    pub fn try_evaluate(
        &mut self,
        expression: &str,
        data: &[(&str, Value)],
    ) -> Result<Option<Value>, EvalError> {
        match self.evaluate(expression, data) {
            Ok(value) => Ok(Some(value)),
            Err(e) if matches!(e.kind, EvalErrorKind::Unbound | EvalErrorKind::Argument) => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Evaluate an already parsed node with `overlay` folded into the
    /// store, transactionally. This is the bulk solver's evaluation path.
    pub(crate) fn evaluate_ast_with(
        &mut self,
        ast: &ASTNode,
        overlay: &FxHashMap<String, Value>,
    ) -> Result<Value, EvalError> {
        let snapshot = self.memory.clone();
        for (name, value) in overlay {
            self.memory.insert(name.clone(), Binding::Value(value.clone()));
        }
        let result = Interpreter::new(&self.memory).evaluate(ast);
        self.memory = snapshot;
        result
    }

    /* ────────────────────────── Dependencies ──────────────────────── */

    /// The variables `expression` needs from outside the store.
    ///
    /// With `ignore_memory` set this is just the expression's free
    /// variables. Otherwise, names bound to plain values are dropped
    /// (they are satisfied), and a name bound to a stored formula is
    /// replaced by that formula's own free variables, one level deep;
    /// chasing deeper chains is the dependency-graph builder's job.
    pub fn dependencies(
        &self,
        expression: &str,
        ignore_memory: bool,
    ) -> Result<Vec<String>, EvalError> {
        let ast = self.ast(expression)?;
        if ignore_memory {
            return Ok(ast.get_dependencies());
        }
        let mut deps: Vec<String> = Vec::new();
        for name in ast.get_dependencies() {
            match self.memory.get(&name) {
                Some(Binding::Value(_)) => {}
                Some(Binding::Formula(node)) => {
                    for inner in node.get_dependencies() {
                        if !deps.contains(&inner) {
                            deps.push(inner);
                        }
                    }
                }
                None => {
                    if !deps.contains(&name) {
                        deps.push(name);
                    }
                }
            }
        }
        Ok(deps)
    }

    /* ───────────────────────── Bulk solving ───────────────────────── */

    /// Solve a batch of named expressions in dependency order, recording
    /// `Undefined` for entries whose evaluation fails with `Unbound` or
    /// `DivideByZero`. See [`BulkSolver`] for hooks and options.
    pub fn solve<I, K, E>(
        &mut self,
        batch: I,
    ) -> Result<IndexMap<String, Option<Value>>, EvalError>
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: Into<String>,
    {
        BulkSolver::new(self, batch).solve()
    }

    /// Like [`solve`](Self::solve), but the first failing entry aborts
    /// the whole batch with the failure tagged by recipient.
    pub fn solve_strict<I, K, E>(
        &mut self,
        batch: I,
    ) -> Result<IndexMap<String, Option<Value>>, EvalError>
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: Into<String>,
    {
        BulkSolver::new(self, batch).solve_strict()
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}
