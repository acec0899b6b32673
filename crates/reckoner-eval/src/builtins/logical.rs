//! Conditional and boolean builtins.

use std::sync::Arc;

use reckoner_common::{EvalError, Value};

use crate::function_registry::install;
use crate::traits::{ArgHandle, Function};

pub fn register_builtins() {
    install(Arc::new(IfFn));
    install(Arc::new(NotFn));
}

/* ───────────────────────────── IF() ─────────────────────────────── */

/// `IF(condition, then, else?)`: branches are lazy; only the taken one
/// is evaluated. A missing else branch yields `Undefined`.
struct IfFn;

impl Function for IfFn {
    fn name(&self) -> &'static str {
        "IF"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }

    fn call(&self, args: &[ArgHandle<'_, '_>]) -> Result<Value, EvalError> {
        if args[0].value()?.is_truthy() {
            args[1].value().map(|v| v.into_owned())
        } else if let Some(other) = args.get(2) {
            other.value().map(|v| v.into_owned())
        } else {
            Ok(Value::Undefined)
        }
    }
}

/* ───────────────────────────── NOT() ────────────────────────────── */

/// `NOT(x)`: truthiness negation, same as the `!` operator.
struct NotFn;

impl Function for NotFn {
    fn name(&self) -> &'static str {
        "NOT"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }

    fn call(&self, args: &[ArgHandle<'_, '_>]) -> Result<Value, EvalError> {
        Ok(Value::Bool(!args[0].value()?.is_truthy()))
    }
}
