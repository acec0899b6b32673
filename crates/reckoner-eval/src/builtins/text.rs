//! Text builtins.

use std::sync::Arc;

use reckoner_common::{EvalError, Value};

use crate::function_registry::install;
use crate::traits::{ArgHandle, Function};

pub fn register_builtins() {
    install(Arc::new(ConcatFn));
}

/* ──────────────────────────── CONCAT() ──────────────────────────── */

/// `CONCAT(a, b, ...)` joins the display form of every argument.
struct ConcatFn;

impl Function for ConcatFn {
    fn name(&self) -> &'static str {
        "CONCAT"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn call(&self, args: &[ArgHandle<'_, '_>]) -> Result<Value, EvalError> {
        let mut out = String::new();
        for arg in args {
            out.push_str(&arg.value()?.to_string());
        }
        Ok(Value::Text(out))
    }
}
