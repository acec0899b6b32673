//! Numeric builtins. Arguments coerce like arithmetic operands (numeric
//! text counts); integer inputs produce integer results wherever the
//! operation allows it.

use std::cmp::Ordering;
use std::sync::Arc;

use reckoner_common::{EvalError, EvalErrorKind, Value};

use crate::coercion::{self, Num};
use crate::function_registry::install;
use crate::traits::{ArgHandle, Function};

pub fn register_builtins() {
    install(Arc::new(MinFn));
    install(Arc::new(MaxFn));
    install(Arc::new(SumFn));
    install(Arc::new(AbsFn));
    install(Arc::new(RoundFn));
}

fn numeric_arg(name: &str, arg: &ArgHandle<'_, '_>) -> Result<Num, EvalError> {
    let value = arg.value()?;
    coercion::numeric(&value).ok_or_else(|| {
        EvalError::new(EvalErrorKind::Argument).with_message(format!(
            "{name}() expects numeric arguments, got {}",
            value.type_name()
        ))
    })
}

/// Fold to the argument whose numeric value wins `keep` comparisons,
/// preserving that argument's representation.
fn fold_extremum(
    name: &str,
    args: &[ArgHandle<'_, '_>],
    keep: Ordering,
) -> Result<Value, EvalError> {
    let mut best = numeric_arg(name, &args[0])?;
    for arg in &args[1..] {
        let candidate = numeric_arg(name, arg)?;
        if candidate.as_f64().partial_cmp(&best.as_f64()) == Some(keep) {
            best = candidate;
        }
    }
    Ok(best.into_value())
}

/* ───────────────────────────── MIN() ────────────────────────────── */

struct MinFn;

impl Function for MinFn {
    fn name(&self) -> &'static str {
        "MIN"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn call(&self, args: &[ArgHandle<'_, '_>]) -> Result<Value, EvalError> {
        fold_extremum(self.name(), args, Ordering::Less)
    }
}

/* ───────────────────────────── MAX() ────────────────────────────── */

struct MaxFn;

impl Function for MaxFn {
    fn name(&self) -> &'static str {
        "MAX"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn call(&self, args: &[ArgHandle<'_, '_>]) -> Result<Value, EvalError> {
        fold_extremum(self.name(), args, Ordering::Greater)
    }
}

/* ───────────────────────────── SUM() ────────────────────────────── */

struct SumFn;

impl Function for SumFn {
    fn name(&self) -> &'static str {
        "SUM"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn call(&self, args: &[ArgHandle<'_, '_>]) -> Result<Value, EvalError> {
        let mut total = Num::Int(0);
        for arg in args {
            total = coercion::add(total, numeric_arg(self.name(), arg)?);
        }
        Ok(total.into_value())
    }
}

/* ───────────────────────────── ABS() ────────────────────────────── */

struct AbsFn;

impl Function for AbsFn {
    fn name(&self) -> &'static str {
        "ABS"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }

    fn call(&self, args: &[ArgHandle<'_, '_>]) -> Result<Value, EvalError> {
        match numeric_arg(self.name(), &args[0])? {
            Num::Int(i) => match i.checked_abs() {
                Some(n) => Ok(Value::Int(n)),
                // |i64::MIN| is one past i64::MAX.
                None => Ok(Value::Float(-(i as f64))),
            },
            Num::Float(f) => Ok(Value::Float(f.abs())),
        }
    }
}

/* ──────────────────────────── ROUND() ───────────────────────────── */

/// `ROUND(x, places?)`: half away from zero. With `places <= 0` the
/// result is integral (cast back to `Int` in range); with `places > 0`
/// it stays `Float`.
struct RoundFn;

impl Function for RoundFn {
    fn name(&self) -> &'static str {
        "ROUND"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }

    fn call(&self, args: &[ArgHandle<'_, '_>]) -> Result<Value, EvalError> {
        let x = numeric_arg(self.name(), &args[0])?.as_f64();
        let places = match args.get(1) {
            Some(arg) => match numeric_arg(self.name(), arg)? {
                Num::Int(i) => i,
                Num::Float(f) => f.trunc() as i64,
            },
            None => 0,
        };
        // f64 only spans ~10^±308; clamping keeps powi meaningful.
        let places = places.clamp(-308, 308) as i32;
        if places <= 0 {
            let factor = 10f64.powi(-places);
            Ok(coercion::cast_back((x / factor).round() * factor))
        } else {
            let factor = 10f64.powi(places);
            Ok(Value::Float((x * factor).round() / factor))
        }
    }
}
