//! Numeric coercion shared by the interpreter and the builtin functions.
//!
//! Text that spells a number participates in arithmetic as that number.
//! This is what keeps bulk solving stable when expression text stands in
//! for a not-yet-resolved variable.

use reckoner_common::{EvalError, EvalErrorKind, Value};

/// Largest magnitude at which every integer is exactly representable in
/// an `f64` (2^53).
pub(crate) const INT_EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Numeric working representation: integer results stay integers until an
/// operation forces a widening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    pub(crate) fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }

    pub(crate) fn into_value(self) -> Value {
        match self {
            Num::Int(i) => Value::Int(i),
            Num::Float(f) => Value::Float(f),
        }
    }
}

/// Numeric view of a value, `None` when there is none. Text is trimmed
/// and parsed, preferring the integer reading.
pub(crate) fn numeric(value: &Value) -> Option<Num> {
    match value {
        Value::Int(i) => Some(Num::Int(*i)),
        Value::Float(f) => Some(Num::Float(*f)),
        Value::Text(s) => {
            let t = s.trim();
            match t.parse::<i64>() {
                Ok(i) => Some(Num::Int(i)),
                Err(_) => t.parse::<f64>().ok().map(Num::Float),
            }
        }
        Value::Bool(_) | Value::Undefined => None,
    }
}

/// Integral `f64` results within the exact range come back as `Int`;
/// everything else stays `Float`.
pub(crate) fn cast_back(f: f64) -> Value {
    if f.is_finite() && f.fract() == 0.0 && f.abs() <= INT_EXACT_LIMIT {
        Value::Int(f as i64)
    } else {
        Value::Float(f)
    }
}

pub(crate) fn add(l: Num, r: Num) -> Num {
    match (l, r) {
        (Num::Int(a), Num::Int(b)) => match a.checked_add(b) {
            Some(n) => Num::Int(n),
            None => Num::Float(a as f64 + b as f64),
        },
        _ => Num::Float(l.as_f64() + r.as_f64()),
    }
}

pub(crate) fn sub(l: Num, r: Num) -> Num {
    match (l, r) {
        (Num::Int(a), Num::Int(b)) => match a.checked_sub(b) {
            Some(n) => Num::Int(n),
            None => Num::Float(a as f64 - b as f64),
        },
        _ => Num::Float(l.as_f64() - r.as_f64()),
    }
}

pub(crate) fn mul(l: Num, r: Num) -> Num {
    match (l, r) {
        (Num::Int(a), Num::Int(b)) => match a.checked_mul(b) {
            Some(n) => Num::Int(n),
            None => Num::Float(a as f64 * b as f64),
        },
        _ => Num::Float(l.as_f64() * r.as_f64()),
    }
}

/// Division always computes in `f64`; the zero check precedes the divide.
pub(crate) fn div(l: Num, r: Num) -> Result<Value, EvalError> {
    let divisor = r.as_f64();
    if divisor == 0.0 {
        return Err(EvalErrorKind::DivideByZero.into());
    }
    Ok(cast_back(l.as_f64() / divisor))
}

/// Floored modulo: the result takes the divisor's sign.
pub(crate) fn rem(l: Num, r: Num) -> Result<Value, EvalError> {
    match (l, r) {
        (Num::Int(_), Num::Int(0)) => Err(EvalErrorKind::DivideByZero.into()),
        (Num::Int(a), Num::Int(b)) => {
            // i64::MIN % -1 overflows in the raw op; its remainder is 0.
            if a == i64::MIN && b == -1 {
                return Ok(Value::Int(0));
            }
            let r0 = a % b;
            if r0 != 0 && (r0 < 0) != (b < 0) {
                Ok(Value::Int(r0 + b))
            } else {
                Ok(Value::Int(r0))
            }
        }
        _ => {
            let (a, b) = (l.as_f64(), r.as_f64());
            if b == 0.0 {
                return Err(EvalErrorKind::DivideByZero.into());
            }
            let r0 = a % b;
            if r0 != 0.0 && (r0 < 0.0) != (b < 0.0) {
                Ok(Value::Float(r0 + b))
            } else {
                Ok(Value::Float(r0))
            }
        }
    }
}

/// Exponentiation computes in `f64` and casts integral results back.
pub(crate) fn pow(l: Num, r: Num) -> Value {
    cast_back(l.as_f64().powf(r.as_f64()))
}

pub(crate) fn neg(n: Num) -> Num {
    match n {
        Num::Int(i) => match i.checked_neg() {
            Some(v) => Num::Int(v),
            None => Num::Float(-(i as f64)),
        },
        Num::Float(f) => Num::Float(-f),
    }
}
