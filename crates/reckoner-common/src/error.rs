//! Failure representation shared by the tokenizer, parser, interpreter,
//! and bulk solver.

use std::error::Error;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The failure kinds the runtime distinguishes.
///
/// The kind drives control flow (what the solver boundary absorbs, what
/// `try_evaluate` suppresses); the surrounding [`EvalError`] carries the
/// human-facing context.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EvalErrorKind {
    /// Malformed expression text.
    Syntax,
    /// A referenced variable or function has no binding.
    Unbound,
    /// Division or modulo by zero.
    DivideByZero,
    /// The dependency graph of a batch contains a cycle.
    Cycle,
    /// A value of the wrong shape reached an operator or function.
    Argument,
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Syntax => "syntax error",
            Self::Unbound => "unbound variable",
            Self::DivideByZero => "division by zero",
            Self::Cycle => "cyclic dependency",
            Self::Argument => "invalid argument",
        })
    }
}

/// The single error struct the API passes around.
///
/// * **kind** – the mandatory failure kind
/// * **message** – optional human explanation
/// * **variable** – the variable or function the failure refers to
/// * **recipient** – the batch entry a bulk-solve failure was attributed to
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub message: Option<String>,
    pub variable: Option<String>,
    pub recipient: Option<String>,
}

/* ───────────────────── Constructors & helpers ─────────────────────── */

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        Self {
            kind,
            message: None,
            variable: None,
            recipient: None,
        }
    }
}

impl EvalError {
    /// Basic constructor (no message, no context).
    pub fn new(kind: EvalErrorKind) -> Self {
        kind.into()
    }

    /// Attach a human-readable explanation.
    pub fn with_message<S: Into<String>>(mut self, msg: S) -> Self {
        self.message = Some(msg.into());
        self
    }

    /// Attach the variable (or function name) the failure refers to.
    pub fn with_variable<S: Into<String>>(mut self, name: S) -> Self {
        self.variable = Some(name.into());
        self
    }

    /// Attach the batch entry the failure surfaced under.
    pub fn with_recipient<S: Into<String>>(mut self, name: S) -> Self {
        self.recipient = Some(name.into());
        self
    }
}

/* ───────────────────────── Display / Error ────────────────────────── */

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(ref msg) = self.message {
            write!(f, ": {msg}")?;
        }
        if let Some(ref variable) = self.variable {
            write!(f, " (variable '{variable}')")?;
        }
        if let Some(ref recipient) = self.recipient {
            write!(f, " [in '{recipient}']")?;
        }
        Ok(())
    }
}

impl Error for EvalError {}

impl From<EvalError> for String {
    fn from(error: EvalError) -> Self {
        format!("{error}")
    }
}
