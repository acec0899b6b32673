//! Meta crate that re-exports the primary Reckoner building blocks with
//! sensible defaults. Downstream users can depend on this crate and opt
//! into specific layers via feature flags while keeping access to the
//! underlying crates when deeper integration is required.

#[cfg(feature = "common")]
pub use reckoner_common as common;

#[cfg(feature = "parse")]
pub use reckoner_parse as parse;

#[cfg(feature = "eval")]
pub use reckoner_eval as eval;

#[cfg(feature = "common")]
pub use reckoner_common::{EvalError, EvalErrorKind, Value};

#[cfg(feature = "parse")]
pub use reckoner_parse::{ASTNode, ASTNodeType, Parser, Token, Tokenizer};

#[cfg(feature = "eval")]
pub use reckoner_eval::{
    ArgHandle, Binding, BulkSolver, CalcConfig, Calculator, Function, IndexMap, ResolveOrderCache,
    SolveOptions, function_registry,
};
