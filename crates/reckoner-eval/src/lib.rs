pub mod builtins;
pub mod calculator;
mod coercion;
pub mod engine;
pub mod function_registry;
pub mod interpreter;
pub mod traits;


pub use calculator::{Binding, Calculator};
pub use engine::{BulkSolver, CalcConfig, ResolveOrderCache, SolveOptions};
pub use interpreter::Interpreter;
pub use traits::{ArgHandle, Function};

// Re-export the building blocks hosts need alongside the calculator.
pub use indexmap::IndexMap;
pub use reckoner_common::{EvalError, EvalErrorKind, Value};
pub use reckoner_parse::{ASTNode, ASTNodeType, parse};
