//! Process-global function registry.
//!
//! Functions are shared `Arc<dyn Function>` values keyed by lower-case
//! name. Builtins are installed once, on first use; host registrations
//! after that point can shadow them.

use std::sync::{Arc, Once};

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::traits::Function;

static REGISTRY: Lazy<DashMap<String, Arc<dyn Function>>> = Lazy::new(DashMap::new);
static BUILTINS: Once = Once::new();

fn ensure_builtins() {
    BUILTINS.call_once(crate::builtins::load_builtins);
}

/// Raw insert, used by the builtin loader. Must not touch the `Once`
/// (the loader runs inside it).
pub(crate) fn install(function: Arc<dyn Function>) {
    REGISTRY.insert(function.name().to_lowercase(), function);
}

/// Register a function under its lower-cased name, replacing any previous
/// entry (builtins included).
pub fn register(function: Arc<dyn Function>) {
    ensure_builtins();
    install(function);
}

/// Case-insensitive lookup.
pub fn get(name: &str) -> Option<Arc<dyn Function>> {
    ensure_builtins();
    REGISTRY
        .get(&name.to_lowercase())
        .map(|entry| Arc::clone(entry.value()))
}
