//! Builtin function catalog, installed into the registry on first use.

pub mod logical;
pub mod math;
pub mod text;

pub fn load_builtins() {
    logical::register_builtins();
    math::register_builtins();
    text::register_builtins();
}
