mod common;
mod cycle_detection;
mod graph_basic;
mod solver_errors;
