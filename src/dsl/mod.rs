//! C8: Filter DSL Adapter — turns a parsed clause file into a filter chain
//! and scorer the scheduler can run.

pub mod clause;
pub mod compile;

pub use clause::{AnteSpec, Clause, ClauseFile, Sources};
pub use compile::{compile, CompiledSearch};
