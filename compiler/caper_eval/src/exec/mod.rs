//! Execution modules for the Caper interpreter.
//!
//! - `expr`: expression evaluation against globals and the world
//! - `operators`: binary/unary operator dispatch
//! - `stmt`: the resumable statement executor
//! - `for_each`: candidate enumeration, filtering and sorting
//! - `continuation`: the side-table that records where a program paused

mod continuation;
mod expr;
mod for_each;
mod operators;
mod stmt;

pub use continuation::{ContinuationTable, ForEachFrame, Frame, NodeState, Phase};
pub use stmt::{Executor, Flow};
