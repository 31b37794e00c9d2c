//! Expression and statement node kinds.
//!
//! Nodes refer to their children by arena index, so the tree is acyclic by
//! construction and can be shared immutably while a program runs.

mod expr;
mod operators;
mod stmt;

pub use expr::{ExprKind, ObjectQuery};
pub use operators::{BinaryOp, UnaryOp};
pub use stmt::{Action, SortKey, SortOrder, StmtKind};
