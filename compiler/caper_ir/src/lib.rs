//! Caper IR - program representation for actor scripts.
//!
//! This crate contains the data the interpreter walks:
//! - Names for interned identifiers
//! - Typed values (`Value`, `ValueType`) and their world handles
//! - Flat expression and statement arenas addressed by `ExprId` / `StmtId`
//! - The actor-kind, selector and tile vocabulary shared with the world model
//! - Structural validation of a program tree
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: variable names become `Name(u32)`
//! - **Flatten Everything**: no `Box<Expr>`, children are arena indices
//! - **Immutable Trees**: the program tree never changes after construction;
//!   all resumable execution state lives in the evaluator's side-table.

mod arena;
pub mod ast;
mod ids;
mod interner;
mod kinds;
mod name;
pub mod validate;
mod value;

pub use arena::{ExprArena, ProgramIr, StmtArena};
pub use ast::{Action, BinaryOp, ExprKind, ObjectQuery, SortKey, SortOrder, StmtKind, UnaryOp};
pub use ids::{ExprId, StmtId, StmtRange};
pub use interner::StringInterner;
pub use kinds::{ActorKind, Axis, Selector, TileClass};
pub use name::Name;
pub use validate::IrError;
pub use value::{Direction, ObjectId, ObjectRef, TileRef, Value, ValueType};
