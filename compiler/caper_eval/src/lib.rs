//! Caper Eval - resumable, time-budgeted interpreter for actor scripts.
//!
//! A simulation calls `Program::advance` once per tick with a budget. The
//! program runs until it completes, runs out of budget, or faults, and picks
//! up exactly where it stopped on the next call.
//!
//! # Architecture
//!
//! - `GlobalTable`: typed global variables, written only by assignment and
//!   loop binding
//! - `ExecContext`: budget accounting, halt flag, loop stack and RNG
//! - `exec`: expression evaluator and statement executor, with all
//!   resumption state in a `ContinuationTable` side-table
//! - `World`: the query/command surface of the game the actor lives in;
//!   `SandboxWorld` is an in-memory implementation
//!
//! # Faults
//!
//! Transient faults (division by zero, a vanished actor) abandon the current
//! statement for this tick and retry it on the next one. Fatal faults (an
//! ill-typed assignment, a misdeclared loop variable) halt the program.

mod context;
mod diagnostics;
pub mod errors;
pub mod exec;
mod globals;
mod print_handler;
mod program;
mod sandbox;
mod stack;
pub mod world;

pub use context::{ExecContext, STEP_COST};
pub use diagnostics::ExecCounters;
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use globals::{AssignError, GlobalTable};
pub use print_handler::{
    buffer_handler, log_handler, silent_handler, stdout_handler, BufferPrintHandler,
    PrintHandlerImpl, SharedPrintHandler, StdoutPrintHandler,
};
pub use program::{Program, ProgramBuilder, DEFAULT_SEED};
pub use sandbox::SandboxWorld;
pub use world::{ActorCommand, ActorState, CommandOutcome, World};
