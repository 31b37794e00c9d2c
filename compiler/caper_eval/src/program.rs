//! A runnable program bound to one actor.
//!
//! `Program` owns everything that changes while a script runs: the global
//! table, the continuation side-table and the execution context. The tree
//! itself is shared and never mutated, so one `ProgramIr` can drive many
//! actors.

mod builder;

use std::sync::Arc;

use tracing::{debug, error, trace, warn};

use caper_ir::{validate::validate, IrError, Name, ObjectId, ProgramIr, StmtId, Value};

use crate::context::ExecContext;
use crate::diagnostics::ExecCounters;
use crate::errors::{break_outside_loop, EvalError};
use crate::exec::{ContinuationTable, Executor, Flow};
use crate::globals::GlobalTable;
use crate::print_handler::SharedPrintHandler;
use crate::world::World;

pub use builder::{ProgramBuilder, DEFAULT_SEED};

/// A validated program tree plus its resumable execution state.
pub struct Program {
    ir: Arc<ProgramIr>,
    root: StmtId,
    globals: GlobalTable,
    states: ContinuationTable,
    ctx: ExecContext,
    output: SharedPrintHandler,
    /// The fault that halted the program.
    fault: Option<EvalError>,
    /// Most recent transient fault, kept for inspection.
    last_transient: Option<EvalError>,
}

impl Program {
    /// Validate `ir` and bind it to `subject`, printing to stdout.
    pub fn new(ir: impl Into<Arc<ProgramIr>>, subject: ObjectId) -> Result<Self, IrError> {
        ProgramBuilder::new(ir, subject).build()
    }

    /// Start configuring a program.
    pub fn builder(ir: impl Into<Arc<ProgramIr>>, subject: ObjectId) -> ProgramBuilder {
        ProgramBuilder::new(ir, subject)
    }

    fn from_parts(
        ir: Arc<ProgramIr>,
        ctx: ExecContext,
        output: SharedPrintHandler,
    ) -> Result<Self, IrError> {
        let root = validate(&ir)?;
        let globals = GlobalTable::new(ir.globals());
        let mut states = ContinuationTable::new(ir.stmts().len());
        states.arm(ir.stmts(), root);
        Ok(Self {
            ir,
            root,
            globals,
            states,
            ctx,
            output,
            fault: None,
            last_transient: None,
        })
    }

    /// Run for one tick with `budget` units of work and time.
    ///
    /// Returns when the program completes, runs out of budget, or faults.
    /// Halted and finished programs ignore further calls.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(subject = %self.ctx.subject(), budget = budget)
    )]
    pub fn advance(&mut self, world: &mut dyn World, budget: f64) {
        if self.is_halted() || self.is_finished() {
            return;
        }
        self.ctx.replenish(budget);
        self.ctx.count_tick();

        let result = Executor {
            ir: &self.ir,
            globals: &mut self.globals,
            states: &mut self.states,
            ctx: &mut self.ctx,
            world: &mut *world,
            output: &self.output,
        }
        .exec(self.root);

        match result {
            Ok(Flow::Completed) => debug!("program completed"),
            Ok(Flow::Suspended) => {
                self.ctx.count_suspension();
                trace!(
                    remaining = self.ctx.remaining(),
                    exhausted = self.ctx.is_exhausted(),
                    pending = self.states.armed().count(),
                    "program suspended"
                );
            }
            // Validation rules this out; treat it like any other ill-formed tree.
            Ok(Flow::Break(_)) => self.halt(break_outside_loop()),
            Err(fault) if fault.is_fatal() => self.halt(fault),
            Err(fault) => {
                warn!(%fault, "statement faulted, retrying next tick");
                self.ctx.count_transient_fault();
                self.last_transient = Some(fault);
            }
        }
    }

    fn halt(&mut self, fault: EvalError) {
        error!(%fault, "program halted");
        self.ctx.halt();
        self.fault = Some(fault);
    }

    /// Whether a fatal fault stopped the program for good.
    pub fn is_halted(&self) -> bool {
        self.ctx.is_halted()
    }

    /// Whether the root statement has completed.
    pub fn is_finished(&self) -> bool {
        !self.states.is_armed(self.root)
    }

    /// The fatal fault, if the program is halted.
    pub fn fault(&self) -> Option<&EvalError> {
        self.fault.as_ref()
    }

    pub fn last_transient_fault(&self) -> Option<&EvalError> {
        self.last_transient.as_ref()
    }

    /// Current value of a global.
    pub fn global(&self, name: Name) -> Option<Value> {
        self.globals.get(name)
    }

    /// Current value of a global, looked up by its source name.
    pub fn global_by_str(&self, name: &str) -> Option<Value> {
        self.ir.interner().get(name).and_then(|n| self.globals.get(n))
    }

    /// Every global with its current value, in declaration-name order.
    pub fn globals(&self) -> Vec<(Arc<str>, Value)> {
        self.globals
            .snapshot()
            .into_iter()
            .map(|(name, value)| (self.ir.name_str(name), value))
            .collect()
    }

    /// Resumption state, for debugging where a program paused.
    pub fn continuation(&self) -> &ContinuationTable {
        &self.states
    }

    pub fn ir(&self) -> &ProgramIr {
        &self.ir
    }

    pub fn subject(&self) -> ObjectId {
        self.ctx.subject()
    }

    pub fn output(&self) -> &SharedPrintHandler {
        &self.output
    }

    /// Execution counters (`None` unless enabled on the builder).
    pub fn counters(&self) -> Option<&ExecCounters> {
        self.ctx.counters()
    }
}
