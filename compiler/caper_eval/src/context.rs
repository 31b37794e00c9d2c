//! Per-program execution context and the budget protocol.
//!
//! The budget is a quantity of work (or, for `wait`, simulated time) the
//! caller grants for one `advance` call. Every statement step follows the
//! same order: check that a whole step remains, evaluate, then consume the
//! step together with the effect. A step that cannot be paid for leaves no
//! trace, so the same statement resumes first on the next tick.

use rand::rngs::StdRng;
use rand::SeedableRng;
use smallvec::SmallVec;

use caper_ir::{ObjectId, StmtId};

use crate::diagnostics::ExecCounters;

/// Budget consumed by one statement step.
pub const STEP_COST: f64 = 1.0;

/// Mutable state of one running program, apart from its globals and
/// continuation table.
pub struct ExecContext {
    /// Budget left in the current `advance` call.
    remaining: f64,
    /// Set when a statement was refused for lack of budget this call.
    exhausted: bool,
    /// Set by a fatal fault; never cleared.
    halted: bool,
    /// The actor this program controls.
    subject: ObjectId,
    /// Enclosing loops of the statement being executed, innermost last.
    loops: SmallVec<[StmtId; 4]>,
    rng: StdRng,
    counters: Option<ExecCounters>,
}

impl ExecContext {
    pub fn new(subject: ObjectId, seed: u64) -> Self {
        Self {
            remaining: 0.0,
            exhausted: false,
            halted: false,
            subject,
            loops: SmallVec::new(),
            rng: StdRng::seed_from_u64(seed),
            counters: None,
        }
    }

    /// Start a new `advance` call with `budget` units.
    ///
    /// Leftover budget from the previous call does not carry over. Negative
    /// and NaN budgets grant nothing.
    pub fn replenish(&mut self, budget: f64) {
        self.remaining = if budget > 0.0 { budget } else { 0.0 };
        self.exhausted = false;
        self.loops.clear();
    }

    #[inline]
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    #[inline]
    pub fn subject(&self) -> ObjectId {
        self.subject
    }

    /// Whether a whole statement step can be paid for.
    #[inline]
    pub fn can_step(&self) -> bool {
        self.remaining >= STEP_COST
    }

    /// Budget check that opens every costed step.
    ///
    /// Returns `false` and marks the call exhausted when the step cannot be
    /// paid for; nothing else changes.
    #[inline]
    pub fn begin_step(&mut self) -> bool {
        if self.can_step() {
            true
        } else {
            self.exhausted = true;
            false
        }
    }

    /// Pay for a step whose check passed and whose evaluation succeeded.
    #[inline]
    pub fn consume_step(&mut self) {
        self.remaining -= STEP_COST;
        if let Some(ref mut c) = self.counters {
            c.count_step();
        }
    }

    /// Whether any time is left for a `wait` countdown.
    #[inline]
    pub fn has_time(&self) -> bool {
        self.remaining > 0.0
    }

    /// Spend up to `amount` time units; returns what was actually spent.
    pub fn spend_time(&mut self, amount: f64) -> f64 {
        let spent = amount.min(self.remaining).max(0.0);
        self.remaining -= spent;
        spent
    }

    #[inline]
    pub fn mark_exhausted(&mut self) {
        self.exhausted = true;
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    #[inline]
    pub fn halt(&mut self) {
        self.halted = true;
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    // Loop stack

    #[inline]
    pub fn push_loop(&mut self, id: StmtId) {
        self.loops.push(id);
    }

    #[inline]
    pub fn pop_loop(&mut self) {
        self.loops.pop();
    }

    /// The loop a `break` executed now would terminate.
    #[inline]
    pub fn innermost_loop(&self) -> Option<StmtId> {
        self.loops.last().copied()
    }

    #[inline]
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Copy of the random generator's state, to rewind to if a step faults.
    pub fn rng_checkpoint(&self) -> StdRng {
        self.rng.clone()
    }

    pub fn rewind_rng(&mut self, checkpoint: StdRng) {
        self.rng = checkpoint;
    }

    // Counters

    /// Enable execution counters.
    pub fn enable_counters(&mut self) {
        self.counters = Some(ExecCounters::default());
    }

    /// Counters for reporting (`None` when profiling is off).
    pub fn counters(&self) -> Option<&ExecCounters> {
        self.counters.as_ref()
    }

    #[inline]
    pub fn count_tick(&mut self) {
        if let Some(ref mut c) = self.counters {
            c.count_tick();
        }
    }

    #[inline]
    pub fn count_suspension(&mut self) {
        if let Some(ref mut c) = self.counters {
            c.count_suspension();
        }
    }

    #[inline]
    pub fn count_transient_fault(&mut self) {
        if let Some(ref mut c) = self.counters {
            c.count_transient_fault();
        }
    }

    #[inline]
    pub fn count_line(&mut self) {
        if let Some(ref mut c) = self.counters {
            c.count_line();
        }
    }
}
