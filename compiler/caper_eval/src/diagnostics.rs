//! Execution counters for profiling.
//!
//! Stored as `Option<ExecCounters>` on the execution context. When `None`,
//! all counter increments are no-ops.

use std::fmt;

/// Per-program execution counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecCounters {
    /// `advance` calls that did any work.
    pub ticks: u64,
    /// Budget steps consumed by statements.
    pub steps: u64,
    /// Ticks that ended with the program suspended.
    pub suspensions: u64,
    /// Transient faults that deferred a statement to a later tick.
    pub transient_faults: u64,
    /// Lines written by `print`.
    pub lines_printed: u64,
}

impl ExecCounters {
    #[inline]
    pub fn count_tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    #[inline]
    pub fn count_step(&mut self) {
        self.steps = self.steps.wrapping_add(1);
    }

    #[inline]
    pub fn count_suspension(&mut self) {
        self.suspensions = self.suspensions.wrapping_add(1);
    }

    #[inline]
    pub fn count_transient_fault(&mut self) {
        self.transient_faults = self.transient_faults.wrapping_add(1);
    }

    #[inline]
    pub fn count_line(&mut self) {
        self.lines_printed = self.lines_printed.wrapping_add(1);
    }
}

impl fmt::Display for ExecCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ticks:            {}", self.ticks)?;
        writeln!(f, "steps:            {}", self.steps)?;
        writeln!(f, "suspensions:      {}", self.suspensions)?;
        writeln!(f, "transient faults: {}", self.transient_faults)?;
        write!(f, "lines printed:    {}", self.lines_printed)
    }
}
