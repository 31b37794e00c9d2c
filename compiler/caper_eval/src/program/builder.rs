//! `ProgramBuilder` for creating programs with non-default settings.

use std::sync::Arc;

use caper_ir::{IrError, ObjectId, ProgramIr};

use super::Program;
use crate::context::ExecContext;
use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Seed used for `random` when none is configured.
pub const DEFAULT_SEED: u64 = 0x00ca_fe00;

/// Builder for `Program`.
pub struct ProgramBuilder {
    ir: Arc<ProgramIr>,
    subject: ObjectId,
    print_handler: Option<SharedPrintHandler>,
    seed: u64,
    counters: bool,
}

impl ProgramBuilder {
    pub fn new(ir: impl Into<Arc<ProgramIr>>, subject: ObjectId) -> Self {
        Self {
            ir: ir.into(),
            subject,
            print_handler: None,
            seed: DEFAULT_SEED,
            counters: false,
        }
    }

    /// Set where `print` output goes. Default is stdout.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Seed the generator behind `random`.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable execution counters (the driver's `--profile`).
    #[must_use]
    pub fn with_counters(mut self) -> Self {
        self.counters = true;
        self
    }

    /// Validate the tree and build the program.
    pub fn build(self) -> Result<Program, IrError> {
        let mut ctx = ExecContext::new(self.subject, self.seed);
        if self.counters {
            ctx.enable_counters();
        }
        let output = self.print_handler.unwrap_or_else(stdout_handler);
        Program::from_parts(self.ir, ctx, output)
    }
}
