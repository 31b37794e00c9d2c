//! The `run` command: drive a demo scene tick by tick.

use tracing::info;

use caper_eval::{EvalError, ExecCounters, Program, SharedPrintHandler};
use caper_ir::IrError;

use crate::config::RunConfig;
use crate::demos::Scene;

/// Simulated time that passes in the world between two ticks.
pub const TICK_TIME: f64 = 1.0;

/// How a run ended.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub ticks: u32,
    pub finished: bool,
    /// The fault that halted the program, if any.
    pub fault: Option<EvalError>,
    pub counters: Option<ExecCounters>,
}

/// Run `scene` until its program finishes, halts, or `config.ticks` ticks
/// have passed.
pub fn run_scene(
    scene: Scene,
    config: &RunConfig,
    output: SharedPrintHandler,
) -> Result<RunSummary, IrError> {
    let Scene {
        ir,
        mut world,
        subject,
    } = scene;

    let mut builder = Program::builder(ir, subject)
        .print_handler(output)
        .seed(config.seed);
    if config.profile {
        builder = builder.with_counters();
    }
    let mut program = builder.build()?;

    let mut ticks = 0;
    while ticks < config.ticks && !program.is_finished() && !program.is_halted() {
        program.advance(&mut world, config.budget);
        world.step(TICK_TIME);
        ticks += 1;
    }

    let finished = program.is_finished();
    info!(demo = %config.demo, ticks, finished, "run ended");
    Ok(RunSummary {
        ticks,
        finished,
        fault: program.fault().cloned(),
        counters: program.counters().cloned(),
    })
}
