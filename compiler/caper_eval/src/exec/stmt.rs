//! Statement execution.
//!
//! A depth-first walk over armed statements. Each statement reports how far
//! it got through `Flow`; sequences stop at the first child that did not
//! complete, and loops interpret their body's flow per iteration. All
//! progress that must survive a suspension is written to the continuation
//! table before returning.

use caper_ir::{
    Action, ExprId, Name, ProgramIr, Selector, SortKey, StmtId, StmtKind, StmtRange, Value,
};
use tracing::debug;

use crate::context::ExecContext;
use crate::errors::{
    assign_type_mismatch, break_outside_loop, invalid_argument, undeclared_target, EvalError,
    EvalResult,
};
use crate::globals::{AssignError, GlobalTable};
use crate::print_handler::PrintHandlerImpl;
use crate::world::{ActorCommand, CommandOutcome, World};

use super::continuation::{ContinuationTable, ForEachFrame, Frame, Phase};
use super::expr::{expect_boolean, expect_direction, expect_number, ExprEvaluator};

/// How far a statement got during this call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    /// The statement finished and is disarmed.
    Completed,
    /// Budget ran out; the statement stays armed and resumes next tick.
    Suspended,
    /// A `break` targeting the given loop is unwinding.
    Break(StmtId),
}

/// Borrowed view of a program's state for one `advance` call.
pub struct Executor<'a> {
    pub ir: &'a ProgramIr,
    pub globals: &'a mut GlobalTable,
    pub states: &'a mut ContinuationTable,
    pub ctx: &'a mut ExecContext,
    pub world: &'a mut dyn World,
    pub output: &'a PrintHandlerImpl,
}

impl Executor<'_> {
    /// Evaluate an expression against the current state.
    pub(super) fn eval(&mut self, id: ExprId, overlay: Option<(Name, Value)>) -> EvalResult {
        let subject = self.ctx.subject();
        let mut evaluator = ExprEvaluator {
            ir: self.ir,
            globals: &*self.globals,
            world: &*self.world,
            subject,
            rng: self.ctx.rng_mut(),
            overlay,
        };
        evaluator.eval(id)
    }

    /// Evaluate the operands of one step.
    ///
    /// On a fault the random generator is rewound, so the retry next tick
    /// draws the same numbers.
    fn evaluate_step<T>(
        &mut self,
        eval: impl FnOnce(&mut Self) -> Result<T, EvalError>,
    ) -> Result<T, EvalError> {
        let checkpoint = self.ctx.rng_checkpoint();
        let result = eval(self);
        if result.is_err() {
            self.ctx.rewind_rng(checkpoint);
        }
        result
    }

    /// Run a statement until it completes, suspends, breaks or faults.
    ///
    /// Statements that are not armed have nothing left to do and complete
    /// immediately.
    pub fn exec(&mut self, id: StmtId) -> Result<Flow, EvalError> {
        if !self.states.is_armed(id) {
            return Ok(Flow::Completed);
        }
        let ir = self.ir;
        match *ir.get_stmt(id) {
            StmtKind::Sequence(range) => self.exec_sequence(id, range),
            StmtKind::Assign { target, value } => self.exec_assign(id, target, value),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.exec_if(id, cond, then_branch, else_branch),
            StmtKind::While { cond, body } => self.exec_while(id, cond, body),
            StmtKind::ForEach {
                var,
                selector,
                filter,
                sort,
                body,
            } => self.exec_for_each(id, var, selector, filter, sort, body),
            StmtKind::Wait { duration } => self.exec_wait(id, duration),
            StmtKind::Break => self.exec_break(id),
            StmtKind::Print(value) => self.exec_print(id, value),
            StmtKind::Skip => {
                self.states.finish(id);
                Ok(Flow::Completed)
            }
            StmtKind::Action(action) => self.exec_action(id, action),
        }
    }

    fn exec_sequence(&mut self, id: StmtId, range: StmtRange) -> Result<Flow, EvalError> {
        let ir = self.ir;
        for &child in ir.stmts().list(range) {
            match self.exec(child)? {
                Flow::Completed => {}
                flow => return Ok(flow),
            }
        }
        self.states.finish(id);
        Ok(Flow::Completed)
    }

    fn exec_assign(&mut self, id: StmtId, target: Name, value: ExprId) -> Result<Flow, EvalError> {
        if !self.ctx.begin_step() {
            return Ok(Flow::Suspended);
        }
        let value = self.evaluate_step(|this| this.eval(value, None))?;
        self.write_global(target, value)?;
        self.ctx.consume_step();
        self.states.finish(id);
        Ok(Flow::Completed)
    }

    /// Type-checked write into the global table. Refusals are fatal.
    pub(super) fn write_global(&mut self, target: Name, value: Value) -> Result<(), EvalError> {
        self.globals.assign(target, value).map_err(|e| {
            let name = self.ir.name_str(target);
            match e {
                AssignError::Undeclared => undeclared_target(&name),
                AssignError::TypeMismatch { declared } => {
                    assign_type_mismatch(&name, declared, &value)
                }
            }
        })
    }

    fn exec_if(
        &mut self,
        id: StmtId,
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    ) -> Result<Flow, EvalError> {
        let chosen = match self.states.frame(id) {
            Frame::Branch(branch) => Some(*branch),
            _ => None,
        };
        let branch = match chosen {
            Some(branch) => branch,
            None => {
                if !self.ctx.begin_step() {
                    return Ok(Flow::Suspended);
                }
                let taken = self.evaluate_step(|this| {
                    expect_boolean(this.eval(cond, None)?, "if condition")
                })?;
                self.ctx.consume_step();
                let branch = if taken { Some(then_branch) } else { else_branch };
                if let Some(branch) = branch {
                    self.states.arm(self.ir.stmts(), branch);
                }
                self.states.set_frame(id, Frame::Branch(branch));
                branch
            }
        };

        if let Some(branch) = branch {
            let flow = self.exec(branch)?;
            if flow != Flow::Completed {
                return Ok(flow);
            }
        }
        self.states.finish(id);
        Ok(Flow::Completed)
    }

    fn exec_while(&mut self, id: StmtId, cond: ExprId, body: StmtId) -> Result<Flow, EvalError> {
        loop {
            let phase = match *self.states.frame(id) {
                Frame::While(phase) => phase,
                _ => Phase::Fresh,
            };
            match phase {
                Phase::Fresh => {
                    if !self.ctx.begin_step() {
                        return Ok(Flow::Suspended);
                    }
                    let proceed = self.evaluate_step(|this| {
                        expect_boolean(this.eval(cond, None)?, "while condition")
                    })?;
                    self.ctx.consume_step();
                    if !proceed {
                        self.states.disarm(self.ir.stmts(), id);
                        return Ok(Flow::Completed);
                    }
                    self.states.arm(self.ir.stmts(), body);
                    self.states.set_frame(id, Frame::While(Phase::Continuing));
                }
                Phase::Continuing => match self.exec_loop_body(id, body)? {
                    Flow::Completed => self.states.set_frame(id, Frame::While(Phase::Fresh)),
                    Flow::Break(target) if target == id => return Ok(Flow::Completed),
                    flow => return Ok(flow),
                },
            }
        }
    }

    fn exec_for_each(
        &mut self,
        id: StmtId,
        var: Name,
        selector: Selector,
        filter: Option<ExprId>,
        sort: Option<SortKey>,
        body: StmtId,
    ) -> Result<Flow, EvalError> {
        if !matches!(self.states.frame(id), Frame::ForEach(_)) {
            if !self.ctx.begin_step() {
                return Ok(Flow::Suspended);
            }
            let candidates =
                self.evaluate_step(|this| this.materialize(var, selector, filter, sort))?;
            self.ctx.consume_step();
            debug!(
                loop_var = %self.ir.name_str(var),
                candidates = candidates.len(),
                "for each materialized"
            );
            self.states.set_frame(
                id,
                Frame::ForEach(ForEachFrame {
                    candidates,
                    index: 0,
                    phase: Phase::Fresh,
                }),
            );
        }

        loop {
            let Frame::ForEach(frame) = self.states.frame(id) else {
                return Ok(Flow::Completed);
            };
            let Some(&candidate) = frame.candidates.get(frame.index) else {
                self.states.disarm(self.ir.stmts(), id);
                return Ok(Flow::Completed);
            };
            let phase = frame.phase;
            match phase {
                Phase::Fresh => {
                    if !self.ctx.begin_step() {
                        return Ok(Flow::Suspended);
                    }
                    self.write_global(var, candidate)?;
                    self.ctx.consume_step();
                    self.states.arm(self.ir.stmts(), body);
                    if let Frame::ForEach(frame) = self.states.frame_mut(id) {
                        frame.phase = Phase::Continuing;
                    }
                }
                Phase::Continuing => match self.exec_loop_body(id, body)? {
                    Flow::Completed => {
                        if let Frame::ForEach(frame) = self.states.frame_mut(id) {
                            frame.index += 1;
                            frame.phase = Phase::Fresh;
                        }
                    }
                    Flow::Break(target) if target == id => return Ok(Flow::Completed),
                    flow => return Ok(flow),
                },
            }
        }
    }

    /// Run one iteration's body with `id` as the innermost loop.
    ///
    /// A `break` aimed at this loop disarms it before being passed back.
    fn exec_loop_body(&mut self, id: StmtId, body: StmtId) -> Result<Flow, EvalError> {
        self.ctx.push_loop(id);
        let flow = self.exec(body);
        self.ctx.pop_loop();
        let flow = flow?;
        if flow == Flow::Break(id) {
            self.states.disarm(self.ir.stmts(), id);
        }
        Ok(flow)
    }

    fn exec_wait(&mut self, id: StmtId, duration: ExprId) -> Result<Flow, EvalError> {
        let pending = match self.states.frame(id) {
            Frame::Wait { remaining } => Some(*remaining),
            _ => None,
        };
        let owed = match pending {
            Some(owed) => owed,
            None => {
                if !self.ctx.has_time() {
                    self.ctx.mark_exhausted();
                    return Ok(Flow::Suspended);
                }
                let duration = self.evaluate_step(|this| {
                    let timer = expect_number(this.eval(duration, None)?, "wait")?;
                    if timer.is_finite() {
                        Ok(timer)
                    } else {
                        Err(invalid_argument("wait", timer))
                    }
                })?;
                duration.max(0.0)
            }
        };

        let left = owed - self.ctx.spend_time(owed);
        if left <= 0.0 {
            self.states.finish(id);
            return Ok(Flow::Completed);
        }
        self.states.set_frame(id, Frame::Wait { remaining: left });
        self.ctx.mark_exhausted();
        Ok(Flow::Suspended)
    }

    fn exec_break(&mut self, id: StmtId) -> Result<Flow, EvalError> {
        if !self.ctx.begin_step() {
            return Ok(Flow::Suspended);
        }
        let target = self.ctx.innermost_loop().ok_or_else(break_outside_loop)?;
        self.ctx.consume_step();
        self.states.finish(id);
        Ok(Flow::Break(target))
    }

    fn exec_print(&mut self, id: StmtId, value: ExprId) -> Result<Flow, EvalError> {
        if !self.ctx.begin_step() {
            return Ok(Flow::Suspended);
        }
        let value = self.evaluate_step(|this| this.eval(value, None))?;
        self.ctx.consume_step();
        self.output.println(&value.to_string());
        self.ctx.count_line();
        self.states.finish(id);
        Ok(Flow::Completed)
    }

    fn exec_action(&mut self, id: StmtId, action: Action) -> Result<Flow, EvalError> {
        if !self.ctx.begin_step() {
            return Ok(Flow::Suspended);
        }
        let command = match action {
            Action::StartMove(direction) => ActorCommand::StartMove(self.evaluate_step(|this| {
                expect_direction(this.eval(direction, None)?, "start_move")
            })?),
            Action::StopMove => ActorCommand::StopMove,
            Action::StartJump => ActorCommand::StartJump,
            Action::StopJump => ActorCommand::StopJump,
            Action::StartDuck => ActorCommand::StartDuck,
            Action::StopDuck => ActorCommand::StopDuck,
        };
        self.ctx.consume_step();
        let subject = self.ctx.subject();
        match self.world.command(subject, command) {
            CommandOutcome::Applied => {}
            outcome => debug!(%subject, ?command, ?outcome, "command ignored"),
        }
        self.states.finish(id);
        Ok(Flow::Completed)
    }
}
