//! Resumption state of a suspended program.
//!
//! The program tree is immutable; everything that records how far execution
//! got lives here, one entry per statement id. At the start of any tick the
//! armed entries describe a single path from the root to the statement that
//! will run next.

use caper_ir::{StmtArena, StmtId, StmtKind, Value};

/// Whether a loop is about to start an iteration or is inside one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The next visit checks the condition or binds the next element.
    Fresh,
    /// The body has been armed; the next visit resumes it.
    Continuing,
}

/// Materialized iteration state of a `for each` loop.
#[derive(Clone, Debug, PartialEq)]
pub struct ForEachFrame {
    /// Candidates after filtering and sorting, fixed until the loop ends.
    pub candidates: Vec<Value>,
    /// Position of the element being (or about to be) visited.
    pub index: usize,
    pub phase: Phase,
}

/// Per-statement progress record.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    /// Nothing evaluated yet.
    Fresh,
    /// `if` has evaluated its condition; `None` means no branch applies.
    Branch(Option<StmtId>),
    While(Phase),
    ForEach(ForEachFrame),
    /// Time still owed by a `wait`.
    Wait { remaining: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeState {
    /// The statement still has work to complete.
    pub armed: bool,
    pub frame: Frame,
}

impl NodeState {
    const IDLE: NodeState = NodeState {
        armed: false,
        frame: Frame::Fresh,
    };
}

/// Side-table of `NodeState`s indexed by statement id.
#[derive(Clone, Debug)]
pub struct ContinuationTable {
    nodes: Vec<NodeState>,
}

impl ContinuationTable {
    /// A table for `len` statements, all idle.
    pub fn new(len: usize) -> Self {
        Self {
            nodes: vec![NodeState::IDLE; len],
        }
    }

    #[inline]
    pub fn is_armed(&self, id: StmtId) -> bool {
        self.nodes.get(id.index()).is_some_and(|n| n.armed)
    }

    #[inline]
    pub fn frame(&self, id: StmtId) -> &Frame {
        self.nodes
            .get(id.index())
            .map_or(&Frame::Fresh, |n| &n.frame)
    }

    /// Mutable frame of a statement. Ids come from a validated tree.
    #[inline]
    pub fn frame_mut(&mut self, id: StmtId) -> &mut Frame {
        &mut self.nodes[id.index()].frame
    }

    #[inline]
    pub fn set_frame(&mut self, id: StmtId, frame: Frame) {
        *self.frame_mut(id) = frame;
    }

    /// Make `id` ready to run from its start.
    ///
    /// The subtree is reset first. Sequences arm their children right away;
    /// every other compound statement arms its children when it chooses to
    /// run them.
    pub fn arm(&mut self, stmts: &StmtArena, id: StmtId) {
        self.disarm(stmts, id);
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            self.nodes[id.index()].armed = true;
            if let StmtKind::Sequence(range) = stmts.get(id) {
                pending.extend_from_slice(stmts.list(*range));
            }
        }
    }

    /// Mark `id` and everything under it complete and reset their frames.
    pub fn disarm(&mut self, stmts: &StmtArena, id: StmtId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            self.nodes[id.index()] = NodeState::IDLE;
            pending.extend(stmts.children(id));
        }
    }

    /// Mark a leaf statement complete.
    #[inline]
    pub fn finish(&mut self, id: StmtId) {
        self.nodes[id.index()] = NodeState::IDLE;
    }

    /// Statements that still have work to complete, in id order.
    pub fn armed(&self) -> impl Iterator<Item = StmtId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.armed)
            .map(|(i, _)| StmtId::new(i as u32))
    }
}
