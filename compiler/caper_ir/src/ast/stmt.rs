//! Statement kinds.

use crate::{ExprId, Name, Selector, StmtId, StmtRange};

/// Command issued to the subject actor.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Action {
    /// Start horizontal movement; the operand evaluates to a direction.
    StartMove(ExprId),
    StopMove,
    StartJump,
    StopJump,
    StartDuck,
    StopDuck,
}

/// Sort direction of a `for each` candidate list.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Numeric sort key of a `for each` loop.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SortKey {
    pub expr: ExprId,
    pub order: SortOrder,
}

/// Statement kinds.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    Sequence(StmtRange),
    Assign {
        target: Name,
        value: ExprId,
    },
    If {
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    While {
        cond: ExprId,
        body: StmtId,
    },
    ForEach {
        var: Name,
        selector: Selector,
        filter: Option<ExprId>,
        sort: Option<SortKey>,
        body: StmtId,
    },
    Wait {
        duration: ExprId,
    },
    Break,
    Print(ExprId),
    Skip,
    Action(Action),
}

impl StmtKind {
    /// Whether `break` inside this statement's body targets it.
    #[inline]
    pub const fn is_loop(&self) -> bool {
        matches!(self, Self::While { .. } | Self::ForEach { .. })
    }

    /// Short lowercase label used in logs.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Sequence(_) => "sequence",
            Self::Assign { .. } => "assign",
            Self::If { .. } => "if",
            Self::While { .. } => "while",
            Self::ForEach { .. } => "for_each",
            Self::Wait { .. } => "wait",
            Self::Break => "break",
            Self::Print(_) => "print",
            Self::Skip => "skip",
            Self::Action(_) => "action",
        }
    }
}
