//! Structural validation of a program tree.
//!
//! Runs once when a program is constructed. It guarantees that the evaluator
//! can index the arenas without bounds failures, that the statement graph is
//! a tree (each node has one owner, children are allocated before their
//! parents), and that every `break` has an enclosing loop.
//!
//! Value types are deliberately not checked here: an assignment whose value
//! disagrees with the declared type halts the program at run time.

use rustc_hash::FxHashSet;

use crate::{Action, ExprId, ExprKind, ProgramIr, StmtId, StmtKind};

/// A program tree that cannot be executed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IrError {
    #[error("program has no root statement")]
    MissingRoot,
    #[error("statement {0:?} does not exist")]
    StmtOutOfRange(StmtId),
    #[error("expression {0:?} does not exist")]
    ExprOutOfRange(ExprId),
    #[error("sequence body of {0:?} points outside the statement list table")]
    ListOutOfRange(StmtId),
    #[error("{child:?} is referenced by {parent:?} but was allocated after it")]
    StmtForwardReference { parent: StmtId, child: StmtId },
    #[error("{child:?} is referenced by {parent:?} but was allocated after it")]
    ExprForwardReference { parent: ExprId, child: ExprId },
    #[error("statement {0:?} has more than one parent")]
    SharedStatement(StmtId),
    #[error("`break` at {0:?} is not inside a loop")]
    BreakOutsideLoop(StmtId),
    #[error("global `{0}` is declared more than once")]
    DuplicateGlobal(String),
}

/// Validate a whole program.
pub fn validate(ir: &ProgramIr) -> Result<StmtId, IrError> {
    let root = ir.root().ok_or(IrError::MissingRoot)?;

    let mut seen_globals = FxHashSet::default();
    for (name, _) in ir.globals() {
        if !seen_globals.insert(*name) {
            return Err(IrError::DuplicateGlobal(ir.name_str(*name).to_string()));
        }
    }

    for index in 0..ir.exprs().len() {
        check_expr(ir, ExprId::new(index as u32))?;
    }

    check_stmt_tree(ir, root)?;
    Ok(root)
}

/// Check one expression's children exist and precede it.
fn check_expr(ir: &ProgramIr, id: ExprId) -> Result<(), IrError> {
    let child_check = |child: ExprId| {
        if !ir.exprs().contains(child) {
            Err(IrError::ExprOutOfRange(child))
        } else if child.index() >= id.index() {
            Err(IrError::ExprForwardReference { parent: id, child })
        } else {
            Ok(())
        }
    };

    match ir.get_expr(id) {
        ExprKind::Number(_)
        | ExprKind::Boolean(_)
        | ExprKind::Direction(_)
        | ExprKind::Null
        | ExprKind::Var(_)
        | ExprKind::SelfRef => Ok(()),
        ExprKind::Binary { left, right, .. } => {
            child_check(*left)?;
            child_check(*right)
        }
        ExprKind::TileAt { x, y } => {
            child_check(*x)?;
            child_check(*y)
        }
        ExprKind::Unary { operand: e, .. }
        | ExprKind::Random { max: e }
        | ExprKind::Object { object: e, .. }
        | ExprKind::IsKind { object: e, .. }
        | ExprKind::TileCoord { tile: e, .. }
        | ExprKind::TileIs { tile: e, .. }
        | ExprKind::Nearest { direction: e, .. } => child_check(*e),
    }
}

fn expr_in_range(ir: &ProgramIr, id: ExprId) -> Result<(), IrError> {
    if ir.exprs().contains(id) {
        Ok(())
    } else {
        Err(IrError::ExprOutOfRange(id))
    }
}

/// Walk the statement tree from the root.
fn check_stmt_tree(ir: &ProgramIr, root: StmtId) -> Result<(), IrError> {
    if !ir.stmts().contains(root) {
        return Err(IrError::StmtOutOfRange(root));
    }

    let mut visited = FxHashSet::default();
    // (statement, inside a loop body)
    let mut work = vec![(root, false)];

    while let Some((id, in_loop)) = work.pop() {
        if !visited.insert(id) {
            return Err(IrError::SharedStatement(id));
        }

        let kind = ir.get_stmt(id);
        match kind {
            StmtKind::Sequence(range) => {
                if !ir.stmts().list_in_bounds(*range) {
                    return Err(IrError::ListOutOfRange(id));
                }
            }
            StmtKind::Assign { value: e, .. }
            | StmtKind::Wait { duration: e }
            | StmtKind::Print(e)
            | StmtKind::Action(Action::StartMove(e)) => expr_in_range(ir, *e)?,
            StmtKind::If { cond, .. } | StmtKind::While { cond, .. } => expr_in_range(ir, *cond)?,
            StmtKind::ForEach { filter, sort, .. } => {
                if let Some(filter) = filter {
                    expr_in_range(ir, *filter)?;
                }
                if let Some(sort) = sort {
                    expr_in_range(ir, sort.expr)?;
                }
            }
            StmtKind::Break => {
                if !in_loop {
                    return Err(IrError::BreakOutsideLoop(id));
                }
            }
            StmtKind::Skip | StmtKind::Action(_) => {}
        }

        let child_in_loop = in_loop || kind.is_loop();
        for child in ir.stmts().children(id) {
            if !ir.stmts().contains(child) {
                return Err(IrError::StmtOutOfRange(child));
            }
            if child.index() >= id.index() {
                return Err(IrError::StmtForwardReference { parent: id, child });
            }
            work.push((child, child_in_loop));
        }
    }

    Ok(())
}
