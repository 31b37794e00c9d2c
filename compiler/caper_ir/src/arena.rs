//! Flat arenas for program nodes, and the program tree that owns them.

use std::sync::Arc;

use crate::{
    Action, BinaryOp, Direction, ExprId, ExprKind, Name, ObjectQuery, StmtId, StmtKind,
    StmtRange, StringInterner, UnaryOp, ValueType,
};

/// Contiguous storage for expression nodes.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    exprs: Vec<ExprKind>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression, returning its ID.
    pub fn alloc(&mut self, kind: ExprKind) -> ExprId {
        let id = ExprId::new(self.exprs.len() as u32);
        self.exprs.push(kind);
        id
    }

    /// Get an expression by ID.
    ///
    /// IDs are checked by `validate` before a program runs.
    #[inline]
    pub fn get(&self, id: ExprId) -> &ExprKind {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn contains(&self, id: ExprId) -> bool {
        id.index() < self.exprs.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}

/// Contiguous storage for statement nodes and sequence bodies.
#[derive(Clone, Debug, Default)]
pub struct StmtArena {
    stmts: Vec<StmtKind>,
    /// Flattened children of every `Sequence`.
    stmt_lists: Vec<StmtId>,
}

impl StmtArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a statement, returning its ID.
    pub fn alloc(&mut self, kind: StmtKind) -> StmtId {
        let id = StmtId::new(self.stmts.len() as u32);
        self.stmts.push(kind);
        id
    }

    /// Store a list of statements, returning its range.
    pub fn alloc_list(&mut self, ids: impl IntoIterator<Item = StmtId>) -> StmtRange {
        let start = self.stmt_lists.len();
        self.stmt_lists.extend(ids);
        let len = self.stmt_lists.len() - start;
        StmtRange::new(start as u32, len as u32)
    }

    #[inline]
    pub fn get(&self, id: StmtId) -> &StmtKind {
        &self.stmts[id.index()]
    }

    /// Children of a sequence range.
    #[inline]
    pub fn list(&self, range: StmtRange) -> &[StmtId] {
        &self.stmt_lists[range.bounds()]
    }

    #[inline]
    pub fn contains(&self, id: StmtId) -> bool {
        id.index() < self.stmts.len()
    }

    #[inline]
    pub fn list_in_bounds(&self, range: StmtRange) -> bool {
        range.bounds().end <= self.stmt_lists.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    /// Direct children of a statement, in execution order.
    pub fn children(&self, id: StmtId) -> Vec<StmtId> {
        match self.get(id) {
            StmtKind::Sequence(range) => self.list(*range).to_vec(),
            StmtKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                let mut out = vec![*then_branch];
                out.extend(*else_branch);
                out
            }
            StmtKind::While { body, .. } | StmtKind::ForEach { body, .. } => vec![*body],
            StmtKind::Assign { .. }
            | StmtKind::Wait { .. }
            | StmtKind::Break
            | StmtKind::Print(_)
            | StmtKind::Skip
            | StmtKind::Action(_) => Vec::new(),
        }
    }
}

/// A complete program tree: names, node arenas, root and global declarations.
///
/// Built once by a loader (or a test) and then handed to the evaluator,
/// which never mutates it.
#[derive(Debug, Default)]
pub struct ProgramIr {
    interner: StringInterner,
    exprs: ExprArena,
    stmts: StmtArena,
    globals: Vec<(Name, ValueType)>,
    root: Option<StmtId>,
}

impl ProgramIr {
    pub fn new() -> Self {
        Self::default()
    }

    // Construction

    /// Intern a name without declaring it.
    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Declare a global variable.
    ///
    /// Duplicate declarations are kept and rejected by validation.
    pub fn declare(&mut self, name: &str, ty: ValueType) -> Name {
        let name = self.interner.intern(name);
        self.globals.push((name, ty));
        name
    }

    pub fn expr(&mut self, kind: ExprKind) -> ExprId {
        self.exprs.alloc(kind)
    }

    pub fn stmt(&mut self, kind: StmtKind) -> StmtId {
        self.stmts.alloc(kind)
    }

    /// Allocate a `Sequence` over the given statements.
    pub fn sequence(&mut self, body: impl IntoIterator<Item = StmtId>) -> StmtId {
        let range = self.stmts.alloc_list(body);
        self.stmts.alloc(StmtKind::Sequence(range))
    }

    pub fn set_root(&mut self, root: StmtId) {
        self.root = Some(root);
    }

    // Expression shorthands

    pub fn number(&mut self, n: f64) -> ExprId {
        self.expr(ExprKind::Number(n))
    }

    pub fn boolean(&mut self, b: bool) -> ExprId {
        self.expr(ExprKind::Boolean(b))
    }

    pub fn direction(&mut self, d: Direction) -> ExprId {
        self.expr(ExprKind::Direction(d))
    }

    pub fn var(&mut self, name: &str) -> ExprId {
        let name = self.intern(name);
        self.expr(ExprKind::Var(name))
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.expr(ExprKind::Binary { op, left, right })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.expr(ExprKind::Unary { op, operand })
    }

    pub fn query(&mut self, query: ObjectQuery, object: ExprId) -> ExprId {
        self.expr(ExprKind::Object { query, object })
    }

    // Statement shorthands

    pub fn assign(&mut self, target: &str, value: ExprId) -> StmtId {
        let target = self.intern(target);
        self.stmt(StmtKind::Assign { target, value })
    }

    pub fn print(&mut self, value: ExprId) -> StmtId {
        self.stmt(StmtKind::Print(value))
    }

    pub fn action(&mut self, action: Action) -> StmtId {
        self.stmt(StmtKind::Action(action))
    }

    // Access

    #[inline]
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    #[inline]
    pub fn exprs(&self) -> &ExprArena {
        &self.exprs
    }

    #[inline]
    pub fn stmts(&self) -> &StmtArena {
        &self.stmts
    }

    #[inline]
    pub fn get_expr(&self, id: ExprId) -> &ExprKind {
        self.exprs.get(id)
    }

    #[inline]
    pub fn get_stmt(&self, id: StmtId) -> &StmtKind {
        self.stmts.get(id)
    }

    #[inline]
    pub fn globals(&self) -> &[(Name, ValueType)] {
        &self.globals
    }

    #[inline]
    pub fn root(&self) -> Option<StmtId> {
        self.root
    }

    /// Resolve a name for messages.
    #[inline]
    pub fn name_str(&self, name: Name) -> Arc<str> {
        self.interner.lookup(name)
    }
}
