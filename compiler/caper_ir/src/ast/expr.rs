//! Expression kinds.

use crate::{ActorKind, Axis, BinaryOp, Direction, ExprId, Name, TileClass, UnaryOp};

/// Property read from an actor.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ObjectQuery {
    // Numbers
    X,
    Y,
    Width,
    Height,
    HitPoints,

    // Booleans
    IsAlive,
    IsMoving,
    IsJumping,
    IsDucking,
    IsOnGround,

    // Direction
    Facing,
}

impl ObjectQuery {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Width => "width",
            Self::Height => "height",
            Self::HitPoints => "hit_points",
            Self::IsAlive => "is_alive",
            Self::IsMoving => "is_moving",
            Self::IsJumping => "is_jumping",
            Self::IsDucking => "is_ducking",
            Self::IsOnGround => "is_on_ground",
            Self::Facing => "facing",
        }
    }
}

/// Expression kinds.
#[derive(Clone, PartialEq, Debug)]
pub enum ExprKind {
    // Literals
    Number(f64),
    Boolean(bool),
    Direction(Direction),
    /// The null object reference.
    Null,

    /// Global variable read.
    Var(Name),
    /// The actor the program controls.
    SelfRef,

    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    /// Pseudo-random number in `[0, max)`.
    Random {
        max: ExprId,
    },

    // World queries
    Object {
        query: ObjectQuery,
        object: ExprId,
    },
    IsKind {
        object: ExprId,
        kind: ActorKind,
    },
    /// Tile containing the point `(x, y)`, coordinates floored.
    TileAt {
        x: ExprId,
        y: ExprId,
    },
    TileCoord {
        tile: ExprId,
        axis: Axis,
    },
    TileIs {
        tile: ExprId,
        class: TileClass,
    },
    /// Closest actor to the subject lying in `direction`, optionally
    /// restricted to one kind. Null when there is none.
    Nearest {
        direction: ExprId,
        kind: Option<ActorKind>,
    },
}
