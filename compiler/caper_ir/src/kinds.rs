//! World vocabulary shared between programs and the world model.

use std::fmt;

/// Category of an actor in the world.
///
/// `Player` is the singleton kind; the others may have any number of
/// instances.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ActorKind {
    Player,
    Enemy,
    Hazard,
    Plant,
    Pickup,
}

impl ActorKind {
    /// Whether at most one actor of this kind exists at a time.
    pub const fn is_singleton(self) -> bool {
        matches!(self, Self::Player)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Enemy => "enemy",
            Self::Hazard => "hazard",
            Self::Plant => "plant",
            Self::Pickup => "pickup",
        }
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candidate source for a `for each` loop.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Selector {
    /// Every actor currently in the world.
    AnyActor,
    /// Every actor of one kind.
    Kind(ActorKind),
    /// Every terrain tile, in row-major order.
    Tiles,
}

impl Selector {
    /// Whether candidates are tiles rather than actors.
    #[inline]
    pub const fn yields_tiles(self) -> bool {
        matches!(self, Self::Tiles)
    }
}

/// Terrain classification of a single tile.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TileClass {
    Empty,
    Solid,
    Platform,
    Hazard,
    Ladder,
}

impl TileClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Solid => "solid",
            Self::Platform => "platform",
            Self::Hazard => "hazard",
            Self::Ladder => "ladder",
        }
    }
}

/// Coordinate axis of a tile reference.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Axis {
    X,
    Y,
}
