//! Interface to the world model a program's actor lives in.
//!
//! The interpreter never owns actors or terrain. It reads actor snapshots,
//! enumerates candidates for `for each`, and issues movement commands, all
//! through this trait. Every method must tolerate handles to actors that
//! have since been removed.

use caper_ir::{ActorKind, Direction, ObjectId, TileClass, TileRef};

/// Snapshot of one actor's observable state.
///
/// Coordinates are screen coordinates: `y` grows downward, so `Up` means
/// decreasing `y`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ActorState {
    pub kind: ActorKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub hit_points: f64,
    pub alive: bool,
    pub moving: bool,
    pub jumping: bool,
    pub ducking: bool,
    pub on_ground: bool,
    pub facing: Direction,
}

impl ActorState {
    /// A one-tile, one-hit-point actor standing still at `(x, y)`.
    pub fn new(kind: ActorKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            x,
            y,
            width: 1.0,
            height: 1.0,
            hit_points: 1.0,
            alive: true,
            moving: false,
            jumping: false,
            ducking: false,
            on_ground: true,
            facing: Direction::Right,
        }
    }
}

/// Command a program can issue to its actor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActorCommand {
    StartMove(Direction),
    StopMove,
    StartJump,
    StopJump,
    StartDuck,
    StopDuck,
}

/// How the world handled a command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    /// The actor's kind cannot perform this command.
    Unsupported,
    /// The actor is no longer in the world.
    Missing,
}

/// Query and command surface of the world model.
pub trait World {
    /// Snapshot of an actor, or `None` if it has been removed.
    fn actor(&self, id: ObjectId) -> Option<ActorState>;

    /// Handles of every actor, or of every actor of one kind, in the
    /// world's stable enumeration order.
    fn actors(&self, kind: Option<ActorKind>) -> Vec<ObjectId>;

    /// Every terrain tile.
    fn tiles(&self) -> Vec<TileRef>;

    /// Classification of a tile, or `None` outside the map.
    fn tile_class(&self, tile: TileRef) -> Option<TileClass>;

    /// Apply a command to an actor.
    fn command(&mut self, subject: ObjectId, command: ActorCommand) -> CommandOutcome;

    /// Closest actor to `from` that lies strictly in `direction`.
    ///
    /// Distance is Euclidean between positions; ties keep the earlier actor
    /// in enumeration order. Worlds with a spatial index should override this.
    fn nearest(
        &self,
        from: ObjectId,
        direction: Direction,
        kind: Option<ActorKind>,
    ) -> Option<ObjectId> {
        let origin = self.actor(from)?;
        let mut best: Option<(f64, ObjectId)> = None;
        for id in self.actors(kind) {
            if id == from {
                continue;
            }
            let Some(other) = self.actor(id) else {
                continue;
            };
            let dx = other.x - origin.x;
            let dy = other.y - origin.y;
            let ahead = match direction {
                Direction::Left => dx < 0.0,
                Direction::Right => dx > 0.0,
                Direction::Up => dy < 0.0,
                Direction::Down => dy > 0.0,
            };
            if !ahead {
                continue;
            }
            let distance = dx.hypot(dy);
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, id));
            }
        }
        best.map(|(_, id)| id)
    }
}
