//! In-memory world for tests, demos and tooling.
//!
//! Holds actors in handle order and a rectangular tile grid, records every
//! command it receives, and applies a small set of capability rules so that
//! kind-specific commands can be observed being ignored.

use std::collections::BTreeMap;

use caper_ir::{ActorKind, Direction, ObjectId, TileClass, TileRef};

use crate::world::{ActorCommand, ActorState, CommandOutcome, World};

/// Horizontal distance a moving actor covers per unit of time in `step`.
const WALK_SPEED: f64 = 1.0;

/// A minimal world model.
#[derive(Clone, Debug)]
pub struct SandboxWorld {
    actors: BTreeMap<ObjectId, ActorState>,
    next_id: u32,
    width: i32,
    height: i32,
    /// Row-major tile classes.
    tiles: Vec<TileClass>,
    commands: Vec<(ObjectId, ActorCommand)>,
}

impl SandboxWorld {
    /// Create an empty world with a `width` by `height` grid of empty tiles.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let cells = usize::try_from(width.saturating_mul(height)).unwrap_or(0);
        Self {
            actors: BTreeMap::new(),
            next_id: 1,
            width,
            height,
            tiles: vec![TileClass::Empty; cells],
            commands: Vec::new(),
        }
    }

    /// Add a default actor of `kind` at `(x, y)`.
    pub fn spawn(&mut self, kind: ActorKind, x: f64, y: f64) -> ObjectId {
        self.spawn_state(ActorState::new(kind, x, y))
    }

    /// Add an actor with a fully specified state.
    pub fn spawn_state(&mut self, state: ActorState) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.actors.insert(id, state);
        id
    }

    /// Remove an actor. Its handle stays invalid forever.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        self.actors.remove(&id).is_some()
    }

    pub fn actor_mut(&mut self, id: ObjectId) -> Option<&mut ActorState> {
        self.actors.get_mut(&id)
    }

    /// Set a tile's class. Returns `false` outside the grid.
    pub fn set_tile(&mut self, tile: TileRef, class: TileClass) -> bool {
        match self.cell_index(tile) {
            Some(idx) => {
                self.tiles[idx] = class;
                true
            }
            None => false,
        }
    }

    /// Every command received so far, in order.
    pub fn command_log(&self) -> &[(ObjectId, ActorCommand)] {
        &self.commands
    }

    /// Advance actor motion by `dt` time units.
    ///
    /// Only horizontal walking is modelled; jumping and ducking are state
    /// flags without kinematics.
    pub fn step(&mut self, dt: f64) {
        for state in self.actors.values_mut() {
            if !state.moving {
                continue;
            }
            match state.facing {
                Direction::Left => state.x -= WALK_SPEED * dt,
                Direction::Right => state.x += WALK_SPEED * dt,
                Direction::Up | Direction::Down => {}
            }
        }
    }

    fn cell_index(&self, tile: TileRef) -> Option<usize> {
        if tile.x < 0 || tile.y < 0 || tile.x >= self.width || tile.y >= self.height {
            return None;
        }
        usize::try_from(tile.y * self.width + tile.x).ok()
    }

    fn supports(kind: ActorKind, command: ActorCommand) -> bool {
        match command {
            ActorCommand::StartMove(direction) => {
                direction.is_horizontal() && !matches!(kind, ActorKind::Plant | ActorKind::Pickup)
            }
            ActorCommand::StopMove => !matches!(kind, ActorKind::Plant | ActorKind::Pickup),
            ActorCommand::StartJump | ActorCommand::StopJump => {
                !matches!(kind, ActorKind::Hazard | ActorKind::Plant)
            }
            ActorCommand::StartDuck | ActorCommand::StopDuck => kind == ActorKind::Player,
        }
    }
}

impl World for SandboxWorld {
    fn actor(&self, id: ObjectId) -> Option<ActorState> {
        self.actors.get(&id).copied()
    }

    fn actors(&self, kind: Option<ActorKind>) -> Vec<ObjectId> {
        self.actors
            .iter()
            .filter(|(_, state)| kind.map_or(true, |k| state.kind == k))
            .map(|(id, _)| *id)
            .collect()
    }

    fn tiles(&self) -> Vec<TileRef> {
        let mut out = Vec::with_capacity(self.tiles.len());
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(TileRef::new(x, y));
            }
        }
        out
    }

    fn tile_class(&self, tile: TileRef) -> Option<TileClass> {
        self.cell_index(tile).map(|idx| self.tiles[idx])
    }

    fn command(&mut self, subject: ObjectId, command: ActorCommand) -> CommandOutcome {
        self.commands.push((subject, command));
        let Some(state) = self.actors.get_mut(&subject) else {
            return CommandOutcome::Missing;
        };
        if !Self::supports(state.kind, command) {
            return CommandOutcome::Unsupported;
        }
        match command {
            ActorCommand::StartMove(direction) => {
                state.moving = true;
                state.facing = direction;
            }
            ActorCommand::StopMove => state.moving = false,
            ActorCommand::StartJump => {
                state.jumping = true;
                state.on_ground = false;
            }
            ActorCommand::StopJump => {
                state.jumping = false;
                state.on_ground = true;
            }
            ActorCommand::StartDuck => state.ducking = true,
            ActorCommand::StopDuck => state.ducking = false,
        }
        CommandOutcome::Applied
    }
}
