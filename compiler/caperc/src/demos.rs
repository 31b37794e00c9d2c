//! Bundled demo programs.
//!
//! Each demo builds a program tree together with the sandbox world it runs
//! in and the actor it controls.

use caper_eval::{ActorState, SandboxWorld};
use caper_ir::{
    Action, ActorKind, BinaryOp, Direction, ExprKind, ObjectId, ObjectQuery, ProgramIr, Selector,
    SortKey, SortOrder, StmtKind, TileClass, TileRef, ValueType,
};

/// A program, its world and the actor it drives.
pub struct Scene {
    pub ir: ProgramIr,
    pub world: SandboxWorld,
    pub subject: ObjectId,
}

/// A named, runnable demo.
pub struct Demo {
    pub name: &'static str,
    pub summary: &'static str,
    scene: fn() -> Scene,
}

impl Demo {
    /// Build a fresh scene for this demo.
    pub fn scene(&self) -> Scene {
        (self.scene)()
    }
}

pub const DEMOS: &[Demo] = &[
    Demo {
        name: "patrol",
        summary: "walk right and back three times, printing the turning points",
        scene: patrol,
    },
    Demo {
        name: "census",
        summary: "list living enemies from right to left, then count them",
        scene: census,
    },
    Demo {
        name: "tiles",
        summary: "print every solid tile in row-major order",
        scene: tiles,
    },
    Demo {
        name: "dice",
        summary: "roll five dice, one per time unit (depends on --seed)",
        scene: dice,
    },
    Demo {
        name: "broken",
        summary: "store a boolean in a number variable and halt",
        scene: broken,
    },
];

pub fn find(name: &str) -> Option<&'static Demo> {
    DEMOS.iter().find(|demo| demo.name == name)
}

/// ```text
/// while laps < 3 {
///     start_move(right); wait 2; stop_move; print x(self)
///     start_move(left);  wait 2; stop_move; print x(self)
///     laps := laps + 1
/// }
/// ```
fn patrol() -> Scene {
    let mut world = SandboxWorld::new(16, 8);
    let subject = world.spawn(ActorKind::Player, 4.0, 6.0);

    let mut ir = ProgramIr::new();
    ir.declare("laps", ValueType::Number);
    let me = ir.expr(ExprKind::SelfRef);
    let x = ir.query(ObjectQuery::X, me);
    let two = ir.number(2.0);

    let mut legs = Vec::new();
    for direction in [Direction::Right, Direction::Left] {
        let dir = ir.direction(direction);
        legs.push(ir.action(Action::StartMove(dir)));
        legs.push(ir.stmt(StmtKind::Wait { duration: two }));
        legs.push(ir.action(Action::StopMove));
        legs.push(ir.print(x));
    }
    let laps = ir.var("laps");
    let one = ir.number(1.0);
    let next = ir.binary(BinaryOp::Add, laps, one);
    legs.push(ir.assign("laps", next));

    let body = ir.sequence(legs);
    let three = ir.number(3.0);
    let cond = ir.binary(BinaryOp::Lt, laps, three);
    let root = ir.stmt(StmtKind::While { cond, body });
    ir.set_root(root);

    Scene {
        ir,
        world,
        subject,
    }
}

/// ```text
/// for each e in enemies where is_alive(e) sort by x(e) descending {
///     print x(e); count := count + 1
/// }
/// print count
/// ```
fn census() -> Scene {
    let mut world = SandboxWorld::new(32, 4);
    let subject = world.spawn(ActorKind::Player, 0.0, 2.0);
    for x in [12.0, 3.0, 27.0, 8.0] {
        world.spawn(ActorKind::Enemy, x, 2.0);
    }
    world.spawn_state(ActorState {
        alive: false,
        ..ActorState::new(ActorKind::Enemy, 20.0, 2.0)
    });
    world.spawn(ActorKind::Plant, 5.0, 2.0);

    let mut ir = ProgramIr::new();
    ir.declare("e", ValueType::Object);
    ir.declare("count", ValueType::Number);
    let e = ir.var("e");
    let alive = ir.query(ObjectQuery::IsAlive, e);
    let ex = ir.query(ObjectQuery::X, e);
    let count = ir.var("count");
    let one = ir.number(1.0);
    let next = ir.binary(BinaryOp::Add, count, one);

    let print_x = ir.print(ex);
    let bump = ir.assign("count", next);
    let body = ir.sequence([print_x, bump]);
    let var = ir.intern("e");
    let survey = ir.stmt(StmtKind::ForEach {
        var,
        selector: Selector::Kind(ActorKind::Enemy),
        filter: Some(alive),
        sort: Some(SortKey {
            expr: ex,
            order: SortOrder::Descending,
        }),
        body,
    });
    let total = ir.print(count);
    let root = ir.sequence([survey, total]);
    ir.set_root(root);

    Scene {
        ir,
        world,
        subject,
    }
}

/// ```text
/// for each t in tiles where tile_is(t, solid) { print t }
/// ```
fn tiles() -> Scene {
    let mut world = SandboxWorld::new(6, 3);
    let subject = world.spawn(ActorKind::Player, 0.0, 0.0);
    for x in 0..6 {
        world.set_tile(TileRef::new(x, 2), TileClass::Solid);
    }
    world.set_tile(TileRef::new(4, 1), TileClass::Solid);
    world.set_tile(TileRef::new(1, 1), TileClass::Ladder);

    let mut ir = ProgramIr::new();
    ir.declare("t", ValueType::Tile);
    let t = ir.var("t");
    let solid = ir.expr(ExprKind::TileIs {
        tile: t,
        class: TileClass::Solid,
    });
    let body = ir.print(t);
    let var = ir.intern("t");
    let root = ir.stmt(StmtKind::ForEach {
        var,
        selector: Selector::Tiles,
        filter: Some(solid),
        sort: None,
        body,
    });
    ir.set_root(root);

    Scene {
        ir,
        world,
        subject,
    }
}

/// ```text
/// while rolls < 5 { print random(6); wait 1; rolls := rolls + 1 }
/// ```
fn dice() -> Scene {
    let mut world = SandboxWorld::new(1, 1);
    let subject = world.spawn(ActorKind::Player, 0.0, 0.0);

    let mut ir = ProgramIr::new();
    ir.declare("rolls", ValueType::Number);
    let six = ir.number(6.0);
    let roll = ir.expr(ExprKind::Random { max: six });
    let print = ir.print(roll);
    let one = ir.number(1.0);
    let wait = ir.stmt(StmtKind::Wait { duration: one });
    let rolls = ir.var("rolls");
    let next = ir.binary(BinaryOp::Add, rolls, one);
    let bump = ir.assign("rolls", next);
    let body = ir.sequence([print, wait, bump]);
    let five = ir.number(5.0);
    let cond = ir.binary(BinaryOp::Lt, rolls, five);
    let root = ir.stmt(StmtKind::While { cond, body });
    ir.set_root(root);

    Scene {
        ir,
        world,
        subject,
    }
}

/// ```text
/// print 1; n := true; print 2
/// ```
fn broken() -> Scene {
    let mut world = SandboxWorld::new(1, 1);
    let subject = world.spawn(ActorKind::Player, 0.0, 0.0);

    let mut ir = ProgramIr::new();
    ir.declare("n", ValueType::Number);
    let one = ir.number(1.0);
    let two = ir.number(2.0);
    let yes = ir.boolean(true);
    let before = ir.print(one);
    let bad = ir.assign("n", yes);
    let after = ir.print(two);
    let root = ir.sequence([before, bad, after]);
    ir.set_root(root);

    Scene {
        ir,
        world,
        subject,
    }
}
