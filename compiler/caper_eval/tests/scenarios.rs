//! End-to-end behaviour of programs driven tick by tick against a sandbox
//! world.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::sync::Arc;

use caper_eval::{
    buffer_handler, EvalErrorKind, Program, SandboxWorld, SharedPrintHandler, World,
};
use caper_ir::{
    Action, ActorKind, BinaryOp, Direction, ExprKind, ObjectId, ObjectQuery, ProgramIr, Selector,
    SortKey, SortOrder, StmtKind, TileClass, TileRef, Value, ValueType,
};
use pretty_assertions::assert_eq;

fn start(ir: ProgramIr, subject: ObjectId) -> (Program, SharedPrintHandler) {
    let output = buffer_handler();
    let program = Program::builder(ir, subject)
        .print_handler(Arc::clone(&output))
        .build()
        .expect("program tree should validate");
    (program, output)
}

/// Advance until the program finishes or halts; returns the ticks used.
fn run_to_end(program: &mut Program, world: &mut SandboxWorld, budget: f64) -> usize {
    for tick in 1..=10_000 {
        program.advance(world, budget);
        if program.is_finished() || program.is_halted() {
            return tick;
        }
    }
    panic!("program did not finish");
}

#[test]
fn assignment_then_print() {
    let mut world = SandboxWorld::new(1, 1);
    let me = world.spawn(ActorKind::Player, 0.0, 0.0);
    let mut ir = ProgramIr::new();
    ir.declare("x", ValueType::Number);
    let five = ir.number(5.0);
    let assign = ir.assign("x", five);
    let x = ir.var("x");
    let print = ir.print(x);
    let root = ir.sequence([assign, print]);
    ir.set_root(root);
    let (mut program, output) = start(ir, me);

    program.advance(&mut world, 2.0);

    assert!(program.is_finished());
    assert_eq!(program.global_by_str("x"), Some(Value::Number(5.0)));
    assert_eq!(output.lines(), vec!["5"]);
}

#[test]
fn counting_loop_at_one_step_per_tick() {
    let mut world = SandboxWorld::new(1, 1);
    let me = world.spawn(ActorKind::Player, 0.0, 0.0);
    let mut ir = ProgramIr::new();
    ir.declare("x", ValueType::Number);
    let x = ir.var("x");
    let three = ir.number(3.0);
    let one = ir.number(1.0);
    let cond = ir.binary(BinaryOp::Lt, x, three);
    let inc = ir.binary(BinaryOp::Add, x, one);
    let body = ir.assign("x", inc);
    let root = ir.stmt(StmtKind::While { cond, body });
    ir.set_root(root);
    let (mut program, _) = start(ir, me);

    // Three (condition, body) pairs, then the final false condition.
    let mut history = Vec::new();
    for _ in 0..7 {
        program.advance(&mut world, 1.0);
        history.push(program.global_by_str("x").and_then(|v| v.as_number()));
    }
    let expected: Vec<_> = [0.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0]
        .into_iter()
        .map(Some)
        .collect();
    assert_eq!(history, expected);
    assert!(program.is_finished());
}

#[test]
fn for_each_filters_and_sorts_ascending() {
    let mut world = SandboxWorld::new(1, 1);
    let a = world.spawn(ActorKind::Enemy, 30.0, 0.0);
    world.spawn(ActorKind::Enemy, 10.0, 0.0);
    world.spawn(ActorKind::Plant, 20.0, 0.0);
    let dead = world.spawn(ActorKind::Enemy, 15.0, 0.0);
    world.actor_mut(dead).unwrap().alive = false;

    let mut ir = ProgramIr::new();
    ir.declare("a", ValueType::Object);
    let var = ir.var("a");
    let filter = ir.query(ObjectQuery::IsAlive, var);
    let key = ir.query(ObjectQuery::X, var);
    let body = ir.print(key);
    let root = ir.stmt(StmtKind::ForEach {
        var: ir.intern("a"),
        selector: Selector::AnyActor,
        filter: Some(filter),
        sort: Some(SortKey {
            expr: key,
            order: SortOrder::Ascending,
        }),
        body,
    });
    ir.set_root(root);
    let (mut program, output) = start(ir, a);

    run_to_end(&mut program, &mut world, 1.0);

    assert_eq!(output.lines(), vec!["10", "20", "30"]);
}

#[test]
fn boolean_into_number_halts() {
    let mut world = SandboxWorld::new(1, 1);
    let me = world.spawn(ActorKind::Player, 0.0, 0.0);
    let mut ir = ProgramIr::new();
    ir.declare("n", ValueType::Number);
    let t = ir.boolean(true);
    let bad = ir.assign("n", t);
    let one = ir.number(1.0);
    let after = ir.print(one);
    let root = ir.sequence([bad, after]);
    ir.set_root(root);
    let (mut program, output) = start(ir, me);

    program.advance(&mut world, 5.0);
    assert!(program.is_halted());
    for _ in 0..3 {
        program.advance(&mut world, 5.0);
    }
    assert!(program.is_halted());
    assert!(output.lines().is_empty());
    assert!(program.fault().is_some_and(|f| f.is_fatal()));
}

#[test]
fn break_leaves_only_the_nearest_loop() {
    let mut world = SandboxWorld::new(1, 1);
    let me = world.spawn(ActorKind::Player, 0.0, 0.0);
    let mut ir = ProgramIr::new();
    ir.declare("i", ValueType::Number);
    let i = ir.var("i");
    let one = ir.number(1.0);
    let two = ir.number(2.0);
    let hundred = ir.number(100.0);
    let t = ir.boolean(true);

    // while i < 2 { i := i + 1; while true { print i; break }; print 100 }
    let print_i = ir.print(i);
    let brk = ir.stmt(StmtKind::Break);
    let inner_body = ir.sequence([print_i, brk]);
    let inner = ir.stmt(StmtKind::While {
        cond: t,
        body: inner_body,
    });
    let inc = ir.binary(BinaryOp::Add, i, one);
    let step = ir.assign("i", inc);
    let print_100 = ir.print(hundred);
    let outer_body = ir.sequence([step, inner, print_100]);
    let cond = ir.binary(BinaryOp::Lt, i, two);
    let root = ir.stmt(StmtKind::While {
        cond,
        body: outer_body,
    });
    ir.set_root(root);
    let (mut program, output) = start(ir, me);

    run_to_end(&mut program, &mut world, 1.0);

    assert_eq!(output.lines(), vec!["1", "100", "2", "100"]);
}

#[test]
fn break_inside_if_inside_for_each() {
    let mut world = SandboxWorld::new(1, 1);
    let me = world.spawn(ActorKind::Player, 0.0, 0.0);
    for x in [1.0, 2.0, 3.0, 4.0] {
        world.spawn(ActorKind::Enemy, x, 0.0);
    }
    let mut ir = ProgramIr::new();
    ir.declare("e", ValueType::Object);
    let e = ir.var("e");
    let ex = ir.query(ObjectQuery::X, e);
    let limit = ir.number(3.0);
    let stop = ir.binary(BinaryOp::GtEq, ex, limit);
    let brk = ir.stmt(StmtKind::Break);
    let guard = ir.stmt(StmtKind::If {
        cond: stop,
        then_branch: brk,
        else_branch: None,
    });
    let print = ir.print(ex);
    let body = ir.sequence([guard, print]);
    let root = ir.stmt(StmtKind::ForEach {
        var: ir.intern("e"),
        selector: Selector::Kind(ActorKind::Enemy),
        filter: None,
        sort: None,
        body,
    });
    ir.set_root(root);
    let (mut program, output) = start(ir, me);

    program.advance(&mut world, 100.0);

    assert!(program.is_finished());
    assert_eq!(output.lines(), vec!["1", "2"]);
}

#[test]
fn candidate_list_survives_world_changes() {
    let mut world = SandboxWorld::new(1, 1);
    let me = world.spawn(ActorKind::Player, 0.0, 0.0);
    let first = world.spawn(ActorKind::Enemy, 1.0, 0.0);
    let second = world.spawn(ActorKind::Enemy, 2.0, 0.0);
    let third = world.spawn(ActorKind::Enemy, 3.0, 0.0);

    let mut ir = ProgramIr::new();
    ir.declare("e", ValueType::Object);
    let e = ir.var("e");
    let body = ir.print(e);
    let root = ir.stmt(StmtKind::ForEach {
        var: ir.intern("e"),
        selector: Selector::Kind(ActorKind::Enemy),
        filter: None,
        sort: None,
        body,
    });
    ir.set_root(root);
    let (mut program, output) = start(ir, me);

    // Materialize and bind the first element, then disturb the world.
    program.advance(&mut world, 2.0);
    world.remove(second);
    world.spawn(ActorKind::Enemy, 0.5, 0.0);
    run_to_end(&mut program, &mut world, 1.0);

    let expected: Vec<String> = [first, second, third]
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(output.lines(), expected);
}

#[test]
fn equal_sort_keys_keep_collection_order() {
    let mut world = SandboxWorld::new(1, 1);
    let me = world.spawn(ActorKind::Player, 0.0, 0.0);
    let a = world.spawn(ActorKind::Enemy, 5.0, 1.0);
    let b = world.spawn(ActorKind::Enemy, 3.0, 2.0);
    let c = world.spawn(ActorKind::Enemy, 9.0, 1.0);
    let d = world.spawn(ActorKind::Enemy, 1.0, 2.0);

    for (order, expected) in [
        (SortOrder::Ascending, [a, c, b, d]),
        (SortOrder::Descending, [b, d, a, c]),
    ] {
        let mut ir = ProgramIr::new();
        ir.declare("e", ValueType::Object);
        let e = ir.var("e");
        let key = ir.query(ObjectQuery::Y, e);
        let body = ir.print(e);
        let root = ir.stmt(StmtKind::ForEach {
            var: ir.intern("e"),
            selector: Selector::Kind(ActorKind::Enemy),
            filter: None,
            sort: Some(SortKey { expr: key, order }),
            body,
        });
        ir.set_root(root);
        let (mut program, output) = start(ir, me);
        program.advance(&mut world, 100.0);
        let expected: Vec<String> = expected.iter().map(ToString::to_string).collect();
        assert_eq!(output.lines(), expected, "{order:?}");
    }
}

#[test]
fn tiles_iterate_row_major_with_filter() {
    let mut world = SandboxWorld::new(3, 2);
    let me = world.spawn(ActorKind::Player, 0.0, 0.0);
    world.set_tile(TileRef::new(2, 0), TileClass::Solid);
    world.set_tile(TileRef::new(0, 1), TileClass::Solid);
    world.set_tile(TileRef::new(1, 0), TileClass::Solid);

    let mut ir = ProgramIr::new();
    ir.declare("t", ValueType::Tile);
    let t = ir.var("t");
    let solid = ir.expr(ExprKind::TileIs {
        tile: t,
        class: TileClass::Solid,
    });
    let body = ir.print(t);
    let root = ir.stmt(StmtKind::ForEach {
        var: ir.intern("t"),
        selector: Selector::Tiles,
        filter: Some(solid),
        sort: None,
        body,
    });
    ir.set_root(root);
    let (mut program, output) = start(ir, me);
    program.advance(&mut world, 100.0);

    assert_eq!(
        output.lines(),
        vec!["tile(1, 0)", "tile(2, 0)", "tile(0, 1)"]
    );
    assert_eq!(
        program.global_by_str("t"),
        Some(Value::Tile(TileRef::new(0, 1)))
    );
}

#[test]
fn misdeclared_loop_variable_halts() {
    let mut world = SandboxWorld::new(2, 2);
    let me = world.spawn(ActorKind::Player, 0.0, 0.0);
    let mut ir = ProgramIr::new();
    ir.declare("t", ValueType::Object);
    let body = ir.stmt(StmtKind::Skip);
    let root = ir.stmt(StmtKind::ForEach {
        var: ir.intern("t"),
        selector: Selector::Tiles,
        filter: None,
        sort: None,
        body,
    });
    ir.set_root(root);
    let (mut program, _) = start(ir, me);
    program.advance(&mut world, 10.0);

    assert!(program.is_halted());
    assert_eq!(
        program.fault().map(|f| f.kind.clone()),
        Some(EvalErrorKind::LoopVariable {
            name: "t".to_string(),
            expected: ValueType::Tile,
            declared: Some(ValueType::Object),
        })
    );
}

/// `wait 1.5; print 1`
fn wait_then_print() -> ProgramIr {
    let mut ir = ProgramIr::new();
    let d = ir.number(1.5);
    let wait = ir.stmt(StmtKind::Wait { duration: d });
    let one = ir.number(1.0);
    let print = ir.print(one);
    let root = ir.sequence([wait, print]);
    ir.set_root(root);
    ir
}

#[test]
fn wait_overshoot_funds_later_siblings() {
    let mut world = SandboxWorld::new(1, 1);
    let me = world.spawn(ActorKind::Player, 0.0, 0.0);

    // Sliced: 1 + 0.5 time units, the remaining 0.5 is not a whole step.
    let (mut sliced, sliced_out) = start(wait_then_print(), me);
    let ticks = run_to_end(&mut sliced, &mut world, 1.0);
    assert_eq!(ticks, 3);
    assert_eq!(sliced_out.lines(), vec!["1"]);

    // One generous tick: the overshoot pays for the print.
    let (mut whole, output) = start(wait_then_print(), me);
    whole.advance(&mut world, 2.5);
    assert!(whole.is_finished());
    assert_eq!(output.lines(), vec!["1"]);
}

#[test]
fn transient_fault_retries_same_statement() {
    let mut world = SandboxWorld::new(1, 1);
    let me = world.spawn(ActorKind::Player, 0.0, 0.0);
    let mut ir = ProgramIr::new();
    let right = ir.direction(Direction::Right);
    let target = ir.expr(ExprKind::Nearest {
        direction: right,
        kind: Some(ActorKind::Pickup),
    });
    let x = ir.query(ObjectQuery::X, target);
    let print = ir.print(x);
    let root = ir.sequence([print]);
    ir.set_root(root);
    let (mut program, output) = start(ir, me);

    program.advance(&mut world, 5.0);
    program.advance(&mut world, 5.0);
    assert!(!program.is_halted());
    assert_eq!(
        program.last_transient_fault().map(|f| f.kind.clone()),
        Some(EvalErrorKind::NullReference { query: "x" })
    );
    assert!(output.lines().is_empty());

    world.spawn(ActorKind::Pickup, 7.0, 0.0);
    program.advance(&mut world, 5.0);
    assert!(program.is_finished());
    assert_eq!(output.lines(), vec!["7"]);
}

#[test]
fn actions_drive_the_subject() {
    let mut world = SandboxWorld::new(1, 1);
    let me = world.spawn(ActorKind::Player, 0.0, 0.0);
    let mut ir = ProgramIr::new();
    let left = ir.direction(Direction::Left);
    let go = ir.action(Action::StartMove(left));
    let duck = ir.action(Action::StartDuck);
    let jump = ir.action(Action::StartJump);
    let root = ir.sequence([go, duck, jump]);
    ir.set_root(root);
    let (mut program, _) = start(ir, me);

    program.advance(&mut world, 3.0);
    let state = world.actor(me).unwrap();
    assert!(state.moving && state.ducking && state.jumping);
    assert_eq!(state.facing, Direction::Left);
}

#[test]
fn removed_subject_makes_actions_no_ops() {
    let mut world = SandboxWorld::new(1, 1);
    let me = world.spawn(ActorKind::Enemy, 0.0, 0.0);
    let mut ir = ProgramIr::new();
    let jump = ir.action(Action::StartJump);
    let alive = ir.expr(ExprKind::SelfRef);
    let is_alive = ir.query(ObjectQuery::IsAlive, alive);
    let print = ir.print(is_alive);
    let root = ir.sequence([jump, print]);
    ir.set_root(root);
    let (mut program, output) = start(ir, me);

    world.remove(me);
    program.advance(&mut world, 2.0);
    assert!(program.is_finished());
    assert!(program.last_transient_fault().is_none());
    assert_eq!(output.lines(), vec!["false"]);
}
