use super::*;
use crate::errors::EvalErrorKind;
use crate::sandbox::SandboxWorld;
use caper_ir::{BinaryOp, TileClass};
use pretty_assertions::assert_eq;
use rand::SeedableRng;

struct Fixture {
    ir: ProgramIr,
    world: SandboxWorld,
    subject: ObjectId,
    rng: StdRng,
}

impl Fixture {
    fn new() -> Self {
        let mut world = SandboxWorld::new(4, 3);
        let subject = world.spawn(ActorKind::Player, 10.0, 5.0);
        let mut ir = ProgramIr::new();
        ir.declare("x", ValueType::Number);
        ir.declare("who", ValueType::Object);
        Fixture {
            ir,
            world,
            subject,
            rng: StdRng::seed_from_u64(1),
        }
    }

    fn eval_with(&mut self, id: ExprId, overlay: Option<(Name, Value)>) -> EvalResult {
        let globals = GlobalTable::new(self.ir.globals());
        let mut evaluator = ExprEvaluator {
            ir: &self.ir,
            globals: &globals,
            world: &self.world,
            subject: self.subject,
            rng: &mut self.rng,
            overlay,
        };
        evaluator.eval(id)
    }

    fn eval(&mut self, id: ExprId) -> EvalResult {
        self.eval_with(id, None)
    }
}

fn fault(result: EvalResult) -> EvalErrorKind {
    match result {
        Err(e) => e.kind,
        Ok(v) => panic!("expected a fault, got {v}"),
    }
}

#[test]
fn literals_and_variables() {
    let mut f = Fixture::new();
    let n = f.ir.number(2.5);
    let d = f.ir.direction(Direction::Up);
    let x = f.ir.var("x");
    let null = f.ir.expr(ExprKind::Null);
    assert_eq!(f.eval(n), Ok(Value::Number(2.5)));
    assert_eq!(f.eval(d), Ok(Value::Direction(Direction::Up)));
    assert_eq!(f.eval(x), Ok(Value::Number(0.0)));
    assert_eq!(f.eval(null), Ok(Value::NULL));
}

#[test]
fn undefined_variable_is_transient() {
    let mut f = Fixture::new();
    let y = f.ir.var("y");
    let err = f.eval(y).err();
    assert_eq!(
        err.as_ref().map(|e| e.kind.clone()),
        Some(EvalErrorKind::UndefinedVariable {
            name: "y".to_string()
        })
    );
    assert!(err.is_some_and(|e| !e.is_fatal()));
}

#[test]
fn overlay_shadows_globals() {
    let mut f = Fixture::new();
    let x_name = f.ir.intern("x");
    let x = f.ir.var("x");
    assert_eq!(
        f.eval_with(x, Some((x_name, Value::Number(9.0)))),
        Ok(Value::Number(9.0))
    );
}

#[test]
fn nested_arithmetic() {
    let mut f = Fixture::new();
    let two = f.ir.number(2.0);
    let three = f.ir.number(3.0);
    let four = f.ir.number(4.0);
    let sum = f.ir.binary(BinaryOp::Add, two, three);
    let product = f.ir.binary(BinaryOp::Mul, sum, four);
    assert_eq!(f.eval(product), Ok(Value::Number(20.0)));
}

#[test]
fn self_queries_read_the_world() {
    let mut f = Fixture::new();
    let me = f.ir.expr(ExprKind::SelfRef);
    let x = f.ir.query(ObjectQuery::X, me);
    let alive = f.ir.query(ObjectQuery::IsAlive, me);
    let player = f.ir.expr(ExprKind::IsKind {
        object: me,
        kind: ActorKind::Player,
    });
    assert_eq!(f.eval(x), Ok(Value::Number(10.0)));
    assert_eq!(f.eval(alive), Ok(Value::Boolean(true)));
    assert_eq!(f.eval(player), Ok(Value::Boolean(true)));
}

#[test]
fn null_query_faults() {
    let mut f = Fixture::new();
    let null = f.ir.expr(ExprKind::Null);
    let x = f.ir.query(ObjectQuery::X, null);
    let kind = f.ir.expr(ExprKind::IsKind {
        object: null,
        kind: ActorKind::Enemy,
    });
    assert_eq!(fault(f.eval(x)), EvalErrorKind::NullReference { query: "x" });
    assert_eq!(
        fault(f.eval(kind)),
        EvalErrorKind::NullReference { query: "is_kind" }
    );
}

#[test]
fn removed_actor_is_not_alive() {
    let mut f = Fixture::new();
    let gone = f.world.spawn(ActorKind::Enemy, 0.0, 0.0);
    f.world.remove(gone);
    let who = f.ir.intern("who");
    let var = f.ir.var("who");
    let alive = f.ir.query(ObjectQuery::IsAlive, var);
    let y = f.ir.query(ObjectQuery::Y, var);
    let overlay = Some((who, Value::object(gone)));
    assert_eq!(f.eval_with(alive, overlay), Ok(Value::Boolean(false)));
    assert_eq!(
        fault(f.eval_with(y, overlay)),
        EvalErrorKind::MissingObject { object: gone }
    );
}

#[test]
fn tile_at_floors_coordinates() {
    let mut f = Fixture::new();
    let x = f.ir.number(2.7);
    let y = f.ir.number(-0.5);
    let tile = f.ir.expr(ExprKind::TileAt { x, y });
    let tx = f.ir.expr(ExprKind::TileCoord {
        tile,
        axis: Axis::X,
    });
    let ty = f.ir.expr(ExprKind::TileCoord {
        tile,
        axis: Axis::Y,
    });
    assert_eq!(f.eval(tile), Ok(Value::Tile(TileRef::new(2, -1))));
    assert_eq!(f.eval(tx), Ok(Value::Number(2.0)));
    assert_eq!(f.eval(ty), Ok(Value::Number(-1.0)));
}

#[test]
fn tile_at_rejects_non_finite() {
    let mut f = Fixture::new();
    let x = f.ir.number(f64::NAN);
    let y = f.ir.number(0.0);
    let tile = f.ir.expr(ExprKind::TileAt { x, y });
    assert!(matches!(
        fault(f.eval(tile)),
        EvalErrorKind::InvalidArgument {
            operation: "tile_at",
            ..
        }
    ));
}

#[test]
fn tile_at_rejects_coordinates_beyond_i32() {
    let mut f = Fixture::new();
    let huge = f.ir.number(1e12);
    let tiny = f.ir.number(-1e12);
    let zero = f.ir.number(0.0);
    let wide = f.ir.expr(ExprKind::TileAt { x: huge, y: zero });
    let deep = f.ir.expr(ExprKind::TileAt { x: zero, y: tiny });
    assert_eq!(
        fault(f.eval(wide)),
        EvalErrorKind::InvalidArgument {
            operation: "tile_at",
            value: 1e12
        }
    );
    assert_eq!(
        fault(f.eval(deep)),
        EvalErrorKind::InvalidArgument {
            operation: "tile_at",
            value: -1e12
        }
    );
}

#[test]
fn tile_at_accepts_the_i32_extremes() {
    let mut f = Fixture::new();
    let low = f.ir.number(f64::from(i32::MIN) + 0.5);
    let high = f.ir.number(f64::from(i32::MAX) + 0.5);
    let tile = f.ir.expr(ExprKind::TileAt { x: low, y: high });
    assert_eq!(
        f.eval(tile),
        Ok(Value::Tile(TileRef::new(i32::MIN, i32::MAX)))
    );
}

#[test]
fn tile_is_checks_class() {
    let mut f = Fixture::new();
    f.world.set_tile(TileRef::new(1, 2), TileClass::Ladder);
    let x = f.ir.number(1.0);
    let y = f.ir.number(2.0);
    let tile = f.ir.expr(ExprKind::TileAt { x, y });
    let ladder = f.ir.expr(ExprKind::TileIs {
        tile,
        class: TileClass::Ladder,
    });
    let far = f.ir.number(50.0);
    let outside = f.ir.expr(ExprKind::TileAt { x: far, y });
    let outside_ladder = f.ir.expr(ExprKind::TileIs {
        tile: outside,
        class: TileClass::Ladder,
    });
    assert_eq!(f.eval(ladder), Ok(Value::Boolean(true)));
    assert_eq!(f.eval(outside_ladder), Ok(Value::Boolean(false)));
}

#[test]
fn nearest_returns_object_or_null() {
    let mut f = Fixture::new();
    let enemy = f.world.spawn(ActorKind::Enemy, 14.0, 5.0);
    let right = f.ir.direction(Direction::Right);
    let left = f.ir.direction(Direction::Left);
    let near_right = f.ir.expr(ExprKind::Nearest {
        direction: right,
        kind: Some(ActorKind::Enemy),
    });
    let near_left = f.ir.expr(ExprKind::Nearest {
        direction: left,
        kind: None,
    });
    assert_eq!(f.eval(near_right), Ok(Value::object(enemy)));
    assert_eq!(f.eval(near_left), Ok(Value::NULL));
}

#[test]
fn nearest_without_subject_faults() {
    let mut f = Fixture::new();
    let subject = f.subject;
    f.world.remove(subject);
    let right = f.ir.direction(Direction::Right);
    let nearest = f.ir.expr(ExprKind::Nearest {
        direction: right,
        kind: None,
    });
    assert_eq!(
        fault(f.eval(nearest)),
        EvalErrorKind::MissingObject { object: subject }
    );
}

#[test]
fn random_stays_in_range() {
    let mut f = Fixture::new();
    let max = f.ir.number(3.0);
    let random = f.ir.expr(ExprKind::Random { max });
    for _ in 0..50 {
        let n = f.eval(random).ok().and_then(|v| v.as_number());
        assert!(n.is_some_and(|n| (0.0..3.0).contains(&n)), "{n:?}");
    }
}

#[test]
fn random_rejects_non_positive_bound() {
    let mut f = Fixture::new();
    let zero = f.ir.number(0.0);
    let random = f.ir.expr(ExprKind::Random { max: zero });
    assert_eq!(
        fault(f.eval(random)),
        EvalErrorKind::InvalidArgument {
            operation: "random",
            value: 0.0
        }
    );
}

#[test]
fn query_on_number_is_type_mismatch() {
    let mut f = Fixture::new();
    let n = f.ir.number(1.0);
    let x = f.ir.query(ObjectQuery::X, n);
    assert_eq!(
        fault(f.eval(x)),
        EvalErrorKind::TypeMismatch {
            context: "x",
            expected: ValueType::Object,
            got: ValueType::Number,
        }
    );
}

#[test]
fn deep_expression_does_not_overflow() {
    let mut f = Fixture::new();
    let mut acc = f.ir.number(0.0);
    for _ in 0..20_000 {
        let one = f.ir.number(1.0);
        acc = f.ir.binary(BinaryOp::Add, acc, one);
    }
    assert_eq!(f.eval(acc), Ok(Value::Number(20_000.0)));
}
