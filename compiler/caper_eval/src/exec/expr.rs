//! Expression evaluation.
//!
//! Evaluation never writes program state: globals are read-only here, the
//! world is queried but never commanded, and only the random generator
//! advances. The statement executor rewinds the generator when a step
//! faults, so a retried statement draws the same numbers.

use rand::rngs::StdRng;
use rand::Rng;

use caper_ir::{
    ActorKind, Axis, Direction, ExprId, ExprKind, Name, ObjectId, ObjectQuery, ObjectRef,
    ProgramIr, TileRef, Value, ValueType,
};

use crate::errors::{
    invalid_argument, missing_object, null_reference, type_mismatch, undefined_variable,
    EvalError, EvalResult,
};
use crate::globals::GlobalTable;
use crate::stack::ensure_sufficient_stack;
use crate::world::World;

use super::operators::{evaluate_binary, evaluate_unary};

/// Reduces expression nodes to values.
pub struct ExprEvaluator<'a> {
    pub ir: &'a ProgramIr,
    pub globals: &'a GlobalTable,
    pub world: &'a dyn World,
    pub subject: ObjectId,
    pub rng: &'a mut StdRng,
    /// Binding that shadows the global table, used for a `for each`
    /// candidate while its filter and sort key are evaluated.
    pub overlay: Option<(Name, Value)>,
}

impl ExprEvaluator<'_> {
    /// Evaluate an expression.
    pub fn eval(&mut self, id: ExprId) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(id))
    }

    fn eval_inner(&mut self, id: ExprId) -> EvalResult {
        let ir = self.ir;
        match *ir.get_expr(id) {
            ExprKind::Number(n) => Ok(Value::Number(n)),
            ExprKind::Boolean(b) => Ok(Value::Boolean(b)),
            ExprKind::Direction(d) => Ok(Value::Direction(d)),
            ExprKind::Null => Ok(Value::NULL),
            ExprKind::Var(name) => self.lookup(name),
            ExprKind::SelfRef => Ok(Value::object(self.subject)),

            ExprKind::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                evaluate_binary(left, right, op)
            }
            ExprKind::Unary { op, operand } => {
                let value = self.eval(operand)?;
                evaluate_unary(value, op)
            }
            ExprKind::Random { max } => {
                let max = expect_number(self.eval(max)?, "random")?;
                if !(max.is_finite() && max > 0.0) {
                    return Err(invalid_argument("random", max));
                }
                Ok(Value::Number(self.rng.gen_range(0.0..max)))
            }

            ExprKind::Object { query, object } => {
                let object = expect_object(self.eval(object)?, query.as_str())?;
                self.query(query, object)
            }
            ExprKind::IsKind { object, kind } => {
                let object = expect_object(self.eval(object)?, "is_kind")?;
                self.is_kind(object, kind)
            }
            ExprKind::TileAt { x, y } => {
                let x = expect_number(self.eval(x)?, "tile_at")?;
                let y = expect_number(self.eval(y)?, "tile_at")?;
                Ok(Value::Tile(TileRef::new(
                    tile_coordinate(x)?,
                    tile_coordinate(y)?,
                )))
            }
            ExprKind::TileCoord { tile, axis } => {
                let tile = expect_tile(self.eval(tile)?, "tile coordinate")?;
                Ok(Value::Number(f64::from(match axis {
                    Axis::X => tile.x,
                    Axis::Y => tile.y,
                })))
            }
            ExprKind::TileIs { tile, class } => {
                let tile = expect_tile(self.eval(tile)?, "tile_is")?;
                Ok(Value::Boolean(self.world.tile_class(tile) == Some(class)))
            }
            ExprKind::Nearest { direction, kind } => {
                let direction = expect_direction(self.eval(direction)?, "nearest")?;
                self.nearest(direction, kind)
            }
        }
    }

    fn lookup(&self, name: Name) -> EvalResult {
        if let Some((bound, value)) = self.overlay {
            if bound == name {
                return Ok(value);
            }
        }
        self.globals
            .get(name)
            .ok_or_else(|| undefined_variable(&self.ir.name_str(name)))
    }

    fn query(&self, query: ObjectQuery, object: ObjectRef) -> EvalResult {
        let id = object.ok_or_else(|| null_reference(query.as_str()))?;
        let Some(state) = self.world.actor(id) else {
            // A vanished actor is simply no longer alive.
            return if query == ObjectQuery::IsAlive {
                Ok(Value::Boolean(false))
            } else {
                Err(missing_object(id))
            };
        };
        Ok(match query {
            ObjectQuery::X => Value::Number(state.x),
            ObjectQuery::Y => Value::Number(state.y),
            ObjectQuery::Width => Value::Number(state.width),
            ObjectQuery::Height => Value::Number(state.height),
            ObjectQuery::HitPoints => Value::Number(state.hit_points),
            ObjectQuery::IsAlive => Value::Boolean(state.alive),
            ObjectQuery::IsMoving => Value::Boolean(state.moving),
            ObjectQuery::IsJumping => Value::Boolean(state.jumping),
            ObjectQuery::IsDucking => Value::Boolean(state.ducking),
            ObjectQuery::IsOnGround => Value::Boolean(state.on_ground),
            ObjectQuery::Facing => Value::Direction(state.facing),
        })
    }

    fn is_kind(&self, object: ObjectRef, kind: ActorKind) -> EvalResult {
        let id = object.ok_or_else(|| null_reference("is_kind"))?;
        let state = self.world.actor(id).ok_or_else(|| missing_object(id))?;
        Ok(Value::Boolean(state.kind == kind))
    }

    fn nearest(&self, direction: Direction, kind: Option<ActorKind>) -> EvalResult {
        if self.world.actor(self.subject).is_none() {
            return Err(missing_object(self.subject));
        }
        Ok(Value::Object(self.world.nearest(
            self.subject,
            direction,
            kind,
        )))
    }
}

/// Floor a world coordinate to a tile index.
///
/// Coordinates whose floor does not fit an `i32` are rejected rather than
/// saturated.
fn tile_coordinate(v: f64) -> Result<i32, EvalError> {
    let floored = v.floor();
    if !floored.is_finite() || floored < f64::from(i32::MIN) || floored > f64::from(i32::MAX) {
        return Err(invalid_argument("tile_at", v));
    }
    Ok(floored as i32)
}

// Operand checks shared with the statement executor.

pub fn expect_number(value: Value, context: &'static str) -> Result<f64, EvalError> {
    value
        .as_number()
        .ok_or_else(|| type_mismatch(context, ValueType::Number, &value))
}

pub fn expect_boolean(value: Value, context: &'static str) -> Result<bool, EvalError> {
    value
        .as_boolean()
        .ok_or_else(|| type_mismatch(context, ValueType::Boolean, &value))
}

pub fn expect_direction(value: Value, context: &'static str) -> Result<Direction, EvalError> {
    value
        .as_direction()
        .ok_or_else(|| type_mismatch(context, ValueType::Direction, &value))
}

fn expect_object(value: Value, context: &'static str) -> Result<ObjectRef, EvalError> {
    value
        .as_object()
        .ok_or_else(|| type_mismatch(context, ValueType::Object, &value))
}

fn expect_tile(value: Value, context: &'static str) -> Result<TileRef, EvalError> {
    value
        .as_tile()
        .ok_or_else(|| type_mismatch(context, ValueType::Tile, &value))
}

#[cfg(test)]
mod tests;
