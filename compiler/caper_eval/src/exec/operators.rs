//! Binary and unary operator implementations.
//!
//! The value set is closed, so dispatch is a direct match on operand
//! variants. Operands are always both evaluated, left first, before any
//! operator runs; `and`/`or` do not short-circuit.

use caper_ir::{BinaryOp, UnaryOp, Value};

use crate::errors::{
    binary_type_mismatch, division_by_zero, invalid_argument, unary_type_mismatch, EvalResult,
};

/// Evaluate a binary operation.
pub fn evaluate_binary(left: Value, right: Value, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Eq | BinaryOp::NotEq => eval_equality(left, right, op),
        _ => match (left, right) {
            (Value::Number(a), Value::Number(b)) => eval_number_binary(a, b, op)
                .ok_or_else(|| binary_type_mismatch(op, &left, &right))?,
            (Value::Boolean(a), Value::Boolean(b)) => eval_bool_binary(a, b, op)
                .ok_or_else(|| binary_type_mismatch(op, &left, &right)),
            _ => Err(binary_type_mismatch(op, &left, &right)),
        },
    }
}

/// `==` and `!=` compare values of the same type only.
fn eval_equality(left: Value, right: Value, op: BinaryOp) -> EvalResult {
    if left.value_type() != right.value_type() {
        return Err(binary_type_mismatch(op, &left, &right));
    }
    let equal = left == right;
    Ok(Value::Boolean(if op == BinaryOp::Eq { equal } else { !equal }))
}

/// Arithmetic and ordering on numbers. `None` for non-numeric operators.
fn eval_number_binary(a: f64, b: f64, op: BinaryOp) -> Option<EvalResult> {
    let value = match op {
        BinaryOp::Add => Value::Number(a + b),
        BinaryOp::Sub => Value::Number(a - b),
        BinaryOp::Mul => Value::Number(a * b),
        BinaryOp::Div => {
            if b == 0.0 {
                return Some(Err(division_by_zero()));
            }
            Value::Number(a / b)
        }
        BinaryOp::Lt => Value::Boolean(a < b),
        BinaryOp::LtEq => Value::Boolean(a <= b),
        BinaryOp::Gt => Value::Boolean(a > b),
        BinaryOp::GtEq => Value::Boolean(a >= b),
        BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::And | BinaryOp::Or => return None,
    };
    Some(Ok(value))
}

/// Logical operators on booleans. `None` for anything else.
fn eval_bool_binary(a: bool, b: bool, op: BinaryOp) -> Option<Value> {
    match op {
        BinaryOp::And => Some(Value::Boolean(a && b)),
        BinaryOp::Or => Some(Value::Boolean(a || b)),
        _ => None,
    }
}

/// Evaluate a unary operation.
pub fn evaluate_unary(value: Value, op: UnaryOp) -> EvalResult {
    match (value, op) {
        (Value::Boolean(b), UnaryOp::Not) => Ok(Value::Boolean(!b)),
        (Value::Number(n), UnaryOp::Neg) => Ok(Value::Number(-n)),
        (Value::Number(n), UnaryOp::Sqrt) => {
            if n < 0.0 {
                Err(invalid_argument("sqrt", n))
            } else {
                Ok(Value::Number(n.sqrt()))
            }
        }
        _ => Err(unary_type_mismatch(op, &value)),
    }
}
