//! Fault types for expression evaluation and statement execution.
//!
//! # Fault Classes
//!
//! - **Transient**: the world or the data is temporarily unsuitable (division
//!   by zero, a null or vanished actor, a value of the wrong type inside an
//!   expression). The statement is abandoned without effect and retried
//!   verbatim on the next tick.
//! - **Fatal**: the program tree itself is ill-formed (assigning a value of
//!   the wrong type, a misdeclared loop variable). The program halts for good.
//!
//! Factory functions (e.g. `division_by_zero()`) are the public API; they
//! populate both `kind` and `message`.

use std::fmt;

use caper_ir::{BinaryOp, ObjectId, UnaryOp, Value, ValueType};

/// Result of evaluating an expression.
pub type EvalResult = Result<Value, EvalError>;

/// Typed fault category.
#[derive(Clone, Debug, PartialEq)]
pub enum EvalErrorKind {
    // Arithmetic
    DivisionByZero,
    InvalidArgument {
        operation: &'static str,
        value: f64,
    },

    // Type/Operator
    TypeMismatch {
        context: &'static str,
        expected: ValueType,
        got: ValueType,
    },
    BinaryTypeMismatch {
        op: BinaryOp,
        left: ValueType,
        right: ValueType,
    },
    UnaryTypeMismatch {
        op: UnaryOp,
        operand: ValueType,
    },

    // Access
    UndefinedVariable {
        name: String,
    },
    NullReference {
        query: &'static str,
    },
    MissingObject {
        object: ObjectId,
    },

    // Program configuration (fatal)
    UndeclaredTarget {
        name: String,
    },
    AssignTypeMismatch {
        name: String,
        declared: ValueType,
        got: ValueType,
    },
    LoopVariable {
        name: String,
        expected: ValueType,
        declared: Option<ValueType>,
    },
    BreakOutsideLoop,
}

impl EvalErrorKind {
    /// Whether this fault halts the program permanently.
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UndeclaredTarget { .. }
                | Self::AssignTypeMismatch { .. }
                | Self::LoopVariable { .. }
                | Self::BreakOutsideLoop
        )
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::InvalidArgument { operation, value } => {
                write!(f, "invalid argument to {operation}: {value}")
            }

            Self::TypeMismatch {
                context,
                expected,
                got,
            } => write!(f, "{context} expects a {expected}, got {got}"),
            Self::BinaryTypeMismatch { op, left, right } => write!(
                f,
                "operator `{}` cannot be applied to {left} and {right}",
                op.as_symbol()
            ),
            Self::UnaryTypeMismatch { op, operand } => {
                write!(f, "operator `{}` cannot be applied to {operand}", op.as_symbol())
            }

            Self::UndefinedVariable { name } => write!(f, "undefined variable: {name}"),
            Self::NullReference { query } => write!(f, "{query} of a null object"),
            Self::MissingObject { object } => write!(f, "{object} is no longer in the world"),

            Self::UndeclaredTarget { name } => {
                write!(f, "cannot assign to undeclared variable: {name}")
            }
            Self::AssignTypeMismatch {
                name,
                declared,
                got,
            } => write!(f, "cannot assign {got} to {name}, declared as {declared}"),
            Self::LoopVariable {
                name,
                expected,
                declared: Some(declared),
            } => write!(
                f,
                "loop variable {name} must be declared as {expected}, found {declared}"
            ),
            Self::LoopVariable {
                name,
                expected,
                declared: None,
            } => write!(f, "loop variable {name} must be declared as {expected}"),
            Self::BreakOutsideLoop => write!(f, "break outside of a loop"),
        }
    }
}

/// Evaluation or execution fault.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    /// Structured fault category.
    pub kind: EvalErrorKind,
    /// Human-readable message, equal to `kind.to_string()`.
    pub message: String,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }

    /// Whether this fault halts the program permanently.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

// Arithmetic Errors

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

/// Argument outside an operation's domain (`sqrt` of a negative, a
/// non-positive `random` bound, a non-finite coordinate).
#[cold]
pub fn invalid_argument(operation: &'static str, value: f64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument { operation, value })
}

// Type Errors

#[cold]
pub fn type_mismatch(context: &'static str, expected: ValueType, got: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        context,
        expected,
        got: got.value_type(),
    })
}

#[cold]
pub fn binary_type_mismatch(op: BinaryOp, left: &Value, right: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BinaryTypeMismatch {
        op,
        left: left.value_type(),
        right: right.value_type(),
    })
}

#[cold]
pub fn unary_type_mismatch(op: UnaryOp, operand: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnaryTypeMismatch {
        op,
        operand: operand.value_type(),
    })
}

// Access Errors

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn null_reference(query: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NullReference { query })
}

#[cold]
pub fn missing_object(object: ObjectId) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MissingObject { object })
}

// Configuration Errors

#[cold]
pub fn undeclared_target(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndeclaredTarget {
        name: name.to_string(),
    })
}

#[cold]
pub fn assign_type_mismatch(name: &str, declared: ValueType, got: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AssignTypeMismatch {
        name: name.to_string(),
        declared,
        got: got.value_type(),
    })
}

#[cold]
pub fn loop_variable_misconfigured(
    name: &str,
    expected: ValueType,
    declared: Option<ValueType>,
) -> EvalError {
    EvalError::from_kind(EvalErrorKind::LoopVariable {
        name: name.to_string(),
        expected,
        declared,
    })
}

#[cold]
pub fn break_outside_loop() -> EvalError {
    EvalError::from_kind(EvalErrorKind::BreakOutsideLoop)
}
