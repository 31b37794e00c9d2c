//! Typed values.
//!
//! The value set is closed: every expression reduces to exactly one of the
//! five variants below, and every global variable is declared with one
//! `ValueType`.

use std::fmt;

/// Horizontal or vertical direction.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    /// Whether this direction moves along the x axis.
    #[inline]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque handle to an actor owned by the world model.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(transparent)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// Nullable actor reference.
pub type ObjectRef = Option<ObjectId>;

/// Integer tile coordinate.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct TileRef {
    pub x: i32,
    pub y: i32,
}

impl TileRef {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        TileRef { x, y }
    }

    /// Row-major ordering key: rows (`y`) first, then columns (`x`).
    #[inline]
    pub const fn row_major_key(self) -> (i32, i32) {
        (self.y, self.x)
    }
}

impl fmt::Display for TileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile({}, {})", self.x, self.y)
    }
}

/// Declared type of a global variable, and the tag of a `Value`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ValueType {
    Number,
    Boolean,
    Direction,
    Object,
    Tile,
}

impl ValueType {
    /// Value a freshly declared variable of this type starts with.
    pub const fn default_value(self) -> Value {
        match self {
            Self::Number => Value::Number(0.0),
            Self::Boolean => Value::Boolean(false),
            Self::Direction => Value::Direction(Direction::Right),
            Self::Object => Value::Object(None),
            Self::Tile => Value::Tile(TileRef::new(0, 0)),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Direction => "direction",
            Self::Object => "object",
            Self::Tile => "tile",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A runtime value.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Value {
    Number(f64),
    Boolean(bool),
    Direction(Direction),
    Object(ObjectRef),
    Tile(TileRef),
}

impl Value {
    /// The variant tag of this value.
    #[inline]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Value::Number(_) => ValueType::Number,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Direction(_) => ValueType::Direction,
            Value::Object(_) => ValueType::Object,
            Value::Tile(_) => ValueType::Tile,
        }
    }

    #[inline]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_direction(&self) -> Option<Direction> {
        match self {
            Value::Direction(d) => Some(*d),
            _ => None,
        }
    }

    /// The object reference, or `None` if this is not an object value.
    /// A null reference is `Some(None)`.
    #[inline]
    pub const fn as_object(&self) -> Option<ObjectRef> {
        match self {
            Value::Object(o) => Some(*o),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_tile(&self) -> Option<TileRef> {
        match self {
            Value::Tile(t) => Some(*t),
            _ => None,
        }
    }

    /// Shorthand for a non-null object value.
    #[inline]
    pub const fn object(id: ObjectId) -> Self {
        Value::Object(Some(id))
    }

    /// The null object reference.
    pub const NULL: Value = Value::Object(None);
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Direction> for Value {
    fn from(d: Direction) -> Self {
        Value::Direction(d)
    }
}

impl From<TileRef> for Value {
    fn from(t: TileRef) -> Self {
        Value::Tile(t)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Direction(d) => write!(f, "{d}"),
            Value::Object(Some(id)) => write!(f, "{id}"),
            Value::Object(None) => f.write_str("null"),
            Value::Tile(t) => write!(f, "{t}"),
        }
    }
}
