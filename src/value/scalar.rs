//! The canonical scalar representation used throughout the runtime value space.

use std::fmt;

use derive_more::with_trait::{Display, From};
use serde::{Serialize, Serializer};

use crate::ast::InputValue;

/// Canonical form of a built-in scalar value, after coercion.
///
/// `Int` is kept within the GraphQL spec's 32-bit signed range by
/// [`ScalarType`](crate::schema::meta::ScalarType) coercion functions, not by
/// this type itself (a custom scalar may legitimately want a wider integer).
#[derive(Clone, Debug, Display, From, PartialEq)]
pub enum ScalarValue {
    /// A boolean scalar.
    #[display("{_0}")]
    Boolean(bool),
    /// An integer scalar, canonically the 32-bit signed range.
    #[display("{_0}")]
    Int(i32),
    /// A floating point scalar.
    #[display("{_0}")]
    Float(f64),
    /// A string scalar (also backs `ID`).
    #[display("{_0}")]
    String(String),
}

impl ScalarValue {
    /// View this value as an `i32`, if it holds one.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            ScalarValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// View this value as an `f64`, coercing from `Int` if necessary —
    /// GraphQL allows an `Int` literal anywhere a `Float` is expected.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ScalarValue::Float(f) => Some(*f),
            ScalarValue::Int(i) => Some(f64::from(*i)),
            _ => None,
        }
    }

    /// View this value as a `&str`, if it holds a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// View this value as a `bool`, if it holds one.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            ScalarValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::String(s.to_owned())
    }
}

impl Serialize for ScalarValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ScalarValue::Boolean(b) => serializer.serialize_bool(*b),
            ScalarValue::Int(i) => serializer.serialize_i32(*i),
            ScalarValue::Float(f) => serializer.serialize_f64(*f),
            ScalarValue::String(s) => serializer.serialize_str(s),
        }
    }
}

/// Error produced when an [`InputValue`] cannot be interpreted as the
/// expected scalar's native representation.
#[derive(Clone, Debug, Display, PartialEq)]
#[display("{message}")]
pub struct InputCoercionError {
    /// Human-readable description of the failure.
    pub message: String,
}

impl InputCoercionError {
    /// Build an error reporting that `value` could not be interpreted as `expected`.
    pub fn new(expected: &str, value: &InputValue) -> Self {
        InputCoercionError {
            message: format!("Expected type \"{expected}\", found {value:?}"),
        }
    }
}

impl std::error::Error for InputCoercionError {}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputValue::Null => write!(f, "null"),
            InputValue::Int(i) => write!(f, "{i}"),
            InputValue::Float(v) => write!(f, "{v}"),
            InputValue::String(s) => write!(f, "{s:?}"),
            InputValue::Boolean(b) => write!(f, "{b}"),
            InputValue::Enum(e) => write!(f, "{e}"),
            InputValue::Variable(v) => write!(f, "${v}"),
            InputValue::List(l) => {
                write!(f, "[")?;
                for (i, v) in l.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v.item)?;
                }
                write!(f, "]")
            }
            InputValue::Object(o) => {
                write!(f, "{{")?;
                for (i, (k, v)) in o.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k.item, v.item)?;
                }
                write!(f, "}}")
            }
        }
    }
}
