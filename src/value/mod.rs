//! The completed/output value space: what field completion produces and what
//! ultimately gets serialized as a response's `data`.
//!
//! Distinct from [`crate::ast::InputValue`] (the literal space parsed from a
//! document, which may still hold unresolved variables) and from
//! [`crate::types::RawValue`] (whatever a resolver hands back, which may
//! still hold an unforced [`crate::types::Lazy`]). By the time a [`Value`]
//! exists, completion has already run: no variables, no enum-name ambiguity,
//! no pending thunks.

mod object;
mod scalar;

use std::fmt;

use serde::{Serialize, Serializer};

pub use self::{
    object::Object,
    scalar::{InputCoercionError, ScalarValue},
};

/// A value in the runtime value space, ready for serialization.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The `null` value.
    Null,
    /// A leaf scalar or enum value.
    Scalar(ScalarValue),
    /// An ordered list of values.
    List(Vec<Value>),
    /// An ordered, string-keyed map of values.
    Object(Object),
}

impl Value {
    /// Constructs a null value.
    pub fn null() -> Self {
        Value::Null
    }

    /// Constructs a scalar value from anything convertible to [`ScalarValue`].
    pub fn scalar(s: impl Into<ScalarValue>) -> Self {
        Value::Scalar(s.into())
    }

    /// Constructs a list value.
    pub fn list(l: Vec<Value>) -> Self {
        Value::List(l)
    }

    /// Constructs an object value.
    pub fn object(o: Object) -> Self {
        Value::Object(o)
    }

    /// Whether this value is `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Views this value as an object, if it is one.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Views this value as a list, if it is one.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Views this value's underlying scalar, if it is one.
    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

impl From<ScalarValue> for Value {
    fn from(s: ScalarValue) -> Self {
        Value::Scalar(s)
    }
}

impl From<Option<Value>> for Value {
    fn from(v: Option<Value>) -> Self {
        v.unwrap_or(Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Scalar(ScalarValue::String(s)) => write!(f, "{s:?}"),
            Value::Scalar(s) => write!(f, "{s}"),
            Value::List(list) => {
                write!(f, "[")?;
                for (i, v) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Object(obj) => {
                write!(f, "{{")?;
                for (i, (k, v)) in obj.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Scalar(s) => s.serialize(serializer),
            Value::List(l) => l.serialize(serializer),
            Value::Object(o) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(o.field_count()))?;
                for (k, v) in o.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}
