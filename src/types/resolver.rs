use std::{any::Any, fmt, sync::Arc, sync::Mutex, sync::OnceLock};

use derive_more::with_trait::Display;
use indexmap::IndexMap;

use crate::{ast::InputValue, value::Value};

/// The opaque, host-supplied value threaded unchanged into every resolver
/// call. The executor never inspects it; resolvers downcast it via
/// [`crate::types::downcast_context`].
pub type Context = dyn Any + Send + Sync;

/// An error raised while resolving or completing one field.
///
/// Recorded against the field's response path and recovered by nulling the
/// field (bubbling through `NonNull` as the executor's error propagation
/// rules require).
#[derive(Clone, Debug, Display)]
#[display("{message}")]
pub struct FieldError {
    /// Human-readable description of the failure.
    pub message: String,
    /// Structured metadata serialized under the error's `extensions` key,
    /// if any.
    pub extensions: Option<Value>,
}

impl FieldError {
    /// Builds a field error with no extensions.
    pub fn new(message: impl Into<String>) -> Self {
        FieldError {
            message: message.into(),
            extensions: None,
        }
    }

    /// Builds a field error carrying structured extensions.
    pub fn with_extensions(message: impl Into<String>, extensions: Value) -> Self {
        FieldError {
            message: message.into(),
            extensions: Some(extensions),
        }
    }
}

impl std::error::Error for FieldError {}

impl From<String> for FieldError {
    fn from(message: String) -> Self {
        FieldError::new(message)
    }
}

impl From<&str> for FieldError {
    fn from(message: &str) -> Self {
        FieldError::new(message)
    }
}

impl From<crate::value::InputCoercionError> for FieldError {
    fn from(e: crate::value::InputCoercionError) -> Self {
        FieldError::new(e.to_string())
    }
}

/// The result of resolving or completing a field.
pub type FieldResult<T> = Result<T, FieldError>;

/// The coerced arguments passed to a resolver (component E's output).
///
/// Values have already been defaulted, had variables substituted, and been
/// passed through `coerce` — there is nothing left for a resolver to do but
/// read them.
#[derive(Clone, Debug, Default)]
pub struct Arguments {
    values: IndexMap<String, InputValue>,
}

impl Arguments {
    /// Wraps an already-coerced argument map.
    pub fn new(values: IndexMap<String, InputValue>) -> Self {
        Arguments { values }
    }

    /// Reads and converts an argument, if present.
    pub fn get<T>(&self, name: &str) -> Option<T>
    where
        T: crate::ast::FromInputValue,
    {
        self.values
            .get(name)
            .and_then(|v| T::from_input_value(v).ok())
    }

    /// The argument's literal value, without conversion.
    pub fn get_raw(&self, name: &str) -> Option<&InputValue> {
        self.values.get(name)
    }

    /// Whether an argument with this name was coerced (present or defaulted).
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

/// A deferred field value: the executor forces it exactly once, the first
/// time completion needs its concrete value.
pub struct Lazy(Arc<LazyInner>);

struct LazyInner {
    result: OnceLock<FieldResult<RawValue>>,
    thunk: Mutex<Option<Box<dyn FnOnce() -> FieldResult<RawValue> + Send>>>,
}

impl Lazy {
    /// Wraps a deferred computation.
    pub fn new(f: impl FnOnce() -> FieldResult<RawValue> + Send + 'static) -> Self {
        Lazy(Arc::new(LazyInner {
            result: OnceLock::new(),
            thunk: Mutex::new(Some(Box::new(f))),
        }))
    }

    /// Forces this value. Idempotent: a second call is a no-op.
    pub fn resolve(&self) {
        if self.0.result.get().is_some() {
            return;
        }
        let thunk = self
            .0
            .thunk
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(f) = thunk {
            let _ = self.0.result.set(f());
        }
    }

    /// Forces this value (if not already forced) and returns it.
    pub fn value(&self) -> FieldResult<RawValue> {
        self.resolve();
        self.0
            .result
            .get()
            .cloned()
            .expect("Lazy::resolve must populate the result cell")
    }
}

impl Clone for Lazy {
    fn clone(&self) -> Self {
        Lazy(Arc::clone(&self.0))
    }
}

impl fmt::Debug for Lazy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lazy")
            .field("forced", &self.0.result.get().is_some())
            .finish()
    }
}

/// Whatever a resolver hands back: a plain value, an opaque Rust value
/// standing in for an object's parent, or a [`Lazy`] thunk.
#[derive(Clone, Debug)]
pub enum RawValue {
    /// The `null` value.
    Null,
    /// A boolean.
    Boolean(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// An ordered list of raw values.
    List(Vec<RawValue>),
    /// An ordered, string-keyed map of raw values.
    Map(IndexMap<String, RawValue>),
    /// An opaque Rust value, passed as `parent` to the next level of
    /// resolvers (downcast with [`RawValue::downcast_ref`]).
    Object(Arc<dyn Any + Send + Sync>),
    /// A deferred computation, forced the first time completion needs it.
    Lazy(Lazy),
}

impl RawValue {
    /// Wraps an arbitrary Rust value as an opaque object parent.
    pub fn object(value: impl Any + Send + Sync) -> Self {
        RawValue::Object(Arc::new(value))
    }

    /// Whether this value is the literal `null` variant.
    ///
    /// Does not force a [`Lazy`] — callers that need to see through one
    /// should force it first (the executor always does, before completion
    /// inspects a raw value's shape).
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Downcasts an [`RawValue::Object`] payload to a concrete Rust type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            RawValue::Object(v) => v.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl PartialEq for RawValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RawValue::Null, RawValue::Null) => true,
            (RawValue::Boolean(a), RawValue::Boolean(b)) => a == b,
            (RawValue::Int(a), RawValue::Int(b)) => a == b,
            (RawValue::Float(a), RawValue::Float(b)) => a == b,
            (RawValue::String(a), RawValue::String(b)) => a == b,
            (RawValue::List(a), RawValue::List(b)) => a == b,
            (RawValue::Map(a), RawValue::Map(b)) => a == b,
            (RawValue::Object(a), RawValue::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Boolean(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        RawValue::Int(v.into())
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<f32> for RawValue {
    fn from(v: f32) -> Self {
        RawValue::Float(v.into())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::String(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::String(v.to_owned())
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => RawValue::Null,
        }
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(v: Vec<T>) -> Self {
        RawValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RawValue>> From<IndexMap<String, T>> for RawValue {
    fn from(v: IndexMap<String, T>) -> Self {
        RawValue::Map(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl From<Lazy> for RawValue {
    fn from(l: Lazy) -> Self {
        RawValue::Lazy(l)
    }
}
