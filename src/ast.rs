//! The document AST consumed by the executor.
//!
//! None of these types are produced by a parser in this crate — turning a
//! query string into a [`Document`] is an external collaborator's job. What
//! lives here is the shape the executor expects to receive, plus the literal
//! value space (`InputValue`) used for arguments, variable defaults, and
//! directive arguments.

use std::fmt;

use indexmap::IndexMap;
use serde::{de, ser, Serialize as _};

use crate::parser::Spanning;

/// A type reference as it appears in a variable definition or schema
/// declaration (`String`, `[String]`, `String!`, `[[ID!]!]`, ...).
///
/// Carries no semantic information by itself and may refer to a type name
/// that does not exist in the schema; resolving it is the registry's job.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Type {
    /// A nullable named type, e.g. `String`.
    Named(String),
    /// A nullable list type, e.g. `[String]`. The list itself is nullable;
    /// the element type carries its own nullability.
    List(Box<Type>),
    /// A non-null wrapper around any other type, e.g. `String!`, `[String]!`.
    NonNull(Box<Type>),
}

impl Type {
    /// The innermost named type, unwrapping any number of `List`/`NonNull`.
    pub fn innermost_name(&self) -> &str {
        match self {
            Type::Named(n) => n,
            Type::List(inner) | Type::NonNull(inner) => inner.innermost_name(),
        }
    }

    /// Whether this type reference is non-null at the top level.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Type::NonNull(_))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Named(n) => write!(f, "{n}"),
            Type::List(t) => write!(f, "[{t}]"),
            Type::NonNull(t) => write!(f, "{t}!"),
        }
    }
}

/// A JSON-like literal value appearing in a query document: an argument
/// literal, a variable default, or a directive argument.
///
/// Distinct from [`crate::value::Value`]: an `InputValue` may still contain
/// unresolved `Variable` references and enum names, neither of which appear
/// once a value has been coerced into the runtime value space.
#[derive(Clone, PartialEq, Debug)]
pub enum InputValue {
    /// The `null` literal.
    Null,
    /// An integer literal, e.g. `42`.
    Int(i64),
    /// A floating point literal, e.g. `4.2`.
    Float(f64),
    /// A string literal, e.g. `"hello"`.
    String(String),
    /// A boolean literal, `true` or `false`.
    Boolean(bool),
    /// An (unvalidated) enum value name, e.g. `SIT`.
    Enum(String),
    /// A reference to a variable by name, e.g. `$id`.
    Variable(String),
    /// A list literal.
    List(Vec<Spanning<InputValue>>),
    /// An object literal, preserving the order fields were written in.
    Object(Vec<(Spanning<String>, Spanning<InputValue>)>),
}

impl InputValue {
    /// Construct a null value.
    pub fn null() -> InputValue {
        InputValue::Null
    }

    /// Construct an unlocated list out of plain values.
    pub fn list(l: Vec<InputValue>) -> InputValue {
        InputValue::List(l.into_iter().map(Spanning::unlocated).collect())
    }

    /// Construct an unlocated object out of plain key/value pairs.
    pub fn object(o: Vec<(String, InputValue)>) -> InputValue {
        InputValue::Object(
            o.into_iter()
                .map(|(k, v)| (Spanning::unlocated(k), Spanning::unlocated(v)))
                .collect(),
        )
    }

    /// Does this value represent `null`?
    pub fn is_null(&self) -> bool {
        matches!(self, InputValue::Null)
    }

    /// Does this value represent a variable reference?
    pub fn is_variable(&self) -> bool {
        matches!(self, InputValue::Variable(_))
    }

    /// The underlying variable name, if this is a `Variable`.
    pub fn as_variable_name(&self) -> Option<&str> {
        match self {
            InputValue::Variable(v) => Some(v),
            _ => None,
        }
    }

    /// View this value as an object's fields, if it is one.
    pub fn to_object_value(&self) -> Option<IndexMap<&str, &InputValue>> {
        match self {
            InputValue::Object(o) => Some(
                o.iter()
                    .map(|(k, v)| (k.item.as_str(), &v.item))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Resolve every `Variable` reference in this literal against a coerced
    /// variable map, producing a value with no remaining variables.
    pub fn into_const(self, vars: &IndexMap<String, InputValue>) -> InputValue {
        match self {
            InputValue::Variable(name) => vars.get(&name).cloned().unwrap_or(InputValue::Null),
            InputValue::List(items) => InputValue::List(
                items
                    .into_iter()
                    .map(|s| s.map(|v| v.into_const(vars)))
                    .collect(),
            ),
            InputValue::Object(fields) => InputValue::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, v.map(|v| v.into_const(vars))))
                    .collect(),
            ),
            other => other,
        }
    }
}

/// Serializes as the JSON value the literal denotes: `Variable` has no JSON
/// representation of its own and, like `Null`, serializes as `null` (a
/// variable literal never survives into a host's JSON variables payload);
/// `Enum` serializes as its bare name string.
impl ser::Serialize for InputValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        match self {
            InputValue::Null | InputValue::Variable(_) => serializer.serialize_unit(),
            InputValue::Int(i) => serializer.serialize_i64(*i),
            InputValue::Float(f) => serializer.serialize_f64(*f),
            InputValue::String(s) => serializer.serialize_str(s),
            InputValue::Boolean(b) => serializer.serialize_bool(*b),
            InputValue::Enum(name) => serializer.serialize_str(name),
            InputValue::List(items) => {
                items.iter().map(|s| &s.item).collect::<Vec<_>>().serialize(serializer)
            }
            InputValue::Object(fields) => fields
                .iter()
                .map(|(k, v)| (k.item.clone(), v.item.clone()))
                .collect::<IndexMap<_, _>>()
                .serialize(serializer),
        }
    }
}

/// Deserializes a plain JSON value into the corresponding literal: `null` ->
/// [`InputValue::Null`], a JSON object/array recurse fieldwise/elementwise.
/// Never produces a `Variable` or `Enum` — a decoded request's variables
/// payload is plain JSON and has no syntax for either.
impl<'de> de::Deserialize<'de> for InputValue {
    fn deserialize<D>(deserializer: D) -> Result<InputValue, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct InputValueVisitor;

        impl<'de> de::Visitor<'de> for InputValueVisitor {
            type Value = InputValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a valid input value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<InputValue, E> {
                Ok(InputValue::Boolean(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<InputValue, E> {
                Ok(InputValue::Int(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<InputValue, E>
            where
                E: de::Error,
            {
                i64::try_from(value)
                    .map(InputValue::Int)
                    .or(Ok(InputValue::Float(value as f64)))
            }

            fn visit_f64<E>(self, value: f64) -> Result<InputValue, E> {
                Ok(InputValue::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<InputValue, E>
            where
                E: de::Error,
            {
                self.visit_string(value.to_owned())
            }

            fn visit_string<E>(self, value: String) -> Result<InputValue, E> {
                Ok(InputValue::String(value))
            }

            fn visit_none<E>(self) -> Result<InputValue, E> {
                Ok(InputValue::Null)
            }

            fn visit_unit<E>(self) -> Result<InputValue, E> {
                Ok(InputValue::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<InputValue, D::Error>
            where
                D: de::Deserializer<'de>,
            {
                de::Deserialize::deserialize(deserializer)
            }

            fn visit_seq<V>(self, mut visitor: V) -> Result<InputValue, V::Error>
            where
                V: de::SeqAccess<'de>,
            {
                let mut values = Vec::with_capacity(visitor.size_hint().unwrap_or(0));
                while let Some(el) = visitor.next_element::<InputValue>()? {
                    values.push(Spanning::unlocated(el));
                }
                Ok(InputValue::List(values))
            }

            fn visit_map<V>(self, mut visitor: V) -> Result<InputValue, V::Error>
            where
                V: de::MapAccess<'de>,
            {
                let mut fields = Vec::with_capacity(visitor.size_hint().unwrap_or(0));
                while let Some((key, value)) = visitor.next_entry::<String, InputValue>()? {
                    fields.push((Spanning::unlocated(key), Spanning::unlocated(value)));
                }
                Ok(InputValue::Object(fields))
            }
        }

        deserializer.deserialize_any(InputValueVisitor)
    }
}

/// The arguments passed to a field or directive, in document order.
pub type Arguments = IndexMap<String, Spanning<InputValue>>;

/// A variable definition from an operation's `($var: Type = default)` list.
#[derive(Clone, PartialEq, Debug)]
pub struct VariableDefinition {
    /// The declared type of the variable.
    pub var_type: Spanning<Type>,
    /// The default value, if any was given.
    pub default_value: Option<Spanning<InputValue>>,
}

/// A directive application, e.g. `@skip(if: $cond)`.
#[derive(Clone, PartialEq, Debug)]
pub struct Directive {
    /// The directive's name (without the leading `@`).
    pub name: Spanning<String>,
    /// The directive's arguments.
    pub arguments: Option<Spanning<Arguments>>,
}

/// A field selection, e.g. `alias: name(arg: 1) { sub }`.
#[derive(Clone, PartialEq, Debug)]
pub struct Field {
    /// An optional alias; the response key is the alias if present, else `name`.
    pub alias: Option<Spanning<String>>,
    /// The field's name as declared on the schema type.
    pub name: Spanning<String>,
    /// Arguments passed to the field.
    pub arguments: Option<Spanning<Arguments>>,
    /// Directives applied to this selection.
    pub directives: Option<Vec<Spanning<Directive>>>,
    /// The nested selection set, if the field's type is composite.
    pub selection_set: Option<Vec<Selection>>,
}

impl Field {
    /// The key this field's value is recorded under in the response: its
    /// alias if present, otherwise its name.
    pub fn response_key(&self) -> &str {
        self.alias
            .as_ref()
            .map(|s| s.item.as_str())
            .unwrap_or(self.name.item.as_str())
    }
}

/// A `...Name` fragment spread.
#[derive(Clone, PartialEq, Debug)]
pub struct FragmentSpread {
    /// The name of the fragment being spread.
    pub name: Spanning<String>,
    /// Directives applied to the spread itself.
    pub directives: Option<Vec<Spanning<Directive>>>,
}

/// An `... on Type { ... }` or bare `... { ... }` inline fragment.
#[derive(Clone, PartialEq, Debug)]
pub struct InlineFragment {
    /// The type condition, if any (`on Type`).
    pub type_condition: Option<Spanning<String>>,
    /// Directives applied to the inline fragment.
    pub directives: Option<Vec<Spanning<Directive>>>,
    /// The nested selection set.
    pub selection_set: Vec<Selection>,
}

/// One entry in a selection set.
#[derive(Clone, PartialEq, Debug)]
pub enum Selection {
    /// A field selection.
    Field(Spanning<Field>),
    /// A fragment spread (`...Name`).
    FragmentSpread(Spanning<FragmentSpread>),
    /// An inline fragment (`... on Type { ... }`).
    InlineFragment(Spanning<InlineFragment>),
}

/// The operation kind: `query`, `mutation`, or `subscription`.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum OperationType {
    /// A `query` operation.
    Query,
    /// A `mutation` operation.
    Mutation,
    /// A `subscription` operation. Recognized only so operation selection can
    /// report it clearly; subscription delivery is out of scope for this core.
    Subscription,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperationType::Query => "query",
            OperationType::Mutation => "mutation",
            OperationType::Subscription => "subscription",
        })
    }
}

/// A top-level `query`/`mutation`/`subscription { ... }` definition.
#[derive(Clone, PartialEq, Debug)]
pub struct OperationDefinition {
    /// Which kind of operation this is.
    pub operation_type: OperationType,
    /// The operation's name, if named.
    pub name: Option<Spanning<String>>,
    /// Declared variables, in document order.
    pub variable_definitions: Option<Spanning<Vec<(Spanning<String>, VariableDefinition)>>>,
    /// Directives applied to the operation itself.
    pub directives: Option<Vec<Spanning<Directive>>>,
    /// The operation's top-level selection set.
    pub selection_set: Vec<Selection>,
}

/// A top-level `fragment Name on Type { ... }` definition.
#[derive(Clone, PartialEq, Debug)]
pub struct FragmentDefinition {
    /// The fragment's name.
    pub name: Spanning<String>,
    /// The type this fragment applies to.
    pub type_condition: Spanning<String>,
    /// Directives applied to the fragment definition.
    pub directives: Option<Vec<Spanning<Directive>>>,
    /// The fragment's selection set.
    pub selection_set: Vec<Selection>,
}

/// A single top-level definition in a document.
#[derive(Clone, PartialEq, Debug)]
pub enum Definition {
    /// An operation definition.
    Operation(Spanning<OperationDefinition>),
    /// A fragment definition.
    Fragment(Spanning<FragmentDefinition>),
}

/// A parsed (but not yet validated or executed) GraphQL document.
pub type Document = Vec<Definition>;

/// Parses an unstructured input value into a Rust data type.
///
/// Implemented for the built-in scalar representations. Custom scalars and
/// enums are coerced through the `coerce`/`serialize` closures stored on
/// [`crate::schema::meta::ScalarType`]/[`crate::schema::meta::EnumType`]
/// instead of this trait, since this core builds schemas dynamically rather
/// than by deriving from Rust types.
pub trait FromInputValue: Sized {
    /// The error produced when coercion fails.
    type Error: fmt::Display;

    /// Performs the conversion.
    fn from_input_value(v: &InputValue) -> Result<Self, Self::Error>;
}

/// Losslessly converts a Rust value back into an [`InputValue`].
pub trait ToInputValue {
    /// Performs the conversion.
    fn to_input_value(&self) -> InputValue;
}

/// Error produced by the built-in [`FromInputValue`] impls below.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FromInputValueError(String);

impl fmt::Display for FromInputValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! from_input_value_int {
    ($ty:ty) => {
        impl FromInputValue for $ty {
            type Error = FromInputValueError;

            fn from_input_value(v: &InputValue) -> Result<Self, Self::Error> {
                match v {
                    InputValue::Int(i) => <$ty>::try_from(*i)
                        .map_err(|_| FromInputValueError(format!("{i} out of range"))),
                    _ => Err(FromInputValueError(format!("expected an integer, found {v}"))),
                }
            }
        }
    };
}

from_input_value_int!(i32);
from_input_value_int!(i64);
from_input_value_int!(u32);

impl FromInputValue for f64 {
    type Error = FromInputValueError;

    fn from_input_value(v: &InputValue) -> Result<Self, Self::Error> {
        match v {
            InputValue::Float(f) => Ok(*f),
            InputValue::Int(i) => Ok(*i as f64),
            _ => Err(FromInputValueError(format!("expected a float, found {v}"))),
        }
    }
}

impl FromInputValue for bool {
    type Error = FromInputValueError;

    fn from_input_value(v: &InputValue) -> Result<Self, Self::Error> {
        match v {
            InputValue::Boolean(b) => Ok(*b),
            _ => Err(FromInputValueError(format!("expected a boolean, found {v}"))),
        }
    }
}

impl FromInputValue for String {
    type Error = FromInputValueError;

    fn from_input_value(v: &InputValue) -> Result<Self, Self::Error> {
        match v {
            InputValue::String(s) => Ok(s.clone()),
            InputValue::Enum(s) => Ok(s.clone()),
            _ => Err(FromInputValueError(format!("expected a string, found {v}"))),
        }
    }
}

impl<T: FromInputValue> FromInputValue for Option<T> {
    type Error = T::Error;

    fn from_input_value(v: &InputValue) -> Result<Self, Self::Error> {
        if v.is_null() {
            Ok(None)
        } else {
            T::from_input_value(v).map(Some)
        }
    }
}

impl<T: FromInputValue> FromInputValue for Vec<T> {
    type Error = T::Error;

    fn from_input_value(v: &InputValue) -> Result<Self, Self::Error> {
        match v {
            InputValue::List(items) => {
                items.iter().map(|s| T::from_input_value(&s.item)).collect()
            }
            other => T::from_input_value(other).map(|v| vec![v]),
        }
    }
}

impl ToInputValue for i32 {
    fn to_input_value(&self) -> InputValue {
        InputValue::Int(i64::from(*self))
    }
}

impl ToInputValue for f64 {
    fn to_input_value(&self) -> InputValue {
        InputValue::Float(*self)
    }
}

impl ToInputValue for bool {
    fn to_input_value(&self) -> InputValue {
        InputValue::Boolean(*self)
    }
}

impl ToInputValue for String {
    fn to_input_value(&self) -> InputValue {
        InputValue::String(self.clone())
    }
}

impl<T: ToInputValue> ToInputValue for Option<T> {
    fn to_input_value(&self) -> InputValue {
        match self {
            Some(v) => v.to_input_value(),
            None => InputValue::Null,
        }
    }
}

impl<T: ToInputValue> ToInputValue for Vec<T> {
    fn to_input_value(&self) -> InputValue {
        InputValue::list(self.iter().map(ToInputValue::to_input_value).collect())
    }
}
