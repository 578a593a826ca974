//! The type algebra (component B): scalars, enums, objects, interfaces,
//! unions, input objects, and the `List`/`NonNull`/`LateBound` wrapping
//! modifiers, plus their coercion/serialization contracts.

use std::{fmt, sync::Arc};

use indexmap::IndexMap;

use crate::{
    ast::InputValue,
    types::{RawValue, Resolver, TypeResolver},
    value::{InputCoercionError, ScalarValue},
};

/// Deprecation status of a field, argument, enum value, or input field.
///
/// Schema metadata only — it has no effect on execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Deprecation {
    /// Not deprecated.
    Current,
    /// Deprecated, with an optional human-readable reason.
    Deprecated(Option<String>),
}

impl Deprecation {
    /// Whether this status marks something as deprecated.
    pub fn is_deprecated(&self) -> bool {
        matches!(self, Deprecation::Deprecated(_))
    }
}

/// A named or wrapped reference to a type, as it appears in a field's,
/// argument's, or input field's declared type.
#[derive(Clone)]
pub enum Type {
    /// A scalar type.
    Scalar(Arc<ScalarType>),
    /// An enum type.
    Enum(Arc<EnumType>),
    /// An object type.
    Object(Arc<ObjectType>),
    /// An interface type.
    Interface(Arc<InterfaceType>),
    /// A union type.
    Union(Arc<UnionType>),
    /// An input object type.
    InputObject(Arc<InputObjectType>),
    /// A list of `of_type`. The list itself is nullable; `of_type` carries
    /// its own nullability.
    List(Box<Type>),
    /// A non-null wrapper. `of_type` must not itself be `NonNull`.
    NonNull(Box<Type>),
    /// An unresolved reference by name, used to break definition cycles.
    /// The registry resolves this on demand; completion never handles it
    /// directly.
    LateBound(String),
}

impl Type {
    /// The type's name, if it is named (not a `List`/`NonNull` wrapper or
    /// an unresolved `LateBound` reference).
    pub fn name(&self) -> Option<&str> {
        match self {
            Type::Scalar(t) => Some(&t.name),
            Type::Enum(t) => Some(&t.name),
            Type::Object(t) => Some(&t.name),
            Type::Interface(t) => Some(&t.name),
            Type::Union(t) => Some(&t.name),
            Type::InputObject(t) => Some(&t.name),
            Type::List(_) | Type::NonNull(_) | Type::LateBound(_) => None,
        }
    }

    /// Whether this type reference is non-null at the top level.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Type::NonNull(_))
    }

    /// Whether this type may legally appear in an input position (argument,
    /// variable, or input object field type).
    pub fn is_input_type(&self) -> bool {
        match self {
            Type::Scalar(_) | Type::Enum(_) | Type::InputObject(_) => true,
            Type::Object(_) | Type::Interface(_) | Type::Union(_) => false,
            Type::List(inner) | Type::NonNull(inner) => inner.is_input_type(),
            Type::LateBound(_) => true,
        }
    }

    /// Whether this type may legally appear in an output position (a
    /// field's declared type).
    pub fn is_output_type(&self) -> bool {
        match self {
            Type::Scalar(_) | Type::Enum(_) | Type::Object(_) | Type::Interface(_) | Type::Union(_) => {
                true
            }
            Type::InputObject(_) => false,
            Type::List(inner) | Type::NonNull(inner) => inner.is_output_type(),
            Type::LateBound(_) => true,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Scalar(t) => write!(f, "{}", t.name),
            Type::Enum(t) => write!(f, "{}", t.name),
            Type::Object(t) => write!(f, "{}", t.name),
            Type::Interface(t) => write!(f, "{}", t.name),
            Type::Union(t) => write!(f, "{}", t.name),
            Type::InputObject(t) => write!(f, "{}", t.name),
            Type::List(inner) => write!(f, "[{inner}]"),
            Type::NonNull(inner) => write!(f, "{inner}!"),
            Type::LateBound(name) => write!(f, "{name}"),
        }
    }
}

/// A field declared on an object or interface type.
#[derive(Clone)]
pub struct Field {
    /// The field's name.
    pub name: String,
    /// The field's description, for documentation/introspection.
    pub description: Option<String>,
    /// The field's declared type.
    pub field_type: Type,
    /// Arguments accepted by this field, in declaration order.
    pub arguments: IndexMap<String, Argument>,
    /// Deprecation status.
    pub deprecation: Deprecation,
}

impl Field {
    /// Builds a field with no arguments and no description.
    pub fn new(name: impl Into<String>, field_type: Type) -> Self {
        Field {
            name: name.into(),
            description: None,
            field_type,
            arguments: IndexMap::new(),
            deprecation: Deprecation::Current,
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an argument.
    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.insert(argument.name.clone(), argument);
        self
    }

    /// Marks this field deprecated.
    pub fn deprecated(mut self, reason: Option<impl Into<String>>) -> Self {
        self.deprecation = Deprecation::Deprecated(reason.map(Into::into));
        self
    }
}

/// An argument declared on a field or directive.
#[derive(Clone)]
pub struct Argument {
    /// The argument's name.
    pub name: String,
    /// The argument's description.
    pub description: Option<String>,
    /// The argument's declared type; must be an input type.
    pub arg_type: Type,
    /// The argument's default literal value, if any.
    pub default_value: Option<InputValue>,
}

impl Argument {
    /// Builds a required argument with no default.
    pub fn new(name: impl Into<String>, arg_type: Type) -> Self {
        Argument {
            name: name.into(),
            description: None,
            arg_type,
            default_value: None,
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a default value.
    pub fn default_value(mut self, value: InputValue) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// A scalar type's coercion (input) and serialization (output) contracts.
///
/// Plain function pointers (or boxed closures, via [`Arc<dyn Fn>`]) rather
/// than a trait-per-Rust-type: this core builds its type system as data at
/// runtime, so there's no Rust type to hang a trait impl off of.
pub type CoerceFn = Arc<dyn Fn(&InputValue) -> Result<ScalarValue, InputCoercionError> + Send + Sync>;

/// A scalar type's output serialization contract; returns a human-readable
/// error message on failure (wrapped into a field error by the executor).
pub type SerializeFn = Arc<dyn Fn(&RawValue) -> Result<ScalarValue, String> + Send + Sync>;

/// A scalar type: `ID`, `String`, `Int`, `Float`, `Boolean`, or a
/// user-defined custom scalar.
#[derive(Clone)]
pub struct ScalarType {
    /// The scalar's name.
    pub name: String,
    /// The scalar's description.
    pub description: Option<String>,
    /// A `specifiedBy` URL, threaded through but otherwise inert in this
    /// core.
    pub specified_by_url: Option<String>,
    /// Converts an input literal into this scalar's canonical form.
    pub coerce: CoerceFn,
    /// Converts a resolver's raw value into this scalar's canonical form
    /// for output.
    pub serialize: SerializeFn,
}

/// One member of an enum type: its external name and the internal value a
/// resolver returns to select it.
#[derive(Clone)]
pub struct EnumValue {
    /// The value's external name, e.g. `SIT`.
    pub name: String,
    /// The description.
    pub description: Option<String>,
    /// The raw value a resolver returns to mean this enum member.
    pub internal_value: RawValue,
    /// Deprecation status.
    pub deprecation: Deprecation,
}

impl EnumValue {
    /// Builds an enum value whose internal representation is its own name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        EnumValue {
            internal_value: RawValue::String(name.clone()),
            name,
            description: None,
            deprecation: Deprecation::Current,
        }
    }

    /// Overrides the internal value a resolver uses to select this member.
    pub fn internal_value(mut self, value: RawValue) -> Self {
        self.internal_value = value;
        self
    }
}

/// An enum type: a name and an ordered list of `(name, internal_value)`
/// pairs.
#[derive(Clone)]
pub struct EnumType {
    /// The enum's name.
    pub name: String,
    /// The enum's description.
    pub description: Option<String>,
    /// The declared values, in declaration order.
    pub values: Vec<EnumValue>,
}

impl EnumType {
    /// Finds a value by its external name.
    pub fn value_by_name(&self, name: &str) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.name == name)
    }

    /// Finds the value whose internal representation equals `raw`.
    pub fn value_by_internal(&self, raw: &RawValue) -> Option<&EnumValue> {
        self.values.iter().find(|v| &v.internal_value == raw)
    }
}

/// An object type: a name, field map, implemented interfaces, and the
/// resolver invoked for each of its fields.
#[derive(Clone)]
pub struct ObjectType {
    /// The object's name.
    pub name: String,
    /// The object's description.
    pub description: Option<String>,
    /// Fields, in declaration order.
    pub fields: IndexMap<String, Field>,
    /// Names of interfaces this object implements.
    pub interfaces: Vec<String>,
    /// The resolver invoked for every field of this object.
    pub resolver: Arc<dyn Resolver>,
}

impl ObjectType {
    /// Whether this object implements the named interface.
    pub fn implements(&self, interface_name: &str) -> bool {
        self.interfaces.iter().any(|i| i == interface_name)
    }
}

/// An interface type: a name, a field map every implementer must satisfy,
/// and the type-resolver used to pick a concrete object at completion time.
#[derive(Clone)]
pub struct InterfaceType {
    /// The interface's name.
    pub name: String,
    /// The interface's description.
    pub description: Option<String>,
    /// Fields every implementer must provide, in declaration order.
    pub fields: IndexMap<String, Field>,
    /// Resolves a raw value to a concrete, implementing object type.
    pub type_resolver: Arc<dyn TypeResolver>,
}

/// A union type: a name, its member object type names, and the
/// type-resolver used to pick one at completion time.
#[derive(Clone)]
pub struct UnionType {
    /// The union's name.
    pub name: String,
    /// The union's description.
    pub description: Option<String>,
    /// Names of the object types that are members of this union.
    pub possible_types: Vec<String>,
    /// Resolves a raw value to a concrete, member object type.
    pub type_resolver: Arc<dyn TypeResolver>,
}

impl UnionType {
    /// Whether `name` names a member of this union.
    pub fn has_member(&self, name: &str) -> bool {
        self.possible_types.iter().any(|t| t == name)
    }
}

/// A field declared on an input object type.
#[derive(Clone)]
pub struct InputField {
    /// The field's name.
    pub name: String,
    /// The field's description.
    pub description: Option<String>,
    /// The field's declared type; must be an input type.
    pub field_type: Type,
    /// The field's default literal value, if any.
    pub default_value: Option<InputValue>,
}

impl InputField {
    /// Builds a required input field with no default.
    pub fn new(name: impl Into<String>, field_type: Type) -> Self {
        InputField {
            name: name.into(),
            description: None,
            field_type,
            default_value: None,
        }
    }

    /// Sets a default value.
    pub fn default_value(mut self, value: InputValue) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// An input object type: a name and an ordered map of input fields.
#[derive(Clone)]
pub struct InputObjectType {
    /// The input object's name.
    pub name: String,
    /// The input object's description.
    pub description: Option<String>,
    /// Fields, in declaration order.
    pub fields: IndexMap<String, InputField>,
}

/// Built-in scalars always registered on every schema.
pub mod builtin {
    use super::*;

    fn int_range_error(i: i64) -> InputCoercionError {
        InputCoercionError::new("Int", &InputValue::Int(i))
    }

    /// The `Int` scalar: a 32-bit signed integer.
    pub fn int() -> ScalarType {
        ScalarType {
            name: "Int".into(),
            description: Some("The `Int` scalar type represents non-fractional signed whole numeric values.".into()),
            specified_by_url: None,
            coerce: Arc::new(|v| match v {
                InputValue::Int(i) => i32::try_from(*i)
                    .map(ScalarValue::Int)
                    .map_err(|_| int_range_error(*i)),
                other => Err(InputCoercionError::new("Int", other)),
            }),
            serialize: Arc::new(|raw| match raw {
                RawValue::Int(i) => i32::try_from(*i)
                    .map(ScalarValue::Int)
                    .map_err(|_| format!("Int value {i} out of 32-bit range")),
                RawValue::Float(f) if f.fract() == 0.0 => Ok(ScalarValue::Int(*f as i32)),
                other => Err(format!("cannot serialize {other:?} as Int")),
            }),
        }
    }

    /// The `Float` scalar: an IEEE-754 double.
    pub fn float() -> ScalarType {
        ScalarType {
            name: "Float".into(),
            description: Some("The `Float` scalar type represents signed double-precision fractional values.".into()),
            specified_by_url: None,
            coerce: Arc::new(|v| match v {
                InputValue::Float(f) => Ok(ScalarValue::Float(*f)),
                InputValue::Int(i) => Ok(ScalarValue::Float(*i as f64)),
                other => Err(InputCoercionError::new("Float", other)),
            }),
            serialize: Arc::new(|raw| match raw {
                RawValue::Float(f) => Ok(ScalarValue::Float(*f)),
                RawValue::Int(i) => Ok(ScalarValue::Float(*i as f64)),
                other => Err(format!("cannot serialize {other:?} as Float")),
            }),
        }
    }

    /// The `String` scalar.
    pub fn string() -> ScalarType {
        ScalarType {
            name: "String".into(),
            description: Some("The `String` scalar type represents textual data as UTF-8 sequences.".into()),
            specified_by_url: None,
            coerce: Arc::new(|v| match v {
                InputValue::String(s) => Ok(ScalarValue::String(s.clone())),
                other => Err(InputCoercionError::new("String", other)),
            }),
            serialize: Arc::new(|raw| match raw {
                RawValue::String(s) => Ok(ScalarValue::String(s.clone())),
                other => Err(format!("cannot serialize {other:?} as String")),
            }),
        }
    }

    /// The `Boolean` scalar.
    pub fn boolean() -> ScalarType {
        ScalarType {
            name: "Boolean".into(),
            description: Some("The `Boolean` scalar type represents `true` or `false`.".into()),
            specified_by_url: None,
            coerce: Arc::new(|v| match v {
                InputValue::Boolean(b) => Ok(ScalarValue::Boolean(*b)),
                other => Err(InputCoercionError::new("Boolean", other)),
            }),
            serialize: Arc::new(|raw| match raw {
                RawValue::Boolean(b) => Ok(ScalarValue::Boolean(*b)),
                other => Err(format!("cannot serialize {other:?} as Boolean")),
            }),
        }
    }

    /// The `ID` scalar: accepts integers or strings on input, always
    /// serializes as a string.
    pub fn id() -> ScalarType {
        ScalarType {
            name: "ID".into(),
            description: Some("The `ID` scalar type represents a unique identifier, serialized as a String.".into()),
            specified_by_url: None,
            coerce: Arc::new(|v| match v {
                InputValue::String(s) => Ok(ScalarValue::String(s.clone())),
                InputValue::Int(i) => Ok(ScalarValue::String(i.to_string())),
                other => Err(InputCoercionError::new("ID", other)),
            }),
            serialize: Arc::new(|raw| match raw {
                RawValue::String(s) => Ok(ScalarValue::String(s.clone())),
                RawValue::Int(i) => Ok(ScalarValue::String(i.to_string())),
                other => Err(format!("cannot serialize {other:?} as ID")),
            }),
        }
    }
}
