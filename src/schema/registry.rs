//! The type registry (component A): holds every named type in a schema and
//! expands `LateBound` references against it.

use std::sync::Arc;

use derive_more::with_trait::Display;
use indexmap::IndexMap;

use super::meta::{EnumType, InputObjectType, InterfaceType, ObjectType, ScalarType, Type, UnionType};
use crate::ast;

/// The eight built-in introspection type names, reserved so a user schema
/// can't redefine them. This core doesn't populate their fields (schema
/// introspection is out of scope) but keeps the names off-limits so a
/// future introspection layer can claim them without a breaking change.
pub const RESERVED_TYPE_NAMES: &[&str] = &[
    "__Schema",
    "__Type",
    "__Field",
    "__InputValue",
    "__EnumValue",
    "__Directive",
    "__TypeKind",
    "__DirectiveLocation",
];

/// A fully-resolved named type, as stored in the registry.
#[derive(Clone)]
pub enum NamedType {
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
}

impl NamedType {
    /// The type's name.
    pub fn name(&self) -> &str {
        match self {
            NamedType::Scalar(t) => &t.name,
            NamedType::Enum(t) => &t.name,
            NamedType::Object(t) => &t.name,
            NamedType::Interface(t) => &t.name,
            NamedType::Union(t) => &t.name,
            NamedType::InputObject(t) => &t.name,
        }
    }

    /// Converts into the [`Type`] variant this named type corresponds to.
    pub fn into_type(self) -> Type {
        match self {
            NamedType::Scalar(t) => Type::Scalar(t),
            NamedType::Enum(t) => Type::Enum(t),
            NamedType::Object(t) => Type::Object(t),
            NamedType::Interface(t) => Type::Interface(t),
            NamedType::Union(t) => Type::Union(t),
            NamedType::InputObject(t) => Type::InputObject(t),
        }
    }
}

impl From<ScalarType> for NamedType {
    fn from(t: ScalarType) -> Self {
        NamedType::Scalar(Arc::new(t))
    }
}

impl From<EnumType> for NamedType {
    fn from(t: EnumType) -> Self {
        NamedType::Enum(Arc::new(t))
    }
}

impl From<ObjectType> for NamedType {
    fn from(t: ObjectType) -> Self {
        NamedType::Object(Arc::new(t))
    }
}

impl From<InterfaceType> for NamedType {
    fn from(t: InterfaceType) -> Self {
        NamedType::Interface(Arc::new(t))
    }
}

impl From<UnionType> for NamedType {
    fn from(t: UnionType) -> Self {
        NamedType::Union(Arc::new(t))
    }
}

impl From<InputObjectType> for NamedType {
    fn from(t: InputObjectType) -> Self {
        NamedType::InputObject(Arc::new(t))
    }
}

/// A failure building or validating a schema.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum SchemaError {
    /// A `LateBound` reference names a type not present in the registry.
    #[display("Unknown type \"{_0}\"")]
    UnknownType(String),
    /// The same type name was registered twice.
    #[display("Duplicate type \"{_0}\"")]
    DuplicateType(String),
    /// A user schema attempted to redefine a reserved introspection type.
    #[display("\"{_0}\" is a reserved introspection type name")]
    ReservedTypeName(String),
    /// A `NonNull` wraps another `NonNull`.
    #[display("NonNull may not wrap another NonNull")]
    NonNullWrapsNonNull,
    /// A type used in an input position is not an input type.
    #[display("\"{_0}\" cannot be used in an input position")]
    NotAnInputType(String),
    /// A type used in an output position is not an output type.
    #[display("\"{_0}\" cannot be used in an output position")]
    NotAnOutputType(String),
}

impl std::error::Error for SchemaError {}

/// Maps `typename -> Type` and expands `LateBound` references on demand.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, NamedType>,
}

impl TypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        TypeRegistry {
            types: IndexMap::new(),
        }
    }

    /// Registers a named type, rejecting duplicates and reserved names.
    pub fn register(&mut self, named: impl Into<NamedType>) -> Result<(), SchemaError> {
        let named = named.into();
        let name = named.name().to_owned();
        if RESERVED_TYPE_NAMES.contains(&name.as_str()) {
            return Err(SchemaError::ReservedTypeName(name));
        }
        if self.types.contains_key(&name) {
            return Err(SchemaError::DuplicateType(name));
        }
        self.types.insert(name, named);
        Ok(())
    }

    /// Looks up a named type, resolved to a [`Type`].
    pub fn get(&self, name: &str) -> Option<Type> {
        self.types.get(name).cloned().map(NamedType::into_type)
    }

    /// Resolves a `LateBound` reference, recursing through any `List`/
    /// `NonNull` wrappers already applied to it.
    pub fn resolve(&self, ty: &Type) -> Result<Type, SchemaError> {
        match ty {
            Type::LateBound(name) => self
                .get(name)
                .ok_or_else(|| SchemaError::UnknownType(name.clone())),
            Type::List(inner) => Ok(Type::List(Box::new(self.resolve(inner)?))),
            Type::NonNull(inner) => {
                let resolved = self.resolve(inner)?;
                if matches!(resolved, Type::NonNull(_)) {
                    return Err(SchemaError::NonNullWrapsNonNull);
                }
                Ok(Type::NonNull(Box::new(resolved)))
            }
            other => Ok(other.clone()),
        }
    }

    /// Resolves an AST type reference (`NamedType`/`ListType`/`NonNullType`)
    /// against this registry, recursively stripping the wrappers and
    /// looking up the terminal name.
    pub fn resolve_from_ast(&self, ty: &ast::Type) -> Result<Type, SchemaError> {
        match ty {
            ast::Type::Named(name) => self
                .get(name)
                .ok_or_else(|| SchemaError::UnknownType(name.clone())),
            ast::Type::List(inner) => Ok(Type::List(Box::new(self.resolve_from_ast(inner)?))),
            ast::Type::NonNull(inner) => {
                let resolved = self.resolve_from_ast(inner)?;
                if matches!(resolved, Type::NonNull(_)) {
                    return Err(SchemaError::NonNullWrapsNonNull);
                }
                Ok(Type::NonNull(Box::new(resolved)))
            }
        }
    }

    /// Validates that every `LateBound` reference reachable from the given
    /// roots resolves to a registered type, and that every input/output
    /// position holds a type valid for that position.
    pub fn validate(&self, roots: &[&Type]) -> Result<(), SchemaError> {
        let mut seen = std::collections::HashSet::new();
        for root in roots {
            self.validate_type(root, true, &mut seen)?;
        }
        Ok(())
    }

    fn validate_type(
        &self,
        ty: &Type,
        output_position: bool,
        seen: &mut std::collections::HashSet<String>,
    ) -> Result<(), SchemaError> {
        let resolved = self.resolve(ty)?;
        match &resolved {
            Type::List(inner) | Type::NonNull(inner) => {
                return self.validate_type(inner, output_position, seen);
            }
            _ => {}
        }
        if output_position && !resolved.is_output_type() {
            return Err(SchemaError::NotAnOutputType(
                resolved.name().unwrap_or_default().to_owned(),
            ));
        }
        if !output_position && !resolved.is_input_type() {
            return Err(SchemaError::NotAnInputType(
                resolved.name().unwrap_or_default().to_owned(),
            ));
        }
        let Some(name) = resolved.name() else {
            return Ok(());
        };
        if !seen.insert(name.to_owned()) {
            return Ok(());
        }
        match &resolved {
            Type::Object(obj) => {
                for field in obj.fields.values() {
                    self.validate_type(&field.field_type, true, seen)?;
                    for arg in field.arguments.values() {
                        self.validate_type(&arg.arg_type, false, seen)?;
                    }
                }
            }
            Type::Interface(iface) => {
                for field in iface.fields.values() {
                    self.validate_type(&field.field_type, true, seen)?;
                    for arg in field.arguments.values() {
                        self.validate_type(&arg.arg_type, false, seen)?;
                    }
                }
            }
            Type::Union(union) => {
                for member in &union.possible_types {
                    let member_ty = self
                        .get(member)
                        .ok_or_else(|| SchemaError::UnknownType(member.clone()))?;
                    self.validate_type(&member_ty, true, seen)?;
                }
            }
            Type::InputObject(input) => {
                for field in input.fields.values() {
                    self.validate_type(&field.field_type, false, seen)?;
                }
            }
            Type::Scalar(_) | Type::Enum(_) => {}
            Type::List(_) | Type::NonNull(_) | Type::LateBound(_) => unreachable!(),
        }
        Ok(())
    }
}
