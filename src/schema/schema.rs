//! The schema (component A's root): query/mutation/subscription root types,
//! the directive list, and orphan types, built on top of a [`TypeRegistry`].

use std::sync::Arc;

use indexmap::IndexMap;

use super::{
    meta::{builtin, Argument, ObjectType, Type},
    registry::{NamedType, SchemaError, TypeRegistry},
};

/// Where a directive may legally be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectiveLocation {
    /// A field selection.
    Field,
    /// A fragment spread.
    FragmentSpread,
    /// An inline fragment.
    InlineFragment,
}

/// A directive declaration.
///
/// Only `@skip`/`@include` carry executable semantics in this core (§4.D);
/// anything else is accepted into the type system but inert at execution
/// time, matching a schema that declares a custom directive without a core
/// that knows how to act on it.
#[derive(Clone)]
pub struct DirectiveType {
    /// The directive's name, without the leading `@`.
    pub name: String,
    /// The directive's description.
    pub description: Option<String>,
    /// Locations where this directive may be applied.
    pub locations: Vec<DirectiveLocation>,
    /// The directive's arguments.
    pub arguments: IndexMap<String, Argument>,
}

impl DirectiveType {
    fn skip() -> Self {
        DirectiveType {
            name: "skip".into(),
            description: Some("Directs the executor to skip this field or fragment when the `if` argument is true.".into()),
            locations: vec![
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
            arguments: {
                let mut args = IndexMap::new();
                let if_type = Type::NonNull(Box::new(Type::Scalar(Arc::new(builtin::boolean()))));
                args.insert("if".into(), Argument::new("if", if_type));
                args
            },
        }
    }

    fn include() -> Self {
        DirectiveType {
            name: "include".into(),
            ..Self::skip()
        }
    }
}

/// A built schema: its root operation types, directive declarations, and the
/// [`TypeRegistry`] resolving every type name referenced from them.
#[derive(Clone)]
pub struct Schema {
    registry: TypeRegistry,
    query_type: Arc<ObjectType>,
    mutation_type: Option<Arc<ObjectType>>,
    subscription_type: Option<Arc<ObjectType>>,
    directives: IndexMap<String, DirectiveType>,
}

impl Schema {
    /// Builds a schema from its root operation types and every other named
    /// type reachable from them (plus any orphan types supplied explicitly,
    /// for union/interface members otherwise unreachable from a root).
    pub fn build(
        query_type: ObjectType,
        mutation_type: Option<ObjectType>,
        subscription_type: Option<ObjectType>,
        orphan_types: Vec<NamedType>,
    ) -> Result<Schema, SchemaError> {
        let mut registry = TypeRegistry::new();

        registry.register(builtin::int())?;
        registry.register(builtin::float())?;
        registry.register(builtin::string())?;
        registry.register(builtin::boolean())?;
        registry.register(builtin::id())?;

        let query_type = Arc::new(query_type);
        registry.register(NamedType::Object(Arc::clone(&query_type)))?;

        let mutation_type = mutation_type.map(Arc::new);
        if let Some(m) = &mutation_type {
            registry.register(NamedType::Object(Arc::clone(m)))?;
        }

        let subscription_type = subscription_type.map(Arc::new);
        if let Some(s) = &subscription_type {
            registry.register(NamedType::Object(Arc::clone(s)))?;
        }

        for orphan in orphan_types {
            registry.register(orphan)?;
        }

        let mut roots = vec![Type::Object(Arc::clone(&query_type))];
        if let Some(m) = &mutation_type {
            roots.push(Type::Object(Arc::clone(m)));
        }
        if let Some(s) = &subscription_type {
            roots.push(Type::Object(Arc::clone(s)));
        }
        let root_refs: Vec<&Type> = roots.iter().collect();
        registry.validate(&root_refs)?;

        let mut directives = IndexMap::new();
        for d in [DirectiveType::skip(), DirectiveType::include()] {
            directives.insert(d.name.clone(), d);
        }

        Ok(Schema {
            registry,
            query_type,
            mutation_type,
            subscription_type,
            directives,
        })
    }

    /// The query root type.
    pub fn query_type(&self) -> &Arc<ObjectType> {
        &self.query_type
    }

    /// The mutation root type, if the schema declares one.
    pub fn mutation_type(&self) -> Option<&Arc<ObjectType>> {
        self.mutation_type.as_ref()
    }

    /// The subscription root type, if the schema declares one. Delivery of
    /// subscription results is out of scope for this core; the executor
    /// rejects a `subscription` operation outright (§4.F.1).
    pub fn subscription_type(&self) -> Option<&Arc<ObjectType>> {
        self.subscription_type.as_ref()
    }

    /// The schema's type registry.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Looks up a directive declaration by name.
    pub fn directive(&self, name: &str) -> Option<&DirectiveType> {
        self.directives.get(name)
    }
}
