//! The resolver ABI: the boundary between the executor and user code.
//!
//! A [`Resolver`] produces a [`RawValue`] for an object's field; a
//! [`TypeResolver`] picks the concrete object type behind an interface or
//! union. Neither trait is generic over a scalar type — this core builds
//! schemas dynamically, as data, rather than deriving them from Rust types,
//! so there is nothing to be generic over.

mod resolver;

pub use self::resolver::{Arguments, Context, FieldError, FieldResult, Lazy, RawValue};

use std::any::Any;

/// Produces a field's raw value.
///
/// Each [`crate::schema::meta::ObjectType`] carries exactly one resolver,
/// shared across every selection of that type. `parent` is the (already
/// completed) raw value the enclosing field resolved to — `Null` for the
/// root operation type, whatever this object's own resolver returned
/// otherwise.
pub trait Resolver: Send + Sync {
    /// Resolves one field.
    fn resolve(
        &self,
        parent: &RawValue,
        ctx: &Context,
        field_name: &str,
        args: &Arguments,
    ) -> FieldResult<RawValue>;
}

/// Picks the concrete object type behind an interface or union value.
///
/// Returns the name of an [`crate::schema::meta::ObjectType`] that is a
/// member of the abstract type; the executor raises a field error if the
/// name doesn't resolve to a member.
pub trait TypeResolver: Send + Sync {
    /// Resolves the concrete type name for `object`.
    fn resolve_type(&self, object: &RawValue, ctx: &Context) -> Option<String>;
}

/// Blanket impl so a bare function can be used as a [`Resolver`].
impl<F> Resolver for F
where
    F: Fn(&RawValue, &Context, &str, &Arguments) -> FieldResult<RawValue> + Send + Sync,
{
    fn resolve(
        &self,
        parent: &RawValue,
        ctx: &Context,
        field_name: &str,
        args: &Arguments,
    ) -> FieldResult<RawValue> {
        self(parent, ctx, field_name, args)
    }
}

/// Blanket impl so a bare function can be used as a [`TypeResolver`].
impl<F> TypeResolver for F
where
    F: Fn(&RawValue, &Context) -> Option<String> + Send + Sync,
{
    fn resolve_type(&self, object: &RawValue, ctx: &Context) -> Option<String> {
        self(object, ctx)
    }
}

/// Downcasts an opaque context to a concrete Rust type.
///
/// A small convenience for resolvers whose host always supplies the same
/// context type.
pub fn downcast_context<T: Any>(ctx: &Context) -> Option<&T> {
    ctx.downcast_ref::<T>()
}
