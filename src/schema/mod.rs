//! The type system: the type algebra (component B), the type registry
//! (component A), and the schema built on top of them.

pub mod meta;
pub mod registry;
#[allow(clippy::module_inception)]
mod schema;

pub use self::{
    registry::{NamedType, SchemaError, TypeRegistry},
    schema::{DirectiveLocation, DirectiveType, Schema},
};
