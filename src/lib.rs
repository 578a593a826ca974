//! A GraphQL execution core: a runtime-constructed type system, a resolver
//! ABI, and a synchronous executor that walks a parsed query document
//! against a built [`Schema`] and produces a response tree.
//!
//! What this crate does *not* do, by design (see `Non-goals` in the crate's
//! design notes): lex or parse query strings or SDL, transport requests over
//! HTTP or any other protocol, populate the introspection schema, deliver
//! subscriptions, or validate a document against the schema before execution.
//! Each of those is a separate collaborator's job; this crate accepts an
//! already-built [`ast::Document`] and [`Schema`] and executes them.
//!
//! # Modules
//!
//! - [`schema`] — the type registry and type algebra (components A/B) plus
//!   the schema built on top of them.
//! - [`types`] — the resolver ABI (component C): [`types::Resolver`],
//!   [`types::TypeResolver`], [`types::RawValue`], [`types::Lazy`].
//! - [`ast`] — the document AST the executor walks, plus the `InputValue`
//!   literal space.
//! - [`value`] — the completed output value space ([`value::Value`]) that
//!   gets serialized as a response's `data`.
//! - [`executor`] — component F: operation selection, variable/argument
//!   coercion, directive evaluation, field collection, and value completion.
//! - [`http`] — the `{data, errors}` response envelope a host transport
//!   serializes.

pub mod ast;
pub mod executor;
pub mod http;
pub mod parser;
pub mod schema;
pub mod types;
pub mod value;

#[cfg(test)]
mod executor_tests;

pub use crate::{
    ast::{Definition, Document, FromInputValue, InputValue, OperationDefinition, OperationType, Selection, ToInputValue, Type},
    executor::{execute_sync, ExecutionError, ExecutionResult, GraphQLError, PathSegment, SourceLocation, Variables},
    parser::{Span, SourcePosition, Spanning},
    schema::{meta, DirectiveLocation, DirectiveType, NamedType, Schema, SchemaError, TypeRegistry},
    types::{downcast_context, Arguments, Context, FieldError, FieldResult, Lazy, RawValue, Resolver, TypeResolver},
    value::{InputCoercionError, Object, ScalarValue, Value},
};
