//! Operation selection (§4.F.1) and mutation ordering: which operation runs
//! when a document defines more than one, the request-level errors raised
//! when none match, and the serial (not concurrent) execution of a
//! mutation's top-level fields.

use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use pretty_assertions::assert_eq;

use crate::{
    executor::{execute_sync, GraphQLError, Variables},
    schema::{
        meta::{Field, ObjectType},
        Schema,
    },
    types::{Arguments, Context, FieldResult, RawValue, Resolver},
    value::Value,
};

use super::fixtures::{boolean_type, build_schema_with_mutation, field_sel, map, mutation, non_null, operation, query};

#[test]
fn no_operation_name_with_single_operation_runs_it() {
    let schema = build_schema_with_mutation(vec![("dog", map(vec![("name", "Fido".into())]))], None);
    let document = query(None, vec![field_sel("dog")]);
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &Variables::new(), ctx).expect("executes");
    assert!(result.errors.is_empty());
}

#[test]
fn no_operation_name_with_multiple_operations_is_ambiguous() {
    let schema = build_schema_with_mutation(vec![("dog", map(vec![("name", "Fido".into())]))], None);
    let mut document = query(Some("A"), vec![field_sel("dog")]);
    document.extend(query(Some("B"), vec![field_sel("dog")]));
    let ctx: &Context = &();

    let err = execute_sync(&schema, &document, None, &Variables::new(), ctx)
        .expect_err("ambiguous without an operation name");
    assert!(matches!(err, GraphQLError::AmbiguousOperation));
}

#[test]
fn named_operation_not_found_is_a_request_error() {
    let schema = build_schema_with_mutation(vec![("dog", map(vec![("name", "Fido".into())]))], None);
    let document = query(Some("A"), vec![field_sel("dog")]);
    let ctx: &Context = &();

    let err = execute_sync(&schema, &document, Some("Missing"), &Variables::new(), ctx)
        .expect_err("no operation named \"Missing\"");
    assert!(matches!(err, GraphQLError::OperationNotFound(name) if name == "Missing"));
}

#[test]
fn document_with_no_operations_is_a_request_error() {
    let schema = build_schema_with_mutation(vec![("dog", map(vec![("name", "Fido".into())]))], None);
    let ctx: &Context = &();

    let err = execute_sync(&schema, &Vec::new(), None, &Variables::new(), ctx)
        .expect_err("a document with no operations can't be executed");
    assert!(matches!(err, GraphQLError::NoOperation));
}

#[test]
fn mutation_without_a_mutation_root_is_a_request_error() {
    let schema = build_schema_with_mutation(vec![("dog", map(vec![("name", "Fido".into())]))], None);
    let document = mutation(None, vec![field_sel("bark")]);
    let ctx: &Context = &();

    let err = execute_sync(&schema, &document, None, &Variables::new(), ctx)
        .expect_err("the schema declares no mutation type");
    assert!(matches!(err, GraphQLError::MutationNotSupported));
}

#[test]
fn subscription_operations_are_rejected() {
    let schema = build_schema_with_mutation(vec![("dog", map(vec![("name", "Fido".into())]))], None);
    let document = operation(crate::ast::OperationType::Subscription, None, vec![], vec![field_sel("dog")]);
    let ctx: &Context = &();

    let err = execute_sync(&schema, &document, None, &Variables::new(), ctx)
        .expect_err("subscription delivery is out of scope for this executor");
    assert!(matches!(err, GraphQLError::SubscriptionNotSupported));
}

/// Records the order in which each mutation field's resolver is invoked, so
/// the test can assert it matches document order rather than, say, the
/// reverse of `IndexMap` iteration or some other accidental ordering.
struct SerializingResolver {
    order: Mutex<Vec<&'static str>>,
}

impl Resolver for SerializingResolver {
    fn resolve(&self, _parent: &RawValue, _ctx: &Context, field_name: &str, _args: &Arguments) -> FieldResult<RawValue> {
        self.order.lock().unwrap().push(match field_name {
            "bark" => "bark",
            "meow" => "meow",
            other => panic!("unexpected mutation field {other}"),
        });
        Ok(RawValue::Boolean(true))
    }
}

#[test]
fn mutation_top_level_fields_execute_serially_in_document_order() {
    let resolver = Arc::new(SerializingResolver {
        order: Mutex::new(Vec::new()),
    });

    let mut fields = IndexMap::new();
    fields.insert("bark".to_owned(), Field::new("bark", non_null(boolean_type())));
    fields.insert("meow".to_owned(), Field::new("meow", non_null(boolean_type())));
    let mutation_root = ObjectType {
        name: "Mutation".into(),
        description: None,
        fields,
        interfaces: vec![],
        resolver: resolver.clone(),
    };
    let query_fields = {
        let mut fields = IndexMap::new();
        fields.insert("dog".to_owned(), Field::new("dog", non_null(boolean_type())));
        fields
    };
    let query_root = ObjectType {
        name: "Query".into(),
        description: None,
        fields: query_fields,
        interfaces: vec![],
        resolver: resolver.clone(),
    };
    let schema = Schema::build(query_root, Some(mutation_root), None, vec![]).expect("schema builds");

    let document = mutation(None, vec![field_sel("bark"), field_sel("meow")]);
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &Variables::new(), ctx).expect("executes");

    assert!(result.errors.is_empty());
    assert_eq!(*resolver.order.lock().unwrap(), vec!["bark", "meow"]);

    let data = result.data.unwrap();
    assert_eq!(data.as_object().unwrap().get_field_value("bark"), Some(&Value::scalar(true)));
    assert_eq!(data.as_object().unwrap().get_field_value("meow"), Some(&Value::scalar(true)));
}
