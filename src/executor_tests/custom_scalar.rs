//! A user-defined custom scalar (§4.B): the `coerce`/`serialize` contract
//! exercised independently of the five built-ins, on both the argument and
//! output sides.

use std::sync::Arc;

use indexmap::IndexMap;
use pretty_assertions::assert_eq;

use crate::{
    ast::InputValue,
    executor::{execute_sync, Variables},
    schema::{
        meta::{Argument, Field, ObjectType, ScalarType, Type as SchemaType},
        Schema,
    },
    types::{Arguments, Context, FieldResult, RawValue, Resolver},
    value::{InputCoercionError, ScalarValue, Value},
};

use super::fixtures::{field_sel, field_with_args, query};

fn positive_int() -> ScalarType {
    ScalarType {
        name: "PositiveInt".into(),
        description: Some("A 32-bit integer that cannot be negative.".into()),
        specified_by_url: None,
        coerce: Arc::new(|v| match v {
            InputValue::Int(i) if *i >= 0 => i32::try_from(*i)
                .map(ScalarValue::Int)
                .map_err(|_| InputCoercionError::new("PositiveInt", v)),
            other => Err(InputCoercionError::new("PositiveInt", other)),
        }),
        serialize: Arc::new(|raw| match raw {
            RawValue::Int(i) if *i >= 0 => i32::try_from(*i)
                .map(ScalarValue::Int)
                .map_err(|_| format!("PositiveInt value {i} out of 32-bit range")),
            other => Err(format!("cannot serialize {other:?} as PositiveInt")),
        }),
    }
}

fn positive_int_type() -> SchemaType {
    SchemaType::Scalar(Arc::new(positive_int()))
}

struct ScalarTestResolver(IndexMap<String, RawValue>);

impl Resolver for ScalarTestResolver {
    fn resolve(&self, _parent: &RawValue, _ctx: &Context, field_name: &str, args: &Arguments) -> FieldResult<RawValue> {
        match field_name {
            "scaled" => {
                let by = args.get::<i32>("by").unwrap_or(0);
                Ok(RawValue::Int(i64::from(by) * 2))
            }
            _ => Ok(self.0.get(field_name).cloned().unwrap_or(RawValue::Null)),
        }
    }
}

fn build_schema(distance: RawValue) -> Schema {
    let mut fields = IndexMap::new();
    fields.insert("distance".into(), Field::new("distance", positive_int_type()));
    fields.insert(
        "scaled".into(),
        Field::new("scaled", positive_int_type()).argument(Argument::new("by", SchemaType::NonNull(Box::new(positive_int_type())))),
    );
    let query = ObjectType {
        name: "Query".into(),
        description: None,
        fields,
        interfaces: vec![],
        resolver: Arc::new(ScalarTestResolver(IndexMap::from([("distance".to_owned(), distance)]))),
    };
    Schema::build(query, None, None, vec![]).expect("fixture schema is valid")
}

#[test]
fn argument_coercion_succeeds_and_output_serializes() {
    let schema = build_schema(RawValue::Int(10));
    let document = query(None, vec![field_with_args("scaled", vec![("by", InputValue::Int(21))], vec![])]);
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &Variables::new(), ctx).expect("executes");

    assert!(result.errors.is_empty());
    let data = result.data.unwrap();
    assert_eq!(data.as_object().unwrap().get_field_value("scaled"), Some(&Value::scalar(42_i32)));
}

#[test]
fn negative_argument_literal_is_a_coercion_error() {
    let schema = build_schema(RawValue::Int(10));
    let document = query(None, vec![field_with_args("scaled", vec![("by", InputValue::Int(-3))], vec![])]);
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &Variables::new(), ctx).expect("executes");

    let data = result.data.unwrap();
    assert!(data.as_object().unwrap().get_field_value("scaled").unwrap().is_null());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.contains("PositiveInt"));
}

#[test]
fn output_serialization_succeeds_for_a_nonnegative_raw_value() {
    let schema = build_schema(RawValue::Int(7));
    let document = query(None, vec![field_sel("distance")]);
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &Variables::new(), ctx).expect("executes");

    assert!(result.errors.is_empty());
    let data = result.data.unwrap();
    assert_eq!(data.as_object().unwrap().get_field_value("distance"), Some(&Value::scalar(7_i32)));
}

#[test]
fn output_serialization_failure_nulls_the_field_and_records_an_error() {
    let schema = build_schema(RawValue::Int(-1));
    let document = query(None, vec![field_sel("distance")]);
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &Variables::new(), ctx).expect("executes");

    let data = result.data.expect("a nullable scalar field nulls out rather than the whole response");
    assert!(data.as_object().unwrap().get_field_value("distance").unwrap().is_null());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.contains("PositiveInt"));
}
