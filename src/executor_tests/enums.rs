//! Scenario 4 from the crate glossary: `doesKnowCommand(dogCommand: SIT)`,
//! the `SLEEP`-is-not-a-`DogCommand` coercion error, and enum output
//! serialization via [`EnumType::value_by_internal`](crate::schema::meta::EnumType::value_by_internal).

use std::sync::Arc;

use indexmap::IndexMap;
use pretty_assertions::assert_eq;

use crate::{
    ast::InputValue,
    executor::{execute_sync, Variables},
    schema::{
        meta::{Argument, Field, ObjectType},
        NamedType, Schema,
    },
    types::{Arguments, Context, FieldResult, RawValue, Resolver},
    value::Value,
};

use super::fixtures::{boolean_type, dog_command_enum, field_sel, field_with_args, late, non_null, query};

struct CommandResolver(RawValue);

impl Resolver for CommandResolver {
    fn resolve(&self, _parent: &RawValue, _ctx: &Context, field_name: &str, args: &Arguments) -> FieldResult<RawValue> {
        match field_name {
            "doesKnowCommand" => Ok(RawValue::Boolean(args.contains("dogCommand"))),
            "favoriteCommand" => Ok(self.0.clone()),
            _ => Ok(RawValue::Null),
        }
    }
}

fn build_schema(favorite_command: RawValue) -> Schema {
    let mut fields = IndexMap::new();
    fields.insert(
        "doesKnowCommand".into(),
        Field::new("doesKnowCommand", non_null(boolean_type())).argument(Argument::new("dogCommand", non_null(late("DogCommand")))),
    );
    fields.insert("favoriteCommand".into(), Field::new("favoriteCommand", late("DogCommand")));
    let query = ObjectType {
        name: "Query".into(),
        description: None,
        fields,
        interfaces: vec![],
        resolver: Arc::new(CommandResolver(favorite_command)),
    };
    Schema::build(query, None, None, vec![NamedType::Enum(Arc::new(dog_command_enum()))]).expect("fixture schema is valid")
}

#[test]
fn scenario_4_does_know_command_with_a_valid_enum_literal() {
    let schema = build_schema(RawValue::Null);
    let document = query(None, vec![field_with_args("doesKnowCommand", vec![("dogCommand", InputValue::Enum("SIT".into()))], vec![])]);
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &Variables::new(), ctx).expect("executes");

    assert!(result.errors.is_empty());
    let data = result.data.unwrap();
    assert_eq!(data.as_object().unwrap().get_field_value("doesKnowCommand"), Some(&Value::scalar(true)));
}

#[test]
fn sleep_is_not_a_dog_command_and_nulls_the_entire_response() {
    let schema = build_schema(RawValue::Null);
    let document = query(None, vec![field_with_args("doesKnowCommand", vec![("dogCommand", InputValue::Enum("SLEEP".into()))], vec![])]);
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &Variables::new(), ctx).expect("executes");

    assert!(result.data.is_none(), "doesKnowCommand is non-null with no nullable ancestor above the root");
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.contains("\"SLEEP\" is not a value of enum \"DogCommand\""));
}

#[test]
fn favorite_command_serializes_its_internal_value() {
    let schema = build_schema(RawValue::String("DOWN".into()));
    let document = query(None, vec![field_sel("favoriteCommand")]);
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &Variables::new(), ctx).expect("executes");

    assert!(result.errors.is_empty());
    let data = result.data.unwrap();
    assert_eq!(data.as_object().unwrap().get_field_value("favoriteCommand"), Some(&Value::scalar("DOWN")));
}

#[test]
fn favorite_command_serialization_failure_nulls_the_field_not_the_response() {
    let schema = build_schema(RawValue::String("SLEEP".into()));
    let document = query(None, vec![field_sel("favoriteCommand")]);
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &Variables::new(), ctx).expect("executes");

    let data = result.data.expect("favoriteCommand is nullable, so only it nulls out");
    assert!(data.as_object().unwrap().get_field_value("favoriteCommand").unwrap().is_null());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.contains("does not match any value of enum"));
}
