//! Scenario 5 from the crate glossary: the `Pet` interface and `CatOrDog`
//! union, resolved at completion time via [`MarkerTypeResolver`](super::fixtures::MarkerTypeResolver),
//! plus the error paths when a type-resolver can't (or shouldn't) find a
//! concrete type.

use pretty_assertions::assert_eq;

use crate::{
    executor::{execute_sync, Variables},
    types::Context,
    value::Value,
};

use super::fixtures::{build_schema, field_sel, field_sub, inline_fragment, map, query};

#[test]
fn scenario_5_pet_interface_resolves_to_dog_via_inline_fragment() {
    let schema = build_schema(vec![(
        "pet",
        map(vec![("__typename", "Dog".into()), ("name", "Fido".into()), ("barkVolume", 5_i32.into())]),
    )]);
    let document = query(
        None,
        vec![field_sub(
            "pet",
            vec![field_sel("__typename"), field_sel("name"), inline_fragment(Some("Dog"), vec![field_sel("barkVolume")])],
        )],
    );
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &Variables::new(), ctx).expect("executes");

    assert!(result.errors.is_empty());
    let pet = result.data.unwrap();
    let pet = pet.as_object().unwrap().get_field_value("pet").unwrap().as_object().unwrap();

    assert_eq!(pet.get_field_value("__typename"), Some(&Value::scalar("Dog")));
    assert_eq!(pet.get_field_value("name"), Some(&Value::scalar("Fido")));
    assert_eq!(pet.get_field_value("barkVolume"), Some(&Value::scalar(5_i32)));
}

#[test]
fn scenario_5_pet_interface_resolves_to_cat_via_inline_fragment() {
    let schema = build_schema(vec![(
        "pet",
        map(vec![("__typename", "Cat".into()), ("name", "Whiskers".into()), ("meowVolume", 3_i32.into())]),
    )]);
    let document = query(
        None,
        vec![field_sub(
            "pet",
            vec![
                field_sel("name"),
                inline_fragment(Some("Dog"), vec![field_sel("barkVolume")]),
                inline_fragment(Some("Cat"), vec![field_sel("meowVolume")]),
            ],
        )],
    );
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &Variables::new(), ctx).expect("executes");

    assert!(result.errors.is_empty());
    let pet = result.data.unwrap();
    let pet = pet.as_object().unwrap().get_field_value("pet").unwrap().as_object().unwrap();

    assert_eq!(pet.get_field_value("meowVolume"), Some(&Value::scalar(3_i32)));
    assert!(!pet.contains_field("barkVolume"));
}

#[test]
fn cat_or_dog_union_resolves_through_inline_fragments() {
    let schema = build_schema(vec![(
        "catOrDog",
        map(vec![("__typename", "Dog".into()), ("name", "Fido".into()), ("barkVolume", 9_i32.into())]),
    )]);
    let document = query(
        None,
        vec![field_sub(
            "catOrDog",
            vec![
                inline_fragment(Some("Dog"), vec![field_sel("name"), field_sel("barkVolume")]),
                inline_fragment(Some("Cat"), vec![field_sel("meowVolume")]),
            ],
        )],
    );
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &Variables::new(), ctx).expect("executes");

    assert!(result.errors.is_empty());
    let value = result.data.unwrap();
    let value = value.as_object().unwrap().get_field_value("catOrDog").unwrap().as_object().unwrap();

    assert_eq!(value.get_field_value("name"), Some(&Value::scalar("Fido")));
    assert_eq!(value.get_field_value("barkVolume"), Some(&Value::scalar(9_i32)));
    assert!(!value.contains_field("meowVolume"));
}

#[test]
fn interface_field_nulls_out_when_the_type_resolver_finds_no_match() {
    let schema = build_schema(vec![("pet", map(vec![("name", "Fido".into())]))]);
    let document = query(None, vec![field_sub("pet", vec![field_sel("name")])]);
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &Variables::new(), ctx).expect("executes");

    let data = result.data.expect("pet is a nullable field");
    assert!(data.as_object().unwrap().get_field_value("pet").unwrap().is_null());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.contains("could not resolve a concrete type for interface \"Pet\""));
}

#[test]
fn interface_field_nulls_out_when_the_resolved_type_does_not_implement_it() {
    let schema = build_schema(vec![
        ("pet", map(vec![("__typename", "Human".into()), ("name", "Alice".into())])),
        ("human", map(vec![("name", "Alice".into())])),
    ]);
    let document = query(None, vec![field_sub("pet", vec![field_sel("name")])]);
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &Variables::new(), ctx).expect("executes");

    let data = result.data.expect("pet is a nullable field");
    assert!(data.as_object().unwrap().get_field_value("pet").unwrap().is_null());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.contains("does not implement interface \"Pet\""));
}

#[test]
fn union_field_nulls_out_when_the_resolved_type_is_not_a_member() {
    let schema = build_schema(vec![("catOrDog", map(vec![("__typename", "Human".into()), ("name", "Alice".into())]))]);
    let document = query(None, vec![field_sub("catOrDog", vec![inline_fragment(Some("Dog"), vec![field_sel("name")])])]);
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &Variables::new(), ctx).expect("executes");

    let data = result.data.expect("catOrDog is a nullable field");
    assert!(data.as_object().unwrap().get_field_value("catOrDog").unwrap().is_null());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.contains("is not a member of union \"CatOrDog\""));
}
