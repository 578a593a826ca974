//! `@skip`/`@include` evaluation (§4.D): scenario 3 from the crate glossary
//! and testable property 4 (skip/include equivalence).

use pretty_assertions::assert_eq;

use crate::{
    ast,
    executor::{execute_sync, PathSegment, Variables},
    types::Context,
};

use super::fixtures::{build_schema, directive, field, field_sel, field_sub, fragment_def, fragment_spread_with_directives, inline_fragment_with_directives, map, operation};

fn bool_var_type() -> ast::Type {
    ast::Type::NonNull(Box::new(ast::Type::Named("Boolean".into())))
}

#[test]
fn scenario_3_skip_with_variable() {
    let schema = build_schema(vec![("dog", map(vec![("name", "Fido".into()), ("nickname", "Rex".into())]))]);
    let document = operation(
        ast::OperationType::Query,
        None,
        vec![("skipNickname", bool_var_type(), None)],
        vec![field_sub(
            "dog",
            vec![
                field_sel("name"),
                field(
                    "nickname",
                    None,
                    None,
                    vec![directive("skip", ast::InputValue::Variable("skipNickname".into()))],
                ),
            ],
        )],
    );
    let mut vars = Variables::new();
    vars.insert("skipNickname".into(), ast::InputValue::Boolean(true));
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &vars, ctx).expect("executes");

    assert!(result.errors.is_empty());
    let dog = result.data.unwrap();
    let dog = dog.as_object().unwrap().get_field_value("dog").unwrap().as_object().unwrap();
    assert!(!dog.contains_field("nickname"));
    assert_eq!(dog.field_count(), 1);
}

#[test]
fn skip_false_keeps_the_field() {
    let schema = build_schema(vec![("dog", map(vec![("name", "Fido".into()), ("nickname", "Rex".into())]))]);
    let document = operation(
        ast::OperationType::Query,
        None,
        vec![("skipNickname", bool_var_type(), None)],
        vec![field_sub(
            "dog",
            vec![
                field_sel("name"),
                field(
                    "nickname",
                    None,
                    None,
                    vec![directive("skip", ast::InputValue::Variable("skipNickname".into()))],
                ),
            ],
        )],
    );
    let mut vars = Variables::new();
    vars.insert("skipNickname".into(), ast::InputValue::Boolean(false));
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &vars, ctx).expect("executes");

    assert!(result.errors.is_empty());
    let dog = result.data.unwrap();
    let dog = dog.as_object().unwrap().get_field_value("dog").unwrap().as_object().unwrap();
    assert_eq!(dog.field_count(), 2);
}

#[test]
fn include_false_is_equivalent_to_skip_true() {
    let schema = build_schema(vec![("dog", map(vec![("name", "Fido".into()), ("nickname", "Rex".into())]))]);

    let skip_doc = operation(
        ast::OperationType::Query,
        None,
        vec![],
        vec![field_sub(
            "dog",
            vec![field_sel("name"), field("nickname", None, None, vec![directive("skip", ast::InputValue::Boolean(true))])],
        )],
    );
    let include_doc = operation(
        ast::OperationType::Query,
        None,
        vec![],
        vec![field_sub(
            "dog",
            vec![field_sel("name"), field("nickname", None, None, vec![directive("include", ast::InputValue::Boolean(false))])],
        )],
    );
    let ctx: &Context = &();

    let skip_result = execute_sync(&schema, &skip_doc, None, &Variables::new(), ctx).expect("executes");
    let include_result = execute_sync(&schema, &include_doc, None, &Variables::new(), ctx).expect("executes");

    assert_eq!(skip_result.data, include_result.data);
}

#[test]
fn skip_true_wins_over_include_true_on_the_same_selection() {
    let schema = build_schema(vec![("dog", map(vec![("name", "Fido".into()), ("nickname", "Rex".into())]))]);
    let document = operation(
        ast::OperationType::Query,
        None,
        vec![],
        vec![field_sub(
            "dog",
            vec![
                field_sel("name"),
                field(
                    "nickname",
                    None,
                    None,
                    vec![directive("skip", ast::InputValue::Boolean(true)), directive("include", ast::InputValue::Boolean(true))],
                ),
            ],
        )],
    );
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &Variables::new(), ctx).expect("executes");

    assert!(result.errors.is_empty());
    let dog = result.data.unwrap();
    let dog = dog.as_object().unwrap().get_field_value("dog").unwrap().as_object().unwrap();
    assert!(!dog.contains_field("nickname"));
}

#[test]
fn skip_applies_to_fragment_spreads_and_inline_fragments() {
    let schema = build_schema(vec![("dog", map(vec![("name", "Fido".into()), ("nickname", "Rex".into())]))]);
    let mut document = operation(
        ast::OperationType::Query,
        None,
        vec![],
        vec![field_sub(
            "dog",
            vec![
                field_sel("name"),
                fragment_spread_with_directives("nick", vec![directive("include", ast::InputValue::Boolean(false))]),
                inline_fragment_with_directives(None, vec![directive("skip", ast::InputValue::Boolean(true))], vec![field_sel("barkVolume")]),
            ],
        )],
    );
    document.push(fragment_def("nick", "Dog", vec![field_sel("nickname")]));
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &Variables::new(), ctx).expect("executes");

    assert!(result.errors.is_empty());
    let dog = result.data.unwrap();
    let dog = dog.as_object().unwrap().get_field_value("dog").unwrap().as_object().unwrap();
    assert!(!dog.contains_field("nickname"));
    assert!(!dog.contains_field("barkVolume"));
    assert_eq!(dog.field_count(), 1);
}

fn directive_without_if_argument(name: &str) -> ast::Directive {
    ast::Directive {
        name: crate::parser::Spanning::unlocated(name.to_owned()),
        arguments: None,
    }
}

#[test]
fn missing_if_argument_is_a_field_error() {
    use crate::value::Value;

    let schema = build_schema(vec![("dog", map(vec![("name", "Fido".into())])), ("human", map(vec![("name", "Alice".into())]))]);
    let document = operation(
        ast::OperationType::Query,
        None,
        vec![],
        vec![
            field_sub(
                "dog",
                vec![
                    field_sel("name"),
                    field(
                        "nickname",
                        None,
                        None,
                        vec![directive_without_if_argument("skip")],
                    ),
                ],
            ),
            field_sub("human", vec![field_sel("name")]),
        ],
    );
    let ctx: &Context = &();

    let result = execute_sync(&schema, &document, None, &Variables::new(), ctx).expect("executes");
    let data = result.data.expect("only the dog object nulls out, not the whole response");

    let dog_value = data.as_object().unwrap().get_field_value("dog").unwrap();
    assert!(dog_value.is_null());
    let human = data.as_object().unwrap().get_field_value("human").unwrap().as_object().unwrap();
    assert_eq!(human.get_field_value("name"), Some(&Value::scalar("Alice")));

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].path, vec![PathSegment::Field("dog".into())]);
    assert!(result.errors[0].message.contains("requires argument \"if\""));
}
