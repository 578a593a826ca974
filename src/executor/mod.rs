//! The executor (component F): operation selection, field collection,
//! selection-set execution, and value completion.
//!
//! This is the one component that ties every other piece together: it reads
//! a [`Schema`] and a [`Document`], walks the selected operation's selection
//! set against the registry's types, invokes [`crate::types::Resolver`]s, and
//! completes the raw values they return into a [`Value`] tree with field
//! errors recorded and bubbled per the non-null propagation rules.

use std::{collections::HashSet, fmt, sync::Arc};

use derive_more::with_trait::Display;
use indexmap::IndexMap;
use log::{debug, trace};
use serde::{Serialize, Serializer};

use crate::{
    ast::{self, Definition, Document, InputValue, OperationDefinition, OperationType, Selection},
    parser::{SourcePosition, Spanning},
    schema::{
        meta::{Argument, ObjectType, Type as SchemaType},
        Schema, TypeRegistry,
    },
    types::{Arguments as ResolvedArguments, Context, FieldError, RawValue},
    value::{Object, Value},
};

/// A raw, undecoded variable map supplied by the caller: JSON-like literal
/// values keyed by variable name (without the leading `$`).
///
/// Ordered (not a raw `HashMap`) so that variable coercion error messages are
/// stable across runs when more than one variable fails.
pub type Variables = IndexMap<String, InputValue>;

/// One step of a response path: a field's response key, or a list index.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A field's response key (its alias, or its name if unaliased).
    Field(String),
    /// An index into a list value.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => f.write_str(name),
            PathSegment::Index(i) => write!(f, "{i}"),
        }
    }
}

impl Serialize for PathSegment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PathSegment::Field(name) => serializer.serialize_str(name),
            PathSegment::Index(i) => serializer.serialize_u64(*i as u64),
        }
    }
}

/// A `{line, column}` pair attached to a recorded error, both 1-based per the
/// GraphQL response format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
}

impl From<&SourcePosition> for SourceLocation {
    fn from(pos: &SourcePosition) -> Self {
        SourceLocation {
            line: pos.line() + 1,
            column: pos.column() + 1,
        }
    }
}

/// One error recorded against the execution state (§3.4/§7): a message, the
/// response path it occurred at, and the source locations it traces back to.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExecutionError {
    /// Human-readable description.
    pub message: String,
    /// The response path, from the operation root to the failing field.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathSegment>,
    /// Source locations of the selections that produced this error.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<SourceLocation>,
    /// Structured metadata carried by the originating [`FieldError`], if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

/// A failure coercing a variable.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
#[display("variable \"${name}\": {message}")]
pub struct VariableCoercionError {
    /// The offending variable's name, without the leading `$`.
    pub name: String,
    /// Human-readable description of the failure.
    pub message: String,
}

impl std::error::Error for VariableCoercionError {}

/// A request-level failure: the operation couldn't even be selected, or
/// variable coercion failed before any field was resolved. Produces a
/// response with `errors` set and `data` absent entirely (§7).
#[derive(Clone, Debug, Display)]
pub enum GraphQLError {
    /// No operation named this was found in the document.
    #[display("no operation named \"{_0}\" found in the document")]
    OperationNotFound(String),
    /// No operation name was given and the document defines more than one.
    #[display("document defines multiple operations; an operation name must be specified")]
    AmbiguousOperation,
    /// The document defines no operations at all.
    #[display("the document defines no operations")]
    NoOperation,
    /// The operation is a `subscription`, which this executor does not
    /// deliver (out of scope; see crate docs).
    #[display("subscriptions are not supported by this executor")]
    SubscriptionNotSupported,
    /// The operation is a `mutation` but the schema declares no mutation
    /// root type.
    #[display("the schema defines no mutation type")]
    MutationNotSupported,
    /// A variable failed to coerce.
    #[display("{_0}")]
    VariableCoercion(VariableCoercionError),
}

impl std::error::Error for GraphQLError {}

impl Serialize for GraphQLError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("GraphQLError", 1)?;
        s.serialize_field("message", &self.to_string())?;
        s.end()
    }
}

/// The outcome of a successful operation selection and variable coercion:
/// `data` plus whatever field errors were recorded while producing it.
///
/// `data` is `None` exactly when a root-level non-null field's error bubbled
/// all the way out (§4.F.5) — a distinct condition from the request-level
/// failure represented by [`GraphQLError`].
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionResult {
    /// The response data, or `None` if a non-null violation bubbled to the root.
    pub data: Option<Value>,
    /// Field errors recorded while executing the operation, in the order
    /// first observed, deduplicated by `(path, message)`.
    pub errors: Vec<ExecutionError>,
}

/// Executes `document` against `schema`, selecting the operation named
/// `operation_name` (or the sole operation, if the document defines exactly
/// one and no name was given).
pub fn execute_sync(
    schema: &Schema,
    document: &Document,
    operation_name: Option<&str>,
    raw_variables: &Variables,
    context: &Context,
) -> Result<ExecutionResult, GraphQLError> {
    let operation = select_operation(document, operation_name)?;
    debug!(
        "executing {} operation {:?}",
        operation.item.operation_type,
        operation.item.name.as_ref().map(|n| n.item.as_str())
    );

    let root_type = match operation.item.operation_type {
        OperationType::Query => Arc::clone(schema.query_type()),
        OperationType::Mutation => schema
            .mutation_type()
            .cloned()
            .ok_or(GraphQLError::MutationNotSupported)?,
        OperationType::Subscription => return Err(GraphQLError::SubscriptionNotSupported),
    };

    let variables = coerce_variables(schema, &operation.item, raw_variables)?;

    let mut executor = Executor {
        schema,
        document,
        variables,
        context,
        errors: Vec::new(),
        seen_errors: HashSet::new(),
    };
    let data = executor
        .execute_selection_set(&root_type, &operation.item.selection_set, &RawValue::Null, &[])
        .ok();

    Ok(ExecutionResult {
        data,
        errors: executor.errors,
    })
}

fn select_operation<'doc>(
    document: &'doc Document,
    operation_name: Option<&str>,
) -> Result<&'doc Spanning<OperationDefinition>, GraphQLError> {
    let operations: Vec<&Spanning<OperationDefinition>> = document
        .iter()
        .filter_map(|def| match def {
            Definition::Operation(op) => Some(op),
            Definition::Fragment(_) => None,
        })
        .collect();

    match operation_name {
        Some(name) => operations
            .into_iter()
            .find(|op| op.item.name.as_ref().is_some_and(|n| n.item == name))
            .ok_or_else(|| GraphQLError::OperationNotFound(name.to_owned())),
        None => match operations.len() {
            0 => Err(GraphQLError::NoOperation),
            1 => Ok(operations[0]),
            _ => Err(GraphQLError::AmbiguousOperation),
        },
    }
}

/// Coerces an operation's declared variables against the raw variable map
/// supplied by the caller (§4.E, variable coercion).
fn coerce_variables(
    schema: &Schema,
    operation: &OperationDefinition,
    raw_variables: &Variables,
) -> Result<Variables, GraphQLError> {
    let mut coerced = Variables::new();
    let Some(definitions) = &operation.variable_definitions else {
        return Ok(coerced);
    };

    for (name, definition) in &definitions.item {
        let var_name = name.item.as_str();
        let var_type = schema
            .registry()
            .resolve_from_ast(&definition.var_type.item)
            .map_err(|e| {
                GraphQLError::VariableCoercion(VariableCoercionError {
                    name: var_name.to_owned(),
                    message: e.to_string(),
                })
            })?;

        let provided = raw_variables.get(var_name);
        let has_value = provided.is_some_and(|v| !v.is_null());

        if !has_value {
            if let Some(default) = &definition.default_value {
                let coerced_default = coerce_input_literal(schema.registry(), &var_type, &default.item)
                    .map_err(|message| {
                        GraphQLError::VariableCoercion(VariableCoercionError {
                            name: var_name.to_owned(),
                            message,
                        })
                    })?;
                coerced.insert(var_name.to_owned(), coerced_default);
                continue;
            }
            if var_type.is_non_null() {
                return Err(GraphQLError::VariableCoercion(VariableCoercionError {
                    name: var_name.to_owned(),
                    message: format!("expected a value for non-null type \"{var_type}\""),
                }));
            }
            coerced.insert(var_name.to_owned(), InputValue::Null);
            continue;
        }

        let value = provided.expect("has_value implies provided is Some");
        let coerced_value =
            coerce_input_literal(schema.registry(), &var_type, value).map_err(|message| {
                GraphQLError::VariableCoercion(VariableCoercionError {
                    name: var_name.to_owned(),
                    message,
                })
            })?;
        coerced.insert(var_name.to_owned(), coerced_value);
    }

    Ok(coerced)
}

/// Coerces a literal (or already-substituted) [`InputValue`] against a
/// declared schema type — shared by variable-default and argument coercion
/// (§4.B scalar/enum/list/input-object coercion, §4.E).
fn coerce_input_literal(
    registry: &TypeRegistry,
    ty: &SchemaType,
    value: &InputValue,
) -> Result<InputValue, String> {
    let resolved = registry.resolve(ty).map_err(|e| e.to_string())?;

    if let SchemaType::NonNull(inner) = &resolved {
        if value.is_null() {
            return Err(format!("expected a non-null value for type \"{resolved}\""));
        }
        return coerce_input_literal(registry, inner, value);
    }

    if value.is_null() {
        return Ok(InputValue::Null);
    }

    match &resolved {
        SchemaType::List(inner) => match value {
            InputValue::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(Spanning::unlocated(coerce_input_literal(registry, inner, &item.item)?));
                }
                Ok(InputValue::List(out))
            }
            other => Ok(InputValue::List(vec![Spanning::unlocated(coerce_input_literal(
                registry, inner, other,
            )?)])),
        },
        SchemaType::Scalar(scalar) => (scalar.coerce)(value)
            .map(scalar_value_to_input_value)
            .map_err(|e| e.to_string()),
        SchemaType::Enum(enum_type) => {
            let name = match value {
                InputValue::Enum(n) | InputValue::String(n) => n.as_str(),
                other => return Err(format!("expected an enum value, found {other}")),
            };
            if enum_type.value_by_name(name).is_some() {
                Ok(InputValue::Enum(name.to_owned()))
            } else {
                Err(format!("\"{name}\" is not a value of enum \"{}\"", enum_type.name))
            }
        }
        SchemaType::InputObject(input_type) => {
            let Some(fields) = value.to_object_value() else {
                return Err(format!("expected an input object of type \"{}\"", input_type.name));
            };
            let mut out = Vec::with_capacity(input_type.fields.len());
            for field in input_type.fields.values() {
                let field_value = match fields.get(field.name.as_str()) {
                    Some(v) => coerce_input_literal(registry, &field.field_type, v)?,
                    None => match &field.default_value {
                        Some(default) => coerce_input_literal(registry, &field.field_type, default)?,
                        None => {
                            let field_ty = registry.resolve(&field.field_type).map_err(|e| e.to_string())?;
                            if field_ty.is_non_null() {
                                return Err(format!(
                                    "missing required field \"{}\" of input object \"{}\"",
                                    field.name, input_type.name
                                ));
                            }
                            InputValue::Null
                        }
                    },
                };
                out.push((Spanning::unlocated(field.name.clone()), Spanning::unlocated(field_value)));
            }
            Ok(InputValue::Object(out))
        }
        SchemaType::Object(_) | SchemaType::Interface(_) | SchemaType::Union(_) => {
            Err("output types cannot be used in an input position".into())
        }
        SchemaType::NonNull(_) | SchemaType::LateBound(_) => {
            unreachable!("registry::resolve never returns LateBound, and NonNull is handled above")
        }
    }
}

fn scalar_value_to_input_value(v: crate::value::ScalarValue) -> InputValue {
    use crate::value::ScalarValue;
    match v {
        ScalarValue::Boolean(b) => InputValue::Boolean(b),
        ScalarValue::Int(i) => InputValue::Int(i64::from(i)),
        ScalarValue::Float(f) => InputValue::Float(f),
        ScalarValue::String(s) => InputValue::String(s),
    }
}

/// Coerces a field's (or directive's) arguments (§4.E, argument coercion).
fn coerce_arguments(
    registry: &TypeRegistry,
    declared: &IndexMap<String, Argument>,
    ast_args: Option<&ast::Arguments>,
    variables: &Variables,
) -> Result<ResolvedArguments, FieldError> {
    let mut out = IndexMap::new();
    for arg in declared.values() {
        let literal = ast_args
            .and_then(|args| args.get(&arg.name))
            .map(|s| s.item.clone().into_const(variables));
        let value = match literal {
            Some(v) => v,
            None => arg.default_value.clone().unwrap_or(InputValue::Null),
        };

        let resolved_ty = registry.resolve(&arg.arg_type).map_err(|e| FieldError::new(e.to_string()))?;
        if resolved_ty.is_non_null() && value.is_null() {
            return Err(FieldError::new(format!(
                "argument \"{}\" of required type \"{}\" was not provided",
                arg.name, resolved_ty
            )));
        }

        let coerced = coerce_input_literal(registry, &arg.arg_type, &value).map_err(FieldError::new)?;
        out.insert(arg.name.clone(), coerced);
    }
    Ok(ResolvedArguments::new(out))
}

/// Whether a selection survives directive evaluation (§4.D): included iff no
/// `@skip(if: true)` and no `@include(if: false)` is present. A directive's
/// arguments are coerced the same way a field's are (§4.E), through its
/// declared [`crate::schema::DirectiveType`] rather than by hand.
fn should_include(
    schema: &Schema,
    directives: Option<&Vec<Spanning<ast::Directive>>>,
    variables: &Variables,
) -> Result<bool, FieldError> {
    let Some(directives) = directives else {
        return Ok(true);
    };

    let mut skip = false;
    let mut include = true;
    for directive in directives {
        let name = directive.item.name.item.as_str();
        if name != "skip" && name != "include" {
            continue;
        }
        let declared = schema
            .directive(name)
            .ok_or_else(|| FieldError::new(format!("unknown directive \"@{name}\"")))?;

        let args = coerce_arguments(
            schema.registry(),
            &declared.arguments,
            directive.item.arguments.as_ref().map(|s| &s.item),
            variables,
        )?;
        let if_value = match args.get_raw("if") {
            Some(InputValue::Boolean(b)) => *b,
            Some(other) => {
                return Err(FieldError::new(format!(
                    "argument \"if\" of directive \"@{name}\" must be a Boolean, found {other}"
                )));
            }
            None => {
                return Err(FieldError::new(format!("directive \"@{name}\" requires argument \"if\"")));
            }
        };
        match name {
            "skip" if if_value => skip = true,
            "include" if !if_value => include = false,
            _ => {}
        }
    }
    Ok(!skip && include)
}

fn find_fragment<'doc>(document: &'doc Document, name: &str) -> Option<&'doc ast::FragmentDefinition> {
    document.iter().find_map(|def| match def {
        Definition::Fragment(f) if f.item.name.item == name => Some(&f.item),
        _ => None,
    })
}

/// Whether `object_type` satisfies a fragment's type condition (§4.F.2).
fn does_fragment_type_apply(schema: &Schema, object_type: &ObjectType, fragment_type_name: &str) -> bool {
    match schema.registry().get(fragment_type_name) {
        Some(SchemaType::Object(o)) => o.name == object_type.name,
        Some(SchemaType::Interface(_)) => object_type.implements(fragment_type_name),
        Some(SchemaType::Union(u)) => u.has_member(&object_type.name),
        _ => false,
    }
}

/// Flattens `selections` into an ordered `response_key -> [Field]` grouping,
/// honoring directives and recursing through fragment spreads and inline
/// fragments (§4.F.2). `visited_fragments` guards against spread cycles
/// (testable property 2).
fn collect_fields<'doc>(
    schema: &Schema,
    document: &'doc Document,
    object_type: &ObjectType,
    selections: &'doc [Selection],
    variables: &Variables,
    visited_fragments: &mut HashSet<String>,
    grouped: &mut IndexMap<String, Vec<&'doc ast::Field>>,
) -> Result<(), FieldError> {
    for selection in selections {
        match selection {
            Selection::Field(field) => {
                if !should_include(schema, field.item.directives.as_ref(), variables)? {
                    continue;
                }
                grouped
                    .entry(field.item.response_key().to_owned())
                    .or_default()
                    .push(&field.item);
            }
            Selection::FragmentSpread(spread) => {
                if !should_include(schema, spread.item.directives.as_ref(), variables)? {
                    continue;
                }
                let name = spread.item.name.item.as_str();
                if !visited_fragments.insert(name.to_owned()) {
                    trace!("fragment spread cycle guard tripped on \"{name}\"");
                    continue;
                }
                let Some(fragment) = find_fragment(document, name) else {
                    continue;
                };
                if !does_fragment_type_apply(schema, object_type, &fragment.type_condition.item) {
                    continue;
                }
                collect_fields(
                    schema,
                    document,
                    object_type,
                    &fragment.selection_set,
                    variables,
                    visited_fragments,
                    grouped,
                )?;
            }
            Selection::InlineFragment(inline) => {
                if !should_include(schema, inline.item.directives.as_ref(), variables)? {
                    continue;
                }
                if let Some(type_condition) = &inline.item.type_condition {
                    if !does_fragment_type_apply(schema, object_type, &type_condition.item) {
                        continue;
                    }
                }
                collect_fields(
                    schema,
                    document,
                    object_type,
                    &inline.item.selection_set,
                    variables,
                    visited_fragments,
                    grouped,
                )?;
            }
        }
    }
    Ok(())
}

fn merge_selection_sets(field_list: &[&ast::Field]) -> Vec<Selection> {
    field_list
        .iter()
        .filter_map(|f| f.selection_set.as_ref())
        .flat_map(|s| s.iter().cloned())
        .collect()
}

fn field_locations(field_list: &[&ast::Field]) -> Vec<SourceLocation> {
    field_list
        .first()
        .map(|f| vec![SourceLocation::from(f.name.start())])
        .unwrap_or_default()
}

/// Per-operation execution state (§3.4): the schema/document being executed
/// against, coerced variables, the opaque context, and the accumulated,
/// deduplicated error list.
struct Executor<'a> {
    schema: &'a Schema,
    document: &'a Document,
    variables: Variables,
    context: &'a Context,
    errors: Vec<ExecutionError>,
    seen_errors: HashSet<(Vec<PathSegment>, String)>,
}

impl Executor<'_> {
    fn record_error(&mut self, path: &[PathSegment], locations: Vec<SourceLocation>, err: FieldError) {
        let key = (path.to_vec(), err.message.clone());
        if !self.seen_errors.insert(key) {
            return;
        }
        self.errors.push(ExecutionError {
            message: err.message,
            path: path.to_vec(),
            locations,
            extensions: err.extensions,
        });
    }

    /// Whether `field_type` is non-null, after expanding any `LateBound`
    /// reference — used to decide whether a swallowed error propagates past
    /// this position or stops here as a `null`.
    fn is_non_null(&self, field_type: &SchemaType) -> bool {
        self.schema
            .registry()
            .resolve(field_type)
            .map(|t| t.is_non_null())
            .unwrap_or(false)
    }

    /// Executes a selection set against `object_type`/`raw_value`, producing
    /// an object value, or `Err(())` if a non-null violation below this level
    /// must propagate past the whole object (§4.F.3, §4.F.5).
    fn execute_selection_set(
        &mut self,
        object_type: &Arc<ObjectType>,
        selections: &[Selection],
        raw_value: &RawValue,
        path: &[PathSegment],
    ) -> Result<Value, ()> {
        let mut grouped: IndexMap<String, Vec<&ast::Field>> = IndexMap::new();
        let mut visited = HashSet::new();
        if let Err(e) = collect_fields(
            self.schema,
            self.document,
            object_type,
            selections,
            &self.variables,
            &mut visited,
            &mut grouped,
        ) {
            self.record_error(path, Vec::new(), e);
            return Err(());
        }

        let mut object = Object::with_capacity(grouped.len());
        let mut propagate = false;
        for (response_key, field_list) in &grouped {
            let mut field_path = path.to_vec();
            field_path.push(PathSegment::Field(response_key.clone()));
            match self.execute_field(object_type, field_list, raw_value, &field_path) {
                Ok(value) => {
                    object.add_field(response_key.clone(), value);
                }
                Err(()) => propagate = true,
            }
        }

        if propagate {
            Err(())
        } else {
            Ok(Value::Object(object))
        }
    }

    /// Resolves and completes one grouped field (§4.F.3).
    fn execute_field(
        &mut self,
        object_type: &Arc<ObjectType>,
        field_list: &[&ast::Field],
        parent_raw: &RawValue,
        path: &[PathSegment],
    ) -> Result<Value, ()> {
        let representative = field_list[0];
        let field_name = representative.name.item.as_str();

        if field_name == "__typename" {
            return Ok(Value::scalar(object_type.name.clone()));
        }
        if field_name == "__schema" && Arc::ptr_eq(object_type, self.schema.query_type()) {
            self.record_error(
                path,
                field_locations(field_list),
                FieldError::new("schema introspection is not implemented by this executor"),
            );
            return Err(());
        }

        let Some(schema_field) = object_type.fields.get(field_name) else {
            self.record_error(
                path,
                field_locations(field_list),
                FieldError::new(format!(
                    "Unknown field \"{field_name}\" on type \"{}\"",
                    object_type.name
                )),
            );
            return Err(());
        };

        let args = match coerce_arguments(
            self.schema.registry(),
            &schema_field.arguments,
            representative.arguments.as_ref().map(|s| &s.item),
            &self.variables,
        ) {
            Ok(a) => a,
            Err(e) => {
                let non_null = self.is_non_null(&schema_field.field_type);
                self.record_error(path, field_locations(field_list), e);
                return if non_null { Err(()) } else { Ok(Value::Null) };
            }
        };

        let raw = match object_type.resolver.resolve(parent_raw, self.context, field_name, &args) {
            Ok(v) => v,
            Err(e) => {
                let non_null = self.is_non_null(&schema_field.field_type);
                self.record_error(path, field_locations(field_list), e);
                return if non_null { Err(()) } else { Ok(Value::Null) };
            }
        };

        self.complete_value(path, &schema_field.field_type, field_list, raw, &object_type.name, field_name)
    }

    /// Normalizes a raw resolver value against its declared type (§4.F.4),
    /// forcing any [`crate::types::Lazy`] encountered along the way (the
    /// sole suspension point per §5).
    #[allow(clippy::too_many_arguments, reason = "mirrors the spec's complete_value(path, type, fields, raw, vars) signature plus the owner/field name needed for the non-null error message")]
    fn complete_value(
        &mut self,
        path: &[PathSegment],
        field_type: &SchemaType,
        field_list: &[&ast::Field],
        raw: RawValue,
        owner_type_name: &str,
        field_name: &str,
    ) -> Result<Value, ()> {
        let raw = match raw {
            RawValue::Lazy(lazy) => match lazy.value() {
                Ok(v) => v,
                Err(e) => {
                    let non_null = self.is_non_null(field_type);
                    self.record_error(path, field_locations(field_list), e);
                    return if non_null { Err(()) } else { Ok(Value::Null) };
                }
            },
            other => other,
        };

        let resolved_ty = match self.schema.registry().resolve(field_type) {
            Ok(t) => t,
            Err(e) => {
                let non_null = self.is_non_null(field_type);
                self.record_error(path, field_locations(field_list), FieldError::new(e.to_string()));
                return if non_null { Err(()) } else { Ok(Value::Null) };
            }
        };

        if let SchemaType::NonNull(inner) = &resolved_ty {
            if raw.is_null() {
                self.record_error(
                    path,
                    field_locations(field_list),
                    FieldError::new(format!(
                        "Cannot return null for non-nullable field {owner_type_name}.{field_name}"
                    )),
                );
                return Err(());
            }
            let completed = self.complete_value(path, inner, field_list, raw, owner_type_name, field_name)?;
            return if completed.is_null() { Err(()) } else { Ok(completed) };
        }

        if raw.is_null() {
            return Ok(Value::Null);
        }

        match &resolved_ty {
            SchemaType::List(inner) => Ok(self
                .complete_list(path, inner, field_list, raw, owner_type_name, field_name)
                .unwrap_or(Value::Null)),
            SchemaType::Scalar(scalar) => match (scalar.serialize)(&raw) {
                Ok(v) => Ok(Value::scalar(v)),
                Err(msg) => {
                    self.record_error(path, field_locations(field_list), FieldError::new(msg));
                    Ok(Value::Null)
                }
            },
            SchemaType::Enum(enum_type) => match enum_type.value_by_internal(&raw) {
                Some(v) => Ok(Value::scalar(v.name.clone())),
                None => {
                    self.record_error(
                        path,
                        field_locations(field_list),
                        FieldError::new(format!(
                            "raw value {raw:?} does not match any value of enum \"{}\"",
                            enum_type.name
                        )),
                    );
                    Ok(Value::Null)
                }
            },
            SchemaType::Object(obj) => {
                let merged = merge_selection_sets(field_list);
                Ok(self.execute_selection_set(obj, &merged, &raw, path).unwrap_or(Value::Null))
            }
            SchemaType::Interface(iface) => {
                let Some(type_name) = iface.type_resolver.resolve_type(&raw, self.context) else {
                    self.record_error(
                        path,
                        field_locations(field_list),
                        FieldError::new(format!(
                            "could not resolve a concrete type for interface \"{}\"",
                            iface.name
                        )),
                    );
                    return Ok(Value::Null);
                };
                let Some(SchemaType::Object(obj)) = self.schema.registry().get(&type_name) else {
                    self.record_error(
                        path,
                        field_locations(field_list),
                        FieldError::new(format!(
                            "type \"{type_name}\" returned by the type-resolver is not an object type"
                        )),
                    );
                    return Ok(Value::Null);
                };
                if !obj.implements(&iface.name) {
                    self.record_error(
                        path,
                        field_locations(field_list),
                        FieldError::new(format!(
                            "type \"{type_name}\" does not implement interface \"{}\"",
                            iface.name
                        )),
                    );
                    return Ok(Value::Null);
                }
                let merged = merge_selection_sets(field_list);
                Ok(self.execute_selection_set(&obj, &merged, &raw, path).unwrap_or(Value::Null))
            }
            SchemaType::Union(union) => {
                let Some(type_name) = union.type_resolver.resolve_type(&raw, self.context) else {
                    self.record_error(
                        path,
                        field_locations(field_list),
                        FieldError::new(format!("could not resolve a concrete type for union \"{}\"", union.name)),
                    );
                    return Ok(Value::Null);
                };
                if !union.has_member(&type_name) {
                    self.record_error(
                        path,
                        field_locations(field_list),
                        FieldError::new(format!(
                            "type \"{type_name}\" is not a member of union \"{}\"",
                            union.name
                        )),
                    );
                    return Ok(Value::Null);
                }
                let Some(SchemaType::Object(obj)) = self.schema.registry().get(&type_name) else {
                    self.record_error(
                        path,
                        field_locations(field_list),
                        FieldError::new(format!("member \"{type_name}\" of union is not an object type")),
                    );
                    return Ok(Value::Null);
                };
                let merged = merge_selection_sets(field_list);
                Ok(self.execute_selection_set(&obj, &merged, &raw, path).unwrap_or(Value::Null))
            }
            SchemaType::InputObject(_) => {
                unreachable!("registry::validate rejects input types in output position")
            }
            SchemaType::NonNull(_) | SchemaType::LateBound(_) => {
                unreachable!("handled above / resolved by registry::resolve")
            }
        }
    }

    fn complete_list(
        &mut self,
        path: &[PathSegment],
        inner: &SchemaType,
        field_list: &[&ast::Field],
        raw: RawValue,
        owner_type_name: &str,
        field_name: &str,
    ) -> Result<Value, ()> {
        // testable property 7: a resolver returning a single `T` for a `[T]`
        // field is treated as a one-element list.
        let items = match raw {
            RawValue::List(items) => items,
            other => vec![other],
        };

        let mut out = Vec::with_capacity(items.len());
        let mut propagate = false;
        for (index, item) in items.into_iter().enumerate() {
            let mut item_path = path.to_vec();
            item_path.push(PathSegment::Index(index));
            match self.complete_value(&item_path, inner, field_list, item, owner_type_name, field_name) {
                Ok(v) => out.push(v),
                Err(()) => {
                    propagate = true;
                    break;
                }
            }
        }

        if propagate {
            Err(())
        } else {
            Ok(Value::List(out))
        }
    }
}
