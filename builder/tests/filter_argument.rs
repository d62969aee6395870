//! End-to-end tests: filter text in, SQL predicate out

use std::collections::BTreeSet;

use gql_builder::argument::{
    CompareOp, FilterArgument, FilterError, FilterErrorKind, FilterLimits, FilterValue,
    LiteralError, OperatorRegistry, Operation, Placeholder, RenderOptions, Scalar, SqlArgument,
    SqlParams, filter_argument_type, parse_filter_json, parse_filter_literal,
};

fn render(text: &str) -> String {
    let limits = FilterLimits::default();
    let input = parse_filter_literal(text, &limits).unwrap();
    let mut filter = FilterArgument::new().with_limits(limits);
    filter.validate(&input).unwrap();
    filter.render()
}

fn reject(text: &str) -> FilterError {
    let input = parse_filter_literal(text, &FilterLimits::default()).unwrap();
    let mut filter = FilterArgument::new();
    filter.validate(&input).unwrap_err()
}

#[test]
fn renders_comparisons_joined_with_and() {
    assert_eq!(
        render(r#"{age: {gt: 18}, name: {eq: "Bob"}}"#),
        "age > 18 AND name = 'Bob'"
    );
}

#[test]
fn renders_multiple_operators_on_one_field() {
    assert_eq!(
        render("{age: {gte: 18, lt: 65}}"),
        "age >= 18 AND age < 65"
    );
}

#[test]
fn empty_filter_renders_empty_predicate() {
    assert_eq!(render("{}"), "");
    assert_eq!(render("{age: {}}"), "");
}

#[test]
fn escapes_string_operands() {
    assert_eq!(
        render(r#"{name: {eq: "O'Brien"}}"#),
        "name = 'O''Brien'"
    );
    assert_eq!(
        render(r#"{name: {eq: "x' OR '1'='1"}}"#),
        "name = 'x'' OR ''1''=''1'"
    );
}

#[test]
fn backslashes_stay_inside_the_string_literal() {
    let limits = FilterLimits::default();
    let input = parse_filter_json(r#"{"name": {"eq": "\\' OR 1=1 -- "}}"#, &limits).unwrap();
    let mut filter = FilterArgument::new();
    filter.validate(&input).unwrap();
    assert_eq!(filter.render(), r"name = '\'' OR 1=1 -- '");

    let mut params = SqlParams::default();
    let sql = filter.to_sql(&mut params, &RenderOptions::default());
    assert_eq!(sql, "name = ?");
    assert_eq!(params.values, vec![r"\' OR 1=1 -- "]);
}

#[test]
fn surrogate_pair_escapes_agree_across_inputs() {
    let limits = FilterLimits::default();
    let from_literal = parse_filter_literal(r#"{name: {eq: "\uD83D\uDE00"}}"#, &limits).unwrap();
    let from_json = parse_filter_json(r#"{"name": {"eq": "\uD83D\uDE00"}}"#, &limits).unwrap();
    assert_eq!(from_literal, from_json);
    assert_eq!(
        from_literal.as_map().unwrap()["name"].as_map().unwrap()["eq"],
        FilterValue::String("\u{1F600}".into())
    );
}

#[test]
fn enum_values_render_as_strings() {
    assert_eq!(render("{status: {eq: ACTIVE}}"), "status = 'ACTIVE'");
}

#[test]
fn null_comparisons_become_null_checks() {
    assert_eq!(render("{deleted_at: {eq: null}}"), "deleted_at IS NULL");
    assert_eq!(render("{deleted_at: {ne: null}}"), "deleted_at IS NOT NULL");
    assert_eq!(render("{deleted_at: {isNull: false}}"), "deleted_at IS NOT NULL");
}

#[test]
fn unbound_variables_decode_as_null() {
    assert_eq!(render("{deleted_at: {eq: $cutoff}}"), "deleted_at IS NULL");
}

#[test]
fn renders_membership_and_ranges() {
    assert_eq!(
        render(r#"{status: {in: ["a", "b"]}}"#),
        "status IN ('a', 'b')"
    );
    assert_eq!(render("{id: {nin: [1, 2, 3]}}"), "id NOT IN (1, 2, 3)");
    assert_eq!(render("{id: {in: []}}"), "1=0");
    assert_eq!(render("{id: {nin: []}}"), "1=1");
    assert_eq!(
        render("{age: {between: [18, 65]}}"),
        "age BETWEEN 18 AND 65"
    );
}

#[test]
fn renders_pattern_operators() {
    assert_eq!(
        render(r#"{name: {contains: "50%"}}"#),
        r"name LIKE '%50\%%' ESCAPE '\'"
    );
    assert_eq!(
        render(r#"{name: {startsWith: "Bo"}}"#),
        r"name LIKE 'Bo%' ESCAPE '\'"
    );
    assert_eq!(render(r#"{name: {like: "B_b%"}}"#), "name LIKE 'B_b%'");
}

#[test]
fn renders_boolean_composition() {
    assert_eq!(
        render("{age: {not: {between: [18, 65]}}}"),
        "NOT (age BETWEEN 18 AND 65)"
    );
    assert_eq!(
        render("{age: {or: [{lt: 18}, {gt: 65, lt: 100}]}}"),
        "(age < 18 OR (age > 65 AND age < 100))"
    );
}

#[test]
fn dotted_fields_are_column_references() {
    let input = parse_filter_json(r#"{"user.age": {"gt": 1}}"#, &FilterLimits::default()).unwrap();
    let mut filter = FilterArgument::new();
    filter.validate(&input).unwrap();
    assert_eq!(filter.render(), "user.age > 1");
}

#[test]
fn unsupported_operator_fails_whole_argument() {
    let err = reject("{age: {bogusOp: 1}, name: {eq: \"Bob\"}}");
    assert_eq!(err.kind(), FilterErrorKind::UnsupportedOperator);
    assert_eq!(err.code(), "UNSUPPORTED_FILTER_OPERATOR");
    assert!(err.to_string().contains("bogusOp"));
}

#[test]
fn failed_validation_leaves_no_partial_predicate() {
    let limits = FilterLimits::default();
    let mut filter = FilterArgument::new();

    let good = parse_filter_literal("{age: {gt: 18}}", &limits).unwrap();
    filter.validate(&good).unwrap();
    assert_eq!(filter.render(), "age > 18");

    let bad = parse_filter_literal(r#"{age: {gt: 18}, name: {gt: [1]}}"#, &limits).unwrap();
    let err = filter.validate(&bad).unwrap_err();
    assert_eq!(err.kind(), FilterErrorKind::InvalidOperand);
    assert!(filter.is_empty());
    assert_eq!(filter.render(), "");
}

#[test]
fn rejects_malformed_shapes() {
    let input = parse_filter_literal("[1, 2]", &FilterLimits::default()).unwrap();
    let err = FilterArgument::new().validate(&input).unwrap_err();
    assert_eq!(err, FilterError::NotAMap { found: "list" });

    let err = reject("{age: 18}");
    assert_eq!(err.kind(), FilterErrorKind::Shape);
    assert!(matches!(err, FilterError::FieldShape { ref field, .. } if field == "age"));
}

#[test]
fn rejects_invalid_field_names() {
    let input = parse_filter_json(r#"{"age; DROP TABLE t": {"eq": 1}}"#, &FilterLimits::default())
        .unwrap();
    let err = FilterArgument::new().validate(&input).unwrap_err();
    assert_eq!(err.code(), "INVALID_FILTER_FIELD");
}

#[test]
fn enforces_allowed_fields() {
    let limits = FilterLimits {
        allowed_fields: Some(BTreeSet::from(["age".to_string()])),
        ..Default::default()
    };
    let input = parse_filter_literal("{salary: {gt: 1}}", &limits).unwrap();
    let err = FilterArgument::new()
        .with_limits(limits)
        .validate(&input)
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_FILTER_COLUMN");
}

#[test]
fn enforces_operation_limit() {
    let limits = FilterLimits {
        max_operations: 2,
        ..Default::default()
    };
    let input = parse_filter_literal("{a: {eq: 1}, b: {eq: 2}, c: {eq: 3}}", &limits).unwrap();
    let err = FilterArgument::new()
        .with_limits(limits)
        .validate(&input)
        .unwrap_err();
    assert_eq!(err, FilterError::TooManyOperations { max: 2 });
}

#[test]
fn enforces_input_limits() {
    let limits = FilterLimits {
        max_input_bytes: 8,
        ..Default::default()
    };
    let err = parse_filter_literal("{age: {gt: 18}}", &limits).unwrap_err();
    assert_eq!(err, LiteralError::TooLarge { max: 8 });

    let limits = FilterLimits {
        max_depth: 2,
        ..Default::default()
    };
    let err = parse_filter_literal("{a: {not: {eq: 1}}}", &limits).unwrap_err();
    assert_eq!(err, LiteralError::TooDeep { max: 2 });
    let err = parse_filter_json(r#"{"a": {"not": {"eq": 1}}}"#, &limits).unwrap_err();
    assert_eq!(err, LiteralError::TooDeep { max: 2 });
}

#[test]
fn literal_and_json_inputs_agree() {
    let limits = FilterLimits::default();
    let from_literal =
        parse_filter_literal(r#"{age: {gt: 18}, name: {in: ["a", "b"]}}"#, &limits).unwrap();
    let from_json =
        parse_filter_json(r#"{"name": {"in": ["a", "b"]}, "age": {"gt": 18}}"#, &limits).unwrap();
    assert_eq!(from_literal, from_json);
}

#[test]
fn parameterized_rendering_binds_operands() {
    let limits = FilterLimits::default();
    let input = parse_filter_literal(
        r#"{active: {eq: true}, age: {between: [18, 65]}, name: {contains: "o"}}"#,
        &limits,
    )
    .unwrap();
    let mut filter = FilterArgument::new();
    filter.validate(&input).unwrap();

    let mut params = SqlParams::default();
    let options = RenderOptions {
        alias: Some("u".to_string()),
        placeholder: Placeholder::Dollar,
    };
    let sql = filter.to_sql(&mut params, &options);
    assert_eq!(
        sql,
        r"u.active = TRUE AND u.age BETWEEN $1 AND $2 AND u.name LIKE $3 ESCAPE '\'"
    );
    assert_eq!(params.values, vec!["18", "65", "%o%"]);
}

#[test]
fn custom_registry_extends_operators() {
    let mut registry = OperatorRegistry::standard();
    registry.register("is", "a string, number or boolean", |_, _, field, operand| {
        let FilterValue::String(value) = operand else {
            return Err(FilterError::invalid_operand(field, "is", "a string"));
        };
        Ok(Operation::Compare {
            field: field.to_string(),
            op: CompareOp::Eq,
            value: Scalar::String(value.clone()),
        })
    });

    let input = parse_filter_literal(r#"{name: {is: "Bob"}}"#, &FilterLimits::default()).unwrap();
    let mut filter = FilterArgument::with_registry(&registry);
    filter.validate(&input).unwrap();
    assert_eq!(filter.render(), "name = 'Bob'");

    let err = FilterArgument::new().validate(&input).unwrap_err();
    assert_eq!(err.kind(), FilterErrorKind::UnsupportedOperator);
}

#[test]
fn schema_scalar_drives_sql_argument() {
    let scalar = filter_argument_type();
    let input = scalar.parse_value(&serde_json::json!({ "age": { "lte": 3.5 } }));

    let mut argument = FilterArgument::new();
    SqlArgument::validate(&mut argument, &input).unwrap();
    assert_eq!(argument.sql_predicate(), "age <= 3.5");
    assert_eq!(argument.argument_type().name, "FilterArgument");
}
