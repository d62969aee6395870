//! Operator registry
//!
//! Maps operator names (as they appear in a filter argument) to constructor
//! functions that check the operand shape and build an [`Operation`].
//! The standard table is built once per process and shared read-only.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::error::FilterError;
use super::operation::{CompareOp, MatchOp, Operation, Scalar};
use super::value::FilterValue;
use crate::utils::sql::is_numeric_literal;

const SCALAR: &str = "a string, number or boolean";
const SCALAR_OR_NULL: &str = "a string, number, boolean or null";
const SCALAR_LIST: &str = "a list of strings, numbers or booleans";
const STRING: &str = "a string";
const BOOLEAN: &str = "a boolean";
const PAIR: &str = "a list of exactly two strings, numbers or booleans";
const OPERATOR_MAP: &str = "a non-empty map of operators";
const OPERATOR_MAP_LIST: &str = "a non-empty list of non-empty maps of operators";

/// Constructor for one operator: `(registry, operator, field, operand)`
pub type BuildFn =
    fn(&OperatorRegistry, &str, &str, &FilterValue) -> Result<Operation, FilterError>;

/// Registered operator
#[derive(Clone, Copy)]
pub struct OperatorSpec {
    pub name: &'static str,
    /// Human-readable operand shape
    pub operand: &'static str,
    build: BuildFn,
}

/// Name → constructor table
#[derive(Clone, Default)]
pub struct OperatorRegistry {
    operators: BTreeMap<&'static str, OperatorSpec>,
}

static STANDARD: LazyLock<OperatorRegistry> = LazyLock::new(OperatorRegistry::standard);

/// The process-wide standard registry
pub fn registry() -> &'static OperatorRegistry {
    &STANDARD
}

/// Build an operation using the standard registry
pub fn build(operator: &str, field: &str, operand: &FilterValue) -> Result<Operation, FilterError> {
    registry().build(operator, field, operand)
}

impl OperatorRegistry {
    /// Registry with every built-in operator
    pub fn standard() -> Self {
        let mut registry = Self::default();

        registry.register("eq", SCALAR_OR_NULL, |_, op, f, v| {
            compare_or_null(CompareOp::Eq, op, f, v)
        });
        registry.register("ne", SCALAR_OR_NULL, |_, op, f, v| {
            compare_or_null(CompareOp::Ne, op, f, v)
        });
        registry.register("neq", SCALAR_OR_NULL, |_, op, f, v| {
            compare_or_null(CompareOp::Ne, op, f, v)
        });
        registry.register("gt", SCALAR, |_, op, f, v| compare(CompareOp::Gt, op, f, v));
        registry.register("gte", SCALAR, |_, op, f, v| compare(CompareOp::Gte, op, f, v));
        registry.register("lt", SCALAR, |_, op, f, v| compare(CompareOp::Lt, op, f, v));
        registry.register("lte", SCALAR, |_, op, f, v| compare(CompareOp::Lte, op, f, v));
        registry.register("in", SCALAR_LIST, |_, op, f, v| membership(false, op, f, v));
        registry.register("nin", SCALAR_LIST, |_, op, f, v| membership(true, op, f, v));
        registry.register("like", STRING, |_, op, f, v| pattern(MatchOp::Like, op, f, v));
        registry.register("contains", STRING, |_, op, f, v| {
            pattern(MatchOp::Contains, op, f, v)
        });
        registry.register("startsWith", STRING, |_, op, f, v| {
            pattern(MatchOp::StartsWith, op, f, v)
        });
        registry.register("endsWith", STRING, |_, op, f, v| {
            pattern(MatchOp::EndsWith, op, f, v)
        });
        registry.register("isNull", BOOLEAN, is_null);
        registry.register("between", PAIR, between);
        registry.register("not", OPERATOR_MAP, not);
        registry.register("or", OPERATOR_MAP_LIST, any);

        registry
    }

    /// Add or replace an operator
    pub fn register(&mut self, name: &'static str, operand: &'static str, build: BuildFn) {
        self.operators.insert(
            name,
            OperatorSpec {
                name,
                operand,
                build,
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operators.contains_key(name)
    }

    /// Registered operators, sorted by name
    pub fn operators(&self) -> impl Iterator<Item = &OperatorSpec> {
        self.operators.values()
    }

    /// Look up `operator` and build an operation for `field`
    pub fn build(
        &self,
        operator: &str,
        field: &str,
        operand: &FilterValue,
    ) -> Result<Operation, FilterError> {
        let spec = self
            .operators
            .get(operator)
            .ok_or_else(|| FilterError::unsupported(field, operator))?;
        let operation = (spec.build)(self, operator, field, operand)?;
        tracing::trace!(field, operator, "Built filter operation");
        Ok(operation)
    }

    /// Build every operator in a nested operator map (`not`, `or` branches)
    fn build_map(
        &self,
        operator: &str,
        field: &str,
        operand: &FilterValue,
        expected: &'static str,
    ) -> Result<Vec<Operation>, FilterError> {
        let map = operand
            .as_map()
            .filter(|m| !m.is_empty())
            .ok_or_else(|| FilterError::invalid_operand(field, operator, expected))?;
        map.iter()
            .map(|(name, value)| self.build(name, field, value))
            .collect()
    }
}

fn scalar(value: &FilterValue) -> Option<Scalar> {
    match value {
        FilterValue::String(s) => Some(Scalar::String(s.clone())),
        FilterValue::Bool(b) => Some(Scalar::Bool(*b)),
        FilterValue::Int(text) | FilterValue::Float(text) if is_numeric_literal(text) => {
            Some(Scalar::Number(text.clone()))
        }
        _ => None,
    }
}

fn scalar_list(value: &FilterValue) -> Option<Vec<Scalar>> {
    value.as_list()?.iter().map(scalar).collect()
}

fn compare(
    op: CompareOp,
    operator: &str,
    field: &str,
    operand: &FilterValue,
) -> Result<Operation, FilterError> {
    let value = scalar(operand).ok_or_else(|| FilterError::invalid_operand(field, operator, SCALAR))?;
    Ok(Operation::Compare {
        field: field.to_string(),
        op,
        value,
    })
}

/// `eq: null` / `ne: null` become null checks; `= NULL` never matches in SQL
fn compare_or_null(
    op: CompareOp,
    operator: &str,
    field: &str,
    operand: &FilterValue,
) -> Result<Operation, FilterError> {
    if operand.is_null() {
        return Ok(Operation::Null {
            field: field.to_string(),
            negated: op == CompareOp::Ne,
        });
    }
    compare(op, operator, field, operand)
        .map_err(|_| FilterError::invalid_operand(field, operator, SCALAR_OR_NULL))
}

fn membership(
    negated: bool,
    operator: &str,
    field: &str,
    operand: &FilterValue,
) -> Result<Operation, FilterError> {
    let values = scalar_list(operand)
        .ok_or_else(|| FilterError::invalid_operand(field, operator, SCALAR_LIST))?;
    Ok(Operation::In {
        field: field.to_string(),
        values,
        negated,
    })
}

fn pattern(
    op: MatchOp,
    operator: &str,
    field: &str,
    operand: &FilterValue,
) -> Result<Operation, FilterError> {
    match operand {
        FilterValue::String(s) => Ok(Operation::Match {
            field: field.to_string(),
            op,
            pattern: s.clone(),
        }),
        _ => Err(FilterError::invalid_operand(field, operator, STRING)),
    }
}

fn is_null(
    _: &OperatorRegistry,
    operator: &str,
    field: &str,
    operand: &FilterValue,
) -> Result<Operation, FilterError> {
    match operand {
        FilterValue::Bool(b) => Ok(Operation::Null {
            field: field.to_string(),
            negated: !*b,
        }),
        _ => Err(FilterError::invalid_operand(field, operator, BOOLEAN)),
    }
}

fn between(
    _: &OperatorRegistry,
    operator: &str,
    field: &str,
    operand: &FilterValue,
) -> Result<Operation, FilterError> {
    match scalar_list(operand).as_deref() {
        Some([low, high]) => Ok(Operation::Between {
            field: field.to_string(),
            low: low.clone(),
            high: high.clone(),
        }),
        _ => Err(FilterError::invalid_operand(field, operator, PAIR)),
    }
}

fn not(
    registry: &OperatorRegistry,
    operator: &str,
    field: &str,
    operand: &FilterValue,
) -> Result<Operation, FilterError> {
    let operations = registry.build_map(operator, field, operand, OPERATOR_MAP)?;
    Ok(Operation::Not {
        field: field.to_string(),
        operations,
    })
}

fn any(
    registry: &OperatorRegistry,
    operator: &str,
    field: &str,
    operand: &FilterValue,
) -> Result<Operation, FilterError> {
    let branches = operand
        .as_list()
        .filter(|items| !items.is_empty())
        .ok_or_else(|| FilterError::invalid_operand(field, operator, OPERATOR_MAP_LIST))?;
    let branches = branches
        .iter()
        .map(|branch| registry.build_map(operator, field, branch, OPERATOR_MAP_LIST))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Operation::Any {
        field: field.to_string(),
        branches,
    })
}
