//! Schema-facing argument types
//!
//! The schema layer registers the filter as a custom scalar input type.
//! [`ScalarType`] carries the three conversions a GraphQL runtime needs for
//! such a scalar; [`SqlArgument`] is the contract every SQL-producing
//! argument implements.

use std::sync::OnceLock;

use serde_json::Value;

use super::error::FilterError;
use super::filter::{FILTER_ARGUMENT_TYPE, FilterArgument};
use super::literal::{Literal, decode};
use super::value::FilterValue;

/// Custom scalar type descriptor
#[derive(Debug, PartialEq, Eq)]
pub struct ScalarType {
    pub name: &'static str,
    pub description: &'static str,
}

impl ScalarType {
    /// Output conversion (the scalar is returned as-is)
    pub fn serialize(&self, value: &FilterValue) -> Value {
        value.to_json()
    }

    /// Input conversion for values supplied through variables
    pub fn parse_value(&self, value: &Value) -> FilterValue {
        FilterValue::from_json(value)
    }

    /// Input conversion for inline literals in the query document
    pub fn parse_literal(&self, literal: &Literal) -> FilterValue {
        decode(literal)
    }
}

/// The filter argument scalar, created on first use
pub fn filter_argument_type() -> &'static ScalarType {
    static FILTER_SCALAR: OnceLock<ScalarType> = OnceLock::new();
    FILTER_SCALAR.get_or_init(|| ScalarType {
        name: FILTER_ARGUMENT_TYPE,
        description: "Filter argument",
    })
}

/// An input argument that lowers into a SQL predicate
pub trait SqlArgument {
    /// Name of the argument's input type
    fn type_name(&self) -> &'static str;

    /// Check the decoded input and prepare the predicate
    fn validate(&mut self, input: &FilterValue) -> Result<(), FilterError>;

    /// Scalar type to register on the query's input surface
    fn argument_type(&self) -> &'static ScalarType;

    /// Predicate for the validated input
    fn sql_predicate(&self) -> String;
}

impl SqlArgument for FilterArgument<'_> {
    fn type_name(&self) -> &'static str {
        FilterArgument::type_name(self)
    }

    fn validate(&mut self, input: &FilterValue) -> Result<(), FilterError> {
        FilterArgument::validate(self, input)
    }

    fn argument_type(&self) -> &'static ScalarType {
        filter_argument_type()
    }

    fn sql_predicate(&self) -> String {
        self.render()
    }
}
