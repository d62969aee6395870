//! Literal expression trees and the value decoder
//!
//! A [`Literal`] is the raw filter as it appears in a GraphQL document.
//! [`decode`] lowers it into a [`FilterValue`].

use super::value::FilterValue;

/// GraphQL input value literal
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `{name: value, ...}`; fields in source order
    Object(Vec<(String, Literal)>),
    /// `[value, ...]`
    List(Vec<Literal>),
    String(String),
    Boolean(bool),
    /// Integer literal, source text
    Int(String),
    /// Float literal, source text
    Float(String),
    /// Enum value name, e.g. `ACTIVE`
    Enum(String),
    Null,
    /// `$name` reference; not resolvable at this layer
    Variable(String),
}

/// Decode a literal tree into a native filter value.
///
/// Total over the grammar: node kinds that carry no value (`null`,
/// variables) decode to [`FilterValue::Null`] rather than failing, leaving
/// any resulting mismatch to validation.
pub fn decode(literal: &Literal) -> FilterValue {
    match literal {
        Literal::Object(fields) => FilterValue::Map(
            fields
                .iter()
                .map(|(name, value)| (name.clone(), decode(value)))
                .collect(),
        ),
        Literal::List(items) => FilterValue::List(items.iter().map(decode).collect()),
        Literal::String(s) | Literal::Enum(s) => FilterValue::String(s.clone()),
        Literal::Boolean(b) => FilterValue::Bool(*b),
        Literal::Int(text) => FilterValue::Int(text.clone()),
        Literal::Float(text) => FilterValue::Float(text.clone()),
        Literal::Null | Literal::Variable(_) => FilterValue::Null,
    }
}
