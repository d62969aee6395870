//! Error types for filter argument decoding and validation

use thiserror::Error;

/// Coarse error classes surfaced to the protocol layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterErrorKind {
    /// Input (or a nested operator mapping) has the wrong shape
    Shape,
    /// Operator name is not registered
    UnsupportedOperator,
    /// Operand does not match what the operator requires
    InvalidOperand,
}

/// Validation error for a filter argument
///
/// Validation is fail-fast: the first error aborts the whole argument.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Top-level input is not a mapping of field name to operators
    #[error("filter argument must be a map of field names to operators, got {found}")]
    NotAMap { found: &'static str },

    /// Per-field value is not a mapping of operator name to operand
    #[error("argument for field {field} must be a map of operators, got {found}")]
    FieldShape { field: String, found: &'static str },

    /// Field name cannot be used as a column reference
    #[error("invalid field name: {field:?}")]
    InvalidField { field: String },

    /// Field is not in the configured whitelist
    #[error("cannot filter by field: {field}")]
    FieldNotAllowed { field: String },

    /// Too many operations in one filter argument
    #[error("filter argument exceeds the maximum of {max} operations")]
    TooManyOperations { max: usize },

    /// Operator name is not registered
    #[error("unsupported operator {operator} on field {field}")]
    UnsupportedOperator { field: String, operator: String },

    /// Operand shape does not match the operator
    #[error("invalid operand for {field}.{operator}: expected {expected}")]
    InvalidOperand {
        field: String,
        operator: String,
        expected: &'static str,
    },
}

impl FilterError {
    /// Create an unsupported operator error
    pub fn unsupported(field: &str, operator: &str) -> Self {
        Self::UnsupportedOperator {
            field: field.to_string(),
            operator: operator.to_string(),
        }
    }

    /// Create an invalid operand error
    pub fn invalid_operand(field: &str, operator: &str, expected: &'static str) -> Self {
        Self::InvalidOperand {
            field: field.to_string(),
            operator: operator.to_string(),
            expected,
        }
    }

    /// Get the error class
    pub fn kind(&self) -> FilterErrorKind {
        match self {
            Self::NotAMap { .. }
            | Self::FieldShape { .. }
            | Self::InvalidField { .. }
            | Self::FieldNotAllowed { .. }
            | Self::TooManyOperations { .. } => FilterErrorKind::Shape,
            Self::UnsupportedOperator { .. } => FilterErrorKind::UnsupportedOperator,
            Self::InvalidOperand { .. } => FilterErrorKind::InvalidOperand,
        }
    }

    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAMap { .. } => "FILTER_NOT_A_MAP",
            Self::FieldShape { .. } => "INVALID_FILTER_FIELD_SHAPE",
            Self::InvalidField { .. } => "INVALID_FILTER_FIELD",
            Self::FieldNotAllowed { .. } => "INVALID_FILTER_COLUMN",
            Self::TooManyOperations { .. } => "TOO_MANY_FILTERS",
            Self::UnsupportedOperator { .. } => "UNSUPPORTED_FILTER_OPERATOR",
            Self::InvalidOperand { .. } => "INVALID_FILTER_OPERAND",
        }
    }
}

/// Error produced while turning raw text into a filter value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    /// Input exceeds the configured byte limit
    #[error("filter input exceeds maximum size of {max} bytes")]
    TooLarge { max: usize },

    /// Literal nesting exceeds the configured depth
    #[error("filter literal exceeds maximum nesting depth of {max}")]
    TooDeep { max: usize },

    /// GraphQL literal syntax error
    #[error("invalid filter literal: {0}")]
    Syntax(String),

    /// JSON variables could not be parsed
    #[error("invalid filter JSON: {0}")]
    InvalidJson(String),
}

impl LiteralError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::TooLarge { .. } => "FILTER_JSON_TOO_LARGE",
            Self::TooDeep { .. } => "FILTER_TOO_DEEP",
            Self::Syntax(_) => "INVALID_FILTER_LITERAL",
            Self::InvalidJson(_) => "INVALID_FILTER_JSON",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_operator_display() {
        let err = FilterError::unsupported("age", "bogusOp");
        assert_eq!(err.to_string(), "unsupported operator bogusOp on field age");
        assert_eq!(err.kind(), FilterErrorKind::UnsupportedOperator);
    }

    #[test]
    fn test_invalid_operand_display() {
        let err = FilterError::invalid_operand("tags", "in", "a list of scalars");
        assert_eq!(
            err.to_string(),
            "invalid operand for tags.in: expected a list of scalars"
        );
        assert_eq!(err.kind(), FilterErrorKind::InvalidOperand);
        assert_eq!(err.code(), "INVALID_FILTER_OPERAND");
    }

    #[test]
    fn test_shape_errors_share_kind() {
        let errors = [
            FilterError::NotAMap { found: "list" },
            FilterError::FieldShape {
                field: "age".into(),
                found: "int",
            },
            FilterError::InvalidField {
                field: "a b".into(),
            },
            FilterError::FieldNotAllowed {
                field: "password".into(),
            },
            FilterError::TooManyOperations { max: 2 },
        ];
        for err in errors {
            assert_eq!(err.kind(), FilterErrorKind::Shape, "{err}");
        }
    }

    #[test]
    fn test_literal_error_codes() {
        assert_eq!(LiteralError::TooLarge { max: 1 }.code(), "FILTER_JSON_TOO_LARGE");
        assert_eq!(
            LiteralError::TooDeep { max: 4 }.to_string(),
            "filter literal exceeds maximum nesting depth of 4"
        );
    }
}
