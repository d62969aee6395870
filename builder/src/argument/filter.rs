//! Filter argument aggregation
//!
//! [`FilterArgument`] walks a decoded filter (`field → operator → operand`),
//! builds one [`Operation`] per operator occurrence and joins them into a
//! single predicate.

use std::collections::{BTreeMap, BTreeSet};

use super::error::FilterError;
use super::factory::{OperatorRegistry, registry};
use super::operation::{Operation, RenderOptions, SqlParams};
use super::value::FilterValue;
use crate::utils::sql::is_column_reference;

/// Type name the schema layer registers the filter argument under
pub const FILTER_ARGUMENT_TYPE: &str = "FilterArgument";

/// Maximum size of filter input in bytes (64KB)
pub const DEFAULT_MAX_INPUT_BYTES: usize = 64 * 1024;

/// Maximum nesting depth of a filter literal
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Maximum number of operations in one filter argument
pub const DEFAULT_MAX_OPERATIONS: usize = 50;

/// Bounds applied while parsing and validating a filter argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterLimits {
    pub max_input_bytes: usize,
    pub max_depth: usize,
    pub max_operations: usize,
    /// Whitelist of filterable fields; `None` allows any valid column name
    pub allowed_fields: Option<BTreeSet<String>>,
}

impl Default for FilterLimits {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            max_depth: DEFAULT_MAX_DEPTH,
            max_operations: DEFAULT_MAX_OPERATIONS,
            allowed_fields: None,
        }
    }
}

/// Per-request filter argument state
///
/// Validation is all-or-nothing: on failure the accumulated operations are
/// discarded, so [`render`](Self::render) after a failed `validate` yields
/// an empty predicate rather than a partial one.
#[derive(Clone)]
pub struct FilterArgument<'r> {
    registry: &'r OperatorRegistry,
    limits: FilterLimits,
    operations: BTreeMap<String, Vec<Operation>>,
}

impl FilterArgument<'static> {
    /// Filter argument backed by the standard operator registry
    pub fn new() -> Self {
        Self::with_registry(registry())
    }
}

impl Default for FilterArgument<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> FilterArgument<'r> {
    pub fn with_registry(registry: &'r OperatorRegistry) -> Self {
        Self {
            registry,
            limits: FilterLimits::default(),
            operations: BTreeMap::new(),
        }
    }

    pub fn with_limits(mut self, limits: FilterLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn type_name(&self) -> &'static str {
        FILTER_ARGUMENT_TYPE
    }

    /// Validate a decoded filter and accumulate its operations
    pub fn validate(&mut self, input: &FilterValue) -> Result<(), FilterError> {
        self.operations.clear();
        match self.collect(input) {
            Ok(count) => {
                tracing::debug!(
                    fields = self.operations.len(),
                    operations = count,
                    "Filter argument validated"
                );
                Ok(())
            }
            Err(e) => {
                tracing::debug!(code = e.code(), error = %e, "Filter argument rejected");
                self.operations.clear();
                Err(e)
            }
        }
    }

    fn collect(&mut self, input: &FilterValue) -> Result<usize, FilterError> {
        let fields = input.as_map().ok_or(FilterError::NotAMap {
            found: input.kind_name(),
        })?;

        let mut count = 0;
        for (field, raw) in fields {
            self.check_field(field)?;
            let operators = raw.as_map().ok_or_else(|| FilterError::FieldShape {
                field: field.clone(),
                found: raw.kind_name(),
            })?;

            for (operator, operand) in operators {
                let operation = self.registry.build(operator, field, operand)?;
                count += 1;
                if count > self.limits.max_operations {
                    return Err(FilterError::TooManyOperations {
                        max: self.limits.max_operations,
                    });
                }
                self.operations
                    .entry(field.clone())
                    .or_default()
                    .push(operation);
            }
        }
        Ok(count)
    }

    fn check_field(&self, field: &str) -> Result<(), FilterError> {
        if !is_column_reference(field) {
            return Err(FilterError::InvalidField {
                field: field.to_string(),
            });
        }
        if let Some(allowed) = &self.limits.allowed_fields
            && !allowed.contains(field)
        {
            return Err(FilterError::FieldNotAllowed {
                field: field.to_string(),
            });
        }
        Ok(())
    }

    /// Operations accumulated for `field`
    pub fn operations(&self, field: &str) -> &[Operation] {
        self.operations
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Fields with at least one operation, sorted
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    /// Total number of accumulated operations
    pub fn len(&self) -> usize {
        self.operations.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    fn all(&self) -> impl Iterator<Item = &Operation> {
        self.operations.values().flatten()
    }

    /// Join every fragment with `AND`; empty when nothing was accumulated
    pub fn render(&self) -> String {
        self.render_aliased(None)
    }

    /// Inline rendering with an optional table alias on every column
    pub fn render_aliased(&self, alias: Option<&str>) -> String {
        self.all()
            .map(|op| op.render_aliased(alias))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// Parameterized rendering; operands are pushed into `params`
    pub fn to_sql(&self, params: &mut SqlParams, options: &RenderOptions) -> String {
        let sql = self
            .all()
            .map(|op| op.to_sql(params, options))
            .collect::<Vec<_>>()
            .join(" AND ");
        tracing::trace!(sql = %sql, params = params.values.len(), "Rendered filter predicate");
        sql
    }
}
