//! Filter argument subsystem
//!
//! Decodes a GraphQL filter argument, validates it operator by operator and
//! lowers it into a SQL predicate.
//!
//! Predicates are standard SQL: string literals escape only `'`, and pattern
//! operators use `ESCAPE '\'`. DuckDB, SQLite and PostgreSQL read them as
//! written; MySQL and ClickHouse, where `\` escapes inside strings, do not.
//!
//! ## Usage
//!
//! ```
//! use gql_builder::argument::{FilterArgument, FilterLimits, parse_filter_literal};
//!
//! let limits = FilterLimits::default();
//! let input = parse_filter_literal(r#"{age: {gt: 18}, name: {eq: "Bob"}}"#, &limits).unwrap();
//!
//! let mut filter = FilterArgument::new().with_limits(limits);
//! filter.validate(&input).unwrap();
//! assert_eq!(filter.render(), "age > 18 AND name = 'Bob'");
//! ```

mod error;
mod factory;
mod filter;
mod literal;
mod operation;
mod parser;
mod schema;
mod value;

pub use error::{FilterError, FilterErrorKind, LiteralError};
pub use factory::{BuildFn, OperatorRegistry, OperatorSpec, build, registry};
pub use filter::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_INPUT_BYTES, DEFAULT_MAX_OPERATIONS, FILTER_ARGUMENT_TYPE,
    FilterArgument, FilterLimits,
};
pub use literal::{Literal, decode};
pub use operation::{
    CompareOp, MatchOp, Operation, Placeholder, RenderOptions, Scalar, SqlParams,
};
pub use parser::{parse_filter_json, parse_filter_literal, parse_literal};
pub use schema::{ScalarType, SqlArgument, filter_argument_type};
pub use value::FilterValue;
