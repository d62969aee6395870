//! GraphQL filter arguments lowered into SQL predicates
//!
//! The [`argument`] module holds the library surface: literal parsing, the
//! operator registry, validation and rendering. [`core`] and [`app`] wire it
//! into the `gql-builder` command line tool.

pub mod app;
pub mod argument;
pub mod core;
pub mod utils;
