//! Utility functions shared by the filter core and the CLI

pub mod file;
pub mod sql;
