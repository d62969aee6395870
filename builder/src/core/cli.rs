use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::config::RenderMode;
use super::constants::{
    ENV_ALLOWED_FIELDS, ENV_CONFIG, ENV_MAX_DEPTH, ENV_MAX_INPUT_BYTES, ENV_MAX_OPERATIONS,
    ENV_PLACEHOLDER, ENV_RENDER_MODE, ENV_TABLE_ALIAS,
};
use crate::argument::Placeholder;

#[derive(Parser)]
#[command(name = "gql-builder")]
#[command(
    version,
    about = "Translate GraphQL filter arguments into SQL predicates",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Maximum filter input size in bytes
    #[arg(long, global = true, env = ENV_MAX_INPUT_BYTES)]
    pub max_input_bytes: Option<usize>,

    /// Maximum nesting depth of a filter literal
    #[arg(long, global = true, env = ENV_MAX_DEPTH)]
    pub max_depth: Option<usize>,

    /// Maximum operations per filter argument
    #[arg(long, global = true, env = ENV_MAX_OPERATIONS)]
    pub max_operations: Option<usize>,

    /// Comma-separated list of fields that may be filtered on
    #[arg(long, global = true, env = ENV_ALLOWED_FIELDS, value_delimiter = ',')]
    pub allowed_fields: Option<Vec<String>>,

    /// Render mode (inline or params)
    #[arg(long, global = true, env = ENV_RENDER_MODE, value_parser = parse_render_mode)]
    pub mode: Option<RenderMode>,

    /// Placeholder style for params mode (question or dollar)
    #[arg(long, global = true, env = ENV_PLACEHOLDER, value_parser = parse_placeholder)]
    pub placeholder: Option<Placeholder>,

    /// Table alias prepended to every column
    #[arg(long, global = true, env = ENV_TABLE_ALIAS)]
    pub alias: Option<String>,
}

/// Parse render mode from CLI/env string
fn parse_render_mode(s: &str) -> Result<RenderMode, String> {
    match s.to_lowercase().as_str() {
        "inline" => Ok(RenderMode::Inline),
        "params" | "parameterized" => Ok(RenderMode::Params),
        _ => Err(format!(
            "Invalid render mode '{}'. Valid options: inline, params",
            s
        )),
    }
}

/// Parse placeholder style from CLI/env string
fn parse_placeholder(s: &str) -> Result<Placeholder, String> {
    match s.to_lowercase().as_str() {
        "question" | "?" => Ok(Placeholder::Question),
        "dollar" | "$" | "postgres" => Ok(Placeholder::Dollar),
        _ => Err(format!(
            "Invalid placeholder '{}'. Valid options: question, dollar",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Render a filter argument as a SQL predicate (default command)
    Render {
        /// Filter in GraphQL value syntax, e.g. '{age: {gt: 18}}'. Read from stdin when omitted.
        filter: Option<String>,

        /// Read the filter from a file
        #[arg(long, short = 'f', conflicts_with = "filter")]
        file: Option<PathBuf>,

        /// Treat the input as a JSON variables payload
        #[arg(long)]
        json: bool,
    },
    /// List supported operators and their operands
    Operators,
}

impl Default for Commands {
    fn default() -> Self {
        Self::Render {
            filter: None,
            file: None,
            json: false,
        }
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub max_input_bytes: Option<usize>,
    pub max_depth: Option<usize>,
    pub max_operations: Option<usize>,
    pub allowed_fields: Option<Vec<String>>,
    pub mode: Option<RenderMode>,
    pub placeholder: Option<Placeholder>,
    pub alias: Option<String>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        max_input_bytes: cli.max_input_bytes,
        max_depth: cli.max_depth,
        max_operations: cli.max_operations,
        allowed_fields: cli.allowed_fields,
        mode: cli.mode,
        placeholder: cli.placeholder,
        alias: cli.alias,
    };
    (config, cli.command)
}
