use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};

use crate::argument::{
    FilterArgument, OperatorRegistry, SqlParams, parse_filter_json, parse_filter_literal, registry,
};
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::{AppConfig, RenderMode};
use crate::core::constants::{APP_NAME, ENV_LOG, LOG_TARGET};

/// Predicate produced for one filter input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFilter {
    pub sql: String,
    /// Bound values in placeholder order (empty in inline mode)
    pub params: Vec<String>,
}

pub struct CoreApp {
    pub config: AppConfig,
    registry: &'static OperatorRegistry,
}

impl CoreApp {
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!(app = APP_NAME, "Starting");

        let (cli_config, command) = cli::parse();
        let command = command.unwrap_or_default();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(&cli_config)?;

        match command {
            Commands::Render { filter, file, json } => {
                let input = read_input(filter, file.as_deref())?;
                let rendered = app.render_filter(&input, json)?;
                println!("{}", rendered.sql);
                if app.config.render.mode == RenderMode::Params {
                    println!("{}", serde_json::to_string(&rendered.params)?);
                }
            }
            Commands::Operators => {
                for line in app.operator_lines() {
                    println!("{}", line);
                }
            }
        }

        Ok(())
    }

    pub fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            registry: registry(),
        }
    }

    fn init_logging() {
        let default_filter = format!("warn,{}=info", LOG_TARGET);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        // stdout carries the predicate, so logs go to stderr
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    /// Parse, validate and render one filter input
    pub fn render_filter(&self, text: &str, json: bool) -> Result<RenderedFilter> {
        let limits = &self.config.filter;
        let input = if json {
            parse_filter_json(text, limits)
        } else {
            parse_filter_literal(text, limits)
        }
        .context("Failed to parse filter")?;

        let mut filter = FilterArgument::with_registry(self.registry).with_limits(limits.clone());
        filter
            .validate(&input)
            .context("Failed to validate filter")?;

        let options = &self.config.render.options;
        let rendered = match self.config.render.mode {
            RenderMode::Inline => RenderedFilter {
                sql: filter.render_aliased(options.alias.as_deref()),
                params: Vec::new(),
            },
            RenderMode::Params => {
                let mut params = SqlParams::default();
                let sql = filter.to_sql(&mut params, options);
                RenderedFilter {
                    sql,
                    params: params.values,
                }
            }
        };

        tracing::debug!(
            operations = filter.len(),
            params = rendered.params.len(),
            "Filter rendered"
        );
        Ok(rendered)
    }

    /// One `name  operand` line per registered operator
    pub fn operator_lines(&self) -> Vec<String> {
        let width = self
            .registry
            .operators()
            .map(|spec| spec.name.len())
            .max()
            .unwrap_or(0);
        self.registry
            .operators()
            .map(|spec| format!("{:<width$}  {}", spec.name, spec.operand, width = width))
            .collect()
    }
}

/// Filter text from the positional argument, a file, or stdin
fn read_input(filter: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = filter {
        return Ok(text);
    }
    if let Some(path) = file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read filter file: {}", path.display()));
    }
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read filter from stdin")?;
    Ok(text)
}
