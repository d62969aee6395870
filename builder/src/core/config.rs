use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::argument::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_INPUT_BYTES, DEFAULT_MAX_OPERATIONS, FilterLimits, Placeholder,
    RenderOptions,
};
use crate::utils::file::expand_path;
use crate::utils::sql::{is_column_reference, is_identifier};

use super::cli::CliConfig;
use super::constants::{APP_DOT_FOLDER, CONFIG_FILE_NAME};

// =============================================================================
// Render Mode Enum
// =============================================================================

/// How the predicate is emitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Operands inlined as SQL literals
    #[default]
    Inline,
    /// Operands bound as parameters, printed after the predicate
    Params,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Inline => write!(f, "inline"),
            RenderMode::Params => write!(f, "params"),
        }
    }
}

// =============================================================================
// File Configuration
// =============================================================================

/// Filter limits section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FilterFileConfig {
    pub max_input_bytes: Option<usize>,
    pub max_depth: Option<usize>,
    pub max_operations: Option<usize>,
    pub allowed_fields: Option<Vec<String>>,
}

/// Render section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RenderFileConfig {
    pub mode: Option<RenderMode>,
    pub placeholder: Option<Placeholder>,
    pub table_alias: Option<String>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub filter: Option<FilterFileConfig>,
    pub render: Option<RenderFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(filter) = other.filter {
            let current = self.filter.get_or_insert_with(FilterFileConfig::default);
            if filter.max_input_bytes.is_some() {
                tracing::trace!(max_input_bytes = ?filter.max_input_bytes, "Merging filter.max_input_bytes");
                current.max_input_bytes = filter.max_input_bytes;
            }
            if filter.max_depth.is_some() {
                tracing::trace!(max_depth = ?filter.max_depth, "Merging filter.max_depth");
                current.max_depth = filter.max_depth;
            }
            if filter.max_operations.is_some() {
                tracing::trace!(max_operations = ?filter.max_operations, "Merging filter.max_operations");
                current.max_operations = filter.max_operations;
            }
            if filter.allowed_fields.is_some() {
                tracing::trace!(allowed_fields = ?filter.allowed_fields, "Merging filter.allowed_fields");
                current.allowed_fields = filter.allowed_fields;
            }
        }

        if let Some(render) = other.render {
            let current = self.render.get_or_insert_with(RenderFileConfig::default);
            if render.mode.is_some() {
                tracing::trace!(mode = ?render.mode, "Merging render.mode");
                current.mode = render.mode;
            }
            if render.placeholder.is_some() {
                tracing::trace!(placeholder = ?render.placeholder, "Merging render.placeholder");
                current.placeholder = render.placeholder;
            }
            if render.table_alias.is_some() {
                tracing::trace!(table_alias = ?render.table_alias, "Merging render.table_alias");
                current.table_alias = render.table_alias;
            }
        }
    }
}

// =============================================================================
// Application Configuration
// =============================================================================

/// Resolved render settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderConfig {
    pub mode: RenderMode,
    pub options: RenderOptions,
}

/// Resolved application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub filter: FilterLimits,
    pub render: RenderConfig,
}

impl AppConfig {
    /// Load configuration with priority (highest wins):
    /// 1. Built-in defaults
    /// 2. Profile directory config (~/.gql-builder/gql-builder.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::resolve(file_config, cli)
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn resolve(file_config: FileConfig, cli: &CliConfig) -> Result<Self> {
        let file_filter = file_config.filter.unwrap_or_default();
        let file_render = file_config.render.unwrap_or_default();

        let allowed_fields = cli
            .allowed_fields
            .clone()
            .or(file_filter.allowed_fields)
            .map(|fields| {
                fields
                    .into_iter()
                    .map(|field| field.trim().to_string())
                    .filter(|field| !field.is_empty())
                    .collect::<BTreeSet<_>>()
            });

        let filter = FilterLimits {
            max_input_bytes: cli
                .max_input_bytes
                .or(file_filter.max_input_bytes)
                .unwrap_or(DEFAULT_MAX_INPUT_BYTES),
            max_depth: cli
                .max_depth
                .or(file_filter.max_depth)
                .unwrap_or(DEFAULT_MAX_DEPTH),
            max_operations: cli
                .max_operations
                .or(file_filter.max_operations)
                .unwrap_or(DEFAULT_MAX_OPERATIONS),
            allowed_fields,
        };

        // An empty alias means no alias
        let alias = cli
            .alias
            .clone()
            .or(file_render.table_alias)
            .filter(|alias| !alias.is_empty());

        let render = RenderConfig {
            mode: cli.mode.or(file_render.mode).unwrap_or_default(),
            options: RenderOptions {
                alias,
                placeholder: cli
                    .placeholder
                    .or(file_render.placeholder)
                    .unwrap_or_default(),
            },
        };

        let config = Self { filter, render };
        config.validate()?;

        tracing::debug!(
            max_input_bytes = config.filter.max_input_bytes,
            max_depth = config.filter.max_depth,
            max_operations = config.filter.max_operations,
            allowed_fields = ?config.filter.allowed_fields,
            mode = %config.render.mode,
            alias = ?config.render.options.alias,
            "Configuration resolved"
        );

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.filter.max_input_bytes == 0 {
            anyhow::bail!("Configuration error: filter.max_input_bytes must be greater than 0");
        }
        if self.filter.max_depth == 0 {
            anyhow::bail!("Configuration error: filter.max_depth must be greater than 0");
        }
        if self.filter.max_operations == 0 {
            anyhow::bail!("Configuration error: filter.max_operations must be greater than 0");
        }

        if let Some(ref fields) = self.filter.allowed_fields
            && let Some(bad) = fields.iter().find(|f| !is_column_reference(f))
        {
            anyhow::bail!(
                "Configuration error: filter.allowed_fields contains invalid field name '{}'",
                bad
            );
        }

        if let Some(ref alias) = self.render.options.alias
            && !is_identifier(alias)
        {
            anyhow::bail!(
                "Configuration error: render.table_alias '{}' is not a valid identifier",
                alias
            );
        }

        Ok(())
    }
}

/// Get the profile config path (~/.gql-builder/gql-builder.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}
