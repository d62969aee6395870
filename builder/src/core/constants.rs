// =============================================================================
// Application Identity
// =============================================================================

/// Application name (for display and paths)
pub const APP_NAME: &str = "gql-builder";

/// Log target of this crate (used in the default log filter)
pub const LOG_TARGET: &str = "gql_builder";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".gql-builder";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "gql-builder.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "GQL_BUILDER_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "GQL_BUILDER_LOG";

// =============================================================================
// Environment Variables - Filter Limits
// =============================================================================

/// Environment variable for maximum filter input size in bytes
pub const ENV_MAX_INPUT_BYTES: &str = "GQL_BUILDER_MAX_INPUT_BYTES";

/// Environment variable for maximum literal nesting depth
pub const ENV_MAX_DEPTH: &str = "GQL_BUILDER_MAX_DEPTH";

/// Environment variable for maximum operations per filter argument
pub const ENV_MAX_OPERATIONS: &str = "GQL_BUILDER_MAX_OPERATIONS";

/// Environment variable for the comma-separated field whitelist
pub const ENV_ALLOWED_FIELDS: &str = "GQL_BUILDER_ALLOWED_FIELDS";

// =============================================================================
// Environment Variables - Rendering
// =============================================================================

/// Environment variable for render mode (inline or params)
pub const ENV_RENDER_MODE: &str = "GQL_BUILDER_RENDER_MODE";

/// Environment variable for placeholder style (question or dollar)
pub const ENV_PLACEHOLDER: &str = "GQL_BUILDER_PLACEHOLDER";

/// Environment variable for the table alias prepended to columns
pub const ENV_TABLE_ALIAS: &str = "GQL_BUILDER_TABLE_ALIAS";
