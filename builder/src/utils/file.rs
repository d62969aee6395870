//! File utility functions

use std::path::PathBuf;

/// Expand a path string to an absolute path.
///
/// Handles `~` and `~/path` via the home directory; relative paths are
/// resolved against the current working directory.
///
/// ```text
/// expand_path("~/.gql-builder/gql-builder.json") // -> /home/user/.gql-builder/gql-builder.json
/// expand_path("filters.json")                    // -> /current/dir/filters.json
/// expand_path("/etc/gql-builder.json")           // -> unchanged
/// ```
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    }

    let expanded = if path == "~" {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(path))
    } else if let Some(rest) = path.strip_prefix("~/") {
        match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(path),
        }
    } else {
        PathBuf::from(path)
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}
