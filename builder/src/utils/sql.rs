//! SQL utility functions

/// Escape SQL LIKE metacharacters (%, _, \) in user input
///
/// Use this when building LIKE patterns from user input to prevent
/// unintended pattern matching. Pair the pattern with `ESCAPE '\'`.
///
/// # Example
///
/// ```
/// use gql_builder::utils::sql::escape_like_pattern;
///
/// let user_input = "100% match_test";
/// let pattern = format!("%{}%", escape_like_pattern(user_input));
/// assert_eq!(pattern, "%100\\% match\\_test%");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Quote a string as a standard SQL string literal, doubling embedded single quotes
///
/// Backslashes are kept as-is, which is only correct where they carry no
/// meaning inside string literals (DuckDB, SQLite, PostgreSQL with
/// `standard_conforming_strings`). MySQL and ClickHouse treat `\` as an
/// escape character and are not supported targets.
///
/// ```
/// use gql_builder::utils::sql::quote_string;
///
/// assert_eq!(quote_string("O'Brien"), "'O''Brien'");
/// ```
pub fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Check that a name is a plain SQL identifier (`[A-Za-z_][A-Za-z0-9_]*`)
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check that a column reference is safe to interpolate unquoted.
///
/// Accepts plain identifiers and dotted paths such as `users.age`.
pub fn is_column_reference(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_identifier)
}

/// Check that text is an integer literal: optional minus sign followed by digits
pub fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Check that text is a finite decimal number safe to inline into SQL.
///
/// Rejects `inf`, `NaN`, hex and anything else Rust's float parser would
/// accept but SQL would not.
pub fn is_numeric_literal(s: &str) -> bool {
    if is_integer_literal(s) {
        return true;
    }
    let allowed = s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E'));
    allowed
        && s.bytes().any(|b| b.is_ascii_digit())
        && s.parse::<f64>().is_ok_and(f64::is_finite)
}
