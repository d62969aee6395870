//! Validated filter operations and their SQL rendering
//!
//! Every [`Operation`] renders to a self-contained boolean term that can be
//! joined with others via `AND`. Operands were checked when the operation was
//! built, so rendering never fails.

use serde::{Deserialize, Serialize};

use crate::utils::sql::{escape_like_pattern, quote_string};

/// Scalar operand accepted by comparison operators
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Bool(bool),
    /// Validated numeric literal text
    Number(String),
}

impl Scalar {
    /// Render as an inline SQL literal
    pub fn render(&self) -> String {
        match self {
            Self::String(s) => quote_string(s),
            Self::Bool(b) => sql_bool(*b).to_string(),
            Self::Number(n) => n.clone(),
        }
    }

    /// Text bound as a query parameter
    fn param_text(&self) -> String {
        match self {
            Self::String(s) | Self::Number(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

fn sql_bool(b: bool) -> &'static str {
    if b { "TRUE" } else { "FALSE" }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }
}

/// String pattern operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOp {
    /// Caller-supplied LIKE pattern, wildcards kept
    Like,
    Contains,
    StartsWith,
    EndsWith,
}

/// Placeholder syntax for parameterized rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Placeholder {
    /// `?` (SQLite, DuckDB)
    #[default]
    Question,
    /// `$1`, `$2`, ... (PostgreSQL)
    Dollar,
}

/// Collects SQL parameters during rendering (maintains insertion order)
#[derive(Debug, Default)]
pub struct SqlParams {
    pub values: Vec<String>,
}

impl SqlParams {
    /// Push a value and return its placeholder
    pub fn bind(&mut self, value: String, style: Placeholder) -> String {
        self.values.push(value);
        match style {
            Placeholder::Question => "?".to_string(),
            Placeholder::Dollar => format!("${}", self.values.len()),
        }
    }
}

/// Options shared by inline and parameterized rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Table alias prepended to column names (e.g. "u" → "u.age")
    pub alias: Option<String>,
    pub placeholder: Placeholder,
}

/// Rendering target: inline literals or bound parameters
struct SqlWriter<'a> {
    alias: Option<&'a str>,
    params: Option<(&'a mut SqlParams, Placeholder)>,
}

impl SqlWriter<'_> {
    fn column(&self, field: &str) -> String {
        match self.alias {
            Some(alias) if !alias.is_empty() => format!("{}.{}", alias, field),
            _ => field.to_string(),
        }
    }

    fn scalar(&mut self, value: &Scalar) -> String {
        match (&mut self.params, value) {
            // Booleans are inlined in both modes
            (_, Scalar::Bool(b)) => sql_bool(*b).to_string(),
            (Some((params, style)), _) => params.bind(value.param_text(), *style),
            (None, _) => value.render(),
        }
    }

    fn text(&mut self, value: String) -> String {
        match &mut self.params {
            Some((params, style)) => params.bind(value, *style),
            None => quote_string(&value),
        }
    }
}

/// A validated `(field, operator, operand)` unit
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Compare {
        field: String,
        op: CompareOp,
        value: Scalar,
    },
    In {
        field: String,
        values: Vec<Scalar>,
        negated: bool,
    },
    Match {
        field: String,
        op: MatchOp,
        pattern: String,
    },
    Null {
        field: String,
        negated: bool,
    },
    Between {
        field: String,
        low: Scalar,
        high: Scalar,
    },
    /// `NOT (a AND b ...)` over operations on the same field
    Not {
        field: String,
        operations: Vec<Operation>,
    },
    /// `(branch OR branch ...)`, each branch an AND of operations
    Any {
        field: String,
        branches: Vec<Vec<Operation>>,
    },
}

impl Operation {
    pub fn field(&self) -> &str {
        match self {
            Self::Compare { field, .. }
            | Self::In { field, .. }
            | Self::Match { field, .. }
            | Self::Null { field, .. }
            | Self::Between { field, .. }
            | Self::Not { field, .. }
            | Self::Any { field, .. } => field,
        }
    }

    /// Render with operands inlined as escaped SQL literals
    pub fn render(&self) -> String {
        self.render_aliased(None)
    }

    /// Render inline with an optional table alias
    pub fn render_aliased(&self, alias: Option<&str>) -> String {
        self.write(&mut SqlWriter {
            alias,
            params: None,
        })
    }

    /// Render with placeholders, pushing operands into `params`
    pub fn to_sql(&self, params: &mut SqlParams, options: &RenderOptions) -> String {
        self.write(&mut SqlWriter {
            alias: options.alias.as_deref(),
            params: Some((params, options.placeholder)),
        })
    }

    fn write(&self, w: &mut SqlWriter<'_>) -> String {
        match self {
            Self::Compare { field, op, value } => {
                format!("{} {} {}", w.column(field), op.as_sql(), w.scalar(value))
            }
            Self::In {
                field,
                values,
                negated,
            } => {
                if values.is_empty() {
                    // IN () is not valid SQL; an empty set matches nothing
                    let constant = if *negated { "1=1" } else { "1=0" };
                    return constant.to_string();
                }
                let col = w.column(field);
                let items: Vec<String> = values.iter().map(|v| w.scalar(v)).collect();
                let keyword = if *negated { "NOT IN" } else { "IN" };
                format!("{} {} ({})", col, keyword, items.join(", "))
            }
            Self::Match { field, op, pattern } => {
                let col = w.column(field);
                match op {
                    MatchOp::Like => format!("{} LIKE {}", col, w.text(pattern.clone())),
                    MatchOp::Contains | MatchOp::StartsWith | MatchOp::EndsWith => {
                        let escaped = escape_like_pattern(pattern);
                        let like = match op {
                            MatchOp::Contains => format!("%{}%", escaped),
                            MatchOp::StartsWith => format!("{}%", escaped),
                            _ => format!("%{}", escaped),
                        };
                        format!("{} LIKE {} ESCAPE '\\'", col, w.text(like))
                    }
                }
            }
            Self::Null { field, negated } => {
                let keyword = if *negated { "IS NOT NULL" } else { "IS NULL" };
                format!("{} {}", w.column(field), keyword)
            }
            Self::Between { field, low, high } => {
                let col = w.column(field);
                let low = w.scalar(low);
                let high = w.scalar(high);
                format!("{} BETWEEN {} AND {}", col, low, high)
            }
            Self::Not { operations, .. } => {
                format!("NOT ({})", write_all(operations, w, " AND "))
            }
            Self::Any { branches, .. } => {
                let parts: Vec<String> = branches
                    .iter()
                    .map(|branch| match branch.as_slice() {
                        [single] => single.write(w),
                        _ => format!("({})", write_all(branch, w, " AND ")),
                    })
                    .collect();
                format!("({})", parts.join(" OR "))
            }
        }
    }
}

fn write_all(operations: &[Operation], w: &mut SqlWriter<'_>, sep: &str) -> String {
    operations
        .iter()
        .map(|op| op.write(w))
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compare(field: &str, op: CompareOp, value: Scalar) -> Operation {
        Operation::Compare {
            field: field.to_string(),
            op,
            value,
        }
    }

    #[test]
    fn compare_all_operators() {
        let operators = [
            (CompareOp::Eq, "="),
            (CompareOp::Ne, "<>"),
            (CompareOp::Gt, ">"),
            (CompareOp::Gte, ">="),
            (CompareOp::Lt, "<"),
            (CompareOp::Lte, "<="),
        ];

        for (op, expected_op) in operators {
            let operation = compare("age", op, Scalar::Number("18".into()));
            assert_eq!(operation.render(), format!("age {} 18", expected_op));
        }
    }

    #[test]
    fn compare_string_is_quoted() {
        let operation = compare("name", CompareOp::Eq, Scalar::String("O'Brien".into()));
        assert_eq!(operation.render(), "name = 'O''Brien'");
    }

    #[test]
    fn compare_bool_renders_keyword() {
        let operation = compare("active", CompareOp::Eq, Scalar::Bool(true));
        assert_eq!(operation.render(), "active = TRUE");

        let mut params = SqlParams::default();
        let sql = operation.to_sql(&mut params, &RenderOptions::default());
        assert_eq!(sql, "active = TRUE");
        assert!(params.values.is_empty());
    }

    #[test]
    fn in_list_inline_and_params() {
        let operation = Operation::In {
            field: "status".into(),
            values: vec![Scalar::String("new".into()), Scalar::Number("3".into())],
            negated: false,
        };
        assert_eq!(operation.render(), "status IN ('new', 3)");

        let mut params = SqlParams::default();
        let sql = operation.to_sql(&mut params, &RenderOptions::default());
        assert_eq!(sql, "status IN (?, ?)");
        assert_eq!(params.values, vec!["new", "3"]);
    }

    #[test]
    fn in_list_empty() {
        let any = Operation::In {
            field: "id".into(),
            values: vec![],
            negated: false,
        };
        let none = Operation::In {
            field: "id".into(),
            values: vec![],
            negated: true,
        };
        assert_eq!(any.render(), "1=0");
        assert_eq!(none.render(), "1=1");
    }

    #[test]
    fn not_in_list() {
        let operation = Operation::In {
            field: "role".into(),
            values: vec![Scalar::String("admin".into())],
            negated: true,
        };
        assert_eq!(operation.render(), "role NOT IN ('admin')");
    }

    #[test]
    fn match_contains_escapes_wildcards() {
        let operation = Operation::Match {
            field: "title".into(),
            op: MatchOp::Contains,
            pattern: "100%".into(),
        };
        assert_eq!(operation.render(), r"title LIKE '%100\%%' ESCAPE '\'");

        let mut params = SqlParams::default();
        let sql = operation.to_sql(&mut params, &RenderOptions::default());
        assert_eq!(sql, r"title LIKE ? ESCAPE '\'");
        assert_eq!(params.values, vec![r"%100\%%"]);
    }

    #[test]
    fn match_prefix_suffix_and_raw_like() {
        let starts = Operation::Match {
            field: "name".into(),
            op: MatchOp::StartsWith,
            pattern: "Bo".into(),
        };
        let ends = Operation::Match {
            field: "name".into(),
            op: MatchOp::EndsWith,
            pattern: "ob".into(),
        };
        let like = Operation::Match {
            field: "name".into(),
            op: MatchOp::Like,
            pattern: "B_b%".into(),
        };
        assert_eq!(starts.render(), r"name LIKE 'Bo%' ESCAPE '\'");
        assert_eq!(ends.render(), r"name LIKE '%ob' ESCAPE '\'");
        assert_eq!(like.render(), "name LIKE 'B_b%'");
    }

    #[test]
    fn null_checks() {
        let is_null = Operation::Null {
            field: "deleted_at".into(),
            negated: false,
        };
        let not_null = Operation::Null {
            field: "deleted_at".into(),
            negated: true,
        };
        assert_eq!(is_null.render(), "deleted_at IS NULL");
        assert_eq!(not_null.render(), "deleted_at IS NOT NULL");
    }

    #[test]
    fn between_with_dollar_placeholders() {
        let operation = Operation::Between {
            field: "age".into(),
            low: Scalar::Number("18".into()),
            high: Scalar::Number("65".into()),
        };
        assert_eq!(operation.render(), "age BETWEEN 18 AND 65");

        let mut params = SqlParams::default();
        params.values.push("existing".into());
        let options = RenderOptions {
            alias: Some("u".into()),
            placeholder: Placeholder::Dollar,
        };
        let sql = operation.to_sql(&mut params, &options);
        assert_eq!(sql, "u.age BETWEEN $2 AND $3");
        assert_eq!(params.values, vec!["existing", "18", "65"]);
    }

    #[test]
    fn not_wraps_conjunction() {
        let operation = Operation::Not {
            field: "age".into(),
            operations: vec![
                compare("age", CompareOp::Gt, Scalar::Number("1".into())),
                compare("age", CompareOp::Lt, Scalar::Number("5".into())),
            ],
        };
        assert_eq!(operation.render(), "NOT (age > 1 AND age < 5)");
    }

    #[test]
    fn any_joins_branches_with_or() {
        let operation = Operation::Any {
            field: "age".into(),
            branches: vec![
                vec![compare("age", CompareOp::Lt, Scalar::Number("18".into()))],
                vec![
                    compare("age", CompareOp::Gt, Scalar::Number("65".into())),
                    compare("age", CompareOp::Ne, Scalar::Number("70".into())),
                ],
            ],
        };
        assert_eq!(
            operation.render(),
            "(age < 18 OR (age > 65 AND age <> 70))"
        );
        assert_eq!(
            operation.render_aliased(Some("p")),
            "(p.age < 18 OR (p.age > 65 AND p.age <> 70))"
        );
    }

    #[test]
    fn field_accessor() {
        let operation = Operation::Null {
            field: "email".into(),
            negated: false,
        };
        assert_eq!(operation.field(), "email");
    }
}
