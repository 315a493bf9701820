//! Optional-filter predicates compiled into one parameterized `WHERE`.
//!
//! Listing queries collect any number of independent filters. Each present
//! filter becomes a typed [`Predicate`]; absent or blank ones add nothing.
//! Predicates are always combined with `AND`, and the `WHERE` keyword is
//! emitted only when at least one predicate exists.

use sqlx::{QueryBuilder, Sqlite};

/// Bound parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Int(i64),
    Text(String),
    Bool(bool),
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `column = ?`
    Eq {
        column: &'static str,
        value: SqlValue,
    },
    /// `(col1 LIKE ? ESCAPE '\' OR ...)` with `%needle%`, wildcards in the
    /// needle matched literally.
    Contains {
        columns: &'static [&'static str],
        needle: String,
    },
}

/// Accumulated predicates for one listing query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conditions {
    predicates: Vec<Predicate>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.predicates.push(Predicate::Eq {
            column,
            value: value.into(),
        });
        self
    }

    /// Add `column = value` only when a value is present.
    pub fn eq_opt<V: Into<SqlValue>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.eq(column, v),
            None => self,
        }
    }

    /// Add a substring match over `columns` unless the needle is absent or blank.
    pub fn contains(mut self, columns: &'static [&'static str], needle: Option<&str>) -> Self {
        if let Some(needle) = needle.map(str::trim).filter(|s| !s.is_empty()) {
            if !columns.is_empty() {
                self.predicates.push(Predicate::Contains {
                    columns,
                    needle: needle.to_string(),
                });
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Append ` WHERE p1 AND p2 ...` with bound values, or nothing if empty.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        if self.predicates.is_empty() {
            return;
        }

        qb.push(" WHERE ");
        for (i, predicate) in self.predicates.iter().enumerate() {
            if i > 0 {
                qb.push(" AND ");
            }
            match predicate {
                Predicate::Eq { column, value } => {
                    qb.push(*column).push(" = ");
                    push_value(qb, value);
                }
                Predicate::Contains { columns, needle } => {
                    let pattern = format!("%{}%", escape_like(needle));
                    qb.push("(");
                    for (j, column) in columns.iter().enumerate() {
                        if j > 0 {
                            qb.push(" OR ");
                        }
                        qb.push(*column)
                            .push(" LIKE ")
                            .push_bind(pattern.clone())
                            .push(" ESCAPE '\\'");
                    }
                    qb.push(")");
                }
            }
        }
    }
}

fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_value(qb: &mut QueryBuilder<'_, Sqlite>, value: &SqlValue) {
    match value {
        SqlValue::Int(v) => qb.push_bind(*v),
        SqlValue::Text(v) => qb.push_bind(v.clone()),
        SqlValue::Bool(v) => qb.push_bind(*v),
    };
}
