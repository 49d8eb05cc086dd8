//! Boolean condition tree rendered as SQL.
//!
//! Conditions are built from a handful of leaf comparisons and combined with
//! `AND`/`OR`. Rendering always parenthesises composite nodes, so the output can
//! be spliced into an existing `WHERE` clause without precedence surprises.
//!
//! Case-insensitive matches lowercase the needle with the same folding the
//! store's `LOWER()` applies: ASCII only for SQLite, full Unicode for MySQL.

use std::fmt;

use crate::{Column, Dialect, Ident, LIKE_ESCAPE, escape_like, quote_literal};

/// A SQL boolean condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Exact equality against a string value.
    Equals {
        /// Column being compared.
        column: Column,
        /// Expected value.
        value: String,
    },

    /// Case-insensitive substring match.
    Contains {
        /// Column being searched.
        column: Column,
        /// Substring to look for, as given; folded at render time.
        needle: String,
    },

    /// Correlated `EXISTS` over another table.
    ///
    /// Renders `EXISTS (SELECT 1 FROM <table> AS <alias> WHERE <inner> = <outer>
    /// AND <filter>)`, where `inner` belongs to the alias and `outer` to the
    /// enclosing query.
    Exists {
        /// Table scanned by the subquery.
        table: Ident,
        /// Alias of `table` inside the subquery.
        alias: Ident,
        /// Subquery column correlated with `outer`.
        inner: Column,
        /// Enclosing-query column.
        outer: Column,
        /// Condition on the subquery rows.
        filter: Box<Self>,
    },

    /// Column is NULL or the empty string.
    Empty {
        /// Column being tested.
        column: Column,
    },

    /// Conjunction: all sub-conditions must hold.
    And(Vec<Self>),

    /// Disjunction: at least one sub-condition must hold.
    Or(Vec<Self>),
}

impl Condition {
    /// Creates an equality comparison.
    pub fn equals(column: Column, value: impl Into<String>) -> Self {
        Self::Equals {
            column,
            value: value.into(),
        }
    }

    /// Creates a case-insensitive substring comparison.
    pub fn contains(column: Column, needle: &str) -> Self {
        Self::Contains {
            column,
            needle: needle.to_string(),
        }
    }

    /// Creates a correlated existence test on `table`.
    pub fn exists(table: Ident, alias: Ident, inner: Column, outer: Column, filter: Self) -> Self {
        Self::Exists {
            table,
            alias,
            inner,
            outer,
            filter: Box::new(filter),
        }
    }

    /// Creates an emptiness test.
    pub fn empty(column: Column) -> Self {
        Self::Empty { column }
    }

    /// Creates an And condition, flattening nested Ands.
    pub fn and(conditions: Vec<Self>) -> Self {
        let mut flattened: Vec<Self> = conditions
            .into_iter()
            .flat_map(|c| match c {
                Self::And(inner) => inner,
                other => vec![other],
            })
            .collect();

        if flattened.len() == 1 {
            return flattened.remove(0);
        }
        Self::And(flattened)
    }

    /// Creates an Or condition, flattening nested Ors.
    pub fn or(conditions: Vec<Self>) -> Self {
        let mut flattened: Vec<Self> = conditions
            .into_iter()
            .flat_map(|c| match c {
                Self::Or(inner) => inner,
                other => vec![other],
            })
            .collect();

        if flattened.len() == 1 {
            return flattened.remove(0);
        }
        Self::Or(flattened)
    }

    /// Returns the direct children of an And/Or node; leaves have none.
    pub fn operands(&self) -> &[Self] {
        match self {
            Self::And(items) | Self::Or(items) => items,
            _ => &[],
        }
    }

    /// Renders the condition as SQL text for the given dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        let mut out = String::new();
        self.write_sql(&mut out, dialect);
        out
    }

    /// Appends the SQL rendering of this condition to `out`.
    fn write_sql(&self, out: &mut String, dialect: Dialect) {
        match self {
            Self::Equals { column, value } => {
                out.push_str(&format!("{column} = {}", quote_literal(value, dialect)));
            }
            Self::Contains { column, needle } => {
                let pattern = format!("%{}%", escape_like(&fold_case(needle, dialect)));
                out.push_str(&format!(
                    "LOWER({column}) LIKE {} ESCAPE '{LIKE_ESCAPE}'",
                    quote_literal(&pattern, dialect)
                ));
            }
            Self::Exists {
                table,
                alias,
                inner,
                outer,
                filter,
            } => {
                out.push_str(&format!(
                    "EXISTS (SELECT 1 FROM {table} AS {alias} WHERE {inner} = {outer} AND "
                ));
                filter.write_sql(out, dialect);
                out.push(')');
            }
            Self::Empty { column } => {
                out.push_str(&format!("COALESCE({column}, '') = ''"));
            }
            Self::And(items) => write_joined(out, items, " AND ", "1=1", dialect),
            Self::Or(items) => write_joined(out, items, " OR ", "1=0", dialect),
        }
    }

    /// Formats the condition as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Equals { column, value } => writeln!(f, "{prefix}Equals({column}, {value:?})"),
            Self::Contains { column, needle } => {
                writeln!(f, "{prefix}Contains({column}, {needle:?})")
            }
            Self::Empty { column } => writeln!(f, "{prefix}Empty({column})"),
            Self::Exists {
                table,
                inner,
                outer,
                filter,
                ..
            } => {
                writeln!(f, "{prefix}Exists({table}, {inner} = {outer})")?;
                filter.fmt_tree(f, indent + 1)
            }
            Self::And(items) => {
                writeln!(f, "{prefix}And")?;
                for item in items {
                    item.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
            Self::Or(items) => {
                writeln!(f, "{prefix}Or")?;
                for item in items {
                    item.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Lowercases `text` the way the dialect's `LOWER()` does.
fn fold_case(text: &str, dialect: Dialect) -> String {
    match dialect {
        Dialect::Sqlite => text.to_ascii_lowercase(),
        Dialect::MySql => text.to_lowercase(),
    }
}

/// Writes a parenthesised list of conditions joined by `separator`.
///
/// An empty list renders as `identity` so the output stays valid SQL.
fn write_joined(
    out: &mut String,
    items: &[Condition],
    separator: &str,
    identity: &str,
    dialect: Dialect,
) {
    if items.is_empty() {
        out.push_str(identity);
        return;
    }
    out.push('(');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        item.write_sql(out, dialect);
    }
    out.push(')');
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
