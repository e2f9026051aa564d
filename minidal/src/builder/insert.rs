//! INSERT statement builder

use super::common::{push_identifier, Fields, Query, PLACEHOLDER};
use crate::{Error, Result};

/// Build `INSERT INTO <table> (c1, c2) VALUES (%s, %s)`
///
/// Columns, placeholders and arguments follow the order of `values`.
/// Fails with [`Error::InvalidArgument`] when `values` is empty.
///
/// # Examples
/// ```
/// use minidal::{build_insert, Fields};
///
/// let query = build_insert("users", &Fields::new().with("name", "Bob").with("age", 5)).unwrap();
/// assert_eq!(query.sql(), "INSERT INTO users (name, age) VALUES (%s, %s)");
/// ```
pub fn build_insert(table: &str, values: &Fields) -> Result<Query> {
    if values.is_empty() {
        return Err(Error::invalid_argument(
            "INSERT requires at least one column value",
        ));
    }

    let placeholders = vec![PLACEHOLDER; values.len()];

    let mut sql = String::new();

    // INSERT INTO clause
    sql.push_str("INSERT INTO ");
    push_identifier(&mut sql, table);

    // Columns
    sql.push_str(" (");
    for (i, column) in values.columns().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        push_identifier(&mut sql, column);
    }
    sql.push(')');

    // VALUES clause
    sql.push_str(" VALUES (");
    sql.push_str(&placeholders.join(", "));
    sql.push(')');

    Ok(Query::new(sql, values.values().cloned().collect()))
}
