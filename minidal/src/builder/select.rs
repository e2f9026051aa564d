//! SELECT statement builder

use super::common::{push_identifier, push_where_clause, Fields, Query};

/// Build `SELECT <columns> FROM <table>[ WHERE ...]`
///
/// An empty `columns` slice selects `*`; otherwise columns appear in the
/// given order. `table` and column names are written into the statement
/// verbatim and must come from trusted input; only filter values are
/// passed as arguments. A `%` inside a name is written as `%%` so it is not
/// mistaken for a placeholder.
///
/// # Examples
/// ```
/// use minidal::{build_select, Fields, Value};
///
/// let query = build_select("users", &["id", "name"], &Fields::new().with("age", 30));
/// assert_eq!(query.sql(), "SELECT id, name FROM users WHERE age = %s");
/// assert_eq!(query.parameters(), &[Value::I32(30)]);
/// ```
pub fn build_select(table: &str, columns: &[&str], filters: &Fields) -> Query {
    let mut sql = String::new();
    let mut parameters = Vec::with_capacity(filters.len());

    sql.push_str("SELECT ");
    if columns.is_empty() {
        sql.push('*');
    } else {
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            push_identifier(&mut sql, column);
        }
    }

    sql.push_str(" FROM ");
    push_identifier(&mut sql, table);

    push_where_clause(&mut sql, &mut parameters, filters);

    Query::new(sql, parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_select_all_without_filters() {
        let query = build_select("users", &[], &Fields::new());
        assert_eq!(query.sql(), "SELECT * FROM users");
        assert!(query.parameters().is_empty());
    }

    #[test]
    fn test_select_columns_with_single_filter() {
        let query = build_select("users", &["id", "name"], &Fields::new().with("age", 30));
        assert_eq!(query.sql(), "SELECT id, name FROM users WHERE age = %s");
        assert_eq!(query.parameters(), &[Value::I32(30)]);
    }

    #[test]
    fn test_select_single_column() {
        let query = build_select("users", &["email"], &Fields::new());
        assert_eq!(query.sql(), "SELECT email FROM users");
    }

    #[test]
    fn test_select_preserves_column_order() {
        let query = build_select("users", &["name", "id", "age"], &Fields::new());
        assert_eq!(query.sql(), "SELECT name, id, age FROM users");
    }

    #[test]
    fn test_select_multiple_filters() {
        let filters = Fields::new().with("name", "Bob").with("age", 5);
        let query = build_select("users", &[], &filters);
        assert_eq!(query.sql(), "SELECT * FROM users WHERE name = %s AND age = %s");
        assert_eq!(query.parameters(), &[Value::from("Bob"), Value::I32(5)]);
        assert_eq!(query.placeholder_count(), filters.len());
    }

    #[test]
    fn test_select_is_idempotent() {
        let filters = Fields::new().with("name", "Bob").with("age", 5);
        let first = build_select("users", &["id"], &filters);
        let second = build_select("users", &["id"], &filters);
        assert_eq!(first, second);
    }

    #[test]
    fn test_select_percent_in_column_is_escaped() {
        let query = build_select("t", &["100%s"], &Fields::new());
        assert_eq!(query.sql(), "SELECT 100%%s FROM t");
        assert_eq!(query.placeholder_count(), 0);
        assert_eq!(
            crate::render_placeholders(query.sql(), crate::PlaceholderStyle::QuestionMark),
            "SELECT 100%s FROM t"
        );
    }
}
