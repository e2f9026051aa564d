//! DELETE statement builder

use super::common::{push_identifier, push_where_clause, Fields, Query};

/// Build `DELETE FROM <table>[ WHERE f1 = %s AND ...]`
///
/// Empty filters produce a bare `DELETE FROM <table>`, which removes every row.
pub fn build_delete(table: &str, filters: &Fields) -> Query {
    let mut sql = String::new();
    let mut parameters = Vec::with_capacity(filters.len());

    // DELETE FROM clause
    sql.push_str("DELETE FROM ");
    push_identifier(&mut sql, table);

    // WHERE clause
    push_where_clause(&mut sql, &mut parameters, filters);

    Query::new(sql, parameters)
}
