//! UPDATE statement builder

use super::common::{push_assignments, push_identifier, push_where_clause, Fields, Query};
use crate::{Error, Result};

/// Build `UPDATE <table> SET c1 = %s, c2 = %s[ WHERE f1 = %s AND ...]`
///
/// Arguments are the SET values followed by the filter values. With no
/// filters the WHERE clause is left out and every row is updated. Fails with
/// [`Error::InvalidArgument`] when `values` is empty.
pub fn build_update(table: &str, values: &Fields, filters: &Fields) -> Result<Query> {
    if values.is_empty() {
        return Err(Error::invalid_argument("UPDATE requires SET clauses"));
    }

    let mut sql = String::new();
    let mut parameters = Vec::with_capacity(values.len() + filters.len());

    // UPDATE clause
    sql.push_str("UPDATE ");
    push_identifier(&mut sql, table);

    // SET clause
    sql.push_str(" SET ");
    push_assignments(&mut sql, &mut parameters, values, ", ");

    // WHERE clause
    push_where_clause(&mut sql, &mut parameters, filters);

    Ok(Query::new(sql, parameters))
}
