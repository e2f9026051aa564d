//! Types shared by all statement builders

use crate::Value;

/// Positional placeholder emitted into every template
pub const PLACEHOLDER: &str = "%s";

/// A built statement: a template with `%s` placeholders and the arguments that fill them
///
/// Argument `i` fills the `i`-th placeholder in left-to-right textual order.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    sql: String,
    parameters: Vec<Value>,
}

impl Query {
    /// Wrap a hand-written template and its arguments
    pub fn new(sql: impl Into<String>, parameters: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            parameters,
        }
    }

    /// The statement template
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The placeholder arguments, in placeholder order
    pub fn parameters(&self) -> &[Value] {
        &self.parameters
    }

    /// Number of `%s` placeholders in the template, not counting escaped `%%s`
    pub fn placeholder_count(&self) -> usize {
        let mut count = 0;
        let mut chars = self.sql.chars();
        while let Some(c) = chars.next() {
            if c == '%' {
                match chars.next() {
                    Some('s') => count += 1,
                    Some(_) | None => {}
                }
            }
        }
        count
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.parameters)
    }
}

/// Ordered column/value pairs, used for inserted values, SET lists and filters
///
/// Iteration follows insertion order, which fixes the order of columns,
/// placeholders and arguments in the built statement. Pushing a column that
/// is already present replaces its value and keeps its position.
///
/// # Examples
/// ```
/// use minidal::Fields;
///
/// let values = Fields::new().with("name", "Bob").with("age", 5);
/// assert_eq!(values.columns().collect::<Vec<_>>(), ["name", "age"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, Value)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pair, consuming and returning the set
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    /// Add a pair, replacing the value in place if the column is already present
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == column) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == column)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(column, value)| (column.as_str(), value))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(column, _)| column.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (column, value) in iter {
            fields.push(column, value);
        }
        fields
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Fields
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K, V> From<Vec<(K, V)>> for Fields
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

/// Append a table or column name, doubling `%` so it survives placeholder rendering
pub(crate) fn push_identifier(sql: &mut String, identifier: &str) {
    for c in identifier.chars() {
        if c == '%' {
            sql.push('%');
        }
        sql.push(c);
    }
}

/// Append ` WHERE a = %s AND b = %s` for the filters and push their values
///
/// Does nothing for an empty filter set: no filter matches every row.
pub(crate) fn push_where_clause(sql: &mut String, parameters: &mut Vec<Value>, filters: &Fields) {
    if filters.is_empty() {
        return;
    }

    sql.push_str(" WHERE ");
    push_assignments(sql, parameters, filters, " AND ");
}

/// Render `col = %s` for each pair, joined by `separator`, pushing values in order
pub(crate) fn push_assignments(
    sql: &mut String,
    parameters: &mut Vec<Value>,
    fields: &Fields,
    separator: &str,
) {
    for (i, (column, value)) in fields.iter().enumerate() {
        if i > 0 {
            sql.push_str(separator);
        }
        push_identifier(sql, column);
        sql.push_str(" = ");
        sql.push_str(PLACEHOLDER);
        parameters.push(value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn where_clause(filters: &Fields) -> (String, Vec<Value>) {
        let mut sql = String::new();
        let mut parameters = Vec::new();
        push_where_clause(&mut sql, &mut parameters, filters);
        (sql, parameters)
    }

    #[test]
    fn test_empty_filters_render_nothing() {
        let (sql, parameters) = where_clause(&Fields::new());
        assert_eq!(sql, "");
        assert!(parameters.is_empty());
    }

    #[test]
    fn test_single_filter_has_no_and() {
        let (sql, parameters) = where_clause(&Fields::new().with("age", 30));
        assert_eq!(sql, " WHERE age = %s");
        assert_eq!(parameters, vec![Value::I32(30)]);
    }

    #[test]
    fn test_filters_joined_with_and_in_order() {
        let filters = Fields::new()
            .with("name", "Bob")
            .with("age", 5)
            .with("active", true);
        let (sql, parameters) = where_clause(&filters);
        assert_eq!(sql, " WHERE name = %s AND age = %s AND active = %s");
        assert_eq!(
            parameters,
            vec![Value::from("Bob"), Value::I32(5), Value::Bool(true)]
        );
    }

    #[test]
    fn test_push_replaces_existing_column_in_place() {
        let mut fields = Fields::new().with("a", 1).with("b", 2);
        fields.push("a", 10);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.columns().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(fields.get("a"), Some(&Value::I32(10)));
    }

    #[test]
    fn test_fields_from_pairs_keep_order() {
        let fields = Fields::from([("z", 1), ("a", 2), ("m", 3)]);
        assert_eq!(fields.columns().collect::<Vec<_>>(), ["z", "a", "m"]);
        assert_eq!(
            fields.values().cloned().collect::<Vec<_>>(),
            vec![Value::I32(1), Value::I32(2), Value::I32(3)]
        );
        assert_eq!(fields.get("missing"), None);
    }

    #[test]
    fn test_placeholder_count() {
        let query = Query::new(
            "UPDATE users SET age = %s WHERE name = %s",
            vec![Value::I32(6), Value::from("Bob")],
        );
        assert_eq!(query.placeholder_count(), 2);
        assert_eq!(query.placeholder_count(), query.parameters().len());
    }

    #[test]
    fn test_placeholder_count_skips_escaped_percent() {
        let query = Query::new("SELECT 100%%s FROM t WHERE a = %s", vec![Value::I32(1)]);
        assert_eq!(query.placeholder_count(), 1);

        let query = Query::new("SELECT '%%%s' FROM t", vec![Value::from("x")]);
        assert_eq!(query.placeholder_count(), 1);
    }

    #[test]
    fn test_identifier_percent_is_doubled() {
        let mut sql = String::new();
        push_identifier(&mut sql, "rate%s");
        assert_eq!(sql, "rate%%s");

        let (sql, parameters) = where_clause(&Fields::new().with("pct%", 5));
        assert_eq!(sql, " WHERE pct%% = %s");
        assert_eq!(parameters.len(), 1);
    }
}
