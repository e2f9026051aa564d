//! Statement execution and the connection interface

use crate::builder::{build_delete, build_insert, build_select, build_update, Fields, Query};
use crate::{Error, Result, Row, Value};
use serde::de::DeserializeOwned;
use std::future::Future;

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

/// The narrow contract a backing store has to satisfy
///
/// Both methods receive the `%s` template exactly as built; implementations
/// rewrite the markers with [`render_placeholders`] and bind `params` through
/// the driver. Errors are returned as the driver reported them.
pub trait Connection: Send + Sync {
    /// Execute a statement and return the number of affected rows
    fn execute(&self, sql: &str, params: &[Value]) -> impl Future<Output = Result<u64>> + Send;

    /// Execute a statement and return every resulting row
    fn fetch_all(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<Vec<Row>>> + Send;
}

/// What the caller wants back from [`Executor::execute`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// The full result set
    Rows,
    /// The affected-row count
    Count,
}

/// Result of executing a statement
///
/// The row count of `Rows` and the affected count of `Count` are unrelated
/// numbers: a SELECT affects nothing, an UPDATE returns no rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Rows(Vec<Row>),
    Count(u64),
}

impl Outcome {
    pub fn into_rows(self) -> Result<Vec<Row>> {
        match self {
            Outcome::Rows(rows) => Ok(rows),
            Outcome::Count(_) => Err(Error::UnexpectedOutcome { expected: "rows" }),
        }
    }

    pub fn into_count(self) -> Result<u64> {
        match self {
            Outcome::Count(count) => Ok(count),
            Outcome::Rows(_) => Err(Error::UnexpectedOutcome {
                expected: "an affected-row count",
            }),
        }
    }
}

/// Placeholder syntax understood by a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?` (MySQL, SQLite)
    QuestionMark,
    /// `$1`, `$2`, ... (PostgreSQL)
    Dollar,
}

/// Rewrite `%s` markers into the driver's placeholder syntax
///
/// `%%` becomes a literal `%`; every other character is copied through.
/// Values are never touched here, they are bound by the driver.
///
/// # Examples
/// ```
/// use minidal::{render_placeholders, PlaceholderStyle};
///
/// let sql = "UPDATE users SET age = %s WHERE name = %s";
/// assert_eq!(
///     render_placeholders(sql, PlaceholderStyle::Dollar),
///     "UPDATE users SET age = $1 WHERE name = $2"
/// );
/// ```
pub fn render_placeholders(template: &str, style: PlaceholderStyle) -> String {
    let mut sql = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut index = 0;

    while let Some(c) = chars.next() {
        if c == '%' {
            match chars.peek() {
                Some('s') => {
                    chars.next();
                    index += 1;
                    match style {
                        PlaceholderStyle::QuestionMark => sql.push('?'),
                        PlaceholderStyle::Dollar => sql.push_str(&format!("${}", index)),
                    }
                    continue;
                }
                Some('%') => {
                    chars.next();
                    sql.push('%');
                    continue;
                }
                _ => {}
            }
        }
        sql.push(c);
    }

    sql
}

/// Runs built statements against one connection
///
/// `execute` is the only path to the connection. If the connection cannot be
/// used concurrently, the owner of the executor has to serialize access.
#[derive(Debug, Clone)]
pub struct Executor<C> {
    connection: C,
}

impl<C> Executor<C>
where
    C: Connection,
{
    pub fn new(connection: C) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn into_inner(self) -> C {
        self.connection
    }

    /// Send a built statement to the connection and shape the result as requested
    pub async fn execute(&self, query: &Query, expect: Expect) -> Result<Outcome> {
        tracing::debug!(
            sql = query.sql(),
            params = query.parameters().len(),
            ?expect,
            "executing statement"
        );

        let result = match expect {
            Expect::Rows => self
                .connection
                .fetch_all(query.sql(), query.parameters())
                .await
                .map(Outcome::Rows),
            Expect::Count => self
                .connection
                .execute(query.sql(), query.parameters())
                .await
                .map(Outcome::Count),
        };

        if let Err(err) = &result {
            tracing::warn!(sql = query.sql(), error = %err, "statement failed");
        }

        result
    }

    /// Select rows from `table`; empty `columns` selects every column
    pub async fn select(&self, table: &str, columns: &[&str], filters: &Fields) -> Result<Vec<Row>> {
        let query = build_select(table, columns, filters);
        self.execute(&query, Expect::Rows).await?.into_rows()
    }

    /// Select rows and deserialize each one into `T`
    pub async fn select_as<T>(&self, table: &str, columns: &[&str], filters: &Fields) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        self.select(table, columns, filters)
            .await?
            .iter()
            .map(|row| row.decode())
            .collect()
    }

    /// Insert one row, returning the affected-row count
    pub async fn insert(&self, table: &str, values: &Fields) -> Result<u64> {
        let query = build_insert(table, values)?;
        self.execute(&query, Expect::Count).await?.into_count()
    }

    /// Update matching rows (all rows when `filters` is empty)
    pub async fn update(&self, table: &str, values: &Fields, filters: &Fields) -> Result<u64> {
        let query = build_update(table, values, filters)?;
        self.execute(&query, Expect::Count).await?.into_count()
    }

    /// Delete matching rows (all rows when `filters` is empty)
    pub async fn delete(&self, table: &str, filters: &Fields) -> Result<u64> {
        let query = build_delete(table, filters);
        self.execute(&query, Expect::Count).await?.into_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::{Arc, Mutex};
    use tokio_test::{assert_err, assert_ok};

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: i32,
        name: String,
    }

    type Calls = Arc<Mutex<Vec<(&'static str, String, Vec<Value>)>>>;

    // Records every call and answers with canned data
    #[derive(Clone, Default)]
    struct RecordingConnection {
        calls: Calls,
        rows: Vec<Row>,
        affected: u64,
        should_fail: bool,
    }

    impl RecordingConnection {
        fn with_rows(rows: Vec<Row>) -> Self {
            Self {
                rows,
                ..Self::default()
            }
        }

        fn with_affected(affected: u64) -> Self {
            Self {
                affected,
                ..Self::default()
            }
        }

        fn with_failure() -> Self {
            Self {
                should_fail: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<(&'static str, String, Vec<Value>)> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, method: &'static str, sql: &str, params: &[Value]) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((method, sql.to_string(), params.to_vec()));
            if self.should_fail {
                Err(sqlx::Error::Protocol("mock backend failure".to_string()).into())
            } else {
                Ok(())
            }
        }
    }

    impl Connection for RecordingConnection {
        async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
            self.record("execute", sql, params)?;
            Ok(self.affected)
        }

        async fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
            self.record("fetch_all", sql, params)?;
            Ok(self.rows.clone())
        }
    }

    fn user_row(id: i32, name: &str) -> Row {
        let mut row = Row::new();
        row.push("id", Value::I32(id));
        row.push("name", Value::from(name));
        row
    }

    #[tokio::test]
    async fn test_select_fetches_rows_with_filter_arguments_in_order() {
        let connection = RecordingConnection::with_rows(vec![user_row(1, "John"), user_row(2, "Jane")]);
        let executor = Executor::new(connection.clone());

        let filters = Fields::new().with("age", 30).with("name", "John");
        let rows = executor.select("users", &["id", "name"], &filters).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("name"), Some(&Value::from("Jane")));

        let calls = connection.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "fetch_all");
        assert_eq!(calls[0].1, "SELECT id, name FROM users WHERE age = %s AND name = %s");
        assert_eq!(calls[0].2, vec![Value::I32(30), Value::from("John")]);
    }

    #[tokio::test]
    async fn test_select_as_decodes_rows() {
        let executor = Executor::new(RecordingConnection::with_rows(vec![user_row(1, "John")]));
        let users: Vec<User> = executor.select_as("users", &[], &Fields::new()).await.unwrap();
        assert_eq!(
            users,
            vec![User {
                id: 1,
                name: "John".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_insert_returns_affected_count() {
        let connection = RecordingConnection::with_affected(1);
        let executor = Executor::new(connection.clone());

        let values = Fields::new().with("name", "Bob").with("age", 5);
        let affected = executor.insert("users", &values).await.unwrap();
        assert_eq!(affected, 1);

        let calls = connection.calls();
        assert_eq!(calls[0].0, "execute");
        assert_eq!(calls[0].1, "INSERT INTO users (name, age) VALUES (%s, %s)");
    }

    #[tokio::test]
    async fn test_update_and_delete_use_execute() {
        let connection = RecordingConnection::with_affected(3);
        let executor = Executor::new(connection.clone());

        let updated = executor
            .update("users", &Fields::new().with("age", 6), &Fields::new().with("name", "Bob"))
            .await
            .unwrap();
        let deleted = executor.delete("users", &Fields::new()).await.unwrap();
        assert_eq!((updated, deleted), (3, 3));

        let calls = connection.calls();
        assert_eq!(calls[0].1, "UPDATE users SET age = %s WHERE name = %s");
        assert_eq!(calls[0].2, vec![Value::I32(6), Value::from("Bob")]);
        assert_eq!(calls[1].1, "DELETE FROM users");
        assert!(calls[1].2.is_empty());
    }

    #[tokio::test]
    async fn test_execute_rows_and_count_are_independent() {
        let connection = RecordingConnection {
            rows: vec![user_row(1, "John")],
            affected: 0,
            ..RecordingConnection::default()
        };
        let executor = Executor::new(connection);
        let query = Query::new("SELECT * FROM users", Vec::new());

        let rows = executor.execute(&query, Expect::Rows).await.unwrap();
        assert_eq!(rows, Outcome::Rows(vec![user_row(1, "John")]));

        let count = executor.execute(&query, Expect::Count).await.unwrap();
        assert_eq!(count, Outcome::Count(0));
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_connection() {
        let connection = RecordingConnection::default();
        let executor = Executor::new(connection.clone());

        assert_err!(executor.insert("users", &Fields::new()).await);
        assert_err!(
            executor
                .update("users", &Fields::new(), &Fields::new().with("id", 1))
                .await
        );
        assert!(connection.calls().is_empty());
    }

    #[tokio::test]
    async fn test_backend_errors_propagate_unchanged() {
        let executor = Executor::new(RecordingConnection::with_failure());

        let err = executor.select("users", &[], &Fields::new()).await.unwrap_err();
        match err {
            Error::Database(sqlx::Error::Protocol(msg)) => assert_eq!(msg, "mock backend failure"),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = executor.delete("users", &Fields::new().with("id", 1)).await.unwrap_err();
        assert!(err.is_database());
    }

    #[test]
    fn test_executor_runs_on_blocking_runtime() {
        let executor = Executor::new(RecordingConnection::with_affected(2));
        let affected = tokio_test::block_on(executor.delete("users", &Fields::new().with("age", 13)));
        let affected = assert_ok!(affected);
        assert_eq!(affected, 2);
    }

    #[test]
    fn test_outcome_conversions() {
        assert_eq!(Outcome::Count(4).into_count().unwrap(), 4);
        assert!(Outcome::Rows(Vec::new()).into_rows().unwrap().is_empty());
        assert!(matches!(
            Outcome::Count(4).into_rows(),
            Err(Error::UnexpectedOutcome { expected: "rows" })
        ));
        assert!(Outcome::Rows(Vec::new()).into_count().is_err());
    }

    #[test]
    fn test_render_question_mark_placeholders() {
        let sql = "SELECT * FROM users WHERE name = %s AND age = %s";
        assert_eq!(
            render_placeholders(sql, PlaceholderStyle::QuestionMark),
            "SELECT * FROM users WHERE name = ? AND age = ?"
        );
    }

    #[test]
    fn test_render_dollar_placeholders_are_numbered() {
        let sql = "INSERT INTO users (name, age, email) VALUES (%s, %s, %s)";
        assert_eq!(
            render_placeholders(sql, PlaceholderStyle::Dollar),
            "INSERT INTO users (name, age, email) VALUES ($1, $2, $3)"
        );
    }

    #[test]
    fn test_render_keeps_other_percent_signs() {
        assert_eq!(
            render_placeholders("SELECT 10 %% 3, '%d' FROM t", PlaceholderStyle::QuestionMark),
            "SELECT 10 % 3, '%d' FROM t"
        );
        assert_eq!(render_placeholders("trailing %", PlaceholderStyle::Dollar), "trailing %");
    }
}
