//! SQLite backend over a SQLx pool

use super::{render_placeholders, Connection, PlaceholderStyle};
use crate::{Error, Result, Row, Value};
use futures::TryStreamExt;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

/// SQLite connection pool wrapper
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    inner: SqlitePool,
}

impl SqliteBackend {
    /// Open a database from a `sqlite:` URL
    pub async fn connect_url(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url).await?;
        Ok(Self { inner: pool })
    }

    /// A private in-memory database
    ///
    /// Limited to a single pooled connection: every connection to
    /// `sqlite::memory:` would otherwise open its own empty database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { inner: pool })
    }

    /// Create from an existing SqlitePool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { inner: pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.inner
    }
}

impl Connection for SqliteBackend {
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        let sql = render_placeholders(sql, PlaceholderStyle::QuestionMark);
        let query = bind_values_to_query(sqlx::query(&sql), params);
        let result = query.execute(&self.inner).await?;
        Ok(result.rows_affected())
    }

    async fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let sql = render_placeholders(sql, PlaceholderStyle::QuestionMark);
        let query = bind_values_to_query(sqlx::query(&sql), params);

        let mut stream = query.fetch(&self.inner);
        let mut rows = Vec::new();
        while let Some(row) = stream.try_next().await? {
            rows.push(decode_row(&row)?);
        }
        Ok(rows)
    }
}

/// Bind Values to a SQLx query in placeholder order
fn bind_values_to_query<'q>(
    mut query: sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &'q [Value],
) -> sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            Value::Null => query.bind(None::<i32>),
            Value::Bool(b) => query.bind(*b),
            Value::I32(i) => query.bind(*i),
            Value::I64(i) => query.bind(*i),
            Value::F32(f) => query.bind(*f),
            Value::F64(f) => query.bind(*f),
            Value::String(s) => query.bind(s.as_str()),
            Value::Bytes(b) => query.bind(b.as_slice()),
            // No JSON storage class: stored as text
            Value::Json(j) => query.bind(j.to_string()),
            #[cfg(feature = "datetime-support")]
            Value::Date(d) => query.bind(*d),
            #[cfg(feature = "datetime-support")]
            Value::Time(t) => query.bind(*t),
            #[cfg(feature = "datetime-support")]
            Value::DateTime(dt) => query.bind(*dt),
            #[cfg(feature = "datetime-support")]
            Value::Timestamp(ts) => query.bind(*ts),
            #[cfg(feature = "decimal-support")]
            Value::Decimal(d) => query.bind(d.to_string()),
            #[cfg(feature = "uuid-support")]
            Value::Uuid(u) => query.bind(u.hyphenated().to_string()),
        };
    }
    query
}

fn decode_row(row: &SqliteRow) -> Result<Row> {
    let mut decoded = Row::with_capacity(row.columns().len());
    for column in row.columns() {
        decoded.push(column.name(), decode_column(row, column.ordinal(), column.name())?);
    }
    Ok(decoded)
}

// Columns are typed by the storage class of the stored value, not the declared type
fn decode_column(row: &SqliteRow, index: usize, name: &str) -> Result<Value> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let storage_class = raw.type_info().name().to_string();

    let value = match storage_class.as_str() {
        "INTEGER" => Value::I64(row.try_get_unchecked(index)?),
        "REAL" => Value::F64(row.try_get_unchecked(index)?),
        "TEXT" => Value::String(row.try_get_unchecked(index)?),
        "BLOB" => Value::Bytes(row.try_get_unchecked(index)?),
        _ => return Err(Error::decode(name, storage_class)),
    };
    Ok(value)
}
