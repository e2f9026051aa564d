//! MySQL backend over a SQLx pool

use super::{render_placeholders, Connection, PlaceholderStyle};
use crate::{ConnectionConfig, Error, Result, Row, Value};
use futures::TryStreamExt;
use sqlx::mysql::{MySql, MySqlArguments, MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

/// MySQL connection wrapper
///
/// Statements run outside explicit transactions, so each one commits on its own.
#[derive(Debug, Clone)]
pub struct MySqlBackend {
    inner: MySqlPool,
}

impl MySqlBackend {
    /// Connect using host/user/database settings
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let mut options = MySqlConnectOptions::new()
            .host(&config.host)
            .username(&config.user)
            .database(&config.database);
        if let Some(port) = config.port {
            options = options.port(port);
        }
        if let Some(password) = &config.password {
            options = options.password(password);
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_with(options)
            .await?;
        Ok(Self { inner: pool })
    }

    /// Connect from a `mysql://` URL
    pub async fn connect_url(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url).await?;
        Ok(Self { inner: pool })
    }

    /// Create from an existing MySqlPool
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { inner: pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.inner
    }
}

impl Connection for MySqlBackend {
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
    mut query: sqlx::query::Query<'q, MySql, MySqlArguments>,
    params: &'q [Value],
) -> sqlx::query::Query<'q, MySql, MySqlArguments> {
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
            Value::Json(j) => query.bind(j),
            Value::Date(d) => query.bind(*d),
            Value::Time(t) => query.bind(*t),
            Value::DateTime(dt) => query.bind(*dt),
            Value::Timestamp(ts) => query.bind(*ts),
            Value::Decimal(d) => query.bind(*d),
            // No native UUID type: CHAR(36) text form
            #[cfg(feature = "uuid-support")]
            Value::Uuid(u) => query.bind(u.hyphenated().to_string()),
        };
    }
    query
}

/// How a column of a given server type becomes a `Value`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Bool,
    Int,
    Unsigned,
    BigUnsigned,
    Year,
    Bits,
    Float,
    Double,
    Decimal,
    Text,
    Bytes,
    Json,
    Date,
    Time,
    DateTime,
    Timestamp,
}

fn column_kind(type_name: &str) -> Option<ColumnKind> {
    let kind = match type_name {
        "BOOLEAN" => ColumnKind::Bool,
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => ColumnKind::Int,
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED" => ColumnKind::Unsigned,
        "BIGINT UNSIGNED" => ColumnKind::BigUnsigned,
        "YEAR" => ColumnKind::Year,
        "BIT" => ColumnKind::Bits,
        "FLOAT" => ColumnKind::Float,
        "DOUBLE" => ColumnKind::Double,
        "DECIMAL" => ColumnKind::Decimal,
        "CHAR" | "VARCHAR" | "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET" => ColumnKind::Text,
        "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" => ColumnKind::Bytes,
        "JSON" => ColumnKind::Json,
        "DATE" => ColumnKind::Date,
        "TIME" => ColumnKind::Time,
        "DATETIME" => ColumnKind::DateTime,
        "TIMESTAMP" => ColumnKind::Timestamp,
        _ => return None,
    };
    Some(kind)
}

/// BIT(n) arrives as big-endian bytes, at most eight of them
fn bits_to_i64(bytes: &[u8]) -> Option<i64> {
    if bytes.len() > 8 {
        return None;
    }
    let unsigned = bytes.iter().fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));
    i64::try_from(unsigned).ok()
}

fn decode_row(row: &MySqlRow) -> Result<Row> {
    let mut decoded = Row::with_capacity(row.columns().len());
    for column in row.columns() {
        let value = decode_column(row, column.ordinal(), column.name(), column.type_info().name())?;
        decoded.push(column.name(), value);
    }
    Ok(decoded)
}

fn decode_column(row: &MySqlRow, index: usize, name: &str, type_name: &str) -> Result<Value> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }
    let kind = column_kind(type_name).ok_or_else(|| Error::decode(name, type_name))?;

    let value = match kind {
        ColumnKind::Bool => Value::Bool(row.try_get(index)?),
        ColumnKind::Int => Value::I64(row.try_get(index)?),
        ColumnKind::Unsigned => Value::I64(i64::from(row.try_get::<u32, _>(index)?)),
        ColumnKind::BigUnsigned => {
            let unsigned: u64 = row.try_get(index)?;
            Value::I64(i64::try_from(unsigned).map_err(|_| Error::decode(name, type_name))?)
        }
        ColumnKind::Year => Value::I64(i64::from(row.try_get_unchecked::<u16, _>(index)?)),
        ColumnKind::Bits => {
            let bytes: Vec<u8> = row.try_get_unchecked(index)?;
            Value::I64(bits_to_i64(&bytes).ok_or_else(|| Error::decode(name, type_name))?)
        }
        ColumnKind::Float => Value::F32(row.try_get(index)?),
        ColumnKind::Double => Value::F64(row.try_get(index)?),
        ColumnKind::Decimal => Value::Decimal(row.try_get(index)?),
        // ENUM and SET report their own type names but carry text
        ColumnKind::Text => Value::String(row.try_get_unchecked(index)?),
        ColumnKind::Bytes => Value::Bytes(row.try_get(index)?),
        ColumnKind::Json => Value::Json(row.try_get(index)?),
        ColumnKind::Date => Value::Date(row.try_get(index)?),
        ColumnKind::Time => Value::Time(row.try_get(index)?),
        ColumnKind::DateTime => Value::DateTime(row.try_get(index)?),
        ColumnKind::Timestamp => Value::Timestamp(row.try_get(index)?),
    };
    Ok(value)
}
