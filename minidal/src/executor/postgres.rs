//! PostgreSQL backend over a SQLx pool

use super::{render_placeholders, Connection, PlaceholderStyle};
use crate::{ConnectionConfig, Error, Result, Row, Value};
use futures::TryStreamExt;
use sqlx::encode::IsNull;
use sqlx::postgres::types::Oid;
use sqlx::postgres::{
    PgArgumentBuffer, PgArguments, PgConnectOptions, PgPool, PgPoolOptions, PgRow, PgTypeInfo, Postgres,
};
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

/// PostgreSQL connection pool wrapper
#[derive(Debug, Clone)]
pub struct PostgresBackend {
    inner: PgPool,
}

impl PostgresBackend {
    /// Connect using host/user/database settings
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .username(&config.user)
            .database(&config.database);
        if let Some(port) = config.port {
            options = options.port(port);
        }
        if let Some(password) = &config.password {
            options = options.password(password);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_with(options)
            .await?;
        Ok(Self { inner: pool })
    }

    /// Create a new PostgreSQL pool from a connection string
    pub async fn connect_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { inner: pool })
    }

    /// Create from an existing PgPool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { inner: pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.inner
    }
}

impl Connection for PostgresBackend {
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        let sql = render_placeholders(sql, PlaceholderStyle::Dollar);
        let query = bind_values_to_query(sqlx::query(&sql), params);
        let result = query.execute(&self.inner).await?;
        Ok(result.rows_affected())
    }

    async fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let sql = render_placeholders(sql, PlaceholderStyle::Dollar);
        let query = bind_values_to_query(sqlx::query(&sql), params);

        let mut stream = query.fetch(&self.inner);
        let mut rows = Vec::new();
        while let Some(row) = stream.try_next().await? {
            rows.push(decode_row(&row)?);
        }
        Ok(rows)
    }
}

/// A NULL argument with no declared type
///
/// Sent with the unspecified type oid so the server infers the parameter type
/// from context, which lets NULL land in any column.
struct UntypedNull;

impl sqlx::Type<Postgres> for UntypedNull {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_oid(Oid(0))
    }
}

impl sqlx::Encode<'_, Postgres> for UntypedNull {
    fn encode_by_ref(&self, _buf: &mut PgArgumentBuffer) -> IsNull {
        IsNull::Yes
    }
}

/// Bind Values to a SQLx query in placeholder order
fn bind_values_to_query<'q>(
    mut query: sqlx::query::Query<'q, Postgres, PgArguments>,
    params: &'q [Value],
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            Value::Null => query.bind(UntypedNull),
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
            Value::Uuid(u) => query.bind(*u),
        };
    }
    query
}

/// How a column of a given server type becomes a `Value`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Bool,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Numeric,
    Text,
    Bytes,
    Json,
    Uuid,
    Date,
    Time,
    Timestamp,
    TimestampTz,
}

fn column_kind(type_name: &str) -> Option<ColumnKind> {
    let kind = match type_name {
        "BOOL" => ColumnKind::Bool,
        "INT2" => ColumnKind::SmallInt,
        "INT4" => ColumnKind::Int,
        "INT8" => ColumnKind::BigInt,
        "FLOAT4" => ColumnKind::Float,
        "FLOAT8" => ColumnKind::Double,
        "NUMERIC" => ColumnKind::Numeric,
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => ColumnKind::Text,
        "BYTEA" => ColumnKind::Bytes,
        "JSON" | "JSONB" => ColumnKind::Json,
        "UUID" => ColumnKind::Uuid,
        "DATE" => ColumnKind::Date,
        "TIME" => ColumnKind::Time,
        "TIMESTAMP" => ColumnKind::Timestamp,
        "TIMESTAMPTZ" => ColumnKind::TimestampTz,
        _ => return None,
    };
    Some(kind)
}

fn decode_row(row: &PgRow) -> Result<Row> {
    let mut decoded = Row::with_capacity(row.columns().len());
    for column in row.columns() {
        let value = decode_column(row, column.ordinal(), column.name(), column.type_info().name())?;
        decoded.push(column.name(), value);
    }
    Ok(decoded)
}

fn decode_column(row: &PgRow, index: usize, name: &str, type_name: &str) -> Result<Value> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }
    let kind = column_kind(type_name).ok_or_else(|| Error::decode(name, type_name))?;

    let value = match kind {
        ColumnKind::Bool => Value::Bool(row.try_get(index)?),
        ColumnKind::SmallInt => row.try_get::<i16, _>(index)?.into(),
        ColumnKind::Int => Value::I32(row.try_get(index)?),
        ColumnKind::BigInt => Value::I64(row.try_get(index)?),
        ColumnKind::Float => Value::F32(row.try_get(index)?),
        ColumnKind::Double => Value::F64(row.try_get(index)?),
        ColumnKind::Numeric => Value::Decimal(row.try_get(index)?),
        ColumnKind::Text => Value::String(row.try_get(index)?),
        ColumnKind::Bytes => Value::Bytes(row.try_get(index)?),
        ColumnKind::Json => Value::Json(row.try_get(index)?),
        ColumnKind::Uuid => Value::Uuid(row.try_get(index)?),
        ColumnKind::Date => Value::Date(row.try_get(index)?),
        ColumnKind::Time => Value::Time(row.try_get(index)?),
        ColumnKind::Timestamp => Value::DateTime(row.try_get(index)?),
        ColumnKind::TimestampTz => Value::Timestamp(row.try_get(index)?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_is_sent_without_a_type() {
        assert_eq!(<UntypedNull as sqlx::Type<Postgres>>::type_info(), PgTypeInfo::with_oid(Oid(0)));
    }

    #[test]
    fn test_parameter_binding_types() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let params = vec![
            Value::Null,
            Value::Bool(true),
            Value::I32(42),
            Value::I64(123456),
            Value::F32(1.5),
            Value::F64(2.25),
            Value::from("hello"),
            Value::Bytes(vec![1, 2, 3]),
            Value::Json(serde_json::json!({"key": "value"})),
            Value::Date(date),
            Value::Time(chrono::NaiveTime::from_hms_opt(12, 0, 0).unwrap()),
            Value::DateTime(date.and_hms_opt(12, 0, 0).unwrap()),
            Value::Timestamp(date.and_hms_opt(12, 0, 0).unwrap().and_utc()),
            Value::Decimal(rust_decimal::Decimal::new(1999, 2)),
            Value::Uuid(uuid::Uuid::nil()),
        ];

        let sql = "SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15";
        let _bound_query = bind_values_to_query(sqlx::query(sql), &params);
    }

    #[test]
    fn test_column_kinds() {
        assert_eq!(column_kind("INT2"), Some(ColumnKind::SmallInt));
        assert_eq!(column_kind("BPCHAR"), Some(ColumnKind::Text));
        assert_eq!(column_kind("JSONB"), Some(ColumnKind::Json));
        assert_eq!(column_kind("NUMERIC"), Some(ColumnKind::Numeric));
        assert_eq!(column_kind("UUID"), Some(ColumnKind::Uuid));
    }

    #[test]
    fn test_temporal_column_kinds() {
        assert_eq!(column_kind("DATE"), Some(ColumnKind::Date));
        assert_eq!(column_kind("TIME"), Some(ColumnKind::Time));
        assert_eq!(column_kind("TIMESTAMP"), Some(ColumnKind::Timestamp));
        assert_eq!(column_kind("TIMESTAMPTZ"), Some(ColumnKind::TimestampTz));
    }

    #[test]
    fn test_unknown_column_kind() {
        assert_eq!(column_kind("INTERVAL"), None);
        assert_eq!(column_kind("INT4[]"), None);
    }
}
