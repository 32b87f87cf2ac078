use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Number, Value};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Database, Row, Sqlite, TypeInfo, ValueRef};
use tracing::info;

use super::config::StoreConfig;
use crate::core::{StoreError, StoreResult};
use crate::interface::QueryStore;

type SqliteQuery<'q> = Query<'q, Sqlite, <Sqlite as Database>::Arguments<'q>>;

/// Query store backed by a SQLite connection pool.
///
/// Each record comes back as a JSON object keyed by column name.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (and by default create) the database described by `config`
    pub async fn open(config: &StoreConfig) -> StoreResult<Self> {
        config.validate().map_err(StoreError::Backend)?;

        let options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else {
            SqliteConnectOptions::new().filename(&config.path)
        }
        .create_if_missing(config.create_if_missing)
        .busy_timeout(config.busy_timeout);

        // Every in-memory connection is its own database, so keep exactly one alive.
        let pool_options = if config.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        info!(path = %config.path.display(), "sqlite store opened");

        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl QueryStore for SqliteStore {
    async fn fetch_one(&self, statement: &str, params: &[Value]) -> StoreResult<Option<Value>> {
        let row = bind_params(sqlx::query(statement), params)?
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_record).transpose()
    }

    async fn fetch_all(&self, statement: &str, params: &[Value]) -> StoreResult<Vec<Value>> {
        let rows = bind_params(sqlx::query(statement), params)?
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_record).collect()
    }
}

/// Bind JSON params positionally.
///
/// Booleans bind as integers, nested arrays and objects as their JSON text.
fn bind_params<'q>(mut query: SqliteQuery<'q>, params: &[Value]) -> StoreResult<SqliteQuery<'q>> {
    for (index, param) in params.iter().enumerate() {
        query = match param {
            Value::Null => query.bind(None::<i64>),
            Value::Bool(flag) => query.bind(*flag),
            Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    query.bind(int)
                } else if number.is_u64() {
                    return Err(StoreError::UnsupportedParam {
                        index,
                        reason: format!("integer {} does not fit in 64 signed bits", number),
                    });
                } else {
                    match number.as_f64() {
                        Some(float) => query.bind(float),
                        None => {
                            return Err(StoreError::UnsupportedParam {
                                index,
                                reason: format!("number {} is not representable", number),
                            });
                        }
                    }
                }
            }
            Value::String(text) => query.bind(text.clone()),
            Value::Array(_) | Value::Object(_) => query.bind(param.to_string()),
        };
    }
    Ok(query)
}

/// Convert a row by the storage class of each value
fn row_to_record(row: &SqliteRow) -> StoreResult<Value> {
    let mut record = Map::new();

    for column in row.columns() {
        let index = column.ordinal();
        let raw = row.try_get_raw(index)?;

        let value = if raw.is_null() {
            Value::Null
        } else {
            let type_name = raw.type_info().name().to_string();
            match type_name.as_str() {
                "TEXT" => Value::String(row.try_get_unchecked::<String, _>(index)?),
                "REAL" => {
                    let float = row.try_get_unchecked::<f64, _>(index)?;
                    Value::Number(Number::from_f64(float).ok_or_else(|| StoreError::Decode {
                        column: column.name().to_string(),
                        reason: format!("{} is not a finite number", float),
                    })?)
                }
                "BLOB" => Value::Array(
                    row.try_get_unchecked::<Vec<u8>, _>(index)?
                        .into_iter()
                        .map(Value::from)
                        .collect(),
                ),
                _ => Value::from(row.try_get_unchecked::<i64, _>(index)?),
            }
        };

        record.insert(column.name().to_string(), value);
    }

    Ok(Value::Object(record))
}
