//! Schema-agnostic row mapping: one function serves arbitrarily different
//! queries by decoding every column of every row into a JSON value.

use serde_json::{Map, Number, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, PgPool, Row};
use thiserror::Error;

/// One result row as a column-name to value mapping.
pub type Record = Map<String, Value>;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("could not read column metadata: {0}")]
    Column(#[source] sqlx::Error),

    #[error("could not decode column '{column}' into a supported value")]
    Scan { column: String },
}

/// Execute a parameterized query and return each row as a mapping from column
/// name to value, in row-return order. Zero rows yields an empty vec, never an
/// absent result.
pub async fn fetch_records(
    pool: &PgPool,
    sql: &str,
    params: &[Value],
) -> Result<Vec<Record>, RecordError> {
    let mut query = sqlx::query(sql);
    for param in params {
        query = bind_param(query, param);
    }

    let rows = query.fetch_all(pool).await.map_err(RecordError::Query)?;

    rows.iter().map(row_to_record).collect()
}

/// Convert a single row, walking one destination slot per column so the
/// mapper never needs to know what the query selected.
fn row_to_record(row: &PgRow) -> Result<Record, RecordError> {
    let mut record = Map::new();
    for index in 0..row.len() {
        let name = row
            .try_column(index)
            .map_err(RecordError::Column)?
            .name()
            .to_string();
        let value = decode_column(row, index, &name)?;
        record.insert(name, value);
    }
    Ok(record)
}

/// Decode one column by attempting the supported scalar types in order.
/// SQL NULL maps to `Value::Null`; timestamps render as RFC 3339 text.
fn decode_column(row: &PgRow, index: usize, name: &str) -> Result<Value, RecordError> {
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return Ok(v.map(Value::String).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return Ok(v.map(|n| Value::Number(n.into())).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(index) {
        return Ok(v.map(|n| Value::Number(n.into())).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return Ok(v
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<f32>, _>(index) {
        return Ok(v
            .and_then(|f| Number::from_f64(f64::from(f)))
            .map(Value::Number)
            .unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return Ok(v.map(Value::Bool).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index) {
        return Ok(v
            .map(|t| Value::String(t.to_rfc3339()))
            .unwrap_or(Value::Null));
    }

    Err(RecordError::Scan {
        column: name.to_string(),
    })
}

fn bind_param<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    value: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    match value {
        Value::Null => {
            let none: Option<String> = None;
            query.bind(none)
        }
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else if let Some(f) = n.as_f64() {
                query.bind(f)
            } else {
                query.bind(n.to_string())
            }
        }
        Value::String(s) => query.bind(s.as_str()),
        // Arrays and objects have no scalar binding here
        other => query.bind(other.to_string()),
    }
}
