//! MySQL statement executor on SQLx.

use super::{ExecuteOutcome, StatementExecutor};
use crate::sql::{bind_named, BindParameters, Row, SqlValue};
use crate::DatabasePool;
use async_trait::async_trait;
use cardstack_core::{CardstackError, CardstackResult};
use sqlx::mysql::{MySql, MySqlArguments, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, Row as _, TypeInfo, ValueRef};
use std::sync::Arc;
use tracing::trace;

/// Runs named statements against a [`DatabasePool`].
///
/// SQLx connects with the found-rows capability, so `rows_affected` counts
/// rows matched by an `UPDATE` even when their content did not change.
#[derive(Clone, Debug)]
pub struct MySqlStatementExecutor {
    pool: Arc<DatabasePool>,
}

impl MySqlStatementExecutor {
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

fn bind_values<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    values: Vec<SqlValue>,
) -> Query<'q, MySql, MySqlArguments> {
    for value in values {
        query = match value {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Int(v) => query.bind(v),
            SqlValue::Text(v) => query.bind(v),
            SqlValue::Bytes(v) => query.bind(v),
        };
    }
    query
}

fn convert_row(row: &MySqlRow) -> CardstackResult<Row> {
    let mut converted = Row::new();
    for column in row.columns() {
        let index = column.ordinal();
        let name = column.name();
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            converted.insert(name, SqlValue::Null);
            continue;
        }

        let type_name = column.type_info().name().to_ascii_uppercase();
        let value = if type_name.contains("INT") {
            if type_name.contains("UNSIGNED") {
                let v: u64 = row.try_get(index)?;
                let v = i64::try_from(v)
                    .map_err(|e| CardstackError::row_mapping(name, e.to_string()))?;
                SqlValue::Int(v)
            } else {
                SqlValue::Int(row.try_get(index)?)
            }
        } else if type_name.contains("BLOB") || type_name.contains("BINARY") {
            SqlValue::Bytes(row.try_get(index)?)
        } else {
            SqlValue::Text(row.try_get(index)?)
        };
        converted.insert(name, value);
    }
    Ok(converted)
}

#[async_trait]
impl StatementExecutor for MySqlStatementExecutor {
    async fn execute(&self, sql: &str, params: &BindParameters) -> CardstackResult<ExecuteOutcome> {
        let bound = bind_named(sql, params)?;
        trace!("Executing: {}", bound.sql);

        let result = bind_values(sqlx::query(&bound.sql), bound.values)
            .execute(self.pool.inner())
            .await?;

        let generated_id = match result.last_insert_id() {
            0 => None,
            id => Some(i64::try_from(id).map_err(|e| {
                CardstackError::Database(format!("generated id out of range: {}", e))
            })?),
        };

        Ok(ExecuteOutcome {
            rows_affected: result.rows_affected(),
            generated_id,
        })
    }

    async fn query(&self, sql: &str, params: &BindParameters) -> CardstackResult<Vec<Row>> {
        let bound = bind_named(sql, params)?;
        trace!("Querying: {}", bound.sql);

        let rows = bind_values(sqlx::query(&bound.sql), bound.values)
            .fetch_all(self.pool.inner())
            .await?;

        rows.iter().map(convert_row).collect()
    }
}
