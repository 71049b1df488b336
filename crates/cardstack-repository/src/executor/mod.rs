//! Store execution boundary.
//!
//! The DAO layer only ever talks to a [`StatementExecutor`]; the MySQL
//! implementation lives in [`mysql`], and tests substitute in-memory fakes.

mod mysql;

pub use mysql::MySqlStatementExecutor;

use crate::sql::{BindParameters, Row};
use async_trait::async_trait;
use cardstack_core::CardstackResult;

/// Result of a mutating statement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecuteOutcome {
    /// Rows the store reports as affected.
    pub rows_affected: u64,
    /// Identity generated by an insert, if any.
    pub generated_id: Option<i64>,
}

impl ExecuteOutcome {
    #[must_use]
    pub const fn affected(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            generated_id: None,
        }
    }

    #[must_use]
    pub const fn inserted(generated_id: i64) -> Self {
        Self {
            rows_affected: 1,
            generated_id: Some(generated_id),
        }
    }
}

/// Executes SQL text containing `:name` placeholders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    /// Runs a mutating statement.
    async fn execute(&self, sql: &str, params: &BindParameters) -> CardstackResult<ExecuteOutcome>;

    /// Runs a query and returns every row.
    async fn query(&self, sql: &str, params: &BindParameters) -> CardstackResult<Vec<Row>>;
}
