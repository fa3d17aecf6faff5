// SPDX-License-Identifier: Apache-2.0

//! Prepared statements
//!
//! There is no server-side prepare: a statement is a value binding SQL text
//! to a connection, built so callers can separate preparation from
//! execution the way their SQL layer expects.

use crate::connection::Connection;
use crate::error::{DremioError, DremioResult};
use crate::rows::Rows;
use crate::sql::QueryArg;
use serde_json::Value;

/// SQL text bound to a connection
#[derive(Debug, Clone)]
pub struct Statement {
    conn: Connection,
    sql: String,
}

impl Statement {
    pub(crate) fn new(conn: Connection, sql: impl Into<String>) -> Self {
        Self {
            conn,
            sql: sql.into(),
        }
    }

    /// The bound SQL text
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Number of placeholders, or `None` when unknown.
    ///
    /// Always `None`: placeholder counting is left to the substituter, which
    /// tolerates missing arguments, so callers must not enforce arity.
    pub fn num_input(&self) -> Option<usize> {
        None
    }

    /// Execute with positional arguments
    pub async fn query(&self, args: &[Value]) -> DremioResult<Rows> {
        self.conn.query(&self.sql, args).await
    }

    /// Execute with possibly-named arguments; non-empty names are rejected
    pub async fn query_named(&self, args: &[QueryArg]) -> DremioResult<Rows> {
        self.conn.query_named(&self.sql, args).await
    }

    /// Non-queries are not supported
    pub async fn exec(&self, _args: &[Value]) -> DremioResult<u64> {
        Err(DremioError::NonQueriesNotSupported)
    }

    /// See [`exec`](Self::exec)
    pub async fn exec_named(&self, _args: &[QueryArg]) -> DremioResult<u64> {
        Err(DremioError::NonQueriesNotSupported)
    }

    /// No-op; there is no server-side resource to release
    pub fn close(self) -> DremioResult<()> {
        Ok(())
    }
}
