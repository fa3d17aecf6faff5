// SPDX-License-Identifier: Apache-2.0

//! Connection to a Dremio server
//!
//! A connection owns the bearer token (inside its HTTP client), the default
//! context path, and the page size. It is cheap to clone; clones share the
//! same authenticated client. The caller's pool owns connection liveness:
//! [`Connection::close`] is deliberately a no-op so the token is never
//! discarded while the pool still holds the connection.
//!
//! The contract is one query in flight per connection at a time; the driver
//! does not lock to enforce it.

use crate::client::wire::QueryEnvelope;
use crate::client::{DremioApi, RestClient};
use crate::config::DremioConfig;
use crate::error::{DremioError, DremioResult};
use crate::job::run_to_completion;
use crate::rows::Rows;
use crate::sql::{named_to_positional, substitute_params, QueryArg};
use crate::statement::Statement;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Active connection to a Dremio server
#[derive(Clone)]
pub struct Connection {
    api: Arc<dyn DremioApi>,
    page_size: usize,
    context: Vec<String>,
}

impl Connection {
    /// Parse the DSN, log in, and return a connection holding the bearer
    /// token.
    pub async fn connect(dsn: &str) -> DremioResult<Self> {
        let config = DremioConfig::from_dsn(dsn)?;
        let client = RestClient::login(&config).await?;
        info!(
            host = %config.host,
            page_size = config.page_size,
            "dremio connection established"
        );
        Ok(Self {
            api: Arc::new(client),
            page_size: config.page_size,
            context: config.context,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_api(
        api: Arc<dyn DremioApi>,
        page_size: usize,
        context: Vec<String>,
    ) -> Self {
        Self {
            api,
            page_size,
            context,
        }
    }

    /// Bind SQL text to this connection without a server round-trip
    pub fn prepare(&self, sql: impl Into<String>) -> Statement {
        Statement::new(self.clone(), sql)
    }

    /// Execute a query with positional arguments and return a row cursor
    pub async fn query(&self, sql: &str, args: &[Value]) -> DremioResult<Rows> {
        let sql = if args.is_empty() {
            sql.to_string()
        } else {
            substitute_params(sql, args)
        };
        let envelope = QueryEnvelope {
            sql,
            context: self.context.clone(),
        };
        // Retained verbatim so a schema-learning retry re-submits the exact
        // same bytes.
        let body = serde_json::to_vec(&envelope).map_err(|e| DremioError::Decode {
            context: "query envelope",
            message: e.to_string(),
        })?;
        let job_id = self.api.submit(&body).await?;
        let job_id = run_to_completion(self.api.as_ref(), &body, job_id).await?;
        Rows::open(self.api.clone(), job_id, self.page_size).await
    }

    /// Execute a query with possibly-named arguments; any non-empty name
    /// fails before anything is sent
    pub async fn query_named(&self, sql: &str, args: &[QueryArg]) -> DremioResult<Rows> {
        let values = named_to_positional(args)?;
        self.query(sql, &values).await
    }

    /// Non-queries are not supported by the REST submission endpoint
    pub async fn exec(&self, _sql: &str, _args: &[Value]) -> DremioResult<u64> {
        Err(DremioError::NonQueriesNotSupported)
    }

    /// See [`exec`](Self::exec)
    pub async fn exec_named(&self, _sql: &str, _args: &[QueryArg]) -> DremioResult<u64> {
        Err(DremioError::NonQueriesNotSupported)
    }

    /// Dremio has no transaction support over REST
    pub async fn begin(&self) -> DremioResult<()> {
        Err(DremioError::TransactionsNotSupported)
    }

    /// Always succeeds; the server is not contacted
    pub async fn ping(&self) -> DremioResult<()> {
        Ok(())
    }

    /// No-op between checkouts from the caller's pool
    pub async fn reset_session(&self) -> DremioResult<()> {
        Ok(())
    }

    /// No-op; the caller's pool decides when a connection dies
    pub fn close(&self) -> DremioResult<()> {
        Ok(())
    }

    /// The default context path attached to every submission
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// Rows fetched per results page
    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("page_size", &self.page_size)
            .field("context", &self.context)
            .finish()
    }
}
