// SPDX-License-Identifier: Apache-2.0

//! Error types for Dremio driver operations

use thiserror::Error;

/// Result type for driver operations
pub type DremioResult<T> = Result<T, DremioError>;

/// Errors surfaced by the Dremio driver
#[derive(Debug, Error)]
pub enum DremioError {
    /// Any Begin variant; Dremio's REST API has no transaction support
    #[error("transactions not supported")]
    TransactionsNotSupported,

    /// Any Exec variant; the driver only runs row-returning queries
    #[error("non queries not supported")]
    NonQueriesNotSupported,

    /// A query argument carried a non-empty parameter name
    #[error("driver does not support the use of named parameters")]
    NamedParametersNotSupported,

    /// DSN parse failure, missing userinfo, invalid port, pagesize, or context
    #[error("invalid DSN: {0}")]
    InvalidDsn(String),

    /// Login rejected by the server, with the server's message
    #[error("error during login: {0}")]
    LoginFailed(String),

    /// Submit returned HTTP 404/410/502; the caller's pool should discard
    /// this connection
    #[error("connection done")]
    ConnectionDone,

    /// Submit returned any other non-200 status; body surfaced verbatim
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Job reached the FAILED state with a non-retriable message
    #[error("job failed: {0}")]
    JobFailed(String),

    /// Row destination width does not match the column count
    #[error("invalid scan, expected {expected} arguments and received {received}")]
    InvalidScan { expected: usize, received: usize },

    /// Iteration sentinel: the cursor is exhausted
    #[error("no more rows")]
    NoMoreRows,

    /// No driver registered under the requested name
    #[error("unknown driver: {0}")]
    UnknownDriver(String),

    /// A response body could not be decoded as the expected JSON shape
    #[error("error decoding {context}: {message}")]
    Decode {
        context: &'static str,
        message: String,
    },

    /// Transport-level HTTP failure
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl DremioError {
    /// True for the end-of-rows sentinel, so callers can distinguish normal
    /// cursor exhaustion from real failures
    pub fn is_end_of_rows(&self) -> bool {
        matches!(self, DremioError::NoMoreRows)
    }
}
