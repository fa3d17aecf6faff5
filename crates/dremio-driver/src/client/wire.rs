// SPDX-License-Identifier: Apache-2.0

//! JSON wire types for the Dremio REST endpoints

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Login request body for `POST /apiv2/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

/// Login response; a present `errorMessage` means the login was rejected
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Submission body for `POST /api/v3/sql`; `context` is omitted when empty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryEnvelope {
    pub sql: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
}

/// Submission response carrying the server-assigned job identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobId {
    pub id: String,
}

/// Job lifecycle states; everything that is neither terminal state polls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Completed,
    Failed,
    /// RUNNING, ENQUEUED, PLANNING, and any state added server-side later
    #[serde(other)]
    Pending,
}

/// Response of `GET /api/v3/job/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    #[serde(default)]
    pub row_count: usize,
    pub job_state: JobState,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
}

/// One column of a completed job's output schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
}

/// Response of `GET /api/v3/job/{id}/results`; `rowCount` is the job total,
/// not the page size
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsPage {
    #[serde(default)]
    pub row_count: usize,
    #[serde(default)]
    pub schema: Vec<ColumnSchema>,
    #[serde(default)]
    pub rows: Vec<Map<String, Value>>,
}
