// SPDX-License-Identifier: Apache-2.0

//! Job polling and the schema-learning retry
//!
//! After submission a job progresses through transient states until it is
//! COMPLETED or FAILED. One failure is recovered locally: Dremio's
//! schema-on-read can fail a first query over a file whose schema it is
//! still learning; re-submitting the identical envelope succeeds. That
//! retry is bounded so a server that keeps emitting the failure cannot loop
//! the driver forever.

use crate::client::wire::JobState;
use crate::client::DremioApi;
use crate::error::{DremioError, DremioResult};
use std::time::Duration;
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(1);
const SCHEMA_CHANGE_BACKOFF: Duration = Duration::from_millis(20);
const SCHEMA_CHANGE_RETRIES: u32 = 1;
const SCHEMA_CHANGE_MARKER: &str = "SCHEMA_CHANGE ERROR";

/// Poll `job_id` until it completes, re-submitting `envelope` once if the
/// server reports a schema-learning failure. Returns the id of the job that
/// actually completed, which is the one to fetch results from.
///
/// Every iteration crosses an await point, so dropping the returned future
/// aborts the poll between requests.
pub(crate) async fn run_to_completion(
    api: &dyn DremioApi,
    envelope: &[u8],
    job_id: String,
) -> DremioResult<String> {
    let mut job_id = job_id;
    let mut retries_left = SCHEMA_CHANGE_RETRIES;
    loop {
        let status = api.job_status(&job_id).await?;
        match status.job_state {
            JobState::Completed => {
                debug!(job = %job_id, rows = status.row_count, "job completed");
                return Ok(job_id);
            }
            JobState::Failed => {
                let message = status.error_message.unwrap_or_default();
                if message.contains(SCHEMA_CHANGE_MARKER) && retries_left > 0 {
                    retries_left -= 1;
                    warn!(job = %job_id, "schema learning failure, re-submitting query");
                    tokio::time::sleep(SCHEMA_CHANGE_BACKOFF).await;
                    job_id = api.submit(envelope).await?;
                    continue;
                }
                return Err(DremioError::JobFailed(message));
            }
            JobState::Pending => tokio::time::sleep(POLL_INTERVAL).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::{completed, failed, pending, FakeApi};

    #[tokio::test]
    async fn test_completes_after_transient_states() {
        let api = FakeApi::new();
        api.script_status("j1", vec![pending(), pending(), completed()]);

        let job = run_to_completion(&api, b"{}", "j1".to_string())
            .await
            .unwrap();
        assert_eq!(job, "j1");
    }

    #[tokio::test]
    async fn test_schema_change_resubmits_identical_envelope() {
        let api = FakeApi::new();
        api.script_status(
            "j1",
            vec![failed("SCHEMA_CHANGE ERROR: learning schema for file")],
        );
        api.script_status("j2", vec![pending(), completed()]);
        api.queue_job("j2");

        let envelope = br#"{"sql":"SELECT * FROM nas.log"}"#;
        let job = run_to_completion(&api, envelope, "j1".to_string())
            .await
            .unwrap();

        assert_eq!(job, "j2");
        assert_eq!(api.submitted(), vec![envelope.to_vec()]);
    }

    #[tokio::test]
    async fn test_schema_change_retry_is_bounded() {
        let api = FakeApi::new();
        api.script_status("j1", vec![failed("SCHEMA_CHANGE ERROR: first")]);
        api.script_status("j2", vec![failed("SCHEMA_CHANGE ERROR: second")]);
        api.queue_job("j2");

        let err = run_to_completion(&api, b"{}", "j1".to_string())
            .await
            .unwrap_err();
        match err {
            DremioError::JobFailed(message) => assert!(message.contains("second")),
            other => panic!("expected JobFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failure_surfaces_server_message() {
        let api = FakeApi::new();
        api.script_status("j1", vec![failed("VALIDATION ERROR: table not found")]);

        let err = run_to_completion(&api, b"{}", "j1".to_string())
            .await
            .unwrap_err();
        match err {
            DremioError::JobFailed(message) => {
                assert_eq!(message, "VALIDATION ERROR: table not found")
            }
            other => panic!("expected JobFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failure_without_message() {
        let api = FakeApi::new();
        let mut status = failed("");
        status.error_message = None;
        api.script_status("j1", vec![status]);

        let err = run_to_completion(&api, b"{}", "j1".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, DremioError::JobFailed(message) if message.is_empty()));
    }
}
