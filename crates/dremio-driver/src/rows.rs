// SPDX-License-Identifier: Apache-2.0

//! Paged row cursor over a completed job's results
//!
//! Pages are fetched lazily at the configured page size. The column order is
//! fixed by the first page's schema and reused for every later page even if
//! the server iterates row-object keys differently; rows arrive as JSON
//! objects keyed by column name and are exposed positionally.

use crate::client::DremioApi;
use crate::error::{DremioError, DremioResult};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Cursor over a job's result rows
pub struct Rows {
    api: Arc<dyn DremioApi>,
    job_id: String,
    page_size: usize,
    columns: Vec<String>,
    rows: Vec<Map<String, Value>>,
    index: usize,
    offset: usize,
    total: usize,
}

impl Rows {
    /// Fetch page 0 of a completed job and build the cursor.
    ///
    /// An object body seeds the total, the column order, and the first page.
    /// A non-object body is how Dremio answers for an empty result set; it
    /// yields a cursor with no columns that is exhausted immediately.
    pub(crate) async fn open(
        api: Arc<dyn DremioApi>,
        job_id: String,
        page_size: usize,
    ) -> DremioResult<Self> {
        let first = api.fetch_page(&job_id, 0, page_size).await?;
        let mut rows = Self {
            api,
            job_id,
            page_size,
            columns: Vec::new(),
            rows: Vec::new(),
            index: 0,
            offset: 0,
            total: 0,
        };
        if let Some(page) = first {
            rows.total = page.row_count;
            rows.columns = page.schema.into_iter().map(|c| c.name).collect();
            rows.offset = page.rows.len();
            rows.rows = page.rows;
        }
        Ok(rows)
    }

    /// Column names in the order fixed by the first page
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Total number of rows the job produced
    pub fn total(&self) -> usize {
        self.total
    }

    /// Advance one row, copying `row[columns[i]]` into `dest[i]`.
    ///
    /// `dest` must be exactly as wide as [`columns`](Self::columns); a
    /// missing key scans as JSON null. Fails with
    /// [`DremioError::NoMoreRows`] once the cursor is exhausted.
    pub async fn next(&mut self, dest: &mut [Value]) -> DremioResult<()> {
        if self.index >= self.rows.len() && self.offset < self.total {
            self.fetch_next_page().await?;
        }
        if dest.len() != self.columns.len() {
            return Err(DremioError::InvalidScan {
                expected: self.columns.len(),
                received: dest.len(),
            });
        }
        if self.index >= self.rows.len() {
            return Err(DremioError::NoMoreRows);
        }
        let row = &self.rows[self.index];
        for (slot, column) in dest.iter_mut().zip(&self.columns) {
            *slot = row.get(column).cloned().unwrap_or(Value::Null);
        }
        self.index += 1;
        Ok(())
    }

    /// No-op; every page response is consumed eagerly
    pub fn close(self) -> DremioResult<()> {
        Ok(())
    }

    async fn fetch_next_page(&mut self) -> DremioResult<()> {
        debug!(job = %self.job_id, offset = self.offset, "fetching next result page");
        let page = self
            .api
            .fetch_page(&self.job_id, self.offset, self.page_size)
            .await?
            .ok_or_else(|| DremioError::Decode {
                context: "job results",
                message: "unexpected non-object response body".to_string(),
            })?;
        self.offset += page.rows.len();
        self.rows = page.rows;
        self.index = 0;
        Ok(())
    }
}

impl std::fmt::Debug for Rows {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rows")
            .field("job_id", &self.job_id)
            .field("columns", &self.columns)
            .field("offset", &self.offset)
            .field("total", &self.total)
            .finish()
    }
}
