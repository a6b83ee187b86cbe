//! Record reconciliation between the remote sheet and the local cache
//!
//! [`RecordService`] is the single entry point callers use to obtain the
//! current record set. Reads attempt the remote sheet through the shared
//! rate limiter and backoff controller, overwrite the cache on success,
//! and degrade to cached-or-empty on any failure; remote-read failures
//! never cross this boundary. Mutations write through to the cache and,
//! when a sheet is configured, to the corresponding remote row.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::cache::{CacheManager, RECORDS_CACHE_KEY};
use crate::data::{Customer, SheetsClient, SheetsError};
use crate::retry::{fetch_with_backoff, RateLimiter};

/// Rows in the sheet are 1-based and row 1 is the header, so the record
/// at position `i` of a fetched sequence lives in sheet row `i + 2`.
const HEADER_ROW_OFFSET: usize = 2;

/// Errors surfaced by the mutation paths.
///
/// Read failures are absorbed and logged; only update/delete propagate
/// errors, since there is no safe fallback for a mutation.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Local cache could not be written
    #[error("Cache write failed: {0}")]
    Cache(#[from] std::io::Error),

    /// Remote sheet operation failed
    #[error("Sheet operation failed: {0}")]
    Sheets(#[from] SheetsError),

    /// The record was not present in the freshly fetched sequence
    #[error("Record not found in remote sheet: {0}")]
    NotFound(String),
}

/// Decides, per call, whether to trust remote data, fall back to the
/// cache, or return empty, and keeps the cache in sync with the latest
/// successful remote read.
pub struct RecordService {
    /// Present only when both sheet id and API key are configured
    sheets: Option<SheetsClient>,
    cache: CacheManager,
    /// Shared process-wide throttle, injected by the caller
    limiter: Arc<RateLimiter>,
}

impl RecordService {
    pub fn new(
        sheets: Option<SheetsClient>,
        cache: CacheManager,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            sheets,
            cache,
            limiter,
        }
    }

    /// Returns the current record set.
    ///
    /// With a configured sheet, attempts a remote fetch through the retry
    /// controller; a successful read replaces the cache wholesale and is
    /// returned. On any failure (including exhausted retries) the cached
    /// set is returned, or an empty sequence when the cache is cold.
    /// Without sheet configuration the remote branch is skipped and the
    /// same fallback sequence runs.
    pub async fn fetch_records(&self) -> Vec<Customer> {
        if let Some(client) = &self.sheets {
            match fetch_with_backoff(&self.limiter, || client.fetch_records()).await {
                Ok(Some(records)) => {
                    if let Err(e) = self.cache.write(RECORDS_CACHE_KEY, &records) {
                        warn!(error = %e, "failed to persist fetched records to cache");
                    }
                    info!(count = records.len(), "fetched records from remote sheet");
                    return records;
                }
                Ok(None) => {
                    warn!("remote fetch exhausted retries, falling back to cache");
                }
                Err(e) => {
                    warn!(error = %e, "remote fetch failed, falling back to cache");
                }
            }
        }

        self.cached_records()
    }

    /// Reads the cached record set, or empty when the cache is cold.
    pub fn cached_records(&self) -> Vec<Customer> {
        self.cache
            .read::<Vec<Customer>>(RECORDS_CACHE_KEY)
            .map(|cached| cached.data)
            .unwrap_or_default()
    }

    /// Looks up one record by id from the current record set.
    pub async fn get_record(&self, id: &str) -> Option<Customer> {
        self.fetch_records().await.into_iter().find(|r| r.id == id)
    }

    /// Applies an edit: write through to the cache immediately and, when a
    /// sheet is configured, overwrite the corresponding remote row.
    ///
    /// The remote row is located by a fresh fetch and the record's position
    /// in that sequence plus the fixed header offset. The lookup is
    /// recomputed per update, not cached, so a concurrent external edit to
    /// the sheet between lookup and write goes undetected.
    pub async fn update_record(&self, updated: &Customer) -> Result<(), SyncError> {
        let mut records = self.cached_records();
        match records.iter_mut().find(|r| r.id == updated.id) {
            Some(slot) => *slot = updated.clone(),
            None => records.push(updated.clone()),
        }
        self.cache.write(RECORDS_CACHE_KEY, &records)?;

        if let Some(client) = &self.sheets {
            self.limiter.acquire().await;
            let fresh = client.fetch_records().await?;
            let position = fresh
                .iter()
                .position(|r| r.id == updated.id)
                .ok_or_else(|| SyncError::NotFound(updated.id.clone()))?;
            client
                .update_row(position + HEADER_ROW_OFFSET, updated)
                .await?;
            info!(id = %updated.id, row = position + HEADER_ROW_OFFSET, "updated remote row");
        }

        Ok(())
    }

    /// Removes a record from the local cache.
    ///
    /// The remote row is intentionally left in place: removal from the
    /// source sheet is not performed (a documented gap in the system, not
    /// an oversight). Returns whether a record was removed.
    pub fn delete_record(&self, id: &str) -> Result<bool, SyncError> {
        let mut records = self.cached_records();
        let before = records.len();
        records.retain(|r| r.id != id);
        let removed = records.len() != before;
        if removed {
            self.cache.write(RECORDS_CACHE_KEY, &records)?;
        }
        Ok(removed)
    }
}
