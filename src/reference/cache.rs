//! Shared reference-data cache with single-flight refresh.
//!
//! Readers load the current snapshot without locking. A refresh is attempted
//! only when the snapshot is absent or was retrieved on an earlier day, and
//! only by the caller that wins a non-blocking lock; everybody else keeps
//! using whatever is currently stored.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::apiconfig::FetchError;
use crate::observability::metrics;
use crate::reference::clock::{Clock, SystemClock};
use crate::reference::source::ReferenceSource;
use crate::reference::types::ReferenceSnapshot;

/// What `ensure_fresh` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// The stored snapshot is current; nothing was done.
    Fresh,
    /// This caller fetched and stored a new snapshot.
    Refreshed,
    /// Another caller holds the refresh lock; this one did not wait.
    InProgress,
}

pub struct ReferenceCache {
    current: ArcSwapOption<ReferenceSnapshot>,
    refresh_lock: Mutex<()>,
    clock: Box<dyn Clock>,
}

impl ReferenceCache {
    /// Create an empty cache using the host's local date.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            current: ArcSwapOption::empty(),
            refresh_lock: Mutex::new(()),
            clock: Box::new(clock),
        }
    }

    /// The snapshot currently stored, if any.
    pub fn snapshot(&self) -> Option<Arc<ReferenceSnapshot>> {
        self.current.load_full()
    }

    /// Retrieval date of the stored snapshot.
    pub fn retrieved_on(&self) -> Option<NaiveDate> {
        self.snapshot().and_then(|s| s.retrieved_on)
    }

    pub fn needs_refresh(&self) -> bool {
        let today = self.clock.today();
        match &*self.current.load() {
            None => true,
            Some(snapshot) => snapshot.is_stale(today),
        }
    }

    /// Refresh the snapshot from `source` if it is absent or stale.
    ///
    /// Never waits for a refresh run by another caller. On a failed fetch the
    /// stored snapshot is dropped, so the next caller tries again, and the
    /// error is returned to this caller only.
    pub async fn ensure_fresh(&self, source: &dyn ReferenceSource) -> Result<Refresh, FetchError> {
        if !self.needs_refresh() {
            return Ok(Refresh::Fresh);
        }

        let Ok(_guard) = self.refresh_lock.try_lock() else {
            tracing::debug!("Reference cache refresh already running, not waiting");
            metrics::record_cache_refresh("in_progress");
            return Ok(Refresh::InProgress);
        };

        // A concurrent refresh may have completed between the check and the lock.
        if !self.needs_refresh() {
            return Ok(Refresh::Fresh);
        }

        tracing::info!("Refreshing reference cache");
        match source.fetch().await {
            Ok(snapshot) => {
                let today = self.clock.today();
                let snapshot = snapshot.retrieved(today);
                tracing::info!(
                    stations = snapshot.stations.len(),
                    creditor_institution_stations = snapshot.creditor_institution_stations.len(),
                    retrieved_on = %today,
                    "Reference cache refreshed"
                );
                self.current.store(Some(Arc::new(snapshot)));
                metrics::record_cache_refresh("refreshed");
                Ok(Refresh::Refreshed)
            }
            Err(e) => {
                self.current.store(None);
                tracing::error!(error = %e, "Reference cache refresh failed, snapshot cleared");
                metrics::record_cache_refresh("failed");
                Err(e)
            }
        }
    }
}

impl Default for ReferenceCache {
    fn default() -> Self {
        Self::new()
    }
}
