//! Time-bounded cache in front of a release source

use super::{ReleaseInfo, ReleaseSource};
use crate::error::UpdaterResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

/// A fetched release and when it was fetched
#[derive(Debug, Clone)]
pub struct CachedRelease {
    /// The release metadata
    pub value: ReleaseInfo,

    /// When the fetch completed
    pub fetched_at: Instant,
}

impl CachedRelease {
    /// Wrap a freshly fetched release
    pub fn new(value: ReleaseInfo) -> Self {
        Self {
            value,
            fetched_at: Instant::now(),
        }
    }

    /// Check if the entry is still within `ttl`
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Release cache with lazy TTL expiry
///
/// A failed fetch leaves the previous entry in place. Concurrent misses are
/// coalesced: the slot lock is held across the fetch, so waiters observe the
/// fresh entry instead of issuing their own request.
pub struct ReleaseCache {
    source: Arc<dyn ReleaseSource>,
    ttl: Duration,
    slot: Mutex<Option<CachedRelease>>,
}

impl ReleaseCache {
    /// Create an empty cache in front of `source`
    pub fn new(source: Arc<dyn ReleaseSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Get the latest release, fetching only when the cached entry is stale
    pub async fn latest(&self) -> UpdaterResult<ReleaseInfo> {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref().filter(|c| c.is_fresh(self.ttl)) {
            debug!("Returning cached release {}", cached.value.tag);
            return Ok(cached.value.clone());
        }

        match self.source.fetch_latest().await {
            Ok(release) => {
                *slot = Some(CachedRelease::new(release.clone()));
                Ok(release)
            }
            Err(e) => {
                if slot.is_some() {
                    warn!("Release refresh failed, keeping stale entry: {}", e);
                }
                Err(e)
            }
        }
    }

    /// Current entry regardless of freshness
    pub async fn peek(&self) -> Option<CachedRelease> {
        self.slot.lock().await.clone()
    }

    /// Drop the cached entry so the next call fetches
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }

    /// Description of the underlying source
    pub fn source(&self) -> String {
        self.source.describe()
    }
}
