//! Latest-release lookup
//!
//! A [`ReleaseSource`] fetches release metadata from upstream; the
//! [`ReleaseCache`] keeps the last successful answer for a configured TTL.

mod cache;
mod github;

pub use cache::{CachedRelease, ReleaseCache};
pub use github::GithubReleases;

use crate::error::UpdaterResult;
use async_trait::async_trait;
use serde::Serialize;

/// Maximum number of characters of release notes kept
pub const NOTES_EXCERPT_CHARS: usize = 500;

/// Metadata about a published release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseInfo {
    /// Version tag, e.g. "v4.2.4"
    pub tag: String,
    /// Release title
    pub title: String,
    /// Publication timestamp as reported upstream
    pub published_at: String,
    /// Release page URL
    pub url: String,
    /// First [`NOTES_EXCERPT_CHARS`] characters of the release notes
    pub notes_excerpt: String,
}

impl ReleaseInfo {
    /// Tag with the leading `v` removed, or `None` for an empty tag
    pub fn version(&self) -> Option<&str> {
        let version = self.tag.trim().trim_start_matches('v');
        (!version.is_empty()).then_some(version)
    }
}

/// Truncate release notes to the excerpt length on a character boundary
pub fn notes_excerpt(notes: &str) -> String {
    notes.chars().take(NOTES_EXCERPT_CHARS).collect()
}

/// Upstream source of release metadata
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetch the latest published release
    async fn fetch_latest(&self) -> UpdaterResult<ReleaseInfo>;

    /// Human-readable description of where releases come from
    fn describe(&self) -> String;
}
