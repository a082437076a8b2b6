//! GitHub "latest release" lookup

use super::{notes_excerpt, ReleaseInfo, ReleaseSource};
use crate::config::schema::GithubConfig;
use crate::error::{UpdaterError, UpdaterResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

/// Release source backed by the GitHub REST API
pub struct GithubReleases {
    agent: ureq::Agent,
    url: String,
}

/// Fields of the GitHub release payload we care about
#[derive(Debug, Deserialize)]
struct GithubRelease {
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    body: Option<String>,
}

impl From<GithubRelease> for ReleaseInfo {
    fn from(raw: GithubRelease) -> Self {
        Self {
            tag: raw.tag_name.unwrap_or_default(),
            title: raw.name.unwrap_or_default(),
            published_at: raw.published_at.unwrap_or_default(),
            url: raw.html_url.unwrap_or_default(),
            notes_excerpt: notes_excerpt(raw.body.as_deref().unwrap_or_default()),
        }
    }
}

impl GithubReleases {
    /// Create a release source from config
    pub fn new(config: &GithubConfig) -> Self {
        Self::with_timeout(&config.api_base, &config.repo, config.timeout())
    }

    /// Create a release source for `repo` under `api_base`
    pub fn with_timeout(api_base: &str, repo: &str, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            agent,
            url: release_url(api_base, repo),
        }
    }

    fn fetch_blocking(agent: &ureq::Agent, url: &str) -> UpdaterResult<ReleaseInfo> {
        debug!("GET {}", url);

        let mut response = agent
            .get(url)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", concat!("companion-updater/", env!("CARGO_PKG_VERSION")))
            .call()
            .map_err(map_fetch_error)?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| UpdaterError::ReleaseNetwork(e.to_string()))?;

        parse_release(&body)
    }
}

#[async_trait]
impl ReleaseSource for GithubReleases {
    async fn fetch_latest(&self) -> UpdaterResult<ReleaseInfo> {
        let agent = self.agent.clone();
        let url = self.url.clone();

        let release = tokio::task::spawn_blocking(move || Self::fetch_blocking(&agent, &url))
            .await
            .map_err(|e| UpdaterError::Internal(format!("release fetch task failed: {}", e)))?;

        match &release {
            Ok(info) => info!("Fetched latest release: {}", info.tag),
            Err(e) => error!("GitHub release lookup failed: {}", e),
        }

        release
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

fn release_url(api_base: &str, repo: &str) -> String {
    format!(
        "{}/repos/{}/releases/latest",
        api_base.trim_end_matches('/'),
        repo.trim_matches('/')
    )
}

fn map_fetch_error(err: ureq::Error) -> UpdaterError {
    match err {
        ureq::Error::StatusCode(code) => UpdaterError::ReleaseHttpStatus(code),
        other => UpdaterError::ReleaseNetwork(other.to_string()),
    }
}

fn parse_release(body: &str) -> UpdaterResult<ReleaseInfo> {
    let raw: GithubRelease =
        serde_json::from_str(body).map_err(|e| UpdaterError::ReleaseDecode(e.to_string()))?;
    Ok(raw.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_repo() {
        assert_eq!(
            release_url("https://api.github.com/", "bitfocus/companion"),
            "https://api.github.com/repos/bitfocus/companion/releases/latest"
        );
    }

    #[test]
    fn parse_release_payload() {
        let body = r#"{
            "tag_name": "v4.2.4",
            "name": "Companion 4.2.4",
            "published_at": "2026-03-01T12:00:00Z",
            "html_url": "https://github.com/bitfocus/companion/releases/tag/v4.2.4",
            "body": "Bug fixes",
            "draft": false
        }"#;
        let info = parse_release(body).unwrap();
        assert_eq!(info.tag, "v4.2.4");
        assert_eq!(info.title, "Companion 4.2.4");
        assert_eq!(info.notes_excerpt, "Bug fixes");
        assert_eq!(info.version(), Some("4.2.4"));
    }

    #[test]
    fn parse_release_tolerates_nulls() {
        let info = parse_release(r#"{"tag_name": "v4.2.4", "name": null, "body": null}"#).unwrap();
        assert_eq!(info.title, "");
        assert_eq!(info.notes_excerpt, "");
        assert_eq!(info.url, "");
    }

    #[test]
    fn parse_release_truncates_notes() {
        let body = serde_json::json!({ "tag_name": "v1", "body": "x".repeat(2000) }).to_string();
        let info = parse_release(&body).unwrap();
        assert_eq!(info.notes_excerpt.len(), 500);
    }

    #[test]
    fn parse_release_rejects_garbage() {
        let err = parse_release("<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, UpdaterError::ReleaseDecode(_)));
    }

    #[test]
    fn status_codes_map_to_http_errors() {
        assert!(matches!(
            map_fetch_error(ureq::Error::StatusCode(404)),
            UpdaterError::ReleaseHttpStatus(404)
        ));
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let source = GithubReleases::with_timeout(
            "http://127.0.0.1:9",
            "bitfocus/companion",
            Duration::from_secs(2),
        );
        let err = source.fetch_latest().await.unwrap_err();
        assert!(matches!(err, UpdaterError::ReleaseNetwork(_)));
    }
}
