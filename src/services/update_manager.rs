//! Update Manager for Tunedeck.
//!
//! Checks the GitHub Releases API for a newer version. Nothing is downloaded:
//! an available update is only ever surfaced as a notice.

use serde::Deserialize;

use crate::types::errors::UpdateError;
use crate::types::update::UpdateInfo;

/// Latest-release endpoint used when no override is configured.
pub const DEFAULT_RELEASES_URL: &str =
    "https://api.github.com/repos/tunedeck/tunedeck/releases/latest";

/// Environment variable overriding the latest-release endpoint, for forks
/// and self-hosted release feeds.
pub const RELEASES_URL_ENV_VAR: &str = "TUNEDECK_RELEASES_URL";

#[derive(Debug, Deserialize)]
struct LatestRelease {
    tag_name: String,
    html_url: String,
    #[serde(default)]
    published_at: Option<String>,
}

/// Update manager querying the latest GitHub release.
pub struct UpdateManager {
    current_version: String,
    releases_url: String,
}

impl UpdateManager {
    /// Uses `TUNEDECK_RELEASES_URL` when set, the default endpoint otherwise.
    pub fn new() -> Self {
        Self {
            current_version: env!("CARGO_PKG_VERSION").to_string(),
            releases_url: releases_url_from(std::env::var(RELEASES_URL_ENV_VAR).ok()),
        }
    }

    /// Overrides the release endpoint and the version compared against it.
    pub fn with_endpoint(releases_url: &str, current_version: &str) -> Self {
        Self {
            current_version: current_version.to_string(),
            releases_url: releases_url.to_string(),
        }
    }

    pub fn get_current_version(&self) -> &str {
        &self.current_version
    }

    pub fn get_releases_url(&self) -> &str {
        &self.releases_url
    }

    /// Compares two semver strings. Returns true if `latest` is newer than `current`.
    pub fn is_newer_version(current: &str, latest: &str) -> bool {
        let parse = |v: &str| -> Vec<u32> {
            v.trim_start_matches('v')
                .split('.')
                .filter_map(|s| s.parse().ok())
                .collect()
        };
        let c = parse(current);
        let l = parse(latest);
        l > c
    }

    /// Parses a latest-release payload, returning `Some` only when it is newer.
    pub fn parse_release(&self, body: &str) -> Result<Option<UpdateInfo>, UpdateError> {
        let release: LatestRelease =
            serde_json::from_str(body).map_err(|e| UpdateError::ParseError(e.to_string()))?;

        if !Self::is_newer_version(&self.current_version, &release.tag_name) {
            return Ok(None);
        }

        Ok(Some(UpdateInfo {
            version: release.tag_name.trim_start_matches('v').to_string(),
            release_url: release.html_url,
            published_at: release.published_at,
        }))
    }

    /// Fetches the latest release and compares it to the running version.
    pub async fn check_for_updates(&self) -> Result<Option<UpdateInfo>, UpdateError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tunedeck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpdateError::NetworkError(e.to_string()))?;

        let body = client
            .get(&self.releases_url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| UpdateError::NetworkError(e.to_string()))?
            .text()
            .await
            .map_err(|e| UpdateError::NetworkError(e.to_string()))?;

        self.parse_release(&body)
    }
}

/// Resolves the release endpoint from an optional override; blank values are
/// ignored.
pub fn releases_url_from(override_url: Option<String>) -> String {
    override_url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| DEFAULT_RELEASES_URL.to_string())
}

impl Default for UpdateManager {
    fn default() -> Self {
        Self::new()
    }
}
