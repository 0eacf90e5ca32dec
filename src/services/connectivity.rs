//! Reachability probe for the hosted application's entry URL.
//!
//! The webview reports no load errors of its own, so the host probes the
//! initial URL off the dispatch thread and reports a failure as a load-failure
//! event.

use std::time::Duration;

use url::Url;

use crate::types::errors::NavigationError;

/// Succeeds when `url` answers a HEAD request with any status.
pub async fn probe(url: &str, timeout: Duration) -> Result<(), NavigationError> {
    let parsed = Url::parse(url).map_err(|e| NavigationError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let unreachable = |e: reqwest::Error| NavigationError::Unreachable {
        url: url.to_string(),
        reason: e.to_string(),
    };

    let client = reqwest::Client::builder()
        .connect_timeout(timeout)
        .build()
        .map_err(unreachable)?;

    client
        .head(parsed)
        .send()
        .await
        .map(|_| ())
        .map_err(unreachable)
}
