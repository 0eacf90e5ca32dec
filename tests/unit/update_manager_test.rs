//! Unit tests for the UpdateManager: version comparison and parsing of the
//! latest-release payload. No network access.

use rstest::rstest;
use tunedeck::services::update_manager::{releases_url_from, UpdateManager, DEFAULT_RELEASES_URL};
use tunedeck::types::errors::UpdateError;

#[rstest]
#[case("1.0.0", "1.0.1", true)]
#[case("1.0.0", "v1.1.0", true)]
#[case("1.9.0", "1.10.0", true)]
#[case("1.0.0", "1.0.0", false)]
#[case("2.0.0", "1.9.9", false)]
#[case("v1.2.3", "1.2.3", false)]
fn test_is_newer_version(#[case] current: &str, #[case] latest: &str, #[case] expected: bool) {
    assert_eq!(UpdateManager::is_newer_version(current, latest), expected);
}

#[test]
fn test_parse_release_reports_newer_version() {
    let manager = UpdateManager::with_endpoint("http://127.0.0.1:1/latest", "1.0.0");
    let body = r#"{
        "tag_name": "v1.2.0",
        "html_url": "https://github.com/tunedeck/tunedeck/releases/tag/v1.2.0",
        "published_at": "2026-09-01T12:00:00Z",
        "assets": []
    }"#;

    let info = manager.parse_release(body).unwrap().unwrap();

    assert_eq!(info.version, "1.2.0");
    assert_eq!(
        info.release_url,
        "https://github.com/tunedeck/tunedeck/releases/tag/v1.2.0"
    );
    assert_eq!(info.published_at.as_deref(), Some("2026-09-01T12:00:00Z"));
}

#[test]
fn test_parse_release_same_version_is_none() {
    let manager = UpdateManager::with_endpoint("http://127.0.0.1:1/latest", "1.2.0");
    let body = r#"{"tag_name": "v1.2.0", "html_url": "https://example.com"}"#;

    assert!(manager.parse_release(body).unwrap().is_none());
}

#[test]
fn test_parse_release_rejects_malformed_payload() {
    let manager = UpdateManager::with_endpoint("http://127.0.0.1:1/latest", "1.0.0");

    let result = manager.parse_release(r#"{"message": "Not Found"}"#);

    assert!(matches!(result, Err(UpdateError::ParseError(_))));
}

#[test]
fn test_default_manager_uses_package_version() {
    let manager = UpdateManager::new();
    assert_eq!(manager.get_current_version(), env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_check_for_updates_unreachable_endpoint_is_network_error() {
    let manager = UpdateManager::with_endpoint("http://127.0.0.1:1/latest", "1.0.0");

    let result = manager.check_for_updates().await;

    assert!(matches!(result, Err(UpdateError::NetworkError(_))));
}

#[rstest]
#[case(None, DEFAULT_RELEASES_URL)]
#[case(Some(""), DEFAULT_RELEASES_URL)]
#[case(Some("   "), DEFAULT_RELEASES_URL)]
#[case(
    Some("https://api.github.com/repos/someone/fork/releases/latest"),
    "https://api.github.com/repos/someone/fork/releases/latest"
)]
fn test_releases_url_override(#[case] override_url: Option<&str>, #[case] expected: &str) {
    assert_eq!(releases_url_from(override_url.map(str::to_string)), expected);
}

#[test]
fn test_with_endpoint_is_used_for_checks() {
    let manager = UpdateManager::with_endpoint("http://127.0.0.1:1/latest", "1.0.0");
    assert_eq!(manager.get_releases_url(), "http://127.0.0.1:1/latest");
}
