use serde::{Deserialize, Serialize};

/// Information about an available application update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateInfo {
    pub version: String,
    pub release_url: String,
    pub published_at: Option<String>,
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
}

/// A modal message shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
    pub detail: String,
    pub buttons: Vec<String>,
}

impl Notice {
    /// Single-button informational notice for an available update.
    ///
    /// Nothing is downloaded or restarted; the user is pointed at the release page.
    pub fn update_available(info: &UpdateInfo) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: "Application Update".to_string(),
            message: "A new version is available".to_string(),
            detail: format!(
                "Version {} is available and can be downloaded at {}",
                info.version, info.release_url
            ),
            buttons: vec!["OK".to_string()],
        }
    }
}
