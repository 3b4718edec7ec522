//! Response bodies returned by the JSON API.

use serde::Serialize;

pub mod client;
pub mod dashboard;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// Transient message shown to the user after an action.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    fn new(level: NotificationLevel, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, title, description)
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, title, description)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, title, description)
    }
}

/// Envelope returned by every mutating endpoint.
#[derive(Debug, Serialize)]
pub struct MutationResponse<T: Serialize> {
    pub success: bool,
    pub notification: Notification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> MutationResponse<T> {
    pub fn ok(notification: Notification, data: T) -> Self {
        Self {
            success: true,
            notification,
            data: Some(data),
        }
    }

    pub fn failed(notification: Notification) -> Self {
        Self {
            success: false,
            notification,
            data: None,
        }
    }
}

impl MutationResponse<()> {
    pub fn done(notification: Notification) -> Self {
        Self {
            success: true,
            notification,
            data: None,
        }
    }
}
