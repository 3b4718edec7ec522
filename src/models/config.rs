//! Configuration model loaded from `config/*.yaml` and `APP_*` variables.

use serde::Deserialize;

use crate::domain::template::Signature;

fn default_activity_limit() -> i64 {
    20
}

#[derive(Clone, Debug, Deserialize)]
/// Settings shared by the HTTP server, the repository and email delivery.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Outbound email hook receiving `{to, cc, subject, body}`.
    pub delivery_webhook_url: String,
    #[serde(default)]
    pub delivery_timeout_secs: Option<u64>,
    pub sender_name: String,
    pub sender_title: String,
    /// Addresses copied on every composed draft.
    #[serde(default)]
    pub default_cc: Vec<String>,
    #[serde(default = "default_activity_limit")]
    pub activity_limit: i64,
}

impl ServerConfig {
    /// Signature block appended to rendered templates.
    pub fn signature(&self) -> Signature {
        Signature {
            sender_name: self.sender_name.clone(),
            sender_title: self.sender_title.clone(),
        }
    }
}
