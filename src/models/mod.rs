//! Database models shared across the CRM repository.

use crate::domain::types::TypeConstraintError;

pub mod activity;
pub mod client;
#[cfg(feature = "server")]
pub mod config;
pub mod document;
pub mod email;
pub mod meeting;
pub mod team_member;

/// Decodes a JSON array column; blank text reads as an empty list.
pub(crate) fn decode_text_list(raw: &str) -> Result<Vec<String>, TypeConstraintError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("malformed list column: {e}")))
}

/// Encodes a list for storage in a JSON array column.
pub(crate) fn encode_text_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}
