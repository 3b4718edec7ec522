//! JSON payloads accepted by the API and their conversion into domain values.

use thiserror::Error;
use validator::ValidationErrors;

use crate::services::ServiceError;

pub mod client;
pub mod email;

#[derive(Debug, Error)]
/// Errors that can occur when processing request payloads.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid client id")]
    InvalidClientId,

    #[error("invalid email id")]
    InvalidEmailId,

    #[error("invalid advisor id")]
    InvalidAdvisorId,

    #[error("invalid stage")]
    InvalidStage,

    #[error("invalid date, expected YYYY-MM-DD")]
    InvalidDate,

    #[error("invalid document count")]
    InvalidCount,
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}
