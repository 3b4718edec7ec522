//! Error type returned by service functions.

use thiserror::Error;

use crate::delivery::DeliveryError;
use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("record not found")]
    NotFound,
    #[error("invalid input: {0}")]
    Form(String),
    #[error("invalid value: {0}")]
    TypeConstraint(#[from] TypeConstraintError),
    #[error("store error: {0}")]
    Repository(RepositoryError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}
