//! Operations invoked by the HTTP layer.
//!
//! Functions are generic over the repository traits so they run unchanged
//! against the Diesel repository and the mockall mock.

pub mod drafts;
pub mod errors;
pub mod overview;
pub mod pipeline;

pub use errors::{ServiceError, ServiceResult};
