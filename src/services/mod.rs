pub mod errors;
pub mod upload;

pub use errors::{ServiceError, ServiceResult};
