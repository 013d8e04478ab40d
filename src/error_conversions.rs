//! Error conversions into the service layer.
//!
//! The domain layer must not depend on service error types, so the glue lives
//! here, compiled only with the `server` feature.

use crate::domain::types::TypeConstraintError;
use crate::forms::upload::UploadFormError;
use crate::services::errors::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        log::error!("Domain constraint violated while handling upload: {val}");
        ServiceError::Internal
    }
}

impl From<UploadFormError> for ServiceError {
    fn from(val: UploadFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}
