use thiserror::Error;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The submission is malformed; the message is safe to show to clients.
    #[error("{0}")]
    Form(String),
    /// Storage or database failure. Details are logged, never returned.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
