use session::PreconditionViolation;

use crate::service::ServiceError;

/// Why an orchestrated request did not complete.
#[derive(Debug)]
pub enum RequestError {
    /// Rejected locally before anything was sent.
    Precondition(PreconditionViolation),
    /// Sent, but the service call failed. Not retried.
    Service(ServiceError),
}

impl RequestError {
    pub fn is_precondition(&self) -> bool {
        matches!(self, RequestError::Precondition(_))
    }

    pub fn precondition(&self) -> Option<&PreconditionViolation> {
        match self {
            RequestError::Precondition(p) => Some(p),
            RequestError::Service(_) => None,
        }
    }
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::Precondition(p) => write!(f, "request rejected: {p}"),
            RequestError::Service(e) => write!(f, "service call failed: {e}"),
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RequestError::Precondition(p) => Some(p),
            RequestError::Service(e) => Some(e),
        }
    }
}

impl From<PreconditionViolation> for RequestError {
    fn from(p: PreconditionViolation) -> Self {
        RequestError::Precondition(p)
    }
}

impl From<ServiceError> for RequestError {
    fn from(e: ServiceError) -> Self {
        RequestError::Service(e)
    }
}
