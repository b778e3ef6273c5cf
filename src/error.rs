use thiserror::Error;

use crate::auth::AuthError;

/// Failures surfaced by the interview service.
///
/// Malformed samples and zero-duration interviews are not errors; they are
/// resolved inside scoring.
#[derive(Debug, Error)]
pub enum InterviewError {
    /// The bearer credential did not resolve to a user. Raised before any
    /// scoring or storage work happens.
    #[error("authentication failed: {0}")]
    Unauthenticated(#[from] AuthError),

    /// The store rejected a write or could not be read. Never retried.
    #[error("persistence failed: {0:#}")]
    Persistence(anyhow::Error),
}

pub type InterviewResult<T> = std::result::Result<T, InterviewError>;
