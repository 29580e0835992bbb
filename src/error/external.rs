use std::time::Duration;
use thiserror::Error;

/// Errors returned by the external game API client.
///
/// `is_transient` splits these into retryable failures and definitive ones that will not
/// change on retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExternalError {
    /// The Discord account has no linked game account.
    #[error("Member has no linked game account")]
    NotLinked,

    /// The API has no record of the linked account.
    #[error("Game account not found")]
    NotFound,

    /// Network error, timeout or server error.
    #[error("Game API unreachable: {0}")]
    Unreachable(String),

    /// The API is rate limiting us.
    #[error("Game API rate limited")]
    RateLimited {
        /// Delay requested by the API, if it sent one
        retry_after: Option<Duration>,
    },

    /// The API refused the request for a reason that will not change.
    #[error("Game API rejected the request with status {status}")]
    Rejected { status: u16 },

    /// The API answered with a body we cannot read.
    #[error("Malformed game API response: {0}")]
    Malformed(String),
}

impl ExternalError {
    /// Whether retrying the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unreachable(_) | Self::RateLimited { .. })
    }

    /// Delay the API asked for before the next request.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}
