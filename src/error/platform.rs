use std::time::Duration;
use thiserror::Error;

/// Errors returned by the chat platform collaborator.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The member is no longer in the guild.
    #[error("Member {0} is not in the guild")]
    MemberNotFound(u64),

    /// The bot lacks permission for the action, e.g. a role above its own.
    #[error("Missing permission: {0}")]
    Forbidden(String),

    /// Discord is rate limiting or temporarily failing.
    #[error("Discord temporarily unavailable (status {status})")]
    Unavailable {
        status: u16,
        retry_after: Option<Duration>,
    },

    /// The request never got a response, e.g. a timeout or a reset connection.
    #[error("Discord request failed: {0}")]
    Network(String),

    /// Any other Discord API error.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    Discord(#[from] Box<serenity::Error>),

    /// Reading a local file for upload failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PlatformError {
    /// Whether retrying the same call later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Network(_))
    }

    /// Delay Discord asked for before the next request.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Unavailable { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}
