/// Crate-wide result type for channel collaborator calls.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed errors raised by channel adapters at the routing seam.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The channel cannot open direct conversations right now.
    #[error("channel {channel_id} unavailable: {message}")]
    Unavailable { channel_id: String, message: String },

    /// The party is not known to the channel adapter.
    #[error("unknown party on {channel_id}: {account_id}")]
    UnknownParty {
        channel_id: String,
        account_id: String,
    },
}

impl Error {
    #[must_use]
    pub fn unavailable(channel_id: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            channel_id: channel_id.into(),
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn unknown_party(channel_id: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self::UnknownParty {
            channel_id: channel_id.into(),
            account_id: account_id.into(),
        }
    }
}
