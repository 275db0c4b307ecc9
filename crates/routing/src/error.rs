/// Errors raised by routing store reads and bookkeeping operations.
///
/// Accept/reject transitions never return these; they report failure inside
/// a [`handoff_common::ConnectionRequestResult`] instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Identity(#[from] handoff_common::Error),

    #[error("routing store unavailable: {message}")]
    Unavailable { message: String },
}

impl Error {
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
