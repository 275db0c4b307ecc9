use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid party identity: {field} must not be empty")]
    InvalidIdentity { field: &'static str },
}

impl Error {
    #[must_use]
    pub fn invalid_identity(field: &'static str) -> Self {
        Self::InvalidIdentity { field }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
