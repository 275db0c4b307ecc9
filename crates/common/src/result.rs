//! Outcome of a single accept/reject resolution or store transition.

use serde::{Deserialize, Serialize};

use crate::types::{Connection, PartyIdentity};

/// Why a resolution attempt did not connect or reject anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionError {
    /// The pending set was empty.
    #[error("no pending request found")]
    NoPendingRequests,

    /// No pending request belongs to the target account.
    #[error("failed to find pending request for user {account_id}")]
    NotFound { account_id: String },

    /// More than one pending request belongs to the target account.
    #[error("found {matches} pending requests for user {account_id}; refusing to pick one")]
    Ambiguous { account_id: String, matches: usize },

    /// The acceptor (or requestor) is already part of a connection.
    #[error("{}", already_connected_message(.counterpart.as_deref()))]
    AlreadyConnected { counterpart: Option<String> },

    /// The store could not perform the transition.
    #[error("{message}")]
    StoreFailure { message: String },
}

fn already_connected_message(counterpart: Option<&str>) -> String {
    match counterpart {
        Some(name) => format!("already connected with {name}"),
        None => "already connected with someone else".to_string(),
    }
}

impl ResolutionError {
    #[must_use]
    pub fn not_found(account_id: impl Into<String>) -> Self {
        Self::NotFound {
            account_id: account_id.into(),
        }
    }

    #[must_use]
    pub fn store_failure(message: impl std::fmt::Display) -> Self {
        Self::StoreFailure {
            message: message.to_string(),
        }
    }

    /// Absence and ambiguity both mean "no usable request for this account".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NoPendingRequests | Self::NotFound { .. } | Self::Ambiguous { .. }
        )
    }
}

/// Discriminant of a [`ConnectionRequestResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionResultType {
    Connected,
    Rejected,
    Error,
}

/// Structured outcome handed back to the dispatcher and to result notifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConnectionRequestResult {
    Connected {
        connection: Connection,
    },
    Rejected {
        requestor: PartyIdentity,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rejecter: Option<PartyIdentity>,
    },
    Error {
        error: ResolutionError,
    },
}

impl ConnectionRequestResult {
    pub fn error(error: ResolutionError) -> Self {
        Self::Error { error }
    }

    pub fn result_type(&self) -> ConnectionResultType {
        match self {
            Self::Connected { .. } => ConnectionResultType::Connected,
            Self::Rejected { .. } => ConnectionResultType::Rejected,
            Self::Error { .. } => ConnectionResultType::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn connection(&self) -> Option<&Connection> {
        match self {
            Self::Connected { connection } => Some(connection),
            _ => None,
        }
    }

    /// The requestor whose request was resolved, if any.
    pub fn requestor(&self) -> Option<&PartyIdentity> {
        match self {
            Self::Connected { connection } => Some(&connection.party_b),
            Self::Rejected { requestor, .. } => Some(requestor),
            Self::Error { .. } => None,
        }
    }

    pub fn resolution_error(&self) -> Option<&ResolutionError> {
        match self {
            Self::Error { error } => Some(error),
            _ => None,
        }
    }

    /// Human-readable error text, present only for `Error` results.
    pub fn error_message(&self) -> Option<String> {
        self.resolution_error().map(ToString::to_string)
    }
}

impl From<ResolutionError> for ConnectionRequestResult {
    fn from(error: ResolutionError) -> Self {
        Self::error(error)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn already_connected_message_degrades_without_name() {
        let named = ResolutionError::AlreadyConnected {
            counterpart: Some("Alice".into()),
        };
        assert_eq!(named.to_string(), "already connected with Alice");

        let anonymous = ResolutionError::AlreadyConnected { counterpart: None };
        assert_eq!(anonymous.to_string(), "already connected with someone else");
    }

    #[test]
    fn not_found_class_covers_ambiguity() {
        assert!(ResolutionError::not_found("u1").is_not_found());
        assert!(
            ResolutionError::Ambiguous {
                account_id: "u1".into(),
                matches: 2,
            }
            .is_not_found()
        );
        assert!(!ResolutionError::store_failure("boom").is_not_found());
    }

    #[test]
    fn error_result_accessors() {
        let result: ConnectionRequestResult = ResolutionError::not_found("U9").into();
        assert_eq!(result.result_type(), ConnectionResultType::Error);
        assert!(result.connection().is_none());
        assert_eq!(
            result.error_message().as_deref(),
            Some("failed to find pending request for user U9")
        );
    }

    #[test]
    fn serializes_with_type_tag() {
        let result = ConnectionRequestResult::Rejected {
            requestor: PartyIdentity::new("webchat", "u1", "c1"),
            rejecter: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "rejected");
        assert_eq!(json["requestor"]["account_id"], "u1");
        assert!(json.get("rejecter").is_none());
    }

    #[test]
    fn requestor_is_the_resolved_party_for_both_outcomes() {
        let u1 = PartyIdentity::new("webchat", "u1", "c1");
        let a1 = PartyIdentity::new("msteams", "a1", "c2");

        let connected = ConnectionRequestResult::Connected {
            connection: Connection::new(a1.clone(), u1.clone()),
        };
        let rejected = ConnectionRequestResult::Rejected {
            requestor: u1.clone(),
            rejecter: Some(a1),
        };
        let swept = ConnectionRequestResult::Rejected {
            requestor: u1.clone(),
            rejecter: None,
        };

        for result in [&connected, &rejected, &swept] {
            assert_eq!(result.requestor().map(|p| p.channel_id.as_str()), Some("webchat"));
        }
        assert!(
            ConnectionRequestResult::from(ResolutionError::NoPendingRequests)
                .requestor()
                .is_none()
        );
    }
}
