//! Conversational endpoints and the records that pair them.

use std::{
    hash::{Hash, Hasher},
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// A conversational endpoint: one account on one channel, reached through a
/// particular conversation.
///
/// Equality and hashing only consider `(channel_id, account_id)`. Two values
/// that differ in conversation id or display metadata still refer to the same
/// party; use [`PartyIdentity::same_conversation`] when the transport
/// conversation matters too.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyIdentity {
    pub channel_id: String,
    pub account_id: String,
    pub conversation_id: String,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PartyIdentity {
    pub fn new(
        channel_id: impl Into<String>,
        account_id: impl Into<String>,
        conversation_id: impl Into<String>,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            account_id: account_id.into(),
            conversation_id: conversation_id.into(),
            is_bot: false,
            name: None,
        }
    }

    /// Like [`PartyIdentity::new`], but rejects empty channel or account ids.
    pub fn try_new(
        channel_id: impl Into<String>,
        account_id: impl Into<String>,
        conversation_id: impl Into<String>,
    ) -> Result<Self> {
        let identity = Self::new(channel_id, account_id, conversation_id);
        identity.validate()?;
        Ok(identity)
    }

    /// Channel and account ids are the matching key and must be present.
    pub fn validate(&self) -> Result<()> {
        if self.channel_id.trim().is_empty() {
            return Err(Error::invalid_identity("channel_id"));
        }
        if self.account_id.trim().is_empty() {
            return Err(Error::invalid_identity("account_id"));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn as_bot(mut self) -> Self {
        self.is_bot = true;
        self
    }

    /// Same account on the same channel.
    pub fn same_account(&self, other: &PartyIdentity) -> bool {
        self.channel_id == other.channel_id && self.account_id == other.account_id
    }

    /// Same account reached through the same conversation.
    pub fn same_conversation(&self, other: &PartyIdentity) -> bool {
        self.same_account(other) && self.conversation_id == other.conversation_id
    }

    /// The display name if one is known, otherwise the account id.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.account_id)
    }
}

impl PartialEq for PartyIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.same_account(other)
    }
}

impl Eq for PartyIdentity {}

impl Hash for PartyIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.channel_id.hash(state);
        self.account_id.hash(state);
    }
}

impl std::fmt::Display for PartyIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.channel_id, self.account_id)
    }
}

/// A pending ask from `requestor` to be routed to an acceptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRequest {
    pub requestor: PartyIdentity,
    pub created_at: i64,
}

impl ConnectionRequest {
    pub fn new(requestor: PartyIdentity) -> Self {
        Self {
            requestor,
            created_at: now_ms(),
        }
    }
}

/// An active pairing between two parties. Either side may be queried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub party_a: PartyIdentity,
    pub party_b: PartyIdentity,
    pub created_at: i64,
}

impl Connection {
    pub fn new(party_a: PartyIdentity, party_b: PartyIdentity) -> Self {
        Self {
            party_a,
            party_b,
            created_at: now_ms(),
        }
    }

    pub fn involves(&self, party: &PartyIdentity) -> bool {
        self.party_a.same_account(party) || self.party_b.same_account(party)
    }

    /// The other side of the connection, matched by account rather than by
    /// conversation, so a caller arriving through a different conversation
    /// still resolves its counterpart.
    pub fn counterpart_of(&self, party: &PartyIdentity) -> Option<&PartyIdentity> {
        if self.party_a.same_account(party) {
            Some(&self.party_b)
        } else if self.party_b.same_account(party) {
            Some(&self.party_a)
        } else {
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn identity_equality_ignores_conversation() {
        let a = PartyIdentity::new("msteams", "u1", "conv-1");
        let b = PartyIdentity::new("msteams", "u1", "conv-2").with_name("Ursula");
        assert_eq!(a, b);
        assert!(!a.same_conversation(&b));

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn identity_differs_across_channels() {
        let a = PartyIdentity::new("msteams", "u1", "c");
        let b = PartyIdentity::new("slack", "u1", "c");
        assert_ne!(a, b);
    }

    #[test]
    fn try_new_rejects_blank_account() {
        let err = PartyIdentity::try_new("slack", " ", "c").unwrap_err();
        assert_eq!(err, Error::invalid_identity("account_id"));
        assert!(PartyIdentity::try_new("", "u1", "c").is_err());
        assert!(PartyIdentity::try_new("slack", "u1", "c").is_ok());
    }

    #[test]
    fn counterpart_resolves_either_side() {
        let agent = PartyIdentity::new("msteams", "agent", "a-conv");
        let user = PartyIdentity::new("webchat", "user", "u-conv");
        let conn = Connection::new(agent.clone(), user.clone());

        let agent_elsewhere = PartyIdentity::new("msteams", "agent", "another-conv");
        assert_eq!(conn.counterpart_of(&agent_elsewhere), Some(&user));
        assert_eq!(conn.counterpart_of(&user), Some(&agent));
        assert!(
            conn.counterpart_of(&PartyIdentity::new("msteams", "nobody", "x"))
                .is_none()
        );
    }

    #[test]
    fn label_prefers_display_name() {
        let p = PartyIdentity::new("slack", "U42", "D1");
        assert_eq!(p.label(), "U42");
        assert_eq!(p.with_name("Dana").label(), "Dana");
    }
}
