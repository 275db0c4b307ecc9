use {
    async_trait::async_trait,
    handoff_common::{ConnectionRequestResult, PartyIdentity},
    tracing::{info, warn},
};

use crate::Result;

// ── Channel-side capabilities ───────────────────────────────────────────────

/// Opens a new direct conversation with the acceptor so the handoff does not
/// happen inside whatever conversation the accept signal arrived from.
///
/// Implemented by channel adapters. Calls may block on the transport.
#[async_trait]
pub trait DirectConversationOpener: Send + Sync {
    /// Open the conversation and return the acceptor's identity within it.
    async fn open_direct_conversation(
        &self,
        acceptor: &PartyIdentity,
        requestor: &PartyIdentity,
    ) -> Result<PartyIdentity>;
}

/// Resolves display names for error-message enrichment.
///
/// Failures are never fatal to the caller; they only degrade message text.
#[async_trait]
pub trait DisplayNameLookup: Send + Sync {
    async fn display_name(&self, party: &PartyIdentity) -> Result<Option<String>>;
}

/// Uses the name already carried on the identity, if any.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityDisplayNames;

#[async_trait]
impl DisplayNameLookup for IdentityDisplayNames {
    async fn display_name(&self, party: &PartyIdentity) -> Result<Option<String>> {
        Ok(party.name.clone())
    }
}

// ── Result delivery ─────────────────────────────────────────────────────────

/// Receives resolution results for side effects such as telling both parties
/// what happened. The gateway provides the concrete implementation.
#[async_trait]
pub trait ResultNotifier: Send + Sync {
    async fn notify(&self, result: &ConnectionRequestResult);
}

/// Notifier that only records results in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

#[async_trait]
impl ResultNotifier for TracingNotifier {
    async fn notify(&self, result: &ConnectionRequestResult) {
        match result {
            ConnectionRequestResult::Connected { connection } => info!(
                party_a = %connection.party_a,
                party_b = %connection.party_b,
                "connection established"
            ),
            ConnectionRequestResult::Rejected {
                requestor,
                rejecter,
            } => {
                let rejecter = rejecter
                    .as_ref()
                    .map_or_else(|| "-".to_string(), ToString::to_string);
                info!(requestor = %requestor, rejecter = %rejecter, "connection request rejected");
            },
            ConnectionRequestResult::Error { error } => {
                warn!(error = %error, "connection request failed")
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, handoff_common::ResolutionError};

    #[tokio::test]
    async fn identity_display_names_reads_carried_name() {
        let lookup = IdentityDisplayNames;
        let named = PartyIdentity::new("msteams", "a1", "c").with_name("Avery");
        let bare = PartyIdentity::new("msteams", "a2", "c");
        assert_eq!(
            lookup.display_name(&named).await.unwrap().as_deref(),
            Some("Avery")
        );
        assert!(lookup.display_name(&bare).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn tracing_notifier_accepts_every_variant() {
        let notifier = TracingNotifier;
        let requestor = PartyIdentity::new("webchat", "u1", "c1");
        notifier
            .notify(&ConnectionRequestResult::Rejected {
                requestor,
                rejecter: None,
            })
            .await;
        notifier
            .notify(&ResolutionError::not_found("u2").into())
            .await;
    }
}
