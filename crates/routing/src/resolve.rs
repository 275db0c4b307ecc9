//! Accept/reject resolution of pending connection requests.

use std::sync::Arc;

use {
    handoff_channels::{DisplayNameLookup, IdentityDisplayNames, supports_direct_conversation},
    handoff_common::{ConnectionRequest, ConnectionRequestResult, PartyIdentity, ResolutionError},
    handoff_config::RoutingConfig,
    tracing::{debug, info, warn},
};

#[cfg(feature = "metrics")]
use handoff_metrics::{counter, labels, routing as routing_metrics};

use crate::store::RoutingStore;

/// Turns accept/reject signals into store transitions.
///
/// Holds no state of its own between calls, so one instance can be shared
/// across any number of concurrent tasks.
pub struct ConnectionResolver {
    pub(crate) store: Arc<dyn RoutingStore>,
    names: Arc<dyn DisplayNameLookup>,
    config: RoutingConfig,
}

impl ConnectionResolver {
    pub fn new(store: Arc<dyn RoutingStore>, config: RoutingConfig) -> Self {
        Self {
            store,
            names: Arc::new(IdentityDisplayNames),
            config,
        }
    }

    /// Use `names` to enrich "already connected" errors.
    #[must_use]
    pub fn with_display_names(mut self, names: Arc<dyn DisplayNameLookup>) -> Self {
        self.names = names;
        self
    }

    /// Whether accepting from `acceptor`'s channel opens a new direct
    /// conversation rather than reusing the current one.
    pub fn should_create_direct_conversation(&self, acceptor: &PartyIdentity) -> bool {
        supports_direct_conversation(
            &acceptor.channel_id,
            &self.config.no_direct_conversation_channels,
        )
    }

    /// Accept (`do_accept`) or reject the pending request of the requestor
    /// whose account id is `target_account_id`, on behalf of `acceptor`.
    ///
    /// Every outcome, including failures, comes back as a result value.
    pub async fn accept_or_reject(
        &self,
        acceptor: &PartyIdentity,
        do_accept: bool,
        target_account_id: &str,
    ) -> ConnectionRequestResult {
        let result = self.resolve(acceptor, do_accept, target_account_id).await;
        match &result {
            ConnectionRequestResult::Connected { connection } => info!(
                acceptor = %connection.party_a,
                requestor = %connection.party_b,
                "request accepted"
            ),
            ConnectionRequestResult::Rejected { requestor, .. } => {
                info!(requestor = %requestor, rejecter = %acceptor, "request rejected")
            },
            ConnectionRequestResult::Error { error } => debug!(
                acceptor = %acceptor,
                account_id = target_account_id,
                do_accept,
                error = %error,
                "request resolution failed"
            ),
        }
        #[cfg(feature = "metrics")]
        record_outcome(&result);
        result
    }

    async fn resolve(
        &self,
        acceptor: &PartyIdentity,
        do_accept: bool,
        target_account_id: &str,
    ) -> ConnectionRequestResult {
        let pending = match self.store.pending_requests().await {
            Ok(pending) => pending,
            Err(e) => return ResolutionError::store_failure(e).into(),
        };
        if pending.is_empty() {
            return ResolutionError::NoPendingRequests.into();
        }

        let requestor = match find_single_request(&pending, target_account_id) {
            Ok(request) => request.requestor.clone(),
            Err(error) => return error.into(),
        };

        if !do_accept {
            // Rejecting never depends on the rejecter's own connection state.
            return self.store.reject_request(&requestor, Some(acceptor)).await;
        }

        let connection = match self.store.find_connection(acceptor).await {
            Ok(connection) => connection,
            Err(e) => return ResolutionError::store_failure(e).into(),
        };
        if let Some(counterpart) = connection
            .as_ref()
            .and_then(|c| c.counterpart_of(acceptor))
        {
            return ResolutionError::AlreadyConnected {
                counterpart: self.counterpart_name(counterpart).await,
            }
            .into();
        }

        let create_direct = self.should_create_direct_conversation(acceptor);
        debug!(
            acceptor = %acceptor,
            requestor = %requestor,
            create_direct,
            "connecting"
        );
        self.store
            .create_connection(acceptor, &requestor, create_direct)
            .await
    }

    async fn counterpart_name(&self, counterpart: &PartyIdentity) -> Option<String> {
        match self.names.display_name(counterpart).await {
            Ok(name) => name,
            Err(e) => {
                debug!(party = %counterpart, error = %e, "display name unavailable");
                None
            },
        }
    }
}

/// The one pending request whose requestor has `account_id`.
///
/// Duplicates are a data-integrity fault and are reported, never resolved by
/// picking one.
fn find_single_request<'a>(
    pending: &'a [ConnectionRequest],
    account_id: &str,
) -> Result<&'a ConnectionRequest, ResolutionError> {
    let mut matches = pending
        .iter()
        .filter(|r| r.requestor.account_id == account_id);
    let first = matches
        .next()
        .ok_or_else(|| ResolutionError::not_found(account_id))?;
    let extra = matches.count();
    if extra > 0 {
        warn!(account_id, matches = extra + 1, "duplicate pending requests");
        return Err(ResolutionError::Ambiguous {
            account_id: account_id.to_string(),
            matches: extra + 1,
        });
    }
    Ok(first)
}

#[cfg(feature = "metrics")]
/// Counters carry the requestor's channel, matching the bulk sweep.
fn record_outcome(result: &ConnectionRequestResult) {
    let channel = result
        .requestor()
        .map(|p| p.channel_id.clone())
        .unwrap_or_default();
    match result {
        ConnectionRequestResult::Connected { .. } => {
            counter!(
                routing_metrics::REQUESTS_ACCEPTED_TOTAL,
                labels::CHANNEL => channel
            )
            .increment(1)
        },
        ConnectionRequestResult::Rejected { .. } => {
            counter!(
                routing_metrics::REQUESTS_REJECTED_TOTAL,
                labels::CHANNEL => channel
            )
            .increment(1)
        },
        ConnectionRequestResult::Error { error } => {
            let reason = match error {
                ResolutionError::NoPendingRequests => "no_pending_requests",
                ResolutionError::NotFound { .. } => "not_found",
                ResolutionError::Ambiguous { .. } => "ambiguous",
                ResolutionError::AlreadyConnected { .. } => "already_connected",
                ResolutionError::StoreFailure { .. } => "store_failure",
            };
            counter!(routing_metrics::RESOLUTION_ERRORS_TOTAL, labels::REASON => reason)
                .increment(1)
        },
    }
}
