//! In-memory routing store.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard},
};

use {
    async_trait::async_trait,
    handoff_channels::DirectConversationOpener,
    handoff_common::{
        Connection, ConnectionRequest, ConnectionRequestResult, PartyIdentity, ResolutionError,
    },
    tracing::{debug, warn},
};

#[cfg(feature = "metrics")]
use handoff_metrics::{gauge, routing as routing_metrics};

use crate::{
    Result,
    store::{RoutingStore, SubmitOutcome},
};

#[derive(Default)]
struct RoutingState {
    pending: Vec<ConnectionRequest>,
    connections: Vec<Connection>,
    /// Parties of a connection that is being established but not yet
    /// committed. A claimed party counts as connected.
    claimed: HashSet<PartyIdentity>,
}

impl RoutingState {
    fn pending_index(&self, requestor: &PartyIdentity) -> Option<usize> {
        self.pending
            .iter()
            .position(|r| r.requestor.same_account(requestor))
    }

    fn connection_of(&self, party: &PartyIdentity) -> Option<&Connection> {
        self.connections.iter().find(|c| c.involves(party))
    }

    fn is_engaged(&self, party: &PartyIdentity) -> bool {
        self.claimed.contains(party) || self.connection_of(party).is_some()
    }

    /// Put a claimed request back where it was, ordered by creation time.
    fn restore(&mut self, request: ConnectionRequest) {
        if self.pending_index(&request.requestor).is_some() {
            return;
        }
        let at = self
            .pending
            .iter()
            .position(|r| r.created_at > request.created_at)
            .unwrap_or(self.pending.len());
        self.pending.insert(at, request);
    }

    #[cfg(feature = "metrics")]
    fn record_gauges(&self) {
        gauge!(routing_metrics::PENDING_REQUESTS).set(self.pending.len() as f64);
        gauge!(routing_metrics::ACTIVE_CONNECTIONS).set(self.connections.len() as f64);
    }

    #[cfg(not(feature = "metrics"))]
    fn record_gauges(&self) {}
}

/// Mutex-guarded store holding everything in process memory.
///
/// The lock is only held for synchronous bookkeeping. Opening a direct
/// conversation happens between a claim step and a commit step, with the
/// request already removed from the pending set so competing accepts observe
/// it as gone.
pub struct InMemoryRoutingStore {
    state: Mutex<RoutingState>,
    opener: Option<Arc<dyn DirectConversationOpener>>,
}

impl InMemoryRoutingStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RoutingState::default()),
            opener: None,
        }
    }

    /// Store that opens direct conversations through `opener` when asked to.
    /// Without one, accepts always reuse the acceptor's current conversation.
    pub fn with_opener(opener: Arc<dyn DirectConversationOpener>) -> Self {
        Self {
            state: Mutex::new(RoutingState::default()),
            opener: Some(opener),
        }
    }

    fn state(&self) -> MutexGuard<'_, RoutingState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Validate and claim under the lock. On success the request is out of
    /// the pending set and both parties are marked as claimed.
    fn claim(
        &self,
        acceptor: &PartyIdentity,
        requestor: &PartyIdentity,
    ) -> std::result::Result<ConnectionRequest, ResolutionError> {
        let mut state = self.state();

        let index = state
            .pending_index(requestor)
            .ok_or_else(|| ResolutionError::not_found(&requestor.account_id))?;

        if acceptor.same_account(requestor) {
            return Err(ResolutionError::store_failure(
                "a party cannot accept its own request",
            ));
        }

        for party in [acceptor, requestor] {
            if let Some(connection) = state.connection_of(party) {
                return Err(ResolutionError::AlreadyConnected {
                    counterpart: connection
                        .counterpart_of(party)
                        .map(|p| p.label().to_string()),
                });
            }
            if state.claimed.contains(party) {
                return Err(ResolutionError::AlreadyConnected { counterpart: None });
            }
        }

        let request = state.pending.remove(index);
        state.claimed.insert(acceptor.clone());
        state.claimed.insert(request.requestor.clone());
        Ok(request)
    }

    async fn acceptor_endpoint(
        &self,
        acceptor: &PartyIdentity,
        requestor: &PartyIdentity,
        create_direct_conversation: bool,
    ) -> std::result::Result<PartyIdentity, ResolutionError> {
        if !create_direct_conversation {
            return Ok(acceptor.clone());
        }
        let Some(opener) = self.opener.as_ref() else {
            debug!(acceptor = %acceptor, "no opener configured, keeping current conversation");
            return Ok(acceptor.clone());
        };
        let endpoint = opener
            .open_direct_conversation(acceptor, requestor)
            .await
            .map_err(|e| {
                ResolutionError::store_failure(format!("failed to open direct conversation: {e}"))
            })?;
        // The opened conversation must still belong to the acceptor.
        if !endpoint.same_account(acceptor) {
            return Err(ResolutionError::store_failure(format!(
                "direct conversation opened for {endpoint} instead of {acceptor}"
            )));
        }
        Ok(endpoint)
    }
}

impl Default for InMemoryRoutingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoutingStore for InMemoryRoutingStore {
    async fn pending_requests(&self) -> Result<Vec<ConnectionRequest>> {
        Ok(self.state().pending.clone())
    }

    async fn find_connection(&self, party: &PartyIdentity) -> Result<Option<Connection>> {
        Ok(self.state().connection_of(party).cloned())
    }

    async fn connections(&self) -> Result<Vec<Connection>> {
        Ok(self.state().connections.clone())
    }

    async fn create_connection(
        &self,
        acceptor: &PartyIdentity,
        requestor: &PartyIdentity,
        create_direct_conversation: bool,
    ) -> ConnectionRequestResult {
        let request = match self.claim(acceptor, requestor) {
            Ok(request) => request,
            Err(error) => return error.into(),
        };

        // No lock held here; the opener may block on the transport.
        let endpoint = self
            .acceptor_endpoint(acceptor, &request.requestor, create_direct_conversation)
            .await;

        let mut state = self.state();
        state.claimed.remove(acceptor);
        state.claimed.remove(&request.requestor);
        let result = match endpoint {
            Ok(acceptor_endpoint) => {
                let connection = Connection::new(acceptor_endpoint, request.requestor);
                debug!(
                    acceptor = %connection.party_a,
                    requestor = %connection.party_b,
                    direct = create_direct_conversation,
                    "connection created"
                );
                state.connections.push(connection.clone());
                ConnectionRequestResult::Connected { connection }
            },
            Err(error) => {
                warn!(
                    acceptor = %acceptor,
                    requestor = %request.requestor,
                    error = %error,
                    "connection rolled back"
                );
                state.restore(request);
                error.into()
            },
        };
        state.record_gauges();
        result
    }

    async fn reject_request(
        &self,
        requestor: &PartyIdentity,
        rejecter: Option<&PartyIdentity>,
    ) -> ConnectionRequestResult {
        let mut state = self.state();
        let Some(index) = state.pending_index(requestor) else {
            return ResolutionError::not_found(&requestor.account_id).into();
        };
        let request = state.pending.remove(index);
        state.record_gauges();
        ConnectionRequestResult::Rejected {
            requestor: request.requestor,
            rejecter: rejecter.cloned(),
        }
    }

    async fn add_request(&self, requestor: &PartyIdentity) -> Result<SubmitOutcome> {
        requestor.validate()?;
        let mut state = self.state();
        if state.is_engaged(requestor) {
            return Ok(SubmitOutcome::AlreadyConnected);
        }
        if state.pending_index(requestor).is_some() {
            return Ok(SubmitOutcome::AlreadyPending);
        }
        let request = ConnectionRequest::new(requestor.clone());
        state.pending.push(request.clone());
        state.record_gauges();
        Ok(SubmitOutcome::Created(request))
    }

    async fn remove_request(&self, requestor: &PartyIdentity) -> Result<bool> {
        let mut state = self.state();
        let Some(index) = state.pending_index(requestor) else {
            return Ok(false);
        };
        state.pending.remove(index);
        state.record_gauges();
        Ok(true)
    }

    async fn disconnect(&self, party: &PartyIdentity) -> Result<Option<Connection>> {
        let mut state = self.state();
        let Some(index) = state.connections.iter().position(|c| c.involves(party)) else {
            return Ok(None);
        };
        let connection = state.connections.remove(index);
        state.record_gauges();
        Ok(Some(connection))
    }
}
