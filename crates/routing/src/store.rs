//! Storage capability for pending requests and active connections.

use {
    async_trait::async_trait,
    handoff_common::{Connection, ConnectionRequest, ConnectionRequestResult, PartyIdentity},
};

use crate::Result;

/// Outcome of asking to be routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new pending request was recorded.
    Created(ConnectionRequest),
    /// The requestor already has a pending request; nothing changed.
    AlreadyPending,
    /// The requestor is already connected (or being connected); nothing changed.
    AlreadyConnected,
}

/// Authoritative owner of the pending-request set and the connection set.
///
/// Transition methods (`create_connection`, `reject_request`) are atomic from
/// the caller's point of view and report failure in their result value.
/// Implementations must not hold internal locks across external I/O.
#[async_trait]
pub trait RoutingStore: Send + Sync {
    /// Ordered snapshot of pending requests, oldest first.
    async fn pending_requests(&self) -> Result<Vec<ConnectionRequest>>;

    /// The active connection `party` belongs to, matched by account.
    async fn find_connection(&self, party: &PartyIdentity) -> Result<Option<Connection>>;

    /// Snapshot of all active connections.
    async fn connections(&self) -> Result<Vec<Connection>>;

    /// Remove `requestor`'s pending request and connect it to `acceptor`,
    /// opening a new direct conversation with the acceptor when
    /// `create_direct_conversation` is set. All-or-nothing.
    async fn create_connection(
        &self,
        acceptor: &PartyIdentity,
        requestor: &PartyIdentity,
        create_direct_conversation: bool,
    ) -> ConnectionRequestResult;

    /// Remove `requestor`'s pending request without connecting it.
    async fn reject_request(
        &self,
        requestor: &PartyIdentity,
        rejecter: Option<&PartyIdentity>,
    ) -> ConnectionRequestResult;

    /// Record a new pending request for `requestor`.
    async fn add_request(&self, requestor: &PartyIdentity) -> Result<SubmitOutcome>;

    /// Withdraw `requestor`'s pending request. Returns whether one existed.
    async fn remove_request(&self, requestor: &PartyIdentity) -> Result<bool>;

    /// End the connection `party` belongs to, returning it if there was one.
    async fn disconnect(&self, party: &PartyIdentity) -> Result<Option<Connection>>;
}
