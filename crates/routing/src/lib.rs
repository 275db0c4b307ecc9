//! Connection-request resolution: pairing requestors with acceptors.
//!
//! A requestor asks to be routed and waits in the pending set. An acceptor
//! accepts or rejects one request by the requestor's account id; acceptance
//! atomically removes the request and creates a connection, optionally in a
//! freshly opened direct conversation. A bulk sweep rejects everything
//! pending.
//!
//! The [`RoutingStore`] owns all state. [`ConnectionResolver`] is stateless
//! and safe to share across tasks.

pub mod error;
pub mod resolve;
pub mod store;
pub mod store_memory;
mod sweep;

pub use {
    error::{Error, Result},
    resolve::ConnectionResolver,
    store::{RoutingStore, SubmitOutcome},
    store_memory::InMemoryRoutingStore,
};
