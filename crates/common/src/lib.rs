//! Shared value types, the connection-request result model, and error
//! definitions used across all handoff crates.

pub mod error;
pub mod result;
pub mod types;

pub use {
    error::{Error, Result},
    result::{ConnectionRequestResult, ConnectionResultType, ResolutionError},
    types::{Connection, ConnectionRequest, PartyIdentity, now_ms},
};
