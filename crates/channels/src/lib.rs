//! Channel seam of the handoff engine.
//!
//! Transport adapters (Teams, Slack, web chat, ...) live outside this
//! workspace. The routing core talks to them only through the traits here:
//! opening direct conversations, looking up display names, and delivering
//! resolution results.

pub mod collaborators;
pub mod direct;
pub mod error;

pub use {
    collaborators::{
        DirectConversationOpener, DisplayNameLookup, IdentityDisplayNames, ResultNotifier,
        TracingNotifier,
    },
    direct::supports_direct_conversation,
    error::{Error, Result},
};
