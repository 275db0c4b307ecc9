//! Configuration loading, env substitution, and validation.
//!
//! Config files: `handoff.toml`, `handoff.yaml`, or `handoff.json`
//! Searched in `./` then `~/.config/handoff/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{apply_env_overrides, config_dir, discover_and_load, load_config},
    schema::{DEFAULT_NO_DIRECT_CONVERSATION_CHANNELS, HandoffConfig, RoutingConfig},
    validate::{Diagnostic, Severity, validate},
};
