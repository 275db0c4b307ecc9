/// Config schema types for the handoff engine.
use serde::{Deserialize, Serialize};

/// Channel kinds that cannot open a direct conversation on demand: the
/// in-browser test emulator and two social-messaging channels.
pub const DEFAULT_NO_DIRECT_CONVERSATION_CHANNELS: &[&str] = &["emulator", "facebook", "skype"];

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandoffConfig {
    pub routing: RoutingConfig,
}

/// Connection-request routing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Channel ids (case-insensitive) on which accepting a request reuses the
    /// acceptor's current conversation instead of opening a new one.
    pub no_direct_conversation_channels: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            no_direct_conversation_channels: DEFAULT_NO_DIRECT_CONVERSATION_CHANNELS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl RoutingConfig {
    /// Add a channel kind to the exclusion list unless it is already there.
    pub fn exclude_channel(&mut self, channel_id: impl Into<String>) {
        let channel_id = channel_id.into();
        if !self
            .no_direct_conversation_channels
            .iter()
            .any(|c| c.eq_ignore_ascii_case(&channel_id))
        {
            self.no_direct_conversation_channels.push(channel_id);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_emulator_and_social_channels() {
        let cfg = RoutingConfig::default();
        assert_eq!(
            cfg.no_direct_conversation_channels,
            vec!["emulator", "facebook", "skype"]
        );
    }

    #[test]
    fn exclude_channel_is_case_insensitive_and_idempotent() {
        let mut cfg = RoutingConfig::default();
        cfg.exclude_channel("Skype");
        cfg.exclude_channel("telegram");
        cfg.exclude_channel("TELEGRAM");
        assert_eq!(cfg.no_direct_conversation_channels.len(), 4);
    }

    #[test]
    fn missing_section_uses_defaults() {
        let cfg: HandoffConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, HandoffConfig::default());

        let cfg: HandoffConfig = toml::from_str("[routing]\n").unwrap();
        assert_eq!(cfg.routing, RoutingConfig::default());
    }
}
