//! Semantic checks on a loaded configuration.

use std::collections::HashSet;

use crate::schema::HandoffConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "routing.no_direct_conversation_channels[2]"
    pub path: String,
    pub message: String,
}

/// Check the config for entries that are syntactically fine but useless or
/// suspicious.
pub fn validate(config: &HandoffConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut seen = HashSet::new();

    for (i, channel) in config
        .routing
        .no_direct_conversation_channels
        .iter()
        .enumerate()
    {
        let path = format!("routing.no_direct_conversation_channels[{i}]");
        let normalized = channel.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                path,
                message: "channel id must not be empty".into(),
            });
        } else if !seen.insert(normalized) {
            diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                path,
                message: format!("duplicate channel id {channel:?}"),
            });
        }
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_clean() {
        assert!(validate(&HandoffConfig::default()).is_empty());
    }

    #[test]
    fn flags_blank_and_duplicate_entries() {
        let mut cfg = HandoffConfig::default();
        cfg.routing.no_direct_conversation_channels =
            vec!["emulator".into(), "  ".into(), "EMULATOR".into()];

        let diagnostics = validate(&cfg);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(
            diagnostics[0].path,
            "routing.no_direct_conversation_channels[1]"
        );
        assert_eq!(diagnostics[1].severity, Severity::Warning);
        assert!(diagnostics[1].message.contains("EMULATOR"));
    }
}
