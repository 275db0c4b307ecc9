use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::HandoffConfig, validate::validate};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "handoff.toml",
    "handoff.yaml",
    "handoff.yml",
    "handoff.json",
];

/// Comma-separated channel ids appended to the direct-conversation exclusions.
const ENV_NO_DIRECT_CONVERSATION_CHANNELS: &str = "HANDOFF_NO_DIRECT_CONVERSATION_CHANNELS";

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<HandoffConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations, then apply env overrides.
///
/// Search order:
/// 1. `./handoff.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/handoff/handoff.{toml,yaml,yml,json}` (user-global)
///
/// Falls back to `HandoffConfig::default()` if no config file is found or the
/// one found cannot be parsed.
pub fn discover_and_load() -> HandoffConfig {
    let mut config = match find_config_file() {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(&path).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                HandoffConfig::default()
            })
        },
        None => {
            debug!("no config file found, using defaults");
            HandoffConfig::default()
        },
    };
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    for diagnostic in validate(&config) {
        warn!(
            severity = %diagnostic.severity,
            path = %diagnostic.path,
            "config: {}",
            diagnostic.message
        );
    }
    config
}

/// Apply `HANDOFF_*` environment overrides using the given lookup.
pub fn apply_env_overrides(config: &mut HandoffConfig, lookup: impl Fn(&str) -> Option<String>) {
    let Some(value) = lookup(ENV_NO_DIRECT_CONVERSATION_CHANNELS) else {
        return;
    };
    for channel in value.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        config.routing.exclude_channel(channel);
    }
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_FILENAMES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists());
    if local.is_some() {
        return local;
    }

    let dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/handoff/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "handoff").map(|d| d.config_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<HandoffConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_toml() {
        let file = write_config(
            ".toml",
            "[routing]\nno_direct_conversation_channels = [\"emulator\", \"telegram\"]\n",
        );
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(
            cfg.routing.no_direct_conversation_channels,
            vec!["emulator", "telegram"]
        );
    }

    #[test]
    fn loads_yaml() {
        let file = write_config(
            ".yaml",
            "routing:\n  no_direct_conversation_channels:\n    - skype\n",
        );
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.routing.no_direct_conversation_channels, vec!["skype"]);
    }

    #[test]
    fn loads_json_with_missing_fields_as_defaults() {
        let file = write_config(".json", "{}");
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg, HandoffConfig::default());
    }

    #[test]
    fn rejects_unknown_extension() {
        let file = write_config(".ini", "routing = 1");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config(Path::new("/nonexistent/handoff.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/handoff.toml"));
    }

    #[test]
    fn env_override_appends_channels() {
        let mut cfg = HandoffConfig::default();
        apply_env_overrides(&mut cfg, |name| {
            (name == ENV_NO_DIRECT_CONVERSATION_CHANNELS).then(|| " telegram, ,Skype".to_string())
        });
        assert_eq!(
            cfg.routing.no_direct_conversation_channels,
            vec!["emulator", "facebook", "skype", "telegram"]
        );
    }

    #[test]
    fn env_override_absent_is_noop() {
        let mut cfg = HandoffConfig::default();
        apply_env_overrides(&mut cfg, |_| None);
        assert_eq!(cfg, HandoffConfig::default());
    }
}
