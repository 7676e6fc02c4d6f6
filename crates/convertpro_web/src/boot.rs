//! Start-up decisions that do not need a browser: where the page keeps its
//! config and whether the page wants to be mounted automatically.

use convertpro::InteractionConfig;
use tracing::{debug, warn};

/// `<script type="application/json" id="convertpro-config">` holding a
/// partial [`InteractionConfig`].
pub const CONFIG_ELEMENT_ID: &str = "convertpro-config";

/// Attribute on `<body>` that controls the automatic mount.
pub const MOUNT_MODE_ATTR: &str = "data-convertpro";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountMode {
    /// Mount on the whole document once it is parsed.
    Auto,
    /// Leave mounting to the embedding application (`mountPage`).
    Manual,
}

impl MountMode {
    pub fn from_attr(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "manual" => MountMode::Manual,
            _ => MountMode::Auto,
        }
    }
}

/// Parse the embedded config, falling back to defaults when it is missing,
/// blank or invalid.
pub fn config_from_script(raw: Option<&str>) -> InteractionConfig {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        debug!("no embedded config; using defaults");
        return InteractionConfig::default();
    };
    match InteractionConfig::from_json(raw) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "ignoring embedded config");
            InteractionConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_mode_defaults_to_auto() {
        assert_eq!(MountMode::from_attr(None), MountMode::Auto);
        assert_eq!(MountMode::from_attr(Some("")), MountMode::Auto);
        assert_eq!(MountMode::from_attr(Some(" Manual ")), MountMode::Manual);
    }

    #[test]
    fn config_falls_back_on_missing_or_bad_json() {
        assert_eq!(config_from_script(None), InteractionConfig::default());
        assert_eq!(config_from_script(Some("  \n")), InteractionConfig::default());
        assert_eq!(config_from_script(Some("{oops")), InteractionConfig::default());
    }

    #[test]
    fn config_overrides_are_applied() {
        let cfg = config_from_script(Some(r#"{"copy": {"feedback_ms": 1500}}"#));
        assert_eq!(cfg.copy.feedback_ms, 1500);
        assert_eq!(cfg.alerts.fade_after_ms, 5000);
    }
}
