use serde::Deserialize;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to parse navigation config: {0}")]
    Parse(String),
    #[error("Invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Where to find the toggle control and panel, and which class marks the panel open.
///
/// Every field is optional in serialized form; missing fields take the defaults,
/// so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Selector for the toggle control (first match wins)
    pub toggle_selector: String,
    /// Selector for the collapsible panel (first match wins)
    pub panel_selector: String,
    /// Class present on the panel while it is open
    pub open_class: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            toggle_selector: "[data-nav-toggle]".to_string(),
            panel_selector: "[data-nav-panel]".to_string(),
            open_class: "open".to_string(),
        }
    }
}

impl NavConfig {
    /// Parse a JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: NavConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.toggle_selector.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "toggle_selector",
                reason: "must not be empty",
            });
        }
        if self.panel_selector.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "panel_selector",
                reason: "must not be empty",
            });
        }
        if self.open_class.is_empty() {
            return Err(ConfigError::Invalid {
                field: "open_class",
                reason: "must not be empty",
            });
        }
        // A class token list splits on whitespace
        if self.open_class.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid {
                field: "open_class",
                reason: "must be a single class name",
            });
        }
        Ok(())
    }
}
