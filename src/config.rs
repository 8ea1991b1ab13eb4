//! Contact-sheet behavior configuration model and defaults.

use std::path::{Path, PathBuf};

use log::warn;

/// Root configuration, persisted to `contact_sheet.toml`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SheetConfig {
    #[serde(default)]
    /// Item navigation behavior.
    pub navigation: NavigationConfig,
    #[serde(default)]
    /// Notification channel sizing.
    pub notifications: NotificationConfig,
}

/// Behavior of "select next" style navigation.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NavigationConfig {
    /// Whether stepping past the last item wraps back to the head. Off by
    /// default: the end of the sheet is reported as a miss.
    #[serde(default)]
    pub wrap: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self { wrap: false }
    }
}

/// Notification channel sizing.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NotificationConfig {
    /// Capacity of the observer broadcast channel. Slow observers past this
    /// many undelivered events start lagging.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            event_capacity: default_event_capacity(),
        }
    }
}

fn default_event_capacity() -> usize {
    256
}

impl SheetConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Reads configuration from `path`, falling back to defaults when the
    /// file is missing or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };
        match Self::from_toml_str(&raw) {
            Ok(config) => config,
            Err(err) => {
                warn!(
                    "SheetConfig: failed to parse {}: {}. Using defaults",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Default on-disk location, under the platform config directory.
    pub fn default_path(app_name: &str) -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(app_name).join("contact_sheet.toml"))
    }
}
