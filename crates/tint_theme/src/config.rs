//! Appearance configuration
//!
//! Initial flag values, loadable from TOML:
//!
//! ```toml
//! sync = false
//! light = false
//! track_in_background = true
//! ```
//!
//! Missing fields take the defaults (`sync = true`, `light = true`,
//! `track_in_background = false`).

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tint_core::store::{AppearanceFlags, MemoryStore};

/// Initial appearance flags
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppearanceConfig {
    /// Follow the operating system's appearance
    pub sync: bool,
    /// Start in light mode
    pub light: bool,
    /// Let ordinary windows defer to the system while backgrounded
    pub track_in_background: bool,
}

impl AppearanceConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.as_ref().display(), ?config, "appearance config loaded");
        Ok(config)
    }

    pub fn flags(&self) -> AppearanceFlags {
        AppearanceFlags {
            sync: self.sync,
            light: self.light,
            track_in_background: self.track_in_background,
        }
    }

    /// In-memory store seeded with these values
    pub fn to_store(&self) -> MemoryStore {
        MemoryStore::new(self.flags())
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        AppearanceFlags::default().into()
    }
}

impl From<AppearanceFlags> for AppearanceConfig {
    fn from(flags: AppearanceFlags) -> Self {
        Self {
            sync: flags.sync,
            light: flags.light,
            track_in_background: flags.track_in_background,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ThemeError;
    use tint_core::store::AppearanceStore;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppearanceConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppearanceConfig::default());
        assert!(config.sync);
        assert!(config.light);
        assert!(!config.track_in_background);
    }

    #[test]
    fn test_partial_config() {
        let config = AppearanceConfig::from_toml_str("light = false\n").unwrap();
        assert!(config.sync);
        assert!(!config.light);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = AppearanceConfig::from_toml_str("dark = true\n").unwrap_err();
        assert!(matches!(err, ThemeError::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = AppearanceConfig::load("/nonexistent/tint/appearance.toml").unwrap_err();
        assert!(matches!(err, ThemeError::Io(_)));
    }

    #[test]
    fn test_to_store() {
        let config = AppearanceConfig {
            sync: false,
            light: false,
            track_in_background: true,
        };
        let store = config.to_store();

        assert!(!store.sync());
        assert!(!store.light());
        assert!(store.track_in_background());
    }
}
