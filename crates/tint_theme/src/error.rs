//! Theme engine error types

use thiserror::Error;
use tint_platform::PlatformError;

/// Errors surfaced by the appearance engine's setup paths
///
/// Appearance changes, registrations and broadcasts never fail; only probe
/// installation and configuration loading do.
#[derive(Error, Debug)]
pub enum ThemeError {
    /// The windowing system refused to create the probe window
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Failed to read a configuration file
    #[error("Failed to read appearance config: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML for [`crate::AppearanceConfig`]
    #[error("Invalid appearance config: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type for theme engine operations
pub type Result<T> = std::result::Result<T, ThemeError>;
