//! Windowing-system contract

use crate::error::Result;
use std::fmt;
use std::sync::Arc;

/// Per-window forced appearance, or the appearance a window resolves to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InterfaceStyle {
    /// No override; the window follows the system
    #[default]
    Unspecified,
    Light,
    Dark,
}

impl InterfaceStyle {
    /// The explicit style for a light/dark decision
    pub const fn explicit(light: bool) -> Self {
        if light {
            Self::Light
        } else {
            Self::Dark
        }
    }

    /// `Some(true)` for light, `Some(false)` for dark, `None` when unspecified
    pub const fn is_light(self) -> Option<bool> {
        match self {
            Self::Unspecified => None,
            Self::Light => Some(true),
            Self::Dark => Some(false),
        }
    }

    pub const fn is_unspecified(self) -> bool {
        matches!(self, Self::Unspecified)
    }

    pub const fn to_raw(self) -> u8 {
        match self {
            Self::Unspecified => 0,
            Self::Light => 1,
            Self::Dark => 2,
        }
    }

    /// Decode a raw value; unknown values decode as `Unspecified`
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Light,
            2 => Self::Dark,
            _ => Self::Unspecified,
        }
    }
}

impl fmt::Display for InterfaceStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unspecified => "unspecified",
            Self::Light => "light",
            Self::Dark => "dark",
        })
    }
}

/// Identifier of a display scene windows are attached to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(pub u64);

/// Foreground state of the application
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ApplicationState {
    #[default]
    Active,
    Inactive,
    Background,
}

impl ApplicationState {
    pub const fn to_raw(self) -> u8 {
        match self {
            Self::Active => 0,
            Self::Inactive => 1,
            Self::Background => 2,
        }
    }

    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Inactive,
            2 => Self::Background,
            _ => Self::Active,
        }
    }
}

/// System notifications the host forwards to the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SystemEvent {
    /// The application returned to the foreground
    DidBecomeActive,
    /// A window's resolved traits (including its appearance) changed
    TraitsDidChange,
}

/// Window creation parameters
#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub visible: bool,
    pub transparent: bool,
    /// Whether the window participates in hit testing
    pub interactive: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Tint".to_string(),
            width: 800,
            height: 600,
            visible: true,
            transparent: false,
            interactive: true,
        }
    }
}

/// A live native window
///
/// All methods take `&self`; implementations use interior mutability and are
/// only called from the main thread by the engine.
pub trait Window: Send + Sync {
    /// Currently forced appearance
    fn override_style(&self) -> InterfaceStyle;

    /// Force an appearance; `Unspecified` lets the window follow the system
    fn set_override_style(&self, style: InterfaceStyle);

    /// Appearance the window actually renders with after applying its
    /// override to the system appearance
    fn resolved_style(&self) -> InterfaceStyle;

    fn scene(&self) -> Option<SceneId>;

    fn set_scene(&self, scene: Option<SceneId>);

    /// Hit test in window coordinates
    fn point_inside(&self, x: f32, y: f32) -> bool;
}

/// The host windowing system
pub trait Platform: Send + Sync {
    fn create_window(&self, config: &WindowConfig) -> Result<Arc<dyn Window>>;

    /// Scenes currently connected to the application, in connection order
    fn connected_scenes(&self) -> Vec<SceneId>;

    fn application_state(&self) -> ApplicationState;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_style() {
        assert_eq!(InterfaceStyle::explicit(true), InterfaceStyle::Light);
        assert_eq!(InterfaceStyle::explicit(false), InterfaceStyle::Dark);
    }

    #[test]
    fn test_is_light() {
        assert_eq!(InterfaceStyle::Light.is_light(), Some(true));
        assert_eq!(InterfaceStyle::Dark.is_light(), Some(false));
        assert_eq!(InterfaceStyle::Unspecified.is_light(), None);
    }

    #[test]
    fn test_raw_encoding() {
        for style in [
            InterfaceStyle::Unspecified,
            InterfaceStyle::Light,
            InterfaceStyle::Dark,
        ] {
            assert_eq!(InterfaceStyle::from_raw(style.to_raw()), style);
        }
        assert_eq!(InterfaceStyle::from_raw(42), InterfaceStyle::Unspecified);
        assert_eq!(ApplicationState::from_raw(42), ApplicationState::Active);
    }

    #[test]
    fn test_display() {
        assert_eq!(InterfaceStyle::Dark.to_string(), "dark");
    }
}
