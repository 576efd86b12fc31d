//! Hidden system-appearance probe
//!
//! The probe is an invisible, input-transparent window whose only job is to
//! notice when the operating system switches between light and dark. While
//! sync is on its override stays `Unspecified`, so its resolved style is the
//! system's. The runtime reads it back through [`ProbeWindow::system_light`]
//! right after creation and on every forwarded system event. Nothing else
//! writes system appearance into the engine.

use std::sync::Arc;
use tint_platform::{InterfaceStyle, Platform, PlatformError, SceneId, Window, WindowConfig};

/// Window used to observe operating-system appearance changes
pub struct ProbeWindow {
    window: Arc<dyn Window>,
}

impl ProbeWindow {
    pub const TITLE: &'static str = "tint-appearance-probe";

    /// Creation parameters: hidden, transparent, excluded from hit testing
    pub fn config() -> WindowConfig {
        WindowConfig {
            title: Self::TITLE.to_string(),
            visible: false,
            transparent: true,
            interactive: false,
            ..WindowConfig::default()
        }
    }

    pub fn create(platform: &dyn Platform) -> Result<Self, PlatformError> {
        let window = platform.create_window(&Self::config())?;
        Ok(Self { window })
    }

    pub fn window(&self) -> &Arc<dyn Window> {
        &self.window
    }

    pub fn is_attached(&self) -> bool {
        self.window.scene().is_some()
    }

    /// Attach to `scene` unless already attached to one
    pub fn attach(&self, scene: Option<SceneId>) -> bool {
        if self.is_attached() {
            return false;
        }
        match scene {
            Some(scene) => {
                self.window.set_scene(Some(scene));
                tracing::debug!(?scene, "appearance probe attached");
                true
            }
            None => false,
        }
    }

    /// The probe never receives input
    pub fn point_inside(&self, _x: f32, _y: f32) -> bool {
        false
    }

    /// Write `style` if it differs from the current override
    pub fn apply_style(&self, style: InterfaceStyle) -> bool {
        if self.window.override_style() == style {
            return false;
        }
        self.window.set_override_style(style);
        tracing::trace!(%style, "probe override applied");
        true
    }

    /// The appearance the probe currently resolves to, if decided
    pub fn system_light(&self) -> Option<bool> {
        self.window.resolved_style().is_light()
    }
}
