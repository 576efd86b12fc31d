//! In-memory windowing backend
//!
//! Simulates an operating system with a global appearance, a foreground
//! state, and a fixed set of scenes. Windows resolve their appearance from
//! their own override first and the simulated system second. Every override
//! write is counted so callers can check that redundant writes are skipped.

use crate::error::{PlatformError, Result};
use crate::window::{ApplicationState, InterfaceStyle, Platform, SceneId, Window, WindowConfig};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

const NO_SCENE: u64 = u64::MAX;

#[derive(Debug)]
struct Shared {
    system_style: AtomicU8,
    application_state: AtomicU8,
    override_writes: AtomicUsize,
    windows_created: AtomicUsize,
    fail_creation: AtomicBool,
}

/// Simulated windowing system
#[derive(Debug)]
pub struct HeadlessPlatform {
    shared: Arc<Shared>,
    scenes: Vec<SceneId>,
}

impl HeadlessPlatform {
    /// One connected scene, light system appearance, application active
    pub fn new() -> Self {
        Self::with_scenes(vec![SceneId(1)])
    }

    /// `SceneId(u64::MAX)` is reserved and must not be used
    pub fn with_scenes(scenes: Vec<SceneId>) -> Self {
        Self {
            shared: Arc::new(Shared {
                system_style: AtomicU8::new(InterfaceStyle::Light.to_raw()),
                application_state: AtomicU8::new(ApplicationState::Active.to_raw()),
                override_writes: AtomicUsize::new(0),
                windows_created: AtomicUsize::new(0),
                fail_creation: AtomicBool::new(false),
            }),
            scenes,
        }
    }

    /// Change the simulated operating-system appearance
    pub fn set_system_style(&self, style: InterfaceStyle) {
        self.shared
            .system_style
            .store(style.to_raw(), Ordering::SeqCst);
    }

    pub fn system_style(&self) -> InterfaceStyle {
        InterfaceStyle::from_raw(self.shared.system_style.load(Ordering::SeqCst))
    }

    pub fn set_application_state(&self, state: ApplicationState) {
        self.shared
            .application_state
            .store(state.to_raw(), Ordering::SeqCst);
    }

    /// Total override writes across every window of this platform
    pub fn override_writes(&self) -> usize {
        self.shared.override_writes.load(Ordering::SeqCst)
    }

    /// Windows created through [`Platform::create_window`]
    pub fn windows_created(&self) -> usize {
        self.shared.windows_created.load(Ordering::SeqCst)
    }

    /// Make subsequent [`Platform::create_window`] calls fail
    pub fn fail_window_creation(&self, fail: bool) {
        self.shared.fail_creation.store(fail, Ordering::SeqCst);
    }

    /// Create an ordinary application window attached to `scene`
    pub fn window(&self, scene: Option<SceneId>) -> Arc<HeadlessWindow> {
        let window = HeadlessWindow::new(Arc::clone(&self.shared), WindowConfig::default());
        window.set_scene(scene);
        Arc::new(window)
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for HeadlessPlatform {
    fn create_window(&self, config: &WindowConfig) -> Result<Arc<dyn Window>> {
        if self.shared.fail_creation.load(Ordering::SeqCst) {
            return Err(PlatformError::WindowCreation(format!(
                "headless window creation disabled ({})",
                config.title
            )));
        }
        self.shared.windows_created.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(HeadlessWindow::new(
            Arc::clone(&self.shared),
            config.clone(),
        )))
    }

    fn connected_scenes(&self) -> Vec<SceneId> {
        self.scenes.clone()
    }

    fn application_state(&self) -> ApplicationState {
        ApplicationState::from_raw(self.shared.application_state.load(Ordering::SeqCst))
    }
}

/// Window of a [`HeadlessPlatform`]
#[derive(Debug)]
pub struct HeadlessWindow {
    config: WindowConfig,
    shared: Arc<Shared>,
    override_style: AtomicU8,
    scene: AtomicU64,
}

impl HeadlessWindow {
    fn new(shared: Arc<Shared>, config: WindowConfig) -> Self {
        Self {
            config,
            shared,
            override_style: AtomicU8::new(InterfaceStyle::Unspecified.to_raw()),
            scene: AtomicU64::new(NO_SCENE),
        }
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }
}

impl Window for HeadlessWindow {
    fn override_style(&self) -> InterfaceStyle {
        InterfaceStyle::from_raw(self.override_style.load(Ordering::SeqCst))
    }

    fn set_override_style(&self, style: InterfaceStyle) {
        self.override_style.store(style.to_raw(), Ordering::SeqCst);
        self.shared.override_writes.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(title = %self.config.title, %style, "override style written");
    }

    fn resolved_style(&self) -> InterfaceStyle {
        match self.override_style() {
            InterfaceStyle::Unspecified => {
                InterfaceStyle::from_raw(self.shared.system_style.load(Ordering::SeqCst))
            }
            style => style,
        }
    }

    fn scene(&self) -> Option<SceneId> {
        match self.scene.load(Ordering::SeqCst) {
            NO_SCENE => None,
            id => Some(SceneId(id)),
        }
    }

    fn set_scene(&self, scene: Option<SceneId>) {
        let raw = scene.map_or(NO_SCENE, |SceneId(id)| id);
        self.scene.store(raw, Ordering::SeqCst);
    }

    fn point_inside(&self, x: f32, y: f32) -> bool {
        self.config.interactive
            && self.config.visible
            && x >= 0.0
            && y >= 0.0
            && x < self.config.width as f32
            && y < self.config.height as f32
    }
}
