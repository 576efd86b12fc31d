//! Main-thread appearance runtime
//!
//! [`AppearanceRuntime`] owns everything the engine mutates: the window set,
//! the probe window and the callback registry. It lives on the thread that
//! created it. Every [`Appearance`] handle posts work to its queue, flag
//! changes included, and the host drains that queue from its event loop with
//! [`AppearanceRuntime::run_pending`]. There are no locks; confinement to the
//! runtime's thread is what serializes mutation.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tint_platform::{HeadlessPlatform, InterfaceStyle, Window};
//! use tint_theme::{AppearanceConfig, AppearanceRuntime};
//!
//! let platform = Arc::new(HeadlessPlatform::new());
//! let config = AppearanceConfig {
//!     sync: false,
//!     ..AppearanceConfig::default()
//! };
//! let mut runtime = AppearanceRuntime::from_config(platform.clone(), &config);
//! let appearance = runtime.handle();
//!
//! let window: Arc<dyn Window> = platform.window(None);
//! appearance.register_window(&window);
//! appearance.set_light(false);
//! runtime.run_pending();
//!
//! assert_eq!(window.override_style(), InterfaceStyle::Dark);
//! ```

use crate::config::AppearanceConfig;
use crate::error::Result;
use crate::probe::ProbeWindow;
use crate::registry::{AppearanceCallback, CallbackRegistry, OwnerRef};
use crate::state::Appearance;
use crate::sync::{resolve_styles, WindowSynchronizer};
use std::any::Any;
use std::sync::Arc;
use tint_core::dispatch::MainQueue;
use tint_core::store::{AppearanceFlags, AppearanceStore, MemoryStore};
use tint_core::weak::WeakRef;
use tint_platform::{ApplicationState, Platform, SceneId, SystemEvent, Window};

/// Engine state confined to the runtime's thread
pub(crate) struct Engine {
    store: Arc<dyn AppearanceStore>,
    platform: Arc<dyn Platform>,
    appearance: Appearance,
    registry: CallbackRegistry,
    windows: WindowSynchronizer,
}

impl Engine {
    pub(crate) fn set_sync(&mut self, sync: bool) {
        if self.store.sync() == sync {
            return;
        }
        self.store.set_sync(sync);
        tracing::debug!(sync, "appearance sync changed");
        self.sync_windows();
    }

    /// Write `light`, replay callbacks with it, then re-apply overrides
    pub(crate) fn set_light(&mut self, light: bool) {
        if self.store.light() == light {
            return;
        }
        self.store.set_light(light);
        tracing::debug!(light, "appearance changed");
        let invoked = self.registry.broadcast(light);
        tracing::trace!(light, invoked, "appearance callbacks replayed");
        self.sync_windows();
    }

    pub(crate) fn toggle_light(&mut self) {
        let light = !self.store.light();
        self.set_light(light);
    }

    pub(crate) fn set_track_in_background(&mut self, track: bool) {
        if self.store.track_in_background() == track {
            return;
        }
        self.store.set_track_in_background(track);
        tracing::debug!(track, "background tracking changed");
        self.sync_windows();
    }

    fn sync_windows(&mut self) {
        let flags = AppearanceFlags::read(self.store.as_ref());
        self.windows.apply(resolve_styles(flags));
    }

    pub(crate) fn register_window(&mut self, window: WeakRef<dyn Window>) {
        let Some(strong) = window.upgrade() else {
            return;
        };
        if self.windows.insert(window) {
            tracing::debug!(scene = ?strong.scene(), "window registered");
        }
        if let Err(err) = self.install_probe(strong.scene()) {
            tracing::warn!(%err, "appearance probe unavailable");
        }
        self.sync_windows();
    }

    pub(crate) fn unregister_window(&mut self, window: &WeakRef<dyn Window>) {
        if self.windows.remove(window) {
            tracing::debug!("window unregistered");
        }
    }

    pub(crate) fn set_callback(
        &mut self,
        owner: OwnerRef,
        key: String,
        callback: AppearanceCallback,
    ) {
        self.registry.set(owner, key, callback);
    }

    pub(crate) fn run_all(&mut self, owner: &OwnerRef) {
        self.registry.run_all(owner, self.store.light());
    }

    pub(crate) fn clear_all(&mut self, owner: &OwnerRef) {
        self.registry.clear_all(owner);
    }

    /// Create the probe if needed and attach it to `scene`, falling back to
    /// the platform's first connected scene
    fn install_probe(&mut self, scene: Option<SceneId>) -> Result<()> {
        let scene = scene.or_else(|| self.platform.connected_scenes().first().copied());
        if let Some(probe) = self.windows.probe() {
            probe.attach(scene);
            return Ok(());
        }

        let probe = ProbeWindow::create(self.platform.as_ref())?;
        probe.attach(scene);
        tracing::debug!(?scene, "appearance probe created");
        self.windows.set_probe(probe);
        self.reload_light_if_needed();
        Ok(())
    }

    /// Adopt the system appearance reported by the probe
    ///
    /// Ignored when sync is off, off the main thread, or while the
    /// application is in the background. Returns the value adopted.
    fn reload_light_if_needed(&mut self) -> Option<bool> {
        let probe = self.windows.probe()?;
        if !self.store.sync()
            || !self.appearance.is_main_thread()
            || self.platform.application_state() == ApplicationState::Background
        {
            return None;
        }
        let light = probe.system_light()?;
        self.set_light(light);
        Some(light)
    }
}

/// Builder for [`AppearanceRuntime`]
pub struct AppearanceRuntimeBuilder {
    platform: Arc<dyn Platform>,
    store: Option<Arc<dyn AppearanceStore>>,
    waker: Option<Box<dyn Fn() + Send + Sync>>,
}

impl AppearanceRuntimeBuilder {
    /// Back the flags with `store` instead of an in-memory default
    pub fn store(mut self, store: Arc<dyn AppearanceStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Call `waker` whenever work is posted, to wake the host event loop
    pub fn waker<F>(mut self, waker: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.waker = Some(Box::new(waker));
        self
    }

    /// Build the runtime on the calling thread, which becomes its main thread
    pub fn build(self) -> AppearanceRuntime {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::default()) as Arc<dyn AppearanceStore>);
        let queue = match self.waker {
            Some(waker) => MainQueue::with_waker(waker),
            None => MainQueue::new(),
        };
        let appearance = Appearance::new(Arc::clone(&store), queue.handle());
        tracing::debug!(flags = ?appearance.flags(), "appearance runtime created");

        AppearanceRuntime {
            queue,
            engine: Engine {
                store,
                platform: self.platform,
                appearance,
                registry: CallbackRegistry::new(),
                windows: WindowSynchronizer::new(),
            },
        }
    }
}

/// Owner of the appearance engine's main-thread state
pub struct AppearanceRuntime {
    queue: MainQueue<Engine>,
    engine: Engine,
}

impl AppearanceRuntime {
    pub fn builder(platform: Arc<dyn Platform>) -> AppearanceRuntimeBuilder {
        AppearanceRuntimeBuilder {
            platform,
            store: None,
            waker: None,
        }
    }

    /// Runtime with default flags kept in memory
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self::builder(platform).build()
    }

    pub fn with_store(platform: Arc<dyn Platform>, store: Arc<dyn AppearanceStore>) -> Self {
        Self::builder(platform).store(store).build()
    }

    /// Runtime with in-memory flags initialized from `config`
    pub fn from_config(platform: Arc<dyn Platform>, config: &AppearanceConfig) -> Self {
        Self::with_store(platform, Arc::new(config.to_store()))
    }

    /// A new handle to this runtime's appearance
    pub fn handle(&self) -> Appearance {
        self.engine.appearance.clone()
    }

    /// Run all scheduled work; returns the number of tasks executed
    pub fn run_pending(&mut self) -> usize {
        self.queue.run_pending(&mut self.engine)
    }

    /// Number of tasks waiting for [`run_pending`](Self::run_pending)
    pub fn pending(&self) -> usize {
        self.queue.pending()
    }

    /// Forward a system notification to the probe window
    ///
    /// The system appearance is adopted right away, callbacks and window
    /// overrides included. Returns the value adopted, if any. Notifications
    /// raised by the platform while [`run_pending`](Self::run_pending) is
    /// applying overrides should be delivered after it returns.
    pub fn handle_system_event(&mut self, event: SystemEvent) -> Option<bool> {
        let light = self.engine.reload_light_if_needed();
        tracing::debug!(?event, ?light, "system appearance event");
        light
    }

    /// Create the probe window now instead of on the first registration
    pub fn install_probe(&mut self, scene: Option<SceneId>) -> Result<()> {
        self.engine.install_probe(scene)?;
        self.engine.sync_windows();
        Ok(())
    }

    pub fn probe_window(&self) -> Option<Arc<dyn Window>> {
        self.engine
            .windows
            .probe()
            .map(|probe| Arc::clone(probe.window()))
    }

    /// Live registered windows, excluding the probe
    pub fn window_count(&self) -> usize {
        self.engine.windows.window_count()
    }

    /// Live owners with at least one registered callback
    pub fn owner_count(&self) -> usize {
        self.engine.registry.owner_count()
    }

    pub fn callback_count<O>(&self, owner: &Arc<O>) -> usize
    where
        O: Send + Sync + 'static,
    {
        let erased: Arc<dyn Any + Send + Sync> = Arc::clone(owner) as Arc<dyn Any + Send + Sync>;
        self.engine.registry.callback_count(&WeakRef::new(&erased))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tint_platform::{HeadlessPlatform, InterfaceStyle};

    #[test]
    fn test_builder_waker_fires_on_post() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&wakes);
        let runtime = AppearanceRuntime::builder(Arc::new(HeadlessPlatform::new()))
            .waker(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build();

        runtime.handle().set_light(false);

        assert_eq!(wakes.load(Ordering::SeqCst), 1);
        assert_eq!(runtime.pending(), 1);
    }

    #[test]
    fn test_install_probe_uses_first_connected_scene() {
        let platform = Arc::new(HeadlessPlatform::with_scenes(vec![SceneId(7), SceneId(8)]));
        let mut runtime = AppearanceRuntime::new(platform.clone());

        runtime.install_probe(None).unwrap();

        let probe = runtime.probe_window().unwrap();
        assert_eq!(probe.scene(), Some(SceneId(7)));
        assert_eq!(probe.override_style(), InterfaceStyle::Unspecified);
        assert_eq!(platform.windows_created(), 1);
    }

    #[test]
    fn test_install_probe_reports_platform_error() {
        let platform = Arc::new(HeadlessPlatform::new());
        platform.fail_window_creation(true);
        let mut runtime = AppearanceRuntime::new(platform);

        let err = runtime.install_probe(None).unwrap_err();
        assert!(matches!(err, crate::ThemeError::Platform(_)));
        assert!(runtime.probe_window().is_none());
    }

    #[test]
    fn test_system_event_without_probe_is_ignored() {
        let mut runtime = AppearanceRuntime::new(Arc::new(HeadlessPlatform::new()));
        assert_eq!(
            runtime.handle_system_event(SystemEvent::DidBecomeActive),
            None
        );
    }
}
