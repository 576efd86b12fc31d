//! Appearance state handle
//!
//! [`Appearance`] is the entry point every caller uses: it reads the three
//! appearance flags and schedules changes on the runtime's main thread.
//! Setters only post work. The compare, the store write, the callback
//! broadcast and the window pass all run together when the runtime drains
//! its queue, in the order the calls were made. Callers never block, and a
//! read made before the drain still sees the previous value.
//!
//! `set_light` does not turn off system sync. While synced, the next system
//! appearance notification overwrites a manual choice.

use crate::registry::{AppearanceCallback, OwnerRef};
use crate::runtime::Engine;
use crate::value::Themed;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tint_core::dispatch::QueueHandle;
use tint_core::store::{AppearanceFlags, AppearanceStore};
use tint_core::weak::WeakRef;
use tint_platform::Window;

/// Shareable handle to the appearance engine
#[derive(Clone)]
pub struct Appearance {
    store: Arc<dyn AppearanceStore>,
    queue: QueueHandle<Engine>,
}

impl Appearance {
    pub(crate) fn new(store: Arc<dyn AppearanceStore>, queue: QueueHandle<Engine>) -> Self {
        Self { store, queue }
    }

    pub(crate) fn is_main_thread(&self) -> bool {
        self.queue.is_main_thread()
    }

    // ========== Flags ==========

    /// Whether the appearance follows the operating system
    pub fn sync(&self) -> bool {
        self.store.sync()
    }

    /// Enable or disable following the operating system
    ///
    /// Re-applies window overrides; does not change `light` by itself.
    pub fn set_sync(&self, sync: bool) {
        self.queue.post(move |engine| engine.set_sync(sync));
    }

    /// Current resolved appearance
    pub fn light(&self) -> bool {
        self.store.light()
    }

    /// Set the appearance, replaying every registered callback and then
    /// re-applying window overrides
    ///
    /// Nothing happens if the appearance already has this value when the
    /// runtime gets to it.
    pub fn set_light(&self, light: bool) {
        self.queue.post(move |engine| engine.set_light(light));
    }

    /// Flip between light and dark, relative to the value when the work runs
    pub fn toggle_light(&self) {
        self.queue.post(Engine::toggle_light);
    }

    /// Whether ordinary windows defer to the system appearance
    pub fn track_in_background(&self) -> bool {
        self.store.track_in_background()
    }

    pub fn set_track_in_background(&self, track: bool) {
        self.queue.post(move |engine| engine.set_track_in_background(track));
    }

    /// Snapshot of all three flags
    pub fn flags(&self) -> AppearanceFlags {
        AppearanceFlags::read(self.store.as_ref())
    }

    // ========== Windows ==========

    /// Start keeping `window`'s override style in line with the appearance
    ///
    /// The window is held weakly. The first registration also installs the
    /// probe window on the same scene.
    pub fn register_window(&self, window: &Arc<dyn Window>) {
        let window = WeakRef::new(window);
        self.queue.post(move |engine| engine.register_window(window));
    }

    pub fn unregister_window(&self, window: &Arc<dyn Window>) {
        let window = WeakRef::new(window);
        self.queue.post(move |engine| engine.unregister_window(&window));
    }

    // ========== Callbacks ==========

    /// Remember `callback` under `(owner, key)` for future appearance changes
    ///
    /// Does not invoke the callback. Ignored when `key` is empty. The owner is
    /// held weakly; the callback should capture only a `Weak` to it.
    pub fn set_callback<O, F>(&self, owner: &Arc<O>, key: impl Into<String>, callback: F)
    where
        O: Send + Sync + 'static,
        F: Fn(bool) + Send + 'static,
    {
        self.store_callback(owner, key.into(), Box::new(callback));
    }

    /// Invoke `callback` with the current appearance now, then
    /// [`set_callback`](Self::set_callback) it
    pub fn run_and_set<O, F>(&self, owner: &Arc<O>, key: impl Into<String>, callback: F)
    where
        O: Send + Sync + 'static,
        F: Fn(bool) + Send + 'static,
    {
        callback(self.light());
        self.store_callback(owner, key.into(), Box::new(callback));
    }

    /// Replay every callback of `owner` with the appearance current when the
    /// work runs
    pub fn run_all<O>(&self, owner: &Arc<O>)
    where
        O: Send + Sync + 'static,
    {
        let owner = owner_ref(owner);
        self.queue.post(move |engine| engine.run_all(&owner));
    }

    /// Forget every callback of `owner`
    pub fn clear_all<O>(&self, owner: &Arc<O>)
    where
        O: Send + Sync + 'static,
    {
        let owner = owner_ref(owner);
        self.queue.post(move |engine| engine.clear_all(&owner));
    }

    /// Apply the light or dark half of `value` to `owner` now and on every
    /// appearance change
    ///
    /// ```rust
    /// use std::sync::{Arc, Mutex};
    /// use tint_platform::HeadlessPlatform;
    /// use tint_theme::{AppearanceRuntime, Themed};
    ///
    /// struct Label {
    ///     color: Mutex<u32>,
    /// }
    ///
    /// let mut runtime = AppearanceRuntime::new(Arc::new(HeadlessPlatform::new()));
    /// let appearance = runtime.handle();
    /// let label = Arc::new(Label { color: Mutex::new(0) });
    ///
    /// appearance.bind(&label, "text_color", Themed::new(0x000000, 0xFFFFFF), |label, color| {
    ///     *label.color.lock().unwrap() = *color;
    /// });
    /// assert_eq!(*label.color.lock().unwrap(), 0x000000);
    ///
    /// appearance.set_light(false);
    /// runtime.run_pending();
    /// assert_eq!(*label.color.lock().unwrap(), 0xFFFFFF);
    /// ```
    pub fn bind<O, T, F>(&self, owner: &Arc<O>, key: impl Into<String>, value: Themed<T>, apply: F)
    where
        O: Send + Sync + 'static,
        T: Send + 'static,
        F: Fn(&O, &T) + Send + 'static,
    {
        let weak = Arc::downgrade(owner);
        self.run_and_set(owner, key, move |light| {
            if let Some(owner) = weak.upgrade() {
                apply(&owner, value.resolve(light));
            }
        });
    }

    fn store_callback<O>(&self, owner: &Arc<O>, key: String, callback: AppearanceCallback)
    where
        O: Send + Sync + 'static,
    {
        if key.is_empty() {
            return;
        }
        let owner = owner_ref(owner);
        self.queue.post(move |engine| engine.set_callback(owner, key, callback));
    }
}

impl fmt::Debug for Appearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Appearance")
            .field("flags", &self.flags())
            .finish()
    }
}

fn owner_ref<O>(owner: &Arc<O>) -> OwnerRef
where
    O: Send + Sync + 'static,
{
    let erased: Arc<dyn Any + Send + Sync> = Arc::clone(owner) as Arc<dyn Any + Send + Sync>;
    WeakRef::new(&erased)
}
