//! Appearance flag storage
//!
//! The engine never owns its flags directly; it reads and writes them through
//! an [`AppearanceStore`]. Hosts that persist the user's preference supply
//! their own store (or an [`FnStore`] built from getter/setter closures), and
//! change detection stays in the engine regardless of where values live.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Storage strategy for the three appearance flags
///
/// Implementations must be cheap; getters are called on every state change
/// and every window pass.
pub trait AppearanceStore: Send + Sync {
    fn sync(&self) -> bool;
    fn set_sync(&self, sync: bool);
    fn light(&self) -> bool;
    fn set_light(&self, light: bool);
    fn track_in_background(&self) -> bool;
    fn set_track_in_background(&self, track: bool);
}

/// Snapshot of all appearance flags
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AppearanceFlags {
    /// Follow the operating system's reported appearance
    pub sync: bool,
    /// Current resolved appearance
    pub light: bool,
    /// Let ordinary windows defer to the system while backgrounded
    pub track_in_background: bool,
}

impl AppearanceFlags {
    /// Read every flag from `store`
    pub fn read(store: &dyn AppearanceStore) -> Self {
        Self {
            sync: store.sync(),
            light: store.light(),
            track_in_background: store.track_in_background(),
        }
    }
}

impl Default for AppearanceFlags {
    fn default() -> Self {
        Self {
            sync: true,
            light: true,
            track_in_background: false,
        }
    }
}

/// In-process store backed by atomics
#[derive(Debug)]
pub struct MemoryStore {
    sync: AtomicBool,
    light: AtomicBool,
    track_in_background: AtomicBool,
}

impl MemoryStore {
    pub fn new(flags: AppearanceFlags) -> Self {
        Self {
            sync: AtomicBool::new(flags.sync),
            light: AtomicBool::new(flags.light),
            track_in_background: AtomicBool::new(flags.track_in_background),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(AppearanceFlags::default())
    }
}

impl AppearanceStore for MemoryStore {
    fn sync(&self) -> bool {
        self.sync.load(Ordering::SeqCst)
    }

    fn set_sync(&self, sync: bool) {
        self.sync.store(sync, Ordering::SeqCst);
    }

    fn light(&self) -> bool {
        self.light.load(Ordering::SeqCst)
    }

    fn set_light(&self, light: bool) {
        self.light.store(light, Ordering::SeqCst);
    }

    fn track_in_background(&self) -> bool {
        self.track_in_background.load(Ordering::SeqCst)
    }

    fn set_track_in_background(&self, track: bool) {
        self.track_in_background.store(track, Ordering::SeqCst);
    }
}

type Getter = Box<dyn Fn() -> bool + Send + Sync>;
type Setter = Box<dyn Fn(bool) + Send + Sync>;

struct Accessor {
    get: Getter,
    set: Setter,
}

impl Accessor {
    fn memory(initial: bool) -> Self {
        let cell = Arc::new(AtomicBool::new(initial));
        let read = Arc::clone(&cell);
        Self {
            get: Box::new(move || read.load(Ordering::SeqCst)),
            set: Box::new(move |value| cell.store(value, Ordering::SeqCst)),
        }
    }

    fn new<G, S>(get: G, set: S) -> Self
    where
        G: Fn() -> bool + Send + Sync + 'static,
        S: Fn(bool) + Send + Sync + 'static,
    {
        Self {
            get: Box::new(get),
            set: Box::new(set),
        }
    }
}

/// Store assembled from per-flag getter/setter closures
///
/// Flags without an explicit strategy are kept in memory.
///
/// ```rust
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use tint_core::store::{AppearanceFlags, AppearanceStore, FnStore};
///
/// let persisted = Arc::new(AtomicBool::new(false));
/// let read = Arc::clone(&persisted);
/// let write = Arc::clone(&persisted);
///
/// let store = FnStore::new(AppearanceFlags::default()).with_light(
///     move || read.load(Ordering::SeqCst),
///     move |light| write.store(light, Ordering::SeqCst),
/// );
///
/// assert!(!store.light());
/// store.set_light(true);
/// assert!(persisted.load(Ordering::SeqCst));
/// ```
pub struct FnStore {
    sync: Accessor,
    light: Accessor,
    track_in_background: Accessor,
}

impl FnStore {
    pub fn new(initial: AppearanceFlags) -> Self {
        Self {
            sync: Accessor::memory(initial.sync),
            light: Accessor::memory(initial.light),
            track_in_background: Accessor::memory(initial.track_in_background),
        }
    }

    pub fn with_sync<G, S>(mut self, get: G, set: S) -> Self
    where
        G: Fn() -> bool + Send + Sync + 'static,
        S: Fn(bool) + Send + Sync + 'static,
    {
        self.sync = Accessor::new(get, set);
        self
    }

    pub fn with_light<G, S>(mut self, get: G, set: S) -> Self
    where
        G: Fn() -> bool + Send + Sync + 'static,
        S: Fn(bool) + Send + Sync + 'static,
    {
        self.light = Accessor::new(get, set);
        self
    }

    pub fn with_track_in_background<G, S>(mut self, get: G, set: S) -> Self
    where
        G: Fn() -> bool + Send + Sync + 'static,
        S: Fn(bool) + Send + Sync + 'static,
    {
        self.track_in_background = Accessor::new(get, set);
        self
    }
}

impl Default for FnStore {
    fn default() -> Self {
        Self::new(AppearanceFlags::default())
    }
}

impl AppearanceStore for FnStore {
    fn sync(&self) -> bool {
        (self.sync.get)()
    }

    fn set_sync(&self, sync: bool) {
        (self.sync.set)(sync)
    }

    fn light(&self) -> bool {
        (self.light.get)()
    }

    fn set_light(&self, light: bool) {
        (self.light.set)(light)
    }

    fn track_in_background(&self) -> bool {
        (self.track_in_background.get)()
    }

    fn set_track_in_background(&self, track: bool) {
        (self.track_in_background.set)(track)
    }
}
