//! Window override synchronizer
//!
//! Keeps every registered window's override style consistent with the
//! appearance flags. The probe gets the "observer" style, which is
//! `Unspecified` whenever sync is on so it keeps receiving system changes.
//! Ordinary windows get the same style when background tracking is on, and
//! an explicit light/dark style otherwise, so the app's chosen appearance
//! survives while it is backgrounded.

use crate::probe::ProbeWindow;
use tint_core::store::AppearanceFlags;
use tint_core::weak::{WeakKeyMap, WeakRef};
use tint_platform::{InterfaceStyle, Window};

/// Override styles computed from one set of flags
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedStyles {
    /// Style for the probe window
    pub probe: InterfaceStyle,
    /// Style for every other registered window
    pub windows: InterfaceStyle,
}

/// Compute the override styles for `flags`
pub fn resolve_styles(flags: AppearanceFlags) -> ResolvedStyles {
    let explicit = InterfaceStyle::explicit(flags.light);
    let probe = if flags.sync {
        InterfaceStyle::Unspecified
    } else {
        explicit
    };
    let windows = if flags.track_in_background {
        probe
    } else {
        explicit
    };
    ResolvedStyles { probe, windows }
}

/// Weak window set plus the probe window
#[derive(Default)]
pub struct WindowSynchronizer {
    windows: WeakKeyMap<dyn Window, ()>,
    probe: Option<ProbeWindow>,
}

impl WindowSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `window`; returns false if it was already registered
    pub fn insert(&mut self, window: WeakRef<dyn Window>) -> bool {
        if self.windows.contains(&window) {
            return false;
        }
        self.windows.insert(window, ());
        true
    }

    pub fn remove(&mut self, window: &WeakRef<dyn Window>) -> bool {
        self.windows.remove(window).is_some()
    }

    /// Number of registered windows still alive, excluding the probe
    pub fn window_count(&self) -> usize {
        self.windows.live_len()
    }

    pub fn probe(&self) -> Option<&ProbeWindow> {
        self.probe.as_ref()
    }

    pub fn set_probe(&mut self, probe: ProbeWindow) {
        self.probe = Some(probe);
    }

    /// Write `styles` to the probe and every live window whose override
    /// differs; returns the number of writes
    pub fn apply(&mut self, styles: ResolvedStyles) -> usize {
        let mut writes = 0;
        if let Some(probe) = &self.probe {
            if probe.apply_style(styles.probe) {
                writes += 1;
            }
        }
        for (window, _) in self.windows.live_mut() {
            if window.override_style() != styles.windows {
                window.set_override_style(styles.windows);
                writes += 1;
            }
        }
        tracing::trace!(writes, ?styles, "window overrides synchronized");
        writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tint_platform::HeadlessPlatform;

    fn flags(sync: bool, light: bool, track_in_background: bool) -> AppearanceFlags {
        AppearanceFlags {
            sync,
            light,
            track_in_background,
        }
    }

    #[test]
    fn test_resolve_styles_table() {
        use InterfaceStyle::{Dark, Light, Unspecified};

        let cases = [
            (flags(false, true, false), Light, Light),
            (flags(false, false, false), Dark, Dark),
            (flags(false, true, true), Light, Light),
            (flags(false, false, true), Dark, Dark),
            (flags(true, true, false), Unspecified, Light),
            (flags(true, false, false), Unspecified, Dark),
            (flags(true, true, true), Unspecified, Unspecified),
            (flags(true, false, true), Unspecified, Unspecified),
        ];

        for (input, probe, windows) in cases {
            assert_eq!(
                resolve_styles(input),
                ResolvedStyles { probe, windows },
                "flags={input:?}"
            );
        }
    }

    #[test]
    fn test_insert_is_idempotent() {
        let platform = HeadlessPlatform::new();
        let window: Arc<dyn Window> = platform.window(None);
        let mut sync = WindowSynchronizer::new();

        assert!(sync.insert(WeakRef::new(&window)));
        assert!(!sync.insert(WeakRef::new(&window)));
        assert_eq!(sync.window_count(), 1);
    }

    #[test]
    fn test_apply_writes_only_differences() {
        let platform = HeadlessPlatform::new();
        let first: Arc<dyn Window> = platform.window(None);
        let second: Arc<dyn Window> = platform.window(None);
        second.set_override_style(InterfaceStyle::Dark);
        let baseline = platform.override_writes();

        let mut sync = WindowSynchronizer::new();
        sync.insert(WeakRef::new(&first));
        sync.insert(WeakRef::new(&second));

        let styles = resolve_styles(flags(false, false, false));
        assert_eq!(sync.apply(styles), 1);
        assert_eq!(sync.apply(styles), 0);
        assert_eq!(platform.override_writes(), baseline + 1);
        assert_eq!(first.override_style(), InterfaceStyle::Dark);
    }

    #[test]
    fn test_apply_skips_dropped_and_removed_windows() {
        let platform = HeadlessPlatform::new();
        let kept: Arc<dyn Window> = platform.window(None);
        let dropped: Arc<dyn Window> = platform.window(None);
        let removed: Arc<dyn Window> = platform.window(None);

        let mut sync = WindowSynchronizer::new();
        sync.insert(WeakRef::new(&kept));
        sync.insert(WeakRef::new(&dropped));
        sync.insert(WeakRef::new(&removed));
        drop(dropped);
        assert!(sync.remove(&WeakRef::new(&removed)));

        assert_eq!(sync.apply(resolve_styles(flags(false, true, false))), 1);
        assert_eq!(sync.window_count(), 1);
        assert_eq!(removed.override_style(), InterfaceStyle::Unspecified);
    }

    #[test]
    fn test_probe_gets_observer_style() {
        let platform = HeadlessPlatform::new();
        let window: Arc<dyn Window> = platform.window(None);
        let mut sync = WindowSynchronizer::new();
        sync.set_probe(ProbeWindow::create(&platform).unwrap());
        sync.insert(WeakRef::new(&window));

        sync.apply(resolve_styles(flags(true, false, false)));

        let probe = sync.probe().unwrap();
        assert_eq!(probe.window().override_style(), InterfaceStyle::Unspecified);
        assert_eq!(window.override_style(), InterfaceStyle::Dark);
    }
}
