//! Weak-keyed recompute callback registry
//!
//! Maps owner identity -> (key -> callback). Owners are held weakly and
//! callbacks strongly, so dropping an owner is enough to retire its callbacks.
//! The entry is skipped from then on and released by the next broadcast, or
//! by a later registration once enough dead owners have piled up.
//!
//! Keys are caller-chosen. Properties that share an operation but differ by
//! some discriminator (a control state, a layer name) must include it in the
//! key, see [`callback_key`], or they overwrite each other.

use indexmap::IndexMap;
use std::any::Any;
use tint_core::weak::{WeakKeyMap, WeakRef};

/// Recompute closure, invoked with `true` for light and `false` for dark
pub type AppearanceCallback = Box<dyn Fn(bool) + Send>;

/// Weak identity of a callback owner
pub type OwnerRef = WeakRef<dyn Any + Send + Sync>;

type OwnerCallbacks = IndexMap<String, AppearanceCallback>;

/// Build a registry key from an operation name and a discriminator
///
/// ```rust
/// use tint_theme::registry::callback_key;
///
/// assert_eq!(callback_key("set_image", 2), "set_image2");
/// assert_eq!(callback_key("set_alpha", ""), "set_alpha");
/// ```
pub fn callback_key(operation: &str, discriminator: impl std::fmt::Display) -> String {
    format!("{operation}{discriminator}")
}

/// Owner -> key -> callback table
#[derive(Default)]
pub struct CallbackRegistry {
    owners: WeakKeyMap<dyn Any + Send + Sync, OwnerCallbacks>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `callback` under `(owner, key)`, replacing any previous one
    ///
    /// Empty keys are ignored.
    pub fn set(&mut self, owner: OwnerRef, key: String, callback: AppearanceCallback) {
        if key.is_empty() {
            return;
        }
        self.owners
            .get_or_insert_with(owner, OwnerCallbacks::default)
            .insert(key, callback);
    }

    /// Invoke every callback of `owner`; returns how many ran
    pub fn run_all(&self, owner: &OwnerRef, light: bool) -> usize {
        match self.owners.get(owner) {
            Some(callbacks) => {
                callbacks.values().for_each(|callback| callback(light));
                callbacks.len()
            }
            None => 0,
        }
    }

    /// Drop every callback of `owner`; returns how many were removed
    pub fn clear_all(&mut self, owner: &OwnerRef) -> usize {
        self.owners
            .remove(owner)
            .map_or(0, |callbacks| callbacks.len())
    }

    /// Replay every live owner's callbacks with `light`
    ///
    /// Dead owners are pruned first. Returns the number of callbacks invoked.
    pub fn broadcast(&mut self, light: bool) -> usize {
        let mut invoked = 0;
        for (_owner, callbacks) in self.owners.live_mut() {
            for callback in callbacks.values() {
                callback(light);
                invoked += 1;
            }
        }
        invoked
    }

    /// Number of owners still alive
    pub fn owner_count(&self) -> usize {
        self.owners.live_len()
    }

    pub fn callback_count(&self, owner: &OwnerRef) -> usize {
        self.owners.get(owner).map_or(0, |callbacks| callbacks.len())
    }

    /// Remove dead owners without broadcasting
    pub fn prune(&mut self) -> usize {
        self.owners.prune()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct View;

    fn owner() -> (Arc<dyn Any + Send + Sync>, OwnerRef) {
        let strong: Arc<dyn Any + Send + Sync> = Arc::new(View);
        let weak = WeakRef::new(&strong);
        (strong, weak)
    }

    fn recorder() -> (Arc<Mutex<Vec<bool>>>, AppearanceCallback) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        (log, Box::new(move |light| sink.lock().unwrap().push(light)))
    }

    #[test]
    fn test_set_does_not_invoke() {
        let (_strong, view) = owner();
        let (log, callback) = recorder();
        let mut registry = CallbackRegistry::new();

        registry.set(view.clone(), "alpha".into(), callback);

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(registry.callback_count(&view), 1);
    }

    #[test]
    fn test_empty_key_ignored() {
        let (_strong, view) = owner();
        let (_log, callback) = recorder();
        let mut registry = CallbackRegistry::new();

        registry.set(view.clone(), String::new(), callback);

        assert_eq!(registry.owner_count(), 0);
        assert_eq!(registry.callback_count(&view), 0);
    }

    #[test]
    fn test_same_key_replaces() {
        let (_strong, view) = owner();
        let (first, callback) = recorder();
        let (second, replacement) = recorder();
        let mut registry = CallbackRegistry::new();

        registry.set(view.clone(), "image0".into(), callback);
        registry.set(view.clone(), "image0".into(), replacement);
        registry.broadcast(false);

        assert!(first.lock().unwrap().is_empty());
        assert_eq!(*second.lock().unwrap(), vec![false]);
    }

    #[test]
    fn test_discriminated_keys_coexist() {
        let (_strong, view) = owner();
        let (normal, callback) = recorder();
        let (highlighted, other) = recorder();
        let mut registry = CallbackRegistry::new();

        registry.set(view.clone(), callback_key("set_image", 0), callback);
        registry.set(view.clone(), callback_key("set_image", 1), other);

        assert_eq!(registry.callback_count(&view), 2);
        assert_eq!(registry.broadcast(true), 2);
        assert_eq!(*normal.lock().unwrap(), vec![true]);
        assert_eq!(*highlighted.lock().unwrap(), vec![true]);
    }

    #[test]
    fn test_broadcast_skips_dropped_owner() {
        let (strong, view) = owner();
        let (log, callback) = recorder();
        let mut registry = CallbackRegistry::new();
        registry.set(view.clone(), "tint".into(), callback);

        drop(strong);

        assert_eq!(registry.broadcast(false), 0);
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(registry.owner_count(), 0);
    }

    #[test]
    fn test_set_releases_dropped_owners_without_broadcast() {
        let captured = Arc::new(());
        let mut registry = CallbackRegistry::new();

        for _ in 0..1000 {
            let (strong, view) = owner();
            let held = Arc::clone(&captured);
            registry.set(
                view,
                "tint".into(),
                Box::new(move |_| {
                    let _ = &held;
                }),
            );
            drop(strong);
        }

        assert_eq!(registry.owner_count(), 0);
        assert!(registry.owners.len() < 100, "held={}", registry.owners.len());
        assert!(Arc::strong_count(&captured) < 100);
    }

    #[test]
    fn test_run_all_targets_one_owner() {
        let (_a, first) = owner();
        let (_b, second) = owner();
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = CallbackRegistry::new();
        for view in [&first, &second] {
            let count = Arc::clone(&count);
            registry.set(
                view.clone(),
                "border".into(),
                Box::new(move |_| {
                    count.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }

        assert_eq!(registry.run_all(&first, true), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clear_all() {
        let (_strong, view) = owner();
        let (log, callback) = recorder();
        let mut registry = CallbackRegistry::new();
        registry.set(view.clone(), "shadow".into(), callback);

        assert_eq!(registry.clear_all(&view), 1);
        assert_eq!(registry.broadcast(true), 0);
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(registry.clear_all(&view), 0);
    }
}
