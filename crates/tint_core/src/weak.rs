//! Weak-keyed arena map
//!
//! Associates values with objects the map does not own. A key is a `Weak`
//! reference identified by the address of its allocation. Because the map
//! keeps the `Weak` alive, that allocation (and so its address) cannot be
//! reused while the entry exists. Entries whose referent has been dropped are
//! skipped by lookups and removed by [`WeakKeyMap::prune`], which every live
//! iteration runs first. Inserting a new key also prunes once the table has
//! doubled since the last prune, so a table that is never iterated stays
//! bounded by twice its live size.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::fmt;
use std::sync::{Arc, Weak};

/// Table size below which insertion never prunes
const MIN_PRUNE_LEN: usize = 32;

new_key_type! {
    /// Slot of an entry inside a [`WeakKeyMap`]
    pub struct EntryId;
}

fn address_of<K: ?Sized>(strong: &Arc<K>) -> usize {
    Arc::as_ptr(strong) as *const () as usize
}

/// A weak reference that remembers the identity of its allocation
pub struct WeakRef<K: ?Sized> {
    addr: usize,
    weak: Weak<K>,
}

impl<K: ?Sized> WeakRef<K> {
    /// Downgrade `strong`, keeping its identity
    pub fn new(strong: &Arc<K>) -> Self {
        Self {
            addr: address_of(strong),
            weak: Arc::downgrade(strong),
        }
    }

    /// Identity of the referenced allocation
    pub fn addr(&self) -> usize {
        self.addr
    }

    pub fn upgrade(&self) -> Option<Arc<K>> {
        self.weak.upgrade()
    }

    /// Whether the referent is still alive
    pub fn is_alive(&self) -> bool {
        self.weak.strong_count() > 0
    }

    /// Whether this reference points at the same allocation as `strong`
    pub fn refers_to(&self, strong: &Arc<K>) -> bool {
        self.addr == address_of(strong)
    }
}

impl<K: ?Sized> Clone for WeakRef<K> {
    fn clone(&self) -> Self {
        Self {
            addr: self.addr,
            weak: Weak::clone(&self.weak),
        }
    }
}

impl<K: ?Sized> fmt::Debug for WeakRef<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakRef")
            .field("addr", &format_args!("{:#x}", self.addr))
            .field("alive", &self.is_alive())
            .finish()
    }
}

struct Entry<K: ?Sized, V> {
    key: WeakRef<K>,
    value: V,
}

/// Side table from weakly-held objects to owned values
pub struct WeakKeyMap<K: ?Sized, V> {
    entries: SlotMap<EntryId, Entry<K, V>>,
    index: FxHashMap<usize, EntryId>,
    prune_at: usize,
}

impl<K: ?Sized, V> WeakKeyMap<K, V> {
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            index: FxHashMap::default(),
            prune_at: MIN_PRUNE_LEN,
        }
    }

    /// Number of entries, including dead ones not yet pruned
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries whose key is still alive
    pub fn live_len(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.key.is_alive())
            .count()
    }

    fn live_id(&self, key: &WeakRef<K>) -> Option<EntryId> {
        let id = *self.index.get(&key.addr)?;
        self.entries[id].key.is_alive().then_some(id)
    }

    pub fn contains(&self, key: &WeakRef<K>) -> bool {
        self.live_id(key).is_some()
    }

    /// Value for a live key
    pub fn get(&self, key: &WeakRef<K>) -> Option<&V> {
        let id = self.live_id(key)?;
        Some(&self.entries[id].value)
    }

    /// Mutable value for a live key
    pub fn get_mut(&mut self, key: &WeakRef<K>) -> Option<&mut V> {
        let id = self.live_id(key)?;
        Some(&mut self.entries[id].value)
    }

    /// Value for `key`, inserting `default()` when absent
    pub fn get_or_insert_with<F>(&mut self, key: WeakRef<K>, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let id = match self.index.get(&key.addr) {
            Some(&id) => id,
            None => self.insert_new(key, default()),
        };
        &mut self.entries[id].value
    }

    /// Insert or replace the value for `key`, returning the previous one
    pub fn insert(&mut self, key: WeakRef<K>, value: V) -> Option<V> {
        match self.index.get(&key.addr) {
            Some(&id) => Some(std::mem::replace(&mut self.entries[id].value, value)),
            None => {
                self.insert_new(key, value);
                None
            }
        }
    }

    fn insert_new(&mut self, key: WeakRef<K>, value: V) -> EntryId {
        if self.entries.len() >= self.prune_at {
            self.prune();
            self.prune_at = (self.entries.len() * 2).max(MIN_PRUNE_LEN);
        }
        let addr = key.addr;
        let id = self.entries.insert(Entry { key, value });
        self.index.insert(addr, id);
        id
    }

    pub fn remove(&mut self, key: &WeakRef<K>) -> Option<V> {
        let id = self.index.remove(&key.addr)?;
        self.entries.remove(id).map(|entry| entry.value)
    }

    /// Drop every entry whose key is gone; returns how many were removed
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        let index = &mut self.index;
        self.entries.retain(|_, entry| {
            let alive = entry.key.is_alive();
            if !alive {
                index.remove(&entry.key.addr);
            }
            alive
        });
        before - self.entries.len()
    }

    /// Prune, then iterate live keys (upgraded) with their values
    pub fn live_mut(&mut self) -> impl Iterator<Item = (Arc<K>, &mut V)> + '_ {
        self.prune();
        self.entries.values_mut().filter_map(|entry| {
            let strong = entry.key.upgrade()?;
            Some((strong, &mut entry.value))
        })
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

impl<K: ?Sized, V> Default for WeakKeyMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Named: Send + Sync {
        fn name(&self) -> &str;
    }

    struct Widget(&'static str);

    impl Named for Widget {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_insert_replaces_value() {
        let owner = Arc::new(1u32);
        let mut map = WeakKeyMap::new();

        assert_eq!(map.insert(WeakRef::new(&owner), "a"), None);
        assert_eq!(map.insert(WeakRef::new(&owner), "b"), Some("a"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&WeakRef::new(&owner)), Some(&"b"));
    }

    #[test]
    fn test_distinct_allocations_are_distinct_keys() {
        let a = Arc::new(5u32);
        let b = Arc::new(5u32);
        let mut map = WeakKeyMap::new();

        map.insert(WeakRef::new(&a), 'a');
        map.insert(WeakRef::new(&b), 'b');

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&WeakRef::new(&a)), Some(&'a'));
        assert_eq!(map.get(&WeakRef::new(&b)), Some(&'b'));
    }

    #[test]
    fn test_dropped_key_is_skipped_then_pruned() {
        let keep = Arc::new(String::from("keep"));
        let gone = Arc::new(String::from("gone"));
        let gone_ref = WeakRef::new(&gone);
        let mut map = WeakKeyMap::new();
        map.insert(WeakRef::new(&keep), 1);
        map.insert(gone_ref.clone(), 2);

        drop(gone);

        assert!(!map.contains(&gone_ref));
        assert_eq!(map.get(&gone_ref), None);
        assert_eq!(map.len(), 2);
        assert_eq!(map.live_len(), 1);

        assert_eq!(map.prune(), 1);
        assert_eq!(map.len(), 1);
        assert_eq!(map.prune(), 0);
    }

    #[test]
    fn test_live_mut_yields_only_live_entries() {
        let a = Arc::new(1u8);
        let b = Arc::new(2u8);
        let mut map = WeakKeyMap::new();
        map.insert(WeakRef::new(&a), 10);
        map.insert(WeakRef::new(&b), 20);
        drop(b);

        let mut seen = Vec::new();
        for (key, value) in map.live_mut() {
            *value += 1;
            seen.push((*key, *value));
        }

        assert_eq!(seen, vec![(1, 11)]);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_trait_object_keys() {
        let widget: Arc<dyn Named> = Arc::new(Widget("probe"));
        let mut map: WeakKeyMap<dyn Named, ()> = WeakKeyMap::new();

        map.get_or_insert_with(WeakRef::new(&widget), || ());
        map.get_or_insert_with(WeakRef::new(&widget), || ());
        assert_eq!(map.len(), 1);

        let names: Vec<String> = map
            .live_mut()
            .map(|(key, _)| key.name().to_string())
            .collect();
        assert_eq!(names, vec!["probe".to_string()]);
    }

    #[test]
    fn test_remove() {
        let owner = Arc::new(());
        let key = WeakRef::new(&owner);
        let mut map = WeakKeyMap::new();
        map.insert(key.clone(), 3);

        assert_eq!(map.remove(&key), Some(3));
        assert_eq!(map.remove(&key), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_insert_prunes_dead_keys_without_iteration() {
        let mut map = WeakKeyMap::new();
        for n in 0..1000u32 {
            let owner = Arc::new(n);
            map.insert(WeakRef::new(&owner), [0u8; 64]);
        }

        assert!(map.len() <= MIN_PRUNE_LEN, "len={}", map.len());
        assert_eq!(map.live_len(), 0);
    }

    #[test]
    fn test_insert_keeps_live_keys_when_pruning() {
        let live: Vec<Arc<u32>> = (0..100).map(Arc::new).collect();
        let mut map = WeakKeyMap::new();
        for owner in &live {
            map.insert(WeakRef::new(owner), **owner);
        }
        for n in 0..500u32 {
            let temporary = Arc::new(n);
            map.get_or_insert_with(WeakRef::new(&temporary), || 0);
        }

        assert_eq!(map.live_len(), 100);
        assert!(map.len() <= 200, "len={}", map.len());
        for owner in &live {
            assert_eq!(map.get(&WeakRef::new(owner)), Some(&**owner));
        }
    }

    #[test]
    fn test_refers_to() {
        let a = Arc::new(0i32);
        let b = Arc::new(0i32);
        let key = WeakRef::new(&a);

        assert!(key.refers_to(&a));
        assert!(!key.refers_to(&b));
    }
}
