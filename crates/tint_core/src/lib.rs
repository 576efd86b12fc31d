//! Tint Core Runtime
//!
//! Foundational primitives shared by the Tint appearance engine:
//!
//! - **Weak-keyed tables**: side tables keyed by objects they do not own,
//!   pruned lazily once the key is dropped
//! - **Main-thread dispatch**: a task queue that any thread can post to and
//!   exactly one thread drains
//! - **Appearance stores**: pluggable storage for the sync/light/background
//!   flags
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tint_core::weak::{WeakKeyMap, WeakRef};
//!
//! let owner = Arc::new(String::from("label"));
//! let mut table: WeakKeyMap<String, u32> = WeakKeyMap::new();
//!
//! table.insert(WeakRef::new(&owner), 7);
//! assert_eq!(table.get(&WeakRef::new(&owner)), Some(&7));
//!
//! drop(owner);
//! assert_eq!(table.prune(), 1);
//! assert!(table.is_empty());
//! ```

pub mod dispatch;
pub mod store;
pub mod weak;

pub use dispatch::{MainQueue, QueueHandle, Task};
pub use store::{AppearanceFlags, AppearanceStore, FnStore, MemoryStore};
pub use weak::{EntryId, WeakKeyMap, WeakRef};
