//! Tint Appearance Engine
//!
//! Keeps an application's light/dark appearance consistent across windows
//! and re-renders dependent values automatically when it changes.
//!
//! # Overview
//!
//! - **Appearance state**: `sync`, `light` and `track_in_background` flags
//!   behind a pluggable store, with idempotent setters
//! - **Window synchronizer**: reconciles every registered window's override
//!   style with the flags
//! - **Probe window**: a hidden window that reports operating-system
//!   appearance changes while sync is on
//! - **Callback registry**: per-owner, per-key recompute closures replayed on
//!   every appearance change; owners are held weakly
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use tint_platform::{HeadlessPlatform, InterfaceStyle, SystemEvent, Window};
//! use tint_theme::AppearanceRuntime;
//!
//! struct Badge {
//!     alpha: Mutex<f32>,
//! }
//!
//! let platform = Arc::new(HeadlessPlatform::new());
//! let mut runtime = AppearanceRuntime::new(platform.clone());
//! let appearance = runtime.handle();
//!
//! let window: Arc<dyn Window> = platform.window(None);
//! appearance.register_window(&window);
//!
//! let badge = Arc::new(Badge { alpha: Mutex::new(1.0) });
//! let weak = Arc::downgrade(&badge);
//! appearance.run_and_set(&badge, "set_alpha", move |light| {
//!     if let Some(badge) = weak.upgrade() {
//!         *badge.alpha.lock().unwrap() = if light { 1.0 } else { 0.6 };
//!     }
//! });
//! runtime.run_pending();
//!
//! // The operating system switches to dark mode.
//! platform.set_system_style(InterfaceStyle::Dark);
//! runtime.handle_system_event(SystemEvent::TraitsDidChange);
//! runtime.run_pending();
//!
//! assert!(!appearance.light());
//! assert_eq!(*badge.alpha.lock().unwrap(), 0.6);
//! ```
//!
//! # Threading
//!
//! [`Appearance`] handles can be used from any thread. Flag changes,
//! broadcasts, window passes and registry updates all run, in call order,
//! when the owning thread calls [`AppearanceRuntime::run_pending`].

pub mod config;
pub mod error;
pub mod probe;
pub mod registry;
pub mod runtime;
pub mod state;
pub mod sync;
pub mod value;

pub use config::AppearanceConfig;
pub use error::{Result, ThemeError};
pub use probe::ProbeWindow;
pub use registry::{callback_key, AppearanceCallback, CallbackRegistry};
pub use runtime::{AppearanceRuntime, AppearanceRuntimeBuilder};
pub use state::Appearance;
pub use sync::{resolve_styles, ResolvedStyles, WindowSynchronizer};
pub use value::Themed;

pub use tint_core::store::{AppearanceFlags, AppearanceStore, FnStore, MemoryStore};
